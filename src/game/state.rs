//! # Game State Module
//!
//! The top-level state machine and the session it owns.
//!
//! [`GameController`] is the single owner of every piece of mutable session
//! state: the loaded map, the player's position, the player's creature, the
//! textbox, the battle engine and the deferred triggers. Input events are
//! dispatched to it one at a time, and [`GameController::update`] fires any
//! deferred trigger whose deadline has passed. Nothing else mutates the session.

use crate::input::PlayerInput;
use crate::{
    BattleEngine, BattleOutcome, BattleStart, Creature, Direction, GameConfig, Map, MoveOutcome,
    Overworld, Position, RedEmuError, RedEmuResult, Scheduler, SpeciesTable, TextMeasure,
    Textbox, TextboxAdvance, Tile, TriggerChannel, TriggerRequest, World, wrap_text,
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Message shown when the player walks into water.
pub const WATER_MESSAGE: &str = "It's water. You can't walk on it.";

/// Which handler receives input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Walking around the map
    Overworld,
    /// A message is being paged through
    Textbox,
    /// A wild encounter is in progress
    Battle,
}

/// Something observable that happened while handling input or a trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The player stepped onto a new tile
    PlayerMoved { from: Position, to: Position, tile: Tile },
    /// A step was rejected; `tile` is None at the map edge
    MoveBlocked { tile: Option<Tile> },
    /// A message was added to the textbox queue
    MessageQueued { text: String },
    /// A wild creature appeared
    EncounterStarted { species: String },
    /// An encounter was rolled but the player's creature cannot fight
    EncounterRefused,
    /// The battle textbox changed
    BattleMessage { text: String },
    /// The battle was closed
    BattleEnded { outcome: Option<BattleOutcome> },
    /// The top-level mode changed
    ModeChanged { from: GameMode, to: GameMode },
}

/// Counters for the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Committed steps
    pub steps_taken: u64,
    /// Battles started
    pub encounters: u32,
    /// Wild creatures defeated
    pub victories: u32,
    /// Battles lost
    pub defeats: u32,
    /// Battles fled
    pub escapes: u32,
    /// Messages queued for the textbox
    pub messages_shown: u32,
}

impl SessionStats {
    /// Creates zeroed statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates statistics based on a game event.
    pub fn update_from_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::PlayerMoved { .. } => {
                self.steps_taken += 1;
            }
            GameEvent::EncounterStarted { .. } => {
                self.encounters += 1;
            }
            GameEvent::MessageQueued { .. } => {
                self.messages_shown += 1;
            }
            GameEvent::BattleEnded { outcome } => match outcome {
                Some(BattleOutcome::Victory) => self.victories += 1,
                Some(BattleOutcome::Defeat) => self.defeats += 1,
                Some(BattleOutcome::Fled) => self.escapes += 1,
                None => {}
            },
            _ => {}
        }
    }
}

/// Top-level session state and input demultiplexer.
pub struct GameController {
    mode: GameMode,
    world: World,
    map: Map,
    /// Player position and camera
    pub overworld: Overworld,
    /// Message queue and active message
    pub textbox: Textbox,
    /// Battle state machine
    pub battle: BattleEngine,
    /// The player's creature, shared by overworld and battles
    pub party: Creature,
    /// Deferred trigger deadlines
    pub scheduler: Scheduler,
    /// Session counters
    pub statistics: SessionStats,
    config: GameConfig,
    rng: StdRng,
    measure: Box<dyn TextMeasure>,
}

impl GameController {
    /// Creates a session on the configured start map.
    ///
    /// Fails if the configuration is invalid, if the start map or starter
    /// species is unknown, or if the start position is off the map or on an
    /// impassable tile.
    pub fn new(
        world: World,
        species: SpeciesTable,
        config: GameConfig,
        measure: Box<dyn TextMeasure>,
        seed: u64,
    ) -> RedEmuResult<Self> {
        config.validate()?;
        let map = world.load(&config.start_map)?;

        let start = config.start_position;
        match map.tile_at(start) {
            Some(tile) if !tile.is_impassable() => {}
            Some(tile) => {
                return Err(RedEmuError::InvalidState(format!(
                    "start position ({}, {}) is on impassable {}",
                    start.x,
                    start.y,
                    tile.name()
                )))
            }
            None => {
                return Err(RedEmuError::InvalidState(format!(
                    "start position ({}, {}) is outside map '{}'",
                    start.x, start.y, map.id
                )))
            }
        }

        let starter = species
            .get(&config.starter)
            .map(Creature::from_species)
            .ok_or_else(|| RedEmuError::UnknownSpecies(config.starter.clone()))?;

        info!(
            "New session on '{}' at ({}, {}) with {}",
            map.id, start.x, start.y, starter.name
        );

        Ok(Self {
            mode: GameMode::Overworld,
            overworld: Overworld::new(&map, start, &config),
            textbox: Textbox::new(config.textbox_wrap_width),
            battle: BattleEngine::new(species, &config),
            party: starter,
            scheduler: Scheduler::new(),
            statistics: SessionStats::new(),
            rng: StdRng::seed_from_u64(seed),
            world,
            map,
            config,
            measure,
        })
    }

    /// Current top-level mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// The map the player is on.
    pub fn map(&self) -> &Map {
        &self.map
    }

    /// The map templates and interactions.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Player tile position.
    pub fn player_position(&self) -> Position {
        self.overworld.player
    }

    /// Active configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Returns true if the battle menu would accept a choice at `now`.
    pub fn battle_menu_open(&self, now: f64) -> bool {
        self.mode == GameMode::Battle && self.battle.accepts_input(now)
    }

    /// The battle message as it fits beside the battle menu, at most two lines.
    ///
    /// Empty when no battle is showing.
    pub fn battle_message_lines(&self) -> Vec<String> {
        let Some(battle) = self.battle.battle() else {
            return Vec::new();
        };
        let mut lines = wrap_text(
            &battle.message,
            self.measure.as_ref(),
            self.config.textbox_wrap_width - crate::config::BATTLE_MENU_WIDTH,
        );
        lines.truncate(2);
        lines
    }

    /// Dispatches one input event to the handler for the current mode.
    pub fn handle_input(&mut self, input: PlayerInput, now: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();

        match self.mode {
            GameMode::Overworld if self.textbox.is_active() => {
                self.handle_textbox_input(input, &mut events)
            }
            GameMode::Overworld => self.handle_overworld_input(input, now, &mut events),
            GameMode::Textbox => self.handle_textbox_input(input, &mut events),
            GameMode::Battle => self.handle_battle_input(input, now, &mut events),
        }

        self.record(&events);
        events
    }

    /// Fires every deferred trigger that is due at `now`.
    pub fn update(&mut self, now: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();

        for channel in self.scheduler.poll(now) {
            debug!("Trigger {:?} fired at t={:.2}", channel, now);
            match channel {
                TriggerChannel::EnemyTurn => {
                    let request = self.battle.enemy_turn(&mut self.party, now, &mut self.rng);
                    self.push_battle_message(&mut events);
                    self.arm(request, now);
                }
                TriggerChannel::BattleEnded => self.end_battle(&mut events),
            }
        }

        self.record(&events);
        events
    }

    /// Starts a wild encounter, or explains why the player's creature cannot fight.
    pub fn start_battle(&mut self, now: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.begin_encounter(now, &mut events);
        self.record(&events);
        events
    }

    fn handle_overworld_input(&mut self, input: PlayerInput, now: f64, events: &mut Vec<GameEvent>) {
        match input {
            PlayerInput::Move(direction) => self.step(direction, now, events),
            PlayerInput::Confirm => {
                let message = self
                    .overworld
                    .find_interaction(&self.map, &self.world.interactions)
                    .map(str::to_string);
                if let Some(message) = message {
                    debug!("Interaction near {:?}", self.overworld.player);
                    self.show_message(message, events);
                }
            }
            PlayerInput::Battle(_) | PlayerInput::Quit => {}
        }
    }

    fn step(&mut self, direction: Direction, now: f64, events: &mut Vec<GameEvent>) {
        let from = self.overworld.player;
        match self.overworld.try_move(&self.map, direction, &mut self.rng) {
            MoveOutcome::OutOfBounds => events.push(GameEvent::MoveBlocked { tile: None }),
            MoveOutcome::Blocked(tile) => {
                events.push(GameEvent::MoveBlocked { tile: Some(tile) });
                if tile == Tile::Water {
                    self.show_message(WATER_MESSAGE.to_string(), events);
                }
            }
            MoveOutcome::Moved { tile, encounter } => {
                events.push(GameEvent::PlayerMoved {
                    from,
                    to: self.overworld.player,
                    tile,
                });
                if encounter {
                    self.begin_encounter(now, events);
                }
            }
        }
    }

    fn handle_textbox_input(&mut self, input: PlayerInput, events: &mut Vec<GameEvent>) {
        if input != PlayerInput::Confirm {
            return;
        }
        if self.textbox.advance(self.measure.as_ref()) == TextboxAdvance::Closed
            && !self.battle.is_active()
        {
            self.set_mode(GameMode::Overworld, events);
        }
    }

    fn handle_battle_input(&mut self, input: PlayerInput, now: f64, events: &mut Vec<GameEvent>) {
        let PlayerInput::Battle(action) = input else {
            return;
        };
        let request = self
            .battle
            .choose(action, &mut self.party, now, &mut self.rng);
        if request.is_some() {
            debug!("Player chose {:?}", action);
            self.push_battle_message(events);
        }
        self.arm(request, now);
    }

    fn begin_encounter(&mut self, now: f64, events: &mut Vec<GameEvent>) {
        match self.battle.start(&self.party, now, &mut self.rng) {
            BattleStart::Started { species } => {
                self.scheduler.clear();
                events.push(GameEvent::EncounterStarted { species });
                self.set_mode(GameMode::Battle, events);
                self.push_battle_message(events);
            }
            BattleStart::Refused { message } => {
                events.push(GameEvent::EncounterRefused);
                self.post_notice(message, events);
            }
        }
    }

    fn end_battle(&mut self, events: &mut Vec<GameEvent>) {
        let Some(end) = self.battle.end(&mut self.party, &mut self.rng) else {
            return;
        };
        self.scheduler.disarm(TriggerChannel::EnemyTurn);
        events.push(GameEvent::BattleEnded {
            outcome: end.outcome,
        });
        self.set_mode(GameMode::Overworld, events);
        self.show_message(end.message, events);
    }

    fn arm(&mut self, request: Option<TriggerRequest>, now: f64) {
        if let Some(request) = request {
            self.scheduler.arm(request.channel, now, request.delay);
        }
    }

    fn push_battle_message(&self, events: &mut Vec<GameEvent>) {
        if let Some(battle) = self.battle.battle() {
            events.push(GameEvent::BattleMessage {
                text: battle.message.clone(),
            });
        }
    }

    /// Queues a message raised on the overworld and switches to the textbox.
    fn show_message(&mut self, message: String, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::MessageQueued {
            text: message.clone(),
        });
        if self.textbox.enqueue(message, self.measure.as_ref()) && !self.battle.is_active() {
            self.set_mode(GameMode::Textbox, events);
        }
    }

    /// Queues a message without touching the mode.
    ///
    /// Used for a refused encounter. While the mode stays Overworld the open
    /// textbox still captures input.
    fn post_notice(&mut self, message: String, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::MessageQueued {
            text: message.clone(),
        });
        self.textbox.enqueue(message, self.measure.as_ref());
    }

    fn set_mode(&mut self, mode: GameMode, events: &mut Vec<GameEvent>) {
        if self.mode == mode {
            return;
        }
        info!("Mode {:?} -> {:?}", self.mode, mode);
        events.push(GameEvent::ModeChanged {
            from: self.mode,
            to: mode,
        });
        self.mode = mode;
    }

    fn record(&mut self, events: &[GameEvent]) {
        for event in events {
            self.statistics.update_from_event(event);
        }
    }
}
