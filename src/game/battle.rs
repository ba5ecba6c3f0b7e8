//! # Battle Engine
//!
//! Turn-based combat between the player's creature and a wild one.
//!
//! The engine never waits. Whenever the fight needs a pause (the enemy's
//! reply, the end of the battle) it returns a [`TriggerRequest`] and the
//! controller arms the matching deferred trigger. When that trigger fires the
//! controller calls back into [`BattleEngine::enemy_turn`] or
//! [`BattleEngine::end`].

use crate::{GameConfig, RedEmuError, RedEmuResult, TriggerChannel};
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Base stats of a creature species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub name: String,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    /// Display colour as RGB
    pub color: [u8; 3],
}

/// The species wild creatures are drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesTable {
    species: Vec<Species>,
}

impl SpeciesTable {
    /// Creates a table. At least one species is required.
    pub fn new(species: Vec<Species>) -> RedEmuResult<Self> {
        if species.is_empty() {
            return Err(RedEmuError::UnknownSpecies(
                "species table is empty".to_string(),
            ));
        }
        Ok(Self { species })
    }

    /// Looks up a species by name.
    pub fn get(&self, name: &str) -> Option<&Species> {
        self.species.iter().find(|s| s.name == name)
    }

    /// Picks a species uniformly at random.
    pub fn choose<R: Rng>(&self, rng: &mut R) -> &Species {
        // The table is never empty.
        self.species
            .choose(rng)
            .unwrap_or(&self.species[0])
    }

    /// All species in table order.
    pub fn all(&self) -> &[Species] {
        &self.species
    }
}

/// A creature taking part in battles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub color: [u8; 3],
}

impl Creature {
    /// Instantiates a species at full health.
    ///
    /// # Examples
    ///
    /// ```
    /// use redemu::{Creature, Species};
    ///
    /// let species = Species {
    ///     name: "PIXELPUP".to_string(),
    ///     max_hp: 25,
    ///     attack: 9,
    ///     defense: 4,
    ///     color: [173, 216, 230],
    /// };
    /// let pup = Creature::from_species(&species);
    /// assert_eq!(pup.hp, 25);
    /// assert!(!pup.is_fainted());
    /// ```
    pub fn from_species(species: &Species) -> Self {
        Self {
            name: species.name.clone(),
            hp: species.max_hp,
            max_hp: species.max_hp,
            attack: species.attack,
            defense: species.defense,
            color: species.color,
        }
    }

    /// Returns true once hit points reach zero.
    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    /// Removes hit points, stopping at zero. Returns the remaining hit points.
    pub fn take_damage(&mut self, damage: u32) -> u32 {
        self.hp = self.hp.saturating_sub(damage);
        self.hp
    }

    /// Restores hit points up to the maximum. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.hp - before
    }
}

/// Damage dealt by one attack.
///
/// `attack - defense / 2 + offset`, never less than 1.
///
/// # Examples
///
/// ```
/// use redemu::compute_damage;
///
/// assert_eq!(compute_damage(8, 0, 0), 8);
/// assert_eq!(compute_damage(8, 5, -2), 4);
/// assert_eq!(compute_damage(1, 40, -2), 1);
/// ```
pub fn compute_damage(attack: u32, defense: u32, offset: i32) -> u32 {
    let raw = i64::from(attack) - i64::from(defense / 2) + i64::from(offset);
    raw.clamp(1, i64::from(u32::MAX)) as u32
}

/// How a battle was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    Victory,
    Defeat,
    Fled,
}

/// Turn ownership within a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    /// Waiting for the player's menu choice
    PlayerTurn,
    /// The player has attacked; the enemy's reply is scheduled
    EnemyPending,
    /// The enemy is attacking
    EnemyTurn,
    /// The battle is over and waiting to be closed
    Resolved(BattleOutcome),
}

/// Battle menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleAction {
    Fight,
    Run,
}

/// A pause the engine needs before its next step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerRequest {
    pub channel: TriggerChannel,
    pub delay: f64,
}

/// A battle in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct Battle {
    /// The wild creature
    pub enemy: Creature,
    /// Whose turn it is
    pub phase: BattlePhase,
    /// Message in the battle textbox
    pub message: String,
    /// When `message` was set
    pub message_time: f64,
}

impl Battle {
    fn say(&mut self, message: String, now: f64) {
        debug!("Battle: {}", message);
        self.message = message;
        self.message_time = now;
    }
}

/// Result of trying to start a battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleStart {
    /// A wild creature of this species appeared
    Started { species: String },
    /// The player's creature cannot fight; show this message instead
    Refused { message: String },
}

/// Result of closing a battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleEnd {
    /// How the battle was resolved, if it was
    pub outcome: Option<BattleOutcome>,
    /// Hit points restored to the player's creature
    pub recovered: u32,
    /// Message to show on the overworld
    pub message: String,
}

/// The battle state machine.
#[derive(Debug, Clone)]
pub struct BattleEngine {
    species: SpeciesTable,
    battle: Option<Battle>,
    damage_variance: i32,
    recovery_min: u32,
    recovery_max: u32,
    input_gate: f64,
    enemy_turn_delay: f64,
    battle_end_delay: f64,
    flee_delay: f64,
}

impl BattleEngine {
    /// Creates an idle engine drawing wild creatures from `species`.
    pub fn new(species: SpeciesTable, config: &GameConfig) -> Self {
        Self {
            species,
            battle: None,
            damage_variance: config.damage_variance,
            recovery_min: config.recovery_min,
            recovery_max: config.recovery_max,
            input_gate: config.input_gate,
            enemy_turn_delay: config.enemy_turn_delay,
            battle_end_delay: config.battle_end_delay,
            flee_delay: config.flee_delay,
        }
    }

    /// The species table.
    pub fn species(&self) -> &SpeciesTable {
        &self.species
    }

    /// The battle in progress, if any.
    pub fn battle(&self) -> Option<&Battle> {
        self.battle.as_ref()
    }

    /// Returns true while a battle is in progress, resolved or not.
    pub fn is_active(&self) -> bool {
        self.battle.is_some()
    }

    /// Current turn phase, if a battle is in progress.
    pub fn phase(&self) -> Option<BattlePhase> {
        self.battle.as_ref().map(|b| b.phase)
    }

    /// Starts an encounter with a random wild creature.
    pub fn start<R: Rng>(&mut self, player: &Creature, now: f64, rng: &mut R) -> BattleStart {
        if player.is_fainted() {
            info!("{} cannot battle with 0 HP", player.name);
            return BattleStart::Refused {
                message: format!("Your {} is exhausted!", player.name),
            };
        }

        let enemy = Creature::from_species(self.species.choose(rng));
        let species = enemy.name.clone();
        info!("Wild {} appeared", species);

        let message = format!("A wild {} appeared! Get ready to battle!", enemy.name);
        self.battle = Some(Battle {
            enemy,
            phase: BattlePhase::PlayerTurn,
            message,
            message_time: now,
        });

        BattleStart::Started { species }
    }

    /// Returns true if the battle menu accepts a choice at `now`.
    ///
    /// Choices are only taken on the player's turn, and only once the current
    /// message has been on screen for the input gate duration.
    pub fn accepts_input(&self, now: f64) -> bool {
        match &self.battle {
            Some(battle) => {
                battle.phase == BattlePhase::PlayerTurn
                    && now - battle.message_time >= self.input_gate
            }
            None => false,
        }
    }

    /// Applies a battle menu choice. Ignored while input is gated.
    pub fn choose<R: Rng>(
        &mut self,
        action: BattleAction,
        player: &mut Creature,
        now: f64,
        rng: &mut R,
    ) -> Option<TriggerRequest> {
        if !self.accepts_input(now) {
            return None;
        }
        match action {
            BattleAction::Fight => self.player_attack(player, now, rng),
            BattleAction::Run => self.flee(now),
        }
    }

    fn roll_offset<R: Rng>(&self, rng: &mut R) -> i32 {
        rng.gen_range(-self.damage_variance..=self.damage_variance)
    }

    fn player_attack<R: Rng>(
        &mut self,
        player: &mut Creature,
        now: f64,
        rng: &mut R,
    ) -> Option<TriggerRequest> {
        let offset = self.roll_offset(rng);
        let battle = self.battle.as_mut()?;

        let damage = compute_damage(player.attack, battle.enemy.defense, offset);
        battle.enemy.take_damage(damage);
        battle.say(
            format!(
                "{} attacks {}! Did {} damage!",
                player.name, battle.enemy.name, damage
            ),
            now,
        );

        if battle.enemy.is_fainted() {
            battle.phase = BattlePhase::Resolved(BattleOutcome::Victory);
            battle.say(format!("Enemy {} fainted! You win!", battle.enemy.name), now);
            Some(TriggerRequest {
                channel: TriggerChannel::BattleEnded,
                delay: self.battle_end_delay,
            })
        } else {
            battle.phase = BattlePhase::EnemyPending;
            Some(TriggerRequest {
                channel: TriggerChannel::EnemyTurn,
                delay: self.enemy_turn_delay,
            })
        }
    }

    /// Runs the enemy's scheduled attack. A no-op unless the enemy's reply is pending.
    pub fn enemy_turn<R: Rng>(
        &mut self,
        player: &mut Creature,
        now: f64,
        rng: &mut R,
    ) -> Option<TriggerRequest> {
        if self.phase() != Some(BattlePhase::EnemyPending) {
            debug!("Enemy turn fired outside EnemyPending; ignoring");
            return None;
        }
        let offset = self.roll_offset(rng);
        let battle = self.battle.as_mut()?;
        battle.phase = BattlePhase::EnemyTurn;

        let damage = compute_damage(battle.enemy.attack, player.defense, offset);
        player.take_damage(damage);
        battle.say(
            format!(
                "Wild {} attacks! Did {} damage to your {}!",
                battle.enemy.name, damage, player.name
            ),
            now,
        );

        if player.is_fainted() {
            battle.phase = BattlePhase::Resolved(BattleOutcome::Defeat);
            battle.say(format!("Your {} fainted! You lost!", player.name), now);
            Some(TriggerRequest {
                channel: TriggerChannel::BattleEnded,
                delay: self.battle_end_delay,
            })
        } else {
            battle.phase = BattlePhase::PlayerTurn;
            None
        }
    }

    fn flee(&mut self, now: f64) -> Option<TriggerRequest> {
        let battle = self.battle.as_mut()?;
        battle.phase = BattlePhase::Resolved(BattleOutcome::Fled);
        battle.say("You ran away! Smart move, maybe.".to_string(), now);
        Some(TriggerRequest {
            channel: TriggerChannel::BattleEnded,
            delay: self.flee_delay,
        })
    }

    /// Closes the battle and discards the wild creature.
    ///
    /// A surviving player creature recovers a few hit points. A fainted one
    /// stays at zero. Returns None if no battle was in progress.
    pub fn end<R: Rng>(&mut self, player: &mut Creature, rng: &mut R) -> Option<BattleEnd> {
        let battle = self.battle.take()?;
        let outcome = match battle.phase {
            BattlePhase::Resolved(outcome) => Some(outcome),
            _ => None,
        };

        if player.is_fainted() {
            info!("Battle over ({:?}); {} needs healing", outcome, player.name);
            return Some(BattleEnd {
                outcome,
                recovered: 0,
                message: format!("You should take your {} to a healing center.", player.name),
            });
        }

        let amount = rng.gen_range(self.recovery_min..=self.recovery_max);
        let recovered = player.heal(amount);
        info!(
            "Battle over ({:?}); {} recovered {} HP",
            outcome, player.name, recovered
        );
        Some(BattleEnd {
            outcome,
            recovered,
            message: format!("{} feels a bit better.", player.name),
        })
    }
}
