//! # Deferred Triggers
//!
//! One-shot, time-based callbacks polled once per tick.
//!
//! Each [`TriggerChannel`] holds at most one armed trigger. Arming a channel
//! that is already armed replaces the old deadline, so a channel can never
//! fire twice for one arming.

use log::trace;
use serde::{Deserialize, Serialize};

/// The independent deferred-trigger channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerChannel {
    /// The enemy's reply to a player attack is due
    EnemyTurn,
    /// The resolved battle should be closed
    BattleEnded,
}

impl TriggerChannel {
    /// All channels, in firing order.
    pub const ALL: [TriggerChannel; 2] = [TriggerChannel::EnemyTurn, TriggerChannel::BattleEnded];

    fn slot(self) -> usize {
        match self {
            TriggerChannel::EnemyTurn => 0,
            TriggerChannel::BattleEnded => 1,
        }
    }
}

/// Deadlines for every channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scheduler {
    deadlines: [Option<f64>; 2],
}

impl Scheduler {
    /// Creates a scheduler with every channel disarmed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms `channel` to fire `delay` seconds after `now`, replacing any pending deadline.
    pub fn arm(&mut self, channel: TriggerChannel, now: f64, delay: f64) {
        self.disarm(channel);
        trace!("Arming {:?} for t={:.2}", channel, now + delay);
        self.deadlines[channel.slot()] = Some(now + delay);
    }

    /// Cancels a pending trigger. Returns true if one was armed.
    pub fn disarm(&mut self, channel: TriggerChannel) -> bool {
        self.deadlines[channel.slot()].take().is_some()
    }

    /// Returns true if the channel has a pending deadline.
    pub fn is_armed(&self, channel: TriggerChannel) -> bool {
        self.deadlines[channel.slot()].is_some()
    }

    /// Deadline of a channel, if armed.
    pub fn deadline(&self, channel: TriggerChannel) -> Option<f64> {
        self.deadlines[channel.slot()]
    }

    /// Disarms and returns every channel whose deadline has passed.
    ///
    /// # Examples
    ///
    /// ```
    /// use redemu::{Scheduler, TriggerChannel};
    ///
    /// let mut scheduler = Scheduler::new();
    /// scheduler.arm(TriggerChannel::BattleEnded, 10.0, 2.0);
    ///
    /// assert!(scheduler.poll(11.9).is_empty());
    /// assert_eq!(scheduler.poll(12.0), vec![TriggerChannel::BattleEnded]);
    /// assert!(scheduler.poll(20.0).is_empty());
    /// ```
    pub fn poll(&mut self, now: f64) -> Vec<TriggerChannel> {
        let mut fired = Vec::new();
        for channel in TriggerChannel::ALL {
            let slot = &mut self.deadlines[channel.slot()];
            if matches!(*slot, Some(deadline) if now >= deadline) {
                *slot = None;
                fired.push(channel);
            }
        }
        fired
    }

    /// Disarms every channel.
    pub fn clear(&mut self) {
        self.deadlines = [None; 2];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rearming_replaces_deadline() {
        let mut scheduler = Scheduler::new();
        scheduler.arm(TriggerChannel::EnemyTurn, 0.0, 1.5);
        scheduler.arm(TriggerChannel::EnemyTurn, 1.0, 1.5);

        assert_eq!(scheduler.deadline(TriggerChannel::EnemyTurn), Some(2.5));
        assert!(scheduler.poll(2.0).is_empty());
        assert_eq!(scheduler.poll(2.5), vec![TriggerChannel::EnemyTurn]);
        assert!(scheduler.poll(5.0).is_empty());
    }

    #[test]
    fn test_channels_are_independent() {
        let mut scheduler = Scheduler::new();
        scheduler.arm(TriggerChannel::EnemyTurn, 0.0, 1.5);
        scheduler.arm(TriggerChannel::BattleEnded, 0.0, 2.0);

        assert_eq!(scheduler.poll(1.6), vec![TriggerChannel::EnemyTurn]);
        assert!(scheduler.is_armed(TriggerChannel::BattleEnded));
        assert_eq!(scheduler.poll(2.0), vec![TriggerChannel::BattleEnded]);
    }

    #[test]
    fn test_disarm_cancels() {
        let mut scheduler = Scheduler::new();
        scheduler.arm(TriggerChannel::BattleEnded, 0.0, 1.0);
        assert!(scheduler.disarm(TriggerChannel::BattleEnded));
        assert!(!scheduler.disarm(TriggerChannel::BattleEnded));
        assert!(scheduler.poll(10.0).is_empty());
    }

    #[test]
    fn test_both_due_fire_in_channel_order() {
        let mut scheduler = Scheduler::new();
        scheduler.arm(TriggerChannel::BattleEnded, 0.0, 1.0);
        scheduler.arm(TriggerChannel::EnemyTurn, 0.0, 1.0);
        assert_eq!(
            scheduler.poll(1.0),
            vec![TriggerChannel::EnemyTurn, TriggerChannel::BattleEnded]
        );
        scheduler.arm(TriggerChannel::EnemyTurn, 0.0, 1.0);
        scheduler.clear();
        assert!(!scheduler.is_armed(TriggerChannel::EnemyTurn));
    }
}
