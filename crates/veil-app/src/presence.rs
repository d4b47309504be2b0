//! Presence simulator.
//!
//! Fabricates the two background signals of the chat screen: an ambient
//! "peer is typing" toggle and random connectivity drops. Both run on
//! periodic timers in the session [`TimerQueue`] and are armed only while the
//! chat screen is displayed. The simulator owns the timer handles and the
//! seeded RNG; the session flags themselves live in [`crate::App`].

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use veil_core::{TimerId, TimerQueue};

use crate::{PresenceConfig, timers::Timer};

/// Periodic typing/connectivity simulator.
#[derive(Debug, Clone)]
pub struct PresenceSimulator {
    config: PresenceConfig,
    rng: ChaCha8Rng,
    typing_timer: Option<TimerId>,
    connectivity_timer: Option<TimerId>,
}

impl PresenceSimulator {
    /// Create a disarmed simulator drawing from an RNG seeded with `seed`.
    pub fn new(config: PresenceConfig, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            typing_timer: None,
            connectivity_timer: None,
        }
    }

    /// Arm the typing toggle. No-op if already armed or disabled.
    pub fn arm_typing(&mut self, timers: &mut TimerQueue<Timer>, now: Duration) {
        if self.typing_timer.is_some() {
            return;
        }
        if let Some(period) = self.config.typing_toggle_period {
            self.typing_timer = Some(timers.schedule_after(now, period, Timer::TypingToggle));
        }
    }

    /// Disarm the typing toggle.
    pub fn disarm_typing(&mut self, timers: &mut TimerQueue<Timer>) {
        if let Some(id) = self.typing_timer.take() {
            timers.cancel(id);
        }
    }

    /// Arm the connectivity check. No-op if already armed.
    pub fn arm_connectivity(&mut self, timers: &mut TimerQueue<Timer>, now: Duration) {
        if self.connectivity_timer.is_none() {
            let period = self.config.connectivity_check_period;
            self.connectivity_timer =
                Some(timers.schedule_after(now, period, Timer::ConnectivityCheck));
        }
    }

    /// Disarm both periodic timers.
    ///
    /// A pending reconnect is not touched; a dropped connection is always
    /// restored.
    pub fn disarm(&mut self, timers: &mut TimerQueue<Timer>) {
        self.disarm_typing(timers);
        if let Some(id) = self.connectivity_timer.take() {
            timers.cancel(id);
        }
    }

    /// Typing toggle fired at `at`. Re-arms the next period.
    pub fn on_typing_toggle(&mut self, timers: &mut TimerQueue<Timer>, at: Duration) {
        self.typing_timer = None;
        self.arm_typing(timers, at);
    }

    /// Connectivity check fired at `at`. Re-arms the next period and rolls
    /// for a drop.
    ///
    /// Returns `true` if the connection should drop.
    pub fn on_connectivity_check(&mut self, timers: &mut TimerQueue<Timer>, at: Duration) -> bool {
        self.connectivity_timer = None;
        self.arm_connectivity(timers, at);
        self.rng.gen_bool(self.config.offline_probability)
    }

    /// Time a dropped connection stays down.
    pub fn reconnect_delay(&self) -> Duration {
        self.config.reconnect_delay
    }

    /// Whether the typing toggle is armed.
    pub fn is_typing_armed(&self) -> bool {
        self.typing_timer.is_some()
    }

    /// Whether the connectivity check is armed.
    pub fn is_connectivity_armed(&self) -> bool {
        self.connectivity_timer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn arming_is_idempotent() {
        let mut timers = TimerQueue::new();
        let mut presence = PresenceSimulator::new(PresenceConfig::default(), 7);

        presence.arm_typing(&mut timers, Duration::ZERO);
        presence.arm_typing(&mut timers, secs(1));
        presence.arm_connectivity(&mut timers, Duration::ZERO);
        presence.arm_connectivity(&mut timers, secs(1));

        assert_eq!(timers.len(), 2);
        assert_eq!(timers.next_deadline(), Some(secs(5)));
    }

    #[test]
    fn disarm_cancels_periodic_timers() {
        let mut timers = TimerQueue::new();
        let mut presence = PresenceSimulator::new(PresenceConfig::default(), 7);
        presence.arm_typing(&mut timers, Duration::ZERO);
        presence.arm_connectivity(&mut timers, Duration::ZERO);
        timers.schedule(secs(3), Timer::Reconnect);

        presence.disarm(&mut timers);

        assert!(!presence.is_typing_armed());
        assert!(!presence.is_connectivity_armed());
        let left: Vec<_> = timers.iter().map(|(_, t)| *t).collect();
        assert_eq!(left, vec![Timer::Reconnect]);
    }

    #[test]
    fn disabled_typing_toggle_never_arms() {
        let mut timers = TimerQueue::new();
        let config = PresenceConfig { typing_toggle_period: None, ..PresenceConfig::default() };
        let mut presence = PresenceSimulator::new(config, 7);

        presence.arm_typing(&mut timers, Duration::ZERO);

        assert!(!presence.is_typing_armed());
        assert!(timers.is_empty());
    }

    #[test]
    fn connectivity_check_rearms_from_fire_time() {
        let mut timers = TimerQueue::new();
        let mut presence = PresenceSimulator::new(PresenceConfig::default(), 7);
        presence.arm_connectivity(&mut timers, Duration::ZERO);

        let fired = timers.pop_due(secs(30));
        assert_eq!(fired.map(|f| f.payload), Some(Timer::ConnectivityCheck));
        let _ = presence.on_connectivity_check(&mut timers, secs(30));

        assert!(presence.is_connectivity_armed());
        assert_eq!(timers.next_deadline(), Some(secs(60)));
    }

    #[test]
    fn certain_drop_always_triggers() {
        let mut timers = TimerQueue::new();
        let config = PresenceConfig { offline_probability: 1.0, ..PresenceConfig::default() };
        let mut presence = PresenceSimulator::new(config, 7);

        assert!(presence.on_connectivity_check(&mut timers, secs(30)));
    }

    #[test]
    fn same_seed_same_rolls() {
        let config = PresenceConfig { offline_probability: 0.5, ..PresenceConfig::default() };
        let mut a = PresenceSimulator::new(config.clone(), 42);
        let mut b = PresenceSimulator::new(config, 42);
        let mut ta = TimerQueue::new();
        let mut tb = TimerQueue::new();

        let rolls_a: Vec<_> = (0..32).map(|i| a.on_connectivity_check(&mut ta, secs(i))).collect();
        let rolls_b: Vec<_> = (0..32).map(|i| b.on_connectivity_check(&mut tb, secs(i))).collect();

        assert_eq!(rolls_a, rolls_b);
    }
}
