//! Simulation environment with a virtual clock and seeded RNG.
//!
//! `SimEnv` is the deterministic counterpart of the terminal's system
//! environment. Time only moves when a test (or the [`crate::SimDriver`])
//! advances it, and randomness comes from a `ChaCha8Rng` seeded up front, so
//! the same seed and the same inputs replay the same session.
//!
//! Clones share the clock and the RNG.

use std::{
    ops::Sub,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use veil_core::Environment;

/// Virtual instant: time since the simulation started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimInstant(pub Duration);

impl Sub for SimInstant {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        self.0.saturating_sub(rhs.0)
    }
}

/// Deterministic environment for simulation.
#[derive(Debug, Clone)]
pub struct SimEnv {
    clock: Arc<Mutex<Duration>>,
    rng: Arc<Mutex<ChaCha8Rng>>,
}

impl Default for SimEnv {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl SimEnv {
    /// Create an environment at time zero with an RNG seeded from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            clock: Arc::new(Mutex::new(Duration::ZERO)),
            rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
        }
    }

    /// Move the virtual clock forward.
    pub fn advance(&self, by: Duration) {
        let mut clock = self.clock.lock().unwrap_or_else(PoisonError::into_inner);
        *clock = clock.saturating_add(by);
    }

    /// Time since the simulation started.
    pub fn elapsed(&self) -> Duration {
        *self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Environment for SimEnv {
    type Instant = SimInstant;

    fn now(&self) -> SimInstant {
        SimInstant(self.elapsed())
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner).fill_bytes(buffer);
    }
}
