//! Production Environment implementation using system time and OS entropy.
//!
//! Time is `std::time::Instant`, which advances naturally. Randomness comes
//! from getrandom and is only used to seed the session RNG when no `--seed`
//! is given, so an unseeded run is not reproducible.

use std::time::Instant;

use veil_core::Environment;

/// Production environment using the system clock and OS RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer).expect("invariant: OS RNG is available on supported platforms");
    }
}
