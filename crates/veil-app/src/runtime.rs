//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: session state machine
//! - [`Driver`]: platform-specific I/O
//! - [`Environment`]: clock and entropy

use std::time::Duration;

use veil_core::Environment;

use crate::{App, AppAction, AppEvent, ConfigError, Driver, SessionConfig};

/// Generic runtime that orchestrates App and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment providing the session clock and RNG seed
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    env: E,
    app: App,
    epoch: E::Instant,
}

impl<D, E> Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    /// Create a new runtime.
    ///
    /// The session clock starts now. Without an explicit `seed` the presence
    /// RNG is seeded from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn new(
        driver: D,
        env: E,
        config: SessionConfig,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let seed = seed.unwrap_or_else(|| env.random_u64());
        tracing::debug!(seed, "starting session");

        let app = App::new(config, seed)?;
        let epoch = env.now();
        Ok(Self { driver, env, app, epoch })
    }

    /// Run the main event loop.
    ///
    /// This is the core orchestration loop that:
    /// 1. Polls for input events from the driver
    /// 2. Advances the session clock, firing due timers
    /// 3. Feeds the event to the App
    /// 4. Executes the resulting actions through the driver
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        let result = self.run_loop().await;

        self.app.shutdown();
        self.driver.stop();
        result
    }

    async fn run_loop(&mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;

        loop {
            let should_quit = self.step().await?;
            if should_quit {
                return Ok(());
            }
        }
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn step(&mut self) -> Result<bool, D::Error> {
        let event = self.driver.poll_event().await?;

        // Catch the clock up first so the event sees the current time.
        let actions = self.app.handle(AppEvent::Tick { now: self.elapsed() });
        if self.process_actions(actions)? {
            return Ok(true);
        }

        match event {
            Some(event) => {
                let actions = self.app.handle(event);
                self.process_actions(actions)
            },
            None => Ok(false),
        }
    }

    /// Execute actions returned by the App.
    ///
    /// Returns `true` if should quit.
    fn process_actions(&mut self, actions: Vec<AppAction>) -> Result<bool, D::Error> {
        for action in actions {
            match action {
                AppAction::Render => self.driver.render(&self.app)?,
                AppAction::Quit => return Ok(true),
                AppAction::Notify(notification) => {
                    tracing::info!(title = %notification.title, "notification");
                    self.driver.notify(&notification)?;
                },
                AppAction::Navigate(route) => {
                    tracing::debug!(?route, "navigate");
                    self.driver.navigate(&route)?;
                },
            }
        }
        Ok(false)
    }

    /// Time since the session started.
    fn elapsed(&self) -> Duration {
        self.env.now() - self.epoch
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }
}
