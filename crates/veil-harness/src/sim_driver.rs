//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the terminal driver but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`veil_app::Runtime`] orchestration code runs in both production and
//! simulation.
//!
//! Every poll advances the shared [`SimEnv`] clock by one tick, the way the
//! terminal driver wakes up on its tick interval when no key is pressed.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use thiserror::Error;
use veil_app::{App, AppEvent, Driver, KeyInput, Notification, Route};

use crate::{
    SimEnv,
    invariants::{InvariantRegistry, SessionSnapshot, SystemSnapshot},
};

/// Tick interval of the simulated frontend.
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// Polls with an empty queue before the driver gives up.
const MAX_IDLE_POLLS: u32 = 100_000;

/// Error type for simulation driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimDriverError {
    /// The script ran dry without the session quitting.
    #[error("no scripted input left after {0} idle polls")]
    Exhausted(u32),
}

/// Scripted driver input.
#[derive(Debug, Clone)]
enum Input {
    Event(AppEvent),
    Wait(Duration),
}

/// Shared state for event injection and output capture.
///
/// This allows injection from outside async contexts while the runtime owns
/// the driver.
#[derive(Debug, Default)]
struct SharedState {
    script: VecDeque<Input>,
    renders: usize,
    notifications: Vec<Notification>,
    routes: Vec<Route>,
    stopped: bool,
    idle_polls: u32,
}

/// Simulation driver for deterministic testing.
///
/// Implements [`Driver`] trait so the same [`veil_app::Runtime`]
/// orchestration code runs in both production TUI and simulation tests.
#[derive(Debug)]
pub struct SimDriver {
    env: SimEnv,
    tick: Duration,
    state: Arc<Mutex<SharedState>>,
    invariants: Option<InvariantRegistry>,
    history: SystemSnapshot,
}

impl SimDriver {
    /// Create a driver advancing `env` by [`DEFAULT_TICK`] per poll.
    pub fn new(env: SimEnv) -> Self {
        Self {
            env,
            tick: DEFAULT_TICK,
            state: Arc::new(Mutex::new(SharedState::default())),
            invariants: None,
            history: SystemSnapshot::empty(),
        }
    }

    /// Enable invariant checking on every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(registry);
        self
    }

    /// Override the per-poll clock advance.
    #[must_use]
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    fn state(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inject an `AppEvent` for processing.
    pub fn inject_event(&self, event: AppEvent) {
        self.state().script.push_back(Input::Event(event));
    }

    /// Inject a key press.
    pub fn inject_key(&self, key: KeyInput) {
        self.inject_event(AppEvent::Key(key));
    }

    /// Inject typed text followed by Enter.
    pub fn inject_line(&self, text: &str) {
        let mut state = self.state();
        state.script.extend(text.chars().map(|c| Input::Event(AppEvent::Key(KeyInput::Char(c)))));
        state.script.push_back(Input::Event(AppEvent::Key(KeyInput::Enter)));
    }

    /// Let `duration` of virtual time pass with no input.
    pub fn inject_wait(&self, duration: Duration) {
        self.state().script.push_back(Input::Wait(duration));
    }

    /// Check if there is scripted input left.
    pub fn has_pending(&self) -> bool {
        !self.state().script.is_empty()
    }

    /// Number of frames rendered.
    pub fn render_count(&self) -> usize {
        self.state().renders
    }

    /// Notifications surfaced so far, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.state().notifications.clone()
    }

    /// Routes navigated to so far, oldest first.
    pub fn routes(&self) -> Vec<Route> {
        self.state().routes.clone()
    }

    /// Whether the runtime released the driver.
    pub fn is_stopped(&self) -> bool {
        self.state().stopped
    }

    /// Recorded snapshot history. Empty unless invariants are enabled.
    pub fn history(&self) -> &SystemSnapshot {
        &self.history
    }

    /// Record App state and check invariants against the history.
    pub fn check_invariants(&mut self, app: &App, context: &str) {
        if let Some(ref registry) = self.invariants {
            self.history.record(SessionSnapshot::from_app(app));
            registry.assert_all(&self.history, context);
        }
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        let input = {
            let mut state = self.state();
            let input = state.script.pop_front();
            if input.is_some() {
                state.idle_polls = 0;
            } else {
                state.idle_polls = state.idle_polls.saturating_add(1);
                if state.idle_polls > MAX_IDLE_POLLS {
                    return Err(SimDriverError::Exhausted(MAX_IDLE_POLLS));
                }
            }
            input
        };

        match input {
            Some(Input::Event(event)) => {
                self.env.advance(self.tick);
                Ok(Some(event))
            },
            Some(Input::Wait(duration)) => {
                self.env.advance(duration);
                Ok(None)
            },
            None => {
                self.env.advance(self.tick);
                Ok(None)
            },
        }
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.state().renders += 1;
        let context = format!("at {:?}", app.now());
        self.check_invariants(app, &context);
        Ok(())
    }

    fn notify(&mut self, notification: &Notification) -> Result<(), Self::Error> {
        self.state().notifications.push(notification.clone());
        Ok(())
    }

    fn navigate(&mut self, route: &Route) -> Result<(), Self::Error> {
        self.state().routes.push(route.clone());
        Ok(())
    }

    fn stop(&mut self) {
        self.state().stopped = true;
    }
}
