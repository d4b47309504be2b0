//! Session timing configuration.
//!
//! Every scripted delay of the simulated session lives here so the terminal
//! binary can override them from the command line and tests can shrink or
//! stretch them. Defaults reproduce the prototype's timings.

use std::time::Duration;

use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Probability outside `[0, 1]`.
    #[error("offline probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),

    /// A periodic timer with a zero period would never let the clock advance.
    #[error("{0} period must be non-zero")]
    ZeroPeriod(&'static str),
}

/// Presence simulator timings.
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceConfig {
    /// Period of the ambient typing toggle. `None` disables it.
    pub typing_toggle_period: Option<Duration>,
    /// Period of the simulated connectivity check.
    pub connectivity_check_period: Duration,
    /// Chance that a connectivity check drops the connection.
    pub offline_probability: f64,
    /// Time until a dropped connection is restored.
    pub reconnect_delay: Duration,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            typing_toggle_period: Some(Duration::from_secs(5)),
            connectivity_check_period: Duration::from_secs(30),
            offline_probability: 0.05,
            reconnect_delay: Duration::from_secs(3),
        }
    }
}

/// Conversation controller timings.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Delay before a new chat partner is "found".
    pub matchmaking_delay: Duration,
    /// Delay between matching and the welcome message.
    pub welcome_delay: Duration,
    /// Delay between sending and the peer starting to type.
    pub typing_delay: Duration,
    /// Delay between the peer starting to type and the reply.
    pub reply_delay: Duration,
    /// How long a notification stays visible.
    pub notification_ttl: Duration,
    /// Presence simulator timings.
    pub presence: PresenceConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            matchmaking_delay: Duration::from_secs(2),
            welcome_delay: Duration::from_secs(1),
            typing_delay: Duration::from_secs(1),
            reply_delay: Duration::from_secs(2),
            notification_ttl: Duration::from_secs(5),
            presence: PresenceConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Check the configuration for values the session cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let presence = &self.presence;
        if !(0.0..=1.0).contains(&presence.offline_probability) {
            return Err(ConfigError::InvalidProbability(presence.offline_probability));
        }
        if presence.connectivity_check_period.is_zero() {
            return Err(ConfigError::ZeroPeriod("connectivity check"));
        }
        if presence.typing_toggle_period.is_some_and(|p| p.is_zero()) {
            return Err(ConfigError::ZeroPeriod("typing toggle"));
        }
        Ok(())
    }

    /// Total scripted time from send to reply.
    pub fn reply_latency(&self) -> Duration {
        self.typing_delay.saturating_add(self.reply_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SessionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_probability() {
        let mut config = SessionConfig::default();
        config.presence.offline_probability = 1.5;
        assert_eq!(config.validate(), Err(ConfigError::InvalidProbability(1.5)));

        config.presence.offline_probability = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_periods() {
        let mut config = SessionConfig::default();
        config.presence.typing_toggle_period = Some(Duration::ZERO);
        assert_eq!(config.validate(), Err(ConfigError::ZeroPeriod("typing toggle")));

        let mut config = SessionConfig::default();
        config.presence.connectivity_check_period = Duration::ZERO;
        assert_eq!(config.validate(), Err(ConfigError::ZeroPeriod("connectivity check")));
    }

    #[test]
    fn reply_latency_sums_delays() {
        assert_eq!(SessionConfig::default().reply_latency(), Duration::from_secs(3));
    }
}
