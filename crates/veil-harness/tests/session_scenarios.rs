//! End-to-end session scenarios through the generic runtime.
//!
//! # Test Strategy
//!
//! Each test scripts what a user does in the terminal (key presses, slash
//! commands, idle time) into a [`SimDriver`], then drives the same
//! [`Runtime`] the binary uses in virtual time. The standard invariant
//! registry is checked on every rendered frame.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks that verify:
//! - Conversations hold the expected messages in order
//! - Notifications and navigation reached the driver
//! - Presence timers are torn down with their view

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use veil_app::{
    AppEvent, ConfigError, ConversationId, KeyInput, PresenceConfig, Route, Runtime, Sender,
    SessionConfig, Severity, Timer, mock,
};
use veil_harness::{InvariantRegistry, SimDriver, SimEnv};

type SimRuntime = Runtime<SimDriver, SimEnv>;

/// Config with the ambient presence noise switched off.
fn quiet_config() -> SessionConfig {
    SessionConfig {
        presence: PresenceConfig {
            typing_toggle_period: None,
            offline_probability: 0.0,
            ..PresenceConfig::default()
        },
        ..SessionConfig::default()
    }
}

fn runtime(config: SessionConfig, seed: u64) -> (SimRuntime, SimEnv) {
    let env = SimEnv::with_seed(seed);
    let driver = SimDriver::new(env.clone()).with_invariants(InvariantRegistry::standard());
    (Runtime::new(driver, env.clone(), config, Some(seed)).unwrap(), env)
}

/// Step until the script is consumed. Returns `true` if the session quit.
async fn drain(runtime: &mut SimRuntime) -> bool {
    while runtime.driver().has_pending() {
        if runtime.step().await.unwrap() {
            return true;
        }
    }
    false
}

/// Step until the virtual clock reaches `deadline`.
async fn run_until(runtime: &mut SimRuntime, env: &SimEnv, deadline: Duration) {
    while env.elapsed() < deadline {
        assert!(!runtime.step().await.unwrap(), "session quit unexpectedly");
    }
}

fn messages(runtime: &SimRuntime, id: ConversationId) -> Vec<(Sender, String)> {
    runtime
        .app()
        .conversation(id)
        .map(|c| c.messages.iter().map(|m| (m.sender, m.content.clone())).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn typed_message_gets_scripted_reply() {
    let (mut runtime, env) = runtime(quiet_config(), 1);
    let fox = ConversationId(2);
    runtime.driver().inject_key(KeyInput::Down);
    runtime.driver().inject_key(KeyInput::Down);
    runtime.driver().inject_line("hi");

    assert!(!drain(&mut runtime).await);
    assert_eq!(runtime.app().active(), Some(fox));
    assert_eq!(messages(&runtime, fox).last(), Some(&(Sender::Me, "hi".to_string())));
    assert_eq!(runtime.app().draft(), "");

    let sent_at = env.elapsed();
    run_until(&mut runtime, &env, sent_at + Duration::from_millis(1100)).await;
    assert!(runtime.app().is_peer_typing());

    run_until(&mut runtime, &env, sent_at + Duration::from_millis(3100)).await;
    assert!(!runtime.app().is_peer_typing());
    assert_eq!(messages(&runtime, fox), vec![
        (Sender::Peer, "Did you see that news article?".to_string()),
        (Sender::Me, "hi".to_string()),
        (Sender::Peer, mock::REPLY_TEXT.to_string()),
    ]);
}

#[tokio::test]
async fn blank_line_sends_nothing() {
    let (mut runtime, env) = runtime(quiet_config(), 2);
    runtime.driver().inject_key(KeyInput::Tab);
    runtime.driver().inject_line("   ");

    drain(&mut runtime).await;
    run_until(&mut runtime, &env, Duration::from_secs(10)).await;

    assert_eq!(messages(&runtime, ConversationId(1)).len(), 7);
    assert_eq!(runtime.app().draft(), "   ");
}

#[tokio::test]
async fn new_chat_is_matched_and_welcomed() {
    let (mut runtime, env) = runtime(quiet_config(), 3);
    runtime.driver().inject_line("/new");
    runtime.driver().inject_line("/new");

    drain(&mut runtime).await;
    run_until(&mut runtime, &env, Duration::from_secs(4)).await;

    let matched = ConversationId(mock::FIRST_MATCHED_ID);
    let app = runtime.app();
    assert_eq!(app.active(), Some(matched));
    assert_eq!(app.conversations().len(), 4);
    assert_eq!(app.conversations()[0].name, mock::STRANGER_NAME);
    assert_eq!(messages(&runtime, matched), vec![(Sender::Peer, mock::WELCOME_TEXT.to_string())]);

    let titles: Vec<_> = runtime.driver().notifications().into_iter().map(|n| n.title).collect();
    assert_eq!(titles, vec!["New Chat".to_string()]);
}

#[tokio::test]
async fn switching_away_cancels_reply() {
    let (mut runtime, env) = runtime(quiet_config(), 4);
    runtime.driver().inject_key(KeyInput::Tab);
    runtime.driver().inject_line("are you there?");
    runtime.driver().inject_key(KeyInput::Tab);

    drain(&mut runtime).await;
    run_until(&mut runtime, &env, Duration::from_secs(20)).await;

    let lynx = messages(&runtime, ConversationId(1));
    assert_eq!(lynx.len(), 8);
    assert_eq!(lynx.last().map(|(s, _)| *s), Some(Sender::Me));
    assert_eq!(runtime.app().active(), Some(ConversationId(2)));
    assert!(!runtime.app().is_peer_typing());
}

#[tokio::test]
async fn connection_drop_blocks_sending_until_restored() {
    let config = SessionConfig {
        presence: PresenceConfig {
            typing_toggle_period: None,
            offline_probability: 1.0,
            ..PresenceConfig::default()
        },
        ..SessionConfig::default()
    };
    let (mut runtime, env) = runtime(config, 5);
    runtime.driver().inject_key(KeyInput::Tab);
    drain(&mut runtime).await;

    run_until(&mut runtime, &env, Duration::from_millis(30_050)).await;
    assert!(!runtime.app().is_online());

    runtime.driver().inject_line("hello?");
    drain(&mut runtime).await;
    assert_eq!(messages(&runtime, ConversationId(1)).len(), 7);

    run_until(&mut runtime, &env, Duration::from_millis(33_050)).await;
    assert!(runtime.app().is_online());

    let notes = runtime.driver().notifications();
    assert_eq!(notes.len(), 2);
    assert_eq!((notes[0].title.as_str(), notes[0].severity), ("Connection Lost", Severity::Destructive));
    assert_eq!((notes[1].title.as_str(), notes[1].description.as_str()), (
        "Connected",
        "You're back online!"
    ));
}

#[tokio::test]
async fn viewer_suspends_presence_until_back() {
    let (mut runtime, env) = runtime(SessionConfig::default(), 6);
    runtime.driver().inject_key(KeyInput::Tab);
    runtime.driver().inject_line("/view");
    drain(&mut runtime).await;

    let url = mock::PLACEHOLDER_IMAGE_URL.to_string();
    assert_eq!(runtime.app().route(), &Route::ImageViewer { url: url.clone() });
    assert_eq!(runtime.driver().routes(), vec![Route::ImageViewer { url }]);
    assert!(
        runtime
            .app()
            .timers()
            .iter()
            .all(|(_, t)| !matches!(t, Timer::TypingToggle | Timer::ConnectivityCheck))
    );

    run_until(&mut runtime, &env, Duration::from_secs(90)).await;
    assert!(runtime.driver().notifications().is_empty());

    runtime.driver().inject_key(KeyInput::Esc);
    drain(&mut runtime).await;
    assert_eq!(runtime.app().route(), &Route::Chat);
    assert!(runtime.app().presence().is_connectivity_armed());
    assert!(runtime.app().presence().is_typing_armed());
}

#[tokio::test]
async fn resize_is_tracked() {
    let (mut runtime, _env) = runtime(quiet_config(), 7);
    runtime.driver().inject_event(AppEvent::Resize(50, 20));

    drain(&mut runtime).await;

    assert_eq!(runtime.app().terminal_size(), (50, 20));
}

#[tokio::test]
async fn quit_command_ends_run_and_stops_driver() {
    let (runtime, _env) = runtime(quiet_config(), 8);
    runtime.driver().inject_key(KeyInput::Tab);
    runtime.driver().inject_line("bye");
    runtime.driver().inject_wait(Duration::from_secs(2));
    runtime.driver().inject_line("/quit");

    runtime.run().await.unwrap();
}

#[tokio::test]
async fn idle_script_surfaces_driver_error() {
    let env = SimEnv::with_seed(9);
    let driver = SimDriver::new(env.clone()).with_tick(Duration::from_secs(60));
    let runtime = Runtime::new(driver, env, quiet_config(), Some(9)).unwrap();

    assert!(runtime.run().await.is_err());
}

#[test]
fn invalid_config_is_rejected_before_start() {
    let env = SimEnv::with_seed(10);
    let driver = SimDriver::new(env.clone());
    let mut config = quiet_config();
    config.presence.offline_probability = 2.0;

    let result = Runtime::new(driver, env, config, Some(10));

    assert_eq!(result.err(), Some(ConfigError::InvalidProbability(2.0)));
}

#[tokio::test]
async fn same_seed_replays_same_session() {
    let config = SessionConfig {
        presence: PresenceConfig { offline_probability: 0.3, ..PresenceConfig::default() },
        ..SessionConfig::default()
    };

    let mut outcomes = Vec::new();
    for _ in 0..2 {
        let (mut runtime, env) = runtime(config.clone(), 42);
        runtime.driver().inject_key(KeyInput::Tab);
        drain(&mut runtime).await;
        run_until(&mut runtime, &env, Duration::from_secs(300)).await;
        outcomes.push((runtime.driver().notifications(), runtime.app().is_peer_typing()));
    }

    assert_eq!(outcomes[0], outcomes[1]);
}
