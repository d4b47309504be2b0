//! Conversation controller.
//!
//! This module defines the [`App`] state machine, which owns the whole chat
//! session completely decoupled from I/O and wall-clock time.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//! Every delayed behavior (peer replies, matchmaking, presence) is a
//! [`Timer`] in the session queue, fired by [`AppEvent::Tick`].
//!
//! # Responsibilities
//!
//! - Tracks the conversation list, unread badges, and the active
//!   conversation.
//! - Owns the composer draft and the offline gate on sending.
//! - Schedules the scripted typing-then-reply sequence and the new-chat
//!   matchmaking sequence.
//! - Drives the [`PresenceSimulator`] and arms it only while the chat screen
//!   is displayed.
//!
//! # Send state machine
//!
//! `Idle -> Sent(local) -> PeerTyping -> Idle(reply appended)`. The two
//! delayed transitions are bound to the conversation they were issued for
//! and are cancelled when the user switches away from it.

use std::time::Duration;

use veil_core::{ConversationId, Fired, MessageId, TimerId, TimerQueue};

use crate::{
    AppAction, AppEvent, Attachment, AttachmentKind, ConfigError, Conversation, KeyInput, Message,
    Notification, PresenceSimulator, Route, Sender, SessionConfig,
    commands::{self, Command},
    mock,
    state::JUST_NOW,
    timers::Timer,
};

/// Conversation controller.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Scripted delays.
    config: SessionConfig,
    /// Conversations in list order (newest match first).
    conversations: Vec<Conversation>,
    /// Currently open conversation. `None` shows the welcome screen.
    active: Option<ConversationId>,
    /// Composer text.
    draft: String,
    /// Composer cursor, in characters.
    cursor: usize,
    /// Peer typing indicator.
    peer_typing: bool,
    /// Simulated connectivity. Sending is refused while `false`.
    online: bool,
    /// Chat list overlay for narrow layouts.
    sidebar_open: bool,
    /// Screen currently displayed.
    route: Route,
    /// Visible notification. `None` if nothing to show.
    notification: Option<Notification>,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    /// Session clock, advanced by ticks.
    now: Duration,
    /// Pending delayed callbacks.
    timers: TimerQueue<Timer>,
    /// Background typing/connectivity simulation.
    presence: PresenceSimulator,
    /// Pending matchmaking. `None` if no new chat was requested.
    matching: Option<TimerId>,
    /// Pending notification dismissal.
    dismiss_timer: Option<TimerId>,
    next_message_id: u64,
    next_conversation_id: u64,
}

impl App {
    /// Create a session with the built-in demo conversations.
    ///
    /// `seed` feeds the presence simulator's RNG. The clock starts at zero
    /// and the connectivity check is armed immediately.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn new(config: SessionConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut next_message_id = 1;
        let conversations = mock::seed_conversations(&mut next_message_id);
        let presence = PresenceSimulator::new(config.presence.clone(), seed);

        let mut app = Self {
            config,
            conversations,
            active: None,
            draft: String::new(),
            cursor: 0,
            peer_typing: false,
            online: true,
            sidebar_open: false,
            route: Route::Chat,
            notification: None,
            terminal_size: (80, 24),
            now: Duration::ZERO,
            timers: TimerQueue::new(),
            presence,
            matching: None,
            dismiss_timer: None,
            next_message_id,
            next_conversation_id: mock::FIRST_MATCHED_ID,
        };
        app.arm_presence();
        Ok(app)
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick { now } => self.advance(now),
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
        }
    }

    /// Open a conversation.
    ///
    /// Closes the chat list overlay and clears the unread badge. Pending
    /// reply timers of the previously active conversation are cancelled.
    /// Unknown ids are ignored.
    pub fn select_conversation(&mut self, id: ConversationId) -> Vec<AppAction> {
        if self.conversation(id).is_none() {
            tracing::debug!(%id, "ignoring selection of unknown conversation");
            return vec![];
        }

        self.sidebar_open = false;
        self.activate(id);
        vec![AppAction::Render]
    }

    /// Request a new anonymous chat partner.
    ///
    /// After the matchmaking delay a new conversation is opened; after the
    /// welcome delay it receives exactly one welcome message. Ignored while
    /// a match is already pending.
    pub fn start_new_conversation(&mut self) -> Vec<AppAction> {
        if self.matching.is_some() {
            return vec![];
        }

        self.sidebar_open = false;
        self.matching = Some(self.timers.schedule_after(
            self.now,
            self.config.matchmaking_delay,
            Timer::PartnerFound,
        ));
        tracing::debug!("matchmaking started");

        let note = Notification::info("New Chat", "Starting a new anonymous chat...");
        vec![self.notify(note), AppAction::Render]
    }

    /// Send `text` to the active conversation.
    ///
    /// No-op for blank text, while offline, or without an active
    /// conversation. Otherwise the message is appended immediately, the
    /// draft is cleared, and the scripted peer reply is scheduled.
    pub fn send_message(&mut self, text: &str) -> Vec<AppAction> {
        if text.trim().is_empty() || !self.online {
            return vec![];
        }
        let Some(conversation) = self.active else {
            return vec![];
        };

        let message = self.new_message(Sender::Me, text);
        self.append(conversation, message);
        self.draft.clear();
        self.cursor = 0;

        self.timers.schedule_after(self.now, self.config.typing_delay, Timer::PeerTyping {
            conversation,
        });
        tracing::debug!(%conversation, "message sent");

        vec![AppAction::Render]
    }

    /// Open an attachment in its viewer.
    ///
    /// Pure navigation; conversations are not touched.
    pub fn open_attachment(&mut self, attachment: &Attachment) -> Vec<AppAction> {
        self.navigate(Route::for_attachment(attachment))
    }

    /// Open the composer attachment picker for `kind`.
    ///
    /// There is no media library; the picker shows placeholder media.
    pub fn attach(&mut self, kind: AttachmentKind) -> Vec<AppAction> {
        let attachment = match kind {
            AttachmentKind::Image => Attachment::image(mock::PLACEHOLDER_IMAGE_URL),
            AttachmentKind::Voice => Attachment::voice(mock::SAMPLE_VOICE_URL),
        };
        self.open_attachment(&attachment)
    }

    /// Open the settings screen.
    pub fn open_settings(&mut self) -> Vec<AppAction> {
        self.navigate(Route::Settings)
    }

    /// Return from a viewer or settings to the chat screen.
    pub fn go_back(&mut self) -> Vec<AppAction> {
        if self.route == Route::Chat {
            return vec![];
        }
        self.route = Route::Chat;
        self.arm_presence();
        vec![AppAction::Navigate(Route::Chat), AppAction::Render]
    }

    /// Close the active conversation and show the welcome screen.
    pub fn leave_conversation(&mut self) -> Vec<AppAction> {
        if let Some(previous) = self.active.take() {
            self.cancel_bound_timers(previous);
        }
        self.peer_typing = false;
        self.presence.disarm_typing(&mut self.timers);
        vec![AppAction::Render]
    }

    /// Toggle the chat list overlay.
    pub fn toggle_sidebar(&mut self) -> Vec<AppAction> {
        self.sidebar_open = !self.sidebar_open;
        vec![AppAction::Render]
    }

    /// Tear down the session and quit.
    ///
    /// Every pending timer is dropped; nothing fires after this.
    pub fn quit(&mut self) -> Vec<AppAction> {
        self.shutdown();
        vec![AppAction::Quit]
    }

    /// Drop every pending timer.
    pub fn shutdown(&mut self) {
        self.presence.disarm(&mut self.timers);
        self.timers.clear();
        self.matching = None;
        self.dismiss_timer = None;
    }

    /// Set the composer text and move the cursor to its end.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
        self.cursor = self.draft.chars().count();
    }

    /// Advance the session clock to `now`, firing every due timer in order.
    fn advance(&mut self, now: Duration) -> Vec<AppAction> {
        self.now = self.now.max(now);

        let mut actions = Vec::new();
        while let Some(fired) = self.timers.pop_due(self.now) {
            actions.extend(self.fire(fired));
        }

        if !actions.is_empty() {
            actions.push(AppAction::Render);
        }
        actions
    }

    /// Apply the effect of a fired timer.
    ///
    /// Follow-up timers are scheduled relative to the fire time so a tick
    /// that skips ahead still replays the script in order.
    fn fire(&mut self, fired: Fired<Timer>) -> Vec<AppAction> {
        let Fired { id, at, payload } = fired;

        if let Some(conversation) = payload.conversation()
            && self.active != Some(conversation)
        {
            tracing::debug!(%conversation, ?payload, "discarding timer for inactive conversation");
            return vec![];
        }

        match payload {
            Timer::PartnerFound => {
                if self.matching == Some(id) {
                    self.matching = None;
                }
                let conversation = self.create_matched_conversation();
                self.activate(conversation);
                self.timers.schedule_after(at, self.config.welcome_delay, Timer::Welcome {
                    conversation,
                });
                tracing::info!(%conversation, "matched with a new partner");
                vec![]
            },
            Timer::Welcome { conversation } => {
                let message = self.new_message(Sender::Peer, mock::WELCOME_TEXT);
                self.append(conversation, message);
                vec![]
            },
            Timer::PeerTyping { conversation } => {
                self.peer_typing = true;
                self.timers.schedule_after(at, self.config.reply_delay, Timer::PeerReply {
                    conversation,
                });
                vec![]
            },
            Timer::PeerReply { conversation } => {
                let message = self.new_message(Sender::Peer, mock::REPLY_TEXT);
                self.append(conversation, message);
                self.peer_typing = self.reply_in_flight(conversation);
                vec![]
            },
            Timer::TypingToggle => {
                self.presence.on_typing_toggle(&mut self.timers, at);
                let replying = self.active.is_some_and(|c| self.reply_in_flight(c));
                if self.active.is_some() && !replying {
                    self.peer_typing = !self.peer_typing;
                }
                vec![]
            },
            Timer::ConnectivityCheck => {
                let dropped = self.presence.on_connectivity_check(&mut self.timers, at);
                if !dropped || !self.online {
                    return vec![];
                }

                self.online = false;
                self.timers.schedule_after(at, self.presence.reconnect_delay(), Timer::Reconnect);
                tracing::info!("simulated connection loss");
                let note = Notification::destructive(
                    "Connection Lost",
                    "We're having trouble connecting to the server. Reconnecting...",
                );
                vec![self.notify_at(note, at)]
            },
            Timer::Reconnect => {
                self.online = true;
                tracing::info!("simulated connection restored");
                let note = Notification::info("Connected", "You're back online!");
                vec![self.notify_at(note, at)]
            },
            Timer::DismissNotification => {
                if self.dismiss_timer == Some(id) {
                    self.dismiss_timer = None;
                    self.notification = None;
                }
                vec![]
            },
        }
    }

    /// Handle keyboard input.
    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        if self.route != Route::Chat {
            return match key {
                KeyInput::Esc | KeyInput::Backspace => self.go_back(),
                _ => vec![],
            };
        }

        match key {
            KeyInput::Char(c) => {
                if !self.online {
                    return vec![];
                }
                let at = self.byte_offset(self.cursor);
                self.draft.insert(at, c);
                self.cursor = self.cursor.saturating_add(1);
                vec![AppAction::Render]
            },
            KeyInput::Backspace => {
                if !self.online || self.cursor == 0 {
                    return vec![];
                }
                self.cursor = self.cursor.saturating_sub(1);
                let at = self.byte_offset(self.cursor);
                self.draft.remove(at);
                vec![AppAction::Render]
            },
            KeyInput::Delete => {
                if !self.online || self.cursor >= self.draft.chars().count() {
                    return vec![];
                }
                let at = self.byte_offset(self.cursor);
                self.draft.remove(at);
                vec![AppAction::Render]
            },
            KeyInput::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                vec![AppAction::Render]
            },
            KeyInput::Right => {
                self.cursor = self.cursor.saturating_add(1).min(self.draft.chars().count());
                vec![AppAction::Render]
            },
            KeyInput::Home => {
                self.cursor = 0;
                vec![AppAction::Render]
            },
            KeyInput::End => {
                self.cursor = self.draft.chars().count();
                vec![AppAction::Render]
            },
            KeyInput::Enter => self.submit(),
            KeyInput::Tab | KeyInput::Down => self.cycle_conversation(true),
            KeyInput::Up => self.cycle_conversation(false),
            KeyInput::Esc => {
                if self.sidebar_open {
                    self.toggle_sidebar()
                } else {
                    self.quit()
                }
            },
        }
    }

    /// Handle Enter: run a command or send the draft.
    fn submit(&mut self) -> Vec<AppAction> {
        let Some(command) = commands::parse(&self.draft) else {
            let text = self.draft.clone();
            return self.send_message(&text);
        };

        self.draft.clear();
        self.cursor = 0;

        match command {
            Command::NewChat => self.start_new_conversation(),
            Command::Leave => self.leave_conversation(),
            Command::Attach(kind) => self.attach(kind),
            Command::ViewAttachment => {
                let latest = self.active_conversation().and_then(Conversation::latest_attachment);
                match latest.cloned() {
                    Some(attachment) => self.open_attachment(&attachment),
                    None => {
                        let note = Notification::info("Nothing to view", "No attachments here yet");
                        vec![self.notify(note), AppAction::Render]
                    },
                }
            },
            Command::Settings => self.open_settings(),
            Command::ToggleChats => self.toggle_sidebar(),
            Command::Quit => self.quit(),
            Command::Unknown { input } => {
                let note = Notification::destructive("Unknown command", format!("/{input}"));
                vec![self.notify(note), AppAction::Render]
            },
        }
    }

    /// Move the selection to the next or previous conversation, wrapping.
    fn cycle_conversation(&mut self, forward: bool) -> Vec<AppAction> {
        let len = self.conversations.len();
        if len == 0 {
            return vec![];
        }

        let current = self.active.and_then(|id| self.position(id));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => len.saturating_sub(1),
            (Some(idx), true) => idx.saturating_add(1) % len,
            (Some(idx), false) => idx.checked_sub(1).unwrap_or(len.saturating_sub(1)),
        };

        match self.conversations.get(next).map(|c| c.id) {
            Some(id) => self.select_conversation(id),
            None => vec![],
        }
    }

    /// Make `id` the active conversation.
    fn activate(&mut self, id: ConversationId) {
        if let Some(previous) = self.active
            && previous != id
        {
            self.cancel_bound_timers(previous);
            self.peer_typing = false;
        }

        self.active = Some(id);
        if let Some(conversation) = self.conversation_mut(id) {
            conversation.unread = 0;
        }
        if self.route == Route::Chat {
            self.presence.arm_typing(&mut self.timers, self.now);
        }
    }

    /// Cancel typing and reply timers issued for `conversation`.
    fn cancel_bound_timers(&mut self, conversation: ConversationId) {
        let cancelled = self.timers.cancel_where(|t| t.conversation() == Some(conversation));
        if cancelled > 0 {
            tracing::debug!(%conversation, cancelled, "cancelled pending conversation timers");
        }
    }

    /// Switch screens, tearing down the chat view's presence timers.
    fn navigate(&mut self, route: Route) -> Vec<AppAction> {
        if route == Route::Chat {
            return self.go_back();
        }

        self.presence.disarm(&mut self.timers);
        self.route = route.clone();
        vec![AppAction::Navigate(route), AppAction::Render]
    }

    /// Arm presence timers for the chat view.
    fn arm_presence(&mut self) {
        self.presence.arm_connectivity(&mut self.timers, self.now);
        if self.active.is_some() {
            self.presence.arm_typing(&mut self.timers, self.now);
        }
    }

    /// Show a notification now.
    fn notify(&mut self, note: Notification) -> AppAction {
        self.notify_at(note, self.now)
    }

    /// Show a notification raised at `at` and schedule its dismissal.
    fn notify_at(&mut self, note: Notification, at: Duration) -> AppAction {
        if let Some(previous) = self.dismiss_timer.take() {
            self.timers.cancel(previous);
        }
        self.dismiss_timer = Some(self.timers.schedule_after(
            at,
            self.config.notification_ttl,
            Timer::DismissNotification,
        ));
        self.notification = Some(note.clone());
        AppAction::Notify(note)
    }

    fn create_matched_conversation(&mut self) -> ConversationId {
        let id = ConversationId(self.next_conversation_id);
        self.next_conversation_id = self.next_conversation_id.saturating_add(1);

        let mut conversation = Conversation::new(id, mock::STRANGER_NAME);
        conversation.last_message = mock::WAITING_PREVIEW.to_string();
        self.conversations.insert(0, conversation);
        id
    }

    fn new_message(&mut self, sender: Sender, content: &str) -> Message {
        let id = MessageId(self.next_message_id);
        self.next_message_id = self.next_message_id.saturating_add(1);
        Message {
            id,
            content: content.to_string(),
            sender,
            timestamp: JUST_NOW.to_string(),
            attachment: None,
        }
    }

    fn append(&mut self, id: ConversationId, message: Message) {
        let is_active = self.active == Some(id);
        if let Some(conversation) = self.conversation_mut(id) {
            if !is_active {
                conversation.unread = conversation.unread.saturating_add(1);
            }
            conversation.push(message);
        }
    }

    fn reply_in_flight(&self, conversation: ConversationId) -> bool {
        self.timers.iter().any(|(_, t)| t.is_reply_for(conversation))
    }

    fn byte_offset(&self, cursor: usize) -> usize {
        self.draft.char_indices().nth(cursor).map_or(self.draft.len(), |(i, _)| i)
    }

    fn position(&self, id: ConversationId) -> Option<usize> {
        self.conversations.iter().position(|c| c.id == id)
    }

    fn conversation_mut(&mut self, id: ConversationId) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| c.id == id)
    }

    /// Look up a conversation.
    pub fn conversation(&self, id: ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    /// All conversations in list order.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Active conversation id. `None` on the welcome screen.
    pub fn active(&self) -> Option<ConversationId> {
        self.active
    }

    /// Active conversation. `None` on the welcome screen.
    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.active.and_then(|id| self.conversation(id))
    }

    /// Composer text.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Composer cursor, in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the send button would be enabled.
    pub fn can_send(&self) -> bool {
        self.online && self.active.is_some() && !self.draft.trim().is_empty()
    }

    /// Whether the peer typing indicator is shown.
    pub fn is_peer_typing(&self) -> bool {
        self.peer_typing
    }

    /// Simulated connectivity.
    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Whether a new chat partner is being searched for.
    pub fn is_matching(&self) -> bool {
        self.matching.is_some()
    }

    /// Whether the chat list overlay is open.
    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    /// Screen currently displayed.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Visible notification. `None` if nothing to show.
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Session clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Pending timers.
    pub fn timers(&self) -> &TimerQueue<Timer> {
        &self.timers
    }

    /// Presence simulator state.
    pub fn presence(&self) -> &PresenceSimulator {
        &self.presence
    }

    /// Scripted delays.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
