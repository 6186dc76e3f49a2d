//! Client session state machine
//!
//! Every transport and operator occurrence is an [`Event`]; [`Session::handle`]
//! consumes one event and returns the I/O [`Action`]s for the driver in
//! `sync::client` to perform. The machine itself never touches the network,
//! which keeps every transition testable without sockets.
//!
//! Invariants the machine enforces:
//! - at most one live transport per session (a second `Connect` is never
//!   emitted while one is open or being opened)
//! - `Active` is reachable only through a successful version handshake
//! - at most one outstanding retry timer (`retry_pending`)
//! - a version mismatch disables the session until the operator re-enables
//!   it; every other failure retries with the fixed backoff

use std::time::Duration;

use tokio::sync::mpsc;

use crate::clipboard::Clipboard;
use crate::launcher::UrlLauncher;
use crate::protocol::constants::PROTOCOL_VERSION;
use crate::protocol::{Command, Frame};
use crate::status::{LogEntry, LogLevel, StatusEvent};
use crate::sync::{resolve_reply, Request};
use crate::{Error, Result};

/// Connection lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    AwaitingVersion,
    Active,
    Erroring,
}

/// Input to the state machine
#[derive(Debug)]
pub enum Event {
    /// Operator enabled the session (also the initial kick at startup)
    Enable,
    /// Operator disabled the session
    Disable,
    /// Operator toggled debug logging
    SetDebug(bool),
    /// The transport connected
    Connected,
    /// The connect attempt failed
    ConnectFailed(String),
    /// A complete, well-formed frame arrived
    Frame(Frame),
    /// A message arrived that did not decode to a frame
    Malformed(String),
    /// The transport closed
    Closed,
    /// The reconnect timer fired
    RetryElapsed,
    /// A local consumer submitted a request for the peer
    Submit(Request),
}

/// I/O the driver must perform after a transition
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    /// Open a transport connection
    Connect,
    /// Send a frame to the peer
    Send(Frame),
    /// Close the transport (a `Closed` event follows)
    Close,
    /// Arm the reconnect timer
    ScheduleRetry(Duration),
    /// Disarm the pending reconnect timer
    CancelRetry,
}

pub struct Session {
    state: ConnectionState,
    enabled: bool,
    debug: bool,
    retry_pending: bool,
    retry_delay: Duration,
    last_error: Option<String>,
    pending: Option<Request>,
    clipboard: Box<dyn Clipboard>,
    launcher: Box<dyn UrlLauncher>,
    events: mpsc::UnboundedSender<StatusEvent>,
}

impl Session {
    pub fn new(
        clipboard: Box<dyn Clipboard>,
        launcher: Box<dyn UrlLauncher>,
        events: mpsc::UnboundedSender<StatusEvent>,
        retry_delay: Duration,
    ) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            enabled: true,
            debug: false,
            retry_pending: false,
            retry_delay,
            last_error: None,
            pending: None,
            clipboard,
            launcher,
            events,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Consume one event and return the actions the driver must perform.
    pub fn handle(&mut self, event: Event) -> Vec<Action> {
        match event {
            Event::Enable => self.on_enable(),
            Event::Disable => self.on_disable(),
            Event::SetDebug(enabled) => {
                self.debug = enabled;
                Vec::new()
            }
            Event::Connected => self.on_connected(),
            Event::ConnectFailed(reason) => self.on_connect_failed(reason),
            Event::Frame(frame) => self.on_frame(frame),
            Event::Malformed(reason) => self.on_malformed(reason),
            Event::Closed => self.on_closed(),
            Event::RetryElapsed => self.on_retry_elapsed(),
            Event::Submit(request) => self.on_submit(request),
        }
    }

    fn on_enable(&mut self) -> Vec<Action> {
        self.enabled = true;

        match self.state {
            ConnectionState::Disconnected | ConnectionState::Erroring => {
                let mut actions = Vec::new();
                // A manual reconnect cancels the idle timer first so the
                // firing timer cannot produce a second connection attempt.
                if self.retry_pending {
                    self.retry_pending = false;
                    actions.push(Action::CancelRetry);
                }
                self.last_error = None;
                actions.extend(self.start_connect());
                actions
            }
            _ => {
                self.log(LogLevel::Debug, "socket already open");
                Vec::new()
            }
        }
    }

    fn on_disable(&mut self) -> Vec<Action> {
        self.enabled = false;

        let mut actions = Vec::new();
        if self.retry_pending {
            self.retry_pending = false;
            actions.push(Action::CancelRetry);
        }

        match self.state {
            ConnectionState::Disconnected | ConnectionState::Erroring => {
                self.set_status("No connection (session disabled).", false);
                self.log(LogLevel::Info, "session is disabled");
            }
            _ => {
                // The Closed event that follows settles the state without
                // rescheduling, since enabled is now false.
                actions.push(Action::Close);
            }
        }

        actions
    }

    fn start_connect(&mut self) -> Vec<Action> {
        self.state = ConnectionState::Connecting;
        self.set_status("Connecting...", false);
        self.log(LogLevel::Debug, "opening a connection");
        vec![Action::Connect]
    }

    fn on_connected(&mut self) -> Vec<Action> {
        // Disable may have raced the connect attempt
        if !self.enabled || self.state != ConnectionState::Connecting {
            return vec![Action::Close];
        }

        self.state = ConnectionState::AwaitingVersion;
        self.log(LogLevel::Info, "connection established");
        self.set_status("Connection established: checking version...", false);
        vec![Action::Send(Frame::version_probe())]
    }

    fn on_connect_failed(&mut self, reason: String) -> Vec<Action> {
        self.log(LogLevel::Info, format!("connection failed: {reason}"));
        self.on_closed()
    }

    fn on_frame(&mut self, frame: Frame) -> Vec<Action> {
        self.log(
            LogLevel::Debug,
            format!(
                "frame received ({}{})",
                frame.command.as_byte() as char,
                frame.payload
            ),
        );

        match self.state {
            ConnectionState::AwaitingVersion => self.on_version_frame(frame),
            ConnectionState::Active => self.on_active_frame(frame),
            _ => {
                // Stale read delivered while tearing down; nothing to do
                self.log(LogLevel::Debug, "frame discarded (no active session)");
                Vec::new()
            }
        }
    }

    /// Only a version reply is valid until the handshake completes. A
    /// mismatch disables the session for good; any other frame is a phase
    /// violation that closes the connection but keeps the retry policy.
    fn on_version_frame(&mut self, frame: Frame) -> Vec<Action> {
        if frame.command != Command::Version {
            self.log(LogLevel::Error, "received frame while waiting for version");
            return vec![Action::Close];
        }

        if frame.payload != PROTOCOL_VERSION {
            let message = format!(
                "invalid peer version {:?} != {:?}",
                frame.payload, PROTOCOL_VERSION
            );
            self.enabled = false;
            self.state = ConnectionState::Erroring;
            self.last_error = Some(message.clone());
            self.log(LogLevel::Error, message);
            self.set_status("Version mismatch.", false);
            return vec![Action::Close];
        }

        self.state = ConnectionState::Active;
        self.set_status("Connection established.", true);
        Vec::new()
    }

    fn on_active_frame(&mut self, frame: Frame) -> Vec<Action> {
        if resolve_reply(&mut self.pending, &frame) {
            return Vec::new();
        }

        match frame.command {
            Command::Write => match self.apply_write(&frame.payload) {
                Ok(()) => vec![Action::Send(Frame::write_ok())],
                Err(e) => {
                    let message = format!("clipboard write failed: {e}");
                    self.log(LogLevel::Error, message.clone());
                    vec![Action::Send(Frame::error(message))]
                }
            },
            Command::Read => match self.clipboard.get() {
                Ok(text) => vec![Action::Send(Frame::read_reply(text))],
                Err(e) => {
                    let message = format!("clipboard read failed: {e}");
                    self.log(LogLevel::Error, message.clone());
                    vec![Action::Send(Frame::error(message))]
                }
            },
            Command::OpenUrl => match self.launcher.open(&frame.payload) {
                Ok(()) => vec![Action::Send(Frame::open_url_ok())],
                Err(e) => {
                    let message = e.to_string();
                    self.log(LogLevel::Error, message.clone());
                    vec![Action::Send(Frame::error(message))]
                }
            },
            Command::Ping => vec![Action::Send(frame)],
            Command::Error => {
                self.log(LogLevel::Error, format!("peer error: {}", frame.payload));
                self.last_error = Some(frame.payload);
                vec![Action::Close]
            }
            Command::Version => {
                let message = "unexpected version frame".to_string();
                self.log(LogLevel::Error, message.clone());
                vec![Action::Send(Frame::error(message))]
            }
        }
    }

    fn on_malformed(&mut self, reason: String) -> Vec<Action> {
        match self.state {
            ConnectionState::Active => {
                self.log(LogLevel::Error, format!("malformed frame: {reason}"));
                vec![Action::Send(Frame::error(format!(
                    "malformed frame: {reason}"
                )))]
            }
            ConnectionState::AwaitingVersion => {
                self.log(
                    LogLevel::Error,
                    "malformed frame while waiting for version",
                );
                vec![Action::Close]
            }
            _ => Vec::new(),
        }
    }

    /// Skip the capability write when the clipboard already holds the
    /// payload; the reply is WOK either way.
    fn apply_write(&mut self, text: &str) -> Result<()> {
        let current = self.clipboard.get()?;
        if current == text {
            self.log(LogLevel::Debug, "not writing identical clipboard content");
            return Ok(());
        }
        self.clipboard.set(text)
    }

    fn on_closed(&mut self) -> Vec<Action> {
        self.fail_pending();

        if self.enabled {
            self.state = ConnectionState::Disconnected;
            // Re-entrant close notifications must not stack timers
            if self.retry_pending {
                return Vec::new();
            }
            self.set_status("No connection (retrying in 5 seconds)", false);
            self.log(
                LogLevel::Info,
                "connection closed, trying again in 5 seconds",
            );
            self.retry_pending = true;
            vec![Action::ScheduleRetry(self.retry_delay)]
        } else {
            let was_idle = matches!(
                self.state,
                ConnectionState::Disconnected | ConnectionState::Erroring
            );
            if self.state != ConnectionState::Erroring {
                self.state = ConnectionState::Disconnected;
            }
            if !was_idle {
                self.set_status("No connection (session disabled).", false);
                self.log(
                    LogLevel::Info,
                    "connection closed, session disabled: not retrying",
                );
            }
            Vec::new()
        }
    }

    fn on_retry_elapsed(&mut self) -> Vec<Action> {
        self.retry_pending = false;

        if !self.enabled || self.state != ConnectionState::Disconnected {
            return Vec::new();
        }

        self.start_connect()
    }

    fn on_submit(&mut self, request: Request) -> Vec<Action> {
        if self.state != ConnectionState::Active {
            let _ = request.reply.send(Err(Error::NotConnected));
            return Vec::new();
        }

        if self.pending.is_some() {
            let _ = request.reply.send(Err(Error::RequestInFlight));
            return Vec::new();
        }

        let frame = request.kind.to_frame();
        self.pending = Some(request);
        vec![Action::Send(frame)]
    }

    /// Closing the transport cancels all in-flight expectations
    fn fail_pending(&mut self) {
        if let Some(request) = self.pending.take() {
            let _ = request.reply.send(Err(Error::TransportClosed));
        }
    }

    fn set_status(&mut self, message: &str, online: bool) {
        let _ = self.events.send(StatusEvent::Status {
            message: message.to_string(),
            online,
        });
    }

    fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            LogLevel::Error => tracing::error!("{message}"),
            LogLevel::Info => tracing::info!("{message}"),
            LogLevel::Debug => tracing::debug!("{message}"),
        }

        if level == LogLevel::Debug && !self.debug {
            return;
        }
        let _ = self.events.send(StatusEvent::Log(LogEntry::new(level, message)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::constants::RETRY_DELAY;
    use crate::sync::testutil::{MemoryClipboard, RecordingLauncher};
    use crate::sync::RequestKind;
    use tokio::sync::oneshot;

    struct Fixture {
        session: Session,
        clipboard: MemoryClipboard,
        launcher: RecordingLauncher,
        events: mpsc::UnboundedReceiver<StatusEvent>,
    }

    fn fixture(clipboard_contents: &str) -> Fixture {
        let clipboard = MemoryClipboard::with_contents(clipboard_contents);
        let launcher = RecordingLauncher::default();
        let (tx, events) = mpsc::unbounded_channel();
        let session = Session::new(
            Box::new(clipboard.clone()),
            Box::new(launcher.clone()),
            tx,
            RETRY_DELAY,
        );
        Fixture {
            session,
            clipboard,
            launcher,
            events,
        }
    }

    /// Drive the session to Active through the normal handshake
    fn activate(fx: &mut Fixture) {
        assert_eq!(fx.session.handle(Event::Enable), vec![Action::Connect]);
        assert_eq!(
            fx.session.handle(Event::Connected),
            vec![Action::Send(Frame::version_probe())]
        );
        assert_eq!(
            fx.session.handle(Event::Frame(Frame::version_reply("0"))),
            Vec::new()
        );
        assert_eq!(fx.session.state(), ConnectionState::Active);
    }

    fn submit(fx: &mut Fixture, kind: RequestKind) -> (Vec<Action>, oneshot::Receiver<Result<String>>) {
        let (tx, rx) = oneshot::channel();
        let actions = fx.session.handle(Event::Submit(Request { kind, reply: tx }));
        (actions, rx)
    }

    fn drain_statuses(fx: &mut Fixture) -> Vec<(String, bool)> {
        let mut statuses = Vec::new();
        while let Ok(event) = fx.events.try_recv() {
            if let StatusEvent::Status { message, online } = event {
                statuses.push((message, online));
            }
        }
        statuses
    }

    fn drain_error_logs(fx: &mut Fixture) -> Vec<String> {
        let mut errors = Vec::new();
        while let Ok(event) = fx.events.try_recv() {
            if let StatusEvent::Log(entry) = event {
                if entry.level == LogLevel::Error {
                    errors.push(entry.message);
                }
            }
        }
        errors
    }

    #[test]
    fn test_handshake_reaches_active_and_reports_online() {
        let mut fx = fixture("");
        activate(&mut fx);

        let statuses = drain_statuses(&mut fx);
        assert_eq!(
            statuses.last(),
            Some(&("Connection established.".to_string(), true))
        );
    }

    #[test]
    fn test_version_mismatch_disables_session() {
        let mut fx = fixture("");
        fx.session.handle(Event::Enable);
        fx.session.handle(Event::Connected);

        let actions = fx.session.handle(Event::Frame(Frame::version_reply("1")));
        assert_eq!(actions, vec![Action::Close]);
        assert_eq!(fx.session.state(), ConnectionState::Erroring);
        assert!(!fx.session.enabled());

        // The close that follows must not schedule a retry
        assert_eq!(fx.session.handle(Event::Closed), Vec::new());
        assert_eq!(fx.session.state(), ConnectionState::Erroring);

        let errors = drain_error_logs(&mut fx);
        assert!(errors.iter().any(|m| m.contains("invalid peer version")));
    }

    #[test]
    fn test_non_version_frame_during_handshake_closes_but_retries() {
        let mut fx = fixture("");
        fx.session.handle(Event::Enable);
        fx.session.handle(Event::Connected);

        let actions = fx.session.handle(Event::Frame(Frame::write("early")));
        assert_eq!(actions, vec![Action::Close]);
        assert!(fx.session.enabled());

        // Still enabled, so the close schedules the usual backoff
        assert_eq!(
            fx.session.handle(Event::Closed),
            vec![Action::ScheduleRetry(RETRY_DELAY)]
        );
    }

    #[test]
    fn test_write_applies_payload_and_acks() {
        let mut fx = fixture("old");
        activate(&mut fx);

        let actions = fx.session.handle(Event::Frame(Frame::write("new")));
        assert_eq!(actions, vec![Action::Send(Frame::write_ok())]);
        assert_eq!(fx.clipboard.contents(), "new");
        assert_eq!(fx.clipboard.set_calls(), 1);
    }

    #[test]
    fn test_identical_write_suppressed_but_still_acked() {
        let mut fx = fixture("same");
        activate(&mut fx);

        let actions = fx.session.handle(Event::Frame(Frame::write("same")));
        assert_eq!(actions, vec![Action::Send(Frame::write_ok())]);
        assert_eq!(fx.clipboard.set_calls(), 0);
    }

    #[test]
    fn test_read_replies_with_clipboard_content() {
        let mut fx = fixture("abc");
        activate(&mut fx);

        let actions = fx.session.handle(Event::Frame(Frame::read_request()));
        assert_eq!(actions, vec![Action::Send(Frame::read_reply("abc"))]);
    }

    #[test]
    fn test_ping_echoed_byte_for_byte() {
        let mut fx = fixture("");
        activate(&mut fx);

        let actions = fx.session.handle(Event::Frame(Frame::ping("hello")));
        assert_eq!(actions.len(), 1);
        match &actions[0] {
            Action::Send(frame) => assert_eq!(frame.encode(), b"Phello"),
            other => panic!("expected Send, got {other:?}"),
        }
    }

    #[test]
    fn test_open_url_invokes_launcher_and_acks() {
        let mut fx = fixture("");
        activate(&mut fx);

        let actions = fx
            .session
            .handle(Event::Frame(Frame::open_url("https://example.com/")));
        assert_eq!(actions, vec![Action::Send(Frame::open_url_ok())]);
        assert_eq!(fx.launcher.opened(), ["https://example.com/"]);
    }

    #[test]
    fn test_peer_error_frame_closes_session() {
        let mut fx = fixture("");
        activate(&mut fx);

        let actions = fx.session.handle(Event::Frame(Frame::error("server died")));
        assert_eq!(actions, vec![Action::Close]);
        assert_eq!(fx.session.last_error(), Some("server died"));
    }

    #[test]
    fn test_malformed_frame_answered_with_error_frame() {
        let mut fx = fixture("");
        activate(&mut fx);

        let actions = fx
            .session
            .handle(Event::Malformed("empty frame".to_string()));
        assert_eq!(actions.len(), 1);
        match &actions[0] {
            Action::Send(frame) => assert_eq!(frame.command, Command::Error),
            other => panic!("expected Send, got {other:?}"),
        }
        assert_eq!(fx.session.state(), ConnectionState::Active);
    }

    #[test]
    fn test_close_schedules_exactly_one_retry() {
        let mut fx = fixture("");
        activate(&mut fx);

        assert_eq!(
            fx.session.handle(Event::Closed),
            vec![Action::ScheduleRetry(RETRY_DELAY)]
        );
        // Re-entrant close: the timer must not stack
        assert_eq!(fx.session.handle(Event::Closed), Vec::new());

        // Firing the timer triggers exactly one connect attempt
        assert_eq!(fx.session.handle(Event::RetryElapsed), vec![Action::Connect]);
        assert_eq!(fx.session.handle(Event::RetryElapsed), Vec::new());
    }

    #[test]
    fn test_connect_failure_follows_retry_policy() {
        let mut fx = fixture("");
        fx.session.handle(Event::Enable);

        let actions = fx
            .session
            .handle(Event::ConnectFailed("connection refused".to_string()));
        assert_eq!(actions, vec![Action::ScheduleRetry(RETRY_DELAY)]);
    }

    #[test]
    fn test_disable_while_active_closes_without_retry() {
        let mut fx = fixture("");
        activate(&mut fx);

        assert_eq!(fx.session.handle(Event::Disable), vec![Action::Close]);
        assert_eq!(fx.session.handle(Event::Closed), Vec::new());
        assert_eq!(fx.session.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_enable_while_idle_cancels_timer_and_connects() {
        let mut fx = fixture("");
        activate(&mut fx);
        fx.session.handle(Event::Closed);

        let actions = fx.session.handle(Event::Enable);
        assert_eq!(actions, vec![Action::CancelRetry, Action::Connect]);

        // A stale timer firing later must not start a second attempt
        assert_eq!(fx.session.handle(Event::RetryElapsed), Vec::new());
    }

    #[test]
    fn test_rapid_toggle_never_yields_two_connects() {
        let mut fx = fixture("");

        let mut connects = 0;
        for actions in [
            fx.session.handle(Event::Enable),
            fx.session.handle(Event::Disable),
            fx.session.handle(Event::Closed),
            fx.session.handle(Event::Enable),
            fx.session.handle(Event::Enable),
        ] {
            connects += actions.iter().filter(|a| **a == Action::Connect).count();
        }

        // One for the first Enable, one for the re-enable after the close;
        // never two outstanding at once, and the repeat Enable is a no-op.
        assert_eq!(connects, 2);
        assert_eq!(fx.session.state(), ConnectionState::Connecting);
    }

    #[test]
    fn test_connected_after_disable_is_closed_immediately() {
        let mut fx = fixture("");
        fx.session.handle(Event::Enable);
        fx.session.handle(Event::Disable);

        // The in-flight connect completes after the operator disabled
        assert_eq!(fx.session.handle(Event::Connected), vec![Action::Close]);
    }

    #[test]
    fn test_submit_write_resolves_on_ack() {
        let mut fx = fixture("");
        activate(&mut fx);

        let (actions, mut rx) = submit(&mut fx, RequestKind::Write("hi".to_string()));
        assert_eq!(actions, vec![Action::Send(Frame::write("hi"))]);

        fx.session.handle(Event::Frame(Frame::write_ok()));
        assert_eq!(rx.try_recv().unwrap().unwrap(), "OK");
    }

    #[test]
    fn test_submit_read_resolves_with_remote_content() {
        let mut fx = fixture("");
        activate(&mut fx);

        let (actions, mut rx) = submit(&mut fx, RequestKind::Read);
        assert_eq!(actions, vec![Action::Send(Frame::read_request())]);

        fx.session.handle(Event::Frame(Frame::read_reply("remote text")));
        assert_eq!(rx.try_recv().unwrap().unwrap(), "remote text");
    }

    #[test]
    fn test_submit_while_disconnected_fails_fast() {
        let mut fx = fixture("");

        let (actions, mut rx) = submit(&mut fx, RequestKind::Read);
        assert_eq!(actions, Vec::new());
        assert!(matches!(
            rx.try_recv().unwrap(),
            Err(Error::NotConnected)
        ));
    }

    #[test]
    fn test_second_submit_rejected_while_one_in_flight() {
        let mut fx = fixture("");
        activate(&mut fx);

        let (_, _rx1) = submit(&mut fx, RequestKind::Read);
        let (_, mut rx2) = submit(&mut fx, RequestKind::Read);
        assert!(matches!(
            rx2.try_recv().unwrap(),
            Err(Error::RequestInFlight)
        ));
    }

    #[test]
    fn test_pending_request_fails_on_peer_error_frame() {
        let mut fx = fixture("");
        activate(&mut fx);

        let (_, mut rx) = submit(&mut fx, RequestKind::Read);
        let actions = fx.session.handle(Event::Frame(Frame::error("no clipboard")));
        assert_eq!(actions, vec![Action::Close]);
        match rx.try_recv().unwrap() {
            Err(Error::Peer(message)) => assert_eq!(message, "no clipboard"),
            other => panic!("expected a peer error, got {other:?}"),
        }
    }

    #[test]
    fn test_pending_request_fails_when_transport_closes() {
        let mut fx = fixture("");
        activate(&mut fx);

        let (_, mut rx) = submit(&mut fx, RequestKind::Ping("tok".to_string()));
        fx.session.handle(Event::Closed);
        assert!(matches!(
            rx.try_recv().unwrap(),
            Err(Error::TransportClosed)
        ));
    }

    #[test]
    fn test_incoming_write_not_mistaken_for_reply() {
        let mut fx = fixture("");
        activate(&mut fx);

        // A pending Read must not swallow a peer-initiated Write request
        let (_, _rx) = submit(&mut fx, RequestKind::Read);
        let actions = fx.session.handle(Event::Frame(Frame::write("peer text")));
        assert_eq!(actions, vec![Action::Send(Frame::write_ok())]);
        assert_eq!(fx.clipboard.contents(), "peer text");
    }

    #[test]
    fn test_debug_logs_only_emitted_when_enabled() {
        let mut fx = fixture("same");
        activate(&mut fx);
        while fx.events.try_recv().is_ok() {}

        // Suppressed write logs at debug level
        fx.session.handle(Event::Frame(Frame::write("same")));
        let mut debug_entries = 0;
        while let Ok(event) = fx.events.try_recv() {
            if let StatusEvent::Log(entry) = event {
                if entry.level == LogLevel::Debug {
                    debug_entries += 1;
                }
            }
        }
        assert_eq!(debug_entries, 0);

        fx.session.handle(Event::SetDebug(true));
        fx.session.handle(Event::Frame(Frame::write("same")));
        while let Ok(event) = fx.events.try_recv() {
            if let StatusEvent::Log(entry) = event {
                if entry.level == LogLevel::Debug {
                    debug_entries += 1;
                }
            }
        }
        assert!(debug_entries > 0);
    }
}
