//! Client session driver
//!
//! Owns the transport, the reconnect timer, and the event loop that feeds
//! the state machine in [`super::session`]. Every child task (connect
//! attempt, framed reader, retry timer) reports back through one event
//! channel, so the session only ever processes one occurrence at a time.

use std::net::SocketAddr;

use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::clipboard::Clipboard;
use crate::launcher::UrlLauncher;
use crate::protocol::Frame;
use crate::status::StatusEvent;
use crate::sync::framing;
use crate::sync::session::{Action, Event, Session};
use crate::sync::{Request, RequestKind};
use crate::{Config, Error, Result};

/// Client session manager: connects to the host, drives the version
/// handshake, serves peer requests, and reconnects with a fixed backoff.
pub struct ClientSession {
    session: Session,
    addr: SocketAddr,
    debug: bool,
    events: mpsc::UnboundedReceiver<DriverEvent>,
    events_tx: mpsc::UnboundedSender<DriverEvent>,
    status_rx: mpsc::UnboundedReceiver<StatusEvent>,
}

impl ClientSession {
    /// Create the session manager. Nothing happens until [`start`] is
    /// called.
    ///
    /// [`start`]: ClientSession::start
    pub fn new(
        config: &Config,
        clipboard: Box<dyn Clipboard>,
        launcher: Box<dyn UrlLauncher>,
    ) -> Self {
        let (status_tx, status_rx) = mpsc::unbounded_channel();
        let (events_tx, events) = mpsc::unbounded_channel();
        let session = Session::new(clipboard, launcher, status_tx, config.retry_delay);

        Self {
            session,
            addr: SocketAddr::from(([127, 0, 0, 1], config.port)),
            debug: config.debug,
            events,
            events_tx,
            status_rx,
        }
    }

    /// Start the session task; returns the status stream and the control
    /// handle.
    pub fn start(self) -> (mpsc::UnboundedReceiver<StatusEvent>, ClientHandle) {
        let handle = ClientHandle {
            tx: self.events_tx.clone(),
        };

        handle.set_debug_logging(self.debug);
        handle.enable();

        let driver = Driver {
            session: self.session,
            addr: self.addr,
            rx: self.events,
            tx: self.events_tx,
            writer: None,
            reader_task: None,
            connect_task: None,
            retry_task: None,
            connect_generation: 0,
        };
        tokio::spawn(driver.run());

        (self.status_rx, handle)
    }
}

/// Control handle for a running client session
#[derive(Clone)]
pub struct ClientHandle {
    tx: mpsc::UnboundedSender<DriverEvent>,
}

impl ClientHandle {
    /// Allow connecting; connects immediately if currently idle.
    pub fn enable(&self) {
        let _ = self.tx.send(DriverEvent::Session(Event::Enable));
    }

    /// Operator kill switch: close the transport and stop retrying.
    pub fn disable(&self) {
        let _ = self.tx.send(DriverEvent::Session(Event::Disable));
    }

    pub fn set_debug_logging(&self, enabled: bool) {
        let _ = self.tx.send(DriverEvent::Session(Event::SetDebug(enabled)));
    }

    /// Set the peer's clipboard to `text`.
    pub async fn write_remote(&self, text: impl Into<String>) -> Result<()> {
        self.request(RequestKind::Write(text.into())).await?;
        Ok(())
    }

    /// Fetch the peer's clipboard.
    pub async fn read_remote(&self) -> Result<String> {
        self.request(RequestKind::Read).await
    }

    /// Ask the peer to open a URL.
    pub async fn open_url(&self, url: impl Into<String>) -> Result<()> {
        self.request(RequestKind::OpenUrl(url.into())).await?;
        Ok(())
    }

    /// Echo check; returns the echoed token.
    pub async fn ping(&self, token: impl Into<String>) -> Result<String> {
        self.request(RequestKind::Ping(token.into())).await
    }

    /// Stop the session task and drop the transport.
    pub fn shutdown(&self) {
        let _ = self.tx.send(DriverEvent::Shutdown);
    }

    async fn request(&self, kind: RequestKind) -> Result<String> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(DriverEvent::Session(Event::Submit(Request { kind, reply })))
            .map_err(|_| Error::NotConnected)?;
        rx.await.map_err(|_| Error::TransportClosed)?
    }
}

enum DriverEvent {
    Session(Event),
    Connected { generation: u64, stream: TcpStream },
    ConnectFailed { generation: u64, reason: String },
    FrameIn(Frame),
    Malformed(String),
    TransportClosed,
    RetryElapsed,
    Shutdown,
}

struct Driver {
    session: Session,
    addr: SocketAddr,
    rx: mpsc::UnboundedReceiver<DriverEvent>,
    tx: mpsc::UnboundedSender<DriverEvent>,
    writer: Option<OwnedWriteHalf>,
    reader_task: Option<JoinHandle<()>>,
    connect_task: Option<JoinHandle<()>>,
    retry_task: Option<JoinHandle<()>>,
    connect_generation: u64,
}

impl Driver {
    async fn run(mut self) {
        while let Some(event) = self.rx.recv().await {
            match event {
                DriverEvent::Shutdown => break,
                DriverEvent::Session(event) => self.step(event).await,
                DriverEvent::Connected { generation, stream } => {
                    // A stale attempt (superseded by disable/enable) must
                    // not become a second live transport
                    if generation != self.connect_generation {
                        continue;
                    }
                    self.attach(stream);
                    self.step(Event::Connected).await;
                }
                DriverEvent::ConnectFailed { generation, reason } => {
                    if generation != self.connect_generation {
                        continue;
                    }
                    self.step(Event::ConnectFailed(reason)).await;
                }
                DriverEvent::FrameIn(frame) => self.step(Event::Frame(frame)).await,
                DriverEvent::Malformed(reason) => self.step(Event::Malformed(reason)).await,
                DriverEvent::TransportClosed => self.step(Event::Closed).await,
                DriverEvent::RetryElapsed => self.step(Event::RetryElapsed).await,
            }
        }

        self.detach();
        if let Some(task) = self.retry_task.take() {
            task.abort();
        }
    }

    async fn step(&mut self, event: Event) {
        for action in self.session.handle(event) {
            self.perform(action).await;
        }
    }

    async fn perform(&mut self, action: Action) {
        match action {
            Action::Connect => {
                self.connect_generation += 1;
                let generation = self.connect_generation;
                if let Some(task) = self.connect_task.take() {
                    task.abort();
                }

                let tx = self.tx.clone();
                let addr = self.addr;
                self.connect_task = Some(tokio::spawn(async move {
                    match TcpStream::connect(addr).await {
                        Ok(stream) => {
                            let _ = tx.send(DriverEvent::Connected { generation, stream });
                        }
                        Err(e) => {
                            let _ = tx.send(DriverEvent::ConnectFailed {
                                generation,
                                reason: e.to_string(),
                            });
                        }
                    }
                }));
            }
            Action::Send(frame) => {
                let result = match self.writer.as_mut() {
                    Some(writer) => framing::write_message(writer, &frame.encode()).await,
                    None => Ok(()),
                };
                if let Err(e) = result {
                    tracing::debug!("send failed: {e}");
                    self.detach();
                    let _ = self.tx.send(DriverEvent::TransportClosed);
                }
            }
            Action::Close => {
                self.detach();
                let _ = self.tx.send(DriverEvent::TransportClosed);
            }
            Action::ScheduleRetry(delay) => {
                if let Some(task) = self.retry_task.take() {
                    task.abort();
                }
                let tx = self.tx.clone();
                self.retry_task = Some(tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(DriverEvent::RetryElapsed);
                }));
            }
            Action::CancelRetry => {
                if let Some(task) = self.retry_task.take() {
                    task.abort();
                }
            }
        }
    }

    /// Wire an accepted stream: the reader task turns transport messages
    /// into events until the connection drops.
    fn attach(&mut self, stream: TcpStream) {
        self.detach();

        let (read_half, write_half) = stream.into_split();
        self.writer = Some(write_half);

        let tx = self.tx.clone();
        self.reader_task = Some(tokio::spawn(async move {
            let mut reader = read_half;
            loop {
                match framing::read_message(&mut reader).await {
                    Ok(bytes) => {
                        let event = match Frame::decode(&bytes) {
                            Ok(frame) => DriverEvent::FrameIn(frame),
                            Err(e) => DriverEvent::Malformed(e.to_string()),
                        };
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        let _ = tx.send(DriverEvent::TransportClosed);
                        break;
                    }
                }
            }
        }));
    }

    /// Drop the transport and cancel any in-flight connect attempt
    fn detach(&mut self) {
        if let Some(task) = self.reader_task.take() {
            task.abort();
        }
        if let Some(task) = self.connect_task.take() {
            task.abort();
        }
        // Invalidate any connect result already in the event queue
        self.connect_generation += 1;
        self.writer = None;
    }
}
