//! Host session manager
//!
//! The host owns the listening endpoint and the OS clipboard. It accepts
//! one connection at a time, enforces the version handshake before any
//! other traffic, serves clipboard requests, and re-enters accept when the
//! connection closes. While a client is connected the host may also push
//! its own requests (clipboard sync, URL opening) through [`HostHandle`].

use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};

use crate::clipboard::Clipboard;
use crate::protocol::constants::PROTOCOL_VERSION;
use crate::protocol::{Command, Frame};
use crate::status::{LogEntry, LogLevel, StatusEvent};
use crate::sync::framing;
use crate::sync::{resolve_reply, Request, RequestKind};
use crate::{Config, Error, Result};

/// Host session manager bound to its listening socket
pub struct HostSession {
    listener: TcpListener,
    port: u16,
    clipboard: Box<dyn Clipboard>,
    debug: bool,
}

impl HostSession {
    /// Bind the listening socket on loopback.
    ///
    /// Failure to bind is fatal for the host role and reported to the
    /// caller; the usual cause is another instance already holding the
    /// port. There is no automatic retry.
    pub async fn bind(config: &Config, clipboard: Box<dyn Clipboard>) -> Result<Self> {
        let addr = std::net::SocketAddr::from(([127, 0, 0, 1], config.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| Error::Bind {
            port: config.port,
            reason: e.to_string(),
        })?;

        let port = listener
            .local_addr()
            .map_err(|e| Error::Network(e.to_string()))?
            .port();

        tracing::info!("host listening on 127.0.0.1:{port}");

        Ok(Self {
            listener,
            port,
            clipboard,
            debug: config.debug,
        })
    }

    /// The port actually bound (differs from the config when it asked
    /// for port 0)
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Start serving; returns the status stream and the control handle.
    pub fn start(self) -> (mpsc::UnboundedReceiver<StatusEvent>, HostHandle) {
        let (status_tx, status_rx) = mpsc::unbounded_channel();
        let (command_tx, commands) = mpsc::unbounded_channel();

        let runtime = HostRuntime {
            listener: self.listener,
            clipboard: self.clipboard,
            status: status_tx,
            commands,
            debug: self.debug,
        };
        tokio::spawn(runtime.run());

        (status_rx, HostHandle { tx: command_tx })
    }
}

/// Control handle for a running host session
#[derive(Clone)]
pub struct HostHandle {
    tx: mpsc::UnboundedSender<HostCommand>,
}

impl HostHandle {
    /// Set the connected client's clipboard to `text`.
    pub async fn write_remote(&self, text: impl Into<String>) -> Result<()> {
        self.request(RequestKind::Write(text.into())).await?;
        Ok(())
    }

    /// Fetch the connected client's clipboard.
    pub async fn read_remote(&self) -> Result<String> {
        self.request(RequestKind::Read).await
    }

    /// Ask the connected client to open a URL.
    pub async fn open_url(&self, url: impl Into<String>) -> Result<()> {
        self.request(RequestKind::OpenUrl(url.into())).await?;
        Ok(())
    }

    /// Echo check; returns the echoed token.
    pub async fn ping(&self, token: impl Into<String>) -> Result<String> {
        self.request(RequestKind::Ping(token.into())).await
    }

    pub fn set_debug_logging(&self, enabled: bool) {
        let _ = self.tx.send(HostCommand::SetDebug(enabled));
    }

    /// Stop the listener and drop any live connection.
    pub fn shutdown(&self) {
        let _ = self.tx.send(HostCommand::Shutdown);
    }

    async fn request(&self, kind: RequestKind) -> Result<String> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(HostCommand::Request(Request { kind, reply }))
            .map_err(|_| Error::NotConnected)?;
        rx.await.map_err(|_| Error::TransportClosed)?
    }
}

enum HostCommand {
    Request(Request),
    SetDebug(bool),
    Shutdown,
}

enum Flow {
    Continue,
    Stop,
}

struct HostRuntime {
    listener: TcpListener,
    clipboard: Box<dyn Clipboard>,
    status: mpsc::UnboundedSender<StatusEvent>,
    commands: mpsc::UnboundedReceiver<HostCommand>,
    debug: bool,
}

impl HostRuntime {
    async fn run(mut self) {
        loop {
            self.set_status("Listening for a client...", false);

            let (stream, addr) = tokio::select! {
                result = self.listener.accept() => match result {
                    Ok(pair) => pair,
                    Err(e) => {
                        // One bad accept does not take the service down
                        self.log(LogLevel::Error, format!("accept error: {e}"));
                        continue;
                    }
                },
                command = self.commands.recv() => match command {
                    Some(HostCommand::Request(request)) => {
                        let _ = request.reply.send(Err(Error::NotConnected));
                        continue;
                    }
                    Some(HostCommand::SetDebug(enabled)) => {
                        self.debug = enabled;
                        continue;
                    }
                    Some(HostCommand::Shutdown) | None => return,
                },
            };

            self.log(LogLevel::Info, format!("incoming connection from {addr}"));

            match self.serve_connection(stream).await {
                Ok(Flow::Continue) => {
                    self.log(LogLevel::Info, "connection closed");
                }
                Ok(Flow::Stop) => return,
                Err(e) => {
                    self.log(LogLevel::Error, format!("connection error: {e}"));
                }
            }
        }
    }

    /// Serve one accepted connection until it closes. The first frame must
    /// be a version probe; everything after the handshake is dispatched in
    /// arrival order.
    async fn serve_connection(&mut self, mut stream: TcpStream) -> Result<Flow> {
        let bytes = framing::read_message(&mut stream).await?;
        match Frame::decode(&bytes) {
            Ok(frame) if frame.command == Command::Version => {
                // An empty payload is a probe; a non-empty one is the
                // peer's version and must match ours
                if !frame.payload.is_empty() && frame.payload != PROTOCOL_VERSION {
                    let reply = Frame::error(format!(
                        "version mismatch: peer has {:?}, expected {:?}",
                        frame.payload, PROTOCOL_VERSION
                    ));
                    framing::write_message(&mut stream, &reply.encode()).await?;
                    return Err(Error::VersionMismatch {
                        peer: frame.payload,
                        expected: PROTOCOL_VERSION.to_string(),
                    });
                }
                let reply = Frame::version_reply(PROTOCOL_VERSION);
                framing::write_message(&mut stream, &reply.encode()).await?;
            }
            Ok(_) => {
                let message = "expected version handshake".to_string();
                framing::write_message(&mut stream, &Frame::error(message.clone()).encode())
                    .await?;
                return Err(Error::MalformedFrame(message));
            }
            Err(e) => {
                framing::write_message(&mut stream, &Frame::error(e.to_string()).encode())
                    .await?;
                return Err(e);
            }
        }

        self.set_status("Client connected.", true);

        let (read_half, mut writer) = stream.into_split();
        let (frames_tx, mut frames) = mpsc::unbounded_channel();
        let reader_task = tokio::spawn(async move {
            let mut reader = read_half;
            loop {
                match framing::read_message(&mut reader).await {
                    Ok(bytes) => {
                        if frames_tx.send(bytes).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
        });

        let mut pending: Option<Request> = None;
        let flow = loop {
            tokio::select! {
                bytes = frames.recv() => {
                    let bytes = match bytes {
                        Some(bytes) => bytes,
                        None => break Flow::Continue, // peer closed
                    };
                    match Frame::decode(&bytes) {
                        Ok(frame) => {
                            if resolve_reply(&mut pending, &frame) {
                                continue;
                            }
                            if !self.dispatch(frame, &mut writer).await? {
                                break Flow::Continue;
                            }
                        }
                        Err(e) => {
                            // Post-handshake violations are recoverable
                            self.log(LogLevel::Error, format!("malformed frame: {e}"));
                            let reply = Frame::error(format!("malformed frame: {e}"));
                            framing::write_message(&mut writer, &reply.encode()).await?;
                        }
                    }
                }
                command = self.commands.recv() => match command {
                    Some(HostCommand::Request(request)) => {
                        if pending.is_some() {
                            let _ = request.reply.send(Err(Error::RequestInFlight));
                            continue;
                        }
                        let frame = request.kind.to_frame();
                        framing::write_message(&mut writer, &frame.encode()).await?;
                        pending = Some(request);
                    }
                    Some(HostCommand::SetDebug(enabled)) => self.debug = enabled,
                    Some(HostCommand::Shutdown) | None => break Flow::Stop,
                },
            }
        };

        reader_task.abort();
        if let Some(request) = pending.take() {
            let _ = request.reply.send(Err(Error::TransportClosed));
        }

        Ok(flow)
    }

    /// Serve one peer frame; returns false when the connection should end.
    async fn dispatch(&mut self, frame: Frame, writer: &mut OwnedWriteHalf) -> Result<bool> {
        self.log(
            LogLevel::Debug,
            format!(
                "frame received ({}{})",
                frame.command.as_byte() as char,
                frame.payload
            ),
        );

        match frame.command {
            Command::Write => {
                let reply = match self.apply_write(&frame.payload) {
                    Ok(()) => Frame::write_ok(),
                    Err(e) => {
                        let message = format!("clipboard write failed: {e}");
                        self.log(LogLevel::Error, message.clone());
                        Frame::error(message)
                    }
                };
                framing::write_message(writer, &reply.encode()).await?;
                Ok(true)
            }
            Command::Read => {
                let reply = match self.clipboard.get() {
                    Ok(text) => Frame::read_reply(text),
                    Err(e) => {
                        let message = format!("clipboard read failed: {e}");
                        self.log(LogLevel::Error, message.clone());
                        Frame::error(message)
                    }
                };
                framing::write_message(writer, &reply.encode()).await?;
                Ok(true)
            }
            Command::Ping => {
                framing::write_message(writer, &frame.encode()).await?;
                Ok(true)
            }
            Command::OpenUrl => {
                // URL opening is a client-side capability
                let reply = Frame::error("host does not open URLs");
                framing::write_message(writer, &reply.encode()).await?;
                Ok(true)
            }
            Command::Error => {
                self.log(LogLevel::Error, format!("peer error: {}", frame.payload));
                Ok(false)
            }
            Command::Version => {
                let reply = Frame::error("unexpected version frame");
                framing::write_message(writer, &reply.encode()).await?;
                Ok(true)
            }
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

    fn set_status(&mut self, message: &str, online: bool) {
        let _ = self.status.send(StatusEvent::Status {
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
        let _ = self.status.send(StatusEvent::Log(LogEntry::new(level, message)));
    }
}
