use thiserror::Error;

/// Clipbridge error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to bind port {port}: {reason}")]
    Bind { port: u16, reason: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("protocol version mismatch: peer has {peer:?}, expected {expected:?}")]
    VersionMismatch { peer: String, expected: String },

    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    #[error("peer reported error: {0}")]
    Peer(String),

    #[error("no peer connected")]
    NotConnected,

    #[error("a request is already in flight")]
    RequestInFlight,

    #[error("transport closed")]
    TransportClosed,

    #[error("clipboard error: {0}")]
    Clipboard(String),

    #[error("cannot open URL: {0}")]
    Launcher(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
