//! Clipbridge Core - clipboard relay protocol engine
//!
//! This library connects a "host" process with OS clipboard access to a
//! "client" process running in a sandboxed environment without it. The two
//! peers speak a tiny text protocol (one command byte + payload) over a
//! loopback TCP connection, with a version handshake before any data,
//! redundant-write suppression, and automatic reconnection with a fixed
//! 5-second backoff.

pub mod clipboard;
pub mod launcher;
pub mod protocol;
pub mod status;
pub mod sync;

mod error;

pub use error::{Error, Result};

/// Configuration for a clipbridge session (either role)
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP port on loopback to listen on (host) or connect to (client)
    pub port: u16,
    /// Delay before a reconnect attempt after the transport closes
    pub retry_delay: std::time::Duration,
    /// Record debug-level entries in the status log
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: protocol::constants::DEFAULT_PORT,
            retry_delay: protocol::constants::RETRY_DELAY,
            debug: false,
        }
    }
}

// Re-export key types for convenience
pub use clipboard::{Clipboard, SystemClipboard};
pub use launcher::{SystemLauncher, UrlLauncher};
pub use protocol::{Command, Frame};
pub use status::{LogBuffer, LogEntry, LogLevel, StatusEvent};
pub use sync::client::{ClientHandle, ClientSession};
pub use sync::host::{HostHandle, HostSession};
pub use sync::session::ConnectionState;
