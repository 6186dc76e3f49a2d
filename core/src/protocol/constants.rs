//! Centralized protocol constants
//!
//! All protocol-level constants are defined here to ensure consistency
//! across the codebase and make configuration easier.

use std::time::Duration;

/// Default TCP port for the relay.
///
/// Sits below the kernel's default ephemeral range (32768-61000), so
/// outgoing connections can never occupy it.
pub const DEFAULT_PORT: u16 = 30001;

/// Current protocol version, exchanged during the handshake
pub const PROTOCOL_VERSION: &str = "0";

/// Delay before a reconnect attempt after the transport closes
pub const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Maximum transport message size (16 MiB)
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Acknowledgement payload for Write and OpenUrl replies
pub const ACK_PAYLOAD: &str = "OK";

/// Maximum number of entries kept in the status log buffer
pub const MAX_LOG_ENTRIES: usize = 20;

/// Log messages longer than this are truncated before buffering
pub const MAX_LOG_MESSAGE_LEN: usize = 80;
