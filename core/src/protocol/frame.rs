//! Protocol frame definitions
//!
//! One frame is a single ASCII command byte followed by the raw payload
//! bytes. There is no delimiter, length prefix, or escaping at this layer;
//! the transport framing (`sync::framing`) delivers complete messages.
//!
//! Acknowledgements are payload conventions, not commands: the reply to a
//! Write is the frame `WOK`, the reply to an OpenUrl is `UOK`, the reply to
//! a Read carries the clipboard text under `R`, and a Ping is echoed back
//! byte-for-byte.

use crate::error::{Error, Result};
use crate::protocol::constants::ACK_PAYLOAD;

/// Frame command vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Version announce/request (`V`)
    Version,
    /// Write clipboard content (`W`)
    Write,
    /// Read clipboard content (`R`)
    Read,
    /// Ask the peer to open a URL (`U`)
    OpenUrl,
    /// Ping, payload echoed verbatim (`P`)
    Ping,
    /// Error report (`E`)
    Error,
}

impl Command {
    pub fn as_byte(self) -> u8 {
        match self {
            Command::Version => b'V',
            Command::Write => b'W',
            Command::Read => b'R',
            Command::OpenUrl => b'U',
            Command::Ping => b'P',
            Command::Error => b'E',
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'V' => Some(Command::Version),
            b'W' => Some(Command::Write),
            b'R' => Some(Command::Read),
            b'U' => Some(Command::OpenUrl),
            b'P' => Some(Command::Ping),
            b'E' => Some(Command::Error),
            _ => None,
        }
    }
}

/// One protocol message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub command: Command,
    pub payload: String,
}

impl Frame {
    pub fn new(command: Command, payload: impl Into<String>) -> Self {
        Self {
            command,
            payload: payload.into(),
        }
    }

    /// Empty version request sent right after the transport opens
    pub fn version_probe() -> Self {
        Self::new(Command::Version, "")
    }

    /// Version announcement carrying our protocol version
    pub fn version_reply(version: &str) -> Self {
        Self::new(Command::Version, version)
    }

    pub fn write(text: impl Into<String>) -> Self {
        Self::new(Command::Write, text)
    }

    pub fn write_ok() -> Self {
        Self::new(Command::Write, ACK_PAYLOAD)
    }

    pub fn read_request() -> Self {
        Self::new(Command::Read, "")
    }

    pub fn read_reply(text: impl Into<String>) -> Self {
        Self::new(Command::Read, text)
    }

    pub fn open_url(url: impl Into<String>) -> Self {
        Self::new(Command::OpenUrl, url)
    }

    pub fn open_url_ok() -> Self {
        Self::new(Command::OpenUrl, ACK_PAYLOAD)
    }

    pub fn ping(token: impl Into<String>) -> Self {
        Self::new(Command::Ping, token)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Command::Error, message)
    }

    /// Wire representation: command byte followed by the raw payload bytes
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(1 + self.payload.len());
        bytes.push(self.command.as_byte());
        bytes.extend_from_slice(self.payload.as_bytes());
        bytes
    }

    /// Parse one complete wire message back into a frame.
    ///
    /// The protocol is text oriented: payloads must be valid UTF-8.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let (&first, payload) = bytes
            .split_first()
            .ok_or_else(|| Error::MalformedFrame("empty frame".to_string()))?;

        let command = Command::from_byte(first).ok_or_else(|| {
            Error::MalformedFrame(format!("unrecognized command {:?}", first as char))
        })?;

        let payload = std::str::from_utf8(payload)
            .map_err(|_| Error::MalformedFrame("payload is not valid UTF-8".to_string()))?;

        Ok(Self::new(command, payload))
    }

    pub fn is_write_ack(&self) -> bool {
        self.command == Command::Write && self.payload == ACK_PAYLOAD
    }

    pub fn is_open_url_ack(&self) -> bool {
        self.command == Command::OpenUrl && self.payload == ACK_PAYLOAD
    }
}
