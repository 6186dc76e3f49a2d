//! Session managers and transport plumbing

pub mod client;
pub mod framing;
pub mod host;
pub mod session;

use tokio::sync::oneshot;

use crate::protocol::constants::ACK_PAYLOAD;
use crate::protocol::{Command, Frame};
use crate::{Error, Result};

/// A locally-initiated request to the connected peer.
///
/// Requests are strictly sequential: one may be in flight per session, and
/// the next frame matching the expected reply shape resolves it.
#[derive(Debug)]
pub struct Request {
    pub kind: RequestKind,
    pub reply: oneshot::Sender<Result<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    /// Set the peer's clipboard to the given text
    Write(String),
    /// Fetch the peer's clipboard
    Read,
    /// Ask the peer to open a URL
    OpenUrl(String),
    /// Echo check with an arbitrary token
    Ping(String),
}

impl RequestKind {
    /// The wire frame that initiates this request
    pub(crate) fn to_frame(&self) -> Frame {
        match self {
            RequestKind::Write(text) => Frame::write(text.clone()),
            RequestKind::Read => Frame::read_request(),
            RequestKind::OpenUrl(url) => Frame::open_url(url.clone()),
            RequestKind::Ping(token) => Frame::ping(token.clone()),
        }
    }

    /// Does `frame` complete this request?
    pub(crate) fn matches_reply(&self, frame: &Frame) -> bool {
        match self {
            RequestKind::Write(_) => {
                frame.command == Command::Write && frame.payload == ACK_PAYLOAD
            }
            RequestKind::OpenUrl(_) => {
                frame.command == Command::OpenUrl && frame.payload == ACK_PAYLOAD
            }
            RequestKind::Read => frame.command == Command::Read,
            RequestKind::Ping(token) => {
                frame.command == Command::Ping && frame.payload == *token
            }
        }
    }
}

/// Resolve `pending` with `frame` if it is the expected reply. Returns true
/// when the frame was consumed as a reply.
pub(crate) fn resolve_reply(pending: &mut Option<Request>, frame: &Frame) -> bool {
    // An error frame answers whatever was in flight, but still propagates
    // to the session's own error handling
    if frame.command == Command::Error {
        if let Some(request) = pending.take() {
            let _ = request.reply.send(Err(Error::Peer(frame.payload.clone())));
        }
        return false;
    }

    let matched = pending
        .as_ref()
        .is_some_and(|request| request.kind.matches_reply(frame));

    if matched {
        if let Some(request) = pending.take() {
            let _ = request.reply.send(Ok(frame.payload.clone()));
        }
    }

    matched
}
