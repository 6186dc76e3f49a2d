//! Length-prefixed transport framing
//!
//! The frame codec (`protocol::frame`) has no delimiter of its own and
//! relies on the transport delivering complete messages. Over raw TCP that
//! guarantee comes from this layer: every message is a 4-byte big-endian
//! length followed by the payload bytes.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::protocol::constants::MAX_MESSAGE_SIZE;
use crate::{Error, Result};

/// Read one complete message from an async reader.
///
/// Returns an error if the declared length exceeds `MAX_MESSAGE_SIZE` or
/// the stream ends mid-message.
pub async fn read_message<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    reader
        .read_exact(&mut len_buf)
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_MESSAGE_SIZE {
        return Err(Error::MalformedFrame(format!(
            "message too large: {len} bytes (max {MAX_MESSAGE_SIZE})"
        )));
    }

    let mut payload = vec![0u8; len];
    reader
        .read_exact(&mut payload)
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    Ok(payload)
}

/// Write one complete message to an async writer and flush it.
pub async fn write_message<W: AsyncWrite + Unpin>(writer: &mut W, payload: &[u8]) -> Result<()> {
    if payload.len() > MAX_MESSAGE_SIZE {
        return Err(Error::MalformedFrame(format!(
            "message too large: {} bytes (max {MAX_MESSAGE_SIZE})",
            payload.len()
        )));
    }

    writer
        .write_all(&(payload.len() as u32).to_be_bytes())
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    writer
        .write_all(payload)
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    writer
        .flush()
        .await
        .map_err(|e| Error::Network(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_roundtrip() {
        let original = b"Wsome clipboard text";

        let mut buffer = Vec::new();
        write_message(&mut buffer, original).await.unwrap();

        let mut cursor = Cursor::new(buffer);
        assert_eq!(read_message(&mut cursor).await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_empty_message() {
        let mut buffer = Vec::new();
        write_message(&mut buffer, b"").await.unwrap();

        let mut cursor = Cursor::new(buffer);
        assert_eq!(read_message(&mut cursor).await.unwrap(), b"");
    }

    #[tokio::test]
    async fn test_oversize_message_rejected_on_write() {
        let payload = vec![0u8; MAX_MESSAGE_SIZE + 1];
        let mut buffer = Vec::new();
        assert!(write_message(&mut buffer, &payload).await.is_err());
    }

    #[tokio::test]
    async fn test_oversize_length_rejected_on_read() {
        let mut bytes = ((MAX_MESSAGE_SIZE + 1) as u32).to_be_bytes().to_vec();
        bytes.extend_from_slice(b"doesn't matter");

        let mut cursor = Cursor::new(bytes);
        assert!(read_message(&mut cursor).await.is_err());
    }

    #[tokio::test]
    async fn test_partial_reads_reassemble() {
        // The transport may deliver the prefix and payload in fragments
        let mut reader = tokio_test::io::Builder::new()
            .read(&[0, 0])
            .read(&[0, 6])
            .read(b"Vhe")
            .read(b"llo")
            .build();

        assert_eq!(read_message(&mut reader).await.unwrap(), b"Vhello");
    }

    #[tokio::test]
    async fn test_truncated_stream_errors() {
        let mut reader = tokio_test::io::Builder::new()
            .read(&[0, 0, 0, 10])
            .read(b"short")
            .build();

        assert!(read_message(&mut reader).await.is_err());
    }
}
