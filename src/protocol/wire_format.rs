//! Wire format encoding and decoding.
//!
//! One frame on the wire:
//!
//! ```text
//! <decimal-length>:<type-tag>:<payload-bytes>
//! ```
//!
//! where `decimal-length` is the byte length of `<type-tag>:<payload-bytes>`.
//! Both the length prefix and the type tag end at a `':'`; the payload runs to
//! the declared length and may itself contain `':'`.

use bytes::Bytes;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use super::frame::{Frame, FrameType};
use crate::error::{DrawlineError, Result};

/// Maximum accepted frame body length (tag + `':'` + payload), 16 MiB.
///
/// The protocol itself places no bound on the declared length; the cap stops a
/// corrupt length prefix from driving an unbounded allocation.
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Encode one frame as `<decimal-length>:<type-tag>:<payload>`.
///
/// The declared length is exactly the byte length of `<type-tag>:<payload>`.
///
/// # Example
///
/// ```
/// use drawline_client::protocol::{encode_frame, FrameType};
///
/// let bytes = encode_frame(FrameType::Ack, b"");
/// assert_eq!(&bytes[..], b"4:ACK:");
///
/// let bytes = encode_frame(FrameType::Winners, b"5,9");
/// assert_eq!(&bytes[..], b"11:WINNERS:5,9");
/// ```
pub fn encode_frame(frame_type: FrameType, payload: &[u8]) -> Vec<u8> {
    let tag = frame_type.as_tag();
    let body_len = tag.len() + 1 + payload.len();
    let prefix = body_len.to_string();

    let mut buf = Vec::with_capacity(prefix.len() + 1 + body_len);
    buf.extend_from_slice(prefix.as_bytes());
    buf.push(b':');
    buf.extend_from_slice(tag.as_bytes());
    buf.push(b':');
    buf.extend_from_slice(payload);
    buf
}

/// Decode one frame from a buffered reader.
///
/// Reads the decimal length up to the first `':'`, then exactly that many
/// bytes, then splits them at the first `':'` into tag and payload. The tag is
/// not checked against the closed set; that is the caller's concern.
///
/// Fails with a frame error when the length prefix is non-numeric or
/// oversized, when the stream ends before the frame is complete, or when the
/// body carries no tag delimiter. Other I/O failures propagate as channel
/// errors.
pub async fn read_frame<R>(reader: &mut R) -> Result<Frame>
where
    R: AsyncBufRead + Unpin,
{
    let mut prefix = Vec::with_capacity(16);
    let n = reader.read_until(b':', &mut prefix).await?;
    if n == 0 {
        return Err(DrawlineError::Frame(
            "stream closed before length prefix".to_string(),
        ));
    }
    if prefix.last() != Some(&b':') {
        return Err(DrawlineError::Frame(
            "stream closed inside length prefix".to_string(),
        ));
    }
    prefix.pop();

    let length = std::str::from_utf8(&prefix)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| {
            DrawlineError::Frame(format!(
                "invalid length prefix {:?}",
                String::from_utf8_lossy(&prefix)
            ))
        })?;
    if length > MAX_FRAME_SIZE {
        return Err(DrawlineError::Frame(format!(
            "frame of {length} bytes exceeds maximum {MAX_FRAME_SIZE}"
        )));
    }

    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            DrawlineError::Frame("stream closed inside frame body".to_string())
        } else {
            DrawlineError::Io(e)
        }
    })?;

    let sep = body
        .iter()
        .position(|&b| b == b':')
        .ok_or_else(|| DrawlineError::Frame("frame body has no type delimiter".to_string()))?;

    let mut body = Bytes::from(body);
    let payload = body.split_off(sep + 1);
    let tag = std::str::from_utf8(&body[..sep])
        .map_err(|_| DrawlineError::Frame("frame type tag is not valid UTF-8".to_string()))?
        .to_string();

    Ok(Frame::from_parts(tag, payload))
}
