//! Frame struct and the closed set of frame types.
//!
//! A frame is one length-delimited, type-tagged unit of wire communication.
//! Payloads use `bytes::Bytes` for cheap sharing.
//!
//! # Example
//!
//! ```
//! use drawline_client::protocol::{Frame, FrameType};
//!
//! let frame = Frame::new(FrameType::Winners, "5,9");
//! assert_eq!(frame.tag, "WINNERS");
//! assert_eq!(frame.frame_type(), Some(FrameType::Winners));
//! assert_eq!(frame.payload(), b"5,9");
//! ```

use std::fmt;

use bytes::Bytes;

use crate::error::{DrawlineError, Result};

/// The closed set of frame type tags.
///
/// Tags are case-sensitive and uppercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameType {
    /// Positive acknowledgement.
    Ack,
    /// Negative acknowledgement.
    Nack,
    /// End-of-submission marker.
    Fin,
    /// Winners query; payload is the owner id.
    GetWinners,
    /// Batch of record lines.
    Batch,
    /// Winners result; payload is a comma-joined identifier list.
    Winners,
}

impl FrameType {
    /// Wire tag for this frame type.
    pub fn as_tag(&self) -> &'static str {
        match self {
            FrameType::Ack => "ACK",
            FrameType::Nack => "NACK",
            FrameType::Fin => "FIN",
            FrameType::GetWinners => "GET_WINNERS",
            FrameType::Batch => "BATCH",
            FrameType::Winners => "WINNERS",
        }
    }

    /// Parse a wire tag. Returns `None` for tags outside the closed set.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ACK" => Some(FrameType::Ack),
            "NACK" => Some(FrameType::Nack),
            "FIN" => Some(FrameType::Fin),
            "GET_WINNERS" => Some(FrameType::GetWinners),
            "BATCH" => Some(FrameType::Batch),
            "WINNERS" => Some(FrameType::Winners),
            _ => None,
        }
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// A complete protocol frame.
///
/// The tag is kept exactly as read off the wire: the frame codec does not
/// validate membership in the closed set. State machines map it with
/// [`Frame::frame_type`] and decide what an unknown tag means for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Type tag as it appeared on the wire.
    pub tag: String,
    /// Payload bytes (cheaply cloneable via `bytes::Bytes`).
    pub payload: Bytes,
}

impl Frame {
    /// Create a frame with a tag from the closed set.
    pub fn new(frame_type: FrameType, payload: impl Into<Bytes>) -> Self {
        Self {
            tag: frame_type.as_tag().to_string(),
            payload: payload.into(),
        }
    }

    /// Create a frame from a raw tag and payload, as the decoder does.
    pub fn from_parts(tag: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            tag: tag.into(),
            payload: payload.into(),
        }
    }

    /// Map the raw tag into the closed set, if it belongs to it.
    #[inline]
    pub fn frame_type(&self) -> Option<FrameType> {
        FrameType::from_tag(&self.tag)
    }

    /// Get a reference to the payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Get the payload length in bytes.
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// View the payload as text.
    ///
    /// Fails with a frame error when the payload is not valid UTF-8.
    pub fn payload_str(&self) -> Result<&str> {
        std::str::from_utf8(&self.payload)
            .map_err(|_| DrawlineError::Frame(format!("{} payload is not valid UTF-8", self.tag)))
    }

    /// Check if this is an `ACK`.
    #[inline]
    pub fn is_ack(&self) -> bool {
        self.frame_type() == Some(FrameType::Ack)
    }

    /// Check if this is a `NACK`.
    #[inline]
    pub fn is_nack(&self) -> bool {
        self.frame_type() == Some(FrameType::Nack)
    }

    /// Check if this is a `WINNERS` result.
    #[inline]
    pub fn is_winners(&self) -> bool {
        self.frame_type() == Some(FrameType::Winners)
    }
}
