//! Protocol module - wire format, framing, and frame types.
//!
//! This module implements the length-prefixed text envelope:
//! - `<decimal-length>:<type-tag>:<payload>` encoding/decoding
//! - Frame struct with typed accessors
//! - The closed set of frame type tags

mod frame;
mod wire_format;

pub use frame::{Frame, FrameType};
pub use wire_format::{encode_frame, read_frame, MAX_FRAME_SIZE};
