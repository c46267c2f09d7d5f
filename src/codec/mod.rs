//! Codec module - record and payload serialization.
//!
//! This module turns structured data into protocol payloads and back:
//!
//! - [`Record`] line encoding/decoding
//! - `BATCH` payload assembly
//! - `WINNERS` payload decoding

mod record;

pub use record::{decode_winners, encode_batch, Record, FIELD_DELIMITER, LINE_TERMINATOR};
