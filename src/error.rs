//! Error types for drawline-client.

use thiserror::Error;

/// Main error type for all drawline operations.
#[derive(Debug, Error)]
pub enum DrawlineError {
    /// I/O error during socket read/write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed wire frame (bad length prefix, truncated body, missing delimiter).
    #[error("frame error: {0}")]
    Frame(String),

    /// A write made no progress; the peer is gone.
    #[error("connection closed")]
    ConnectionClosed,

    /// Frame type invalid for the current protocol state.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The aggregator answered a batch with `NACK`.
    #[error("batch rejected by aggregator")]
    BatchRejected,

    /// The winners poll ran out of attempts.
    #[error("winners not available after {0} attempts")]
    PollExhausted(u32),

    /// Cooperative cancellation was observed.
    #[error("operation cancelled")]
    Cancelled,

    /// A record line did not have the expected field count.
    #[error("invalid record line: {0}")]
    InvalidRecord(String),
}

impl DrawlineError {
    /// Whether this failure happened at the transport level.
    ///
    /// Transport failures are the only ones the winners poll answers with a
    /// reconnect; everything else surfaces to the caller unchanged.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DrawlineError::Io(_) | DrawlineError::Frame(_) | DrawlineError::ConnectionClosed
        )
    }
}

/// Result type alias using DrawlineError.
pub type Result<T> = std::result::Result<T, DrawlineError>;
