//! # drawline-client
//!
//! Rust client SDK for the Drawline batch-submission protocol.
//!
//! This crate is the transport layer of a distributed draw: it delivers
//! batches of records to a remote aggregator over a persistent stream
//! connection, then polls the aggregator for the draw result once every
//! submitter has finished.
//!
//! ## Architecture
//!
//! - **Protocol** (`protocol`): length-prefixed, type-tagged text frames
//! - **Codec** (`codec`): record lines, batch payloads, winners payloads
//! - **Transport** (`transport`): full-message channel + connection opener seam
//! - **Pipeline** (`pipeline`): capacity-bounded batch submission
//! - **Poll** (`poll`): backoff-and-reconnect winners loop
//!
//! A client instance is a single logical task: sends, receives, and backoff
//! sleeps run sequentially, and cancellation is only observed at checkpoints,
//! never by interrupting I/O already in flight. No per-call timeout is imposed
//! beyond the transport's own; outside the poll loop's attempt bookkeeping, a
//! stalled remote can suspend the calling task indefinitely.
//!
//! ## Example
//!
//! ```ignore
//! use drawline_client::{
//!     BatchPipeline, CancellationToken, Channel, Connector, PollConfig, TcpConnector,
//!     WinnersPoll,
//! };
//!
//! #[tokio::main]
//! async fn main() -> drawline_client::Result<()> {
//!     let cancel = CancellationToken::new();
//!     let addr = "127.0.0.1:9090";
//!
//!     let mut channel = Channel::new(TcpConnector.connect(addr).await?);
//!     let lines: Vec<String> = std::fs::read_to_string("records.csv")?
//!         .lines()
//!         .map(str::to_string)
//!         .collect();
//!
//!     let summary = BatchPipeline::new(&mut channel, "7", 100, cancel.clone())
//!         .run(lines)
//!         .await?;
//!     println!("sent {} records in {} batches", summary.records, summary.batches);
//!
//!     let poll = WinnersPoll::new(channel, TcpConnector, addr, "7", cancel, PollConfig::default());
//!     let winners = poll.run().await?;
//!     println!("{} winners", winners.len());
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod error;
pub mod pipeline;
pub mod poll;
pub mod protocol;
pub mod transport;

pub use codec::{decode_winners, encode_batch, Record};
pub use error::{DrawlineError, Result};
pub use pipeline::{BatchPipeline, SubmissionSummary};
pub use poll::{PollConfig, WinnersPoll};
pub use protocol::{Frame, FrameType};
pub use transport::{Channel, Connector, TcpChannel, TcpConnector};

// Cancellation is created by the orchestration layer and only observed here;
// re-exported so callers need not depend on tokio-util directly.
pub use tokio_util::sync::CancellationToken;
