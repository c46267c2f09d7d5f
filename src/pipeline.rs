//! Batch submission pipeline.
//!
//! Consumes a lazy line source, groups decoded records into capacity-bounded
//! batches, and sends each batch as one `BATCH` frame, waiting for exactly one
//! reply before the next send. A final empty `FIN` frame marks
//! end-of-submission.
//!
//! The pipeline never retries: a rejected batch or a transport failure aborts
//! the remaining batches and surfaces to the caller.

use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;

use crate::codec::{encode_batch, Record};
use crate::error::{DrawlineError, Result};
use crate::protocol::FrameType;
use crate::transport::Channel;

/// Outcome of a completed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionSummary {
    /// Records sent across all batches.
    pub records: usize,
    /// `BATCH` frames sent.
    pub batches: usize,
}

/// Groups records into batches and drives them through a channel.
pub struct BatchPipeline<'a, S> {
    channel: &'a mut Channel<S>,
    owner_id: String,
    capacity: usize,
    cancel: CancellationToken,
}

impl<'a, S: AsyncRead + AsyncWrite + Unpin> BatchPipeline<'a, S> {
    /// Create a pipeline sending batches of at most `capacity` records.
    ///
    /// A capacity of zero is treated as one.
    pub fn new(
        channel: &'a mut Channel<S>,
        owner_id: impl Into<String>,
        capacity: usize,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            channel,
            owner_id: owner_id.into(),
            capacity: capacity.max(1),
            cancel,
        }
    }

    /// Drain `lines`, sending full batches as they fill and any remainder at
    /// the end, then send `FIN`.
    ///
    /// The cancellation token is polled immediately before each line is
    /// consumed; once it fires the pipeline stops with
    /// [`DrawlineError::Cancelled`] and no `FIN` is sent. A batch send already
    /// in flight runs to its normal outcome first.
    pub async fn run<I>(&mut self, lines: I) -> Result<SubmissionSummary>
    where
        I: IntoIterator<Item = String>,
    {
        let mut summary = SubmissionSummary {
            records: 0,
            batches: 0,
        };
        let mut batch: Vec<Record> = Vec::with_capacity(self.capacity);
        let mut lines = lines.into_iter();

        loop {
            if self.cancel.is_cancelled() {
                return Err(DrawlineError::Cancelled);
            }
            let Some(line) = lines.next() else {
                break;
            };
            batch.push(Record::from_line(&line, &self.owner_id)?);
            if batch.len() == self.capacity {
                self.send_batch(&batch).await?;
                summary.batches += 1;
                summary.records += batch.len();
                batch.clear();
            }
        }

        if !batch.is_empty() {
            self.send_batch(&batch).await?;
            summary.batches += 1;
            summary.records += batch.len();
        }

        self.channel.send_frame(FrameType::Fin, b"").await?;
        tracing::debug!(
            records = summary.records,
            batches = summary.batches,
            "submission finished"
        );
        Ok(summary)
    }

    /// Send one batch and wait for its single reply.
    ///
    /// `ACK` means accepted. `NACK` means the aggregator rejected the batch;
    /// this is surfaced as [`DrawlineError::BatchRejected`] and is not retried
    /// here. Anything else is a protocol violation.
    pub async fn send_batch(&mut self, batch: &[Record]) -> Result<()> {
        let payload = encode_batch(batch);
        self.channel.send_frame(FrameType::Batch, &payload).await?;

        let reply = self.channel.recv().await?;
        match reply.frame_type() {
            Some(FrameType::Ack) => Ok(()),
            Some(FrameType::Nack) => Err(DrawlineError::BatchRejected),
            _ => Err(DrawlineError::Protocol(format!(
                "unexpected {} reply to BATCH",
                reply.tag
            ))),
        }
    }
}
