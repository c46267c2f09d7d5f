//! Winners poll loop.
//!
//! After submission, the aggregate result may depend on other submitters
//! finishing first. The client therefore polls: ask once, back off with a
//! doubling delay while the result is pending, and reconnect when the
//! transport drops, all bounded by a fixed attempt budget and preemptible by
//! cooperative cancellation.
//!
//! The ready sequence is two-step: the aggregator answers a `GET_WINNERS`
//! query with `ACK` and then exactly one `WINNERS` frame. While the draw is
//! still pending it answers `NACK`.

use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::codec::decode_winners;
use crate::error::{DrawlineError, Result};
use crate::protocol::FrameType;
use crate::transport::{Channel, Connector};

/// Tunables for the winners poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay before the second attempt; doubles on every backoff.
    pub initial_backoff: Duration,
    /// Maximum number of `GET_WINNERS` attempts before giving up.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_millis(200),
            max_attempts: 10,
        }
    }
}

/// Poll loop states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollState {
    Asking,
    BackingOff,
    Reconnecting,
}

/// Outcome of a single ask.
enum AskReply {
    NotReady,
    Winners(Vec<String>),
}

/// Polls the aggregator until the winners list is available.
///
/// Owns the channel for its whole run: on reconnect the broken handle is shut
/// down before a replacement is opened, so exactly one handle is live at any
/// time.
pub struct WinnersPoll<C: Connector> {
    channel: Channel<C::Stream>,
    connector: C,
    addr: String,
    owner_id: String,
    cancel: CancellationToken,
    config: PollConfig,
}

impl<C: Connector> WinnersPoll<C> {
    /// Create a poll over an already-connected channel.
    ///
    /// `connector` and `addr` are used for every reconnect attempt.
    pub fn new(
        channel: Channel<C::Stream>,
        connector: C,
        addr: impl Into<String>,
        owner_id: impl Into<String>,
        cancel: CancellationToken,
        config: PollConfig,
    ) -> Self {
        Self {
            channel,
            connector,
            addr: addr.into(),
            owner_id: owner_id.into(),
            cancel,
            config,
        }
    }

    /// Drive the poll to completion.
    ///
    /// Returns the decoded winner identifiers, or the first fatal error.
    /// Transport failures are not fatal here: they trigger a reconnect
    /// instead, consuming attempts from the same budget. Protocol violations
    /// and cancellation always surface.
    pub async fn run(mut self) -> Result<Vec<String>> {
        let mut state = PollState::Asking;
        let mut attempts = 0u32;
        let mut delay = self.config.initial_backoff;

        loop {
            if self.cancel.is_cancelled() {
                return Err(DrawlineError::Cancelled);
            }
            match state {
                PollState::Asking => {
                    if attempts >= self.config.max_attempts {
                        let _ = self.channel.close().await;
                        return Err(DrawlineError::PollExhausted(self.config.max_attempts));
                    }
                    attempts += 1;
                    match self.ask().await {
                        Ok(AskReply::Winners(winners)) => {
                            tracing::info!(count = winners.len(), "winners received");
                            let _ = self.channel.close().await;
                            return Ok(winners);
                        }
                        Ok(AskReply::NotReady) => {
                            if attempts >= self.config.max_attempts {
                                let _ = self.channel.close().await;
                                return Err(DrawlineError::PollExhausted(
                                    self.config.max_attempts,
                                ));
                            }
                            tracing::debug!(
                                attempt = attempts,
                                delay_ms = delay.as_millis() as u64,
                                "winners not ready, backing off"
                            );
                            state = PollState::BackingOff;
                        }
                        Err(e) if e.is_transport() => {
                            tracing::warn!(
                                attempt = attempts,
                                error = %e,
                                "transport failure while polling, reconnecting"
                            );
                            state = PollState::Reconnecting;
                        }
                        Err(e) => return Err(e),
                    }
                }
                PollState::BackingOff => {
                    sleep(delay).await;
                    delay = delay.saturating_mul(2);
                    state = PollState::Asking;
                }
                PollState::Reconnecting => {
                    let _ = self.channel.close().await;
                    match self.connector.connect(&self.addr).await {
                        Ok(stream) => {
                            self.channel = Channel::new(stream);
                            state = PollState::Asking;
                        }
                        Err(e) => {
                            tracing::warn!(addr = %self.addr, error = %e, "reconnect failed");
                            state = PollState::BackingOff;
                        }
                    }
                }
            }
        }
    }

    /// One `GET_WINNERS` exchange.
    ///
    /// `NACK` means the draw is still pending. `ACK` must be followed by
    /// exactly one `WINNERS` frame; any other sequence is a protocol
    /// violation.
    async fn ask(&mut self) -> Result<AskReply> {
        self.channel
            .send_frame(FrameType::GetWinners, self.owner_id.as_bytes())
            .await?;

        let reply = self.channel.recv().await?;
        match reply.frame_type() {
            Some(FrameType::Nack) => Ok(AskReply::NotReady),
            Some(FrameType::Ack) => {
                let next = self.channel.recv().await?;
                if next.is_winners() {
                    Ok(AskReply::Winners(decode_winners(next.payload_str()?)))
                } else {
                    Err(DrawlineError::Protocol(format!(
                        "expected WINNERS after ACK, got {}",
                        next.tag
                    )))
                }
            }
            _ => Err(DrawlineError::Protocol(format!(
                "unexpected {} reply to GET_WINNERS",
                reply.tag
            ))),
        }
    }
}
