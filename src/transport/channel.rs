//! Reliable channel - full-message send and receive over a byte stream.
//!
//! Wraps any `AsyncRead + AsyncWrite` stream and guarantees:
//!
//! - `send` transmits every byte, looping over partial writes; a write that
//!   makes zero progress is fatal
//! - `recv` returns exactly one decoded frame per call
//!
//! The read half sits behind a persistent buffer, so bytes that arrive ahead
//! of a `recv` call are never lost between frames.

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf, WriteHalf};
use tokio::net::TcpStream;

use crate::error::{DrawlineError, Result};
use crate::protocol::{encode_frame, read_frame, Frame, FrameType};

/// Channel over a TCP stream (the production transport).
pub type TcpChannel = Channel<TcpStream>;

/// Reliable full-message channel over a raw byte stream.
///
/// Owns its stream exclusively; replacing a broken connection means dropping
/// the whole channel and building a new one around a fresh stream.
pub struct Channel<S> {
    reader: BufReader<ReadHalf<S>>,
    writer: WriteHalf<S>,
}

impl<S: AsyncRead + AsyncWrite + Unpin> Channel<S> {
    /// Wrap a connected stream.
    pub fn new(stream: S) -> Self {
        let (read_half, write_half) = tokio::io::split(stream);
        Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        }
    }

    /// Transmit all of `data`.
    ///
    /// Loops until the transport has accepted every byte. A write that
    /// reports zero progress fails with [`DrawlineError::ConnectionClosed`];
    /// any other write failure propagates as an I/O error.
    pub async fn send(&mut self, data: &[u8]) -> Result<()> {
        let mut sent = 0;
        while sent < data.len() {
            let n = self.writer.write(&data[sent..]).await?;
            if n == 0 {
                return Err(DrawlineError::ConnectionClosed);
            }
            sent += n;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Encode and transmit one frame.
    pub async fn send_frame(&mut self, frame_type: FrameType, payload: &[u8]) -> Result<()> {
        self.send(&encode_frame(frame_type, payload)).await
    }

    /// Receive exactly one frame.
    pub async fn recv(&mut self) -> Result<Frame> {
        read_frame(&mut self.reader).await
    }

    /// Shut down the write side, releasing the transport.
    pub async fn close(&mut self) -> Result<()> {
        self.writer.shutdown().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use tokio::io::{duplex, AsyncRead, AsyncWrite, ReadBuf};

    use super::*;

    /// Write side that accepts at most `chunk` bytes per call.
    struct Trickle<S> {
        inner: S,
        chunk: usize,
    }

    impl<S: AsyncRead + Unpin> AsyncRead for Trickle<S> {
        fn poll_read(
            mut self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            Pin::new(&mut self.inner).poll_read(cx, buf)
        }
    }

    impl<S: AsyncWrite + Unpin> AsyncWrite for Trickle<S> {
        fn poll_write(
            mut self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            let n = buf.len().min(self.chunk);
            Pin::new(&mut self.inner).poll_write(cx, &buf[..n])
        }

        fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Pin::new(&mut self.inner).poll_flush(cx)
        }

        fn poll_shutdown(
            mut self: Pin<&mut Self>,
            cx: &mut Context<'_>,
        ) -> Poll<std::io::Result<()>> {
            Pin::new(&mut self.inner).poll_shutdown(cx)
        }
    }

    /// Stream whose writes always report zero progress.
    struct DeadEnd;

    impl AsyncRead for DeadEnd {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    impl AsyncWrite for DeadEnd {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            Poll::Ready(Ok(0))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_send_and_recv_one_frame() {
        let (left, right) = duplex(1024);
        let mut sender = Channel::new(left);
        let mut receiver = Channel::new(right);

        sender
            .send_frame(FrameType::GetWinners, b"7")
            .await
            .unwrap();

        let frame = receiver.recv().await.unwrap();
        assert_eq!(frame.frame_type(), Some(FrameType::GetWinners));
        assert_eq!(frame.payload(), b"7");
    }

    #[tokio::test]
    async fn test_short_writing_transport_still_delivers_whole_frames() {
        let (left, right) = duplex(1024);
        let mut sender = Channel::new(Trickle {
            inner: left,
            chunk: 3,
        });
        let mut receiver = Channel::new(right);

        let payload = b"Jane,Doe,30000001,1990-05-17,1234\n";
        sender.send_frame(FrameType::Batch, payload).await.unwrap();

        let frame = receiver.recv().await.unwrap();
        assert_eq!(frame.frame_type(), Some(FrameType::Batch));
        assert_eq!(frame.payload(), payload);
    }

    #[tokio::test]
    async fn test_zero_progress_write_is_connection_closed() {
        let mut channel = Channel::new(DeadEnd);
        let err = channel.send(b"4:ACK:").await.unwrap_err();
        assert!(matches!(err, DrawlineError::ConnectionClosed));
    }

    #[tokio::test]
    async fn test_recv_buffers_survive_between_frames() {
        let (left, right) = duplex(1024);
        let mut sender = Channel::new(left);
        let mut receiver = Channel::new(right);

        // Both frames land in the receiver's buffer in one burst.
        let mut burst = encode_frame(FrameType::Ack, b"");
        burst.extend_from_slice(&encode_frame(FrameType::Winners, b"5,9"));
        sender.send(&burst).await.unwrap();

        let first = receiver.recv().await.unwrap();
        let second = receiver.recv().await.unwrap();
        assert_eq!(first.frame_type(), Some(FrameType::Ack));
        assert_eq!(second.frame_type(), Some(FrameType::Winners));
        assert_eq!(second.payload(), b"5,9");
    }

    #[tokio::test]
    async fn test_recv_on_closed_stream_is_frame_error() {
        let (left, right) = duplex(64);
        drop(left);
        let mut receiver = Channel::new(right);
        let err = receiver.recv().await.unwrap_err();
        assert!(matches!(err, DrawlineError::Frame(_)));
    }

    #[tokio::test]
    async fn test_recv_propagates_garbage_as_frame_error() {
        let (left, right) = duplex(64);
        let mut sender = Channel::new(left);
        let mut receiver = Channel::new(right);

        sender.send(b"not-a-length:ACK:").await.unwrap();
        let err = receiver.recv().await.unwrap_err();
        assert!(matches!(err, DrawlineError::Frame(_)));
    }

    #[tokio::test]
    async fn test_send_after_close_fails() {
        let (left, _right) = duplex(64);
        let mut channel = Channel::new(left);
        channel.close().await.unwrap();
        let err = channel.send(b"4:ACK:").await.unwrap_err();
        assert!(err.is_transport(), "got {err:?}");
    }
}
