//! Transport opener seam.
//!
//! Connections are made on demand: once at startup by the orchestration
//! layer, and again by the winners poll on every reconnect attempt. Both go
//! through [`Connector`], so tests can substitute in-memory streams.

use std::future::Future;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

use crate::error::Result;

/// Opens a transport stream to a remote address.
pub trait Connector {
    /// Stream type produced by this connector.
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    /// Open a fresh stream to `addr`.
    fn connect(&self, addr: &str) -> impl Future<Output = Result<Self::Stream>> + Send;
}

/// TCP connector (the production implementation).
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self, addr: &str) -> Result<TcpStream> {
        Ok(TcpStream::connect(addr).await?)
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    #[tokio::test]
    async fn test_tcp_connector_dials() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let accept = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            sock.write_all(b"hi").await.unwrap();
        });

        let mut stream = TcpConnector.connect(&addr).await.unwrap();
        let mut buf = [0u8; 2];
        stream.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"hi");
        accept.await.unwrap();
    }

    #[tokio::test]
    async fn test_tcp_connector_refused() {
        // Port 1 is essentially never listening.
        let result = TcpConnector.connect("127.0.0.1:1").await;
        assert!(result.is_err());
    }
}
