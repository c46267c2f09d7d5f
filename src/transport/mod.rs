//! Transport module - reliable channel and connection opening.
//!
//! Provides:
//! - [`Channel`]: full-message send/receive over any byte stream
//! - [`Connector`]: the seam through which connections are (re)opened

mod channel;
mod connector;

pub use channel::{Channel, TcpChannel};
pub use connector::{Connector, TcpConnector};
