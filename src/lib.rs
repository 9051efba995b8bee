//! # framesock - Blocking-style request/response over nonblocking sockets
//!
//! `framesock` hides nonblocking socket I/O behind a small blocking API:
//! connect, send a message, get the response back. Messages are delimited
//! on the wire by a configurable trailing separator (`\r\n` by default).
//!
//! ## Features
//!
//! - **TCP, Unix-domain and UDP** transports behind one [`Transport`] trait
//! - **Idempotent connect/disconnect** with observable counters
//! - **Automatic reconnect** on the next call after any failure
//! - **Bounded waits** for connect and response, driven by `poll(2)`
//! - **Echo servers** in [`server`] for exercising clients in tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use framesock::{Config, TcpOptions, TcpSocket};
//!
//! let config = Config::new().with_timeout_secs(1.0);
//! let mut socket = TcpSocket::tcp(TcpOptions::new("127.0.0.1", 2500), config);
//! let response = socket.send_msg("hello")?;
//! assert_eq!(&response[..], b"hello\r\n");
//! # Ok::<(), framesock::Error>(())
//! ```

pub mod codec;
pub mod config;
pub mod connection;
pub mod error;
pub mod server;
pub mod transport;

pub use codec::{Framer, Separator, CRLF};
pub use config::{Config, TcpOptions, UdpOptions, UnixOptions, DEFAULT_CHUNK_SIZE, DEFAULT_TIMEOUT};
pub use connection::{Connection, ConnectionState, TcpSocket, UdpSocket, UnixSocket};
pub use error::{Error, Result};
pub use transport::{Endpoint, IoOutcome, TcpTransport, Transport, UdpTransport, UnixTransport};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn test_public_types_are_send() {
        assert_send::<Error>();
        assert_send::<Config>();
        assert_send::<Separator>();
        assert_send::<ConnectionState>();
        assert_send::<TcpSocket>();
        assert_send::<UnixSocket>();
        assert_send::<UdpSocket>();
    }

    #[test]
    fn test_public_types_are_sync() {
        assert_sync::<Error>();
        assert_sync::<Config>();
        assert_sync::<Separator>();
        assert_sync::<ConnectionState>();
        assert_sync::<Endpoint>();
    }
}
