//! Connection lifecycle and the send/receive retry algorithm.
//!
//! This module provides [`Connection`], the blocking-looking client built on
//! top of a nonblocking [`Transport`](crate::transport::Transport).
//!
//! ## Connection Lifecycle
//!
//! 1. **Disconnected** - Initial state; no handle is open
//! 2. **Connected** - After a successful `connect` (explicit or from `send_msg`)
//! 3. **Disconnected** - After `disconnect` or a transport-fatal error
//!
//! A disconnected connection is reusable: the next `send_msg` reconnects.
//!
//! ## Example
//!
//! ```rust,no_run
//! use framesock::{Config, TcpOptions, TcpSocket};
//!
//! let mut socket = TcpSocket::tcp(TcpOptions::new("127.0.0.1", 2500), Config::new());
//! let response = socket.send_msg("hello")?;
//! assert_eq!(&response[..], b"hello\r\n");
//! socket.disconnect();
//! # Ok::<(), framesock::Error>(())
//! ```

mod state;

pub use state::ConnectionState;

#[allow(clippy::module_inception)]
mod connection;

pub use connection::{Connection, TcpSocket, UdpSocket, UnixSocket};
