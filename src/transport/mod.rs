//! Transports: the nonblocking I/O primitive under a [`Connection`].
//!
//! A [`Transport`] knows how to open its handle and how to move bytes
//! without blocking. Everything above it (framing, retries, timeouts,
//! bookkeeping) lives in [`Connection`] and is shared by all variants.
//!
//! The socket variants are one [`SocketTransport`] each, differing only in
//! the [`Dialer`] that opens the handle.
//!
//! | Transport          | Handle          | Connect                         |
//! |--------------------|-----------------|---------------------------------|
//! | [`TcpTransport`]   | stream socket   | nonblocking, bounded by timeout |
//! | [`UnixTransport`]  | stream socket   | nonblocking, bounded by timeout |
//! | [`UdpTransport`]   | datagram socket | binds the default peer only     |
//!
//! [`Connection`]: crate::Connection

mod handle;
pub(crate) mod ready;
mod socket;
mod tcp;
mod udp;
mod unix;

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Result;

pub use handle::{SocketHandle, SocketKind};
pub use socket::{Dialer, SocketTransport};
pub use tcp::{TcpDialer, TcpTransport};
pub use udp::{UdpDialer, UdpTransport};
pub use unix::{UnixDialer, UnixTransport};

/// Outcome of a single nonblocking read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOutcome {
    /// This many bytes were moved.
    Transferred(usize),
    /// The call would have blocked; wait for readiness and retry.
    WouldBlock,
    /// The peer closed its end of the stream.
    Closed,
}

/// Human-readable description of where a transport connects to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Endpoint {
    /// `tcp://host:port`
    Tcp {
        /// Hostname or IP address.
        host: String,
        /// Port number.
        port: u16,
    },
    /// `unix://path`
    Unix {
        /// Socket path.
        path: PathBuf,
    },
    /// `udp://host:port`
    Udp {
        /// Hostname or IP address.
        host: String,
        /// Port number.
        port: u16,
    },
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Tcp { host, port } => write!(f, "tcp://{host}:{port}"),
            Endpoint::Unix { path } => write!(f, "unix://{}", path.display()),
            Endpoint::Udp { host, port } => write!(f, "udp://{host}:{port}"),
        }
    }
}

/// The capability set a [`Connection`](crate::Connection) drives.
///
/// Implementations own at most one OS handle. `close` must be safe to call
/// at any time, including on a handle that was never opened.
pub trait Transport {
    /// Where this transport connects to.
    fn endpoint(&self) -> &Endpoint;

    /// Open a fresh handle and establish the connection.
    ///
    /// Stream transports wait up to `timeout` for an in-progress connect.
    /// On failure any partially created handle is released.
    ///
    /// # Errors
    ///
    /// [`Error::ConnectTimeout`](crate::Error::ConnectTimeout) when the
    /// connect did not complete in time, otherwise a connect-class error.
    fn begin_connect(&mut self, timeout: Duration) -> Result<()>;

    /// Check if the handle is open.
    fn is_open(&self) -> bool;

    /// Release the handle. Best effort, never fails.
    fn close(&mut self);

    /// Attempt one nonblocking write of `buf`.
    ///
    /// # Errors
    ///
    /// Any OS error other than would-block.
    fn try_write(&mut self, buf: &[u8]) -> io::Result<IoOutcome>;

    /// Attempt one nonblocking read into `buf`.
    ///
    /// # Errors
    ///
    /// Any OS error other than would-block.
    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<IoOutcome>;

    /// Block until the handle is writable. No timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the readiness wait itself fails.
    fn wait_writable(&mut self) -> io::Result<()>;

    /// Block until the handle is readable or `timeout` elapses.
    ///
    /// Returns `false` on timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the readiness wait itself fails.
    fn wait_readable(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Smallest read buffer that cannot truncate a message.
    ///
    /// Datagram transports need room for a whole datagram per read.
    fn min_read_size(&self) -> usize {
        0
    }
}
