//! Error types for framed socket operations.
//!
//! Every failure a [`Connection`](crate::Connection) can surface is one of
//! these variants. The variant decides the cleanup policy: transport-fatal
//! conditions force a disconnect, timeouts carry the configured duration.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for socket operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while connecting, sending or receiving.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Connect was still in progress when the timeout elapsed.
    #[error("Connect timed out, timeout is set to {} seconds", .timeout.as_secs_f64())]
    ConnectTimeout {
        /// Configured timeout.
        timeout: Duration,
    },

    /// The peer actively refused the connection.
    #[error("Connection refused: {0}")]
    ConnectRefused(String),

    /// The OS rejected the connection attempt for another reason.
    #[error("Connect failed: {0}")]
    ConnectFailed(String),

    /// The target address could not be resolved.
    #[error("Address resolution failed: {0}")]
    AddressResolution(String),

    /// No complete response arrived within the timeout.
    #[error("No response in {} seconds", .timeout.as_secs_f64())]
    ResponseTimeout {
        /// Configured timeout.
        timeout: Duration,
    },

    /// The peer closed the connection (end of stream).
    #[error("Peer closed the connection")]
    PeerClosed,

    /// Connection reset or aborted by the peer.
    #[error("Connection reset by peer: {0}")]
    ConnectionReset(String),

    /// Write to a connection the peer already shut down.
    #[error("Broken pipe: {0}")]
    BrokenPipe(String),

    /// Any other I/O failure.
    #[error("I/O error: {0}")]
    Io(String),
}

impl Error {
    /// Classify an error raised while establishing a connection.
    #[must_use]
    pub fn from_connect_io(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => Error::ConnectRefused(err.to_string()),
            _ => Error::ConnectFailed(err.to_string()),
        }
    }

    /// Check if this is a connect or response timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::ConnectTimeout { .. } | Error::ResponseTimeout { .. }
        )
    }

    /// Check if the peer went away.
    ///
    /// These are the transport-fatal conditions after which the connection
    /// is disconnected before the error reaches the caller.
    #[must_use]
    pub const fn is_peer_failure(&self) -> bool {
        matches!(
            self,
            Error::PeerClosed
                | Error::ConnectionReset(_)
                | Error::BrokenPipe(_)
                | Error::ConnectRefused(_)
        )
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted => {
                Error::ConnectionReset(err.to_string())
            }
            io::ErrorKind::BrokenPipe => Error::BrokenPipe(err.to_string()),
            io::ErrorKind::ConnectionRefused => Error::ConnectRefused(err.to_string()),
            io::ErrorKind::UnexpectedEof => Error::PeerClosed,
            _ => Error::Io(err.to_string()),
        }
    }
}
