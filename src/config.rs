//! Configuration for framed socket connections.
//!
//! [`Config`] covers what every transport shares (framing and timing).
//! Addressing lives in the per-transport option structs.

use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;

use crate::codec::{Framer, Separator};

/// Default connect/response timeout: 0.5 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

/// Default number of bytes moved per nonblocking read or write call.
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

/// Default host for TCP and UDP targets.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port for TCP and UDP targets.
pub const DEFAULT_PORT: u16 = 2000;

/// Default Unix-domain socket path.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/unix_socket";

/// Connection configuration shared by all transports.
///
/// Values are normalized as they are set: a zero timeout or chunk size
/// falls back to the default, and disabling the separator wins over any
/// separator configured before or after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    timeout: Duration,
    separator: Option<Separator>,
    separator_disabled: bool,
    chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            separator: Some(Separator::crlf()),
            separator_disabled: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Config {
    /// Create a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connect/response timeout.
    ///
    /// A zero duration is replaced by [`DEFAULT_TIMEOUT`].
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = if timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            timeout
        };
        self
    }

    /// Set the timeout in (fractional) seconds.
    ///
    /// Non-positive and non-finite values are replaced by [`DEFAULT_TIMEOUT`].
    #[must_use]
    pub fn with_timeout_secs(self, secs: f64) -> Self {
        match Duration::try_from_secs_f64(secs) {
            Ok(timeout) => self.with_timeout(timeout),
            Err(_) => self.with_timeout(Duration::ZERO),
        }
    }

    /// Set the message separator.
    ///
    /// An empty separator turns framing off.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<Bytes>) -> Self {
        self.separator = Separator::new(separator);
        self
    }

    /// Send and read messages verbatim, without any separator.
    #[must_use]
    pub fn without_separator(mut self) -> Self {
        self.separator_disabled = true;
        self
    }

    /// Set the number of bytes moved per nonblocking call.
    ///
    /// Zero is replaced by [`DEFAULT_CHUNK_SIZE`].
    #[must_use]
    pub const fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = if size == 0 { DEFAULT_CHUNK_SIZE } else { size };
        self
    }

    /// Get the connect/response timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the separator in effect, `None` when framing is off.
    #[must_use]
    pub fn separator(&self) -> Option<&Separator> {
        if self.separator_disabled {
            None
        } else {
            self.separator.as_ref()
        }
    }

    /// Get the chunk size.
    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Build the framer for this configuration.
    #[must_use]
    pub fn framer(&self) -> Framer {
        Framer::new(self.separator().cloned())
    }
}

/// TCP target address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpOptions {
    /// Hostname or IP address.
    ///
    /// Default: `127.0.0.1`
    pub host: String,

    /// Port number.
    ///
    /// Default: 2000
    pub port: u16,
}

impl Default for TcpOptions {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
        }
    }
}

impl TcpOptions {
    /// Create options for `host:port`. Port 0 selects [`DEFAULT_PORT`].
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::default().with_host(host).with_port(port)
    }

    /// Set the host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port. Port 0 selects [`DEFAULT_PORT`].
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = if port == 0 { DEFAULT_PORT } else { port };
        self
    }
}

/// UDP target address.
///
/// Same addressing rules as [`TcpOptions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdpOptions {
    /// Hostname or IP address.
    pub host: String,
    /// Port number.
    pub port: u16,
}

impl Default for UdpOptions {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
        }
    }
}

impl UdpOptions {
    /// Create options for `host:port`. Port 0 selects [`DEFAULT_PORT`].
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port: if port == 0 { DEFAULT_PORT } else { port },
        }
    }
}

/// Unix-domain socket target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnixOptions {
    /// Filesystem path of the socket.
    ///
    /// Default: `/tmp/unix_socket`
    pub path: PathBuf,
}

impl Default for UnixOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_SOCKET_PATH),
        }
    }
}

impl UnixOptions {
    /// Create options for the socket at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.timeout(), Duration::from_millis(500));
        assert_eq!(config.separator().map(Separator::as_bytes), Some(&b"\r\n"[..]));
        assert_eq!(config.chunk_size(), 16 * 1024);
    }

    #[test]
    fn test_non_positive_timeout_uses_default() {
        assert_eq!(Config::new().with_timeout(Duration::ZERO).timeout(), DEFAULT_TIMEOUT);
        assert_eq!(Config::new().with_timeout_secs(0.0).timeout(), DEFAULT_TIMEOUT);
        assert_eq!(Config::new().with_timeout_secs(-3.0).timeout(), DEFAULT_TIMEOUT);
        assert_eq!(Config::new().with_timeout_secs(f64::NAN).timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_custom_timeout() {
        let config = Config::new().with_timeout_secs(2.5);
        assert_eq!(config.timeout(), Duration::from_millis(2500));
    }

    #[test]
    fn test_custom_separator() {
        let config = Config::new().with_separator(&b"zzz"[..]);
        assert_eq!(config.separator().map(Separator::as_bytes), Some(&b"zzz"[..]));
    }

    #[test]
    fn test_disabled_separator_wins() {
        let before = Config::new().without_separator().with_separator(&b"\n"[..]);
        let after = Config::new().with_separator(&b"\n"[..]).without_separator();
        assert!(before.separator().is_none());
        assert!(after.separator().is_none());
    }

    #[test]
    fn test_empty_separator_disables_framing() {
        let config = Config::new().with_separator(Bytes::new());
        assert!(config.separator().is_none());
    }

    #[test]
    fn test_zero_chunk_size_uses_default() {
        assert_eq!(Config::new().with_chunk_size(0).chunk_size(), DEFAULT_CHUNK_SIZE);
        assert_eq!(Config::new().with_chunk_size(512).chunk_size(), 512);
    }

    #[test]
    fn test_tcp_options() {
        let opts = TcpOptions::default();
        assert_eq!(opts.host, "127.0.0.1");
        assert_eq!(opts.port, 2000);

        let opts = TcpOptions::new("localhost", 0);
        assert_eq!(opts.port, DEFAULT_PORT);
        assert_eq!(TcpOptions::new("localhost", 2500).port, 2500);
    }

    #[test]
    fn test_udp_options() {
        assert_eq!(UdpOptions::default().port, DEFAULT_PORT);
        assert_eq!(UdpOptions::new("::1", 0).port, DEFAULT_PORT);
    }

    #[test]
    fn test_unix_options_default_path() {
        assert_eq!(UnixOptions::default().path, PathBuf::from("/tmp/unix_socket"));
    }
}
