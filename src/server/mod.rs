//! Echo servers for exercising clients in tests and demos.
//!
//! These are test fixtures, not production servers. Each one runs on a
//! background thread, echoes every framed message back unmodified after a
//! short delay, and stops when its [`ShutdownHandle`] fires or the server
//! value is dropped.
//!
//! Stream servers close the connection after echoing the
//! [`CRASH_SENTINEL`] message, which lets tests exercise a peer that
//! disappears mid-session.

mod stream;
mod udp;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use bytes::Bytes;

use crate::codec::Separator;

pub use stream::{TcpEchoServer, UnixEchoServer};
pub use udp::UdpEchoServer;

/// Message content (separator removed) that makes a stream server hang up.
pub const CRASH_SENTINEL: &[u8] = b"simulate_crash";

/// Bytes read per call by the servers.
const SERVER_CHUNK_SIZE: usize = 16 * 1024;

/// Cancellation flag shared by a server and its worker threads.
///
/// Workers check it between accept/read iterations, so a stop takes effect
/// within one poll interval.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle(Arc<AtomicBool>);

impl ShutdownHandle {
    /// Create an untriggered handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown.
    pub fn shutdown(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Check if shutdown was requested.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Echo server behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoOptions {
    /// Separator that ends a message. `None` echoes each read as it arrives.
    ///
    /// Default: `\r\n`
    pub separator: Option<Separator>,

    /// Delay before each echo.
    ///
    /// Default: 100 µs
    pub sleep_time: Duration,

    /// How often idle workers check for shutdown.
    ///
    /// Default: 20 ms
    pub poll_interval: Duration,
}

impl Default for EchoOptions {
    fn default() -> Self {
        Self {
            separator: Some(Separator::crlf()),
            sleep_time: Duration::from_micros(100),
            poll_interval: Duration::from_millis(20),
        }
    }
}

impl EchoOptions {
    /// Create options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the separator. An empty separator turns framing off.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<Bytes>) -> Self {
        self.separator = Separator::new(separator);
        self
    }

    /// Echo each read immediately, without framing.
    #[must_use]
    pub fn without_separator(mut self) -> Self {
        self.separator = None;
        self
    }

    /// Set the delay before each echo. Zero selects the default.
    #[must_use]
    pub fn with_sleep_time(mut self, sleep_time: Duration) -> Self {
        if !sleep_time.is_zero() {
            self.sleep_time = sleep_time;
        }
        self
    }
}

/// A background server thread plus its cancellation flag.
#[derive(Debug)]
struct ServerThread {
    shutdown: ShutdownHandle,
    thread: Option<JoinHandle<()>>,
}

impl ServerThread {
    fn spawn(shutdown: ShutdownHandle, run: impl FnOnce() + Send + 'static) -> std::io::Result<Self> {
        let thread = std::thread::Builder::new()
            .name("echo-server".into())
            .spawn(run)?;
        Ok(Self {
            shutdown,
            thread: Some(thread),
        })
    }

    fn stop(&mut self) {
        self.shutdown.shutdown();
        if let Some(thread) = self.thread.take() {
            // A panicking worker already reported itself.
            let _ = thread.join();
        }
    }
}

impl Drop for ServerThread {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_handle_is_shared() {
        let handle = ShutdownHandle::new();
        let clone = handle.clone();
        assert!(!clone.is_shutdown());
        handle.shutdown();
        assert!(clone.is_shutdown());
    }

    #[test]
    fn test_echo_options_default() {
        let options = EchoOptions::default();
        assert_eq!(options.separator, Some(Separator::crlf()));
        assert_eq!(options.sleep_time, Duration::from_micros(100));
    }

    #[test]
    fn test_echo_options_builder() {
        let options = EchoOptions::new()
            .with_separator(&b"zzz"[..])
            .with_sleep_time(Duration::ZERO);
        assert_eq!(options.separator.as_ref().map(Separator::as_bytes), Some(&b"zzz"[..]));
        assert_eq!(options.sleep_time, Duration::from_micros(100));
        assert!(EchoOptions::new().without_separator().separator.is_none());
    }
}
