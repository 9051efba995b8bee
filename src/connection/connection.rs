use bytes::{Bytes, BytesMut};
use tracing::{debug, info, warn};

use crate::codec::{Framer, Separator};
use crate::config::{Config, TcpOptions, UdpOptions, UnixOptions};
use crate::connection::ConnectionState;
use crate::error::{Error, Result};
use crate::transport::{Endpoint, IoOutcome, TcpTransport, Transport, UdpTransport, UnixTransport};

/// A request/response client over a nonblocking transport.
///
/// `Connection` hides the nonblocking mechanics behind blocking calls:
/// [`send_msg`](Self::send_msg) connects on demand, frames the message,
/// drains it to the transport and reads back one framed response.
///
/// A connection owns exactly one handle and is meant for a single caller.
/// Calls block the current thread while waiting for readiness.
///
/// ## Type Parameters
///
/// - `T`: The transport (e.g. [`TcpTransport`], [`UnixTransport`])
///
/// ## Example
///
/// ```rust,no_run
/// use framesock::{Config, UnixOptions, UnixSocket};
///
/// let mut socket = UnixSocket::unix(UnixOptions::new("/tmp/echo.sock"), Config::new());
/// for i in 0..10 {
///     let response = socket.send_msg(i.to_string())?;
///     println!("{:?}", response);
/// }
/// # Ok::<(), framesock::Error>(())
/// ```
#[derive(Debug)]
pub struct Connection<T> {
    transport: T,
    config: Config,
    framer: Framer,
    state: ConnectionState,
    connect_count: u64,
    disconnect_count: u64,
}

/// A [`Connection`] over TCP.
pub type TcpSocket = Connection<TcpTransport>;

/// A [`Connection`] over a Unix-domain stream socket.
pub type UnixSocket = Connection<UnixTransport>;

/// A [`Connection`] over UDP.
pub type UdpSocket = Connection<UdpTransport>;

impl<T> Connection<T> {
    /// Create a disconnected connection over `transport`.
    pub fn new(transport: T, config: Config) -> Self {
        Self {
            transport,
            framer: config.framer(),
            config,
            state: ConnectionState::Disconnected,
            connect_count: 0,
            disconnect_count: 0,
        }
    }

    /// Get the current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Check if the connection is established.
    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Number of Disconnected → Connected transitions so far.
    pub fn connect_count(&self) -> u64 {
        self.connect_count
    }

    /// Number of Connected → Disconnected transitions so far.
    ///
    /// Handles abandoned after an unclassified error are not counted.
    pub fn disconnect_count(&self) -> u64 {
        self.disconnect_count
    }

    /// Get the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the connect/response timeout.
    pub fn timeout(&self) -> std::time::Duration {
        self.config.timeout()
    }

    /// Get the separator in effect, if any.
    pub fn separator(&self) -> Option<&Separator> {
        self.framer.separator()
    }

    /// Get a reference to the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl TcpSocket {
    /// Create a TCP client for `options`.
    #[must_use]
    pub fn tcp(options: TcpOptions, config: Config) -> Self {
        Self::new(TcpTransport::new(options), config)
    }
}

impl UnixSocket {
    /// Create a Unix-domain client for `options`.
    #[must_use]
    pub fn unix(options: UnixOptions, config: Config) -> Self {
        Self::new(UnixTransport::new(options), config)
    }
}

impl UdpSocket {
    /// Create a UDP client for `options`.
    #[must_use]
    pub fn udp(options: UdpOptions, config: Config) -> Self {
        Self::new(UdpTransport::new(options), config)
    }
}

impl<T: Transport> Connection<T> {
    /// Where this connection connects to.
    pub fn endpoint(&self) -> &Endpoint {
        self.transport.endpoint()
    }

    /// Connect to the peer. Idempotent.
    ///
    /// Does nothing if already connected with an open handle.
    ///
    /// ## Errors
    ///
    /// - `Error::ConnectTimeout` if a stream connect did not finish in time
    /// - `Error::ConnectRefused` / `Error::ConnectFailed` if the OS rejected it
    /// - `Error::AddressResolution` if the target could not be resolved
    pub fn connect(&mut self) -> Result<()> {
        if self.state.is_connected() && self.transport.is_open() {
            return Ok(());
        }

        if let Err(err) = self.transport.begin_connect(self.config.timeout()) {
            self.transport.close();
            self.state = ConnectionState::Disconnected;
            debug!(endpoint = %self.transport.endpoint(), error = %err, "Connect failed");
            return Err(err);
        }

        self.state = ConnectionState::Connected;
        self.connect_count += 1;
        Ok(())
    }

    /// Disconnect from the peer. Idempotent and infallible.
    pub fn disconnect(&mut self) {
        if !self.state.is_connected() {
            return;
        }
        self.transport.close();
        self.state = ConnectionState::Disconnected;
        self.disconnect_count += 1;
        debug!(endpoint = %self.transport.endpoint(), "Socket successfully disconnected");
    }

    /// Send `message` and return the framed response.
    ///
    /// The separator is appended unless the message already ends with it.
    /// Connects first if needed, so after any failure the next call simply
    /// reconnects. The response is returned as read, separator included.
    ///
    /// Only connect and receive are bounded by the timeout. Waiting for a
    /// full send buffer to drain is not.
    ///
    /// With framing off an empty message is sent as one empty write: an
    /// empty datagram over UDP, nothing at all over a stream.
    ///
    /// ## Errors
    ///
    /// - Connect errors, see [`connect`](Self::connect)
    /// - `Error::ResponseTimeout` if no complete response arrived in time
    /// - `Error::PeerClosed`, `Error::ConnectionReset`, `Error::BrokenPipe`,
    ///   `Error::ConnectRefused` if the peer went away; the connection is
    ///   disconnected first
    /// - `Error::Io` for anything else; the handle is dropped
    pub fn send_msg(&mut self, message: impl AsRef<[u8]>) -> Result<Bytes> {
        let response = self.exchange(message.as_ref(), true)?;
        Ok(response.unwrap_or_default())
    }

    /// Send `message` without waiting for a response.
    ///
    /// ## Errors
    ///
    /// Same as [`send_msg`](Self::send_msg), minus the response timeout.
    pub fn send_only(&mut self, message: impl AsRef<[u8]>) -> Result<()> {
        self.exchange(message.as_ref(), false).map(|_| ())
    }

    fn exchange(&mut self, message: &[u8], want_response: bool) -> Result<Option<Bytes>> {
        let payload = self.framer.frame(message);

        let outcome = self.connect().and_then(|()| {
            debug!(endpoint = %self.transport.endpoint(), bytes = payload.len(), "Sending");
            self.send_all(&payload)?;
            if want_response {
                self.receive().map(Some)
            } else {
                Ok(None)
            }
        });

        outcome.map_err(|err| self.fail(err))
    }

    /// Write all of `payload`, waiting out backpressure.
    ///
    /// At least one write is always issued, so an empty payload still goes
    /// out as an empty datagram. The writable wait is unbounded: a peer that
    /// never drains stalls here.
    fn send_all(&mut self, payload: &[u8]) -> Result<()> {
        let chunk_size = self.config.chunk_size();
        let mut remaining = payload;

        loop {
            let end = remaining.len().min(chunk_size);
            match self.transport.try_write(&remaining[..end])? {
                IoOutcome::Transferred(n) => remaining = &remaining[n..],
                IoOutcome::WouldBlock => {
                    self.transport.wait_writable()?;
                    continue;
                }
                IoOutcome::Closed => return Err(Error::PeerClosed),
            }
            if remaining.is_empty() {
                return Ok(());
            }
        }
    }

    /// Read until the buffer holds a complete framed response.
    fn receive(&mut self) -> Result<Bytes> {
        let chunk_size = self
            .config
            .chunk_size()
            .max(self.transport.min_read_size());
        let mut chunk = vec![0u8; chunk_size];
        let mut response = BytesMut::new();

        loop {
            match self.transport.try_read(&mut chunk)? {
                IoOutcome::Transferred(n) => {
                    response.extend_from_slice(&chunk[..n]);
                    if self.framer.is_complete(&response) {
                        break;
                    }
                }
                IoOutcome::WouldBlock => {
                    let timeout = self.config.timeout();
                    if !self.transport.wait_readable(timeout)? {
                        warn!(
                            endpoint = %self.transport.endpoint(),
                            timeout = ?timeout,
                            "No response in time"
                        );
                        self.disconnect();
                        return Err(Error::ResponseTimeout { timeout });
                    }
                }
                IoOutcome::Closed => return Err(Error::PeerClosed),
            }
        }

        debug!(endpoint = %self.transport.endpoint(), bytes = response.len(), "Received");
        Ok(response.freeze())
    }

    /// Apply the cleanup policy for `err` and hand it back.
    fn fail(&mut self, err: Error) -> Error {
        let endpoint = self.transport.endpoint();
        match &err {
            Error::PeerClosed => info!(%endpoint, "Server disconnected"),
            Error::ConnectionReset(_) => info!(%endpoint, "Connection reset by peer"),
            Error::BrokenPipe(_) => info!(%endpoint, "Broken pipe"),
            Error::ConnectRefused(_) => info!(%endpoint, "Connection refused by peer"),
            Error::Io(reason) => warn!(%endpoint, %reason, "Dropping socket after I/O error"),
            // Already cleaned up where they were raised.
            Error::ConnectTimeout { .. }
            | Error::ConnectFailed(_)
            | Error::AddressResolution(_)
            | Error::ResponseTimeout { .. } => {}
        }

        if err.is_peer_failure() {
            self.disconnect();
        } else if matches!(err, Error::Io(_)) {
            self.abandon();
        }
        err
    }

    /// Drop the handle without counting an orderly disconnect.
    fn abandon(&mut self) {
        self.transport.close();
        self.state = ConnectionState::Disconnected;
    }
}
