use std::io;
use std::time::Duration;

use tracing::debug;

use super::{Endpoint, IoOutcome, SocketHandle, SocketKind, Transport};
use crate::error::Result;

/// The variant-specific half of a socket transport: where the peer is and
/// how to reach it.
pub trait Dialer {
    /// Kind of socket this dialer opens.
    const KIND: SocketKind;

    /// Where this dialer connects to.
    fn endpoint(&self) -> &Endpoint;

    /// Open `handle` and connect it to the peer within `timeout`.
    ///
    /// # Errors
    ///
    /// Any connect-class error; `handle` is left closed.
    fn dial(&self, handle: &mut SocketHandle, timeout: Duration) -> Result<()>;

    /// See [`Transport::min_read_size`].
    fn min_read_size(&self) -> usize {
        0
    }
}

/// A [`Transport`] over one OS socket, connected by a [`Dialer`].
#[derive(Debug)]
pub struct SocketTransport<D> {
    dialer: D,
    handle: SocketHandle,
}

impl<D: Dialer> SocketTransport<D> {
    /// Create a transport for `dialer`. Nothing is opened until connect.
    #[must_use]
    pub const fn from_dialer(dialer: D) -> Self {
        Self {
            dialer,
            handle: SocketHandle::new(D::KIND),
        }
    }

    /// Get the dialer.
    pub fn dialer(&self) -> &D {
        &self.dialer
    }
}

impl<D: Dialer> Transport for SocketTransport<D> {
    fn endpoint(&self) -> &Endpoint {
        self.dialer.endpoint()
    }

    fn begin_connect(&mut self, timeout: Duration) -> Result<()> {
        self.dialer.dial(&mut self.handle, timeout)?;
        debug!(endpoint = %self.dialer.endpoint(), "Successfully connected");
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    fn close(&mut self) {
        self.handle.close();
    }

    fn try_write(&mut self, buf: &[u8]) -> io::Result<IoOutcome> {
        self.handle.try_write(buf)
    }

    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<IoOutcome> {
        self.handle.try_read(buf)
    }

    fn wait_writable(&mut self) -> io::Result<()> {
        self.handle.wait_writable()
    }

    fn wait_readable(&mut self, timeout: Duration) -> io::Result<bool> {
        self.handle.wait_readable(timeout)
    }

    fn min_read_size(&self) -> usize {
        self.dialer.min_read_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct Unreachable {
        endpoint: Endpoint,
    }

    impl Dialer for Unreachable {
        const KIND: SocketKind = SocketKind::Stream;

        fn endpoint(&self) -> &Endpoint {
            &self.endpoint
        }

        fn dial(&self, _handle: &mut SocketHandle, _timeout: Duration) -> Result<()> {
            Err(Error::ConnectFailed("unreachable".into()))
        }
    }

    fn transport() -> SocketTransport<Unreachable> {
        SocketTransport::from_dialer(Unreachable {
            endpoint: Endpoint::Tcp {
                host: "nowhere".into(),
                port: 1,
            },
        })
    }

    #[test]
    fn test_failed_dial_leaves_transport_closed() {
        let mut transport = transport();
        let err = transport.begin_connect(Duration::from_millis(10)).unwrap_err();
        assert!(matches!(err, Error::ConnectFailed(_)));
        assert!(!transport.is_open());
        assert_eq!(transport.endpoint().to_string(), "tcp://nowhere:1");
    }

    #[test]
    fn test_io_before_connect_is_not_connected() {
        let mut transport = transport();
        let err = transport.try_write(b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
        assert!(transport.wait_writable().is_err());
        assert_eq!(transport.min_read_size(), 0);
    }
}
