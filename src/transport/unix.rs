use std::time::Duration;

use socket2::{Domain, SockAddr};

use super::{Dialer, Endpoint, SocketHandle, SocketKind, SocketTransport};
use crate::config::UnixOptions;
use crate::error::{Error, Result};

/// Unix-domain stream transport.
pub type UnixTransport = SocketTransport<UnixDialer>;

/// Connects a stream socket to a filesystem path.
#[derive(Debug, Clone)]
pub struct UnixDialer {
    options: UnixOptions,
    endpoint: Endpoint,
}

impl UnixTransport {
    /// Create a transport for `options`. Nothing is opened until connect.
    #[must_use]
    pub fn new(options: UnixOptions) -> Self {
        Self::from_dialer(UnixDialer {
            endpoint: Endpoint::Unix {
                path: options.path.clone(),
            },
            options,
        })
    }
}

impl Dialer for UnixDialer {
    const KIND: SocketKind = SocketKind::Stream;

    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn dial(&self, handle: &mut SocketHandle, timeout: Duration) -> Result<()> {
        // Paths that do not fit in sockaddr_un are rejected here.
        let addr = SockAddr::unix(&self.options.path).map_err(Error::from_connect_io)?;
        handle.connect(Domain::UNIX, None, &addr, timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Transport;

    #[test]
    fn test_missing_path_fails_to_connect() {
        let dir = tempfile::tempdir().unwrap();
        let mut transport = UnixTransport::new(UnixOptions::new(dir.path().join("absent.sock")));
        let err = transport.begin_connect(Duration::from_millis(100)).unwrap_err();
        assert!(matches!(err, Error::ConnectFailed(_)), "{err:?}");
        assert!(!transport.is_open());
    }

    #[test]
    fn test_overlong_path_is_rejected() {
        let path = format!("/tmp/{}", "x".repeat(200));
        let mut transport = UnixTransport::new(UnixOptions::new(path));
        assert!(transport.begin_connect(Duration::from_millis(100)).is_err());
    }
}
