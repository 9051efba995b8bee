use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use socket2::{Domain, Protocol, SockAddr};

use super::{Dialer, Endpoint, SocketHandle, SocketKind, SocketTransport};
use crate::config::TcpOptions;
use crate::error::{Error, Result};

/// TCP stream transport.
pub type TcpTransport = SocketTransport<TcpDialer>;

/// Resolves and connects a TCP stream.
#[derive(Debug, Clone)]
pub struct TcpDialer {
    options: TcpOptions,
    endpoint: Endpoint,
}

impl TcpTransport {
    /// Create a transport for `options`. Nothing is opened until connect.
    #[must_use]
    pub fn new(options: TcpOptions) -> Self {
        Self::from_dialer(TcpDialer {
            endpoint: Endpoint::Tcp {
                host: options.host.clone(),
                port: options.port,
            },
            options,
        })
    }
}

/// Resolve `host:port` to the first address the resolver returns.
pub(super) fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .map_err(|e| Error::AddressResolution(format!("{host}:{port}: {e}")))?
        .next()
        .ok_or_else(|| Error::AddressResolution(format!("{host}:{port}: no addresses")))
}

impl Dialer for TcpDialer {
    const KIND: SocketKind = SocketKind::Stream;

    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn dial(&self, handle: &mut SocketHandle, timeout: Duration) -> Result<()> {
        let addr = resolve(&self.options.host, self.options.port)?;
        handle.connect(
            Domain::for_address(addr),
            Some(Protocol::TCP),
            &SockAddr::from(addr),
            timeout,
        )
    }
}
