use std::time::Duration;

use socket2::{Domain, Protocol, SockAddr};

use super::tcp::resolve;
use super::{Dialer, Endpoint, SocketHandle, SocketKind, SocketTransport};
use crate::config::UdpOptions;
use crate::error::Result;

/// Largest payload a single UDP datagram can carry over IPv4.
const MAX_DATAGRAM: usize = 65_507;

/// UDP datagram transport.
///
/// Connecting only fixes the default peer address; there is no handshake,
/// so connect cannot time out.
pub type UdpTransport = SocketTransport<UdpDialer>;

/// Resolves the peer and binds it as the socket's default destination.
#[derive(Debug, Clone)]
pub struct UdpDialer {
    options: UdpOptions,
    endpoint: Endpoint,
}

impl UdpTransport {
    /// Create a transport for `options`. Nothing is opened until connect.
    #[must_use]
    pub fn new(options: UdpOptions) -> Self {
        Self::from_dialer(UdpDialer {
            endpoint: Endpoint::Udp {
                host: options.host.clone(),
                port: options.port,
            },
            options,
        })
    }
}

impl Dialer for UdpDialer {
    const KIND: SocketKind = SocketKind::Datagram;

    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn dial(&self, handle: &mut SocketHandle, timeout: Duration) -> Result<()> {
        let addr = resolve(&self.options.host, self.options.port)?;
        handle.connect(
            Domain::for_address(addr),
            Some(Protocol::UDP),
            &SockAddr::from(addr),
            timeout,
        )
    }

    fn min_read_size(&self) -> usize {
        MAX_DATAGRAM
    }
}
