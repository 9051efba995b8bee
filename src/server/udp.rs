use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::thread;

use tracing::{info, warn};

use super::{EchoOptions, ServerThread, ShutdownHandle};

/// Largest datagram the server accepts.
const MAX_DATAGRAM: usize = 64 * 1024;

/// UDP echo server on a background thread.
///
/// Every datagram is sent back to its sender as is. There is no connection
/// to drop, so the crash sentinel has no special meaning here.
#[derive(Debug)]
pub struct UdpEchoServer {
    local_addr: SocketAddr,
    thread: ServerThread,
}

impl UdpEchoServer {
    /// Bind to `addr` and start echoing. Port 0 picks a free port.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub fn bind(addr: impl ToSocketAddrs, options: EchoOptions) -> io::Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        socket.set_read_timeout(Some(options.poll_interval))?;
        let local_addr = socket.local_addr()?;
        info!("Listening on udp://{local_addr}");

        let shutdown = ShutdownHandle::new();
        let flag = shutdown.clone();
        let thread = ServerThread::spawn(shutdown, move || {
            echo_loop(&socket, &options, &flag);
        })?;
        Ok(Self { local_addr, thread })
    }

    /// The bound address.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The bound port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    /// A handle that stops this server when triggered.
    #[must_use]
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.thread.shutdown.clone()
    }

    /// Stop the server and wait for its thread. Idempotent.
    pub fn stop(&mut self) {
        self.thread.stop();
    }
}

fn echo_loop(socket: &UdpSocket, options: &EchoOptions, shutdown: &ShutdownHandle) {
    let mut buf = vec![0u8; MAX_DATAGRAM];

    while !shutdown.is_shutdown() {
        let (n, peer) = match socket.recv_from(&mut buf) {
            Ok(received) => received,
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
                ) =>
            {
                continue;
            }
            // ICMP errors from earlier sends surface here; they only concern
            // that one peer.
            Err(err) => {
                warn!(error = %err, "Receive failed");
                continue;
            }
        };

        info!(bytes = n, %peer, "Got datagram");
        thread::sleep(options.sleep_time);
        if let Err(err) = socket.send_to(&buf[..n], peer) {
            warn!(error = %err, %peer, "Send failed");
        }
    }
    info!("Server shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_udp_echo() {
        let server = UdpEchoServer::bind("127.0.0.1:0", EchoOptions::new()).unwrap();
        let client = UdpSocket::bind("127.0.0.1:0").unwrap();
        client
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        client.send_to(b"ping\r\n", server.local_addr()).unwrap();

        let mut buf = [0u8; 16];
        let (n, from) = client.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"ping\r\n");
        assert_eq!(from, server.local_addr());
    }
}
