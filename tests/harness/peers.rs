//! Peers that refuse or ignore connections.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::time::Duration;

use socket2::{Domain, SockAddr, Socket, Type};

/// A port nothing listens on.
pub fn closed_tcp_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// A listener whose accept queue is full, so new connects never complete.
pub struct Unresponsive {
    pub addr: SocketAddr,
    _listener: Socket,
    _queued: Vec<TcpStream>,
}

/// Listen with a zero backlog and occupy the only queue slot; the kernel
/// then drops further SYNs and connects stay in progress.
pub fn unresponsive_listener() -> Unresponsive {
    let listener = Socket::new(Domain::IPV4, Type::STREAM, None).unwrap();
    let bind_addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    listener.bind(&SockAddr::from(bind_addr)).unwrap();
    listener.listen(0).unwrap();
    let addr = listener.local_addr().unwrap().as_socket().unwrap();

    let queued = (0..2)
        .filter_map(|_| TcpStream::connect_timeout(&addr, Duration::from_millis(100)).ok())
        .collect();

    Unresponsive {
        addr,
        _listener: listener,
        _queued: queued,
    }
}
