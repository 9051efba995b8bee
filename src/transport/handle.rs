use std::io::{self, Read, Write};
use std::os::fd::AsFd;
use std::time::{Duration, Instant};

use nix::errno::Errno;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use super::IoOutcome;
use super::ready;
use crate::error::{Error, Result};

/// Whether a handle carries a byte stream or datagrams.
///
/// The distinction matters for zero-length reads: end of stream on a stream
/// socket, an empty datagram on a datagram socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketKind {
    /// Connection-oriented byte stream (TCP, Unix stream).
    Stream,
    /// Connectionless datagrams (UDP).
    Datagram,
}

impl SocketKind {
    const fn socket_type(self) -> Type {
        match self {
            SocketKind::Stream => Type::STREAM,
            SocketKind::Datagram => Type::DGRAM,
        }
    }
}

/// An optional nonblocking socket, the OS resource behind every transport.
///
/// The handle is either open and connected or absent. Closed sockets are
/// dropped, never reused.
#[derive(Debug)]
pub struct SocketHandle {
    kind: SocketKind,
    socket: Option<Socket>,
}

impl SocketHandle {
    /// Create an empty handle of the given kind.
    #[must_use]
    pub const fn new(kind: SocketKind) -> Self {
        Self { kind, socket: None }
    }

    /// Get the socket kind.
    #[must_use]
    pub const fn kind(&self) -> SocketKind {
        self.kind
    }

    /// Check if a socket is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.socket.is_some()
    }

    /// Drop the socket, if any.
    pub fn close(&mut self) {
        self.socket = None;
    }

    /// Open a nonblocking socket and connect it to `addr`.
    ///
    /// For stream sockets an in-progress connect is awaited for up to
    /// `timeout`. Any previously open socket is closed first. On error no
    /// socket is retained.
    pub fn connect(
        &mut self,
        domain: Domain,
        protocol: Option<Protocol>,
        addr: &SockAddr,
        timeout: Duration,
    ) -> Result<()> {
        self.close();
        let socket = Socket::new(domain, self.kind.socket_type(), protocol)
            .map_err(Error::from_connect_io)?;
        socket
            .set_nonblocking(true)
            .map_err(Error::from_connect_io)?;

        match self.kind {
            SocketKind::Stream => connect_stream(&socket, addr, timeout)?,
            SocketKind::Datagram => socket.connect(addr).map_err(Error::from_connect_io)?,
        }

        self.socket = Some(socket);
        Ok(())
    }

    /// Attempt one nonblocking write.
    pub fn try_write(&mut self, buf: &[u8]) -> io::Result<IoOutcome> {
        let mut socket = self.socket()?;
        match socket.write(buf) {
            Ok(0) if !buf.is_empty() && self.kind == SocketKind::Stream => Ok(IoOutcome::Closed),
            Ok(n) => Ok(IoOutcome::Transferred(n)),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(IoOutcome::WouldBlock),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(IoOutcome::Transferred(0)),
            Err(e) => Err(e),
        }
    }

    /// Attempt one nonblocking read.
    pub fn try_read(&mut self, buf: &mut [u8]) -> io::Result<IoOutcome> {
        let mut socket = self.socket()?;
        match socket.read(buf) {
            Ok(0) if !buf.is_empty() && self.kind == SocketKind::Stream => Ok(IoOutcome::Closed),
            Ok(n) => Ok(IoOutcome::Transferred(n)),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(IoOutcome::WouldBlock),
            // Nothing consumed; the caller's loop retries.
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(IoOutcome::WouldBlock),
            Err(e) => Err(e),
        }
    }

    /// Block until writable, without a timeout.
    pub fn wait_writable(&self) -> io::Result<()> {
        let socket = self.socket()?;
        ready::wait_writable(socket.as_fd(), None).map(|_| ())
    }

    /// Block until readable or `timeout` elapses.
    pub fn wait_readable(&self, timeout: Duration) -> io::Result<bool> {
        let socket = self.socket()?;
        ready::wait_readable(socket.as_fd(), Some(timeout))
    }

    fn socket(&self) -> io::Result<&Socket> {
        self.socket
            .as_ref()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotConnected))
    }
}

/// Drive a nonblocking stream connect to completion or timeout.
///
/// A timeout too large for a deadline waits without bound.
fn connect_stream(socket: &Socket, addr: &SockAddr, timeout: Duration) -> Result<()> {
    let deadline = ready::deadline_after(timeout);
    loop {
        match socket.connect(addr) {
            Ok(()) => return Ok(()),
            Err(e) if is_os_error(&e, Errno::EISCONN) => return Ok(()),
            Err(e) if in_progress(&e) => {}
            Err(e) => return Err(Error::from_connect_io(e)),
        }

        let remaining = deadline.map(|d| d.saturating_duration_since(Instant::now()));
        let writable = ready::wait_writable(socket.as_fd(), remaining)
            .map_err(Error::from_connect_io)?;
        if !writable {
            return Err(Error::ConnectTimeout { timeout });
        }
        // The connect finished; a pending error tells us how.
        if let Some(err) = socket.take_error().map_err(Error::from_connect_io)? {
            return Err(Error::from_connect_io(err));
        }
    }
}

fn in_progress(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.kind() == io::ErrorKind::Interrupted
        || is_os_error(err, Errno::EINPROGRESS)
        || is_os_error(err, Errno::EALREADY)
}

fn is_os_error(err: &io::Error, errno: Errno) -> bool {
    err.raw_os_error() == Some(errno as i32)
}
