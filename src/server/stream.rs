use std::fs;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::os::fd::AsFd;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use bytes::BytesMut;
use tracing::{info, warn};

use super::{CRASH_SENTINEL, EchoOptions, SERVER_CHUNK_SIZE, ServerThread, ShutdownHandle};
use crate::codec::Framer;
use crate::transport::ready;

/// What a stream server does with complete messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reply {
    Echo,
    Silent,
}

trait StreamListener: AsFd + Send + 'static {
    type Stream: ClientStream;

    fn accept_stream(&self) -> io::Result<Self::Stream>;
}

trait ClientStream: Read + Write + Send + 'static {
    fn configure(&self, poll_interval: Duration) -> io::Result<()>;
}

impl StreamListener for TcpListener {
    type Stream = TcpStream;

    fn accept_stream(&self) -> io::Result<TcpStream> {
        self.accept().map(|(stream, _)| stream)
    }
}

impl ClientStream for TcpStream {
    fn configure(&self, poll_interval: Duration) -> io::Result<()> {
        self.set_nonblocking(false)?;
        self.set_nodelay(true)?;
        self.set_read_timeout(Some(poll_interval))
    }
}

impl StreamListener for UnixListener {
    type Stream = UnixStream;

    fn accept_stream(&self) -> io::Result<UnixStream> {
        self.accept().map(|(stream, _)| stream)
    }
}

impl ClientStream for UnixStream {
    fn configure(&self, poll_interval: Duration) -> io::Result<()> {
        self.set_nonblocking(false)?;
        self.set_read_timeout(Some(poll_interval))
    }
}

/// TCP echo server on a background thread.
///
/// ```rust,no_run
/// use framesock::server::{EchoOptions, TcpEchoServer};
///
/// let server = TcpEchoServer::bind("127.0.0.1:0", EchoOptions::new())?;
/// println!("listening on {}", server.local_addr());
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct TcpEchoServer {
    local_addr: SocketAddr,
    thread: ServerThread,
}

impl TcpEchoServer {
    /// Bind to `addr` and start echoing. Port 0 picks a free port.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub fn bind(addr: impl ToSocketAddrs, options: EchoOptions) -> io::Result<Self> {
        Self::start(addr, options, Reply::Echo)
    }

    /// Bind to `addr` and accept connections, but never reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub fn bind_silent(addr: impl ToSocketAddrs, options: EchoOptions) -> io::Result<Self> {
        Self::start(addr, options, Reply::Silent)
    }

    fn start(addr: impl ToSocketAddrs, options: EchoOptions, reply: Reply) -> io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;
        let local_addr = listener.local_addr()?;
        info!("Listening on tcp://{local_addr}");

        let shutdown = ShutdownHandle::new();
        let flag = shutdown.clone();
        let thread = ServerThread::spawn(shutdown, move || {
            accept_loop(&listener, reply, &options, &flag);
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

    /// Stop the server and wait for its threads. Idempotent.
    pub fn stop(&mut self) {
        self.thread.stop();
    }
}

/// Unix-domain echo server on a background thread.
///
/// A stale socket file at the path is replaced on bind and removed on drop.
#[derive(Debug)]
pub struct UnixEchoServer {
    path: PathBuf,
    thread: ServerThread,
}

impl UnixEchoServer {
    /// Bind to the socket at `path` and start echoing.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be bound.
    pub fn bind(path: impl AsRef<Path>, options: EchoOptions) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        match fs::remove_file(&path) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => return Err(err),
            _ => {}
        }
        let listener = UnixListener::bind(&path)?;
        listener.set_nonblocking(true)?;
        info!("Listening on unix://{}", path.display());

        let shutdown = ShutdownHandle::new();
        let flag = shutdown.clone();
        let thread = ServerThread::spawn(shutdown, move || {
            accept_loop(&listener, Reply::Echo, &options, &flag);
        })?;
        Ok(Self { path, thread })
    }

    /// The socket path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A handle that stops this server when triggered.
    #[must_use]
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.thread.shutdown.clone()
    }

    /// Stop the server and wait for its threads. Idempotent.
    pub fn stop(&mut self) {
        self.thread.stop();
    }
}

impl Drop for UnixEchoServer {
    fn drop(&mut self) {
        self.thread.stop();
        let _ = fs::remove_file(&self.path);
    }
}

fn accept_loop<L: StreamListener>(
    listener: &L,
    reply: Reply,
    options: &EchoOptions,
    shutdown: &ShutdownHandle,
) {
    let mut workers = Vec::new();

    while !shutdown.is_shutdown() {
        match ready::wait_readable(listener.as_fd(), Some(options.poll_interval)) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(err) => {
                warn!(error = %err, "Listener poll failed");
                break;
            }
        }

        match listener.accept_stream() {
            Ok(stream) => {
                let options = options.clone();
                let shutdown = shutdown.clone();
                workers.push(thread::spawn(move || {
                    serve_client(stream, reply, &options, &shutdown);
                }));
            }
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => {}
            Err(err) => warn!(error = %err, "Accept failed"),
        }
        workers.retain(|worker: &thread::JoinHandle<()>| !worker.is_finished());
    }

    for worker in workers {
        let _ = worker.join();
    }
    info!("Server shutting down");
}

fn serve_client<S: ClientStream>(
    mut stream: S,
    reply: Reply,
    options: &EchoOptions,
    shutdown: &ShutdownHandle,
) {
    if let Err(err) = stream.configure(options.poll_interval) {
        warn!(error = %err, "Could not configure client stream");
        return;
    }

    let framer = Framer::new(options.separator.clone());
    let mut pending = BytesMut::new();
    let mut chunk = vec![0u8; SERVER_CHUNK_SIZE];

    while !shutdown.is_shutdown() {
        match stream.read(&mut chunk) {
            Ok(0) => {
                info!("Client disconnected");
                return;
            }
            Ok(n) => pending.extend_from_slice(&chunk[..n]),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
                ) =>
            {
                continue;
            }
            Err(err) => {
                info!(error = %err, "Client disconnected");
                return;
            }
        }

        if reply == Reply::Silent {
            pending.clear();
            continue;
        }
        if !framer.is_complete(&pending) {
            continue;
        }

        let message = pending.split().freeze();
        info!(bytes = message.len(), "Got message");
        thread::sleep(options.sleep_time);
        if let Err(err) = stream.write_all(&message) {
            info!(error = %err, "Client disconnected");
            return;
        }

        if framer.strip(&message) == CRASH_SENTINEL {
            info!("Simulating crash, closing client connection");
            return;
        }
    }
}
