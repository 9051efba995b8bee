//! Echo servers for trying out the client demos.
//!
//! Run with: cargo run --example echo_server -- [port] [path]
//! Then connect with: cargo run --example tcp_client
//!
//! Sending `simulate_crash` makes the server hang up on that client.

use std::error::Error;
use std::io;

use framesock::config::{DEFAULT_PORT, DEFAULT_SOCKET_PATH};
use framesock::server::{EchoOptions, TcpEchoServer, UdpEchoServer, UnixEchoServer};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let port: u16 = args.next().and_then(|p| p.parse().ok()).unwrap_or(DEFAULT_PORT);
    let path = args.next().unwrap_or_else(|| DEFAULT_SOCKET_PATH.to_owned());

    let mut tcp = TcpEchoServer::bind(("127.0.0.1", port), EchoOptions::new())?;
    let mut udp = UdpEchoServer::bind(("127.0.0.1", port), EchoOptions::new())?;
    let mut unix = UnixEchoServer::bind(&path, EchoOptions::new())?;

    println!("Echo servers on tcp://{0}, udp://{0} and unix://{path}", tcp.local_addr());
    println!("Press ENTER to stop.");
    io::stdin().read_line(&mut String::new())?;

    tcp.stop();
    udp.stop();
    unix.stop();
    Ok(())
}
