//! Interactive TCP client.
//!
//! Run with: cargo run --example tcp_client -- [host] [port]
//! Start a server first with: cargo run --example echo_server

use std::error::Error;
use std::io::{self, BufRead, Write};

use framesock::config::{DEFAULT_HOST, DEFAULT_PORT};
use framesock::{Config, TcpOptions, TcpSocket};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| DEFAULT_HOST.to_owned());
    let port = args.next().and_then(|p| p.parse().ok()).unwrap_or(DEFAULT_PORT);

    let config = Config::new().with_timeout_secs(300.0);
    let mut socket = TcpSocket::tcp(TcpOptions::new(host, port), config);

    let stdin = io::stdin();
    loop {
        println!("Please write the message you want to send and hit ENTER, or Ctrl+D to quit:");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match socket.send_msg(line.trim_end()) {
            Ok(response) => println!("{}", String::from_utf8_lossy(&response).trim_end()),
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    socket.disconnect();
    Ok(())
}
