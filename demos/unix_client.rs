//! Interactive Unix-domain socket client.
//!
//! Run with: cargo run --example unix_client -- [path]
//! Start a server first with: cargo run --example echo_server

use std::error::Error;
use std::io::{self, BufRead};

use framesock::{Config, UnixOptions, UnixSocket};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    let options = std::env::args()
        .nth(1)
        .map(UnixOptions::new)
        .unwrap_or_default();
    let mut socket = UnixSocket::unix(options, Config::new().with_timeout_secs(300.0));

    println!("Type messages and hit ENTER, or Ctrl+D to quit:");
    for line in io::stdin().lock().lines() {
        let line = line?;
        match socket.send_msg(&line) {
            Ok(response) => println!("{}", String::from_utf8_lossy(&response).trim_end()),
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    socket.disconnect();
    Ok(())
}
