//! Shared fixtures for the integration tests.
//!
//! Real echo servers come from `framesock::server`; this module adds the
//! pieces only tests need: a transport that records what the client puts
//! on the wire, and peers that misbehave on purpose.

#![allow(dead_code)]

mod peers;
mod recording;

pub use peers::{Unresponsive, closed_tcp_port, unresponsive_listener};
pub use recording::RecordingTransport;

use framesock::DEFAULT_CHUNK_SIZE;

/// `size` bytes of `x`.
pub fn msg(size: usize) -> Vec<u8> {
    vec![b'x'; size]
}

/// The client's default chunk size.
pub const CHUNK: usize = DEFAULT_CHUNK_SIZE;
