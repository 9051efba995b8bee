//! Message framing by trailing separator.
//!
//! This module holds the pure framing logic: terminating outgoing messages
//! and deciding when an incoming buffer holds a complete message. No I/O.

mod separator;

pub use separator::{Framer, Separator, CRLF};
