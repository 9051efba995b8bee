//! A transport that keeps everything written to it and echoes it back.

use std::io;
use std::time::Duration;

use framesock::{Endpoint, IoOutcome, Result, Transport};

pub struct RecordingTransport {
    endpoint: Endpoint,
    open: bool,
    sent: Vec<u8>,
    unread: Vec<u8>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            endpoint: Endpoint::Tcp {
                host: "recording".into(),
                port: 0,
            },
            open: false,
            sent: Vec::new(),
            unread: Vec::new(),
        }
    }

    /// Every byte written since creation.
    pub fn sent(&self) -> &[u8] {
        &self.sent
    }
}

impl Transport for RecordingTransport {
    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn begin_connect(&mut self, _timeout: Duration) -> Result<()> {
        self.open = true;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn try_write(&mut self, buf: &[u8]) -> io::Result<IoOutcome> {
        self.sent.extend_from_slice(buf);
        self.unread.extend_from_slice(buf);
        Ok(IoOutcome::Transferred(buf.len()))
    }

    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<IoOutcome> {
        if self.unread.is_empty() {
            return Ok(IoOutcome::WouldBlock);
        }
        let n = self.unread.len().min(buf.len());
        buf[..n].copy_from_slice(&self.unread[..n]);
        self.unread.drain(..n);
        Ok(IoOutcome::Transferred(n))
    }

    fn wait_writable(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn wait_readable(&mut self, _timeout: Duration) -> io::Result<bool> {
        Ok(!self.unread.is_empty())
    }
}
