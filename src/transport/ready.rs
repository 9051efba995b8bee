//! Readiness waits on raw descriptors via `poll(2)`.

use std::io;
use std::os::fd::BorrowedFd;
use std::time::{Duration, Instant};

use nix::errno::Errno;
use nix::poll::{PollFd, PollFlags, PollTimeout, poll};

/// Block until `fd` is readable or `timeout` elapses. `None` waits forever,
/// and so does a timeout too large to put a deadline on.
///
/// Returns `false` on timeout. Error and hang-up conditions count as ready so
/// the following read reports them.
pub(crate) fn wait_readable(fd: BorrowedFd<'_>, timeout: Option<Duration>) -> io::Result<bool> {
    wait_for(fd, PollFlags::POLLIN, timeout)
}

/// Block until `fd` is writable or `timeout` elapses. `None` waits forever.
pub(crate) fn wait_writable(fd: BorrowedFd<'_>, timeout: Option<Duration>) -> io::Result<bool> {
    wait_for(fd, PollFlags::POLLOUT, timeout)
}

fn wait_for(fd: BorrowedFd<'_>, events: PollFlags, timeout: Option<Duration>) -> io::Result<bool> {
    let deadline = timeout.and_then(deadline_after);
    loop {
        let poll_timeout = match deadline {
            None => PollTimeout::NONE,
            Some(deadline) => to_poll_timeout(deadline.saturating_duration_since(Instant::now())),
        };
        let mut fds = [PollFd::new(fd, events)];
        match poll(&mut fds, poll_timeout) {
            Ok(0) => return Ok(false),
            Ok(_) => return Ok(true),
            // Signal delivery; retry with whatever time is left.
            Err(Errno::EINTR) => continue,
            Err(errno) => return Err(io::Error::from(errno)),
        }
    }
}

/// The instant `timeout` from now, or `None` past the end of the clock.
pub(crate) fn deadline_after(timeout: Duration) -> Option<Instant> {
    Instant::now().checked_add(timeout)
}

/// Whole milliseconds, rounded up so sub-millisecond timeouts still block.
fn to_poll_timeout(remaining: Duration) -> PollTimeout {
    let millis = remaining.as_micros().div_ceil(1000);
    let millis = i32::try_from(millis).unwrap_or(i32::MAX);
    PollTimeout::try_from(millis).unwrap_or(PollTimeout::MAX)
}
