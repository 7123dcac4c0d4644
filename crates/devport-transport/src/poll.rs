use std::os::fd::BorrowedFd;

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use tracing::trace;

use crate::error::{Result, TransportError};

/// Which sources became ready during one [`wait_ready`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Readiness {
    /// The control channel has data, hung up, or errored. Either way the
    /// next read on it will not block.
    pub control: bool,
    /// The priority source reported `POLLPRI` (sysfs attribute changed).
    pub priority: bool,
}

/// Block until the control channel or the optional priority source is ready.
///
/// When `priority` is `None` only the control channel is polled, so a
/// source that is not armed can never cause a wakeup. There is no timeout.
/// `EINTR` restarts the wait; any other poll failure is returned.
pub fn wait_ready(control: BorrowedFd<'_>, priority: Option<BorrowedFd<'_>>) -> Result<Readiness> {
    let mut fds = Vec::with_capacity(2);
    fds.push(PollFd::new(control, PollFlags::POLLIN));
    if let Some(fd) = priority {
        fds.push(PollFd::new(fd, PollFlags::POLLPRI));
    }

    loop {
        match poll(&mut fds, PollTimeout::NONE) {
            Ok(_) => break,
            Err(Errno::EINTR) => continue,
            Err(errno) => return Err(TransportError::Poll(errno.into())),
        }
    }

    let revents = |index: usize| {
        fds.get(index)
            .and_then(|fd| fd.revents())
            .unwrap_or(PollFlags::empty())
    };
    let ready = Readiness {
        control: revents(0)
            .intersects(PollFlags::POLLIN | PollFlags::POLLHUP | PollFlags::POLLERR),
        priority: revents(1).contains(PollFlags::POLLPRI),
    };
    trace!(?ready, "poll returned");
    Ok(ready)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::fd::AsFd;
    use std::os::unix::net::UnixStream;

    #[test]
    fn control_ready_when_data_pending() {
        let (mut left, right) = UnixStream::pair().unwrap();
        left.write_all(b"x").unwrap();

        let ready = wait_ready(right.as_fd(), None).unwrap();
        assert!(ready.control);
        assert!(!ready.priority);
    }

    #[test]
    fn control_ready_on_hangup() {
        let (left, right) = UnixStream::pair().unwrap();
        drop(left);

        let ready = wait_ready(right.as_fd(), None).unwrap();
        assert!(ready.control);
    }

    #[test]
    fn regular_file_never_reports_priority() {
        let path = std::env::temp_dir().join(format!("devport-poll-{}", std::process::id()));
        std::fs::write(&path, b"0").unwrap();
        let file = std::fs::File::open(&path).unwrap();

        let (mut left, right) = UnixStream::pair().unwrap();
        left.write_all(b"x").unwrap();

        let ready = wait_ready(right.as_fd(), Some(file.as_fd())).unwrap();
        assert!(ready.control);
        assert!(!ready.priority);

        let _ = std::fs::remove_file(&path);
    }
}
