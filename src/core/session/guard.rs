use crate::domain::error::{Endpoint, TermLinkError, TermLinkResult};
use nix::sys::termios::{self, SetArg, Termios};
use std::os::fd::{AsFd, BorrowedFd, OwnedFd};
use tracing::{debug, warn};

/// Owns the original line settings of one terminal-like device.
///
/// The snapshot is taken once in [`RawModeGuard::capture`], before anything
/// changes the device, and is written back at most once: by an explicit
/// [`RawModeGuard::restore`] or, failing that, when the guard is dropped.
pub struct RawModeGuard {
    fd: OwnedFd,
    endpoint: Endpoint,
    original: Option<Termios>,
}

impl RawModeGuard {
    /// Snapshot the current settings of `fd`
    pub fn capture(fd: OwnedFd, endpoint: Endpoint) -> TermLinkResult<Self> {
        let original = termios::tcgetattr(&fd)
            .map_err(|source| TermLinkError::Termios { endpoint, source })?;

        debug!("Captured original {} settings", endpoint);

        Ok(Self {
            fd,
            endpoint,
            original: Some(original),
        })
    }

    /// Apply raw mode derived from the snapshot: no echo, no line buffering,
    /// no signal characters, 8-bit clean
    pub fn make_raw(&self) -> TermLinkResult<()> {
        let mut raw = self.original.clone().ok_or_else(|| {
            TermLinkError::Internal(format!("{} raw mode requested after restore", self.endpoint))
        })?;
        termios::cfmakeraw(&mut raw);

        termios::tcsetattr(&self.fd, SetArg::TCSANOW, &raw).map_err(|source| {
            TermLinkError::Termios {
                endpoint: self.endpoint,
                source,
            }
        })?;

        debug!("Applied raw mode to {}", self.endpoint);
        Ok(())
    }

    /// True until the original settings have been written back
    pub fn is_armed(&self) -> bool {
        self.original.is_some()
    }

    /// Write the original settings back. Returns `Ok(false)` when they were
    /// already restored; the snapshot is consumed even if the write fails.
    pub fn restore(&mut self) -> TermLinkResult<bool> {
        let Some(original) = self.original.take() else {
            return Ok(false);
        };

        termios::tcsetattr(&self.fd, SetArg::TCSANOW, &original).map_err(|source| {
            TermLinkError::Termios {
                endpoint: self.endpoint,
                source,
            }
        })?;

        debug!("Restored original {} settings", self.endpoint);
        Ok(true)
    }
}

impl AsFd for RawModeGuard {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!("Failed to restore {} settings: {}", self.endpoint, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::pty::openpty;
    use nix::sys::termios::LocalFlags;

    fn snapshot(fd: &OwnedFd) -> Termios {
        termios::tcgetattr(fd).unwrap()
    }

    fn same_settings(a: &Termios, b: &Termios) -> bool {
        a.input_flags == b.input_flags
            && a.output_flags == b.output_flags
            && a.control_flags == b.control_flags
            && a.local_flags == b.local_flags
            && a.control_chars == b.control_chars
    }

    #[test]
    fn test_raw_then_restore_round_trips() {
        let pty = openpty(None, None).unwrap();
        let before = snapshot(&pty.slave);

        let mut guard = RawModeGuard::capture(pty.slave.try_clone().unwrap(), Endpoint::Terminal).unwrap();
        guard.make_raw().unwrap();

        let raw = snapshot(&pty.slave);
        assert!(!raw.local_flags.contains(LocalFlags::ECHO));
        assert!(!raw.local_flags.contains(LocalFlags::ICANON));
        assert!(!raw.local_flags.contains(LocalFlags::ISIG));

        assert!(guard.restore().unwrap());
        assert!(same_settings(&before, &snapshot(&pty.slave)));
    }

    #[test]
    fn test_restore_applies_only_once() {
        let pty = openpty(None, None).unwrap();
        let mut guard = RawModeGuard::capture(pty.slave.try_clone().unwrap(), Endpoint::Serial).unwrap();
        guard.make_raw().unwrap();

        assert!(guard.is_armed());
        assert!(guard.restore().unwrap());
        assert!(!guard.is_armed());

        // A later change must survive further restore calls and the drop
        let mut changed = snapshot(&pty.slave);
        changed.local_flags.remove(LocalFlags::ECHO);
        termios::tcsetattr(&pty.slave, SetArg::TCSANOW, &changed).unwrap();

        assert!(!guard.restore().unwrap());
        drop(guard);
        assert!(!snapshot(&pty.slave).local_flags.contains(LocalFlags::ECHO));
    }

    #[test]
    fn test_drop_restores() {
        let pty = openpty(None, None).unwrap();
        let before = snapshot(&pty.slave);

        {
            let guard = RawModeGuard::capture(pty.slave.try_clone().unwrap(), Endpoint::Terminal).unwrap();
            guard.make_raw().unwrap();
        }

        assert!(same_settings(&before, &snapshot(&pty.slave)));
    }

    #[test]
    fn test_capture_rejects_non_terminals() {
        let file = tempfile::tempfile().unwrap();
        let result = RawModeGuard::capture(OwnedFd::from(file), Endpoint::Serial);
        assert!(matches!(
            result,
            Err(TermLinkError::Termios {
                endpoint: Endpoint::Serial,
                ..
            })
        ));
    }
}
