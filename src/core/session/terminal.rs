use super::guard::RawModeGuard;
use crate::domain::error::{Endpoint, TermLinkError, TermLinkResult};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::fd::{AsFd, BorrowedFd, OwnedFd};
use tracing::{info, warn};

/// Controlling terminal of the process
pub const DEV_TTY: &str = "/dev/tty";

/// The operator's side of a session: a duplex byte stream that can be put
/// back the way it was found
pub trait Console: Read + Write + AsFd {
    /// Put the original terminal settings back; `Ok(false)` if already done
    fn restore(&mut self) -> TermLinkResult<bool>;
}

/// The controlling terminal held in raw mode for the life of a session
pub struct TerminalSession {
    device: File,
    guard: RawModeGuard,
}

impl TerminalSession {
    /// Open `/dev/tty` and switch it to raw mode
    pub fn open() -> TermLinkResult<Self> {
        let device = OpenOptions::new()
            .read(true)
            .write(true)
            .open(DEV_TTY)
            .map_err(|source| TermLinkError::TerminalOpen {
                path: DEV_TTY.to_string(),
                source,
            })?;

        Self::acquire(device)
    }

    /// Take over an already open terminal device and switch it to raw mode
    pub fn acquire(device: File) -> TermLinkResult<Self> {
        let control = device
            .try_clone()
            .map_err(|source| TermLinkError::TerminalOpen {
                path: DEV_TTY.to_string(),
                source,
            })?;

        let guard = RawModeGuard::capture(OwnedFd::from(control), Endpoint::Terminal)?;
        guard.make_raw()?;

        info!("Terminal switched to raw mode");
        Ok(Self { device, guard })
    }

    /// Whether raw mode is still in effect
    pub fn is_raw(&self) -> bool {
        self.guard.is_armed()
    }

    pub fn restore(&mut self) -> TermLinkResult<bool> {
        let restored = self.guard.restore()?;
        if restored {
            info!("Terminal settings restored");
        }
        Ok(restored)
    }
}

impl Console for TerminalSession {
    fn restore(&mut self) -> TermLinkResult<bool> {
        TerminalSession::restore(self)
    }
}

impl Read for TerminalSession {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.device.read(buf)
    }
}

impl Write for TerminalSession {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.device.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.device.flush()
    }
}

impl AsFd for TerminalSession {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.device.as_fd()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!("Failed to restore terminal: {}", e);
        }
    }
}
