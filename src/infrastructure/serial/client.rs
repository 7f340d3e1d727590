use crate::core::communication::transport::{Backend, TransportType};
use crate::core::session::guard::RawModeGuard;
use crate::domain::config::SerialSettings;
use crate::domain::error::{Endpoint, TermLinkError, TermLinkResult};
use nix::fcntl::OFlag;
use serialport::{DataBits, FlowControl, Parity, StopBits, TTYPort};
use std::fs::OpenOptions;
use std::io::{self, Read, Write};
use std::os::fd::{AsFd, BorrowedFd, OwnedFd};
use std::os::unix::fs::OpenOptionsExt;
use tracing::{debug, info};

/// A local serial device in raw mode.
///
/// The device's line settings are snapshotted before the port is configured
/// and written back by [`Backend::restore`] or on drop.
pub struct SerialBackend {
    port: TTYPort,
    guard: RawModeGuard,
    path: String,
}

impl SerialBackend {
    pub fn open(settings: &SerialSettings) -> TermLinkResult<Self> {
        let path = settings.path.clone();
        let open_error = |source: serialport::Error| TermLinkError::DeviceOpen {
            path: path.clone(),
            source,
        };

        // Non-blocking so a port without carrier cannot hang the open
        let snapshot = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags((OFlag::O_NOCTTY | OFlag::O_NONBLOCK).bits())
            .open(&settings.path)
            .map_err(|e| open_error(e.into()))?;
        let guard = RawModeGuard::capture(OwnedFd::from(snapshot), Endpoint::Serial)?;

        let port = serialport::new(settings.path.as_str(), settings.baud.value())
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(settings.timeout)
            .open_native()
            .map_err(open_error)?;

        info!("Serial port {} opened at {} baud", settings.path, settings.baud);

        Ok(Self {
            port,
            guard,
            path: settings.path.clone(),
        })
    }
}

impl Backend for SerialBackend {
    fn transport_type(&self) -> TransportType {
        TransportType::Serial
    }

    fn peer(&self) -> &str {
        &self.path
    }

    /// The snapshot descriptor refers to the same device as the port
    fn poll_fd(&self) -> BorrowedFd<'_> {
        self.guard.as_fd()
    }

    fn restore(&mut self) -> TermLinkResult<bool> {
        let restored = self.guard.restore()?;
        if restored {
            debug!("Serial port {} line settings restored", self.path);
        }
        Ok(restored)
    }
}

impl Read for SerialBackend {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read(buf)
    }
}

impl Write for SerialBackend {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}
