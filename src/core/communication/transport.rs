use crate::domain::config::BackendConfig;
use crate::domain::error::{Endpoint, TermLinkResult};
use crate::infrastructure::{serial::SerialBackend, tcp::NetworkBackend};
use std::io::{Read, Write};
use std::os::fd::BorrowedFd;

/// Transport type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportType {
    Serial,
    Tcp,
}

impl TransportType {
    /// Endpoint used for error context
    pub fn endpoint(&self) -> Endpoint {
        match self {
            TransportType::Serial => Endpoint::Serial,
            TransportType::Tcp => Endpoint::Tcp,
        }
    }
}

impl std::fmt::Display for TransportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportType::Serial => write!(f, "serial"),
            TransportType::Tcp => write!(f, "tcp"),
        }
    }
}

/// The remote end of a relay session.
///
/// Both variants are plain duplex byte streams with a descriptor that can be
/// polled for readability. `restore` puts back any device state changed when
/// the backend was opened; it must be safe to call more than once.
pub trait Backend: Read + Write {
    /// Get the transport type
    fn transport_type(&self) -> TransportType;

    /// Human readable description of the peer (device path or host:port)
    fn peer(&self) -> &str;

    /// Descriptor to poll for incoming data
    fn poll_fd(&self) -> BorrowedFd<'_>;

    /// Undo device configuration applied at open time
    fn restore(&mut self) -> TermLinkResult<bool> {
        Ok(false)
    }
}

impl BackendConfig {
    /// Open the configured backend, ready for use
    pub fn open(&self) -> TermLinkResult<Box<dyn Backend>> {
        let backend: Box<dyn Backend> = match self {
            BackendConfig::Serial(settings) => Box::new(SerialBackend::open(settings)?),
            BackendConfig::Network(settings) => Box::new(NetworkBackend::open(settings)?),
        };

        Ok(backend)
    }

    pub fn transport_type(&self) -> TransportType {
        match self {
            BackendConfig::Serial(_) => TransportType::Serial,
            BackendConfig::Network(_) => TransportType::Tcp,
        }
    }
}
