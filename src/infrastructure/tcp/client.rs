use crate::core::communication::transport::{Backend, TransportType};
use crate::domain::config::NetworkSettings;
use crate::domain::error::{TermLinkError, TermLinkResult};
use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::os::fd::{AsFd, BorrowedFd};
use tracing::{debug, info, warn};

/// A TCP connection to a serial bridge
pub struct NetworkBackend {
    stream: TcpStream,
    peer: String,
}

impl NetworkBackend {
    pub fn open(settings: &NetworkSettings) -> TermLinkResult<Self> {
        let connect_error = |source: io::Error| TermLinkError::Connect {
            host: settings.host.clone(),
            port: settings.addr.port(),
            source,
        };

        let stream = TcpStream::connect_timeout(&SocketAddr::V4(settings.addr), settings.connect_timeout)
            .map_err(connect_error)?;

        if settings.no_delay {
            if let Err(e) = stream.set_nodelay(true) {
                warn!("Failed to set TCP_NODELAY: {}", e);
            }
        }

        info!("TCP connection established to {}:{}", settings.host, settings.addr.port());

        Ok(Self {
            stream,
            peer: format!("{}:{}", settings.host, settings.addr.port()),
        })
    }
}

impl Backend for NetworkBackend {
    fn transport_type(&self) -> TransportType {
        TransportType::Tcp
    }

    fn peer(&self) -> &str {
        &self.peer
    }

    fn poll_fd(&self) -> BorrowedFd<'_> {
        self.stream.as_fd()
    }
}

impl Read for NetworkBackend {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Write for NetworkBackend {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

impl Drop for NetworkBackend {
    fn drop(&mut self) {
        if let Err(e) = self.stream.shutdown(Shutdown::Both) {
            debug!("TCP shutdown of {}: {}", self.peer, e);
        }
    }
}
