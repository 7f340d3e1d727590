use super::poller::{read_chunk, wait_readable, write_chunk};
use super::transport::Backend;
use crate::domain::config::DrainConfig;
use crate::domain::error::{Endpoint, TermLinkResult};
use std::io::Write;
use tracing::debug;

/// Progress dots shown at most, however much data is discarded
pub const MAX_DRAIN_DOTS: usize = 16;

const DRAIN_BUFFER_SIZE: usize = 8192;

/// What the drain stage threw away
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub chunks: usize,
    pub bytes: usize,
    pub dots: usize,
}

/// Discard whatever the backend has buffered.
///
/// Each poll waits up to the drain period; the first poll that times out
/// means the backend is quiet and ends the stage.
pub fn drain<T, B>(terminal: &mut T, backend: &mut B, config: &DrainConfig) -> TermLinkResult<DrainReport>
where
    T: Write + ?Sized,
    B: Backend + ?Sized,
{
    let endpoint = backend.transport_type().endpoint();
    let mut buffer = vec![0u8; DRAIN_BUFFER_SIZE];
    let mut report = DrainReport::default();

    write_chunk(terminal, b"<<Draining...", Endpoint::Terminal)?;

    while wait_readable(backend.poll_fd(), config.period_ms(), endpoint)? {
        let n = read_chunk(backend, &mut buffer, endpoint)?;
        report.chunks += 1;
        report.bytes += n;
        debug!("Drained {} bytes from {}", n, endpoint);

        if report.dots < MAX_DRAIN_DOTS {
            write_chunk(terminal, b".", Endpoint::Terminal)?;
            report.dots += 1;
        }
    }

    write_chunk(terminal, b"done>>\r\n", Endpoint::Terminal)?;

    debug!(
        chunks = report.chunks,
        bytes = report.bytes,
        "Drain finished for {}",
        backend.peer()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::communication::transport::TransportType;
    use crate::domain::error::TermLinkError;
    use std::io::{self, Read};
    use std::os::fd::{AsFd, BorrowedFd};
    use std::os::unix::net::UnixStream;
    use std::thread;
    use std::time::{Duration, Instant};

    struct SocketBackend(UnixStream);

    impl Backend for SocketBackend {
        fn transport_type(&self) -> TransportType {
            TransportType::Serial
        }

        fn peer(&self) -> &str {
            "socketpair"
        }

        fn poll_fd(&self) -> BorrowedFd<'_> {
            self.0.as_fd()
        }
    }

    impl Read for SocketBackend {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.0.read(buf)
        }
    }

    impl Write for SocketBackend {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            self.0.flush()
        }
    }

    #[test]
    fn test_quiet_backend_drains_immediately() {
        let (ours, _theirs) = UnixStream::pair().unwrap();
        let mut backend = SocketBackend(ours);
        let mut terminal = Vec::new();

        let report = drain(&mut terminal, &mut backend, &DrainConfig::new(20)).unwrap();

        assert_eq!(report, DrainReport::default());
        assert_eq!(terminal, b"<<Draining...done>>\r\n");
    }

    #[test]
    fn test_buffered_data_is_discarded() {
        let (ours, mut theirs) = UnixStream::pair().unwrap();
        theirs.write_all(b"stale boot banner\r\n").unwrap();
        let mut backend = SocketBackend(ours);
        let mut terminal = Vec::new();

        let report = drain(&mut terminal, &mut backend, &DrainConfig::new(50)).unwrap();

        assert_eq!(report.bytes, 19);
        assert!(report.chunks >= 1);
        assert_eq!(report.dots, report.chunks);
        let shown = String::from_utf8(terminal).unwrap();
        assert!(shown.starts_with("<<Draining."));
        assert!(shown.ends_with("done>>\r\n"));
        assert!(!shown.contains("banner"));
    }

    #[test]
    fn test_dots_are_capped() {
        let (ours, mut theirs) = UnixStream::pair().unwrap();
        let mut backend = SocketBackend(ours);
        let mut terminal = Vec::new();

        // Far more than 16 buffers worth, so at least 32 reads are needed
        let total = DRAIN_BUFFER_SIZE * 32;
        let writer = thread::spawn(move || {
            theirs.write_all(&vec![b'x'; total]).unwrap();
            theirs
        });

        let report = drain(&mut terminal, &mut backend, &DrainConfig::new(200)).unwrap();
        let _theirs = writer.join().unwrap();

        assert_eq!(report.bytes, total);
        assert!(report.chunks >= 32);
        assert_eq!(report.dots, MAX_DRAIN_DOTS);
        let dots = terminal.iter().filter(|&&b| b == b'.').count();
        // Three dots belong to the "<<Draining..." banner
        assert_eq!(dots, MAX_DRAIN_DOTS + 3);
    }

    #[test]
    fn test_drain_ends_within_one_period_after_data_stops() {
        let (ours, mut theirs) = UnixStream::pair().unwrap();
        theirs.write_all(b"noise").unwrap();
        let mut backend = SocketBackend(ours);
        let mut terminal = Vec::new();

        let started = Instant::now();
        drain(&mut terminal, &mut backend, &DrainConfig::new(30)).unwrap();

        assert!(started.elapsed() < Duration::from_millis(30 * 10));
    }

    #[test]
    fn test_closed_backend_is_fatal() {
        let (ours, theirs) = UnixStream::pair().unwrap();
        drop(theirs);
        let mut backend = SocketBackend(ours);
        let mut terminal = Vec::new();

        let error = drain(&mut terminal, &mut backend, &DrainConfig::new(20)).unwrap_err();

        assert!(matches!(error, TermLinkError::Closed { endpoint: Endpoint::Serial }));
        assert!(error.is_fatal());
    }
}
