use super::terminal::Console;
use crate::core::communication::poller::write_chunk;
use crate::core::communication::{drain, Backend, DrainReport, Relay, RelayStats, TransportType};
use crate::domain::config::SessionConfig;
use crate::domain::error::{Endpoint, TermLinkResult};
use std::time::{Duration, Instant};
use tracing::{info, warn};

const CONNECTED_MARKER: &[u8] = b"<<Connected>>\r\n";
const EXITING_MARKER: &[u8] = b"\r\n<<Exiting>>\r\n";

/// Summary of a session that ended with the escape character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub transport_type: TransportType,
    pub peer: String,
    pub drain: Option<DrainReport>,
    pub relay: RelayStats,
    pub elapsed: Duration,
}

/// Open the configured backend and relay between it and `console` until the
/// escape character is typed.
///
/// Every return path restores the console, then the backend, before the
/// backend is closed. Only the escape path writes the exit marker.
pub fn run_session<C>(console: &mut C, config: &SessionConfig) -> TermLinkResult<SessionReport>
where
    C: Console + ?Sized,
{
    let started = Instant::now();

    let mut backend = match config.backend.open() {
        Ok(backend) => backend,
        Err(e) => {
            restore_console(console);
            return Err(e);
        }
    };

    let result = attach(console, &mut *backend, config, started);

    if result.is_ok() {
        if let Err(e) = write_chunk(console, EXITING_MARKER, Endpoint::Terminal) {
            warn!("Failed to write exit marker: {}", e);
        }
    }

    restore_console(console);
    if let Err(e) = backend.restore() {
        warn!("Failed to restore {} {}: {}", backend.transport_type(), backend.peer(), e);
    }
    drop(backend);

    result
}

fn attach<C>(
    console: &mut C,
    backend: &mut dyn Backend,
    config: &SessionConfig,
    started: Instant,
) -> TermLinkResult<SessionReport>
where
    C: Console + ?Sized,
{
    write_chunk(console, CONNECTED_MARKER, Endpoint::Terminal)?;

    let drained = if config.drain.is_enabled() {
        Some(drain(&mut *console, &mut *backend, &config.drain)?)
    } else {
        None
    };

    let relay = Relay::new(&mut *console, &mut *backend, config.escape).run()?;

    let report = SessionReport {
        transport_type: backend.transport_type(),
        peer: backend.peer().to_string(),
        drain: drained,
        relay,
        elapsed: started.elapsed(),
    };

    info!(
        peer = %report.peer,
        sent = report.relay.bytes_sent,
        received = report.relay.bytes_received,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Session finished"
    );
    Ok(report)
}

fn restore_console<C: Console + ?Sized>(console: &mut C) {
    if let Err(e) = console.restore() {
        warn!("Failed to restore terminal: {}", e);
    }
}
