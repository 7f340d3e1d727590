use super::filter::{filter_output, screen_input, InputAction};
use super::poller::{read_chunk, wait_readable, write_chunk};
use super::transport::Backend;
use crate::domain::error::{Endpoint, TermLinkResult};
use std::io::{Read, Write};
use std::os::fd::AsFd;
use tracing::{debug, info, trace};

/// Poll interval for each direction; keeps both sides responsive without threads
pub const RELAY_POLL_TIMEOUT_MS: u32 = 10;

const RELAY_BUFFER_SIZE: usize = 8192;

/// Relay state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Active,
    Closing,
}

/// Session statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    /// Chunks read from the keyboard
    pub keyboard_chunks: u64,
    /// Bytes forwarded to the backend
    pub bytes_sent: u64,
    /// Chunks read from the backend
    pub backend_chunks: u64,
    /// Bytes read from the backend
    pub bytes_received: u64,
    /// Backend bytes written to the terminal
    pub bytes_shown: u64,
    /// ESC bytes suppressed from backend output
    pub escapes_suppressed: u64,
    /// Other backend bytes dropped by the filter
    pub bytes_filtered: u64,
}

/// Copies bytes between the operator's terminal and a backend until the
/// escape character is typed or an I/O call fails.
pub struct Relay<'a, T: ?Sized, B: ?Sized> {
    terminal: &'a mut T,
    backend: &'a mut B,
    escape: u8,
    poll_timeout_ms: u32,
    state: RelayState,
    stats: RelayStats,
    input: Vec<u8>,
    output: Vec<u8>,
    display: Vec<u8>,
}

impl<'a, T, B> Relay<'a, T, B>
where
    T: Read + Write + AsFd + ?Sized,
    B: Backend + ?Sized,
{
    pub fn new(terminal: &'a mut T, backend: &'a mut B, escape: u8) -> Self {
        Self {
            terminal,
            backend,
            escape,
            poll_timeout_ms: RELAY_POLL_TIMEOUT_MS,
            state: RelayState::Active,
            stats: RelayStats::default(),
            input: vec![0u8; RELAY_BUFFER_SIZE],
            output: vec![0u8; RELAY_BUFFER_SIZE],
            display: Vec::with_capacity(RELAY_BUFFER_SIZE),
        }
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    pub fn stats(&self) -> &RelayStats {
        &self.stats
    }

    /// Run until the escape character is seen. Any error is fatal and leaves
    /// the relay where it failed; the caller owns restoration.
    pub fn run(mut self) -> TermLinkResult<RelayStats> {
        info!(
            "Relaying between terminal and {} {} (escape character {:?})",
            self.backend.transport_type(),
            self.backend.peer(),
            char::from(self.escape)
        );

        while self.state == RelayState::Active {
            self.step()?;
        }

        info!(
            sent = self.stats.bytes_sent,
            received = self.stats.bytes_received,
            shown = self.stats.bytes_shown,
            "Relay closed by escape character"
        );
        Ok(self.stats)
    }

    /// One loop iteration: keyboard first, then the backend if still active
    pub fn step(&mut self) -> TermLinkResult<RelayState> {
        if self.state == RelayState::Active {
            self.pump_keyboard()?;
        }
        if self.state == RelayState::Active {
            self.pump_backend()?;
        }
        Ok(self.state)
    }

    fn pump_keyboard(&mut self) -> TermLinkResult<()> {
        if !wait_readable(self.terminal.as_fd(), self.poll_timeout_ms, Endpoint::Terminal)? {
            return Ok(());
        }

        let n = read_chunk(self.terminal, &mut self.input, Endpoint::Terminal)?;
        self.stats.keyboard_chunks += 1;
        debug!("{} chars read from keyboard", n);

        match screen_input(&self.input[..n], self.escape) {
            InputAction::Escape { position } => {
                debug!("Escape character at offset {} of {}, dropping chunk", position, n);
                self.state = RelayState::Closing;
            }
            InputAction::Forward => {
                let endpoint = self.backend.transport_type().endpoint();
                write_chunk(self.backend, &self.input[..n], endpoint)?;
                self.stats.bytes_sent += n as u64;
            }
        }

        Ok(())
    }

    fn pump_backend(&mut self) -> TermLinkResult<()> {
        let endpoint = self.backend.transport_type().endpoint();
        if !wait_readable(self.backend.poll_fd(), self.poll_timeout_ms, endpoint)? {
            return Ok(());
        }

        let n = read_chunk(self.backend, &mut self.output, endpoint)?;
        self.stats.backend_chunks += 1;
        self.stats.bytes_received += n as u64;
        debug!("{} chars read from {}", n, endpoint);

        self.display.clear();
        let outcome = filter_output(&self.output[..n], &mut self.display);
        self.stats.bytes_shown += outcome.shown as u64;
        self.stats.escapes_suppressed += outcome.escapes as u64;
        self.stats.bytes_filtered += outcome.dropped as u64;
        if outcome.escapes > 0 || outcome.dropped > 0 {
            trace!(escapes = outcome.escapes, dropped = outcome.dropped, "Filtered backend output");
        }

        if !self.display.is_empty() {
            write_chunk(self.terminal, &self.display, Endpoint::Terminal)?;
        }

        Ok(())
    }
}
