// Logging module - Logging infrastructure
use crate::domain::error::{TermLinkError, TermLinkResult};
use std::fmt;
use std::io::{self, Write};
use std::panic;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging system.
///
/// `RUST_LOG` takes precedence; otherwise `--debug` selects debug output and
/// the configured level applies.
pub fn init_logging(debug: bool, level: &str) -> TermLinkResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive_for(debug, level)))
        .unwrap_or_else(|_| EnvFilter::new("termlink=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(|| CrlfWriter::new(io::stderr()))
                .with_target(false)
                .with_level(true),
        )
        .try_init()
        .map_err(|e| TermLinkError::config(format!("Failed to initialize logging: {}", e)))?;

    tracing::debug!("TermLink logging system initialized");
    Ok(())
}

/// Report panics through [`CrlfWriter`]. The guards only restore the
/// terminal while unwinding, after the hook has already printed.
pub fn install_panic_hook() {
    panic::set_hook(Box::new(|info| {
        let _ = write_panic(&mut CrlfWriter::new(io::stderr()), info);
    }));
}

fn write_panic<W: Write>(out: &mut W, info: &dyn fmt::Display) -> io::Result<()> {
    writeln!(out, "termlink {}", info)?;
    out.flush()
}

fn directive_for(debug: bool, level: &str) -> String {
    let level = if debug { "debug" } else { level.trim() };
    format!("termlink={}", level)
}

/// Writer that emits `\r\n` for every `\n` so log lines stay aligned while
/// the terminal is in raw mode
pub struct CrlfWriter<W: Write> {
    inner: W,
}

impl<W: Write> CrlfWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Write for CrlfWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for line in buf.split_inclusive(|&b| b == b'\n') {
            match line.strip_suffix(b"\n") {
                Some(text) => {
                    let text = text.strip_suffix(b"\r").unwrap_or(text);
                    self.inner.write_all(text)?;
                    self.inner.write_all(b"\r\n")?;
                }
                None => self.inner.write_all(line)?,
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
