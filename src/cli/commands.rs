use crate::cli::args::Args;
use crate::core::session::{run_session, SessionReport, TerminalSession};
use crate::domain::config::{
    parse_escape_char, BackendConfig, DrainConfig, NetworkSettings, SerialSettings, SessionConfig,
    TermLinkConfig,
};
use crate::domain::error::{TermLinkError, TermLinkResult};
use crate::infrastructure::config::ConfigManager;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::serial::BaudRate;
use crate::infrastructure::tcp::resolve_bridge_addr;
use std::time::Duration;
use tracing::debug;

/// Execute the relay session described by the command line.
///
/// The terminal has been restored by the time this returns, so callers may
/// report errors on stderr directly.
pub fn execute_command(args: Args) -> TermLinkResult<SessionReport> {
    let config = ConfigManager::new().load(args.config.as_deref())?;

    init_logging(args.debug, &config.global.log_level)?;

    let session_config = resolve_session_config(&args, &config)?;
    log_summary(&session_config);

    let mut terminal = TerminalSession::open()?;
    let report = run_session(&mut terminal, &session_config)?;

    debug!(
        "{} session with {} ended: {} bytes sent, {} bytes received, {} shown",
        report.transport_type,
        report.peer,
        report.relay.bytes_sent,
        report.relay.bytes_received,
        report.relay.bytes_shown
    );
    Ok(report)
}

/// Merge command-line values over the defaults file and validate the result
pub fn resolve_session_config(
    args: &Args,
    config: &TermLinkConfig,
) -> TermLinkResult<SessionConfig> {
    let escape = match args.escape {
        Some(escape) => escape,
        None => parse_escape_char(&config.global.escape_char).map_err(TermLinkError::config)?,
    };
    let drain = DrainConfig::new(args.drain.unwrap_or(config.global.drain_ms));

    let backend = match args.target.as_deref() {
        Some(host) if !host.starts_with('/') => {
            let port = args.parameter.as_deref().unwrap_or(&config.tcp.port);
            BackendConfig::Network(NetworkSettings {
                host: host.to_string(),
                addr: resolve_bridge_addr(host, port)?,
                connect_timeout: Duration::from_millis(config.tcp.connect_timeout_ms),
                no_delay: config.tcp.no_delay,
            })
        }
        target => {
            let path = target.unwrap_or(&config.serial.device);
            let baud = args.parameter.as_deref().unwrap_or(&config.serial.baud);
            BackendConfig::Serial(SerialSettings {
                path: path.to_string(),
                baud: BaudRate::resolve(baud)?,
                timeout: Duration::from_millis(config.serial.timeout_ms),
            })
        }
    };

    SessionConfig::new(escape, drain, backend)
}

fn log_summary(config: &SessionConfig) {
    let escape = char::from(config.escape);
    match &config.backend {
        BackendConfig::Serial(serial) => debug!(
            mode = "serial",
            escape = %escape,
            drain_ms = config.drain.period_ms(),
            device = %serial.path,
            baud = serial.baud.value(),
            "Session configuration for {}",
            config.backend.label()
        ),
        BackendConfig::Network(network) => debug!(
            mode = "tcp",
            escape = %escape,
            drain_ms = config.drain.period_ms(),
            host = %network.host,
            port = network.addr.port(),
            "Session configuration for {}",
            config.backend.label()
        ),
    }
}
