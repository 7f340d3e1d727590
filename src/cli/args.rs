use crate::domain::config::parse_escape_char;
use clap::Parser;
use std::path::PathBuf;

/// Command line arguments for TermLink
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "termlink",
    version = env!("CARGO_PKG_VERSION"),
    about = "Interactive terminal for a local serial port or a TCP serial bridge",
    long_about = "Relays keystrokes to a serial device or a TCP serial bridge and shows what comes back.\n\
                  A TARGET starting with '/' is a serial device path and PARAM is its baud rate;\n\
                  any other TARGET is the bridge's IPv4 address and PARAM is its TCP port.\n\
                  Type the escape character to leave the session."
)]
pub struct Args {
    /// Log configuration and per-chunk diagnostics to stderr
    #[arg(long)]
    pub debug: bool,

    /// Discard backend output for this many milliseconds before relaying
    #[arg(
        short = 'd',
        value_name = "MS",
        value_parser = clap::value_parser!(u32).range(1..=i64::from(i32::MAX))
    )]
    pub drain: Option<u32>,

    /// Character that ends the session [default: ^]
    #[arg(short = 'e', value_name = "CHAR", value_parser = parse_escape_char)]
    pub escape: Option<u8>,

    /// Defaults file to use instead of the project or user one
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Serial device path or bridge host
    #[arg(value_name = "TARGET")]
    pub target: Option<String>,

    /// Baud rate for a serial device, TCP port for a bridge
    #[arg(value_name = "PARAM")]
    pub parameter: Option<String>,
}
