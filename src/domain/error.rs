use std::fmt;
use thiserror::Error;

/// Process exit code for a session ended with the escape character
pub const EXIT_OK: i32 = 0;
/// Process exit code for configuration, usage and setup failures
pub const EXIT_CONFIG: i32 = 1;
/// Process exit code for runtime I/O failures and internal errors
pub const EXIT_FATAL: i32 = 2;

/// One side of the relay, used to give I/O errors their context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// The operator's controlling terminal
    Terminal,
    /// A local serial device
    Serial,
    /// A TCP serial bridge
    Tcp,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Terminal => write!(f, "tty"),
            Endpoint::Serial => write!(f, "serial port"),
            Endpoint::Tcp => write!(f, "TCP port"),
        }
    }
}

/// TermLink unified error type
#[derive(Error, Debug)]
pub enum TermLinkError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("unsupported baud rate \"{0}\"")]
    UnsupportedBaud(String),

    #[error("invalid bridge host IP address \"{0}\"")]
    InvalidAddress(String),

    #[error("invalid bridge TCP port \"{0}\"")]
    InvalidPort(String),

    #[error("unable to open {path}: {source}")]
    TerminalOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to configure {endpoint} line settings: {source}")]
    Termios {
        endpoint: Endpoint,
        #[source]
        source: nix::Error,
    },

    #[error("unable to open local port \"{path}\": {source}")]
    DeviceOpen {
        path: String,
        #[source]
        source: serialport::Error,
    },

    #[error("connection to {host}:{port} failed: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("call to {endpoint} poll failed: {source}")]
    Poll {
        endpoint: Endpoint,
        #[source]
        source: nix::Error,
    },

    #[error("{endpoint} poll said there was data but error when trying to read the data: {source}")]
    Read {
        endpoint: Endpoint,
        #[source]
        source: std::io::Error,
    },

    #[error("{endpoint} poll said there was data but read returned no data")]
    Closed { endpoint: Endpoint },

    #[error("write to {endpoint} failed: {source}")]
    Write {
        endpoint: Endpoint,
        #[source]
        source: std::io::Error,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl TermLinkError {
    /// Shorthand for a configuration error carrying a message
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Runtime failures end a live session; everything else happens before one starts
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Poll { .. }
                | Self::Read { .. }
                | Self::Closed { .. }
                | Self::Write { .. }
                | Self::Internal(_)
        )
    }

    /// Process exit code reported for this error
    pub fn exit_code(&self) -> i32 {
        if self.is_fatal() {
            EXIT_FATAL
        } else {
            EXIT_CONFIG
        }
    }
}

pub type TermLinkResult<T> = Result<T, TermLinkError>;
