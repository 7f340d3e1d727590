//! TermLink Library
//!
//! Interactive terminal relay between the controlling tty and either a local
//! serial device or a TCP serial bridge.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use core::communication::{Backend, Relay, RelayStats, TransportType};
pub use core::session::{run_session, SessionReport, TerminalSession};
pub use domain::config::{SessionConfig, TermLinkConfig};
pub use domain::error::{TermLinkError, TermLinkResult};
