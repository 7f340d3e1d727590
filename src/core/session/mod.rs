// Session module - Terminal lifecycle and session orchestration
pub mod guard;
pub mod session;
pub mod terminal;

pub use guard::RawModeGuard;
pub use session::{run_session, SessionReport};
pub use terminal::{Console, TerminalSession, DEV_TTY};
