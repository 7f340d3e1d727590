// Communication module - Backend abstraction, drain stage and relay loop
pub mod drain;
pub mod filter;
pub mod poller;
pub mod relay;
pub mod transport;

pub use drain::{drain, DrainReport, MAX_DRAIN_DOTS};
pub use relay::{Relay, RelayState, RelayStats, RELAY_POLL_TIMEOUT_MS};
pub use transport::{Backend, TransportType};
