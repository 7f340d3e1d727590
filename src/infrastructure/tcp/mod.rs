// TCP module - Serial bridge backend
pub mod address;
pub mod client;

pub use address::resolve_bridge_addr;
pub use client::NetworkBackend;
