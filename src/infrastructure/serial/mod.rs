// Serial module - Local serial device backend
pub mod baud;
pub mod client;

pub use baud::{BaudRate, SUPPORTED_BAUD_RATES};
pub use client::SerialBackend;
