// Domain module - Configuration values and the error taxonomy
pub mod config;
pub mod error;
