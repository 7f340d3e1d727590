// Core module - Relay engine
pub mod communication;
pub mod session;
