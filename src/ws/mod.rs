//! WebSocket transport for the relay room

pub mod handler;
pub mod protocol;
