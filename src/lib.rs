//! Vehicle combat - arcade vehicle simulation core and multiplayer relay room
//!
//! The `game` module is the frame-driven simulation (kinematics, weapons, damage,
//! and the sync boundary). The remaining modules make up the relay server binary.

pub mod app;
pub mod config;
pub mod game;
pub mod http;
pub mod room;
pub mod util;
pub mod ws;
