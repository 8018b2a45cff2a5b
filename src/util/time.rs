//! Time utilities for the simulation and the relay server

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Get current Unix timestamp in milliseconds
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}

/// Server start time for uptime tracking
static SERVER_START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize server start time (call once at startup)
pub fn init_server_time() {
    SERVER_START.get_or_init(Instant::now);
}

/// Get server uptime in seconds
pub fn uptime_secs() -> u64 {
    SERVER_START
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0)
}

/// Per-vehicle kinematic tuning is expressed per frame at this rate
pub const NOMINAL_FPS: u32 = 60;
pub const NOMINAL_FRAME_SECS: f32 = 1.0 / NOMINAL_FPS as f32;

/// Longest frame the simulation will integrate in one tick (stall / tab-switch guard)
pub const MAX_FRAME_DELTA_MS: u64 = 100;

/// Elapsed milliseconds between two frame timestamps, clamped to `max_ms`.
/// A clock that goes backwards yields zero.
pub fn clamped_delta_ms(previous: u64, now: u64, max_ms: u64) -> u64 {
    now.saturating_sub(previous).min(max_ms)
}

/// How many nominal frames `dt` seconds covers
pub fn frame_scale(dt: f32) -> f32 {
    dt / NOMINAL_FRAME_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_clamped_after_a_stall() {
        assert_eq!(clamped_delta_ms(1_000, 1_016, MAX_FRAME_DELTA_MS), 16);
        assert_eq!(clamped_delta_ms(1_000, 5_000, MAX_FRAME_DELTA_MS), 100);
    }

    #[test]
    fn backwards_clock_yields_zero_delta() {
        assert_eq!(clamped_delta_ms(2_000, 1_500, MAX_FRAME_DELTA_MS), 0);
    }

    #[test]
    fn nominal_frame_has_unit_scale() {
        assert!((frame_scale(NOMINAL_FRAME_SECS) - 1.0).abs() < 1e-6);
    }
}
