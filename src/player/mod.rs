//! Embedded player control: SDK seam, per-mount adapter and state polling.

mod adapter;
mod backend;
mod clock;
mod mount;
mod poller;
mod sdk_loader;
mod simulated;

pub use adapter::*;
pub use backend::*;
pub use clock::*;
pub use mount::*;
pub use poller::*;
pub use sdk_loader::*;
pub use simulated::*;

/// Polled mirror of the player's continuous properties.
/// Stale by at most one poll interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSnapshot {
    pub current_time_seconds: f64,
    pub duration_seconds: f64,
    pub is_paused: bool,
    pub is_muted: bool,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            current_time_seconds: 0.0,
            duration_seconds: 0.0,
            is_paused: true,
            is_muted: false,
        }
    }
}
