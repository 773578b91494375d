//! Skate Dash - A side-scrolling skate-and-collect arcade game
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (kinematics, spawning, collisions, feedback)
//! - `session`: Session lifecycle and end-of-run reporting
//! - `renderer`: WebGPU rendering pipeline
//! - `tuning`: Data-driven game feel constants
//! - `settings`: Persisted player preferences

pub mod outfit;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use outfit::{Companion, Outfit};
pub use session::{GameSession, SessionOwner, SessionPhase};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal frame interval the per-frame constants are tuned against (60 Hz)
    pub const NOMINAL_FRAME_MS: f32 = 1000.0 / 60.0;
    /// Largest frame delta accepted, as a multiple of the nominal frame
    pub const MAX_FRAME_FACTOR: f32 = 3.0;

    /// Player is pinned at this x; the world scrolls past
    pub const PLAYER_X: f32 = 120.0;
    pub const PLAYER_WIDTH: f32 = 36.0;
    pub const PLAYER_HEIGHT: f32 = 52.0;

    /// Distance from the bottom of the viewport to the ground line
    pub const GROUND_MARGIN: f32 = 90.0;
    /// Horizontal run that rail slope is expressed over (pixels)
    pub const RAIL_SLOPE_RUN: f32 = 100.0;
    /// Rail collision/visual thickness
    pub const RAIL_THICKNESS: f32 = 8.0;
    /// Obstacle width
    pub const OBSTACLE_WIDTH: f32 = 34.0;

    /// Hard cap on live particles
    pub const MAX_PARTICLES: usize = 400;
}

/// Convert an elapsed wall-clock delta (ms) into the per-frame scaling factor.
///
/// Non-finite or negative deltas count as one nominal frame; stalls are
/// clamped to [`consts::MAX_FRAME_FACTOR`] frames.
#[inline]
pub fn frame_factor(elapsed_ms: f64) -> f32 {
    use consts::*;
    if !elapsed_ms.is_finite() || elapsed_ms <= 0.0 {
        return 1.0;
    }
    (elapsed_ms as f32 / NOMINAL_FRAME_MS).min(MAX_FRAME_FACTOR)
}

/// Exponential decay of `value` by `rate` per nominal frame, scaled by `dt`
#[inline]
pub fn decay(value: f32, rate: f32, dt: f32) -> f32 {
    value * rate.powf(dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_factor_clamps() {
        assert_eq!(frame_factor(f64::NAN), 1.0);
        assert_eq!(frame_factor(-5.0), 1.0);
        assert!((frame_factor(1000.0 / 60.0) - 1.0).abs() < 1e-4);
        assert_eq!(frame_factor(5_000.0), consts::MAX_FRAME_FACTOR);
    }

    #[test]
    fn test_decay_matches_repeated_frames() {
        let once = decay(decay(1.0, 0.9, 1.0), 0.9, 1.0);
        let twice = decay(1.0, 0.9, 2.0);
        assert!((once - twice).abs() < 1e-6);
    }
}
