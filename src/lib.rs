//! Stick Balance - keep a pivoted stick upright on a moving disc
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, weather, power-ups, game state)
//! - `renderer`: WebGPU rendering of simulation snapshots
//! - `settings`: Player/host configuration
//! - `tuning`: Data-driven game balance
//! - `audio`: Procedural ambience and sound effects (browser only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    /// Fixed simulation timestep in milliseconds (60 Hz, the rate the
    /// per-tick physics constants are calibrated for)
    pub const SIM_DT_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the driver will feed into the accumulator
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Canvas size used until the host reports its own
    pub const DEFAULT_CANVAS_WIDTH: f32 = 800.0;
    pub const DEFAULT_CANVAS_HEIGHT: f32 = 600.0;

    /// Disc defaults
    pub const DISC_WIDTH: f32 = 100.0;
    pub const DISC_HEIGHT: f32 = 10.0;
    /// Distance from the canvas bottom to the top of the disc
    pub const DISC_BOTTOM_OFFSET: f32 = 200.0;

    /// Stick defaults
    pub const STICK_LENGTH: f32 = 150.0;
    pub const STICK_UPRIGHT: f32 = FRAC_PI_2;
    /// Fall thresholds: outside (FALL_MIN, FALL_MAX) the stick is down
    pub const FALL_MIN_ANGLE: f32 = FRAC_PI_4;
    pub const FALL_MAX_ANGLE: f32 = 3.0 * FRAC_PI_4;

    /// Power-up defaults
    pub const POWERUP_SIZE: f32 = 20.0;
    pub const POWERUP_SPAWN_Y: f32 = -20.0;

    /// Particle batches
    pub const AMBIENCE_PARTICLE_COUNT: usize = 50;
    pub const BURST_PARTICLE_COUNT: usize = 50;
    /// Where recycled ambience particles re-enter
    pub const PARTICLE_RECYCLE_Y: f32 = -10.0;
}

/// Vertical position of the disc's top edge for a canvas of `canvas_height`
#[inline]
pub fn disc_top(canvas_height: f32) -> f32 {
    canvas_height - consts::DISC_BOTTOM_OFFSET
}

/// Clamp a disc center so the whole disc stays on the canvas
#[inline]
pub fn clamp_disc_x(x: f32, canvas_width: f32) -> f32 {
    let half = consts::DISC_WIDTH / 2.0;
    // Narrower than the disc: pin it to the middle
    if canvas_width <= consts::DISC_WIDTH {
        return canvas_width / 2.0;
    }
    x.clamp(half, canvas_width - half)
}

/// Screen position of the stick's free end (y grows downward)
#[inline]
pub fn stick_tip(pivot: Vec2, angle: f32, length: f32) -> Vec2 {
    Vec2::new(pivot.x + length * angle.cos(), pivot.y - length * angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_disc_x() {
        assert_eq!(clamp_disc_x(-30.0, 800.0), 50.0);
        assert_eq!(clamp_disc_x(900.0, 800.0), 750.0);
        assert_eq!(clamp_disc_x(400.0, 800.0), 400.0);
        assert_eq!(clamp_disc_x(10.0, 60.0), 30.0);
    }

    #[test]
    fn test_stick_tip_upright() {
        let tip = stick_tip(Vec2::new(100.0, 400.0), consts::STICK_UPRIGHT, 150.0);
        assert!((tip.x - 100.0).abs() < 1e-4);
        assert!((tip.y - 250.0).abs() < 1e-4);
    }
}
