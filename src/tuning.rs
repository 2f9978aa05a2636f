//! Data-driven gameplay balance
//!
//! Every number that shapes how the stick behaves lives here so it can be
//! tweaked from the page config without a rebuild. Geometry stays in
//! [`crate::consts`].

use serde::{Deserialize, Serialize};

/// Gameplay tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Physics ===
    /// Gravity torque coefficient (per tick)
    pub gravity: f32,
    /// Angular velocity multiplier applied every tick
    pub damping: f32,
    /// Angular impulse per pixel of disc travel
    pub counterbalance_gain: f32,

    // === Wind ===
    /// Round time after which wind starts ramping (ms)
    pub wind_ramp_start_ms: f64,
    /// Wind gained per `wind_ramp_period_ms` of round time
    pub wind_ramp_rate: f32,
    pub wind_ramp_period_ms: f64,
    /// Maximum wind strength
    pub wind_cap: f32,
    /// Per-tick probability that the wind blows to the right
    pub wind_right_chance: f64,

    // === Round ===
    /// Length of the grace window at the start of a round (ms)
    pub grace_period_ms: f64,

    // === Weather ===
    pub weather_interval_min_ms: f64,
    pub weather_interval_max_ms: f64,
    pub lightning_interval_min_ms: f64,
    pub lightning_interval_max_ms: f64,
    /// How long the screen stays lit after a strike (ms)
    pub lightning_flash_ms: f64,

    // === Power-ups ===
    /// Per-tick spawn probability
    pub powerup_spawn_chance: f64,
    /// Fall speed in pixels per tick
    pub powerup_fall_speed: f32,
    /// Effect window length (ms)
    pub powerup_duration_ms: f64,
    /// Score bonus granted when an effect becomes active
    pub powerup_bonus: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.002,
            damping: 0.995,
            counterbalance_gain: 0.0003,

            wind_ramp_start_ms: 5000.0,
            wind_ramp_rate: 0.00003,
            wind_ramp_period_ms: 50000.0,
            wind_cap: 0.003,
            wind_right_chance: 0.995,

            grace_period_ms: 2000.0,

            weather_interval_min_ms: 15000.0,
            weather_interval_max_ms: 30000.0,
            lightning_interval_min_ms: 2000.0,
            lightning_interval_max_ms: 7000.0,
            lightning_flash_ms: 200.0,

            powerup_spawn_chance: 0.01,
            powerup_fall_speed: 2.0,
            powerup_duration_ms: 5000.0,
            powerup_bonus: 50,
        }
    }
}

impl Tuning {
    /// Clamp probabilities into [0, 1] and put interval bounds in order.
    ///
    /// Config comes from the page, so bad values are repaired rather than
    /// rejected.
    pub fn sanitized(mut self) -> Self {
        self.wind_right_chance = self.wind_right_chance.clamp(0.0, 1.0);
        self.powerup_spawn_chance = self.powerup_spawn_chance.clamp(0.0, 1.0);
        self.damping = self.damping.clamp(0.0, 1.0);
        self.wind_cap = self.wind_cap.max(0.0);
        self.wind_ramp_period_ms = self.wind_ramp_period_ms.max(1.0);
        self.grace_period_ms = self.grace_period_ms.max(0.0);
        self.lightning_flash_ms = self.lightning_flash_ms.max(0.0);
        self.powerup_duration_ms = self.powerup_duration_ms.max(0.0);

        order(&mut self.weather_interval_min_ms, &mut self.weather_interval_max_ms);
        order(
            &mut self.lightning_interval_min_ms,
            &mut self.lightning_interval_max_ms,
        );
        self
    }

    /// Wind strength the ramp prescribes at `elapsed_ms` of round time
    pub fn ramped_wind(&self, elapsed_ms: f64) -> f32 {
        let ramp = self.wind_ramp_rate as f64 * (elapsed_ms / self.wind_ramp_period_ms);
        (ramp as f32).min(self.wind_cap)
    }
}

fn order(min: &mut f64, max: &mut f64) {
    *min = min.max(0.0);
    *max = max.max(0.0);
    if *min > *max {
        std::mem::swap(min, max);
    }
}
