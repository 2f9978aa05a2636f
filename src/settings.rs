//! Game settings and preferences
//!
//! Read once at startup from the page's inline config block; never written
//! back.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    #[serde(alias = "low")]
    Low,
    #[default]
    #[serde(alias = "medium", alias = "med")]
    Medium,
    #[serde(alias = "high")]
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Maximum particles drawn for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 40,
            QualityPreset::Medium => 100,
            QualityPreset::High => 200,
        }
    }

    /// Triangle fan segments per circle
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 8,
            QualityPreset::Medium => 16,
            QualityPreset::High => 32,
        }
    }

    /// Draw snow as six-branch flakes instead of dots
    pub fn snowflakes_enabled(&self) -> bool {
        matches!(self, QualityPreset::High)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Weather and burst particles
    pub particles: bool,
    /// White-out when lightning strikes
    pub lightning_flash: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Weather ambience volume (0.0 - 1.0)
    pub ambience_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no flashes)
    pub reduced_motion: bool,

    // === Gameplay ===
    /// Fixed RNG seed; the page clock is used when absent
    pub seed: Option<u64>,
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            particles: true,
            lightning_flash: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            ambience_volume: 0.5,
            muted: false,

            reduced_motion: false,

            seed: None,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.tuning = settings.tuning.sanitized();
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        settings.ambience_volume = settings.ambience_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Effective lightning flash (respects reduced_motion)
    pub fn effective_lightning_flash(&self) -> bool {
        self.lightning_flash && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Output gain for sound effects
    pub fn sfx_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Output gain for the weather drone
    pub fn ambience_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.ambience_volume
        }
    }

    /// Element holding the page's JSON config
    pub const CONFIG_ELEMENT_ID: &'static str = "game-config";

    /// Load settings from the page's config block (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        let Some(json) = json else {
            log::info!("No #{} block, using default settings", Self::CONFIG_ELEMENT_ID);
            return Self::default();
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings (quality {})", settings.quality.as_str());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {}", e);
                Self::default()
            }
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_quality_names() {
        let settings = Settings::from_json(r#"{"quality":"high"}"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::High);
        let settings = Settings::from_json(r#"{"quality":"med"}"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert!(Settings::from_json(r#"{"quality":"ultra"}"#).is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{"quality":"Low","seed":42,"tuning":{"gravity":0.004}}"#)
                .unwrap();
        assert_eq!(settings.quality, QualityPreset::Low);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.tuning.gravity, 0.004);
        assert_eq!(settings.tuning.damping, 0.995);
        assert!(settings.lightning_flash);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Settings::from_json("{quality: Low").is_err());
    }

    #[test]
    fn test_volumes_clamped() {
        let settings = Settings::from_json(r#"{"master_volume":3.0,"sfx_volume":-1.0}"#).unwrap();
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.sfx_gain(), 0.0);
    }

    #[test]
    fn test_reduced_motion_disables_flash() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert!(!settings.effective_lightning_flash());
    }

    #[test]
    fn test_mute_silences_everything() {
        let settings = Settings {
            muted: true,
            quality: QualityPreset::High,
            ..Settings::default()
        };
        assert_eq!(settings.sfx_gain(), 0.0);
        assert_eq!(settings.ambience_gain(), 0.0);
        assert_eq!(settings.max_particles(), 200);
    }
}
