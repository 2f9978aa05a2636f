//! Read-only view of the game for renderers and the HUD

use glam::Vec2;
use serde::Serialize;

use super::state::{GamePhase, GameState, Particle, PowerUp, PowerUpKind, WeatherMode};
use crate::consts::STICK_LENGTH;

const TUTORIAL_LINES: [&str; 5] = [
    "Welcome to the Stick Balancing Game!",
    "Use your mouse to move the disc left or right.",
    "Keep the stick balanced as long as possible.",
    "Avoid falling due to wind or gravity!",
    "Click to start the game.",
];

/// An active power-up effect and how long it has left
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectStatus {
    pub kind: PowerUpKind,
    pub remaining_ms: f64,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub canvas: Vec2,
    pub disc_x: f32,
    /// Top edge of the disc (the stick pivot)
    pub disc_y: f32,
    pub stick_angle: f32,
    pub stick_tip: Vec2,
    pub elapsed_ms: f64,
    pub score: u64,
    pub highest_score: u64,
    pub weather: WeatherMode,
    pub is_lightning: bool,
    pub particles: &'a [Particle],
    pub power_ups: &'a [PowerUp],
    pub effects: Vec<EffectStatus>,
    /// Centered message lines (tutorial, pause, game over)
    pub overlay: Vec<String>,
}

impl Snapshot<'_> {
    /// Time / score / best lines, shown once the tutorial is dismissed
    pub fn hud_lines(&self) -> Option<[String; 3]> {
        if self.phase == GamePhase::Tutorial {
            return None;
        }
        Some([
            format!("Time: {:.1}s", self.elapsed_ms / 1000.0),
            format!("Score: {}", self.score),
            format!("Highest Score: {}", self.highest_score),
        ])
    }
}

fn overlay_lines(phase: GamePhase) -> Vec<String> {
    match phase {
        GamePhase::Tutorial => TUTORIAL_LINES.iter().map(|s| s.to_string()).collect(),
        GamePhase::Running => Vec::new(),
        GamePhase::Paused => vec!["Paused".into(), "Press Space to resume".into()],
        GamePhase::Over => vec!["Game Over!".into(), "Click to Restart".into()],
    }
}

impl GameState {
    /// Borrow a renderable view of the current state
    pub fn snapshot(&self) -> Snapshot<'_> {
        let disc_y = self.disc_y();
        let effects = PowerUpKind::ALL
            .iter()
            .filter_map(|&kind| {
                self.effect_remaining(kind)
                    .filter(|_| self.effects.is_active(kind))
                    .map(|remaining_ms| EffectStatus { kind, remaining_ms })
            })
            .collect();

        Snapshot {
            phase: self.phase,
            canvas: self.canvas,
            disc_x: self.disc.x,
            disc_y,
            stick_angle: self.stick.angle,
            stick_tip: crate::stick_tip(Vec2::new(self.disc.x, disc_y), self.stick.angle, STICK_LENGTH),
            elapsed_ms: self.time.elapsed_ms(),
            score: self.time.score,
            highest_score: self.time.highest_score,
            weather: self.env.weather,
            is_lightning: self.env.is_lightning,
            particles: &self.particles,
            power_ups: &self.power_ups,
            effects,
            overlay: overlay_lines(self.phase),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::powerups;
    use crate::tuning::Tuning;

    #[test]
    fn test_tutorial_snapshot() {
        let state = GameState::new(1, Tuning::default());
        let snap = state.snapshot();
        assert_eq!(snap.overlay.len(), 5);
        assert_eq!(snap.overlay[4], "Click to start the game.");
        assert!(snap.hud_lines().is_none());
        assert_eq!(snap.disc_y, 400.0);
        assert!((snap.stick_tip.y - 250.0).abs() < 1e-3);
    }

    #[test]
    fn test_hud_text() {
        let mut state = GameState::new(1, Tuning::default());
        state.phase = GamePhase::Running;
        state.time.elapsed_us = 12_345_000;
        state.time.bonus = 50;
        state.time.recompute_score();
        state.time.highest_score = 80;

        let hud = state.snapshot().hud_lines().unwrap();
        assert_eq!(hud[0], "Time: 12.3s");
        assert_eq!(hud[1], "Score: 62");
        assert_eq!(hud[2], "Highest Score: 80");
        assert!(state.snapshot().overlay.is_empty());
    }

    #[test]
    fn test_game_over_overlay() {
        let mut state = GameState::new(1, Tuning::default());
        state.phase = GamePhase::Over;
        let snap = state.snapshot();
        assert_eq!(snap.overlay, vec!["Game Over!", "Click to Restart"]);
    }

    #[test]
    fn test_active_effects_listed() {
        let mut state = GameState::new(1, Tuning::default());
        state.phase = GamePhase::Running;
        powerups::activate(&mut state, PowerUpKind::StickFreeze);
        state.time.elapsed_us = 1_500_000;

        let snap = state.snapshot();
        assert_eq!(
            snap.effects,
            vec![EffectStatus {
                kind: PowerUpKind::StickFreeze,
                remaining_ms: 3500.0
            }]
        );
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(1, Tuning::default());
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(json.contains("\"weather\":\"Clear\""));
        assert!(json.contains("\"phase\":\"Tutorial\""));
    }
}
