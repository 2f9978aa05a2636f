//! Shape generation for 2D primitives
//!
//! All coordinates are canvas pixels with y growing downward; the pipeline
//! maps them to NDC.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::consts::{DISC_HEIGHT, DISC_WIDTH};
use crate::settings::Settings;
use crate::sim::{GamePhase, ParticleKind, PowerUpKind, Snapshot, WeatherMode};

const STICK_WIDTH: f32 = 5.0;
const SUN_RADIUS: f32 = 50.0;
/// Sun sits this far in from the top-right corner
const SUN_INSET: f32 = 100.0;
const SNOWFLAKE_LINE_WIDTH: f32 = 1.0;
/// Effect rings around the pivot
const EFFECT_RING_RADIUS: f32 = 14.0;
const EFFECT_RING_WIDTH: f32 = 3.0;

/// Generate vertices for an axis-aligned rectangle from its top-left corner
pub fn rect(top_left: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let (x0, y0) = (top_left.x, top_left.y);
    let (x1, y1) = (top_left.x + size.x, top_left.y + size.y);
    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Generate vertices for a line segment of the given thickness
pub fn thick_line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a = from + perp;
    let b = from - perp;
    let c = to + perp;
    let d = to - perp;

    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring arc starting at 12 o'clock, `fraction` of
/// the way round (1.0 = full ring)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    fraction: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let fraction = fraction.clamp(0.0, 1.0);
    let segments = ((segments as f32 * fraction).ceil() as u32).max(1);
    let span = 2.0 * PI * fraction;
    let start = -PI / 2.0;
    let at = |r: f32, theta: f32| center + Vec2::new(r * theta.cos(), r * theta.sin());

    let mut vertices = Vec::with_capacity((segments * 6) as usize);
    for i in 0..segments {
        let theta1 = start + (i as f32 / segments as f32) * span;
        let theta2 = start + ((i + 1) as f32 / segments as f32) * span;

        let inner1 = at(inner_radius, theta1);
        let outer1 = at(outer_radius, theta1);
        let inner2 = at(inner_radius, theta2);
        let outer2 = at(outer_radius, theta2);

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Six-branch snowflake: a spoke per branch with two side twigs
pub fn snowflake(center: Vec2, size: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6 * 3 * 6);

    for i in 0..6 {
        let rot = glam::Mat2::from_angle(i as f32 * PI / 3.0);
        let local = |x: f32, y: f32| center + rot * Vec2::new(x, y);

        let mid = local(0.0, -size / 2.0);
        vertices.extend(thick_line(center, local(0.0, -size), SNOWFLAKE_LINE_WIDTH, color));
        vertices.extend(thick_line(mid, local(size / 4.0, -size * 0.75), SNOWFLAKE_LINE_WIDTH, color));
        vertices.extend(thick_line(mid, local(-size / 4.0, -size * 0.75), SNOWFLAKE_LINE_WIDTH, color));
    }

    vertices
}

fn power_up_color(kind: PowerUpKind) -> [f32; 4] {
    match kind {
        PowerUpKind::WindShield => colors::WIND_SHIELD,
        PowerUpKind::StickFreeze => colors::STICK_FREEZE,
    }
}

fn sky_color(snapshot: &Snapshot, settings: &Settings) -> [f32; 4] {
    match snapshot.weather {
        WeatherMode::Clear => colors::SKY_CLEAR,
        WeatherMode::Rain if snapshot.is_lightning && settings.effective_lightning_flash() => {
            colors::LIGHTNING
        }
        WeatherMode::Rain => colors::SKY_RAIN,
        WeatherMode::Snow => colors::SKY_SNOW,
    }
}

/// Build the full frame, back to front
pub fn build_scene(snapshot: &Snapshot, settings: &Settings) -> Vec<Vertex> {
    let canvas = snapshot.canvas;
    let segments = settings.quality.circle_segments();
    let mut vertices = Vec::with_capacity(4096);

    // Background
    vertices.extend(rect(Vec2::ZERO, canvas, sky_color(snapshot, settings)));
    if snapshot.weather == WeatherMode::Clear {
        let sun = Vec2::new(canvas.x - SUN_INSET, SUN_INSET);
        vertices.extend(circle(sun, SUN_RADIUS, colors::SUN, segments));
    }

    // Particles
    for particle in snapshot.particles.iter().take(settings.max_particles()) {
        match particle.kind {
            ParticleKind::Snow if settings.quality.snowflakes_enabled() => {
                vertices.extend(snowflake(particle.pos, particle.size * 2.0, colors::SNOW));
            }
            kind => {
                let color = match kind {
                    ParticleKind::Rain => colors::RAIN,
                    ParticleKind::Snow => colors::SNOW,
                    ParticleKind::Burst => colors::BURST,
                };
                vertices.extend(circle(particle.pos, particle.size, color, segments.min(8)));
            }
        }
    }

    // Disc and stick
    let pivot = Vec2::new(snapshot.disc_x, snapshot.disc_y);
    vertices.extend(rect(
        Vec2::new(snapshot.disc_x - DISC_WIDTH / 2.0, snapshot.disc_y),
        Vec2::new(DISC_WIDTH, DISC_HEIGHT),
        colors::DISC,
    ));
    vertices.extend(thick_line(pivot, snapshot.stick_tip, STICK_WIDTH, colors::STICK));

    // Falling power-ups
    for power_up in snapshot.power_ups {
        let size = power_up.size();
        vertices.extend(rect(power_up.pos, Vec2::splat(size), power_up_color(power_up.kind)));
    }

    // Active effects drain around the pivot
    for (i, effect) in snapshot.effects.iter().enumerate() {
        let inner = EFFECT_RING_RADIUS + i as f32 * (EFFECT_RING_WIDTH + 1.0);
        let fraction = (effect.remaining_ms / settings.tuning.powerup_duration_ms.max(1.0)) as f32;
        vertices.extend(ring(
            pivot,
            inner,
            inner + EFFECT_RING_WIDTH,
            fraction,
            power_up_color(effect.kind),
            segments,
        ));
    }

    if matches!(snapshot.phase, GamePhase::Paused | GamePhase::Over) {
        vertices.extend(rect(Vec2::ZERO, canvas, colors::SHADE));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameState, powerups};
    use crate::tuning::Tuning;

    #[test]
    fn test_rect_covers_corners() {
        let verts = rect(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0), colors::DISC);
        assert_eq!(verts.len(), 6);
        assert!(verts.iter().any(|v| v.position == [10.0, 20.0]));
        assert!(verts.iter().any(|v| v.position == [40.0, 60.0]));
    }

    #[test]
    fn test_thick_line_width() {
        let verts = thick_line(Vec2::ZERO, Vec2::new(0.0, -10.0), 4.0, colors::STICK);
        assert_eq!(verts.len(), 6);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let spread = xs.iter().cloned().fold(f32::MIN, f32::max) - xs.iter().cloned().fold(f32::MAX, f32::min);
        assert!((spread - 4.0).abs() < 1e-5);

        assert!(thick_line(Vec2::ONE, Vec2::ONE, 4.0, colors::STICK).is_empty());
    }

    #[test]
    fn test_partial_ring() {
        let full = ring(Vec2::ZERO, 10.0, 12.0, 1.0, colors::SNOW, 16);
        let half = ring(Vec2::ZERO, 10.0, 12.0, 0.5, colors::SNOW, 16);
        assert_eq!(full.len(), 16 * 6);
        assert_eq!(half.len(), 8 * 6);
    }

    #[test]
    fn test_scene_background_follows_weather() {
        let mut state = GameState::new(1, Tuning::default());
        let settings = Settings::default();

        let verts = build_scene(&state.snapshot(), &settings);
        assert_eq!(verts[0].color, colors::SKY_CLEAR);

        state.env.weather = WeatherMode::Rain;
        state.env.is_lightning = true;
        let verts = build_scene(&state.snapshot(), &settings);
        assert_eq!(verts[0].color, colors::LIGHTNING);

        let calm = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let verts = build_scene(&state.snapshot(), &calm);
        assert_eq!(verts[0].color, colors::SKY_RAIN);
    }

    #[test]
    fn test_scene_respects_particle_cap() {
        let mut state = GameState::new(1, Tuning::default());
        crate::sim::environment::change_weather(&mut state, WeatherMode::Rain);

        let off = Settings {
            particles: false,
            ..Settings::default()
        };
        let on = Settings::default();

        let without = build_scene(&state.snapshot(), &off).len();
        let with = build_scene(&state.snapshot(), &on).len();
        assert!(with > without);
        assert!(
            !build_scene(&state.snapshot(), &off)
                .iter()
                .any(|v| v.color == colors::RAIN)
        );
    }

    #[test]
    fn test_scene_draws_effects_and_shade() {
        let mut state = GameState::new(1, Tuning::default());
        state.phase = GamePhase::Running;
        powerups::activate(&mut state, PowerUpKind::StickFreeze);
        let verts = build_scene(&state.snapshot(), &Settings::default());
        assert!(verts.iter().any(|v| v.color == colors::STICK_FREEZE));
        assert_ne!(verts.last().map(|v| v.color), Some(colors::SHADE));

        state.phase = GamePhase::Paused;
        let verts = build_scene(&state.snapshot(), &Settings::default());
        assert_eq!(verts.last().map(|v| v.color), Some(colors::SHADE));
    }
}
