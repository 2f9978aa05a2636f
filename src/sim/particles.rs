//! Weather ambience and game-over burst particles

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Particle, ParticleKind, WeatherMode};
use crate::consts::{AMBIENCE_PARTICLE_COUNT, BURST_PARTICLE_COUNT, PARTICLE_RECYCLE_Y};

/// Ambience particle kind for a weather mode (clear skies have none)
pub fn ambience_kind(weather: WeatherMode) -> Option<ParticleKind> {
    match weather {
        WeatherMode::Clear => None,
        WeatherMode::Rain => Some(ParticleKind::Rain),
        WeatherMode::Snow => Some(ParticleKind::Snow),
    }
}

/// Drop every recycling particle, leaving bursts alone
pub fn clear_ambience(particles: &mut Vec<Particle>) {
    particles.retain(|p| !p.kind.recycles());
}

/// Scatter a fresh batch of ambience particles over the canvas
pub fn seed_ambience(particles: &mut Vec<Particle>, kind: ParticleKind, rng: &mut Pcg32, canvas: Vec2) {
    let (size_range, speed_range) = match kind {
        ParticleKind::Rain => (1.0..3.0, 2.0..5.0),
        ParticleKind::Snow => (2.0..7.0, 0.5..1.5),
        ParticleKind::Burst => return,
    };

    particles.reserve(AMBIENCE_PARTICLE_COUNT);
    for _ in 0..AMBIENCE_PARTICLE_COUNT {
        let pos = Vec2::new(
            rng.random::<f32>() * canvas.x,
            rng.random::<f32>() * canvas.y,
        );
        particles.push(Particle {
            kind,
            pos,
            vel: Vec2::new(0.0, rng.random_range(speed_range.clone())),
            size: rng.random_range(size_range.clone()),
        });
    }
}

/// Spray the game-over burst up and out from `origin`
pub fn spawn_burst(particles: &mut Vec<Particle>, origin: Vec2, rng: &mut Pcg32) {
    particles.reserve(BURST_PARTICLE_COUNT);
    for _ in 0..BURST_PARTICLE_COUNT {
        particles.push(Particle {
            kind: ParticleKind::Burst,
            pos: origin,
            vel: Vec2::new(rng.random_range(-2.0..2.0), rng.random_range(-3.0..-1.0)),
            size: rng.random_range(2.0..7.0),
        });
    }
}

/// Move every particle one tick.
///
/// Ambience that falls off the bottom re-enters at the top at a random x;
/// bursts are dropped once they leave the canvas.
pub fn update(particles: &mut Vec<Particle>, rng: &mut Pcg32, canvas: Vec2) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel;
        if particle.kind.recycles() && particle.pos.y > canvas.y {
            particle.pos.y = PARTICLE_RECYCLE_Y;
            particle.pos.x = rng.random::<f32>() * canvas.x;
        }
    }

    particles.retain(|p| p.kind.recycles() || on_canvas(p, canvas));
}

fn on_canvas(particle: &Particle, canvas: Vec2) -> bool {
    let margin = particle.size;
    particle.pos.x >= -margin
        && particle.pos.x <= canvas.x + margin
        && particle.pos.y >= -margin
        && particle.pos.y <= canvas.y + margin
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const CANVAS: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_seed_ambience_batch() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut particles = Vec::new();
        seed_ambience(&mut particles, ParticleKind::Snow, &mut rng, CANVAS);

        assert_eq!(particles.len(), AMBIENCE_PARTICLE_COUNT);
        for p in &particles {
            assert!((0.5..1.5).contains(&p.vel.y));
            assert!((2.0..7.0).contains(&p.size));
            assert_eq!(p.vel.x, 0.0);
        }
    }

    #[test]
    fn test_ambience_recycles_to_top() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut particles = vec![Particle {
            kind: ParticleKind::Rain,
            pos: Vec2::new(100.0, 599.0),
            vel: Vec2::new(0.0, 4.0),
            size: 2.0,
        }];

        update(&mut particles, &mut rng, CANVAS);

        assert_eq!(particles.len(), 1);
        assert_eq!(particles[0].pos.y, PARTICLE_RECYCLE_Y);
        assert!((0.0..=CANVAS.x).contains(&particles[0].pos.x));
    }

    #[test]
    fn test_burst_is_one_shot() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut particles = Vec::new();
        spawn_burst(&mut particles, Vec2::new(400.0, 400.0), &mut rng);
        assert_eq!(particles.len(), BURST_PARTICLE_COUNT);
        assert!(particles.iter().all(|p| p.vel.y < 0.0));

        // Every burst particle rises at least 1 px per tick
        for _ in 0..500 {
            update(&mut particles, &mut rng, CANVAS);
        }
        assert!(particles.is_empty());
    }

    #[test]
    fn test_clear_ambience_keeps_burst() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut particles = Vec::new();
        seed_ambience(&mut particles, ParticleKind::Rain, &mut rng, CANVAS);
        spawn_burst(&mut particles, Vec2::new(10.0, 10.0), &mut rng);

        clear_ambience(&mut particles);

        assert_eq!(particles.len(), BURST_PARTICLE_COUNT);
        assert!(particles.iter().all(|p| p.kind == ParticleKind::Burst));
    }

    #[test]
    fn test_clear_weather_has_no_ambience() {
        assert_eq!(ambience_kind(WeatherMode::Clear), None);
        assert_eq!(ambience_kind(WeatherMode::Rain), Some(ParticleKind::Rain));
    }
}
