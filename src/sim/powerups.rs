//! Falling power-ups and their timed effects

use glam::Vec2;
use rand::Rng;

use super::state::{ActiveEffect, GameEvent, GameState, PowerUp, PowerUpKind};
use super::timers::TimerEvent;
use crate::consts::{DISC_HEIGHT, DISC_WIDTH, POWERUP_SIZE, POWERUP_SPAWN_Y};

/// Whether a power-up touches the disc band
pub fn overlaps_disc(power_up: &PowerUp, disc_x: f32, disc_y: f32) -> bool {
    let size = power_up.size();
    let vertical = power_up.pos.y + size > disc_y && power_up.pos.y < disc_y + DISC_HEIGHT;
    let horizontal =
        power_up.pos.x + size > disc_x - DISC_WIDTH / 2.0 && power_up.pos.x < disc_x + DISC_WIDTH / 2.0;
    vertical && horizontal
}

/// Move, collect, despawn and maybe spawn power-ups for one tick
pub fn update(state: &mut GameState) {
    let disc_x = state.disc.x;
    let disc_y = state.disc_y();
    let bottom = state.canvas.y;

    let mut collected = Vec::new();
    state.power_ups.retain_mut(|p| {
        p.pos.y += p.fall_speed;
        if overlaps_disc(p, disc_x, disc_y) {
            collected.push(p.kind);
            return false;
        }
        p.pos.y <= bottom
    });

    for kind in collected {
        activate(state, kind);
    }

    if state.rng.random::<f64>() < state.tuning.powerup_spawn_chance {
        spawn(state);
    }
}

/// Drop a new power-up of a random kind in above the canvas
pub fn spawn(state: &mut GameState) {
    let x = state.rng.random::<f32>() * state.canvas.x;
    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    log::trace!("Spawned {:?} at x={:.0}", kind, x);
    state.power_ups.push(PowerUp {
        kind,
        pos: Vec2::new(x, POWERUP_SPAWN_Y),
        fall_speed: state.tuning.powerup_fall_speed,
    });
}

/// Put a power-up's effect in force and (re)arm its expiry.
///
/// The bonus and the saved value are taken only when the effect goes from
/// inactive to active; a pickup during the window just restarts the timer.
pub fn activate(state: &mut GameState, kind: PowerUpKind) {
    let newly_active = !state.effects.is_active(kind);

    if newly_active {
        let saved_value = match kind {
            PowerUpKind::WindShield => state.env.wind_strength,
            PowerUpKind::StickFreeze => state.stick.angular_vel,
        };
        *state.effects.slot_mut(kind) = Some(ActiveEffect { saved_value });
        state.time.bonus += state.tuning.powerup_bonus;
        state.time.recompute_score();
    }

    match kind {
        PowerUpKind::WindShield => state.env.wind_strength = 0.0,
        PowerUpKind::StickFreeze => state.stick.snap_upright(),
    }

    let expires_at = state.timers.schedule(
        TimerEvent::EffectExpiry(kind),
        state.time.elapsed_us,
        state.tuning.powerup_duration_ms,
    );

    let bonus = if newly_active {
        state.tuning.powerup_bonus
    } else {
        0
    };
    log::debug!(
        "{:?} active until {:.0}ms (bonus {})",
        kind,
        expires_at as f64 / 1000.0,
        bonus
    );
    state.emit(GameEvent::PowerUpCollected { kind, bonus });
}

/// Effect window closed: put the saved value back
pub fn expire(state: &mut GameState, kind: PowerUpKind) {
    let Some(effect) = state.effects.slot_mut(kind).take() else {
        return;
    };

    match kind {
        PowerUpKind::WindShield => state.env.wind_strength = effect.saved_value,
        PowerUpKind::StickFreeze => state.stick.angular_vel = effect.saved_value,
    }

    log::debug!("{:?} expired, restored {}", kind, effect.saved_value);
    state.emit(GameEvent::PowerUpExpired(kind));
}
