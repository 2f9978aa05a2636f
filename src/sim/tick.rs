//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation and sequences the game
//! phases: Tutorial -> Running <-> Paused, Running -> Over -> Running.

use glam::Vec2;

use super::state::{AudioSignal, GameEvent, GamePhase, GameState};
use super::timers::TimerEvent;
use super::{environment, particles, physics, powerups};
use crate::clamp_disc_x;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer x on the canvas (pixels)
    pub pointer_x: Option<f32>,
    /// Pause toggle
    pub pause: bool,
    /// Click / tap (start from the tutorial, restart after game over)
    pub click: bool,
}

impl TickInput {
    /// Hand the pending input to one tick, leaving nothing pending
    pub fn take(&mut self) -> TickInput {
        std::mem::take(self)
    }
}

/// Advance the game state by one fixed timestep of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64) {
    // Handle pause toggle
    if input.pause {
        toggle_pause(state);
        if state.phase == GamePhase::Paused {
            return;
        }
    }

    match state.phase {
        GamePhase::Tutorial => {
            if input.click {
                start_round(state);
            }
            return;
        }
        GamePhase::Paused => return,
        GamePhase::Over => {
            if input.click {
                reset_game(state);
            } else {
                // Let the burst drift; nothing else moves
                particles::update(&mut state.particles, &mut state.rng, state.canvas);
            }
            return;
        }
        GamePhase::Running => {}
    }

    if let Some(x) = input.pointer_x {
        move_disc(state, x);
    }

    state.time.advance(dt_ms);
    fire_due_timers(state);

    environment::update(state);
    physics::integrate(
        &mut state.stick,
        &state.env,
        state.time.in_grace_period,
        &state.tuning,
    );
    powerups::update(state);
    particles::update(&mut state.particles, &mut state.rng, state.canvas);

    state.time.recompute_score();

    // Fall check runs last so a stick freeze collected this tick counts
    if !state.time.in_grace_period && physics::has_fallen(&state.stick) {
        game_over(state);
    }
}

/// Flip Running <-> Paused; other phases ignore the toggle
pub fn toggle_pause(state: &mut GameState) {
    match state.phase {
        GamePhase::Running => {
            state.phase = GamePhase::Paused;
            log::info!("Paused at {:.0}ms", state.time.elapsed_ms());
            state.emit(GameEvent::Audio(AudioSignal::PauseAll));
        }
        GamePhase::Paused => {
            state.phase = GamePhase::Running;
            log::info!("Resumed at {:.0}ms", state.time.elapsed_ms());
            state.emit(GameEvent::Audio(AudioSignal::PlayAmbient(state.env.weather)));
        }
        _ => {}
    }
}

/// Enter Running with a fresh grace period
pub fn start_round(state: &mut GameState) {
    state.phase = GamePhase::Running;
    state.time.in_grace_period = true;
    state.timers.schedule(
        TimerEvent::GraceEnd,
        state.time.elapsed_us,
        state.tuning.grace_period_ms,
    );
    environment::schedule_weather_change(state);

    log::info!("Round started (best so far: {})", state.time.highest_score);
    state.emit(GameEvent::RoundStarted);
    state.emit(GameEvent::Audio(AudioSignal::PlayAmbient(state.env.weather)));
}

/// Reinitialise the round and go straight back to Running
pub fn reset_game(state: &mut GameState) {
    state.reset_round();
    start_round(state);
}

/// Slide the disc to the pointer and push the stick by the distance moved
fn move_disc(state: &mut GameState, pointer_x: f32) {
    let x = clamp_disc_x(pointer_x, state.canvas.x);
    let dx = x - state.disc.x;
    state.disc.x = x;

    if !state.time.in_grace_period && dx != 0.0 {
        physics::counterbalance(&mut state.stick, dx, state.env.friction, &state.tuning);
    }
}

/// Run every timer whose deadline passed, earliest first
fn fire_due_timers(state: &mut GameState) {
    while let Some(event) = state.timers.pop_due(state.time.elapsed_us) {
        match event {
            TimerEvent::GraceEnd => {
                state.time.in_grace_period = false;
                log::debug!("Grace period over at {:.0}ms", state.time.elapsed_ms());
            }
            TimerEvent::WeatherChange => environment::roll_weather(state),
            TimerEvent::LightningStrike => environment::strike_lightning(state),
            TimerEvent::LightningEnd => environment::end_lightning(state),
            TimerEvent::EffectExpiry(kind) => powerups::expire(state, kind),
        }
    }
}

/// Stick is down: record the best score, burst, stop the clocks
fn game_over(state: &mut GameState) {
    let score = state.time.score;
    let new_record = score > state.time.highest_score;
    state.time.highest_score = state.time.highest_score.max(score);

    state.phase = GamePhase::Over;
    state.timers.clear();
    state.env.is_lightning = false;

    let origin = Vec2::new(state.disc.x, state.disc_y());
    particles::spawn_burst(&mut state.particles, origin, &mut state.rng);

    log::info!(
        "Game over at {:.1}s, score {} (best {})",
        state.time.elapsed_ms() / 1000.0,
        score,
        state.time.highest_score
    );
    state.emit(GameEvent::GameOver { score, new_record });
    state.emit(GameEvent::Audio(AudioSignal::PauseAll));
}
