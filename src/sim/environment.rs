//! Wind, weather and lightning

use rand::Rng;
use rand_pcg::Pcg32;

use super::particles;
use super::state::{AudioSignal, GameEvent, GameState, ParticleKind, PowerUpKind, WeatherMode};
use super::timers::{TimerEvent, ms_to_us};

/// Everything a weather change implies, worked out up front
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherTransition {
    pub friction: f32,
    pub ambience: AudioSignal,
    /// Particle kind to reseed with (none for clear skies)
    pub reseed: Option<ParticleKind>,
    /// Lightning schedule must start
    pub start_lightning: bool,
    /// Lightning schedule must stop
    pub stop_lightning: bool,
}

/// Work out what moving from one weather mode to another entails
pub fn weather_transition(from: WeatherMode, to: WeatherMode) -> WeatherTransition {
    let was_raining = from == WeatherMode::Rain;
    let raining = to == WeatherMode::Rain;
    WeatherTransition {
        friction: to.friction(),
        ambience: AudioSignal::PlayAmbient(to),
        reseed: particles::ambience_kind(to),
        start_lightning: raining && !was_raining,
        stop_lightning: was_raining && !raining,
    }
}

/// Uniform draw from `[min, max)`, tolerating an empty range
pub fn uniform(rng: &mut Pcg32, min: f64, max: f64) -> f64 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// Ramp the wind and re-roll its direction.
///
/// While a wind shield is up the shield owns `wind_strength`.
pub fn update(state: &mut GameState) {
    if state.time.elapsed_us <= ms_to_us(state.tuning.wind_ramp_start_ms) {
        return;
    }

    if !state.effects.is_active(PowerUpKind::WindShield) {
        state.env.wind_strength = state.tuning.ramped_wind(state.time.elapsed_ms());
    }

    let blows_right = state.rng.random::<f64>() < state.tuning.wind_right_chance;
    state.env.wind_direction = if blows_right { 1.0 } else { -1.0 };
}

/// Arm the next weather roll
pub fn schedule_weather_change(state: &mut GameState) {
    let delay = uniform(
        &mut state.rng,
        state.tuning.weather_interval_min_ms,
        state.tuning.weather_interval_max_ms,
    );
    state
        .timers
        .schedule(TimerEvent::WeatherChange, state.time.elapsed_us, delay);
}

/// Weather timer fired: pick a mode uniformly and arm the next roll
pub fn roll_weather(state: &mut GameState) {
    let index = state.rng.random_range(0..WeatherMode::ALL.len());
    change_weather(state, WeatherMode::ALL[index]);
    schedule_weather_change(state);
}

/// Switch to `to`, applying friction, particles, lightning and audio
pub fn change_weather(state: &mut GameState, to: WeatherMode) {
    let from = state.env.weather;
    let transition = weather_transition(from, to);

    state.env.weather = to;
    state.env.friction = transition.friction;

    particles::clear_ambience(&mut state.particles);
    if let Some(kind) = transition.reseed {
        particles::seed_ambience(&mut state.particles, kind, &mut state.rng, state.canvas);
    }

    if transition.start_lightning {
        schedule_lightning(state);
    }
    if transition.stop_lightning {
        state.timers.cancel(TimerEvent::LightningStrike);
        state.timers.cancel(TimerEvent::LightningEnd);
        state.env.is_lightning = false;
    }

    log::info!("Weather: {} -> {}", from.as_str(), to.as_str());
    state.emit(GameEvent::WeatherChanged { from, to });
    state.emit(GameEvent::Audio(transition.ambience));
}

fn schedule_lightning(state: &mut GameState) {
    let delay = uniform(
        &mut state.rng,
        state.tuning.lightning_interval_min_ms,
        state.tuning.lightning_interval_max_ms,
    );
    state
        .timers
        .schedule(TimerEvent::LightningStrike, state.time.elapsed_us, delay);
}

/// Light the sky for the flash window and arm the next strike
pub fn strike_lightning(state: &mut GameState) {
    if state.env.weather != WeatherMode::Rain {
        return;
    }
    state.env.is_lightning = true;
    state.timers.schedule(
        TimerEvent::LightningEnd,
        state.time.elapsed_us,
        state.tuning.lightning_flash_ms,
    );
    schedule_lightning(state);
    log::debug!("Lightning at {:.0}ms", state.time.elapsed_ms());
    state.emit(GameEvent::LightningStrike);
}

pub fn end_lightning(state: &mut GameState) {
    state.env.is_lightning = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::AMBIENCE_PARTICLE_COUNT;
    use crate::tuning::Tuning;

    fn running_state() -> GameState {
        let mut state = GameState::new(11, Tuning::default());
        state.time.in_grace_period = false;
        state
    }

    #[test]
    fn test_transition_is_pure_mapping() {
        let t = weather_transition(WeatherMode::Clear, WeatherMode::Snow);
        assert_eq!(t.friction, 0.95);
        assert_eq!(t.ambience, AudioSignal::PlayAmbient(WeatherMode::Snow));
        assert_eq!(t.reseed, Some(ParticleKind::Snow));
        assert!(!t.start_lightning && !t.stop_lightning);

        let t = weather_transition(WeatherMode::Rain, WeatherMode::Clear);
        assert_eq!(t.reseed, None);
        assert!(t.stop_lightning);

        let t = weather_transition(WeatherMode::Rain, WeatherMode::Rain);
        assert!(!t.start_lightning && !t.stop_lightning);
    }

    #[test]
    fn test_no_wind_before_ramp_start() {
        let mut state = running_state();
        state.time.elapsed_us = 5_000_000;
        update(&mut state);
        assert_eq!(state.env.wind_strength, 0.0);
    }

    #[test]
    fn test_wind_ramps_after_start() {
        let mut state = running_state();
        state.time.elapsed_us = 25_000_000;
        update(&mut state);
        let expected = state.tuning.ramped_wind(25000.0);
        assert_eq!(state.env.wind_strength, expected);
        assert!(state.env.wind_strength > 0.0);
    }

    #[test]
    fn test_wind_direction_follows_bias() {
        let mut state = running_state();
        state.tuning.wind_right_chance = 0.0;
        state.time.elapsed_us = 6_000_000;
        update(&mut state);
        assert_eq!(state.env.wind_direction, -1.0);

        state.tuning.wind_right_chance = 1.0;
        update(&mut state);
        assert_eq!(state.env.wind_direction, 1.0);
    }

    #[test]
    fn test_change_weather_reseeds_and_signals() {
        let mut state = running_state();
        change_weather(&mut state, WeatherMode::Rain);

        assert_eq!(state.env.friction, 0.98);
        assert_eq!(state.particles.len(), AMBIENCE_PARTICLE_COUNT);
        assert!(state.timers.is_pending(TimerEvent::LightningStrike));
        assert!(
            state
                .events()
                .contains(&GameEvent::Audio(AudioSignal::PlayAmbient(WeatherMode::Rain)))
        );

        change_weather(&mut state, WeatherMode::Snow);
        assert_eq!(state.particles.len(), AMBIENCE_PARTICLE_COUNT);
        assert!(state.particles.iter().all(|p| p.kind == ParticleKind::Snow));
        assert!(!state.timers.is_pending(TimerEvent::LightningStrike));
    }

    #[test]
    fn test_weather_interval_in_range() {
        let mut state = running_state();
        state.time.elapsed_us = 1_000_000;
        schedule_weather_change(&mut state);
        let remaining = state
            .timers
            .remaining(TimerEvent::WeatherChange, 1_000_000)
            .unwrap();
        assert!((15000.0..30000.0).contains(&remaining));
    }

    #[test]
    fn test_lightning_flash_window() {
        let mut state = running_state();
        change_weather(&mut state, WeatherMode::Rain);
        state.time.elapsed_us = 3_000_000;

        strike_lightning(&mut state);
        assert!(state.env.is_lightning);
        assert_eq!(state.timers.remaining(TimerEvent::LightningEnd, 3_000_000), Some(200.0));
        let next = state
            .timers
            .remaining(TimerEvent::LightningStrike, 3_000_000)
            .unwrap();
        assert!((2000.0..7000.0).contains(&next));

        end_lightning(&mut state);
        assert!(!state.env.is_lightning);
    }
}
