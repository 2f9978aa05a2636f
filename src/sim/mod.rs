//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Timers on the round clock, never the wall clock
//! - No rendering or platform dependencies

pub mod environment;
pub mod particles;
pub mod physics;
pub mod powerups;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod timers;

pub use environment::{WeatherTransition, weather_transition};
pub use snapshot::{EffectStatus, Snapshot};
pub use state::{
    ActiveEffect, ActiveEffects, AudioSignal, Disc, Environment, GameEvent, GamePhase, GameState,
    Particle, ParticleKind, PowerUp, PowerUpKind, RoundTime, Stick, WeatherMode,
};
pub use tick::{TickInput, reset_game, start_round, tick, toggle_pause};
pub use timers::{Timer, TimerEvent, TimerQueue};
