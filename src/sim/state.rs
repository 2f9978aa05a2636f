//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in one [`GameState`] owned by the
//! driver and passed by `&mut` into each system.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::timers::{TimerEvent, TimerQueue, ms_to_us};
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Instructions on screen, simulation frozen until the first click
    Tutorial,
    /// Active gameplay
    Running,
    /// Game is paused
    Paused,
    /// Stick fell, waiting for a restart click
    Over,
}

/// Weather modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeatherMode {
    #[default]
    Clear,
    Rain,
    Snow,
}

impl WeatherMode {
    /// Modes the weather roll picks from
    pub const ALL: [WeatherMode; 3] = [WeatherMode::Rain, WeatherMode::Snow, WeatherMode::Clear];

    /// Multiplier applied to the player's counterbalance
    pub fn friction(&self) -> f32 {
        match self {
            WeatherMode::Clear => 1.0,
            WeatherMode::Rain => 0.98,
            WeatherMode::Snow => 0.95,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherMode::Clear => "clear",
            WeatherMode::Rain => "rain",
            WeatherMode::Snow => "snow",
        }
    }
}

/// The balanced stick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stick {
    /// Angle from horizontal (radians, π/2 = upright)
    pub angle: f32,
    /// Radians per tick
    pub angular_vel: f32,
}

impl Default for Stick {
    fn default() -> Self {
        Self {
            angle: STICK_UPRIGHT,
            angular_vel: 0.0,
        }
    }
}

impl Stick {
    /// Stand the stick straight up and stop it
    pub fn snap_upright(&mut self) {
        *self = Self::default();
    }
}

/// The player's disc
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Disc {
    /// Center x in pixels
    pub x: f32,
}

/// Wind, weather and the friction they induce
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub wind_strength: f32,
    /// +1 blows right, -1 blows left
    pub wind_direction: f32,
    pub weather: WeatherMode,
    pub friction: f32,
    /// Lightning flash currently lit
    pub is_lightning: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            wind_strength: 0.0,
            wind_direction: 1.0,
            weather: WeatherMode::Clear,
            friction: WeatherMode::Clear.friction(),
            is_lightning: false,
        }
    }
}

/// Round clock and scoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundTime {
    /// Microseconds of unpaused play since the round started
    pub elapsed_us: u64,
    pub in_grace_period: bool,
    /// Accumulated power-up bonuses
    pub bonus: u64,
    pub score: u64,
    /// Best score this session (survives resets)
    pub highest_score: u64,
}

impl Default for RoundTime {
    fn default() -> Self {
        Self {
            elapsed_us: 0,
            in_grace_period: true,
            bonus: 0,
            score: 0,
            highest_score: 0,
        }
    }
}

impl RoundTime {
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_us as f64 / 1000.0
    }

    /// Move the round clock forward by one step
    pub fn advance(&mut self, dt_ms: f64) {
        self.elapsed_us += ms_to_us(dt_ms);
    }

    /// Whole seconds survived plus bonuses
    pub fn recompute_score(&mut self) {
        self.score = self.elapsed_us / 1_000_000 + self.bonus;
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Cancels the wind for the effect window
    WindShield,
    /// Stands the stick back up and holds its momentum
    StickFreeze,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 2] = [PowerUpKind::WindShield, PowerUpKind::StickFreeze];
}

/// A falling collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    /// Top-left corner in pixels
    pub pos: Vec2,
    /// Pixels per tick
    pub fall_speed: f32,
}

impl PowerUp {
    pub fn size(&self) -> f32 {
        POWERUP_SIZE
    }
}

/// An effect in force, holding the value to put back when it ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub saved_value: f32,
}

/// At most one active effect per power-up kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub wind_shield: Option<ActiveEffect>,
    pub stick_freeze: Option<ActiveEffect>,
}

impl ActiveEffects {
    pub fn slot(&self, kind: PowerUpKind) -> &Option<ActiveEffect> {
        match kind {
            PowerUpKind::WindShield => &self.wind_shield,
            PowerUpKind::StickFreeze => &self.stick_freeze,
        }
    }

    pub fn slot_mut(&mut self, kind: PowerUpKind) -> &mut Option<ActiveEffect> {
        match kind {
            PowerUpKind::WindShield => &mut self.wind_shield,
            PowerUpKind::StickFreeze => &mut self.stick_freeze,
        }
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.slot(kind).is_some()
    }
}

/// Particle kinds; the kind decides color and lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Rain,
    Snow,
    /// Game-over burst
    Burst,
}

impl ParticleKind {
    /// Ambience particles wrap back to the top; bursts are one-shot
    pub fn recycles(&self) -> bool {
        !matches!(self, ParticleKind::Burst)
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub size: f32,
}

/// What the audio collaborator should be playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioSignal {
    PlayAmbient(WeatherMode),
    PauseAll,
}

/// Things that happened during a tick, drained by the driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Audio(AudioSignal),
    RoundStarted,
    WeatherChanged { from: WeatherMode, to: WeatherMode },
    LightningStrike,
    PowerUpCollected { kind: PowerUpKind, bonus: u64 },
    PowerUpExpired(PowerUpKind),
    GameOver { score: u64, new_record: bool },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Canvas width and height in pixels
    pub canvas: Vec2,
    pub phase: GamePhase,
    pub stick: Stick,
    pub disc: Disc,
    pub env: Environment,
    pub time: RoundTime,
    /// Falling power-ups (spawn order)
    pub power_ups: Vec<PowerUp>,
    pub effects: ActiveEffects,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub timers: TimerQueue,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game, showing the tutorial
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let canvas = Vec2::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT);
        log::debug!("New game (seed {})", seed);
        Self {
            rng: Pcg32::seed_from_u64(seed),
            tuning: tuning.sanitized(),
            canvas,
            phase: GamePhase::Tutorial,
            stick: Stick::default(),
            disc: Disc { x: canvas.x / 2.0 },
            env: Environment::default(),
            time: RoundTime::default(),
            power_ups: Vec::new(),
            effects: ActiveEffects::default(),
            particles: Vec::new(),
            timers: TimerQueue::new(),
            events: Vec::new(),
        }
    }

    /// Restore every round-scoped field to its starting value.
    ///
    /// Keeps the session best, RNG stream, tuning and canvas size.
    pub fn reset_round(&mut self) {
        let highest_score = self.time.highest_score;
        self.stick = Stick::default();
        self.disc = Disc { x: self.canvas.x / 2.0 };
        self.env = Environment::default();
        self.time = RoundTime {
            highest_score,
            ..RoundTime::default()
        };
        self.power_ups.clear();
        self.effects = ActiveEffects::default();
        self.particles.clear();
        self.timers.clear();
    }

    /// Adopt the host's canvas size; the disc is re-centered
    pub fn set_canvas_size(&mut self, width: f32, height: f32) {
        self.canvas = Vec2::new(width.max(1.0), height.max(1.0));
        self.disc.x = self.canvas.x / 2.0;
    }

    /// Top edge of the disc band
    pub fn disc_y(&self) -> f32 {
        crate::disc_top(self.canvas.y)
    }

    /// Time left on a power-up effect, if it is active
    pub fn effect_remaining(&self, kind: PowerUpKind) -> Option<f64> {
        self.timers
            .remaining(TimerEvent::EffectExpiry(kind), self.time.elapsed_us)
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take everything emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_defaults() {
        let state = GameState::new(7, Tuning::default());
        assert_eq!(state.phase, GamePhase::Tutorial);
        assert_eq!(state.stick.angle, STICK_UPRIGHT);
        assert_eq!(state.stick.angular_vel, 0.0);
        assert_eq!(state.disc.x, DEFAULT_CANVAS_WIDTH / 2.0);
        assert_eq!(state.env.weather, WeatherMode::Clear);
        assert_eq!(state.env.friction, 1.0);
        assert!(state.time.in_grace_period);
        assert!(state.timers.is_empty());
    }

    #[test]
    fn test_friction_mapping() {
        assert_eq!(WeatherMode::Clear.friction(), 1.0);
        assert_eq!(WeatherMode::Rain.friction(), 0.98);
        assert_eq!(WeatherMode::Snow.friction(), 0.95);
    }

    #[test]
    fn test_reset_round_keeps_highest_score() {
        let mut state = GameState::new(7, Tuning::default());
        state.time.highest_score = 42;
        state.time.elapsed_us = 9_000_000;
        state.stick.angle = 0.2;
        state.env.weather = WeatherMode::Snow;

        state.reset_round();

        assert_eq!(state.time.highest_score, 42);
        assert_eq!(state.time.elapsed_us, 0);
        assert_eq!(state.stick, Stick::default());
        assert_eq!(state.env, Environment::default());
    }

    #[test]
    fn test_clock_advances_in_whole_microseconds() {
        let mut time = RoundTime::default();
        for _ in 0..60 {
            time.advance(1000.0 / 60.0);
        }
        assert_eq!(time.elapsed_us, 60 * 16_667);
        time.recompute_score();
        assert_eq!(time.score, 1);
        assert!((time.elapsed_ms() - 1000.02).abs() < 1e-9);
    }

    #[test]
    fn test_drain_events() {
        let mut state = GameState::new(7, Tuning::default());
        state.emit(GameEvent::RoundStarted);
        assert_eq!(state.drain_events(), vec![GameEvent::RoundStarted]);
        assert!(state.events().is_empty());
    }
}
