//! Audio system using Web Audio API
//!
//! Procedural weather ambience and sound effects - no external files.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::{AudioSignal, GameEvent, WeatherMode};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Round started
    Start,
    /// Power-up collected
    PickupCollect,
    /// Power-up effect wore off
    EffectExpire,
    /// Lightning strike
    Thunder,
    /// Stick fell
    GameOver,
    /// New best score
    HighScore,
}

/// A running ambience loop
struct Drone {
    oscillators: Vec<OscillatorNode>,
    gain: GainNode,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    sfx_gain: f32,
    ambience_gain: f32,
    drone: Option<Drone>,
    /// Mode of the loop that is (or would be) playing
    ambience: Option<WeatherMode>,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            sfx_gain: settings.sfx_gain(),
            ambience_gain: settings.ambience_gain(),
            drone: None,
            ambience: None,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// React to one simulation event
    pub fn handle(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Audio(signal) => self.apply(*signal),
            GameEvent::RoundStarted => self.play(SoundEffect::Start),
            GameEvent::PowerUpCollected { .. } => self.play(SoundEffect::PickupCollect),
            GameEvent::PowerUpExpired(_) => self.play(SoundEffect::EffectExpire),
            GameEvent::LightningStrike => self.play(SoundEffect::Thunder),
            GameEvent::GameOver { new_record, .. } => {
                self.play(SoundEffect::GameOver);
                if *new_record {
                    self.play(SoundEffect::HighScore);
                }
            }
            GameEvent::WeatherChanged { .. } => {}
        }
    }

    /// Switch the ambience loop
    pub fn apply(&mut self, signal: AudioSignal) {
        match signal {
            AudioSignal::PlayAmbient(mode) => {
                if self.ambience == Some(mode) && self.drone.is_some() {
                    return;
                }
                self.stop_drone();
                self.ambience = Some(mode);
                self.drone = self.start_drone(mode);
            }
            AudioSignal::PauseAll => self.stop_drone(),
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.sfx_gain;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = self.live_context() else { return };

        match effect {
            SoundEffect::Start => self.play_start(ctx, vol),
            SoundEffect::PickupCollect => self.play_pickup(ctx, vol),
            SoundEffect::EffectExpire => self.play_expire(ctx, vol),
            SoundEffect::Thunder => self.play_thunder(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
            SoundEffect::HighScore => self.play_high_score(ctx, vol),
        }
    }

    /// Context, resumed if the browser suspended it
    fn live_context(&self) -> Option<&AudioContext> {
        let ctx = self.ctx.as_ref()?;
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Some(ctx)
    }

    // === Ambience ===

    fn start_drone(&self, mode: WeatherMode) -> Option<Drone> {
        let vol = self.ambience_gain;
        if vol <= 0.0 {
            return None;
        }
        let ctx = self.live_context()?;

        // (frequencies, waveform, relative level)
        let (freqs, osc_type, level): (&[f32], _, f32) = match mode {
            WeatherMode::Clear => (&[220.0, 277.2, 329.6], OscillatorType::Sine, 0.08),
            WeatherMode::Rain => (&[55.0, 57.5, 110.0], OscillatorType::Triangle, 0.12),
            WeatherMode::Snow => (&[523.3, 659.3, 784.0], OscillatorType::Sine, 0.05),
        };

        let gain = ctx.create_gain().ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;
        let t = ctx.current_time();
        gain.gain().set_value_at_time(0.001, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(vol * level, t + 1.0)
            .ok();

        let mut oscillators = Vec::with_capacity(freqs.len());
        for &freq in freqs {
            let osc = ctx.create_oscillator().ok()?;
            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            osc.start().ok();
            oscillators.push(osc);
        }

        log::debug!("Ambience: {}", mode.as_str());
        Some(Drone { oscillators, gain })
    }

    fn stop_drone(&mut self) {
        let Some(drone) = self.drone.take() else { return };
        let Some(ctx) = &self.ctx else { return };
        let t = ctx.current_time();

        drone.gain.gain().cancel_scheduled_values(t).ok();
        drone.gain.gain().set_value_at_time(drone.gain.gain().value(), t).ok();
        drone.gain
            .gain()
            .exponential_ramp_to_value_at_time(0.001, t + 0.3)
            .ok();
        for osc in &drone.oscillators {
            osc.stop_with_when(t + 0.35).ok();
        }
    }

    // === Sound generators ===

    /// Oscillator routed through its own gain node to the speakers
    fn voice(
        &self,
        ctx: &AudioContext,
        freq: f32,
        wave: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(wave);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Schedule one enveloped tone, optionally gliding to `tone.glide_to`
    fn tone(&self, ctx: &AudioContext, tone: Tone) {
        let Some((osc, gain)) = self.voice(ctx, tone.freq, tone.wave) else {
            return;
        };
        let t = ctx.current_time() + tone.delay;

        gain.gain().set_value_at_time(tone.peak, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + tone.decay)
            .ok();
        if let Some(target) = tone.glide_to {
            osc.frequency().set_value_at_time(tone.freq, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(target, t + tone.decay)
                .ok();
        }

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + tone.decay + 0.05).ok();
    }

    /// `template` repeated for each note, `spacing` seconds apart
    fn arpeggio(&self, ctx: &AudioContext, notes: &[f32], spacing: f64, template: Tone) {
        for (i, &freq) in notes.iter().enumerate() {
            self.tone(
                ctx,
                Tone {
                    freq,
                    delay: template.delay + i as f64 * spacing,
                    ..template
                },
            );
        }
    }

    fn play_start(&self, ctx: &AudioContext, vol: f32) {
        self.tone(
            ctx,
            Tone {
                glide_to: Some(600.0),
                ..Tone::new(200.0, OscillatorType::Triangle, vol * 0.3, 0.2)
            },
        );
    }

    fn play_pickup(&self, ctx: &AudioContext, vol: f32) {
        self.arpeggio(
            ctx,
            &[600.0, 800.0, 1000.0],
            0.08,
            Tone::new(0.0, OscillatorType::Sine, vol * 0.25, 0.15),
        );
    }

    fn play_expire(&self, ctx: &AudioContext, vol: f32) {
        self.arpeggio(
            ctx,
            &[700.0, 500.0],
            0.1,
            Tone::new(0.0, OscillatorType::Square, vol * 0.1, 0.08),
        );
    }

    /// Sharp crack over a long falling rumble
    fn play_thunder(&self, ctx: &AudioContext, vol: f32) {
        self.tone(
            ctx,
            Tone {
                glide_to: Some(150.0),
                ..Tone::new(2500.0, OscillatorType::Sawtooth, vol * 0.2, 0.12)
            },
        );
        self.tone(
            ctx,
            Tone {
                glide_to: Some(30.0),
                ..Tone::new(70.0, OscillatorType::Sine, vol * 0.5, 1.5)
            },
        );
    }

    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        self.arpeggio(
            ctx,
            &[400.0, 350.0, 300.0, 200.0],
            0.2,
            Tone::new(0.0, OscillatorType::Sine, vol * 0.3, 0.3),
        );
    }

    /// Starts after the game-over phrase has finished
    fn play_high_score(&self, ctx: &AudioContext, vol: f32) {
        self.arpeggio(
            ctx,
            &[500.0, 600.0, 700.0, 800.0, 1000.0],
            0.08,
            Tone {
                delay: 0.9,
                ..Tone::new(0.0, OscillatorType::Triangle, vol * 0.25, 0.25)
            },
        );
    }
}

/// One scheduled note
#[derive(Debug, Clone, Copy)]
struct Tone {
    freq: f32,
    wave: OscillatorType,
    /// Seconds from now
    delay: f64,
    peak: f32,
    /// Seconds to fade to silence
    decay: f64,
    glide_to: Option<f32>,
}

impl Tone {
    fn new(freq: f32, wave: OscillatorType, peak: f32, decay: f64) -> Self {
        Self {
            freq,
            wave,
            delay: 0.0,
            peak,
            decay,
            glide_to: None,
        }
    }
}
