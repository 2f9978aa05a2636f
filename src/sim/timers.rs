//! Round-clock timers
//!
//! Every delayed action (grace end, lightning, weather change, power-up
//! expiry) is an expiry timestamp on the round clock. The round clock only
//! advances while the game is running, so pausing freezes every timer with
//! its remaining duration intact.
//!
//! The clock counts whole microseconds, so a window of a given length spans
//! the same number of ticks wherever it starts.

use serde::{Deserialize, Serialize};

use super::state::PowerUpKind;

/// What happens when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// Grace window is over; wind, gravity and fall checks kick in
    GraceEnd,
    /// Re-roll the weather
    WeatherChange,
    /// Strike lightning (rain only)
    LightningStrike,
    /// Turn the lightning flash off
    LightningEnd,
    /// A power-up effect window closes
    EffectExpiry(PowerUpKind),
}

/// Convert a millisecond duration to round-clock microseconds
pub fn ms_to_us(ms: f64) -> u64 {
    (ms.max(0.0) * 1000.0).round() as u64
}

/// A pending timer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    pub event: TimerEvent,
    /// Round time (us) after which the timer fires
    pub fires_at: u64,
}

/// Pending timers, at most one per event
///
/// A handful of entries at most, so a linear scan beats a heap.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerQueue {
    timers: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self { timers: Vec::new() }
    }

    /// Arm `event` to fire `delay_ms` after `now`, replacing any pending
    /// instance. Returns the deadline.
    pub fn schedule(&mut self, event: TimerEvent, now: u64, delay_ms: f64) -> u64 {
        let fires_at = now + ms_to_us(delay_ms);
        match self.timers.iter_mut().find(|t| t.event == event) {
            Some(timer) => timer.fires_at = fires_at,
            None => self.timers.push(Timer { event, fires_at }),
        }
        fires_at
    }

    /// Drop a pending timer; returns whether one was pending
    pub fn cancel(&mut self, event: TimerEvent) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.event != event);
        self.timers.len() != before
    }

    pub fn is_pending(&self, event: TimerEvent) -> bool {
        self.timers.iter().any(|t| t.event == event)
    }

    /// Milliseconds left before `event` fires
    pub fn remaining(&self, event: TimerEvent, now: u64) -> Option<f64> {
        self.timers
            .iter()
            .find(|t| t.event == event)
            .map(|t| t.fires_at.saturating_sub(now) as f64 / 1000.0)
    }

    /// Remove and return the earliest timer whose deadline has passed.
    ///
    /// A timer is due once `now` is strictly past `fires_at`, so an effect
    /// armed for `d` ms stays in force for the whole closed window.
    pub fn pop_due(&mut self, now: u64) -> Option<TimerEvent> {
        let (index, _) = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| now > t.fires_at)
            .min_by_key(|(_, t)| t.fires_at)?;
        Some(self.timers.swap_remove(index).event)
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Timer> {
        self.timers.iter()
    }
}
