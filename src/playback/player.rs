// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Tune player.
//!
//! Every event of a tune is scheduled up front against a single reading of
//! the engine clock, so the recorded spacing is reproduced exactly no matter
//! how long the scheduling loop itself takes. A dispatched tune cannot be
//! stopped.

use tracing::debug;

use crate::audio::{AudioEngine, TonePlayer};
use crate::music::Tune;

/// Schedules whole tunes on the audio engine's timeline
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Seconds added to the clock reading before the first event
    lead_in: f64,
}

impl Player {
    /// Create a player that starts tunes at the current engine time
    pub fn new() -> Self {
        Self { lead_in: 0.0 }
    }

    /// Create a player with a lead-in (negative values are treated as zero)
    pub fn with_lead_in(lead_in: f64) -> Self {
        Self {
            lead_in: lead_in.max(0.0),
        }
    }

    /// Get the lead-in in seconds
    pub fn lead_in(&self) -> f64 {
        self.lead_in
    }

    /// Schedule every event of `tune`, returning the number scheduled
    pub fn play<E: AudioEngine>(&self, tones: &TonePlayer<E>, tune: &Tune) -> usize {
        let t0 = tones.now() + self.lead_in;

        for event in &tune.tune {
            tones.play(&event.note, &event.duration, Some(t0 + event.timing));
        }

        debug!(name = %tune.name, events = tune.len(), t0, "tune scheduled");
        tune.len()
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}
