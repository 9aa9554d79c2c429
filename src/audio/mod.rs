// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Audio engine boundary.
//!
//! This module provides:
//! - The `AudioEngine` capability consumed by the piano core
//! - `TonePlayer`, the single-note adapter shared by live input and playback
//! - A timeline engine that fires scheduled notes into a MIDI port or a silent sink

pub mod midi;
pub mod timeline;

pub use midi::{list_outputs, print_outputs, MidiSink};
pub use timeline::{NoteSink, SilentSink, Timeline};

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::music::{NoteError, NoteId, NoteValue};

/// Audio error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AudioError {
    /// The engine is not running (stopped or never started)
    #[error("audio engine is not running")]
    NotRunning,
    /// The engine could not interpret a note or note value
    #[error(transparent)]
    Note(#[from] NoteError),
    /// A scheduled time cannot be represented by the engine clock
    #[error("time out of range: {0} s")]
    TimeOutOfRange(f64),
    /// No output device matched the request
    #[error("no audio output device: {0}")]
    NoDevice(String),
    /// The output device rejected a message
    #[error("audio output failed: {0}")]
    OutputFailed(String),
}

/// Capability of an audio engine with its own timeline
pub trait AudioEngine {
    /// Play `note` for `duration`, at absolute engine time `at` or immediately
    fn trigger_attack_release(
        &self,
        note: &NoteId,
        duration: &NoteValue,
        at: Option<f64>,
    ) -> Result<(), AudioError>;

    /// Current engine time in seconds
    fn now(&self) -> f64;
}

/// UI capability for transient key feedback
pub trait Highlighter {
    /// Light up `note` and clear it again after `duration`
    fn highlight(&mut self, note: &NoteId, duration: Duration);
}

/// Stateless adapter playing single tones through an audio engine
pub struct TonePlayer<E> {
    engine: E,
}

impl<E: AudioEngine> TonePlayer<E> {
    /// Create a tone player over an engine
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Get the underlying engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Current engine time in seconds
    pub fn now(&self) -> f64 {
        self.engine.now()
    }

    /// Play a tone now, or at absolute engine time `at`.
    ///
    /// Engine failures are logged and otherwise swallowed.
    pub fn play(&self, note: &NoteId, duration: &NoteValue, at: Option<f64>) {
        match self.engine.trigger_attack_release(note, duration, at) {
            Ok(()) => debug!(%note, %duration, ?at, "tone triggered"),
            Err(e) => warn!(%note, %duration, error = %e, "tone not played"),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::mock::MockEngine;
    use super::*;

    #[test]
    fn test_tone_player_immediate() {
        let player = TonePlayer::new(MockEngine::default());
        player.play(&NoteId::from("c4"), &NoteValue::eighth(), None);

        let calls = player.engine().calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].note, NoteId::from("c4"));
        assert_eq!(calls[0].at, None);
    }

    #[test]
    fn test_tone_player_scheduled() {
        let player = TonePlayer::new(MockEngine::default());
        player.play(&NoteId::from("a4"), &NoteValue::eighth(), Some(2.5));

        assert_eq!(player.engine().calls.borrow()[0].at, Some(2.5));
    }

    #[test]
    fn test_tone_player_swallows_engine_failure() {
        let engine = MockEngine {
            fail: true,
            ..Default::default()
        };
        let player = TonePlayer::new(engine);

        // Must not panic or propagate
        player.play(&NoteId::from("c4"), &NoteValue::eighth(), None);
        assert!(player.engine().calls.borrow().is_empty());
    }
}
