// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Tone events and tunes.

use serde::{Deserialize, Serialize};

use super::{NoteId, NoteValue};

/// A single recorded tone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneEvent {
    /// Note that was triggered
    pub note: NoteId,
    /// Note value forwarded to the audio engine
    pub duration: NoteValue,
    /// Seconds since the recording session started
    pub timing: f64,
}

impl ToneEvent {
    /// Create a new tone event
    pub fn new(note: impl Into<NoteId>, duration: impl Into<NoteValue>, timing: f64) -> Self {
        Self {
            note: note.into(),
            duration: duration.into(),
            timing,
        }
    }
}

/// A named, ordered sequence of tone events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tune {
    /// Display name
    pub name: String,
    /// Events in recorded order
    pub tune: Vec<ToneEvent>,
}

impl Tune {
    /// Create a new tune
    pub fn new(name: impl Into<String>, tune: Vec<ToneEvent>) -> Self {
        Self {
            name: name.into(),
            tune,
        }
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.tune.len()
    }

    /// Check if the tune has no events
    pub fn is_empty(&self) -> bool {
        self.tune.is_empty()
    }

    /// Offset of the last event in seconds
    pub fn length_secs(&self) -> f64 {
        self.tune.last().map(|e| e.timing).unwrap_or(0.0)
    }
}
