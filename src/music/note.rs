// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Note identifiers and note values.
//!
//! Both are opaque string tokens to the recorder and player. Only the audio
//! engine interprets them, at playback time.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when an audio engine interprets a token it does not understand
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteError {
    /// The note identifier is not `<letter>[accidentals]<octave>`
    #[error("invalid note identifier: {0:?}")]
    InvalidNote(String),
    /// The note is outside the MIDI range 0-127
    #[error("note out of MIDI range: {0:?}")]
    OutOfRange(String),
    /// The note value is not a recognised duration
    #[error("invalid note value: {0:?}")]
    InvalidValue(String),
}

/// A pitch plus octave, e.g. `"c#4"` or `"bb4"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Create a note identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if the note carries a sharp or flat (a black key)
    pub fn is_accidental(&self) -> bool {
        matches!(self.0.chars().nth(1), Some('#') | Some('b'))
    }

    /// Convert to a MIDI note number (C4 = 60)
    pub fn midi_number(&self) -> Result<u8, NoteError> {
        let mut chars = self.0.chars().peekable();

        let pitch_class: i32 = match chars.next().map(|c| c.to_ascii_lowercase()) {
            Some('c') => 0,
            Some('d') => 2,
            Some('e') => 4,
            Some('f') => 5,
            Some('g') => 7,
            Some('a') => 9,
            Some('b') => 11,
            _ => return Err(NoteError::InvalidNote(self.0.clone())),
        };

        let mut offset = 0i32;
        while let Some(&c) = chars.peek() {
            match c {
                '#' => offset += 1,
                'b' => offset -= 1,
                _ => break,
            }
            chars.next();
        }

        let octave: i32 = chars
            .collect::<String>()
            .parse()
            .map_err(|_| NoteError::InvalidNote(self.0.clone()))?;

        octave
            .checked_add(1)
            .and_then(|o| o.checked_mul(12))
            .and_then(|n| n.checked_add(pitch_class + offset))
            .and_then(|n| u8::try_from(n).ok())
            .filter(|n| *n <= 127)
            .ok_or_else(|| NoteError::OutOfRange(self.0.clone()))
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A musical duration token, e.g. `"8n"` for an eighth note
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteValue(String);

impl NoteValue {
    /// Create a note value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The eighth note used for every tone the piano plays
    pub fn eighth() -> Self {
        Self::new("8n")
    }

    /// Get the token text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in seconds at the given tempo.
    ///
    /// Accepts `<N>n` (1/N of a whole note), `<N>t` (triplet), `<N>m`
    /// (measures of 4/4), each optionally dotted, or a plain number of seconds.
    pub fn seconds(&self, bpm: f64) -> Result<f64, NoteError> {
        let invalid = || NoteError::InvalidValue(self.0.clone());
        let quarter = 60.0 / bpm;

        let text = self.0.trim();
        let dots = text.len() - text.trim_end_matches('.').len();
        let body = text.trim_end_matches('.');

        let base = if let Some(n) = body.strip_suffix('n') {
            let n: f64 = n.parse().map_err(|_| invalid())?;
            4.0 * quarter / n
        } else if let Some(n) = body.strip_suffix('t') {
            let n: f64 = n.parse().map_err(|_| invalid())?;
            4.0 * quarter / n * 2.0 / 3.0
        } else if let Some(n) = body.strip_suffix('m') {
            let n: f64 = n.parse().map_err(|_| invalid())?;
            4.0 * quarter * n
        } else {
            body.parse().map_err(|_| invalid())?
        };

        if !base.is_finite() || base < 0.0 {
            return Err(invalid());
        }

        // Each dot adds half of the previous addition
        let mut length = base;
        let mut extra = base;
        for _ in 0..dots {
            extra /= 2.0;
            length += extra;
        }

        // Must fit a scheduler duration
        Duration::try_from_secs_f64(length).map_err(|_| invalid())?;
        Ok(length)
    }
}

impl Default for NoteValue {
    fn default() -> Self {
        Self::eighth()
    }
}

impl fmt::Display for NoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
