// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Live tone capture.
//!
//! Records tone triggers as offsets from the session start so a recorded
//! tune can be replayed from any later point in time with the same spacing.

use std::time::Instant;

use thiserror::Error;

use crate::music::{NoteId, NoteValue, ToneEvent};

/// Recording state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    /// Not recording
    Idle,
    /// Capturing tone triggers
    Active,
}

impl Default for RecordingState {
    fn default() -> Self {
        RecordingState::Idle
    }
}

/// Recorder errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// `start` was called while a session was already active
    #[error("a recording session is already active")]
    AlreadyRecording,
}

/// Ephemeral state of one recording session
#[derive(Debug, Clone, Default)]
struct RecordingSession {
    /// Session start, `None` while idle
    start_time: Option<Instant>,
    /// Events in trigger order
    buffer: Vec<ToneEvent>,
}

/// Recorder for capturing tone triggers into an event log
#[derive(Debug, Default)]
pub struct Recorder {
    state: RecordingState,
    session: RecordingSession,
}

impl Recorder {
    /// Create an idle recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current state
    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// Check if recording
    pub fn is_recording(&self) -> bool {
        self.state == RecordingState::Active
    }

    /// Events captured so far in the active session
    pub fn events(&self) -> &[ToneEvent] {
        &self.session.buffer
    }

    /// Number of events captured so far
    pub fn event_count(&self) -> usize {
        self.session.buffer.len()
    }

    /// Start a session at `now`.
    ///
    /// An active session is left untouched and the call is rejected.
    pub fn start(&mut self, now: Instant) -> Result<(), RecordError> {
        if self.state == RecordingState::Active {
            return Err(RecordError::AlreadyRecording);
        }

        self.session.buffer.clear();
        self.session.start_time = Some(now);
        self.state = RecordingState::Active;
        Ok(())
    }

    /// Append a tone triggered at `now`.
    ///
    /// Returns `false` without recording anything when idle.
    pub fn record(&mut self, note: NoteId, duration: NoteValue, now: Instant) -> bool {
        let Some(start) = self.session.start_time else {
            return false;
        };
        if self.state != RecordingState::Active {
            return false;
        }

        // Clamped so a clock reading before start cannot break ordering
        let timing = now.saturating_duration_since(start).as_secs_f64();
        let timing = match self.session.buffer.last() {
            Some(last) if last.timing > timing => last.timing,
            _ => timing,
        };

        self.session.buffer.push(ToneEvent {
            note,
            duration,
            timing,
        });
        true
    }

    /// Stop the session and hand out the captured events.
    ///
    /// Stopping while idle returns an empty log.
    pub fn stop(&mut self) -> Vec<ToneEvent> {
        self.state = RecordingState::Idle;
        self.session.start_time = None;
        std::mem::take(&mut self.session.buffer)
    }
}
