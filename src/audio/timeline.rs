// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timeline audio engine.
//!
//! Scheduled notes are queued on a dedicated thread which sleeps until the
//! next note is due and fires note on/off messages into a `NoteSink`.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::{AudioEngine, AudioError};
use crate::music::{NoteId, NoteValue};

/// Longest the timeline thread sleeps with an empty queue
const IDLE_WAIT: Duration = Duration::from_millis(250);

/// Receiver of timed note messages
pub trait NoteSink: Send + 'static {
    /// Start sounding a MIDI note
    fn note_on(&mut self, note: u8) -> Result<(), AudioError>;

    /// Stop sounding a MIDI note
    fn note_off(&mut self, note: u8) -> Result<(), AudioError>;
}

/// Sink that only logs, used when no output device is available
#[derive(Debug, Default)]
pub struct SilentSink;

impl NoteSink for SilentSink {
    fn note_on(&mut self, note: u8) -> Result<(), AudioError> {
        debug!(note, "note on (silent)");
        Ok(())
    }

    fn note_off(&mut self, note: u8) -> Result<(), AudioError> {
        debug!(note, "note off (silent)");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum NoteAction {
    Off,
    On,
}

/// A note message waiting for its time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Pending {
    at: Instant,
    seq: u64,
    action: NoteAction,
    note: u8,
}

enum Command {
    Schedule { note: u8, on_at: Instant, off_at: Instant },
    Shutdown,
}

/// Audio engine backed by a timeline thread
pub struct Timeline {
    origin: Instant,
    tempo: f64,
    commands: Sender<Command>,
    thread: Option<JoinHandle<()>>,
}

impl Timeline {
    /// Start a timeline driving `sink`.
    ///
    /// `tempo` (BPM) converts note values into seconds.
    pub fn start<S: NoteSink>(sink: S, tempo: f64) -> Result<Self, AudioError> {
        let (commands, receiver) = mpsc::channel();

        let thread = thread::Builder::new()
            .name("piano-timeline".to_string())
            .spawn(move || run_timeline(sink, receiver))
            .map_err(|e| AudioError::OutputFailed(format!("failed to spawn timeline: {}", e)))?;

        Ok(Self {
            origin: Instant::now(),
            tempo: tempo.clamp(20.0, 300.0),
            commands,
            thread: Some(thread),
        })
    }

    /// Tempo used to interpret note values
    pub fn tempo(&self) -> f64 {
        self.tempo
    }

    /// Convert engine time to a wall-clock instant
    fn instant_at(&self, seconds: f64) -> Result<Instant, AudioError> {
        Duration::try_from_secs_f64(seconds.max(0.0))
            .ok()
            .and_then(|offset| self.origin.checked_add(offset))
            .ok_or(AudioError::TimeOutOfRange(seconds))
    }
}

impl AudioEngine for Timeline {
    fn trigger_attack_release(
        &self,
        note: &NoteId,
        duration: &NoteValue,
        at: Option<f64>,
    ) -> Result<(), AudioError> {
        let midi_note = note.midi_number()?;
        let length = duration.seconds(self.tempo)?;

        let start = at.unwrap_or_else(|| self.now());
        let on_at = self.instant_at(start)?;
        let off_at = Duration::try_from_secs_f64(length)
            .ok()
            .and_then(|length| on_at.checked_add(length))
            .ok_or(AudioError::TimeOutOfRange(start + length))?;

        self.commands
            .send(Command::Schedule {
                note: midi_note,
                on_at,
                off_at,
            })
            .map_err(|_| AudioError::NotRunning)
    }

    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

impl Drop for Timeline {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Timeline thread body
fn run_timeline<S: NoteSink>(mut sink: S, receiver: Receiver<Command>) {
    let mut queue: BinaryHeap<Reverse<Pending>> = BinaryHeap::new();
    // Overlapping triggers of one note share a single note off
    let mut sounding: HashMap<u8, u32> = HashMap::new();
    let mut seq = 0u64;

    loop {
        let wait = queue
            .peek()
            .map(|Reverse(next)| next.at.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_WAIT);

        match receiver.recv_timeout(wait) {
            Ok(Command::Schedule { note, on_at, off_at }) => {
                queue.push(Reverse(Pending {
                    at: on_at,
                    seq,
                    action: NoteAction::On,
                    note,
                }));
                queue.push(Reverse(Pending {
                    at: off_at,
                    seq: seq + 1,
                    action: NoteAction::Off,
                    note,
                }));
                seq += 2;
            }
            Ok(Command::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }

        let now = Instant::now();
        while let Some(Reverse(next)) = queue.peek().copied() {
            if next.at > now {
                break;
            }
            queue.pop();
            fire(&mut sink, &mut sounding, next);
        }
    }

    // Release anything still sounding
    for (note, _) in sounding.drain() {
        if let Err(e) = sink.note_off(note) {
            warn!(note, error = %e, "note off failed during shutdown");
        }
    }
}

fn fire<S: NoteSink>(sink: &mut S, sounding: &mut HashMap<u8, u32>, pending: Pending) {
    let result = match pending.action {
        NoteAction::On => {
            *sounding.entry(pending.note).or_insert(0) += 1;
            sink.note_on(pending.note)
        }
        NoteAction::Off => match sounding.get_mut(&pending.note) {
            Some(count) if *count > 1 => {
                *count -= 1;
                Ok(())
            }
            Some(_) => {
                sounding.remove(&pending.note);
                sink.note_off(pending.note)
            }
            None => Ok(()),
        },
    };

    if let Err(e) = result {
        warn!(note = pending.note, error = %e, "timeline message dropped");
    }
}
