// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! MIDI output sink.
//!
//! Sends timeline notes to an external synthesizer through midir, so any
//! software or hardware instrument can voice the piano.

use midir::{MidiOutput, MidiOutputConnection};

use super::timeline::NoteSink;
use super::AudioError;

/// MIDI message constants
pub mod messages {
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
}

const CLIENT_NAME: &str = "piano";

/// MIDI output connection used as a timeline sink
pub struct MidiSink {
    connection: MidiOutputConnection,
    channel: u8,
    velocity: u8,
}

impl MidiSink {
    /// Connect to the output port at `index` (see `list_outputs`)
    pub fn connect(index: usize) -> Result<Self, AudioError> {
        let output = MidiOutput::new(CLIENT_NAME)
            .map_err(|e| AudioError::NoDevice(format!("failed to create MIDI client: {}", e)))?;

        let ports = output.ports();
        let port = ports.get(index).ok_or_else(|| {
            AudioError::NoDevice(format!(
                "MIDI output {} not found (only {} available)",
                index,
                ports.len()
            ))
        })?;

        let connection = output
            .connect(port, "piano-out")
            .map_err(|e| AudioError::NoDevice(format!("failed to connect to MIDI output: {}", e)))?;

        Ok(Self {
            connection,
            channel: 0,
            velocity: 100,
        })
    }

    /// Set the MIDI channel (0-15)
    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel & 0x0F;
        self
    }

    /// Set the note on velocity (1-127)
    pub fn with_velocity(mut self, velocity: u8) -> Self {
        self.velocity = velocity.clamp(1, 127);
        self
    }

    fn send(&mut self, message: &[u8]) -> Result<(), AudioError> {
        self.connection
            .send(message)
            .map_err(|e| AudioError::OutputFailed(e.to_string()))
    }
}

impl NoteSink for MidiSink {
    fn note_on(&mut self, note: u8) -> Result<(), AudioError> {
        let message = note_on_message(self.channel, note, self.velocity);
        self.send(&message)
    }

    fn note_off(&mut self, note: u8) -> Result<(), AudioError> {
        let message = note_off_message(self.channel, note);
        self.send(&message)
    }
}

fn note_on_message(channel: u8, note: u8, velocity: u8) -> [u8; 3] {
    [messages::NOTE_ON | (channel & 0x0F), note & 0x7F, velocity & 0x7F]
}

fn note_off_message(channel: u8, note: u8) -> [u8; 3] {
    [messages::NOTE_OFF | (channel & 0x0F), note & 0x7F, 0]
}

/// Names of the available MIDI outputs, in port index order
pub fn list_outputs() -> Vec<String> {
    let Ok(output) = MidiOutput::new(CLIENT_NAME) else {
        return Vec::new();
    };

    output
        .ports()
        .iter()
        .map(|port| {
            output
                .port_name(port)
                .unwrap_or_else(|_| "<unknown>".to_string())
        })
        .collect()
}

/// Print the available MIDI outputs
pub fn print_outputs() {
    let outputs = list_outputs();
    if outputs.is_empty() {
        println!("No MIDI outputs found");
        return;
    }

    println!("MIDI outputs:");
    for (i, name) in outputs.iter().enumerate() {
        println!("  {}: {}", i, name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_messages() {
        assert_eq!(note_on_message(0, 60, 100), [0x90, 60, 100]);
        assert_eq!(note_off_message(0, 60), [0x80, 60, 0]);
        assert_eq!(note_on_message(3, 61, 127), [0x93, 61, 127]);
    }

    #[test]
    fn test_messages_are_masked() {
        assert_eq!(note_on_message(17, 200, 255), [0x91, 72, 127]);
    }

    #[test]
    fn test_list_outputs() {
        // Should not panic without MIDI devices
        let _ = list_outputs();
    }
}
