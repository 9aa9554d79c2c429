// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Terminal virtual piano.
//!
//! Computer keys play notes through an audio engine. Performances can be
//! recorded with their timing, saved to a remote tune service, and replayed
//! with the recorded spacing.

pub mod app;
pub mod audio;
pub mod config;
pub mod control;
pub mod music;
pub mod playback;
pub mod recording;
pub mod store;
pub mod ui;

pub use app::App;
pub use music::{NoteId, NoteValue, ToneEvent, Tune};
