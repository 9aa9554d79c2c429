// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Musical data model.
//!
//! This module provides:
//! - Opaque note identifiers and note values (duration tokens)
//! - Tone events and named tunes as exchanged with the tune store

pub mod note;
pub mod tune;

pub use note::{NoteError, NoteId, NoteValue};
pub use tune::{ToneEvent, Tune};
