// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Recording of live tone sessions.

pub mod capture;

pub use capture::{RecordError, Recorder, RecordingState};
