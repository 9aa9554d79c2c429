// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Input handling.
//!
//! This module provides:
//! - The piano key map (input symbol to note)
//! - Terminal shortcuts for transport and navigation
//! - The input events consumed by the application dispatcher

pub mod keyboard;
pub mod keymap;

pub use keyboard::{format_shortcut, KeyBinding, KeyboardController, Shortcut};
pub use keymap::{KeyMap, DEFAULT_LAYOUT};

use crate::music::NoteId;

/// On-screen buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Play the selected tune
    Play,
    /// Start recording
    Record,
    /// Stop recording
    Stop,
}

/// Input events handled by the application
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A computer key was pressed, carrying its symbol
    KeyPress(String),
    /// An on-screen piano key was clicked
    KeyClick(NoteId),
    /// A button was clicked
    Click(Button),
    /// A tune was picked from the list
    SelectionChange(usize),
    /// The tune name field gained or lost focus
    FocusName(bool),
    /// A character was typed into the tune name field
    NameInput(char),
    /// The last character of the tune name was deleted
    NameBackspace,
}

/// Action bound to a terminal shortcut
#[derive(Debug, Clone, PartialEq)]
pub enum ControlAction {
    /// Play the selected tune
    Play,
    /// Start recording
    Record,
    /// Stop recording
    Stop,
    /// Select the previous tune
    SelectPrevious,
    /// Select the next tune
    SelectNext,
    /// Focus the tune name field
    EditName,
    /// Toggle help display
    ToggleHelp,
    /// Quit application
    Quit,
}

impl ControlAction {
    /// The button this action stands for, if any
    pub fn button(&self) -> Option<Button> {
        match self {
            ControlAction::Play => Some(Button::Play),
            ControlAction::Record => Some(Button::Record),
            ControlAction::Stop => Some(Button::Stop),
            _ => None,
        }
    }
}
