// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Computer keyboard to piano note mapping.

use std::collections::HashMap;

use crate::music::NoteId;

/// Home-row layout covering c4 to e5.
///
/// `;` and `æ` both play e5 so English and Icelandic layouts work alike.
pub const DEFAULT_LAYOUT: [(&str, &str); 18] = [
    ("a", "c4"),
    ("w", "c#4"),
    ("s", "d4"),
    ("e", "d#4"),
    ("d", "e4"),
    ("f", "f4"),
    ("t", "f#4"),
    ("g", "g4"),
    ("y", "g#4"),
    ("h", "a4"),
    ("u", "bb4"),
    ("j", "b4"),
    ("k", "c5"),
    ("o", "c#5"),
    ("l", "d5"),
    ("p", "d#5"),
    (";", "e5"),
    ("æ", "e5"),
];

/// Fixed lookup from input symbol to note
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    notes: HashMap<String, NoteId>,
    /// Distinct notes in the order they were first mapped
    order: Vec<NoteId>,
}

impl KeyMap {
    /// Create an empty key map
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the default home-row key map
    pub fn with_defaults() -> Self {
        Self::from_pairs(DEFAULT_LAYOUT)
    }

    /// Build a key map from `(symbol, note)` pairs
    pub fn from_pairs<I, S, N>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, N)>,
        S: Into<String>,
        N: Into<NoteId>,
    {
        let mut map = Self::new();
        for (symbol, note) in pairs {
            map.insert(symbol, note);
        }
        map
    }

    /// Map a symbol to a note, replacing any previous mapping of the symbol
    pub fn insert(&mut self, symbol: impl Into<String>, note: impl Into<NoteId>) {
        let note = note.into();
        if !self.order.contains(&note) {
            self.order.push(note.clone());
        }
        self.notes.insert(symbol.into(), note);
    }

    /// Look up the note for an input symbol
    pub fn lookup(&self, symbol: &str) -> Option<&NoteId> {
        self.notes.get(symbol)
    }

    /// Distinct notes in layout order
    pub fn notes(&self) -> &[NoteId] {
        &self.order
    }

    /// Symbols that play `note`, sorted
    pub fn symbols_for(&self, note: &NoteId) -> Vec<&str> {
        let mut symbols: Vec<&str> = self
            .notes
            .iter()
            .filter(|(_, n)| *n == note)
            .map(|(s, _)| s.as_str())
            .collect();
        symbols.sort_unstable();
        symbols
    }

    /// Number of mapped symbols
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Check if nothing is mapped
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
