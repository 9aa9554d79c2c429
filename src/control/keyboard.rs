// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Keyboard shortcut handling.
//!
//! Transport and navigation shortcuts use keys outside the piano layout so
//! plain letters stay free for playing notes.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};

use super::ControlAction;

/// A keyboard shortcut definition
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shortcut {
    /// Key code
    pub code: KeyCode,
    /// Required modifiers
    pub modifiers: KeyModifiers,
}

impl Shortcut {
    /// Create a new shortcut
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Create a shortcut with no modifiers
    pub fn key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    /// Create a shortcut with Ctrl modifier
    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }
}

/// A keyboard binding (shortcut to action)
#[derive(Debug, Clone)]
pub struct KeyBinding {
    /// The shortcut
    pub shortcut: Shortcut,
    /// The action to perform
    pub action: ControlAction,
    /// Description for help display
    pub description: String,
}

impl KeyBinding {
    /// Create a new key binding
    pub fn new(shortcut: Shortcut, action: ControlAction, description: impl Into<String>) -> Self {
        Self {
            shortcut,
            action,
            description: description.into(),
        }
    }
}

/// Keyboard controller with configurable bindings
pub struct KeyboardController {
    bindings: HashMap<Shortcut, KeyBinding>,
}

impl KeyboardController {
    /// Create an empty keyboard controller
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Create a keyboard controller with default bindings
    pub fn with_defaults() -> Self {
        let mut controller = Self::new();
        controller.add_default_bindings();
        controller
    }

    fn add_default_bindings(&mut self) {
        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::Enter),
            ControlAction::Play,
            "Play selected tune",
        ));

        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::F(2)),
            ControlAction::Record,
            "Start recording",
        ));
        self.add(KeyBinding::new(
            Shortcut::ctrl(KeyCode::Char('r')),
            ControlAction::Record,
            "Start recording",
        ));

        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::F(3)),
            ControlAction::Stop,
            "Stop recording",
        ));
        self.add(KeyBinding::new(
            Shortcut::ctrl(KeyCode::Char('s')),
            ControlAction::Stop,
            "Stop recording",
        ));

        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::Up),
            ControlAction::SelectPrevious,
            "Previous tune",
        ));
        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::Down),
            ControlAction::SelectNext,
            "Next tune",
        ));

        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::Tab),
            ControlAction::EditName,
            "Edit tune name",
        ));

        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::F(1)),
            ControlAction::ToggleHelp,
            "Toggle help",
        ));

        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::Esc),
            ControlAction::Quit,
            "Quit",
        ));
        self.add(KeyBinding::new(
            Shortcut::ctrl(KeyCode::Char('c')),
            ControlAction::Quit,
            "Quit",
        ));
    }

    /// Add a key binding
    pub fn add(&mut self, binding: KeyBinding) {
        self.bindings.insert(binding.shortcut.clone(), binding);
    }

    /// Get action for a key event
    pub fn get_action(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<&ControlAction> {
        let shortcut = Shortcut::new(code, modifiers);
        self.bindings.get(&shortcut).map(|b| &b.action)
    }

    /// Bindings sorted by description, for help display
    pub fn bindings(&self) -> Vec<&KeyBinding> {
        let mut bindings: Vec<&KeyBinding> = self.bindings.values().collect();
        bindings.sort_by(|a, b| {
            a.description
                .cmp(&b.description)
                .then_with(|| format_shortcut(&a.shortcut).cmp(&format_shortcut(&b.shortcut)))
        });
        bindings
    }
}

impl Default for KeyboardController {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Format a shortcut for display
pub fn format_shortcut(shortcut: &Shortcut) -> String {
    let mut parts = Vec::new();

    if shortcut.modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl");
    }
    if shortcut.modifiers.contains(KeyModifiers::ALT) {
        parts.push("Alt");
    }
    if shortcut.modifiers.contains(KeyModifiers::SHIFT) {
        parts.push("Shift");
    }

    let key = match shortcut.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_uppercase().to_string(),
        KeyCode::F(n) => format!("F{}", n),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        _ => "?".to_string(),
    };

    parts.push(&key);
    parts.join("+")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let controller = KeyboardController::with_defaults();

        assert_eq!(
            controller.get_action(KeyCode::Enter, KeyModifiers::NONE),
            Some(&ControlAction::Play)
        );
        assert_eq!(
            controller.get_action(KeyCode::F(2), KeyModifiers::NONE),
            Some(&ControlAction::Record)
        );
        assert_eq!(
            controller.get_action(KeyCode::Char('s'), KeyModifiers::CONTROL),
            Some(&ControlAction::Stop)
        );
        assert_eq!(
            controller.get_action(KeyCode::Down, KeyModifiers::NONE),
            Some(&ControlAction::SelectNext)
        );
    }

    #[test]
    fn test_piano_letters_are_unbound() {
        let controller = KeyboardController::with_defaults();
        for c in "awsedftgyhujkolp;æ".chars() {
            assert_eq!(controller.get_action(KeyCode::Char(c), KeyModifiers::NONE), None);
        }
    }

    #[test]
    fn test_add_binding_replaces_shortcut() {
        let mut controller = KeyboardController::new();
        assert!(controller.get_action(KeyCode::Char(' '), KeyModifiers::NONE).is_none());

        controller.add(KeyBinding::new(
            Shortcut::key(KeyCode::Char(' ')),
            ControlAction::Play,
            "Custom play",
        ));
        controller.add(KeyBinding::new(
            Shortcut::key(KeyCode::Char(' ')),
            ControlAction::Stop,
            "Custom stop",
        ));
        assert_eq!(
            controller.get_action(KeyCode::Char(' '), KeyModifiers::NONE),
            Some(&ControlAction::Stop)
        );
    }

    #[test]
    fn test_format_shortcut() {
        assert_eq!(format_shortcut(&Shortcut::key(KeyCode::Char(' '))), "Space");
        assert_eq!(format_shortcut(&Shortcut::ctrl(KeyCode::Char('r'))), "Ctrl+R");
        assert_eq!(format_shortcut(&Shortcut::key(KeyCode::F(3))), "F3");
        assert_eq!(format_shortcut(&Shortcut::key(KeyCode::Up)), "↑");
    }

    #[test]
    fn test_bindings_sorted_for_help() {
        let controller = KeyboardController::with_defaults();
        let descriptions: Vec<&str> = controller
            .bindings()
            .iter()
            .map(|b| b.description.as_str())
            .collect();

        let mut sorted = descriptions.clone();
        sorted.sort();
        assert_eq!(descriptions, sorted);
    }
}
