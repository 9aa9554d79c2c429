// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Piano keyboard widget.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Paragraph, Widget},
};

use crate::audio::Highlighter;
use crate::control::KeyMap;
use crate::music::NoteId;

/// Pressed-key colour
const PRESSED: Color = Color::Rgb(152, 152, 152);

/// Keys currently lit, each with its own reset timer
#[derive(Debug, Default)]
pub struct KeyHighlights {
    lit: HashSet<NoteId>,
    resets: Vec<(Instant, NoteId)>,
}

impl KeyHighlights {
    /// Create with nothing lit
    pub fn new() -> Self {
        Self::default()
    }

    /// Light `note` at `now` until `now + duration`
    pub fn light(&mut self, note: &NoteId, duration: Duration, now: Instant) {
        self.lit.insert(note.clone());
        self.resets.push((now + duration, note.clone()));
    }

    /// Run every reset timer that is due.
    ///
    /// A due timer clears its key even if a later press armed another timer.
    pub fn expire(&mut self, now: Instant) {
        let lit = &mut self.lit;
        self.resets.retain(|(at, note)| {
            if *at <= now {
                lit.remove(note);
                false
            } else {
                true
            }
        });
    }

    /// Check if a key is lit
    pub fn is_lit(&self, note: &NoteId) -> bool {
        self.lit.contains(note)
    }

    /// Number of timers still running
    pub fn pending(&self) -> usize {
        self.resets.len()
    }
}

impl Highlighter for KeyHighlights {
    fn highlight(&mut self, note: &NoteId, duration: Duration) {
        self.light(note, duration, Instant::now());
    }
}

/// Split `area` into one column per key, left to right
pub fn key_areas(area: Rect, count: usize) -> Vec<Rect> {
    if count == 0 || area.width == 0 {
        return Vec::new();
    }

    let width = (area.width as usize / count).max(1) as u16;
    (0..count)
        .map(|i| i as u16 * width)
        .take_while(|offset| *offset < area.width)
        .map(|offset| Rect::new(area.x + offset, area.y, width, area.height))
        .collect()
}

/// The key under a terminal cell, if any
pub fn key_at(area: Rect, notes: &[NoteId], column: u16, row: u16) -> Option<NoteId> {
    key_areas(area, notes.len())
        .iter()
        .zip(notes)
        .find(|(rect, _)| super::hit(**rect, column, row))
        .map(|(_, note)| note.clone())
}

/// On-screen keyboard, one key per distinct note
pub struct PianoWidget<'a> {
    keymap: &'a KeyMap,
    highlights: &'a KeyHighlights,
    block: Option<Block<'a>>,
}

impl<'a> PianoWidget<'a> {
    /// Create a piano widget
    pub fn new(keymap: &'a KeyMap, highlights: &'a KeyHighlights) -> Self {
        Self {
            keymap,
            highlights,
            block: None,
        }
    }

    /// Set the block wrapper
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for PianoWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        let notes = self.keymap.notes();
        for (rect, note) in key_areas(area, notes.len()).into_iter().zip(notes) {
            let style = if self.highlights.is_lit(note) {
                Style::default().bg(PRESSED).fg(Color::Black).add_modifier(Modifier::BOLD)
            } else if note.is_accidental() {
                Style::default().bg(Color::Black).fg(Color::White)
            } else {
                Style::default().bg(Color::White).fg(Color::Black)
            };

            // Leave a gap between neighbouring keys
            let key = if rect.width > 2 {
                Rect { width: rect.width - 1, ..rect }
            } else {
                rect
            };

            let mut lines = vec![Line::from(note.as_str())];
            for _ in 2..key.height {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(self.keymap.symbols_for(note).join(" ")));

            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .style(style)
                .render(key, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_presses_share_resets() {
        let mut lights = KeyHighlights::new();
        let note = NoteId::from("c4");
        let t0 = Instant::now();

        lights.light(&note, Duration::from_millis(200), t0);
        lights.light(&note, Duration::from_millis(200), t0 + Duration::from_millis(100));
        assert_eq!(lights.pending(), 2);

        // The first timer clears the key while the second is still armed
        lights.expire(t0 + Duration::from_millis(200));
        assert!(!lights.is_lit(&note));
        assert_eq!(lights.pending(), 1);

        lights.expire(t0 + Duration::from_millis(300));
        assert_eq!(lights.pending(), 0);
    }

    #[test]
    fn test_highlighter_lights_key() {
        let mut lights = KeyHighlights::new();
        lights.highlight(&NoteId::from("e5"), Duration::from_secs(60));

        assert!(lights.is_lit(&NoteId::from("e5")));
        lights.expire(Instant::now());
        assert!(lights.is_lit(&NoteId::from("e5")));
    }

    #[test]
    fn test_key_areas() {
        let areas = key_areas(Rect::new(2, 1, 34, 5), 17);
        assert_eq!(areas.len(), 17);
        assert_eq!(areas[0], Rect::new(2, 1, 2, 5));
        assert_eq!(areas[16].x, 34);

        assert!(key_areas(Rect::new(0, 0, 10, 5), 0).is_empty());
        // Narrower than the key count: only whole columns are kept
        assert_eq!(key_areas(Rect::new(0, 0, 5, 5), 17).len(), 5);
    }

    #[test]
    fn test_key_at() {
        let notes = KeyMap::with_defaults().notes().to_vec();
        let area = Rect::new(0, 0, 68, 5);

        assert_eq!(key_at(area, &notes, 0, 2), Some(NoteId::from("c4")));
        assert_eq!(key_at(area, &notes, 5, 0), Some(NoteId::from("c#4")));
        assert_eq!(key_at(area, &notes, 67, 4), Some(NoteId::from("e5")));
        assert_eq!(key_at(area, &notes, 10, 5), None);
    }

    #[test]
    fn test_render_marks_lit_key() {
        let keymap = KeyMap::with_defaults();
        let mut lights = KeyHighlights::new();
        lights.light(&NoteId::from("c4"), Duration::from_secs(1), Instant::now());

        let area = Rect::new(0, 0, 68, 4);
        let mut buf = Buffer::empty(area);
        PianoWidget::new(&keymap, &lights).render(area, &mut buf);

        assert_eq!(buf[(0, 0)].bg, PRESSED);
        assert_eq!(buf[(4, 0)].bg, Color::Black);
        assert_eq!(buf[(8, 0)].bg, Color::White);
    }
}
