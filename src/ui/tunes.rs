// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Saved tunes list widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::store::TuneCollection;

/// Index of the first visible row, keeping the selection on screen
pub fn first_visible(selected: Option<usize>, height: u16) -> usize {
    let height = height as usize;
    match selected {
        Some(i) if height > 0 && i >= height => i + 1 - height,
        _ => 0,
    }
}

/// The tune index under a terminal row, if any
pub fn tune_at(area: Rect, tunes: &TuneCollection, column: u16, row: u16) -> Option<usize> {
    if !super::hit(area, column, row) {
        return None;
    }
    let index = first_visible(tunes.selected_index(), area.height) + (row - area.y) as usize;
    (index < tunes.len()).then_some(index)
}

/// Widget listing the loaded tunes
pub struct TunesWidget<'a> {
    tunes: &'a TuneCollection,
    block: Option<Block<'a>>,
}

impl<'a> TunesWidget<'a> {
    /// Create a new tunes widget
    pub fn new(tunes: &'a TuneCollection) -> Self {
        Self { tunes, block: None }
    }

    /// Set the block wrapper
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for TunesWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        if self.tunes.is_empty() {
            Paragraph::new("No tunes loaded")
                .style(Style::default().fg(Color::DarkGray))
                .render(area, buf);
            return;
        }

        let selected = self.tunes.selected_index();
        let first = first_visible(selected, area.height);

        let lines: Vec<Line> = self
            .tunes
            .tunes()
            .iter()
            .enumerate()
            .skip(first)
            .take(area.height as usize)
            .map(|(i, tune)| {
                let is_selected = selected == Some(i);
                let (marker, style) = if is_selected {
                    (
                        "▶ ",
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    )
                } else {
                    ("  ", Style::default().fg(Color::White))
                };

                Line::from(vec![
                    Span::styled(marker, style),
                    Span::styled(tune.name.clone(), style),
                    Span::styled(
                        format!("  {} notes, {:.1}s", tune.len(), tune.length_secs()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])
            })
            .collect();

        Paragraph::new(lines).render(area, buf);
    }
}
