// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Transport row: play, record and stop buttons plus the tune name field.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::control::Button;

/// Clickable regions of the transport row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransportAreas {
    /// Play button
    pub play: Rect,
    /// Record button
    pub record: Rect,
    /// Stop button
    pub stop: Rect,
    /// Tune name field
    pub name: Rect,
}

impl TransportAreas {
    /// Lay out the row inside `area`
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(10), // Play
                Constraint::Length(1),  // Spacer
                Constraint::Length(12), // Record
                Constraint::Length(1),  // Spacer
                Constraint::Length(10), // Stop
                Constraint::Length(2),  // Spacer
                Constraint::Min(10),    // Name
            ])
            .split(area);

        Self {
            play: chunks[0],
            record: chunks[2],
            stop: chunks[4],
            name: chunks[6],
        }
    }

    /// The button under a terminal cell
    pub fn button_at(&self, column: u16, row: u16) -> Option<Button> {
        [
            (self.play, Button::Play),
            (self.record, Button::Record),
            (self.stop, Button::Stop),
        ]
        .into_iter()
        .find(|(rect, _)| super::hit(*rect, column, row))
        .map(|(_, button)| button)
    }
}

/// Transport widget
pub struct TransportWidget<'a> {
    can_record: bool,
    can_stop: bool,
    name: &'a str,
    placeholder: &'a str,
    name_focused: bool,
    block: Option<Block<'a>>,
}

impl<'a> TransportWidget<'a> {
    /// Create a transport widget showing `name` in the name field
    pub fn new(name: &'a str, placeholder: &'a str) -> Self {
        Self {
            can_record: true,
            can_stop: false,
            name,
            placeholder,
            name_focused: false,
            block: None,
        }
    }

    /// Set which of record and stop are enabled
    pub fn enabled(mut self, can_record: bool, can_stop: bool) -> Self {
        self.can_record = can_record;
        self.can_stop = can_stop;
        self
    }

    /// Show the name field as focused
    pub fn name_focused(mut self, focused: bool) -> Self {
        self.name_focused = focused;
        self
    }

    /// Set the block wrapper
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

fn button(label: &str, enabled: bool, color: Color) -> Paragraph<'_> {
    let style = if enabled {
        Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Paragraph::new(label).alignment(Alignment::Center).style(style)
}

impl Widget for TransportWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        let areas = TransportAreas::new(area);

        button("▶ Play", true, Color::Green).render(areas.play, buf);
        button("● Record", self.can_record, Color::Red).render(areas.record, buf);
        button("■ Stop", self.can_stop, Color::Yellow).render(areas.stop, buf);

        let label = Span::styled("Name: ", Style::default().fg(Color::Cyan));
        let field = if self.name_focused {
            Line::from(vec![
                label,
                Span::styled(
                    self.name,
                    Style::default().fg(Color::White).add_modifier(Modifier::UNDERLINED),
                ),
                Span::styled("▏", Style::default().fg(Color::White)),
            ])
        } else if self.name.is_empty() {
            Line::from(vec![
                label,
                Span::styled(self.placeholder, Style::default().fg(Color::DarkGray)),
            ])
        } else {
            Line::from(vec![label, Span::raw(self.name)])
        };
        Paragraph::new(field).render(areas.name, buf);
    }
}
