// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Terminal UI for the piano.
//!
//! Provides a ratatui-based terminal interface with an on-screen keyboard,
//! transport buttons, the tune name field and the saved tunes list. The
//! runner owns the event loop: terminal input and finished store requests
//! both arrive on channels and are handled one at a time.

mod piano;
mod transport;
mod tunes;

pub use piano::{key_areas, key_at, KeyHighlights, PianoWidget};
pub use transport::{TransportAreas, TransportWidget};
pub use tunes::{first_visible, tune_at, TunesWidget};

use std::io::{self, Stdout};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::app::App;
use crate::audio::AudioEngine;
use crate::control::{format_shortcut, Button, ControlAction, InputEvent, KeyboardController};
use crate::store::{Effect, StoreEvent, TuneService};

/// Check if a terminal cell lies inside `area`
pub(crate) fn hit(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

/// UI-only state
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Help text visible
    pub show_help: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Status message timestamp
    pub status_time: Option<Instant>,
}

impl UiState {
    /// Set a status message that will be displayed temporarily
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_time = Some(Instant::now());
    }

    /// Clear expired status message
    pub fn clear_expired_status(&mut self) {
        if let Some(time) = self.status_time {
            if time.elapsed() > Duration::from_secs(3) {
                self.status_message = None;
                self.status_time = None;
            }
        }
    }
}

/// What a terminal event asks of the runner
#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    /// Forward to the application
    Input(InputEvent),
    /// Toggle help display
    ToggleHelp,
    /// Quit application
    Quit,
}

/// Screen regions, recomputed on every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenLayout {
    /// Title and recording indicator
    pub header: Rect,
    /// Piano block
    pub piano: Rect,
    /// Transport block
    pub transport: Rect,
    /// Tune list block
    pub tunes: Rect,
    /// Status bar
    pub status: Rect,
}

impl ScreenLayout {
    /// Lay out a screen of size `area`
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(7), // Piano
                Constraint::Length(3), // Transport
                Constraint::Min(3),    // Tunes
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        Self {
            header: chunks[0],
            piano: chunks[1],
            transport: chunks[2],
            tunes: chunks[3],
            status: chunks[4],
        }
    }

    /// Keys area inside the piano block
    pub fn piano_keys(&self) -> Rect {
        bordered("").inner(self.piano)
    }

    /// Transport row inside its block
    pub fn transport_row(&self) -> Rect {
        bordered("").inner(self.transport)
    }

    /// Tune rows inside the list block
    pub fn tune_rows(&self) -> Rect {
        bordered("").inner(self.tunes)
    }
}

fn bordered(title: &str) -> Block<'_> {
    Block::default().borders(Borders::ALL).title(title)
}

/// Map a key press to a command
pub fn translate_key<E: AudioEngine, S: TuneService>(
    key: KeyEvent,
    keyboard: &KeyboardController,
    app: &App<E, S>,
) -> Option<UiCommand> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let typing = !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

    if app.is_name_focused() {
        return match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(UiCommand::Quit)
            }
            KeyCode::Enter | KeyCode::Esc | KeyCode::Tab => {
                Some(UiCommand::Input(InputEvent::FocusName(false)))
            }
            KeyCode::Backspace => Some(UiCommand::Input(InputEvent::NameBackspace)),
            KeyCode::Char(c) if typing => Some(UiCommand::Input(InputEvent::NameInput(c))),
            _ => None,
        };
    }

    if let Some(action) = keyboard.get_action(key.code, key.modifiers) {
        if let Some(button) = action.button() {
            return Some(UiCommand::Input(InputEvent::Click(button)));
        }

        let tunes = app.tunes();
        return match action {
            ControlAction::SelectPrevious => tunes
                .selected_index()
                .map(|i| UiCommand::Input(InputEvent::SelectionChange(i.saturating_sub(1)))),
            ControlAction::SelectNext => {
                let next = tunes.selected_index().map_or(0, |i| i + 1);
                Some(UiCommand::Input(InputEvent::SelectionChange(next)))
            }
            ControlAction::EditName => Some(UiCommand::Input(InputEvent::FocusName(true))),
            ControlAction::ToggleHelp => Some(UiCommand::ToggleHelp),
            ControlAction::Quit => Some(UiCommand::Quit),
            ControlAction::Play | ControlAction::Record | ControlAction::Stop => None,
        };
    }

    match key.code {
        KeyCode::Char(c) if typing => Some(UiCommand::Input(InputEvent::KeyPress(c.to_string()))),
        _ => None,
    }
}

/// Map a mouse click to a command
pub fn translate_mouse<E: AudioEngine, S: TuneService>(
    mouse: MouseEvent,
    layout: &ScreenLayout,
    app: &App<E, S>,
) -> Option<UiCommand> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return None;
    }
    let (column, row) = (mouse.column, mouse.row);

    if let Some(note) = key_at(layout.piano_keys(), app.keymap().notes(), column, row) {
        return Some(UiCommand::Input(InputEvent::KeyClick(note)));
    }

    let transport = TransportAreas::new(layout.transport_row());
    if let Some(button) = transport.button_at(column, row) {
        let enabled = match button {
            Button::Play => true,
            Button::Record => app.can_record(),
            Button::Stop => app.can_stop(),
        };
        return enabled.then_some(UiCommand::Input(InputEvent::Click(button)));
    }
    if hit(transport.name, column, row) {
        return Some(UiCommand::Input(InputEvent::FocusName(true)));
    }

    if let Some(index) = tune_at(layout.tune_rows(), app.tunes(), column, row) {
        return Some(UiCommand::Input(InputEvent::SelectionChange(index)));
    }

    // Clicking anywhere else takes focus away from the name field
    app.is_name_focused()
        .then_some(UiCommand::Input(InputEvent::FocusName(false)))
}

/// Short status line describing a finished store request
pub fn describe(event: &StoreEvent) -> String {
    match event {
        StoreEvent::Listed(Ok(tunes)) => format!("Loaded {} tunes", tunes.len()),
        StoreEvent::Listed(Err(e)) => format!("Failed to load tunes: {}", e),
        StoreEvent::Created(Ok(tune)) => format!("Saved \"{}\"", tune.name),
        StoreEvent::Created(Err(e)) => format!("Failed to save tune: {}", e),
    }
}

/// Terminal handle
pub struct Screen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    layout: ScreenLayout,
    frame_rate: u32,
    running: bool,
}

impl Screen {
    /// Take over the terminal
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            layout: ScreenLayout::default(),
            frame_rate: 60,
            running: true,
        })
    }

    /// Time between frames
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / self.frame_rate as u64)
    }

    /// Check if running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop the loop
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Layout of the last drawn frame
    pub fn layout(&self) -> &ScreenLayout {
        &self.layout
    }

    /// Draw the UI
    pub fn draw<E: AudioEngine, S: TuneService>(
        &mut self,
        app: &App<E, S>,
        highlights: &KeyHighlights,
        keyboard: &KeyboardController,
        state: &UiState,
        default_name: &str,
    ) -> io::Result<()> {
        let layout = &mut self.layout;

        self.terminal.draw(|frame| {
            let area = frame.area();
            *layout = ScreenLayout::new(area);

            render_header(frame, layout.header, app);

            frame.render_widget(
                PianoWidget::new(app.keymap(), highlights).block(bordered(" Piano ")),
                layout.piano,
            );

            frame.render_widget(
                TransportWidget::new(app.tune_name(), default_name)
                    .enabled(app.can_record(), app.can_stop())
                    .name_focused(app.is_name_focused())
                    .block(bordered(" Record ")),
                layout.transport,
            );

            frame.render_widget(
                TunesWidget::new(app.tunes()).block(bordered(" Tunes ")),
                layout.tunes,
            );

            render_status_bar(frame, layout.status, state);

            if state.show_help {
                render_help_overlay(frame, area, keyboard, app);
            }
        })?;

        Ok(())
    }

    /// Cleanup terminal on drop
    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Render title and recording indicator
fn render_header<E: AudioEngine, S: TuneService>(frame: &mut Frame, area: Rect, app: &App<E, S>) {
    let block = bordered(" Piano ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let recorder = app.recorder();
    let indicator = if recorder.is_recording() {
        Span::styled(
            format!("● REC  {} notes", recorder.event_count()),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("■ IDLE", Style::default().fg(Color::Yellow))
    };

    let line = Line::from(vec![
        indicator,
        Span::raw("   "),
        Span::styled(
            format!("{} tunes", app.tunes().len()),
            Style::default().fg(Color::Cyan),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

/// Render status bar
fn render_status_bar(frame: &mut Frame, area: Rect, state: &UiState) {
    let text = if let Some(ref msg) = state.status_message {
        Span::styled(msg, Style::default().fg(Color::Yellow))
    } else {
        Span::styled(
            " Keys a-; play | Enter: Play | F2: Record | F3: Stop | Tab: Name | F1: Help | Esc: Quit",
            Style::default().fg(Color::DarkGray),
        )
    };

    frame.render_widget(Paragraph::new(text), area);
}

/// Render help overlay
fn render_help_overlay<E: AudioEngine, S: TuneService>(
    frame: &mut Frame,
    area: Rect,
    keyboard: &KeyboardController,
    app: &App<E, S>,
) {
    let bindings = keyboard.bindings();

    let width = 54.min(area.width.saturating_sub(4));
    let height = (bindings.len() as u16 + 6).min(area.height.saturating_sub(2));
    let x = (area.width - width) / 2;
    let y = (area.height - height) / 2;
    let help_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(Span::styled("Shortcuts", bold))];
    for binding in bindings {
        lines.push(Line::from(format!(
            "  {:<12}{}",
            format_shortcut(&binding.shortcut),
            binding.description
        )));
    }

    let symbols: Vec<&str> = app
        .keymap()
        .notes()
        .iter()
        .flat_map(|note| app.keymap().symbols_for(note))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Piano keys", bold)));
    lines.push(Line::from(format!("  {}", symbols.join(" "))));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Read terminal events on a dedicated thread
fn spawn_input_reader() -> UnboundedReceiver<Event> {
    let (tx, rx) = mpsc::unbounded_channel();

    let spawned = thread::Builder::new()
        .name("piano-input".to_string())
        .spawn(move || loop {
            match event::read() {
                Ok(event) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "terminal input failed");
                    break;
                }
            }
        });
    if let Err(e) = spawned {
        warn!(error = %e, "failed to start input thread");
    }

    rx
}

/// Spawn the request for `effect`; its result comes back on `results`
fn dispatch<E: AudioEngine, S: TuneService>(
    app: &App<E, S>,
    effect: Effect,
    results: &UnboundedSender<StoreEvent>,
    state: &mut UiState,
) {
    if let Effect::CreateTune(tune) = &effect {
        state.set_status(format!("Saving \"{}\"...", tune.name));
    }
    debug!(?effect, "dispatching store request");

    let request = app.request(effect);
    let results = results.clone();
    tokio::spawn(async move {
        let _ = results.send(request.await);
    });
}

/// Run the piano until the user quits.
///
/// Must be called inside a tokio runtime.
pub async fn run<E: AudioEngine, S: TuneService>(
    mut app: App<E, S>,
    default_name: &str,
) -> Result<()> {
    let mut screen = Screen::new().context("Failed to initialise terminal")?;
    let keyboard = KeyboardController::with_defaults();
    let mut highlights = KeyHighlights::new();
    let mut state = UiState::default();

    let (results, mut finished) = mpsc::unbounded_channel::<StoreEvent>();
    let mut input = spawn_input_reader();

    for effect in app.startup() {
        dispatch(&app, effect, &results, &mut state);
    }

    let mut ticker = tokio::time::interval(screen.frame_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while screen.is_running() {
        tokio::select! {
            event = input.recv() => {
                let command = match event {
                    Some(Event::Key(key)) => translate_key(key, &keyboard, &app),
                    Some(Event::Mouse(mouse)) => translate_mouse(mouse, screen.layout(), &app),
                    Some(_) => None,
                    None => Some(UiCommand::Quit),
                };

                match command {
                    Some(UiCommand::Input(input_event)) => {
                        for effect in app.handle(input_event, Instant::now(), &mut highlights) {
                            dispatch(&app, effect, &results, &mut state);
                        }
                    }
                    Some(UiCommand::ToggleHelp) => state.show_help = !state.show_help,
                    Some(UiCommand::Quit) => screen.quit(),
                    None => {}
                }
            }
            Some(event) = finished.recv() => {
                state.set_status(describe(&event));
                for effect in app.on_store_event(event) {
                    dispatch(&app, effect, &results, &mut state);
                }
            }
            _ = ticker.tick() => {}
        }

        highlights.expire(Instant::now());
        state.clear_expired_status();
        screen
            .draw(&app, &highlights, &keyboard, &state, default_name)
            .context("Failed to draw screen")?;
    }

    Ok(())
}
