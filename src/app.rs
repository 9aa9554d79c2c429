// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Application controller.
//!
//! `App` owns the piano state and turns input events into audio calls,
//! recorder updates and deferred store effects. It never touches the terminal
//! or the network itself: the runner draws the screen and executes effects.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::audio::{AudioEngine, Highlighter, TonePlayer};
use crate::config::Settings;
use crate::control::{Button, InputEvent, KeyMap};
use crate::music::{NoteId, NoteValue, Tune};
use crate::playback::Player;
use crate::recording::Recorder;
use crate::store::{Effect, StoreEvent, TuneCollection, TuneService, TuneStore};

/// Piano controller
pub struct App<E, S> {
    keymap: KeyMap,
    recorder: Recorder,
    tones: TonePlayer<E>,
    player: Player,
    store: TuneStore<S>,
    note_value: NoteValue,
    highlight: Duration,
    default_name: String,
    tune_name: String,
    name_focused: bool,
}

impl<E: AudioEngine, S: TuneService> App<E, S> {
    /// Create a controller from settings, an audio engine and a tune service
    pub fn new(settings: &Settings, engine: E, service: S) -> Self {
        Self {
            keymap: settings.key_map(),
            recorder: Recorder::new(),
            tones: TonePlayer::new(engine),
            player: Player::with_lead_in(settings.lead_in),
            store: TuneStore::new(service),
            note_value: settings.note_value.clone(),
            highlight: settings.highlight(),
            default_name: settings.default_tune_name.clone(),
            tune_name: String::new(),
            name_focused: false,
        }
    }

    /// Effects to run once the event loop is up
    pub fn startup(&self) -> Vec<Effect> {
        vec![Effect::LoadTunes]
    }

    /// Handle one input event at `now`
    pub fn handle(
        &mut self,
        event: InputEvent,
        now: Instant,
        highlighter: &mut dyn Highlighter,
    ) -> Vec<Effect> {
        match event {
            InputEvent::KeyPress(symbol) => {
                if self.name_focused {
                    return Vec::new();
                }
                match self.keymap.lookup(&symbol).cloned() {
                    Some(note) => {
                        self.sound(&note, now);
                        highlighter.highlight(&note, self.highlight);
                    }
                    None => debug!(%symbol, "unmapped key ignored"),
                }
                Vec::new()
            }
            InputEvent::KeyClick(note) => {
                self.name_focused = false;
                self.sound(&note, now);
                Vec::new()
            }
            InputEvent::Click(button) => self.click(button, now),
            InputEvent::SelectionChange(index) => {
                if !self.store.collection_mut().select(index) {
                    debug!(index, "selection out of range ignored");
                }
                Vec::new()
            }
            InputEvent::FocusName(focused) => {
                self.name_focused = focused;
                Vec::new()
            }
            InputEvent::NameInput(c) => {
                if self.name_focused && !c.is_control() {
                    self.tune_name.push(c);
                }
                Vec::new()
            }
            InputEvent::NameBackspace => {
                if self.name_focused {
                    self.tune_name.pop();
                }
                Vec::new()
            }
        }
    }

    /// Fold a finished store request back in
    pub fn on_store_event(&mut self, event: StoreEvent) -> Vec<Effect> {
        self.store.apply(event).into_iter().collect()
    }

    /// Build the detached request future for an effect
    pub fn request(&self, effect: Effect) -> impl Future<Output = StoreEvent> + Send + 'static {
        self.store.request(effect)
    }

    fn sound(&mut self, note: &NoteId, now: Instant) {
        if self.recorder.record(note.clone(), self.note_value.clone(), now) {
            debug!(%note, events = self.recorder.event_count(), "tone recorded");
        }
        self.tones.play(note, &self.note_value, None);
    }

    fn click(&mut self, button: Button, now: Instant) -> Vec<Effect> {
        self.name_focused = false;

        match button {
            Button::Play => {
                match self.store.collection().selected() {
                    Some(tune) => {
                        let scheduled = self.player.play(&self.tones, tune);
                        info!(name = %tune.name, scheduled, "playing tune");
                    }
                    None => debug!("no tune selected"),
                }
                Vec::new()
            }
            Button::Record => {
                match self.recorder.start(now) {
                    Ok(()) => {
                        info!("recording started");
                        // Prompt for a name when none has been typed
                        if self.tune_name.is_empty() {
                            self.name_focused = true;
                        }
                    }
                    Err(e) => warn!(error = %e, "record request rejected"),
                }
                Vec::new()
            }
            Button::Stop => {
                if !self.recorder.is_recording() {
                    debug!("stop ignored, not recording");
                    return Vec::new();
                }

                let events = self.recorder.stop();
                let typed = std::mem::take(&mut self.tune_name);

                if events.is_empty() {
                    info!("empty recording discarded");
                    return Vec::new();
                }

                let name = if typed.is_empty() {
                    self.default_name.clone()
                } else {
                    typed
                };
                info!(%name, events = events.len(), "recording stopped");
                vec![Effect::CreateTune(Tune::new(name, events))]
            }
        }
    }

    /// Get the key map
    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    /// Get the recorder
    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    /// Get the tone player
    pub fn tones(&self) -> &TonePlayer<E> {
        &self.tones
    }

    /// Loaded tunes and selection
    pub fn tunes(&self) -> &TuneCollection {
        self.store.collection()
    }

    /// Get the tune store
    pub fn store(&self) -> &TuneStore<S> {
        &self.store
    }

    /// Text of the tune name field
    pub fn tune_name(&self) -> &str {
        &self.tune_name
    }

    /// Check if the tune name field has focus
    pub fn is_name_focused(&self) -> bool {
        self.name_focused
    }

    /// Check if the record button is enabled
    pub fn can_record(&self) -> bool {
        !self.recorder.is_recording()
    }

    /// Check if the stop button is enabled
    pub fn can_stop(&self) -> bool {
        self.recorder.is_recording()
    }
}
