// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for the piano
//!
//! These tests drive the public API with an in-memory audio engine and tune
//! service, checking that input, recording, persistence and playback work
//! together.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use piano::app::App;
use piano::audio::{AudioEngine, AudioError, Highlighter, NoteSink, Timeline, TonePlayer};
use piano::config::Settings;
use piano::control::{Button, InputEvent};
use piano::playback::Player;
use piano::recording::Recorder;
use piano::store::{Effect, StoreError, TuneService};
use piano::{NoteId, NoteValue, ToneEvent, Tune};

/// Engine that logs triggers; its clock moves forward on every read
#[derive(Default)]
struct LogEngine {
    triggered: RefCell<Vec<(String, Option<f64>)>>,
    clock: Cell<f64>,
    step: f64,
    reads: Cell<usize>,
}

impl AudioEngine for LogEngine {
    fn trigger_attack_release(
        &self,
        note: &NoteId,
        _duration: &NoteValue,
        at: Option<f64>,
    ) -> Result<(), AudioError> {
        self.triggered
            .borrow_mut()
            .push((note.as_str().to_string(), at));
        Ok(())
    }

    fn now(&self) -> f64 {
        let now = self.clock.get();
        self.clock.set(now + self.step);
        self.reads.set(self.reads.get() + 1);
        now
    }
}

/// Service keeping tunes in memory and logging every request body
#[derive(Default)]
struct MemoryService {
    tunes: Mutex<Vec<Tune>>,
    bodies: Mutex<Vec<serde_json::Value>>,
    requests: Mutex<usize>,
    /// Scripted list outcomes; `true` fails the call
    list_failures: Mutex<VecDeque<bool>>,
}

impl TuneService for MemoryService {
    async fn list(&self) -> Result<Vec<Tune>, StoreError> {
        *self.requests.lock().unwrap() += 1;
        if self.list_failures.lock().unwrap().pop_front().unwrap_or(false) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(self.tunes.lock().unwrap().clone())
    }

    async fn create(&self, tune: &Tune) -> Result<Tune, StoreError> {
        *self.requests.lock().unwrap() += 1;
        self.bodies
            .lock()
            .unwrap()
            .push(serde_json::to_value(tune).unwrap());
        self.tunes.lock().unwrap().push(tune.clone());
        Ok(tune.clone())
    }
}

#[derive(Default)]
struct NoLights;

impl Highlighter for NoLights {
    fn highlight(&mut self, _note: &NoteId, _duration: Duration) {}
}

fn piano(service: MemoryService) -> App<LogEngine, MemoryService> {
    App::new(&Settings::default(), LogEngine::default(), service)
}

/// Run effects to completion, including any follow-up requests
async fn settle(app: &mut App<LogEngine, MemoryService>, effects: Vec<Effect>) {
    let mut queue: VecDeque<Effect> = effects.into();
    while let Some(effect) = queue.pop_front() {
        let event = app.request(effect).await;
        queue.extend(app.on_store_event(event));
    }
}

#[tokio::test]
async fn test_record_save_and_replay() {
    let mut app = piano(MemoryService::default());
    let mut lights = NoLights;
    let t0 = Instant::now();

    let effects = app.startup();
    settle(&mut app, effects).await;
    assert!(app.tunes().is_empty());

    app.handle(InputEvent::FocusName(true), t0, &mut lights);
    for c in "Scale".chars() {
        app.handle(InputEvent::NameInput(c), t0, &mut lights);
    }
    app.handle(InputEvent::Click(Button::Record), t0, &mut lights);
    app.handle(InputEvent::KeyPress("a".to_string()), t0, &mut lights);
    app.handle(
        InputEvent::KeyPress("s".to_string()),
        t0 + Duration::from_millis(300),
        &mut lights,
    );
    let effects = app.handle(
        InputEvent::Click(Button::Stop),
        t0 + Duration::from_secs(1),
        &mut lights,
    );
    settle(&mut app, effects).await;

    // Exact request body sent to the service
    let bodies = app.store().service().bodies.lock().unwrap().clone();
    assert_eq!(
        bodies,
        vec![serde_json::json!({
            "name": "Scale",
            "tune": [
                {"note": "c4", "duration": "8n", "timing": 0.0},
                {"note": "d4", "duration": "8n", "timing": 0.3}
            ]
        })]
    );

    // The create was followed by a reload
    assert_eq!(app.tunes().len(), 1);

    app.handle(InputEvent::Click(Button::Play), t0, &mut lights);
    let triggered = app.tones().engine().triggered.borrow();
    let scheduled: Vec<_> = triggered.iter().filter(|(_, at)| at.is_some()).collect();
    assert_eq!(scheduled.len(), 2);
    assert_eq!(scheduled[0].0, "c4");
    assert_eq!(scheduled[1].1, Some(0.3));
}

#[tokio::test]
async fn test_empty_session_makes_no_requests() {
    let mut app = piano(MemoryService::default());
    let mut lights = NoLights;
    let t0 = Instant::now();

    app.handle(InputEvent::Click(Button::Record), t0, &mut lights);
    let effects = app.handle(
        InputEvent::Click(Button::Stop),
        t0 + Duration::from_secs(2),
        &mut lights,
    );
    settle(&mut app, effects).await;

    assert_eq!(*app.store().service().requests.lock().unwrap(), 0);
    assert!(app.recorder().events().is_empty());
}

#[tokio::test]
async fn test_failed_reload_keeps_tunes_playable() {
    let service = MemoryService::default();
    service
        .tunes
        .lock()
        .unwrap()
        .push(Tune::new("Kept", vec![ToneEvent::new("g4", "8n", 0.0)]));
    service.list_failures.lock().unwrap().extend([false, true]);

    let mut app = piano(service);
    let mut lights = NoLights;

    settle(&mut app, vec![Effect::LoadTunes]).await;
    settle(&mut app, vec![Effect::LoadTunes]).await;

    assert_eq!(app.tunes().len(), 1);
    app.handle(InputEvent::SelectionChange(0), Instant::now(), &mut lights);
    app.handle(InputEvent::Click(Button::Play), Instant::now(), &mut lights);

    let triggered = app.tones().engine().triggered.borrow();
    assert_eq!(triggered.as_slice(), &[("g4".to_string(), Some(0.0))]);
}

#[test]
fn test_e5_aliases_and_unmapped_keys() {
    let mut app = piano(MemoryService::default());
    let mut lights = NoLights;
    let now = Instant::now();

    app.handle(InputEvent::Click(Button::Record), now, &mut lights);
    app.handle(InputEvent::FocusName(false), now, &mut lights);
    for symbol in [";", "æ", "z", "1"] {
        app.handle(InputEvent::KeyPress(symbol.to_string()), now, &mut lights);
    }

    let notes: Vec<String> = app
        .tones()
        .engine()
        .triggered
        .borrow()
        .iter()
        .map(|(note, _)| note.clone())
        .collect();
    assert_eq!(notes, vec!["e5", "e5"]);
    assert_eq!(app.recorder().event_count(), 2);
}

#[test]
fn test_timings_are_cumulative_delays() {
    let mut recorder = Recorder::new();
    let t0 = Instant::now();
    recorder.start(t0).unwrap();

    let mut at = t0;
    for (note, delay_ms) in [("c4", 0), ("e4", 125), ("g4", 250), ("c5", 500)] {
        at += Duration::from_millis(delay_ms);
        recorder.record(NoteId::from(note), NoteValue::eighth(), at);
    }

    let timings: Vec<f64> = recorder.stop().iter().map(|e| e.timing).collect();
    assert_eq!(timings, vec![0.0, 0.125, 0.375, 0.875]);
    assert!(timings.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_replay_spacing_ignores_clock_drift() {
    let tones = TonePlayer::new(LogEngine {
        step: 0.07,
        ..Default::default()
    });
    tones.engine().clock.set(3.0);
    let tune = Tune::new(
        "Pair",
        vec![ToneEvent::new("c4", "8n", 0.0), ToneEvent::new("d4", "8n", 0.5)],
    );

    assert_eq!(Player::new().play(&tones, &tune), 2);

    let triggered = tones.engine().triggered.borrow();
    let first = triggered[0].1.unwrap();
    let second = triggered[1].1.unwrap();
    assert_eq!(second - first, 0.5);
    assert_eq!(tones.engine().reads.get(), 1);
}

/// Sink collecting note on messages
#[derive(Clone, Default)]
struct CollectSink {
    ons: Arc<Mutex<Vec<u8>>>,
}

impl NoteSink for CollectSink {
    fn note_on(&mut self, note: u8) -> Result<(), AudioError> {
        self.ons.lock().unwrap().push(note);
        Ok(())
    }

    fn note_off(&mut self, _note: u8) -> Result<(), AudioError> {
        Ok(())
    }
}

#[test]
fn test_tune_through_timeline_engine() {
    let sink = CollectSink::default();
    let ons = Arc::clone(&sink.ons);

    {
        let timeline = Timeline::start(sink, 240.0).unwrap();
        let tones = TonePlayer::new(timeline);
        let tune = Tune::new(
            "Triad",
            vec![
                ToneEvent::new("c4", "16n", 0.0),
                ToneEvent::new("e4", "16n", 0.03),
                ToneEvent::new("g4", "16n", 0.06),
            ],
        );
        Player::with_lead_in(0.01).play(&tones, &tune);
        thread::sleep(Duration::from_millis(300));
    }

    assert_eq!(*ons.lock().unwrap(), vec![60, 64, 67]);
}

#[test]
fn test_bad_server_tune_is_skipped_not_fatal() {
    let sink = CollectSink::default();
    let ons = Arc::clone(&sink.ons);

    {
        let timeline = Timeline::start(sink, 120.0).unwrap();
        let tones = TonePlayer::new(timeline);
        let tune: Tune = serde_json::from_value(serde_json::json!({
            "name": "Garbled",
            "tune": [
                {"note": "c4", "duration": "8n", "timing": 1e20},
                {"note": "d4", "duration": "1e300", "timing": 0.0},
                {"note": "c200000000", "duration": "8n", "timing": 0.0},
                {"note": "e4", "duration": "16n", "timing": 0.02}
            ]
        }))
        .unwrap();

        assert_eq!(Player::with_lead_in(0.01).play(&tones, &tune), 4);
        thread::sleep(Duration::from_millis(200));
    }

    assert_eq!(*ons.lock().unwrap(), vec![64]);
}
