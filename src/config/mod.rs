// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration for the piano.
//!
//! Settings are read from a YAML or TOML file (picked by extension). Every
//! field has a default, so an empty file or no file at all is valid.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::control::KeyMap;
use crate::music::NoteValue;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the tune API (the tunes collection is `<api_url>/tunes`)
    pub api_url: String,
    /// Name used when a recording is saved without one
    pub default_tune_name: String,
    /// Note value of every played tone
    pub note_value: NoteValue,
    /// How long a pressed key stays highlighted, in milliseconds
    pub highlight_ms: u64,
    /// Tempo used by the audio engine to interpret note values
    pub tempo: f64,
    /// Seconds between pressing play and the first note of a tune
    pub lead_in: f64,
    /// MIDI output port index (None = silent engine)
    pub midi_port: Option<usize>,
    /// MIDI channel (1-16)
    pub midi_channel: u8,
    /// MIDI note on velocity (1-127)
    pub midi_velocity: u8,
    /// Log file path
    pub log_file: PathBuf,
    /// Custom key map (symbol -> note); the default layout is used when empty
    pub keymap: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000/api/v1".to_string(),
            default_tune_name: "No-name Tune".to_string(),
            note_value: NoteValue::eighth(),
            highlight_ms: 200,
            tempo: 120.0,
            lead_in: 0.0,
            midi_port: None,
            midi_channel: 1,
            midi_velocity: 100,
            log_file: PathBuf::from("piano.log"),
            keymap: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Load settings from a `.yaml`/`.yml` or `.toml` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let settings = match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml(&contents)?,
            Some("toml") => Self::from_toml(&contents)?,
            _ => bail!("Unsupported config format: {:?} (use .yaml or .toml)", path),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document is null in YAML
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Parse settings from TOML
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML configuration")
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !(20.0..=300.0).contains(&self.tempo) {
            bail!("tempo must be between 20 and 300 BPM, got {}", self.tempo);
        }
        if !(1..=16).contains(&self.midi_channel) {
            bail!("midi_channel must be between 1 and 16, got {}", self.midi_channel);
        }
        if !(1..=127).contains(&self.midi_velocity) {
            bail!("midi_velocity must be between 1 and 127, got {}", self.midi_velocity);
        }
        if self.lead_in < 0.0 {
            bail!("lead_in must not be negative, got {}", self.lead_in);
        }
        self.note_value
            .seconds(self.tempo)
            .with_context(|| format!("note_value {:?} is not a note value", self.note_value.as_str()))?;
        Ok(())
    }

    /// Highlight window as a duration
    pub fn highlight(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }

    /// The key map to use
    pub fn key_map(&self) -> KeyMap {
        if self.keymap.is_empty() {
            KeyMap::with_defaults()
        } else {
            KeyMap::from_pairs(self.keymap.iter().map(|(s, n)| (s.as_str(), n.as_str())))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::music::NoteId;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api_url, "http://localhost:3000/api/v1");
        assert_eq!(settings.default_tune_name, "No-name Tune");
        assert_eq!(settings.note_value.as_str(), "8n");
        assert_eq!(settings.highlight(), Duration::from_millis(200));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
api_url: "http://tunes.local/api/v1"
default_tune_name: "Untitled"
tempo: 90
midi_port: 1
midi_velocity: 80
keymap:
  z: c3
  x: d3
"#;

        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.api_url, "http://tunes.local/api/v1");
        assert_eq!(settings.default_tune_name, "Untitled");
        assert_eq!(settings.tempo, 90.0);
        assert_eq!(settings.midi_port, Some(1));
        assert_eq!(settings.midi_velocity, 80);
        assert_eq!(settings.highlight_ms, 200);

        let map = settings.key_map();
        assert_eq!(map.lookup("z"), Some(&NoteId::from("c3")));
        assert_eq!(map.lookup("a"), None);
    }

    #[test]
    fn test_parse_toml() {
        let text = r#"
highlight_ms = 150
lead_in = 0.05
note_value = "4n"
"#;

        let settings = Settings::from_toml(text).unwrap();
        assert_eq!(settings.highlight_ms, 150);
        assert_eq!(settings.lead_in, 0.05);
        assert_eq!(settings.note_value.as_str(), "4n");
        assert_eq!(settings.key_map().lookup("a"), Some(&NoteId::from("c4")));
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        assert_eq!(Settings::from_yaml("").unwrap(), Settings::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.tempo = 5.0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.midi_channel = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.midi_velocity = 128;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.note_value = NoteValue::from("eighth");
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("piano.yaml");
        let mut file = fs::File::create(&yaml_path).unwrap();
        writeln!(file, "tempo: 100").unwrap();
        assert_eq!(Settings::load(&yaml_path).unwrap().tempo, 100.0);

        let toml_path = dir.path().join("piano.toml");
        fs::write(&toml_path, "tempo = 140.0\n").unwrap();
        assert_eq!(Settings::load(&toml_path).unwrap().tempo, 140.0);

        let other_path = dir.path().join("piano.ini");
        fs::write(&other_path, "tempo=1").unwrap();
        assert!(Settings::load(&other_path).is_err());

        assert!(Settings::load(dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_round_trip() {
        let mut original = Settings::default();
        original.default_tune_name = "Round Trip".to_string();
        original.keymap.insert("q".to_string(), "b3".to_string());

        let yaml = original.to_yaml().unwrap();
        assert!(yaml.contains("default_tune_name: Round Trip"));
        assert!(yaml.contains("midi_velocity: 100"));
        assert_eq!(Settings::from_yaml(&yaml).unwrap(), original);
    }
}
