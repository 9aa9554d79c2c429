// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use piano::app::App;
use piano::audio::{print_outputs, MidiSink, SilentSink, Timeline};
use piano::config::Settings;
use piano::store::HttpTuneService;
use piano::ui;

fn print_usage() {
    println!("piano - Terminal virtual piano with tune recording");
    println!();
    println!("Usage: piano [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config <FILE>   Load settings from a .yaml or .toml file");
    println!("  --api <URL>       Tune service base URL (default http://localhost:3000/api/v1)");
    println!("  --midi <N>        Play through MIDI output N (silent when omitted)");
    println!("  --list-midi       List available MIDI outputs");
    println!("  --print-config    Print the effective settings as YAML and exit");
    println!("  --help            Show this help message");
}

#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    api: Option<String>,
    midi: Option<usize>,
}

#[derive(Debug)]
enum Mode {
    Run(Options),
    PrintConfig(Options),
    ListMidi,
    Help,
}

fn parse_args(args: &[String]) -> Result<Mode> {
    let mut options = Options::default();
    let mut print_config = false;
    let mut rest = args.iter().skip(1);

    while let Some(arg) = rest.next() {
        let mut value = |flag: &str| {
            rest.next()
                .cloned()
                .ok_or_else(|| anyhow!("{} requires a value", flag))
        };

        match arg.as_str() {
            "--list-midi" => return Ok(Mode::ListMidi),
            "--print-config" => print_config = true,
            "--help" | "-h" => return Ok(Mode::Help),
            "--config" => options.config = Some(PathBuf::from(value("--config")?)),
            "--api" => options.api = Some(value("--api")?),
            "--midi" => {
                let text = value("--midi")?;
                let port = text
                    .parse()
                    .map_err(|_| anyhow!("Invalid MIDI output number: {}", text))?;
                options.midi = Some(port);
            }
            other => return Err(anyhow!("Unknown option: {}", other)),
        }
    }

    if print_config {
        Ok(Mode::PrintConfig(options))
    } else {
        Ok(Mode::Run(options))
    }
}

/// Settings from the config file with command line overrides applied
fn load_settings(options: &Options) -> Result<Settings> {
    let mut settings = match &options.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(api) = &options.api {
        settings.api_url = api.clone();
    }
    if let Some(port) = options.midi {
        settings.midi_port = Some(port);
    }
    settings.validate()?;
    Ok(settings)
}

fn init_logging(settings: &Settings) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file)
        .with_context(|| format!("Failed to open log file: {:?}", settings.log_file))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("piano=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn start_engine(settings: &Settings) -> Result<Timeline> {
    let sink = match settings.midi_port {
        Some(port) => match MidiSink::connect(port) {
            Ok(sink) => {
                info!(
                    port,
                    channel = settings.midi_channel,
                    velocity = settings.midi_velocity,
                    "MIDI output connected"
                );
                Some(
                    sink.with_channel(settings.midi_channel - 1)
                        .with_velocity(settings.midi_velocity),
                )
            }
            Err(e) => {
                warn!(port, error = %e, "MIDI output unavailable, playing silently");
                None
            }
        },
        None => None,
    };

    let timeline = match sink {
        Some(sink) => Timeline::start(sink, settings.tempo)?,
        None => Timeline::start(SilentSink, settings.tempo)?,
    };
    Ok(timeline)
}

fn run(options: Options) -> Result<()> {
    let settings = load_settings(&options)?;

    init_logging(&settings)?;
    info!(api = %settings.api_url, "starting piano");

    let engine = start_engine(&settings)?;
    let service = HttpTuneService::new(&settings.api_url);
    let app = App::new(&settings, engine, service);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(ui::run(app, &settings.default_tune_name))?;

    info!("piano closed");
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match parse_args(&args) {
        Ok(Mode::Run(options)) => run(options),
        Ok(Mode::PrintConfig(options)) => {
            print!("{}", load_settings(&options)?.to_yaml()?);
            Ok(())
        }
        Ok(Mode::ListMidi) => {
            print_outputs();
            Ok(())
        }
        Ok(Mode::Help) => {
            print_usage();
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    }
}
