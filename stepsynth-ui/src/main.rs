mod cli;
mod ui;

use std::fs::File;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use stepsynth_audio::devices::list_output_devices;
use stepsynth_audio::render::write_wav;
use stepsynth_audio::{AudioHandle, OfflineRenderer, SharedState, Wavetables};
use stepsynth_core::{Bitmap, Config, Controller, DisplayRenderer, VirtualPanel};
use stepsynth_types::Pattern;

use cli::Command;
use ui::{RatatuiBackend, StatusView};

/// Output rate for `render` when the config does not name one.
const RENDER_SAMPLE_RATE: u32 = 44_100;

fn init_logging(verbose: bool) {
    use simplelog::{LevelFilter, WriteLogger};

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("stepsynth")
        .join("stepsynth.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path).or_else(|_| File::create("/tmp/stepsynth.log")) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("stepsynth: logging disabled, cannot create log file: {}", e);
            return;
        }
    };

    if WriteLogger::init(log_level, simplelog::Config::default(), log_file).is_err() {
        eprintln!("stepsynth: logger already initialized");
        return;
    }

    log::info!("stepsynth starting (log level: {:?})", log_level);
}

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");

    let command = match cli::parse(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("stepsynth: {}\n\n{}", e, cli::USAGE);
            std::process::exit(2);
        }
    };

    init_logging(verbose);
    let config = Config::load();

    match command {
        Command::Help => {
            println!("{}", cli::USAGE);
            Ok(())
        }
        Command::Devices => {
            print_devices();
            Ok(())
        }
        Command::Render {
            out,
            steps,
            pattern,
            speed,
            sine_volume,
            square_volume,
        } => {
            let shared = Arc::new(SharedState::new());
            shared.load_pattern(&pattern);
            shared.set_sine_volume(sine_volume);
            shared.set_square_volume(square_volume);
            let period = config.tempo_map().period(speed);
            shared.set_step_period(period);

            let rate = config.audio_device().sample_rate.unwrap_or(RENDER_SAMPLE_RATE);
            let mut renderer = OfflineRenderer::new(shared, Arc::new(Wavetables::generate()), rate);
            let samples = renderer.render_for(period * steps);
            write_wav(&out, &samples, rate).map_err(io::Error::other)?;

            println!(
                "wrote {} ({} steps of {}ms, {} frames at {} Hz)",
                out.display(),
                renderer.step_events().len(),
                period.as_millis(),
                samples.len(),
                rate
            );
            Ok(())
        }
        Command::Run { headless, pattern } => {
            let mut backend = RatatuiBackend::new()?;
            backend.start()?;

            let result = run(&mut backend, &config, headless, pattern);

            backend.stop()?;
            result
        }
    }
}

fn print_devices() {
    let devices = list_output_devices();
    if devices.is_empty() {
        println!("no output devices found");
    }
    for d in devices {
        let marker = if d.is_default { "*" } else { " " };
        let rate = d.sample_rate.map(|r| format!("{} Hz", r)).unwrap_or_else(|| "? Hz".to_string());
        let channels = d.channels.map(|c| c.to_string()).unwrap_or_else(|| "?".to_string());
        println!("{} {}  ({}, {} ch)", marker, d.name, rate, channels);
    }
}

fn run(
    backend: &mut RatatuiBackend,
    config: &Config,
    headless: bool,
    pattern: Option<Pattern>,
) -> io::Result<()> {
    let mut audio = AudioHandle::new();
    if headless {
        audio.start_silent()
    } else {
        audio.start(&config.audio_device())
    }
    .map_err(io::Error::other)?;

    let audio_label = match audio.output() {
        Some(out) => format!("{} @ {} Hz", out.device_name(), out.sample_rate()),
        None => "headless".to_string(),
    };

    let panel = VirtualPanel::new();
    let mut controller = Controller::new(
        Arc::clone(audio.shared()),
        audio.feedback(),
        panel.sampler(),
        config.thresholds(),
        config.tempo_map(),
    )
    .with_renderer(DisplayRenderer::new(config.contrast(), config.brightness()));
    if let Some(p) = pattern {
        controller.load_pattern(p);
    }

    let mut lcd = Bitmap::new();
    controller.init(&mut lcd);

    let interval = config.loop_interval();
    let mut needs_draw = true;
    let mut next_pass = Instant::now();

    'main: loop {
        if needs_draw {
            let status = StatusView {
                display: controller.display_state(),
                step_period: audio.shared().step_period(),
                audio: audio_label.clone(),
            };
            backend.draw(&lcd, &status)?;
            needs_draw = false;
        }

        next_pass += interval;
        loop {
            let now = Instant::now();
            if now >= next_pass {
                break;
            }
            if let Some(action) = backend.poll_action(next_pass - now) {
                if !ui::apply(&panel, action) {
                    break 'main;
                }
            }
        }
        // Don't try to catch up after a stall.
        let now = Instant::now();
        if now > next_pass + interval {
            next_pass = now;
        }

        let changes = controller.run_pass(&mut lcd);
        needs_draw = changes.any();
    }

    audio.stop();
    log::info!("stepsynth stopped after {} redraws", controller.redraws());
    Ok(())
}
