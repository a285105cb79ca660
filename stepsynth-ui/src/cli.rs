//! Command-line parsing. Flags are few enough to read by hand.

use std::path::PathBuf;

use stepsynth_types::Pattern;

pub const USAGE: &str = "\
usage: stepsynth [--verbose] [--headless] [--pattern P]
       stepsynth render <out.wav> [--steps N] [--pattern P] [--speed S]
       stepsynth devices

  P is eight comma-separated pitch rows (0-7) or '-' for a rest,
  e.g. 0,2,4,-,7,-,-,-";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// The interactive front panel.
    Run { headless: bool, pattern: Option<Pattern> },
    /// Offline render to a WAV file.
    Render {
        out: PathBuf,
        steps: u32,
        pattern: Pattern,
        speed: f32,
        sine_volume: f32,
        square_volume: f32,
    },
    Devices,
    Help,
}

pub const DEFAULT_RENDER_PATTERN: &str = "0,2,4,5,7,5,4,2";

/// Parse everything after the program name. `--verbose` is accepted
/// anywhere and handled separately by the caller.
pub fn parse(args: &[String]) -> Result<Command, String> {
    let args: Vec<&str> = args
        .iter()
        .map(String::as_str)
        .filter(|a| *a != "--verbose" && *a != "-v")
        .collect();

    if args.iter().any(|a| *a == "--help" || *a == "-h") {
        return Ok(Command::Help);
    }

    match args.first() {
        Some(&"render") => parse_render(&args[1..]),
        Some(&"devices") => match args.len() {
            1 => Ok(Command::Devices),
            _ => Err(format!("unexpected argument '{}'", args[1])),
        },
        _ => parse_run(&args),
    }
}

fn parse_run(args: &[&str]) -> Result<Command, String> {
    let mut headless = false;
    let mut pattern = None;
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match *arg {
            "--headless" => headless = true,
            "--pattern" => pattern = Some(Pattern::parse(value(&mut it, arg)?)?),
            other => return Err(format!("unexpected argument '{}'", other)),
        }
    }
    Ok(Command::Run { headless, pattern })
}

fn parse_render(args: &[&str]) -> Result<Command, String> {
    let mut out = None;
    let mut steps = 16;
    let mut pattern = None;
    let mut speed = 0.2;
    let mut sine_volume = 0.8;
    let mut square_volume = 0.2;

    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match *arg {
            "--steps" => {
                let v = value(&mut it, arg)?;
                steps = v.parse().map_err(|_| format!("--steps: '{}' is not a count", v))?;
            }
            "--pattern" => pattern = Some(Pattern::parse(value(&mut it, arg)?)?),
            "--speed" => speed = unit(value(&mut it, arg)?, arg)?,
            "--sine" => sine_volume = unit(value(&mut it, arg)?, arg)?,
            "--square" => square_volume = unit(value(&mut it, arg)?, arg)?,
            other if other.starts_with('-') => return Err(format!("unknown option '{}'", other)),
            other => {
                if out.is_some() {
                    return Err(format!("unexpected argument '{}'", other));
                }
                out = Some(PathBuf::from(other));
            }
        }
    }

    let out = out.ok_or_else(|| "render: missing output path".to_string())?;
    let pattern = match pattern {
        Some(p) => p,
        None => Pattern::parse(DEFAULT_RENDER_PATTERN)?,
    };
    Ok(Command::Render {
        out,
        steps,
        pattern,
        speed,
        sine_volume,
        square_volume,
    })
}

fn value<'a>(it: &mut std::slice::Iter<'_, &'a str>, flag: &str) -> Result<&'a str, String> {
    it.next().copied().ok_or_else(|| format!("{} needs a value", flag))
}

fn unit(v: &str, flag: &str) -> Result<f32, String> {
    let x: f32 = v.parse().map_err(|_| format!("{}: '{}' is not a number", flag, v))?;
    if (0.0..=1.0).contains(&x) {
        Ok(x)
    } else {
        Err(format!("{}: {} is outside 0..1", flag, x))
    }
}
