use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use stepsynth_audio::{AudioDeviceConfig, BufferSize};

use crate::detector::Thresholds;
use crate::tempo::TempoMap;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    sequencer: SequencerConfig,
    #[serde(default)]
    thresholds: ThresholdConfig,
    #[serde(default)]
    display: DisplayConfig,
    #[serde(default)]
    audio: AudioConfig,
}

#[derive(Deserialize, Default)]
struct SequencerConfig {
    loop_interval_ms: Option<u64>,
    tempo_base_ms: Option<u64>,
    tempo_scale_ms: Option<u64>,
}

#[derive(Deserialize, Default)]
struct ThresholdConfig {
    sine_volume: Option<f32>,
    square_volume: Option<f32>,
    playback_speed: Option<f32>,
}

#[derive(Deserialize, Default)]
struct DisplayConfig {
    contrast: Option<f32>,
    brightness: Option<f32>,
}

#[derive(Deserialize, Default)]
struct AudioConfig {
    output_device: Option<String>,
    sample_rate: Option<u32>,
    buffer_size: Option<u32>,
}

pub struct Config {
    sequencer: SequencerConfig,
    thresholds: ThresholdConfig,
    display: DisplayConfig,
    audio: AudioConfig,
}

impl Default for Config {
    /// Embedded defaults only, no user file.
    fn default() -> Self {
        Self::from_file(embedded())
    }
}

impl Config {
    /// Embedded defaults, overridden by `<config dir>/stepsynth/config.toml`.
    pub fn load() -> Self {
        match user_config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Embedded defaults, overridden by the file at `path` if it exists.
    /// A malformed or unreadable file is logged and ignored.
    pub fn load_from(path: &Path) -> Self {
        let mut base = embedded();

        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                    Ok(user) => {
                        merge_sequencer(&mut base.sequencer, user.sequencer);
                        merge_thresholds(&mut base.thresholds, user.thresholds);
                        merge_display(&mut base.display, user.display);
                        merge_audio(&mut base.audio, user.audio);
                    }
                    Err(e) => {
                        log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                    }
                },
                Err(e) => {
                    log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                }
            }
        }

        Self::from_file(base)
    }

    fn from_file(file: ConfigFile) -> Self {
        Config {
            sequencer: file.sequencer,
            thresholds: file.thresholds,
            display: file.display,
            audio: file.audio,
        }
    }

    /// Main-loop cadence (clamped to 1..1000 ms).
    pub fn loop_interval(&self) -> Duration {
        let ms = self.sequencer.loop_interval_ms.unwrap_or(30).clamp(1, 1000);
        Duration::from_millis(ms)
    }

    pub fn tempo_map(&self) -> TempoMap {
        let fallback = TempoMap::default();
        TempoMap {
            base_offset_ms: self.sequencer.tempo_base_ms.unwrap_or(fallback.base_offset_ms),
            scale_ms: self.sequencer.tempo_scale_ms.unwrap_or(fallback.scale_ms),
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        let fallback = Thresholds::default();
        Thresholds {
            sine_volume: threshold(self.thresholds.sine_volume, fallback.sine_volume),
            square_volume: threshold(self.thresholds.square_volume, fallback.square_volume),
            playback_speed: threshold(self.thresholds.playback_speed, fallback.playback_speed),
        }
    }

    pub fn contrast(&self) -> f32 {
        self.display.contrast.unwrap_or(0.4).clamp(0.0, 1.0)
    }

    pub fn brightness(&self) -> f32 {
        self.display.brightness.unwrap_or(0.3).clamp(0.0, 1.0)
    }

    pub fn audio_device(&self) -> AudioDeviceConfig {
        let buffer_size = match self.audio.buffer_size {
            None => BufferSize::default(),
            Some(n) => BufferSize::from_samples(n).unwrap_or_else(|| {
                log::warn!(target: "config", "unsupported buffer_size {}, using {}", n, BufferSize::default().as_samples());
                BufferSize::default()
            }),
        };
        AudioDeviceConfig {
            output_device: self.audio.output_device.clone(),
            sample_rate: self.audio.sample_rate,
            buffer_size,
        }
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("stepsynth").join("config.toml"))
}

fn embedded() -> ConfigFile {
    match toml::from_str(DEFAULT_CONFIG) {
        Ok(file) => file,
        Err(e) => {
            log::error!(target: "config", "embedded config.toml is invalid: {}", e);
            ConfigFile::default()
        }
    }
}

/// Thresholds must be finite and inside the pot range.
fn threshold(value: Option<f32>, fallback: f32) -> f32 {
    match value {
        Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
        _ => fallback,
    }
}

fn merge_sequencer(base: &mut SequencerConfig, user: SequencerConfig) {
    if user.loop_interval_ms.is_some() {
        base.loop_interval_ms = user.loop_interval_ms;
    }
    if user.tempo_base_ms.is_some() {
        base.tempo_base_ms = user.tempo_base_ms;
    }
    if user.tempo_scale_ms.is_some() {
        base.tempo_scale_ms = user.tempo_scale_ms;
    }
}

fn merge_thresholds(base: &mut ThresholdConfig, user: ThresholdConfig) {
    if user.sine_volume.is_some() {
        base.sine_volume = user.sine_volume;
    }
    if user.square_volume.is_some() {
        base.square_volume = user.square_volume;
    }
    if user.playback_speed.is_some() {
        base.playback_speed = user.playback_speed;
    }
}

fn merge_display(base: &mut DisplayConfig, user: DisplayConfig) {
    if user.contrast.is_some() {
        base.contrast = user.contrast;
    }
    if user.brightness.is_some() {
        base.brightness = user.brightness;
    }
}

fn merge_audio(base: &mut AudioConfig, user: AudioConfig) {
    if user.output_device.is_some() {
        base.output_device = user.output_device;
    }
    if user.sample_rate.is_some() {
        base.sample_rate = user.sample_rate;
    }
    if user.buffer_size.is_some() {
        base.buffer_size = user.buffer_size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_user(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_embedded_defaults() {
        let config = Config::default();
        assert_eq!(config.loop_interval(), Duration::from_millis(30));
        assert_eq!(config.tempo_map(), TempoMap::default());
        assert_eq!(config.thresholds(), Thresholds::default());
        assert!((config.contrast() - 0.4).abs() < 1e-6);
        assert!((config.brightness() - 0.3).abs() < 1e-6);
        assert_eq!(config.audio_device(), AudioDeviceConfig::default());
    }

    #[test]
    fn test_missing_user_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml"));
        assert_eq!(config.loop_interval(), Duration::from_millis(30));
    }

    #[test]
    fn test_user_file_overrides_only_what_it_sets() {
        let f = write_user(
            "[sequencer]\nloop_interval_ms = 10\n\n[thresholds]\nsine_volume = 0.2\n\n[audio]\nbuffer_size = 256\nsample_rate = 44100\n",
        );
        let config = Config::load_from(f.path());
        assert_eq!(config.loop_interval(), Duration::from_millis(10));
        assert_eq!(config.tempo_map().base_offset_ms, 20);
        let t = config.thresholds();
        assert!((t.sine_volume - 0.2).abs() < 1e-6);
        assert!((t.square_volume - 0.05).abs() < 1e-6);
        let audio = config.audio_device();
        assert_eq!(audio.buffer_size, BufferSize::B256);
        assert_eq!(audio.sample_rate, Some(44100));
        assert_eq!(audio.output_device, None);
    }

    #[test]
    fn test_malformed_user_file_is_ignored() {
        let f = write_user("[sequencer\nloop_interval_ms = ");
        let config = Config::load_from(f.path());
        assert_eq!(config.loop_interval(), Duration::from_millis(30));
    }

    #[test]
    fn test_out_of_range_values() {
        let f = write_user(
            "[sequencer]\nloop_interval_ms = 0\n\n[display]\ncontrast = 3.0\n\n[audio]\nbuffer_size = 300\n",
        );
        let config = Config::load_from(f.path());
        assert_eq!(config.loop_interval(), Duration::from_millis(1));
        assert_eq!(config.contrast(), 1.0);
        assert_eq!(config.audio_device().buffer_size, BufferSize::B512);
    }
}
