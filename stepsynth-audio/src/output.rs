//! Audio output through cpal.
//!
//! The device callback is the sample synthesizer's clock: every device
//! frame advances a [`SampleClock`], which runs as many synth ticks as the
//! current note's period fits into that frame.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Host, SampleFormat, SizedSample, Stream, StreamConfig};

use crate::clock::SampleClock;
use crate::devices::AudioDeviceConfig;
use crate::shared::SharedState;
use crate::synth::SampleSynth;
use crate::wavetable::Wavetables;

/// A running output stream. Dropping it stops playback.
pub struct AudioOutput {
    _stream: Stream,
    device_name: String,
    sample_rate: u32,
    channels: u16,
}

impl AudioOutput {
    pub fn start(
        config: &AudioDeviceConfig,
        shared: Arc<SharedState>,
        tables: Arc<Wavetables>,
    ) -> Result<Self, String> {
        let host = cpal::default_host();
        let device = select_device(&host, config.output_device.as_deref())?;
        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());

        let supported = device
            .default_output_config()
            .map_err(|e| format!("Failed to get output config: {}", e))?;
        let sample_format = supported.sample_format();
        let mut stream_config: StreamConfig = supported.into();
        if let Some(rate) = config.sample_rate {
            stream_config.sample_rate = cpal::SampleRate(rate);
        }

        let fixed = StreamConfig {
            buffer_size: cpal::BufferSize::Fixed(config.buffer_size.as_samples()),
            ..stream_config.clone()
        };
        let stream = match build_for_format(&device, &fixed, sample_format, &shared, &tables) {
            Ok(s) => s,
            Err(e) => {
                log::warn!(
                    target: "audio::output",
                    "fixed buffer of {} rejected ({}), using device default",
                    config.buffer_size.as_samples(),
                    e
                );
                build_for_format(&device, &stream_config, sample_format, &shared, &tables)?
            }
        };
        stream
            .play()
            .map_err(|e| format!("Failed to start output stream: {}", e))?;

        log::info!(
            target: "audio::output",
            "output on '{}' at {} Hz, {} channel(s), {:?}",
            device_name,
            stream_config.sample_rate.0,
            stream_config.channels,
            sample_format
        );

        Ok(Self {
            _stream: stream,
            device_name,
            sample_rate: stream_config.sample_rate.0,
            channels: stream_config.channels,
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}

fn select_device(host: &Host, name: Option<&str>) -> Result<Device, String> {
    if let Some(wanted) = name {
        let found = host
            .output_devices()
            .map_err(|e| format!("Failed to enumerate output devices: {}", e))?
            .find(|d| d.name().map(|n| n == wanted).unwrap_or(false));
        match found {
            Some(d) => return Ok(d),
            None => log::warn!(target: "audio::output", "output device '{}' not found, using default", wanted),
        }
    }
    host.default_output_device()
        .ok_or_else(|| "No output device available".to_string())
}

fn build_for_format(
    device: &Device,
    config: &StreamConfig,
    format: SampleFormat,
    shared: &Arc<SharedState>,
    tables: &Arc<Wavetables>,
) -> Result<Stream, String> {
    let shared = Arc::clone(shared);
    let tables = Arc::clone(tables);
    match format {
        SampleFormat::F32 => build_stream::<f32>(device, config, shared, tables),
        SampleFormat::I16 => build_stream::<i16>(device, config, shared, tables),
        SampleFormat::U16 => build_stream::<u16>(device, config, shared, tables),
        other => Err(format!("Unsupported sample format {:?}", other)),
    }
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    shared: Arc<SharedState>,
    tables: Arc<Wavetables>,
) -> Result<Stream, String>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels.max(1) as usize;
    let mut synth = SampleSynth::new(tables);
    let mut clock = SampleClock::new(config.sample_rate.0);

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    // Duty-cycle semantics: the mix saturates at full scale.
                    let level = clock.advance_frame(&mut synth, &shared).clamp(0.0, 1.0);
                    let value = T::from_sample(level);
                    for out in frame.iter_mut() {
                        *out = value;
                    }
                }
            },
            |err| {
                log::error!(target: "audio::output", "output stream error: {}", err);
            },
            None,
        )
        .map_err(|e| format!("Failed to build output stream: {}", e))
}
