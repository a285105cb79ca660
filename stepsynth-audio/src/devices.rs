use cpal::traits::{DeviceTrait, HostTrait};
use serde::{Deserialize, Serialize};

/// Device buffer size options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BufferSize {
    B64 = 64,
    B128 = 128,
    B256 = 256,
    #[default]
    B512 = 512,
    B1024 = 1024,
    B2048 = 2048,
}

impl BufferSize {
    pub const ALL: [BufferSize; 6] = [
        BufferSize::B64,
        BufferSize::B128,
        BufferSize::B256,
        BufferSize::B512,
        BufferSize::B1024,
        BufferSize::B2048,
    ];

    pub fn as_samples(&self) -> u32 {
        *self as u32
    }

    pub fn from_samples(n: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.as_samples() == n)
    }

    /// Calculate latency in milliseconds for a given sample rate
    pub fn latency_ms(&self, sample_rate: u32) -> f32 {
        (self.as_samples() as f32 / sample_rate as f32) * 1000.0
    }
}

/// An output device discovered on the system
#[derive(Debug, Clone)]
pub struct AudioDevice {
    pub name: String,
    pub channels: Option<u16>,
    pub sample_rate: Option<u32>,
    pub is_default: bool,
}

/// User-selected output configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AudioDeviceConfig {
    pub output_device: Option<String>, // None = system default
    pub sample_rate: Option<u32>,      // None = device default
    pub buffer_size: BufferSize,
}

impl Default for AudioDeviceConfig {
    fn default() -> Self {
        Self {
            output_device: None,
            sample_rate: None,
            buffer_size: BufferSize::default(),
        }
    }
}

/// Enumerate output devices on the default host.
pub fn list_output_devices() -> Vec<AudioDevice> {
    let host = cpal::default_host();
    let default_name = host.default_output_device().and_then(|d| d.name().ok());

    let devices = match host.output_devices() {
        Ok(d) => d,
        Err(e) => {
            log::warn!(target: "audio::devices", "could not enumerate output devices: {}", e);
            return Vec::new();
        }
    };

    devices
        .filter_map(|d| {
            let name = d.name().ok()?;
            let config = d.default_output_config().ok();
            Some(AudioDevice {
                is_default: default_name.as_deref() == Some(name.as_str()),
                channels: config.as_ref().map(|c| c.channels()),
                sample_rate: config.as_ref().map(|c| c.sample_rate().0),
                name,
            })
        })
        .collect()
}
