//! Output-device discovery.

use cpal::traits::{DeviceTrait, HostTrait};
use tracing::debug;

use crate::{Error, Result};

/// Sample rates probed against each device's supported ranges.
const PROBE_RATES: [u32; 6] = [22_050, 44_100, 48_000, 88_200, 96_000, 192_000];

/// Description of one hardware output device.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Position in the host's output-device list; pass it to
    /// [`AudioEngine::start_stream`](crate::AudioEngine::start_stream).
    pub index: usize,
    pub name: String,
    pub is_default_output: bool,
    pub output_channels: u16,
    /// Standard rates the device accepts, probed from its supported ranges.
    pub sample_rates: Vec<u32>,
}

/// Enumerates every usable output device of the default host.
///
/// Devices that refuse to report a configuration are skipped rather than
/// failing the whole scan.
pub fn output_devices() -> Result<Vec<DeviceInfo>> {
    let host = cpal::default_host();
    let default_name = host
        .default_output_device()
        .and_then(|device| device.name().ok());

    let mut devices = Vec::new();
    for (index, device) in host.output_devices()?.enumerate() {
        let name = device.name()?;
        let config = match device.default_output_config() {
            Ok(config) => config,
            Err(err) => {
                debug!(%name, %err, "skipping device without output config");
                continue;
            }
        };

        let mut sample_rates = Vec::new();
        if let Ok(ranges) = device.supported_output_configs() {
            let ranges: Vec<_> = ranges.collect();
            for rate in PROBE_RATES {
                if ranges
                    .iter()
                    .any(|r| r.min_sample_rate().0 <= rate && rate <= r.max_sample_rate().0)
                {
                    sample_rates.push(rate);
                }
            }
        }

        devices.push(DeviceInfo {
            index,
            is_default_output: default_name.as_deref() == Some(name.as_str()),
            name,
            output_channels: config.channels(),
            sample_rates,
        });
    }

    Ok(devices)
}

/// The host's default output device.
pub fn default_output_device() -> Result<DeviceInfo> {
    output_devices()?
        .into_iter()
        .find(|device| device.is_default_output)
        .ok_or_else(|| Error::InvalidDevice("No output device available".into()))
}

/// Resolves a device by index in the output-device list, or the default
/// output when no index is given.
pub(crate) fn get_device(index: Option<usize>) -> Result<cpal::Device> {
    let host = cpal::default_host();

    match index {
        Some(i) => {
            let devices: Vec<_> = host.output_devices()?.collect();
            let count = devices.len();
            devices.into_iter().nth(i).ok_or_else(|| {
                Error::InvalidDevice(format!("Device index {i} out of range ({count} available)"))
            })
        }
        None => host
            .default_output_device()
            .ok_or_else(|| Error::InvalidDevice("No output device available".into())),
    }
}
