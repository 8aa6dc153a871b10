use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Device, Host, SampleRate, SupportedStreamConfig};
use tracing::{debug, info};

/// Find the speaker-monitor (loopback) input device.
///
/// Picks the first input-capable device whose name contains `hint`
/// (case-insensitive). On PulseAudio/PipeWire systems the loopback of each
/// output shows up as an input named "Monitor of ...".
pub fn find_monitor_device(host: &Host, hint: &str) -> Result<Device> {
    let hint_lower = hint.to_lowercase();
    let devices = host
        .input_devices()
        .context("Failed to enumerate input devices")?;

    for device in devices {
        let name = match device.name() {
            Ok(name) => name,
            Err(e) => {
                debug!("Skipping unnamed input device: {}", e);
                continue;
            }
        };

        if name.to_lowercase().contains(&hint_lower) && has_input_config(&device) {
            info!("Using speaker monitor: {}", name);
            return Ok(device);
        }
    }

    anyhow::bail!(
        "No '{}' input device found. Loopback capture needs a monitor source \
         (on PulseAudio, check pavucontrol)",
        hint
    )
}

/// List the names of all input devices, for `--list-devices`.
pub fn list_input_devices(host: &Host) -> Result<Vec<String>> {
    let devices = host
        .input_devices()
        .context("Failed to enumerate input devices")?;

    Ok(devices
        .filter_map(|d| d.name().ok())
        .collect())
}

/// Pick a stream config for `device`, preferring `preferred_rate` if the
/// device supports it and falling back to the device default otherwise.
pub fn select_input_config(
    device: &Device,
    preferred_rate: u32,
) -> Result<SupportedStreamConfig> {
    let target = SampleRate(preferred_rate);

    if let Ok(ranges) = device.supported_input_configs() {
        for range in ranges {
            if range.min_sample_rate() <= target && target <= range.max_sample_rate() {
                return Ok(range.with_sample_rate(target));
            }
        }
    }

    let default = device
        .default_input_config()
        .context("Failed to get default input config")?;

    debug!(
        "Preferred rate {}Hz unsupported, using device default {}Hz",
        preferred_rate,
        default.sample_rate().0
    );

    Ok(default)
}

fn has_input_config(device: &Device) -> bool {
    device
        .supported_input_configs()
        .map(|mut configs| configs.next().is_some())
        .unwrap_or(false)
}
