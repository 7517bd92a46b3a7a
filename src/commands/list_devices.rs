//! List audio input devices usable with `--device`.

use crate::input::microphone::{named_input_devices, suppress_alsa_warnings};
use cpal::traits::{DeviceTrait, HostTrait};

/// What gets printed for one input device.
#[derive(Debug, Clone, PartialEq)]
struct DeviceEntry {
    index: usize,
    name: String,
    is_default: bool,
    /// Sample rate and channel count of the default input config
    format: Option<(u32, u16)>,
}

/// Lists the input devices of the default audio host.
///
/// Either the printed index or the name can be passed to `--device` or set
/// as `device` in the `[audio]` table. Devices without a readable name are
/// skipped here and by the device lookup, so IDs match.
///
/// # Errors
/// - If the audio host cannot enumerate its devices
pub fn handle_list_devices() -> Result<(), anyhow::Error> {
    let entries = suppress_alsa_warnings(|| {
        let host = cpal::default_host();
        let default_name = host.default_input_device().and_then(|d| d.name().ok());

        let entries = named_input_devices(&host)?
            .into_iter()
            .enumerate()
            .map(|(index, (device, name))| DeviceEntry {
                index,
                is_default: default_name.as_deref() == Some(name.as_str()),
                format: device
                    .default_input_config()
                    .ok()
                    .map(|config| (config.sample_rate().0, config.channels())),
                name,
            })
            .collect::<Vec<_>>();
        Ok(entries)
    })?;

    tracing::debug!("Found {} input devices", entries.len());

    if entries.is_empty() {
        println!("No audio input devices found on this system.");
        return Ok(());
    }

    println!("Audio input devices (use the ID or name with --device):");
    println!();
    for entry in &entries {
        println!("{}", format_entry(entry));
    }

    Ok(())
}

fn format_entry(entry: &DeviceEntry) -> String {
    let marker = if entry.is_default { " [DEFAULT]" } else { "" };
    let format = match entry.format {
        Some((rate, channels)) => format!("{rate}Hz, {channels} channels"),
        None => "configuration unavailable".to_string(),
    };
    format!(
        "  ID: {}\n    Name: {}{}\n    Config: {}\n",
        entry.index, entry.name, marker, format
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_default_device() {
        let entry = DeviceEntry {
            index: 0,
            name: "pulse".to_string(),
            is_default: true,
            format: Some((48_000, 2)),
        };
        assert_eq!(
            format_entry(&entry),
            "  ID: 0\n    Name: pulse [DEFAULT]\n    Config: 48000Hz, 2 channels\n"
        );
    }

    #[test]
    fn test_format_device_without_config() {
        let entry = DeviceEntry {
            index: 3,
            name: "hw:1,0".to_string(),
            is_default: false,
            format: None,
        };
        let text = format_entry(&entry);
        assert!(text.contains("Name: hw:1,0\n"));
        assert!(text.contains("configuration unavailable"));
    }
}
