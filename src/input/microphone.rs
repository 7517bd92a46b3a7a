//! Microphone level meter.
//!
//! Opens an input stream on the configured device and publishes the RMS level
//! of every callback buffer, normalized against a reference level, into a
//! [`SharedLevel`]. Samples are not kept.

use super::level::SharedLevel;
use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample, StreamConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[cfg(target_os = "linux")]
use std::fs::OpenOptions;
#[cfg(target_os = "linux")]
use std::os::unix::io::AsRawFd;

/// Width of the level window below the reference level, in dB.
const LEVEL_WINDOW_DB: f32 = 40.0;

/// Publishes the input level of an audio device.
///
/// Features:
/// - Uses the system default input device, a device name, or a numeric index
/// - Accepts f32, i16 and u16 device formats
/// - `listen` switch that stops level updates without closing the stream
pub struct MicrophoneLevel {
    level: SharedLevel,
    /// Active input stream (kept alive while listening)
    stream: Option<cpal::Stream>,
    listening: Arc<AtomicBool>,
    /// Device name or "default" to use the system default device
    device_name: String,
    reference_level_db: i8,
    sample_rate: u32,
}

impl MicrophoneLevel {
    /// Creates a level meter for `device_name` that writes into `level`.
    ///
    /// Nothing is opened until [`MicrophoneLevel::start`] is called.
    pub fn new(level: SharedLevel, device_name: String, reference_level_db: i8) -> Self {
        Self {
            level,
            stream: None,
            listening: Arc::new(AtomicBool::new(true)),
            device_name,
            reference_level_db,
            sample_rate: 0,
        }
    }

    /// Opens the input stream and starts publishing levels.
    ///
    /// # Errors
    /// - If the specified device is not available
    /// - If the device reports an unsupported sample format
    /// - If audio stream creation fails
    pub fn start(&mut self) -> Result<()> {
        let device = suppress_alsa_warnings(|| {
            let host = cpal::default_host();

            if self.device_name == "default" {
                host.default_input_device()
                    .ok_or_else(|| anyhow!("No audio input device available"))
            } else {
                find_device_by_name(&host, &self.device_name)
            }
        })?;

        let device_name = device
            .name()
            .unwrap_or_else(|_| "Unknown device".to_string());
        tracing::info!("Input device: {}", device_name);

        let supported_config = device.default_input_config()?;
        let sample_format = supported_config.sample_format();
        let config: StreamConfig = supported_config.into();
        self.sample_rate = config.sample_rate.0;

        tracing::debug!(
            "Device configuration: {}Hz, {} channels, {:?}",
            config.sample_rate.0,
            config.channels,
            sample_format
        );

        let stream = match sample_format {
            SampleFormat::F32 => self.build_stream::<f32>(&device, &config)?,
            SampleFormat::I16 => self.build_stream::<i16>(&device, &config)?,
            SampleFormat::U16 => self.build_stream::<u16>(&device, &config)?,
            other => return Err(anyhow!("Unsupported sample format: {other:?}")),
        };

        stream.play()?;
        self.stream = Some(stream);

        tracing::debug!("Input stream started");
        Ok(())
    }

    fn build_stream<T>(&self, device: &cpal::Device, config: &StreamConfig) -> Result<cpal::Stream>
    where
        T: SizedSample + Send + 'static,
        f32: FromSample<T>,
    {
        let level = self.level.clone();
        let listening = Arc::clone(&self.listening);
        let reference_level_db = self.reference_level_db;

        let stream = device.build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                if listening.load(Ordering::Relaxed) {
                    level.store(f64::from(normalize_level(rms(data), reference_level_db)));
                }
            },
            |err| {
                tracing::error!("Audio stream error: {}", err);
            },
            None,
        )?;
        Ok(stream)
    }

    /// Closes the input stream and publishes silence.
    pub fn stop(&mut self) {
        if self.stream.take().is_some() {
            tracing::debug!("Input stream stopped");
        }
        self.level.store(0.0);
    }

    /// Enables or disables level updates. A paused meter publishes silence.
    pub fn set_listening(&self, listen: bool) {
        self.listening.store(listen, Ordering::Relaxed);
        if !listen {
            self.level.store(0.0);
        }
        tracing::debug!("Listening: {}", listen);
    }

    pub fn toggle_listening(&self) {
        self.set_listening(!self.is_listening());
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Relaxed)
    }

    /// Sample rate of the open stream, 0 before [`MicrophoneLevel::start`].
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Drop for MicrophoneLevel {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Root mean square over an interleaved buffer. All channels contribute equally.
fn rms<T>(data: &[T]) -> f32
where
    T: Sample,
    f32: FromSample<T>,
{
    if data.is_empty() {
        return 0.0;
    }
    let sum_of_squares: f32 = data
        .iter()
        .map(|&s| {
            let value = f32::from_sample(s);
            value * value
        })
        .sum();
    (sum_of_squares / data.len() as f32).sqrt()
}

/// Maps an RMS value (full scale 1.0) to a level in `[0, 1]`.
///
/// `reference_level_db` (dBFS) maps to 1.0 and everything 40 dB below it to 0.0.
pub fn normalize_level(rms: f32, reference_level_db: i8) -> f32 {
    if rms.is_nan() || rms <= 0.0 {
        return 0.0;
    }
    let db_fs = 20.0 * rms.log10();
    let min_db = f32::from(reference_level_db) - LEVEL_WINDOW_DB;
    ((db_fs - min_db) / LEVEL_WINDOW_DB).clamp(0.0, 1.0)
}

/// Input devices of `host` whose name can be read, in enumeration order.
///
/// Positions in this list are the IDs printed by `siriwave list-devices`.
///
/// # Errors
/// - If the host cannot enumerate its input devices
pub(crate) fn named_input_devices(host: &cpal::Host) -> Result<Vec<(cpal::Device, String)>> {
    let devices = host
        .input_devices()
        .map_err(|e| anyhow!("Failed to enumerate audio devices: {e}"))?
        .filter_map(|device| device.name().ok().map(|name| (device, name)))
        .collect();
    Ok(devices)
}

/// Finds an audio input device by name or numeric index.
///
/// # Errors
/// - If no device with the specified name/index is found
fn find_device_by_name(host: &cpal::Host, device_spec: &str) -> Result<cpal::Device> {
    select_device(named_input_devices(host)?, device_spec)
}

/// Picks a device from a named list by index or exact name.
fn select_device<D>(devices: Vec<(D, String)>, device_spec: &str) -> Result<D> {
    if let Ok(index) = device_spec.parse::<usize>() {
        let count = devices.len();
        return devices
            .into_iter()
            .nth(index)
            .map(|(device, _)| device)
            .ok_or_else(|| {
                anyhow!(
                    "Device index {} is out of range (0-{})",
                    index,
                    count.saturating_sub(1)
                )
            });
    }

    devices
        .into_iter()
        .find(|(_, name)| name == device_spec)
        .map(|(device, _)| device)
        .ok_or_else(|| {
            anyhow!(
                "Audio input device '{device_spec}' not found. Use 'siriwave list-devices' to see available devices."
            )
        })
}

/// Temporarily redirects stderr to /dev/null to suppress ALSA library warnings on Linux.
#[cfg(target_os = "linux")]
pub(crate) fn suppress_alsa_warnings<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let dev_null = OpenOptions::new()
        .write(true)
        .open("/dev/null")
        .map_err(|e| anyhow!("Failed to open /dev/null: {e}"))?;

    let dev_null_fd = dev_null.as_raw_fd();

    let old_stderr = unsafe { libc::dup(libc::STDERR_FILENO) };
    if old_stderr == -1 {
        return Err(anyhow!("Failed to duplicate stderr"));
    }

    let redirect_result = unsafe { libc::dup2(dev_null_fd, libc::STDERR_FILENO) };
    if redirect_result == -1 {
        unsafe { libc::close(old_stderr) };
        return Err(anyhow!("Failed to redirect stderr"));
    }

    let result = f();

    // Restore the original stderr
    unsafe {
        libc::dup2(old_stderr, libc::STDERR_FILENO);
        libc::close(old_stderr);
    }

    result
}

/// ALSA only exists on Linux; elsewhere the closure runs unchanged.
#[cfg(not(target_os = "linux"))]
pub(crate) fn suppress_alsa_warnings<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    f()
}
