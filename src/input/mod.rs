//! Amplitude sources feeding the waveform.
//!
//! Sources publish a peak-normalized level in `[0, 1]` into a [`SharedLevel`]
//! at their own cadence; the render tick picks up whatever value is current.

pub mod level;
pub mod microphone;
pub mod synthetic;

pub use level::SharedLevel;
pub use microphone::{normalize_level, MicrophoneLevel};
pub use synthetic::SyntheticLevel;
