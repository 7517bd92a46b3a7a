//! Siri-style oscillating waveform driven by microphone amplitude.
//!
//! The [`wave`] module holds the oscillator itself: a per-view
//! [`wave::WaveformState`] advanced once per render tick, and
//! [`wave::sample_points`], which turns the state into one polyline per wave.
//! Everything else wires that core to a microphone level meter and a
//! terminal render driver.

pub mod app;
pub mod commands;
pub mod config;
pub mod input;
pub mod logging;
pub mod setup;
pub mod ui;
pub mod view;
pub mod wave;
