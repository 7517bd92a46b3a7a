//! Synthetic speech-like level for running the view without a microphone.

use super::level::SharedLevel;
use std::f64::consts::TAU;
use std::time::{Duration, Instant};

/// Syllable rate of the generated level, in Hz.
const SYLLABLE_RATE: f64 = 4.3;
/// Rate of the slow phrase swell, in Hz.
const PHRASE_RATE: f64 = 0.35;
/// Length of one talk/breathe cycle, in seconds.
const BREATH_CYCLE: f64 = 6.0;
/// Silent tail at the end of each breath cycle, in seconds.
const BREATH_PAUSE: f64 = 1.5;

/// Level at `elapsed` seconds: syllable bursts under a slow swell, with a
/// silent pause at the end of every breath cycle. Always in `[0, 1]`.
pub fn level_at(elapsed: f64) -> f64 {
    if !elapsed.is_finite() || elapsed < 0.0 {
        return 0.0;
    }
    if elapsed % BREATH_CYCLE > BREATH_CYCLE - BREATH_PAUSE {
        return 0.0;
    }
    let syllable = (elapsed * SYLLABLE_RATE * TAU).sin().max(0.0).powf(0.7);
    let phrase = (elapsed * PHRASE_RATE * TAU).sin() * 0.5 + 0.5;
    (syllable * (0.35 + 0.65 * phrase)).clamp(0.0, 1.0)
}

/// Background task that publishes [`level_at`] at a fixed cadence.
pub struct SyntheticLevel {
    level: SharedLevel,
    interval: Duration,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl SyntheticLevel {
    /// Creates a generator that updates `level` every `interval`.
    pub fn new(level: SharedLevel, interval: Duration) -> Self {
        Self {
            level,
            interval,
            task: None,
        }
    }

    /// Spawns the generator on the tokio runtime. Does nothing if it is already running.
    pub fn start(&mut self) {
        if self.task.is_some() {
            return;
        }
        let level = self.level.clone();
        let interval = self.interval;

        self.task = Some(tokio::spawn(async move {
            let started = Instant::now();
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                level.store(level_at(started.elapsed().as_secs_f64()));
            }
        }));
        tracing::debug!("Synthetic level generator started");
    }

    /// Stops the generator and publishes silence.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("Synthetic level generator stopped");
        }
        self.level.store(0.0);
    }

    /// Starts or stops the generator, returning whether it is now running.
    pub fn toggle(&mut self) -> bool {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
        self.is_running()
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for SyntheticLevel {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_stays_in_range() {
        for step in 0..5_000 {
            let level = level_at(step as f64 * 0.013);
            assert!((0.0..=1.0).contains(&level));
        }
    }

    #[test]
    fn test_breath_pause_is_silent() {
        assert_eq!(level_at(5.0), 0.0);
        assert_eq!(level_at(11.9), 0.0);
        assert_eq!(level_at(-1.0), 0.0);
        assert_eq!(level_at(f64::NAN), 0.0);
    }

    #[test]
    fn test_talking_phase_has_peaks() {
        let peak = (0..400)
            .map(|step| level_at(step as f64 * 0.01))
            .fold(0.0_f64, f64::max);
        assert!(peak > 0.3);
    }

    #[tokio::test]
    async fn test_generator_publishes_until_stopped() {
        let level = SharedLevel::new();
        let mut generator = SyntheticLevel::new(level.clone(), Duration::from_millis(2));
        generator.start();
        assert!(generator.is_running());

        let mut loudest = 0.0_f64;
        for _ in 0..40 {
            tokio::time::sleep(Duration::from_millis(3)).await;
            loudest = loudest.max(level.load());
        }
        assert!(loudest > 0.0);

        assert!(!generator.toggle());
        assert_eq!(level.load(), 0.0);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(level.load(), 0.0);

        assert!(generator.toggle());
    }
}
