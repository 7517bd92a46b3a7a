//! Lock-free amplitude cell shared between the audio thread and the render tick.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Latest input level in `[0, 1]`, stored as `f64` bits.
///
/// The audio callback only writes, the render tick only reads. Neither side
/// ever blocks.
#[derive(Debug, Clone, Default)]
pub struct SharedLevel {
    bits: Arc<AtomicU64>,
}

impl SharedLevel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a new level, clamped to `[0, 1]`. NaN is stored as silence.
    pub fn store(&self, level: f64) {
        let level = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
        self.bits.store(level.to_bits(), Ordering::Relaxed);
    }

    pub fn load(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_silent() {
        assert_eq!(SharedLevel::new().load(), 0.0);
    }

    #[test]
    fn test_store_clamps_and_is_visible_through_clones() {
        let level = SharedLevel::new();
        let writer = level.clone();

        writer.store(0.42);
        assert_eq!(level.load(), 0.42);

        writer.store(3.0);
        assert_eq!(level.load(), 1.0);

        writer.store(-1.0);
        assert_eq!(level.load(), 0.0);

        writer.store(f64::NAN);
        assert_eq!(level.load(), 0.0);
    }

    #[test]
    fn test_writes_from_another_thread() {
        let level = SharedLevel::new();
        let writer = level.clone();
        std::thread::spawn(move || writer.store(0.25))
            .join()
            .unwrap();
        assert_eq!(level.load(), 0.25);
    }
}
