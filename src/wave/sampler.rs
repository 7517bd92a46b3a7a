//! Point sampling for the foreground and background waves.
//!
//! Each wave is a sine curve across the usable span, scaled by the current
//! amplitude, damped per background layer and pinched to zero at both margins
//! by a parabolic envelope.

use super::state::WaveformState;
use std::f64::consts::TAU;

/// Upper bound on sampled steps per wave. Wider spans get a coarser step.
pub const MAX_STEPS: usize = 1 << 16;

/// A sampled point in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// View size plus the horizontal margins that bound the oscillation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewGeometry {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
}

impl ViewGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin_left: 0.0,
            margin_right: 0.0,
        }
    }

    pub fn with_margins(mut self, margin_left: f64, margin_right: f64) -> Self {
        self.margin_left = margin_left;
        self.margin_right = margin_right;
        self
    }

    fn left(&self) -> f64 {
        self.margin_left.max(0.0)
    }

    fn right(&self) -> f64 {
        self.width - self.margin_right.max(0.0)
    }

    /// Usable horizontal span; zero or negative for degenerate views.
    pub fn span(&self) -> f64 {
        self.right() - self.left()
    }

    pub fn center_y(&self) -> f64 {
        0.5 * self.height.max(0.0)
    }
}

/// Position of a wave among the layers: 0 for the foreground, 1 for the last background wave.
pub fn normalized_wave_index(wave_index: u32, wave_count: u32) -> f64 {
    if wave_count == 0 {
        0.0
    } else {
        f64::from(wave_index.min(wave_count)) / f64::from(wave_count)
    }
}

/// Parabolic window over `t` in `[0, 1]`: 0 at both edges, 1 at the centre.
pub fn envelope(t: f64) -> f64 {
    let centered = 2.0 * t - 1.0;
    (1.0 - centered * centered).max(0.0)
}

/// Samples the polyline for one wave.
///
/// `wave_index` 0 is the foreground wave; indices above `wave_count` are
/// treated as the last background wave. Points come out in strictly
/// increasing `x` between the margins, with the right bound always emitted.
/// The step is widened when `density` would need more than [`MAX_STEPS`]
/// steps. Degenerate geometry yields an empty vector.
pub fn sample_points(state: &WaveformState, wave_index: u32, geometry: &ViewGeometry) -> Vec<Point> {
    let span = geometry.span();
    if !span.is_finite() || span <= 0.0 || !geometry.height.is_finite() {
        return Vec::new();
    }

    let wave_index = wave_index.min(state.wave_count());
    let damping = state
        .damping_factor()
        .powi(i32::try_from(wave_index).unwrap_or(i32::MAX));
    let wave_amplitude = state.amplitude().max(state.idle_amplitude()) * damping;
    let max_height = geometry.center_y();
    let center_y = geometry.center_y();
    let left = geometry.left();
    let right = geometry.right();
    let step = state.density().max(span / MAX_STEPS as f64);

    let phase = state.phase();
    let frequency = state.frequency();
    let point_at = |x: f64| {
        let t = ((x - left) / span).clamp(0.0, 1.0);
        let offset = (t * frequency * TAU + phase).sin() * wave_amplitude * max_height * envelope(t);
        Point {
            x,
            y: center_y + offset,
        }
    };

    let steps = ((span / step).floor() as usize).min(MAX_STEPS);
    let mut points: Vec<Point> = Vec::with_capacity(steps.saturating_add(2));
    for index in 0..=steps {
        let x = left + index as f64 * step;
        if x >= right {
            break;
        }
        // Far from the origin the step can drop below the float spacing
        if points.last().is_some_and(|last| x <= last.x) {
            continue;
        }
        points.push(point_at(x));
    }
    points.push(point_at(right));
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wave::state::WaveConfig;
    use approx::assert_relative_eq;

    fn state_with(amplitude: f64, config: WaveConfig) -> WaveformState {
        let mut state = WaveformState::from_config(&config);
        state.set_amplitude(amplitude);
        state
    }

    fn deviation(point: &Point, geometry: &ViewGeometry) -> f64 {
        point.y - geometry.center_y()
    }

    #[test]
    fn test_points_increase_strictly_within_margins() {
        let geometry = ViewGeometry::new(317.0, 120.0).with_margins(12.5, 20.0);
        let state = state_with(0.8, WaveConfig::default());

        for wave_index in 0..=state.wave_count() {
            let points = sample_points(&state, wave_index, &geometry);
            assert!(points.len() > 2);
            assert_relative_eq!(points[0].x, 12.5);
            assert_relative_eq!(points[points.len() - 1].x, 297.0);
            for pair in points.windows(2) {
                assert!(pair[1].x > pair[0].x);
            }
            for point in &points {
                assert!(point.x >= 12.5 && point.x <= 297.0);
            }
        }
    }

    #[test]
    fn test_background_waves_are_progressively_damped() {
        let geometry = ViewGeometry::new(300.0, 100.0);
        let config = WaveConfig {
            phase: 0.3,
            ..WaveConfig::default()
        };
        let state = state_with(0.6, config);
        let foreground = sample_points(&state, 0, &geometry);

        for k in 1..=state.wave_count() {
            let background = sample_points(&state, k, &geometry);
            assert_eq!(background.len(), foreground.len());
            let factor = state.damping_factor().powi(k as i32);
            for (front, back) in foreground.iter().zip(&background) {
                assert_relative_eq!(
                    deviation(back, &geometry),
                    deviation(front, &geometry) * factor,
                    epsilon = 1e-9
                );
            }
        }
    }

    #[test]
    fn test_edges_pinch_below_midpoint_peak() {
        let geometry = ViewGeometry::new(300.0, 100.0);
        let state = state_with(0.5, WaveConfig::default());
        let points = sample_points(&state, 0, &geometry);

        let mid = points.iter().find(|p| p.x == 150.0).unwrap();
        let mid_deviation = deviation(mid, &geometry).abs();
        assert!(mid_deviation > 0.0);
        assert!(deviation(&points[0], &geometry).abs() < mid_deviation);
        assert!(deviation(&points[points.len() - 1], &geometry).abs() < mid_deviation);
    }

    #[test]
    fn test_degenerate_geometry_is_empty() {
        let state = state_with(0.5, WaveConfig::default());

        assert!(sample_points(&state, 0, &ViewGeometry::new(0.0, 100.0)).is_empty());
        assert!(sample_points(&state, 0, &ViewGeometry::new(-5.0, 100.0)).is_empty());
        let squeezed = ViewGeometry::new(100.0, 100.0).with_margins(60.0, 40.0);
        assert!(sample_points(&state, 0, &squeezed).is_empty());
        assert!(sample_points(&state, 0, &ViewGeometry::new(f64::NAN, 100.0)).is_empty());
    }

    #[test]
    fn test_midpoint_matches_closed_form() {
        let geometry = ViewGeometry::new(300.0, 80.0);
        let state = state_with(0.5, WaveConfig::default());
        let points = sample_points(&state, 0, &geometry);

        let mid = points.iter().find(|p| p.x == 150.0).unwrap();
        let max_height = 0.5 * 80.0;
        let expected = (std::f64::consts::PI * 1.5).sin() * 0.5 * max_height * envelope(0.5);
        assert_relative_eq!(deviation(mid, &geometry), expected, epsilon = 1e-9);
        assert_relative_eq!(expected, -20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_idle_amplitude_keeps_waves_visible() {
        let geometry = ViewGeometry::new(300.0, 80.0);
        let config = WaveConfig {
            idle_amplitude: 0.1,
            ..WaveConfig::default()
        };
        let state = state_with(0.0, config);
        let points = sample_points(&state, 0, &geometry);
        assert!(points.iter().any(|p| deviation(p, &geometry).abs() > 0.0));
    }

    #[test]
    fn test_density_controls_point_count() {
        let geometry = ViewGeometry::new(300.0, 80.0);
        let coarse = state_with(0.5, WaveConfig::default());
        let fine = state_with(
            0.5,
            WaveConfig {
                density: 1.0,
                ..WaveConfig::default()
            },
        );
        assert_eq!(sample_points(&coarse, 0, &geometry).len(), 61);
        assert_eq!(sample_points(&fine, 0, &geometry).len(), 301);
    }

    #[test]
    fn test_huge_span_is_bounded() {
        let state = state_with(0.5, WaveConfig::default());
        let points = sample_points(&state, 0, &ViewGeometry::new(1e300, 100.0));

        assert!(points.len() <= MAX_STEPS + 2);
        assert!(points.len() > MAX_STEPS / 2);
        assert_eq!(points[points.len() - 1].x, 1e300);
        for pair in points.windows(2) {
            assert!(pair[1].x > pair[0].x);
        }
        assert!(points.iter().all(|p| p.y.is_finite()));
    }

    #[test]
    fn test_huge_margin_keeps_x_strictly_increasing() {
        let state = state_with(0.5, WaveConfig::default());
        let geometry = ViewGeometry::new(1e17 + 4096.0, 100.0).with_margins(1e17, 0.0);
        let points = sample_points(&state, 0, &geometry);

        assert!(points.len() > 2);
        assert_eq!(points[0].x, 1e17);
        assert_eq!(points[points.len() - 1].x, 1e17 + 4096.0);
        for pair in points.windows(2) {
            assert!(pair[1].x > pair[0].x);
        }
    }

    #[test]
    fn test_far_background_wave_is_flat() {
        let mut state = state_with(0.5, WaveConfig::default());
        state.set_wave_count(u32::MAX);
        let geometry = ViewGeometry::new(300.0, 100.0);

        for point in sample_points(&state, 3_000_000_000, &geometry) {
            assert_relative_eq!(point.y, geometry.center_y());
        }
    }

    #[test]
    fn test_envelope_shape() {
        assert_relative_eq!(envelope(0.0), 0.0);
        assert_relative_eq!(envelope(1.0), 0.0);
        assert_relative_eq!(envelope(0.5), 1.0);
        assert_relative_eq!(envelope(0.25), envelope(0.75));
    }

    #[test]
    fn test_normalized_wave_index() {
        assert_eq!(normalized_wave_index(0, 4), 0.0);
        assert_eq!(normalized_wave_index(2, 4), 0.5);
        assert_eq!(normalized_wave_index(9, 4), 1.0);
        assert_eq!(normalized_wave_index(3, 0), 0.0);
    }
}
