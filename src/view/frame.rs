//! Terminal-independent frame building.
//!
//! [`WaveView`] owns the waveform state of one view and turns each render tick
//! into coloured polyline segments, back to front, ready to be stroked.

use crate::config::{SiriwaveConfig, ViewConfig};
use crate::wave::{
    sample_points, wave_style, LineColor, Point, Rgb, ViewGeometry, WaveStyle, WaveformState,
};

/// One stroked segment of a wave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    /// Stroke colour, already blended over the background
    pub color: Rgb,
}

/// All segments of one wave with its style.
#[derive(Debug, Clone)]
pub struct StrokedWave {
    pub wave_index: u32,
    pub style: WaveStyle,
    pub segments: Vec<Segment>,
}

/// Waveform state plus everything needed to stroke it.
pub struct WaveView {
    state: WaveformState,
    view: ViewConfig,
    line_color: Box<dyn LineColor>,
    margin_left: f64,
    margin_right: f64,
}

impl WaveView {
    pub fn new(config: &SiriwaveConfig) -> Self {
        Self {
            state: WaveformState::from_config(&config.wave),
            view: config.view.clone(),
            line_color: config.view.line_color(),
            margin_left: config.wave.margin_left,
            margin_right: config.wave.margin_right,
        }
    }

    /// Replaces the colour strategy.
    pub fn set_line_color(&mut self, line_color: Box<dyn LineColor>) {
        self.line_color = line_color;
    }

    /// Applies the latest input level and advances one frame, unless the
    /// state is frozen (not oscillating and no input above the idle floor).
    pub fn tick(&mut self, level: f64) {
        self.state.set_amplitude(level);
        if self.state.should_animate() {
            self.state.advance_frame();
        }
    }

    pub fn toggle_oscillating(&mut self) -> bool {
        let oscillating = !self.state.is_oscillating();
        self.state.set_oscillating(oscillating);
        tracing::debug!("Oscillating: {}", oscillating);
        oscillating
    }

    pub fn state(&self) -> &WaveformState {
        &self.state
    }

    pub fn view_config(&self) -> &ViewConfig {
        &self.view
    }

    /// Geometry of a view of `width` x `height` with the configured margins.
    pub fn geometry(&self, width: f64, height: f64) -> ViewGeometry {
        ViewGeometry::new(width, height).with_margins(self.margin_left, self.margin_right)
    }

    /// Builds every wave of the current frame, background waves first and the
    /// foreground wave last.
    pub fn build_frame(&self, geometry: &ViewGeometry) -> Vec<StrokedWave> {
        let wave_count = self.state.wave_count();
        (0..=wave_count)
            .rev()
            .map(|wave_index| self.stroke_wave(wave_index, geometry))
            .collect()
    }

    fn stroke_wave(&self, wave_index: u32, geometry: &ViewGeometry) -> StrokedWave {
        let style = wave_style(wave_index, self.state.wave_count(), self.view.line_width);
        let points = sample_points(&self.state, wave_index, geometry);
        let span = geometry.span();
        let left = geometry.margin_left.max(0.0);

        let segments = points
            .windows(2)
            .map(|pair| {
                let length = ((pair[0].x - left) / span).clamp(0.0, 1.0);
                let color = self
                    .line_color
                    .color_at(pair[0].x, length)
                    .blend(self.view.background, style.opacity);
                Segment {
                    from: pair[0],
                    to: pair[1],
                    color,
                }
            })
            .collect();

        StrokedWave {
            wave_index,
            style,
            segments,
        }
    }
}
