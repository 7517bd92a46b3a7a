//! Stroke styling for the wave layers.
//!
//! The foreground wave is stroked at full width and opacity; background waves
//! get half the line width and fade with their distance from the foreground.
//! Colours along a line come from a pluggable [`LineColor`] strategy.

use super::sampler::normalized_wave_index;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Line width and opacity for one wave layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveStyle {
    pub line_width: f64,
    pub opacity: f64,
}

/// Computes the stroke style for a wave layer.
pub fn wave_style(wave_index: u32, wave_count: u32, line_width: f64) -> WaveStyle {
    let line_width = line_width.max(0.0);
    if wave_index == 0 {
        return WaveStyle {
            line_width,
            opacity: 1.0,
        };
    }

    let progress = 1.0 - normalized_wave_index(wave_index, wave_count);
    WaveStyle {
        line_width: line_width / 2.0,
        opacity: (progress * 2.0 / 3.0 + 1.0 / 3.0).min(1.0),
    }
}

/// An sRGB colour, written as `#rrggbb` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Grey level from a white value in `[0, 1]`.
    pub fn grey(white_value: f64) -> Self {
        let level = channel(white_value);
        Self::new(level, level, level)
    }

    /// Linear interpolation toward `other`; `amount` is clamped to `[0, 1]`.
    pub fn mix(self, other: Rgb, amount: f64) -> Rgb {
        let amount = if amount.is_nan() { 0.0 } else { amount.clamp(0.0, 1.0) };
        let lerp = |a: u8, b: u8| {
            (f64::from(a) + (f64::from(b) - f64::from(a)) * amount).round() as u8
        };
        Rgb::new(lerp(self.r, other.r), lerp(self.g, other.g), lerp(self.b, other.b))
    }

    /// Composites this colour with `opacity` over `background`.
    pub fn blend(self, background: Rgb, opacity: f64) -> Rgb {
        background.mix(self, opacity)
    }
}

fn channel(value: f64) -> u8 {
    let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    (value * 255.0).round() as u8
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("Invalid colour '{s}'. Expected '#rrggbb'"));
        }
        let component = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|e| format!("Invalid colour '{s}': {e}"))
        };
        Ok(Rgb::new(component(0..2)?, component(2..4)?, component(4..6)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// Supplies the colour of a line at a horizontal location.
///
/// `location` is the x coordinate of the segment being stroked and `length`
/// the fraction of the wave span already covered, in `[0, 1]`.
pub trait LineColor {
    fn color_at(&self, location: f64, length: f64) -> Rgb;
}

impl<F> LineColor for F
where
    F: Fn(f64, f64) -> Rgb,
{
    fn color_at(&self, location: f64, length: f64) -> Rgb {
        self(location, length)
    }
}

/// The same colour everywhere.
#[derive(Debug, Clone, Copy)]
pub struct Uniform(pub Rgb);

impl LineColor for Uniform {
    fn color_at(&self, _location: f64, _length: f64) -> Rgb {
        self.0
    }
}

/// A grey level, 1.0 being white.
#[derive(Debug, Clone, Copy)]
pub struct WhiteValue(pub f64);

impl LineColor for WhiteValue {
    fn color_at(&self, _location: f64, _length: f64) -> Rgb {
        Rgb::grey(self.0)
    }
}

/// Left-to-right blend between two colours.
#[derive(Debug, Clone, Copy)]
pub struct Gradient {
    pub from: Rgb,
    pub to: Rgb,
}

impl LineColor for Gradient {
    fn color_at(&self, _location: f64, length: f64) -> Rgb {
        self.from.mix(self.to, length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_foreground_style_is_full_strength() {
        let style = wave_style(0, 4, 2.0);
        assert_relative_eq!(style.line_width, 2.0);
        assert_relative_eq!(style.opacity, 1.0);
    }

    #[test]
    fn test_background_styles_fade_with_index() {
        let mut previous = wave_style(0, 4, 2.0).opacity;
        for index in 1..=4 {
            let style = wave_style(index, 4, 2.0);
            assert_relative_eq!(style.line_width, 1.0);
            assert!(style.opacity <= previous);
            assert!(style.opacity >= 1.0 / 3.0);
            previous = style.opacity;
        }
        assert_relative_eq!(wave_style(4, 4, 2.0).opacity, 1.0 / 3.0);
    }

    #[test]
    fn test_rgb_parse_and_display() {
        let color: Rgb = "#1e90ff".parse().unwrap();
        assert_eq!(color, Rgb::new(0x1e, 0x90, 0xff));
        assert_eq!(color.to_string(), "#1e90ff");
        assert_eq!("CEE0DC".parse::<Rgb>().unwrap(), Rgb::new(206, 224, 220));

        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#zz0000".parse::<Rgb>().is_err());
        assert!("".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_blend_over_background() {
        assert_eq!(Rgb::WHITE.blend(Rgb::BLACK, 1.0), Rgb::WHITE);
        assert_eq!(Rgb::WHITE.blend(Rgb::BLACK, 0.0), Rgb::BLACK);
        assert_eq!(Rgb::WHITE.blend(Rgb::BLACK, 0.5), Rgb::new(128, 128, 128));
        assert_eq!(Rgb::WHITE.blend(Rgb::BLACK, 7.0), Rgb::WHITE);
    }

    #[test]
    fn test_color_strategies() {
        assert_eq!(Uniform(Rgb::WHITE).color_at(3.0, 0.2), Rgb::WHITE);
        assert_eq!(WhiteValue(0.0).color_at(3.0, 0.2), Rgb::BLACK);
        assert_eq!(WhiteValue(1.0).color_at(3.0, 0.2), Rgb::WHITE);

        let gradient = Gradient {
            from: Rgb::BLACK,
            to: Rgb::new(200, 100, 0),
        };
        assert_eq!(gradient.color_at(0.0, 0.0), Rgb::BLACK);
        assert_eq!(gradient.color_at(0.0, 1.0), Rgb::new(200, 100, 0));

        let custom = |location: f64, _length: f64| {
            if location < 10.0 {
                Rgb::BLACK
            } else {
                Rgb::WHITE
            }
        };
        assert_eq!(custom.color_at(5.0, 0.0), Rgb::BLACK);
        assert_eq!(custom.color_at(50.0, 0.0), Rgb::WHITE);
    }

    #[test]
    fn test_rgb_serde_as_hex_string() {
        #[derive(Deserialize, Serialize)]
        struct Holder {
            color: Rgb,
        }
        let holder: Holder = toml::from_str(r##"color = "#ff0000""##).unwrap();
        assert_eq!(holder.color, Rgb::new(255, 0, 0));
        assert_eq!(toml::to_string(&holder).unwrap().trim(), r##"color = "#ff0000""##);
        assert!(toml::from_str::<Holder>(r#"color = "red""#).is_err());
    }
}
