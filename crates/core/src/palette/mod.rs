use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ChladniError;

/// 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Colour returned for a flat field, where no normalisation is possible.
    pub const NEUTRAL: Rgb = Rgb::new(128, 128, 128);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `rgb(r, g, b)` form.
    pub fn css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Named colour schemes for the heat map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    /// Full hue sweep at full saturation. The top of the range (`t = 1`,
    /// hue 360°) is black.
    #[default]
    Rainbow,
    BlueViolet,
    Grayscale,
    Fire,
    Ocean,
}

impl Palette {
    pub const ALL: [Palette; 5] = [
        Palette::Rainbow,
        Palette::BlueViolet,
        Palette::Grayscale,
        Palette::Fire,
        Palette::Ocean,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Palette::Rainbow => "rainbow",
            Palette::BlueViolet => "blue_violet",
            Palette::Grayscale => "grayscale",
            Palette::Fire => "fire",
            Palette::Ocean => "ocean",
        }
    }

    /// Maps `t ∈ [0, 1]` onto the palette. Out-of-range input is clamped.
    pub fn color_at(self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
        match self {
            Palette::Rainbow => hsl_to_rgb(t * 360.0, 1.0, 0.5),
            Palette::BlueViolet => Rgb::new(
                channel(100.0 + t * 155.0),
                channel(100.0 + t * 50.0),
                channel(200.0 + t * 55.0),
            ),
            Palette::Grayscale => {
                let gray = channel(t * 255.0);
                Rgb::new(gray, gray, gray)
            }
            Palette::Fire => Rgb::new(255, channel(t * 200.0), channel(t * 50.0)),
            Palette::Ocean => Rgb::new(
                channel(t * 50.0),
                channel(150.0 + t * 105.0),
                channel(200.0 + t * 55.0),
            ),
        }
    }

    /// Colours a field sample symmetrically around zero, so that equally
    /// strong peaks and troughs share a saturation. Yields
    /// [`Rgb::NEUTRAL`] when `max_abs` is zero or not a finite number.
    pub fn color_of(self, value: f64, max_abs: f64) -> Rgb {
        if !(max_abs.is_finite() && max_abs > 0.0) {
            return Rgb::NEUTRAL;
        }
        self.color_at((value + max_abs) / (2.0 * max_abs))
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Palette {
    type Err = ChladniError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Palette::ALL
            .into_iter()
            .find(|palette| palette.name() == wanted)
            .ok_or_else(|| ChladniError::invalid(format!("unknown palette `{s}`")))
    }
}

fn channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// HSL to RGB with `hue` in degrees and `saturation`, `lightness` in `[0, 1]`.
fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> Rgb {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    // hues outside [0, 360) fall in no sextant and carry no chroma
    let (r, g, b) = match h {
        h if (0.0..1.0).contains(&h) => (c, x, 0.0),
        h if (1.0..2.0).contains(&h) => (x, c, 0.0),
        h if (2.0..3.0).contains(&h) => (0.0, c, x),
        h if (3.0..4.0).contains(&h) => (0.0, x, c),
        h if (4.0..5.0).contains(&h) => (x, 0.0, c),
        h if (5.0..6.0).contains(&h) => (c, 0.0, x),
        _ => (0.0, 0.0, 0.0),
    };
    let m = lightness - c / 2.0;
    Rgb::new(
        channel((r + m) * 255.0),
        channel((g + m) * 255.0),
        channel((b + m) * 255.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_ends_differ() {
        for palette in Palette::ALL {
            assert_ne!(palette.color_at(0.0), palette.color_at(1.0), "{palette}");
        }
    }

    #[test]
    fn flat_field_yields_neutral_colour() {
        for palette in Palette::ALL {
            assert_eq!(palette.color_of(0.0, 0.0), Rgb::NEUTRAL);
            assert_eq!(palette.color_of(1.0, f64::NAN), Rgb::NEUTRAL);
        }
    }

    #[test]
    fn normalisation_is_symmetric_around_zero() {
        let palette = Palette::Grayscale;
        assert_eq!(palette.color_of(-2.0, 2.0), Rgb::new(0, 0, 0));
        assert_eq!(palette.color_of(2.0, 2.0), Rgb::new(255, 255, 255));
        assert_eq!(palette.color_of(0.0, 2.0), Rgb::new(128, 128, 128));
    }

    #[test]
    fn rainbow_walks_the_hue_circle() {
        assert_eq!(Palette::Rainbow.color_at(0.0), Rgb::new(255, 0, 0));
        assert_eq!(Palette::Rainbow.color_at(1.0 / 3.0), Rgb::new(0, 255, 0));
        assert_eq!(Palette::Rainbow.color_at(2.0 / 3.0), Rgb::new(0, 0, 255));
        assert_eq!(Palette::Rainbow.color_at(1.0), Rgb::new(0, 0, 0));
    }

    #[test]
    fn linear_palettes_match_their_channel_ranges() {
        assert_eq!(Palette::BlueViolet.color_at(0.0), Rgb::new(100, 100, 200));
        assert_eq!(Palette::BlueViolet.color_at(1.0), Rgb::new(255, 150, 255));
        assert_eq!(Palette::Fire.color_at(1.0), Rgb::new(255, 200, 50));
        assert_eq!(Palette::Ocean.color_at(0.0), Rgb::new(0, 150, 200));
    }

    #[test]
    fn formats_hex_and_css() {
        let colour = Rgb::new(255, 16, 0);
        assert_eq!(colour.to_hex(), "#ff1000");
        assert_eq!(colour.css(), "rgb(255, 16, 0)");
    }

    #[test]
    fn parses_names() {
        assert_eq!("Blue-Violet".parse::<Palette>().unwrap(), Palette::BlueViolet);
        assert_eq!("ocean".parse::<Palette>().unwrap(), Palette::Ocean);
        assert!("sepia".parse::<Palette>().is_err());
    }
}
