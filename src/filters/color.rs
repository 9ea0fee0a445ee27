//! Color utilities shared by the pixel transforms.
//!
//! - Hex color parsing (`#RGB`, `#RRGGBB`, leading `#` optional)
//! - Linear blending between a target and a source value
//! - Channel clamping for the 8-bit writer
//! - Uniform noise sampling

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An 8-bit RGB triple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Channels as floats, for transform math.
    #[inline]
    pub fn to_f32(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }

    /// Parse a hex color string.
    ///
    /// Accepts 3-digit shorthand and 6-digit longhand, with or without a
    /// single leading `#`. Shorthand digits are doubled, so `#FFF` and
    /// `#FFFFFF` give the same color.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColor`] for any other length or a non-hex digit.
    pub fn from_hex(src: &str) -> Result<Self> {
        let trimmed = src.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(src.to_string()));
        }

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(Error::InvalidColor(src.to_string())),
        };

        let value = u32::from_str_radix(&expanded, 16)
            .map_err(|_| Error::InvalidColor(src.to_string()))?;

        Ok(Rgb {
            r: ((value & 0xFF0000) >> 16) as u8,
            g: ((value & 0x00FF00) >> 8) as u8,
            b: (value & 0x0000FF) as u8,
        })
    }

    /// Format as `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Linear interpolation: `t * dest + (1 - t) * src`.
///
/// `t = 0` returns `src`, `t = 1` returns `dest`. No clamping.
#[inline]
pub fn blend(t: f32, dest: f32, src: f32) -> f32 {
    t * dest + (1.0 - t) * src
}

/// Convert a computed channel value to a stored byte.
///
/// Rounds half to even, then clamps to 0-255. NaN stores as 0.
#[inline]
pub fn to_channel(v: f32) -> u8 {
    v.round_ties_even().clamp(0.0, 255.0) as u8
}

/// Sample one noise offset: `floor(u * amount/2 - amount/2)`, `u` uniform in [0, 1).
///
/// The result lies in `[-amount/2, 0]`, so noise only ever darkens.
/// `amount = 0` always gives 0.
#[inline]
pub fn noise_delta<R: Rng + ?Sized>(rng: &mut R, amount: f32) -> f32 {
    let half = amount / 2.0;
    (rng.gen::<f32>() * half - half).floor()
}
