//! Filter parameters: the default table and override resolution.
//!
//! Overrides arrive as string key/value pairs, one per option, usually read
//! from `data-pb-*` attributes of the element being filtered. [`resolve`]
//! merges them over [`FilterConfig::DEFAULT`] into a fully-typed record.
//!
//! | Key | Field | Default |
//! |-----|-------|---------|
//! | `blur-amount` | `blur_amount` | 1.0 |
//! | `greyscale-amount` | `greyscale_amount` | 1.0 |
//! | `noise-amount` | `noise_amount` | 30.0 |
//! | `noise-type` | `noise_type` | mono |
//! | `sepia-amount` | `sepia_amount` | 1.0 |
//! | `tint-amount` | `tint_amount` | 0.3 |
//! | `tint-color` / `tint-colour` | `tint_color` | `#FFF` |
//!
//! Every key may also carry the `data-pb-` prefix.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::color::Rgb;
use crate::error::{Error, Result};

const ATTRIBUTE_PREFIX: &str = "data-pb-";

const BLUR_AMOUNT: &str = "blur-amount";
const GREYSCALE_AMOUNT: &str = "greyscale-amount";
const GRAYSCALE_AMOUNT: &str = "grayscale-amount";
const NOISE_AMOUNT: &str = "noise-amount";
const NOISE_TYPE: &str = "noise-type";
const SEPIA_AMOUNT: &str = "sepia-amount";
const TINT_AMOUNT: &str = "tint-amount";
const TINT_COLOR: &str = "tint-color";
const TINT_COLOUR: &str = "tint-colour";

const RECOGNIZED_KEYS: [&str; 9] = [
    BLUR_AMOUNT,
    GREYSCALE_AMOUNT,
    GRAYSCALE_AMOUNT,
    NOISE_AMOUNT,
    NOISE_TYPE,
    SEPIA_AMOUNT,
    TINT_AMOUNT,
    TINT_COLOR,
    TINT_COLOUR,
];

/// How noise samples are shared across the color channels of a pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseType {
    /// One sample added to R, G and B alike
    #[default]
    Mono,
    /// An independent sample per channel
    Color,
}

impl NoiseType {
    /// Interpret a `noise-type` value.
    ///
    /// `mono` and `monochrome` select [`NoiseType::Mono`]; anything else
    /// falls through to [`NoiseType::Color`].
    pub fn from_param(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "mono" | "monochrome" => NoiseType::Mono,
            "color" | "colour" => NoiseType::Color,
            other => {
                warn!(noise_type = other, "unrecognized noise type, using color noise");
                NoiseType::Color
            }
        }
    }
}

/// Resolved parameters for one filter invocation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Gaussian sigma in pixels, 0 and higher
    pub blur_amount: f32,
    /// Desaturation weight, 0.0-1.0
    pub greyscale_amount: f32,
    /// Noise span in channel units, 0 and higher
    pub noise_amount: f32,
    pub noise_type: NoiseType,
    /// Sepia weight, 0.0-1.0
    pub sepia_amount: f32,
    /// Tint weight, 0.0-1.0
    pub tint_amount: f32,
    pub tint_color: Rgb,
}

impl FilterConfig {
    /// The default parameter table.
    pub const DEFAULT: FilterConfig = FilterConfig {
        blur_amount: 1.0,
        greyscale_amount: 1.0,
        noise_amount: 30.0,
        noise_type: NoiseType::Mono,
        sepia_amount: 1.0,
        tint_amount: 0.3,
        tint_color: Rgb::WHITE,
    };
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig::DEFAULT
    }
}

/// Merge string overrides over the default table.
///
/// Absent keys and empty values keep their defaults. Unknown keys are
/// ignored. When both `tint-color` and `tint-colour` are given, the latter
/// wins.
///
/// A key given both bare and with the `data-pb-` prefix resolves to the
/// prefixed value, regardless of iteration order. Repeats of the same
/// spelling keep the last one.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] if a numeric option does not parse
/// as a finite number or `tint-color` is not a valid hex color.
pub fn resolve<I, K, V>(overrides: I) -> Result<FilterConfig>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    // name -> (value, came from a `data-pb-` key)
    let mut table: HashMap<&'static str, (String, bool)> = HashMap::new();
    for (key, value) in overrides {
        let key = key.as_ref().trim();
        let (name, prefixed) = match key.strip_prefix(ATTRIBUTE_PREFIX) {
            Some(name) => (name, true),
            None => (key, false),
        };
        let value = value.as_ref().trim();

        let Some(&name) = RECOGNIZED_KEYS.iter().find(|&&known| known == name) else {
            debug!(key, "ignoring unrecognized filter parameter");
            continue;
        };
        if value.is_empty() {
            continue;
        }
        // The attribute spelling outranks the bare one whatever the order
        if matches!(table.get(name), Some((_, true))) && !prefixed {
            continue;
        }
        table.insert(name, (value.to_string(), prefixed));
    }
    let table: HashMap<&str, String> = table.into_iter().map(|(k, (v, _))| (k, v)).collect();

    let mut config = FilterConfig::DEFAULT;

    if let Some(v) = table.get(BLUR_AMOUNT) {
        config.blur_amount = parse_amount(BLUR_AMOUNT, v)?;
    }
    for key in [GRAYSCALE_AMOUNT, GREYSCALE_AMOUNT] {
        if let Some(v) = table.get(key) {
            config.greyscale_amount = parse_amount(key, v)?;
        }
    }
    if let Some(v) = table.get(NOISE_AMOUNT) {
        config.noise_amount = parse_amount(NOISE_AMOUNT, v)?;
    }
    if let Some(v) = table.get(NOISE_TYPE) {
        config.noise_type = NoiseType::from_param(v);
    }
    if let Some(v) = table.get(SEPIA_AMOUNT) {
        config.sepia_amount = parse_amount(SEPIA_AMOUNT, v)?;
    }
    if let Some(v) = table.get(TINT_AMOUNT) {
        config.tint_amount = parse_amount(TINT_AMOUNT, v)?;
    }
    for key in [TINT_COLOR, TINT_COLOUR] {
        if let Some(v) = table.get(key) {
            config.tint_color = Rgb::from_hex(v).map_err(|_| Error::InvalidParameter {
                key: key.to_string(),
                value: v.clone(),
                reason: "expected a 3- or 6-digit hex color".to_string(),
            })?;
        }
    }

    Ok(config)
}

fn parse_amount(key: &str, value: &str) -> Result<f32> {
    let invalid = |reason: &str| Error::InvalidParameter {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let parsed: f32 = value.parse().map_err(|_| invalid("expected a number"))?;
    if !parsed.is_finite() {
        return Err(invalid("expected a finite number"));
    }
    Ok(parsed)
}
