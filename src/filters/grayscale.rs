//! Greyscale (desaturation) transform.
//!
//! Luminance uses fixed 0.21 / 0.71 / 0.07 weights. They sum to 0.99, so
//! full desaturation of pure white gives 252, not 255.

use super::color::{blend, Rgb};

const LUMA_R: f32 = 0.21;
const LUMA_G: f32 = 0.71;
const LUMA_B: f32 = 0.07;

/// Weighted luminance of a pixel, unrounded.
#[inline]
pub fn luminance(px: Rgb) -> f32 {
    LUMA_R * px.r as f32 + LUMA_G * px.g as f32 + LUMA_B * px.b as f32
}

/// Blend each channel toward the pixel's luminance by `amount`.
///
/// `amount = 0` is the identity; `amount = 1` gives R=G=B=luminance.
#[inline]
pub fn greyscale(amount: f32, px: Rgb) -> [f32; 3] {
    let val = luminance(px);
    let [r, g, b] = px.to_f32();
    [
        blend(amount, val, r),
        blend(amount, val, g),
        blend(amount, val, b),
    ]
}
