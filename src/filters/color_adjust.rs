//! Tonal transforms: Sepia and Tint.
//!
//! Both blend each channel toward a per-pixel target by a weight in
//! 0.0-1.0. Results are unclamped; the buffer writer clamps.

use super::color::{blend, Rgb};

// ============================================================================
// Sepia
// ============================================================================

/// Sepia tone matrix, one row per output channel.
const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Blend each channel toward its sepia-toned value by `amount`.
///
/// Bright inputs overshoot 255 (the red row sums to 1.351).
#[inline]
pub fn sepia(amount: f32, px: Rgb) -> [f32; 3] {
    let src = px.to_f32();
    let mut out = [0.0f32; 3];
    for (c, row) in SEPIA.iter().enumerate() {
        let toned = row[0] * src[0] + row[1] * src[1] + row[2] * src[2];
        out[c] = blend(amount, toned, src[c]);
    }
    out
}

// ============================================================================
// Tint
// ============================================================================

/// Blend each channel toward `target` by `amount`.
#[inline]
pub fn tint(amount: f32, px: Rgb, target: Rgb) -> [f32; 3] {
    let [r, g, b] = px.to_f32();
    let [tr, tg, tb] = target.to_f32();
    [blend(amount, tr, r), blend(amount, tg, g), blend(amount, tb, b)]
}
