//! Additive noise transform.
//!
//! Offsets come from [`noise_delta`], which lies in `[-amount/2, 0]`.
//! There is no seeding contract: callers pass any [`Rng`], and tests check
//! the output statistically.

use rand::Rng;

use super::color::{noise_delta, Rgb};
use super::params::NoiseType;

/// Add random noise to a pixel.
///
/// [`NoiseType::Mono`] adds one shared sample to all three channels;
/// [`NoiseType::Color`] samples each channel independently.
#[inline]
pub fn noise<R: Rng + ?Sized>(amount: f32, noise_type: NoiseType, px: Rgb, rng: &mut R) -> [f32; 3] {
    let [r, g, b] = px.to_f32();
    match noise_type {
        NoiseType::Mono => {
            let val = noise_delta(rng, amount);
            [r + val, g + val, b + val]
        }
        NoiseType::Color => [
            r + noise_delta(rng, amount),
            g + noise_delta(rng, amount),
            b + noise_delta(rng, amount),
        ],
    }
}
