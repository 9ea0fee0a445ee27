//! Core utilities shared by the neighborhood filters.

/// Build a normalized 1D Gaussian kernel for an image whose longest side
/// is `max_radius` pixels.
///
/// With edge replication, every tap at offset `|d| >= max_radius` reads the
/// edge pixel, so taps past that offset are folded onto the two outermost
/// taps. Sigma is capped at `max_radius`: at that point the kernel already
/// spans the whole image several times over. The result has at most
/// `2 * max_radius + 1` taps whatever the sigma.
///
/// A non-positive or non-finite sigma, or `max_radius == 0`, gives the
/// identity kernel `[1.0]`.
pub fn gaussian_kernel_1d(sigma: f32, max_radius: usize) -> Vec<f32> {
    if !sigma.is_finite() || sigma <= 0.0 || max_radius == 0 {
        return vec![1.0];
    }

    let sigma = sigma.min(max_radius as f32);
    // 6 sigma wide (99.7% of the distribution), odd length
    let radius = (((sigma * 6.0).ceil() as usize) | 1) / 2;
    let kept = radius.min(max_radius);

    let mut kernel = vec![0.0f32; 2 * kept + 1];
    let two_sigma_sq = 2.0 * sigma * sigma;
    for offset in -(radius as isize)..=(radius as isize) {
        let tap = offset.clamp(-(kept as isize), kept as isize) + kept as isize;
        let x = offset as f32;
        kernel[tap as usize] += (-x * x / two_sigma_sq).exp();
    }

    let sum: f32 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }

    kernel
}
