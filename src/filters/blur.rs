//! Gaussian blur over a whole [`PixelBuffer`].
//!
//! This is the one neighborhood transform, so it runs as a separate pass
//! that completes before any per-pixel transform touches the buffer.
//! Separable 2-pass convolution in f32, edge pixels replicated. RGB is
//! blurred; alpha is left as it was.

use ndarray::{s, Array3, ArrayView1, ArrayViewMut1, Axis, Zip};

use super::buffer::{store_rgb, PixelBuffer};
use super::core::gaussian_kernel_1d;

/// Blur the RGB channels of `buffer` in place with standard deviation `sigma`.
///
/// `sigma <= 0` (or non-finite) leaves the buffer unchanged. Sigmas larger
/// than the image's longest side act as that side's length, so the cost is
/// bounded by the image size. The result is deterministic for a given
/// buffer and sigma.
pub fn gaussian_blur(buffer: &mut PixelBuffer, sigma: f32) {
    let longest_side = buffer.width().max(buffer.height());
    let kernel = gaussian_kernel_1d(sigma, longest_side);
    if kernel.len() == 1 || buffer.pixel_count() == 0 {
        return;
    }

    let rgb = buffer.array().slice(s![.., .., ..3]).mapv(f32::from);
    let rows = convolve_along(&rgb, &kernel, Axis(1));
    let result = convolve_along(&rows, &kernel, Axis(0));

    Zip::from(buffer.array_mut().lanes_mut(Axis(2)))
        .and(result.lanes(Axis(2)))
        .for_each(|px, blurred| store_rgb(px, [blurred[0], blurred[1], blurred[2]]));
}

/// One separable pass: convolve every 1D line of `src` along `axis`.
fn convolve_along(src: &Array3<f32>, kernel: &[f32], axis: Axis) -> Array3<f32> {
    let mut dst = Array3::<f32>::zeros(src.raw_dim());
    Zip::from(dst.lanes_mut(axis))
        .and(src.lanes(axis))
        .for_each(|out, line| convolve_line(out, line, kernel));
    dst
}

fn convolve_line(mut out: ArrayViewMut1<f32>, line: ArrayView1<f32>, kernel: &[f32]) {
    let last = line.len() as isize - 1;
    let half = (kernel.len() / 2) as isize;
    for (i, dst) in out.iter_mut().enumerate() {
        *dst = kernel
            .iter()
            .enumerate()
            .map(|(k, &weight)| {
                let j = (i as isize + k as isize - half).clamp(0, last);
                line[j as usize] * weight
            })
            .sum();
    }
}
