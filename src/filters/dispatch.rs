//! Filter dispatch: pick a transform for a [`FilterKind`] and run it over
//! every pixel of a [`PixelBuffer`].
//!
//! Blur runs first as a full-buffer pass. The tint target is fixed once per
//! call. Each remaining transform reads a pixel's own channels before
//! writing it and never looks at a neighbor, so the per-pixel loop may run
//! in any order, on any number of threads, with the same result.

use ndarray::{Axis, Zip};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::blur::gaussian_blur;
use super::buffer::{load_rgb, store_rgb, PixelBuffer};
use super::color::Rgb;
use super::color_adjust::{sepia, tint};
use super::grayscale::greyscale;
use super::noise::noise;
use super::params::{FilterConfig, NoiseType};

/// Buffers with at least this many pixels run the per-pixel loop on the
/// rayon pool when using [`apply`].
pub const PARALLEL_THRESHOLD: usize = 64 * 64;

/// The available filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Greyscale,
    Sepia,
    Noise,
    Tint,
    Blur,
}

impl FilterKind {
    pub const ALL: [FilterKind; 5] = [
        FilterKind::Greyscale,
        FilterKind::Sepia,
        FilterKind::Noise,
        FilterKind::Tint,
        FilterKind::Blur,
    ];

    /// Look up a filter by name.
    ///
    /// Case-insensitive, with or without the `filter-` class prefix.
    /// `grayscale` is accepted for `greyscale`. Unknown names give `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        let name = name.strip_prefix("filter-").unwrap_or(&name);
        match name {
            "greyscale" | "grayscale" => Some(FilterKind::Greyscale),
            "sepia" => Some(FilterKind::Sepia),
            "noise" => Some(FilterKind::Noise),
            "tint" => Some(FilterKind::Tint),
            "blur" => Some(FilterKind::Blur),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FilterKind::Greyscale => "greyscale",
            FilterKind::Sepia => "sepia",
            FilterKind::Noise => "noise",
            FilterKind::Tint => "tint",
            FilterKind::Blur => "blur",
        }
    }
}

/// How the per-pixel loop is run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Execution {
    Sequential,
    /// Spread pixels over the rayon thread pool
    Parallel,
}

impl Execution {
    fn for_buffer(buffer: &PixelBuffer) -> Self {
        if buffer.pixel_count() >= PARALLEL_THRESHOLD {
            Execution::Parallel
        } else {
            Execution::Sequential
        }
    }
}

/// The pointwise step selected for one call, with its constants fixed.
#[derive(Clone, Copy, Debug)]
enum Pointwise {
    Greyscale(f32),
    Sepia(f32),
    Noise(f32, NoiseType),
    Tint(f32, Rgb),
}

impl Pointwise {
    #[inline]
    fn apply(self, px: Rgb) -> [f32; 3] {
        match self {
            Pointwise::Greyscale(amount) => greyscale(amount, px),
            Pointwise::Sepia(amount) => sepia(amount, px),
            Pointwise::Noise(amount, noise_type) => {
                noise(amount, noise_type, px, &mut rand::thread_rng())
            }
            Pointwise::Tint(amount, target) => tint(amount, px, target),
        }
    }
}

/// Apply `kind` to `buffer`, choosing sequential or parallel execution by size.
///
/// Dimensions and alpha are preserved; RGB is rounded and clamped to 0-255.
pub fn apply(kind: FilterKind, buffer: PixelBuffer, config: &FilterConfig) -> PixelBuffer {
    let execution = Execution::for_buffer(&buffer);
    apply_with(kind, buffer, config, execution)
}

/// Apply `kind` to `buffer` with an explicit [`Execution`] mode.
pub fn apply_with(
    kind: FilterKind,
    mut buffer: PixelBuffer,
    config: &FilterConfig,
    execution: Execution,
) -> PixelBuffer {
    debug!(
        filter = kind.name(),
        width = buffer.width(),
        height = buffer.height(),
        ?execution,
        "applying filter"
    );

    let step = match kind {
        FilterKind::Blur => {
            gaussian_blur(&mut buffer, config.blur_amount);
            return buffer;
        }
        FilterKind::Greyscale => Pointwise::Greyscale(config.greyscale_amount),
        FilterKind::Sepia => Pointwise::Sepia(config.sepia_amount),
        FilterKind::Noise => Pointwise::Noise(config.noise_amount, config.noise_type),
        FilterKind::Tint => Pointwise::Tint(config.tint_amount, config.tint_color),
    };

    let pixels = Zip::from(buffer.array_mut().lanes_mut(Axis(2)));
    match execution {
        Execution::Sequential => pixels.for_each(|px| {
            let rgb = step.apply(load_rgb(&px));
            store_rgb(px, rgb);
        }),
        Execution::Parallel => pixels.par_for_each(|px| {
            let rgb = step.apply(load_rgb(&px));
            store_rgb(px, rgb);
        }),
    }

    buffer
}

/// Apply a filter looked up by name.
///
/// An unknown name returns the buffer unchanged.
pub fn apply_named(name: &str, buffer: PixelBuffer, config: &FilterConfig) -> PixelBuffer {
    match FilterKind::from_name(name) {
        Some(kind) => apply(kind, buffer, config),
        None => {
            debug!(filter = name, "unknown filter, passing buffer through");
            buffer
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::grayscale::luminance;
    use crate::filters::params::resolve;

    fn primaries() -> PixelBuffer {
        PixelBuffer::from_raw(
            2,
            2,
            vec![
                255, 0, 0, 255, //
                0, 255, 0, 255, //
                0, 0, 255, 255, //
                255, 255, 255, 255,
            ],
        )
        .unwrap()
    }

    fn gradient(width: usize, height: usize) -> PixelBuffer {
        let mut data = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[
                    (x * 7 % 256) as u8,
                    (y * 13 % 256) as u8,
                    ((x + y) * 5 % 256) as u8,
                    ((x * y) % 256) as u8,
                ]);
            }
        }
        PixelBuffer::from_raw(width, height, data).unwrap()
    }

    fn pixel(buf: &PixelBuffer, i: usize) -> (u8, u8, u8, u8) {
        let px = buf.get(i).unwrap();
        (px.r, px.g, px.b, buf.alpha(i).unwrap())
    }

    #[test]
    fn test_greyscale_end_to_end() {
        let config = FilterConfig { greyscale_amount: 1.0, ..FilterConfig::DEFAULT };
        let out = apply(FilterKind::Greyscale, primaries(), &config);

        // 53.55 -> 54, 181.05 -> 181, 17.85 -> 18, 252.45 -> 252
        assert_eq!(pixel(&out, 0), (54, 54, 54, 255));
        assert_eq!(pixel(&out, 1), (181, 181, 181, 255));
        assert_eq!(pixel(&out, 2), (18, 18, 18, 255));
        assert_eq!(pixel(&out, 3), (252, 252, 252, 255));
    }

    #[test]
    fn test_full_greyscale_matches_luminance() {
        let input = gradient(9, 7);
        let out = apply(FilterKind::Greyscale, input.clone(), &FilterConfig::DEFAULT);
        for i in 0..input.pixel_count() {
            let expected = luminance(input.get(i).unwrap()).round_ties_even() as u8;
            let px = out.get(i).unwrap();
            assert_eq!((px.r, px.g, px.b), (expected, expected, expected));
        }
    }

    #[test]
    fn test_zero_amount_is_identity() {
        let input = gradient(11, 5);
        let config = FilterConfig {
            greyscale_amount: 0.0,
            sepia_amount: 0.0,
            tint_amount: 0.0,
            noise_amount: 0.0,
            blur_amount: 0.0,
            ..FilterConfig::DEFAULT
        };
        for kind in FilterKind::ALL {
            let out = apply(kind, input.clone(), &config);
            assert_eq!(out, input, "{kind:?} with zero amount changed the buffer");
        }
        let config = FilterConfig { noise_type: NoiseType::Color, ..config };
        assert_eq!(apply(FilterKind::Noise, input.clone(), &config), input);
    }

    #[test]
    fn test_tint_black_full() {
        let config = resolve([("tint-color", "#000"), ("tint-amount", "1")]).unwrap();
        let out = apply(FilterKind::Tint, gradient(6, 6), &config);
        for i in 0..out.pixel_count() {
            assert_eq!(out.get(i), Some(Rgb::BLACK));
        }
    }

    #[test]
    fn test_sepia_clamps_overflow() {
        let input = PixelBuffer::from_raw(1, 1, vec![255, 255, 255, 9]).unwrap();
        let out = apply(FilterKind::Sepia, input, &FilterConfig::DEFAULT);
        // red and green overshoot 255, blue is 238.935
        assert_eq!(pixel(&out, 0), (255, 255, 239, 9));
    }

    #[test]
    fn test_noise_clamps_underflow() {
        let input = PixelBuffer::from_raw(4, 4, [0u8, 0, 0, 200].repeat(16)).unwrap();
        let config = FilterConfig { noise_amount: 200.0, ..FilterConfig::DEFAULT };
        let out = apply(FilterKind::Noise, input, &config);
        for i in 0..out.pixel_count() {
            assert_eq!(pixel(&out, i), (0, 0, 0, 200));
        }
    }

    #[test]
    fn test_mono_noise_keeps_grey_pixels_grey() {
        let input = PixelBuffer::from_raw(16, 16, [120u8, 120, 120, 255].repeat(256)).unwrap();
        let out = apply(FilterKind::Noise, input, &FilterConfig::DEFAULT);
        let mut changed = 0;
        for i in 0..out.pixel_count() {
            let px = out.get(i).unwrap();
            assert_eq!(px.r, px.g);
            assert_eq!(px.g, px.b);
            assert!((105..=120).contains(&px.r));
            if px.r != 120 {
                changed += 1;
            }
        }
        assert!(changed > 200);
    }

    #[test]
    fn test_color_noise_decorrelated_across_buffer() {
        // 64x64 takes the parallel path, where each worker draws from its own rng
        let input = PixelBuffer::from_raw(64, 64, [120u8, 120, 120, 255].repeat(64 * 64)).unwrap();
        let config = resolve([("noise-type", "color")]).unwrap();
        let out = apply(FilterKind::Noise, input, &config);

        let deltas: Vec<(f64, f64, f64)> = (0..out.pixel_count())
            .map(|i| {
                let px = out.get(i).unwrap();
                (px.r as f64 - 120.0, px.g as f64 - 120.0, px.b as f64 - 120.0)
            })
            .collect();
        let n = deltas.len() as f64;
        let corr = |x: &dyn Fn(&(f64, f64, f64)) -> f64, y: &dyn Fn(&(f64, f64, f64)) -> f64| {
            let mx = deltas.iter().map(x).sum::<f64>() / n;
            let my = deltas.iter().map(y).sum::<f64>() / n;
            let cov: f64 = deltas.iter().map(|d| (x(d) - mx) * (y(d) - my)).sum();
            let vx: f64 = deltas.iter().map(|d| (x(d) - mx).powi(2)).sum();
            let vy: f64 = deltas.iter().map(|d| (y(d) - my).powi(2)).sum();
            cov / (vx * vy).sqrt()
        };

        let rg = corr(&|d| d.0, &|d| d.1);
        let gb = corr(&|d| d.1, &|d| d.2);
        assert!(rg.abs() < 0.1, "r/g deltas correlated: {rg}");
        assert!(gb.abs() < 0.1, "g/b deltas correlated: {gb}");
    }

    #[test]
    fn test_huge_blur_on_tiny_buffer() {
        let input = PixelBuffer::from_raw(2, 2, vec![
            255, 255, 255, 10, 0, 0, 0, 20,
            0, 0, 0, 30, 255, 255, 255, 40,
        ])
        .unwrap();
        let config = resolve([("blur-amount", "1e12")]).unwrap();
        let out = apply(FilterKind::Blur, input.clone(), &config);
        for i in 0..4 {
            let (r, g, b, a) = pixel(&out, i);
            assert!((100..=155).contains(&r), "pixel {i} = {r}");
            assert_eq!((r, r), (g, b));
            assert_eq!(Some(a), input.alpha(i));
        }

        let uniform = PixelBuffer::from_raw(2, 2, [9u8, 99, 199, 255].repeat(4)).unwrap();
        let out = apply(FilterKind::Blur, uniform.clone(), &config);
        assert_eq!(out, uniform);
    }

    #[test]
    fn test_alpha_preserved_for_every_kind() {
        let input = gradient(70, 70);
        for kind in FilterKind::ALL {
            let out = apply(kind, input.clone(), &FilterConfig::DEFAULT);
            assert_eq!(out.width(), input.width());
            assert_eq!(out.height(), input.height());
            for i in 0..input.pixel_count() {
                assert_eq!(out.alpha(i), input.alpha(i), "{kind:?} changed alpha at {i}");
            }
        }
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let input = gradient(33, 17);
        let config = resolve([("tint-color", "#3a7"), ("blur-amount", "1.5")]).unwrap();
        for kind in [FilterKind::Greyscale, FilterKind::Sepia, FilterKind::Tint, FilterKind::Blur] {
            let seq = apply_with(kind, input.clone(), &config, Execution::Sequential);
            let par = apply_with(kind, input.clone(), &config, Execution::Parallel);
            assert_eq!(seq, par, "{kind:?} differs between execution modes");
        }
    }

    #[test]
    fn test_unknown_name_passes_through() {
        let input = gradient(3, 3);
        let out = apply_named("filter-emboss", input.clone(), &FilterConfig::DEFAULT);
        assert_eq!(out, input);
    }

    #[test]
    fn test_named_dispatch() {
        let via_name = apply_named("filter-greyscale", primaries(), &FilterConfig::DEFAULT);
        let via_kind = apply(FilterKind::Greyscale, primaries(), &FilterConfig::DEFAULT);
        assert_eq!(via_name, via_kind);
    }

    #[test]
    fn test_kind_names() {
        for kind in FilterKind::ALL {
            assert_eq!(FilterKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(FilterKind::from_name("Filter-Grayscale"), Some(FilterKind::Greyscale));
        assert_eq!(FilterKind::from_name(" tint "), Some(FilterKind::Tint));
        assert_eq!(FilterKind::from_name("posterize"), None);
    }

    #[test]
    fn test_blur_runs_before_return() {
        let mut data = [0u8, 0, 0, 255].repeat(25);
        data[12 * 4..12 * 4 + 3].copy_from_slice(&[255, 255, 255]);
        let input = PixelBuffer::from_raw(5, 5, data).unwrap();
        let out = apply(FilterKind::Blur, input, &FilterConfig::DEFAULT);
        let centre = out.get(12).unwrap().r;
        let neighbour = out.get(13).unwrap().r;
        assert!(centre < 255 && centre > 0);
        assert!(neighbour > 0);
    }
}
