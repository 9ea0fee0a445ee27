//! Filter modules for RGBA pixel buffers.
//!
//! ## Buffer Format
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | RGBA8 | (H, W, 4) | u8 | Red, green, blue, alpha, 0-255, row-major |
//!
//! ## Architecture
//!
//! - **Pointwise transforms** (greyscale, sepia, tint, noise) are pure
//!   functions of one pixel's channels, returning unclamped `f32` values
//! - **Blur** is the one neighborhood transform and runs as a full pass
//!   before anything else touches the buffer
//! - **Single writer** - every RGB write rounds and clamps to 0-255
//! - **Alpha preservation** - no filter writes the alpha channel
//! - **Thread-safe** - the pointwise loop can run on the rayon pool
//!
//! ## Filters
//!
//! | Kind | Parameters |
//! |------|------------|
//! | greyscale | `greyscale-amount` |
//! | sepia | `sepia-amount` |
//! | noise | `noise-amount`, `noise-type` |
//! | tint | `tint-amount`, `tint-color` |
//! | blur | `blur-amount` |

pub mod color;
pub mod params;
pub mod buffer;

// Transforms
pub mod grayscale;
pub mod color_adjust;
pub mod noise;
pub mod core;
pub mod blur;

pub mod dispatch;

pub use buffer::{load, Loaded, PixelBuffer, RasterSource};
pub use color::Rgb;
pub use dispatch::{apply, apply_named, apply_with, Execution, FilterKind};
pub use params::{resolve, FilterConfig, NoiseType};
