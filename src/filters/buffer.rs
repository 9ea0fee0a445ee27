//! RGBA pixel buffer and the load guard for not-yet-ready sources.
//!
//! Pixels are stored as an (height, width, 4) `u8` array in standard
//! (row-major) layout, so pixel `i` sits at row `i / width`, column
//! `i % width`. All RGB writes go through [`store_rgb`], which rounds and
//! clamps; alpha is never written after construction.

use ndarray::{s, Array3, ArrayView3, ArrayViewMut1};

use super::color::{to_channel, Rgb};
use crate::error::{Error, Result};

/// A decoded RGBA raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Array3<u8>,
}

impl PixelBuffer {
    /// Create a fully transparent black buffer.
    pub fn new(width: usize, height: usize) -> Self {
        PixelBuffer {
            data: Array3::<u8>::zeros((height, width, 4)),
        }
    }

    /// Wrap raw row-major RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] unless
    /// `data.len() == width * height * 4`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(Error::InvalidDimension { width, height })?;
        if data.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        let data = Array3::from_shape_vec((height, width, 4), data).map_err(|_| {
            Error::InvalidDimension { width, height }
        })?;
        Ok(PixelBuffer { data })
    }

    /// Wrap an existing (height, width, 4) array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the array does not have
    /// exactly 4 channels.
    pub fn from_array(data: Array3<u8>) -> Result<Self> {
        let (height, width, channels) = data.dim();
        if channels != 4 {
            return Err(Error::DimensionMismatch {
                expected: height * width * 4,
                actual: data.len(),
            });
        }
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().into_owned()
        };
        Ok(PixelBuffer { data })
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn pixel_count(&self) -> usize {
        self.width() * self.height()
    }

    /// Read-only view of the underlying (height, width, 4) array.
    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    pub(crate) fn array(&self) -> &Array3<u8> {
        &self.data
    }

    pub(crate) fn array_mut(&mut self) -> &mut Array3<u8> {
        &mut self.data
    }

    /// Consume the buffer, returning the array.
    pub fn into_array(self) -> Array3<u8> {
        self.data
    }

    /// Consume the buffer, returning row-major RGBA bytes.
    pub fn into_raw(self) -> Vec<u8> {
        let (raw, _offset) = self.data.into_raw_vec_and_offset();
        raw
    }

    fn position(&self, index: usize) -> Option<(usize, usize)> {
        let width = self.width();
        if index >= self.pixel_count() {
            return None;
        }
        Some((index / width, index % width))
    }

    /// Get the RGB channels of pixel `index`.
    ///
    /// Returns `None` if `index` is out of bounds.
    pub fn get(&self, index: usize) -> Option<Rgb> {
        let (y, x) = self.position(index)?;
        Some(Rgb::new(
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
        ))
    }

    /// Get the alpha channel of pixel `index`.
    pub fn alpha(&self, index: usize) -> Option<u8> {
        let (y, x) = self.position(index)?;
        Some(self.data[[y, x, 3]])
    }

    /// Set the RGB channels of pixel `index`, rounding and clamping each
    /// to 0-255. Alpha is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `index` is out of bounds.
    pub fn set(&mut self, index: usize, r: f32, g: f32, b: f32) -> Result<()> {
        let (y, x) = self.position(index).ok_or(Error::IndexOutOfBounds {
            index,
            len: self.pixel_count(),
        })?;
        store_rgb(self.data.slice_mut(s![y, x, ..]), [r, g, b]);
        Ok(())
    }
}

/// Read the RGB channels of one pixel lane.
#[inline]
pub(crate) fn load_rgb(px: &ArrayViewMut1<u8>) -> Rgb {
    Rgb::new(px[0], px[1], px[2])
}

/// Write computed RGB values into one pixel lane. Index 3 (alpha) is never touched.
#[inline]
pub(crate) fn store_rgb(mut px: ArrayViewMut1<u8>, rgb: [f32; 3]) {
    px[0] = to_channel(rgb[0]);
    px[1] = to_channel(rgb[1]);
    px[2] = to_channel(rgb[2]);
}

/// An external image that may not have finished loading.
///
/// Decoding is the implementor's concern; the core only needs the
/// dimensions and the decoded bytes.
pub trait RasterSource {
    /// Current (width, height). Zero in either means "not loaded yet".
    fn dimensions(&self) -> (usize, usize);

    /// Decoded row-major RGBA bytes, `width * height * 4` long.
    fn rgba(&self) -> Result<Vec<u8>>;
}

/// Outcome of [`load`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Loaded {
    Ready(PixelBuffer),
    /// The source has no pixels yet; try again once it has loaded.
    NotReady,
}

/// Load a source into a [`PixelBuffer`].
///
/// A zero-width or zero-height source yields [`Loaded::NotReady`].
///
/// # Errors
///
/// Propagates source failures and returns [`Error::DimensionMismatch`] if
/// the decoded bytes disagree with the reported dimensions.
pub fn load<S: RasterSource + ?Sized>(source: &S) -> Result<Loaded> {
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return Ok(Loaded::NotReady);
    }
    let data = source.rgba()?;
    PixelBuffer::from_raw(width, height, data).map(Loaded::Ready)
}
