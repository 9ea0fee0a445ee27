//! Paintbrush Rust Extensions
//!
//! Declarative image filters (greyscale, sepia, noise, tint, blur) for
//! decoded RGBA rasters, with Python bindings via PyO3 and WASM bindings
//! for JavaScript.
//!
//! ## Image Format
//! Buffers are RGBA, 8 bits per channel, row-major:
//! (height, width, 4) as `u8`.
//!
//! ## Flow
//! 1. [`filters::resolve`] turns string overrides into a [`filters::FilterConfig`]
//! 2. [`filters::load`] wraps a decoded source, or reports it not ready yet
//! 3. [`filters::apply`] runs the filter and returns the mutated buffer
//!
//! [`pipeline`] ties these together per target element, tracking readiness
//! and keeping one element's failure from affecting the others.
//!
//! ## Logging
//! Diagnostics go through `tracing`. No subscriber is installed here.

pub mod error;
pub mod filters;
pub mod pipeline;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, Result};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use std::collections::HashMap;

    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::filters::{apply_named, resolve, PixelBuffer};

    fn to_py_err(err: crate::Error) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    /// Apply a named filter to an RGBA u8 image.
    ///
    /// # Arguments
    /// * `image` - RGBA image (height, width, 4) as u8
    /// * `kind` - Filter name: greyscale, sepia, noise, tint or blur
    /// * `params` - Optional string overrides, e.g. {"tint-color": "#C90"}
    ///
    /// Unknown filter names return an unchanged copy.
    #[pyfunction]
    #[pyo3(signature = (image, kind, params=None))]
    pub fn apply_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        kind: &str,
        params: Option<HashMap<String, String>>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let config = resolve(params.unwrap_or_default()).map_err(to_py_err)?;
        let buffer = PixelBuffer::from_array(image.as_array().to_owned()).map_err(to_py_err)?;
        let result = py.allow_threads(|| apply_named(kind, buffer, &config));
        Ok(result.into_array().into_pyarray(py))
    }

    /// Paintbrush Rust extension module
    #[pymodule]
    pub fn paintbrush_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(apply_filter, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::paintbrush_rust;
