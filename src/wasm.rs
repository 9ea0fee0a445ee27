//! WebAssembly exports for paintbrush filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Buffers are
//! flat RGBA byte arrays, as returned by `ImageData.data`.

use wasm_bindgen::prelude::*;

use crate::filters::{apply_named, resolve, PixelBuffer};

fn to_js_err(err: crate::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Apply a named filter to an RGBA u8 image.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `kind` - Filter name, e.g. "filter-sepia"
/// * `keys` / `values` - Parameter overrides, paired by position
///
/// # Returns
/// Flat array of filtered RGBA bytes
#[wasm_bindgen]
pub fn apply_filter_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    kind: &str,
    keys: Vec<String>,
    values: Vec<String>,
) -> Result<Vec<u8>, JsValue> {
    if keys.len() != values.len() {
        return Err(JsValue::from_str("keys and values must have the same length"));
    }
    let config = resolve(keys.into_iter().zip(values)).map_err(to_js_err)?;
    let buffer = PixelBuffer::from_raw(width, height, data.to_vec()).map_err(to_js_err)?;
    Ok(apply_named(kind, buffer, &config).into_raw())
}
