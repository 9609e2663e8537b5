//! WebAssembly exports for the edge pipeline.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Browser
//! camera frames usually arrive as RGBA, so callers convert to NV21/NV12
//! first (or use a decoder that already hands out 4:2:0 bytes).

use wasm_bindgen::prelude::*;

use crate::filters::yuv::ChromaOrder;
use crate::processor::{self, EdgeParams};

/// Detect edges in a semi-planar 4:2:0 frame.
///
/// # Arguments
/// * `data` - Frame bytes (length >= width * (height + height/2))
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `nv12` - `true` for U,V chroma order, `false` for NV21
///
/// # Returns
/// Flat array of width * height packed ARGB pixels, or throws a string
#[wasm_bindgen]
pub fn process_frame_wasm(
    data: &[u8],
    width: u32,
    height: u32,
    nv12: bool,
) -> Result<Vec<u32>, JsValue> {
    let chroma_order = if nv12 { ChromaOrder::Uv } else { ChromaOrder::Vu };
    let params = EdgeParams {
        chroma_order,
        ..Default::default()
    };
    processor::render_with(params, data, i64::from(width), i64::from(height))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Check that the edge pipeline is usable.
#[wasm_bindgen]
pub fn init_library_wasm() -> bool {
    processor::init_library()
}
