//! OpenEdge native bridge
//!
//! Camera-frame edge detection exposed to managed runtimes: JNI for the
//! Android app, plus Python bindings via PyO3 and WASM bindings for
//! JavaScript.
//!
//! ## Frame Format
//! Input frames are semi-planar 4:2:0 YUV as delivered by camera stacks:
//! - **NV21** (default): Y plane, then interleaved V,U pairs
//! - **NV12**: Y plane, then interleaved U,V pairs
//!
//! A `width` x `height` frame is `width * (height + height/2)` bytes.
//!
//! ## Edge Image
//! Output is `width * height` packed 32-bit ARGB pixels holding exactly two
//! values: `0xFFFFFFFF` (edge) and `0xFF000000` (background).
//!
//! ## Boundary Contract
//! Every entry point is synchronous, keeps no state between calls and never
//! lets a panic cross the language boundary. Failures come back as a
//! [`ProcessingError`] (Rust), status `-1` (JNI), `ValueError` (Python) or a
//! thrown string (WASM). Diagnostics go through the `log` facade; the host
//! installs whatever logger it wants.

pub mod error;
pub mod filters;
pub mod processor;

#[cfg(feature = "jni")]
pub mod android;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{ProcessingError, Result, STATUS_FAILURE, STATUS_OK};
pub use filters::edge::{BACKGROUND_PIXEL, EDGE_PIXEL};
pub use filters::yuv::ChromaOrder;
pub use processor::{init_library, process_frame, render_with, EdgeParams, FrameEdgeProcessor};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray1, PyReadonlyArray1};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::error::ProcessingError;
    use crate::filters::yuv::ChromaOrder;
    use crate::processor::{self, EdgeParams};

    fn to_py_err(err: ProcessingError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    /// Detect edges in a semi-planar 4:2:0 camera frame.
    ///
    /// # Arguments
    /// * `frame` - Flat uint8 array of length width * (height + height/2)
    /// * `width`, `height` - Frame geometry in pixels
    /// * `pixel_format` - "nv21" (default) or "nv12"
    /// * `blur_kernel_size` - Odd Gaussian window (default: 5)
    /// * `blur_sigma` - Gaussian sigma (default: 1.5)
    /// * `low_threshold`, `high_threshold` - Canny hysteresis (default: 50, 150)
    ///
    /// # Returns
    /// Flat uint32 array of width * height ARGB pixels
    #[pyfunction]
    #[pyo3(signature = (
        frame, width, height, pixel_format="nv21",
        blur_kernel_size=5, blur_sigma=1.5, low_threshold=50.0, high_threshold=150.0
    ))]
    #[allow(clippy::too_many_arguments)]
    pub fn process_frame<'py>(
        py: Python<'py>,
        frame: PyReadonlyArray1<'py, u8>,
        width: i64,
        height: i64,
        pixel_format: &str,
        blur_kernel_size: usize,
        blur_sigma: f32,
        low_threshold: f32,
        high_threshold: f32,
    ) -> PyResult<Bound<'py, PyArray1<u32>>> {
        let chroma_order = ChromaOrder::from_format_name(pixel_format)
            .ok_or_else(|| PyValueError::new_err(format!("unsupported pixel format: {}", pixel_format)))?;
        let params = EdgeParams {
            chroma_order,
            blur_kernel_size,
            blur_sigma,
            low_threshold,
            high_threshold,
        };

        let data = frame.as_slice()?;
        let pixels = processor::render_with(params, data, width, height).map_err(to_py_err)?;
        Ok(pixels.into_pyarray(py))
    }

    /// Check that the edge pipeline is usable.
    #[pyfunction]
    pub fn init_library() -> bool {
        processor::init_library()
    }

    /// OpenEdge native extension module
    #[pymodule]
    pub fn openedge_native(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(process_frame, m)?)?;
        m.add_function(wrap_pyfunction!(init_library, m)?)?;
        m.add("EDGE_PIXEL", crate::EDGE_PIXEL)?;
        m.add("BACKGROUND_PIXEL", crate::BACKGROUND_PIXEL)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::openedge_native;
