//! Pixel stages of the edge pipeline.
//!
//! ## Formats
//!
//! | Stage | Input | Output |
//! |-------|-------|--------|
//! | `yuv` | NV21/NV12 bytes, (W, H) | RGB8 `Array3<u8>` (H, W, 3) |
//! | `grayscale` | RGB8 `ArrayView3<u8>` (H, W, 3) | `GrayImage` |
//! | `blur` | `GrayImage` | `GrayImage` |
//! | `edge` | `GrayImage` | binary `GrayImage`, then packed ARGB `[u32]` |
//!
//! Each stage is a plain function over borrowed data. Canny takes its Sobel
//! gradients from `imageproc`; nothing here runs on worker threads.

pub mod core;
pub mod yuv;
pub mod grayscale;
pub mod blur;
pub mod edge;
