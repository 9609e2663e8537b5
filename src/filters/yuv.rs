//! Semi-planar 4:2:0 camera frames (NV21 / NV12).
//!
//! ## Layout
//!
//! | Plane | Offset | Shape | Contents |
//! |-------|--------|-------|----------|
//! | Luma | 0 | (H, W) | one Y byte per pixel |
//! | Chroma | W*H | (H/2, W/2, 2) | one interleaved chroma pair per 2x2 block |
//!
//! NV21 (the Android camera default) stores each pair as V,U; NV12 as U,V.
//! Total length is `W * (H + H/2)`.
//!
//! Conversion uses ITU-R BT.601 video-range coefficients in 20-bit fixed
//! point, the same arithmetic camera stacks use for `YUV2RGB_NV21`.

use ndarray::{Array3, ArrayView2, ArrayView3};

use crate::error::{ProcessingError, Result};

const STAGE: &str = "yuv_to_rgb";

// BT.601 video range, scaled by 2^20
const COEF_SHIFT: i32 = 20;
const COEF_Y: i32 = 1_220_542; // 1.164
const COEF_UB: i32 = 2_116_026; // 2.018
const COEF_UG: i32 = -409_993; // -0.391
const COEF_VG: i32 = -852_492; // -0.813
const COEF_VR: i32 = 1_673_527; // 1.596
const ROUND: i32 = 1 << (COEF_SHIFT - 1);

/// Byte order of each interleaved chroma pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChromaOrder {
    /// V then U (NV21)
    #[default]
    Vu,
    /// U then V (NV12)
    Uv,
}

impl ChromaOrder {
    /// Parse a pixel-format name such as "nv21" or "NV12".
    pub fn from_format_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "nv21" | "vu" => Some(ChromaOrder::Vu),
            "nv12" | "uv" => Some(ChromaOrder::Uv),
            _ => None,
        }
    }

    #[inline]
    fn split(self, pair: (u8, u8)) -> (u8, u8) {
        match self {
            ChromaOrder::Vu => (pair.1, pair.0),
            ChromaOrder::Uv => pair,
        }
    }
}

/// Number of bytes a 4:2:0 semi-planar frame of this geometry occupies.
///
/// Returns `None` if the size overflows `usize`.
pub fn frame_len(width: usize, height: usize) -> Option<usize> {
    width.checked_mul(height.checked_add(height / 2)?)
}

/// Borrowed view of one semi-planar 4:2:0 frame.
#[derive(Debug, Clone, Copy)]
pub struct YuvFrame<'a> {
    luma: ArrayView2<'a, u8>,
    chroma: ArrayView3<'a, u8>,
    order: ChromaOrder,
}

impl<'a> YuvFrame<'a> {
    /// Wrap `data` as a `width` x `height` frame.
    ///
    /// Dimensions must be non-zero and even. Extra trailing bytes are
    /// ignored; an empty or short buffer is an input error.
    pub fn new(data: &'a [u8], width: usize, height: usize, order: ChromaOrder) -> Result<Self> {
        if data.is_empty() {
            return Err(ProcessingError::input("frame buffer is missing or empty"));
        }
        if width == 0 || height == 0 {
            return Err(ProcessingError::stage(
                STAGE,
                format!("frame dimensions must be non-zero, got {}x{}", width, height),
            ));
        }
        if width % 2 != 0 || height % 2 != 0 {
            return Err(ProcessingError::stage(
                STAGE,
                format!("4:2:0 frames need even dimensions, got {}x{}", width, height),
            ));
        }

        let required = frame_len(width, height)
            .ok_or_else(|| ProcessingError::stage(STAGE, "frame size overflows"))?;
        if data.len() < required {
            return Err(ProcessingError::input(format!(
                "frame buffer holds {} bytes, {}x{} needs {}",
                data.len(),
                width,
                height,
                required
            )));
        }

        let luma_len = width * height;
        let luma = ArrayView2::from_shape((height, width), &data[..luma_len])
            .map_err(|e| ProcessingError::stage(STAGE, e.to_string()))?;
        let chroma = ArrayView3::from_shape((height / 2, width / 2, 2), &data[luma_len..required])
            .map_err(|e| ProcessingError::stage(STAGE, e.to_string()))?;

        Ok(Self { luma, chroma, order })
    }

    pub fn width(&self) -> usize {
        self.luma.ncols()
    }

    pub fn height(&self) -> usize {
        self.luma.nrows()
    }

    /// (U, V) for the 2x2 block containing pixel (y, x).
    #[inline]
    pub fn chroma_at(&self, y: usize, x: usize) -> (u8, u8) {
        let (cy, cx) = (y / 2, x / 2);
        self.order
            .split((self.chroma[[cy, cx, 0]], self.chroma[[cy, cx, 1]]))
    }

    /// Convert to an RGB image of shape (height, width, 3).
    pub fn to_rgb(&self) -> Array3<u8> {
        let (height, width) = (self.height(), self.width());
        let mut output = Array3::<u8>::zeros((height, width, 3));

        for y in 0..height {
            for x in 0..width {
                let (u, v) = self.chroma_at(y, x);
                let [r, g, b] = yuv_to_rgb_pixel(self.luma[[y, x]], u, v);
                output[[y, x, 0]] = r;
                output[[y, x, 1]] = g;
                output[[y, x, 2]] = b;
            }
        }

        output
    }
}

/// Convert one BT.601 video-range YUV sample to RGB.
#[inline]
pub fn yuv_to_rgb_pixel(y: u8, u: u8, v: u8) -> [u8; 3] {
    let luma = (y as i32 - 16).max(0) * COEF_Y;
    let u = u as i32 - 128;
    let v = v as i32 - 128;

    let r = (luma + COEF_VR * v + ROUND) >> COEF_SHIFT;
    let g = (luma + COEF_VG * v + COEF_UG * u + ROUND) >> COEF_SHIFT;
    let b = (luma + COEF_UB * u + ROUND) >> COEF_SHIFT;

    [saturate(r), saturate(g), saturate(b)]
}

#[inline]
fn saturate(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}
