//! RGB to single-channel luminance.
//!
//! Camera frames are BT.601 material, so BT.601 weights are used.

use image::GrayImage;
use ndarray::ArrayView3;

use crate::error::{ProcessingError, Result};

const STAGE: &str = "rgb_to_gray";

/// ITU-R BT.601 luminosity coefficients
const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

/// Collapse an RGB image to one luminance channel.
///
/// # Arguments
/// * `input` - RGB image (height, width, 3)
///
/// # Returns
/// Grayscale image with the same width and height
pub fn luminance_u8(input: ArrayView3<u8>) -> Result<GrayImage> {
    let (height, width, channels) = input.dim();
    if channels != 3 {
        return Err(ProcessingError::stage(
            STAGE,
            format!("expected 3 channels, got {}", channels),
        ));
    }

    let w = u32::try_from(width).map_err(|_| ProcessingError::stage(STAGE, "width exceeds u32"))?;
    let h = u32::try_from(height).map_err(|_| ProcessingError::stage(STAGE, "height exceeds u32"))?;

    let mut output = GrayImage::new(w, h);
    for (x, y, pixel) in output.enumerate_pixels_mut() {
        let (row, col) = (y as usize, x as usize);
        let r = input[[row, col, 0]] as f32;
        let g = input[[row, col, 1]] as f32;
        let b = input[[row, col, 2]] as f32;
        pixel.0[0] = (LUMA_R * r + LUMA_G * g + LUMA_B * b).round().clamp(0.0, 255.0) as u8;
    }

    Ok(output)
}
