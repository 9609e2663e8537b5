//! Canny edge detection and the two-valued ARGB edge image.
//!
//! The detector produces a binary mask (0 or 255). Callers consume it as
//! packed 32-bit ARGB where only two values ever appear:
//!
//! | Mask | Pixel | Meaning |
//! |------|-------|---------|
//! | non-zero | `0xFFFFFFFF` | opaque white, edge |
//! | zero | `0xFF000000` | opaque black, background |

use image::GrayImage;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};
use ndarray::Array2;

use crate::error::{ProcessingError, Result};

/// Opaque white, written for every edge pixel.
pub const EDGE_PIXEL: u32 = 0xFFFF_FFFF;

/// Opaque black, written for every background pixel.
pub const BACKGROUND_PIXEL: u32 = 0xFF00_0000;

const TAN_22_5: f32 = 0.414_213_56;
const TAN_67_5: f32 = 2.414_213_6;

/// Run Canny edge detection with hysteresis thresholds.
///
/// The input is expected to be smoothed already; no further blur is applied
/// here. Gradients are 3x3 Sobel and the magnitude is `|gx| + |gy|`. After
/// non-maximum suppression, pixels above `high` are definite edges and
/// pixels above `low` survive only when 8-connected to a definite edge. The
/// outermost ring of pixels is never marked.
///
/// # Returns
/// Binary mask with the same dimensions (255 = edge, 0 = background)
pub fn canny_edges(image: &GrayImage, low: f32, high: f32) -> Result<GrayImage> {
    if !(low.is_finite() && high.is_finite()) || low < 0.0 || low > high {
        return Err(ProcessingError::stage(
            "canny",
            format!("invalid thresholds low={} high={}", low, high),
        ));
    }

    let (width, height) = (image.width() as usize, image.height() as usize);
    let mut mask = GrayImage::new(image.width(), image.height());
    if width < 3 || height < 3 {
        return Ok(mask);
    }

    let gx = horizontal_sobel(image);
    let gy = vertical_sobel(image);
    let magnitude = Array2::from_shape_fn((height, width), |(y, x)| {
        let (dx, dy) = (gx.get_pixel(x as u32, y as u32)[0], gy.get_pixel(x as u32, y as u32)[0]);
        (dx as f32).abs() + (dy as f32).abs()
    });

    // Non-maximum suppression along the quantized gradient direction
    let mut candidate = Array2::<bool>::from_elem((height, width), false);
    let mut seeds = Vec::new();
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let m = magnitude[[y, x]];
            if m <= low {
                continue;
            }
            let dx = gx.get_pixel(x as u32, y as u32)[0] as f32;
            let dy = gy.get_pixel(x as u32, y as u32)[0] as f32;
            let (ax, ay) = (dx.abs(), dy.abs());

            let (prev, next) = if ay <= ax * TAN_22_5 {
                (magnitude[[y, x - 1]], magnitude[[y, x + 1]])
            } else if ay >= ax * TAN_67_5 {
                (magnitude[[y - 1, x]], magnitude[[y + 1, x]])
            } else if (dx > 0.0) == (dy > 0.0) {
                (magnitude[[y - 1, x - 1]], magnitude[[y + 1, x + 1]])
            } else {
                (magnitude[[y - 1, x + 1]], magnitude[[y + 1, x - 1]])
            };

            // Strict on one side so a two-pixel plateau yields one ridge pixel
            if m > prev && m >= next {
                candidate[[y, x]] = true;
                if m > high {
                    seeds.push((y, x));
                }
            }
        }
    }

    // Hysteresis: grow from definite edges through connected candidates
    while let Some((y, x)) = seeds.pop() {
        if mask.get_pixel(x as u32, y as u32)[0] != 0 {
            continue;
        }
        mask.put_pixel(x as u32, y as u32, image::Luma([255]));
        for ny in y - 1..=y + 1 {
            for nx in x - 1..=x + 1 {
                if candidate[[ny, nx]] && mask.get_pixel(nx as u32, ny as u32)[0] == 0 {
                    seeds.push((ny, nx));
                }
            }
        }
    }

    Ok(mask)
}

/// Re-encode a detector mask as packed ARGB into `output`.
///
/// `output` must hold at least `width * height` pixels; pixels past that are
/// left untouched.
pub fn write_argb_mask(mask: &GrayImage, output: &mut [u32]) -> Result<()> {
    let count = mask.as_raw().len();
    if output.len() < count {
        return Err(ProcessingError::input(format!(
            "output buffer holds {} pixels, need {}",
            output.len(),
            count
        )));
    }

    for (dst, &m) in output.iter_mut().zip(mask.as_raw()) {
        *dst = if m != 0 { EDGE_PIXEL } else { BACKGROUND_PIXEL };
    }
    Ok(())
}

/// Count edge pixels in a packed ARGB buffer.
pub fn count_edge_pixels(pixels: &[u32]) -> usize {
    pixels.iter().filter(|&&p| p == EDGE_PIXEL).count()
}
