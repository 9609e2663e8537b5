//! Gaussian smoothing for grayscale frames.
//!
//! Separable 2-pass convolution with a fixed-size kernel. Both passes run in
//! f32 and the result is rounded once, so flat regions keep their level.
//! Border pixels are extended outward.

use image::GrayImage;
use ndarray::Array2;

use super::core::gaussian_kernel_1d;
use crate::error::{ProcessingError, Result};

const STAGE: &str = "gaussian_blur";

/// Apply Gaussian blur to a grayscale image.
///
/// # Arguments
/// * `image` - Single-channel image
/// * `kernel_size` - Odd tap count per axis (5 for a 5x5 window), or 0 to
///   derive it from `sigma`
/// * `sigma` - Standard deviation of the Gaussian
///
/// # Returns
/// Blurred image with same dimensions
pub fn gaussian_blur_gray(image: &GrayImage, kernel_size: usize, sigma: f32) -> Result<GrayImage> {
    if kernel_size != 0 && kernel_size % 2 == 0 {
        return Err(ProcessingError::stage(
            STAGE,
            format!("kernel size must be odd, got {}", kernel_size),
        ));
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ProcessingError::stage(
            STAGE,
            format!("sigma must be positive, got {}", sigma),
        ));
    }

    let kernel = gaussian_kernel_1d(kernel_size, sigma);
    let half = (kernel.len() / 2) as isize;
    let (width, height) = (image.width() as usize, image.height() as usize);
    if width == 0 || height == 0 {
        return Ok(image.clone());
    }
    let src = image.as_raw();

    // Horizontal pass
    let mut temp = Array2::<f32>::zeros((height, width));
    for y in 0..height {
        let row = &src[y * width..(y + 1) * width];
        for x in 0..width {
            let mut sum = 0.0f32;
            for (ki, &kv) in kernel.iter().enumerate() {
                let sx = (x as isize + ki as isize - half).clamp(0, width as isize - 1) as usize;
                sum += row[sx] as f32 * kv;
            }
            temp[[y, x]] = sum;
        }
    }

    // Vertical pass, rounded back to u8
    let mut output = GrayImage::new(image.width(), image.height());
    for (x, y, pixel) in output.enumerate_pixels_mut() {
        let (x, y) = (x as usize, y as usize);
        let mut sum = 0.0f32;
        for (ki, &kv) in kernel.iter().enumerate() {
            let sy = (y as isize + ki as isize - half).clamp(0, height as isize - 1) as usize;
            sum += temp[[sy, x]] * kv;
        }
        pixel.0[0] = sum.round().clamp(0.0, 255.0) as u8;
    }

    Ok(output)
}
