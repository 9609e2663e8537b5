//! Core utilities shared by the pixel stages.
//!
//! Currently just Gaussian kernel generation for the denoising pass.

/// Kernel size derived from sigma when the caller does not fix one.
///
/// 6 sigma covers 99.7% of the distribution; forced odd.
pub fn auto_kernel_size(sigma: f32) -> usize {
    ((sigma * 6.0).ceil() as usize) | 1
}

/// Generate a normalized 1D Gaussian kernel.
///
/// # Arguments
/// * `size` - Number of taps, must be odd. `0` derives it from `sigma`.
/// * `sigma` - Standard deviation, must be positive (callers validate)
///
/// # Returns
/// Taps summing to 1, symmetric around the center tap.
pub fn gaussian_kernel_1d(size: usize, sigma: f32) -> Vec<f32> {
    let size = if size == 0 { auto_kernel_size(sigma) } else { size };
    let half = (size / 2) as f32;
    let denom = 2.0 * sigma * sigma;

    let weights: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - half;
            (-d * d / denom).exp()
        })
        .collect();

    let total: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}
