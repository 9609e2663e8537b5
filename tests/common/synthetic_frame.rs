//! NV21 frame generators for pipeline tests.

/// Neutral chroma (no color).
pub const NEUTRAL_CHROMA: u8 = 128;

/// Wraps a luma plane into a full NV21 buffer with neutral chroma.
pub fn nv21_from_luma(luma: &[u8], width: usize, height: usize) -> Vec<u8> {
    assert_eq!(luma.len(), width * height, "luma plane size mismatch");
    let mut frame = luma.to_vec();
    frame.resize(width * (height + height / 2), NEUTRAL_CHROMA);
    frame
}

/// Constant luma, constant chroma.
pub fn uniform_nv21(width: usize, height: usize, luma: u8) -> Vec<u8> {
    nv21_from_luma(&vec![luma; width * height], width, height)
}

/// Left of `step_x` is `low`, the rest is `high`.
pub fn vertical_step_nv21(width: usize, height: usize, step_x: usize, low: u8, high: u8) -> Vec<u8> {
    let mut luma = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            luma[y * width + x] = if x < step_x { low } else { high };
        }
    }
    nv21_from_luma(&luma, width, height)
}

/// High-contrast checkerboard luma.
pub fn checkerboard_nv21(width: usize, height: usize, cell: usize) -> Vec<u8> {
    assert!(cell > 0, "cell size must be positive");
    let mut luma = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let sum = x / cell + y / cell;
            luma[y * width + x] = if sum % 2 == 0 { 32 } else { 220 };
        }
    }
    nv21_from_luma(&luma, width, height)
}

/// Deterministic pseudo-random bytes for every plane (luma and chroma).
pub fn noise_nv21(width: usize, height: usize, seed: u32) -> Vec<u8> {
    let mut state = seed.max(1);
    (0..width * (height + height / 2))
        .map(|_| {
            // xorshift32
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}
