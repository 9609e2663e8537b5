//! Frame edge processor.
//!
//! One synchronous call turns a semi-planar 4:2:0 camera frame into a
//! two-valued ARGB edge image:
//!
//! ```text
//! NV21 bytes ─▶ RGB ─▶ luminance ─▶ Gaussian 5x5 σ1.5 ─▶ Canny 50/150 ─▶ ARGB
//! ```
//!
//! Nothing is retained between calls. Every intermediate buffer is owned by
//! the call and dropped on every exit path.

use std::panic::{catch_unwind, AssertUnwindSafe};

use log::{debug, error};

use crate::error::{panic_message, ProcessingError, Result};
use crate::filters::blur::gaussian_blur_gray;
use crate::filters::edge::{canny_edges, count_edge_pixels, write_argb_mask, BACKGROUND_PIXEL};
use crate::filters::grayscale::luminance_u8;
use crate::filters::yuv::{frame_len, ChromaOrder, YuvFrame};

pub const DEFAULT_BLUR_KERNEL_SIZE: usize = 5;
pub const DEFAULT_BLUR_SIGMA: f32 = 1.5;
pub const DEFAULT_LOW_THRESHOLD: f32 = 50.0;
pub const DEFAULT_HIGH_THRESHOLD: f32 = 150.0;

/// Tunable pipeline parameters. `Default` is the fixed camera preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeParams {
    pub chroma_order: ChromaOrder,
    /// Odd Gaussian window size, or 0 to derive it from the sigma.
    pub blur_kernel_size: usize,
    pub blur_sigma: f32,
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self {
            chroma_order: ChromaOrder::Vu,
            blur_kernel_size: DEFAULT_BLUR_KERNEL_SIZE,
            blur_sigma: DEFAULT_BLUR_SIGMA,
            low_threshold: DEFAULT_LOW_THRESHOLD,
            high_threshold: DEFAULT_HIGH_THRESHOLD,
        }
    }
}

impl EdgeParams {
    pub fn validate(&self) -> Result<()> {
        if self.blur_kernel_size != 0 && self.blur_kernel_size % 2 == 0 {
            return Err(ProcessingError::stage(
                "params",
                format!("blur kernel size must be odd or 0, got {}", self.blur_kernel_size),
            ));
        }
        if !self.blur_sigma.is_finite() || self.blur_sigma <= 0.0 {
            return Err(ProcessingError::stage(
                "params",
                format!("blur sigma must be positive, got {}", self.blur_sigma),
            ));
        }
        let (low, high) = (self.low_threshold, self.high_threshold);
        if !(low.is_finite() && high.is_finite()) || low < 0.0 || low > high {
            return Err(ProcessingError::stage(
                "params",
                format!("thresholds must satisfy 0 <= low <= high, got {}/{}", low, high),
            ));
        }
        Ok(())
    }
}

/// Convert boundary integers to frame dimensions.
///
/// Negative values are rejected here; zero and odd values are rejected by
/// the frame view.
pub fn checked_dimensions(width: i64, height: i64) -> Result<(usize, usize)> {
    let convert = |v: i64, name: &str| {
        usize::try_from(v).map_err(|_| {
            ProcessingError::stage("dimensions", format!("{} must not be negative, got {}", name, v))
        })
    };
    Ok((convert(width, "width")?, convert(height, "height")?))
}

/// Run one delegated stage, turning a panic inside it into a stage failure.
fn guarded<T>(stage: &'static str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(ProcessingError::stage(stage, panic_message(payload.as_ref()))),
    }
}

/// Stateless camera-frame to edge-image converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameEdgeProcessor {
    params: EdgeParams,
}

impl FrameEdgeProcessor {
    pub fn new(params: EdgeParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Render the edge image of `frame` into `output`.
    ///
    /// # Arguments
    /// * `frame` - Semi-planar 4:2:0 bytes, at least `width * (height + height/2)` long
    /// * `width`, `height` - Frame geometry, non-zero and even
    /// * `output` - At least `width * height` packed ARGB pixels
    ///
    /// On error the contents of `output` are unspecified.
    pub fn process(&self, frame: &[u8], width: usize, height: usize, output: &mut [u32]) -> Result<()> {
        let yuv = YuvFrame::new(frame, width, height, self.params.chroma_order)?;
        if output.is_empty() {
            return Err(ProcessingError::input("output buffer is missing or empty"));
        }
        let pixel_count = width * height;
        if output.len() < pixel_count {
            return Err(ProcessingError::input(format!(
                "output buffer holds {} pixels, {}x{} needs {}",
                output.len(),
                width,
                height,
                pixel_count
            )));
        }
        self.run(&yuv, &mut output[..pixel_count])
    }

    /// Render into a freshly allocated `width * height` buffer.
    pub fn render(&self, frame: &[u8], width: usize, height: usize) -> Result<Vec<u32>> {
        let yuv = YuvFrame::new(frame, width, height, self.params.chroma_order)?;
        let mut output = vec![BACKGROUND_PIXEL; yuv.width() * yuv.height()];
        self.run(&yuv, &mut output)?;
        Ok(output)
    }

    /// Stage chain over a validated frame; `output` is exactly one pixel per luma sample.
    fn run(&self, yuv: &YuvFrame, output: &mut [u32]) -> Result<()> {
        let p = &self.params;
        let rgb = guarded("yuv_to_rgb", || Ok(yuv.to_rgb()))?;
        let gray = guarded("rgb_to_gray", || luminance_u8(rgb.view()))?;
        drop(rgb);
        let blurred = guarded("gaussian_blur", || {
            gaussian_blur_gray(&gray, p.blur_kernel_size, p.blur_sigma)
        })?;
        let edges = guarded("canny", || canny_edges(&blurred, p.low_threshold, p.high_threshold))?;

        write_argb_mask(&edges, output)?;

        debug!(
            "processed {}x{} frame: {} edge pixels",
            yuv.width(),
            yuv.height(),
            count_edge_pixels(output)
        );
        Ok(())
    }
}

/// Process one frame with the default camera preset.
pub fn process_frame(frame: &[u8], width: usize, height: usize, output: &mut [u32]) -> Result<()> {
    FrameEdgeProcessor::default().process(frame, width, height, output)
}

/// Render with `params`, taking dimensions as the signed integers a host
/// binding receives.
///
/// Shared by the Python and WASM surfaces. Runs inside [`contain`], so a
/// panic comes back as [`ProcessingError::UnknownFailure`].
pub fn render_with(params: EdgeParams, frame: &[u8], width: i64, height: i64) -> Result<Vec<u32>> {
    contain(|| {
        let (width, height) = checked_dimensions(width, height)?;
        FrameEdgeProcessor::new(params)?.render(frame, width, height)
    })
}

/// Run `f` so that no panic escapes; anything caught becomes
/// [`ProcessingError::UnknownFailure`]. Failures are logged here.
pub fn contain<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let result = match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(ProcessingError::UnknownFailure(panic_message(payload.as_ref()))),
    };
    if let Err(err) = &result {
        error!("frame dropped: {}", err);
    }
    result
}

/// Startup self-check: pushes a small flat frame through every stage.
///
/// Returns `false` if any stage is unusable. Performs no configuration.
pub fn init_library() -> bool {
    const SIZE: usize = 8;

    let self_check = || -> Result<bool> {
        let len = frame_len(SIZE, SIZE)
            .ok_or_else(|| ProcessingError::stage("init", "self-check size overflows"))?;
        let frame = vec![128u8; len];
        let output = FrameEdgeProcessor::default().render(&frame, SIZE, SIZE)?;
        Ok(count_edge_pixels(&output) == 0)
    };

    match catch_unwind(self_check) {
        Ok(Ok(true)) => {
            debug!("edge pipeline ready");
            true
        }
        Ok(Ok(false)) => {
            error!("edge pipeline self-check produced edges on a flat frame");
            false
        }
        Ok(Err(err)) => {
            error!("edge pipeline self-check failed: {}", err);
            false
        }
        Err(payload) => {
            error!("edge pipeline self-check panicked: {}", panic_message(payload.as_ref()));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::edge::EDGE_PIXEL;

    fn uniform_frame(width: usize, height: usize, luma: u8) -> Vec<u8> {
        let mut data = vec![luma; width * height];
        data.resize(width * height * 3 / 2, 128);
        data
    }

    #[test]
    fn test_default_params_are_camera_preset() {
        let p = EdgeParams::default();
        assert_eq!(p.chroma_order, ChromaOrder::Vu);
        assert_eq!(p.blur_kernel_size, 5);
        assert_eq!(p.blur_sigma, 1.5);
        assert_eq!((p.low_threshold, p.high_threshold), (50.0, 150.0));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let bad = [
            EdgeParams { blur_kernel_size: 4, ..Default::default() },
            EdgeParams { blur_sigma: -1.0, ..Default::default() },
            EdgeParams { low_threshold: 200.0, ..Default::default() },
            EdgeParams { high_threshold: f32::NAN, ..Default::default() },
        ];
        for params in bad {
            assert!(FrameEdgeProcessor::new(params).is_err(), "{:?}", params);
        }
        let auto = EdgeParams { blur_kernel_size: 0, ..Default::default() };
        assert!(FrameEdgeProcessor::new(auto).is_ok());
    }

    #[test]
    fn test_uniform_frame_is_all_background() {
        let frame = uniform_frame(16, 12, 200);
        let mut out = vec![0u32; 16 * 12];
        process_frame(&frame, 16, 12, &mut out).unwrap();
        assert!(out.iter().all(|&p| p == BACKGROUND_PIXEL));
    }

    #[test]
    fn test_empty_buffers_are_input_errors() {
        let frame = uniform_frame(4, 4, 0);
        let mut out = vec![0u32; 16];

        let err = process_frame(&[], 4, 4, &mut out).unwrap_err();
        assert!(matches!(err, ProcessingError::InputError(_)));

        let err = process_frame(&frame, 4, 4, &mut []).unwrap_err();
        assert!(matches!(err, ProcessingError::InputError(_)));
    }

    #[test]
    fn test_short_output_rejected_before_work() {
        let frame = uniform_frame(4, 4, 0);
        let mut out = vec![7u32; 15];
        let err = process_frame(&frame, 4, 4, &mut out).unwrap_err();
        assert!(matches!(err, ProcessingError::InputError(_)));
        assert!(out.iter().all(|&p| p == 7));
    }

    #[test]
    fn test_zero_dimensions_fail() {
        let frame = uniform_frame(4, 4, 0);
        let mut out = vec![0u32; 16];
        assert!(process_frame(&frame, 0, 4, &mut out).is_err());
        assert!(process_frame(&frame, 4, 0, &mut out).is_err());
        assert!(FrameEdgeProcessor::default().render(&frame, 0, 0).is_err());
    }

    #[test]
    fn test_checked_dimensions() {
        assert_eq!(checked_dimensions(640, 480).unwrap(), (640, 480));
        assert!(matches!(
            checked_dimensions(-1, 480),
            Err(ProcessingError::ProcessingFailure { stage: "dimensions", .. })
        ));
    }

    #[test]
    fn test_guarded_maps_panics_to_stage() {
        let result: Result<()> = guarded("canny", || panic!("bad shape"));
        assert_eq!(result, Err(ProcessingError::stage("canny", "bad shape")));
    }

    #[test]
    fn test_contain_maps_panics_to_unknown() {
        let result: Result<()> = contain(|| panic!("unexpected"));
        assert_eq!(result, Err(ProcessingError::UnknownFailure("unexpected".into())));
        assert_eq!(contain(|| Ok(3)), Ok(3));
    }

    #[test]
    fn test_render_with_negative_dimensions() {
        let frame = uniform_frame(4, 4, 0);
        for (w, h) in [(-4, 4), (4, -4), (i64::MIN, 4)] {
            let err = render_with(EdgeParams::default(), &frame, w, h).unwrap_err();
            assert!(
                matches!(err, ProcessingError::ProcessingFailure { stage: "dimensions", .. }),
                "{}x{} gave {:?}",
                w,
                h,
                err
            );
            assert_eq!(err.status_code(), -1);
        }
    }

    #[test]
    fn test_render_with_short_frame() {
        let frame = uniform_frame(4, 4, 0);
        let err = render_with(EdgeParams::default(), &frame[..23], 4, 4).unwrap_err();
        assert!(matches!(err, ProcessingError::InputError(_)));
        let err = render_with(EdgeParams::default(), &[], 4, 4).unwrap_err();
        assert!(matches!(err, ProcessingError::InputError(_)));
    }

    #[test]
    fn test_render_with_bad_params() {
        let frame = uniform_frame(4, 4, 0);
        let params = EdgeParams { blur_kernel_size: 4, ..Default::default() };
        assert!(render_with(params, &frame, 4, 4).is_err());
    }

    #[test]
    fn test_render_with_flat_frame() {
        let frame = uniform_frame(6, 4, 90);
        let out = render_with(EdgeParams::default(), &frame, 6, 4).unwrap();
        assert_eq!(out, vec![BACKGROUND_PIXEL; 24]);
    }

    #[test]
    fn test_render_matches_process() {
        let mut frame = uniform_frame(8, 8, 16);
        for y in 0..8 {
            for x in 4..8 {
                frame[y * 8 + x] = 200;
            }
        }
        let rendered = FrameEdgeProcessor::default().render(&frame, 8, 8).unwrap();
        let mut out = vec![0u32; 8 * 8 + 3];
        process_frame(&frame, 8, 8, &mut out).unwrap();
        assert_eq!(&out[..64], rendered.as_slice());
        assert_eq!(&out[64..], &[0, 0, 0]);
    }

    #[test]
    fn test_render_marks_step() {
        // 8x8, left half black, right half white
        let mut frame = uniform_frame(8, 8, 0);
        for y in 0..8 {
            for x in 4..8 {
                frame[y * 8 + x] = 255;
            }
        }
        let out = FrameEdgeProcessor::default().render(&frame, 8, 8).unwrap();
        assert!(out.iter().any(|&p| p == EDGE_PIXEL));
        assert!(out.iter().all(|&p| p == EDGE_PIXEL || p == BACKGROUND_PIXEL));
    }

    #[test]
    fn test_init_library() {
        assert!(init_library());
    }
}
