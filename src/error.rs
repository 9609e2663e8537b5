//! Error taxonomy for the frame edge pipeline.
//!
//! Every failure is contained within a single call. Binding layers turn a
//! [`ProcessingError`] into the integer status expected by their caller via
//! [`ProcessingError::status_code`].

use thiserror::Error;

/// Status returned across the native boundary on success.
pub const STATUS_OK: i32 = 0;

/// Status returned across the native boundary for any failed frame.
pub const STATUS_FAILURE: i32 = -1;

/// Result type for frame processing
pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Errors that can occur while turning a camera frame into an edge image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessingError {
    /// A required buffer was missing, empty or too small for the geometry.
    #[error("input error: {0}")]
    InputError(String),

    /// A pixel stage rejected its input or failed internally.
    #[error("processing failure in {stage}: {message}")]
    ProcessingFailure {
        /// Pipeline stage that failed (e.g. "canny").
        stage: &'static str,
        message: String,
    },

    /// Anything else, caught at the boundary so one bad frame never takes
    /// the host process down.
    #[error("unknown failure: {0}")]
    UnknownFailure(String),
}

impl ProcessingError {
    pub(crate) fn input(msg: impl Into<String>) -> Self {
        ProcessingError::InputError(msg.into())
    }

    pub(crate) fn stage(stage: &'static str, msg: impl Into<String>) -> Self {
        ProcessingError::ProcessingFailure {
            stage,
            message: msg.into(),
        }
    }

    /// Integer status for the native boundary. All kinds are non-fatal and
    /// share one code; the caller just skips the frame.
    pub fn status_code(&self) -> i32 {
        STATUS_FAILURE
    }
}

/// Collapse a processing result into a boundary status code.
pub fn status_of(result: &Result<()>) -> i32 {
    match result {
        Ok(()) => STATUS_OK,
        Err(err) => err.status_code(),
    }
}

/// Best-effort text from a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_maps_to_failure_status() {
        let errors = [
            ProcessingError::input("frame buffer is empty"),
            ProcessingError::stage("canny", "bad shape"),
            ProcessingError::UnknownFailure("boom".into()),
        ];
        for err in &errors {
            assert_eq!(err.status_code(), STATUS_FAILURE, "{err}");
        }
    }

    #[test]
    fn test_status_of_success_is_zero() {
        assert_eq!(status_of(&Ok(())), STATUS_OK);
        assert_eq!(status_of(&Err(ProcessingError::input("x"))), -1);
    }

    #[test]
    fn test_display_names_the_stage() {
        let err = ProcessingError::stage("gaussian_blur", "kernel size must be odd");
        assert_eq!(
            err.to_string(),
            "processing failure in gaussian_blur: kernel size must be odd"
        );
    }

    #[test]
    fn test_panic_message_downcasts() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("static str");
        assert_eq!(panic_message(payload.as_ref()), "static str");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn std::any::Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
