//! JNI exports for the Android app.
//!
//! Java side (`com.openedge.processing.EdgeDetection`):
//!
//! ```java
//! native int nativeProcessFrame(byte[] yuvData, int width, int height, int[] outputBuffer);
//! native boolean nativeInit();
//! ```
//!
//! Array memory is borrowed with `AutoElements`, which releases it when
//! dropped, so every exit path (including a caught panic) hands the arrays
//! back before control returns to the JVM. The frame is released without
//! copy-back; the output buffer is committed.

use jni::objects::{JByteArray, JIntArray, JObject, ReleaseMode};
use jni::sys::{jboolean, jbyte, jint, jstring, JNI_FALSE, JNI_TRUE};
use jni::JNIEnv;
use log::{error, info};

use crate::error::{status_of, ProcessingError, Result};
use crate::processor::{self, checked_dimensions, FrameEdgeProcessor};

const GREETING: &str = "Hello from Rust NDK!";

fn as_bytes(data: &[jbyte]) -> &[u8] {
    // SAFETY: i8 and u8 have identical size and alignment; length is unchanged.
    unsafe { std::slice::from_raw_parts(data.as_ptr() as *const u8, data.len()) }
}

fn as_argb_mut(data: &mut [jint]) -> &mut [u32] {
    // SAFETY: i32 and u32 have identical size and alignment; the returned
    // slice reborrows `data` exclusively.
    unsafe { std::slice::from_raw_parts_mut(data.as_mut_ptr() as *mut u32, data.len()) }
}

/// Borrowed array contents in, status-bearing result out. `None` stands
/// for a null Java array.
fn process_elements(
    frame: Option<&[jbyte]>,
    width: jint,
    height: jint,
    output: Option<&mut [jint]>,
) -> Result<()> {
    let (Some(frame), Some(output)) = (frame, output) else {
        return Err(ProcessingError::input("frame or output array is null"));
    };
    let (width, height) = checked_dimensions(width.into(), height.into())?;
    FrameEdgeProcessor::default().process(as_bytes(frame), width, height, as_argb_mut(output))
}

/// Run `f` with panics contained and collapse the outcome to a JNI status.
fn run_with_status(f: impl FnOnce() -> Result<()>) -> jint {
    status_of(&processor::contain(f))
}

fn process_arrays(
    env: &mut JNIEnv,
    yuv_data: &JByteArray,
    width: jint,
    height: jint,
    output_buffer: &JIntArray,
) -> Result<()> {
    // SAFETY: neither array is accessed through any other JNI call while
    // these element views are alive; the caller guarantees no other thread
    // mutates them during the call.
    let frame = if yuv_data.is_null() {
        None
    } else {
        Some(
            unsafe { env.get_array_elements(yuv_data, ReleaseMode::NoCopyBack) }
                .map_err(|e| ProcessingError::input(format!("failed to get frame elements: {}", e)))?,
        )
    };
    let mut pixels = if output_buffer.is_null() {
        None
    } else {
        Some(
            unsafe { env.get_array_elements(output_buffer, ReleaseMode::CopyBack) }
                .map_err(|e| ProcessingError::input(format!("failed to get output elements: {}", e)))?,
        )
    };

    process_elements(frame.as_deref(), width, height, pixels.as_deref_mut())
}

/// Process one camera frame. Returns `0` on success, `-1` on any failure.
#[no_mangle]
pub extern "system" fn Java_com_openedge_processing_EdgeDetection_nativeProcessFrame<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    yuv_data: JByteArray<'local>,
    width: jint,
    height: jint,
    output_buffer: JIntArray<'local>,
) -> jint {
    run_with_status(|| process_arrays(&mut env, &yuv_data, width, height, &output_buffer))
}

/// Startup check for the edge pipeline.
#[no_mangle]
pub extern "system" fn Java_com_openedge_processing_EdgeDetection_nativeInit<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jboolean {
    if processor::init_library() {
        JNI_TRUE
    } else {
        JNI_FALSE
    }
}

/// Greeting used by the app shell to confirm the library loaded.
#[no_mangle]
pub extern "system" fn Java_com_openedge_MainActivity_stringFromJNI<'local>(
    env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jstring {
    info!("native library loaded");
    match env.new_string(GREETING) {
        Ok(s) => s.into_raw(),
        Err(e) => {
            error!("failed to create greeting string: {}", e);
            std::ptr::null_mut()
        }
    }
}
