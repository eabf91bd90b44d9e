//! JNI entry points for `com.example.myapplication.MainActivityKt`
//!
//! The host declares these as top-level `external fun`s, so they bind to the
//! `MainActivityKt` facade class. Pixels are pulled from the bitmap with
//! `Bitmap.getPixels`, which always yields 0xAARRGGBB ints regardless of the
//! bitmap's storage config. Output goes straight into the host's direct
//! `ByteBuffer`; no reference to it is kept after the call returns.

use crate::error::PreprocessError;
use crate::greeting::greet;
use crate::normalize::normalize_into_bytes;
use crate::types::{Dimensions, NormalizationParams, OutputFormat, TensorLayout};
use jni::JNIEnv;
use jni::objects::{JByteBuffer, JClass, JObject, JValue};
use jni::sys::{jint, jstring, JNI_VERSION_1_6};
use std::ffi::c_void;
use thiserror::Error;

const ILLEGAL_ARGUMENT: &str = "java/lang/IllegalArgumentException";

#[derive(Debug, Error)]
enum BridgeError {
    #[error("JNI call failed: {0}")]
    Jni(#[from] jni::errors::Error),

    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error("Output buffer is not a direct buffer")]
    NotDirectBuffer,

    #[error("Bitmap of {0} does not fit in a Java int array")]
    BitmapTooLarge(Dimensions),
}

#[unsafe(no_mangle)]
pub extern "system" fn JNI_OnLoad(_vm: *mut jni::sys::JavaVM, _reserved: *mut c_void) -> jint {
    crate::logging::init();
    log::debug!("pixprep {} loaded", crate::VERSION);
    JNI_VERSION_1_6
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_myapplication_MainActivityKt_stringFromJNI<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> jstring {
    match env.new_string(greet()) {
        Ok(greeting) => greeting.into_raw(),
        Err(e) => {
            // new_string leaves an OutOfMemoryError pending for the host
            log::error!("Failed to create greeting string: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Normalize `bitmap` into `output_buffer` as truncated packed words
///
/// Null arguments are ignored. An unusable buffer raises
/// `IllegalArgumentException` in the host.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_myapplication_MainActivityKt_preprocessImage<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    bitmap: JObject<'local>,
    output_buffer: JByteBuffer<'local>,
) {
    run(env, &bitmap, &output_buffer, OutputFormat::Packed);
}

/// Normalize `bitmap` into `output_buffer` as an interleaved `f32` tensor
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_myapplication_MainActivityKt_preprocessImageToTensor<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    bitmap: JObject<'local>,
    output_buffer: JByteBuffer<'local>,
) {
    run(env, &bitmap, &output_buffer, OutputFormat::Tensor(TensorLayout::Hwc));
}

fn run(mut env: JNIEnv<'_>, bitmap: &JObject<'_>, output: &JByteBuffer<'_>, format: OutputFormat) {
    if bitmap.is_null() || output.is_null() {
        log::debug!("Null bitmap or output buffer, nothing to do");
        return;
    }

    if let Err(err) = preprocess_bitmap(&mut env, bitmap, output, format) {
        raise(&mut env, &err);
    }
}

fn preprocess_bitmap(
    env: &mut JNIEnv<'_>,
    bitmap: &JObject<'_>,
    output: &JByteBuffer<'_>,
    format: OutputFormat,
) -> Result<(), BridgeError> {
    let (pixels, dims) = read_bitmap_pixels(env, bitmap)?;
    let destination = direct_buffer(env, output)?;

    log::debug!(
        "Normalizing {dims} bitmap into {} byte buffer as {format}",
        destination.len()
    );

    normalize_into_bytes(&pixels, dims, &NormalizationParams::default(), format, destination)?;
    Ok(())
}

fn read_bitmap_pixels(env: &mut JNIEnv<'_>, bitmap: &JObject<'_>) -> Result<(Vec<u32>, Dimensions), BridgeError> {
    let width = env.call_method(bitmap, "getWidth", "()I", &[])?.i()?;
    let height = env.call_method(bitmap, "getHeight", "()I", &[])?.i()?;
    let dims = Dimensions::from_signed(width, height)?;
    let len = java_array_len(dims)?;

    let array = env.new_int_array(len)?;
    env.call_method(
        bitmap,
        "getPixels",
        "([IIIIIII)V",
        &[
            JValue::Object(&array),
            JValue::Int(0),
            JValue::Int(width),
            JValue::Int(0),
            JValue::Int(0),
            JValue::Int(width),
            JValue::Int(height),
        ],
    )?;

    let mut pixels: Vec<jint> = vec![0; dims.pixel_count()];
    env.get_int_array_region(&array, 0, &mut pixels)?;
    env.delete_local_ref(array)?;

    Ok((from_java_pixels(pixels), dims))
}

fn java_array_len(dims: Dimensions) -> Result<jint, BridgeError> {
    jint::try_from(dims.pixel_count()).map_err(|_| BridgeError::BitmapTooLarge(dims))
}

#[inline]
fn from_java_pixels(pixels: Vec<jint>) -> Vec<u32> {
    pixels.into_iter().map(|p| p as u32).collect()
}

fn direct_buffer<'b>(env: &JNIEnv<'_>, buffer: &'b JByteBuffer<'_>) -> Result<&'b mut [u8], BridgeError> {
    let address = env
        .get_direct_buffer_address(buffer)
        .map_err(|_| BridgeError::NotDirectBuffer)?;
    let capacity = env
        .get_direct_buffer_capacity(buffer)
        .map_err(|_| BridgeError::NotDirectBuffer)?;

    // SAFETY: `address` is non-null and valid for `capacity` bytes while the
    // host holds `buffer`, which outlives this native call. The returned
    // slice is bounded by the borrow of `buffer`.
    Ok(unsafe { std::slice::from_raw_parts_mut(address, capacity) })
}

fn raise(env: &mut JNIEnv<'_>, err: &BridgeError) {
    log::warn!("Bitmap preprocessing failed: {err}");

    // A failed JNI call may already have left its own exception pending
    if let Ok(false) = env.exception_check()
        && let Err(e) = env.throw_new(ILLEGAL_ARGUMENT, err.to_string())
    {
        log::error!("Failed to throw {ILLEGAL_ARGUMENT}: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_from_java_pixels_keeps_bit_pattern() {
        let pixels = vec![-1, 0x00FF_FFFF, i32::MIN, 0x7F00_0000];
        assert_eq!(
            from_java_pixels(pixels),
            vec![0xFFFF_FFFF, 0x00FF_FFFF, 0x8000_0000, 0x7F00_0000]
        );
    }

    #[test]
    fn test_java_array_len() {
        assert_eq!(java_array_len(Dimensions::new(128, 128)).unwrap(), 16384);
        assert_matches!(
            java_array_len(Dimensions::new(65536, 65536)),
            Err(BridgeError::BitmapTooLarge(_))
        );
    }

    #[test]
    fn test_bridge_error_messages() {
        let err = BridgeError::from(PreprocessError::DestinationTooSmall {
            dimensions: Dimensions::new(128, 128),
            required: 65536,
            actual: 1024,
        });
        assert_eq!(err.to_string(), "Destination holds 1024 elements, 128x128 needs 65536");
        assert_eq!(BridgeError::NotDirectBuffer.to_string(), "Output buffer is not a direct buffer");
    }
}
