//! FFI bindings for PathMapper
//!
//! This module provides C-compatible functions so a client can run the same
//! normalization locally instead of reimplementing it. All functions use C
//! strings (null-terminated) and return allocated memory that must be freed by
//! the caller using `pathmapper_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::pipeline::timeline_to_batch;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Normalize a location-history JSON document.
///
/// Accepts an export document, a pre-flattened array, or an existing
/// canonical batch, and returns `{ "routes": [...], "placeVisits": [...] }`.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `pathmapper_free_string`.
/// - Returns NULL on error; call `pathmapper_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn pathmapper_normalize_json(json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match timeline_to_batch(json_str) {
        Ok(batch) => string_to_cstr(&batch),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a string returned by PathMapper.
///
/// # Safety
/// - `ptr` must have been returned by a PathMapper function, or be NULL.
/// - Must not be called twice on the same pointer.
#[no_mangle]
pub unsafe extern "C" fn pathmapper_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// Last error message on this thread, or NULL.
///
/// # Safety
/// The returned pointer is owned by PathMapper and is valid until the next
/// PathMapper call on the same thread. Do not free it.
#[no_mangle]
pub unsafe extern "C" fn pathmapper_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match e.borrow().as_ref() {
        Some(msg) => msg.as_ptr(),
        None => ptr::null(),
    })
}

/// Library version string.
///
/// # Safety
/// The returned pointer is static. Do not free it.
#[no_mangle]
pub unsafe extern "C" fn pathmapper_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> CString {
        CString::new(
            r#"{
                "timelineObjects": [{
                    "activitySegment": {
                        "startLocation": { "latitudeE7": 407128000, "longitudeE7": -740060000 },
                        "endLocation": { "latitudeE7": 407200000, "longitudeE7": -740100000 },
                        "activityType": "WALKING",
                        "duration": { "startTimestamp": "t0", "endTimestamp": "t1" }
                    }
                }]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_ffi_normalize_json() {
        let json = sample_json();

        unsafe {
            let result = pathmapper_normalize_json(json.as_ptr());
            assert!(!result.is_null());

            let result_str = CStr::from_ptr(result).to_str().unwrap();
            let parsed: serde_json::Value = serde_json::from_str(result_str).unwrap();
            assert_eq!(parsed["routes"][0]["activityType"], "WALKING");
            assert!(parsed["placeVisits"].as_array().unwrap().is_empty());

            pathmapper_free_string(result);
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        let invalid = CString::new("not valid json").unwrap();

        unsafe {
            let result = pathmapper_normalize_json(invalid.as_ptr());
            assert!(result.is_null());

            let error = pathmapper_last_error();
            assert!(!error.is_null());
            let error_str = CStr::from_ptr(error).to_str().unwrap();
            assert!(error_str.contains("Invalid JSON"));

            assert!(pathmapper_normalize_json(ptr::null()).is_null());
        }
    }

    #[test]
    fn test_ffi_error_cleared_on_success() {
        let invalid = CString::new("[").unwrap();
        let json = sample_json();

        unsafe {
            pathmapper_normalize_json(invalid.as_ptr());
            assert!(!pathmapper_last_error().is_null());

            let result = pathmapper_normalize_json(json.as_ptr());
            assert!(pathmapper_last_error().is_null());
            pathmapper_free_string(result);
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = pathmapper_version();
            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert_eq!(version_str, env!("CARGO_PKG_VERSION"));
        }
    }
}
