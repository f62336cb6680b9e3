//! Error handling utilities for WASM

use wasm_bindgen::JsValue;

/// Convert a Rust error to JsValue
pub fn to_js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}", error))
}

/// Create a JS error with a message
pub fn js_error(message: &str) -> JsValue {
    JsValue::from_str(message)
}

/// Best-effort text for a thrown JS value
pub fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|message| message.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", value))
}
