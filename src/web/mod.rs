mod bindings;
mod fetch;
mod share;
mod storage;
mod timer;

pub use bindings::*;
pub use fetch::*;
pub use share::*;
pub use storage::*;
pub use timer::*;

use wasm_bindgen::JsValue;

/// Turns a thrown JS value into something readable for our error types
pub(crate) fn describe_js_err(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| js_sys::Reflect::get(err, &JsValue::from_str("message")).ok()?.as_string())
        .unwrap_or_else(|| format!("{:?}", err))
}
