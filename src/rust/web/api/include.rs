//! Script loading API for WASM

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use crate::web::registry;
use crate::web::utils::errors::describe;

/// Load `url` as a `<script>`; run `callback` once it has executed
#[wasm_bindgen]
pub fn include(url: String, callback: Option<js_sys::Function>) {
    let includer = registry::includer();
    let on_success = callback.map(|callback| {
        let logger = registry::resolver().logger().clone();
        Box::new(move || {
            if let Err(e) = callback.call0(&JsValue::NULL) {
                logger.error(format!("Error in include callback: {}", describe(&e)));
            }
        }) as Box<dyn FnOnce()>
    });
    includer.include(&url, on_success);
}

/// Report a module or script that failed to load
#[wasm_bindgen(js_name = "errorHandler")]
pub fn error_handler(name: String) {
    registry::includer().handle_error(&name);
}

/// Replace the handler invoked with the name of each failed load
#[wasm_bindgen(js_name = "setErrorHandler")]
pub fn set_error_handler(handler: js_sys::Function) {
    let logger = registry::resolver().logger().clone();
    registry::includer().set_error_handler(move |name: &str| {
        if let Err(e) = handler.call1(&JsValue::NULL, &JsValue::from_str(name)) {
            logger.error(format!("Error in error handler: {}", describe(&e)));
        }
    });
}

/// `include` as a JS function, as seen through the `include` module
pub fn include_function() -> JsValue {
    Closure::<dyn FnMut(String, JsValue)>::new(|url: String, callback: JsValue| {
        include(url, callback.dyn_into::<js_sys::Function>().ok())
    })
    .into_js_value()
}
