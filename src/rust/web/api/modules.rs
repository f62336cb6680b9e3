//! Module API for WASM
//!
//! `define`, `require`, `debug` and `waiting` against the realm's resolver.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use crate::engine::resolver::Definition;
use crate::engine::value::Value;
use crate::tools::logger::Logger;
use crate::web::api::include;
use crate::web::registry;
use crate::web::utils::conversion::{
    dependencies_from_js, js_to_value, value_to_js, values_to_args,
};
use crate::web::utils::errors::describe;

/// Define a module.
///
/// `define(name, value)` registers an immediate value. `define(name, deps, f)`
/// waits on `deps`: a function third argument computes the value from the
/// dependency values, anything else is stored as the value.
#[wasm_bindgen]
pub fn define(name: String, deps_or_value: JsValue, definition: JsValue) -> Result<(), JsValue> {
    let resolver = registry::resolver();

    if definition.is_undefined() {
        resolver.define(name, None, Definition::Value(js_to_value(deps_or_value)));
        return Ok(());
    }

    let dependencies = dependencies_from_js(&deps_or_value)?;
    let definition = match definition.dyn_into::<js_sys::Function>() {
        Ok(finalizer) => {
            let logger = resolver.logger().clone();
            let module = name.clone();
            Definition::finalizer(move |values| match invoke(&finalizer, values) {
                Ok(value) => js_to_value(value),
                Err(e) => {
                    report(&logger, &format!("Error defining module {}", module), &e);
                    Value::Null
                }
            })
        }
        Err(value) => Definition::Value(js_to_value(value)),
    };

    resolver.define(name, Some(dependencies), definition);
    Ok(())
}

/// Call `callback` with the dependency values once all of them resolve
#[wasm_bindgen]
pub fn require(deps: JsValue, callback: js_sys::Function) -> Result<(), JsValue> {
    let resolver = registry::resolver();
    let dependencies = dependencies_from_js(&deps)?;
    let logger = resolver.logger().clone();

    resolver.require(dependencies, move |values| {
        if let Err(e) = invoke(&callback, &values) {
            report(&logger, "Error in require callback", &e);
        }
    });
    Ok(())
}

/// Toggle diagnostic output
#[wasm_bindgen]
pub fn debug(toggle: bool) {
    registry::resolver().debug(toggle);
}

/// Names blocking at least one pending callback
#[wasm_bindgen]
pub fn waiting() -> js_sys::Array {
    registry::resolver()
        .waiting_names()
        .into_iter()
        .map(JsValue::from)
        .collect()
}

/// The resolver's API as a JS object, as seen through the `esquire` module
pub fn resolver_object() -> Result<JsValue, JsValue> {
    let object = js_sys::Object::new();

    let define = Closure::<dyn FnMut(String, JsValue, JsValue) -> Result<(), JsValue>>::new(define);
    let require = Closure::<dyn FnMut(JsValue, js_sys::Function) -> Result<(), JsValue>>::new(require);
    let debug = Closure::<dyn FnMut(bool)>::new(debug);
    let waiting = Closure::<dyn FnMut() -> js_sys::Array>::new(waiting);
    let error_handler = Closure::<dyn FnMut(String)>::new(include::error_handler);

    js_sys::Reflect::set(&object, &"define".into(), &define.into_js_value())?;
    js_sys::Reflect::set(&object, &"require".into(), &require.into_js_value())?;
    js_sys::Reflect::set(&object, &"debug".into(), &debug.into_js_value())?;
    js_sys::Reflect::set(&object, &"waiting".into(), &waiting.into_js_value())?;
    js_sys::Reflect::set(&object, &"include".into(), &include::include_function())?;
    js_sys::Reflect::set(&object, &"errorHandler".into(), &error_handler.into_js_value())?;

    Ok(object.into())
}

fn invoke(function: &js_sys::Function, values: &[Value]) -> Result<JsValue, JsValue> {
    let args = values_to_args(values)?;
    function.apply(&JsValue::NULL, &args)
}

fn report(logger: &Logger, context: &str, error: &JsValue) {
    logger.error(format!("{}: {}", context, describe(error)));
}

/// Single module value as JS; `undefined` when absent or unresolved
#[wasm_bindgen(js_name = "moduleValue")]
pub fn module_value(name: &str) -> Result<JsValue, JsValue> {
    match registry::resolver().resolved_value(name) {
        Some(value) => value_to_js(&value),
        None => Ok(JsValue::UNDEFINED),
    }
}
