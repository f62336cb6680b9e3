//! Conversions between `JsValue` and `Value`

use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};

use crate::engine::loader::Includer;
use crate::engine::resolver::{Dependencies, ResolverHandle};
use crate::engine::value::Value;
use crate::web::api::{include, modules};
use crate::web::utils::errors::{js_error, to_js_error};

/// Wrap a JS value so it keeps its identity inside the registry
pub fn js_to_value(value: JsValue) -> Value {
    Value::native(value)
}

/// JS view of a module value.
///
/// Values that came from JS are handed back as-is. The built-in resolver and
/// includer become the JS API object and the `include` function.
pub fn value_to_js(value: &Value) -> Result<JsValue, JsValue> {
    if let Some(js) = value.downcast::<JsValue>() {
        return Ok(js.clone());
    }
    if value.downcast::<ResolverHandle>().is_some() {
        return modules::resolver_object();
    }
    if value.downcast::<Includer>().is_some() {
        return Ok(include::include_function());
    }

    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    value.to_json().serialize(&serializer).map_err(to_js_error)
}

/// Values as a JS argument list
pub fn values_to_args(values: &[Value]) -> Result<js_sys::Array, JsValue> {
    let args = js_sys::Array::new();
    for value in values {
        args.push(&value_to_js(value)?);
    }
    Ok(args)
}

/// A single name or an array of names
pub fn dependencies_from_js(value: &JsValue) -> Result<Dependencies, JsValue> {
    if let Some(name) = value.as_string() {
        return Ok(Dependencies::from(name));
    }

    let array = value
        .dyn_ref::<js_sys::Array>()
        .ok_or_else(|| js_error("dependencies must be a string or an array of strings"))?;

    array
        .iter()
        .map(|entry| {
            entry
                .as_string()
                .ok_or_else(|| js_error("dependency names must be strings"))
        })
        .collect::<Result<Vec<String>, JsValue>>()
        .map(Dependencies::from)
}
