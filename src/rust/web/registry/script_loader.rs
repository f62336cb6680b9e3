//! Loads scripts by appending async `<script>` tags to `document.head`

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlScriptElement;

use crate::engine::loader::{Completion, Failure, LoadError, Loader};
use crate::web::utils::errors::describe;

type Callbacks = Rc<RefCell<Option<(Completion, Failure)>>>;

#[derive(Debug, Default)]
pub struct ScriptTagLoader;

impl ScriptTagLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Loader for ScriptTagLoader {
    fn load(&self, url: &str, on_success: Completion, on_failure: Failure) {
        let callbacks: Callbacks = Rc::new(RefCell::new(Some((on_success, on_failure))));

        if let Err(e) = attach_script(url, &callbacks) {
            let taken = callbacks.borrow_mut().take();
            if let Some((_, on_failure)) = taken {
                on_failure(LoadError::new(url, describe(&e)));
            }
        }
    }
}

fn attach_script(url: &str, callbacks: &Callbacks) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("document has no <head>"))?;

    let script: HtmlScriptElement = document.create_element("script")?.dyn_into()?;
    script.set_src(url);
    script.set_type("text/javascript");
    script.set_async(true);

    // only one of onload/onerror fires; whichever does takes both callbacks
    let loaded = Rc::clone(callbacks);
    let onload = Closure::once_into_js(move || {
        let taken = loaded.borrow_mut().take();
        if let Some((on_success, _)) = taken {
            on_success();
        }
    });

    let failed = Rc::clone(callbacks);
    let name = url.to_string();
    let onerror = Closure::once_into_js(move || {
        let taken = failed.borrow_mut().take();
        if let Some((_, on_failure)) = taken {
            on_failure(LoadError::new(name, "script failed to load"));
        }
    });

    script.set_onload(Some(onload.unchecked_ref()));
    script.set_onerror(Some(onerror.unchecked_ref()));
    head.append_child(&script)?;
    Ok(())
}
