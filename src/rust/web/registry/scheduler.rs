//! `setTimeout(0)` scheduler

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::engine::scheduler::{Scheduler, Task};
use crate::tools::logger::Logger;
use crate::web::utils::errors::describe;

/// Defers each task to its own macrotask, yielding to the browser in between
pub struct TimeoutScheduler {
    logger: Logger,
}

impl TimeoutScheduler {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl Scheduler for TimeoutScheduler {
    fn defer(&self, task: Task) {
        let Some(window) = web_sys::window() else {
            self.logger.error("setTimeout unavailable: no window");
            return;
        };

        let callback = Closure::once_into_js(move || task());
        if let Err(e) = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0)
        {
            self.logger
                .error(format!("Failed to schedule scan: {}", describe(&e)));
        }
    }
}
