/// Loader - the asynchronous fetch capability behind `include`
use crate::engine::resolver::{Resolver, ResolverHandle};
use crate::engine::value::Value;
use crate::tools::logger::Logger;
use std::cell::RefCell;
use std::rc::Rc;

/// Name the resolver's own handle is registered under
pub const RESOLVER_MODULE: &str = "esquire";
/// Name the includer is registered under
pub const INCLUDE_MODULE: &str = "include";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to load '{name}': {reason}")]
pub struct LoadError {
    pub name: String,
    pub reason: String,
}

impl LoadError {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type Completion = Box<dyn FnOnce()>;
pub type Failure = Box<dyn FnOnce(LoadError)>;

/// Fetches external code. Must call exactly one of the two callbacks, later.
pub trait Loader {
    fn load(&self, url: &str, on_success: Completion, on_failure: Failure);
}

type ErrorHandler = Rc<dyn Fn(&str)>;

/// The `include` capability: a loader plus a replaceable error handler
#[derive(Clone)]
pub struct Includer {
    loader: Rc<dyn Loader>,
    error_handler: Rc<RefCell<ErrorHandler>>,
    logger: Logger,
}

impl Includer {
    pub fn new(loader: Rc<dyn Loader>, logger: Logger) -> Self {
        let default_logger = logger.clone();
        let handler: ErrorHandler = Rc::new(move |name: &str| {
            default_logger.error(format!("Error loading module: {}", name));
        });

        Self {
            loader,
            error_handler: Rc::new(RefCell::new(handler)),
            logger,
        }
    }

    /// Replace the handler invoked with the failing name
    pub fn set_error_handler(&self, handler: impl Fn(&str) + 'static) {
        *self.error_handler.borrow_mut() = Rc::new(handler);
    }

    /// Invoke the current error handler for `name`
    pub fn handle_error(&self, name: &str) {
        // clone out so the handler may replace itself
        let handler = Rc::clone(&self.error_handler.borrow());
        handler(name);
    }

    /// Fetch `url`; run `on_success` when it loads. Failures go to the error handler, no retry.
    pub fn include(&self, url: &str, on_success: Option<Completion>) {
        let includer = self.clone();
        let on_success = on_success.unwrap_or_else(|| Box::new(|| {}));
        self.loader.load(
            url,
            on_success,
            Box::new(move |error: LoadError| {
                includer.logger.log_with_details(
                    crate::tools::logger::LogLevel::Error,
                    format!("Error loading script: {}", error.name),
                    [error.reason.as_str()],
                );
                includer.handle_error(&error.name);
            }),
        );
    }
}

/// Register the built-in modules: the resolver handle and the includer
pub fn register_builtins(resolver: &Resolver, includer: &Includer) {
    resolver.define_value(RESOLVER_MODULE, Value::native(resolver.handle()));
    resolver.define_value(INCLUDE_MODULE, Value::native(includer.clone()));
}

/// Resolver handle from a value registered by `register_builtins`
pub fn resolver_from(value: &Value) -> Option<Resolver> {
    value.downcast::<ResolverHandle>()?.upgrade()
}

/// Includer from a value registered by `register_builtins`
pub fn includer_from(value: &Value) -> Option<Includer> {
    value.downcast::<Includer>().cloned()
}

#[cfg(test)]
#[path = "test_loader.rs"]
mod tests;
