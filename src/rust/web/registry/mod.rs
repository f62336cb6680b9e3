//! Per-realm runtime for the browser bindings
//!
//! Holds the one resolver and includer every exported function talks to.
//! Built on first use, with the built-in modules already registered.

pub mod scheduler;
pub mod script_loader;

pub use scheduler::TimeoutScheduler;
pub use script_loader::ScriptTagLoader;

use std::rc::Rc;

use crate::engine::loader::{register_builtins, Includer};
use crate::engine::resolver::Resolver;
use crate::tools::logger::Logger;

pub struct Runtime {
    resolver: Resolver,
    includer: Includer,
}

impl Runtime {
    fn start() -> Self {
        let logger = Logger::new();
        let resolver = Resolver::builder(Rc::new(TimeoutScheduler::new(logger.clone())))
            .logger(logger.clone())
            .build();
        let includer = Includer::new(Rc::new(ScriptTagLoader::new()), logger);
        register_builtins(&resolver, &includer);

        Self { resolver, includer }
    }
}

thread_local! {
    static RUNTIME: Runtime = Runtime::start();
}

/// The realm's resolver
pub fn resolver() -> Resolver {
    RUNTIME.with(|runtime| runtime.resolver.clone())
}

/// The realm's includer
pub fn includer() -> Includer {
    RUNTIME.with(|runtime| runtime.includer.clone())
}
