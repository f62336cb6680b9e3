//! Resolver - module definitions, requests and the propagation loop
//!
//! `define` and `require` append to the work list and run a scan right away.
//! A scan that fires anything queues another scan on the [`Scheduler`], so
//! work created by the callbacks it just ran gets a fresh pass.

pub mod driver;
pub mod pending;

pub use pending::{Action, Dependencies, Origin, PendingCallback};

use crate::engine::scheduler::Scheduler;
use crate::engine::value::Value;
use crate::shared::store::{Finalizer, ModuleRecord, ModuleRegistry};
use crate::tools::logger::Logger;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// What a module resolves to
pub enum Definition {
    /// Fixed value, stored as is once dependencies resolve
    Value(Value),
    /// Computed from dependency values at resolution time
    Finalizer(Finalizer),
}

impl Definition {
    pub fn finalizer<F>(finalizer: F) -> Self
    where
        F: FnOnce(&[Value]) -> Value + 'static,
    {
        Definition::Finalizer(Box::new(finalizer))
    }
}

impl From<Value> for Definition {
    fn from(value: Value) -> Self {
        Definition::Value(value)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResolverOptions {
    /// Emit progress and waiting messages
    pub debug: bool,
    /// Drop fired records from the work list at the start of each outermost scan
    pub compact: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            debug: false,
            compact: true,
        }
    }
}

pub(crate) struct ResolverState {
    registry: RefCell<ModuleRegistry>,
    pending: RefCell<Vec<PendingCallback>>,
    scheduler: Rc<dyn Scheduler>,
    logger: Logger,
    debug: Cell<bool>,
    compact: bool,
    scan_depth: Cell<usize>,
    scan_queued: Cell<bool>,
}

/// Shared handle to one resolver instance. Clones refer to the same state.
#[derive(Clone)]
pub struct Resolver {
    state: Rc<ResolverState>,
}

/// Non-owning handle, used where a resolver refers to itself
#[derive(Clone)]
pub struct ResolverHandle {
    state: Weak<ResolverState>,
}

impl ResolverHandle {
    pub fn upgrade(&self) -> Option<Resolver> {
        self.state.upgrade().map(|state| Resolver { state })
    }
}

pub struct ResolverBuilder {
    scheduler: Rc<dyn Scheduler>,
    registry: ModuleRegistry,
    logger: Logger,
    options: ResolverOptions,
}

impl ResolverBuilder {
    pub fn registry(mut self, registry: ModuleRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.options.debug = debug;
        self
    }

    pub fn compact(mut self, compact: bool) -> Self {
        self.options.compact = compact;
        self
    }

    pub fn build(self) -> Resolver {
        Resolver {
            state: Rc::new(ResolverState {
                registry: RefCell::new(self.registry),
                pending: RefCell::new(Vec::new()),
                scheduler: self.scheduler,
                logger: self.logger,
                debug: Cell::new(self.options.debug),
                compact: self.options.compact,
                scan_depth: Cell::new(0),
                scan_queued: Cell::new(false),
            }),
        }
    }
}

impl Resolver {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self::builder(scheduler).build()
    }

    pub fn builder(scheduler: Rc<dyn Scheduler>) -> ResolverBuilder {
        ResolverBuilder {
            scheduler,
            registry: ModuleRegistry::new(),
            logger: Logger::new(),
            options: ResolverOptions::default(),
        }
    }

    pub fn handle(&self) -> ResolverHandle {
        ResolverHandle {
            state: Rc::downgrade(&self.state),
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.state.logger
    }

    /// Enable or disable diagnostic messages
    pub fn debug(&self, toggle: bool) {
        self.state.debug.set(toggle);
    }

    pub fn is_debug(&self) -> bool {
        self.state.debug.get()
    }

    /// Register a module with an immediate value. Resolves synchronously.
    pub fn define_value(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.define(name, None, Definition::Value(value.into()));
    }

    /// Register a module computed from `dependencies` once they all resolve.
    ///
    /// With no dependencies the finalizer runs during this call.
    pub fn define_computed<D, F>(&self, name: impl Into<String>, dependencies: D, finalizer: F)
    where
        D: Into<Dependencies>,
        F: FnOnce(&[Value]) -> Value + 'static,
    {
        self.define(
            name,
            Some(dependencies.into()),
            Definition::finalizer(finalizer),
        );
    }

    /// Register a module that resolves to `value` once `dependencies` resolve.
    /// Dependency values are not used.
    pub fn define_after<D>(&self, name: impl Into<String>, dependencies: D, value: impl Into<Value>)
    where
        D: Into<Dependencies>,
    {
        self.define(
            name,
            Some(dependencies.into()),
            Definition::Value(value.into()),
        );
    }

    /// Register a module, overwriting any previous one with the same name.
    pub fn define(
        &self,
        name: impl Into<String>,
        dependencies: Option<Dependencies>,
        definition: Definition,
    ) {
        let name = name.into();
        let dependencies = dependencies.unwrap_or_default();
        let (value, finalizer) = match definition {
            Definition::Value(value) => (value, None),
            Definition::Finalizer(finalizer) => (Value::Null, Some(finalizer)),
        };

        let immediate = dependencies.is_empty();
        let computed = finalizer.is_some();
        let record = if immediate && !computed {
            ModuleRecord::resolved(name.clone(), value)
        } else {
            ModuleRecord::pending(
                name.clone(),
                dependencies.as_slice().to_vec(),
                value,
                finalizer,
            )
        };
        let generation = self.register(record);

        if immediate {
            if computed {
                self.finalize(&name, generation, Vec::new());
            }
        } else {
            let handle = self.handle();
            let module = name.clone();
            self.enqueue(PendingCallback::new(
                dependencies,
                Origin::Module(name),
                Box::new(move |values| {
                    if let Some(resolver) = handle.upgrade() {
                        resolver.finalize(&module, generation, values);
                    }
                }),
            ));
        }

        self.tick();
    }

    /// Run `callback` with the values of `dependencies`, in order, once all resolve.
    pub fn require<D, F>(&self, dependencies: D, callback: F)
    where
        D: Into<Dependencies>,
        F: FnOnce(Vec<Value>) + 'static,
    {
        let dependencies = dependencies.into();
        if self.is_debug() {
            self.state
                .logger
                .debug(format!("required: {}", dependencies.join(",")));
        }
        self.enqueue(PendingCallback::new(
            dependencies,
            Origin::Require,
            Box::new(callback),
        ));
        self.tick();
    }

    /// Names blocking at least one waiting callback, first-seen order, no duplicates.
    pub fn waiting_names(&self) -> Vec<String> {
        let registry = self.state.registry.borrow();
        let pending = self.state.pending.borrow();
        let mut names: Vec<String> = Vec::new();

        for entry in pending.iter().filter(|entry| entry.is_waiting()) {
            for dependency in entry.dependencies() {
                if !registry.is_resolved(dependency) && !names.contains(dependency) {
                    names.push(dependency.clone());
                }
            }
        }

        names
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.state.registry.borrow().has(name)
    }

    pub fn is_resolved(&self, name: &str) -> bool {
        self.state.registry.borrow().is_resolved(name)
    }

    /// Value of a resolved module
    pub fn resolved_value(&self, name: &str) -> Option<Value> {
        self.state
            .registry
            .borrow()
            .get(name)
            .filter(|record| record.is_resolved())
            .map(|record| record.value().clone())
    }

    /// Number of callbacks still waiting
    pub fn waiting_count(&self) -> usize {
        self.state
            .pending
            .borrow()
            .iter()
            .filter(|entry| entry.is_waiting())
            .count()
    }

    /// Length of the work list, fired records included
    pub fn work_list_len(&self) -> usize {
        self.state.pending.borrow().len()
    }

    /// Read-only access to the registry
    pub fn with_registry<R>(&self, f: impl FnOnce(&ModuleRegistry) -> R) -> R {
        f(&self.state.registry.borrow())
    }

    fn register(&self, record: ModuleRecord) -> u64 {
        let name = record.name().to_string();
        let mut registry = self.state.registry.borrow_mut();
        if registry.put(record).is_some() && self.is_debug() {
            self.state.logger.warn(format!("redefined: {}", name));
        }
        registry
            .get(&name)
            .map(ModuleRecord::generation)
            .unwrap_or_default()
    }

    fn enqueue(&self, callback: PendingCallback) {
        self.state.pending.borrow_mut().push(callback);
    }
}

#[cfg(test)]
#[path = "test_resolver.rs"]
mod tests;
