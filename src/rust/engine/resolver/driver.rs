use super::{Action, Resolver, ResolverState};
use crate::engine::value::Value;

/// Keeps the scan depth balanced even if a callback unwinds
struct ScanGuard<'a> {
    state: &'a ResolverState,
    depth: usize,
}

impl<'a> ScanGuard<'a> {
    fn enter(state: &'a ResolverState) -> Self {
        let depth = state.scan_depth.get();
        state.scan_depth.set(depth + 1);
        Self { state, depth }
    }
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        self.state.scan_depth.set(self.depth);
    }
}

impl Resolver {
    /// One propagation pass over the work list.
    ///
    /// Fires every waiting callback whose dependencies are all resolved and
    /// returns how many fired. Entries appended while the pass runs are left
    /// for the pass they trigger themselves or for the deferred follow-up.
    pub fn tick(&self) -> usize {
        let state = &*self.state;

        // Indices only stay stable while no outer scan is iterating
        if state.scan_depth.get() == 0 && state.compact {
            state.pending.borrow_mut().retain(|entry| entry.is_waiting());
        }

        let fired = {
            let _guard = ScanGuard::enter(state);
            let end = state.pending.borrow().len();
            let mut fired = 0;
            for index in 0..end {
                if let Some((action, values)) = self.take_ready(index) {
                    fired += 1;
                    action(values);
                }
            }
            fired
        };

        if fired > 0 {
            self.schedule_scan();
        } else if self.is_debug() {
            state
                .logger
                .debug(format!("waiting: {}", self.waiting_names().join(",")));
        }

        fired
    }

    fn take_ready(&self, index: usize) -> Option<(Action, Vec<Value>)> {
        let mut pending = self.state.pending.borrow_mut();
        let entry = pending.get_mut(index)?;
        if !entry.is_waiting() {
            return None;
        }

        let values = self
            .state
            .registry
            .borrow()
            .is_satisfied(entry.dependencies())?;

        if self.is_debug() {
            self.state
                .logger
                .debug(format!("resolved: {}", entry.dependencies().join(",")));
        }

        entry.take_action().map(|action| (action, values))
    }

    /// Queue a follow-up scan unless one is already queued
    fn schedule_scan(&self) {
        if self.state.scan_queued.replace(true) {
            return;
        }

        let handle = self.handle();
        self.state.scheduler.defer(Box::new(move || {
            if let Some(resolver) = handle.upgrade() {
                resolver.state.scan_queued.set(false);
                resolver.tick();
            }
        }));
    }

    /// Resolve `name` if it is still the registration stamped `generation`.
    ///
    /// The finalizer runs with no registry borrow held, so it may define or
    /// require further modules.
    pub(crate) fn finalize(&self, name: &str, generation: u64, values: Vec<Value>) {
        let finalizer = {
            let mut registry = self.state.registry.borrow_mut();
            match registry.get_mut(name) {
                Some(record) if record.generation() == generation => {
                    if record.is_resolved() {
                        return;
                    }
                    record.take_finalizer()
                }
                _ => {
                    if self.is_debug() {
                        self.state
                            .logger
                            .debug(format!("discarded stale definition: {}", name));
                    }
                    return;
                }
            }
        };

        let value = finalizer.map(|finalizer| finalizer(&values));

        let mut registry = self.state.registry.borrow_mut();
        if let Some(record) = registry.get_mut(name) {
            if record.generation() == generation {
                record.mark_resolved(value);
            }
        }
    }
}
