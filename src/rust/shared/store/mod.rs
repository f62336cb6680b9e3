/// Module store - owns the mapping from module name to module record
use crate::engine::value::Value;
use std::collections::HashMap;
use std::fmt;

/// Computes a module value from its resolved dependencies, in declared order
pub type Finalizer = Box<dyn FnOnce(&[Value]) -> Value>;

/// A named module and its resolution state
pub struct ModuleRecord {
    name: String,
    resolved: bool,
    value: Value,
    dependencies: Vec<String>,
    finalizer: Option<Finalizer>,
    generation: u64,
}

impl ModuleRecord {
    /// A module with an immediate value and no dependencies. Resolved on creation.
    pub fn resolved(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            resolved: true,
            value,
            dependencies: Vec::new(),
            finalizer: None,
            generation: 0,
        }
    }

    /// A module waiting on `dependencies`.
    ///
    /// `value` is kept as the resolved value unless a finalizer replaces it.
    pub fn pending(
        name: impl Into<String>,
        dependencies: Vec<String>,
        value: Value,
        finalizer: Option<Finalizer>,
    ) -> Self {
        Self {
            name: name.into(),
            resolved: false,
            value,
            dependencies,
            finalizer,
            generation: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn has_finalizer(&self) -> bool {
        self.finalizer.is_some()
    }

    /// Registration stamp assigned by the registry on `put`
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Take the finalizer out so it can run without the registry borrowed
    pub fn take_finalizer(&mut self) -> Option<Finalizer> {
        self.finalizer.take()
    }

    /// Flip to resolved. Only the first call has any effect.
    pub fn mark_resolved(&mut self, value: Option<Value>) -> bool {
        if self.resolved {
            return false;
        }
        if let Some(value) = value {
            self.value = value;
        }
        self.finalizer = None;
        self.resolved = true;
        true
    }
}

impl fmt::Debug for ModuleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRecord")
            .field("name", &self.name)
            .field("resolved", &self.resolved)
            .field("value", &self.value)
            .field("dependencies", &self.dependencies)
            .field("finalizer", &self.finalizer.is_some())
            .field("generation", &self.generation)
            .finish()
    }
}

/// Name to record mapping. Last writer wins.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, ModuleRecord>,
    generations: u64,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ModuleRecord> {
        self.modules.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ModuleRecord> {
        self.modules.get_mut(name)
    }

    /// Insert or overwrite the record under its name.
    ///
    /// Stamps the record with a fresh generation and returns the record it replaced.
    pub fn put(&mut self, mut record: ModuleRecord) -> Option<ModuleRecord> {
        self.generations += 1;
        record.generation = self.generations;
        self.modules.insert(record.name.clone(), record)
    }

    /// Values of `names` in order, or `None` if any is missing or unresolved.
    pub fn is_satisfied(&self, names: &[String]) -> Option<Vec<Value>> {
        names
            .iter()
            .map(|name| match self.modules.get(name) {
                Some(record) if record.resolved => Some(record.value.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn is_resolved(&self, name: &str) -> bool {
        self.modules
            .get(name)
            .map(|record| record.resolved)
            .unwrap_or(false)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
#[path = "test_shared_store.rs"]
mod tests;
