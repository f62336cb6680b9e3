use crate::engine::value::Value;
use std::fmt;

/// Work run once a pending callback's dependencies resolve
pub type Action = Box<dyn FnOnce(Vec<Value>)>;

/// Who queued a pending callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// A user `require` call
    Require,
    /// The finalize step of a module definition
    Module(String),
}

/// Ordered list of module names a callback or module waits on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies(Vec<String>);

impl Dependencies {
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn join(&self, separator: &str) -> String {
        self.0.join(separator)
    }
}

impl From<&str> for Dependencies {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for Dependencies {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<Vec<String>> for Dependencies {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl From<Vec<&str>> for Dependencies {
    fn from(names: Vec<&str>) -> Self {
        Self(names.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Dependencies {
    fn from(names: &[&str]) -> Self {
        Self(names.iter().map(|name| name.to_string()).collect())
    }
}

impl From<&[String]> for Dependencies {
    fn from(names: &[String]) -> Self {
        Self(names.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for Dependencies {
    fn from(names: [&str; N]) -> Self {
        Self(names.iter().map(|name| name.to_string()).collect())
    }
}

/// Deferred work waiting on a set of modules.
///
/// Fires at most once. After firing the record stays inert until the work list
/// is compacted.
pub struct PendingCallback {
    dependencies: Vec<String>,
    action: Option<Action>,
    origin: Origin,
    waiting: bool,
}

impl PendingCallback {
    pub fn new(dependencies: Dependencies, origin: Origin, action: Action) -> Self {
        Self {
            dependencies: dependencies.into_vec(),
            action: Some(action),
            origin,
            waiting: true,
        }
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    /// Stop waiting and hand out the action. Later calls return `None`.
    pub fn take_action(&mut self) -> Option<Action> {
        self.waiting = false;
        self.action.take()
    }
}

impl fmt::Debug for PendingCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingCallback")
            .field("dependencies", &self.dependencies)
            .field("origin", &self.origin)
            .field("waiting", &self.waiting)
            .finish()
    }
}
