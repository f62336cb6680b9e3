//! Declarative manifests - the CLI's equivalent of a loaded script
//!
//! A manifest lists module definitions, requests and further includes. Applying
//! one feeds those into a resolver the same way a script calling `define` and
//! `require` would.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use serde::Deserialize;

use crate::engine::loader::Includer;
use crate::engine::resolver::{Dependencies, Resolver};
use crate::engine::value::Value;
use crate::shared::error::{EsquireError, Result};

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    #[serde(rename = "define")]
    pub defines: Vec<DefineEntry>,
    #[serde(rename = "require")]
    pub requires: Vec<RequireEntry>,
    #[serde(rename = "include")]
    pub includes: Vec<IncludeEntry>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DefineEntry {
    pub name: String,
    #[serde(default)]
    pub deps: Option<NameList>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RequireEntry {
    #[serde(default)]
    pub label: Option<String>,
    pub deps: NameList,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IncludeEntry {
    pub url: String,
}

/// A single module name or a list of them
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NameList {
    One(String),
    Many(Vec<String>),
}

impl From<NameList> for Dependencies {
    fn from(names: NameList) -> Self {
        match names {
            NameList::One(name) => Dependencies::from(name),
            NameList::Many(names) => Dependencies::from(names),
        }
    }
}

/// A request that fired, in firing order
#[derive(Debug, Clone, PartialEq)]
pub struct FiredRequest {
    pub label: String,
    pub values: Vec<Value>,
}

/// Shared record of fired requests
#[derive(Debug, Clone, Default)]
pub struct Report {
    fired: Rc<RefCell<Vec<FiredRequest>>>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, label: String, values: Vec<Value>) {
        self.fired.borrow_mut().push(FiredRequest { label, values });
    }

    pub fn fired(&self) -> Vec<FiredRequest> {
        self.fired.borrow().clone()
    }

    pub fn labels(&self) -> Vec<String> {
        self.fired
            .borrow()
            .iter()
            .map(|request| request.label.clone())
            .collect()
    }
}

/// Everything a manifest is applied to
#[derive(Clone)]
pub struct ManifestTarget {
    pub resolver: Resolver,
    pub includer: Includer,
    pub report: Report,
    pub base_url: Option<String>,
}

impl Manifest {
    pub fn parse(source_name: &str, content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| EsquireError::manifest(source_name, e))
    }

    pub fn is_empty(&self) -> bool {
        self.defines.is_empty() && self.requires.is_empty() && self.includes.is_empty()
    }

    /// Feed definitions, then requests, then includes into `target`.
    ///
    /// `origin` is where this manifest came from; relative include urls resolve against it.
    pub fn apply(&self, target: &ManifestTarget, origin: &str) {
        for entry in &self.defines {
            apply_define(&target.resolver, entry);
        }

        for entry in &self.requires {
            let dependencies = Dependencies::from(entry.deps.clone());
            let label = entry
                .label
                .clone()
                .unwrap_or_else(|| dependencies.join(","));
            let report = target.report.clone();
            target
                .resolver
                .require(dependencies, move |values| report.record(label, values));
        }

        for entry in &self.includes {
            let url = resolve_url(target.base_url.as_deref(), origin, &entry.url);
            target.includer.include(&url, None);
        }
    }
}

fn apply_define(resolver: &Resolver, entry: &DefineEntry) {
    let value = entry.value.clone().map(Value::from);
    let dependencies = entry.deps.clone().map(Dependencies::from);

    match (dependencies, value) {
        (Some(dependencies), Some(value)) if !dependencies.is_empty() => {
            resolver.define_after(entry.name.clone(), dependencies, value);
        }
        // an explicit (possibly empty) deps list without a value computes a map
        (Some(dependencies), None) => {
            let names = dependencies.as_slice().to_vec();
            resolver.define_computed(entry.name.clone(), dependencies, move |values| {
                let map: HashMap<String, Value> =
                    names.into_iter().zip(values.iter().cloned()).collect();
                Value::Map(map)
            });
        }
        (_, value) => resolver.define_value(entry.name.clone(), value.unwrap_or_default()),
    }
}

fn has_scheme(url: &str) -> bool {
    url.contains("://")
}

/// Resolve an include url against the configured base url or the including manifest
pub fn resolve_url(base_url: Option<&str>, origin: &str, url: &str) -> String {
    if has_scheme(url) || Path::new(url).is_absolute() {
        return url.to_string();
    }

    if let Some(base) = base_url {
        return format!("{}/{}", base.trim_end_matches('/'), url);
    }

    if let Some(scheme_end) = origin.find("://") {
        let authority_start = scheme_end + "://".len();
        let rest = &origin[authority_start..];
        // only slashes after the authority separate path segments
        return match rest.rfind('/') {
            Some(index) => format!("{}/{}", &origin[..authority_start + index], url),
            None => format!("{}/{}", origin, url),
        };
    }

    match Path::new(origin).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            parent.join(url).to_string_lossy().into_owned()
        }
        _ => url.to_string(),
    }
}

#[cfg(test)]
#[path = "test_manifest.rs"]
mod tests;
