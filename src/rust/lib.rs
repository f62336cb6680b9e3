#![allow(clippy::module_inception)]

pub mod engine;
pub mod shared;
pub mod tools;

// CLI-specific modules (requires terminal, file system, etc.)
#[cfg(all(feature = "cli", not(target_arch = "wasm32")))]
pub mod platform;

#[cfg(all(feature = "cli", not(target_arch = "wasm32")))]
pub mod services;

// WebAssembly bindings (only compiled for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use engine::{Definition, Dependencies, Resolver, TaskQueue, Value};
