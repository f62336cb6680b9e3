//! # Esquire WASM Module
//!
//! Browser bindings for the resolver. One resolver per JS realm, driven by
//! `setTimeout(0)` and loading scripts through `<script>` tags.
//!
//! - `registry`: the per-realm runtime, its scheduler and script loader
//! - `api`: wasm-bindgen exported functions for JS interop
//! - `utils`: conversions between `JsValue` and `Value`, error helpers

#![cfg(all(target_arch = "wasm32", feature = "wasm"))]

pub mod api;
pub mod registry;
pub mod utils;

pub use api::include::*;
pub use api::modules::*;
