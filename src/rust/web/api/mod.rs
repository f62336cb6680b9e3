//! Public API module for WASM exports

pub mod include;
pub mod modules;
