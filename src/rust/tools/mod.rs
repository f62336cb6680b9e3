// CLI front end needs a terminal and tokio; the logger is used everywhere.
#[cfg(all(feature = "cli", not(target_arch = "wasm32")))]
pub mod cli;
pub mod logger;
