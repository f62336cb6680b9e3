/// Shared utilities and common modules
pub mod debugger;
pub mod error;
pub mod store;

pub use debugger::DebugTimer;
pub use error::EsquireError;
pub use store::{ModuleRecord, ModuleRegistry};
