/// Resolution engine - values, scheduling, resolver and loader seam
pub mod loader;
pub mod resolver;
pub mod scheduler;
pub mod value;

pub use loader::{Includer, LoadError, Loader};
pub use resolver::{Definition, Dependencies, Resolver, ResolverHandle, ResolverOptions};
pub use scheduler::{Scheduler, Task, TaskQueue};
pub use value::Value;
