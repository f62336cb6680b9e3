/// Native services behind the CLI: manifests, fetching and the run loop
pub mod loader;
pub mod manifest;
pub mod session;
