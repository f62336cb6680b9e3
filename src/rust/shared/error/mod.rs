//! Error types for the fallible edges around the resolver core

use crate::engine::loader::LoadError;

#[derive(Debug, thiserror::Error)]
pub enum EsquireError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("invalid manifest '{source_name}': {message}")]
    Manifest {
        source_name: String,
        message: String,
    },

    #[error("invalid config '{path}': {message}")]
    Config { path: String, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(all(feature = "cli", not(target_arch = "wasm32")))]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl EsquireError {
    pub fn manifest(source_name: impl Into<String>, message: impl std::fmt::Display) -> Self {
        EsquireError::Manifest {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    pub fn config(path: impl Into<String>, message: impl std::fmt::Display) -> Self {
        EsquireError::Config {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EsquireError>;
