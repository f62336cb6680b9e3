#![cfg(feature = "cli")]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::resolver::ResolverOptions;

pub const CONFIG_FILE: &str = "esquire.toml";
pub const CONFIG_JSON_FILE: &str = "esquire.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub resolver: ResolverSection,
    pub loader: LoaderSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResolverSection {
    pub debug: bool,
    pub compact: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoaderSection {
    /// Prefix for relative include urls. Empty means relative to the including manifest.
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ResolverSection {
    fn default() -> Self {
        let options = ResolverOptions::default();
        Self {
            debug: options.debug,
            compact: options.compact,
        }
    }
}

impl Default for LoaderSection {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_ms: 10_000,
        }
    }
}

impl AppConfig {
    /// Load `esquire.toml` (or `esquire.json`) from `root`; defaults when neither exists
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let candidates = [root.join(CONFIG_FILE), root.join(CONFIG_JSON_FILE)];

        match candidates.iter().find(|path| path.exists()) {
            Some(path) => Self::load_from(path),
            None => Ok(AppConfig::default()),
        }
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("json") => load_json(path),
            Some("toml") => load_toml(path),
            // default: try toml then json
            _ => load_toml(path).or_else(|_| load_json(path)),
        }
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            debug: self.resolver.debug,
            compact: self.resolver.compact,
        }
    }

    pub fn base_url(&self) -> Option<&str> {
        let trimmed = self.loader.base_url.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.loader.timeout_ms.max(100))
    }

    /// Write the default config as TOML into `root`, returning its path
    pub fn write_default(root: impl AsRef<Path>) -> Result<PathBuf> {
        let root = root.as_ref();
        fs::create_dir_all(root)
            .with_context(|| format!("failed to create directory: {}", root.display()))?;
        let path = root.join(CONFIG_FILE);
        let content =
            toml::to_string_pretty(&AppConfig::default()).context("serialize default config")?;
        let mut file = File::create(&path)
            .with_context(|| format!("failed to create config file: {}", path.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("unable to write config file: {}", path.display()))?;
        Ok(path)
    }
}

fn load_json(path: &Path) -> Result<AppConfig> {
    let file = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config = serde_json::from_str(&file)
        .with_context(|| format!("invalid JSON config: {}", path.display()))?;
    Ok(config)
}

fn load_toml(path: &Path) -> Result<AppConfig> {
    let file = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config = toml::from_str(&file)
        .with_context(|| format!("invalid TOML config: {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = AppConfig::load(dir.path()).expect("load");
        assert_eq!(config, AppConfig::default());
        assert!(config.resolver.compact);
        assert!(!config.resolver.debug);
        assert_eq!(config.base_url(), None);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[resolver]\ndebug = true\n\n[loader]\nbase_url = \"https://cdn.example.com/mods/\"\n",
        )
        .expect("write config");

        let config = AppConfig::load(dir.path()).expect("load");
        assert!(config.resolver.debug);
        assert!(config.resolver.compact);
        assert_eq!(config.base_url(), Some("https://cdn.example.com/mods/"));
        assert_eq!(config.loader.timeout_ms, 10_000);
    }

    #[test]
    fn test_json_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join(CONFIG_JSON_FILE),
            r#"{ "resolver": { "compact": false } }"#,
        )
        .expect("write config");

        let config = AppConfig::load(dir.path()).expect("load");
        assert!(!config.resolver_options().compact);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[resolver\ndebug = ").expect("write config");
        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_written_default_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = AppConfig::write_default(dir.path()).expect("write");
        assert_eq!(AppConfig::load_from(path).expect("load"), AppConfig::default());
    }
}
