#![cfg(feature = "cli")]

use anyhow::Result;
use clap::Args;
use std::fs;
use std::path::PathBuf;

use crate::platform::config::{AppConfig, CONFIG_FILE};
use crate::tools::cli::state::CliContext;

const SAMPLE_MANIFEST: &str = r#"# Modules defined here resolve once all their deps are available.

[[define]]
name = "config"
value = { env = "dev" }

[[define]]
name = "app"
deps = ["config"]

[[require]]
label = "boot"
deps = ["app"]
"#;

#[derive(Debug, Clone, Args)]
pub struct InitCommand {
    /// Target directory (defaults to the current directory)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,
}

impl InitCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let logger = ctx.logger();

        let target = match &self.dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        if target.join(CONFIG_FILE).exists() {
            logger.error(format!(
                "'{}' already exists in '{}'",
                CONFIG_FILE,
                target.display()
            ));
            anyhow::bail!("Project already initialized");
        }

        logger.action(format!("Initializing esquire in '{}'...", target.display()));

        let config_path = AppConfig::write_default(&target)?;
        let manifest_path = target.join("main.toml");
        if !manifest_path.exists() {
            fs::write(&manifest_path, SAMPLE_MANIFEST)?;
        }

        logger.success(format!(
            "Wrote '{}' and '{}'",
            config_path.display(),
            manifest_path.display()
        ));
        logger.info("Next steps:");
        logger.info("  esquire run main.toml");

        Ok(())
    }
}
