#![cfg(feature = "cli")]

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::platform::config::AppConfig;
use crate::services::manifest::Manifest;
use crate::services::session::{Session, SessionOutcome};
use crate::shared::debugger::DebugTimer;
use crate::tools::cli::state::CliContext;
use crate::tools::logger::LogLevel;

#[derive(Debug, Clone, Args)]
pub struct RunCommand {
    /// Path to the manifest to apply (a directory means `<dir>/main.toml`)
    #[arg(default_value = "./")]
    pub manifest: String,

    /// Log each resolver pass
    #[arg(long)]
    pub debug: bool,

    /// Fail when any module is still awaited once everything settles
    #[arg(long)]
    pub strict: bool,

    /// Explicit config file (defaults to esquire.toml/esquire.json in the current directory)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl RunCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let logger = ctx.logger();

        let mut config = match &self.config {
            Some(path) => AppConfig::load_from(path)?,
            None => AppConfig::load(std::env::current_dir()?)?,
        };
        if self.debug {
            config.resolver.debug = true;
        }

        let manifest_path = PathBuf::from(&self.manifest);
        let manifest_path = if manifest_path.is_dir() {
            manifest_path.join("main.toml")
        } else {
            manifest_path
        };
        if !manifest_path.exists() {
            anyhow::bail!("Manifest not found: {}", manifest_path.display());
        }

        let origin = manifest_path.to_string_lossy().into_owned();
        let content = tokio::fs::read_to_string(&manifest_path)
            .await
            .with_context(|| format!("failed to read manifest: {}", origin))?;
        let manifest = Manifest::parse(&origin, &content)?;

        logger.action(format!("Resolving '{}'...", origin));

        let timer = config
            .resolver
            .debug
            .then(|| DebugTimer::new("resolution").reporting_to(&logger));

        let session = Session::new(&config, (*logger).clone())?;
        session.apply(&manifest, &origin);
        let outcome = session.run_until_idle().await;

        drop(timer);
        self.report(ctx, &outcome)
    }

    fn report(&self, ctx: &CliContext, outcome: &SessionOutcome) -> Result<()> {
        let logger = ctx.logger();

        for request in &outcome.fired {
            let values: Vec<serde_json::Value> =
                request.values.iter().map(|value| value.to_json()).collect();
            logger.success(format!(
                "{} -> {}",
                request.label,
                serde_json::to_string(&values)?
            ));
        }

        if !outcome.failed_loads.is_empty() {
            logger.log_with_details(
                LogLevel::Warning,
                format!("{} include(s) failed", outcome.failed_loads.len()),
                outcome.failed_loads.iter().cloned(),
            );
        }

        if outcome.waiting.is_empty() {
            logger.info(format!("{} request(s) fired, nothing waiting", outcome.fired.len()));
            return Ok(());
        }

        logger.warn(format!("still waiting: {}", outcome.waiting.join(",")));
        if self.strict {
            anyhow::bail!("Unresolved modules: {}", outcome.waiting.join(","));
        }

        Ok(())
    }
}
