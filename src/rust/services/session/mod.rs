//! Session - one resolver driven to quiescence on the CLI
//!
//! Alternates between draining the cooperative task queue and handling fetch
//! completions until nothing is queued and no fetch is in flight.

use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::loader::{register_builtins, Includer, LoadError};
use crate::engine::resolver::Resolver;
use crate::engine::scheduler::TaskQueue;
use crate::platform::config::AppConfig;
use crate::services::loader::{FetchLoader, LoadCompletion};
use crate::services::manifest::{FiredRequest, Manifest, ManifestTarget, Report};
use crate::shared::error::Result;
use crate::tools::logger::Logger;

/// Final state of a session
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub fired: Vec<FiredRequest>,
    pub waiting: Vec<String>,
    pub failed_loads: Vec<String>,
}

pub struct Session {
    queue: TaskQueue,
    loader: Rc<FetchLoader>,
    target: ManifestTarget,
    failures: Rc<RefCell<Vec<String>>>,
}

impl Session {
    pub fn new(config: &AppConfig, logger: Logger) -> Result<Self> {
        let queue = TaskQueue::new();
        let resolver = Resolver::builder(Rc::new(queue.clone()))
            .options(config.resolver_options())
            .logger(logger.clone())
            .build();

        let loader = Rc::new(FetchLoader::new(config.timeout())?);
        let includer = Includer::new(loader.clone(), logger.clone());

        let failures = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&failures);
        includer.set_error_handler(move |name: &str| {
            logger.error(format!("Error loading module: {}", name));
            sink.borrow_mut().push(name.to_string());
        });

        register_builtins(&resolver, &includer);

        Ok(Self {
            queue,
            loader,
            target: ManifestTarget {
                resolver,
                includer,
                report: Report::new(),
                base_url: config.base_url().map(str::to_string),
            },
            failures,
        })
    }

    pub fn resolver(&self) -> &Resolver {
        &self.target.resolver
    }

    /// Apply a manifest as if it were a script that just ran
    pub fn apply(&self, manifest: &Manifest, origin: &str) {
        manifest.apply(&self.target, origin);
    }

    /// Drive the resolver until no task is queued and no fetch is in flight.
    ///
    /// Must run inside a tokio `LocalSet`.
    pub async fn run_until_idle(&self) -> SessionOutcome {
        loop {
            self.queue.run_until_idle();

            while let Some(completion) = self.loader.take_completion() {
                self.complete(completion);
                self.queue.run_until_idle();
            }

            if self.loader.in_flight() == 0 && self.queue.is_empty() {
                break;
            }

            self.loader.completed().await;
        }

        SessionOutcome {
            fired: self.target.report.fired(),
            waiting: self.target.resolver.waiting_names(),
            failed_loads: self.failures.borrow().clone(),
        }
    }

    fn complete(&self, completion: LoadCompletion) {
        match completion {
            LoadCompletion::Loaded {
                url,
                body,
                on_success,
                on_failure,
            } => match Manifest::parse(&url, &body) {
                Ok(manifest) => {
                    manifest.apply(&self.target, &url);
                    on_success();
                }
                Err(e) => on_failure(LoadError::new(url, e.to_string())),
            },
            LoadCompletion::Failed { error, on_failure } => on_failure(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::value::Value;
    use std::fs;

    fn run_local<F: std::future::Future<Output = ()>>(future: F) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        tokio::task::LocalSet::new().block_on(&runtime, future);
    }

    #[test]
    fn test_session_follows_includes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let main = dir.path().join("main.toml");
        fs::write(
            &main,
            "[[require]]\nlabel = \"boot\"\ndeps = [\"db\", \"config\"]\n\n[[define]]\nname = \"config\"\nvalue = \"prod\"\n\n[[include]]\nurl = \"db.toml\"\n",
        )
        .expect("write main");
        fs::write(
            dir.path().join("db.toml"),
            "[[define]]\nname = \"db\"\ndeps = [\"config\"]\nvalue = \"connected\"\n",
        )
        .expect("write db");

        let origin = main.to_string_lossy().into_owned();
        let content = fs::read_to_string(&main).expect("read main");

        run_local(async move {
            let session = Session::new(&AppConfig::default(), Logger::capture()).expect("session");
            let manifest = Manifest::parse(&origin, &content).expect("parse");
            session.apply(&manifest, &origin);

            let outcome = session.run_until_idle().await;
            assert_eq!(outcome.fired.len(), 1);
            assert_eq!(outcome.fired[0].label, "boot");
            assert_eq!(
                outcome.fired[0].values,
                vec![Value::from("connected"), Value::from("prod")]
            );
            assert!(outcome.waiting.is_empty());
            assert!(outcome.failed_loads.is_empty());
        });
    }

    #[test]
    fn test_session_reports_failed_includes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let origin = dir.path().join("main.toml").to_string_lossy().into_owned();
        let manifest = Manifest::parse(
            &origin,
            "[[require]]\ndeps = \"db\"\n\n[[include]]\nurl = \"missing.toml\"\n",
        )
        .expect("parse");

        run_local(async move {
            let logger = Logger::capture();
            let session = Session::new(&AppConfig::default(), logger.clone()).expect("session");
            session.apply(&manifest, &origin);

            let outcome = session.run_until_idle().await;
            assert!(outcome.fired.is_empty());
            assert_eq!(outcome.waiting, vec!["db".to_string()]);
            assert_eq!(outcome.failed_loads.len(), 1);
            assert!(outcome.failed_loads[0].ends_with("missing.toml"));
            assert!(logger
                .lines()
                .iter()
                .any(|line| line.starts_with("[ERROR] Error loading module:")));
        });
    }

    #[test]
    fn test_builtins_are_registered() {
        run_local(async {
            let session = Session::new(&AppConfig::default(), Logger::capture()).expect("session");
            assert!(session.resolver().is_resolved("esquire"));
            assert!(session.resolver().is_resolved("include"));
        });
    }
}
