//! Native loader - fetches manifests from disk or over HTTP(S)
//!
//! Fetches run as local tokio tasks. Their results are parked in a completion
//! queue that the session drains between resolver passes, so scripts always
//! run on the session's own turn.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use tokio::sync::Notify;

use crate::engine::loader::{Completion, Failure, LoadError, Loader};
use crate::shared::error::{EsquireError, Result};

/// Outcome of one fetch, waiting to be handled by the session
pub enum LoadCompletion {
    Loaded {
        url: String,
        body: String,
        on_success: Completion,
        on_failure: Failure,
    },
    Failed {
        error: LoadError,
        on_failure: Failure,
    },
}

pub struct FetchLoader {
    client: reqwest::Client,
    completions: Rc<RefCell<VecDeque<LoadCompletion>>>,
    in_flight: Rc<Cell<usize>>,
    notify: Rc<Notify>,
}

impl FetchLoader {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            completions: Rc::new(RefCell::new(VecDeque::new())),
            in_flight: Rc::new(Cell::new(0)),
            notify: Rc::new(Notify::new()),
        })
    }

    /// Fetches started but not yet completed
    pub fn in_flight(&self) -> usize {
        self.in_flight.get()
    }

    pub fn take_completion(&self) -> Option<LoadCompletion> {
        self.completions.borrow_mut().pop_front()
    }

    pub fn has_completions(&self) -> bool {
        !self.completions.borrow().is_empty()
    }

    /// Wait until some fetch completes
    pub async fn completed(&self) {
        if self.has_completions() {
            return;
        }
        self.notify.notified().await;
    }
}

impl Loader for FetchLoader {
    fn load(&self, url: &str, on_success: Completion, on_failure: Failure) {
        let url = url.to_string();
        let client = self.client.clone();
        let completions = Rc::clone(&self.completions);
        let in_flight = Rc::clone(&self.in_flight);
        let notify = Rc::clone(&self.notify);

        in_flight.set(in_flight.get() + 1);
        tokio::task::spawn_local(async move {
            let completion = match fetch(&client, &url).await {
                Ok(body) => LoadCompletion::Loaded {
                    url,
                    body,
                    on_success,
                    on_failure,
                },
                Err(e) => LoadCompletion::Failed {
                    error: LoadError::new(url, e.to_string()),
                    on_failure,
                },
            };
            completions.borrow_mut().push_back(completion);
            in_flight.set(in_flight.get() - 1);
            notify.notify_one();
        });
    }
}

/// Read `url` from HTTP(S), a `file://` url, or a plain path
pub async fn fetch(client: &reqwest::Client, url: &str) -> Result<String> {
    if url.starts_with("http://") || url.starts_with("https://") {
        let body = client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        return Ok(body);
    }

    let path = url.strip_prefix("file://").unwrap_or(url);
    tokio::fs::read_to_string(path)
        .await
        .map_err(EsquireError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_local<F: std::future::Future<Output = ()>>(future: F) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        let local = tokio::task::LocalSet::new();
        local.block_on(&runtime, future);
    }

    #[test]
    fn test_file_load_parks_a_completion() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mod.toml");
        std::fs::write(&path, "[[define]]\nname = \"x\"\n").expect("write");
        let url = path.to_string_lossy().into_owned();

        run_local(async move {
            let loader = FetchLoader::new(Duration::from_secs(5)).expect("loader");
            loader.load(&url, Box::new(|| {}), Box::new(|_| panic!("should load")));
            assert_eq!(loader.in_flight(), 1);

            loader.completed().await;
            assert_eq!(loader.in_flight(), 0);
            match loader.take_completion() {
                Some(LoadCompletion::Loaded { body, url: loaded, .. }) => {
                    assert!(body.contains("name = \"x\""));
                    assert_eq!(loaded, url);
                }
                _ => panic!("expected a loaded completion"),
            }
        });
    }

    #[test]
    fn test_missing_file_parks_a_failure() {
        run_local(async {
            let loader = FetchLoader::new(Duration::from_secs(5)).expect("loader");
            loader.load(
                "file:///definitely/not/here.toml",
                Box::new(|| panic!("should fail")),
                Box::new(|_| {}),
            );

            loader.completed().await;
            match loader.take_completion() {
                Some(LoadCompletion::Failed { error, .. }) => {
                    assert_eq!(error.name, "file:///definitely/not/here.toml");
                }
                _ => panic!("expected a failed completion"),
            }
            assert!(loader.take_completion().is_none());
        });
    }
}
