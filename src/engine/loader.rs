//! Library loader: loads and configures the engine at most once

use super::traits::{EngineHandle, EngineSource};
use crate::config::EngineOptions;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Failure to bring the engine up
///
/// Cloneable so every caller waiting on the same attempt receives it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    /// The engine asset could not be fetched
    #[error("unable to load search engine: {0}")]
    Fetch(String),
    /// The engine loaded but rejected its configuration
    #[error("unable to initialize search engine: {0}")]
    Configure(String),
}

type LoadOutcome = Result<Arc<dyn EngineHandle>, LoadError>;
type PendingLoad = Shared<BoxFuture<'static, LoadOutcome>>;

enum LoaderState {
    Unloaded,
    Loading { attempt: u64, pending: PendingLoad },
    Ready(Arc<dyn EngineHandle>),
}

/// Coarse view of the loader state, for logs and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderStatus {
    Unloaded,
    Loading,
    Ready,
}

/// Memoizes the engine load so concurrent callers share one attempt
pub struct LibraryLoader {
    source: Arc<dyn EngineSource>,
    options: EngineOptions,
    state: Mutex<LoaderState>,
    attempts: Mutex<u64>,
}

impl LibraryLoader {
    /// Create a loader; nothing is fetched until the first `ensure_loaded`
    pub fn new(source: Arc<dyn EngineSource>, options: EngineOptions) -> Self {
        Self {
            source,
            options,
            state: Mutex::new(LoaderState::Unloaded),
            attempts: Mutex::new(0),
        }
    }

    /// Current state
    pub fn status(&self) -> LoaderStatus {
        match &*self.state.lock() {
            LoaderState::Unloaded => LoaderStatus::Unloaded,
            LoaderState::Loading { .. } => LoaderStatus::Loading,
            LoaderState::Ready(_) => LoaderStatus::Ready,
        }
    }

    /// Number of load attempts started so far
    pub fn attempts(&self) -> u64 {
        *self.attempts.lock()
    }

    /// Return the configured engine, loading it first if needed.
    ///
    /// A failed attempt resets the loader so the next call starts over.
    pub async fn ensure_loaded(&self) -> Result<Arc<dyn EngineHandle>, LoadError> {
        let (attempt, pending) = {
            let mut state = self.state.lock();
            match &*state {
                LoaderState::Ready(handle) => return Ok(handle.clone()),
                LoaderState::Loading { attempt, pending } => {
                    debug!("Joining in-flight engine load #{}", attempt);
                    (*attempt, pending.clone())
                }
                LoaderState::Unloaded => {
                    let attempt = {
                        let mut attempts = self.attempts.lock();
                        *attempts += 1;
                        *attempts
                    };
                    info!(
                        "Loading search engine from {} (attempt #{})",
                        self.source.name(),
                        attempt
                    );
                    let pending = self.start_load();
                    *state = LoaderState::Loading {
                        attempt,
                        pending: pending.clone(),
                    };
                    (attempt, pending)
                }
            }
        };

        let outcome = pending.await;
        self.settle(attempt, &outcome);
        outcome
    }

    fn start_load(&self) -> PendingLoad {
        load_and_configure(self.source.clone(), self.options.clone())
            .boxed()
            .shared()
    }

    /// Record the outcome of `attempt`, unless a later attempt already owns the state
    fn settle(&self, attempt: u64, outcome: &LoadOutcome) {
        let mut state = self.state.lock();
        let current = matches!(&*state, LoaderState::Loading { attempt: a, .. } if *a == attempt);
        if !current {
            return;
        }

        *state = match outcome {
            Ok(handle) => {
                info!("Search engine ready");
                LoaderState::Ready(handle.clone())
            }
            Err(e) => {
                warn!("Search engine load failed: {}", e);
                LoaderState::Unloaded
            }
        };
    }
}

async fn load_and_configure(source: Arc<dyn EngineSource>, options: EngineOptions) -> LoadOutcome {
    let mut handle = source
        .load()
        .await
        .map_err(|e| LoadError::Fetch(format!("{:#}", e)))?;
    handle
        .configure(&options)
        .await
        .map_err(|e| LoadError::Configure(format!("{:#}", e)))?;
    Ok(Arc::from(handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fake::FakeSource;
    use futures::future::join_all;
    use std::time::Duration;
    use tokio_test::assert_ok;

    fn load_error(outcome: LoadOutcome) -> LoadError {
        match outcome {
            Ok(_) => panic!("expected the load to fail"),
            Err(e) => e,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_one_load() {
        let source = Arc::new(FakeSource::new().with_load_delay(Duration::from_millis(50)));
        let loader = LibraryLoader::new(source.clone(), EngineOptions::default());

        let handles = join_all((0..8).map(|_| loader.ensure_loaded())).await;

        assert_eq!(source.loads(), 1);
        assert_eq!(loader.attempts(), 1);
        let first = assert_ok!(handles[0].clone());
        for handle in handles {
            assert!(Arc::ptr_eq(&first, &handle.unwrap()));
        }
        assert_eq!(loader.status(), LoaderStatus::Ready);
    }

    #[tokio::test]
    async fn test_ready_handle_is_reused() {
        let source = Arc::new(FakeSource::new());
        let loader = LibraryLoader::new(source.clone(), EngineOptions::default());

        let first = loader.ensure_loaded().await.unwrap();
        let second = loader.ensure_loaded().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.loads(), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_retried() {
        let source = Arc::new(FakeSource::new().failing_loads(1));
        let loader = LibraryLoader::new(source.clone(), EngineOptions::default());

        let err = load_error(loader.ensure_loaded().await);
        assert!(matches!(err, LoadError::Fetch(_)));
        assert_eq!(loader.status(), LoaderStatus::Unloaded);

        assert_ok!(loader.ensure_loaded().await);
        assert_eq!(source.loads(), 2);
        assert_eq!(loader.status(), LoaderStatus::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waiters_share_the_failure() {
        let source = Arc::new(
            FakeSource::new()
                .failing_loads(1)
                .with_load_delay(Duration::from_millis(20)),
        );
        let loader = LibraryLoader::new(source.clone(), EngineOptions::default());

        let outcomes = join_all((0..3).map(|_| loader.ensure_loaded())).await;

        assert_eq!(source.loads(), 1);
        assert!(outcomes.iter().all(|o| o.is_err()));
        assert_eq!(loader.status(), LoaderStatus::Unloaded);
    }

    #[tokio::test]
    async fn test_configure_failure_resets() {
        let source = Arc::new(FakeSource::new().rejecting_configuration());
        let loader = LibraryLoader::new(source.clone(), EngineOptions::default());

        let err = load_error(loader.ensure_loaded().await);
        assert!(matches!(err, LoadError::Configure(_)));
        assert!(err.to_string().contains("initialize"));
        assert_eq!(loader.status(), LoaderStatus::Unloaded);
    }

    #[tokio::test]
    async fn test_options_reach_the_engine() {
        let source = Arc::new(FakeSource::new());
        let options = EngineOptions {
            language: Some("zh-cn".to_string()),
            ..Default::default()
        };
        let loader = LibraryLoader::new(source.clone(), options.clone());

        loader.ensure_loaded().await.unwrap();

        assert_eq!(source.configured_with(), vec![options]);
    }
}
