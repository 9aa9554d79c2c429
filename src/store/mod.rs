// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Remote tune store.
//!
//! This module provides:
//! - The `TuneService` persistence contract (list and create)
//! - `TuneStore`, which caches the last loaded tunes and applies results
//! - An HTTP/JSON implementation of the service
//!
//! Requests are split from their results: `TuneStore::request` returns a
//! detached future the event loop can spawn, and `TuneStore::apply` folds the
//! result back into the cache on the event loop.

pub mod http;

pub use http::HttpTuneService;

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::music::Tune;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport or decoding failure
    #[error("tune service request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered with a non-success status
    #[error("tune service returned {status} for {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },
    /// The service could not be reached for another reason
    #[error("tune service unavailable: {0}")]
    Unavailable(String),
}

/// Persistence contract for tunes
pub trait TuneService: Send + Sync + 'static {
    /// Fetch every stored tune
    fn list(&self) -> impl Future<Output = Result<Vec<Tune>, StoreError>> + Send;

    /// Store a new tune and return it as created
    fn create(&self, tune: &Tune) -> impl Future<Output = Result<Tune, StoreError>> + Send;
}

/// Deferred store work requested by the application
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Reload the tune list
    LoadTunes,
    /// Create a tune
    CreateTune(Tune),
}

/// Result of a store request, delivered back to the event loop
#[derive(Debug)]
pub enum StoreEvent {
    /// Outcome of a list request
    Listed(Result<Vec<Tune>, StoreError>),
    /// Outcome of a create request
    Created(Result<Tune, StoreError>),
}

/// The last successfully loaded tunes and the current selection
#[derive(Debug, Clone, Default)]
pub struct TuneCollection {
    tunes: Vec<Tune>,
    selected: Option<usize>,
}

impl TuneCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents; the selection moves to the first tune
    pub fn replace(&mut self, tunes: Vec<Tune>) {
        self.selected = if tunes.is_empty() { None } else { Some(0) };
        self.tunes = tunes;
    }

    /// Select the tune at `index`; out-of-range indices are ignored
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.tunes.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    /// Index of the selected tune
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// The selected tune
    pub fn selected(&self) -> Option<&Tune> {
        self.selected.and_then(|i| self.tunes.get(i))
    }

    /// All tunes in service order
    pub fn tunes(&self) -> &[Tune] {
        &self.tunes
    }

    /// Number of tunes
    pub fn len(&self) -> usize {
        self.tunes.len()
    }

    /// Check if no tunes are loaded
    pub fn is_empty(&self) -> bool {
        self.tunes.is_empty()
    }
}

/// Boundary adapter over a tune service
pub struct TuneStore<S> {
    service: Arc<S>,
    collection: TuneCollection,
}

impl<S: TuneService> TuneStore<S> {
    /// Create a store with an empty collection
    pub fn new(service: S) -> Self {
        Self {
            service: Arc::new(service),
            collection: TuneCollection::new(),
        }
    }

    /// Get the underlying service
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Loaded tunes and selection
    pub fn collection(&self) -> &TuneCollection {
        &self.collection
    }

    /// Mutable access to the selection
    pub fn collection_mut(&mut self) -> &mut TuneCollection {
        &mut self.collection
    }

    /// Build the request future for `effect`, detached from the store
    pub fn request(&self, effect: Effect) -> impl Future<Output = StoreEvent> + Send + 'static {
        let service = Arc::clone(&self.service);
        async move {
            match effect {
                Effect::LoadTunes => StoreEvent::Listed(service.list().await),
                Effect::CreateTune(tune) => StoreEvent::Created(service.create(&tune).await),
            }
        }
    }

    /// Fold a request result into the store.
    ///
    /// Failures are logged and leave the cache untouched. A successful
    /// create asks for a fresh list.
    pub fn apply(&mut self, event: StoreEvent) -> Option<Effect> {
        match event {
            StoreEvent::Listed(Ok(tunes)) => {
                info!(count = tunes.len(), "tunes loaded");
                self.collection.replace(tunes);
                None
            }
            StoreEvent::Listed(Err(e)) => {
                warn!(error = %e, "failed to load tunes");
                None
            }
            StoreEvent::Created(Ok(tune)) => {
                info!(name = %tune.name, events = tune.len(), "tune created");
                Some(Effect::LoadTunes)
            }
            StoreEvent::Created(Err(e)) => {
                warn!(error = %e, "failed to create tune");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// In-memory service with scripted list failures and a request log
    #[derive(Default)]
    pub struct MockService {
        pub stored: Mutex<Vec<Tune>>,
        pub created: Mutex<Vec<Tune>>,
        pub list_calls: Mutex<usize>,
        /// Results consumed by successive list calls; `true` fails the call
        pub list_failures: Mutex<VecDeque<bool>>,
        pub fail_create: bool,
    }

    impl MockService {
        pub fn with_tunes(tunes: Vec<Tune>) -> Self {
            Self {
                stored: Mutex::new(tunes),
                ..Default::default()
            }
        }

        pub fn request_count(&self) -> usize {
            *self.list_calls.lock().unwrap() + self.created.lock().unwrap().len()
        }
    }

    impl TuneService for MockService {
        async fn list(&self) -> Result<Vec<Tune>, StoreError> {
            *self.list_calls.lock().unwrap() += 1;
            let fail = self.list_failures.lock().unwrap().pop_front().unwrap_or(false);
            if fail {
                return Err(StoreError::Unavailable("scripted failure".to_string()));
            }
            Ok(self.stored.lock().unwrap().clone())
        }

        async fn create(&self, tune: &Tune) -> Result<Tune, StoreError> {
            self.created.lock().unwrap().push(tune.clone());
            if self.fail_create {
                return Err(StoreError::Status {
                    status: 500,
                    url: "mock://tunes".to_string(),
                });
            }
            self.stored.lock().unwrap().push(tune.clone());
            Ok(tune.clone())
        }
    }
}
