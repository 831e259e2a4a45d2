//! Query-driven search fetcher
//!
//! Every change of the query cancels the request issued for the previous one
//! and starts a new request. A request only writes its outcome after
//! re-checking its token under the state lock, and `set_query` cancels under
//! that same lock, so a superseded result can never become visible.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::cancel::CancelToken;
use super::content::SearchResultItem;
use super::error::FetchError;
use super::omdb_client::MovieApi;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success(Vec<SearchResultItem>),
    Error(String),
}

impl FetchState {
    pub fn items(&self) -> &[SearchResultItem] {
        match self {
            FetchState::Success(items) => items,
            _ => &[],
        }
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Error(msg) => Some(msg),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }
}

/// Point-in-time copy for rendering
#[derive(Clone, Debug, Default)]
pub struct SearchSnapshot {
    pub query: String,
    pub state: FetchState,
    pub completed: u64,
}

#[derive(Default)]
struct Inner {
    query: String,
    state: FetchState,
    in_flight: Option<CancelToken>,
}

#[derive(Clone)]
pub struct SearchFetcher {
    api: Arc<dyn MovieApi>,
    inner: Arc<Mutex<Inner>>,
    completed: Arc<AtomicU64>,
}

impl SearchFetcher {
    pub fn new(api: Arc<dyn MovieApi>) -> Self {
        Self {
            api,
            inner: Arc::new(Mutex::new(Inner::default())),
            completed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Replace the query. Returns the handle of the spawned request, or `None`
    /// when the query did not change or is empty.
    pub async fn set_query(&self, query: impl Into<String>) -> Option<JoinHandle<()>> {
        let query = query.into();
        let mut inner = self.inner.lock().await;
        if inner.query == query {
            return None;
        }

        if let Some(previous) = inner.in_flight.take() {
            tracing::debug!(previous = %inner.query, "Cancelling superseded search");
            previous.cancel();
        }
        inner.query = query.clone();

        if query.is_empty() {
            inner.state = FetchState::Idle;
            return None;
        }

        let token = CancelToken::new();
        inner.in_flight = Some(token.clone());
        inner.state = FetchState::Loading;
        drop(inner);

        let api = self.api.clone();
        let shared = self.inner.clone();
        let completed = self.completed.clone();
        Some(tokio::spawn(async move {
            let result = api.search(&query, &token).await;

            let mut inner = shared.lock().await;
            if token.is_cancelled() {
                tracing::debug!(query = %query, "Dropping result of superseded search");
                return;
            }
            inner.in_flight = None;
            match result {
                Ok(items) => {
                    completed.fetch_add(1, Ordering::SeqCst);
                    tracing::info!(query = %query, results = items.len(), "Search completed");
                    inner.state = FetchState::Success(items);
                }
                Err(FetchError::Cancelled) => {
                    // Cancelled without going through `set_query`; leave state alone.
                }
                Err(e) => {
                    if e == FetchError::NotFound {
                        completed.fetch_add(1, Ordering::SeqCst);
                    }
                    tracing::warn!(query = %query, error = %e, "Search failed");
                    inner.state = FetchState::Error(e.to_string());
                }
            }
        }))
    }

    /// Cancel whatever is in flight. Used when the owner goes away.
    pub async fn shutdown(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(token) = inner.in_flight.take() {
            token.cancel();
        }
    }

    pub async fn query(&self) -> String {
        self.inner.lock().await.query.clone()
    }

    pub async fn state(&self) -> FetchState {
        self.inner.lock().await.state.clone()
    }

    pub async fn snapshot(&self) -> SearchSnapshot {
        let inner = self.inner.lock().await;
        SearchSnapshot {
            query: inner.query.clone(),
            state: inner.state.clone(),
            completed: self.completed(),
        }
    }

    /// Number of searches that got an answer and had it applied.
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::SeqCst)
    }
}
