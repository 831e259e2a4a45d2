//! Model module - Application state and data types
//!
//! - `types`: focus and UI state
//! - `content`: movie records (search hits, details, watched entries)
//! - `cancel`: cooperative cancellation token
//! - `error`: request failure taxonomy
//! - `omdb_client`: OMDb API client behind the `MovieApi` trait
//! - `fetcher`: query-driven search with cancel-on-change
//! - `storage` / `watched`: durable slots and the write-through watched list
//! - `app_model`: main application model with state management methods

mod types;
mod content;
mod cancel;
mod error;
mod omdb_client;
mod fetcher;
mod storage;
mod watched;
mod app_model;

pub use types::{ActiveSection, UiState};

pub use content::{
    DetailState, DetailStatus, SearchResultItem, WatchedItem, WatchedSummary,
};

pub use error::FetchError;
pub use omdb_client::OmdbClient;
pub use fetcher::{FetchState, SearchSnapshot};
pub use storage::FileStorage;
pub use watched::WatchedStore;

pub use app_model::AppModel;

#[cfg(test)]
pub(crate) use content::MovieDetail;
#[cfg(test)]
pub(crate) use storage::{MemoryStorage, Storage};
#[cfg(test)]
pub(crate) use fetcher::tests as fakes;
