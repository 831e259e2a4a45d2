//! Main application model with state management

use std::sync::Arc;
use std::time::Instant;
use anyhow::Result;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::cancel::CancelToken;
use super::content::{DetailState, DetailStatus, WatchedItem, WatchedSummary};
use super::error::FetchError;
use super::fetcher::{SearchFetcher, SearchSnapshot};
use super::omdb_client::MovieApi;
use super::types::{ActiveSection, UiState};
use super::watched::WatchedStore;

const ERROR_DISPLAY_SECS: u64 = 5;

/// Main application model containing all state
pub struct AppModel {
    api: Arc<dyn MovieApi>,
    fetcher: SearchFetcher,
    pub watched: Arc<Mutex<WatchedStore>>,
    pub ui_state: Arc<Mutex<UiState>>,
    detail_request: Arc<Mutex<Option<CancelToken>>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new(api: Arc<dyn MovieApi>, watched: WatchedStore) -> Self {
        Self {
            fetcher: SearchFetcher::new(api.clone()),
            api,
            watched: Arc::new(Mutex::new(watched)),
            ui_state: Arc::new(Mutex::new(UiState::default())),
            detail_request: Arc::new(Mutex::new(None)),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    // ---- search ----

    pub async fn get_search_snapshot(&self) -> SearchSnapshot {
        self.fetcher.snapshot().await
    }

    pub async fn search_query(&self) -> String {
        self.fetcher.query().await
    }

    /// Change the query. A real change also closes the detail panel and
    /// resets the result cursor.
    pub async fn set_search_query(&self, query: String) -> Option<JoinHandle<()>> {
        if self.fetcher.query().await != query {
            self.close_details().await;
            self.ui_state.lock().await.results_selected = 0;
        }
        self.fetcher.set_query(query).await
    }

    pub async fn append_to_search(&self, c: char) -> Option<JoinHandle<()>> {
        let mut query = self.fetcher.query().await;
        query.push(c);
        self.set_search_query(query).await
    }

    pub async fn backspace_search(&self) -> Option<JoinHandle<()>> {
        let mut query = self.fetcher.query().await;
        if query.pop().is_none() {
            return None;
        }
        self.set_search_query(query).await
    }

    pub async fn clear_search(&self) {
        self.set_search_query(String::new()).await;
    }

    // ---- focus and selection ----

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn active_section(&self) -> ActiveSection {
        self.ui_state.lock().await.active_section
    }

    pub async fn set_active_section(&self, section: ActiveSection) {
        self.ui_state.lock().await.active_section = section;
    }

    pub async fn cycle_section_forward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.next();
    }

    pub async fn cycle_section_backward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.prev();
    }

    pub async fn move_selection_up(&self) {
        let mut state = self.ui_state.lock().await;
        match state.active_section {
            ActiveSection::Results => {
                state.results_selected = state.results_selected.saturating_sub(1);
            }
            ActiveSection::Watched => {
                state.watched_selected = state.watched_selected.saturating_sub(1);
            }
            ActiveSection::Search => {}
        }
    }

    pub async fn move_selection_down(&self) {
        let results_len = self.fetcher.state().await.items().len();
        let watched_len = self.watched.lock().await.len();
        let mut state = self.ui_state.lock().await;
        match state.active_section {
            ActiveSection::Results => {
                if state.results_selected < results_len.saturating_sub(1) {
                    state.results_selected += 1;
                }
            }
            ActiveSection::Watched => {
                if state.watched_selected < watched_len.saturating_sub(1) {
                    state.watched_selected += 1;
                }
            }
            ActiveSection::Search => {}
        }
    }

    /// Identifier under the cursor of the focused list, if any.
    pub async fn get_selected_movie_id(&self) -> Option<String> {
        let state = self.ui_state.lock().await.clone();
        match state.active_section {
            ActiveSection::Results => self
                .fetcher
                .state()
                .await
                .items()
                .get(state.results_selected)
                .map(|m| m.id.clone()),
            ActiveSection::Watched => self
                .watched
                .lock()
                .await
                .items()
                .get(state.watched_selected)
                .map(|m| m.id.clone()),
            ActiveSection::Search => None,
        }
    }

    // ---- watched list ----

    pub async fn get_watched_items(&self) -> Vec<WatchedItem> {
        self.watched.lock().await.items().to_vec()
    }

    pub async fn get_watched_summary(&self) -> WatchedSummary {
        self.watched.lock().await.summary()
    }

    // ---- details ----

    pub async fn is_details_open(&self) -> bool {
        self.ui_state.lock().await.details.is_some()
    }

    /// Open the detail panel for `id`, or close it if `id` is already shown.
    ///
    /// Watched movies are served from the list; anything else is fetched and
    /// the handle of that request is returned.
    pub async fn toggle_details(&self, id: &str) -> Option<JoinHandle<()>> {
        let already_open = self
            .ui_state
            .lock()
            .await
            .details
            .as_ref()
            .is_some_and(|d| d.id == id);
        if already_open {
            self.close_details().await;
            return None;
        }
        self.open_details(id).await
    }

    pub async fn open_details(&self, id: &str) -> Option<JoinHandle<()>> {
        let mut request = self.detail_request.lock().await;
        if let Some(previous) = request.take() {
            previous.cancel();
        }

        if let Some(item) = self.watched.lock().await.find(id).cloned() {
            tracing::debug!(id, "Showing watched movie from list");
            self.ui_state.lock().await.details = Some(DetailState::watched(item));
            return None;
        }

        let token = CancelToken::new();
        *request = Some(token.clone());
        self.ui_state.lock().await.details = Some(DetailState::loading(id));
        drop(request);

        let api = self.api.clone();
        let ui_state = self.ui_state.clone();
        let id = id.to_string();
        Some(tokio::spawn(async move {
            let result = api.details(&id, &token).await;

            let mut state = ui_state.lock().await;
            if token.is_cancelled() {
                return;
            }
            let Some(details) = state.details.as_mut().filter(|d| d.id == id) else {
                return;
            };
            match result {
                Ok(detail) => {
                    tracing::info!(id = %id, title = %detail.title, "Movie details loaded");
                    details.status = DetailStatus::Fetched(detail);
                }
                Err(FetchError::Cancelled) => {}
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "Could not load movie details");
                    details.status = DetailStatus::Failed(e.to_string());
                }
            }
        }))
    }

    pub async fn close_details(&self) {
        if let Some(token) = self.detail_request.lock().await.take() {
            token.cancel();
        }
        self.ui_state.lock().await.details = None;
    }

    pub async fn set_detail_rating(&self, rating: u8) {
        let mut state = self.ui_state.lock().await;
        if let Some(details) = state.details.as_mut().filter(|d| d.can_rate()) {
            details.user_rating = rating.min(WatchedItem::MAX_RATING);
        }
    }

    pub async fn adjust_detail_rating(&self, delta: i8) {
        let mut state = self.ui_state.lock().await;
        if let Some(details) = state.details.as_mut().filter(|d| d.can_rate()) {
            let next = (details.user_rating as i16 + delta as i16)
                .clamp(0, WatchedItem::MAX_RATING as i16);
            details.user_rating = next as u8;
        }
    }

    /// Add the open movie with the chosen rating to the watched list and close
    /// the panel. `Ok(false)` when there is nothing rateable open.
    pub async fn commit_rating(&self) -> Result<bool> {
        let item = {
            let state = self.ui_state.lock().await;
            match state.details.as_ref() {
                Some(DetailState { id, status: DetailStatus::Fetched(detail), user_rating }) => {
                    WatchedItem::from_detail(id, detail, *user_rating)
                }
                _ => return Ok(false),
            }
        };

        let pushed = self.watched.lock().await.push(item);
        self.close_details().await;
        pushed
    }

    // ---- errors and popups ----

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed().as_secs() > ERROR_DISPLAY_SECS {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }

    pub async fn toggle_help_popup(&self) {
        let mut state = self.ui_state.lock().await;
        state.show_help_popup = !state.show_help_popup;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    // ---- lifecycle ----

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    /// Cancel every outstanding request.
    pub async fn shutdown(&self) {
        self.fetcher.shutdown().await;
        if let Some(token) = self.detail_request.lock().await.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::model::content::MovieDetail;
    use crate::model::fetcher::tests::{item, FakeApi};
    use crate::model::fetcher::FetchState;
    use crate::model::storage::{MemoryStorage, Storage};

    fn detail(id: &str, title: &str) -> MovieDetail {
        MovieDetail {
            id: id.to_string(),
            title: title.to_string(),
            year: "1999".to_string(),
            runtime: "136 min".to_string(),
            imdb_rating: "8.7".to_string(),
            ..Default::default()
        }
    }

    fn model_with(api: FakeApi) -> (AppModel, Arc<dyn Storage>) {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let store = WatchedStore::open(storage.clone(), "watched");
        (AppModel::new(Arc::new(api), store), storage)
    }

    async fn settle(handle: Option<JoinHandle<()>>) {
        if let Some(h) = handle {
            tokio::time::timeout(Duration::from_secs(2), h)
                .await
                .expect("request should settle")
                .expect("task panicked");
        }
    }

    #[tokio::test]
    async fn typing_builds_the_query_and_backspace_shrinks_it() {
        let (model, _) = model_with(FakeApi::default());
        settle(model.append_to_search('a').await).await;
        settle(model.append_to_search('b').await).await;
        assert_eq!(model.search_query().await, "ab");

        settle(model.backspace_search().await).await;
        assert_eq!(model.search_query().await, "a");
        settle(model.backspace_search().await).await;
        assert_eq!(model.search_query().await, "");
        assert!(model.backspace_search().await.is_none());
        assert_eq!(model.get_search_snapshot().await.state, FetchState::Idle);
    }

    #[tokio::test]
    async fn rating_a_fetched_movie_adds_it_to_the_watched_list() {
        let mut api = FakeApi::default();
        api.answers.insert("matrix".into(), Ok(vec![item("tt0133093", "The Matrix")]));
        api.details.insert("tt0133093".into(), detail("tt0133093", "The Matrix"));
        let (model, storage) = model_with(api);

        settle(model.set_search_query("matrix".into()).await).await;
        model.set_active_section(ActiveSection::Results).await;
        let id = model.get_selected_movie_id().await.expect("a result is selected");

        settle(model.toggle_details(&id).await).await;
        let state = model.get_ui_state().await;
        assert!(matches!(
            state.details.as_ref().map(|d| &d.status),
            Some(DetailStatus::Fetched(_))
        ));

        model.set_detail_rating(9).await;
        model.adjust_detail_rating(3).await;
        assert!(model.commit_rating().await.unwrap());

        assert!(!model.is_details_open().await);
        let watched = model.get_watched_items().await;
        assert_eq!(watched.len(), 1);
        assert_eq!(watched[0].user_rating, 10);
        assert_eq!(watched[0].runtime, 136);
        assert!(storage.read("watched").unwrap().unwrap().contains("tt0133093"));
    }

    #[tokio::test]
    async fn watched_movie_is_shown_without_a_request_and_cannot_be_rerated() {
        let mut api = FakeApi::default();
        api.details.insert("tt1".into(), detail("tt1", "One"));
        let (model, _) = model_with(api);

        settle(model.open_details("tt1").await).await;
        model.set_detail_rating(4).await;
        model.commit_rating().await.unwrap();

        let handle = model.toggle_details("tt1").await;
        assert!(handle.is_none());
        let details = model.get_ui_state().await.details.expect("panel open");
        assert!(matches!(details.status, DetailStatus::Watched(_)));
        assert_eq!(details.user_rating, 4);

        model.set_detail_rating(9).await;
        assert!(!model.commit_rating().await.unwrap());
        assert_eq!(model.get_watched_items().await[0].user_rating, 4);
    }

    #[tokio::test]
    async fn selecting_the_open_movie_again_closes_the_panel() {
        let mut api = FakeApi::default();
        api.details.insert("tt1".into(), detail("tt1", "One"));
        let (model, _) = model_with(api);

        settle(model.toggle_details("tt1").await).await;
        assert!(model.is_details_open().await);
        assert!(model.toggle_details("tt1").await.is_none());
        assert!(!model.is_details_open().await);
    }

    #[tokio::test]
    async fn unknown_movie_shows_failure_in_panel() {
        let (model, _) = model_with(FakeApi::default());
        settle(model.open_details("tt404").await).await;
        let details = model.get_ui_state().await.details.unwrap();
        match details.status {
            DetailStatus::Failed(msg) => assert_eq!(msg, "Movie not found"),
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[tokio::test]
    async fn query_change_closes_details() {
        let mut api = FakeApi::default();
        api.details.insert("tt1".into(), detail("tt1", "One"));
        let (model, _) = model_with(api);

        settle(model.open_details("tt1").await).await;
        settle(model.set_search_query("x".into()).await).await;
        assert!(!model.is_details_open().await);
    }

    #[tokio::test]
    async fn selection_is_clamped_to_list_length() {
        let mut api = FakeApi::default();
        api.answers.insert("a".into(), Ok(vec![item("tt1", "A"), item("tt2", "B")]));
        let (model, _) = model_with(api);

        settle(model.set_search_query("a".into()).await).await;
        model.set_active_section(ActiveSection::Results).await;
        for _ in 0..5 {
            model.move_selection_down().await;
        }
        assert_eq!(model.get_selected_movie_id().await.as_deref(), Some("tt2"));
        for _ in 0..5 {
            model.move_selection_up().await;
        }
        assert_eq!(model.get_selected_movie_id().await.as_deref(), Some("tt1"));

        model.set_active_section(ActiveSection::Watched).await;
        assert_eq!(model.get_selected_movie_id().await, None);
    }
}
