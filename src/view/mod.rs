//! View module - UI rendering
//!
//! - `utils`: Shared helpers (scrollable lists, truncation, rating stars)
//! - `layout`: Top bar with the search field, bottom status bar
//! - `content`: Results, watched list and movie details panels
//! - `overlays`: Modal overlays (error, help)

mod utils;
mod layout;
mod content;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{SearchSnapshot, UiState, WatchedItem, WatchedSummary};

pub struct AppView;

impl AppView {
    pub fn render(
        frame: &mut Frame,
        search: &SearchSnapshot,
        ui_state: &UiState,
        watched: &[WatchedItem],
        summary: &WatchedSummary,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Logo + search + result count
                Constraint::Min(0),    // Results | details or watched
                Constraint::Length(1), // Status bar
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], search, ui_state);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(45),
                Constraint::Percentage(55),
            ])
            .split(chunks[1]);

        content::render_results(frame, main_chunks[0], search, ui_state);

        match &ui_state.details {
            Some(details) => content::render_details(frame, main_chunks[1], details),
            None => content::render_watched(frame, main_chunks[1], watched, summary, ui_state),
        }

        layout::render_status_bar(frame, chunks[2], search);

        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
