//! Detail panel actions

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use super::AppController;

impl AppController {
    /// Keys for the open detail panel. Returns `true` when consumed; `false`
    /// when no panel is open or the key means nothing there.
    pub(crate) async fn handle_details_key(&self, key: KeyEvent) -> Result<bool> {
        let model = self.model.lock().await;
        let Some(details) = model.get_ui_state().await.details else {
            return Ok(false);
        };
        let can_rate = details.can_rate();
        // With a row under the cursor Enter opens or closes that row instead
        let enter_selects_row =
            key.code == KeyCode::Enter && model.get_selected_movie_id().await.is_some();

        match key.code {
            KeyCode::Backspace => {
                model.close_details().await;
                Ok(true)
            }
            KeyCode::Char(c) if can_rate && c.is_ascii_digit() => {
                let rating = match c.to_digit(10) {
                    Some(0) => 10,
                    Some(d) => d as u8,
                    None => return Ok(false),
                };
                model.set_detail_rating(rating).await;
                Ok(true)
            }
            KeyCode::Left if can_rate => {
                model.adjust_detail_rating(-1).await;
                Ok(true)
            }
            KeyCode::Right if can_rate => {
                model.adjust_detail_rating(1).await;
                Ok(true)
            }
            KeyCode::Enter if enter_selects_row => Ok(false),
            KeyCode::Enter | KeyCode::Char('a') | KeyCode::Char('A') if can_rate => {
                drop(model);
                self.add_open_movie_to_watched().await;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub async fn add_open_movie_to_watched(&self) {
        let model = self.model.lock().await;
        match model.commit_rating().await {
            Ok(true) => {}
            Ok(false) => tracing::debug!("Nothing rateable to add"),
            Err(e) => {
                tracing::error!(error = %e, "Could not save watched list");
                model.set_error(Self::format_error(&e)).await;
            }
        }
    }
}
