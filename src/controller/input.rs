//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::ActiveSection;
use super::keys::key_name;
use super::AppController;

impl AppController {
    /// Route a key event: the focused panel sees presses first; anything it
    /// does not consume goes to the shortcut dispatcher.
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        let name = key_name(key.code);
        if key.kind == KeyEventKind::Release {
            if let Some(name) = &name {
                if self.swallowed.lock().await.remove(name) {
                    return Ok(());
                }
            }
        } else if self.handle_focused_key(key).await? {
            if let Some(name) = name {
                if self.dispatcher.trigger() == KeyEventKind::Release {
                    self.swallowed.lock().await.insert(name);
                }
            }
            return Ok(());
        }

        if self.dispatcher.dispatch(&key) > 0 {
            self.run_pending_commands().await;
        }
        Ok(())
    }

    /// Returns `true` when the key was consumed.
    async fn handle_focused_key(&self, key: KeyEvent) -> Result<bool> {
        let model = self.model.lock().await;

        // Error message blocks all other interactions
        if model.has_error().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                model.clear_error().await;
            }
            return Ok(true);
        }

        if model.is_help_popup_open().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?')) {
                model.hide_help_popup().await;
            }
            return Ok(true);
        }

        let section = model.active_section().await;
        drop(model);

        if section != ActiveSection::Search && self.handle_details_key(key).await? {
            return Ok(true);
        }

        let model = self.model.lock().await;
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if section == ActiveSection::Search {
            match key.code {
                KeyCode::Tab | KeyCode::Down => {
                    model.cycle_section_forward().await;
                    return Ok(true);
                }
                KeyCode::BackTab => {
                    model.cycle_section_backward().await;
                    return Ok(true);
                }
                KeyCode::Backspace => {
                    model.backspace_search().await;
                    return Ok(true);
                }
                KeyCode::Char(c) => {
                    // Q still quits in the search field when Ctrl is held
                    if ctrl && (c == 'q' || c == 'Q') {
                        model.set_should_quit(true).await;
                    } else if !ctrl {
                        model.append_to_search(c).await;
                    }
                    return Ok(true);
                }
                // Esc and Enter are shortcuts
                _ => return Ok(false),
            }
        }

        match key.code {
            KeyCode::Up => model.move_selection_up().await,
            KeyCode::Down => model.move_selection_down().await,
            KeyCode::Tab => model.cycle_section_forward().await,
            KeyCode::BackTab => model.cycle_section_backward().await,
            KeyCode::Enter => {
                let Some(id) = model.get_selected_movie_id().await else {
                    // Nothing to open: let Enter act as a shortcut
                    return Ok(false);
                };
                model.toggle_details(&id).await;
            }
            KeyCode::Char('/') => model.set_active_section(ActiveSection::Search).await,
            KeyCode::Char('q') | KeyCode::Char('Q') => model.set_should_quit(true).await,
            KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                model.toggle_help_popup().await
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}
