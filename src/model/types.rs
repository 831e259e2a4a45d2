//! Core type definitions for the application

use std::time::Instant;

use super::content::DetailState;

/// Which panel currently has keyboard focus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSection {
    Search,
    Results,
    Watched,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::Results,
            ActiveSection::Results => ActiveSection::Watched,
            ActiveSection::Watched => ActiveSection::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::Watched,
            ActiveSection::Results => ActiveSection::Search,
            ActiveSection::Watched => ActiveSection::Results,
        }
    }
}

/// UI state for the application
#[derive(Clone, Debug)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub results_selected: usize,
    pub watched_selected: usize,
    pub details: Option<DetailState>,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: ActiveSection::Search,
            results_selected: 0,
            watched_selected: 0,
            details: None,
            error_message: None,
            error_timestamp: None,
            show_help_popup: false,
        }
    }
}
