//! Utility functions for rendering UI components

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, List, ListItem, ListState},
    Frame,
};

pub fn render_scrollable_list(
    frame: &mut Frame,
    area: Rect,
    items: Vec<ListItem>,
    selected_index: usize,
    block: Block,
) {
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default()); // Highlight handled by item styles

    let mut list_state = ListState::default();
    list_state.select(Some(selected_index));

    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Calculate width needed for index column (log10(n) + padding)
pub fn calculate_num_width(item_count: usize) -> usize {
    if item_count == 0 {
        2
    } else {
        let digits = (item_count as f64).log10().floor() as usize + 1;
        digits + 1
    }
}

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_width)
    } else {
        format!("{:<width$}", s, width = max_width)
    }
}

/// `★★★☆☆☆☆☆☆☆` for a 0..=max rating
pub fn rating_stars(rating: u8, max: u8) -> String {
    let filled = rating.min(max) as usize;
    let empty = (max as usize).saturating_sub(filled);
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

/// OMDb uses "N/A" for missing text fields
pub fn or_dash(s: &str) -> &str {
    if s.is_empty() || s == "N/A" { "-" } else { s }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_pads_and_ellipsizes() {
        assert_eq!(truncate_string("Up", 5), "Up   ");
        assert_eq!(truncate_string("Inception", 6), "Inc...");
    }

    #[test]
    fn stars_fill_up_to_rating() {
        assert_eq!(rating_stars(3, 5), "★★★☆☆");
        assert_eq!(rating_stars(12, 4), "★★★★");
        assert_eq!(rating_stars(0, 2), "☆☆");
    }

    #[test]
    fn num_width_grows_with_digits() {
        assert_eq!(calculate_num_width(0), 2);
        assert_eq!(calculate_num_width(9), 2);
        assert_eq!(calculate_num_width(10), 3);
    }

    #[test]
    fn missing_values_render_as_dash() {
        assert_eq!(or_dash("N/A"), "-");
        assert_eq!(or_dash(""), "-");
        assert_eq!(or_dash("2010"), "2010");
    }
}
