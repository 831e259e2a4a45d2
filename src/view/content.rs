//! Panel rendering: search results, watched list with summary, movie details

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Paragraph, Wrap},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{
    ActiveSection, DetailState, DetailStatus, FetchState, SearchResultItem, SearchSnapshot,
    UiState, WatchedItem, WatchedSummary,
};
use super::utils::{
    calculate_num_width, or_dash, rating_stars, render_scrollable_list, truncate_string,
};

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    }
}

fn placeholder(frame: &mut Frame, area: Rect, text: &str, color: Color, block: Block) {
    let widget = Paragraph::new(text.to_string())
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(widget, area);
}

pub fn render_results(frame: &mut Frame, area: Rect, search: &SearchSnapshot, ui_state: &UiState) {
    let focused = ui_state.active_section == ActiveSection::Results;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Results ")
        .padding(Padding::horizontal(1))
        .border_style(border_style(focused));

    match &search.state {
        FetchState::Error(message) => placeholder(frame, area, message, Color::Red, block),
        FetchState::Loading => placeholder(frame, area, "Loading...", Color::Yellow, block),
        FetchState::Idle => placeholder(frame, area, "No Result", Color::DarkGray, block),
        FetchState::Success(items) if items.is_empty() => {
            placeholder(frame, area, "No Result", Color::DarkGray, block)
        }
        FetchState::Success(items) => {
            let content_width = area.width.saturating_sub(4) as usize;
            let open_id = ui_state.details.as_ref().map(|d| d.id.as_str());
            let list_items = render_result_items(
                items,
                ui_state.results_selected,
                focused,
                open_id,
                content_width,
            );
            render_scrollable_list(frame, area, list_items, ui_state.results_selected, block);
        }
    }
}

fn render_result_items(
    items: &[SearchResultItem],
    selected: usize,
    focused: bool,
    open_id: Option<&str>,
    content_width: usize,
) -> Vec<ListItem<'static>> {
    let num_width = calculate_num_width(items.len());
    let year_width = 9;
    let title_width = content_width.saturating_sub(1 + num_width + 3 + 3 + year_width);

    items
        .iter()
        .enumerate()
        .map(|(i, movie)| {
            let is_open = open_id == Some(movie.id.as_str());
            let style = if i == selected && focused {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if is_open {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else if i == selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let marker = if is_open { "▶" } else { " " };

            ListItem::new(format!(
                "{}{:<num_w$}   {}   {:>year_w$}",
                marker,
                i + 1,
                truncate_string(&movie.title, title_width),
                format!("🗓 {}", movie.year),
                num_w = num_width,
                year_w = year_width,
            ))
            .style(style)
        })
        .collect()
}

pub fn render_watched(
    frame: &mut Frame,
    area: Rect,
    watched: &[WatchedItem],
    summary: &WatchedSummary,
    ui_state: &UiState,
) {
    let focused = ui_state.active_section == ActiveSection::Watched;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Summary
            Constraint::Min(0),    // List
        ])
        .split(area);

    render_summary(frame, chunks[0], summary, focused);

    let block = Block::default()
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .border_style(border_style(focused));

    if watched.is_empty() {
        placeholder(
            frame,
            chunks[1],
            "Nothing here yet. Open a movie, rate it and press A to add it.",
            Color::DarkGray,
            block,
        );
        return;
    }

    let content_width = chunks[1].width.saturating_sub(4) as usize;
    let num_width = calculate_num_width(watched.len());
    let stats_width = 28;
    let title_width = content_width.saturating_sub(1 + num_width + 3 + 3 + stats_width);

    let items: Vec<ListItem> = watched
        .iter()
        .enumerate()
        .map(|(i, movie)| {
            let style = if i == ui_state.watched_selected && focused {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if i == ui_state.watched_selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let stats = format!(
                "⭐ {:.1}  🌟 {:>2}  ⏳ {:>3} min",
                movie.imdb_rating, movie.user_rating, movie.runtime
            );
            ListItem::new(format!(
                " {:<num_w$}   {}   {}",
                i + 1,
                truncate_string(&movie.title, title_width),
                stats,
                num_w = num_width,
            ))
            .style(style)
        })
        .collect();

    render_scrollable_list(frame, chunks[1], items, ui_state.watched_selected, block);
}

fn render_summary(frame: &mut Frame, area: Rect, summary: &WatchedSummary, focused: bool) {
    let line = Line::from(vec![
        Span::raw(format!("#️⃣  {} movies   ", summary.count)),
        Span::raw(format!("⭐ {:.1}   ", summary.avg_imdb_rating)),
        Span::raw(format!("🌟 {:.1}   ", summary.avg_user_rating)),
        Span::raw(format!("⏳ {:.0} min", summary.avg_runtime)),
    ]);
    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Movies you watched ")
            .title_style(Style::default().add_modifier(Modifier::BOLD))
            .padding(Padding::horizontal(1))
            .border_style(border_style(focused)),
    );
    frame.render_widget(widget, area);
}

pub fn render_details(frame: &mut Frame, area: Rect, details: &DetailState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Details (Backspace to close) ")
        .padding(Padding::horizontal(1))
        .border_style(Style::default().fg(Color::Cyan));

    let label = Style::default().fg(Color::DarkGray);
    let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let lines: Vec<Line> = match &details.status {
        DetailStatus::Loading => {
            return placeholder(frame, area, "Loading...", Color::Yellow, block);
        }
        DetailStatus::Failed(message) => {
            return placeholder(frame, area, message, Color::Red, block);
        }
        DetailStatus::Fetched(movie) => {
            let mut lines = vec![
                Line::from(Span::styled(movie.title.clone(), heading)),
                Line::from(format!("{} • {}", or_dash(&movie.released), or_dash(&movie.runtime))),
                Line::from(or_dash(&movie.genre).to_string()),
                Line::from(format!("⭐ {} IMDb rating", or_dash(&movie.imdb_rating))),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Your rating: ", label),
                    Span::styled(
                        rating_stars(details.user_rating, WatchedItem::MAX_RATING),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::raw(format!(" {}", details.user_rating)),
                ]),
                Line::from(Span::styled(
                    "0-9 / ←→ to rate, A to add to list",
                    label,
                )),
                Line::from(""),
            ];
            lines.extend(body_lines(&movie.plot, &movie.actors, &movie.director, label));
            lines
        }
        DetailStatus::Watched(item) => {
            let mut lines = vec![
                Line::from(Span::styled(item.title.clone(), heading)),
                Line::from(format!("{} • {} min", or_dash(&item.year), item.runtime)),
                Line::from(format!("⭐ {:.1} IMDb rating", item.imdb_rating)),
                Line::from(""),
                Line::from(vec![
                    Span::raw(format!("You rated this movie {} ", item.user_rating)),
                    Span::styled("⭐", Style::default().fg(Color::Yellow)),
                ]),
                Line::from(""),
            ];
            lines.extend(body_lines(&item.plot, &item.actors, &item.director, label));
            lines
        }
    };

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(widget, area);
}

fn body_lines(plot: &str, actors: &str, director: &str, label: Style) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            or_dash(plot).to_string(),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Starring ", label),
            Span::raw(or_dash(actors).to_string()),
        ]),
        Line::from(vec![
            Span::styled("Directed by ", label),
            Span::raw(or_dash(director).to_string()),
        ]),
    ]
}
