//! Layout rendering (top bar, status bar)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{ActiveSection, SearchSnapshot, UiState};

pub fn render_top_bar(frame: &mut Frame, area: Rect, search: &SearchSnapshot, ui_state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(14),    // Logo
            Constraint::Min(0),        // Search input
            Constraint::Length(22),    // Result count
        ])
        .split(area);

    let logo = Paragraph::new(Span::styled(
        "🍿 popcorn",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(logo, chunks[0]);

    let focused = ui_state.active_section == ActiveSection::Search;
    let search_style = if focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };

    let search_text = if search.query.is_empty() {
        "Search movies...".to_string()
    } else if focused {
        format!("{}▏", search.query)
    } else {
        search.query.clone()
    };

    let input = Paragraph::new(search_text)
        .style(if search.query.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            search_style
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Search ")
                .padding(Padding::horizontal(1))
                .border_style(if focused {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                }),
        );
    frame.render_widget(input, chunks[1]);

    let count = Paragraph::new(Line::from(vec![
        Span::raw("Found "),
        Span::styled(
            search.state.items().len().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" results"),
    ]))
    .style(Style::default().fg(Color::Cyan))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(count, chunks[2]);
}

pub fn render_status_bar(frame: &mut Frame, area: Rect, search: &SearchSnapshot) {
    let line = Line::from(vec![
        Span::styled(" Tab", Style::default().fg(Color::Green)),
        Span::raw(" switch panel  "),
        Span::styled("Enter", Style::default().fg(Color::Green)),
        Span::raw(" open / search  "),
        Span::styled("Esc", Style::default().fg(Color::Green)),
        Span::raw(" clear  "),
        Span::styled("h", Style::default().fg(Color::Green)),
        Span::raw(" help  "),
        Span::styled("q", Style::default().fg(Color::Green)),
        Span::raw(" quit"),
        Span::styled(
            format!("    searches: {}", search.completed),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
