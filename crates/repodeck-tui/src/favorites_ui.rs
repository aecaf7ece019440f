use crate::app::{App, InputMode};
use crate::ui::repository_item;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

const FAVORITES_BORDER: Color = Color::Rgb(249, 226, 175);

/// Render the favorites tab: optional filter line plus the list
pub fn render_favorites(frame: &mut Frame, app: &App, area: Rect) {
    let show_filter = app.input_mode == InputMode::Filtering || !app.favorites.filter().is_empty();

    let list_area = if show_filter {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(area);
        render_filter_input(frame, app, chunks[0]);
        chunks[1]
    } else {
        area
    };

    if app.favorites.is_empty() {
        render_empty_state(frame, list_area);
        return;
    }

    let visible = app.favorites.visible();
    let desc_max_length = (list_area.width.saturating_sub(10) as usize).clamp(20, 100);
    let items: Vec<ListItem> = if visible.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No favorites match the filter",
            Style::default().fg(Color::Gray),
        )))]
    } else {
        visible
            .iter()
            .enumerate()
            .map(|(idx, repo)| {
                repository_item(repo, idx == app.favorites.selected_index(), true, desc_max_length)
            })
            .collect()
    };

    let title = if visible.len() == app.favorites.total() {
        format!(" Favorites ({}) ", visible.len())
    } else {
        format!(" Favorites ({} of {}) ", visible.len(), app.favorites.total())
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(FAVORITES_BORDER)),
    );
    let mut state = ListState::default();
    if !visible.is_empty() {
        state.select(Some(app.favorites.selected_index()));
    }

    frame.render_stateful_widget(list, list_area, &mut state);
}

fn render_filter_input(frame: &mut Frame, app: &App, area: Rect) {
    let style = if app.input_mode == InputMode::Filtering {
        Style::default().fg(Color::Magenta)
    } else {
        Style::default()
    };

    let input = Paragraph::new(app.favorites.filter()).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Filter favorites")
            .border_style(style),
    );
    frame.render_widget(input, area);

    if app.input_mode == InputMode::Filtering {
        frame.set_cursor_position((
            area.x + app.favorites.filter().chars().count() as u16 + 1,
            area.y + 1,
        ));
    }
}

fn render_empty_state(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "No favorites yet",
            Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Open a repository from search and press 'f' to keep it here.",
            Style::default().fg(Color::Yellow),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Favorites ")
                .border_style(Style::default().fg(FAVORITES_BORDER)),
        )
        .alignment(ratatui::layout::Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}
