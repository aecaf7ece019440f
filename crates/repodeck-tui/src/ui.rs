// Top-level layout: header tabs, the active screen and the status bar
use crate::app::{App, InputMode, Tab};
use crate::{detail_ui, favorites_ui, help_ui};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};
use repodeck_core::format::format_count;
use repodeck_core::RepositoryRecord;

pub(crate) const GOLD: Color = Color::Rgb(255, 215, 0);
pub(crate) const SELECTED_BG: Color = Color::Rgb(68, 71, 90);

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Active screen
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    match (app.tab, app.detail()) {
        (_, Some(detail)) => detail_ui::render_detail(frame, app, detail, chunks[1]),
        (Tab::Search, None) => render_search_screen(frame, app, chunks[1]),
        (Tab::Favorites, None) => favorites_ui::render_favorites(frame, app, chunks[1]),
    }

    render_status_bar(frame, app, chunks[2]);

    if app.show_help {
        let area = frame.area();
        help_ui::render_keybindings_help(frame, area);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let favorites = app.store().list().len();
    let titles = vec![
        Line::from(Tab::Search.title()),
        Line::from(format!("{} ({})", Tab::Favorites.title(), favorites)),
    ];
    let selected = match app.tab {
        Tab::Search => 0,
        Tab::Favorites => 1,
    };

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    " RepoDeck ",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
        )
        .select(selected)
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn render_search_screen(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    render_search_input(frame, app, chunks[0]);
    render_results_list(frame, app, chunks[1]);
}

fn render_search_input(frame: &mut Frame, app: &App, area: Rect) {
    let input_style = match app.input_mode {
        InputMode::Searching => Style::default().fg(Color::Yellow),
        InputMode::Normal | InputMode::Filtering => Style::default(),
    };

    let input = Paragraph::new(app.search_input.as_str())
        .style(input_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Search GitHub (ESC to navigate, / to search)")
                .border_style(input_style),
        );

    frame.render_widget(input, area);

    if app.input_mode == InputMode::Searching {
        frame.set_cursor_position((
            area.x + app.search_input.chars().count() as u16 + 1,
            area.y + 1,
        ));
    }
}

fn render_results_list(frame: &mut Frame, app: &App, area: Rect) {
    let search = &app.search;

    if search.is_loading() {
        let loading = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Searching...",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
        ])
        .block(Block::default().borders(Borders::ALL).title(" Results "))
        .alignment(Alignment::Center);
        frame.render_widget(loading, area);
        return;
    }

    if let Some(error) = search.error() {
        let message = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(error, Style::default().fg(Color::Red))),
            Line::from(""),
            Line::from(Span::styled(
                "Press 'r' to retry",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(Block::default().borders(Borders::ALL).title(" Results "))
        .alignment(Alignment::Center);
        frame.render_widget(message, area);
        return;
    }

    if search.results().is_empty() {
        let hint = match search.last_query() {
            Some(query) => format!("No repositories found for \"{}\"", query),
            None => "Type a query and press Enter to search GitHub".to_string(),
        };
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(hint, Style::default().fg(Color::Gray))),
        ])
        .block(Block::default().borders(Borders::ALL).title(" Results "))
        .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let desc_max_length = (area.width.saturating_sub(10) as usize).clamp(20, 100);
    let items: Vec<ListItem> = search
        .results()
        .iter()
        .enumerate()
        .map(|(i, repo)| {
            repository_item(
                repo,
                i == search.selected_index(),
                search.is_favorite(repo.id),
                desc_max_length,
            )
        })
        .collect();

    let title = format!(" Results ({}) ", search.results().len());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    let mut state = ListState::default();
    state.select(Some(search.selected_index()));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Two-line list row shared by the results and favorites lists
pub(crate) fn repository_item(
    repo: &RepositoryRecord,
    is_selected: bool,
    is_favorite: bool,
    desc_max_length: usize,
) -> ListItem<'static> {
    let row_style = if is_selected {
        Style::default().bg(SELECTED_BG)
    } else {
        Style::default()
    };
    let name_style = if is_selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    };

    let line1 = Line::from(vec![
        Span::styled(
            if is_favorite { "♥ " } else { "  " },
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(repo.full_name.clone(), name_style),
        Span::raw("  "),
        Span::styled(format!("★ {}", format_count(repo.stars)), Style::default().fg(GOLD)),
        Span::raw("  "),
        Span::styled(
            repo.language.clone().unwrap_or_default(),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let description = repo.description.as_deref().unwrap_or("No description");
    let line2 = Line::from(Span::styled(
        format!("    {}", truncate(description, desc_max_length)),
        Style::default().fg(Color::DarkGray),
    ));

    ListItem::new(vec![line1, line2]).style(row_style)
}

/// Cut `text` to `max` characters, ending with an ellipsis when shortened
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(message) = &app.status_message {
        Span::styled(message.clone(), Style::default().fg(Color::Green))
    } else {
        match app.input_mode {
            InputMode::Searching => Span::styled(
                "SEARCH MODE | ESC: normal mode | ENTER: search",
                Style::default().fg(Color::Yellow),
            ),
            InputMode::Filtering => Span::styled(
                "FILTER | Type to filter favorites | ENTER: keep | ESC: clear",
                Style::default().fg(Color::Magenta),
            ),
            InputMode::Normal => match (app.detail().is_some(), app.tab) {
                (true, _) => Span::styled(
                    "DETAILS | j/k: scroll | f: favorite | o: open | s: share | e: description | r: reload | ESC: back",
                    Style::default().fg(Color::Cyan),
                ),
                (false, Tab::Search) => Span::raw(
                    "j/k: navigate | /: search | ENTER: details | f: favorite | r: refresh | TAB: favorites | ?: help | q: quit",
                ),
                (false, Tab::Favorites) => Span::raw(
                    "j/k: navigate | /: filter | ENTER: details | d: remove | TAB: search | ?: help | q: quit",
                ),
            },
        }
    };

    frame.render_widget(Paragraph::new(Line::from(status)), area);
}
