use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render keybindings help popup
pub fn render_keybindings_help(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(70, 80, area);

    // Clear background
    frame.render_widget(Clear, popup_area);

    let help_text = Paragraph::new(keybindings_content())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Keybindings Help ")
                .title_alignment(Alignment::Center)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_text, popup_area);
}

fn keybindings_content() -> Vec<Line<'static>> {
    let section = |title: &str| -> Line<'static> {
        Line::from(vec![Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )])
    };

    let key = |k: &str, desc: &str| -> Line<'static> {
        Line::from(vec![
            Span::styled(
                format!("  {:12}", k),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw(desc.to_string()),
        ])
    };

    vec![
        section("Global"),
        key("TAB", "Switch between Search and Favorites"),
        key("?", "Toggle this help"),
        key("q / Ctrl+C", "Quit"),
        Line::from(""),
        section("Search"),
        key("/ or i", "Edit the query (ENTER runs it)"),
        key("j/k", "Move through results"),
        key("ENTER", "Open repository details"),
        key("f", "Toggle favorite"),
        key("r", "Run the last search again"),
        Line::from(""),
        section("Favorites"),
        key("/", "Filter favorites"),
        key("ENTER", "Open repository details"),
        key("d / x", "Remove from favorites"),
        Line::from(""),
        section("Details"),
        key("j/k", "Scroll the README"),
        key("f", "Toggle favorite"),
        key("o", "Open on GitHub in the browser"),
        key("s", "Copy a share message to the clipboard"),
        key("e", "Expand or collapse the description"),
        key("r", "Reload README and contributors"),
        key("ESC / h", "Back to the list"),
        Line::from(""),
        Line::from(Span::styled(
            "Press ESC or ? to close",
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

/// Helper to create centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
