// Details screen: metadata header, README and top contributors
use crate::app::App;
use crate::ui::{truncate, GOLD};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};
use repodeck_core::format::{format_count, format_date, language_color, parse_hex_color};
use repodeck_core::readme::ReadmeLine;
use repodeck_core::views::{DetailView, Section};

const DESCRIPTION_PREVIEW: usize = 150;

pub fn render_detail(frame: &mut Frame, app: &App, detail: &DetailView, area: Rect) {
    let header = header_lines(detail);
    let header_height = (header.len() as u16 + 2).min(area.height / 2);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(header_height), Constraint::Min(3)])
        .split(area);

    let header_widget = Paragraph::new(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Repository ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(header_widget, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[1]);

    render_readme(frame, app, detail, body[0]);
    render_contributors(frame, detail, body[1]);
}

fn header_lines(detail: &DetailView) -> Vec<Line<'static>> {
    let repo = detail.record();
    let mut lines = Vec::new();

    let mut title = vec![
        Span::styled(
            if detail.is_favorite() { "♥ " } else { "♡ " },
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(
            repo.full_name.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
    ];
    if repo.is_archived {
        title.push(Span::styled("  [archived]", Style::default().fg(Color::DarkGray)));
    }
    lines.push(Line::from(title));

    if let Some(description) = &repo.description {
        let shown = if detail.description_expanded() {
            description.clone()
        } else {
            truncate(description, DESCRIPTION_PREVIEW)
        };
        let mut spans = vec![Span::styled(shown, Style::default().fg(Color::Gray))];
        if description.chars().count() > DESCRIPTION_PREVIEW {
            let hint = if detail.description_expanded() { " (e: less)" } else { " (e: more)" };
            spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(vec![
        Span::styled(format!("★ {} stars", format_count(repo.stars)), Style::default().fg(GOLD)),
        Span::raw("   "),
        Span::styled(
            format!("⑂ {} forks", format_count(repo.forks)),
            Style::default().fg(Color::Green),
        ),
        Span::raw("   "),
        Span::styled(
            format!("{} watchers", format_count(repo.watchers)),
            Style::default().fg(Color::Blue),
        ),
        Span::raw("   "),
        Span::styled(
            format!("{} open issues", format_count(repo.open_issues)),
            Style::default().fg(Color::Red),
        ),
    ]));

    let mut facts = Vec::new();
    if let Some(language) = &repo.language {
        facts.push(Span::styled("● ", Style::default().fg(language_style(Some(language)))));
        facts.push(Span::raw(language.clone()));
        facts.push(Span::raw("   "));
    }
    if let Some(license) = &repo.license {
        facts.push(Span::styled(format!("License: {}", license), Style::default().fg(Color::Gray)));
        facts.push(Span::raw("   "));
    }
    facts.push(Span::styled(
        format!(
            "Created {}  Updated {}",
            format_date(&repo.created_at),
            format_date(&repo.updated_at)
        ),
        Style::default().fg(Color::DarkGray),
    ));
    lines.push(Line::from(facts));

    if !repo.topics.is_empty() {
        lines.push(Line::from(Span::styled(
            repo.topics.iter().map(|t| format!("#{}", t)).collect::<Vec<_>>().join(" "),
            Style::default().fg(Color::Magenta),
        )));
    }

    let mut links = vec![Span::styled(
        repo.html_url.clone(),
        Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
    )];
    if let Some(homepage) = &repo.homepage {
        links.push(Span::raw("   "));
        links.push(Span::styled(homepage.clone(), Style::default().fg(Color::Blue)));
    }
    lines.push(Line::from(links));

    lines
}

fn language_style(language: Option<&str>) -> Color {
    parse_hex_color(language_color(language))
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(Color::Magenta)
}

fn render_readme(frame: &mut Frame, app: &App, detail: &DetailView, area: Rect) {
    let lines: Vec<Line> = match detail.readme() {
        Section::Idle | Section::Loading => vec![Line::from(Span::styled(
            "Loading README...",
            Style::default().fg(Color::Cyan),
        ))],
        Section::Ready(readme) => readme.lines.iter().map(readme_line).collect(),
        Section::Unavailable => vec![Line::from(Span::styled(
            "This repository has no README.",
            Style::default().fg(Color::Gray),
        ))],
        Section::Failed(message) => vec![
            Line::from(Span::styled(
                "Couldn't load the README.",
                Style::default().fg(Color::Red),
            )),
            Line::from(Span::styled(message.clone(), Style::default().fg(Color::DarkGray))),
            Line::from(""),
            Line::from(Span::styled("Press 'r' to retry", Style::default().fg(Color::DarkGray))),
        ],
    };

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" README "))
        .wrap(Wrap { trim: false })
        .scroll((app.readme_scroll, 0));

    frame.render_widget(paragraph, area);
}

fn readme_line(line: &ReadmeLine) -> Line<'static> {
    match line {
        ReadmeLine::Heading { text, .. } => Line::from(Span::styled(
            text.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        ReadmeLine::Text(text) => Line::from(text.clone()),
    }
}

fn render_contributors(frame: &mut Frame, detail: &DetailView, area: Rect) {
    let items: Vec<ListItem> = match detail.contributors() {
        Section::Idle | Section::Loading => vec![ListItem::new(Span::styled(
            "Loading...",
            Style::default().fg(Color::Cyan),
        ))],
        Section::Ready(contributors) => contributors
            .iter()
            .map(|c| {
                ListItem::new(Line::from(vec![
                    Span::styled(c.login.clone(), Style::default().fg(Color::Cyan)),
                    Span::styled(
                        format!("  {} commits", format_count(c.contributions)),
                        Style::default().fg(Color::Gray),
                    ),
                ]))
            })
            .collect(),
        Section::Unavailable => vec![ListItem::new(Span::styled(
            "No contributors listed",
            Style::default().fg(Color::Gray),
        ))],
        Section::Failed(_) => vec![ListItem::new(Span::styled(
            "Couldn't load contributors",
            Style::default().fg(Color::Red),
        ))],
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Top contributors "),
    );
    frame.render_widget(list, area);
}
