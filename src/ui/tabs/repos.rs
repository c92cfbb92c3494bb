use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::truncate_string;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_repo_list(frame, app, chunks[0]);
    render_repo_detail(frame, app, chunks[1]);
}

fn render_repo_list(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.scanning {
        " Local Repositories (scanning...) ".to_string()
    } else {
        format!(" Local Repositories ({}) - [u]pdate ", app.local_repos.len())
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if app.local_repos.is_empty() {
        let hint = if app.scanning {
            "Scanning for repositories..."
        } else {
            "No repositories found under the configured root"
        };
        let empty = Paragraph::new(Span::styled(hint, styles::muted_style())).block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .local_repos
        .iter()
        .enumerate()
        .map(|(i, repo)| {
            let branch = repo.branch.as_deref().unwrap_or("?");
            let line = Line::from(format!(
                "{:<28} [{}]",
                truncate_string(&repo.name, 28),
                branch
            ));

            let style = if i == app.repo_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(app.repo_selection));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_repo_detail(frame: &mut Frame, app: &App, area: Rect) {
    let selected = app.local_repos.get(app.repo_selection);

    let (title, content) = match selected {
        Some(repo) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled("Path:   ", styles::highlight_style()),
                    Span::raw(repo.path.display().to_string()),
                ]),
                Line::from(vec![
                    Span::styled("Branch: ", styles::highlight_style()),
                    Span::raw(repo.branch.clone().unwrap_or_else(|| "unknown".to_string())),
                ]),
            ];

            match &repo.origin_url {
                Some(url) => lines.push(Line::from(vec![
                    Span::styled("Origin: ", styles::highlight_style()),
                    Span::raw(url.clone()),
                ])),
                None => lines.push(Line::from(Span::styled(
                    "No origin remote",
                    styles::muted_style(),
                ))),
            }

            (format!(" {} ", repo.name), lines)
        }
        None => (
            " No Repository Selected ".to_string(),
            vec![Line::from(Span::styled(
                "Select a repository from the list",
                styles::muted_style(),
            ))],
        ),
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}
