use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, AppState, SearchScope};
use crate::ui::styles;
use crate::utils::{format_date, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Min(5),    // Results
        ])
        .split(area);

    render_search_bar(frame, app, chunks[0]);
    render_results(frame, app, chunks[1]);
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let searching = matches!(app.state, AppState::Searching);

    let mut spans = vec![
        Span::styled(
            format!("[{}] ", app.search_scope.label()),
            styles::highlight_style(),
        ),
        Span::raw(app.search_query.clone()),
    ];
    if searching {
        spans.push(Span::styled("_", styles::search_style()));
    } else if app.search_query.is_empty() {
        spans.push(Span::styled(
            "press / to search repositories",
            styles::muted_style(),
        ));
    }

    let block = Block::default()
        .title(" Search - [/] edit [s]cope ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(searching));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    match app.search_scope {
        SearchScope::GitHub => render_github_results(frame, app, area),
        SearchScope::Local => render_local_results(frame, app, area),
    }
}

fn render_github_results(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" GitHub Results ({}) ", app.search_results.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    if app.search_results.is_empty() {
        let hint = if app.search_in_flight {
            "Searching..."
        } else {
            "No results yet"
        };
        let empty = Paragraph::new(Span::styled(hint, styles::muted_style())).block(block);
        frame.render_widget(empty, area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = app
        .search_results
        .iter()
        .enumerate()
        .map(|(i, repo)| {
            let description = repo.description.as_deref().unwrap_or("No description");
            let updated = repo
                .updated_at
                .as_deref()
                .map(format_date)
                .unwrap_or_default();

            let lines = vec![
                Line::from(Span::styled(
                    repo.full_name.clone(),
                    styles::list_item_style(),
                )),
                Line::from(Span::styled(
                    format!("  {}", truncate_string(description, width)),
                    styles::muted_style(),
                )),
                Line::from(Span::styled(
                    format!(
                        "  {} stars | {} watchers | {}",
                        repo.stargazers_count, repo.watchers_count, updated
                    ),
                    styles::muted_style(),
                )),
                Line::from(Span::styled(
                    format!("  {}", repo.html_url),
                    styles::search_style(),
                )),
            ];

            let style = if i == app.result_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(lines).style(style)
        })
        .collect();

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(app.result_selection));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_local_results(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Local Results ({}) ", app.local_results.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    if app.local_results.is_empty() {
        let empty =
            Paragraph::new(Span::styled("No matching clones", styles::muted_style())).block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .local_results
        .iter()
        .enumerate()
        .map(|(i, repo)| {
            let branch = repo.branch.as_deref().unwrap_or("?");
            let line = Line::from(format!(
                "{:<24} [{}] {}",
                truncate_string(&repo.name, 24),
                branch,
                repo.path.display()
            ));

            let style = if i == app.result_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(app.result_selection));

    frame.render_stateful_widget(list, area, &mut state);
}
