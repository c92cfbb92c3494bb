use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, AppState};
use crate::auth::{masked_display, AuthPhase};
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Session line / add input
            Constraint::Min(5),    // Token list
        ])
        .split(area);

    render_session_line(frame, app, chunks[0]);
    render_token_list(frame, app, chunks[1]);
}

/// Top line: either the token input field (while adding) or the session
/// snapshot - the UI reads coordinator state directly rather than relying
/// on having seen every event.
fn render_session_line(frame: &mut Frame, app: &App, area: Rect) {
    if matches!(app.state, AppState::AddingToken) {
        let input = Paragraph::new(Line::from(vec![
            Span::styled("New token: ", styles::highlight_style()),
            Span::raw(masked_display(&app.token_input)),
            Span::styled("_", styles::highlight_style()),
        ]))
        .block(
            Block::default()
                .title(" Add Token (Enter to save, Esc to cancel) ")
                .title_style(styles::title_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        );
        frame.render_widget(input, area);
        return;
    }

    let status_line = match app.session.phase() {
        AuthPhase::LoggedIn => {
            let username = app.session.current_username().unwrap_or("Unknown");
            Line::from(vec![
                Span::styled("Logged in as ", styles::list_item_style()),
                Span::styled(username, styles::success_style()),
            ])
        }
        AuthPhase::Authenticating => {
            let token = app.session.current_token().unwrap_or_default();
            Line::from(Span::styled(
                format!("Verifying {}...", masked_display(token)),
                styles::highlight_style(),
            ))
        }
        AuthPhase::LoggedOut => Line::from(Span::styled("Not logged in", styles::muted_style())),
    };

    let paragraph = Paragraph::new(status_line).block(
        Block::default()
            .title(" Session ")
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false)),
    );
    frame.render_widget(paragraph, area);
}

fn render_token_list(frame: &mut Frame, app: &App, area: Rect) {
    let current = app.session.current_token();

    let items: Vec<ListItem> = app
        .store
        .tokens()
        .iter()
        .enumerate()
        .map(|(i, token)| {
            let marker = if Some(token.as_str()) == current {
                "*"
            } else {
                " "
            };
            let line = Line::from(format!(
                "{} {}. {}",
                marker,
                i + 1,
                masked_display(token)
            ));

            let style = if i == app.token_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let block = Block::default()
        .title(format!(
            " Tokens ({}) - [a]dd [d]elete [Enter] verify ",
            app.store.len()
        ))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if items.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No tokens stored. Press 'a' to add one.",
            styles::muted_style(),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(app.token_selection));

    frame.render_stateful_widget(list, area, &mut state);
}
