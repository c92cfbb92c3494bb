//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{
    can_add_search_char, can_add_token_char, App, AppState, SearchScope, Tab, PAGE_SCROLL_SIZE,
};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
        ) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle token input mode
    if matches!(app.state, AppState::AddingToken) {
        return handle_token_input(app, key);
    }

    // Handle search input mode
    if matches!(app.state, AppState::Searching) {
        return handle_search_input(app, key);
    }

    // Normal mode
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }

        // Tab navigation
        KeyCode::Char('1') => app.current_tab = Tab::Home,
        KeyCode::Char('2') => app.current_tab = Tab::Repos,
        KeyCode::Char('3') => app.current_tab = Tab::Tokens,
        KeyCode::Char('4') => app.current_tab = Tab::Activity,
        KeyCode::Tab => app.current_tab = app.current_tab.next(),
        KeyCode::BackTab => app.current_tab = app.current_tab.prev(),

        // Selection movement
        KeyCode::Down | KeyCode::Char('j') => move_selection(app, 1),
        KeyCode::Up | KeyCode::Char('k') => move_selection(app, -1),
        KeyCode::PageDown => move_selection(app, PAGE_SCROLL_SIZE as i64),
        KeyCode::PageUp => move_selection(app, -(PAGE_SCROLL_SIZE as i64)),

        _ => handle_tab_key(app, key),
    }

    Ok(false)
}

fn handle_token_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => {
            app.add_token_from_input();
        }
        KeyCode::Esc => {
            app.token_input.clear();
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            app.token_input.pop();
        }
        KeyCode::Char(c) => {
            if can_add_token_char(app.token_input.chars().count(), c) {
                app.token_input.push(c);
            }
        }
        _ => {}
    }
    Ok(false)
}

fn handle_search_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => {
            app.state = AppState::Normal;
            app.start_search();
        }
        KeyCode::Esc => {
            app.search_query.clear();
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            app.search_query.pop();
        }
        KeyCode::Char(c) => {
            if can_add_search_char(app.search_query.chars().count(), c) {
                app.search_query.push(c);
            }
        }
        _ => {}
    }
    Ok(false)
}

/// Keys whose meaning depends on the active tab.
fn handle_tab_key(app: &mut App, key: KeyEvent) {
    match app.current_tab {
        Tab::Home => match key.code {
            KeyCode::Char('/') => {
                app.state = AppState::Searching;
            }
            KeyCode::Char('s') => {
                app.search_scope = app.search_scope.toggle();
                app.result_selection = 0;
            }
            _ => {}
        },
        Tab::Repos => {
            if key.code == KeyCode::Char('u') {
                app.start_local_scan();
            }
        }
        Tab::Tokens => match key.code {
            KeyCode::Char('a') => {
                app.token_input.clear();
                app.state = AppState::AddingToken;
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                app.remove_highlighted_token();
            }
            KeyCode::Enter => {
                app.select_highlighted_token();
            }
            _ => {}
        },
        Tab::Activity => {}
    }
}

/// Move the active tab's selection, clamped to the list bounds.
fn move_selection(app: &mut App, delta: i64) {
    let (selection, len) = match app.current_tab {
        Tab::Home => {
            let len = match app.search_scope {
                SearchScope::GitHub => app.search_results.len(),
                SearchScope::Local => app.local_results.len(),
            };
            (&mut app.result_selection, len)
        }
        Tab::Repos => (&mut app.repo_selection, app.local_repos.len()),
        Tab::Tokens => (&mut app.token_selection, app.store.len()),
        Tab::Activity => {
            // Scrolling moves back through history; up is older
            let max_scroll = app.log.len().saturating_sub(1);
            let next = (app.log_scroll as i64 - delta).clamp(0, max_scroll as i64);
            app.log_scroll = next as usize;
            return;
        }
    };

    if len == 0 {
        return;
    }
    let next = (*selection as i64 + delta).clamp(0, len as i64 - 1);
    *selection = next as usize;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenStore;
    use crate::config::Config;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tempfile::TempDir;

    fn test_app() -> (App, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::empty(dir.path().join("tokens.json"));
        let app = App::from_parts(Config::default(), store).unwrap();
        (app, dir)
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    #[tokio::test]
    async fn test_number_keys_switch_tabs() {
        let (mut app, _dir) = test_app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.current_tab, Tab::Tokens);
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.current_tab, Tab::Home);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_tab, Tab::Repos);
    }

    #[tokio::test]
    async fn test_quit_requires_confirmation() {
        let (mut app, _dir) = test_app();
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.state, AppState::ConfirmingQuit);

        assert!(!press(&mut app, KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Normal);

        press(&mut app, KeyCode::Char('q'));
        assert!(press(&mut app, KeyCode::Char('y')));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[tokio::test]
    async fn test_token_input_mode_collects_chars() {
        let (mut app, _dir) = test_app();
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.state, AppState::AddingToken);

        for c in "ghp_secret99".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.token_input, "ghp_secret99");

        // Whitespace is never part of a token
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.token_input, "ghp_secret99");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Normal);
        assert!(app.token_input.is_empty());
    }

    #[tokio::test]
    async fn test_selection_clamped_to_list() {
        let (mut app, _dir) = test_app();
        app.store.add("tok_old_1234").unwrap();
        app.store.add("tok_new_5678").unwrap();
        press(&mut app, KeyCode::Char('3'));

        press(&mut app, KeyCode::Up);
        assert_eq!(app.token_selection, 0);

        press(&mut app, KeyCode::Down);
        assert_eq!(app.token_selection, 1);

        press(&mut app, KeyCode::Down);
        assert_eq!(app.token_selection, 1);
    }
}
