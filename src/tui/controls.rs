//! Key handling for the dashboard.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use super::runtime::{App, Tab};

/// Dispatches a key event to the application state.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Tab => app.next_tab(),
        KeyCode::Char('1') => app.set_tab(Tab::Mix),
        KeyCode::Char('2') => app.set_tab(Tab::Capacity),
        KeyCode::Char('3') => app.set_tab(Tab::Seasonal),
        KeyCode::Char('4') => app.set_tab(Tab::Forecast),
        KeyCode::Left => app.scroll_left(),
        KeyCode::Right => app.scroll_right(),
        KeyCode::Char('+') => app.zoom_in(),
        KeyCode::Char('-') => app.zoom_out(),
        _ => {}
    }
}
