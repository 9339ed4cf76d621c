use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
            app.poll_startup().await;
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // User list
        KeyCode::Char('j') | KeyCode::Down => app.user_down(),
        KeyCode::Char('k') | KeyCode::Up => app.user_up(),
        KeyCode::Char('g') | KeyCode::Home => app.user_first(),
        KeyCode::Char('G') | KeyCode::End => app.user_last(),

        // Load the highlighted user's deck
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.select_highlighted(),

        KeyCode::Esc => app.cancel_loading(),

        _ => {}
    }
}
