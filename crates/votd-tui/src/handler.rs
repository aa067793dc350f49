use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use votd_core::Translation;

use crate::app::App;
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key).await,
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.on_tick().await,
    }
    Ok(())
}

async fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.show_translation_picker {
        handle_picker(app, key);
    } else {
        handle_normal(app, key).await;
    }
}

async fn handle_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,

        // New random verse
        KeyCode::Char('r') | KeyCode::Char('n') | KeyCode::Char(' ') => {
            app.request_random_verse();
        }

        // Translation
        KeyCode::Char('t') | KeyCode::Char('v') => app.open_translation_picker(),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            if let Some(translation) = Translation::all().get(index).copied() {
                app.select_translation(translation);
            }
        }

        // Verse actions
        KeyCode::Char('c') | KeyCode::Char('y') => app.copy_verse().await,
        KeyCode::Char('s') => app.share_verse().await,

        _ => {}
    }
}

fn handle_picker(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_translation_picker(),
        KeyCode::Char('j') | KeyCode::Down => app.picker_down(),
        KeyCode::Char('k') | KeyCode::Up => app.picker_up(),
        KeyCode::Enter | KeyCode::Char('l') => app.confirm_translation(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use votd_core::{ApiBibleClient, ApiKey, FetcherOptions, LabsBibleClient, VerseFetcher};
    use crate::platform::SystemPlatform;

    fn app() -> App {
        App::new(VerseFetcher::new(
            Arc::new(LabsBibleClient::new("http://127.0.0.1:9/random")),
            Arc::new(ApiBibleClient::new("http://127.0.0.1:9/v1", ApiKey::new("test"))),
            Arc::new(SystemPlatform::new(None, None)),
            FetcherOptions::default(),
        ))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_from_picker() {
        let mut app = app();
        app.open_translation_picker();
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)).await;
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_esc_closes_picker_before_quitting() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('t'))).await;
        assert!(app.show_translation_picker);

        handle_key(&mut app, press(KeyCode::Esc)).await;
        assert!(!app.show_translation_picker);
        assert!(!app.should_quit);

        handle_key(&mut app, press(KeyCode::Esc)).await;
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_number_keys_pick_translation() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('4'))).await;
        assert_eq!(app.fetcher.translation(), Translation::Bsb);

        handle_key(&mut app, press(KeyCode::Char('9'))).await;
        assert_eq!(app.fetcher.translation(), Translation::Bsb);
    }

    #[tokio::test]
    async fn test_picker_enter_applies_selection() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('t'))).await;
        handle_key(&mut app, press(KeyCode::Down)).await;
        handle_key(&mut app, press(KeyCode::Down)).await;
        handle_key(&mut app, press(KeyCode::Enter)).await;

        assert!(!app.show_translation_picker);
        assert_eq!(app.fetcher.translation(), Translation::Asv);
    }

    #[tokio::test]
    async fn test_random_key_starts_loading() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('r'))).await;
        assert!(app.fetcher.state().loading);
        assert!(app.fetcher.has_pending());
    }
}
