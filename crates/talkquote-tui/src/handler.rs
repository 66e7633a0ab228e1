use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use talkquote_core::ConfigField;
use crate::app::{App, EditTarget, FocusPane, InputMode};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize => {}
        AppEvent::Tick => app.on_tick().await,
    }
    Ok(())
}

pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Tab => app.focus = app.focus.next(),
        KeyCode::BackTab => app.focus = app.focus.prev(),

        // Quote actions work from any pane
        KeyCode::Char('g') => app.start_generate(),
        KeyCode::Char('p') => app.start_post(),
        KeyCode::Char('c') => app.session.cycle_category(),

        _ => match app.focus {
            FocusPane::Config => handle_config_normal(app, key),
            FocusPane::Quote => handle_quote_normal(app, key),
            FocusPane::Custom => handle_custom_normal(app, key),
        },
    }
}

fn handle_config_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.config_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.config_nav_up(),
        KeyCode::Enter | KeyCode::Char('i') => {
            let field = app.selected_config_field();
            app.start_editing(EditTarget::Config(field));
        }
        // Clear the selected field
        KeyCode::Char('x') => {
            let field = app.selected_config_field();
            app.session.set_config_field(field, "");
        }
        _ => {}
    }
}

fn handle_quote_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.start_generate(),
        KeyCode::Char('l') | KeyCode::Right => app.session.cycle_category(),
        _ => {}
    }
}

fn handle_custom_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.custom_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.custom_nav_up(),
        KeyCode::Enter => app.select_custom_quote(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected_custom_quote(),
        KeyCode::Char('a') | KeyCode::Char('i') => app.start_editing(EditTarget::CustomQuote),
        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.stop_editing(),
        KeyCode::Enter | KeyCode::Tab => finish_field(app),
        KeyCode::Backspace => {
            let cursor = app.edit_cursor;
            if cursor > 0 {
                if let Some(buffer) = app.edit_buffer_mut() {
                    let byte_pos = char_to_byte_index(buffer, cursor - 1);
                    buffer.remove(byte_pos);
                    app.edit_cursor -= 1;
                }
            }
        }
        KeyCode::Delete => {
            let cursor = app.edit_cursor;
            if let Some(buffer) = app.edit_buffer_mut() {
                if cursor < buffer.chars().count() {
                    let byte_pos = char_to_byte_index(buffer, cursor);
                    buffer.remove(byte_pos);
                }
            }
        }
        KeyCode::Left => {
            app.edit_cursor = app.edit_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.edit_buffer().map(|s| s.chars().count()).unwrap_or(0);
            app.edit_cursor = (app.edit_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.edit_cursor = 0;
        }
        KeyCode::End => {
            app.edit_cursor = app.edit_buffer().map(|s| s.chars().count()).unwrap_or(0);
        }
        KeyCode::Char(c) => {
            let cursor = app.edit_cursor;
            if let Some(buffer) = app.edit_buffer_mut() {
                let byte_pos = char_to_byte_index(buffer, cursor);
                buffer.insert(byte_pos, c);
                app.edit_cursor += 1;
            }
        }
        _ => {}
    }
}

/// Enter/Tab while editing: move to the next box, or submit the custom quote
fn finish_field(app: &mut App) {
    match app.edit_target {
        Some(EditTarget::Config(field)) => {
            let fields = ConfigField::all();
            let idx = fields.iter().position(|f| *f == field).unwrap_or(0);
            match fields.get(idx + 1) {
                Some(next) => {
                    app.config_state.select(Some(idx + 1));
                    app.start_editing(EditTarget::Config(*next));
                }
                None => app.stop_editing(),
            }
        }
        Some(EditTarget::CustomQuote) => app.start_editing(EditTarget::CustomAuthor),
        Some(EditTarget::CustomAuthor) => {
            app.stop_editing();
            app.submit_custom_quote();
        }
        None => app.stop_editing(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;
    use talkquote_core::{Category, GeminiClient, NotificationKind, Quote, TalkClient};

    fn test_app() -> App {
        App::new(
            GeminiClient::new("key", "gemini-2.5-flash", "http://127.0.0.1:9"),
            TalkClient::new(),
            Category::default(),
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        let mut key = KeyEvent::new(code, KeyModifiers::NONE);
        key.kind = KeyEventKind::Press;
        handle_key(app, key);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_char_to_byte_index_utf8() {
        assert_eq!(char_to_byte_index("héllo", 2), 3);
        assert_eq!(char_to_byte_index("abc", 10), 3);
    }

    #[test]
    fn test_config_form_edit_flow() {
        let mut app = test_app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Editing);
        type_text(&mut app, "https://cloud.example.com/");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "abc");
        press(&mut app, KeyCode::Esc);

        let config = app.session.config();
        assert_eq!(config.url, "https://cloud.example.com/");
        assert_eq!(config.room_token, "abc");
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.selected_config_field(), ConfigField::RoomToken);
    }

    #[test]
    fn test_editing_keys_do_not_trigger_actions() {
        let mut app = test_app();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "gpq");
        assert_eq!(app.session.config().url, "gpq");
        assert!(!app.should_quit);
        assert!(app.generate_task.is_none());
    }

    #[test]
    fn test_cursor_editing_in_middle() {
        let mut app = test_app();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "ac");
        press(&mut app, KeyCode::Left);
        type_text(&mut app, "b");
        press(&mut app, KeyCode::End);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.session.config().url, "ab");
    }

    #[test]
    fn test_add_select_delete_custom_quote() {
        let mut app = test_app();
        app.focus = FocusPane::Custom;
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Q");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "A");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.session.custom_quotes(), &[Quote::new("Q", "A")]);
        assert!(app.custom_quote_input.is_empty());

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.current_quote(), Some(&Quote::new("Q", "A")));

        press(&mut app, KeyCode::Char('d'));
        assert!(app.session.custom_quotes().is_empty());
        assert_eq!(app.custom_state.selected(), None);
    }

    #[test]
    fn test_post_without_quote_reports_error() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('p'));
        assert!(app.post_task.is_none());
        let notification = app.session.notification().unwrap();
        assert_eq!(notification.kind, NotificationKind::Error);
    }

    #[test]
    fn test_category_cycles() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.session.category(), Category::Funny);
    }

    #[test]
    fn test_tab_cycles_focus() {
        let mut app = test_app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, FocusPane::Quote);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus, FocusPane::Config);
    }
}
