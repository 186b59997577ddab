use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crate::app::{App, InputMode, Screen, DISCORD_URL, SERVER_IP, STORE_URL};
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
        AppEvent::Key(key) => handle_key(app, key)?,
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick();
            app.reap_advice_task().await;
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) -> Result<()> {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return Ok(());
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }

    Ok(())
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    // Screen switching works everywhere in normal mode
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('1') => {
            app.screen = Screen::Dashboard;
            return;
        }
        KeyCode::Char('2') => {
            app.screen = Screen::Methods;
            return;
        }
        KeyCode::Char('3') => {
            app.screen = Screen::Calculator;
            return;
        }
        KeyCode::Char('4') => {
            app.screen = Screen::Assistant;
            return;
        }
        KeyCode::Tab => {
            app.screen = app.screen.next();
            return;
        }
        _ => {}
    }

    match app.screen {
        Screen::Dashboard => handle_dashboard(app, key),
        Screen::Methods => handle_methods(app, key),
        Screen::Calculator => handle_calculator(app, key),
        Screen::Assistant => handle_assistant_normal(app, key),
    }
}

fn handle_dashboard(app: &mut App, key: KeyEvent) {
    match key.code {
        // Copy server IP (environment call, best-effort)
        KeyCode::Char('c') => {
            copy_to_clipboard(SERVER_IP);
            app.notify(&format!("Server IP ({}) copied to clipboard!", SERVER_IP));
        }
        // Share the store link with friends
        KeyCode::Char('s') => {
            copy_to_clipboard(STORE_URL);
            app.notify("Store link copied! Send it to your friends.");
        }
        KeyCode::Char('d') => {
            copy_to_clipboard(DISCORD_URL);
            app.notify("Discord invite copied!");
        }
        _ => {}
    }
}

fn handle_methods(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.methods_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.methods_nav_up(),
        KeyCode::Char('g') => app.methods_nav_first(),
        KeyCode::Char('G') => app.methods_nav_last(),
        KeyCode::Char('f') => app.cycle_category_filter(),
        _ => {}
    }
}

fn handle_calculator(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab | KeyCode::Char('j') | KeyCode::Down | KeyCode::Enter => {
            app.calc_field = app.calc_field.next();
        }
        KeyCode::BackTab | KeyCode::Char('k') | KeyCode::Up => {
            app.calc_field = app.calc_field.prev();
        }
        KeyCode::Backspace => {
            app.calc_field_value_mut().pop();
        }
        // Raw text goes in; FarmInput::parse decides what's valid so bad
        // input shows a validation message instead of being silently eaten
        KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => {
            app.calc_field_value_mut().push(c);
        }
        _ => {}
    }
}

fn handle_assistant_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('i') | KeyCode::Char('/') => {
            app.input_mode = InputMode::Editing;
            app.chat_cursor = app.chat_input.chars().count();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.chat_scroll = app.chat_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.chat_scroll = app.chat_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => app.chat_scroll = 0,
        KeyCode::Char('G') => app.scroll_chat_to_bottom(),
        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            // Sends only when nothing is in flight; the input stays
            // disabled (ignored here) while the previous answer is pending
            if !app.is_advice_loading() {
                app.send_chat_message();
            }
        }
        KeyCode::Backspace => {
            if app.chat_cursor > 0 {
                app.chat_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
                app.chat_input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.chat_input.chars().count();
            if app.chat_cursor < char_count {
                let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
                app.chat_input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.chat_cursor = app.chat_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.chat_input.chars().count();
            app.chat_cursor = (app.chat_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.chat_cursor = 0;
        }
        KeyCode::End => {
            app.chat_cursor = app.chat_input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
            app.chat_input.insert(byte_pos, c);
            app.chat_cursor += 1;
        }
        _ => {}
    }
}

fn copy_to_clipboard(text: &str) {
    use std::process::{Command, Stdio};
    use std::io::Write;

    // Try the usual clipboard tools in order; silently a no-op if none exist
    for (cmd, args) in [
        ("pbcopy", &[][..]),
        ("wl-copy", &[][..]),
        ("xclip", &["-selection", "clipboard"][..]),
    ] {
        if let Ok(mut child) = Command::new(cmd).args(args).stdin(Stdio::piped()).spawn() {
            if let Some(mut stdin) = child.stdin.take() {
                let _ = stdin.write_all(text.as_bytes());
            }
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crossterm::event::{KeyEventState, KeyEventKind};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn app() -> App {
        App::new(&Config::new())
    }

    #[test]
    fn digit_keys_switch_screens() {
        let mut app = app();
        handle_normal_mode(&mut app, key(KeyCode::Char('3')));
        assert_eq!(app.screen, Screen::Calculator);
        handle_normal_mode(&mut app, key(KeyCode::Char('4')));
        assert_eq!(app.screen, Screen::Assistant);
    }

    #[test]
    fn tab_cycles_screens() {
        let mut app = app();
        handle_normal_mode(&mut app, key(KeyCode::Tab));
        assert_eq!(app.screen, Screen::Methods);
    }

    #[test]
    fn calculator_accepts_digits_into_the_focused_field() {
        let mut app = app();
        app.screen = Screen::Calculator;
        app.spawners_input.clear();
        handle_calculator(&mut app, key(KeyCode::Char('4')));
        handle_calculator(&mut app, key(KeyCode::Char('2')));
        assert_eq!(app.spawners_input, "42");
        handle_calculator(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.spawners_input, "4");
    }

    #[test]
    fn editing_mode_inserts_at_cursor() {
        let mut app = app();
        app.input_mode = InputMode::Editing;
        for c in ['a', 'c'] {
            handle_editing_mode(&mut app, key(KeyCode::Char(c)));
        }
        handle_editing_mode(&mut app, key(KeyCode::Left));
        handle_editing_mode(&mut app, key(KeyCode::Char('b')));
        assert_eq!(app.chat_input, "abc");
        assert_eq!(app.chat_cursor, 2);
    }

    #[test]
    fn enter_while_loading_does_not_send() {
        let mut app = app();
        app.input_mode = InputMode::Editing;
        // Force the single-flight guard on through the transcript
        let _token = app.transcript.begin_send("outstanding").unwrap();
        app.chat_input = "another question".to_string();
        let len = app.transcript.len();

        handle_editing_mode(&mut app, key(KeyCode::Enter));

        assert_eq!(app.transcript.len(), len);
        assert_eq!(app.chat_input, "another question");
    }
}
