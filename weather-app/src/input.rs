use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use weather_core::SortMode;

/// Action to take after processing a key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// No further action needed (handled internally).
    None,
    /// Hand this query to the fetch worker.
    Search(String),
}

pub fn handle_key(app: &mut App, key: KeyEvent) -> InputAction {
    if key.kind != KeyEventKind::Press {
        return InputAction::None;
    }

    if is_ctrl_char(key, 'q') || is_ctrl_char(key, 'c') {
        app.request_quit();
        return InputAction::None;
    }

    if app.popup().is_some() {
        handle_popup_key(app, key);
        return InputAction::None;
    }

    if is_ctrl_char(key, 'a') {
        app.add_favourite();
        return InputAction::None;
    }
    if is_ctrl_char(key, 'f') {
        app.open_favourites();
        return InputAction::None;
    }

    match key.code {
        KeyCode::Esc => app.request_quit(),
        KeyCode::Enter => return InputAction::Search(app.search()),
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.push_char(ch),
        _ => {}
    }

    InputAction::None
}

fn handle_popup_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_favourites(),
        KeyCode::Up => app.move_selection(-1),
        KeyCode::Down => app.move_selection(1),
        KeyCode::Tab => app.cycle_sort(),
        KeyCode::Delete | KeyCode::Char('d') => {
            app.remove_selected();
        }
        KeyCode::Char(ch) => {
            if let Some(mode) = ch
                .to_digit(10)
                .and_then(|d| (d as usize).checked_sub(1))
                .and_then(|idx| SortMode::ALL.get(idx))
            {
                app.set_sort(*mode);
            }
        }
        _ => {}
    }
}

fn is_ctrl_char(key: KeyEvent, ch: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char(c) if c.eq_ignore_ascii_case(&ch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{app_in, london_payload, outcome};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[test]
    fn typing_then_enter_submits_query() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);

        for ch in "Londonn".chars() {
            assert_eq!(handle_key(&mut app, press(KeyCode::Char(ch))), InputAction::None);
        }
        handle_key(&mut app, press(KeyCode::Backspace));

        assert_eq!(app.input(), "London");
        assert_eq!(
            handle_key(&mut app, press(KeyCode::Enter)),
            InputAction::Search("London".into())
        );
    }

    #[test]
    fn ctrl_shortcuts_do_not_type() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);

        handle_key(&mut app, ctrl('f'));
        assert!(app.popup().is_some());
        assert_eq!(app.input(), "");

        handle_key(&mut app, press(KeyCode::Esc));
        assert!(app.popup().is_none());
        assert!(!app.should_quit());

        handle_key(&mut app, press(KeyCode::Esc));
        assert!(app.should_quit());
    }

    #[test]
    fn ctrl_a_adds_favourite() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        for ch in "London".chars() {
            handle_key(&mut app, press(KeyCode::Char(ch)));
        }
        app.on_outcome(outcome("London", &london_payload(20.0)));

        handle_key(&mut app, ctrl('a'));
        assert_eq!(app.favourites().len(), 1);
    }

    #[test]
    fn popup_keys_sort_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        for ch in "Oslo".chars() {
            handle_key(&mut app, press(KeyCode::Char(ch)));
        }
        handle_key(&mut app, ctrl('a'));
        handle_key(&mut app, ctrl('f'));

        handle_key(&mut app, press(KeyCode::Char('3')));
        assert_eq!(app.sort_mode(), SortMode::Country);
        handle_key(&mut app, press(KeyCode::Char('9')));
        assert_eq!(app.sort_mode(), SortMode::Country);
        handle_key(&mut app, press(KeyCode::Tab));
        assert_eq!(app.sort_mode(), SortMode::Alphabetic);

        handle_key(&mut app, press(KeyCode::Char('d')));
        assert!(app.favourites().is_empty());
        assert_eq!(app.input(), "Oslo");
    }

    #[test]
    fn ctrl_c_quits_from_popup() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.open_favourites();

        handle_key(&mut app, ctrl('c'));
        assert!(app.should_quit());
    }
}
