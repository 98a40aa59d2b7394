use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    GoUpload,
    GoDue,
    GoHistory,
    NextField,
    Up,
    Down,
    Enter,
    Submit,
    Backspace,
    Char(char),
    None,
}

pub fn map_event(ev: Event) -> Action {
    let Event::Key(KeyEvent {
        code,
        modifiers,
        kind,
        ..
    }) = ev
    else {
        return Action::None;
    };
    if kind == KeyEventKind::Release {
        return Action::None;
    }
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Char('s') if ctrl => Action::Submit,
        KeyCode::F(1) => Action::GoUpload,
        KeyCode::F(2) => Action::GoDue,
        KeyCode::F(3) => Action::GoHistory,
        KeyCode::Tab | KeyCode::BackTab => Action::NextField,
        KeyCode::Up => Action::Up,
        KeyCode::Down => Action::Down,
        KeyCode::Enter => Action::Enter,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Char(c) if !ctrl => Action::Char(c),
        _ => Action::None,
    }
}
