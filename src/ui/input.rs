//! 键盘事件映射 (Input -> Action)
//!
//! 将按键事件转换为 Action。列表上的删除、打开操作统一在这里
//! 解析为光标所在行的链接 ID，各行无需单独绑定。

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::actions::Action;
use super::state::{App, Focus};

/// 根据当前焦点和按键获取对应的 Action
pub fn get_action(app: &App, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match app.focus {
        Focus::Name | Focus::Url => match key.code {
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Tab => Some(Action::FocusNext),
            KeyCode::Esc => Some(Action::FocusList),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Some(Action::Input(c))
            }
            _ => None,
        },
        Focus::List => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveSelectionDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveSelectionUp),
            KeyCode::Char('a') => Some(Action::FocusForm),
            KeyCode::Tab => Some(Action::FocusNext),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('d') | KeyCode::Delete => app.selected_link_id().map(Action::Delete),
            KeyCode::Char('o') | KeyCode::Enter => app.selected_link_id().map(Action::Open),
            _ => None,
        },
    }
}

/// 处理按键事件，返回是否退出
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> bool {
    if let Some(action) = get_action(app, key) {
        app.dispatch(action)
    } else {
        false
    }
}
