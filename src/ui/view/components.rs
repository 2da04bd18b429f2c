//! 通用 UI 组件
//!
//! 输入框、状态行等通用组件

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use crate::ui::state::{Message, MessageKind};

/// [组件] 带有标题和样式的单行输入框，聚焦时显示光标
pub fn render_input_widget(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    value: &str,
    is_focused: bool,
    active_color: Color,
) {
    let style = if is_focused {
        Style::default()
            .fg(active_color)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let input = Paragraph::new(value)
        .style(style)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(input, area);

    if is_focused {
        frame.set_cursor_position((cursor_x(area, value), area.y + 1));
    }
}

/// 输入框内光标列：按显示宽度计算，宽字符占两列
pub fn cursor_x(area: Rect, value: &str) -> u16 {
    let width = u16::try_from(Line::from(value).width()).unwrap_or(u16::MAX);
    area.x
        .saturating_add(1)
        .saturating_add(width)
        .min(area.right().saturating_sub(2))
}

/// [组件] 提示消息行
pub fn render_message(frame: &mut Frame, area: Rect, message: Option<&Message>) {
    let Some(message) = message else {
        return;
    };

    frame.render_widget(
        Paragraph::new(message.text.as_str()).style(Style::default().fg(message_color(message.kind))),
        area,
    );
}

pub fn message_color(kind: MessageKind) -> Color {
    match kind {
        MessageKind::Info => Color::Cyan,
        MessageKind::Success => Color::Green,
        MessageKind::Error => Color::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_counts_wide_chars_as_two_columns() {
        let area = Rect::new(0, 0, 40, 3);

        assert_eq!(cursor_x(area, ""), 1);
        assert_eq!(cursor_x(area, "abc"), 4);
        assert_eq!(cursor_x(area, "中文"), 5);
        assert_eq!(cursor_x(area, "a中"), 4);
    }

    #[test]
    fn test_cursor_stays_inside_border() {
        let area = Rect::new(2, 0, 10, 3);
        assert_eq!(cursor_x(area, "链接链接链接链接"), 10);
    }
}
