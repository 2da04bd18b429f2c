//! 视图层模块
//!
//! 包含主渲染入口和各种视图组件

pub mod components;
pub mod projection;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::state::{App, Focus, MessageKind};
use components::{message_color, render_input_widget, render_message};
use projection::LinkListView;

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题
            Constraint::Length(4), // 表单
            Constraint::Min(5),    // 链接列表
            Constraint::Length(1), // 列表消息
            Constraint::Length(3), // 帮助
        ])
        .split(frame.area());

    render_title(frame, app, chunks[0]);
    render_form(frame, app, chunks[1]);
    render_links(frame, app, chunks[2]);
    render_list_status(frame, app, chunks[3]);
    render_help(frame, app, chunks[4]);
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let backend = if app.store.is_remote() {
        "远程"
    } else {
        "本地"
    };
    let title = Paragraph::new(format!("🔗 链接池 ({})", backend))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)])
        .split(area);
    let fields = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[0]);

    render_input_widget(
        frame,
        fields[0],
        "名称 (可选)",
        &app.name_input,
        app.focus == Focus::Name,
        Color::Yellow,
    );

    let url_title = if app.add_in_flight {
        "链接地址 (添加中...)"
    } else {
        "链接地址"
    };
    render_input_widget(
        frame,
        fields[1],
        url_title,
        &app.url_input,
        app.focus == Focus::Url,
        Color::Yellow,
    );

    render_message(frame, rows[1], app.form_message.as_ref());
}

fn render_links(frame: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.focus == Focus::List {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title("链接列表")
        .borders(Borders::ALL)
        .border_style(border_style);

    let rows = match &app.list_view {
        LinkListView::Empty(message) => {
            let empty = Paragraph::new(*message)
                .style(Style::default().fg(Color::Gray))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(empty, area);
            return;
        }
        LinkListView::Rows(rows) => rows,
    };

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let mut spans = vec![Span::styled(
                row.label.clone(),
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED),
            )];
            if row.label != row.url {
                spans.push(Span::styled(
                    format!("  {}", row.url),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            spans.push(Span::styled("  [删除]", Style::default().fg(Color::Red)));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD));

    let mut state = ListState::default();
    if app.focus == Focus::List {
        state.select(Some(app.selected_index));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_list_status(frame: &mut Frame, app: &App, area: Rect) {
    if app.list_message.is_some() {
        render_message(frame, area, app.list_message.as_ref());
    } else if app.loading {
        let loading = Paragraph::new("正在加载链接...")
            .style(Style::default().fg(message_color(MessageKind::Info)));
        frame.render_widget(loading, area);
    }
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match app.focus {
        Focus::Name | Focus::Url => "[Enter] 添加  [Tab] 切换输入框  [Esc] 回到列表  [Ctrl+C] 退出",
        Focus::List => {
            "[j/k] 导航  [o/Enter] 打开  [d] 删除  [a] 添加  [r] 刷新  [Tab] 切换  [q] 退出"
        }
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, area);
}
