//! App 状态定义 (Model)
//!
//! 包含应用状态结构体及相关枚举

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use tokio::runtime::Runtime;

use super::actions::StoreEvent;
use super::view::projection::{LinkListView, LinkRow, project};
use crate::models::Link;
use crate::store::LinkStore;

/// 应用状态
pub struct App {
    pub store: Arc<dyn LinkStore>,
    pub(crate) runtime: Runtime,
    pub(crate) events_tx: Sender<StoreEvent>,
    pub(crate) events_rx: Receiver<StoreEvent>,

    pub links: Vec<Link>,
    pub list_view: LinkListView,
    pub selected_index: usize,

    pub focus: Focus,
    pub name_input: String,
    pub url_input: String,

    pub form_message: Option<Message>,
    pub list_message: Option<Message>,
    pub message_ttl: Duration,

    pub add_in_flight: bool, // 远程添加进行中，禁用添加
    pub loading: bool,
}

/// 输入焦点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Name,
    Url,
    List,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Name => Focus::Url,
            Focus::Url => Focus::List,
            Focus::List => Focus::Name,
        }
    }
}

/// 提示消息类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

/// 定时自动清除的提示消息
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
    pub expires_at: Instant,
}

impl Message {
    pub fn new(text: impl Into<String>, kind: MessageKind, ttl: Duration) -> Self {
        Self {
            text: text.into(),
            kind,
            expires_at: Instant::now() + ttl,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

impl App {
    /// 创建新的应用实例
    pub fn new(store: Arc<dyn LinkStore>, runtime: Runtime, message_ttl: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        let mut app = Self {
            store,
            runtime,
            events_tx,
            events_rx,
            links: Vec::new(),
            list_view: LinkListView::Rows(Vec::new()),
            selected_index: 0,
            focus: Focus::Name,
            name_input: String::new(),
            url_input: String::new(),
            form_message: None,
            list_message: None,
            message_ttl,
            add_in_flight: false,
            loading: false,
        };
        app.refresh_display_list();
        app
    }

    /// 按当前集合重新投影显示列表
    pub fn refresh_display_list(&mut self) {
        self.list_view = project(&self.links);

        // 确保选中索引有效
        let len = self.list_view.rows().len();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    /// 获取当前选中的行
    pub fn selected_row(&self) -> Option<&LinkRow> {
        self.list_view.rows().get(self.selected_index)
    }

    /// 获取当前选中行对应的链接 ID
    pub fn selected_link_id(&self) -> Option<String> {
        self.selected_row().map(|row| row.id.clone())
    }

    /// 当前焦点所在的输入框
    pub fn focused_input_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Name => Some(&mut self.name_input),
            Focus::Url => Some(&mut self.url_input),
            Focus::List => None,
        }
    }

    pub fn show_form_message(&mut self, text: impl Into<String>, kind: MessageKind) {
        self.form_message = Some(Message::new(text, kind, self.message_ttl));
    }

    pub fn show_list_message(&mut self, text: impl Into<String>, kind: MessageKind) {
        self.list_message = Some(Message::new(text, kind, self.message_ttl));
    }

    /// 清除已过期的提示消息
    pub fn expire_messages(&mut self, now: Instant) {
        if self.form_message.as_ref().is_some_and(|m| m.is_expired(now)) {
            self.form_message = None;
        }
        if self.list_message.as_ref().is_some_and(|m| m.is_expired(now)) {
            self.list_message = None;
        }
    }
}
