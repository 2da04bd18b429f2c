//! 业务逻辑处理 (Update/Dispatch)
//!
//! 包含核心的 dispatch 逻辑、存储操作的发起与结果处理

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, error, info};

use super::actions::{Action, StoreEvent};
use super::state::{App, Focus, MessageKind};
use crate::store::{LinkStore, validate_input};

impl App {
    /// 核心逻辑分发
    pub fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::MoveSelectionUp => self.move_up(),
            Action::MoveSelectionDown => self.move_down(),

            Action::FocusNext => self.focus = self.focus.next(),
            Action::FocusForm => self.focus = Focus::Name,
            Action::FocusList => self.focus = Focus::List,

            Action::Input(c) => {
                if let Some(input) = self.focused_input_mut() {
                    input.push(c);
                }
            }
            Action::DeleteChar => {
                if let Some(input) = self.focused_input_mut() {
                    input.pop();
                }
            }

            Action::Submit => self.add_link(),
            Action::Delete(id) => self.delete_link(id),
            Action::Open(id) => self.open_link(&id),
            Action::Refresh => self.load_links(),
        }
        false
    }

    // ============ 导航相关 ============

    /// 向上移动选择
    pub fn move_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// 向下移动选择
    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.list_view.rows().len() {
            self.selected_index += 1;
        }
    }

    // ============ 存储操作 ============

    /// 执行存储操作：远程后端放到运行时后台执行，本地后端同步完成
    fn run<F>(&mut self, operation: F)
    where
        F: Future<Output = StoreEvent> + Send + 'static,
    {
        if self.store.is_remote() {
            let tx = self.events_tx.clone();
            self.runtime.spawn(async move {
                // 接收端随 App 一起释放，此时结果已无人关心
                let _ = tx.send(operation.await);
            });
        } else {
            let event = self.runtime.block_on(operation);
            self.apply_event(event);
        }
    }

    /// 从存储重新获取并渲染链接
    pub fn load_links(&mut self) {
        if self.store.is_remote() {
            self.loading = true;
        }
        let store = Arc::clone(&self.store);
        self.run(async move { StoreEvent::Listed(store.list().await) });
    }

    /// 添加链接
    pub fn add_link(&mut self) {
        if self.add_in_flight {
            return;
        }

        let validated = validate_input(&self.name_input, &self.url_input)
            .map(|(name, url)| (name.to_string(), url.to_string()));
        let (name, url) = match validated {
            Ok(input) => input,
            Err(e) => {
                self.show_form_message(e.to_string(), MessageKind::Error);
                return;
            }
        };

        if self.store.is_remote() {
            self.add_in_flight = true;
            self.show_form_message("正在添加链接...", MessageKind::Info);
        }

        let store = Arc::clone(&self.store);
        self.run(async move { StoreEvent::Added(store.add(&name, &url).await) });
    }

    /// 删除链接
    pub fn delete_link(&mut self, id: String) {
        if self.store.is_remote() {
            self.show_list_message("正在删除链接...", MessageKind::Info);
        }

        let store = Arc::clone(&self.store);
        self.run(async move { StoreEvent::Removed(store.remove(&id).await) });
    }

    /// 在系统浏览器中打开链接
    pub fn open_link(&mut self, id: &str) {
        let Some(url) = self.links.iter().find(|l| l.id == id).map(|l| l.url.clone()) else {
            return;
        };

        match open::that(&url) {
            Ok(()) => debug!(url = %url, "Opened link in browser"),
            Err(e) => {
                error!(url = %url, error = %e, "Failed to open link");
                self.show_list_message(format!("打开链接失败: {}", e), MessageKind::Error);
            }
        }
    }

    // ============ 结果处理 ============

    /// 处理所有已完成的后台操作
    pub fn process_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
        }
    }

    pub fn apply_event(&mut self, event: StoreEvent) {
        match event {
            StoreEvent::Listed(result) => {
                self.loading = false;
                match result {
                    Ok(links) => self.links = links,
                    Err(e) => {
                        error!(error = %e, "Failed to fetch links");
                        self.show_list_message(format!("加载链接失败: {}", e), MessageKind::Error);
                        self.links.clear();
                    }
                }
                self.refresh_display_list();
            }

            StoreEvent::Added(result) => {
                self.add_in_flight = false;
                match result {
                    Ok(link) => {
                        info!(id = %link.id, url = %link.url, "Link added");
                        self.load_links();
                        self.name_input.clear();
                        self.url_input.clear();
                        self.show_form_message("链接添加成功！", MessageKind::Success);
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to add link");
                        self.show_form_message(format!("添加链接失败: {}", e), MessageKind::Error);
                    }
                }
            }

            StoreEvent::Removed(result) => {
                match result {
                    Ok(true) => {
                        info!("Link deleted");
                        self.show_list_message("链接删除成功！", MessageKind::Success);
                    }
                    Ok(false) => {
                        self.show_list_message("未找到该链接", MessageKind::Error);
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to delete link");
                        self.show_list_message(format!("删除链接失败: {}", e), MessageKind::Error);
                    }
                }
                self.load_links();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use async_trait::async_trait;

    use super::*;
    use crate::models::Link;
    use crate::storage::{MemorySlots, SlotStorage};
    use crate::store::{LinkStore, LocalStore, StoreError};
    use crate::ui::view::projection::{EMPTY_MESSAGE, LinkListView};

    fn local_app() -> App {
        let store = LocalStore::new(Arc::new(MemorySlots::new()), "links");
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let mut app = App::new(Arc::new(store), runtime, Duration::from_secs(3));
        app.load_links();
        app
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.dispatch(Action::Input(c));
        }
    }

    fn add(app: &mut App, name: &str, url: &str) {
        app.focus = Focus::Name;
        type_str(app, name);
        app.dispatch(Action::FocusNext);
        type_str(app, url);
        app.dispatch(Action::Submit);
    }

    #[test]
    fn test_starts_with_empty_state() {
        let app = local_app();
        assert_eq!(app.list_view, LinkListView::Empty(EMPTY_MESSAGE));
        assert!(app.selected_link_id().is_none());
    }

    #[test]
    fn test_add_clears_inputs_and_rerenders() {
        let mut app = local_app();

        add(&mut app, "Rust", "https://www.rust-lang.org/");

        assert!(app.name_input.is_empty());
        assert!(app.url_input.is_empty());
        assert_eq!(app.list_view.rows().len(), 1);
        assert_eq!(app.list_view.rows()[0].label, "Rust");
        assert_eq!(
            app.form_message.as_ref().map(|m| m.kind),
            Some(MessageKind::Success)
        );
    }

    #[test]
    fn test_invalid_url_keeps_inputs() {
        let mut app = local_app();

        add(&mut app, "Bad", "not a url");

        assert_eq!(app.url_input, "not a url");
        assert!(app.links.is_empty());
        let message = app.form_message.as_ref().unwrap();
        assert_eq!(message.kind, MessageKind::Error);
        assert_eq!(message.text, crate::store::INVALID_URL_MESSAGE);
    }

    #[test]
    fn test_delete_selected_row() {
        let mut app = local_app();
        add(&mut app, "A", "http://a.com");
        add(&mut app, "B", "http://b.com");

        let id = app.selected_link_id().unwrap();
        app.dispatch(Action::Delete(id.clone()));

        let rows = app.list_view.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "B");
        assert!(rows.iter().all(|row| row.id != id));
    }

    #[test]
    fn test_delete_unknown_id_reports_not_found() {
        let mut app = local_app();
        add(&mut app, "A", "http://a.com");

        app.dispatch(Action::Delete("missing".to_string()));

        assert_eq!(app.list_view.rows().len(), 1);
        assert_eq!(app.list_message.as_ref().unwrap().text, "未找到该链接");
    }

    #[test]
    fn test_selection_is_clamped_after_delete() {
        let mut app = local_app();
        add(&mut app, "A", "http://a.com");
        add(&mut app, "B", "http://b.com");
        app.dispatch(Action::MoveSelectionDown);
        assert_eq!(app.selected_index, 1);

        let id = app.selected_link_id().unwrap();
        app.dispatch(Action::Delete(id));

        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_messages_expire() {
        let mut app = local_app();
        app.show_form_message("hello", MessageKind::Info);
        app.show_list_message("world", MessageKind::Info);

        app.expire_messages(Instant::now());
        assert!(app.form_message.is_some());

        app.expire_messages(Instant::now() + Duration::from_secs(3));
        assert!(app.form_message.is_none());
        assert!(app.list_message.is_none());
    }

    /// 远程风格的存储，固定返回成功
    struct SlowRemote;

    #[async_trait]
    impl LinkStore for SlowRemote {
        async fn list(&self) -> Result<Vec<Link>, StoreError> {
            Ok(Vec::new())
        }

        async fn add(&self, name: &str, url: &str) -> Result<Link, StoreError> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(Link::new(name.to_string(), url.to_string()))
        }

        async fn remove(&self, _id: &str) -> Result<bool, StoreError> {
            Err(StoreError::Transport("HTTP error! status: 500, body: ".to_string()))
        }

        fn is_remote(&self) -> bool {
            true
        }
    }

    fn remote_app() -> App {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        App::new(Arc::new(SlowRemote), runtime, Duration::from_secs(3))
    }

    fn wait_until(app: &mut App, done: impl Fn(&App) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done(app) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
            app.process_events();
        }
    }

    #[test]
    fn test_remote_add_disables_until_complete() {
        let mut app = remote_app();
        app.name_input = "A".to_string();
        app.url_input = "http://a.com".to_string();

        app.dispatch(Action::Submit);
        assert!(app.add_in_flight);
        assert_eq!(app.form_message.as_ref().unwrap().text, "正在添加链接...");

        // 进行中再次提交被忽略
        app.dispatch(Action::Submit);

        wait_until(&mut app, |app| !app.add_in_flight);
        assert!(!app.add_in_flight);
        assert!(app.url_input.is_empty());
        assert_eq!(app.form_message.as_ref().unwrap().text, "链接添加成功！");
    }

    #[test]
    fn test_remote_delete_failure_still_reloads() {
        let mut app = remote_app();
        app.links = vec![Link::new("A".to_string(), "http://a.com".to_string())];
        app.refresh_display_list();

        let id = app.selected_link_id().unwrap();
        app.dispatch(Action::Delete(id));

        wait_until(&mut app, |app| {
            app.list_message
                .as_ref()
                .is_some_and(|m| m.text.starts_with("删除链接失败"))
                && !app.loading
                && app.links.is_empty()
        });
        assert!(app.list_message.as_ref().unwrap().text.contains("500"));
        assert_eq!(app.list_view, LinkListView::Empty(EMPTY_MESSAGE));
    }

    /// 远程风格的存储，所有操作都失败
    struct UnavailableRemote;

    #[async_trait]
    impl LinkStore for UnavailableRemote {
        async fn list(&self) -> Result<Vec<Link>, StoreError> {
            Err(StoreError::Transport("HTTP error! status: 503, body: down".to_string()))
        }

        async fn add(&self, _name: &str, _url: &str) -> Result<Link, StoreError> {
            Err(StoreError::Transport("HTTP error! status: 503, body: down".to_string()))
        }

        async fn remove(&self, _id: &str) -> Result<bool, StoreError> {
            Ok(true)
        }

        fn is_remote(&self) -> bool {
            true
        }
    }

    fn unavailable_app() -> App {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        App::new(Arc::new(UnavailableRemote), runtime, Duration::from_secs(3))
    }

    #[test]
    fn test_load_failure_shows_error_and_empties_list() {
        let mut app = unavailable_app();
        app.links = vec![Link::new("A".to_string(), "http://a.com".to_string())];
        app.refresh_display_list();

        app.dispatch(Action::Refresh);
        assert!(app.loading);

        wait_until(&mut app, |app| !app.loading);
        let message = app.list_message.as_ref().unwrap();
        assert_eq!(message.kind, MessageKind::Error);
        assert!(message.text.starts_with("加载链接失败: "));
        assert!(message.text.contains("503"));
        assert!(app.links.is_empty());
        assert_eq!(app.list_view, LinkListView::Empty(EMPTY_MESSAGE));
    }

    #[test]
    fn test_add_failure_keeps_inputs_and_reenables() {
        let mut app = unavailable_app();
        app.name_input = "A".to_string();
        app.url_input = "http://a.com".to_string();

        app.dispatch(Action::Submit);
        assert!(app.add_in_flight);

        wait_until(&mut app, |app| !app.add_in_flight);
        assert!(!app.add_in_flight);
        assert_eq!(app.name_input, "A");
        assert_eq!(app.url_input, "http://a.com");
        let message = app.form_message.as_ref().unwrap();
        assert_eq!(message.kind, MessageKind::Error);
        assert!(message.text.starts_with("添加链接失败: "));
        assert!(message.text.contains("down"));
    }

    /// 可读不可写的槽存储
    struct ReadOnlySlots;

    impl SlotStorage for ReadOnlySlots {
        fn get(&self, _key: &str) -> std::io::Result<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> std::io::Result<()> {
            Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            ))
        }
    }

    #[test]
    fn test_local_write_failure_reaches_form() {
        let store = LocalStore::new(Arc::new(ReadOnlySlots), "links");
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let mut app = App::new(Arc::new(store), runtime, Duration::from_secs(3));
        app.load_links();

        add(&mut app, "A", "http://a.com");

        assert!(!app.add_in_flight);
        assert_eq!(app.url_input, "http://a.com");
        assert!(app.links.is_empty());
        let message = app.form_message.as_ref().unwrap();
        assert_eq!(message.kind, MessageKind::Error);
        assert!(message.text.starts_with("添加链接失败: 本地存储读写失败"));
        assert!(message.text.contains("read-only"));
    }
}
