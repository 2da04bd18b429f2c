mod models;
mod settings;
mod storage;
mod store;
mod ui;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing::{error, info};

use crate::settings::{Backend, Settings};
use crate::storage::{FileSlots, MemorySlots};
use crate::store::{LinkStore, LocalStore, RemoteStore};
use crate::ui::{App, render};

/// 事件循环的刷新间隔，用于接收后台结果与清除过期消息
const TICK: Duration = Duration::from_millis(200);

/// 获取数据目录路径 (~/.local/share/linkpool/)
fn get_data_dir() -> io::Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "无法获取用户数据目录"))?
        .join("linkpool");

    fs::create_dir_all(&data_dir)?;

    Ok(data_dir)
}

/// 初始化文件日志，返回的 guard 需在整个运行期间持有
fn init_logging(data_dir: &Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let logs_dir = data_dir.join("logs");
    fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "linkpool.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,linkpool=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}

/// 按配置构建存储后端
fn build_store(settings: &Settings, data_dir: &Path) -> io::Result<Arc<dyn LinkStore>> {
    match settings.backend {
        Backend::Local => {
            let slots = Arc::new(FileSlots::new(data_dir));
            info!(path = %slots.slot_path(&settings.storage_key).display(), "Using local storage");
            Ok(Arc::new(LocalStore::new(slots, settings.storage_key.clone())))
        }
        Backend::Memory => {
            info!("Using in-memory storage, links are discarded on exit");
            Ok(Arc::new(LocalStore::new(
                Arc::new(MemorySlots::new()),
                settings.storage_key.clone(),
            )))
        }
        Backend::Remote => {
            let store = RemoteStore::new(&settings.api_base_url).map_err(|e| {
                error!(error = %e, "Invalid API base URL");
                io::Error::new(io::ErrorKind::InvalidInput, e)
            })?;
            info!(base = %settings.api_base_url, "Using remote API");
            Ok(Arc::new(store))
        }
    }
}

fn main() -> io::Result<()> {
    let data_dir = get_data_dir()?;
    let _log_guard = init_logging(&data_dir);

    info!(version = env!("CARGO_PKG_VERSION"), "linkpool starting");

    // 首次运行时写出默认配置
    let settings = Settings::load(&data_dir);
    if !Settings::path(&data_dir).exists() {
        settings.save(&data_dir);
    }

    let store = build_store(&settings, &data_dir)?;
    let runtime = tokio::runtime::Runtime::new()?;

    // 创建应用状态并加载链接
    let mut app = App::new(store, runtime, settings.message_ttl());
    app.load_links();

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!(error = %e, "Event loop terminated with error");
    }
    info!("linkpool exiting");

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        app.process_events();
        app.expire_messages(Instant::now());
        terminal.draw(|f| render(f, app))?;

        if !event::poll(TICK)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && ui::handle_key_event(app, key) {
                break;
            }
        }
    }
    Ok(())
}
