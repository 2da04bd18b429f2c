//! 键值槽存储
//!
//! 本地后端的持久化介质：每个键对应一个完整的字符串值，
//! 每次读取都读全量，每次写入都覆盖全量。

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// 字符串键值槽
pub trait SlotStorage: Send + Sync {
    /// 读取槽内容，槽不存在时返回 `None`
    fn get(&self, key: &str) -> io::Result<Option<String>>;

    /// 覆盖写入槽内容
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
}

/// 基于目录的槽存储，每个键对应 `<key>.json` 文件
#[derive(Debug, Clone)]
pub struct FileSlots {
    dir: PathBuf,
}

impl FileSlots {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SlotStorage for FileSlots {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }

        fs::read_to_string(&path).map(Some)
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        ensure_dir(&self.dir)?;
        fs::write(self.slot_path(key), value)
    }
}

fn ensure_dir(dir: &Path) -> io::Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// 进程内槽存储，进程退出即丢弃
#[derive(Debug, Default)]
pub struct MemorySlots {
    slots: Mutex<HashMap<String, String>>,
    writes: Mutex<usize>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// 累计写入次数
    #[cfg(test)]
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SlotStorage for MemorySlots {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.slots
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        *self.writes.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }
}
