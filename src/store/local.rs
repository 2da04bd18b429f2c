use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{LinkStore, StoreError, validate_input};
use crate::models::Link;
use crate::storage::SlotStorage;

pub const DEFAULT_STORAGE_KEY: &str = "links";

/// 本地后端：一个槽保存整个链接数组的 JSON
pub struct LocalStore {
    slots: Arc<dyn SlotStorage>,
    key: String,
}

impl LocalStore {
    pub fn new(slots: Arc<dyn SlotStorage>, key: impl Into<String>) -> Self {
        Self {
            slots,
            key: key.into(),
        }
    }

    /// 读取全部链接，损坏的数据按空集合处理
    fn load(&self) -> Result<Vec<Link>, StoreError> {
        let Some(content) = self.slots.get(&self.key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&content) {
            Ok(links) => Ok(links),
            Err(e) => {
                debug!(key = %self.key, error = %e, "Malformed link data, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// 全量覆盖写入
    fn save(&self, links: &[Link]) -> Result<(), StoreError> {
        let content = serde_json::to_string(links)
            .map_err(|e| StoreError::Storage(std::io::Error::other(e)))?;
        self.slots.set(&self.key, &content)?;
        Ok(())
    }
}

#[async_trait]
impl LinkStore for LocalStore {
    async fn list(&self) -> Result<Vec<Link>, StoreError> {
        self.load()
    }

    async fn add(&self, name: &str, url: &str) -> Result<Link, StoreError> {
        let (name, url) = validate_input(name, url)?;

        let mut links = self.load()?;
        let link = Link::new(name.to_string(), url.to_string());
        links.push(link.clone());
        self.save(&links)?;

        debug!(id = %link.id, url = %link.url, "Link added to local storage");
        Ok(link)
    }

    async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let mut links = self.load()?;
        let before = links.len();
        links.retain(|link| link.id != id);

        if links.len() == before {
            return Ok(false);
        }

        self.save(&links)?;
        debug!(id, "Link removed from local storage");
        Ok(true)
    }
}
