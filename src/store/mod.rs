//! 链接存储
//!
//! 本地槽存储与远程 API 两种后端实现同一套增删查契约

mod local;
mod remote;

use std::io;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::models::Link;

pub use local::{DEFAULT_STORAGE_KEY, LocalStore};
pub use remote::RemoteStore;

pub const EMPTY_URL_MESSAGE: &str = "链接地址不能为空！";
pub const INVALID_URL_MESSAGE: &str = "请输入有效的链接地址！";

/// 存储操作错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 输入校验失败，发生在任何持久化之前
    #[error("{0}")]
    Validation(String),

    /// 网络失败、非成功状态码或无法解码的响应
    #[error("{0}")]
    Transport(String),

    /// 本地槽读写失败
    #[error("本地存储读写失败: {0}")]
    Storage(#[from] io::Error),
}

/// 链接集合的增删查契约
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// 当前集合
    async fn list(&self) -> Result<Vec<Link>, StoreError>;

    /// 校验并新增链接，返回持久化后的链接
    async fn add(&self, name: &str, url: &str) -> Result<Link, StoreError>;

    /// 按 ID 删除，返回是否存在匹配项
    async fn remove(&self, id: &str) -> Result<bool, StoreError>;

    /// 操作是否经过网络（决定是否有进行中状态）
    fn is_remote(&self) -> bool {
        false
    }
}

/// 校验新增输入，返回去除首尾空白后的 (name, url)
pub fn validate_input<'a>(name: &'a str, url: &'a str) -> Result<(&'a str, &'a str), StoreError> {
    let name = name.trim();
    let url = url.trim();

    if url.is_empty() {
        return Err(StoreError::Validation(EMPTY_URL_MESSAGE.to_string()));
    }
    if Url::parse(url).is_err() {
        return Err(StoreError::Validation(INVALID_URL_MESSAGE.to_string()));
    }

    Ok((name, url))
}
