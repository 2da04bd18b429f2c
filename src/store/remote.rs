use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::{debug, warn};
use url::Url;

use super::{LinkStore, StoreError, validate_input};
use crate::models::{Link, NewLink};

/// 远程后端：`{base}` 上的 REST 接口
pub struct RemoteStore {
    client: Client,
    base: Url,
}

impl RemoteStore {
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        let base = Url::parse(base_url)
            .map_err(|e| StoreError::Transport(format!("无效的 API 地址 {}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(StoreError::Transport(format!("无效的 API 地址 {}", base_url)));
        }

        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    fn item_url(&self, id: &str) -> Url {
        let mut url = self.base.clone();
        // 构造时已排除 cannot-be-a-base 的地址
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url
    }
}

fn transport(e: reqwest::Error) -> StoreError {
    StoreError::Transport(e.to_string())
}

/// 非成功状态码转为错误，尽量带上响应体
async fn ensure_success(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), body = %body, "API request failed");
    Err(StoreError::Transport(format!(
        "HTTP error! status: {}, body: {}",
        status.as_u16(),
        body
    )))
}

#[async_trait]
impl LinkStore for RemoteStore {
    async fn list(&self) -> Result<Vec<Link>, StoreError> {
        let response = self
            .client
            .get(self.base.clone())
            .send()
            .await
            .map_err(transport)?;
        let links: Vec<Link> = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(transport)?;

        debug!(count = links.len(), "Fetched links from API");
        Ok(links)
    }

    async fn add(&self, name: &str, url: &str) -> Result<Link, StoreError> {
        let (name, url) = validate_input(name, url)?;

        let response = self
            .client
            .post(self.base.clone())
            .json(&NewLink { name, url })
            .send()
            .await
            .map_err(transport)?;
        let link: Link = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(transport)?;

        debug!(id = %link.id, "Link created via API");
        Ok(link)
    }

    async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let response = self
            .client
            .delete(self.item_url(id))
            .send()
            .await
            .map_err(transport)?;
        ensure_success(response).await?;

        debug!(id, "Link deleted via API");
        Ok(true)
    }

    fn is_remote(&self) -> bool {
        true
    }
}
