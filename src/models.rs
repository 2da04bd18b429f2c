use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// 链接条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String, // 空字符串表示未命名
    pub url: String,
}

impl Link {
    /// 以新生成的 ID 创建链接
    pub fn new(name: String, url: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            url,
        }
    }

    /// 显示用标签：有名称用名称，否则用 URL
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.url
        } else {
            &self.name
        }
    }
}

/// 服务端可能返回 `"name": null`
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// 新增链接时提交给远程 API 的请求体
#[derive(Debug, Clone, Serialize)]
pub struct NewLink<'a> {
    pub name: &'a str,
    pub url: &'a str,
}
