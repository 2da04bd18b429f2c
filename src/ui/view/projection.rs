//! 链接集合到显示行的纯投影

use crate::models::Link;

pub const EMPTY_MESSAGE: &str = "链接池为空，快来添加第一个链接吧！";

/// 一个显示行，携带对应链接的 ID
#[derive(Debug, Clone, PartialEq)]
pub struct LinkRow {
    pub id: String,
    pub label: String,
    pub url: String,
}

/// 列表视图：空状态提示或按顺序排列的行
#[derive(Debug, Clone, PartialEq)]
pub enum LinkListView {
    Empty(&'static str),
    Rows(Vec<LinkRow>),
}

impl LinkListView {
    pub fn rows(&self) -> &[LinkRow] {
        match self {
            LinkListView::Empty(_) => &[],
            LinkListView::Rows(rows) => rows,
        }
    }
}

pub fn project(links: &[Link]) -> LinkListView {
    if links.is_empty() {
        return LinkListView::Empty(EMPTY_MESSAGE);
    }

    LinkListView::Rows(
        links
            .iter()
            .map(|link| LinkRow {
                id: link.id.clone(),
                label: link.label().to_string(),
                url: link.url.clone(),
            })
            .collect(),
    )
}
