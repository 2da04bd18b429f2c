//! Action 枚举定义 (Intent)
//!
//! 用户交互转化为明确的语义化 Action

use crate::models::Link;
use crate::store::StoreError;

/// 用户操作枚举
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    MoveSelectionUp,
    MoveSelectionDown,

    // 焦点切换
    FocusNext,
    FocusForm,
    FocusList,

    // 表单输入
    Input(char),
    DeleteChar,
    Submit, // 添加链接

    // 列表行操作，携带行对应的链接 ID
    Delete(String),
    Open(String),
    Refresh,
}

/// 后台存储操作完成后回传给事件循环的结果
#[derive(Debug)]
pub enum StoreEvent {
    Listed(Result<Vec<Link>, StoreError>),
    Added(Result<Link, StoreError>),
    Removed(Result<bool, StoreError>),
}
