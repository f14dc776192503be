use serde::{Deserialize, Serialize};

/// 审阅页头部信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewHeader {
    pub subject: String,
    pub difficulty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl ReviewHeader {
    pub fn new(subject: impl Into<String>, difficulty: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            difficulty: difficulty.into(),
            created_at: None,
        }
    }

    /// 以当前本地时间作为创建时间
    pub fn created_now(mut self) -> Self {
        self.created_at = Some(chrono::Local::now().format("%Y-%m-%d %H:%M").to_string());
        self
    }
}
