//! 草稿来源 - 业务能力层
//!
//! 把"读取本地草稿"抽象成可注入的数据源

use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::models::draft::ExamDraft;
use crate::models::loaders::load_draft_from_store;

/// 草稿数据源
///
/// 同步、尽力而为：读不到草稿返回 `None`，不视为错误。
pub trait DraftSource: Send + Sync {
    fn read_draft(&self) -> Option<ExamDraft>;
}

/// 基于 JSON 键值文件的草稿存储
#[derive(Debug, Clone)]
pub struct JsonDraftStore {
    path: PathBuf,
    key: String,
}

impl JsonDraftStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl DraftSource for JsonDraftStore {
    fn read_draft(&self) -> Option<ExamDraft> {
        match load_draft_from_store(&self.path, &self.key) {
            Ok(draft) => {
                debug!(
                    "读取草稿 {} ({}): {}",
                    self.key,
                    self.path.display(),
                    if draft.is_some() { "存在" } else { "不存在" }
                );
                draft
            }
            Err(e) => {
                warn!("读取草稿失败，按无草稿处理: {:#}", e);
                None
            }
        }
    }
}

/// 内存草稿存储
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    draft: Mutex<Option<ExamDraft>>,
}

impl MemoryDraftStore {
    pub fn new(draft: Option<ExamDraft>) -> Self {
        Self {
            draft: Mutex::new(draft),
        }
    }

    pub fn set(&self, draft: Option<ExamDraft>) {
        *self.draft.lock().unwrap_or_else(|e| e.into_inner()) = draft;
    }
}

impl DraftSource for MemoryDraftStore {
    fn read_draft(&self) -> Option<ExamDraft> {
        self.draft
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// 确定本次生成使用的草稿
///
/// 表单快照带有科目时优先使用快照，否则回退到已保存的草稿；两者不合并。
pub fn resolve_draft(snapshot: Option<&ExamDraft>, source: &dyn DraftSource) -> Option<ExamDraft> {
    match snapshot {
        Some(snap) if snap.has_subject() => {
            debug!("使用表单快照: {}", snap.subject);
            Some(snap.clone())
        }
        _ => source.read_draft(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::draft::Distribution;

    fn stored() -> ExamDraft {
        ExamDraft::new("历史", 4, Distribution { true_false: 4, ..Default::default() })
    }

    #[test]
    fn test_snapshot_wins() {
        let store = MemoryDraftStore::new(Some(stored()));
        let snap = ExamDraft::new("数学", 1, Distribution { analysis: 1, ..Default::default() });

        assert_eq!(resolve_draft(Some(&snap), &store), Some(snap));
    }

    #[test]
    fn test_snapshot_without_subject_falls_back() {
        let store = MemoryDraftStore::new(Some(stored()));
        let snap = ExamDraft::new("  ", 1, Distribution::default());

        assert_eq!(resolve_draft(Some(&snap), &store), Some(stored()));
        assert_eq!(resolve_draft(None, &store), Some(stored()));
    }

    #[test]
    fn test_nothing_available() {
        let store = MemoryDraftStore::default();
        assert_eq!(resolve_draft(None, &store), None);
    }

    #[test]
    fn test_broken_json_store_is_none() {
        let path = std::env::temp_dir().join(format!(
            "exam_ai_propose_broken_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonDraftStore::new(&path, "exam:draft");
        assert!(store.read_draft().is_none());

        let _ = std::fs::remove_file(&path);
    }
}
