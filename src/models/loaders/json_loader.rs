use crate::models::draft::ExamDraft;
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::Path;

/// 从 JSON 键值存储文件中读取草稿
///
/// 文件不存在或键不存在时返回 `Ok(None)`，这两种情况都不算错误。
pub fn load_draft_from_store(store_path: &Path, key: &str) -> Result<Option<ExamDraft>> {
    if !store_path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(store_path)
        .with_context(|| format!("无法读取草稿存储: {}", store_path.display()))?;

    if content.trim().is_empty() {
        return Ok(None);
    }

    let store: Map<String, Value> = serde_json::from_str(&content)
        .with_context(|| format!("无法解析草稿存储: {}", store_path.display()))?;

    let Some(entry) = store.get(key) else {
        return Ok(None);
    };

    // 兼容以字符串形式保存的 JSON（与浏览器 localStorage 的存法一致）
    let draft = match entry {
        Value::Null => return Ok(None),
        Value::String(raw) => serde_json::from_str::<ExamDraft>(raw),
        other => serde_json::from_value::<ExamDraft>(other.clone()),
    }
    .with_context(|| format!("草稿 {} 格式错误", key))?;

    Ok(Some(draft))
}

/// 将草稿写入 JSON 键值存储文件，保留文件中的其他键
pub async fn save_draft_to_store(store_path: &Path, key: &str, draft: &ExamDraft) -> Result<()> {
    let mut store: Map<String, Value> = match tokio::fs::read_to_string(store_path).await {
        Ok(content) if !content.trim().is_empty() => serde_json::from_str(&content)
            .with_context(|| format!("无法解析草稿存储: {}", store_path.display()))?,
        Ok(_) => Map::new(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
        Err(e) => {
            return Err(e).with_context(|| format!("无法读取草稿存储: {}", store_path.display()))
        }
    };

    store.insert(key.to_string(), serde_json::to_value(draft)?);

    let content = serde_json::to_string_pretty(&store)?;
    tokio::fs::write(store_path, content)
        .await
        .with_context(|| format!("无法写入草稿存储: {}", store_path.display()))?;

    tracing::debug!("草稿已保存: {} -> {}", key, store_path.display());

    Ok(())
}
