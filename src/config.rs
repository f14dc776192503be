use serde::Deserialize;
use std::path::Path;

use crate::error::{AppError, AppResult, FileError};

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 题目生成后端地址（为空时直接调用 LLM 生成）
    pub generation_api_base_url: Option<String>,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- 草稿与输出 ---
    /// 本地草稿存储文件（JSON 键值对）
    pub draft_store_path: String,
    /// 草稿在存储中的键
    pub draft_key: String,
    /// 生成结果 HTML 片段输出文件
    pub output_html_file: String,
    /// 审阅结果保存文件
    pub review_output_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generation_api_base_url: None,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            draft_store_path: "local_storage.json".to_string(),
            draft_key: "exam:draft".to_string(),
            output_html_file: "ai_results.html".to_string(),
            review_output_file: "exam_review.json".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            generation_api_base_url: std::env::var("GENERATION_API_BASE_URL").ok().filter(|v| !v.trim().is_empty()).or(default.generation_api_base_url),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            draft_store_path: std::env::var("DRAFT_STORE_PATH").unwrap_or(default.draft_store_path),
            draft_key: std::env::var("DRAFT_KEY").unwrap_or(default.draft_key),
            output_html_file: std::env::var("OUTPUT_HTML_FILE").unwrap_or(default.output_html_file),
            review_output_file: std::env::var("REVIEW_OUTPUT_FILE").unwrap_or(default.review_output_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }

    /// 从 TOML 文件加载配置，缺省字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

        Self::from_toml_str(&content).map_err(|e| match e {
            AppError::File(FileError::TomlParseFailed { source, .. }) => {
                AppError::File(FileError::TomlParseFailed {
                    path: path.display().to_string(),
                    source,
                })
            }
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_partial_override() {
        let config = Config::from_toml_str(
            r#"
            llm_model_name = "doubao-seed-1.6"
            generation_api_base_url = "http://localhost:3000/api"
            verbose_logging = true
            "#,
        )
        .unwrap();

        assert_eq!(config.llm_model_name, "doubao-seed-1.6");
        assert_eq!(
            config.generation_api_base_url.as_deref(),
            Some("http://localhost:3000/api")
        );
        assert!(config.verbose_logging);
        // 未出现的字段保持默认
        assert_eq!(config.draft_key, "exam:draft");
    }

    #[test]
    fn test_toml_invalid() {
        let result = Config::from_toml_str("verbose_logging = \"maybe\"");
        assert!(matches!(
            result,
            Err(AppError::File(FileError::TomlParseFailed { .. }))
        ));
    }
}
