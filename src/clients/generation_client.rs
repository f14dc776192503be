/// 题目生成客户端
///
/// 封装"根据草稿生成题目"这一次外部调用
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult, ConfigError};
use crate::models::draft::ExamDraft;
use crate::models::generation::GenerationResult;

/// 题目生成能力
///
/// `Ok` 中 `ok == false` 表示后端报告的可恢复失败；`Err` 表示调用本身出错。
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate_questions(&self, draft: &ExamDraft) -> AppResult<GenerationResult>;
}

#[async_trait]
impl<G: QuestionGenerator + ?Sized> QuestionGenerator for Arc<G> {
    async fn generate_questions(&self, draft: &ExamDraft) -> AppResult<GenerationResult> {
        (**self).generate_questions(draft).await
    }
}

/// 题目生成后端 HTTP 客户端
pub struct HttpGenerationClient {
    client: Client,
    base_url: String,
}

impl HttpGenerationClient {
    /// 创建新的生成客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let base_url = config.generation_api_base_url.clone().ok_or_else(|| {
            AppError::Config(ConfigError::MissingValue {
                name: "GENERATION_API_BASE_URL".to_string(),
            })
        })?;

        Ok(Self::with_client(Client::new(), base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// 生成接口地址
    pub fn endpoint(&self) -> String {
        format!("{}/exams/generate", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl QuestionGenerator for HttpGenerationClient {
    async fn generate_questions(&self, draft: &ExamDraft) -> AppResult<GenerationResult> {
        let endpoint = self.endpoint();
        debug!("请求生成接口: {} (科目: {})", endpoint, draft.subject);

        let response = self
            .client
            .post(&endpoint)
            .json(draft)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        parse_generation_body(&endpoint, status.as_u16(), &body)
    }
}

/// 解析生成接口响应
///
/// 2xx 响应必须能解析为 `GenerationResult`；非 2xx 响应能解析则原样返回，
/// 否则视为 `ok: false`。
pub fn parse_generation_body(endpoint: &str, status: u16, body: &str) -> AppResult<GenerationResult> {
    let parsed = serde_json::from_str::<GenerationResult>(body);

    if (200..300).contains(&status) {
        return parsed.map_err(|e| {
            AppError::Api(ApiError::JsonParseFailed {
                source: Box::new(e),
            })
        });
    }

    match parsed {
        Ok(result) => {
            warn!("生成接口返回 HTTP {}: ok={}", status, result.ok);
            Ok(result)
        }
        Err(_) => {
            warn!(
                "{}",
                ApiError::BadResponse {
                    endpoint: endpoint.to_string(),
                    status,
                    body: crate::utils::logging::truncate_text(body, 200),
                }
            );
            Ok(GenerationResult::failed())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENDPOINT: &str = "http://localhost/exams/generate";

    #[test]
    fn test_endpoint_join() {
        let client = HttpGenerationClient::with_client(Client::new(), "http://localhost:3000/api/");
        assert_eq!(client.endpoint(), "http://localhost:3000/api/exams/generate");
    }

    #[test]
    fn test_missing_base_url() {
        let config = Config::default();
        assert!(matches!(
            HttpGenerationClient::new(&config),
            Err(AppError::Config(ConfigError::MissingValue { .. }))
        ));
    }

    #[test]
    fn test_success_body() {
        let body = r#"{"ok":true,"data":{"questions":{"multiple_choice":[{"text":"Q","options":["a","b"]}]}}}"#;
        let result = parse_generation_body(ENDPOINT, 200, body).unwrap();
        assert!(result.ok);
        assert_eq!(result.questions().unwrap().multiple_choice.len(), 1);
    }

    #[test]
    fn test_malformed_success_body_is_error() {
        let result = parse_generation_body(ENDPOINT, 200, "<html>oops</html>");
        assert!(matches!(
            result,
            Err(AppError::Api(ApiError::JsonParseFailed { .. }))
        ));
    }

    #[test]
    fn test_error_status_with_json_body() {
        let result = parse_generation_body(ENDPOINT, 500, r#"{"ok":false}"#).unwrap();
        assert!(!result.ok);
    }

    #[test]
    fn test_error_status_with_garbage_body() {
        let result = parse_generation_body(ENDPOINT, 502, "Bad Gateway").unwrap();
        assert_eq!(result, GenerationResult::failed());
    }
}
