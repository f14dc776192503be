//! LLM 出题服务 - 业务能力层
//!
//! 只负责"根据草稿让 LLM 出题"能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::clients::QuestionGenerator;
use crate::config::Config;
use crate::error::{AppError, AppResult, LlmError};
use crate::models::draft::ExamDraft;
use crate::models::generation::{GenerationResult, QuestionSet};
use crate::models::question::QuestionType;
use crate::utils::logging::truncate_text;

const SYSTEM_MESSAGE: &str = "你是一名经验丰富的出题老师，擅长按照指定的题型分布编写考试题目。\
                              你只输出合法的 JSON，不输出任何解释。";

/// LLM 出题服务
///
/// 职责：
/// - 根据草稿的科目和题型分布构造提示词
/// - 调用 LLM 并把返回的 JSON 解析为题目集合
/// - 不关心加载状态、通知和渲染
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（字符串）
    pub async fn send_to_llm(&self, user_message: &str, system_message: Option<&str>) -> Result<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.7)
            .max_tokens(4096u32)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            anyhow::anyhow!("LLM API 调用失败: {}", e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("LLM 返回内容为空"))?;

        Ok(content.trim().to_string())
    }
}

/// 构建出题提示词
pub fn build_generation_prompt(draft: &ExamDraft) -> String {
    let distribution_lines: Vec<String> = QuestionType::ALL
        .iter()
        .map(|&t| {
            format!(
                "- {}（键 `{}`）：{} 道",
                t.label(),
                t.key(),
                draft.distribution.count_for(t)
            )
        })
        .collect();

    format!(
        r#"请为科目「{}」出一份共 {} 道题的试卷，题型分布如下：
{}

【输出要求】
1. 只返回一个 JSON 对象，结构为 {{"multiple_choice": [...], "true_false": [...], "open_analysis": [...], "open_exercise": [...]}}
2. 每道题是 {{"text": "题干", "options": ["选项1", "选项2"]}}，只有选择题和判断题需要 options
3. 每个题型的数量必须与上面的分布一致，数量为 0 的题型返回空数组"#,
        draft.subject,
        draft.total_questions,
        distribution_lines.join("\n")
    )
}

/// 解析 LLM 返回的题目 JSON
///
/// 兼容 ```json 代码块包裹，以及外层多包一层 `questions` 的写法。
pub fn parse_generation_response(response: &str) -> std::result::Result<QuestionSet, serde_json::Error> {
    let body = extract_json_block(response);

    let value: serde_json::Value = serde_json::from_str(body)?;
    let inner = match value.get("questions") {
        Some(questions) if questions.is_object() => questions.clone(),
        _ => value,
    };

    serde_json::from_value(inner)
}

fn extract_json_block(response: &str) -> &str {
    let fence = Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").ok();
    if let Some(captures) = fence.as_ref().and_then(|re| re.captures(response)) {
        if let Some(m) = captures.get(1) {
            return m.as_str();
        }
    }
    response.trim()
}

#[async_trait]
impl QuestionGenerator for LlmService {
    async fn generate_questions(&self, draft: &ExamDraft) -> AppResult<GenerationResult> {
        info!(
            "🤖 使用 LLM 出题: {} (共 {} 道)",
            draft.subject, draft.total_questions
        );

        let prompt = build_generation_prompt(draft);
        let response = self
            .send_to_llm(&prompt, Some(SYSTEM_MESSAGE))
            .await
            .map_err(|e| AppError::llm_api_failed(&self.model_name, e))?;

        let questions = parse_generation_response(&response).map_err(|e| {
            AppError::Llm(LlmError::QuestionParseFailed {
                response: truncate_text(&response, 200),
                source: Box::new(e),
            })
        })?;

        let expected = draft.total_questions.max(0) as usize;
        if questions.len() != expected {
            warn!(
                "LLM 返回题目数量 {} 与要求的 {} 不一致",
                questions.len(),
                expected
            );
        }

        Ok(GenerationResult::success(questions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::draft::Distribution;

    /// 创建测试用的 LlmService
    fn create_test_service() -> LlmService {
        let config = Config::from_env();
        LlmService::new(&config)
    }

    #[test]
    fn test_parse_plain_json() {
        let response = r#"{"multiple_choice":[{"text":"1+1=?","options":["1","2"]}],"true_false":[],"open_analysis":[],"open_exercise":[]}"#;
        let set = parse_generation_response(response).unwrap();

        assert_eq!(set.multiple_choice.len(), 1);
        assert_eq!(
            set.multiple_choice[0].options.as_deref(),
            Some(&["1".to_string(), "2".to_string()][..])
        );
    }

    #[test]
    fn test_parse_fenced_json_with_wrapper() {
        let response = "好的，题目如下：\n```json\n{\"questions\": {\"open_exercise\": [{\"text\": \"计算面积\"}]}}\n```\n祝考试顺利";
        let set = parse_generation_response(response).unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.open_exercise[0].text, "计算面积");
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(parse_generation_response("抱歉，我无法完成").is_err());
    }

    #[test]
    fn test_prompt_mentions_distribution() {
        let draft = ExamDraft::new(
            "历史",
            6,
            Distribution {
                multiple_choice: 3,
                true_false: 1,
                analysis: 2,
                open_ended: 0,
            },
        );
        let prompt = build_generation_prompt(&draft);

        assert!(prompt.contains("「历史」"));
        assert!(prompt.contains("共 6 道题"));
        assert!(prompt.contains("`open_analysis`）：2 道"));
        assert!(prompt.contains("`open_exercise`）：0 道"));
    }

    /// 测试真实 LLM 出题
    ///
    /// 运行方式：
    /// ```bash
    /// LLM_API_KEY=... cargo test test_generate_live -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_generate_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let service = create_test_service();
        let draft = ExamDraft::new(
            "数学",
            2,
            Distribution {
                multiple_choice: 1,
                true_false: 1,
                ..Default::default()
            },
        );

        match service.generate_questions(&draft).await {
            Ok(result) => {
                println!("\n========== LLM 出题结果 ==========");
                println!("{:#?}", result);
                println!("==============================\n");
                assert!(result.ok);
            }
            Err(e) => {
                println!("❌ LLM 调用失败: {}", e);
                panic!("测试失败: {}", e);
            }
        }
    }
}
