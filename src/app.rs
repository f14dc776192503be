//! 应用主结构
//!
//! 把配置、草稿存储、生成接口和两个流程串起来：
//! 读取草稿 → AI 出题 → 输出 HTML / 文本 → 审阅摘要 → 保存

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::clients::{HttpGenerationClient, QuestionGenerator};
use crate::config::Config;
use crate::error::{AppError, ConfigError};
use crate::models::review::ReviewHeader;
use crate::services::draft_store::JsonDraftStore;
use crate::services::notifier::ToastQueue;
use crate::services::render::PlainTextRenderer;
use crate::services::LlmService;
use crate::utils::logging;
use crate::workflow::{ProposeFlow, ReviewSession, Reviewer};

const DEFAULT_DIFFICULTY: &str = "中等";

/// 一次运行的结果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// 生成的题目数量（未生成时为 0）
    pub generated: usize,
    /// 是否已保存审阅结果
    pub saved: bool,
    /// 产生的通知数量
    pub notices: usize,
}

pub struct App {
    config: Config,
    generator: Arc<dyn QuestionGenerator>,
}

impl App {
    /// 初始化应用
    ///
    /// 配置了生成后端时走 HTTP，否则直接调用 LLM。
    pub fn initialize(config: Config) -> Result<Self> {
        logging::init_log_file(&config.output_log_file)?;
        logging::log_startup(&config);

        let generator: Arc<dyn QuestionGenerator> = match &config.generation_api_base_url {
            Some(_) => Arc::new(HttpGenerationClient::new(&config)?),
            None => {
                if config.llm_api_key.trim().is_empty() {
                    return Err(AppError::Config(ConfigError::MissingValue {
                        name: "LLM_API_KEY".to_string(),
                    })
                    .into());
                }
                Arc::new(LlmService::new(&config))
            }
        };

        Ok(Self::with_generator(config, generator))
    }

    /// 使用指定的生成接口创建应用
    pub fn with_generator(config: Config, generator: Arc<dyn QuestionGenerator>) -> Self {
        Self { config, generator }
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunReport> {
        let toasts = Arc::new(ToastQueue::new());
        let drafts = JsonDraftStore::new(&self.config.draft_store_path, &self.config.draft_key);

        let flow = ProposeFlow::new(Arc::clone(&self.generator), Arc::clone(&toasts), drafts);
        let mut report = RunReport::default();

        match flow.propose(None).await {
            Ok(proposal) => {
                report.generated = proposal.rendered.question_count();

                tokio::fs::write(&self.config.output_html_file, flow.render_html()).await?;
                info!("✓ HTML 片段已写入: {}", self.config.output_html_file);
                println!("{}", proposal.rendered.render_with(&PlainTextRenderer));

                let header = ReviewHeader::new(
                    proposal.draft.subject.clone(),
                    proposal
                        .draft
                        .difficulty
                        .clone()
                        .unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string()),
                )
                .created_now();

                let session = ReviewSession::new(
                    Arc::clone(&self.generator),
                    proposal.draft,
                    header.clone(),
                    proposal.questions.into_generated(),
                    &self.config.review_output_file,
                );
                let reviewer = Reviewer::new(session);

                let summary = reviewer.summary(&header, &reviewer.handlers().questions(), false, None);
                logging::log_review_summary(&header.subject, &summary.stats);

                match reviewer.save().await {
                    Ok(()) => report.saved = true,
                    Err(e) => error!("❌ 保存审阅结果失败: {}", e),
                }
            }
            Err(e) => {
                warn!("⚠️ 本次未生成题目: {}", e);
            }
        }

        let notices = toasts.drain();
        report.notices = notices.len();
        logging::append_notices(&self.config.output_log_file, &notices)?;

        Ok(report)
    }
}
