//! AI 出题流程 - 流程层
//!
//! 核心职责：驱动一次"按草稿生成题目"的完整过程
//!
//! 流程顺序：
//! 1. 确定草稿（表单快照优先，其次本地草稿）
//! 2. 校验题型分布，不通过则直接拒绝，不发起调用
//! 3. 置位加载标志 → 调用生成接口一次 → 无条件复位
//! 4. 成功则构建渲染树，失败则清空内容并推送通知

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Mutex;
use tracing::{error, info, warn};

use crate::clients::QuestionGenerator;
use crate::error::ProposeError;
use crate::models::draft::ExamDraft;
use crate::models::generation::QuestionSet;
use crate::services::draft_store::{resolve_draft, DraftSource};
use crate::services::notifier::Notifier;
use crate::services::render::{HtmlRenderer, RenderedSet, Renderer};
use crate::services::validator::validate_distribution;
use crate::workflow::loading::LoadingFlag;

const GENERATING_HTML: &str = "<p>正在生成题目…</p>";

/// 一次成功生成的结果
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    /// 实际使用的草稿
    pub draft: ExamDraft,
    pub questions: QuestionSet,
    pub rendered: RenderedSet,
}

/// 结果面板中的内容
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PanelContent {
    #[default]
    Empty,
    /// 等待生成结果时的占位
    Generating,
    Rendered(RenderedSet),
}

/// AI 结果面板
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiPanel {
    pub open: bool,
    pub content: PanelContent,
}

impl AiPanel {
    /// 输出面板当前内容的 HTML
    pub fn render_html(&self) -> String {
        match &self.content {
            PanelContent::Empty => String::new(),
            PanelContent::Generating => GENERATING_HTML.to_string(),
            PanelContent::Rendered(set) => HtmlRenderer.render(set),
        }
    }
}

/// AI 出题流程
///
/// - 不持有表单，快照由调用方传入
/// - 草稿来源、生成接口、通知通道都通过构造函数注入
/// - 不会重试，也不防止重入：调用方应依据加载标志禁用再次触发
pub struct ProposeFlow<G, N, D> {
    generator: G,
    notifier: N,
    drafts: D,
    loading: LoadingFlag,
    panel: Mutex<AiPanel>,
}

impl<G, N, D> ProposeFlow<G, N, D>
where
    G: QuestionGenerator,
    N: Notifier,
    D: DraftSource,
{
    /// 创建新的出题流程
    pub fn new(generator: G, notifier: N, drafts: D) -> Self {
        Self {
            generator,
            notifier,
            drafts,
            loading: LoadingFlag::new(),
            panel: Mutex::new(AiPanel::default()),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// 加载标志的共享句柄
    pub fn loading_flag(&self) -> LoadingFlag {
        self.loading.clone()
    }

    pub fn panel(&self) -> AiPanel {
        self.lock_panel().clone()
    }

    pub fn open_panel(&self) {
        self.lock_panel().open = true;
    }

    /// 关闭面板并清空内容
    pub fn close_panel(&self) {
        *self.lock_panel() = AiPanel::default();
    }

    pub fn render_html(&self) -> String {
        self.lock_panel().render_html()
    }

    pub async fn propose(&self, snapshot: Option<&ExamDraft>) -> Result<Proposal, ProposeError> {
        let Some(draft) = resolve_draft(snapshot, &self.drafts) else {
            return Err(self.reject(ProposeError::MissingDraft));
        };

        if let Err(e) = validate_distribution(&draft) {
            return Err(self.reject(e));
        }

        if self.loading.is_loading() {
            warn!("⚠️ 上一次生成尚未完成，又发起了新的生成请求");
        }

        self.set_panel(true, PanelContent::Generating);
        let _guard = self.loading.begin();

        info!(
            "🤖 开始生成题目: {} (共 {} 道)",
            draft.subject, draft.total_questions
        );

        let outcome = AssertUnwindSafe(self.generator.generate_questions(&draft))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(result)) => match result.questions() {
                Some(set) => {
                    let rendered = RenderedSet::from_question_set(&set);
                    info!("✓ 生成完成，共 {} 道题目", rendered.question_count());
                    self.set_panel(true, PanelContent::Rendered(rendered.clone()));
                    Ok(Proposal {
                        draft,
                        questions: set,
                        rendered,
                    })
                }
                None => {
                    warn!("⚠️ 生成接口返回失败标志");
                    self.set_panel(true, PanelContent::Empty);
                    Err(self.reject(ProposeError::GenerationFailed))
                }
            },
            Ok(Err(e)) => {
                error!("生成调用出错: {}", e);
                self.set_panel(true, PanelContent::Empty);
                Err(self.reject(ProposeError::GenerationThrew(e.to_string())))
            }
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                error!("生成调用 panic: {}", reason);
                self.set_panel(true, PanelContent::Empty);
                Err(self.reject(ProposeError::GenerationThrew(reason)))
            }
        }
    }

    fn reject(&self, err: ProposeError) -> ProposeError {
        self.notifier.push(err.severity(), err.notice_message());
        err
    }

    fn set_panel(&self, open: bool, content: PanelContent) {
        let mut panel = self.lock_panel();
        panel.open = open;
        panel.content = content;
    }

    fn lock_panel(&self) -> std::sync::MutexGuard<'_, AiPanel> {
        self.panel.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
