//! 审阅页动作分发 - 流程层
//!
//! 把"全部重新生成 / 单题重新生成 / 手动添加 / 保存"转交给调用方提供的处理器，
//! 自身不做生成也不做持久化。

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::models::question::{GeneratedQuestion, QuestionType};
use crate::models::review::ReviewHeader;
use crate::services::counter::QuestionStats;
use crate::workflow::loading::LoadingFlag;

/// 审阅页的外部处理器
///
/// 同步或异步实现均可，分发器会等待返回的操作完成。
#[async_trait]
pub trait ReviewerHandlers: Send + Sync {
    fn on_change(&self, question: GeneratedQuestion);

    async fn on_regenerate_all(&self) -> AppResult<()>;

    /// 可选能力，默认什么也不做
    async fn on_regenerate_one(&self, question: &GeneratedQuestion) -> AppResult<()> {
        debug!("未提供单题重新生成处理器，忽略题目 {}", question.id);
        Ok(())
    }

    fn on_add_manual(&self, question_type: QuestionType);

    async fn on_save(&self) -> AppResult<()>;
}

#[async_trait]
impl<H: ReviewerHandlers + ?Sized> ReviewerHandlers for std::sync::Arc<H> {
    fn on_change(&self, question: GeneratedQuestion) {
        (**self).on_change(question)
    }

    async fn on_regenerate_all(&self) -> AppResult<()> {
        (**self).on_regenerate_all().await
    }

    async fn on_regenerate_one(&self, question: &GeneratedQuestion) -> AppResult<()> {
        (**self).on_regenerate_one(question).await
    }

    fn on_add_manual(&self, question_type: QuestionType) {
        (**self).on_add_manual(question_type)
    }

    async fn on_save(&self) -> AppResult<()> {
        (**self).on_save().await
    }
}

/// 手动添加题目时的题型选择框
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypePicker {
    pub open: bool,
    pub choice: QuestionType,
}

/// 审阅页摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub header: ReviewHeader,
    pub stats: QuestionStats,
    pub loading: bool,
    pub error: Option<String>,
    pub regenerating: bool,
    pub saving: bool,
}

/// 审阅页动作分发器
pub struct Reviewer<H> {
    handlers: H,
    regen_loading: LoadingFlag,
    save_loading: LoadingFlag,
    picker: Mutex<TypePicker>,
}

impl<H: ReviewerHandlers> Reviewer<H> {
    pub fn new(handlers: H) -> Self {
        Self {
            handlers,
            regen_loading: LoadingFlag::new(),
            save_loading: LoadingFlag::new(),
            picker: Mutex::new(TypePicker::default()),
        }
    }

    pub fn handlers(&self) -> &H {
        &self.handlers
    }

    pub fn is_regenerating(&self) -> bool {
        self.regen_loading.is_loading()
    }

    pub fn is_saving(&self) -> bool {
        self.save_loading.is_loading()
    }

    pub fn regenerating_flag(&self) -> LoadingFlag {
        self.regen_loading.clone()
    }

    pub fn saving_flag(&self) -> LoadingFlag {
        self.save_loading.clone()
    }

    pub fn change(&self, question: GeneratedQuestion) {
        self.handlers.on_change(question);
    }

    /// 全部重新生成，处理器结束后无论结果如何都复位加载标志
    pub async fn regenerate_all(&self) -> AppResult<()> {
        let _guard = self.regen_loading.begin();
        info!("🔄 重新生成全部题目");
        let result = self.handlers.on_regenerate_all().await;
        if let Err(e) = &result {
            warn!("⚠️ 重新生成失败: {}", e);
        }
        result
    }

    pub async fn regenerate_one(&self, question: &GeneratedQuestion) -> AppResult<()> {
        debug!("重新生成题目 {} ({})", question.id, question.question_type);
        self.handlers.on_regenerate_one(question).await
    }

    /// 打开题型选择框，选项重置为选择题
    pub fn open_type_picker(&self) {
        *self.lock_picker() = TypePicker {
            open: true,
            choice: QuestionType::MultipleChoice,
        };
    }

    pub fn choose_type(&self, question_type: QuestionType) {
        self.lock_picker().choice = question_type;
    }

    /// 确认添加：转交当前选择的题型并关闭选择框
    pub fn confirm_add_manual(&self) -> QuestionType {
        let choice = {
            let mut picker = self.lock_picker();
            picker.open = false;
            picker.choice
        };
        info!("➕ 手动添加题目: {}", choice.label());
        self.handlers.on_add_manual(choice);
        choice
    }

    pub fn cancel_type_picker(&self) {
        self.lock_picker().open = false;
    }

    pub fn type_picker(&self) -> TypePicker {
        *self.lock_picker()
    }

    /// 保存，处理器结束后无论结果如何都复位加载标志
    pub async fn save(&self) -> AppResult<()> {
        let _guard = self.save_loading.begin();
        info!("💾 保存审阅结果");
        let result = self.handlers.on_save().await;
        if let Err(e) = &result {
            warn!("⚠️ 保存失败: {}", e);
        }
        result
    }

    pub fn summary(
        &self,
        header: &ReviewHeader,
        questions: &[GeneratedQuestion],
        loading: bool,
        error: Option<&str>,
    ) -> ReviewSummary {
        ReviewSummary {
            header: header.clone(),
            stats: QuestionStats::from_questions(questions),
            loading,
            error: error.map(str::to_string),
            regenerating: self.is_regenerating(),
            saving: self.is_saving(),
        }
    }

    fn lock_picker(&self) -> std::sync::MutexGuard<'_, TypePicker> {
        self.picker.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::sync::Arc;

    #[derive(Default)]
    struct RecordingHandlers {
        events: Mutex<Vec<String>>,
        fail: bool,
        regen_flag: Mutex<Option<LoadingFlag>>,
        save_flag: Mutex<Option<LoadingFlag>>,
        seen_loading: Mutex<Vec<bool>>,
    }

    impl RecordingHandlers {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn record(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }

        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }

        fn outcome(&self) -> AppResult<()> {
            if self.fail {
                Err(AppError::Other("handler failed".to_string()))
            } else {
                Ok(())
            }
        }

        fn observe(&self, flag: &Mutex<Option<LoadingFlag>>) {
            let seen = flag.lock().unwrap().as_ref().map(|f| f.is_loading());
            if let Some(seen) = seen {
                self.seen_loading.lock().unwrap().push(seen);
            }
        }
    }

    #[async_trait]
    impl ReviewerHandlers for RecordingHandlers {
        fn on_change(&self, question: GeneratedQuestion) {
            self.record(format!("change:{}", question.id));
        }

        async fn on_regenerate_all(&self) -> AppResult<()> {
            self.observe(&self.regen_flag);
            tokio::task::yield_now().await;
            self.record("regenerate_all".to_string());
            self.outcome()
        }

        fn on_add_manual(&self, question_type: QuestionType) {
            self.record(format!("add:{}", question_type));
        }

        async fn on_save(&self) -> AppResult<()> {
            self.observe(&self.save_flag);
            tokio::task::yield_now().await;
            self.record("save".to_string());
            self.outcome()
        }
    }

    fn reviewer(handlers: RecordingHandlers) -> (Reviewer<Arc<RecordingHandlers>>, Arc<RecordingHandlers>) {
        let handlers = Arc::new(handlers);
        let reviewer = Reviewer::new(Arc::clone(&handlers));
        *handlers.regen_flag.lock().unwrap() = Some(reviewer.regenerating_flag());
        *handlers.save_flag.lock().unwrap() = Some(reviewer.saving_flag());
        (reviewer, handlers)
    }

    fn question(id: &str) -> GeneratedQuestion {
        GeneratedQuestion::manual(id, QuestionType::OpenAnalysis)
    }

    #[tokio::test]
    async fn test_flags_set_during_and_cleared_after() {
        let (reviewer, handlers) = reviewer(RecordingHandlers::default());

        reviewer.regenerate_all().await.unwrap();
        reviewer.save().await.unwrap();

        assert_eq!(*handlers.seen_loading.lock().unwrap(), vec![true, true]);
        assert!(!reviewer.is_regenerating());
        assert!(!reviewer.is_saving());
        assert_eq!(handlers.events(), vec!["regenerate_all", "save"]);
    }

    #[tokio::test]
    async fn test_flags_cleared_on_failure() {
        let (reviewer, _handlers) = reviewer(RecordingHandlers::failing());

        assert!(reviewer.regenerate_all().await.is_err());
        assert!(reviewer.save().await.is_err());
        assert!(!reviewer.is_regenerating());
        assert!(!reviewer.is_saving());
    }

    #[tokio::test]
    async fn test_default_regenerate_one_is_noop() {
        let (reviewer, handlers) = reviewer(RecordingHandlers::default());

        reviewer.regenerate_one(&question("q-1")).await.unwrap();
        assert!(handlers.events().is_empty());
    }

    #[test]
    fn test_change_is_forwarded() {
        let (reviewer, handlers) = reviewer(RecordingHandlers::default());
        reviewer.change(question("q-7"));
        assert_eq!(handlers.events(), vec!["change:q-7"]);
    }

    #[test]
    fn test_type_picker_flow() {
        let (reviewer, handlers) = reviewer(RecordingHandlers::default());

        reviewer.choose_type(QuestionType::OpenExercise);
        reviewer.open_type_picker();
        // 打开时重置为选择题
        assert_eq!(
            reviewer.type_picker(),
            TypePicker {
                open: true,
                choice: QuestionType::MultipleChoice
            }
        );

        reviewer.choose_type(QuestionType::TrueFalse);
        assert_eq!(reviewer.confirm_add_manual(), QuestionType::TrueFalse);
        assert!(!reviewer.type_picker().open);

        reviewer.open_type_picker();
        reviewer.cancel_type_picker();
        assert!(!reviewer.type_picker().open);

        assert_eq!(handlers.events(), vec!["add:true_false"]);
    }

    #[test]
    fn test_summary_counts() {
        let (reviewer, _handlers) = reviewer(RecordingHandlers::default());
        let mut excluded = GeneratedQuestion::manual("b", QuestionType::TrueFalse);
        excluded.include = false;
        let questions = vec![GeneratedQuestion::manual("a", QuestionType::MultipleChoice), excluded];

        let summary = reviewer.summary(&ReviewHeader::new("历史", "中等"), &questions, false, Some("出错了"));

        assert_eq!(summary.stats.total, 2);
        assert_eq!(summary.stats.selected, 1);
        assert_eq!(summary.error.as_deref(), Some("出错了"));
        assert!(!summary.regenerating);
        assert!(!summary.saving);
    }
}
