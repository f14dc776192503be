//! 审阅会话
//!
//! 持有一份生成题目列表，作为审阅页处理器的默认实现：
//! 修改、重新生成、手动添加都直接作用于这份列表，保存时写出已纳入的题目。

use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::{info, warn};

use crate::clients::QuestionGenerator;
use crate::error::{AppError, AppResult};
use crate::models::draft::ExamDraft;
use crate::models::question::{GeneratedQuestion, QuestionType};
use crate::models::review::ReviewHeader;
use crate::workflow::reviewer::ReviewerHandlers;

/// 保存到文件的审阅结果
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SavedExam<'a> {
    header: &'a ReviewHeader,
    saved_at: String,
    questions: Vec<GeneratedQuestion>,
}

pub struct ReviewSession<G> {
    generator: G,
    draft: ExamDraft,
    header: ReviewHeader,
    questions: Mutex<Vec<GeneratedQuestion>>,
    manual_seq: AtomicUsize,
    output_path: PathBuf,
}

impl<G: QuestionGenerator> ReviewSession<G> {
    pub fn new(
        generator: G,
        draft: ExamDraft,
        header: ReviewHeader,
        questions: Vec<GeneratedQuestion>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            generator,
            draft,
            header,
            questions: Mutex::new(questions),
            manual_seq: AtomicUsize::new(0),
            output_path: output_path.into(),
        }
    }

    pub fn header(&self) -> &ReviewHeader {
        &self.header
    }

    pub fn questions(&self) -> Vec<GeneratedQuestion> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<GeneratedQuestion>> {
        self.questions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl<G: QuestionGenerator> ReviewerHandlers for ReviewSession<G> {
    fn on_change(&self, question: GeneratedQuestion) {
        let mut questions = self.lock();
        match questions.iter_mut().find(|q| q.id == question.id) {
            Some(existing) => *existing = question,
            None => warn!("⚠️ 未找到题目 {}，忽略修改", question.id),
        }
    }

    async fn on_regenerate_all(&self) -> AppResult<()> {
        let result = self.generator.generate_questions(&self.draft).await?;
        let set = result
            .questions()
            .ok_or_else(|| AppError::Other("重新生成失败: 生成接口返回失败".to_string()))?;

        let regenerated = set.into_generated();
        info!("✓ 已重新生成 {} 道题目", regenerated.len());
        *self.lock() = regenerated;
        Ok(())
    }

    async fn on_regenerate_one(&self, question: &GeneratedQuestion) -> AppResult<()> {
        let draft = self.draft.single_question(question.question_type);
        let result = self.generator.generate_questions(&draft).await?;

        let item = result
            .questions()
            .and_then(|set| set.items(question.question_type).first().cloned())
            .ok_or_else(|| {
                AppError::Other(format!("重新生成题目 {} 失败: 没有返回对应题型", question.id))
            })?;

        let mut questions = self.lock();
        match questions.iter_mut().find(|q| q.id == question.id) {
            Some(existing) => {
                existing.text = item.text;
                existing.options = item.options;
                info!("✓ 已重新生成题目 {}", question.id);
            }
            None => warn!("⚠️ 题目 {} 已不存在，丢弃重新生成结果", question.id),
        }
        Ok(())
    }

    fn on_add_manual(&self, question_type: QuestionType) {
        let n = self.manual_seq.fetch_add(1, Ordering::Relaxed) + 1;
        self.lock()
            .push(GeneratedQuestion::manual(format!("manual-{}", n), question_type));
    }

    async fn on_save(&self) -> AppResult<()> {
        let included: Vec<GeneratedQuestion> =
            self.questions().into_iter().filter(|q| q.include).collect();

        let saved = SavedExam {
            header: &self.header,
            saved_at: chrono::Local::now().to_rfc3339(),
            questions: included,
        };
        let content = serde_json::to_string_pretty(&saved)?;

        tokio::fs::write(&self.output_path, content)
            .await
            .map_err(|e| AppError::file_write_failed(self.output_path.display().to_string(), e))?;

        info!(
            "✓ 已保存 {} 道题目到 {}",
            saved.questions.len(),
            self.output_path.display()
        );
        Ok(())
    }
}
