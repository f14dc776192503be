use serde::{Deserialize, Serialize};

use crate::models::question::{GeneratedQuestion, QuestionType};

/// 生成接口返回的单道题目
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionItem {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl QuestionItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: None,
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }
}

/// 按题型分组的题目集合
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionSet {
    #[serde(default)]
    pub multiple_choice: Vec<QuestionItem>,
    #[serde(default)]
    pub true_false: Vec<QuestionItem>,
    #[serde(default)]
    pub open_analysis: Vec<QuestionItem>,
    #[serde(default)]
    pub open_exercise: Vec<QuestionItem>,
}

impl QuestionSet {
    pub fn items(&self, question_type: QuestionType) -> &[QuestionItem] {
        match question_type {
            QuestionType::MultipleChoice => &self.multiple_choice,
            QuestionType::TrueFalse => &self.true_false,
            QuestionType::OpenAnalysis => &self.open_analysis,
            QuestionType::OpenExercise => &self.open_exercise,
        }
    }

    pub fn len(&self) -> usize {
        QuestionType::ALL.iter().map(|t| self.items(*t).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 展开为审阅页使用的题目列表
    ///
    /// 按题型固定顺序排列，id 依次为 `q-1`、`q-2`……，全部默认纳入试卷。
    pub fn into_generated(self) -> Vec<GeneratedQuestion> {
        let groups = [
            (QuestionType::MultipleChoice, self.multiple_choice),
            (QuestionType::TrueFalse, self.true_false),
            (QuestionType::OpenAnalysis, self.open_analysis),
            (QuestionType::OpenExercise, self.open_exercise),
        ];

        groups
            .into_iter()
            .flat_map(|(question_type, items)| {
                items.into_iter().map(move |item| (question_type, item))
            })
            .enumerate()
            .map(|(i, (question_type, item))| GeneratedQuestion {
                id: format!("q-{}", i + 1),
                question_type,
                text: item.text,
                options: item.options,
                include: true,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationData {
    #[serde(default)]
    pub questions: QuestionSet,
}

/// 生成接口的响应
///
/// `ok == false` 表示可恢复的失败，而不是异常。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    #[serde(default)]
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<GenerationData>,
}

impl GenerationResult {
    pub fn success(questions: QuestionSet) -> Self {
        Self {
            ok: true,
            data: Some(GenerationData { questions }),
        }
    }

    pub fn failed() -> Self {
        Self { ok: false, data: None }
    }

    /// 成功时的题目集合；`data` 缺失时视为空集合
    pub fn questions(&self) -> Option<QuestionSet> {
        if !self.ok {
            return None;
        }
        Some(
            self.data
                .as_ref()
                .map(|d| d.questions.clone())
                .unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_response() {
        let json = r#"{"ok": true, "data": {"questions": {"true_false": [{"text": "地球是圆的"}]}}}"#;
        let result: GenerationResult = serde_json::from_str(json).unwrap();

        let set = result.questions().unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.multiple_choice.is_empty());
        assert_eq!(set.items(QuestionType::TrueFalse)[0].text, "地球是圆的");
    }

    #[test]
    fn test_failed_response_has_no_questions() {
        let result: GenerationResult = serde_json::from_str(r#"{"ok": false}"#).unwrap();
        assert!(result.questions().is_none());
    }

    #[test]
    fn test_ok_without_data_is_empty_set() {
        let result: GenerationResult = serde_json::from_str(r#"{"ok": true}"#).unwrap();
        assert_eq!(result.questions(), Some(QuestionSet::default()));
    }

    #[test]
    fn test_into_generated_order_and_ids() {
        let set = QuestionSet {
            multiple_choice: vec![QuestionItem::new("A").with_options(["1", "2"])],
            open_exercise: vec![QuestionItem::new("B")],
            true_false: vec![QuestionItem::new("C")],
            ..Default::default()
        };

        let questions = set.into_generated();
        let summary: Vec<_> = questions
            .iter()
            .map(|q| (q.id.as_str(), q.question_type, q.text.as_str()))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("q-1", QuestionType::MultipleChoice, "A"),
                ("q-2", QuestionType::TrueFalse, "C"),
                ("q-3", QuestionType::OpenExercise, "B"),
            ]
        );
        assert!(questions.iter().all(|q| q.include));
    }
}
