use serde::{Deserialize, Serialize};

/// 题型（固定四类）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// 选择题
    MultipleChoice,
    /// 判断题
    TrueFalse,
    /// 开放分析题
    OpenAnalysis,
    /// 开放练习题
    OpenExercise,
}

impl QuestionType {
    /// 按固定顺序列出全部题型
    pub const ALL: [QuestionType; 4] = [
        QuestionType::MultipleChoice,
        QuestionType::TrueFalse,
        QuestionType::OpenAnalysis,
        QuestionType::OpenExercise,
    ];

    /// 获取标准名称
    pub fn label(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "选择题",
            QuestionType::TrueFalse => "判断题",
            QuestionType::OpenAnalysis => "开放分析题",
            QuestionType::OpenExercise => "开放练习题",
        }
    }

    /// 审阅页统计卡片上的简称
    pub fn short_code(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "MC",
            QuestionType::TrueFalse => "VF",
            QuestionType::OpenAnalysis => "AN",
            QuestionType::OpenExercise => "EJ",
        }
    }

    /// 序列化时使用的键名
    pub fn key(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::TrueFalse => "true_false",
            QuestionType::OpenAnalysis => "open_analysis",
            QuestionType::OpenExercise => "open_exercise",
        }
    }
}

impl Default for QuestionType {
    fn default() -> Self {
        QuestionType::MultipleChoice
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// 审阅页中的一道生成题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub include: bool,
}

impl GeneratedQuestion {
    /// 手动添加的空白题目，默认纳入试卷
    pub fn manual(id: impl Into<String>, question_type: QuestionType) -> Self {
        let options = match question_type {
            QuestionType::MultipleChoice => Some(Vec::new()),
            QuestionType::TrueFalse => Some(vec!["正确".to_string(), "错误".to_string()]),
            _ => None,
        };

        Self {
            id: id.into(),
            question_type,
            text: String::new(),
            options,
            include: true,
        }
    }
}
