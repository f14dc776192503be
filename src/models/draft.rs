use serde::{Deserialize, Serialize};

use crate::models::question::QuestionType;

/// 各题型数量分布
///
/// 字段与表单一一对应，不再通过字符串键动态取值。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    #[serde(default, deserialize_with = "deserialize_count")]
    pub multiple_choice: i64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub true_false: i64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub analysis: i64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub open_ended: i64,
}

impl Distribution {
    pub fn sum(&self) -> i64 {
        self.multiple_choice + self.true_false + self.analysis + self.open_ended
    }

    /// 某一题型对应的数量（开放分析题对应 `analysis`，开放练习题对应 `open_ended`）
    pub fn count_for(&self, question_type: QuestionType) -> i64 {
        match question_type {
            QuestionType::MultipleChoice => self.multiple_choice,
            QuestionType::TrueFalse => self.true_false,
            QuestionType::OpenAnalysis => self.analysis,
            QuestionType::OpenExercise => self.open_ended,
        }
    }

    /// 只包含一道指定题型的分布
    pub fn single(question_type: QuestionType) -> Self {
        let mut distribution = Self::default();
        match question_type {
            QuestionType::MultipleChoice => distribution.multiple_choice = 1,
            QuestionType::TrueFalse => distribution.true_false = 1,
            QuestionType::OpenAnalysis => distribution.analysis = 1,
            QuestionType::OpenExercise => distribution.open_ended = 1,
        }
        distribution
    }
}

/// 试卷草稿（生成题目之前的配置）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDraft {
    #[serde(default, deserialize_with = "deserialize_subject")]
    pub subject: String,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub total_questions: i64,
    #[serde(flatten)]
    pub distribution: Distribution,
    /// 难度（仅用于审阅页展示）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

impl ExamDraft {
    pub fn new(subject: impl Into<String>, total_questions: i64, distribution: Distribution) -> Self {
        Self {
            subject: subject.into(),
            total_questions,
            distribution,
            difficulty: None,
        }
    }

    /// 同科目、只生成一道指定题型的草稿
    pub fn single_question(&self, question_type: QuestionType) -> Self {
        Self {
            subject: self.subject.clone(),
            total_questions: 1,
            distribution: Distribution::single(question_type),
            difficulty: self.difficulty.clone(),
        }
    }

    /// 表单快照是否可用（科目非空）
    pub fn has_subject(&self) -> bool {
        !self.subject.trim().is_empty()
    }
}

// 数量字段宽松解析：缺失、null、非数字一律按 0 处理，数字字符串按数字处理
fn deserialize_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{IgnoredAny, MapAccess, SeqAccess, Visitor};
    use std::fmt;

    struct CountVisitor;

    impl<'de> Visitor<'de> for CountVisitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number or numeric string")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(i64::try_from(value).unwrap_or(0))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(integral_or_zero(value))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            let trimmed = value.trim();
            if let Ok(n) = trimmed.parse::<i64>() {
                return Ok(n);
            }
            Ok(trimmed.parse::<f64>().map(integral_or_zero).unwrap_or(0))
        }

        fn visit_bool<E>(self, _value: bool) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(0)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(0)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(0)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(0)
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(0)
        }
    }

    deserializer.deserialize_any(CountVisitor)
}

fn integral_or_zero(value: f64) -> i64 {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        value as i64
    } else {
        0
    }
}

// 科目字段：字符串原样保留，数字转为字符串，其他按空处理
fn deserialize_subject<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}
