use serde::Serialize;

use crate::models::question::{GeneratedQuestion, QuestionType};

/// 题目统计
///
/// 与顺序无关；相同 id 的题目不去重，各算一次。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QuestionStats {
    pub total: usize,
    pub selected: usize,
    pub multiple_choice: usize,
    pub true_false: usize,
    pub open_analysis: usize,
    pub open_exercise: usize,
}

impl QuestionStats {
    pub fn from_questions(questions: &[GeneratedQuestion]) -> Self {
        questions.iter().fold(Self::default(), |mut stats, q| {
            stats.total += 1;
            if q.include {
                stats.selected += 1;
            }
            *stats.count_mut(q.question_type) += 1;
            stats
        })
    }

    pub fn count_for(&self, question_type: QuestionType) -> usize {
        match question_type {
            QuestionType::MultipleChoice => self.multiple_choice,
            QuestionType::TrueFalse => self.true_false,
            QuestionType::OpenAnalysis => self.open_analysis,
            QuestionType::OpenExercise => self.open_exercise,
        }
    }

    fn count_mut(&mut self, question_type: QuestionType) -> &mut usize {
        match question_type {
            QuestionType::MultipleChoice => &mut self.multiple_choice,
            QuestionType::TrueFalse => &mut self.true_false,
            QuestionType::OpenAnalysis => &mut self.open_analysis,
            QuestionType::OpenExercise => &mut self.open_exercise,
        }
    }
}
