//! 题型分布校验 - 业务能力层
//!
//! 只负责判断草稿能否进入生成环节，不产生任何副作用

use tracing::debug;

use crate::error::ProposeError;
use crate::models::draft::ExamDraft;

/// 校验题型分布
///
/// 先检查题目总数，再检查四类题型数量之和；校验通过时返回该和。
pub fn validate_distribution(draft: &ExamDraft) -> Result<i64, ProposeError> {
    let total = draft.total_questions;
    if total <= 0 {
        return Err(ProposeError::InvalidTotal { total });
    }

    let sum = draft.distribution.sum();
    if sum != total {
        return Err(ProposeError::DistributionMismatch { sum, total });
    }

    debug!("题型分布校验通过: {}/{}", sum, total);
    Ok(sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::draft::Distribution;
    use tokio_test::{assert_err, assert_ok};

    fn draft(total: i64, mc: i64, tf: i64, an: i64, oe: i64) -> ExamDraft {
        ExamDraft::new(
            "历史",
            total,
            Distribution {
                multiple_choice: mc,
                true_false: tf,
                analysis: an,
                open_ended: oe,
            },
        )
    }

    #[test]
    fn test_balanced_distribution_passes() {
        let sum = assert_ok!(validate_distribution(&draft(10, 5, 5, 0, 0)));
        assert_eq!(sum, 10);
    }

    #[test]
    fn test_mismatch_rejected() {
        let err = assert_err!(validate_distribution(&draft(10, 5, 6, 0, 0)));
        assert!(matches!(
            err,
            ProposeError::DistributionMismatch { sum: 11, total: 10 }
        ));
    }

    #[test]
    fn test_non_positive_total_rejected() {
        for total in [0, -1, -10] {
            let err = assert_err!(validate_distribution(&draft(total, 0, 0, 0, 0)));
            assert!(matches!(err, ProposeError::InvalidTotal { .. }));
        }
    }

    #[test]
    fn test_total_checked_before_sum() {
        // 总数为 0 且分布之和不为 0，仍然报告总数无效
        let err = assert_err!(validate_distribution(&draft(0, 1, 2, 3, 4)));
        assert!(matches!(err, ProposeError::InvalidTotal { total: 0 }));
    }

    #[test]
    fn test_every_category_counts() {
        assert_ok!(validate_distribution(&draft(10, 1, 2, 3, 4)));
        assert_err!(validate_distribution(&draft(10, 1, 2, 3, 3)));
    }
}
