use crate::errors::{AssessError, Result};
use crate::models::define_string_enum;

define_string_enum! {
    /// 提交状态：in_progress → submitted → graded，只进不退
    SubmissionStatus, "提交状态", "../frontend/src/types/generated/submission.ts" {
        InProgress => "in_progress",
        Submitted => "submitted",
        Graded => "graded",
    }
}

impl SubmissionStatus {
    fn rank(&self) -> u8 {
        match self {
            SubmissionStatus::InProgress => 0,
            SubmissionStatus::Submitted => 1,
            SubmissionStatus::Graded => 2,
        }
    }

    /// 状态是否可以从 self 变为 next（允许保持不变，例如重新评分）
    pub fn can_transition_to(&self, next: SubmissionStatus) -> bool {
        next.rank() >= self.rank()
    }

    pub fn ensure_transition(&self, next: SubmissionStatus) -> Result<()> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(AssessError::validation(format!(
                "Submission status cannot move from '{self}' back to '{next}'"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SubmissionStatus::InProgress, SubmissionStatus::Submitted, true)]
    #[case(SubmissionStatus::InProgress, SubmissionStatus::Graded, true)]
    #[case(SubmissionStatus::Submitted, SubmissionStatus::Graded, true)]
    #[case(SubmissionStatus::Graded, SubmissionStatus::Graded, true)]
    #[case(SubmissionStatus::Graded, SubmissionStatus::Submitted, false)]
    #[case(SubmissionStatus::Submitted, SubmissionStatus::InProgress, false)]
    fn test_transitions(
        #[case] from: SubmissionStatus,
        #[case] to: SubmissionStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
        assert_eq!(from.ensure_transition(to).is_ok(), allowed);
    }
}
