use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::requests::{CreateAssignmentSubmissionRequest, UpdateAssignmentSubmissionRequest};
use crate::errors::Result;
use crate::models::common::SubmissionStatus;

// 评分细则得分，criterion 必须对应作业评分细则中的一项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment_submission.ts")]
pub struct RubricScore {
    pub criterion: String,
    pub score: f64,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment_submission.ts")]
pub struct AssignmentSubmission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: Option<String>,
    pub file_urls: Vec<String>,
    pub score: Option<f64>,
    pub feedback: Option<String>,
    pub rubric_scores: Option<Vec<RubricScore>>,
    pub status: SubmissionStatus,
    // 0-100，AI 生成内容的可能性
    pub ai_detection_score: Option<i32>,
    pub ai_graded: bool,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl AssignmentSubmission {
    pub fn from_request(
        id: i64,
        req: CreateAssignmentSubmissionRequest,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        let status = req.status.unwrap_or(SubmissionStatus::Submitted);
        Self {
            id,
            assignment_id: req.assignment_id,
            student_id: req.student_id,
            content: req.content,
            file_urls: req.file_urls.unwrap_or_default(),
            score: None,
            feedback: None,
            rubric_scores: None,
            status,
            ai_detection_score: None,
            ai_graded: false,
            submitted_at: (status != SubmissionStatus::InProgress).then_some(now),
            graded_at: (status == SubmissionStatus::Graded).then_some(now),
        }
    }

    /// 合并更新；状态回退时返回错误且不修改记录
    pub fn apply_update(
        &mut self,
        update: UpdateAssignmentSubmissionRequest,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<()> {
        if let Some(status) = update.status {
            self.status.ensure_transition(status)?;
        }

        if let Some(content) = update.content {
            self.content = Some(content);
        }
        if let Some(file_urls) = update.file_urls {
            self.file_urls = file_urls;
        }
        if let Some(ai_detection_score) = update.ai_detection_score {
            self.ai_detection_score = Some(ai_detection_score);
        }
        if update.status == Some(SubmissionStatus::Graded) {
            // 评分整体覆盖，未给出的字段清空
            self.score = update.score;
            self.feedback = update.feedback;
            self.rubric_scores = update.rubric_scores;
            self.ai_graded = update.ai_graded.unwrap_or(false);
        } else {
            if let Some(score) = update.score {
                self.score = Some(score);
            }
            if let Some(feedback) = update.feedback {
                self.feedback = Some(feedback);
            }
            if let Some(rubric_scores) = update.rubric_scores {
                self.rubric_scores = Some(rubric_scores);
            }
            if let Some(ai_graded) = update.ai_graded {
                self.ai_graded = ai_graded;
            }
        }
        if let Some(status) = update.status {
            self.status = status;
            if status != SubmissionStatus::InProgress && self.submitted_at.is_none() {
                self.submitted_at = Some(now);
            }
            if status == SubmissionStatus::Graded {
                self.graded_at = Some(update.graded_at.unwrap_or(now));
            }
        }
        if let Some(submitted_at) = update.submitted_at {
            self.submitted_at = Some(submitted_at);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_mark_submitted() {
        let s = AssignmentSubmission::from_request(
            1,
            CreateAssignmentSubmissionRequest {
                assignment_id: 4,
                student_id: 5,
                content: Some("My essay".to_string()),
                file_urls: None,
                status: None,
            },
            chrono::Utc::now(),
        );
        assert_eq!(s.status, SubmissionStatus::Submitted);
        assert!(s.submitted_at.is_some());
        assert!(s.graded_at.is_none());
        assert!(s.file_urls.is_empty());
        assert!(!s.ai_graded);
    }

    #[test]
    fn test_regrade_overwrites_all_graded_fields() {
        let mut s = AssignmentSubmission::from_request(
            1,
            CreateAssignmentSubmissionRequest {
                assignment_id: 4,
                student_id: 5,
                content: Some("My essay".to_string()),
                file_urls: None,
                status: None,
            },
            chrono::Utc::now(),
        );
        s.apply_update(
            UpdateAssignmentSubmissionRequest {
                score: Some(2.0),
                feedback: Some("Off topic".to_string()),
                rubric_scores: Some(vec![RubricScore {
                    criterion: "Clarity".to_string(),
                    score: 1.0,
                    feedback: None,
                }]),
                ai_graded: Some(true),
                status: Some(SubmissionStatus::Graded),
                ..Default::default()
            },
            chrono::Utc::now(),
        )
        .unwrap();

        s.apply_update(
            UpdateAssignmentSubmissionRequest {
                score: Some(20.0),
                status: Some(SubmissionStatus::Graded),
                ..Default::default()
            },
            chrono::Utc::now(),
        )
        .unwrap();
        assert_eq!(s.score, Some(20.0));
        assert_eq!(s.feedback, None);
        assert_eq!(s.rubric_scores, None);
        assert!(!s.ai_graded);
    }
}
