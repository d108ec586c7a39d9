use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::requests::CreatePublicSubmissionRequest;
use crate::models::quiz_submissions::entities::SubmittedAnswer;

// 匿名（公开链接）测验提交，只增不删
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/public_quiz.ts")]
pub struct PublicQuizSubmission {
    pub id: i64,
    pub quiz_id: i64,
    pub identification_data: BTreeMap<String, String>,
    pub answers: Vec<SubmittedAnswer>,
    pub score: f64,
    pub total_points: f64,
    pub percentage: i32,
    pub passed: bool,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

impl PublicQuizSubmission {
    pub fn from_request(
        id: i64,
        req: CreatePublicSubmissionRequest,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            id,
            quiz_id: req.quiz_id,
            identification_data: req.identification_data,
            answers: req.answers,
            score: req.score,
            total_points: req.total_points,
            percentage: req.percentage,
            passed: req.passed,
            submitted_at: now,
        }
    }
}
