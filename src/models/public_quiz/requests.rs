use std::collections::BTreeMap;

use serde::Deserialize;
use ts_rs::TS;

use crate::models::quiz_submissions::entities::SubmittedAnswer;

// 公开链接提交载荷
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/public_quiz.ts")]
pub struct PublicQuizSubmitRequest {
    #[serde(default)]
    pub identification_data: BTreeMap<String, String>,
    #[serde(default)]
    pub answers: Vec<SubmittedAnswer>,
}

// 存储层创建载荷，得分已由服务层计算
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/public_quiz.ts")]
pub struct CreatePublicSubmissionRequest {
    pub quiz_id: i64,
    pub identification_data: BTreeMap<String, String>,
    pub answers: Vec<SubmittedAnswer>,
    pub score: f64,
    pub total_points: f64,
    pub percentage: i32,
    pub passed: bool,
}
