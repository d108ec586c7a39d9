use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::{PublicPermission, Quiz, QuizQuestion};
use crate::models::questions::entities::Question;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizListResponse {
    pub items: Vec<Quiz>,
}

// 测验中的题目（关联记录 + 题目详情）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizQuestionDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub link: QuizQuestion,
    pub question: Question,
    // 生效分值：关联覆盖分值优先
    pub effective_points: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizQuestionListResponse {
    pub items: Vec<QuizQuestionDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct PublicLinkResponse {
    pub quiz_id: i64,
    pub token: String,
    pub permission: PublicPermission,
    // 客户端访问路径
    pub path: String,
}
