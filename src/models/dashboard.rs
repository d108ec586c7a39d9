use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 教师仪表盘统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DashboardStats {
    pub total_courses: i64,
    pub total_quizzes: i64,
    pub total_assignments: i64,
    // 各课程选课人数之和（同一学生选多门课会重复计数）
    pub total_students: i64,
    pub pending_grading: i64,
    // 最近 7 天内的提交
    pub recent_submissions: i64,
}

// 管理员可指定查看某位教师的统计
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DashboardQuery {
    pub instructor_id: Option<i64>,
}
