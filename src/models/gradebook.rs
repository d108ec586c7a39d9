use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::SubmissionStatus;

// 学生在某个测验上的成绩（取最近一次提交）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/gradebook.ts")]
pub struct QuizGrade {
    pub quiz_id: i64,
    pub score: Option<f64>,
    pub percentage: Option<i32>,
    pub status: Option<SubmissionStatus>,
}

// 学生在某个作业上的成绩（取最近一次提交）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/gradebook.ts")]
pub struct AssignmentGrade {
    pub assignment_id: i64,
    pub score: Option<f64>,
    pub percentage: Option<i32>,
    pub status: Option<SubmissionStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/gradebook.ts")]
pub struct GradebookStudentRow {
    pub student_id: i64,
    pub student_name: String,
    pub student_email: String,
    pub quiz_grades: Vec<QuizGrade>,
    pub assignment_grades: Vec<AssignmentGrade>,
    pub overall_average: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/gradebook.ts")]
pub struct GradebookColumn {
    pub id: i64,
    pub title: String,
}

// 单个测评的汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/gradebook.ts")]
pub struct AssessmentSummary {
    pub id: i64,
    pub title: String,
    pub submission_count: i64,
    pub average_percentage: Option<i32>,
    pub best_percentage: Option<i32>,
    pub worst_percentage: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/gradebook.ts")]
pub struct Gradebook {
    pub course_id: i64,
    pub course_title: String,
    pub quizzes: Vec<GradebookColumn>,
    pub assignments: Vec<GradebookColumn>,
    pub students: Vec<GradebookStudentRow>,
    pub quiz_summaries: Vec<AssessmentSummary>,
    pub assignment_summaries: Vec<AssessmentSummary>,
}
