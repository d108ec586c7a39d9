use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::requests::{CreateQuizQuestionRequest, CreateQuizRequest, UpdateQuizRequest};
use crate::models::define_string_enum;

define_string_enum! {
    // 测验/作业发布状态
    PublishStatus, "发布状态", "../frontend/src/types/generated/quiz.ts" {
        Draft => "draft",
        Published => "published",
        Archived => "archived",
    }
}

define_string_enum! {
    // 公开链接权限
    PublicPermission, "公开链接权限", "../frontend/src/types/generated/quiz.ts" {
        View => "view",
        Attempt => "attempt",
    }
}

pub const DEFAULT_PASSING_SCORE: i32 = 60;

fn default_required_fields() -> Vec<String> {
    vec!["name".to_string(), "email".to_string()]
}

// 测验实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct Quiz {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    // 时间限制（分钟）
    pub time_limit: Option<i32>,
    pub passing_score: i32,
    pub randomize_questions: bool,
    pub randomize_options: bool,
    pub show_results: bool,
    pub proctored: bool,
    pub status: PublishStatus,
    pub max_attempts: i32,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub public_token: Option<String>,
    pub public_permission: Option<PublicPermission>,
    pub public_enabled: bool,
    pub public_required_fields: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Quiz {
    /// 新测验的默认值：打乱题目/选项、显示结果均开启，不监考，草稿状态，及格线 60
    pub fn from_request(
        id: i64,
        req: CreateQuizRequest,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            id,
            course_id: req.course_id,
            title: req.title,
            description: req.description,
            time_limit: req.time_limit,
            passing_score: req.passing_score.unwrap_or(DEFAULT_PASSING_SCORE),
            randomize_questions: req.randomize_questions.unwrap_or(true),
            randomize_options: req.randomize_options.unwrap_or(true),
            show_results: req.show_results.unwrap_or(true),
            proctored: req.proctored.unwrap_or(false),
            status: req.status.unwrap_or(PublishStatus::Draft),
            max_attempts: req.max_attempts.unwrap_or(1),
            due_date: req.due_date,
            public_token: None,
            public_permission: None,
            public_enabled: false,
            public_required_fields: req
                .public_required_fields
                .unwrap_or_else(default_required_fields),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateQuizRequest, now: chrono::DateTime<chrono::Utc>) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(time_limit) = update.time_limit {
            self.time_limit = Some(time_limit);
        }
        if let Some(passing_score) = update.passing_score {
            self.passing_score = passing_score;
        }
        if let Some(v) = update.randomize_questions {
            self.randomize_questions = v;
        }
        if let Some(v) = update.randomize_options {
            self.randomize_options = v;
        }
        if let Some(v) = update.show_results {
            self.show_results = v;
        }
        if let Some(v) = update.proctored {
            self.proctored = v;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(max_attempts) = update.max_attempts {
            self.max_attempts = max_attempts;
        }
        if let Some(due_date) = update.due_date {
            self.due_date = Some(due_date);
        }
        if let Some(fields) = update.public_required_fields {
            self.public_required_fields = fields;
        }
        self.updated_at = now;
    }

    /// 覆盖公开访问设置；重新生成令牌会使旧令牌失效
    pub fn apply_public_access(
        &mut self,
        access: PublicAccess,
        now: chrono::DateTime<chrono::Utc>,
    ) {
        match access {
            PublicAccess::Enable {
                token,
                permission,
                required_fields,
            } => {
                self.public_token = Some(token);
                self.public_permission = Some(permission);
                self.public_enabled = true;
                if let Some(fields) = required_fields {
                    self.public_required_fields = fields;
                }
            }
            PublicAccess::Disable => {
                self.public_enabled = false;
            }
        }
        self.updated_at = now;
    }

    /// 当前有效的公开权限（未启用或缺少令牌时为 None）
    pub fn active_public_permission(&self) -> Option<PublicPermission> {
        if self.public_enabled && self.public_token.is_some() {
            self.public_permission
        } else {
            None
        }
    }

    /// 非管理者看到的测验不含公开链接信息
    pub fn without_public_access(mut self) -> Self {
        self.public_token = None;
        self.public_permission = None;
        self.public_enabled = false;
        self.public_required_fields = Vec::new();
        self
    }

    pub fn is_past_due(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.due_date.is_some_and(|due| now > due)
    }
}

/// 公开访问设置变更
#[derive(Debug, Clone, PartialEq)]
pub enum PublicAccess {
    Enable {
        token: String,
        permission: PublicPermission,
        // None 时保留原有的必填字段
        required_fields: Option<Vec<String>>,
    },
    Disable,
}

// 测验-题目关联，order_index 在同一测验内唯一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizQuestion {
    pub id: i64,
    pub quiz_id: i64,
    pub question_id: i64,
    pub order_index: i32,
    // 覆盖题目自身分值
    pub points: Option<i32>,
}

impl QuizQuestion {
    pub fn from_request(id: i64, quiz_id: i64, req: CreateQuizQuestionRequest, order_index: i32) -> Self {
        Self {
            id,
            quiz_id,
            question_id: req.question_id,
            order_index,
            points: req.points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_request() -> CreateQuizRequest {
        serde_json::from_str(r#"{"courseId": 3, "title": "Week 1"}"#).unwrap()
    }

    #[test]
    fn test_quiz_defaults() {
        let quiz = Quiz::from_request(1, minimal_request(), chrono::Utc::now());
        assert!(quiz.randomize_questions);
        assert!(quiz.randomize_options);
        assert!(quiz.show_results);
        assert!(!quiz.proctored);
        assert_eq!(quiz.status, PublishStatus::Draft);
        assert_eq!(quiz.passing_score, 60);
        assert_eq!(quiz.max_attempts, 1);
        assert!(!quiz.public_enabled);
        assert_eq!(quiz.public_required_fields, vec!["name", "email"]);
    }

    #[test]
    fn test_defaults_are_deterministic() {
        let now = chrono::Utc::now();
        let a = Quiz::from_request(1, minimal_request(), now);
        let b = Quiz::from_request(1, minimal_request(), now);
        assert_eq!(a, b);
    }

    #[test]
    fn test_public_access_lifecycle() {
        let now = chrono::Utc::now();
        let mut quiz = Quiz::from_request(1, minimal_request(), now);
        assert_eq!(quiz.active_public_permission(), None);

        quiz.apply_public_access(
            PublicAccess::Enable {
                token: "abc".to_string(),
                permission: PublicPermission::Attempt,
                required_fields: None,
            },
            now,
        );
        assert_eq!(quiz.active_public_permission(), Some(PublicPermission::Attempt));

        quiz.apply_public_access(PublicAccess::Disable, now);
        assert_eq!(quiz.active_public_permission(), None);
        assert_eq!(quiz.public_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_enable_writes_required_fields_with_token() {
        let now = chrono::Utc::now();
        let mut quiz = Quiz::from_request(1, minimal_request(), now);
        quiz.apply_public_access(
            PublicAccess::Enable {
                token: "abc".to_string(),
                permission: PublicPermission::View,
                required_fields: Some(vec!["studentId".to_string()]),
            },
            now,
        );
        assert_eq!(quiz.public_required_fields, vec!["studentId"]);

        quiz.apply_public_access(
            PublicAccess::Enable {
                token: "def".to_string(),
                permission: PublicPermission::Attempt,
                required_fields: None,
            },
            now,
        );
        assert_eq!(quiz.public_token.as_deref(), Some("def"));
        assert_eq!(quiz.public_required_fields, vec!["studentId"]);
    }

    #[test]
    fn test_without_public_access_hides_link() {
        let now = chrono::Utc::now();
        let mut quiz = Quiz::from_request(1, minimal_request(), now);
        quiz.apply_public_access(
            PublicAccess::Enable {
                token: "abc".to_string(),
                permission: PublicPermission::View,
                required_fields: None,
            },
            now,
        );
        let hidden = quiz.without_public_access();
        assert_eq!(hidden.public_token, None);
        assert_eq!(hidden.public_permission, None);
        assert!(!hidden.public_enabled);
        assert!(hidden.public_required_fields.is_empty());
    }

    #[test]
    fn test_nullable_fields_serialize_as_null() {
        let quiz = Quiz::from_request(1, minimal_request(), chrono::Utc::now());
        let json = serde_json::to_value(&quiz).unwrap();
        assert!(json["timeLimit"].is_null());
        assert!(json["publicToken"].is_null());
        assert_eq!(json["status"], "draft");
    }
}
