//! 公开测验链接（无需登录）
//!
//! 令牌未知或已停用时一律返回 404；view 权限只能查看题目与答案，
//! attempt 权限可以提交作答并获得分数。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use super::common::{ApiError, ApiResult, app_storage};
use crate::models::public_quiz::{
    requests::{CreatePublicSubmissionRequest, PublicQuizSubmitRequest},
    responses::{PublicQuestion, PublicQuizResult, PublicQuizView},
};
use crate::models::quizzes::entities::{PublicPermission, Quiz};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::quiz_submissions::scoring;
use crate::services::quizzes::questions::{effective_points, ordered_questions};
use crate::storage::Storage;

pub struct PublicQuizService {
    storage: Option<Arc<dyn Storage>>,
}

impl PublicQuizService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ApiResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_storage(request),
        }
    }

    pub async fn view(&self, token: &str, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let view = public_view(storage.as_ref(), token).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(view, "Quiz retrieved successfully")))
    }

    pub async fn submit(
        &self,
        token: &str,
        submit_request: PublicQuizSubmitRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let result = public_submit(storage.as_ref(), token, submit_request).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(result, "Quiz submitted successfully")))
    }
}

/// 按令牌解析测验，未启用视为不存在
async fn resolve_token(storage: &dyn Storage, token: &str) -> ApiResult<(Quiz, PublicPermission)> {
    let not_found = || ApiError::not_found(ErrorCode::PublicLinkNotFound, "Public quiz not found");
    let token = token.trim();
    if token.is_empty() {
        return Err(not_found());
    }
    let quiz = storage
        .get_quiz_by_public_token(token)
        .await?
        .ok_or_else(not_found)?;
    let permission = quiz.active_public_permission().ok_or_else(not_found)?;
    Ok((quiz, permission))
}

pub(crate) async fn public_view(storage: &dyn Storage, token: &str) -> ApiResult<PublicQuizView> {
    let (quiz, permission) = resolve_token(storage, token).await?;
    let reveal = permission == PublicPermission::View;

    let questions = ordered_questions(storage, quiz.id)
        .await?
        .into_iter()
        .map(|(link, question)| PublicQuestion {
            id: question.id,
            points: effective_points(&link, &question),
            question_type: question.question_type,
            question_text: question.question_text,
            options: question.options,
            correct_answer: if reveal { question.correct_answer } else { None },
            explanation: if reveal { question.explanation } else { None },
        })
        .collect();

    Ok(PublicQuizView {
        quiz_id: quiz.id,
        title: quiz.title,
        description: quiz.description,
        time_limit: quiz.time_limit,
        passing_score: quiz.passing_score,
        permission,
        required_fields: quiz.public_required_fields,
        questions,
    })
}

/// 必填身份字段缺失或为空时返回校验错误；返回去除首尾空白后的数据
fn check_identification(
    required: &[String],
    data: BTreeMap<String, String>,
) -> ApiResult<BTreeMap<String, String>> {
    let data: BTreeMap<String, String> = data
        .into_iter()
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();
    let missing: Vec<&str> = required
        .iter()
        .map(String::as_str)
        .filter(|field| data.get(*field).is_none_or(|v| v.is_empty()))
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            format!("Missing required fields: {}", missing.join(", ")),
        ));
    }
    Ok(data)
}

pub(crate) async fn public_submit(
    storage: &dyn Storage,
    token: &str,
    req: PublicQuizSubmitRequest,
) -> ApiResult<PublicQuizResult> {
    let (quiz, permission) = resolve_token(storage, token).await?;
    if permission != PublicPermission::Attempt {
        return Err(ApiError::forbidden(
            ErrorCode::PublicLinkViewOnly,
            "This link only allows viewing the quiz",
        ));
    }

    let identification_data = check_identification(&quiz.public_required_fields, req.identification_data)?;
    let questions = ordered_questions(storage, quiz.id).await?;
    let outcome = scoring::score_answers(&questions, &req.answers, quiz.passing_score)?;

    let stored = storage
        .create_public_submission(CreatePublicSubmissionRequest {
            quiz_id: quiz.id,
            identification_data,
            answers: req.answers,
            score: outcome.score,
            total_points: outcome.total_points,
            percentage: outcome.percentage,
            passed: outcome.passed,
        })
        .await?;
    info!(
        "Public submission {} for quiz {} ({}%)",
        stored.id, quiz.id, stored.percentage
    );

    Ok(PublicQuizResult {
        score: stored.score,
        total_points: stored.total_points,
        percentage: stored.percentage,
        passed: stored.passed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::entities::QuestionType;
    use crate::models::quiz_submissions::entities::SubmittedAnswer;
    use crate::models::quizzes::entities::PublicAccess;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support::*;
    use crate::storage::memory_storage::MemoryStorage;

    fn identity(name: &str, email: &str) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("name".to_string(), name.to_string()),
            ("email".to_string(), email.to_string()),
        ])
    }

    #[test]
    fn test_check_identification() {
        let required = vec!["name".to_string(), "email".to_string()];
        assert!(check_identification(&required, identity("Ana", "ana@x.io")).is_ok());

        let err = check_identification(&required, identity("Ana", "  ")).unwrap_err();
        assert!(err.message.contains("email"));
        assert!(check_identification(&[], BTreeMap::new()).is_ok());
    }

    #[tokio::test]
    async fn test_public_flow() {
        let storage = MemoryStorage::new();
        let teacher = seed_user(&storage, "teacher", UserRole::Instructor).await;
        let course = seed_course(&storage, &teacher, "Open Day").await;
        let quiz = seed_quiz(&storage, &course, 1).await;
        let q = seed_quiz_question(&storage, &quiz, &teacher, QuestionType::TrueFalse, Some("true"), 2).await;

        // 未启用时令牌不可用
        assert_eq!(
            public_view(&storage, "missing").await.unwrap_err().code,
            ErrorCode::PublicLinkNotFound
        );

        storage
            .set_quiz_public_access(
                quiz.id,
                PublicAccess::Enable {
                    token: "view-token".to_string(),
                    permission: PublicPermission::View,
                    required_fields: None,
                },
            )
            .await
            .unwrap();
        let view = public_view(&storage, "view-token").await.unwrap();
        assert_eq!(view.questions[0].correct_answer.as_deref(), Some("true"));
        let answers = vec![SubmittedAnswer {
            question_id: q.id,
            answer: "true".to_string(),
        }];
        let err = public_submit(
            &storage,
            "view-token",
            PublicQuizSubmitRequest {
                identification_data: identity("Ana", "ana@x.io"),
                answers: answers.clone(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::PublicLinkViewOnly);

        // 重新生成后旧令牌失效
        storage
            .set_quiz_public_access(
                quiz.id,
                PublicAccess::Enable {
                    token: "attempt-token".to_string(),
                    permission: PublicPermission::Attempt,
                    required_fields: None,
                },
            )
            .await
            .unwrap();
        assert!(public_view(&storage, "view-token").await.is_err());
        let view = public_view(&storage, "attempt-token").await.unwrap();
        assert!(view.questions[0].correct_answer.is_none());

        let result = public_submit(
            &storage,
            "attempt-token",
            PublicQuizSubmitRequest {
                identification_data: identity("Ana", "ana@x.io"),
                answers,
            },
        )
        .await
        .unwrap();
        assert_eq!(result.percentage, 100);
        assert!(result.passed);
        assert_eq!(storage.list_public_submissions(Some(quiz.id)).await.unwrap().len(), 1);

        storage
            .set_quiz_public_access(quiz.id, PublicAccess::Disable)
            .await
            .unwrap();
        assert!(public_view(&storage, "attempt-token").await.is_err());
    }
}
