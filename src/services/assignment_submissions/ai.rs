use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::grade::{GradeWrite, write_grade};
use super::{AssignmentSubmissionService, load_gradable_submission};
use crate::ai::{AiClient, features, resolve_credentials};
use crate::config::AppConfig;
use crate::models::ai::responses::AiDetectionResponse;
use crate::models::assignment_submissions::{
    entities::AssignmentSubmission, requests::UpdateAssignmentSubmissionRequest,
};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, ApiResult, current_user};
use crate::storage::Storage;

/// AI 评分：模型结果通过校验后才写入，失败时不留下任何评分字段
pub(crate) async fn grade_with_ai(
    storage: &dyn Storage,
    ai_client: &dyn AiClient,
    user: &User,
    submission_id: i64,
) -> ApiResult<AssignmentSubmission> {
    let ctx = load_gradable_submission(storage, user, submission_id).await?;
    if !ctx.assignment.ai_grading_enabled {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "AI grading is disabled for this assignment",
        ));
    }

    let credentials = resolve_credentials(user, &AppConfig::get().ai)?;
    let grade =
        features::grade_submission(ai_client, &credentials, &ctx.assignment, &ctx.submission)
            .await?;

    write_grade(
        storage,
        &ctx,
        GradeWrite {
            score: grade.score,
            feedback: Some(grade.feedback),
            rubric_scores: grade.rubric_scores,
            ai_graded: true,
        },
    )
    .await
}

pub(crate) async fn detect_with_ai(
    storage: &dyn Storage,
    ai_client: &dyn AiClient,
    user: &User,
    submission_id: i64,
) -> ApiResult<AiDetectionResponse> {
    let ctx = load_gradable_submission(storage, user, submission_id).await?;
    let text = ctx.submission.content.as_deref().unwrap_or_default();

    let credentials = resolve_credentials(user, &AppConfig::get().ai)?;
    let detection = features::detect_ai_content(ai_client, &credentials, text).await?;

    storage
        .update_assignment_submission(
            submission_id,
            UpdateAssignmentSubmissionRequest {
                ai_detection_score: Some(detection.score),
                ..Default::default()
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::SubmissionNotFound, "Submission not found"))?;

    Ok(AiDetectionResponse {
        submission_id,
        ai_detection_score: detection.score,
        reasoning: detection.reasoning,
    })
}

pub async fn ai_grade(
    service: &AssignmentSubmissionService,
    submission_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let ai_client = service.get_ai_client(request)?;
    let user = current_user(request)?;

    let submission =
        grade_with_ai(storage.as_ref(), ai_client.as_ref(), &user, submission_id).await?;
    info!(
        "Assignment submission {} graded by AI ({} via user {})",
        submission.id, user.active_ai_provider, user.id
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        submission,
        "Submission graded by AI",
    )))
}

pub async fn ai_detect(
    service: &AssignmentSubmissionService,
    submission_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let ai_client = service.get_ai_client(request)?;
    let user = current_user(request)?;

    let detection =
        detect_with_ai(storage.as_ref(), ai_client.as_ref(), &user, submission_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        detection,
        "AI detection completed",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AiPrompt, ProviderCredentials};
    use crate::errors::Result;
    use crate::models::ai::entities::AiProvider;
    use crate::models::assignment_submissions::requests::SubmitAssignmentRequest;
    use crate::models::assignments::requests::UpdateAssignmentRequest;
    use crate::models::common::submission_status::SubmissionStatus;
    use crate::models::users::{entities::UserRole, requests::UpdateAiSettingsRequest};
    use crate::services::assignment_submissions::submit::submit_work;
    use crate::services::test_support::*;
    use crate::storage::memory_storage::MemoryStorage;

    struct ScriptedClient(&'static str);

    #[async_trait::async_trait]
    impl AiClient for ScriptedClient {
        async fn complete(&self, _: &ProviderCredentials, _: &AiPrompt) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    async fn setup(storage: &MemoryStorage, ai_enabled: bool) -> (User, i64) {
        let teacher = seed_user(storage, "teacher", UserRole::Instructor).await;
        let mut keys = std::collections::BTreeMap::new();
        keys.insert(AiProvider::OpenAi, "sk-test".to_string());
        let teacher = storage
            .update_user_ai_settings(
                teacher.id,
                UpdateAiSettingsRequest {
                    active_provider: None,
                    api_keys: Some(keys),
                },
            )
            .await
            .unwrap()
            .unwrap();
        let student = seed_user(storage, "student", UserRole::Student).await;
        let course = seed_course(storage, &teacher, "Writing").await;
        seed_enrollment(storage, &course, &student).await;
        let assignment = seed_assignment(storage, &course, 10.0).await;
        storage
            .update_assignment(
                assignment.id,
                UpdateAssignmentRequest {
                    ai_grading_enabled: Some(ai_enabled),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let (submission, _) = submit_work(
            storage,
            &student,
            assignment.id,
            SubmitAssignmentRequest {
                content: Some("Rivers carve valleys over time.".to_string()),
                file_urls: vec![],
            },
        )
        .await
        .unwrap();
        (teacher, submission.id)
    }

    #[tokio::test]
    async fn test_ai_grade_written_in_one_update() {
        let storage = MemoryStorage::new();
        let (teacher, submission_id) = setup(&storage, true).await;
        let client = ScriptedClient(r#"{"score": 8, "feedback": "Solid"}"#);

        let graded = grade_with_ai(&storage, &client, &teacher, submission_id)
            .await
            .unwrap();
        assert_eq!(graded.status, SubmissionStatus::Graded);
        assert_eq!(graded.score, Some(8.0));
        assert_eq!(graded.feedback.as_deref(), Some("Solid"));
        assert!(graded.ai_graded);
    }

    #[tokio::test]
    async fn test_out_of_range_ai_grade_writes_nothing() {
        let storage = MemoryStorage::new();
        let (teacher, submission_id) = setup(&storage, true).await;
        let client = ScriptedClient(r#"{"score": 42, "feedback": "Too generous"}"#);

        let err = grade_with_ai(&storage, &client, &teacher, submission_id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AiRequestFailed);
        let stored = storage
            .get_assignment_submission_by_id(submission_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.score, None);
        assert_eq!(stored.status, SubmissionStatus::Submitted);
        assert!(!stored.ai_graded);
    }

    #[tokio::test]
    async fn test_ai_grading_can_be_disabled() {
        let storage = MemoryStorage::new();
        let (teacher, submission_id) = setup(&storage, false).await;
        let client = ScriptedClient(r#"{"score": 8, "feedback": "Solid"}"#);

        let err = grade_with_ai(&storage, &client, &teacher, submission_id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_detection_score_is_stored() {
        let storage = MemoryStorage::new();
        let (teacher, submission_id) = setup(&storage, true).await;
        let client = ScriptedClient(r#"{"score": 87.6, "reasoning": "Uniform tone"}"#);

        let detection = detect_with_ai(&storage, &client, &teacher, submission_id)
            .await
            .unwrap();
        assert_eq!(detection.ai_detection_score, 88);
        let stored = storage
            .get_assignment_submission_by_id(submission_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.ai_detection_score, Some(88));
    }
}
