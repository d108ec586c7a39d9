use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentSubmissionService, SubmissionContext, load_gradable_submission};
use crate::models::assignment_submissions::{
    entities::{AssignmentSubmission, RubricScore},
    requests::{GradeAssignmentRequest, UpdateAssignmentSubmissionRequest},
};
use crate::models::common::submission_status::SubmissionStatus;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, ApiResult, current_user};
use crate::storage::Storage;

/// 一次评分的全部字段
pub(crate) struct GradeWrite {
    pub score: f64,
    pub feedback: Option<String>,
    pub rubric_scores: Option<Vec<RubricScore>>,
    pub ai_graded: bool,
}

/// 评分字段在同一次更新中写入，状态置为 graded
pub(crate) async fn write_grade(
    storage: &dyn Storage,
    ctx: &SubmissionContext,
    grade: GradeWrite,
) -> ApiResult<AssignmentSubmission> {
    if ctx.submission.status == SubmissionStatus::InProgress {
        return Err(ApiError::conflict(
            ErrorCode::SubmissionStatusInvalid,
            "Cannot grade a submission that has not been submitted",
        ));
    }

    let update = UpdateAssignmentSubmissionRequest {
        score: Some(grade.score),
        feedback: grade.feedback,
        rubric_scores: grade.rubric_scores,
        status: Some(SubmissionStatus::Graded),
        ai_graded: Some(grade.ai_graded),
        graded_at: Some(chrono::Utc::now()),
        ..Default::default()
    };
    storage
        .update_assignment_submission(ctx.submission.id, update)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::SubmissionNotFound, "Submission not found"))
}

pub(crate) async fn grade_manually(
    storage: &dyn Storage,
    user: &User,
    submission_id: i64,
    req: GradeAssignmentRequest,
) -> ApiResult<AssignmentSubmission> {
    let ctx = load_gradable_submission(storage, user, submission_id).await?;
    ctx.assignment
        .validate_grade(req.score, req.rubric_scores.as_deref())
        .map_err(|e| ApiError::bad_request(ErrorCode::GradeInvalid, e.message()))?;

    write_grade(
        storage,
        &ctx,
        GradeWrite {
            score: req.score,
            feedback: req.feedback,
            rubric_scores: req.rubric_scores,
            ai_graded: false,
        },
    )
    .await
}

pub async fn grade(
    service: &AssignmentSubmissionService,
    submission_id: i64,
    grade_request: GradeAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    let submission = grade_manually(storage.as_ref(), &user, submission_id, grade_request).await?;
    info!(
        "Assignment submission {} graded by user {}",
        submission.id, user.id
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        submission,
        "Submission graded successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignment_submissions::requests::SubmitAssignmentRequest;
    use crate::models::assignments::{entities::RubricCriterion, requests::UpdateAssignmentRequest};
    use crate::models::users::entities::UserRole;
    use crate::services::assignment_submissions::submit::submit_work;
    use crate::services::test_support::*;
    use crate::storage::memory_storage::MemoryStorage;

    #[tokio::test]
    async fn test_manual_grade_checks_rubric_and_writes_once() {
        let storage = MemoryStorage::new();
        let teacher = seed_user(&storage, "teacher", UserRole::Instructor).await;
        let student = seed_user(&storage, "student", UserRole::Student).await;
        let course = seed_course(&storage, &teacher, "Writing").await;
        seed_enrollment(&storage, &course, &student).await;
        let assignment = seed_assignment(&storage, &course, 20.0).await;
        storage
            .update_assignment(
                assignment.id,
                UpdateAssignmentRequest {
                    rubric: Some(vec![RubricCriterion {
                        criterion: "Clarity".to_string(),
                        max_points: 10.0,
                        description: None,
                    }]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let (submission, _) = submit_work(
            &storage,
            &student,
            assignment.id,
            SubmitAssignmentRequest {
                content: Some("Rivers flow".to_string()),
                file_urls: vec![],
            },
        )
        .await
        .unwrap();

        let bad = GradeAssignmentRequest {
            score: 15.0,
            feedback: Some("ok".to_string()),
            rubric_scores: Some(vec![RubricScore {
                criterion: "Style".to_string(),
                score: 5.0,
                feedback: None,
            }]),
        };
        let err = grade_manually(&storage, &teacher, submission.id, bad)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::GradeInvalid);
        let untouched = storage
            .get_assignment_submission_by_id(submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(untouched.score, None);
        assert_eq!(untouched.feedback, None);

        let good = GradeAssignmentRequest {
            score: 15.0,
            feedback: Some("Clear argument".to_string()),
            rubric_scores: Some(vec![RubricScore {
                criterion: "clarity".to_string(),
                score: 8.0,
                feedback: None,
            }]),
        };
        let graded = grade_manually(&storage, &teacher, submission.id, good)
            .await
            .unwrap();
        assert_eq!(graded.status, SubmissionStatus::Graded);
        assert_eq!(graded.score, Some(15.0));
        assert!(!graded.ai_graded);
        assert!(graded.graded_at.is_some());

        let regrade = GradeAssignmentRequest {
            score: 18.0,
            feedback: None,
            rubric_scores: None,
        };
        let regraded = grade_manually(&storage, &teacher, submission.id, regrade)
            .await
            .unwrap();
        assert_eq!(regraded.score, Some(18.0));
        assert_eq!(regraded.feedback, None);
        assert_eq!(regraded.rubric_scores, None);
    }

    #[tokio::test]
    async fn test_student_cannot_grade() {
        let storage = MemoryStorage::new();
        let teacher = seed_user(&storage, "teacher", UserRole::Instructor).await;
        let student = seed_user(&storage, "student", UserRole::Student).await;
        let course = seed_course(&storage, &teacher, "Writing").await;
        seed_enrollment(&storage, &course, &student).await;
        let assignment = seed_assignment(&storage, &course, 20.0).await;
        let (submission, _) = submit_work(
            &storage,
            &student,
            assignment.id,
            SubmitAssignmentRequest {
                content: Some("Rivers flow".to_string()),
                file_urls: vec![],
            },
        )
        .await
        .unwrap();

        let err = grade_manually(
            &storage,
            &student,
            submission.id,
            GradeAssignmentRequest {
                score: 20.0,
                feedback: None,
                rubric_scores: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::CoursePermissionDenied);
    }
}
