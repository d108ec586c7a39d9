use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{QuizSubmissionService, load_submission, scoring};
use crate::models::common::submission_status::SubmissionStatus;
use crate::models::quiz_submissions::{
    entities::QuizSubmission,
    requests::{GradeQuizSubmissionRequest, UpdateQuizSubmissionRequest},
};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, ApiResult, current_user};
use crate::services::quizzes::questions::{effective_points, ordered_questions};
use crate::storage::Storage;

/// 人工评分：一次更新覆盖得分、反馈、百分比、是否通过与状态
pub(crate) async fn grade_submission(
    storage: &dyn Storage,
    user: &User,
    submission_id: i64,
    req: GradeQuizSubmissionRequest,
) -> ApiResult<QuizSubmission> {
    let ctx = load_submission(storage, submission_id).await?;
    if !ctx.is_manager(user) {
        return Err(ApiError::forbidden(
            ErrorCode::CoursePermissionDenied,
            "You do not have permission to grade this submission",
        ));
    }
    if ctx.submission.status == SubmissionStatus::InProgress {
        return Err(ApiError::conflict(
            ErrorCode::SubmissionStatusInvalid,
            "Cannot grade an attempt that has not been submitted",
        ));
    }

    let total_points = match ctx.submission.total_points {
        Some(total) => total,
        None => ordered_questions(storage, ctx.quiz.id)
            .await?
            .iter()
            .map(|(link, question)| f64::from(effective_points(link, question)))
            .sum(),
    };
    if !req.score.is_finite() || req.score < 0.0 || req.score > total_points {
        return Err(ApiError::bad_request(
            ErrorCode::GradeInvalid,
            format!("Score must be between 0 and {total_points}"),
        ));
    }

    let percentage = scoring::percentage(req.score, total_points);
    let update = UpdateQuizSubmissionRequest {
        score: Some(req.score),
        total_points: Some(total_points),
        percentage: Some(percentage),
        passed: Some(percentage >= ctx.quiz.passing_score),
        feedback: req.feedback,
        status: Some(SubmissionStatus::Graded),
        graded_at: Some(chrono::Utc::now()),
        ..Default::default()
    };

    storage
        .update_quiz_submission(submission_id, update)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::SubmissionNotFound, "Submission not found"))
}

pub async fn grade(
    service: &QuizSubmissionService,
    submission_id: i64,
    grade_request: GradeQuizSubmissionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    let submission = grade_submission(storage.as_ref(), &user, submission_id, grade_request).await?;
    info!(
        "Quiz submission {} graded by user {} ({}%)",
        submission.id,
        user.id,
        submission.percentage.unwrap_or_default()
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "Submission graded successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::entities::QuestionType;
    use crate::models::quiz_submissions::{entities::SubmittedAnswer, requests::SubmitQuizRequest};
    use crate::models::users::entities::UserRole;
    use crate::services::quiz_submissions::attempts::{begin_attempt, submit_answers};
    use crate::services::test_support::*;
    use crate::storage::memory_storage::MemoryStorage;

    #[tokio::test]
    async fn test_essay_attempt_waits_for_manual_grade() {
        let storage = MemoryStorage::new();
        let teacher = seed_user(&storage, "teacher", UserRole::Instructor).await;
        let student = seed_user(&storage, "student", UserRole::Student).await;
        let course = seed_course(&storage, &teacher, "Literature").await;
        seed_enrollment(&storage, &course, &student).await;
        let quiz = seed_quiz(&storage, &course, 1).await;
        let essay = seed_quiz_question(&storage, &quiz, &teacher, QuestionType::Essay, None, 10).await;

        let (attempt, _) = begin_attempt(&storage, &student, quiz.id).await.unwrap();
        let submitted = submit_answers(
            &storage,
            &student,
            attempt.id,
            SubmitQuizRequest {
                answers: vec![SubmittedAnswer {
                    question_id: essay.id,
                    answer: "A long essay".to_string(),
                }],
                time_spent: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(submitted.status, SubmissionStatus::Submitted);
        assert_eq!(submitted.score, None);
        assert_eq!(submitted.total_points, Some(10.0));

        // 学生不能给自己评分
        let err = grade_submission(
            &storage,
            &student,
            attempt.id,
            GradeQuizSubmissionRequest { score: 10.0, feedback: None },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::CoursePermissionDenied);

        let err = grade_submission(
            &storage,
            &teacher,
            attempt.id,
            GradeQuizSubmissionRequest { score: 11.0, feedback: None },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::GradeInvalid);

        let graded = grade_submission(
            &storage,
            &teacher,
            attempt.id,
            GradeQuizSubmissionRequest {
                score: 5.0,
                feedback: Some("Needs structure".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(graded.status, SubmissionStatus::Graded);
        assert_eq!(graded.percentage, Some(50));
        assert_eq!(graded.passed, Some(false));
        assert_eq!(graded.feedback.as_deref(), Some("Needs structure"));
    }
}
