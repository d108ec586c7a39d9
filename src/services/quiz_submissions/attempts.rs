use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{QuizSubmissionService, load_readable_submission, scoring};
use crate::models::common::submission_status::SubmissionStatus;
use crate::models::quiz_submissions::{
    entities::QuizSubmission,
    requests::{
        CreateQuizSubmissionRequest, QuizSubmissionListQuery, SubmitQuizRequest,
        UpdateQuizSubmissionRequest,
    },
    responses::QuizSubmissionListResponse,
};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, ApiResult, can_manage_course, current_user};
use crate::services::quizzes::{load_visible_quiz, questions::ordered_questions};
use crate::storage::Storage;

/// 开始一次作答；已有进行中的作答时直接返回它
pub(crate) async fn begin_attempt(
    storage: &dyn Storage,
    user: &User,
    quiz_id: i64,
) -> ApiResult<(QuizSubmission, bool)> {
    let (quiz, course) = load_visible_quiz(storage, user, quiz_id).await?;
    let manager = can_manage_course(user, &course);
    if !manager && quiz.is_past_due(chrono::Utc::now()) {
        return Err(ApiError::forbidden(
            ErrorCode::QuizNotAvailable,
            "Quiz is past its due date",
        ));
    }

    let previous = storage
        .list_quiz_submissions(QuizSubmissionListQuery {
            quiz_id: Some(quiz_id),
            student_id: Some(user.id),
        })
        .await?;
    if let Some(open) = previous
        .iter()
        .find(|s| s.status == SubmissionStatus::InProgress)
    {
        return Ok((open.clone(), false));
    }
    if previous.len() as i32 >= quiz.max_attempts {
        return Err(ApiError::forbidden(
            ErrorCode::QuizAttemptsExhausted,
            format!("Maximum attempts ({}) reached", quiz.max_attempts),
        ));
    }

    let attempt_number = previous.iter().map(|s| s.attempt_number).max().unwrap_or(0) + 1;
    let created = storage
        .create_quiz_submission(CreateQuizSubmissionRequest {
            quiz_id,
            student_id: user.id,
            answers: None,
            status: Some(SubmissionStatus::InProgress),
            attempt_number: Some(attempt_number),
        })
        .await?;
    Ok((created, true))
}

pub async fn start_attempt(
    service: &QuizSubmissionService,
    quiz_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    let (submission, created) = begin_attempt(storage.as_ref(), &user, quiz_id).await?;
    if created {
        info!(
            "User {} started attempt {} of quiz {}",
            user.id, submission.attempt_number, quiz_id
        );
        Ok(HttpResponse::Created().json(ApiResponse::success(submission, "Attempt started")))
    } else {
        Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "Attempt resumed")))
    }
}

pub async fn list_for_quiz(
    service: &QuizSubmissionService,
    quiz_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    let (_, course) = load_visible_quiz(storage.as_ref(), &user, quiz_id).await?;
    // 学生只能看到自己的作答
    let student_id = (!can_manage_course(&user, &course)).then_some(user.id);

    let mut items = storage
        .list_quiz_submissions(QuizSubmissionListQuery {
            quiz_id: Some(quiz_id),
            student_id,
        })
        .await
        .map_err(ApiError::from)?;
    items.sort_by_key(|s| s.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        QuizSubmissionListResponse { items },
        "Quiz submissions retrieved successfully",
    )))
}

pub async fn get_submission(
    service: &QuizSubmissionService,
    submission_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    let ctx = load_readable_submission(storage.as_ref(), &user, submission_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ctx.submission,
        "Submission retrieved successfully",
    )))
}

/// 交卷：校验作答后一次性写入答案、得分与状态
pub(crate) async fn submit_answers(
    storage: &dyn Storage,
    user: &User,
    submission_id: i64,
    req: SubmitQuizRequest,
) -> ApiResult<QuizSubmission> {
    let ctx = load_readable_submission(storage, user, submission_id).await?;
    if !ctx.is_owner(user) {
        return Err(ApiError::forbidden(
            ErrorCode::Forbidden,
            "Only the student who started this attempt can submit it",
        ));
    }
    if ctx.submission.status != SubmissionStatus::InProgress {
        return Err(ApiError::conflict(
            ErrorCode::SubmissionStatusInvalid,
            "This attempt has already been submitted",
        ));
    }

    let questions = ordered_questions(storage, ctx.quiz.id).await?;
    let outcome = scoring::score_answers(&questions, &req.answers, ctx.quiz.passing_score)?;

    let now = chrono::Utc::now();
    let time_spent = req
        .time_spent
        .unwrap_or_else(|| (now - ctx.submission.started_at).num_seconds().max(0) as i32);

    // 含论述题时得分留空，等待教师评分
    let update = if outcome.needs_manual_grading {
        UpdateQuizSubmissionRequest {
            answers: Some(req.answers),
            total_points: Some(outcome.total_points),
            status: Some(SubmissionStatus::Submitted),
            time_spent: Some(time_spent),
            submitted_at: Some(now),
            ..Default::default()
        }
    } else {
        UpdateQuizSubmissionRequest {
            answers: Some(req.answers),
            score: Some(outcome.score),
            total_points: Some(outcome.total_points),
            percentage: Some(outcome.percentage),
            passed: Some(outcome.passed),
            status: Some(SubmissionStatus::Graded),
            time_spent: Some(time_spent),
            submitted_at: Some(now),
            graded_at: Some(now),
            ..Default::default()
        }
    };

    storage
        .update_quiz_submission(submission_id, update)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::SubmissionNotFound, "Submission not found"))
}

pub async fn submit(
    service: &QuizSubmissionService,
    submission_id: i64,
    submit_request: SubmitQuizRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    let submission = submit_answers(storage.as_ref(), &user, submission_id, submit_request).await?;
    info!(
        "Quiz submission {} submitted with status {}",
        submission.id, submission.status
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "Quiz submitted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::entities::QuestionType;
    use crate::models::quiz_submissions::entities::SubmittedAnswer;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support::*;
    use crate::storage::memory_storage::MemoryStorage;

    #[tokio::test]
    async fn test_objective_attempt_is_graded_on_submit() {
        let storage = MemoryStorage::new();
        let teacher = seed_user(&storage, "teacher", UserRole::Instructor).await;
        let student = seed_user(&storage, "student", UserRole::Student).await;
        let course = seed_course(&storage, &teacher, "Geography").await;
        seed_enrollment(&storage, &course, &student).await;
        let quiz = seed_quiz(&storage, &course, 2).await;
        let q1 = seed_quiz_question(&storage, &quiz, &teacher, QuestionType::TrueFalse, Some("true"), 1).await;
        let q2 = seed_quiz_question(&storage, &quiz, &teacher, QuestionType::ShortAnswer, Some("Nile"), 3).await;

        let (attempt, created) = begin_attempt(&storage, &student, quiz.id).await.unwrap();
        assert!(created);
        assert_eq!(attempt.attempt_number, 1);

        let submitted = submit_answers(
            &storage,
            &student,
            attempt.id,
            SubmitQuizRequest {
                answers: vec![
                    SubmittedAnswer { question_id: q1.id, answer: "false".to_string() },
                    SubmittedAnswer { question_id: q2.id, answer: "nile".to_string() },
                ],
                time_spent: Some(120),
            },
        )
        .await
        .unwrap();
        assert_eq!(submitted.status, SubmissionStatus::Graded);
        assert_eq!(submitted.score, Some(3.0));
        assert_eq!(submitted.total_points, Some(4.0));
        assert_eq!(submitted.percentage, Some(75));
        assert_eq!(submitted.passed, Some(true));
        assert!(submitted.graded_at.is_some());

        // 已交卷的作答不能再次提交
        let err = submit_answers(
            &storage,
            &student,
            attempt.id,
            SubmitQuizRequest { answers: vec![], time_spent: None },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::SubmissionStatusInvalid);
    }

    #[tokio::test]
    async fn test_attempts_are_limited() {
        let storage = MemoryStorage::new();
        let teacher = seed_user(&storage, "teacher", UserRole::Instructor).await;
        let student = seed_user(&storage, "student", UserRole::Student).await;
        let course = seed_course(&storage, &teacher, "History").await;
        seed_enrollment(&storage, &course, &student).await;
        let quiz = seed_quiz(&storage, &course, 1).await;

        let (first, _) = begin_attempt(&storage, &student, quiz.id).await.unwrap();
        // 进行中的作答会被复用
        let (again, created) = begin_attempt(&storage, &student, quiz.id).await.unwrap();
        assert!(!created);
        assert_eq!(again.id, first.id);

        submit_answers(
            &storage,
            &student,
            first.id,
            SubmitQuizRequest { answers: vec![], time_spent: None },
        )
        .await
        .unwrap();

        let err = begin_attempt(&storage, &student, quiz.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::QuizAttemptsExhausted);
    }

    #[tokio::test]
    async fn test_unenrolled_student_cannot_start() {
        let storage = MemoryStorage::new();
        let teacher = seed_user(&storage, "teacher", UserRole::Instructor).await;
        let outsider = seed_user(&storage, "outsider", UserRole::Student).await;
        let course = seed_course(&storage, &teacher, "Chemistry").await;
        let quiz = seed_quiz(&storage, &course, 1).await;

        let err = begin_attempt(&storage, &outsider, quiz.id).await.unwrap_err();
        assert_eq!(err.status, actix_web::http::StatusCode::FORBIDDEN);
    }
}
