use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{QuizService, load_managed_quiz, load_visible_quiz};
use crate::models::quizzes::{
    entities::PublishStatus,
    requests::{CreateQuizRequest, QuizListQuery, UpdateQuizRequest},
    responses::QuizListResponse,
};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{
    ApiError, ApiResult, can_manage_course, current_user, load_managed_course,
    load_visible_course,
};

fn check_settings(
    title: Option<&str>,
    passing_score: Option<i32>,
    max_attempts: Option<i32>,
    time_limit: Option<i32>,
) -> ApiResult<()> {
    if title.is_some_and(|t| t.trim().is_empty()) {
        return Err(ApiError::bad_request(ErrorCode::ValidationFailed, "Quiz title is required"));
    }
    if passing_score.is_some_and(|s| !(0..=100).contains(&s)) {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "Passing score must be between 0 and 100",
        ));
    }
    if max_attempts.is_some_and(|n| n < 1) {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "Max attempts must be at least 1",
        ));
    }
    if time_limit.is_some_and(|m| m <= 0) {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "Time limit must be positive",
        ));
    }
    Ok(())
}

pub async fn list_quizzes(
    service: &QuizService,
    query: QuizListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    let manager = match query.course_id {
        Some(course_id) => {
            let course = load_visible_course(storage.as_ref(), &user, course_id).await?;
            can_manage_course(&user, &course)
        }
        None if user.role == UserRole::Admin => true,
        None => {
            return Err(ApiError::bad_request(ErrorCode::BadRequest, "courseId is required").into());
        }
    };

    let mut items = storage.list_quizzes(query).await.map_err(ApiError::from)?;
    if !manager {
        items = items
            .into_iter()
            .filter(|q| q.status == PublishStatus::Published)
            .map(|q| q.without_public_access())
            .collect();
    }
    items.sort_by_key(|q| q.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        QuizListResponse { items },
        "Quiz list retrieved successfully",
    )))
}

pub async fn create_quiz(
    service: &QuizService,
    quiz: CreateQuizRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    load_managed_course(storage.as_ref(), &user, quiz.course_id).await?;
    check_settings(
        Some(&quiz.title),
        quiz.passing_score,
        quiz.max_attempts,
        quiz.time_limit,
    )?;

    let created = storage.create_quiz(quiz).await.map_err(ApiError::from)?;
    info!("Quiz {} created in course {}", created.id, created.course_id);
    Ok(HttpResponse::Created().json(ApiResponse::success(created, "Quiz created successfully")))
}

pub async fn get_quiz(
    service: &QuizService,
    quiz_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    let (quiz, course) = load_visible_quiz(storage.as_ref(), &user, quiz_id).await?;
    let quiz = if can_manage_course(&user, &course) {
        quiz
    } else {
        quiz.without_public_access()
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(quiz, "Quiz retrieved successfully")))
}

pub async fn update_quiz(
    service: &QuizService,
    quiz_id: i64,
    update: UpdateQuizRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    load_managed_quiz(storage.as_ref(), &user, quiz_id).await?;
    check_settings(
        update.title.as_deref(),
        update.passing_score,
        update.max_attempts,
        update.time_limit,
    )?;

    let quiz = storage
        .update_quiz(quiz_id, update)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(ErrorCode::QuizNotFound, "Quiz not found"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(quiz, "Quiz updated successfully")))
}

pub async fn delete_quiz(
    service: &QuizService,
    quiz_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    load_managed_quiz(storage.as_ref(), &user, quiz_id).await?;

    storage.delete_quiz(quiz_id).await.map_err(ApiError::from)?;
    info!("Quiz {} deleted by user {}", quiz_id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Quiz deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("Quiz 1"), Some(60), Some(1), None, true)]
    #[case(Some("  "), None, None, None, false)]
    #[case(None, Some(101), None, None, false)]
    #[case(None, None, Some(0), None, false)]
    #[case(None, None, None, Some(0), false)]
    #[case(None, None, None, None, true)]
    fn test_check_settings(
        #[case] title: Option<&str>,
        #[case] passing_score: Option<i32>,
        #[case] max_attempts: Option<i32>,
        #[case] time_limit: Option<i32>,
        #[case] ok: bool,
    ) {
        assert_eq!(
            check_settings(title, passing_score, max_attempts, time_limit).is_ok(),
            ok
        );
    }
}
