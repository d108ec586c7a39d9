use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{QuizService, load_managed_quiz, load_visible_quiz};
use crate::errors::AssessError;
use crate::models::questions::entities::Question;
use crate::models::quizzes::{
    entities::QuizQuestion,
    requests::CreateQuizQuestionRequest,
    responses::{QuizQuestionDetail, QuizQuestionListResponse},
};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, ApiResult, can_manage_course, current_user};
use crate::storage::Storage;

/// 按 order_index 排列的测验题目；题目已被删除的关联会被跳过
pub(crate) async fn ordered_questions(
    storage: &dyn Storage,
    quiz_id: i64,
) -> ApiResult<Vec<(QuizQuestion, Question)>> {
    let links = storage.list_quiz_questions(quiz_id).await?;
    let mut pairs = Vec::with_capacity(links.len());
    for link in links {
        match storage.get_question_by_id(link.question_id).await? {
            Some(question) => pairs.push((link, question)),
            None => warn!(
                "Quiz {} references missing question {}",
                quiz_id, link.question_id
            ),
        }
    }
    Ok(pairs)
}

/// 生效分值：关联覆盖分值优先
pub(crate) fn effective_points(link: &QuizQuestion, question: &Question) -> i32 {
    link.points.unwrap_or(question.points)
}

fn detail(link: QuizQuestion, mut question: Question, reveal_answers: bool) -> QuizQuestionDetail {
    let effective_points = effective_points(&link, &question);
    if !reveal_answers {
        question.correct_answer = None;
        question.explanation = None;
    }
    QuizQuestionDetail {
        link,
        question,
        effective_points,
    }
}

pub async fn list_quiz_questions(
    service: &QuizService,
    quiz_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    let (_, course) = load_visible_quiz(storage.as_ref(), &user, quiz_id).await?;
    // 学生作答时不返回答案
    let reveal = can_manage_course(&user, &course);

    let items = ordered_questions(storage.as_ref(), quiz_id)
        .await?
        .into_iter()
        .map(|(link, question)| detail(link, question, reveal))
        .collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        QuizQuestionListResponse { items },
        "Quiz questions retrieved successfully",
    )))
}

pub async fn add_quiz_question(
    service: &QuizService,
    quiz_id: i64,
    link: CreateQuizQuestionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    load_managed_quiz(storage.as_ref(), &user, quiz_id).await?;

    let question = storage
        .get_question_by_id(link.question_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(ErrorCode::QuestionNotFound, "Question not found"))?;
    if user.role != UserRole::Admin && question.instructor_id != user.id {
        return Err(ApiError::forbidden(
            ErrorCode::Forbidden,
            "You can only add your own questions",
        )
        .into());
    }
    if link.points.is_some_and(|p| p < 0) {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "Question points must not be negative",
        )
        .into());
    }

    let created = storage
        .add_quiz_question(quiz_id, link)
        .await
        .map_err(|e| match e {
            AssessError::Conflict(_) => {
                ApiError::conflict(ErrorCode::QuizQuestionConflict, e.message())
            }
            other => ApiError::from(other),
        })?;
    info!(
        "Question {} added to quiz {} at position {}",
        created.question_id, quiz_id, created.order_index
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        detail(created, question, true),
        "Question added to quiz",
    )))
}

pub async fn remove_quiz_question(
    service: &QuizService,
    quiz_id: i64,
    question_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    load_managed_quiz(storage.as_ref(), &user, quiz_id).await?;

    storage
        .remove_quiz_question(quiz_id, question_id)
        .await
        .map_err(ApiError::from)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Question removed from quiz")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::{entities::QuestionType, requests::CreateQuestionRequest};

    fn question(points: i32) -> Question {
        Question::from_request(
            9,
            CreateQuestionRequest {
                instructor_id: 1,
                course_id: None,
                question_type: QuestionType::ShortAnswer,
                question_text: "Capital of Italy?".to_string(),
                options: None,
                correct_answer: Some("Rome".to_string()),
                points: Some(points),
                difficulty: None,
                explanation: Some("It is Rome".to_string()),
                tags: None,
                ai_generated: None,
            },
            chrono::Utc::now(),
        )
    }

    fn link(points: Option<i32>) -> QuizQuestion {
        QuizQuestion {
            id: 1,
            quiz_id: 2,
            question_id: 9,
            order_index: 0,
            points,
        }
    }

    #[test]
    fn test_link_points_override_question_points() {
        assert_eq!(effective_points(&link(Some(5)), &question(2)), 5);
        assert_eq!(effective_points(&link(None), &question(2)), 2);
    }

    #[test]
    fn test_detail_hides_answers_from_students() {
        let hidden = detail(link(None), question(1), false);
        assert!(hidden.question.correct_answer.is_none());
        assert!(hidden.question.explanation.is_none());

        let shown = detail(link(None), question(1), true);
        assert_eq!(shown.question.correct_answer.as_deref(), Some("Rome"));
    }
}
