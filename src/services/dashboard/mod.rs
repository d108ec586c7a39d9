//! 教师仪表盘统计

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use super::common::{ApiError, ApiResult, app_storage, current_user};
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::assignment_submissions::requests::AssignmentSubmissionListQuery;
use crate::models::assignments::requests::AssignmentListQuery;
use crate::models::common::SubmissionStatus;
use crate::models::courses::requests::CourseListQuery;
use crate::models::dashboard::{DashboardQuery, DashboardStats};
use crate::models::enrollments::requests::EnrollmentListQuery;
use crate::models::quiz_submissions::requests::QuizSubmissionListQuery;
use crate::models::quizzes::requests::QuizListQuery;
use crate::models::users::entities::UserRole;
use crate::storage::Storage;

/// 统计“最近提交”的时间窗口
const RECENT_WINDOW_DAYS: i64 = 7;

pub struct DashboardService {
    storage: Option<Arc<dyn Storage>>,
}

impl DashboardService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ApiResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_storage(request),
        }
    }

    pub async fn stats(&self, query: DashboardQuery, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let user = current_user(request)?;

        // 非管理员只能查看自己的统计
        let instructor_id = match (user.role, query.instructor_id) {
            (UserRole::Admin, Some(id)) => id,
            _ => user.id,
        };
        let stats = instructor_stats(storage.as_ref(), instructor_id, Utc::now())
            .await
            .map_err(ApiError::from)?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            stats,
            "Dashboard stats retrieved successfully",
        )))
    }
}

fn is_recent(submitted_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    let since = now - Duration::days(RECENT_WINDOW_DAYS);
    submitted_at.is_some_and(|at| at >= since && at <= now)
}

pub async fn instructor_stats(
    storage: &dyn Storage,
    instructor_id: i64,
    now: DateTime<Utc>,
) -> Result<DashboardStats> {
    let courses = storage
        .list_courses(CourseListQuery {
            instructor_id: Some(instructor_id),
        })
        .await?;

    let mut stats = DashboardStats {
        total_courses: courses.len() as i64,
        ..Default::default()
    };

    for course in &courses {
        let course_id = Some(course.id);

        // 按课程累加，不去重
        stats.total_students += storage
            .list_enrollments(EnrollmentListQuery {
                course_id,
                student_id: None,
            })
            .await?
            .len() as i64;

        let quizzes = storage.list_quizzes(QuizListQuery { course_id }).await?;
        stats.total_quizzes += quizzes.len() as i64;
        for quiz in &quizzes {
            let submissions = storage
                .list_quiz_submissions(QuizSubmissionListQuery {
                    quiz_id: Some(quiz.id),
                    student_id: None,
                })
                .await?;
            for submission in &submissions {
                if submission.status == SubmissionStatus::Submitted {
                    stats.pending_grading += 1;
                }
                if is_recent(submission.submitted_at, now) {
                    stats.recent_submissions += 1;
                }
            }
        }

        let assignments = storage
            .list_assignments(AssignmentListQuery { course_id })
            .await?;
        stats.total_assignments += assignments.len() as i64;
        for assignment in &assignments {
            let submissions = storage
                .list_assignment_submissions(AssignmentSubmissionListQuery {
                    assignment_id: Some(assignment.id),
                    student_id: None,
                })
                .await?;
            for submission in &submissions {
                if submission.status == SubmissionStatus::Submitted {
                    stats.pending_grading += 1;
                }
                if is_recent(submission.submitted_at, now) {
                    stats.recent_submissions += 1;
                }
            }
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignment_submissions::requests::SubmitAssignmentRequest;
    use crate::services::assignment_submissions::submit::submit_work;
    use crate::services::quiz_submissions::attempts::begin_attempt;
    use crate::services::test_support::*;
    use crate::storage::memory_storage::MemoryStorage;

    #[tokio::test]
    async fn test_no_courses_is_all_zero() {
        let storage = MemoryStorage::new();
        let teacher = seed_user(&storage, "teacher", UserRole::Instructor).await;
        let stats = instructor_stats(&storage, teacher.id, Utc::now()).await.unwrap();
        assert_eq!(stats, DashboardStats::default());
    }

    #[tokio::test]
    async fn test_students_are_summed_per_course() {
        let storage = MemoryStorage::new();
        let teacher = seed_user(&storage, "teacher", UserRole::Instructor).await;
        let student = seed_user(&storage, "student", UserRole::Student).await;
        let other = seed_user(&storage, "other", UserRole::Student).await;
        let algebra = seed_course(&storage, &teacher, "Algebra").await;
        let geometry = seed_course(&storage, &teacher, "Geometry").await;
        seed_enrollment(&storage, &algebra, &student).await;
        seed_enrollment(&storage, &geometry, &student).await;
        seed_enrollment(&storage, &geometry, &other).await;

        let quiz = seed_quiz(&storage, &algebra, 2).await;
        let assignment = seed_assignment(&storage, &geometry, 10.0).await;
        // 进行中的测验不算待批改，也没有提交时间
        begin_attempt(&storage, &student, quiz.id).await.unwrap();
        submit_work(
            &storage,
            &other,
            assignment.id,
            SubmitAssignmentRequest {
                content: Some("proof".to_string()),
                file_urls: vec![],
            },
        )
        .await
        .unwrap();

        let stats = instructor_stats(&storage, teacher.id, Utc::now()).await.unwrap();
        assert_eq!(stats.total_courses, 2);
        assert_eq!(stats.total_students, 3);
        assert_eq!(stats.total_quizzes, 1);
        assert_eq!(stats.total_assignments, 1);
        assert_eq!(stats.pending_grading, 1);
        assert_eq!(stats.recent_submissions, 1);

        let later = Utc::now() + Duration::days(RECENT_WINDOW_DAYS + 1);
        let stats = instructor_stats(&storage, teacher.id, later).await.unwrap();
        assert_eq!(stats.recent_submissions, 0);
    }
}
