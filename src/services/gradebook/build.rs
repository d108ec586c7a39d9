use std::collections::HashMap;

use crate::errors::Result;
use crate::models::assignment_submissions::{
    entities::AssignmentSubmission, requests::AssignmentSubmissionListQuery,
};
use crate::models::assignments::requests::AssignmentListQuery;
use crate::models::courses::entities::Course;
use crate::models::enrollments::requests::EnrollmentListQuery;
use crate::models::gradebook::{
    AssessmentSummary, AssignmentGrade, Gradebook, GradebookColumn, GradebookStudentRow, QuizGrade,
};
use crate::models::quiz_submissions::{
    entities::QuizSubmission, requests::QuizSubmissionListQuery,
};
use crate::models::quizzes::requests::QuizListQuery;
use crate::storage::Storage;

/// 整数百分比的平均值（四舍五入），为空时返回 None
pub fn mean_percentage(values: &[i32]) -> Option<i32> {
    if values.is_empty() {
        return None;
    }
    let sum: i64 = values.iter().map(|v| i64::from(*v)).sum();
    Some((sum as f64 / values.len() as f64).round() as i32)
}

/// 单个测评的汇总；percentages 为每位有提交的学生的百分比（未评分为 None）
pub fn summarize(id: i64, title: &str, percentages: &[Option<i32>]) -> AssessmentSummary {
    let graded: Vec<i32> = percentages.iter().flatten().copied().collect();
    AssessmentSummary {
        id,
        title: title.to_string(),
        submission_count: percentages.len() as i64,
        average_percentage: mean_percentage(&graded),
        best_percentage: graded.iter().max().copied(),
        worst_percentage: graded.iter().min().copied(),
    }
}

// 每位学生的最近一次测验提交（尝试次数最大者）
fn latest_quiz_submissions(submissions: Vec<QuizSubmission>) -> HashMap<i64, QuizSubmission> {
    let mut latest: HashMap<i64, QuizSubmission> = HashMap::new();
    for submission in submissions {
        let newer = latest.get(&submission.student_id).is_none_or(|current| {
            (submission.attempt_number, submission.id) > (current.attempt_number, current.id)
        });
        if newer {
            latest.insert(submission.student_id, submission);
        }
    }
    latest
}

fn latest_assignment_submissions(
    submissions: Vec<AssignmentSubmission>,
) -> HashMap<i64, AssignmentSubmission> {
    let mut latest: HashMap<i64, AssignmentSubmission> = HashMap::new();
    for submission in submissions {
        let newer = latest
            .get(&submission.student_id)
            .is_none_or(|current| submission.id > current.id);
        if newer {
            latest.insert(submission.student_id, submission);
        }
    }
    latest
}

pub async fn build_gradebook(storage: &dyn Storage, course: &Course) -> Result<Gradebook> {
    let course_id = Some(course.id);

    let mut students = Vec::new();
    for enrollment in storage
        .list_enrollments(EnrollmentListQuery {
            course_id,
            student_id: None,
        })
        .await?
    {
        if let Some(student) = storage.get_user_by_id(enrollment.student_id).await? {
            students.push(student);
        }
    }
    students.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    let mut quizzes = storage.list_quizzes(QuizListQuery { course_id }).await?;
    quizzes.sort_by_key(|q| q.id);
    let mut assignments = storage
        .list_assignments(AssignmentListQuery { course_id })
        .await?;
    assignments.sort_by_key(|a| a.id);

    let mut rows: Vec<GradebookStudentRow> = students
        .iter()
        .map(|s| GradebookStudentRow {
            student_id: s.id,
            student_name: s.name.clone(),
            student_email: s.email.clone(),
            quiz_grades: Vec::with_capacity(quizzes.len()),
            assignment_grades: Vec::with_capacity(assignments.len()),
            overall_average: None,
        })
        .collect();

    // 汇总与表格同口径：只统计当前选课学生的最新提交
    let mut quiz_summaries = Vec::with_capacity(quizzes.len());
    for quiz in &quizzes {
        let latest = latest_quiz_submissions(
            storage
                .list_quiz_submissions(QuizSubmissionListQuery {
                    quiz_id: Some(quiz.id),
                    student_id: None,
                })
                .await?,
        );
        let mut percentages = Vec::new();
        for row in rows.iter_mut() {
            let submission = latest.get(&row.student_id);
            if let Some(s) = submission {
                percentages.push(s.percentage);
            }
            row.quiz_grades.push(QuizGrade {
                quiz_id: quiz.id,
                score: submission.and_then(|s| s.score),
                percentage: submission.and_then(|s| s.percentage),
                status: submission.map(|s| s.status),
            });
        }
        quiz_summaries.push(summarize(quiz.id, &quiz.title, &percentages));
    }

    let mut assignment_summaries = Vec::with_capacity(assignments.len());
    for assignment in &assignments {
        let latest = latest_assignment_submissions(
            storage
                .list_assignment_submissions(AssignmentSubmissionListQuery {
                    assignment_id: Some(assignment.id),
                    student_id: None,
                })
                .await?,
        );
        let mut percentages = Vec::new();
        for row in rows.iter_mut() {
            let submission = latest.get(&row.student_id);
            let percentage = submission
                .and_then(|s| s.score)
                .and_then(|score| assignment.percentage_of(score));
            if submission.is_some() {
                percentages.push(percentage);
            }
            row.assignment_grades.push(AssignmentGrade {
                assignment_id: assignment.id,
                score: submission.and_then(|s| s.score),
                percentage,
                status: submission.map(|s| s.status),
            });
        }
        assignment_summaries.push(summarize(assignment.id, &assignment.title, &percentages));
    }

    for row in rows.iter_mut() {
        let percentages: Vec<i32> = row
            .quiz_grades
            .iter()
            .filter_map(|g| g.percentage)
            .chain(row.assignment_grades.iter().filter_map(|g| g.percentage))
            .collect();
        row.overall_average = mean_percentage(&percentages);
    }

    Ok(Gradebook {
        course_id: course.id,
        course_title: course.title.clone(),
        quizzes: quizzes
            .iter()
            .map(|q| GradebookColumn {
                id: q.id,
                title: q.title.clone(),
            })
            .collect(),
        assignments: assignments
            .iter()
            .map(|a| GradebookColumn {
                id: a.id,
                title: a.title.clone(),
            })
            .collect(),
        students: rows,
        quiz_summaries,
        assignment_summaries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignment_submissions::requests::{
        CreateAssignmentSubmissionRequest, UpdateAssignmentSubmissionRequest,
    };
    use crate::models::common::SubmissionStatus;
    use crate::models::quiz_submissions::requests::{
        CreateQuizSubmissionRequest, UpdateQuizSubmissionRequest,
    };
    use crate::models::users::entities::{User, UserRole};
    use crate::services::test_support::*;
    use crate::storage::memory_storage::MemoryStorage;
    use rstest::rstest;

    #[rstest]
    #[case(vec![80, 60], Some(70))]
    #[case(vec![90], Some(90))]
    #[case(vec![67, 66], Some(67))]
    #[case(vec![], None)]
    fn test_mean_percentage(#[case] values: Vec<i32>, #[case] expected: Option<i32>) {
        assert_eq!(mean_percentage(&values), expected);
    }

    #[test]
    fn test_summary_without_submissions_is_null() {
        let summary = summarize(1, "Quiz", &[]);
        assert_eq!(summary.submission_count, 0);
        assert_eq!(summary.best_percentage, None);
        assert_eq!(summary.worst_percentage, None);
        assert_eq!(summary.average_percentage, None);
    }

    #[test]
    fn test_summary_ignores_ungraded_but_counts_them() {
        let summary = summarize(1, "Quiz", &[Some(90), None, Some(50)]);
        assert_eq!(summary.submission_count, 3);
        assert_eq!(summary.best_percentage, Some(90));
        assert_eq!(summary.worst_percentage, Some(50));
        assert_eq!(summary.average_percentage, Some(70));
    }

    async fn graded_quiz_attempt(
        storage: &MemoryStorage,
        quiz_id: i64,
        student: &User,
        attempt: i32,
        percentage: i32,
    ) {
        let submission = storage
            .create_quiz_submission(CreateQuizSubmissionRequest {
                quiz_id,
                student_id: student.id,
                answers: None,
                status: None,
                attempt_number: Some(attempt),
            })
            .await
            .unwrap();
        storage
            .update_quiz_submission(
                submission.id,
                UpdateQuizSubmissionRequest {
                    score: Some(f64::from(percentage)),
                    total_points: Some(100.0),
                    percentage: Some(percentage),
                    status: Some(SubmissionStatus::Graded),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_overall_average_from_quiz_percentages() {
        let storage = MemoryStorage::new();
        let teacher = seed_user(&storage, "teacher", UserRole::Instructor).await;
        let student = seed_user(&storage, "student", UserRole::Student).await;
        let course = seed_course(&storage, &teacher, "Biology").await;
        seed_enrollment(&storage, &course, &student).await;
        let first = seed_quiz(&storage, &course, 3).await;
        let second = seed_quiz(&storage, &course, 3).await;

        graded_quiz_attempt(&storage, first.id, &student, 1, 40).await;
        // 取最近一次尝试
        graded_quiz_attempt(&storage, first.id, &student, 2, 80).await;
        graded_quiz_attempt(&storage, second.id, &student, 1, 60).await;

        let gradebook = build_gradebook(&storage, &course).await.unwrap();
        let row = &gradebook.students[0];
        assert_eq!(row.quiz_grades[0].percentage, Some(80));
        assert_eq!(row.overall_average, Some(70));
        assert_eq!(gradebook.quiz_summaries[0].submission_count, 1);
    }

    #[tokio::test]
    async fn test_assignment_percentage_and_missing_quiz() {
        let storage = MemoryStorage::new();
        let teacher = seed_user(&storage, "teacher", UserRole::Instructor).await;
        let student = seed_user(&storage, "student", UserRole::Student).await;
        let outsider = seed_user(&storage, "outsider", UserRole::Student).await;
        let course = seed_course(&storage, &teacher, "History").await;
        seed_enrollment(&storage, &course, &student).await;
        let quiz = seed_quiz(&storage, &course, 1).await;
        let assignment = seed_assignment(&storage, &course, 50.0).await;

        for who in [&student, &outsider] {
            let submission = storage
                .create_assignment_submission(CreateAssignmentSubmissionRequest {
                    assignment_id: assignment.id,
                    student_id: who.id,
                    content: Some("essay".to_string()),
                    file_urls: None,
                    status: None,
                })
                .await
                .unwrap();
            storage
                .update_assignment_submission(
                    submission.id,
                    UpdateAssignmentSubmissionRequest {
                        score: Some(45.0),
                        status: Some(SubmissionStatus::Graded),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        }

        let gradebook = build_gradebook(&storage, &course).await.unwrap();
        // 未选课学生不出现在成绩册中
        assert_eq!(gradebook.students.len(), 1);
        let row = &gradebook.students[0];
        assert_eq!(row.quiz_grades[0].quiz_id, quiz.id);
        assert_eq!(row.quiz_grades[0].percentage, None);
        assert_eq!(row.quiz_grades[0].status, None);
        assert_eq!(row.assignment_grades[0].percentage, Some(90));
        assert_eq!(row.overall_average, Some(90));
        assert_eq!(gradebook.quiz_summaries[0].submission_count, 0);
        assert_eq!(gradebook.quiz_summaries[0].best_percentage, None);
        assert_eq!(gradebook.assignment_summaries[0].best_percentage, Some(90));
        // 汇总只统计成绩册中的学生
        assert_eq!(gradebook.assignment_summaries[0].submission_count, 1);
    }
}
