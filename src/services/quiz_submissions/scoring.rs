//! 测验自动评分
//!
//! 客观题比较去除首尾空白、忽略大小写后的答案；论述题计入总分但需要人工评分。
//! 未作答的题目按 0 分计算。

use std::collections::HashSet;

use crate::errors::{AssessError, Result};
use crate::models::questions::entities::Question;
use crate::models::quiz_submissions::entities::SubmittedAnswer;
use crate::models::quizzes::entities::QuizQuestion;
use crate::services::quizzes::questions::effective_points;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutcome {
    pub score: f64,
    pub total_points: f64,
    pub percentage: i32,
    pub passed: bool,
    // 含论述题，需要教师评分
    pub needs_manual_grading: bool,
}

/// 得分率四舍五入为整数百分比；总分为 0 时为 0
pub fn percentage(score: f64, total_points: f64) -> i32 {
    if total_points <= 0.0 {
        return 0;
    }
    (score / total_points * 100.0).round() as i32
}

/// 作答必须引用测验中的题目，且每题最多作答一次
pub fn check_answers(
    questions: &[(QuizQuestion, Question)],
    answers: &[SubmittedAnswer],
) -> Result<()> {
    let known: HashSet<i64> = questions.iter().map(|(link, _)| link.question_id).collect();
    let mut seen = HashSet::with_capacity(answers.len());
    for answer in answers {
        if !known.contains(&answer.question_id) {
            return Err(AssessError::validation(format!(
                "Question {} is not part of this quiz",
                answer.question_id
            )));
        }
        if !seen.insert(answer.question_id) {
            return Err(AssessError::validation(format!(
                "Question {} was answered more than once",
                answer.question_id
            )));
        }
    }
    Ok(())
}

pub fn score_answers(
    questions: &[(QuizQuestion, Question)],
    answers: &[SubmittedAnswer],
    passing_score: i32,
) -> Result<ScoreOutcome> {
    check_answers(questions, answers)?;

    let mut score = 0.0;
    let mut total_points = 0.0;
    let mut needs_manual_grading = false;
    for (link, question) in questions {
        let points = f64::from(effective_points(link, question));
        total_points += points;

        let answer = answers
            .iter()
            .find(|a| a.question_id == link.question_id)
            .map(|a| a.answer.as_str());
        match answer.and_then(|a| question.check_answer(a)) {
            Some(true) => score += points,
            Some(false) => {}
            None if !question.question_type.is_auto_gradable() => needs_manual_grading = true,
            None => {}
        }
    }

    let percentage = percentage(score, total_points);
    Ok(ScoreOutcome {
        score,
        total_points,
        percentage,
        passed: percentage >= passing_score,
        needs_manual_grading,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::{entities::QuestionType, requests::CreateQuestionRequest};
    use rstest::rstest;

    fn pair(id: i64, question_type: QuestionType, answer: Option<&str>, points: i32) -> (QuizQuestion, Question) {
        let question = Question::from_request(
            id,
            CreateQuestionRequest {
                instructor_id: 1,
                course_id: None,
                question_type,
                question_text: format!("Question {id}"),
                options: Some(vec!["A".to_string(), "B".to_string()]),
                correct_answer: answer.map(str::to_string),
                points: Some(points),
                difficulty: None,
                explanation: None,
                tags: None,
                ai_generated: None,
            },
            chrono::Utc::now(),
        );
        let link = QuizQuestion {
            id,
            quiz_id: 1,
            question_id: id,
            order_index: id as i32,
            points: None,
        };
        (link, question)
    }

    fn answer(question_id: i64, text: &str) -> SubmittedAnswer {
        SubmittedAnswer {
            question_id,
            answer: text.to_string(),
        }
    }

    #[test]
    fn test_objective_quiz_scores_fully() {
        let questions = vec![
            pair(1, QuestionType::MultipleChoice, Some("A"), 2),
            pair(2, QuestionType::TrueFalse, Some("true"), 1),
            pair(3, QuestionType::ShortAnswer, Some("Paris"), 1),
        ];
        let outcome = score_answers(
            &questions,
            &[answer(1, "A"), answer(2, " TRUE "), answer(3, "london")],
            60,
        )
        .unwrap();
        assert_eq!(outcome.score, 3.0);
        assert_eq!(outcome.total_points, 4.0);
        assert_eq!(outcome.percentage, 75);
        assert!(outcome.passed);
        assert!(!outcome.needs_manual_grading);
    }

    #[test]
    fn test_essay_counts_toward_total_and_needs_grading() {
        let questions = vec![
            pair(1, QuestionType::TrueFalse, Some("false"), 1),
            pair(2, QuestionType::Essay, None, 3),
        ];
        let outcome = score_answers(&questions, &[answer(1, "false"), answer(2, "essay")], 50).unwrap();
        assert_eq!(outcome.total_points, 4.0);
        assert_eq!(outcome.percentage, 25);
        assert!(!outcome.passed);
        assert!(outcome.needs_manual_grading);
    }

    #[test]
    fn test_link_points_override() {
        let mut questions = vec![pair(1, QuestionType::TrueFalse, Some("true"), 1)];
        questions[0].0.points = Some(10);
        let outcome = score_answers(&questions, &[answer(1, "true")], 60).unwrap();
        assert_eq!(outcome.score, 10.0);
        assert_eq!(outcome.total_points, 10.0);
    }

    #[test]
    fn test_foreign_and_duplicate_answers_rejected() {
        let questions = vec![pair(1, QuestionType::TrueFalse, Some("true"), 1)];
        assert!(score_answers(&questions, &[answer(7, "true")], 60).is_err());
        assert!(score_answers(&questions, &[answer(1, "true"), answer(1, "false")], 60).is_err());
    }

    #[rstest]
    #[case(0.0, 0.0, 0)]
    #[case(1.0, 3.0, 33)]
    #[case(2.0, 3.0, 67)]
    #[case(1.0, 8.0, 13)]
    #[case(5.0, 5.0, 100)]
    fn test_percentage_rounding(#[case] score: f64, #[case] total: f64, #[case] expected: i32) {
        assert_eq!(percentage(score, total), expected);
    }
}
