use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::requests::{CreateQuestionRequest, UpdateQuestionRequest};
use crate::errors::{AssessError, Result};
use crate::models::define_string_enum;

define_string_enum! {
    // 题型
    QuestionType, "题型", "../frontend/src/types/generated/question.ts" {
        MultipleChoice => "multiple_choice",
        TrueFalse => "true_false",
        ShortAnswer => "short_answer",
        Essay => "essay",
    }
}

impl QuestionType {
    /// 能否自动判分
    pub fn is_auto_gradable(&self) -> bool {
        !matches!(self, QuestionType::Essay)
    }
}

define_string_enum! {
    // 难度
    Difficulty, "难度", "../frontend/src/types/generated/question.ts" {
        Easy => "easy",
        Medium => "medium",
        Hard => "hard",
    }
}

// 题库中的题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct Question {
    pub id: i64,
    pub instructor_id: i64,
    pub course_id: Option<i64>,
    pub question_type: QuestionType,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer: Option<String>,
    pub points: i32,
    pub difficulty: Difficulty,
    pub explanation: Option<String>,
    pub tags: Vec<String>,
    pub ai_generated: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Question {
    pub fn from_request(
        id: i64,
        req: CreateQuestionRequest,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            id,
            instructor_id: req.instructor_id,
            course_id: req.course_id,
            question_type: req.question_type,
            question_text: req.question_text,
            options: req.options.unwrap_or_default(),
            correct_answer: req.correct_answer,
            points: req.points.unwrap_or(1),
            difficulty: req.difficulty.unwrap_or(Difficulty::Medium),
            explanation: req.explanation,
            tags: req.tags.unwrap_or_default(),
            ai_generated: req.ai_generated.unwrap_or(false),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(
        &mut self,
        update: UpdateQuestionRequest,
        now: chrono::DateTime<chrono::Utc>,
    ) {
        if let Some(course_id) = update.course_id {
            self.course_id = Some(course_id);
        }
        if let Some(question_type) = update.question_type {
            self.question_type = question_type;
        }
        if let Some(text) = update.question_text {
            self.question_text = text;
        }
        if let Some(options) = update.options {
            self.options = options;
        }
        if let Some(correct_answer) = update.correct_answer {
            self.correct_answer = Some(correct_answer);
        }
        if let Some(points) = update.points {
            self.points = points;
        }
        if let Some(difficulty) = update.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(explanation) = update.explanation {
            self.explanation = Some(explanation);
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        self.updated_at = now;
    }

    /// 校验题目内容与题型是否匹配
    pub fn validate(&self) -> Result<()> {
        if self.question_text.trim().is_empty() {
            return Err(AssessError::validation("Question text must not be empty"));
        }
        if self.points < 0 {
            return Err(AssessError::validation("Question points must not be negative"));
        }
        match self.question_type {
            QuestionType::MultipleChoice => {
                if self.options.len() < 2 {
                    return Err(AssessError::validation(
                        "Multiple choice questions need at least two options",
                    ));
                }
                let answer = self.correct_answer.as_deref().map(str::trim);
                match answer {
                    Some(a) if self.options.iter().any(|o| o.trim() == a) => {}
                    _ => {
                        return Err(AssessError::validation(
                            "Correct answer must be one of the options",
                        ));
                    }
                }
            }
            QuestionType::TrueFalse => {
                let answer = self
                    .correct_answer
                    .as_deref()
                    .map(|a| a.trim().to_ascii_lowercase());
                if !matches!(answer.as_deref(), Some("true") | Some("false")) {
                    return Err(AssessError::validation(
                        "True/false questions need a correct answer of 'true' or 'false'",
                    ));
                }
            }
            QuestionType::ShortAnswer => {
                if self
                    .correct_answer
                    .as_deref()
                    .is_none_or(|a| a.trim().is_empty())
                {
                    return Err(AssessError::validation(
                        "Short answer questions need a correct answer",
                    ));
                }
            }
            QuestionType::Essay => {}
        }
        Ok(())
    }

    /// 判断作答是否正确；论述题返回 None
    pub fn check_answer(&self, answer: &str) -> Option<bool> {
        if !self.question_type.is_auto_gradable() {
            return None;
        }
        let expected = self.correct_answer.as_deref()?;
        Some(expected.trim().to_lowercase() == answer.trim().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn question(question_type: QuestionType, options: &[&str], answer: Option<&str>) -> Question {
        Question::from_request(
            1,
            CreateQuestionRequest {
                instructor_id: 7,
                course_id: None,
                question_type,
                question_text: "What is 2 + 2?".to_string(),
                options: Some(options.iter().map(|s| s.to_string()).collect()),
                correct_answer: answer.map(str::to_string),
                points: None,
                difficulty: None,
                explanation: None,
                tags: None,
                ai_generated: None,
            },
            chrono::Utc::now(),
        )
    }

    #[test]
    fn test_question_defaults() {
        let q = question(QuestionType::Essay, &[], None);
        assert_eq!(q.points, 1);
        assert_eq!(q.difficulty, Difficulty::Medium);
        assert!(q.tags.is_empty());
        assert!(!q.ai_generated);
    }

    #[rstest]
    #[case(QuestionType::MultipleChoice, &["3", "4"], Some("4"), true)]
    #[case(QuestionType::MultipleChoice, &["3", "4"], Some("5"), false)]
    #[case(QuestionType::MultipleChoice, &["4"], Some("4"), false)]
    #[case(QuestionType::TrueFalse, &[], Some("True"), true)]
    #[case(QuestionType::TrueFalse, &[], Some("maybe"), false)]
    #[case(QuestionType::ShortAnswer, &[], Some("four"), true)]
    #[case(QuestionType::ShortAnswer, &[], None, false)]
    #[case(QuestionType::Essay, &[], None, true)]
    fn test_validate(
        #[case] question_type: QuestionType,
        #[case] options: &[&str],
        #[case] answer: Option<&str>,
        #[case] valid: bool,
    ) {
        assert_eq!(question(question_type, options, answer).validate().is_ok(), valid);
    }

    #[test]
    fn test_check_answer_is_trimmed_and_case_insensitive() {
        let q = question(QuestionType::ShortAnswer, &[], Some("Paris"));
        assert_eq!(q.check_answer("  paris "), Some(true));
        assert_eq!(q.check_answer("London"), Some(false));
        let essay = question(QuestionType::Essay, &[], None);
        assert_eq!(essay.check_answer("anything"), None);
    }
}
