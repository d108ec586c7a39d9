//! AI 功能：出题、作文评分、AI 内容检测与聊天助手
//!
//! 每个功能负责组装提示词并解析模型回复。回复不可解析或不满足业务约束时
//! 返回 `AiResponse` 错误，调用方据此保证不写入任何部分结果。

use serde::Deserialize;
use tracing::debug;

use super::client::{AiClient, AiPrompt};
use super::provider::ProviderCredentials;
use crate::errors::{AssessError, Result};
use crate::models::ai::requests::GenerateQuestionsRequest;
use crate::models::assignment_submissions::entities::{AssignmentSubmission, RubricScore};
use crate::models::assignments::entities::Assignment;
use crate::models::questions::{
    entities::{Difficulty, Question, QuestionType},
    requests::CreateQuestionRequest,
};

const JSON_ONLY: &str = "Output only the JSON, no other text.";

/// 截取回复中的 JSON 片段（模型常在 JSON 外包裹说明文字或代码块）
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let open = text[start..].chars().next()?;
    let close = if open == '{' { '}' } else { ']' };
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

fn parse_reply<T: for<'de> Deserialize<'de>>(reply: &str) -> Result<T> {
    let json = extract_json(reply)
        .ok_or_else(|| AssessError::ai_response("AI reply did not contain JSON"))?;
    serde_json::from_str(json)
        .map_err(|e| AssessError::ai_response(format!("AI reply has unexpected shape: {e}")))
}

// ============ 出题 ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedQuestion {
    question_text: String,
    #[serde(default)]
    options: Vec<String>,
    correct_answer: Option<String>,
    explanation: Option<String>,
    points: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeneratedQuestions {
    List(Vec<GeneratedQuestion>),
    Wrapped { questions: Vec<GeneratedQuestion> },
}

fn question_format_hint(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::MultipleChoice => {
            "Provide 4 options in \"options\"; \"correctAnswer\" must equal one option exactly."
        }
        QuestionType::TrueFalse => {
            "Leave \"options\" empty; \"correctAnswer\" must be \"true\" or \"false\"."
        }
        QuestionType::ShortAnswer => {
            "Leave \"options\" empty; \"correctAnswer\" is a short reference answer."
        }
        QuestionType::Essay => {
            "Leave \"options\" empty and set \"correctAnswer\" to null; put grading hints in \"explanation\"."
        }
    }
}

fn generation_prompt(req: &GenerateQuestionsRequest) -> AiPrompt {
    let difficulty = req.difficulty.unwrap_or(Difficulty::Medium);
    let context = req
        .context
        .as_deref()
        .map(|c| format!("\n## Reference material:\n{c}\n"))
        .unwrap_or_default();

    AiPrompt::new(
        "You are an expert exam question designer.",
        format!(
            r#"Write {} {} questions about the topic below.

## Topic:
{}
{}
## Difficulty: {}

## Requirements:
1. {}
2. Each question is self-contained and unambiguous.
3. Output format (JSON array):
[
  {{"questionText": "...", "options": [], "correctAnswer": "...", "explanation": "...", "points": 1}}
]

{}"#,
            req.count,
            req.question_type,
            req.topic,
            context,
            difficulty,
            question_format_hint(req.question_type),
            JSON_ONLY
        ),
    )
}

/// 生成题目草稿；任何一道不合法则整体失败
pub async fn generate_questions(
    client: &dyn AiClient,
    credentials: &ProviderCredentials,
    req: &GenerateQuestionsRequest,
    instructor_id: i64,
) -> Result<Vec<CreateQuestionRequest>> {
    let reply = client
        .complete(credentials, &generation_prompt(req))
        .await?;
    let generated = match parse_reply::<GeneratedQuestions>(&reply)? {
        GeneratedQuestions::List(items) => items,
        GeneratedQuestions::Wrapped { questions } => questions,
    };
    if generated.is_empty() {
        return Err(AssessError::ai_response("AI returned no questions"));
    }
    debug!("AI generated {} question(s)", generated.len());

    generated
        .into_iter()
        .take(req.count as usize)
        .map(|g| {
            let draft = CreateQuestionRequest {
                instructor_id,
                course_id: req.course_id,
                question_type: req.question_type,
                question_text: g.question_text,
                options: Some(g.options),
                correct_answer: g.correct_answer,
                points: Some(g.points.unwrap_or(1).max(0)),
                difficulty: req.difficulty,
                explanation: g.explanation,
                tags: Some(vec![req.topic.trim().to_string()]),
                ai_generated: Some(true),
            };
            Question::from_request(0, draft.clone(), chrono::Utc::now())
                .validate()
                .map_err(|e| {
                    AssessError::ai_response(format!("AI generated an invalid question: {}", e.message()))
                })?;
            Ok(draft)
        })
        .collect()
}

// ============ 作文评分 ============

/// AI 评分结果，已按作业评分细则校验
#[derive(Debug, Clone, PartialEq)]
pub struct AiGrade {
    pub score: f64,
    pub feedback: String,
    pub rubric_scores: Option<Vec<RubricScore>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GradeReply {
    score: f64,
    feedback: String,
    #[serde(default)]
    rubric_scores: Vec<RubricScore>,
}

fn grading_prompt(assignment: &Assignment, submission: &AssignmentSubmission) -> AiPrompt {
    let rubric = match &assignment.rubric {
        Some(criteria) if !criteria.is_empty() => criteria
            .iter()
            .map(|c| {
                format!(
                    "- {} (max {} points){}",
                    c.criterion,
                    c.max_points,
                    c.description
                        .as_deref()
                        .map(|d| format!(": {d}"))
                        .unwrap_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        _ => "No rubric; grade holistically.".to_string(),
    };

    AiPrompt::new(
        "You are a fair and consistent teaching assistant grading student work.",
        format!(
            r#"Grade the submission for the assignment below.

## Assignment: {}
{}

## Maximum score: {}

## Rubric:
{}

## Submission:
{}

## Output format (JSON):
{{"score": 0, "feedback": "...", "rubricScores": [{{"criterion": "...", "score": 0, "feedback": "..."}}]}}

Use the rubric criterion names exactly. {}"#,
            assignment.title,
            assignment.instructions.as_deref().unwrap_or_default(),
            assignment.max_score,
            rubric,
            submission.content.as_deref().unwrap_or_default(),
            JSON_ONLY
        ),
    )
}

pub async fn grade_submission(
    client: &dyn AiClient,
    credentials: &ProviderCredentials,
    assignment: &Assignment,
    submission: &AssignmentSubmission,
) -> Result<AiGrade> {
    if submission
        .content
        .as_deref()
        .is_none_or(|c| c.trim().is_empty())
    {
        return Err(AssessError::validation(
            "Submission has no text content to grade",
        ));
    }

    let reply = client
        .complete(credentials, &grading_prompt(assignment, submission))
        .await?;
    let parsed: GradeReply = parse_reply(&reply)?;
    let rubric_scores = (!parsed.rubric_scores.is_empty()).then_some(parsed.rubric_scores);

    assignment
        .validate_grade(parsed.score, rubric_scores.as_deref())
        .map_err(|e| AssessError::ai_response(format!("AI grade rejected: {}", e.message())))?;

    Ok(AiGrade {
        score: parsed.score,
        feedback: parsed.feedback,
        rubric_scores,
    })
}

// ============ AI 内容检测 ============

#[derive(Debug, Clone, PartialEq)]
pub struct AiDetection {
    /// 0-100
    pub score: i32,
    pub reasoning: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetectionReply {
    score: f64,
    reasoning: Option<String>,
}

pub async fn detect_ai_content(
    client: &dyn AiClient,
    credentials: &ProviderCredentials,
    text: &str,
) -> Result<AiDetection> {
    if text.trim().is_empty() {
        return Err(AssessError::validation("Nothing to analyse"));
    }

    let prompt = AiPrompt::new(
        "You analyse student writing and estimate whether it was produced by an AI model.",
        format!(
            r#"Estimate the likelihood (0-100) that the text below was generated by AI.

## Text:
{text}

## Output format (JSON):
{{"score": 0, "reasoning": "..."}}

{JSON_ONLY}"#
        ),
    );
    let reply = client.complete(credentials, &prompt).await?;
    let parsed: DetectionReply = parse_reply(&reply)?;
    if !parsed.score.is_finite() {
        return Err(AssessError::ai_response("AI detection score is not a number"));
    }

    Ok(AiDetection {
        score: parsed.score.round().clamp(0.0, 100.0) as i32,
        reasoning: parsed.reasoning,
    })
}

// ============ 聊天助手 ============

pub async fn chat(
    client: &dyn AiClient,
    credentials: &ProviderCredentials,
    message: &str,
) -> Result<String> {
    let prompt = AiPrompt::new(
        "You are a helpful assistant for instructors and students on an assessment platform. \
         Answer concisely.",
        message,
    );
    client.complete(credentials, &prompt).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ai::entities::AiProvider;
    use crate::models::assignments::requests::CreateAssignmentRequest;
    use crate::models::assignment_submissions::requests::CreateAssignmentSubmissionRequest;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 返回固定回复并记录提示词
    struct FakeClient {
        reply: std::result::Result<String, AssessError>,
        prompts: Mutex<Vec<AiPrompt>>,
    }

    impl FakeClient {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AiClient for FakeClient {
        async fn complete(&self, _: &ProviderCredentials, prompt: &AiPrompt) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.clone());
            self.reply.clone()
        }
    }

    fn creds() -> ProviderCredentials {
        ProviderCredentials {
            provider: AiProvider::OpenAi,
            api_key: "k".to_string(),
        }
    }

    fn assignment() -> Assignment {
        let req: CreateAssignmentRequest = serde_json::from_value(serde_json::json!({
            "courseId": 1,
            "title": "Essay",
            "maxScore": 10.0,
            "rubric": [{"criterion": "Clarity", "maxPoints": 10.0, "description": null}]
        }))
        .unwrap();
        Assignment::from_request(1, req, chrono::Utc::now())
    }

    fn submission(content: &str) -> AssignmentSubmission {
        AssignmentSubmission::from_request(
            3,
            CreateAssignmentSubmissionRequest {
                assignment_id: 1,
                student_id: 2,
                content: Some(content.to_string()),
                file_urls: None,
                status: None,
            },
            chrono::Utc::now(),
        )
    }

    fn generate_request(question_type: QuestionType, count: u32) -> GenerateQuestionsRequest {
        GenerateQuestionsRequest {
            topic: "Fractions".to_string(),
            count,
            question_type,
            difficulty: None,
            course_id: Some(4),
            context: None,
        }
    }

    #[test]
    fn test_extract_json() {
        assert_eq!(extract_json("sure! {\"a\":1} done"), Some("{\"a\":1}"));
        assert_eq!(extract_json("```json\n[1,2]\n```"), Some("[1,2]"));
        assert_eq!(extract_json("no json here"), None);
    }

    #[tokio::test]
    async fn test_generate_questions_marks_ai_generated() {
        let client = FakeClient::replying(
            r#"```json
[{"questionText": "1/2 + 1/2 = ?", "options": ["1", "2"], "correctAnswer": "1"},
 {"questionText": "1/4 + 1/4 = ?", "options": ["1/2", "1"], "correctAnswer": "1/2"}]
```"#,
        );
        let req = generate_request(QuestionType::MultipleChoice, 1);
        let drafts = generate_questions(&client, &creds(), &req, 9).await.unwrap();

        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].ai_generated, Some(true));
        assert_eq!(drafts[0].instructor_id, 9);
        assert_eq!(drafts[0].course_id, Some(4));
        assert_eq!(drafts[0].question_type, QuestionType::MultipleChoice);
    }

    #[tokio::test]
    async fn test_generate_questions_rejects_invalid_draft() {
        let client = FakeClient::replying(
            r#"{"questions": [{"questionText": "Sky is blue", "correctAnswer": "maybe"}]}"#,
        );
        let req = generate_request(QuestionType::TrueFalse, 3);
        let err = generate_questions(&client, &creds(), &req, 9)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E012");
    }

    #[tokio::test]
    async fn test_grade_submission_validates_rubric() {
        let client = FakeClient::replying(
            r#"{"score": 8, "feedback": "Good", "rubricScores": [{"criterion": "Clarity", "score": 8, "feedback": null}]}"#,
        );
        let grade = grade_submission(&client, &creds(), &assignment(), &submission("text"))
            .await
            .unwrap();
        assert_eq!(grade.score, 8.0);
        assert_eq!(grade.rubric_scores.unwrap().len(), 1);

        let client = FakeClient::replying(r#"{"score": 12, "feedback": "Too generous"}"#);
        let err = grade_submission(&client, &creds(), &assignment(), &submission("text"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E012");
    }

    #[tokio::test]
    async fn test_grade_submission_requires_content() {
        let client = FakeClient::replying("{}");
        let err = grade_submission(&client, &creds(), &assignment(), &submission("  "))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E004");
        assert!(client.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_detection_score_is_clamped() {
        let client = FakeClient::replying(r#"{"score": 140.2, "reasoning": "uniform tone"}"#);
        let detection = detect_ai_content(&client, &creds(), "some essay")
            .await
            .unwrap();
        assert_eq!(detection.score, 100);
        assert_eq!(detection.reasoning.as_deref(), Some("uniform tone"));
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let client = FakeClient {
            reply: Err(AssessError::ai_provider("timeout")),
            prompts: Mutex::new(Vec::new()),
        };
        let err = chat(&client, &creds(), "hello").await.unwrap_err();
        assert_eq!(err.code(), "E011");
    }
}
