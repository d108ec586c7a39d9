mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{Value, json};

use common::bearer;
use rust_assessment_next::models::users::entities::UserRole;

#[actix_web::test]
async fn test_quiz_lifecycle_public_link_and_gradebook() {
    let storage = common::storage();
    let (_, teacher) = common::seed_user(&storage, "teacher", UserRole::Instructor).await;
    let (student_user, student) = common::seed_user(&storage, "student", UserRole::Student).await;
    let app = test_app!(storage);

    // 课程与选课
    let req = test::TestRequest::post()
        .uri("/api/v1/courses")
        .insert_header(bearer(&teacher))
        .set_json(json!({ "title": "Physics 101" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let course_id = body["data"]["id"].as_i64().unwrap();

    let enroll = json!({ "courseId": course_id, "studentId": student_user.id });
    let req = test::TestRequest::post()
        .uri("/api/v1/enrollments")
        .insert_header(bearer(&teacher))
        .set_json(&enroll)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    let req = test::TestRequest::post()
        .uri("/api/v1/enrollments")
        .insert_header(bearer(&teacher))
        .set_json(&enroll)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    // 题目与测验
    let req = test::TestRequest::post()
        .uri("/api/v1/questions")
        .insert_header(bearer(&teacher))
        .set_json(json!({
            "courseId": course_id,
            "questionType": "true_false",
            "questionText": "Light travels faster than sound.",
            "correctAnswer": "true",
            "points": 2,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let question_id = body["data"]["id"].as_i64().unwrap();

    // 学生无法访问题库
    let req = test::TestRequest::get()
        .uri("/api/v1/questions")
        .insert_header(bearer(&student))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/v1/quizzes")
        .insert_header(bearer(&teacher))
        .set_json(json!({
            "courseId": course_id,
            "title": "Waves",
            "status": "published",
            "maxAttempts": 2,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let quiz_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["passingScore"], 60);
    assert_eq!(body["data"]["dueDate"], Value::Null);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/quizzes/{quiz_id}/questions"))
        .insert_header(bearer(&teacher))
        .set_json(json!({ "questionId": question_id }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    // 学生作答
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/quizzes/{quiz_id}/attempts"))
        .insert_header(bearer(&student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let submission_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["status"], "in_progress");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/quiz-submissions/{submission_id}/submit"))
        .insert_header(bearer(&student))
        .set_json(json!({ "answers": [{ "questionId": question_id, "answer": " TRUE " }] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "graded");
    assert_eq!(body["data"]["percentage"], 100);
    assert_eq!(body["data"]["passed"], true);

    // 公开链接：先 view，再重新生成为 attempt
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/quizzes/{quiz_id}/public-link"))
        .insert_header(bearer(&teacher))
        .set_json(json!({ "permission": "view" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let view_token = body["data"]["token"].as_str().unwrap().to_string();

    // 学生读取测验时看不到公开令牌
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/quizzes/{quiz_id}"))
        .insert_header(bearer(&student))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["publicToken"], Value::Null);
    assert_eq!(body["data"]["publicEnabled"], false);
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/quizzes?courseId={course_id}"))
        .insert_header(bearer(&student))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["items"][0]["publicToken"], Value::Null);
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/quizzes/{quiz_id}"))
        .insert_header(bearer(&teacher))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["publicToken"], view_token.as_str());

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/public/quiz/{view_token}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["questions"][0]["correctAnswer"], "true");

    let public_answer = json!({
        "identificationData": { "name": "Guest", "email": "guest@example.com" },
        "answers": [{ "questionId": question_id, "answer": "true" }],
    });
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/public/quiz/{view_token}/submit"))
        .set_json(&public_answer)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/quizzes/{quiz_id}/public-link"))
        .insert_header(bearer(&teacher))
        .set_json(json!({ "permission": "attempt" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let attempt_token = body["data"]["token"].as_str().unwrap().to_string();
    assert_ne!(attempt_token, view_token);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/public/quiz/{view_token}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/public/quiz/{attempt_token}/submit"))
        .set_json(json!({
            "identificationData": { "name": "Guest" },
            "answers": [],
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/public/quiz/{attempt_token}/submit"))
        .set_json(&public_answer)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["data"],
        json!({ "score": 2.0, "totalPoints": 2.0, "percentage": 100, "passed": true })
    );

    // 成绩册导出
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/courses/{course_id}/gradebook/export"))
        .insert_header(bearer(&teacher))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("text/csv"));
    let csv = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Student Name,Email,Waves,Overall Average"));
    assert_eq!(lines.next(), Some("student,student@example.com,100%,100%"));

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/courses/{course_id}/gradebook/export"))
        .insert_header(bearer(&student))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    // 仪表盘
    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard/stats")
        .insert_header(bearer(&teacher))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["totalCourses"], 1);
    assert_eq!(body["data"]["totalQuizzes"], 1);
    assert_eq!(body["data"]["totalStudents"], 1);
    assert_eq!(body["data"]["pendingGrading"], 0);
    assert_eq!(body["data"]["recentSubmissions"], 1);
}

#[actix_web::test]
async fn test_student_cannot_see_other_courses() {
    let storage = common::storage();
    let (_, teacher) = common::seed_user(&storage, "teacher", UserRole::Instructor).await;
    let (_, student) = common::seed_user(&storage, "student", UserRole::Student).await;
    let app = test_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/v1/courses")
        .insert_header(bearer(&teacher))
        .set_json(json!({ "title": "Private Seminar" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let course_id = body["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/courses/{course_id}"))
        .insert_header(bearer(&student))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/v1/courses")
        .insert_header(bearer(&student))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 0);

    let req = test::TestRequest::post()
        .uri("/api/v1/courses")
        .insert_header(bearer(&student))
        .set_json(json!({ "title": "Not allowed" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard/stats")
        .insert_header(bearer(&student))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/v1/public/quiz/unknown-token")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}
