mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{Value, json};

use common::{PASSWORD, bearer};
use rust_assessment_next::models::users::entities::UserRole;

#[actix_web::test]
async fn test_register_then_duplicate_is_conflict() {
    let storage = common::storage();
    let app = test_app!(storage);

    let payload = json!({
        "username": "newstudent",
        "email": "NewStudent@Example.com",
        "password": PASSWORD,
    });
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["email"], "newstudent@example.com");
    assert_eq!(body["data"]["role"], "student");
    assert!(body["data"].get("passwordHash").is_none());

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_register_admin_is_forbidden() {
    let storage = common::storage();
    let app = test_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "username": "sneaky",
            "email": "sneaky@example.com",
            "password": PASSWORD,
            "role": "admin",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_login_and_me() {
    let storage = common::storage();
    common::seed_user(&storage, "teacher", UserRole::Instructor).await;
    let app = test_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "username": "teacher@example.com", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let token = body["data"]["accessToken"].as_str().unwrap().to_string();
    assert!(body["data"]["expiresIn"].as_i64().unwrap() > 0);

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["user"]["username"], "teacher");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "username": "teacher", "password": "wrong-Passw0rd" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_protected_routes_need_token() {
    let storage = common::storage();
    let app = test_app!(storage);

    let req = test::TestRequest::get().uri("/api/v1/courses").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/courses")
        .insert_header(bearer("not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_ai_settings_roundtrip() {
    let storage = common::storage();
    let (_, token) = common::seed_user(&storage, "writer", UserRole::Instructor).await;
    let app = test_app!(storage);

    let req = test::TestRequest::put()
        .uri("/api/v1/users/me/ai-settings")
        .insert_header(bearer(&token))
        .set_json(json!({
            "activeProvider": "anthropic",
            "apiKeys": { "anthropic": "sk-ant-test" },
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/v1/users/me/ai-settings")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["activeProvider"], "anthropic");
    assert!(
        body["data"]["configuredProviders"]
            .as_array()
            .unwrap()
            .contains(&json!("anthropic"))
    );
    // 密钥本身不会返回
    assert!(!body.to_string().contains("sk-ant-test"));
}
