//! Authentication-gate behavior over the full route table. These tests use
//! a lazily-connected pool: every path exercised here rejects the request
//! before any database query is issued, so no Postgres instance is needed.

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;

use common::{call_json, test_config};
use hatake_api::app_state::AppState;
use hatake_api::routes::configure_routes;

fn test_state() -> AppState {
    let config = test_config();
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy(&config.database.url)
        .expect("lazy pool");

    AppState::with_pool(config, pool).expect("app state")
}

#[actix_web::test]
async fn missing_token_is_rejected_with_422() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/plants").to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], Value::Bool(false));
    assert_eq!(body["error"]["message"], "トークンが提供されていません");
}

#[actix_web::test]
async fn empty_bearer_token_counts_as_missing() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/notifications")
        .insert_header(("Authorization", "Bearer "))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["message"], "トークンが提供されていません");
}

#[actix_web::test]
async fn malformed_token_is_rejected_with_422() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/plants")
        .insert_header(("Authorization", "Bearer not.a.token"))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], Value::Bool(false));
    assert_eq!(body["error"]["message"], "トークンが無効です");
}

#[actix_web::test]
async fn token_signed_with_wrong_secret_is_rejected() {
    use hatake_api::security::jwt::JwtService;

    let forged = JwtService::new("a-different-secret", 3600);
    let (token, _) = forged.encode(1).expect("encode");

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/plants")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["message"], "トークンが無効です");
}

#[actix_web::test]
async fn health_endpoint_is_public() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], Value::Bool(true));
    assert_eq!(body["data"]["status"], "ok");
}

#[actix_web::test]
async fn register_validates_payload_before_anything_else() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(serde_json::json!({
            "email": "not-an-email",
            "name": "テスト",
            "password": "password123"
        }))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], Value::Bool(false));
}
