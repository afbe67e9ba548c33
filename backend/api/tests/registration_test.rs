//! Registration against a live database; runs only when TEST_DATABASE_URL
//! is set.

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::json;
use uuid::Uuid;

use common::{call_json, db_pool, test_config};
use hatake_api::app_state::AppState;
use hatake_api::routes::configure_routes;

#[actix_web::test]
async fn duplicate_email_registration_returns_conflict() {
    let Some(pool) = db_pool().await else {
        return;
    };
    let state = AppState::with_pool(test_config(), pool).expect("app state");

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let payload = json!({
        "email": format!("dup-{}@example.com", Uuid::new_v4()),
        "name": "テスト",
        "password": "password123"
    });

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(&payload)
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    // Same address again: the unique index arbitrates, the client sees 409.
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(&payload)
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"]["message"],
        "このメールアドレスは既に登録されています"
    );
}
