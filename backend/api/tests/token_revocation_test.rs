//! Revocation-list behavior against a live database. These tests run only
//! when TEST_DATABASE_URL points at a Postgres instance; each test works
//! under its own jti or user so runs do not interfere.

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use chrono::{Duration, Utc};
use uuid::Uuid;

use common::{call_json, db_pool, test_config};
use hatake_api::app_state::AppState;
use hatake_api::db::{token_revocation, user_repo};
use hatake_api::routes::configure_routes;

#[actix_web::test]
async fn revoking_the_same_jti_twice_leaves_one_entry() {
    let Some(pool) = db_pool().await else {
        return;
    };
    let jti = Uuid::new_v4().to_string();
    let expires_at = Utc::now() + Duration::hours(1);

    token_revocation::revoke(&pool, &jti, expires_at)
        .await
        .expect("revoke");
    token_revocation::revoke(&pool, &jti, expires_at)
        .await
        .expect("repeated revoke");

    assert!(token_revocation::is_revoked(&pool, &jti)
        .await
        .expect("lookup"));

    let entries: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM revoked_tokens WHERE jti = $1")
        .bind(&jti)
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(entries, 1);
}

#[actix_web::test]
async fn cleanup_removes_only_strictly_expired_entries() {
    let Some(pool) = db_pool().await else {
        return;
    };
    let now = Utc::now();

    let past = Uuid::new_v4().to_string();
    let at_now = Uuid::new_v4().to_string();
    let future = Uuid::new_v4().to_string();

    token_revocation::revoke(&pool, &past, now - Duration::hours(1))
        .await
        .expect("revoke");
    token_revocation::revoke(&pool, &at_now, now)
        .await
        .expect("revoke");
    token_revocation::revoke(&pool, &future, now + Duration::hours(1))
        .await
        .expect("revoke");

    token_revocation::cleanup_expired(&pool, now)
        .await
        .expect("cleanup");

    assert!(!token_revocation::is_revoked(&pool, &past)
        .await
        .expect("lookup"));
    // expires_at == now sits on the boundary and must survive.
    assert!(token_revocation::is_revoked(&pool, &at_now)
        .await
        .expect("lookup"));
    assert!(token_revocation::is_revoked(&pool, &future)
        .await
        .expect("lookup"));
}

#[actix_web::test]
async fn revoked_token_is_rejected_even_though_decode_succeeds() {
    let Some(pool) = db_pool().await else {
        return;
    };
    let state = AppState::with_pool(test_config(), pool.clone()).expect("app state");

    let email = format!("revoked-{}@example.com", Uuid::new_v4());
    let user = user_repo::create_user(&pool, &email, "テスト", "hash", "tok")
        .await
        .expect("create user");
    let user = user_repo::mark_email_verified(&pool, user.id)
        .await
        .expect("verify user");

    let (token, claims) = state.jwt.encode(user.id).expect("encode");

    // The token itself stays cryptographically valid.
    assert!(state.jwt.decode(&token).is_ok());

    token_revocation::revoke(&pool, &claims.jti, Utc::now() + Duration::hours(1))
        .await
        .expect("revoke");

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
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
