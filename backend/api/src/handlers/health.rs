use actix_web::HttpResponse;
use serde_json::json;

use crate::response;

pub async fn health_check() -> HttpResponse {
    response::ok(json!({ "status": "ok" }))
}
