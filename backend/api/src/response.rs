//! Uniform success envelope: `{"success": true, "data": ..., "meta"?: {...}}`.

use actix_web::HttpResponse;
use serde::Serialize;
use serde_json::json;

pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": true, "data": data }))
}

pub fn created<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(json!({ "success": true, "data": data }))
}

pub fn ok_with_meta<T: Serialize, M: Serialize>(data: T, meta: M) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": true, "data": data, "meta": meta }))
}

/// Offset pagination metadata for list endpoints.
#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

impl PageMeta {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        Self {
            page,
            per_page,
            total,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    #[test]
    fn envelope_shape() {
        let resp = ok(json!({"id": 1}));
        let bytes = resp.into_body().try_into_bytes().unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["id"], 1);
        assert!(body.get("meta").is_none());
    }

    #[test]
    fn meta_offset() {
        let meta = PageMeta::new(3, 20, 100);
        assert_eq!(meta.offset(), 40);
    }
}
