use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// No bearer token on a protected route.
    #[error("トークンが提供されていません")]
    MissingToken,

    /// Bad signature, malformed structure, expired, revoked, or the user
    /// behind the token no longer exists. One class on purpose: the
    /// response must not reveal which check failed.
    #[error("トークンが無効です")]
    InvalidToken,

    /// Valid token for a real user whose email is unverified.
    #[error("メールアドレスが確認されていません")]
    EmailNotVerified { email: String },

    #[error("メールアドレスまたはパスワードが正しくありません")]
    InvalidCredentials,

    #[error("{0}が見つかりません")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("権限がありません")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Email error: {0}")]
    Email(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

#[derive(Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: ErrorBody,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // Missing and invalid tokens share one status; the pipeline
            // does not distinguish them at HTTP granularity.
            AppError::MissingToken | AppError::InvalidToken => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::EmailNotVerified { .. } => StatusCode::FORBIDDEN,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Database(_) | AppError::Email(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let (message, code, details) = match self {
            AppError::EmailNotVerified { email } => (
                self.to_string(),
                Some("EMAIL_NOT_VERIFIED".to_string()),
                Some(vec![email.clone()]),
            ),
            // Internal failure details stay out of the response body.
            AppError::Database(e) => {
                tracing::error!("database error: {}", e);
                ("サーバーエラーが発生しました".to_string(), None, None)
            }
            AppError::Email(e) => {
                tracing::error!("mailer error: {}", e);
                ("サーバーエラーが発生しました".to_string(), None, None)
            }
            AppError::Internal(e) => {
                tracing::error!("internal error: {}", e);
                ("サーバーエラーが発生しました".to_string(), None, None)
            }
            other => (other.to_string(), None, None),
        };

        HttpResponse::build(status).json(ErrorEnvelope {
            success: false,
            error: ErrorBody {
                message,
                code,
                details,
            },
        })
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{}: {}", field, msg),
                    None => format!("{}が不正です", field),
                })
            })
            .collect();
        AppError::Validation(details.join(", "))
    }
}

impl From<lettre::transport::smtp::Error> for AppError {
    fn from(error: lettre::transport::smtp::Error) -> Self {
        AppError::Email(error.to_string())
    }
}

impl From<lettre::error::Error> for AppError {
    fn from(error: lettre::error::Error) -> Self {
        AppError::Email(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    fn body_json(err: &AppError) -> serde_json::Value {
        let resp = err.error_response();
        let bytes = resp.into_body().try_into_bytes().unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn missing_and_invalid_token_share_status() {
        assert_eq!(
            AppError::MissingToken.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::InvalidToken.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn missing_token_message() {
        let body = body_json(&AppError::MissingToken);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["message"], "トークンが提供されていません");
        assert!(body["error"].get("code").is_none());
    }

    #[test]
    fn email_not_verified_carries_code_and_email() {
        let err = AppError::EmailNotVerified {
            email: "taro@example.com".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        let body = body_json(&err);
        assert_eq!(body["error"]["code"], "EMAIL_NOT_VERIFIED");
        assert_eq!(body["error"]["details"][0], "taro@example.com");
    }

    #[test]
    fn internal_errors_hide_details() {
        let body = body_json(&AppError::Internal("secret detail".to_string()));
        assert_eq!(body["error"]["message"], "サーバーエラーが発生しました");
        assert!(!body.to_string().contains("secret detail"));
    }
}
