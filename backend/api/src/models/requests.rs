//! Request payloads. Validation mirrors the model constraints; handlers call
//! `validate()` before touching persistence.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "メールアドレスの形式が正しくありません"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "名前は1〜100文字で入力してください"))]
    pub name: String,

    #[validate(length(min = 8, message = "パスワードは8文字以上で入力してください"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct OauthLoginRequest {
    #[validate(length(min = 1))]
    pub provider_token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(length(min = 1))]
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResendVerificationRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1))]
    pub token: String,

    #[validate(length(min = 8, message = "パスワードは8文字以上で入力してください"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlantRequest {
    #[validate(length(min = 1, max = 100, message = "名前は1〜100文字で入力してください"))]
    pub name: String,

    #[validate(length(max = 100))]
    pub variety: Option<String>,

    pub planted_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePlantRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 100))]
    pub variety: Option<String>,

    pub planted_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateGrowthRecordRequest {
    #[validate(length(min = 1, message = "記録内容を入力してください"))]
    pub note: String,

    pub recorded_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateGrowthRecordRequest {
    #[validate(length(min = 1))]
    pub note: Option<String>,

    pub recorded_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 200, message = "タイトルは1〜200文字で入力してください"))]
    pub title: String,

    #[validate(length(min = 1, message = "本文を入力してください"))]
    pub body: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1))]
    pub body: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "コメントを入力してください"))]
    pub body: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateGuideRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 100))]
    pub plant_name: String,

    #[validate(length(min = 1))]
    pub body: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateGuideRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub plant_name: Option<String>,

    #[validate(length(min = 1))]
    pub body: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GuideQuery {
    pub plant_name: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl GuideQuery {
    pub fn paging(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(20).clamp(1, 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_rejects_short_password() {
        let req = RegisterRequest {
            email: "taro@example.com".to_string(),
            name: "太郎".to_string(),
            password: "short".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn register_rejects_bad_email() {
        let req = RegisterRequest {
            email: "not-an-email".to_string(),
            name: "太郎".to_string(),
            password: "password123".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn page_query_clamps() {
        let q = PageQuery {
            page: Some(0),
            per_page: Some(1000),
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.per_page(), 100);
    }
}
