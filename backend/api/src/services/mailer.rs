//! Outbound mail. Plain-text bodies only; templating lives elsewhere.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::EmailConfig;
use crate::error::AppError;

pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
    frontend_url: String,
}

impl Mailer {
    /// Without SMTP credentials the mailer degrades to logging, which is
    /// what local development wants.
    pub fn new(config: &EmailConfig, frontend_url: &str) -> Result<Self, AppError> {
        let transport = if config.smtp_username.is_empty() {
            None
        } else {
            let creds =
                Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());
            let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| AppError::Email(e.to_string()))?
                .port(config.smtp_port)
                .credentials(creds)
                .build();
            Some(transport)
        };

        Ok(Self {
            transport,
            from: config.smtp_from.clone(),
            frontend_url: frontend_url.to_string(),
        })
    }

    pub async fn send_verification_email(&self, to: &str, token: &str) -> Result<(), AppError> {
        let link = format!("{}/verify_email?token={}", self.frontend_url, token);
        let body = format!(
            "おうちの畑へようこそ!\n\n以下のリンクからメールアドレスを確認してください(24時間有効):\n{}\n",
            link
        );
        self.send(to, "【おうちの畑】メールアドレスの確認", body).await
    }

    pub async fn send_password_reset_email(&self, to: &str, token: &str) -> Result<(), AppError> {
        let link = format!("{}/reset_password?token={}", self.frontend_url, token);
        let body = format!(
            "パスワード再設定のリクエストを受け付けました。\n\n以下のリンクから再設定してください(2時間有効):\n{}\n\n心当たりがない場合はこのメールを無視してください。\n",
            link
        );
        self.send(to, "【おうちの畑】パスワード再設定", body).await
    }

    async fn send(&self, to: &str, subject: &str, body: String) -> Result<(), AppError> {
        let Some(transport) = &self.transport else {
            tracing::info!("mailer disabled, would send '{}' to {}", subject, to);
            return Ok(());
        };

        let message = Message::builder()
            .from(self.from.parse().map_err(|e| {
                AppError::Email(format!("invalid from address: {}", e))
            })?)
            .to(to
                .parse()
                .map_err(|e| AppError::Email(format!("invalid to address: {}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        transport.send(message).await?;
        Ok(())
    }
}
