pub mod audit;
pub mod mailer;
pub mod oauth;
pub mod verification;
