pub mod auth;
pub mod comments;
pub mod growth_records;
pub mod guides;
pub mod health;
pub mod notifications;
pub mod plants;
pub mod posts;
pub mod users;
