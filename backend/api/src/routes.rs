//! Route configuration
//!
//! Centralized route setup; each domain configures its own scope. The
//! email-verification gate is expressed structurally: scopes wrapped with
//! `AuthMiddleware::new()` require a verified address, the auth scope's
//! token-bearing routes (logout, me) use `allow_unverified()` instead.

use crate::handlers;
use crate::middleware::AuthMiddleware;
use actix_web::web;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(handlers::health::health_check))
            .configure(routes::auth::configure)
            .configure(routes::users::configure)
            .configure(routes::plants::configure)
            .configure(routes::growth_records::configure)
            .configure(routes::posts::configure)
            .configure(routes::comments::configure)
            .configure(routes::guides::configure)
            .configure(routes::notifications::configure)
            .configure(routes::admin::configure),
    );
}

// Sub-modules for each domain
mod routes {
    use super::*;

    pub mod auth {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/auth")
                    .route("/register", web::post().to(handlers::auth::register))
                    .route("/login", web::post().to(handlers::auth::login))
                    .route("/oauth", web::post().to(handlers::auth::oauth_login))
                    .route("/verify_email", web::post().to(handlers::auth::verify_email))
                    .route(
                        "/resend_verification",
                        web::post().to(handlers::auth::resend_verification),
                    )
                    .route(
                        "/forgot_password",
                        web::post().to(handlers::auth::forgot_password),
                    )
                    .route(
                        "/reset_password",
                        web::post().to(handlers::auth::reset_password),
                    )
                    .service(
                        web::scope("")
                            .wrap(AuthMiddleware::allow_unverified())
                            .route("/logout", web::post().to(handlers::auth::logout))
                            .route("/me", web::get().to(handlers::auth::me)),
                    ),
            );
        }
    }

    pub mod users {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/users")
                    .wrap(AuthMiddleware::new())
                    .route("/me", web::patch().to(handlers::users::update_me))
                    .route("/{id}", web::get().to(handlers::users::get_user))
                    .route("/{id}/follow", web::post().to(handlers::users::follow))
                    .route("/{id}/follow", web::delete().to(handlers::users::unfollow))
                    .route("/{id}/followers", web::get().to(handlers::users::followers))
                    .route("/{id}/following", web::get().to(handlers::users::following)),
            );
        }
    }

    pub mod plants {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/plants")
                    .wrap(AuthMiddleware::new())
                    .route("", web::get().to(handlers::plants::list_plants))
                    .route("", web::post().to(handlers::plants::create_plant))
                    .route("/{id}", web::get().to(handlers::plants::get_plant))
                    .route("/{id}", web::patch().to(handlers::plants::update_plant))
                    .route("/{id}", web::delete().to(handlers::plants::delete_plant))
                    .route(
                        "/{id}/growth_records",
                        web::get().to(handlers::growth_records::list_records),
                    )
                    .route(
                        "/{id}/growth_records",
                        web::post().to(handlers::growth_records::create_record),
                    ),
            );
        }
    }

    pub mod growth_records {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/growth_records")
                    .wrap(AuthMiddleware::new())
                    .route(
                        "/{id}",
                        web::patch().to(handlers::growth_records::update_record),
                    )
                    .route(
                        "/{id}",
                        web::delete().to(handlers::growth_records::delete_record),
                    ),
            );
        }
    }

    pub mod posts {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/posts")
                    .wrap(AuthMiddleware::new())
                    .route("", web::get().to(handlers::posts::list_posts))
                    .route("", web::post().to(handlers::posts::create_post))
                    .route("/{id}", web::get().to(handlers::posts::get_post))
                    .route("/{id}", web::patch().to(handlers::posts::update_post))
                    .route("/{id}", web::delete().to(handlers::posts::delete_post))
                    .route("/{id}/like", web::post().to(handlers::posts::like_post))
                    .route("/{id}/like", web::delete().to(handlers::posts::unlike_post))
                    .route(
                        "/{id}/comments",
                        web::get().to(handlers::comments::list_comments),
                    )
                    .route(
                        "/{id}/comments",
                        web::post().to(handlers::comments::create_comment),
                    ),
            );
        }
    }

    pub mod comments {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/comments")
                    .wrap(AuthMiddleware::new())
                    .route("/{id}", web::delete().to(handlers::comments::delete_comment)),
            );
        }
    }

    pub mod guides {
        use super::*;
        // Reading guides is public; writing requires a verified account.
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/guides")
                    .route("", web::get().to(handlers::guides::list_guides))
                    .route("/{id}", web::get().to(handlers::guides::get_guide))
                    .service(
                        web::scope("")
                            .wrap(AuthMiddleware::new())
                            .route("", web::post().to(handlers::guides::create_guide))
                            .route("/{id}", web::patch().to(handlers::guides::update_guide))
                            .route("/{id}", web::delete().to(handlers::guides::delete_guide)),
                    ),
            );
        }
    }

    pub mod notifications {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/notifications")
                    .wrap(AuthMiddleware::new())
                    .route(
                        "",
                        web::get().to(handlers::notifications::list_notifications),
                    )
                    .route(
                        "/unread_count",
                        web::get().to(handlers::notifications::unread_count),
                    )
                    .route(
                        "/read_all",
                        web::patch().to(handlers::notifications::mark_all_read),
                    )
                    .route(
                        "/{id}/read",
                        web::patch().to(handlers::notifications::mark_read),
                    ),
            );
        }
    }

    pub mod admin {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/admin")
                    .wrap(AuthMiddleware::new())
                    .route(
                        "/growth_records/resequence",
                        web::post().to(handlers::growth_records::resequence_all),
                    ),
            );
        }
    }
}
