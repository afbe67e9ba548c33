//! Authenticated-request pipeline. Per request: extract the bearer token,
//! decode it, consult the revocation list, load the user, then apply the
//! email-verification gate. Any step can short-circuit; missing token,
//! undecodable token, revoked token, and vanished user all surface as the
//! same client-error class so the response never reveals which check
//! failed.
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::app_state::AppState;
use crate::db::{token_revocation, user_repo};
use crate::error::AppError;
use crate::models::User;
use crate::security::jwt::Claims;
use crate::services::audit;

/// Authenticated caller, bound to the request after the pipeline passes.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub claims: Claims,
}

impl CurrentUser {
    pub fn id(&self) -> i64 {
        self.user.id
    }
}

/// Authentication middleware factory.
///
/// The default construction also enforces the email-verification gate;
/// `allow_unverified()` is used on the small set of auth-flow endpoints
/// (logout, "who am I", resend verification) that must stay reachable for
/// users who have not verified yet.
pub struct AuthMiddleware {
    require_verified: bool,
}

impl AuthMiddleware {
    pub fn new() -> Self {
        Self {
            require_verified: true,
        }
    }

    pub fn allow_unverified() -> Self {
        Self {
            require_verified: false,
        }
    }
}

impl Default for AuthMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            require_verified: self.require_verified,
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    require_verified: bool,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let require_verified = self.require_verified;

        // Copy everything needed out of the request up front; extensions_mut
        // later takes a mutable borrow.
        let auth_header = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);
        let ip = req
            .connection_info()
            .realip_remote_addr()
            .map(str::to_string);
        let user_agent = req
            .headers()
            .get("User-Agent")
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);

        Box::pin(async move {
            let state = req
                .app_data::<actix_web::web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| {
                    Error::from(AppError::Internal("app state not configured".to_string()))
                })?;

            let ctx = audit::AuthAttempt {
                pool: state.db.clone(),
                ip,
                user_agent,
            };

            // 1. Bearer token present? Rejected before any persistence
            //    access when absent.
            let token = match auth_header
                .as_deref()
                .and_then(|h| h.strip_prefix("Bearer "))
                .filter(|t| !t.is_empty())
            {
                Some(t) => t.to_string(),
                None => {
                    ctx.record("auth.missing_token", None, false);
                    return Err(AppError::MissingToken.into());
                }
            };

            // 2. Signature, structure, expiry.
            let claims = match state.jwt.decode(&token) {
                Ok(c) => c,
                Err(_) => {
                    ctx.record("auth.invalid_token", None, false);
                    return Err(AppError::InvalidToken.into());
                }
            };

            // 3. A decodable token can still have been revoked at logout.
            match token_revocation::is_revoked(&state.db, &claims.jti).await {
                Ok(false) => {}
                Ok(true) => {
                    ctx.record("auth.revoked_token", Some(claims.user_id), false);
                    return Err(AppError::InvalidToken.into());
                }
                Err(e) => {
                    tracing::error!("revocation lookup failed: {}", e);
                    return Err(AppError::Database(e).into());
                }
            }

            // 4. Same error class as 2/3 when the user is gone; no oracle.
            let user = match user_repo::find_by_id(&state.db, claims.user_id).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    ctx.record("auth.unknown_user", Some(claims.user_id), false);
                    return Err(AppError::InvalidToken.into());
                }
                Err(e) => {
                    tracing::error!("user lookup failed: {}", e);
                    return Err(AppError::Database(e).into());
                }
            };

            // 5. Verification gate, skipped on the exempt auth endpoints.
            if require_verified && !user.email_verified {
                ctx.record("auth.email_not_verified", Some(user.id), false);
                return Err(AppError::EmailNotVerified { email: user.email }.into());
            }

            ctx.record("auth.success", Some(user.id), true);

            req.extensions_mut().insert(CurrentUser { user, claims });
            service.call(req).await
        })
    }
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<CurrentUser>().cloned() {
            Some(current) => ready(Ok(current)),
            None => ready(Err(AppError::MissingToken.into())),
        }
    }
}
