use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::audit::{ActorId, ActorResolver};
use crate::auth::ROLE_ADMIN;
use crate::auth::jwt;
use crate::error::AppError;
use crate::state::SharedState;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: String,
}

impl AuthUser {
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == ROLE_ADMIN {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
    }
}

/// The authenticated caller is the actor for every write made in its request.
impl ActorResolver for AuthUser {
    fn resolve(&self) -> ActorId {
        ActorId::from_uuid(self.user_id)
    }
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        // Try Bearer token from Authorization header first
        if let Some(auth_header) = parts.headers.get("authorization") {
            let auth_str = auth_header
                .to_str()
                .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return user_from_token(token, &state.config.jwt_secret);
            }
        }

        // Try cookie-based auth
        let jar = CookieJar::from_headers(&parts.headers);
        if let Some(cookie) = jar.get("access_token") {
            return user_from_token(cookie.value(), &state.config.jwt_secret);
        }

        Err(AppError::Unauthorized(
            "Missing authentication token".to_string(),
        ))
    }
}

fn user_from_token(token: &str, secret: &str) -> Result<AuthUser, AppError> {
    let claims = jwt::decode_token(token, secret)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    Ok(AuthUser {
        user_id: claims.sub,
        role: claims.role,
    })
}
