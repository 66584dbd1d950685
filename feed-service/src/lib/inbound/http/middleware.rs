use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::AuthenticatedUser;
use crate::domain::user::models::RoleName;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Roles allowed through [`require_moderator`].
const MODERATION_ROLES: &[RoleName] = &[RoleName::Moderator, RoleName::Admin];

/// Middleware that validates the bearer token and stores the caller as an
/// [`AuthenticatedUser`] in request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    let claims = state.authenticator.validate_header(header).map_err(|e| {
        tracing::warn!(error = %e, "bearer token rejected");
        ApiError::Unauthorized("Invalid or expired token".to_string())
    })?;

    let user = principal_from_claims(&claims)?;
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Role guard for moderation routes. Must run after [`authenticate`].
pub async fn require_moderator(req: Request, next: Next) -> Result<Response, ApiError> {
    let user = req
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

    ensure_role(user, MODERATION_ROLES)?;

    Ok(next.run(req).await)
}

fn ensure_role(user: &AuthenticatedUser, allowed: &[RoleName]) -> Result<(), ApiError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.user_id, role = %user.role, "role not allowed");
        Err(ApiError::Forbidden(format!(
            "Role {} is not allowed to perform this action",
            user.role
        )))
    }
}

fn principal_from_claims(claims: &auth::Claims) -> Result<AuthenticatedUser, ApiError> {
    let invalid = |reason: String| {
        tracing::error!(reason = %reason, "malformed token claims");
        ApiError::Unauthorized("Invalid token format".to_string())
    };

    let user_id = UserId::from_string(&claims.sub).map_err(|e| invalid(e.to_string()))?;
    let role = claims
        .role
        .parse::<RoleName>()
        .map_err(|e| invalid(e.to_string()))?;
    let username = claims.username().unwrap_or_default();

    Ok(AuthenticatedUser {
        user_id,
        username,
        role,
    })
}
