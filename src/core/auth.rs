use crate::core::{AppError, AppState};
use crate::entities::Role;
use crate::messaging::{Actor, MessagingError};
use axum::extract::State;
use axum::{body::Body, extract::Request, http, http::HeaderMap, http::Response, middleware::Next};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Extract the token of an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(http::header::AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Some(token),
        _ => None,
    }
}

/// Resolve the bearer token into an [`Actor`] and store it in the request extensions
#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let token = bearer_token(req.headers()).ok_or_else(|| {
        warn!("Missing or malformed authorization header");
        AppError::from(MessagingError::Unauthenticated)
    })?;

    let actor = state.sessions.resolve(token).ok_or_else(|| {
        warn!("Unknown or expired session token");
        AppError::from(MessagingError::Unauthenticated)
    })?;

    info!(user_id = actor.user_id, role = ?actor.role, "User authenticated");
    req.extensions_mut().insert(actor);
    Ok(next.run(req).await)
}

/// Middleware that lets only administrators through.
/// Must run after [`authentication_middleware`].
#[instrument(skip(req, next))]
pub async fn admin_middleware(req: Request, next: Next) -> Result<Response<Body>, AppError> {
    let actor = req.extensions().get::<Actor>().ok_or_else(|| {
        warn!("Actor not found in request extensions");
        AppError::from(MessagingError::Unauthenticated)
    })?;

    require_role(actor, &[Role::Admin])?;
    Ok(next.run(req).await)
}

/// Helper to verify that an actor has one of the required roles
///
/// # Returns
/// * `Ok(())` if the role is allowed
/// * `Err(AppError)` otherwise
pub fn require_role(actor: &Actor, allowed_roles: &[Role]) -> Result<(), AppError> {
    if !allowed_roles.contains(&actor.role) {
        warn!(
            "User {} has insufficient role {:?}, required one of: {:?}",
            actor.user_id, actor.role, allowed_roles
        );
        return Err(AppError::forbidden("Insufficient role").with_details(format!(
            "This action requires one of the following roles: {:?}",
            allowed_roles
        )));
    }

    debug!("Role check passed for user {} with role {:?}", actor.user_id, actor.role);
    Ok(())
}
