//! Server library - exposes the main modules for the tests

pub mod core;
pub mod dtos;
pub mod entities;
pub mod messaging;
pub mod repositories;
pub mod services;

// Re-exports of the main types to simplify imports
pub use crate::core::{AppError, AppState, Config};
pub use services::root;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use dtos::CreateUserDTO;
use entities::{Role, User};
use repositories::Create;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Builds the main router of the application
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/auth", configure_auth_routes())
        .nest("/admin", configure_admin_routes(state.clone()))
        .nest("/residents", configure_resident_routes(state.clone()))
        .nest("/messages", configure_message_routes(state.clone()))
        .with_state(state)
}

/// Login is public, logout reads the bearer token itself
fn configure_auth_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/login", post(login_user))
        .route("/logout", post(logout_user))
}

/// Administrator-only routes (authentication + admin middleware)
fn configure_admin_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::{admin_middleware, authentication_middleware};
    use services::*;

    Router::new()
        .route("/residents", get(list_residents).post(create_resident))
        .route("/messages", get(list_all_messages).post(send_message))
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(state, authentication_middleware))
}

fn configure_resident_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/{resident_id}/conversations", get(get_resident_conversations))
        .layer(middleware::from_fn_with_state(state, authentication_middleware))
}

/// Thread routes, authorization is decided per message by the messaging guard
fn configure_message_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/{message_id}/thread", get(get_thread))
        .route("/{message_id}/replies", post(reply_to_message))
        .route("/{message_id}/read", put(mark_message_read))
        .layer(middleware::from_fn_with_state(state, authentication_middleware))
}

/// CORS policy: a single allowed origin when configured, any origin otherwise
pub fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => cors.allow_origin(origin),
        Some(Err(_)) => {
            warn!("Invalid CORS_ORIGIN, allowing any origin");
            cors.allow_origin(Any)
        }
        None => cors.allow_origin(Any),
    }
}

/// Creates the administrator account if no user with that name exists yet
///
/// # Returns
/// * `Ok(true)` - The account was created
/// * `Ok(false)` - The username was already taken
pub async fn ensure_admin_account(
    state: &AppState,
    username: &str,
    password: &str,
) -> Result<bool, Box<dyn std::error::Error>> {
    if let Some(existing) = state.user.find_by_username(username).await? {
        if existing.role != Role::Admin {
            warn!("Bootstrap username {} belongs to a resident account", username);
        }
        return Ok(false);
    }

    let admin = state
        .user
        .create(&CreateUserDTO {
            username: username.to_string(),
            password: User::hash_password(password)?,
            role: Role::Admin,
            resident_id: None,
        })
        .await?;

    info!(user_id = admin.user_id, "Administrator account created");
    Ok(true)
}
