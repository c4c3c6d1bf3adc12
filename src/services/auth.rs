//! Auth services - login and logout

use crate::core::{AppError, AppState, bearer_token};
use crate::dtos::{LoginDTO, LoginResponseDTO};
use crate::messaging::{Actor, MessagingError};
use crate::repositories::Read;
use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginDTO>,
) -> Result<Json<LoginResponseDTO>, AppError> {
    // 1. Look the user up by username, unknown users get the same error as a wrong password
    // 2. Verify the password against the stored bcrypt hash
    // 3. Open a session for the actor and hand the token back
    // 4. Residents also get their resident id and flat number
    let user = match state.user.find_by_username(&body.username).await? {
        Some(user) if user.verify_password(&body.password) => user,
        _ => {
            warn!("Invalid credentials");
            return Err(AppError::unauthorized("Invalid username or password"));
        }
    };

    let actor = Actor::from(&user);
    let token = state.sessions.create(actor);

    let flat_number = match user.resident_id {
        Some(resident_id) => state
            .resident
            .read(&resident_id)
            .await?
            .map(|resident| resident.flat_number),
        None => None,
    };

    info!(user_id = user.user_id, "User logged in");
    Ok(Json(LoginResponseDTO {
        token,
        role: user.role,
        user_id: user.user_id,
        resident_id: user.resident_id,
        flat_number,
    }))
}

#[instrument(skip(state, headers))]
pub async fn logout_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let token = bearer_token(&headers).ok_or(MessagingError::Unauthenticated)?;

    if !state.sessions.revoke(token) {
        warn!("Logout with unknown token");
        return Err(MessagingError::Unauthenticated.into());
    }

    info!("User logged out");
    Ok((StatusCode::OK, "Logged out successfully"))
}
