//! Resident services - directory management for administrators

use crate::core::{AppError, AppState};
use crate::dtos::{CreateResidentDTO, ResidentDTO, UserDTO};
use crate::entities::User;
use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Request body of `POST /admin/residents`: resident details plus its login account
#[derive(Deserialize, Validate)]
pub struct CreateResidentRequestDTO {
    #[validate(nested)]
    #[serde(flatten)]
    pub resident: CreateResidentDTO,

    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,

    #[validate(length(min = 8, max = 72, message = "Password must be between 8 and 72 characters"))]
    pub password: String,
}

#[derive(Serialize)]
pub struct CreatedResidentDTO {
    pub resident: ResidentDTO,
    pub user: UserDTO,
}

#[instrument(skip(state))]
pub async fn list_residents(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ResidentDTO>>, AppError> {
    let residents = state.resident.find_all().await?;
    debug!("Found {} residents", residents.len());
    Ok(Json(residents.into_iter().map(ResidentDTO::from).collect()))
}

#[instrument(skip(state, body), fields(flat_number = %body.resident.flat_number))]
pub async fn create_resident(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateResidentRequestDTO>,
) -> Result<(StatusCode, Json<CreatedResidentDTO>), AppError> {
    body.validate()?;

    if state.user.find_by_username(&body.username).await?.is_some() {
        warn!("Username already taken");
        return Err(AppError::conflict("Username already exists"));
    }
    if state
        .resident
        .find_by_flat_number(&body.resident.flat_number)
        .await?
        .is_some()
    {
        warn!("Flat number already registered");
        return Err(AppError::conflict("Flat number already registered"));
    }

    let password_hash = User::hash_password(&body.password)
        .map_err(|_| AppError::internal_server_error("Failed to hash password"))?;

    let (resident, user) = state
        .resident
        .create_with_account(&body.resident, &body.username, &password_hash)
        .await?;

    info!(resident_id = resident.resident_id, "Resident created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResidentDTO {
            resident: ResidentDTO::from(resident),
            user: UserDTO::from(user),
        }),
    ))
}
