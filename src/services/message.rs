//! Message services - threads, replies, read state and conversations

use crate::core::{AppError, AppState};
use crate::dtos::{ConversationDTO, MessageDTO, ReplyMessageDTO, SendMessageDTO};
use crate::messaging::{self, Actor, MessagingError, guard};
use axum::{
    Extension,
    extract::{Json, Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, actor, body), fields(user_id = %actor.user_id))]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>, // set by authentication_middleware
    Json(body): Json<SendMessageDTO>,
) -> Result<(StatusCode, Json<MessageDTO>), AppError> {
    // 1. Validate the request
    // 2. Resolve the recipient: explicit resident id, or flat number through the directory
    // 3. Let the engine authorize and store the new thread
    body.validate()?;

    let recipient_resident_id = match (body.recipient_resident_id, body.flat_number.as_deref()) {
        (Some(resident_id), None) => resident_id,
        (None, Some(flat_number)) => state
            .resident
            .find_by_flat_number(flat_number)
            .await?
            .map(|resident| resident.resident_id)
            .ok_or_else(|| {
                warn!("No resident for flat number {}", flat_number);
                AppError::not_found("Resident not found")
            })?,
        _ => {
            return Err(AppError::bad_request("Validation error").with_details(
                "Exactly one of recipient_resident_id and flat_number must be given",
            ));
        }
    };

    let message = state
        .engine
        .send_initial(&actor, recipient_resident_id, &body.subject, &body.body)
        .await?;

    Ok((StatusCode::CREATED, Json(MessageDTO::from(message))))
}

#[instrument(skip(state, actor, body), fields(user_id = %actor.user_id, parent_message_id = %message_id))]
pub async fn reply_to_message(
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<i64>,
    Extension(actor): Extension<Actor>,
    Json(body): Json<ReplyMessageDTO>,
) -> Result<(StatusCode, Json<MessageDTO>), AppError> {
    body.validate()?;

    let reply = state
        .engine
        .reply(&actor, message_id, &body.body, body.subject.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(MessageDTO::from(reply))))
}

#[instrument(skip(state, actor), fields(user_id = %actor.user_id, message_id = %message_id))]
pub async fn mark_message_read(
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<i64>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<MessageDTO>, AppError> {
    let message = state.engine.mark_read(&actor, message_id).await?;
    Ok(Json(MessageDTO::from(message)))
}

#[instrument(skip(state, actor), fields(user_id = %actor.user_id, thread_id = %message_id))]
pub async fn get_thread(
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<i64>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ConversationDTO>, AppError> {
    let thread = messaging::thread_by_initial_id(&state.msg, message_id)
        .await?
        .ok_or(MessagingError::MessageNotFound(message_id))?;
    // a thread outside the caller's reach looks exactly like a missing one
    guard::can_view_thread(&actor, thread.root()).map_err(|_| {
        warn!("Thread requested by a non-party");
        MessagingError::MessageNotFound(message_id)
    })?;

    debug!("Thread has {} messages", thread.messages().len());
    Ok(Json(ConversationDTO::from(thread)))
}

#[instrument(skip(state, actor), fields(user_id = %actor.user_id, resident_id = %resident_id))]
pub async fn get_resident_conversations(
    State(state): State<Arc<AppState>>,
    Path(resident_id): Path<i64>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<ConversationDTO>>, AppError> {
    // 1. Residents may only read their own conversations, admins any
    // 2. Find the login account of the resident for the legacy threads it started
    // 3. Assemble and convert, most recently active first
    guard::can_view_conversations(&actor, resident_id)?;

    let resident_user_id = if actor.own_resident_id() == Some(resident_id) {
        Some(actor.user_id)
    } else {
        if !state.resident.exists(&resident_id).await? {
            return Err(MessagingError::ResidentNotFound(resident_id).into());
        }
        state.user.user_id_for_resident(&resident_id).await?
    };

    let conversations =
        messaging::conversations_for_resident(&state.msg, resident_id, resident_user_id).await?;

    info!("Retrieved {} conversations", conversations.len());
    Ok(Json(conversations.into_iter().map(ConversationDTO::from).collect()))
}

#[instrument(skip(state))]
pub async fn list_all_messages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MessageDTO>>, AppError> {
    let messages = messaging::all_messages(&state.msg).await?;
    debug!("Retrieved {} messages", messages.len());
    Ok(Json(messages.into_iter().map(MessageDTO::from).collect()))
}
