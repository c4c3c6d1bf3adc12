//! Services module - HTTP handlers
//!
//! Each sub-module handles the endpoints of one feature. Handlers only
//! translate HTTP to calls into the messaging core and back.

pub mod auth;
pub mod message;
pub mod resident;

// Re-exports to simplify imports
pub use auth::{login_user, logout_user};
pub use message::{
    get_resident_conversations, get_thread, list_all_messages, mark_message_read,
    reply_to_message, send_message,
};
pub use resident::{create_resident, list_residents};

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
