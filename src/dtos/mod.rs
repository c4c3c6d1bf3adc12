//! DTOs module - Data Transfer Objects
//!
//! DTOs separate the external representation (API) from the internal one (entities).

pub mod message;
pub mod resident;
pub mod user;

// Re-exports to simplify imports
pub use message::{
    ConversationDTO, CreateMessageDTO, MessageDTO, ReplyMessageDTO, SendMessageDTO,
};
pub use resident::{CreateResidentDTO, ResidentDTO};
pub use user::{CreateUserDTO, LoginDTO, LoginResponseDTO, UserDTO};

use validator::ValidationError;

/// Rejects strings made only of whitespace (`length(min = 1)` lets them through)
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
