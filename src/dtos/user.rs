//! User DTOs - Data Transfer Objects for accounts and login

use crate::entities::{Role, User};
use serde::{Deserialize, Serialize};

// struct to talk with the client
#[derive(Serialize, Deserialize, Debug)]
pub struct UserDTO {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub resident_id: Option<i64>,
}

impl From<User> for UserDTO {
    fn from(value: User) -> Self {
        Self {
            user_id: value.user_id,
            username: value.username,
            role: value.role,
            resident_id: value.resident_id,
        }
    }
}

/// DTO to create a new user (without user_id, password already hashed)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateUserDTO {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub resident_id: Option<i64>,
}

/// Login request, username and password only
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginDTO {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponseDTO {
    pub token: String,
    pub role: Role,
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resident_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flat_number: Option<String>,
}
