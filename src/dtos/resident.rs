//! Resident DTOs - Data Transfer Objects for the resident directory

use crate::entities::Resident;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug)]
pub struct ResidentDTO {
    pub resident_id: i64,
    pub name: String,
    pub flat_number: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<Resident> for ResidentDTO {
    fn from(value: Resident) -> Self {
        Self {
            resident_id: value.resident_id,
            name: value.name,
            flat_number: value.flat_number,
            email: value.email,
            phone: value.phone,
        }
    }
}

/// DTO to create a new resident (without resident_id)
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateResidentDTO {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 32, message = "Flat number must be between 1 and 32 characters"))]
    pub flat_number: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(length(max = 32, message = "Phone must be at most 32 characters"))]
    pub phone: Option<String>,
}
