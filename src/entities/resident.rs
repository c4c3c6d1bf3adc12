//! Resident entity - one household of the property

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Resident {
    pub resident_id: i64,
    pub name: String,
    pub flat_number: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}
