//! Garden and garden-plant models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Garden {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone)]
pub struct NewGarden {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// POST /api/v1/gardens body; the owner is always the caller
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CreateGardenRequest {
    pub name: Option<String>,
    pub location: Option<String>,
}

/// PUT /api/v1/gardens/:garden_id body; absent fields are left untouched
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UpdateGardenRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// A catalogue plant placed in a garden
#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserPlant {
    pub id: String,
    pub garden_id: String,
    pub plant_id: String,
    pub planted_at: DateTime<Utc>,
}

/// One element of the POST /api/v1/user-plants/:garden_id array
#[derive(Deserialize, Debug, Clone)]
pub struct AddUserPlant {
    pub plant_id: String,
    #[serde(default)]
    pub planted_at: Option<DateTime<Utc>>,
}

/// Bulk-insert row; every row carries the same columns
#[derive(Serialize, Debug, Clone)]
pub struct NewUserPlant {
    pub id: String,
    pub garden_id: String,
    pub plant_id: String,
    pub planted_at: DateTime<Utc>,
}
