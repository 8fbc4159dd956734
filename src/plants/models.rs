//! Plant catalogue models and the external species shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// Plant catalogue row
#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Plant {
    pub id: String,
    pub common_name: String,
    pub family: Option<String>,
    pub cultivar: Option<String>,
    pub species_epithet: Option<String>,
    pub genus: Option<String>,
    pub watering_frequency_days: i32,
    pub sunlight: Option<Vec<String>>,
    pub external_api_id: Option<i64>,
    pub is_custom: bool,
    pub custom_watering_frequency_days: Option<i32>,
    pub default_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload
///
/// Nullable text columns always serialize (as `null` when empty) so rows
/// built from the same source share one column list in a bulk insert.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewPlant {
    pub id: String,
    pub common_name: String,
    pub family: Option<String>,
    pub cultivar: Option<String>,
    pub species_epithet: Option<String>,
    pub genus: Option<String>,
    pub watering_frequency_days: i32,
    pub sunlight: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_api_id: Option<i64>,
    pub is_custom: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_watering_frequency_days: Option<i32>,
    pub default_image: Option<String>,
}

/// POST /api/v1/plants/custom body
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CreateCustomPlantRequest {
    pub common_name: Option<String>,
    pub family: Option<String>,
    pub cultivar: Option<String>,
    pub species_epithet: Option<String>,
    pub genus: Option<String>,
    pub watering_frequency_days: Option<i32>,
    #[serde(default)]
    pub sunlight: Vec<String>,
    pub custom_watering_frequency_days: Option<i32>,
    pub default_image: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ExternalImage {
    #[serde(default)]
    pub regular_url: Option<String>,
}

/// Species summary as returned by the species-list endpoint
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExternalPlant {
    pub id: i64,
    #[serde(default)]
    pub common_name: String,
    #[serde(default)]
    pub scientific_name: Vec<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub cultivar: Option<String>,
    #[serde(default)]
    pub species_epithet: Option<String>,
    #[serde(default)]
    pub genus: Option<String>,
    #[serde(default)]
    pub default_image: Option<ExternalImage>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct WateringBenchmark {
    /// Usually a quoted range such as `"\"7-10\""`, occasionally a number
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Species details; only the care fields used for import are kept
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExternalPlantDetail {
    pub id: i64,
    #[serde(default)]
    pub watering_general_benchmark: Option<WateringBenchmark>,
    #[serde(default)]
    pub sunlight: Vec<String>,
}

impl ExternalPlantDetail {
    /// Benchmark value as text, whatever JSON type it arrived as
    pub fn watering_text(&self) -> Option<String> {
        match self.watering_general_benchmark.as_ref()?.value.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Inclusive watering interval in days
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WateringInterval {
    pub min: u32,
    pub max: u32,
}

/// Search results tagged with where they came from
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "source", content = "data", rename_all = "lowercase")]
pub enum PlantSearch {
    Local(Vec<Plant>),
    External(Vec<ExternalPlant>),
}
