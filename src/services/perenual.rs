// src/services/perenual.rs
//! Perenual species API client

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use crate::plants::models::{ExternalPlant, ExternalPlantDetail};

#[derive(Debug, Error)]
pub enum ExternalApiError {
    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("Invalid response format from external API: {0}")]
    InvalidResponse(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),
}

/// Species lookups used by the plant import flow
#[async_trait]
pub trait SpeciesApi: Send + Sync {
    async fn search_species(&self, query: &str) -> Result<Vec<ExternalPlant>, ExternalApiError>;
    async fn species_details(&self, external_id: i64)
        -> Result<ExternalPlantDetail, ExternalApiError>;
}

#[derive(Debug)]
pub struct PerenualClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PerenualClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(20))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value, ExternalApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ExternalApiError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "Perenual API request failed");
            return Err(ExternalApiError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ExternalApiError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl SpeciesApi for PerenualClient {
    async fn search_species(&self, query: &str) -> Result<Vec<ExternalPlant>, ExternalApiError> {
        let url = format!(
            "{}/species-list?key={}&q={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(query)
        );
        debug!(query = %query, "Searching Perenual species");

        let mut body = self.get_json(&url).await?;
        match body.get_mut("data").map(Value::take) {
            Some(data @ Value::Array(_)) => serde_json::from_value(data)
                .map_err(|e| ExternalApiError::InvalidResponse(e.to_string())),
            _ => Err(ExternalApiError::InvalidResponse(
                "missing data array".to_string(),
            )),
        }
    }

    async fn species_details(
        &self,
        external_id: i64,
    ) -> Result<ExternalPlantDetail, ExternalApiError> {
        let url = format!(
            "{}/species/details/{}?key={}",
            self.base_url,
            external_id,
            urlencoding::encode(&self.api_key)
        );
        debug!(external_id, "Fetching Perenual species details");

        let body = self.get_json(&url).await?;
        serde_json::from_value(body).map_err(|e| ExternalApiError::InvalidResponse(e.to_string()))
    }
}
