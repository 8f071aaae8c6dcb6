//! Public-transit travel times between activities, from the Distance Matrix API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared::schedule::TravelLeg;
use tracing::{debug, warn};
use url::Url;

use crate::{decode, ClientError, Result};

pub const DISTANCE_MATRIX_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";
pub const TRAVEL_TIME_UNAVAILABLE: &str = "Travel time unavailable";

#[async_trait]
pub trait TravelTimeApi: Send + Sync {
    /// Human-readable summary such as `25 mins (5.2 km)`.
    async fn travel_time(&self, leg: &TravelLeg) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct TransitClient {
    http: Client,
    api_key: String,
    endpoint: Url,
}

impl TransitClient {
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_endpoint(Client::new(), api_key, DISTANCE_MATRIX_URL)
    }

    pub fn with_endpoint(http: Client, api_key: &str, endpoint: &str) -> Result<Self> {
        let endpoint =
            Url::parse(endpoint).map_err(|_| ClientError::InvalidBaseUrl(endpoint.to_string()))?;
        Ok(Self {
            http,
            api_key: api_key.trim().to_string(),
            endpoint,
        })
    }

    fn request_url(&self, leg: &TravelLeg) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("origins", &leg.origin_query())
            .append_pair("destinations", &leg.destination_query())
            .append_pair("mode", "transit")
            .append_pair("language", "en")
            .append_pair("key", &self.api_key);
        url
    }
}

#[async_trait]
impl TravelTimeApi for TransitClient {
    async fn travel_time(&self, leg: &TravelLeg) -> Result<String> {
        let response = self.http.get(self.request_url(leg)).send().await?;
        if !response.status().is_success() {
            warn!(status = %response.status(), "distance matrix rejected");
            return Err(ClientError::Request(TRAVEL_TIME_UNAVAILABLE.to_string()));
        }
        let matrix: MatrixResponse = decode(response, "distance matrix").await?;
        match matrix.summary() {
            Some(summary) => Ok(summary),
            None => {
                debug!(
                    status = %matrix.status,
                    origin = %leg.origin,
                    destination = %leg.destination,
                    "no transit route"
                );
                Err(ClientError::Request(TRAVEL_TIME_UNAVAILABLE.to_string()))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    duration: Option<TextValue>,
    distance: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
}

impl MatrixResponse {
    fn summary(&self) -> Option<String> {
        if self.status != "OK" {
            return None;
        }
        let element = self.rows.first()?.elements.first()?;
        if element.status != "OK" {
            return None;
        }
        let duration = &element.duration.as_ref()?.text;
        Some(match &element.distance {
            Some(distance) => format!("{duration} ({})", distance.text),
            None => duration.clone(),
        })
    }
}

#[cfg(test)]
#[path = "tests/transit_tests.rs"]
mod tests;
