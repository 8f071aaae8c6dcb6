use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{ItineraryItem, Trip},
    error::ErrorBody,
    protocol::{CreateTripResponse, HealthResponse, NewItemDraft, NewTripDraft},
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub mod config;
pub mod transit;

pub const LIST_TRIPS_FAILED: &str = "Failed to fetch trips";
pub const CREATE_TRIP_FAILED: &str = "Failed to create trip";
pub const LIST_ITINERARY_FAILED: &str = "Failed to fetch itinerary";
pub const ADD_ITEM_FAILED: &str = "Failed to add itinerary item";
pub const HEALTH_FAILED: &str = "Backend health check failed";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-success status.
    #[error("{0}")]
    Request(String),
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to reach server: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server url '{0}' cannot carry API paths")]
    InvalidBaseUrl(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// The four backend operations the planner UI depends on.
#[async_trait]
pub trait TripApi: Send + Sync {
    async fn list_trips(&self) -> Result<Vec<Trip>>;
    async fn create_trip(&self, draft: &NewTripDraft) -> Result<Trip>;
    async fn list_itinerary(&self, trip_name: &str) -> Result<Vec<ItineraryItem>>;
    async fn add_itinerary_item(&self, trip_name: &str, draft: &NewItemDraft) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct TripClient {
    http: Client,
    base: Url,
}

impl TripClient {
    pub fn new(server_url: &str) -> Result<Self> {
        Self::with_http(Client::new(), server_url)
    }

    pub fn with_http(http: Client, server_url: &str) -> Result<Self> {
        let base = Url::parse(server_url.trim())
            .map_err(|_| ClientError::InvalidBaseUrl(server_url.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(server_url.to_string()));
        }
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Appends `segments` to the base path, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn itinerary_endpoint(&self, trip_name: &str) -> Result<Url> {
        self.endpoint(&["api", "trips", trip_name, "itinerary"])
    }

    pub async fn health(&self) -> Result<bool> {
        let response = self.http.get(self.endpoint(&["api", "health"])?).send().await?;
        if !response.status().is_success() {
            warn!(status = %response.status(), "health check rejected");
            return Err(ClientError::Request(HEALTH_FAILED.to_string()));
        }
        let body: HealthResponse = decode(response, "health response").await?;
        Ok(body.ok)
    }
}

#[async_trait]
impl TripApi for TripClient {
    async fn list_trips(&self) -> Result<Vec<Trip>> {
        let response = self.http.get(self.endpoint(&["api", "trips"])?).send().await?;
        if !response.status().is_success() {
            warn!(status = %response.status(), "list trips rejected");
            return Err(ClientError::Request(LIST_TRIPS_FAILED.to_string()));
        }
        let trips: Vec<Trip> = decode(response, "trip list").await?;
        debug!(count = trips.len(), "fetched trips");
        Ok(trips)
    }

    async fn create_trip(&self, draft: &NewTripDraft) -> Result<Trip> {
        let response = self
            .http
            .post(self.endpoint(&["api", "trips"])?)
            .json(draft)
            .send()
            .await?;
        if !response.status().is_success() {
            warn!(status = %response.status(), trip = %draft.name, "create trip rejected");
            return Err(ClientError::Request(
                failure_message(response, CREATE_TRIP_FAILED).await,
            ));
        }
        let created: CreateTripResponse = decode(response, "created trip").await?;
        Ok(created.into_trip())
    }

    async fn list_itinerary(&self, trip_name: &str) -> Result<Vec<ItineraryItem>> {
        let response = self
            .http
            .get(self.itinerary_endpoint(trip_name)?)
            .send()
            .await?;
        if !response.status().is_success() {
            warn!(status = %response.status(), trip = trip_name, "list itinerary rejected");
            return Err(ClientError::Request(LIST_ITINERARY_FAILED.to_string()));
        }
        let items: Vec<ItineraryItem> = decode(response, "itinerary").await?;
        debug!(trip = trip_name, count = items.len(), "fetched itinerary");
        Ok(items)
    }

    async fn add_itinerary_item(&self, trip_name: &str, draft: &NewItemDraft) -> Result<()> {
        let response = self
            .http
            .post(self.itinerary_endpoint(trip_name)?)
            .json(draft)
            .send()
            .await?;
        if !response.status().is_success() {
            warn!(status = %response.status(), trip = trip_name, "add itinerary item rejected");
            return Err(ClientError::Request(
                failure_message(response, ADD_ITEM_FAILED).await,
            ));
        }
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response, what: &'static str) -> Result<T> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|source| ClientError::Decode { what, source })
}

async fn failure_message(response: Response, fallback: &str) -> String {
    match response.bytes().await {
        Ok(body) => ErrorBody::message_or(&body, fallback),
        Err(_) => fallback.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
