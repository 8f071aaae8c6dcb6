//! In-memory backend used by controller and worker tests.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use client_core::{transit::TravelTimeApi, ClientError, Result, TripApi};
use shared::{
    domain::{Country, ItineraryItem, TravelDetails, Trip},
    protocol::{NewItemDraft, NewTripDraft},
    schedule::TravelLeg,
};

#[derive(Debug, Default)]
pub(crate) struct Backend {
    pub trips: Vec<Trip>,
    pub itineraries: HashMap<String, Vec<ItineraryItem>>,
    /// Per-operation failure messages, keyed by operation name.
    pub failures: HashMap<&'static str, String>,
    pub calls: Vec<String>,
}

#[derive(Debug, Default)]
pub(crate) struct FakeApi {
    backend: Mutex<Backend>,
}

impl FakeApi {
    pub fn with_trips(names: &[&str]) -> Self {
        let api = Self::default();
        api.backend().trips = names.iter().map(|name| trip(name)).collect();
        api
    }

    pub fn backend(&self) -> MutexGuard<'_, Backend> {
        self.backend.lock().expect("fake backend lock")
    }

    pub fn calls(&self) -> Vec<String> {
        self.backend().calls.clone()
    }

    pub fn fail(&self, operation: &'static str, message: &str) {
        self.backend()
            .failures
            .insert(operation, message.to_string());
    }

    pub fn recover(&self, operation: &'static str) {
        self.backend().failures.remove(operation);
    }

    fn record(&self, call: String, operation: &'static str) -> Result<MutexGuard<'_, Backend>> {
        let mut backend = self.backend();
        backend.calls.push(call);
        if let Some(message) = backend.failures.get(operation).cloned() {
            return Err(ClientError::Request(message));
        }
        Ok(backend)
    }
}

pub(crate) fn trip(name: &str) -> Trip {
    Trip {
        name: name.to_string(),
        start_date: "2025-04-01".to_string(),
        end_date: "2025-04-03".to_string(),
        country: Country::Japan,
        details: TravelDetails::default(),
    }
}

pub(crate) fn item(date: &str, start_time: &str, activity: &str) -> ItineraryItem {
    ItineraryItem {
        date: date.to_string(),
        start_time: start_time.to_string(),
        end_time: String::new(),
        activity: activity.to_string(),
        map_link: String::new(),
        notes: String::new(),
    }
}

#[async_trait]
impl TripApi for FakeApi {
    async fn list_trips(&self) -> Result<Vec<Trip>> {
        let backend = self.record("list_trips".to_string(), "list_trips")?;
        Ok(backend.trips.clone())
    }

    async fn create_trip(&self, draft: &NewTripDraft) -> Result<Trip> {
        let mut backend = self.record(format!("create_trip:{}", draft.name), "create_trip")?;
        let created = Trip {
            name: draft.name.trim().to_string(),
            start_date: draft.start_date.clone(),
            end_date: draft.end_date.clone(),
            country: draft.country,
            details: TravelDetails::default(),
        };
        backend.trips.push(created.clone());
        Ok(created)
    }

    async fn list_itinerary(&self, trip_name: &str) -> Result<Vec<ItineraryItem>> {
        let backend = self.record(format!("list_itinerary:{trip_name}"), "list_itinerary")?;
        Ok(backend
            .itineraries
            .get(trip_name)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_itinerary_item(&self, trip_name: &str, draft: &NewItemDraft) -> Result<()> {
        let mut backend = self.record(format!("add_item:{trip_name}"), "add_item")?;
        backend
            .itineraries
            .entry(trip_name.to_string())
            .or_default()
            .push(ItineraryItem {
                date: draft.date.clone(),
                start_time: draft.start_time.clone(),
                end_time: draft.end_time.clone(),
                activity: draft.activity.clone(),
                map_link: draft.map_link.clone(),
                notes: draft.notes.clone(),
            });
        Ok(())
    }
}

#[async_trait]
impl TravelTimeApi for FakeApi {
    async fn travel_time(&self, leg: &TravelLeg) -> Result<String> {
        let call = format!("travel_time:{}->{}", leg.origin, leg.destination);
        self.record(call, "travel_time")?;
        Ok("15 mins (1.2 km)".to_string())
    }
}
