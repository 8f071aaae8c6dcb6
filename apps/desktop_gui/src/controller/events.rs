//! Backend completion events and error modeling for the planner controller.

use client_core::ClientError;
use shared::{
    domain::{ItineraryItem, Trip},
    schedule::TravelLeg,
};

use crate::backend_bridge::commands::TripsFollowUp;

#[derive(Debug)]
pub enum UiEvent {
    TripsLoaded {
        trips: Vec<Trip>,
        follow_up: TripsFollowUp,
    },
    ItineraryLoaded {
        trip_name: String,
        generation: u64,
        items: Vec<ItineraryItem>,
    },
    ItineraryFailed {
        generation: u64,
        error: UiError,
    },
    TripCreated {
        trip: Trip,
    },
    ItemAdded {
        trip_name: String,
    },
    TravelTimeLoaded {
        leg: TravelLeg,
        outcome: Result<String, UiError>,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    /// Backend answered with a non-success status.
    Request,
    /// Backend answered, but the body had the wrong shape.
    Decode,
    Transport,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    CommandQueue,
    ListTrips,
    CreateTrip,
    ListItinerary,
    AddItem,
    TravelTime,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(
        context: UiErrorContext,
        category: UiErrorCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            context,
            message: message.into(),
        }
    }

    pub fn from_client(context: UiErrorContext, err: &ClientError) -> Self {
        let category = match err {
            ClientError::Request(_) => UiErrorCategory::Request,
            ClientError::Decode { .. } => UiErrorCategory::Decode,
            ClientError::Transport(_) => UiErrorCategory::Transport,
            ClientError::InvalidBaseUrl(_) => UiErrorCategory::Internal,
        };
        Self::new(context, category, err.to_string())
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
