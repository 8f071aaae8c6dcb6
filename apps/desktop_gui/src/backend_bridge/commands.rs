//! Backend commands queued from UI to backend worker.

use shared::{
    protocol::{NewItemDraft, NewTripDraft},
    schedule::TravelLeg,
};

/// What to do with the selection once a trip list refresh lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripsFollowUp {
    /// Startup behavior: pick the first trip when nothing is selected yet.
    SelectFirstIfNone,
    /// After creating a trip: select it by name.
    Select(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    ListTrips {
        follow_up: TripsFollowUp,
    },
    ListItinerary {
        trip_name: String,
        generation: u64,
    },
    CreateTrip {
        draft: NewTripDraft,
    },
    AddItineraryItem {
        trip_name: String,
        draft: NewItemDraft,
    },
    TravelTime {
        leg: TravelLeg,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::ListTrips { .. } => "list_trips",
            BackendCommand::ListItinerary { .. } => "list_itinerary",
            BackendCommand::CreateTrip { .. } => "create_trip",
            BackendCommand::AddItineraryItem { .. } => "add_itinerary_item",
            BackendCommand::TravelTime { .. } => "travel_time",
        }
    }
}
