use std::collections::HashMap;

use shared::{
    domain::{ItineraryItem, Trip},
    protocol::{NewItemDraft, NewTripDraft},
    schedule::TravelLeg,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ItineraryView {
    /// Rows in backend order.
    #[default]
    Table,
    ByDay,
}

/// Everything the planner window renders. Only `ViewController` mutates it.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub trips: Vec<Trip>,
    pub selected_trip: Option<String>,
    pub itinerary: Vec<ItineraryItem>,
    pub error: Option<String>,
    pub trip_draft: NewTripDraft,
    pub item_draft: NewItemDraft,
    pub view: ItineraryView,
    /// Transit summaries per leg, kept across trip switches.
    pub travel_times: HashMap<TravelLeg, String>,
}

impl ViewState {
    pub fn selected_trip_meta(&self) -> Option<&Trip> {
        let selected = self.selected_trip.as_deref()?;
        self.trips.iter().find(|trip| trip.name == selected)
    }
}
