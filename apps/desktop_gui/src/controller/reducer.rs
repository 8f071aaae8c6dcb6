//! Planner state transitions: user actions and backend completions in, backend commands out.

use std::collections::HashSet;

use client_core::transit::TRAVEL_TIME_UNAVAILABLE;
use shared::{
    domain::Trip,
    protocol::{NewItemDraft, NewTripDraft},
    schedule::{group_by_day, map_search_link, TravelLeg},
};
use tracing::{debug, error, warn};

use crate::backend_bridge::commands::{BackendCommand, TripsFollowUp};
use crate::controller::events::{UiError, UiErrorCategory, UiEvent};
use crate::controller::state::{ItineraryView, ViewState};

#[derive(Debug, Default)]
pub struct ViewController {
    state: ViewState,
    /// Bumped for every itinerary fetch; only the latest response is applied.
    itinerary_generation: u64,
    auto_map_links: bool,
    show_travel_times: bool,
    /// Legs with a travel-time request in flight.
    pending_legs: HashSet<TravelLeg>,
}

impl ViewController {
    pub fn new(auto_map_links: bool) -> Self {
        Self {
            auto_map_links,
            ..Self::default()
        }
    }

    /// Enables transit times between consecutive activities in the by-day view.
    pub fn with_travel_times(mut self, enabled: bool) -> Self {
        self.show_travel_times = enabled;
        self
    }

    pub fn travel_times_enabled(&self) -> bool {
        self.show_travel_times
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn selected_trip(&self) -> Option<&Trip> {
        self.state.selected_trip_meta()
    }

    pub fn trip_draft_mut(&mut self) -> &mut NewTripDraft {
        &mut self.state.trip_draft
    }

    pub fn item_draft_mut(&mut self) -> &mut NewItemDraft {
        &mut self.state.item_draft
    }

    pub fn set_view(&mut self, view: ItineraryView) {
        self.state.view = view;
    }

    pub fn can_submit_item(&self) -> bool {
        self.state.selected_trip.is_some()
    }

    pub fn start(&mut self) -> BackendCommand {
        BackendCommand::ListTrips {
            follow_up: TripsFollowUp::SelectFirstIfNone,
        }
    }

    pub fn select_trip(&mut self, name: &str) -> Option<BackendCommand> {
        if name.is_empty() || self.state.selected_trip.as_deref() == Some(name) {
            return None;
        }
        self.state.selected_trip = Some(name.to_string());
        Some(self.fetch_itinerary(name.to_string()))
    }

    pub fn submit_trip(&mut self) -> BackendCommand {
        self.state.error = None;
        BackendCommand::CreateTrip {
            draft: self.state.trip_draft.clone(),
        }
    }

    pub fn submit_item(&mut self) -> Option<BackendCommand> {
        let Some(trip_name) = self.state.selected_trip.clone() else {
            debug!("item submission ignored: no trip selected");
            return None;
        };
        self.state.error = None;

        let mut draft = self.state.item_draft.clone();
        if self.auto_map_links
            && draft.map_link.trim().is_empty()
            && !draft.activity.trim().is_empty()
        {
            if let Some(trip) = self.selected_trip() {
                draft.map_link = map_search_link(trip.country, &draft.activity);
            }
        }

        Some(BackendCommand::AddItineraryItem { trip_name, draft })
    }

    /// Commands for by-day legs that are neither known nor in flight.
    /// Empty unless travel times are on and the by-day view is showing.
    pub fn request_travel_times(&mut self) -> Vec<BackendCommand> {
        if !self.show_travel_times || self.state.view != ItineraryView::ByDay {
            return Vec::new();
        }
        let Some(trip) = self.state.selected_trip_meta() else {
            return Vec::new();
        };

        let schedule = group_by_day(trip, &self.state.itinerary);
        let mut commands = Vec::new();
        for leg in schedule.days.iter().flat_map(|day| day.legs(trip.country)) {
            if self.state.travel_times.contains_key(&leg) || self.pending_legs.contains(&leg) {
                continue;
            }
            self.pending_legs.insert(leg.clone());
            commands.push(BackendCommand::TravelTime { leg });
        }
        commands
    }

    pub fn report_error(&mut self, err: UiError) {
        match err.category() {
            UiErrorCategory::Request | UiErrorCategory::Transport => warn!(
                context = ?err.context(),
                category = ?err.category(),
                "{}",
                err.message()
            ),
            UiErrorCategory::Decode | UiErrorCategory::Internal => error!(
                context = ?err.context(),
                category = ?err.category(),
                "{}",
                err.message()
            ),
        }
        self.state.error = Some(err.message().to_string());
    }

    pub fn apply(&mut self, event: UiEvent) -> Option<BackendCommand> {
        match event {
            UiEvent::TripsLoaded { trips, follow_up } => {
                self.state.trips = trips;
                match follow_up {
                    TripsFollowUp::SelectFirstIfNone => {
                        if self.state.selected_trip.is_some() {
                            return None;
                        }
                        let first = self.state.trips.first()?.name.clone();
                        self.select_trip(&first)
                    }
                    TripsFollowUp::Select(name) => self.select_trip(&name),
                }
            }
            UiEvent::ItineraryLoaded {
                trip_name,
                generation,
                items,
            } => {
                if generation != self.itinerary_generation {
                    debug!(
                        trip = %trip_name,
                        generation,
                        latest = self.itinerary_generation,
                        "dropping stale itinerary response"
                    );
                    return None;
                }
                self.state.itinerary = items;
                None
            }
            UiEvent::ItineraryFailed { generation, error } => {
                if generation != self.itinerary_generation {
                    debug!(
                        generation,
                        latest = self.itinerary_generation,
                        "dropping stale itinerary failure"
                    );
                    return None;
                }
                self.report_error(error);
                None
            }
            UiEvent::TripCreated { trip } => {
                self.state.trip_draft = NewTripDraft::default();
                Some(BackendCommand::ListTrips {
                    follow_up: TripsFollowUp::Select(trip.name),
                })
            }
            UiEvent::ItemAdded { trip_name } => {
                debug!(trip = %trip_name, "itinerary item added");
                self.state.item_draft = NewItemDraft::default();
                let current = self.state.selected_trip.clone()?;
                Some(self.fetch_itinerary(current))
            }
            UiEvent::TravelTimeLoaded { leg, outcome } => {
                self.pending_legs.remove(&leg);
                let summary = match outcome {
                    Ok(summary) => summary,
                    Err(err) => {
                        debug!(
                            origin = %leg.origin,
                            destination = %leg.destination,
                            category = ?err.category(),
                            "travel time lookup failed: {}",
                            err.message()
                        );
                        TRAVEL_TIME_UNAVAILABLE.to_string()
                    }
                };
                self.state.travel_times.insert(leg, summary);
                None
            }
            UiEvent::Error(err) => {
                self.report_error(err);
                None
            }
        }
    }

    fn fetch_itinerary(&mut self, trip_name: String) -> BackendCommand {
        self.itinerary_generation += 1;
        BackendCommand::ListItinerary {
            trip_name,
            generation: self.itinerary_generation,
        }
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
