use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use crossbeam_channel::bounded;
use shared::protocol::{NewItemDraft, NewTripDraft};

use super::*;
use crate::backend_bridge::commands::TripsFollowUp;
use crate::controller::fake_api::{item, FakeApi};

#[tokio::test]
async fn list_trips_failure_maps_to_request_error() {
    let api = FakeApi::default();
    api.fail("list_trips", client_core::LIST_TRIPS_FAILED);

    let event = execute(
        &api,
        None,
        BackendCommand::ListTrips {
            follow_up: TripsFollowUp::SelectFirstIfNone,
        },
    )
    .await;

    let UiEvent::Error(err) = event else {
        panic!("expected error event, got {event:?}");
    };
    assert_eq!(err.context(), UiErrorContext::ListTrips);
    assert_eq!(err.category(), UiErrorCategory::Request);
    assert_eq!(err.message(), "Failed to fetch trips");
}

#[tokio::test]
async fn itinerary_outcomes_carry_generation() {
    let api = FakeApi::with_trips(&["Kyoto"]);
    api.backend()
        .itineraries
        .insert("Kyoto".into(), vec![item("2025-04-01", "09:00", "Temple")]);

    let loaded = execute(
        &api,
        None,
        BackendCommand::ListItinerary {
            trip_name: "Kyoto".into(),
            generation: 7,
        },
    )
    .await;
    let UiEvent::ItineraryLoaded {
        trip_name,
        generation,
        items,
    } = loaded
    else {
        panic!("expected itinerary rows");
    };
    assert_eq!(trip_name, "Kyoto");
    assert_eq!(generation, 7);
    assert_eq!(items.len(), 1);

    api.fail("list_itinerary", client_core::LIST_ITINERARY_FAILED);
    let failed = execute(
        &api,
        None,
        BackendCommand::ListItinerary {
            trip_name: "Kyoto".into(),
            generation: 8,
        },
    )
    .await;
    let UiEvent::ItineraryFailed { generation, error } = failed else {
        panic!("expected itinerary failure");
    };
    assert_eq!(generation, 8);
    assert_eq!(error.context(), UiErrorContext::ListItinerary);
}

#[tokio::test]
async fn create_and_add_report_their_own_contexts() {
    let api = FakeApi::with_trips(&["Kyoto"]);
    api.fail("create_trip", "Trip name already exists");
    api.fail("add_item", "Failed to add itinerary item");

    let created = execute(
        &api,
        None,
        BackendCommand::CreateTrip {
            draft: NewTripDraft::default(),
        },
    )
    .await;
    let UiEvent::Error(err) = created else {
        panic!("expected create failure");
    };
    assert_eq!(err.context(), UiErrorContext::CreateTrip);
    assert_eq!(err.message(), "Trip name already exists");

    let added = execute(
        &api,
        None,
        BackendCommand::AddItineraryItem {
            trip_name: "Kyoto".into(),
            draft: NewItemDraft::default(),
        },
    )
    .await;
    let UiEvent::Error(err) = added else {
        panic!("expected add failure");
    };
    assert_eq!(err.context(), UiErrorContext::AddItem);
}

#[tokio::test]
async fn successful_add_reports_trip_name() {
    let api = FakeApi::with_trips(&["Kyoto"]);

    let event = execute(
        &api,
        None,
        BackendCommand::AddItineraryItem {
            trip_name: "Kyoto".into(),
            draft: NewItemDraft::default(),
        },
    )
    .await;

    assert!(matches!(event, UiEvent::ItemAdded { trip_name } if trip_name == "Kyoto"));
    assert_eq!(api.backend().itineraries["Kyoto"].len(), 1);
}

#[test]
fn worker_serves_commands_and_wakes_ui() {
    let api = Arc::new(FakeApi::with_trips(&["Kyoto", "Osaka"]));
    let (cmd_tx, cmd_rx) = bounded(8);
    let (ui_tx, ui_rx) = bounded(8);
    let wakes = Arc::new(AtomicUsize::new(0));
    let wake_count = Arc::clone(&wakes);

    let handle = launch(api.clone(), None, cmd_rx, ui_tx, move || {
        wake_count.fetch_add(1, Ordering::SeqCst);
    })
    .expect("spawn worker");

    cmd_tx
        .send(BackendCommand::ListTrips {
            follow_up: TripsFollowUp::SelectFirstIfNone,
        })
        .expect("queue command");

    let event = ui_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("worker reply");
    let UiEvent::TripsLoaded { trips, follow_up } = event else {
        panic!("expected trips, got {event:?}");
    };
    assert_eq!(trips.len(), 2);
    assert_eq!(follow_up, TripsFollowUp::SelectFirstIfNone);

    drop(cmd_tx);
    handle.join().expect("worker exits once the queue closes");
    assert!(wakes.load(Ordering::SeqCst) >= 1);
}

fn leg() -> shared::schedule::TravelLeg {
    shared::schedule::TravelLeg {
        origin: "Fushimi Inari".into(),
        destination: "Nishiki market".into(),
        country: shared::domain::Country::Japan,
    }
}

#[tokio::test]
async fn travel_time_uses_transit_api_when_configured() {
    let api = FakeApi::default();

    let event = execute(
        &api,
        Some(&api as &dyn TravelTimeApi),
        BackendCommand::TravelTime { leg: leg() },
    )
    .await;

    let UiEvent::TravelTimeLoaded { leg: loaded, outcome } = event else {
        panic!("expected travel time");
    };
    assert_eq!(loaded, leg());
    assert_eq!(outcome.expect("summary"), "15 mins (1.2 km)");
}

#[tokio::test]
async fn travel_time_without_transit_api_is_an_internal_error() {
    let api = FakeApi::default();

    let event = execute(&api, None, BackendCommand::TravelTime { leg: leg() }).await;

    let UiEvent::TravelTimeLoaded { outcome, .. } = event else {
        panic!("expected travel time");
    };
    let err = outcome.expect_err("disabled");
    assert_eq!(err.context(), UiErrorContext::TravelTime);
    assert_eq!(err.category(), UiErrorCategory::Internal);
    assert!(api.calls().is_empty());
}
