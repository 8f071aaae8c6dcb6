//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{transit::TravelTimeApi, TripApi};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tracing::{debug, error, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiErrorContext, UiEvent};

/// Spawns the backend worker thread. Every command runs as its own task, so
/// slow requests do not hold up later ones; `wake` runs after each event is queued.
/// Without `travel`, travel-time commands answer with an error.
pub fn launch(
    api: Arc<dyn TripApi>,
    travel: Option<Arc<dyn TravelTimeApi>>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    wake: impl Fn() + Send + Sync + 'static,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("planner-backend".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                        UiErrorContext::BackendStartup,
                        UiErrorCategory::Internal,
                        format!("backend worker startup failure: failed to build runtime: {err}"),
                    )));
                    error!("failed to build backend runtime: {err}");
                    wake();
                    return;
                }
            };

            let wake = Arc::new(wake);
            runtime.block_on(async move {
                while let Ok(cmd) = cmd_rx.recv() {
                    let api = Arc::clone(&api);
                    let travel = travel.clone();
                    let ui_tx = ui_tx.clone();
                    let wake = Arc::clone(&wake);
                    tokio::spawn(async move {
                        let event = execute(api.as_ref(), travel.as_deref(), cmd).await;
                        match ui_tx.try_send(event) {
                            Ok(()) => {}
                            Err(TrySendError::Full(_)) => {
                                warn!("ui event queue is full; dropping backend event")
                            }
                            Err(TrySendError::Disconnected(_)) => {
                                debug!("ui event receiver closed; dropping backend event")
                            }
                        }
                        wake();
                    });
                }
                debug!("command queue closed; backend worker exiting");
            });
        })
}

/// Runs one command against the API and folds the outcome into a UI event.
pub async fn execute(
    api: &dyn TripApi,
    travel: Option<&dyn TravelTimeApi>,
    cmd: BackendCommand,
) -> UiEvent {
    debug!(command = cmd.name(), "executing backend command");
    match cmd {
        BackendCommand::ListTrips { follow_up } => match api.list_trips().await {
            Ok(trips) => UiEvent::TripsLoaded { trips, follow_up },
            Err(err) => UiEvent::Error(UiError::from_client(UiErrorContext::ListTrips, &err)),
        },
        BackendCommand::ListItinerary {
            trip_name,
            generation,
        } => match api.list_itinerary(&trip_name).await {
            Ok(items) => UiEvent::ItineraryLoaded {
                trip_name,
                generation,
                items,
            },
            Err(err) => UiEvent::ItineraryFailed {
                generation,
                error: UiError::from_client(UiErrorContext::ListItinerary, &err),
            },
        },
        BackendCommand::CreateTrip { draft } => match api.create_trip(&draft).await {
            Ok(trip) => UiEvent::TripCreated { trip },
            Err(err) => UiEvent::Error(UiError::from_client(UiErrorContext::CreateTrip, &err)),
        },
        BackendCommand::AddItineraryItem { trip_name, draft } => {
            match api.add_itinerary_item(&trip_name, &draft).await {
                Ok(()) => UiEvent::ItemAdded { trip_name },
                Err(err) => UiEvent::Error(UiError::from_client(UiErrorContext::AddItem, &err)),
            }
        }
        BackendCommand::TravelTime { leg } => {
            let outcome = match travel {
                Some(travel) => travel
                    .travel_time(&leg)
                    .await
                    .map_err(|err| UiError::from_client(UiErrorContext::TravelTime, &err)),
                None => Err(UiError::new(
                    UiErrorContext::TravelTime,
                    UiErrorCategory::Internal,
                    "travel times are disabled (no maps API key)",
                )),
            };
            UiEvent::TravelTimeLoaded { leg, outcome }
        }
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
