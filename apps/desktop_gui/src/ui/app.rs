use std::{collections::HashMap, time::Duration};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{
    domain::{Country, ItineraryItem, Trip},
    schedule::{group_by_day, TravelLeg},
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::UiEvent,
    orchestration::dispatch_backend_command,
    reducer::ViewController,
    state::ItineraryView,
};

const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(214, 84, 84);

pub struct PlannerApp {
    controller: ViewController,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    /// Commands queued but not yet answered; drives the spinner.
    in_flight: usize,
}

impl PlannerApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        mut controller: ViewController,
    ) -> Self {
        let startup = controller.start();
        let mut app = Self {
            controller,
            cmd_tx,
            ui_rx,
            in_flight: 0,
        };
        app.dispatch(Some(startup));
        app
    }

    fn dispatch(&mut self, cmd: Option<BackendCommand>) {
        let Some(cmd) = cmd else {
            return;
        };
        if dispatch_backend_command(&self.cmd_tx, cmd, &mut self.controller) {
            self.in_flight += 1;
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            let follow_up = self.controller.apply(event);
            self.dispatch(follow_up);
        }
    }

    fn show_trip_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("trip_panel")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Trips");
                ui.add_space(4.0);
                self.show_trip_picker(ui);
                ui.separator();
                ui.heading("New trip");
                self.show_trip_form(ui);
            });
    }

    fn show_trip_picker(&mut self, ui: &mut egui::Ui) {
        let state = self.controller.state();
        if state.trips.is_empty() {
            ui.weak("No trips yet");
            return;
        }

        let mut picked = None;
        let selected_text = state.selected_trip.as_deref().unwrap_or("Select a trip");
        egui::ComboBox::from_id_salt("trip_picker")
            .width(ui.available_width())
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                for trip in &state.trips {
                    let is_selected = state.selected_trip.as_deref() == Some(trip.name.as_str());
                    if ui.selectable_label(is_selected, &trip.name).clicked() {
                        picked = Some(trip.name.clone());
                    }
                }
            });

        if let Some(name) = picked {
            let cmd = self.controller.select_trip(&name);
            self.dispatch(cmd);
        }
    }

    fn show_trip_form(&mut self, ui: &mut egui::Ui) {
        let draft = self.controller.trip_draft_mut();
        egui::Grid::new("trip_form")
            .num_columns(2)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                ui.label("Name");
                ui.text_edit_singleline(&mut draft.name);
                ui.end_row();

                ui.label("Start");
                ui.add(egui::TextEdit::singleline(&mut draft.start_date).hint_text("YYYY-MM-DD"));
                ui.end_row();

                ui.label("End");
                ui.add(egui::TextEdit::singleline(&mut draft.end_date).hint_text("YYYY-MM-DD"));
                ui.end_row();

                ui.label("Country");
                egui::ComboBox::from_id_salt("trip_country")
                    .selected_text(draft.country.label())
                    .show_ui(ui, |ui| {
                        for country in Country::ALL {
                            ui.selectable_value(&mut draft.country, country, country.label());
                        }
                    });
                ui.end_row();
            });

        if ui.button("Create trip").clicked() {
            let cmd = self.controller.submit_trip();
            self.dispatch(Some(cmd));
        }
    }

    fn show_trip_header(&self, ui: &mut egui::Ui) {
        let Some(trip) = self.controller.selected_trip() else {
            let title = self
                .controller
                .state()
                .selected_trip
                .as_deref()
                .unwrap_or("No trip selected");
            ui.heading(title);
            return;
        };

        ui.heading(&trip.name);
        ui.label(trip_caption(trip));
        if let Some(flight) = trip.details.flight_summary() {
            ui.label(format!("Flight: {flight}"));
        }
        if let Some(hotel) = trip.details.hotel_summary() {
            ui.label(format!("Hotel: {hotel}"));
        }
    }

    fn show_item_form(&mut self, ui: &mut egui::Ui) {
        let enabled = self.controller.can_submit_item();
        let draft = self.controller.item_draft_mut();
        ui.add_enabled_ui(enabled, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut draft.date)
                        .hint_text("YYYY-MM-DD")
                        .desired_width(96.0),
                );
                ui.add(
                    egui::TextEdit::singleline(&mut draft.start_time)
                        .hint_text("start HH:MM")
                        .desired_width(80.0),
                );
                ui.add(
                    egui::TextEdit::singleline(&mut draft.end_time)
                        .hint_text("end HH:MM")
                        .desired_width(80.0),
                );
                ui.add(
                    egui::TextEdit::singleline(&mut draft.activity)
                        .hint_text("activity")
                        .desired_width(160.0),
                );
                ui.add(
                    egui::TextEdit::singleline(&mut draft.map_link)
                        .hint_text("map link")
                        .desired_width(160.0),
                );
                ui.add(
                    egui::TextEdit::singleline(&mut draft.notes)
                        .hint_text("notes")
                        .desired_width(160.0),
                );
            });
        });

        if ui
            .add_enabled(enabled, egui::Button::new("Add item"))
            .clicked()
        {
            let cmd = self.controller.submit_item();
            self.dispatch(cmd);
        }
    }

    fn show_error(&self, ui: &mut egui::Ui) {
        if let Some(message) = &self.controller.state().error {
            ui.colored_label(ERROR_COLOR, message);
        }
    }

    fn show_view_toggle(&mut self, ui: &mut egui::Ui) {
        let mut view = self.controller.state().view;
        ui.horizontal(|ui| {
            ui.selectable_value(&mut view, ItineraryView::Table, "Table");
            ui.selectable_value(&mut view, ItineraryView::ByDay, "By day");
            if self.in_flight > 0 {
                ui.spinner();
            }
        });
        if view != self.controller.state().view {
            self.controller.set_view(view);
        }
    }

    fn show_itinerary(&self, ui: &mut egui::Ui) {
        let state = self.controller.state();
        if state.itinerary.is_empty() {
            ui.weak("No itinerary items");
            return;
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| match (state.view, self.controller.selected_trip()) {
                (ItineraryView::ByDay, Some(trip)) => {
                    let travel = self
                        .controller
                        .travel_times_enabled()
                        .then_some(&state.travel_times);
                    show_by_day(ui, trip, &state.itinerary, travel)
                }
                _ => show_table(ui, "itinerary_table", &state.itinerary, |_, _| None),
            });
    }
}

fn trip_caption(trip: &Trip) -> String {
    let mut caption = format!(
        "{} ~ {} | {}",
        trip.start_date, trip.end_date, trip.country
    );
    if let Some(days) = trip.duration_days() {
        let unit = if days == 1 { "day" } else { "days" };
        caption.push_str(&format!(" | {days} {unit}"));
    }
    caption
}

/// Transit line shown between two consecutive activities, once requested.
fn travel_note(
    times: &HashMap<TravelLeg, String>,
    country: Country,
    from: &ItineraryItem,
    to: &ItineraryItem,
) -> Option<String> {
    let leg = TravelLeg::between(from, to, country)?;
    Some(match times.get(&leg) {
        Some(summary) => format!("Transit: {summary}"),
        None => "Transit: estimating...".to_string(),
    })
}

fn show_table<'a>(
    ui: &mut egui::Ui,
    id: impl std::hash::Hash,
    items: impl IntoIterator<Item = &'a ItineraryItem>,
    between: impl Fn(&ItineraryItem, &ItineraryItem) -> Option<String>,
) {
    egui::Grid::new(id)
        .striped(true)
        .num_columns(6)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            for header in ["Date", "Start", "End", "Activity", "Map", "Notes"] {
                ui.strong(header);
            }
            ui.end_row();

            let mut items = items.into_iter().peekable();
            while let Some(item) = items.next() {
                ui.label(&item.date);
                ui.label(&item.start_time);
                ui.label(&item.end_time);
                ui.label(&item.activity);
                if item.map_link.trim().is_empty() {
                    ui.label("");
                } else {
                    ui.hyperlink_to("map", item.map_link.trim());
                }
                ui.label(&item.notes);
                ui.end_row();

                if let Some(note) = items.peek().and_then(|next| between(item, *next)) {
                    for _ in 0..3 {
                        ui.label("");
                    }
                    ui.weak(note);
                    ui.end_row();
                }
            }
        });
}

fn show_by_day(
    ui: &mut egui::Ui,
    trip: &Trip,
    items: &[ItineraryItem],
    travel: Option<&HashMap<TravelLeg, String>>,
) {
    let schedule = group_by_day(trip, items);
    let between = |from: &ItineraryItem, to: &ItineraryItem| {
        travel.and_then(|times| travel_note(times, trip.country, from, to))
    };
    for day in &schedule.days {
        egui::CollapsingHeader::new(day.title())
            .id_salt(("trip_day", day.number))
            .default_open(true)
            .show(ui, |ui| {
                if day.items.is_empty() {
                    ui.weak("Nothing planned");
                } else {
                    show_table(
                        ui,
                        ("day_table", day.number),
                        day.items.iter().copied(),
                        between,
                    );
                }
            });
    }
    if !schedule.unscheduled.is_empty() {
        egui::CollapsingHeader::new("Unscheduled")
            .id_salt("trip_day_unscheduled")
            .default_open(true)
            .show(ui, |ui| {
                show_table(
                    ui,
                    "unscheduled_table",
                    schedule.unscheduled.iter().copied(),
                    |_, _| None,
                );
            });
    }
}

impl eframe::App for PlannerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        for cmd in self.controller.request_travel_times() {
            self.dispatch(Some(cmd));
        }

        self.show_trip_panel(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_trip_header(ui);
            ui.separator();
            self.show_item_form(ui);
            self.show_error(ui);
            ui.separator();
            self.show_view_toggle(ui);
            ui.add_space(4.0);
            self.show_itinerary(ui);
        });

        if self.in_flight > 0 {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
