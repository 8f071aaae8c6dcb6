use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

mod backend_bridge;
mod controller;
mod ui;

use anyhow::Context;
use clap::Parser;
use client_core::{
    config::load_settings,
    transit::{TransitClient, TravelTimeApi},
    TripClient,
};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use backend_bridge::commands::BackendCommand;
use controller::{events::UiEvent, reducer::ViewController};
use ui::PlannerApp;

#[derive(Debug, Parser)]
#[command(name = "planner-gui", about = "Desktop trip planner")]
struct Args {
    /// Backend base URL; overrides the settings file and environment.
    #[arg(long)]
    server_url: Option<String>,
    /// Settings file to load instead of ./planner.toml.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    init_logging(&settings.log_filter);

    let api = TripClient::new(&settings.server_url)
        .with_context(|| format!("invalid server url {}", settings.server_url))?;
    let travel = match settings.maps_api_key.as_deref() {
        Some(key) => Some(Arc::new(TransitClient::new(key)?) as Arc<dyn TravelTimeApi>),
        None => None,
    };
    tracing::info!(
        server = %api.base_url(),
        travel_times = travel.is_some(),
        "starting planner"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(1024);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Trip Planner")
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([760.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Trip Planner",
        options,
        Box::new(move |cc| {
            if let Some(font_path) = settings.font_path.as_deref() {
                if let Err(err) = ui::fonts::install_fallback_font(&cc.egui_ctx, Path::new(font_path))
                {
                    tracing::warn!("{err:#}");
                }
            }

            let repaint = cc.egui_ctx.clone();
            let show_travel_times = travel.is_some();
            backend_bridge::runtime::launch(Arc::new(api), travel, cmd_rx, ui_tx, move || {
                repaint.request_repaint()
            })?;

            Ok(Box::new(PlannerApp::new(
                cmd_tx,
                ui_rx,
                ViewController::new(settings.auto_map_links)
                    .with_travel_times(show_travel_times),
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("planner window failed: {err}"))
}
