use std::{collections::HashMap, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::load_settings,
    transit::{TransitClient, TravelTimeApi, TRAVEL_TIME_UNAVAILABLE},
    TripApi, TripClient,
};
use shared::{
    domain::{Country, ItineraryItem, Trip},
    protocol::{NewItemDraft, NewTripDraft},
    schedule::{group_by_day, TravelLeg},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "planner", about = "Trip planner command-line client")]
struct Args {
    /// Backend base URL; overrides the settings file and environment.
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Settings file to load instead of ./planner.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print raw JSON records instead of tables.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all trips.
    Trips,
    /// Create a trip.
    CreateTrip {
        #[arg(long)]
        name: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Label such as "日本 (Japan)" or an English name such as "japan".
        #[arg(long, default_value_t = Country::Japan)]
        country: Country,
    },
    /// Show a trip's itinerary.
    Itinerary {
        trip: String,
        #[arg(long)]
        by_day: bool,
    },
    /// Append an item to a trip's itinerary.
    AddItem {
        trip: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long)]
        activity: String,
        #[arg(long, default_value = "")]
        map_link: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Check that the backend is up.
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let client = TripClient::new(&settings.server_url)
        .with_context(|| format!("invalid server url {}", settings.server_url))?;
    tracing::debug!(server = %client.base_url(), command = ?args.command, "running");

    match args.command {
        Command::Trips => {
            let trips = client.list_trips().await.context("listing trips")?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&trips)?);
            } else if trips.is_empty() {
                println!("No trips yet.");
            } else {
                for trip in &trips {
                    println!("{}", trip_row(trip));
                }
            }
        }
        Command::CreateTrip {
            name,
            start,
            end,
            country,
        } => {
            let draft = NewTripDraft {
                name,
                start_date: start,
                end_date: end,
                country,
            };
            let trip = client.create_trip(&draft).await.context("creating trip")?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&trip)?);
            } else {
                println!("Created {}", trip_row(&trip));
            }
        }
        Command::Itinerary { trip, by_day } => {
            let items = client
                .list_itinerary(&trip)
                .await
                .with_context(|| format!("fetching itinerary for {trip}"))?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else if by_day {
                let trips = client.list_trips().await.context("listing trips")?;
                let meta = trips
                    .iter()
                    .find(|candidate| candidate.name == trip)
                    .with_context(|| format!("trip {trip} not found"))?;
                let travel = match settings.maps_api_key.as_deref() {
                    Some(key) => travel_times(&TransitClient::new(key)?, meta, &items).await,
                    None => HashMap::new(),
                };
                print!("{}", day_sections(meta, &items, &travel));
            } else {
                print!("{}", item_table(&items));
            }
        }
        Command::AddItem {
            trip,
            date,
            start,
            end,
            activity,
            map_link,
            notes,
        } => {
            let draft = NewItemDraft {
                date,
                start_time: start,
                end_time: end,
                activity,
                map_link,
                notes,
            };
            client
                .add_itinerary_item(&trip, &draft)
                .await
                .with_context(|| format!("adding item to {trip}"))?;
            println!("Added \"{}\" to {trip}", draft.activity);
        }
        Command::Health => {
            let ok = client.health().await.context("checking backend health")?;
            println!("{}: {}", client.base_url(), if ok { "ok" } else { "not ok" });
            if !ok {
                anyhow::bail!("backend reported unhealthy");
            }
        }
    }

    Ok(())
}

fn trip_row(trip: &Trip) -> String {
    let mut row = format!(
        "{}\t{} ~ {}\t{}",
        trip.name, trip.start_date, trip.end_date, trip.country
    );
    if let Some(days) = trip.duration_days() {
        row.push_str(&format!("\t{days}d"));
    }
    row
}

fn item_line(item: &ItineraryItem) -> String {
    let mut line = format!(
        "{}\t{}-{}\t{}",
        item.date, item.start_time, item.end_time, item.activity
    );
    for extra in [&item.notes, &item.map_link] {
        if !extra.trim().is_empty() {
            line.push('\t');
            line.push_str(extra.trim());
        }
    }
    line
}

fn item_table(items: &[ItineraryItem]) -> String {
    if items.is_empty() {
        return "No itinerary items.\n".to_string();
    }
    items.iter().map(|item| item_line(item) + "\n").collect()
}

/// Looks up every by-day leg; a failed lookup prints as unavailable.
async fn travel_times(
    transit: &dyn TravelTimeApi,
    trip: &Trip,
    items: &[ItineraryItem],
) -> HashMap<TravelLeg, String> {
    let schedule = group_by_day(trip, items);
    let mut times = HashMap::new();
    for leg in schedule.days.iter().flat_map(|day| day.legs(trip.country)) {
        if times.contains_key(&leg) {
            continue;
        }
        let summary = match transit.travel_time(&leg).await {
            Ok(summary) => summary,
            Err(err) => {
                tracing::debug!(origin = %leg.origin, destination = %leg.destination, "{err}");
                TRAVEL_TIME_UNAVAILABLE.to_string()
            }
        };
        times.insert(leg, summary);
    }
    times
}

fn day_sections(
    trip: &Trip,
    items: &[ItineraryItem],
    travel: &HashMap<TravelLeg, String>,
) -> String {
    let schedule = group_by_day(trip, items);
    let mut out = String::new();
    for day in &schedule.days {
        out.push_str(&day.title());
        out.push('\n');
        if day.items.is_empty() {
            out.push_str("  (nothing planned)\n");
        }
        for (index, item) in day.items.iter().enumerate() {
            out.push_str(&format!("  {}\n", item_line(item)));
            let leg = day
                .items
                .get(index + 1)
                .and_then(|next| TravelLeg::between(item, next, trip.country));
            if let Some(summary) = leg.and_then(|leg| travel.get(&leg)) {
                out.push_str(&format!("    transit: {summary}\n"));
            }
        }
    }
    if !schedule.unscheduled.is_empty() {
        out.push_str("Unscheduled\n");
        for item in &schedule.unscheduled {
            out.push_str(&format!("  {}\n", item_line(item)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::TravelDetails;

    fn trip() -> Trip {
        Trip {
            name: "Kyoto".into(),
            start_date: "2025-04-01".into(),
            end_date: "2025-04-02".into(),
            country: Country::Japan,
            details: TravelDetails::default(),
        }
    }

    fn item(date: &str, start: &str, activity: &str) -> ItineraryItem {
        ItineraryItem {
            date: date.into(),
            start_time: start.into(),
            end_time: String::new(),
            activity: activity.into(),
            map_link: String::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn parses_subcommands_with_global_flags() {
        let args = Args::try_parse_from([
            "planner",
            "itinerary",
            "Spring Break 2024",
            "--by-day",
            "--server-url",
            "http://localhost:9000",
        ])
        .expect("valid args");

        assert_eq!(args.server_url.as_deref(), Some("http://localhost:9000"));
        assert!(matches!(
            args.command,
            Command::Itinerary { ref trip, by_day: true } if trip == "Spring Break 2024"
        ));
    }

    #[test]
    fn create_trip_accepts_english_country_names() {
        let args = Args::try_parse_from([
            "planner",
            "create-trip",
            "--name",
            "Seoul",
            "--start",
            "2025-05-01",
            "--end",
            "2025-05-04",
            "--country",
            "south korea",
        ])
        .expect("valid args");

        let Command::CreateTrip { country, .. } = args.command else {
            panic!("expected create-trip");
        };
        assert_eq!(country, Country::SouthKorea);
    }

    #[test]
    fn rejects_unknown_country() {
        assert!(Args::try_parse_from([
            "planner",
            "create-trip",
            "--name",
            "X",
            "--start",
            "2025-05-01",
            "--end",
            "2025-05-04",
            "--country",
            "atlantis",
        ])
        .is_err());
    }

    #[test]
    fn trip_row_shows_length() {
        assert_eq!(trip_row(&trip()), "Kyoto\t2025-04-01 ~ 2025-04-02\t日本 (Japan)\t2d");
    }

    #[test]
    fn day_sections_list_every_day_and_stray_items() {
        let items = [
            item("2025-04-02", "14:00", "Arashiyama"),
            item("2025-04-02", "09:00", "Fushimi Inari"),
            item("2025-05-01", "10:00", "Later"),
        ];

        let out = day_sections(&trip(), &items, &HashMap::new());

        assert_eq!(
            out,
            "Day 1 (2025-04-01)\n  (nothing planned)\n\
             Day 2 (2025-04-02)\n  2025-04-02\t09:00-\tFushimi Inari\n  2025-04-02\t14:00-\tArashiyama\n\
             Unscheduled\n  2025-05-01\t10:00-\tLater\n"
        );
    }

    #[test]
    fn day_sections_print_known_transit_between_items() {
        let items = [
            item("2025-04-01", "13:00", "Nishiki market"),
            item("2025-04-01", "09:00", "Fushimi Inari"),
        ];
        let travel = HashMap::from([(
            TravelLeg::between(&items[1], &items[0], Country::Japan).expect("leg"),
            "25 mins (5.2 km)".to_string(),
        )]);

        let out = day_sections(&trip(), &items, &travel);

        assert!(out.contains(
            "  2025-04-01\t09:00-\tFushimi Inari\n    transit: 25 mins (5.2 km)\n  2025-04-01\t13:00-\tNishiki market\n"
        ));
    }

    #[test]
    fn empty_itinerary_prints_placeholder() {
        assert_eq!(item_table(&[]), "No itinerary items.\n");
    }
}
