//! Day-by-day grouping of a trip's itinerary.

use chrono::{NaiveDate, NaiveTime};
use url::form_urlencoded;

use crate::domain::{Country, ItineraryItem, Trip, DATE_FORMAT};

pub const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayPlan<'a> {
    /// 1-based position within the trip.
    pub number: usize,
    pub date: NaiveDate,
    pub items: Vec<&'a ItineraryItem>,
}

impl DayPlan<'_> {
    pub fn title(&self) -> String {
        format!("Day {} ({})", self.number, self.date.format(DATE_FORMAT))
    }

    /// Legs between consecutive items, skipping pairs with a blank activity.
    pub fn legs(&self, country: Country) -> Vec<TravelLeg> {
        self.items
            .windows(2)
            .filter_map(|pair| TravelLeg::between(pair[0], pair[1], country))
            .collect()
    }
}

/// Hop between two consecutive activities; the key for travel-time lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TravelLeg {
    pub origin: String,
    pub destination: String,
    pub country: Country,
}

impl TravelLeg {
    pub fn between(from: &ItineraryItem, to: &ItineraryItem, country: Country) -> Option<Self> {
        let origin = from.activity.trim();
        let destination = to.activity.trim();
        if origin.is_empty() || destination.is_empty() {
            return None;
        }
        Some(Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            country,
        })
    }

    pub fn origin_query(&self) -> String {
        format!("{} {}", self.country.label(), self.origin)
    }

    pub fn destination_query(&self) -> String {
        format!("{} {}", self.country.label(), self.destination)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySchedule<'a> {
    pub days: Vec<DayPlan<'a>>,
    /// Items dated outside the trip range or with an unparsable date, in backend order.
    pub unscheduled: Vec<&'a ItineraryItem>,
}

pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT).ok()
}

pub fn group_by_day<'a>(trip: &Trip, items: &'a [ItineraryItem]) -> DaySchedule<'a> {
    let mut schedule = DaySchedule {
        days: trip
            .days()
            .into_iter()
            .enumerate()
            .map(|(index, date)| DayPlan {
                number: index + 1,
                date,
                items: Vec::new(),
            })
            .collect(),
        unscheduled: Vec::new(),
    };

    for item in items {
        let day = NaiveDate::parse_from_str(item.date.trim(), DATE_FORMAT)
            .ok()
            .and_then(|date| schedule.days.iter_mut().find(|day| day.date == date));
        match day {
            Some(day) => day.items.push(item),
            None => schedule.unscheduled.push(item),
        }
    }

    // Stable: unparsable times sink to the end and keep their relative order.
    for day in &mut schedule.days {
        day.items.sort_by_key(|item| {
            let time = parse_time(&item.start_time);
            (time.is_none(), time)
        });
    }

    schedule
}

/// Google Maps search URL for an activity in the trip's country.
pub fn map_search_link(country: Country, activity: &str) -> String {
    let query = format!("{} {}", country.label(), activity.trim());
    let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("https://www.google.com/maps/search/?api=1&query={encoded}")
}
