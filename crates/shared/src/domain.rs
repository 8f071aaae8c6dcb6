use std::{fmt, str::FromStr};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cell;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    #[default]
    #[serde(rename = "日本 (Japan)")]
    Japan,
    #[serde(rename = "美國 (USA)")]
    Usa,
    #[serde(rename = "韓國 (South Korea)")]
    SouthKorea,
    #[serde(rename = "台灣 (Taiwan)")]
    Taiwan,
    #[serde(rename = "泰國 (Thailand)")]
    Thailand,
}

impl Country {
    pub const ALL: [Country; 5] = [
        Country::Japan,
        Country::Usa,
        Country::SouthKorea,
        Country::Taiwan,
        Country::Thailand,
    ];

    /// Label stored by the backend and shown in the country picker.
    pub fn label(self) -> &'static str {
        match self {
            Country::Japan => "日本 (Japan)",
            Country::Usa => "美國 (USA)",
            Country::SouthKorea => "韓國 (South Korea)",
            Country::Taiwan => "台灣 (Taiwan)",
            Country::Thailand => "泰國 (Thailand)",
        }
    }

    pub fn english_name(self) -> &'static str {
        match self {
            Country::Japan => "Japan",
            Country::Usa => "USA",
            Country::SouthKorea => "South Korea",
            Country::Taiwan => "Taiwan",
            Country::Thailand => "Thailand",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
#[error("unknown country '{0}'")]
pub struct UnknownCountry(pub String);

impl FromStr for Country {
    type Err = UnknownCountry;

    /// Accepts the full label or the English name, case-insensitively.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        Country::ALL
            .into_iter()
            .find(|country| {
                country.label() == raw || country.english_name().eq_ignore_ascii_case(raw)
            })
            .ok_or_else(|| UnknownCountry(raw.to_string()))
    }
}

/// Flight and hotel columns of the trip index row. Any of them may be blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelDetails {
    #[serde(rename = "航班號", default, deserialize_with = "cell::text")]
    pub flight_number: String,
    #[serde(rename = "出發機場", default, deserialize_with = "cell::text")]
    pub departure_airport: String,
    #[serde(rename = "出發時間", default, deserialize_with = "cell::text")]
    pub departure_time: String,
    #[serde(rename = "抵達機場", default, deserialize_with = "cell::text")]
    pub arrival_airport: String,
    #[serde(rename = "抵達時間", default, deserialize_with = "cell::text")]
    pub arrival_time: String,
    #[serde(rename = "酒店名稱", default, deserialize_with = "cell::text")]
    pub hotel_name: String,
    #[serde(rename = "酒店地址", default, deserialize_with = "cell::text")]
    pub hotel_address: String,
    #[serde(rename = "入住日期", default, deserialize_with = "cell::text")]
    pub check_in: String,
    #[serde(rename = "退房日期", default, deserialize_with = "cell::text")]
    pub check_out: String,
}

impl TravelDetails {
    pub fn flight_summary(&self) -> Option<String> {
        if self.flight_number.trim().is_empty() {
            return None;
        }
        let mut summary = self.flight_number.trim().to_string();
        let leg = |airport: &str, time: &str| match (airport.trim(), time.trim()) {
            ("", "") => None,
            (airport, "") => Some(airport.to_string()),
            ("", time) => Some(time.to_string()),
            (airport, time) => Some(format!("{airport} {time}")),
        };
        match (
            leg(&self.departure_airport, &self.departure_time),
            leg(&self.arrival_airport, &self.arrival_time),
        ) {
            (Some(from), Some(to)) => summary.push_str(&format!(" {from} -> {to}")),
            (Some(from), None) => summary.push_str(&format!(" from {from}")),
            (None, Some(to)) => summary.push_str(&format!(" to {to}")),
            (None, None) => {}
        }
        Some(summary)
    }

    pub fn hotel_summary(&self) -> Option<String> {
        let name = self.hotel_name.trim();
        if name.is_empty() {
            return None;
        }
        let mut summary = name.to_string();
        let address = self.hotel_address.trim();
        if !address.is_empty() {
            summary.push_str(&format!(", {address}"));
        }
        match (self.check_in.trim(), self.check_out.trim()) {
            ("", "") => {}
            (check_in, check_out) => summary.push_str(&format!(" ({check_in} ~ {check_out})")),
        }
        Some(summary)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    #[serde(rename = "名稱", deserialize_with = "cell::text")]
    pub name: String,
    #[serde(rename = "開始日期", deserialize_with = "cell::text")]
    pub start_date: String,
    #[serde(rename = "結束日期", deserialize_with = "cell::text")]
    pub end_date: String,
    #[serde(rename = "國家")]
    pub country: Country,
    #[serde(flatten)]
    pub details: TravelDetails,
}

impl Trip {
    pub fn start(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.start_date.trim(), DATE_FORMAT).ok()
    }

    pub fn end(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.end_date.trim(), DATE_FORMAT).ok()
    }

    /// Inclusive day count; `None` when a date is unparsable or the range is inverted.
    pub fn duration_days(&self) -> Option<i64> {
        let days = (self.end()? - self.start()?).num_days() + 1;
        (days > 0).then_some(days)
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        match (self.start(), self.duration_days()) {
            (Some(start), Some(days)) => (0..days).map(|i| start + Duration::days(i)).collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryItem {
    #[serde(rename = "日期", deserialize_with = "cell::text")]
    pub date: String,
    #[serde(rename = "開始時間", deserialize_with = "cell::text")]
    pub start_time: String,
    #[serde(rename = "結束時間", deserialize_with = "cell::text")]
    pub end_time: String,
    #[serde(rename = "活動", deserialize_with = "cell::text")]
    pub activity: String,
    #[serde(rename = "地圖連結", deserialize_with = "cell::text")]
    pub map_link: String,
    #[serde(rename = "備註", deserialize_with = "cell::text")]
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_trip_index_row_with_travel_details() {
        let trip: Trip = serde_json::from_value(json!({
            "名稱": "Kyoto",
            "開始日期": "2025-04-01",
            "結束日期": "2025-04-03",
            "國家": "日本 (Japan)",
            "航班號": "JL 812",
            "出發機場": "TPE",
            "出發時間": "08:45",
            "抵達機場": "KIX",
            "抵達時間": "12:10",
            "酒店名稱": "",
        }))
        .expect("trip");

        assert_eq!(trip.name, "Kyoto");
        assert_eq!(trip.country, Country::Japan);
        assert_eq!(trip.duration_days(), Some(3));
        assert_eq!(
            trip.details.flight_summary().as_deref(),
            Some("JL 812 TPE 08:45 -> KIX 12:10")
        );
        assert_eq!(trip.details.hotel_summary(), None);
    }

    #[test]
    fn numeric_sheet_cells_decode_as_text() {
        let trip: Trip = serde_json::from_value(json!({
            "名稱": 2025,
            "開始日期": "2025-01-01",
            "結束日期": "2025-01-02",
            "國家": "台灣 (Taiwan)",
        }))
        .expect("trip");
        assert_eq!(trip.name, "2025");
        assert_eq!(trip.details, TravelDetails::default());
    }

    #[test]
    fn rejects_item_missing_required_key() {
        let err = serde_json::from_value::<ItineraryItem>(json!({
            "日期": "2025-04-01",
            "開始時間": "09:00",
            "結束時間": "10:00",
            "活動": "Fushimi Inari",
            "備註": "",
        }))
        .expect_err("map link is required");
        assert!(err.to_string().contains("地圖連結"), "unexpected: {err}");
    }

    #[test]
    fn rejects_unknown_country_label() {
        let err = serde_json::from_value::<Trip>(json!({
            "名稱": "Paris",
            "開始日期": "2025-01-01",
            "結束日期": "2025-01-02",
            "國家": "法國 (France)",
        }));
        assert!(err.is_err());
    }

    #[test]
    fn parses_country_from_label_or_english_name() {
        assert_eq!("韓國 (South Korea)".parse::<Country>().ok(), Some(Country::SouthKorea));
        assert_eq!("thailand".parse::<Country>().ok(), Some(Country::Thailand));
        assert!("mars".parse::<Country>().is_err());
    }

    #[test]
    fn inverted_or_unparsable_range_has_no_days() {
        let mut trip = Trip {
            name: "Seoul".into(),
            start_date: "2025-05-04".into(),
            end_date: "2025-05-01".into(),
            country: Country::SouthKorea,
            details: TravelDetails::default(),
        };
        assert_eq!(trip.duration_days(), None);
        assert!(trip.days().is_empty());

        trip.end_date = "someday".into();
        assert!(trip.days().is_empty());
    }
}
