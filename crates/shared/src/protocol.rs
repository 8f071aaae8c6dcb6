use serde::{Deserialize, Serialize};

use crate::domain::{Country, Trip};

/// Body of `POST /api/trips`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTripDraft {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub country: Country,
}

/// Body of `POST /api/trips/{name}/itinerary`, keyed by the itinerary sheet headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItemDraft {
    #[serde(rename = "日期")]
    pub date: String,
    #[serde(rename = "開始時間")]
    pub start_time: String,
    #[serde(rename = "結束時間")]
    pub end_time: String,
    #[serde(rename = "活動")]
    pub activity: String,
    #[serde(rename = "地圖連結")]
    pub map_link: String,
    #[serde(rename = "備註")]
    pub notes: String,
}

/// The backend answers trip creation either with the bare row or wrapped as
/// `{"ok": true, "trip": {...}}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CreateTripResponse {
    Wrapped { trip: Trip },
    Bare(Trip),
}

impl CreateTripResponse {
    pub fn into_trip(self) -> Trip {
        match self {
            CreateTripResponse::Wrapped { trip } | CreateTripResponse::Bare(trip) => trip,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
}
