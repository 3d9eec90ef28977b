use crate::i18n::LocalizedText;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

/// Canonical, locale-independent event category.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Parade,
    Rehearsal,
    Party,
    Workshop,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Scheduled,
    Cancelled,
    Postponed,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A meeting or leaving point of a parade
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoutePoint {
    pub location: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub time: Option<String>,
}

impl RoutePoint {
    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.coordinates.is_none() && self.time.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventBloco {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub short_description: LocalizedText,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventCity {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub state: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: Uuid,
    pub bloco_id: Uuid,
    pub city_id: Uuid,
    pub title: String,
    pub event_type: EventType,
    pub event_status: EventStatus,
    pub description: LocalizedText,
    /// Kept as stored so the URL date segment is an exact prefix of it
    pub start_datetime: String,
    pub end_datetime: Option<String>,
    pub all_day: bool,
    pub location_name: Option<String>,
    pub address: Option<String>,
    pub coordinates: Option<Coordinates>,
    #[serde(skip_serializing_if = "RoutePoint::is_empty")]
    pub concentration: RoutePoint,
    #[serde(skip_serializing_if = "RoutePoint::is_empty")]
    pub dispersal: RoutePoint,
    pub banner_url: Option<String>,
    pub external_url: Option<String>,
    pub external_url_text: Option<String>,
    pub expected_participants: Option<u32>,
    pub ticket_required: bool,
    pub ticket_price: Option<f64>,
    pub is_featured: bool,
    pub bloco: Option<EventBloco>,
    pub city: Option<EventCity>,
}

impl Event {
    /// `YYYY-MM-DD` part of the start timestamp
    pub fn start_date(&self) -> &str {
        self.start_datetime
            .split('T')
            .next()
            .unwrap_or(&self.start_datetime)
    }

    /// Location line used in listings and calendar entries.
    pub fn full_location(&self) -> String {
        [self.location_name.as_deref(), self.address.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .join(", ")
    }
}
