use crate::blocos::model::{Bloco, City, CitySummary, SocialLinks};
use crate::events::model::{
    Coordinates, Event, EventBloco, EventCity, EventStatus, EventType, RoutePoint,
};
use crate::i18n::LocalizedText;
use serde::Deserialize;
use uuid::Uuid;

// Note: flags may be left out of a `select`, hence `default`
#[derive(Debug, Deserialize)]
pub struct EventRow {
    pub id: Uuid,
    pub bloco_id: Uuid,
    pub city_id: Uuid,
    pub title: String,
    pub event_type: EventType,
    #[serde(default = "scheduled")]
    pub event_status: EventStatus,
    pub description_pt: Option<String>,
    pub description_en: Option<String>,
    pub description_fr: Option<String>,
    pub description_es: Option<String>,
    pub start_datetime: String,
    pub end_datetime: Option<String>,
    #[serde(default)]
    pub all_day: bool,
    pub location_name: Option<String>,
    pub address: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub concentration_location: Option<String>,
    pub concentration_coordinates: Option<Coordinates>,
    pub concentration_time: Option<String>,
    pub dispersal_location: Option<String>,
    pub dispersal_coordinates: Option<Coordinates>,
    pub dispersal_time: Option<String>,
    pub banner_url: Option<String>,
    pub external_url: Option<String>,
    pub external_url_text: Option<String>,
    pub expected_participants: Option<u32>,
    #[serde(default)]
    pub ticket_required: bool,
    pub ticket_price: Option<f64>,
    #[serde(default)]
    pub is_featured: bool,
    pub bloco: Option<EventBlocoRow>,
    pub city: Option<EventCityRow>,
}

fn scheduled() -> EventStatus {
    EventStatus::Scheduled
}

impl EventRow {
    pub fn to_model(self) -> Event {
        Event {
            id: self.id,
            bloco_id: self.bloco_id,
            city_id: self.city_id,
            title: self.title,
            event_type: self.event_type,
            event_status: self.event_status,
            description: LocalizedText::new(
                self.description_pt,
                self.description_en,
                self.description_fr,
                self.description_es,
            ),
            start_datetime: self.start_datetime,
            end_datetime: self.end_datetime,
            all_day: self.all_day,
            location_name: self.location_name,
            address: self.address,
            coordinates: self.coordinates,
            concentration: RoutePoint {
                location: self.concentration_location,
                coordinates: self.concentration_coordinates,
                time: self.concentration_time,
            },
            dispersal: RoutePoint {
                location: self.dispersal_location,
                coordinates: self.dispersal_coordinates,
                time: self.dispersal_time,
            },
            banner_url: self.banner_url,
            external_url: self.external_url,
            external_url_text: self.external_url_text,
            expected_participants: self.expected_participants,
            ticket_required: self.ticket_required,
            ticket_price: self.ticket_price,
            is_featured: self.is_featured,
            bloco: self.bloco.map(EventBlocoRow::to_model),
            city: self.city.map(EventCityRow::to_model),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EventBlocoRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub short_description_pt: Option<String>,
    pub short_description_en: Option<String>,
    pub short_description_fr: Option<String>,
    pub short_description_es: Option<String>,
    pub image_url: Option<String>,
}

impl EventBlocoRow {
    pub fn to_model(self) -> EventBloco {
        EventBloco {
            id: self.id,
            name: self.name,
            slug: self.slug,
            short_description: LocalizedText::new(
                self.short_description_pt,
                self.short_description_en,
                self.short_description_fr,
                self.short_description_es,
            ),
            image_url: self.image_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EventCityRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl EventCityRow {
    pub fn to_model(self) -> EventCity {
        EventCity {
            id: self.id,
            name: self.name,
            slug: self.slug,
            state: self.state,
            country: self.country,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CityRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub state: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
}

impl CityRow {
    pub fn to_model(self) -> City {
        City {
            id: self.id,
            name: self.name,
            slug: self.slug,
            state: self.state,
            country: self.country,
            coordinates: coordinates(self.latitude, self.longitude),
            timezone: self.timezone,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CitySummaryRow {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub struct BlocoRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub short_description_pt: Option<String>,
    pub short_description_en: Option<String>,
    pub short_description_fr: Option<String>,
    pub short_description_es: Option<String>,
    pub long_description_pt: Option<String>,
    pub long_description_en: Option<String>,
    pub long_description_fr: Option<String>,
    pub long_description_es: Option<String>,
    pub founding_year: Option<i32>,
    pub image_url: Option<String>,
    pub website_url: Option<String>,
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
    pub twitter_url: Option<String>,
    pub tiktok_url: Option<String>,
    pub youtube_channel_url: Option<String>,
    pub spotify_profile_url: Option<String>,
    pub spotify_playlist_url: Option<String>,
    pub deezer_url: Option<String>,
    pub soundcloud_url: Option<String>,
    pub bandcamp_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub popularity_score: Option<f64>,
    /// Embedded through `primary_city_id`
    pub cities: Option<CitySummaryRow>,
}

impl BlocoRow {
    pub fn to_model(self) -> Bloco {
        Bloco {
            id: self.id,
            name: self.name,
            slug: self.slug,
            short_description: LocalizedText::new(
                self.short_description_pt,
                self.short_description_en,
                self.short_description_fr,
                self.short_description_es,
            ),
            long_description: LocalizedText::new(
                self.long_description_pt,
                self.long_description_en,
                self.long_description_fr,
                self.long_description_es,
            ),
            founding_year: self.founding_year,
            image_url: self.image_url,
            social_links: SocialLinks {
                website: self.website_url,
                facebook: self.facebook_url,
                instagram: self.instagram_url,
                twitter: self.twitter_url,
                tiktok: self.tiktok_url,
                youtube: self.youtube_channel_url,
                spotify_profile: self.spotify_profile_url,
                spotify_playlist: self.spotify_playlist_url,
                deezer: self.deezer_url,
                soundcloud: self.soundcloud_url,
                bandcamp: self.bandcamp_url,
            },
            coordinates: coordinates(self.latitude, self.longitude),
            popularity_score: self.popularity_score,
            city: self.cities.map(|city| CitySummary {
                name: city.name,
                slug: city.slug,
            }),
        }
    }
}

/// Suggestions only need the display name and slug
#[derive(Debug, Deserialize)]
pub struct NameSlugRow {
    pub name: String,
    pub slug: String,
}

fn coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Option<Coordinates> {
    Some(Coordinates {
        lat: latitude?,
        lon: longitude?,
    })
}
