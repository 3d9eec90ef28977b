//! Filters accepted by the listing endpoints and their translation into PostgREST parameters.

use crate::events::model::EventType;
use chrono::{DateTime, SecondsFormat, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

pub type QueryParams = Vec<(String, String)>;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_CITIES_PAGE_SIZE: u32 = 50;
pub const RELATED_EVENTS_LIMIT: u32 = 6;
pub const CITY_SUGGESTIONS_LIMIT: u32 = 3;
pub const DEFAULT_SUGGESTIONS_LIMIT: u32 = 5;
pub const MIN_SUGGESTION_QUERY_LEN: usize = 2;

const BLOCO_EMBED_FIELDS: [&str; 11] = [
    "id",
    "name",
    "slug",
    "short_description_pt",
    "short_description_en",
    "short_description_fr",
    "short_description_es",
    "image_url",
    "instagram_url",
    "facebook_url",
    "youtube_channel_url",
];
const CITY_EMBED_FIELDS: [&str; 5] = ["id", "name", "slug", "state", "country"];
const BLOCO_LIST_FIELDS: [&str; 15] = [
    "id",
    "name",
    "slug",
    "short_description_pt",
    "short_description_en",
    "short_description_fr",
    "short_description_es",
    "image_url",
    "founding_year",
    "facebook_url",
    "instagram_url",
    "youtube_channel_url",
    "spotify_profile_url",
    "spotify_playlist_url",
    "popularity_score",
];
pub const CITY_FIELDS: &str = "id,name,slug,state,country,latitude,longitude,timezone";

fn param(key: &str, value: impl Into<String>) -> (String, String) {
    (key.to_string(), value.into())
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

/// `!inner` makes filters on the embedded table drop the parent rows that don't match.
fn embed(alias: &str, foreign_key: &str, fields: &[&str], inner: bool) -> String {
    format!(
        "{}:{}{}({})",
        alias,
        foreign_key,
        if inner { "!inner" } else { "" },
        fields.iter().join(",")
    )
}

pub fn event_select(inner_bloco: bool, inner_city: bool) -> String {
    format!(
        "*,{},{}",
        embed("bloco", "bloco_id", &BLOCO_EMBED_FIELDS, inner_bloco),
        embed("city", "city_id", &CITY_EMBED_FIELDS, inner_city)
    )
}

pub fn bloco_select(inner_city: bool) -> String {
    format!(
        "{},{}",
        BLOCO_LIST_FIELDS.iter().join(","),
        embed("cities", "primary_city_id", &["name", "slug"], inner_city)
    )
}

pub fn bloco_detail_select() -> String {
    format!(
        "*,{}",
        embed("cities", "primary_city_id", &["name", "slug"], false)
    )
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Events that are published and still happening.
fn visible_events() -> QueryParams {
    vec![
        param("is_draft", eq(false)),
        param("event_status", "neq.cancelled"),
        param("order", "start_datetime.asc"),
    ]
}

fn day_range(date: &str) -> [(String, String); 2] {
    [
        param("start_datetime", format!("gte.{}T00:00:00", date)),
        param("start_datetime", format!("lte.{}T23:59:59", date)),
    ]
}

fn page(limit: u32, offset: u32) -> [(String, String); 2] {
    [
        param("limit", limit.to_string()),
        param("offset", offset.to_string()),
    ]
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsQuery {
    pub city: Option<String>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    pub event_type: Option<EventType>,
    pub bloco_slug: Option<String>,
    pub bloco_id: Option<Uuid>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub upcoming: Option<bool>,
    /// Only used to build the event links in the response
    pub locale: Option<String>,
}

impl EventsQuery {
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }

    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }

    pub fn to_params(&self, now: DateTime<Utc>) -> QueryParams {
        let mut params = vec![param(
            "select",
            event_select(self.bloco_slug.is_some(), self.city.is_some()),
        )];

        params.extend(visible_events());

        if let Some(city) = &self.city {
            params.push(param("city.slug", eq(city)));
        }

        if let Some(date) = &self.date {
            params.extend(day_range(date));
        }

        if let Some(event_type) = self.event_type {
            params.push(param("event_type", eq(event_type)));
        }

        if let Some(bloco_slug) = &self.bloco_slug {
            params.push(param("bloco.slug", eq(bloco_slug)));
        }

        if let Some(bloco_id) = self.bloco_id {
            params.push(param("bloco_id", eq(bloco_id)));
        }

        if self.upcoming.unwrap_or(false) {
            params.push(param("start_datetime", format!("gte.{}", timestamp(now))));
        }

        params.extend(page(self.limit(), self.offset()));
        params
    }
}

/// The single event behind an event link.
pub fn event_lookup_params(
    city_id: Uuid,
    bloco_id: Uuid,
    event_type: EventType,
    date: &str,
) -> QueryParams {
    let mut params = vec![
        param("select", event_select(false, false)),
        param("city_id", eq(city_id)),
        param("bloco_id", eq(bloco_id)),
        param("event_type", eq(event_type)),
        param("is_draft", eq(false)),
        param("order", "start_datetime.asc"),
    ];

    params.extend(day_range(date));
    params.push(param("limit", "1"));
    params
}

/// Upcoming events sharing the city, the bloco or the type of the given event.
pub fn related_events_params(
    event_id: Uuid,
    city_id: Uuid,
    bloco_id: Uuid,
    event_type: EventType,
    now: DateTime<Utc>,
) -> QueryParams {
    let mut params = vec![
        param("select", event_select(false, false)),
        param("id", format!("neq.{}", event_id)),
        param(
            "or",
            format!(
                "(city_id.eq.{},bloco_id.eq.{},event_type.eq.{})",
                city_id, bloco_id, event_type
            ),
        ),
        param("start_datetime", format!("gte.{}", timestamp(now))),
    ];

    params.extend(visible_events());
    params.push(param("limit", RELATED_EVENTS_LIMIT.to_string()));
    params
}

pub fn slug_lookup_params(select: &str, slug: &str) -> QueryParams {
    vec![
        param("select", select),
        param("slug", eq(slug)),
        param("limit", "1"),
    ]
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CitiesQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl CitiesQuery {
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_CITIES_PAGE_SIZE).max(1)
    }

    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params = vec![param("select", CITY_FIELDS), param("order", "name.asc")];

        params.extend(page(self.limit(), self.offset()));
        params
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlocosQuery {
    pub locale: Option<String>,
    pub city: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl BlocosQuery {
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }

    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params = vec![
            param("select", bloco_select(self.city.is_some())),
            param("is_draft", eq(false)),
        ];

        if let Some(city) = &self.city {
            params.push(param("cities.slug", eq(city)));
        }

        params.push(param("order", "name.asc"));
        params.extend(page(self.limit(), self.offset()));
        params
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Relevance,
    Name,
    Popularity,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub locale: Option<String>,
    pub city: Option<String>,
    /// Echoed back in the response metadata; blocos have no event type
    pub event_type: Option<EventType>,
    pub has_instagram: Option<bool>,
    pub has_spotify: Option<bool>,
    pub sort_by: Option<SortBy>,
    pub limit: Option<u32>,
}

impl SearchQuery {
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params = vec![
            param("select", bloco_select(self.city.is_some())),
            param("is_draft", eq(false)),
        ];

        let text = self.q.trim();
        if !text.is_empty() {
            params.push(param("search_vector", format!("wfts(portuguese).{}", text)));
        }

        if let Some(city) = &self.city {
            params.push(param("cities.slug", eq(city)));
        }

        if self.has_instagram.unwrap_or(false) {
            params.push(param("instagram_url", "not.is.null"));
        }

        if self.has_spotify.unwrap_or(false) {
            params.push(param("spotify_playlist_url", "not.is.null"));
        }

        let order = match self.sort_by.unwrap_or_default() {
            SortBy::Name => "name.asc",
            SortBy::Relevance | SortBy::Popularity => "popularity_score.desc",
        };
        params.push(param("order", order));
        params.push(param("limit", self.limit().to_string()));
        params
    }
}

/// Case-insensitive prefix match on `name`.
pub fn name_prefix_params(query: &str, limit: u32, published_only: bool) -> QueryParams {
    let mut params = vec![
        param("select", "name,slug"),
        param("name", format!("ilike.{}*", query)),
    ];

    if published_only {
        params.push(param("is_draft", eq(false)));
    }

    params.push(param("limit", limit.to_string()));
    params
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub limit: u32,
    pub offset: u32,
}

impl Pagination {
    pub fn new(total: u64, limit: u32, offset: u32) -> Self {
        let limit = limit.max(1);
        let page_size = u64::from(limit);
        let offset_rows = u64::from(offset);

        Self {
            total,
            total_pages: total.div_ceil(page_size),
            current_page: offset_rows / page_size + 1,
            has_next_page: offset_rows + page_size < total,
            has_prev_page: offset > 0,
            limit,
            offset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPagination {
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
    pub has_more: bool,
}

impl ListPagination {
    pub fn new(total: u64, limit: u32, offset: u32) -> Self {
        Self {
            total,
            limit,
            offset,
            has_more: total > u64::from(offset) + u64::from(limit),
        }
    }
}

/// Total row count from a `Content-Range: 0-19/57` header. `*/0` means no rows.
pub fn parse_content_range_total(header: &str) -> Option<u64> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn values<'a>(params: &'a QueryParams, key: &str) -> Vec<&'a str> {
        params
            .iter()
            .filter(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap()
    }

    #[test_log::test]
    fn should_filter_events_by_day_type_and_city() {
        let query = EventsQuery {
            city: Some("olinda".to_string()),
            date: Some("2025-03-02".to_string()),
            event_type: Some(EventType::Parade),
            ..EventsQuery::default()
        };

        let params = query.to_params(now());

        assert_eq!(values(&params, "city.slug"), vec!["eq.olinda"]);
        assert_eq!(values(&params, "event_type"), vec!["eq.parade"]);
        assert_eq!(
            values(&params, "start_datetime"),
            vec!["gte.2025-03-02T00:00:00", "lte.2025-03-02T23:59:59"]
        );
        assert_eq!(values(&params, "order"), vec!["start_datetime.asc"]);
        assert_eq!(values(&params, "limit"), vec!["20"]);
        assert_eq!(values(&params, "offset"), vec!["0"]);
        assert!(values(&params, "select")[0].contains("city:city_id!inner("));
        assert!(values(&params, "select")[0].contains("bloco:bloco_id("));
        assert!(!values(&params, "select")[0].contains("bloco:bloco_id!inner"));
    }

    #[test_log::test]
    fn when_upcoming_should_only_get_events_from_now_on() {
        let query = EventsQuery {
            upcoming: Some(true),
            limit: Some(5),
            offset: Some(10),
            ..EventsQuery::default()
        };

        let params = query.to_params(now());

        assert_eq!(
            values(&params, "start_datetime"),
            vec!["gte.2025-02-01T12:00:00Z"]
        );
        assert_eq!(values(&params, "limit"), vec!["5"]);
        assert_eq!(values(&params, "offset"), vec!["10"]);
    }

    #[test_log::test]
    fn should_deserialize_events_query_from_camel_case() {
        let query: EventsQuery = serde_json::from_value(serde_json::json!({
            "eventType": "workshop",
            "blocoSlug": "galo-da-madrugada",
            "upcoming": true
        }))
        .unwrap();

        assert_eq!(query.event_type, Some(EventType::Workshop));
        assert_eq!(query.bloco_slug.as_deref(), Some("galo-da-madrugada"));
        assert_eq!(query.upcoming, Some(true));
    }

    #[test_log::test]
    fn should_look_up_event_within_its_day() {
        let city_id = Uuid::new_v4();
        let bloco_id = Uuid::new_v4();

        let params = event_lookup_params(city_id, bloco_id, EventType::Rehearsal, "2025-02-10");

        assert_eq!(values(&params, "city_id"), vec![format!("eq.{}", city_id)]);
        assert_eq!(values(&params, "bloco_id"), vec![format!("eq.{}", bloco_id)]);
        assert_eq!(values(&params, "event_type"), vec!["eq.rehearsal"]);
        assert_eq!(values(&params, "limit"), vec!["1"]);
    }

    #[test_log::test]
    fn should_relate_events_by_city_bloco_or_type() {
        let event_id = Uuid::new_v4();
        let city_id = Uuid::new_v4();
        let bloco_id = Uuid::new_v4();

        let params = related_events_params(event_id, city_id, bloco_id, EventType::Party, now());

        assert_eq!(values(&params, "id"), vec![format!("neq.{}", event_id)]);
        assert_eq!(
            values(&params, "or"),
            vec![format!(
                "(city_id.eq.{},bloco_id.eq.{},event_type.eq.party)",
                city_id, bloco_id
            )]
        );
        assert_eq!(values(&params, "limit"), vec!["6"]);
    }

    #[test_log::test]
    fn should_search_blocos_by_text_and_socials() {
        let query = SearchQuery {
            q: "  galo ".to_string(),
            has_instagram: Some(true),
            sort_by: Some(SortBy::Name),
            ..SearchQuery::default()
        };

        let params = query.to_params();

        assert_eq!(values(&params, "search_vector"), vec!["wfts(portuguese).galo"]);
        assert_eq!(values(&params, "instagram_url"), vec!["not.is.null"]);
        assert!(values(&params, "spotify_playlist_url").is_empty());
        assert_eq!(values(&params, "order"), vec!["name.asc"]);
    }

    #[test_log::test]
    fn when_search_text_is_blank_should_sort_by_popularity() {
        let params = SearchQuery {
            q: "   ".to_string(),
            ..SearchQuery::default()
        }
        .to_params();

        assert!(values(&params, "search_vector").is_empty());
        assert_eq!(values(&params, "order"), vec!["popularity_score.desc"]);
    }

    #[test_log::test]
    fn should_filter_blocos_by_primary_city() {
        let params = BlocosQuery {
            city: Some("salvador".to_string()),
            ..BlocosQuery::default()
        }
        .to_params();

        assert_eq!(values(&params, "cities.slug"), vec!["eq.salvador"]);
        assert!(values(&params, "select")[0].ends_with("cities:primary_city_id!inner(name,slug)"));
    }

    #[test_log::test]
    fn should_paginate() {
        assert_eq!(
            Pagination::new(57, 20, 20),
            Pagination {
                total: 57,
                total_pages: 3,
                current_page: 2,
                has_next_page: true,
                has_prev_page: true,
                limit: 20,
                offset: 20,
            }
        );

        let last_page = Pagination::new(57, 20, 40);
        assert!(!last_page.has_next_page);
        assert_eq!(last_page.current_page, 3);

        let empty = Pagination::new(0, 20, 0);
        assert_eq!(empty.total_pages, 0);
        assert_eq!(empty.current_page, 1);
        assert!(!empty.has_prev_page);
    }

    #[test_log::test]
    fn should_tell_when_list_has_more() {
        assert!(ListPagination::new(51, 50, 0).has_more);
        assert!(!ListPagination::new(50, 50, 0).has_more);
    }

    #[test_log::test]
    fn should_read_total_from_content_range() {
        assert_eq!(parse_content_range_total("0-19/57"), Some(57));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-19/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }
}
