use super::error::AppError;
use super::extractors::{ApiJson, ApiQuery};
use super::state::AppState;
use crate::blocos::model::{Bloco, BlocoListItem, City, Suggestion};
use crate::events::calendar::CalendarEntry;
use crate::events::model::{Event, EventType};
use crate::events::url::{self, EventIdentity};
use crate::i18n::{Locale, DEFAULT_LOCALE};
use crate::supabase::query::{
    BlocosQuery, CitiesQuery, EventsQuery, ListPagination, Pagination, SearchQuery, SortBy,
    DEFAULT_SUGGESTIONS_LIMIT,
};
use axum::extract::State;
use axum::http::{header, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// An event as listed by the API, with its link and type label in the requested locale.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventItem {
    #[serde(flatten)]
    pub event: Event,
    pub url: Option<String>,
    pub event_type_label: &'static str,
}

impl EventItem {
    pub fn new(event: Event, locale: &str) -> Self {
        Self {
            url: EventIdentity::from_event(&event, locale).map(|identity| identity.path()),
            event_type_label: url::localized_label(event.event_type, locale),
            event,
        }
    }
}

fn locale_or_default(locale: &Option<String>) -> &str {
    locale.as_deref().unwrap_or(DEFAULT_LOCALE.as_str())
}

pub async fn health_handler() -> &'static str {
    "ok"
}

#[derive(Serialize)]
pub struct EventsPage {
    pub data: Vec<EventItem>,
    pub pagination: Pagination,
}

#[instrument(skip(state))]
pub async fn events_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EventsQuery>,
) -> Result<Json<EventsPage>, AppError> {
    if let Some(date) = &query.date {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| AppError::bad_request(format!("'{}' is not a YYYY-MM-DD date", date)))?;
    }

    let (events, total) = state.supabase.get_events(&query).await?;
    let locale = Locale::parse_or_default(locale_or_default(&query.locale)).as_str();

    Ok(Json(EventsPage {
        data: events
            .into_iter()
            .map(|event| EventItem::new(event, locale))
            .collect(),
        pagination: Pagination::new(total, query.limit(), query.offset()),
    }))
}

#[derive(Serialize)]
pub struct BlocosFilters {
    pub city: Option<String>,
}

#[derive(Serialize)]
pub struct BlocosMetadata {
    pub locale: Locale,
    pub city: Option<String>,
    pub filters: BlocosFilters,
}

#[derive(Serialize)]
pub struct BlocosPage {
    pub data: Vec<BlocoListItem>,
    pub pagination: ListPagination,
    pub metadata: BlocosMetadata,
}

#[instrument(skip(state))]
pub async fn blocos_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<BlocosQuery>,
) -> Result<Json<BlocosPage>, AppError> {
    let (blocos, total) = state.supabase.get_blocos(&query).await?;
    let locale = Locale::parse_or_default(locale_or_default(&query.locale));

    Ok(Json(BlocosPage {
        data: blocos
            .into_iter()
            .map(|bloco| BlocoListItem::new(bloco, locale))
            .collect(),
        pagination: ListPagination::new(total, query.limit(), query.offset()),
        metadata: BlocosMetadata {
            locale,
            city: query.city.clone(),
            filters: BlocosFilters { city: query.city },
        },
    }))
}

#[derive(Serialize)]
pub struct CitiesPage {
    pub data: Vec<City>,
    pub pagination: ListPagination,
}

#[instrument(skip(state))]
pub async fn cities_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CitiesQuery>,
) -> Result<Json<CitiesPage>, AppError> {
    let (cities, total) = state.supabase.get_cities(&query).await?;

    Ok(Json(CitiesPage {
        data: cities,
        pagination: ListPagination::new(total, query.limit(), query.offset()),
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    pub city: Option<String>,
    pub event_type: Option<EventType>,
    pub has_instagram: bool,
    pub has_spotify: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMetadata {
    pub query: String,
    pub locale: Locale,
    pub filters: SearchFilters,
    pub sort_by: SortBy,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPagination {
    pub total: usize,
    pub limit: u32,
    pub has_more: bool,
}

#[derive(Serialize)]
pub struct SearchPage {
    pub data: Vec<Bloco>,
    pub pagination: SearchPagination,
    pub metadata: SearchMetadata,
}

#[instrument(skip(state))]
pub async fn search_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<Json<SearchPage>, AppError> {
    let blocos = state.supabase.search_blocos(&query).await?;
    let limit = query.limit();
    let total = blocos.len();

    Ok(Json(SearchPage {
        data: blocos,
        pagination: SearchPagination {
            total,
            limit,
            has_more: total == limit as usize,
        },
        metadata: SearchMetadata {
            locale: Locale::parse_or_default(locale_or_default(&query.locale)),
            filters: SearchFilters {
                city: query.city,
                event_type: query.event_type,
                has_instagram: query.has_instagram.unwrap_or(false),
                has_spotify: query.has_spotify.unwrap_or(false),
            },
            sort_by: query.sort_by.unwrap_or_default(),
            query: query.q,
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct SuggestionsRequest {
    #[serde(default)]
    pub query: String,
    pub limit: Option<u32>,
}

#[derive(Serialize)]
pub struct SuggestionsPage {
    pub data: Vec<Suggestion>,
}

#[instrument(skip(state))]
pub async fn suggestions_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SuggestionsRequest>,
) -> Result<Json<SuggestionsPage>, AppError> {
    let data = state
        .supabase
        .get_suggestions(
            &request.query,
            request.limit.unwrap_or(DEFAULT_SUGGESTIONS_LIMIT),
        )
        .await?;

    Ok(Json(SuggestionsPage { data }))
}

#[derive(Debug, Deserialize)]
pub struct LocaleQuery {
    pub locale: Option<String>,
}

#[derive(Serialize)]
pub struct EventTypeOption {
    pub value: EventType,
    pub label: &'static str,
}

pub async fn event_types_handler(
    ApiQuery(query): ApiQuery<LocaleQuery>,
) -> Json<Vec<EventTypeOption>> {
    Json(
        url::supported_event_type_labels(locale_or_default(&query.locale))
            .into_iter()
            .map(|(value, label)| EventTypeOption { value, label })
            .collect(),
    )
}

#[derive(Debug, Deserialize)]
pub struct EventPageQuery {
    pub format: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarLinks {
    pub google: String,
    pub ics: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPage {
    pub canonical_url: String,
    pub event_type_label: &'static str,
    pub event: Event,
    pub bloco: Bloco,
    pub city: City,
    pub related: Vec<EventItem>,
    pub calendar: Option<CalendarLinks>,
}

/**
   Any path that isn't an API route is read as an event link.
   `?format=ics` downloads the event as a calendar file.
*/
#[instrument(skip(state, uri), fields(path = %uri.path()))]
pub async fn event_page_handler(
    State(state): State<AppState>,
    uri: Uri,
    ApiQuery(query): ApiQuery<EventPageQuery>,
) -> Result<Response, AppError> {
    let identity = url::decode(uri.path()).ok_or_else(|| AppError::not_found("Page"))?;
    let detail = state
        .supabase
        .find_event(&identity)
        .await?
        .ok_or_else(|| AppError::not_found("Event"))?;

    let locale = Locale::parse_or_default(&identity.locale);
    let calendar_entry = CalendarEntry::from_event(&detail.event, locale);

    if query.format.as_deref() == Some("ics") {
        let entry = calendar_entry.ok_or_else(|| AppError::not_found("Calendar entry"))?;

        info!("Exporting calendar entry");

        return Ok((
            [
                (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", entry.file_name()),
                ),
            ],
            entry.to_ical(Utc::now()),
        )
            .into_response());
    }

    // A page without related events is still a page
    let related = state
        .supabase
        .get_related_events(&detail.event)
        .await
        .unwrap_or_else(|err| {
            warn!("Couldn't get related events: {}", err);
            Vec::new()
        });
    let canonical_url = identity.path();

    Ok(Json(EventPage {
        calendar: calendar_entry.map(|entry| CalendarLinks {
            google: entry.google_calendar_url(),
            ics: format!("{}?format=ics", canonical_url),
        }),
        event_type_label: url::localized_label(identity.event_type, &identity.locale),
        canonical_url,
        related: related
            .into_iter()
            .map(|event| EventItem::new(event, &identity.locale))
            .collect(),
        event: detail.event,
        bloco: detail.bloco,
        city: detail.city,
    })
    .into_response())
}
