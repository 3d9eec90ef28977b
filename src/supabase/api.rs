use super::dto::{BlocoRow, CityRow, EventRow, NameSlugRow};
use super::query::{
    self, BlocosQuery, CitiesQuery, EventsQuery, QueryParams, SearchQuery,
    CITY_SUGGESTIONS_LIMIT, MIN_SUGGESTION_QUERY_LEN,
};
use crate::blocos::model::{Bloco, City, Suggestion};
use crate::config::model::SupabaseConfig;
use crate::events::model::Event;
use crate::events::url::EventIdentity;
use chrono::Utc;
use reqwest::header::CONTENT_RANGE;
use reqwest::{Client, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

const CITIES_TABLE: &str = "cities";
const BLOCOS_TABLE: &str = "blocos";
const EVENTS_TABLE: &str = "events";

#[derive(Debug, Error)]
pub enum APIError {
    #[error("request to the data store failed: {0}")]
    Request(#[from] reqwest_middleware::Error),
    #[error("data store answered with status {0}")]
    Status(StatusCode),
    #[error("invalid response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

impl From<reqwest::Error> for APIError {
    fn from(err: reqwest::Error) -> Self {
        APIError::Request(reqwest_middleware::Error::Reqwest(err))
    }
}

/// An event resolved from its link, with the full bloco and city records.
#[derive(Debug, Clone)]
pub struct EventDetail {
    pub event: Event,
    pub bloco: Bloco,
    pub city: City,
}

/// Read-only client over the Supabase REST (PostgREST) interface.
pub struct SupabaseAPI {
    rest_url: String,
    anon_key: String,
    client: ClientWithMiddleware,
}

impl SupabaseAPI {
    pub fn new(config: &SupabaseConfig) -> Self {
        let client = ClientBuilder::new(Client::new())
            .with(RetryTransientMiddleware::new_with_policy(
                ExponentialBackoff::builder().build_with_max_retries(config.max_retries),
            ))
            .build();

        Self {
            rest_url: format!("{}/rest/v1", config.url.trim_end_matches('/')),
            anon_key: config.anon_key.clone(),
            client,
        }
    }

    /// Rows of `table`, plus the total row count when `count` is set.
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        params: &QueryParams,
        count: bool,
    ) -> Result<(Vec<T>, Option<u64>), APIError> {
        let mut request = self
            .client
            .get(format!("{}/{}", self.rest_url, table))
            .query(params)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key);

        if count {
            request = request.header("Prefer", "count=exact");
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("'{}' query failed with {}: {}", table, status, body);
            return Err(APIError::Status(status));
        }

        let total = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(query::parse_content_range_total);
        let body = response.text().await?;
        let rows = serde_json::from_str::<Vec<T>>(&body).inspect_err(|err| {
            warn!("Response parse failed for '{}': {:?}", table, err);
        })?;

        debug!("Got {} rows from '{}'", rows.len(), table);

        Ok((rows, total))
    }

    async fn select_first<T: DeserializeOwned>(
        &self,
        table: &str,
        params: &QueryParams,
    ) -> Result<Option<T>, APIError> {
        let (rows, _) = self.select::<T>(table, params, false).await?;

        Ok(rows.into_iter().next())
    }

    /**
       Returns events with ascending start, and the total matching the filters
    */
    #[instrument(skip(self))]
    pub async fn get_events(&self, query: &EventsQuery) -> Result<(Vec<Event>, u64), APIError> {
        let (rows, total) = self
            .select::<EventRow>(EVENTS_TABLE, &query.to_params(Utc::now()), true)
            .await?;
        let events: Vec<Event> = rows.into_iter().map(EventRow::to_model).collect();

        info!("Got {} events", events.len());

        let total = total.unwrap_or(events.len() as u64);

        Ok((events, total))
    }

    #[instrument(skip(self))]
    pub async fn get_city(&self, slug: &str) -> Result<Option<City>, APIError> {
        let params = query::slug_lookup_params(query::CITY_FIELDS, slug);

        Ok(self
            .select_first::<CityRow>(CITIES_TABLE, &params)
            .await?
            .map(CityRow::to_model))
    }

    #[instrument(skip(self))]
    pub async fn get_bloco(&self, slug: &str) -> Result<Option<Bloco>, APIError> {
        let params = query::slug_lookup_params(&query::bloco_detail_select(), slug);

        Ok(self
            .select_first::<BlocoRow>(BLOCOS_TABLE, &params)
            .await?
            .map(BlocoRow::to_model))
    }

    /// Resolves a decoded event link. `None` if the city, the bloco or the event don't exist.
    #[instrument(skip(self), fields(path = %identity.path()))]
    pub async fn find_event(&self, identity: &EventIdentity) -> Result<Option<EventDetail>, APIError> {
        let (city, bloco) = futures::try_join!(
            self.get_city(&identity.city_slug),
            self.get_bloco(&identity.bloco_slug)
        )?;

        let Some(city) = city else {
            info!("City not found: {}", identity.city_slug);
            return Ok(None);
        };
        let Some(bloco) = bloco else {
            info!("Bloco not found: {}", identity.bloco_slug);
            return Ok(None);
        };

        let params =
            query::event_lookup_params(city.id, bloco.id, identity.event_type, &identity.date);
        let event = self.select_first::<EventRow>(EVENTS_TABLE, &params).await?;

        match event {
            None => {
                info!("Event not found");
                Ok(None)
            }
            Some(event) => Ok(Some(EventDetail {
                event: event.to_model(),
                bloco,
                city,
            })),
        }
    }

    #[instrument(skip(self, event), fields(event_id = %event.id))]
    pub async fn get_related_events(&self, event: &Event) -> Result<Vec<Event>, APIError> {
        let params = query::related_events_params(
            event.id,
            event.city_id,
            event.bloco_id,
            event.event_type,
            Utc::now(),
        );
        let (rows, _) = self.select::<EventRow>(EVENTS_TABLE, &params, false).await?;

        Ok(rows.into_iter().map(EventRow::to_model).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_cities(&self, query: &CitiesQuery) -> Result<(Vec<City>, u64), APIError> {
        let (rows, total) = self
            .select::<CityRow>(CITIES_TABLE, &query.to_params(), true)
            .await?;
        let cities: Vec<City> = rows.into_iter().map(CityRow::to_model).collect();

        let total = total.unwrap_or(cities.len() as u64);

        Ok((cities, total))
    }

    #[instrument(skip(self))]
    pub async fn get_blocos(&self, query: &BlocosQuery) -> Result<(Vec<Bloco>, u64), APIError> {
        let (rows, total) = self
            .select::<BlocoRow>(BLOCOS_TABLE, &query.to_params(), true)
            .await?;
        let blocos: Vec<Bloco> = rows.into_iter().map(BlocoRow::to_model).collect();

        let total = total.unwrap_or(blocos.len() as u64);

        Ok((blocos, total))
    }

    #[instrument(skip(self))]
    pub async fn search_blocos(&self, query: &SearchQuery) -> Result<Vec<Bloco>, APIError> {
        let (rows, _) = self
            .select::<BlocoRow>(BLOCOS_TABLE, &query.to_params(), false)
            .await?;

        info!("Search matched {} blocos", rows.len());

        Ok(rows.into_iter().map(BlocoRow::to_model).collect())
    }

    /// Blocos first, then cities. Too short queries give no suggestions.
    #[instrument(skip(self))]
    pub async fn get_suggestions(&self, text: &str, limit: u32) -> Result<Vec<Suggestion>, APIError> {
        if text.chars().count() < MIN_SUGGESTION_QUERY_LEN {
            return Ok(Vec::new());
        }

        let bloco_params = query::name_prefix_params(text, limit, true);
        let city_params = query::name_prefix_params(text, CITY_SUGGESTIONS_LIMIT, false);

        let ((blocos, _), (cities, _)) = futures::try_join!(
            self.select::<NameSlugRow>(BLOCOS_TABLE, &bloco_params, false),
            self.select::<NameSlugRow>(CITIES_TABLE, &city_params, false)
        )?;

        Ok(blocos
            .into_iter()
            .map(|bloco| Suggestion::for_bloco(bloco.name, &bloco.slug))
            .chain(
                cities
                    .into_iter()
                    .map(|city| Suggestion::for_city(city.name, &city.slug)),
            )
            .collect())
    }
}
