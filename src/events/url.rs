//! Human-readable event links.
//!
//! An event is addressed as `/{locale}/{city}/eventos/{date}/{type}/{bloco}`,
//! where `{type}` is the event type translated to the locale's vocabulary.

use super::model::{Event, EventType};
use crate::i18n::{Locale, DEFAULT_LOCALE};
use lazy_static::lazy_static;
use std::collections::HashMap;
use strum::IntoEnumIterator;
use tracing::debug;

/// Path segment naming the events collection. Never translated.
pub const EVENTS_MARKER: &str = "eventos";

const SEGMENTS_AFTER_LOCALE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventIdentity {
    /// Written verbatim as the first path segment.
    pub locale: String,
    pub city_slug: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub event_type: EventType,
    pub bloco_slug: String,
}

impl EventIdentity {
    /// Returns `None` when the event was fetched without its bloco or city.
    pub fn from_event(event: &Event, locale: &str) -> Option<Self> {
        Some(Self {
            locale: locale.to_string(),
            city_slug: event.city.as_ref()?.slug.clone(),
            date: event.start_date().to_string(),
            event_type: event.event_type,
            bloco_slug: event.bloco.as_ref()?.slug.clone(),
        })
    }

    pub fn path(&self) -> String {
        encode(self)
    }
}

fn localized_term(locale: Locale, event_type: EventType) -> &'static str {
    match (locale, event_type) {
        (Locale::Pt, EventType::Parade) => "desfile",
        (Locale::Pt, EventType::Rehearsal) => "ensaio",
        (Locale::Pt, EventType::Party) => "festa",
        (Locale::Pt, EventType::Workshop) => "oficina",
        (Locale::En, EventType::Parade) => "parade",
        (Locale::En, EventType::Rehearsal) => "rehearsal",
        (Locale::En, EventType::Party) => "party",
        (Locale::En, EventType::Workshop) => "workshop",
        (Locale::Fr, EventType::Parade) => "defile",
        (Locale::Fr, EventType::Rehearsal) => "repetition",
        (Locale::Fr, EventType::Party) => "fete",
        (Locale::Fr, EventType::Workshop) => "atelier",
        (Locale::Es, EventType::Parade) => "desfile",
        (Locale::Es, EventType::Rehearsal) => "ensayo",
        (Locale::Es, EventType::Party) => "fiesta",
        (Locale::Es, EventType::Workshop) => "taller",
    }
}

lazy_static! {
    static ref EVENT_TYPE_BY_TERM: HashMap<Locale, HashMap<&'static str, EventType>> =
        Locale::iter()
            .map(|locale| {
                let terms = EventType::iter()
                    .map(|event_type| (localized_term(locale, event_type), event_type))
                    .collect();

                (locale, terms)
            })
            .collect();
}

/// Display name of an event type. Unsupported locales use the Portuguese vocabulary.
pub fn localized_label(event_type: EventType, locale: &str) -> &'static str {
    localized_term(Locale::parse_or_default(locale), event_type)
}

/// Every event type with its label, in canonical order.
pub fn supported_event_type_labels(locale: &str) -> Vec<(EventType, &'static str)> {
    let locale = Locale::parse_or_default(locale);

    EventType::iter()
        .map(|event_type| (event_type, localized_term(locale, event_type)))
        .collect()
}

/**
   The locale segment is always written as given, even for the default locale.
   An unsupported locale still gets the default vocabulary for the type segment,
   so the result won't decode back.
*/
pub fn encode(identity: &EventIdentity) -> String {
    format!(
        "/{}/{}/{}/{}/{}/{}",
        identity.locale,
        identity.city_slug,
        EVENTS_MARKER,
        identity.date,
        localized_label(identity.event_type, &identity.locale),
        identity.bloco_slug
    )
}

/**
   Accepts paths with or without the locale segment (bare paths are read as Portuguese).
   Segments past the bloco slug are ignored.
*/
pub fn decode(path: &str) -> Option<EventIdentity> {
    let segments: Vec<&str> = path.strip_prefix('/').unwrap_or(path).split('/').collect();

    let (locale, remaining) = match segments.split_first() {
        Some((first, rest)) => match Locale::from_segment(first) {
            Some(locale) => (locale, rest),
            None => (DEFAULT_LOCALE, segments.as_slice()),
        },
        None => (DEFAULT_LOCALE, segments.as_slice()),
    };

    let [city_slug, marker, date, localized_type, bloco_slug, ..] = remaining else {
        debug!(
            "'{}' has {} segments after the locale, expected at least {}",
            path,
            remaining.len(),
            SEGMENTS_AFTER_LOCALE
        );
        return None;
    };

    if *marker != EVENTS_MARKER {
        debug!("'{}' is not under /{}", path, EVENTS_MARKER);
        return None;
    }

    let Some(event_type) = EVENT_TYPE_BY_TERM
        .get(&locale)
        .and_then(|terms| terms.get(*localized_type))
    else {
        debug!(
            "'{}' is not an event type in the '{}' vocabulary",
            localized_type, locale
        );
        return None;
    };

    Some(EventIdentity {
        locale: locale.to_string(),
        city_slug: city_slug.to_string(),
        date: date.to_string(),
        event_type: *event_type,
        bloco_slug: bloco_slug.to_string(),
    })
}

/// Listing of a city's events, optionally narrowed to a day and then to a type.
pub fn listing_url(
    city_slug: &str,
    date: Option<&str>,
    event_type: Option<EventType>,
    locale: &str,
) -> String {
    let mut url = format!("/{}/{}/{}", locale, city_slug, EVENTS_MARKER);

    if let Some(date) = date {
        url.push('/');
        url.push_str(date);

        if let Some(event_type) = event_type {
            url.push('/');
            url.push_str(localized_label(event_type, locale));
        }
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn identity(locale: &str, event_type: EventType) -> EventIdentity {
        EventIdentity {
            locale: locale.to_string(),
            city_slug: "rio-de-janeiro".to_string(),
            date: "2025-02-10".to_string(),
            event_type,
            bloco_slug: "bloco-x".to_string(),
        }
    }

    #[test_log::test]
    fn every_locale_should_have_a_distinct_term_per_event_type() {
        for locale in Locale::iter() {
            let terms: HashSet<&str> = EventType::iter()
                .map(|event_type| localized_term(locale, event_type))
                .collect();

            assert_eq!(terms.len(), EventType::iter().count(), "{locale}");
            assert_eq!(EVENT_TYPE_BY_TERM[&locale].len(), terms.len());
        }
    }

    #[test_log::test]
    fn should_encode_with_the_locale_vocabulary() {
        assert_eq!(
            encode(&identity("pt", EventType::Parade)),
            "/pt/rio-de-janeiro/eventos/2025-02-10/desfile/bloco-x"
        );
        assert_eq!(
            encode(&identity("fr", EventType::Party)),
            "/fr/rio-de-janeiro/eventos/2025-02-10/fete/bloco-x"
        );
        assert_eq!(
            encode(&identity("es", EventType::Workshop)),
            "/es/rio-de-janeiro/eventos/2025-02-10/taller/bloco-x"
        );
    }

    #[test_log::test]
    fn when_locale_is_unsupported_should_keep_it_but_use_portuguese_terms() {
        let path = encode(&identity("de", EventType::Rehearsal));

        assert_eq!(path, "/de/rio-de-janeiro/eventos/2025-02-10/ensaio/bloco-x");
        assert_eq!(decode(&path), None);
    }

    #[test_log::test]
    fn should_decode_without_leading_slash() {
        let decoded = decode("en/salvador/eventos/2025-02-20/rehearsal/ile-aiye").unwrap();

        assert_eq!(decoded.locale, "en");
        assert_eq!(decoded.city_slug, "salvador");
        assert_eq!(decoded.event_type, EventType::Rehearsal);
    }

    #[test_log::test]
    fn should_ignore_segments_after_the_bloco_slug() {
        let decoded = decode("/pt/recife/eventos/2025-03-01/festa/galo/extra").unwrap();

        assert_eq!(decoded.bloco_slug, "galo");
        assert_eq!(decoded.event_type, EventType::Party);
    }

    #[test_log::test]
    fn when_path_is_empty_should_not_decode() {
        assert_eq!(decode(""), None);
        assert_eq!(decode("/"), None);
        assert_eq!(decode("/pt"), None);
    }

    #[test_log::test]
    fn should_list_labels_in_canonical_order() {
        assert_eq!(
            supported_event_type_labels("fr"),
            vec![
                (EventType::Parade, "defile"),
                (EventType::Rehearsal, "repetition"),
                (EventType::Party, "fete"),
                (EventType::Workshop, "atelier"),
            ]
        );
        assert_eq!(localized_label(EventType::Party, "xx"), "festa");
    }

    #[test_log::test]
    fn should_link_event_by_its_start_day() {
        let row = serde_json::from_str::<crate::supabase::dto::EventRow>(
            r##"
              {
                "id": "0b6f3f0e-8a47-4f5e-9a3c-1f7d2a9b6c11",
                "bloco_id": "7c1e4a2b-5d3f-4e6a-8b9c-0d1e2f3a4b5c",
                "city_id": "1a2b3c4d-5e6f-4a7b-8c9d-0e1f2a3b4c5d",
                "title": "Ensaio do Ilê",
                "event_type": "rehearsal",
                "start_datetime": "2025-02-20T21:00:00-03:00",
                "bloco": {
                  "id": "7c1e4a2b-5d3f-4e6a-8b9c-0d1e2f3a4b5c",
                  "name": "Ilê Aiyê",
                  "slug": "ile-aiye"
                },
                "city": {
                  "id": "1a2b3c4d-5e6f-4a7b-8c9d-0e1f2a3b4c5d",
                  "name": "Salvador",
                  "slug": "salvador"
                }
              }"##,
        )
        .unwrap();
        let mut event = row.to_model();

        assert_eq!(
            EventIdentity::from_event(&event, "en").map(|identity| identity.path()),
            Some("/en/salvador/eventos/2025-02-20/rehearsal/ile-aiye".to_string())
        );

        event.city = None;

        assert_eq!(EventIdentity::from_event(&event, "en"), None);
    }

    #[test_log::test]
    fn should_build_listing_urls() {
        assert_eq!(listing_url("olinda", None, None, "pt"), "/pt/olinda/eventos");
        assert_eq!(
            listing_url("olinda", None, Some(EventType::Parade), "en"),
            "/en/olinda/eventos"
        );
        assert_eq!(
            listing_url("olinda", Some("2025-03-02"), None, "en"),
            "/en/olinda/eventos/2025-03-02"
        );
        assert_eq!(
            listing_url("olinda", Some("2025-03-02"), Some(EventType::Rehearsal), "es"),
            "/es/olinda/eventos/2025-03-02/ensayo"
        );
    }
}
