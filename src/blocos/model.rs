use crate::events::model::Coordinates;
use crate::i18n::{Locale, LocalizedText};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct City {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub state: Option<String>,
    pub country: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitySummary {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SocialLinks {
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub tiktok: Option<String>,
    pub youtube: Option<String>,
    pub spotify_profile: Option<String>,
    pub spotify_playlist: Option<String>,
    pub deezer: Option<String>,
    pub soundcloud: Option<String>,
    pub bandcamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bloco {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub short_description: LocalizedText,
    pub long_description: LocalizedText,
    pub founding_year: Option<i32>,
    pub image_url: Option<String>,
    pub social_links: SocialLinks,
    pub coordinates: Option<Coordinates>,
    pub popularity_score: Option<f64>,
    pub city: Option<CitySummary>,
}

/// A bloco as shown in listings, with the description already picked for the visitor's locale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlocoListItem {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub short_description: LocalizedText,
    pub image_url: Option<String>,
    pub founding_year: Option<i32>,
    pub city: Option<CitySummary>,
    pub social_links: SocialLinks,
}

impl BlocoListItem {
    pub fn new(bloco: Bloco, locale: Locale) -> Self {
        Self {
            description: bloco.short_description.get(locale).map(str::to_string),
            id: bloco.id,
            name: bloco.name,
            slug: bloco.slug,
            short_description: bloco.short_description,
            image_url: bloco.image_url,
            founding_year: bloco.founding_year,
            city: bloco.city,
            social_links: bloco.social_links,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Bloco,
    City,
}

/// Autocomplete entry for the search box
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub category: &'static str,
    pub url: String,
}

impl Suggestion {
    pub fn for_bloco(name: String, slug: &str) -> Self {
        Self {
            text: name,
            kind: SuggestionKind::Bloco,
            category: "Blocos",
            url: format!("/blocos/{}", slug),
        }
    }

    pub fn for_city(name: String, slug: &str) -> Self {
        Self {
            text: name,
            kind: SuggestionKind::City,
            category: "Cidades",
            url: format!("/{}", slug),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bloco() -> Bloco {
        Bloco {
            id: Uuid::new_v4(),
            name: "Ilê Aiyê".to_string(),
            slug: "ile-aiye".to_string(),
            short_description: LocalizedText::new(
                Some("Bloco afro".to_string()),
                None,
                Some("Bloc afro".to_string()),
                None,
            ),
            long_description: LocalizedText::default(),
            founding_year: Some(1974),
            image_url: None,
            social_links: SocialLinks {
                instagram: Some("https://instagram.com/ileaiyeoficial".to_string()),
                ..SocialLinks::default()
            },
            coordinates: None,
            popularity_score: None,
            city: Some(CitySummary {
                name: "Salvador".to_string(),
                slug: "salvador".to_string(),
            }),
        }
    }

    #[test_log::test]
    fn should_pick_description_for_locale() {
        assert_eq!(
            BlocoListItem::new(bloco(), Locale::Fr).description.as_deref(),
            Some("Bloc afro")
        );
        assert_eq!(
            BlocoListItem::new(bloco(), Locale::En).description.as_deref(),
            Some("Bloco afro")
        );
    }

    #[test_log::test]
    fn should_serialize_suggestion_kind_as_type() {
        let json = serde_json::to_value(Suggestion::for_city("Olinda".to_string(), "olinda")).unwrap();

        assert_eq!(json["type"], "city");
        assert_eq!(json["category"], "Cidades");
        assert_eq!(json["url"], "/olinda");
    }
}
