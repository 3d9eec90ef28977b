use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

pub const DEFAULT_LOCALE: Locale = Locale::Pt;

/// Languages the site is published in. Portuguese is the default.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Pt,
    En,
    Fr,
    Es,
}

impl Locale {
    /// Matches a path segment (or query value) against the supported locale tags.
    pub fn from_segment(segment: &str) -> Option<Self> {
        segment.parse().ok()
    }

    /// Unknown or empty tags resolve to [`DEFAULT_LOCALE`].
    pub fn parse_or_default(tag: &str) -> Self {
        Self::from_segment(tag).unwrap_or(DEFAULT_LOCALE)
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Text stored once per locale, of which only Portuguese is expected to be always filled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocalizedText {
    pub pt: Option<String>,
    pub en: Option<String>,
    pub fr: Option<String>,
    pub es: Option<String>,
}

impl LocalizedText {
    pub fn new(
        pt: Option<String>,
        en: Option<String>,
        fr: Option<String>,
        es: Option<String>,
    ) -> Self {
        Self { pt, en, fr, es }
    }

    /// Text for the locale, falling back to Portuguese when it has no translation.
    pub fn get(&self, locale: Locale) -> Option<&str> {
        let translated = match locale {
            Locale::Pt => None,
            Locale::En => self.en.as_deref(),
            Locale::Fr => self.fr.as_deref(),
            Locale::Es => self.es.as_deref(),
        };

        translated
            .filter(|text| !text.is_empty())
            .or(self.pt.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test_log::test]
    fn should_parse_every_supported_locale_tag() {
        let tags: Vec<&str> = Locale::iter().map(Locale::as_str).collect();

        assert_eq!(tags, vec!["pt", "en", "fr", "es"]);

        for locale in Locale::iter() {
            assert_eq!(Locale::from_segment(locale.as_str()), Some(locale));
        }
    }

    #[test_log::test]
    fn when_a_tag_is_unknown_should_fall_back_to_portuguese() {
        assert_eq!(Locale::from_segment("de"), None);
        assert_eq!(Locale::from_segment("PT"), None);
        assert_eq!(Locale::parse_or_default("de"), Locale::Pt);
        assert_eq!(Locale::parse_or_default(""), Locale::Pt);
        assert_eq!(Locale::parse_or_default("fr"), Locale::Fr);
    }

    #[test_log::test]
    fn when_a_translation_is_missing_should_use_the_portuguese_text() {
        let text = LocalizedText::new(
            Some("Bloco de rua".to_string()),
            Some("Street bloco".to_string()),
            None,
            Some("".to_string()),
        );

        assert_eq!(text.get(Locale::Pt), Some("Bloco de rua"));
        assert_eq!(text.get(Locale::En), Some("Street bloco"));
        assert_eq!(text.get(Locale::Fr), Some("Bloco de rua"));
        assert_eq!(text.get(Locale::Es), Some("Bloco de rua"));
    }
}
