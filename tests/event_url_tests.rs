use blocos::events::model::EventType;
use blocos::events::url::{decode, encode, EventIdentity, EVENTS_MARKER};
use blocos::i18n::Locale;
use proptest::prelude::*;
use strum::IntoEnumIterator;

fn identity(locale: &str, city: &str, date: &str, event_type: EventType, bloco: &str) -> EventIdentity {
    EventIdentity {
        locale: locale.to_string(),
        city_slug: city.to_string(),
        date: date.to_string(),
        event_type,
        bloco_slug: bloco.to_string(),
    }
}

#[test_log::test]
fn should_encode_and_decode_rehearsal_in_english() {
    let original = identity("en", "salvador", "2025-02-20", EventType::Rehearsal, "ile-aiye");

    let path = encode(&original);

    assert_eq!(path, "/en/salvador/eventos/2025-02-20/rehearsal/ile-aiye");
    assert_eq!(decode(&path), Some(original));
}

#[test_log::test]
fn should_always_write_the_locale_and_the_marker() {
    for locale in Locale::iter() {
        for event_type in EventType::iter() {
            let path = encode(&identity(
                locale.as_str(),
                "rio-de-janeiro",
                "2025-02-10",
                event_type,
                "bloco-x",
            ));
            let segments: Vec<&str> = path.split('/').collect();

            assert!(path.starts_with(&format!("/{}/", locale)), "{path}");
            assert_eq!(segments[3], EVENTS_MARKER, "{path}");
        }
    }
}

#[test_log::test]
fn when_locale_is_missing_should_decode_as_portuguese() {
    let decoded = decode("/rio-de-janeiro/eventos/2025-02-10/desfile/bloco-x");

    assert_eq!(
        decoded,
        Some(identity(
            "pt",
            "rio-de-janeiro",
            "2025-02-10",
            EventType::Parade,
            "bloco-x"
        ))
    );
}

#[test_log::test]
fn when_type_belongs_to_another_locale_should_not_decode() {
    assert_eq!(
        decode("/en/rio-de-janeiro/eventos/2025-02-10/desfile/bloco-x"),
        None
    );
}

#[test_log::test]
fn when_spanish_and_portuguese_share_a_term_should_decode_in_both() {
    let portuguese = decode("/pt/olinda/eventos/2025-03-02/desfile/bloco-x").unwrap();
    let spanish = decode("/es/olinda/eventos/2025-03-02/desfile/bloco-x").unwrap();

    assert_eq!(portuguese.event_type, EventType::Parade);
    assert_eq!(spanish.event_type, EventType::Parade);
    assert_eq!(spanish.locale, "es");
}

#[test_log::test]
fn when_marker_is_wrong_should_not_decode() {
    assert_eq!(
        decode("/pt/rio-de-janeiro/NOTEVENTOS/2025-02-10/desfile/bloco-x"),
        None
    );
}

#[test_log::test]
fn when_path_is_too_short_should_not_decode() {
    assert_eq!(decode("/pt/rio-de-janeiro/eventos"), None);
    assert_eq!(decode("/pt/rio-de-janeiro/eventos/2025-02-10/desfile"), None);
}

fn locale_strategy() -> impl Strategy<Value = Locale> {
    prop::sample::select(Locale::iter().collect::<Vec<Locale>>())
}

fn event_type_strategy() -> impl Strategy<Value = EventType> {
    prop::sample::select(EventType::iter().collect::<Vec<EventType>>())
}

fn date_strategy() -> impl Strategy<Value = String> {
    (2000u32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(year, month, day)| format!("{:04}-{:02}-{:02}", year, month, day))
}

proptest! {
    #[test]
    fn decoding_an_encoded_identity_should_give_it_back(
        locale in locale_strategy(),
        city in "[a-z0-9][a-z0-9-]{0,30}",
        date in date_strategy(),
        event_type in event_type_strategy(),
        bloco in "[a-z0-9][a-z0-9-]{0,30}",
    ) {
        let original = identity(locale.as_str(), &city, &date, event_type, &bloco);

        prop_assert_eq!(decode(&encode(&original)), Some(original));
    }
}
