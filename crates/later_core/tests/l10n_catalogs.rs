use later_core::{
    AppError, AuthError, ConstraintKind, DataError, Locale, Messages, NetworkError,
    ValidationError,
};
use regex::Regex;
use std::collections::BTreeSet;

fn every_error() -> Vec<AppError> {
    let data = [
        DataError::NotFound {
            entity: "note",
            id: "n1".to_string(),
        },
        DataError::PermissionDenied {
            entity: "note",
            id: "n1".to_string(),
        },
        DataError::ConstraintViolation(ConstraintKind::Unique),
        DataError::ConstraintViolation(ConstraintKind::ForeignKey),
        DataError::ConstraintViolation(ConstraintKind::NotNull),
        DataError::Timeout,
        DataError::Unknown("disk".to_string()),
    ];
    let auth = [
        AuthError::InvalidCredentials,
        AuthError::UserAlreadyExists,
        AuthError::WeakPassword,
        AuthError::InvalidEmail,
        AuthError::EmailNotConfirmed,
        AuthError::SessionExpired,
        AuthError::RateLimitExceeded,
        AuthError::AnonymousSignInFailed,
        AuthError::UpgradeFailed,
        AuthError::AlreadyAuthenticated,
        AuthError::Generic("boom".to_string()),
    ];
    let network = [
        NetworkError::Timeout,
        NetworkError::NoConnection,
        NetworkError::ServerError,
        NetworkError::BadRequest,
        NetworkError::NotFound,
        NetworkError::Generic("boom".to_string()),
    ];
    let validation = [
        ValidationError::required("name"),
        ValidationError::invalid_format("color"),
        ValidationError::out_of_range("name", 1, 100),
        ValidationError::duplicate("orderedIds"),
    ];

    data.into_iter()
        .map(AppError::from)
        .chain(auth.into_iter().map(AppError::from))
        .chain(network.into_iter().map(AppError::from))
        .chain(validation.into_iter().map(AppError::from))
        .collect()
}

fn placeholders(template: &str) -> BTreeSet<String> {
    let re = Regex::new(r"\{([A-Za-z]+)\}").unwrap();
    re.captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect()
}

#[test]
fn catalogs_share_the_same_keys() {
    let en: BTreeSet<_> = Messages::new(Locale::En).keys().collect();
    let de: BTreeSet<_> = Messages::new(Locale::De).keys().collect();
    assert_eq!(en, de);
}

#[test]
fn catalogs_use_the_same_placeholders_per_key() {
    let en = Messages::new(Locale::En);
    let de = Messages::new(Locale::De);
    for key in en.keys() {
        assert_eq!(
            placeholders(en.lookup(key)),
            placeholders(de.lookup(key)),
            "placeholder mismatch for {key}"
        );
    }
}

#[test]
fn every_error_has_a_message_in_every_locale() {
    let errors = every_error();
    let keys: BTreeSet<_> = errors.iter().map(AppError::message_key).collect();
    assert_eq!(keys.len(), 28);

    for locale in Locale::ALL {
        let messages = Messages::new(locale);
        for err in &errors {
            let rendered = messages.error_message(err);
            assert_ne!(rendered, err.message_key(), "missing {locale:?} text");
            assert!(!rendered.contains('{'), "unfilled placeholder: {rendered}");
        }
    }
}

#[test]
fn out_of_range_renders_bounds() {
    let err = AppError::from(ValidationError::out_of_range("name", 1, 100));
    assert_eq!(
        Messages::new(Locale::En).error_message(&err),
        "name must be between 1 and 100 characters."
    );
}

#[test]
fn messages_resolve_from_language_tags() {
    let messages = Messages::for_tag("de-DE").unwrap();
    assert_eq!(messages.locale(), Locale::De);
    assert!(Messages::for_tag("fr-FR").is_err());
}
