//! Localized message catalogs.
//!
//! # Responsibility
//! - Resolve a locale tag to one of the shipped catalogs.
//! - Render catalog templates with named `{placeholder}` arguments.
//! - Render any [`AppError`] as a user-facing message.
//!
//! # Invariants
//! - Both catalogs carry exactly the same key set.
//! - Locales outside `en`/`de` are rejected, never silently substituted.

mod de;
mod en;

use crate::error::AppError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::error::Error;
use std::fmt::{Display, Formatter};

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z][A-Za-z0-9_]*)\}").expect("valid placeholder regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    De,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum L10nError {
    UnsupportedLocale(String),
}

impl Display for L10nError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLocale(tag) => {
                write!(f, "unsupported locale `{tag}`; expected en|de")
            }
        }
    }
}

impl Error for L10nError {}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::De];

    /// Accepts `en`, `de` and region-qualified tags such as `de-AT`/`en_US`.
    pub fn from_tag(tag: &str) -> Result<Self, L10nError> {
        let language = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "en" => Ok(Self::En),
            "de" => Ok(Self::De),
            _ => Err(L10nError::UnsupportedLocale(tag.to_string())),
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
        }
    }

    fn catalog(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::En => en::CATALOG,
            Self::De => de::CATALOG,
        }
    }
}

/// Locale-resolved lookup object.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn for_tag(tag: &str) -> Result<Self, L10nError> {
        Locale::from_tag(tag).map(Self::new)
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Raw template for `key`; the key itself when absent.
    pub fn lookup<'a>(&self, key: &'a str) -> &'a str {
        self.locale
            .catalog()
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, template)| *template)
            .unwrap_or(key)
    }

    /// Renders `key` substituting `{name}` placeholders from `args`.
    ///
    /// Placeholders without a matching argument are left verbatim.
    pub fn format(&self, key: &str, args: &[(&str, String)]) -> String {
        let template = self.lookup(key);
        PLACEHOLDER_RE
            .replace_all(template, |caps: &Captures<'_>| {
                let name = &caps[1];
                args.iter()
                    .find(|(arg, _)| *arg == name)
                    .map(|(_, value)| value.clone())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    pub fn error_message(&self, err: &AppError) -> String {
        self.format(err.message_key(), &err.message_args())
    }

    /// All keys of the active catalog, in catalog order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        self.locale.catalog().iter().map(|(key, _)| *key)
    }
}

#[cfg(test)]
mod tests {
    use super::{L10nError, Locale, Messages};
    use crate::error::{AppError, AuthError, ValidationError};

    #[test]
    fn region_tags_resolve_to_language() {
        assert_eq!(Locale::from_tag("de_AT").unwrap(), Locale::De);
        assert_eq!(Locale::from_tag(" EN-us ").unwrap(), Locale::En);
    }

    #[test]
    fn unsupported_locale_is_an_error() {
        assert_eq!(
            Locale::from_tag("fr"),
            Err(L10nError::UnsupportedLocale("fr".to_string()))
        );
        assert!(Locale::from_tag("").is_err());
    }

    #[test]
    fn format_substitutes_named_args_and_keeps_unknown_placeholders() {
        let messages = Messages::new(Locale::En);
        let rendered = messages.format("listProgress", &[("checked", "2".to_string())]);
        assert_eq!(rendered, "2 of {total} checked");
    }

    #[test]
    fn missing_key_renders_as_key() {
        assert_eq!(Messages::new(Locale::De).lookup("noSuchKey"), "noSuchKey");
    }

    #[test]
    fn errors_render_in_german() {
        let messages = Messages::new(Locale::De);
        let err = AppError::from(ValidationError::required("Titel"));
        assert_eq!(messages.error_message(&err), "Titel ist erforderlich.");
        assert_eq!(
            messages.error_message(&AuthError::SessionExpired.into()),
            "Deine Sitzung ist abgelaufen. Bitte melde dich erneut an."
        );
    }
}
