//! Field validation shared by all services.
//!
//! Lengths are counted in `char`s after trimming.

use crate::error::{AppResult, AuthError, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

pub const NAME_MAX: usize = 100;
pub const NOTE_TITLE_MAX: usize = 200;
pub const ITEM_TITLE_MAX: usize = 500;
pub const CONTENT_MAX: usize = 100_000;
pub const DESCRIPTION_MAX: usize = 2_000;
pub const TAG_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 8;

static COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid color regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex")
});

/// Trims and checks a required text field against `1..=max` chars.
pub fn required_text(field: &'static str, value: &str, max: usize) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::required(field).into());
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::out_of_range(field, 1, max).into());
    }
    Ok(trimmed.to_string())
}

/// Optional free text, trimmed; blank input normalizes to `None`.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> AppResult<Option<String>> {
    let Some(trimmed) = value.map(str::trim).filter(|text| !text.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > max {
        return Err(ValidationError::out_of_range(field, 0, max).into());
    }
    Ok(Some(trimmed.to_string()))
}

/// Trims every tag; order and repeats are kept.
pub fn tags(values: &[String]) -> AppResult<Vec<String>> {
    values
        .iter()
        .map(|tag| required_text("tag", tag, TAG_MAX))
        .collect()
}

pub fn color(value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if !COLOR_RE.is_match(trimmed) {
        return Err(ValidationError::invalid_format("color").into());
    }
    Ok(trimmed.to_ascii_uppercase())
}

pub fn reorder_ids(ids: &[String]) -> AppResult<()> {
    let mut seen = HashSet::with_capacity(ids.len());
    if ids.iter().all(|id| seen.insert(id.as_str())) {
        Ok(())
    } else {
        Err(ValidationError::duplicate("orderedIds").into())
    }
}

pub fn email(value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if !EMAIL_RE.is_match(trimmed) {
        return Err(AuthError::InvalidEmail.into());
    }
    Ok(trimmed.to_ascii_lowercase())
}

pub fn password(value: &str) -> AppResult<()> {
    if value.chars().count() < PASSWORD_MIN {
        return Err(AuthError::WeakPassword.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{color, email, optional_text, password, reorder_ids, required_text, tags};
    use crate::error::{AppError, AuthError, FieldErrorKind};

    fn kind(err: AppError) -> FieldErrorKind {
        match err {
            AppError::Validation(err) => err.kind,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn required_text_trims_and_bounds_by_chars() {
        assert_eq!(required_text("name", "  Home ", 100).unwrap(), "Home");
        assert_eq!(
            kind(required_text("name", "   ", 100).unwrap_err()),
            FieldErrorKind::Required
        );
        assert!(required_text("name", &"ä".repeat(100), 100).is_ok());
        assert_eq!(
            kind(required_text("name", &"a".repeat(101), 100).unwrap_err()),
            FieldErrorKind::OutOfRange { min: 1, max: 100 }
        );
    }

    #[test]
    fn blank_optional_text_becomes_none() {
        assert_eq!(optional_text("description", Some("  "), 10).unwrap(), None);
        assert!(optional_text("description", Some("12345678901"), 10).is_err());
    }

    #[test]
    fn optional_text_is_trimmed_before_the_length_check() {
        assert_eq!(
            optional_text("notes", Some("  1234567890  "), 10).unwrap(),
            Some("1234567890".to_string())
        );
    }

    #[test]
    fn tags_are_trimmed_and_keep_duplicates() {
        let input = vec![" a ".to_string(), "a".to_string()];
        assert_eq!(tags(&input).unwrap(), vec!["a", "a"]);
        assert!(tags(&["".to_string()]).is_err());
    }

    #[test]
    fn color_requires_hex_triplet() {
        assert_eq!(color("#a1b2c3").unwrap(), "#A1B2C3");
        assert_eq!(
            kind(color("red").unwrap_err()),
            FieldErrorKind::InvalidFormat
        );
        assert!(color("#FFF").is_err());
    }

    #[test]
    fn duplicate_reorder_ids_are_rejected() {
        let ids = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        assert_eq!(kind(reorder_ids(&ids).unwrap_err()), FieldErrorKind::Duplicate);
    }

    #[test]
    fn credentials_are_checked() {
        assert_eq!(email(" Me@Example.com ").unwrap(), "me@example.com");
        assert_eq!(
            email("not-an-email").unwrap_err(),
            AppError::Auth(AuthError::InvalidEmail)
        );
        assert_eq!(
            password("short").unwrap_err(),
            AppError::Auth(AuthError::WeakPassword)
        );
    }
}
