//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the CRUD contract each content family is persisted through.
//! - Scope every read and write to the authenticated user's rows.
//!
//! # Invariants
//! - A row owned by another user yields `PermissionDenied`; an absent row
//!   yields `NotFound`.
//! - Writes return the store-confirmed entity read back after the write.
//! - Child listings are ordered `sort_order ASC`, then creation time, then id.

use crate::error::{AppResult, DataError};
use crate::model::json::coerce_timestamp;
use crate::model::Entity;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;
use std::collections::HashSet;

pub mod auth_repo;
pub mod list_repo;
pub mod note_repo;
pub mod preferences_repo;
pub mod space_repo;
pub mod todo_repo;

pub type RepoResult<T> = AppResult<T>;

/// CRUD contract shared by every content repository.
///
/// `parent_id` is the owning space for notes and lists, the owning list for
/// items, and the user id for spaces.
pub trait Repository<T: Entity> {
    /// Authenticated user every call is scoped to.
    fn user_id(&self) -> &str;
    fn create(&self, entity: &T) -> RepoResult<T>;
    fn update(&self, entity: &T) -> RepoResult<T>;
    fn delete(&self, id: &str) -> RepoResult<()>;
    fn get(&self, id: &str) -> RepoResult<Option<T>>;
    fn list_for_parent(&self, parent_id: &str) -> RepoResult<Vec<T>>;
}

/// Repositories whose rows carry a user-controlled `sort_order`.
pub trait Reorderable<T: Entity>: Repository<T> {
    /// Rewrites `sort_order` to `0..n` following `ordered_ids`.
    ///
    /// Children of `parent_id` missing from `ordered_ids` keep their
    /// relative order after the listed ones. Returns the reordered listing.
    fn reorder(&self, parent_id: &str, ordered_ids: &[String]) -> RepoResult<Vec<T>>;
}

/// Fixed-width RFC 3339 so stored text sorts chronologically.
pub(crate) fn db_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn parse_db_timestamp(text: &str, column: &str) -> RepoResult<DateTime<Utc>> {
    coerce_timestamp(&Value::String(text.to_string())).ok_or_else(|| {
        DataError::Unknown(format!("invalid timestamp `{text}` in {column}")).into()
    })
}

pub(crate) fn parse_db_opt_timestamp(
    text: Option<String>,
    column: &str,
) -> RepoResult<Option<DateTime<Utc>>> {
    text.map(|value| parse_db_timestamp(&value, column))
        .transpose()
}

pub(crate) fn tags_to_db(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

pub(crate) fn tags_from_db(text: &str, column: &str) -> RepoResult<Vec<String>> {
    serde_json::from_str(text)
        .map_err(|_| DataError::Unknown(format!("invalid tag array in {column}")).into())
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(DataError::Unknown(format!("invalid boolean `{other}` in {column}")).into()),
    }
}

/// Resolves ownership of a row given a query returning its owner id.
pub(crate) fn ensure_owner(
    conn: &Connection,
    owner_sql: &str,
    entity: &'static str,
    id: &str,
    user_id: &str,
) -> RepoResult<()> {
    let owner: Option<String> = conn
        .query_row(owner_sql, [id], |row| row.get(0))
        .optional()?;
    match owner {
        None => Err(DataError::NotFound {
            entity,
            id: id.to_string(),
        }
        .into()),
        Some(owner) if owner != user_id => Err(DataError::PermissionDenied {
            entity,
            id: id.to_string(),
        }
        .into()),
        Some(_) => Ok(()),
    }
}

/// Computes the final id order for a reorder request.
pub(crate) fn merge_order(
    entity: &'static str,
    current: &[String],
    requested: &[String],
) -> RepoResult<Vec<String>> {
    let known: HashSet<&str> = current.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    let mut ordered = Vec::with_capacity(current.len());
    for id in requested {
        if !known.contains(id.as_str()) {
            return Err(DataError::NotFound {
                entity,
                id: id.clone(),
            }
            .into());
        }
        if seen.insert(id.as_str()) {
            ordered.push(id.clone());
        }
    }
    for id in current {
        if !seen.contains(id.as_str()) {
            ordered.push(id.clone());
        }
    }
    Ok(ordered)
}
