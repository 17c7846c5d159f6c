//! Space domain model.
//!
//! # Responsibility
//! - Define the top-level container that scopes notes and lists.
//! - Provide copy-with updates and tolerant JSON mapping.
//!
//! # Invariants
//! - `id` never changes after construction; equality and hashing use it
//!   alone.
//! - Spaces holding content are archived (`is_archived = true`), not
//!   deleted.

use crate::model::json;
use crate::model::update::Update;
use crate::model::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Organizational container owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Space {
    #[serde(default, deserialize_with = "json::lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "json::lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "json::lenient_opt_string")]
    pub icon: Option<String>,
    /// `#RRGGBB` hex color.
    #[serde(default, deserialize_with = "json::lenient_opt_string")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "json::lenient_bool")]
    pub is_archived: bool,
    #[serde(default, deserialize_with = "json::lenient_string")]
    pub user_id: String,
    #[serde(
        default = "Utc::now",
        deserialize_with = "json::lenient_timestamp",
        serialize_with = "json::timestamp"
    )]
    pub created_at: DateTime<Utc>,
    #[serde(
        default = "Utc::now",
        deserialize_with = "json::lenient_timestamp",
        serialize_with = "json::timestamp"
    )]
    pub updated_at: DateTime<Utc>,
}

/// Field overrides for [`Space::copy_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpacePatch {
    pub name: Option<String>,
    pub icon: Update<String>,
    pub color: Update<String>,
    pub is_archived: Option<bool>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl SpacePatch {
    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    pub fn icon(mut self, value: impl Into<String>) -> Self {
        self.icon = self.icon.set(value.into());
        self
    }

    pub fn clear_icon(mut self) -> Self {
        self.icon = self.icon.clear();
        self
    }

    pub fn color(mut self, value: impl Into<String>) -> Self {
        self.color = self.color.set(value.into());
        self
    }

    pub fn clear_color(mut self) -> Self {
        self.color = self.color.clear();
        self
    }

    pub fn archived(mut self, value: bool) -> Self {
        self.is_archived = Some(value);
        self
    }

    pub fn updated_at(mut self, value: DateTime<Utc>) -> Self {
        self.updated_at = Some(value);
        self
    }
}

impl Space {
    /// Creates a space with a generated id.
    pub fn new(name: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name, user_id)
    }

    /// Creates a space with a caller-provided id; timestamps are now.
    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            icon: None,
            color: None,
            is_archived: false,
            user_id: user_id.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Tolerant parse; never fails.
    pub fn from_json(value: &Value) -> Self {
        json::parse_record(value, || Self::with_id("", "", ""))
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Returns a new space with `patch` applied.
    pub fn copy_with(&self, patch: SpacePatch) -> Self {
        Self {
            id: self.id.clone(),
            name: patch.name.unwrap_or_else(|| self.name.clone()),
            icon: patch.icon.apply(self.icon.clone()),
            color: patch.color.apply(self.color.clone()),
            is_archived: patch.is_archived.unwrap_or(self.is_archived),
            user_id: self.user_id.clone(),
            created_at: self.created_at,
            updated_at: patch.updated_at.unwrap_or(self.updated_at),
        }
    }
}

impl Entity for Space {
    const KIND: &'static str = "space";

    fn id(&self) -> &str {
        &self.id
    }
}

impl PartialEq for Space {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Space {}

impl Hash for Space {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
