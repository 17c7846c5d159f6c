//! Note domain model.

use crate::model::json;
use crate::model::update::Update;
use crate::model::{Entity, Ordered};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Free-text note scoped to exactly one space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    #[serde(default, deserialize_with = "json::lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "json::lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "json::lenient_opt_string")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "json::lenient_string")]
    pub space_id: String,
    #[serde(default, deserialize_with = "json::lenient_string")]
    pub user_id: String,
    /// Ordered; duplicates allowed.
    #[serde(default, deserialize_with = "json::lenient_string_list")]
    pub tags: Vec<String>,
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
    #[serde(default, deserialize_with = "json::lenient_i64")]
    pub sort_order: i64,
}

/// Field overrides for [`Note::copy_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Update<String>,
    pub space_id: Option<String>,
    pub tags: Option<Vec<String>>,
    pub sort_order: Option<i64>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl NotePatch {
    pub fn title(mut self, value: impl Into<String>) -> Self {
        self.title = Some(value.into());
        self
    }

    pub fn content(mut self, value: impl Into<String>) -> Self {
        self.content = self.content.set(value.into());
        self
    }

    pub fn clear_content(mut self) -> Self {
        self.content = self.content.clear();
        self
    }

    /// Moves the note to another space.
    pub fn space_id(mut self, value: impl Into<String>) -> Self {
        self.space_id = Some(value.into());
        self
    }

    pub fn tags(mut self, value: Vec<String>) -> Self {
        self.tags = Some(value);
        self
    }

    pub fn sort_order(mut self, value: i64) -> Self {
        self.sort_order = Some(value);
        self
    }

    pub fn updated_at(mut self, value: DateTime<Utc>) -> Self {
        self.updated_at = Some(value);
        self
    }
}

impl Note {
    pub fn new(
        title: impl Into<String>,
        space_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), title, space_id, user_id)
    }

    pub fn with_id(
        id: impl Into<String>,
        title: impl Into<String>,
        space_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            content: None,
            space_id: space_id.into(),
            user_id: user_id.into(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
            sort_order: 0,
        }
    }

    pub fn from_json(value: &Value) -> Self {
        json::parse_record(value, || Self::with_id("", "", "", ""))
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn copy_with(&self, patch: NotePatch) -> Self {
        Self {
            id: self.id.clone(),
            title: patch.title.unwrap_or_else(|| self.title.clone()),
            content: patch.content.apply(self.content.clone()),
            space_id: patch.space_id.unwrap_or_else(|| self.space_id.clone()),
            user_id: self.user_id.clone(),
            tags: patch.tags.unwrap_or_else(|| self.tags.clone()),
            created_at: self.created_at,
            updated_at: patch.updated_at.unwrap_or(self.updated_at),
            sort_order: patch.sort_order.unwrap_or(self.sort_order),
        }
    }
}

impl Ordered for Note {
    fn sort_order(&self) -> i64 {
        self.sort_order
    }
}

impl Entity for Note {
    const KIND: &'static str = "note";

    fn id(&self) -> &str {
        &self.id
    }
}

impl PartialEq for Note {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Note {}

impl Hash for Note {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
