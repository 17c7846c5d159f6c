//! Custom list domain model.
//!
//! # Responsibility
//! - Define `ListModel` (a styled list inside a space) and its `ListItem`s.
//! - Expose progress derived from the stored aggregate counters.
//!
//! # Invariants
//! - `total_item_count`/`checked_item_count` are store-maintained counters,
//!   not derived from an embedded item collection.
//! - `progress()` is `0.0` whenever `total_item_count` is zero.
//! - A `ListItem` belongs to exactly one list via `list_id`.

use crate::model::json;
use crate::model::update::Update;
use crate::model::{Entity, Ordered};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Wire keys the store maintains itself; never part of insert payloads.
const COUNTER_KEYS: [&str; 2] = ["total_item_count", "checked_item_count"];

/// Visual style of a custom list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListStyle {
    #[default]
    Bullets,
    Numbered,
    Checkboxes,
    Simple,
}

impl ListStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bullets => "bullets",
            Self::Numbered => "numbered",
            Self::Checkboxes => "checkboxes",
            Self::Simple => "simple",
        }
    }

    /// Parses a wire string; unknown values fall back to `Bullets`.
    pub fn parse_or_default(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "numbered" => Self::Numbered,
            "checkboxes" => Self::Checkboxes,
            "simple" => Self::Simple,
            _ => Self::Bullets,
        }
    }
}

impl<'de> Deserialize<'de> for ListStyle {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(value
            .as_str()
            .map(Self::parse_or_default)
            .unwrap_or_default())
    }
}

/// Styled list owned by a user inside one space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListModel {
    #[serde(default, deserialize_with = "json::lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "json::lenient_string")]
    pub space_id: String,
    #[serde(default, deserialize_with = "json::lenient_string")]
    pub user_id: String,
    #[serde(default, deserialize_with = "json::lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "json::lenient_opt_string")]
    pub icon: Option<String>,
    #[serde(default)]
    pub style: ListStyle,
    #[serde(default, deserialize_with = "json::lenient_i64")]
    pub total_item_count: i64,
    #[serde(default, deserialize_with = "json::lenient_i64")]
    pub checked_item_count: i64,
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

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListModelPatch {
    pub name: Option<String>,
    pub icon: Update<String>,
    pub style: Option<ListStyle>,
    pub total_item_count: Option<i64>,
    pub checked_item_count: Option<i64>,
    pub sort_order: Option<i64>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ListModelPatch {
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

    pub fn style(mut self, value: ListStyle) -> Self {
        self.style = Some(value);
        self
    }

    pub fn counts(mut self, total: i64, checked: i64) -> Self {
        self.total_item_count = Some(total);
        self.checked_item_count = Some(checked);
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

impl ListModel {
    pub fn new(
        name: impl Into<String>,
        space_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name, space_id, user_id)
    }

    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        space_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            space_id: space_id.into(),
            user_id: user_id.into(),
            name: name.into(),
            icon: None,
            style: ListStyle::default(),
            total_item_count: 0,
            checked_item_count: 0,
            created_at: now,
            updated_at: now,
            sort_order: 0,
        }
    }

    /// Fraction of checked items in `0.0..=1.0`; `0.0` for an empty list.
    pub fn progress(&self) -> f64 {
        if self.total_item_count <= 0 {
            return 0.0;
        }
        self.checked_item_count as f64 / self.total_item_count as f64
    }

    pub fn from_json(value: &Value) -> Self {
        json::parse_record(value, || Self::with_id("", "", "", ""))
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Payload for inserts/updates: counters are left to the store.
    pub fn to_insert_json(&self) -> Value {
        let mut value = self.to_json();
        if let Value::Object(map) = &mut value {
            for key in COUNTER_KEYS {
                map.remove(key);
            }
        }
        value
    }

    pub fn copy_with(&self, patch: ListModelPatch) -> Self {
        Self {
            id: self.id.clone(),
            space_id: self.space_id.clone(),
            user_id: self.user_id.clone(),
            name: patch.name.unwrap_or_else(|| self.name.clone()),
            icon: patch.icon.apply(self.icon.clone()),
            style: patch.style.unwrap_or(self.style),
            total_item_count: patch.total_item_count.unwrap_or(self.total_item_count),
            checked_item_count: patch.checked_item_count.unwrap_or(self.checked_item_count),
            created_at: self.created_at,
            updated_at: patch.updated_at.unwrap_or(self.updated_at),
            sort_order: patch.sort_order.unwrap_or(self.sort_order),
        }
    }
}

impl Ordered for ListModel {
    fn sort_order(&self) -> i64 {
        self.sort_order
    }
}

impl Entity for ListModel {
    const KIND: &'static str = "list";

    fn id(&self) -> &str {
        &self.id
    }
}

impl PartialEq for ListModel {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ListModel {}

impl Hash for ListModel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Single entry of a [`ListModel`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListItem {
    #[serde(default, deserialize_with = "json::lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "json::lenient_string")]
    pub list_id: String,
    #[serde(default, deserialize_with = "json::lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "json::lenient_opt_string")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "json::lenient_bool")]
    pub is_checked: bool,
    #[serde(default, deserialize_with = "json::lenient_i64")]
    pub sort_order: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItemPatch {
    pub title: Option<String>,
    pub notes: Update<String>,
    pub is_checked: Option<bool>,
    pub sort_order: Option<i64>,
}

impl ListItemPatch {
    pub fn title(mut self, value: impl Into<String>) -> Self {
        self.title = Some(value.into());
        self
    }

    pub fn notes(mut self, value: impl Into<String>) -> Self {
        self.notes = self.notes.set(value.into());
        self
    }

    pub fn clear_notes(mut self) -> Self {
        self.notes = self.notes.clear();
        self
    }

    pub fn checked(mut self, value: bool) -> Self {
        self.is_checked = Some(value);
        self
    }

    pub fn sort_order(mut self, value: i64) -> Self {
        self.sort_order = Some(value);
        self
    }
}

impl ListItem {
    pub fn new(list_id: impl Into<String>, title: impl Into<String>, sort_order: i64) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), list_id, title, sort_order)
    }

    pub fn with_id(
        id: impl Into<String>,
        list_id: impl Into<String>,
        title: impl Into<String>,
        sort_order: i64,
    ) -> Self {
        Self {
            id: id.into(),
            list_id: list_id.into(),
            title: title.into(),
            notes: None,
            is_checked: false,
            sort_order,
        }
    }

    pub fn from_json(value: &Value) -> Self {
        json::parse_record(value, || Self::with_id("", "", "", 0))
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn copy_with(&self, patch: ListItemPatch) -> Self {
        Self {
            id: self.id.clone(),
            list_id: self.list_id.clone(),
            title: patch.title.unwrap_or_else(|| self.title.clone()),
            notes: patch.notes.apply(self.notes.clone()),
            is_checked: patch.is_checked.unwrap_or(self.is_checked),
            sort_order: patch.sort_order.unwrap_or(self.sort_order),
        }
    }
}

impl Ordered for ListItem {
    fn sort_order(&self) -> i64 {
        self.sort_order
    }
}

impl Entity for ListItem {
    const KIND: &'static str = "list_item";

    fn id(&self) -> &str {
        &self.id
    }
}

impl PartialEq for ListItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ListItem {}

impl Hash for ListItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
