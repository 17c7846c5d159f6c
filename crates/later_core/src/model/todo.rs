//! Todo list domain model.
//!
//! Structurally parallel to [`crate::model::list`]: a `TodoList` carries
//! store-maintained counters and owns its `TodoItem`s by `todo_list_id`.

use crate::model::json;
use crate::model::update::Update;
use crate::model::{Entity, Ordered};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

const COUNTER_KEYS: [&str; 2] = ["total_item_count", "completed_item_count"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoPriority {
    Low,
    Medium,
    High,
}

impl TodoPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses a wire string; unknown values fall back to `Medium`.
    pub fn parse_or_default(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }
}

fn lenient_priority<'de, D: Deserializer<'de>>(d: D) -> Result<Option<TodoPriority>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(value.as_str().map(TodoPriority::parse_or_default))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoList {
    #[serde(default, deserialize_with = "json::lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "json::lenient_string")]
    pub space_id: String,
    #[serde(default, deserialize_with = "json::lenient_string")]
    pub user_id: String,
    #[serde(default, deserialize_with = "json::lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "json::lenient_opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "json::lenient_i64")]
    pub total_item_count: i64,
    #[serde(default, deserialize_with = "json::lenient_i64")]
    pub completed_item_count: i64,
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
pub struct TodoListPatch {
    pub name: Option<String>,
    pub description: Update<String>,
    pub total_item_count: Option<i64>,
    pub completed_item_count: Option<i64>,
    pub sort_order: Option<i64>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TodoListPatch {
    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = self.description.set(value.into());
        self
    }

    pub fn clear_description(mut self) -> Self {
        self.description = self.description.clear();
        self
    }

    pub fn counts(mut self, total: i64, completed: i64) -> Self {
        self.total_item_count = Some(total);
        self.completed_item_count = Some(completed);
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

impl TodoList {
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
            description: None,
            total_item_count: 0,
            completed_item_count: 0,
            created_at: now,
            updated_at: now,
            sort_order: 0,
        }
    }

    /// Fraction of completed items; `0.0` for an empty list.
    pub fn progress(&self) -> f64 {
        if self.total_item_count <= 0 {
            return 0.0;
        }
        self.completed_item_count as f64 / self.total_item_count as f64
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

    pub fn copy_with(&self, patch: TodoListPatch) -> Self {
        Self {
            id: self.id.clone(),
            space_id: self.space_id.clone(),
            user_id: self.user_id.clone(),
            name: patch.name.unwrap_or_else(|| self.name.clone()),
            description: patch.description.apply(self.description.clone()),
            total_item_count: patch.total_item_count.unwrap_or(self.total_item_count),
            completed_item_count: patch
                .completed_item_count
                .unwrap_or(self.completed_item_count),
            created_at: self.created_at,
            updated_at: patch.updated_at.unwrap_or(self.updated_at),
            sort_order: patch.sort_order.unwrap_or(self.sort_order),
        }
    }
}

impl Ordered for TodoList {
    fn sort_order(&self) -> i64 {
        self.sort_order
    }
}

impl Entity for TodoList {
    const KIND: &'static str = "todo_list";

    fn id(&self) -> &str {
        &self.id
    }
}

impl PartialEq for TodoList {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TodoList {}

impl Hash for TodoList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoItem {
    #[serde(default, deserialize_with = "json::lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "json::lenient_string")]
    pub todo_list_id: String,
    #[serde(default, deserialize_with = "json::lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "json::lenient_opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "json::lenient_bool")]
    pub is_completed: bool,
    #[serde(
        default,
        deserialize_with = "json::lenient_opt_timestamp",
        serialize_with = "json::opt_timestamp"
    )]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Option<TodoPriority>,
    #[serde(default, deserialize_with = "json::lenient_string_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "json::lenient_i64")]
    pub sort_order: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoItemPatch {
    pub title: Option<String>,
    pub description: Update<String>,
    pub is_completed: Option<bool>,
    pub due_date: Update<DateTime<Utc>>,
    pub priority: Update<TodoPriority>,
    pub tags: Option<Vec<String>>,
    pub sort_order: Option<i64>,
}

impl TodoItemPatch {
    pub fn title(mut self, value: impl Into<String>) -> Self {
        self.title = Some(value.into());
        self
    }

    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = self.description.set(value.into());
        self
    }

    pub fn clear_description(mut self) -> Self {
        self.description = self.description.clear();
        self
    }

    pub fn completed(mut self, value: bool) -> Self {
        self.is_completed = Some(value);
        self
    }

    pub fn due_date(mut self, value: DateTime<Utc>) -> Self {
        self.due_date = self.due_date.set(value);
        self
    }

    pub fn clear_due_date(mut self) -> Self {
        self.due_date = self.due_date.clear();
        self
    }

    pub fn priority(mut self, value: TodoPriority) -> Self {
        self.priority = self.priority.set(value);
        self
    }

    pub fn clear_priority(mut self) -> Self {
        self.priority = self.priority.clear();
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
}

impl TodoItem {
    pub fn new(todo_list_id: impl Into<String>, title: impl Into<String>, sort_order: i64) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), todo_list_id, title, sort_order)
    }

    pub fn with_id(
        id: impl Into<String>,
        todo_list_id: impl Into<String>,
        title: impl Into<String>,
        sort_order: i64,
    ) -> Self {
        Self {
            id: id.into(),
            todo_list_id: todo_list_id.into(),
            title: title.into(),
            description: None,
            is_completed: false,
            due_date: None,
            priority: None,
            tags: Vec::new(),
            sort_order,
        }
    }

    /// Whether the item is open and its due date lies before `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed && self.due_date.is_some_and(|due| due < now)
    }

    pub fn from_json(value: &Value) -> Self {
        json::parse_record(value, || Self::with_id("", "", "", 0))
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn copy_with(&self, patch: TodoItemPatch) -> Self {
        Self {
            id: self.id.clone(),
            todo_list_id: self.todo_list_id.clone(),
            title: patch.title.unwrap_or_else(|| self.title.clone()),
            description: patch.description.apply(self.description.clone()),
            is_completed: patch.is_completed.unwrap_or(self.is_completed),
            due_date: patch.due_date.apply(self.due_date),
            priority: patch.priority.apply(self.priority),
            tags: patch.tags.unwrap_or_else(|| self.tags.clone()),
            sort_order: patch.sort_order.unwrap_or(self.sort_order),
        }
    }
}

impl Ordered for TodoItem {
    fn sort_order(&self) -> i64 {
        self.sort_order
    }
}

impl Entity for TodoItem {
    const KIND: &'static str = "todo_item";

    fn id(&self) -> &str {
        &self.id
    }
}

impl PartialEq for TodoItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TodoItem {}

impl Hash for TodoItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
