//! Content data model: spaces, notes, custom lists and todo lists.
//!
//! # Responsibility
//! - Define immutable-by-convention value objects for every persisted record.
//! - Keep JSON mapping tolerant so unexpected payloads never abort a parse.
//!
//! # Invariants
//! - Equality and hashing use the `id` field only.
//! - Updates go through `copy_with(patch)`, producing a new value.

pub(crate) mod json;
pub mod list;
pub mod note;
pub mod session;
pub mod space;
pub mod todo;
pub mod update;

/// Common contract for persisted records.
pub trait Entity: Clone {
    /// Stable entity label used in errors and log events.
    const KIND: &'static str;

    fn id(&self) -> &str;
}

/// Records positioned among their siblings by `sort_order`.
pub trait Ordered: Entity {
    fn sort_order(&self) -> i64;
}
