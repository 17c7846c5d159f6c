//! Presentation-facing state controllers.
//!
//! # Responsibility
//! - Hold one loadable collection per screen scope.
//! - Apply server-confirmed results of mutations to the held collection.
//!
//! # Invariants
//! - Mutations are pessimistic: the held collection changes only after the
//!   service call succeeded, and a failed mutation leaves it untouched.
//! - A failed `load` moves the controller to `AsyncValue::Error`.
//! - Replacement inside a collection matches by entity id.

pub mod auth;
pub mod lists;
pub mod notes;
pub mod spaces;
pub mod theme;
pub mod todos;

use crate::error::{AppError, AppResult, DataError};
use crate::model::{Entity, Ordered};

/// Loading/data/error tri-state for asynchronous values.
#[derive(Debug, Clone, PartialEq)]
pub enum AsyncValue<T> {
    Loading,
    Data(T),
    Error(AppError),
}

impl<T> AsyncValue<T> {
    pub fn from_result(result: AppResult<T>) -> Self {
        match result {
            Ok(value) => Self::Data(value),
            Err(err) => Self::Error(err),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Data(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> AsyncValue<U> {
        match self {
            Self::Loading => AsyncValue::Loading,
            Self::Data(value) => AsyncValue::Data(f(value)),
            Self::Error(err) => AsyncValue::Error(err),
        }
    }

    pub(crate) fn value_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Data(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> Default for AsyncValue<T> {
    fn default() -> Self {
        Self::Loading
    }
}

/// Loaded collection of entities shared by every list-shaped controller.
#[derive(Debug, Clone)]
pub(crate) struct EntityCollection<T: Entity> {
    state: AsyncValue<Vec<T>>,
}

impl<T: Entity> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: AsyncValue::Loading,
        }
    }

    pub(crate) fn state(&self) -> &AsyncValue<Vec<T>> {
        &self.state
    }

    pub(crate) fn set(&mut self, result: AppResult<Vec<T>>) -> AppResult<&[T]> {
        self.state = AsyncValue::from_result(result);
        match &self.state {
            AsyncValue::Data(items) => Ok(items.as_slice()),
            AsyncValue::Error(err) => Err(err.clone()),
            AsyncValue::Loading => Ok(&[]),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.state.value().map_or(0, Vec::len)
    }

    /// Held copy of `id`, or `NotFound` when it is not in the collection.
    pub(crate) fn find(&self, id: &str) -> AppResult<&T> {
        self.state
            .value()
            .and_then(|items| items.iter().find(|item| item.id() == id))
            .ok_or_else(|| {
                DataError::NotFound {
                    entity: T::KIND,
                    id: id.to_string(),
                }
                .into()
            })
    }

    pub(crate) fn upsert(&mut self, entity: T) {
        if let Some(items) = self.state.value_mut() {
            match items.iter_mut().find(|item| item.id() == entity.id()) {
                Some(slot) => *slot = entity,
                None => items.push(entity),
            }
        }
    }

    pub(crate) fn remove(&mut self, id: &str) {
        if let Some(items) = self.state.value_mut() {
            items.retain(|item| item.id() != id);
        }
    }
}

impl<T: Ordered> EntityCollection<T> {
    /// Position that lands after every held sibling, gaps included.
    pub(crate) fn next_sort_order(&self) -> i64 {
        self.state
            .value()
            .and_then(|items| items.iter().map(Ordered::sort_order).max())
            .map_or(0, |max| max + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::{AsyncValue, EntityCollection};
    use crate::error::{AppError, DataError};
    use crate::model::note::{Note, NotePatch};
    use crate::model::space::Space;

    #[test]
    fn async_value_accessors() {
        let loading: AsyncValue<u8> = AsyncValue::default();
        assert!(loading.is_loading());
        assert_eq!(AsyncValue::Data(2).map(|v| v * 2).value(), Some(&4));
        let failed: AsyncValue<u8> = AsyncValue::Error(AppError::Data(DataError::Timeout));
        assert!(failed.value().is_none());
        assert!(failed.error().is_some());
    }

    #[test]
    fn upsert_replaces_by_id() {
        let mut collection = EntityCollection::new();
        collection
            .set(Ok(vec![Space::with_id("s1", "Home", "u1")]))
            .unwrap();
        let renamed = Space::with_id("s1", "Work", "u1");
        collection.upsert(renamed);
        collection.upsert(Space::with_id("s2", "Trips", "u1"));

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.find("s1").unwrap().name, "Work");
        collection.remove("s1");
        assert!(collection.find("s1").is_err());
    }

    #[test]
    fn next_sort_order_skips_past_gaps() {
        let mut collection: EntityCollection<Note> = EntityCollection::new();
        assert_eq!(collection.next_sort_order(), 0);
        collection
            .set(Ok(vec![
                Note::with_id("n1", "a", "s1", "u1").copy_with(NotePatch::default().sort_order(1)),
                Note::with_id("n2", "b", "s1", "u1").copy_with(NotePatch::default().sort_order(2)),
            ]))
            .unwrap();
        assert_eq!(collection.next_sort_order(), 3);
    }

    #[test]
    fn mutations_before_load_are_ignored() {
        let mut collection: EntityCollection<Space> = EntityCollection::new();
        collection.upsert(Space::with_id("s1", "Home", "u1"));
        assert_eq!(collection.len(), 0);
    }
}
