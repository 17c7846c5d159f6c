//! Three-state field update descriptor used by `copy_with` patches.

/// Update applied to one nullable field.
///
/// # Invariants
/// - `Clear` is sticky: once a patch clears a field, a later `set` on the
///   same descriptor does not revive it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Update<T> {
    /// Keep the current value.
    #[default]
    Unchanged,
    /// Replace with a new value.
    Set(T),
    /// Reset to `None`.
    Clear,
}

impl<T> Update<T> {
    /// Requests a replacement value unless the field is already cleared.
    pub fn set(self, value: T) -> Self {
        match self {
            Self::Clear => Self::Clear,
            _ => Self::Set(value),
        }
    }

    pub fn clear(self) -> Self {
        Self::Clear
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// Resolves the descriptor against the current field value.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Unchanged => current,
            Self::Set(value) => Some(value),
            Self::Clear => None,
        }
    }
}
