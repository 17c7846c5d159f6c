//! Core domain logic for Later: spaces, notes, custom lists and todos.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod container;
pub mod db;
pub mod error;
pub mod l10n;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod state;

pub use config::{ConfigError, CoreConfig};
pub use container::{AppContainer, SessionScope};
pub use error::{
    AppError, AppResult, AuthError, ConstraintKind, DataError, FieldErrorKind, NetworkError,
    ValidationError,
};
pub use l10n::{L10nError, Locale, Messages};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::list::{ListItem, ListItemPatch, ListModel, ListModelPatch, ListStyle};
pub use model::note::{Note, NotePatch};
pub use model::session::{Session, ThemeMode};
pub use model::space::{Space, SpacePatch};
pub use model::todo::{TodoItem, TodoItemPatch, TodoList, TodoListPatch, TodoPriority};
pub use model::update::Update;
pub use model::{Entity, Ordered};
pub use repo::{RepoResult, Reorderable, Repository};
pub use state::AsyncValue;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
