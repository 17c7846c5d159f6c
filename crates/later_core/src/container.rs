//! Explicit dependency wiring.
//!
//! # Responsibility
//! - Own the store connection and configuration for the process lifetime.
//! - Hand out long-lived controllers (auth, theme) and a per-session scope
//!   that builds user-scoped services and controllers.
//!
//! # Invariants
//! - Everything built from a [`SessionScope`] is bound to that session's
//!   user id and cannot outlive the container.
//! - Scoped controllers are owned by the caller and dropped with it.

use crate::config::CoreConfig;
use crate::db::{open_db, open_db_in_memory};
use crate::error::{AppResult, AuthError};
use crate::l10n::Messages;
use crate::model::session::Session;
use crate::repo::auth_repo::SqliteAuthBackend;
use crate::repo::list_repo::{SqliteListItemRepository, SqliteListRepository};
use crate::repo::note_repo::SqliteNoteRepository;
use crate::repo::preferences_repo::SqlitePreferencesRepository;
use crate::repo::space_repo::SqliteSpaceRepository;
use crate::repo::todo_repo::{SqliteTodoItemRepository, SqliteTodoListRepository};
use crate::service::auth_service::{AuthPolicy, AuthService};
use crate::service::list_service::ListService;
use crate::service::note_service::NoteService;
use crate::service::preferences_service::PreferencesService;
use crate::service::space_service::SpaceService;
use crate::service::todo_service::TodoService;
use crate::state::auth::AuthController;
use crate::state::lists::{ListItemsController, ListsController};
use crate::state::notes::NotesController;
use crate::state::spaces::SpacesController;
use crate::state::theme::ThemeController;
use crate::state::todos::{TodoItemsController, TodoListsController};
use chrono::Utc;
use rusqlite::Connection;

pub type SqliteSpaceService<'c> = SpaceService<SqliteSpaceRepository<'c>>;
pub type SqliteNoteService<'c> = NoteService<SqliteNoteRepository<'c>>;
pub type SqliteListService<'c> =
    ListService<SqliteListRepository<'c>, SqliteListItemRepository<'c>>;
pub type SqliteTodoService<'c> =
    TodoService<SqliteTodoListRepository<'c>, SqliteTodoItemRepository<'c>>;

pub struct AppContainer {
    conn: Connection,
    config: CoreConfig,
}

impl AppContainer {
    /// Opens the store at `config.db_path`.
    pub fn open(config: CoreConfig) -> AppResult<Self> {
        let conn = open_db(&config.db_path)?;
        Ok(Self { conn, config })
    }

    /// Backs the container with a private in-memory store.
    pub fn in_memory(config: CoreConfig) -> AppResult<Self> {
        let conn = open_db_in_memory()?;
        Ok(Self { conn, config })
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn messages(&self) -> Messages {
        Messages::new(self.config.locale)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn auth_service(&self) -> AuthService<SqliteAuthBackend<'_>> {
        AuthService::new(
            SqliteAuthBackend::new(&self.conn),
            AuthPolicy::from(&self.config),
        )
    }

    pub fn auth(&self) -> AuthController<SqliteAuthBackend<'_>> {
        AuthController::new(self.auth_service())
    }

    pub fn preferences(&self) -> PreferencesService<SqlitePreferencesRepository<'_>> {
        PreferencesService::new(SqlitePreferencesRepository::new(&self.conn))
    }

    pub fn theme(&self) -> ThemeController<SqlitePreferencesRepository<'_>> {
        ThemeController::new(self.preferences())
    }

    /// Scope for one authenticated session; expired sessions are refused.
    pub fn session_scope(&self, session: &Session) -> AppResult<SessionScope<'_>> {
        if session.is_expired(Utc::now()) {
            return Err(AuthError::SessionExpired.into());
        }
        Ok(SessionScope {
            conn: &self.conn,
            user_id: session.user_id.clone(),
        })
    }
}

/// User-bound factory valid for one session.
pub struct SessionScope<'c> {
    conn: &'c Connection,
    user_id: String,
}

impl<'c> SessionScope<'c> {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn space_service(&self) -> SqliteSpaceService<'c> {
        SpaceService::new(SqliteSpaceRepository::new(self.conn, self.user_id.as_str()))
    }

    pub fn note_service(&self) -> SqliteNoteService<'c> {
        NoteService::new(SqliteNoteRepository::new(self.conn, self.user_id.as_str()))
    }

    pub fn list_service(&self) -> SqliteListService<'c> {
        ListService::new(
            SqliteListRepository::new(self.conn, self.user_id.as_str()),
            SqliteListItemRepository::new(self.conn, self.user_id.as_str()),
        )
    }

    pub fn todo_service(&self) -> SqliteTodoService<'c> {
        TodoService::new(
            SqliteTodoListRepository::new(self.conn, self.user_id.as_str()),
            SqliteTodoItemRepository::new(self.conn, self.user_id.as_str()),
        )
    }

    pub fn spaces(&self) -> SpacesController<SqliteSpaceRepository<'c>> {
        SpacesController::new(self.space_service())
    }

    pub fn notes(&self, space_id: &str) -> NotesController<SqliteNoteRepository<'c>> {
        NotesController::new(self.note_service(), space_id)
    }

    pub fn lists(
        &self,
        space_id: &str,
    ) -> ListsController<SqliteListRepository<'c>, SqliteListItemRepository<'c>> {
        ListsController::new(self.list_service(), space_id)
    }

    pub fn list_items(
        &self,
        list_id: &str,
    ) -> ListItemsController<SqliteListRepository<'c>, SqliteListItemRepository<'c>> {
        ListItemsController::new(self.list_service(), list_id)
    }

    pub fn todo_lists(
        &self,
        space_id: &str,
    ) -> TodoListsController<SqliteTodoListRepository<'c>, SqliteTodoItemRepository<'c>> {
        TodoListsController::new(self.todo_service(), space_id)
    }

    pub fn todo_items(
        &self,
        todo_list_id: &str,
    ) -> TodoItemsController<SqliteTodoListRepository<'c>, SqliteTodoItemRepository<'c>> {
        TodoItemsController::new(self.todo_service(), todo_list_id)
    }
}
