//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Render every failure as a localized message plus its catalog key.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Each call opens the configured store and resolves the caller's
//!   session from its access token.
//! - The store path is fixed by the first call that needs it, either
//!   `configure_store` or the environment.

use later_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AppContainer, AppError, CoreConfig, Messages, Note, Session, Space, ThemeMode,
};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;

static CONFIG: OnceLock<CoreConfig> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and the failure reason otherwise.
/// Repeating the call with the same `level` and `log_dir` is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Pins the store file for this process, overriding `LATER_DB_PATH`.
///
/// Call before the first store-backed function. Returns an empty string on
/// success; repeating the active path is a no-op and any other path is
/// refused.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_store(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "store path is empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = CONFIG.get_or_init(|| CoreConfig {
        db_path: requested.clone(),
        ..env_config()
    });
    if active.db_path == requested {
        String::new()
    } else {
        format!(
            "store already configured at `{}`",
            active.db_path.display()
        )
    }
}

/// Failure description shared by all envelopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Catalog key, e.g. `errorValidationRequired`.
    pub key: String,
    /// Message rendered in the configured locale.
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Id of the created or changed record.
    pub id: Option<String>,
    pub error: Option<ErrorInfo>,
}

impl ActionResponse {
    fn success(id: String) -> Self {
        Self {
            ok: true,
            id: Some(id),
            error: None,
        }
    }

    fn failure(error: ErrorInfo) -> Self {
        Self {
            ok: false,
            id: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResponse {
    pub ok: bool,
    pub user_id: Option<String>,
    pub access_token: Option<String>,
    pub is_anonymous: bool,
    pub expires_at_ms: Option<i64>,
    pub error: Option<ErrorInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceItem {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_archived: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpacesResponse {
    pub items: Vec<SpaceItem>,
    pub error: Option<ErrorInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub id: String,
    pub title: String,
    pub content: Option<String>,
    pub tags: Vec<String>,
    pub sort_order: i64,
    pub updated_at_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesResponse {
    pub items: Vec<NoteItem>,
    pub error: Option<ErrorInfo>,
}

/// Starts a guest session.
#[flutter_rust_bridge::frb(sync)]
pub fn sign_in_anonymously() -> SessionResponse {
    let result = with_container(|container| container.auth().sign_in_anonymously());
    match result {
        Ok(session) => SessionResponse {
            ok: true,
            user_id: Some(session.user_id),
            access_token: Some(session.access_token),
            is_anonymous: session.is_anonymous,
            expires_at_ms: Some(session.expires_at.timestamp_millis()),
            error: None,
        },
        Err(error) => SessionResponse {
            ok: false,
            user_id: None,
            access_token: None,
            is_anonymous: false,
            expires_at_ms: None,
            error: Some(error),
        },
    }
}

/// Stores `light|dark|system`; unknown values store `system`.
///
/// Returns an empty string on success and a localized message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn set_theme_mode(mode: String) -> String {
    let mode = ThemeMode::parse_or_default(&mode);
    match with_container(|container| container.theme().set(mode)) {
        Ok(_) => String::new(),
        Err(error) => error.message,
    }
}

/// Stored theme mode; `system` when unset or unreadable.
#[flutter_rust_bridge::frb(sync)]
pub fn get_theme_mode() -> String {
    with_container(|container| container.theme().load())
        .unwrap_or_default()
        .as_str()
        .to_string()
}

#[flutter_rust_bridge::frb(sync)]
pub fn create_space(access_token: String, name: String, color: Option<String>) -> ActionResponse {
    let result = with_session(&access_token, |container, session| {
        container
            .session_scope(session)?
            .space_service()
            .create_space(&name, None, color.as_deref())
    });
    match result {
        Ok(space) => ActionResponse::success(space.id),
        Err(error) => ActionResponse::failure(error),
    }
}

/// Active spaces of the session's user, oldest first.
#[flutter_rust_bridge::frb(sync)]
pub fn list_spaces(access_token: String) -> SpacesResponse {
    let result = with_session(&access_token, |container, session| {
        container
            .session_scope(session)?
            .space_service()
            .list_spaces(false)
    });
    match result {
        Ok(spaces) => SpacesResponse {
            items: spaces.into_iter().map(to_space_item).collect(),
            error: None,
        },
        Err(error) => SpacesResponse {
            items: Vec::new(),
            error: Some(error),
        },
    }
}

/// Appends a note to `space_id`.
#[flutter_rust_bridge::frb(sync)]
pub fn create_note(
    access_token: String,
    space_id: String,
    title: String,
    content: Option<String>,
) -> ActionResponse {
    let result = with_session(&access_token, |container, session| {
        let scope = container.session_scope(session)?;
        let mut notes = scope.notes(&space_id);
        notes.load()?;
        notes.create(&title, content.as_deref())
    });
    match result {
        Ok(note) => ActionResponse::success(note.id),
        Err(error) => ActionResponse::failure(error),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn list_notes(access_token: String, space_id: String) -> NotesResponse {
    let result = with_session(&access_token, |container, session| {
        container
            .session_scope(session)?
            .note_service()
            .list_notes(&space_id)
    });
    match result {
        Ok(notes) => NotesResponse {
            items: notes.into_iter().map(to_note_item).collect(),
            error: None,
        },
        Err(error) => NotesResponse {
            items: Vec::new(),
            error: Some(error),
        },
    }
}

fn resolve_config() -> &'static CoreConfig {
    CONFIG.get_or_init(env_config)
}

fn env_config() -> CoreConfig {
    CoreConfig::from_env().unwrap_or_else(|err| {
        warn!("event=config_load module=ffi status=error error={err}");
        CoreConfig::default()
    })
}

fn localize(messages: Messages, err: &AppError) -> ErrorInfo {
    ErrorInfo {
        key: err.message_key().to_string(),
        message: messages.error_message(err),
    }
}

fn with_container<T>(
    f: impl FnOnce(&AppContainer) -> later_core::AppResult<T>,
) -> Result<T, ErrorInfo> {
    let config = resolve_config();
    let messages = Messages::new(config.locale);
    let container = AppContainer::open(config.clone()).map_err(|err| localize(messages, &err))?;
    f(&container).map_err(|err| localize(messages, &err))
}

fn with_session<T>(
    access_token: &str,
    f: impl FnOnce(&AppContainer, &Session) -> later_core::AppResult<T>,
) -> Result<T, ErrorInfo> {
    with_container(|container| {
        let session = container.auth_service().restore_session(access_token)?;
        f(container, &session)
    })
}

fn to_space_item(space: Space) -> SpaceItem {
    SpaceItem {
        id: space.id,
        name: space.name,
        icon: space.icon,
        color: space.color,
        is_archived: space.is_archived,
    }
}

fn to_note_item(note: Note) -> NoteItem {
    NoteItem {
        id: note.id,
        title: note.title,
        content: note.content,
        tags: note.tags,
        sort_order: note.sort_order,
        updated_at_ms: note.updated_at.timestamp_millis(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        configure_store, core_version, create_note, create_space, get_theme_mode, init_logging,
        list_notes, list_spaces, ping, set_theme_mode, sign_in_anonymously,
    };
    use std::sync::OnceLock;

    /// Points every store-backed test at one scratch file for this run.
    fn use_scratch_store() {
        static STORE_DIR: OnceLock<tempfile::TempDir> = OnceLock::new();
        let dir = STORE_DIR.get_or_init(|| tempfile::tempdir().unwrap());
        let path = dir.path().join("later.sqlite3");
        assert_eq!(configure_store(path.display().to_string()), "");
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/later-logs".to_string()).is_empty());
    }

    #[test]
    fn store_path_is_pinned_once() {
        use_scratch_store();
        use_scratch_store();
        assert!(!configure_store("/elsewhere/later.sqlite3".to_string()).is_empty());
        assert!(!configure_store("  ".to_string()).is_empty());
    }

    #[test]
    fn guest_can_create_space_and_note() {
        use_scratch_store();
        let session = sign_in_anonymously();
        assert!(session.ok, "{:?}", session.error);
        let token = session.access_token.unwrap();

        let space = create_space(token.clone(), "Inbox".to_string(), Some("#336699".to_string()));
        assert!(space.ok, "{:?}", space.error);
        let space_id = space.id.unwrap();
        assert!(list_spaces(token.clone())
            .items
            .iter()
            .any(|item| item.id == space_id));

        let note = create_note(
            token.clone(),
            space_id.clone(),
            "First".to_string(),
            Some("body".to_string()),
        );
        assert!(note.ok, "{:?}", note.error);
        let notes = list_notes(token, space_id);
        assert_eq!(notes.items.len(), 1);
        assert_eq!(notes.items[0].title, "First");
    }

    #[test]
    fn validation_failures_carry_catalog_key() {
        use_scratch_store();
        let token = sign_in_anonymously().access_token.unwrap();
        let response = create_space(token, "   ".to_string(), None);
        assert!(!response.ok);
        assert_eq!(response.error.unwrap().key, "errorValidationRequired");
    }

    #[test]
    fn unknown_token_is_reported_as_expired_session() {
        use_scratch_store();
        let response = list_spaces("no-such-token".to_string());
        assert_eq!(response.error.unwrap().key, "errorAuthSessionExpired");
    }

    #[test]
    fn theme_mode_round_trips() {
        use_scratch_store();
        assert_eq!(set_theme_mode("dark".to_string()), "");
        assert_eq!(get_theme_mode(), "dark");
    }
}
