use later_core::db::open_db_in_memory;
use later_core::repo::list_repo::{SqliteListItemRepository, SqliteListRepository};
use later_core::repo::note_repo::SqliteNoteRepository;
use later_core::repo::preferences_repo::SqlitePreferencesRepository;
use later_core::repo::space_repo::SqliteSpaceRepository;
use later_core::repo::todo_repo::{SqliteTodoItemRepository, SqliteTodoListRepository};
use later_core::service::list_service::ListService;
use later_core::service::note_service::NoteService;
use later_core::service::preferences_service::PreferencesService;
use later_core::service::space_service::SpaceService;
use later_core::service::todo_service::TodoService;
use later_core::{
    AppError, FieldErrorKind, ListModelPatch, ListStyle, NotePatch, SpacePatch, ThemeMode,
    TodoItemPatch, TodoPriority, ValidationError,
};
use rusqlite::Connection;

fn validation_kind(err: AppError) -> (&'static str, FieldErrorKind) {
    match err {
        AppError::Validation(ValidationError { field, kind }) => (field, kind),
        other => panic!("expected validation error, got {other}"),
    }
}

fn space_service(conn: &Connection) -> SpaceService<SqliteSpaceRepository<'_>> {
    SpaceService::new(SqliteSpaceRepository::new(conn, "u1"))
}

#[test]
fn space_name_is_trimmed_and_bounded() {
    let conn = open_db_in_memory().unwrap();
    let service = space_service(&conn);

    let space = service
        .create_space("  Home  ", Some(" "), Some("#a1b2c3"))
        .unwrap();
    assert_eq!(space.name, "Home");
    assert_eq!(space.icon, None);
    assert_eq!(space.color.as_deref(), Some("#A1B2C3"));
    assert_eq!(space.user_id, "u1");

    assert_eq!(
        validation_kind(service.create_space("   ", None, None).unwrap_err()),
        ("name", FieldErrorKind::Required)
    );
    let long = "x".repeat(101);
    assert_eq!(
        validation_kind(service.create_space(&long, None, None).unwrap_err()),
        ("name", FieldErrorKind::OutOfRange { min: 1, max: 100 })
    );
    assert_eq!(
        validation_kind(service.create_space("Home", None, Some("red")).unwrap_err()),
        ("color", FieldErrorKind::InvalidFormat)
    );
    assert!(service.list_spaces(true).unwrap().len() == 1);
}

#[test]
fn archive_and_restore_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let service = space_service(&conn);
    let space = service.create_space("Home", None, None).unwrap();

    let archived = service.archive_space(&space.id).unwrap();
    assert!(archived.is_archived);
    assert!(archived.updated_at >= space.updated_at);
    assert!(service.list_spaces(false).unwrap().is_empty());

    let restored = service.restore_space(&space.id).unwrap();
    assert!(!restored.is_archived);
    assert_eq!(service.list_spaces(false).unwrap().len(), 1);

    assert!(matches!(
        service.archive_space("missing").unwrap_err(),
        AppError::Data(later_core::DataError::NotFound { .. })
    ));
}

#[test]
fn update_space_clears_color() {
    let conn = open_db_in_memory().unwrap();
    let service = space_service(&conn);
    let space = service
        .create_space("Home", None, Some("#000000"))
        .unwrap();

    let updated = service
        .update_space(&space, SpacePatch::default().clear_color().name("Base"))
        .unwrap();
    assert_eq!(updated.color, None);
    assert_eq!(updated.name, "Base");
}

#[test]
fn note_service_validates_and_rejects_duplicate_reorder_ids() {
    let conn = open_db_in_memory().unwrap();
    let space = space_service(&conn)
        .create_space("Home", None, None)
        .unwrap();
    let notes = NoteService::new(SqliteNoteRepository::new(&conn, "u1"));

    let note = notes
        .create_note(&space.id, " Plan ", Some("   "), 0)
        .unwrap();
    assert_eq!(note.title, "Plan");
    assert_eq!(note.content, None);

    let err = notes
        .update_note(&note, NotePatch::default().tags(vec!["  ".to_string()]))
        .unwrap_err();
    assert_eq!(validation_kind(err), ("tag", FieldErrorKind::Required));

    let err = notes
        .reorder_notes(&space.id, &[note.id.clone(), note.id.clone()])
        .unwrap_err();
    assert_eq!(
        validation_kind(err),
        ("orderedIds", FieldErrorKind::Duplicate)
    );
}

#[test]
fn list_service_toggles_items_and_keeps_counters_server_side() {
    let conn = open_db_in_memory().unwrap();
    let space = space_service(&conn)
        .create_space("Home", None, None)
        .unwrap();
    let lists = ListService::new(
        SqliteListRepository::new(&conn, "u1"),
        SqliteListItemRepository::new(&conn, "u1"),
    );

    let list = lists
        .create_list(&space.id, "Groceries", None, ListStyle::Checkboxes, 0)
        .unwrap();
    assert_eq!(list.style, ListStyle::Checkboxes);
    let item = lists
        .create_item(&list.id, "Milk", Some("  2 liters \n"), 0)
        .unwrap();
    assert_eq!(item.notes.as_deref(), Some("2 liters"));
    let toggled = lists.toggle_item(&item).unwrap();
    assert!(toggled.is_checked);

    let renamed = lists
        .update_list(&list, ListModelPatch::default().name("Market").counts(50, 50))
        .unwrap();
    assert_eq!(renamed.name, "Market");
    assert_eq!(
        (renamed.total_item_count, renamed.checked_item_count),
        (1, 1)
    );
}

#[test]
fn todo_item_details_are_validated() {
    let conn = open_db_in_memory().unwrap();
    let space = space_service(&conn)
        .create_space("Home", None, None)
        .unwrap();
    let todos = TodoService::new(
        SqliteTodoListRepository::new(&conn, "u1"),
        SqliteTodoItemRepository::new(&conn, "u1"),
    );
    let list = todos
        .create_todo_list(&space.id, "Chores", Some("weekly"), 0)
        .unwrap();
    assert_eq!(list.description.as_deref(), Some("weekly"));

    let item = todos
        .create_item(
            &list.id,
            "Dishes",
            0,
            TodoItemPatch::default()
                .title("ignored")
                .priority(TodoPriority::Low),
        )
        .unwrap();
    assert_eq!(item.title, "Dishes");
    assert_eq!(item.priority, Some(TodoPriority::Low));

    let err = todos
        .create_item(
            &list.id,
            "Laundry",
            1,
            TodoItemPatch::default().tags(vec!["x".repeat(51)]),
        )
        .unwrap_err();
    assert_eq!(
        validation_kind(err),
        ("tag", FieldErrorKind::OutOfRange { min: 1, max: 50 })
    );

    let done = todos.toggle_item(&item).unwrap();
    assert!(done.is_completed);
    let list = todos.get_todo_list(&list.id).unwrap().unwrap();
    assert_eq!(list.completed_item_count, 1);
}

#[test]
fn theme_mode_defaults_to_system_and_persists() {
    let conn = open_db_in_memory().unwrap();
    let prefs = PreferencesService::new(SqlitePreferencesRepository::new(&conn));

    assert_eq!(prefs.theme_mode().unwrap(), ThemeMode::System);
    prefs.set_theme_mode(ThemeMode::Dark).unwrap();
    assert_eq!(prefs.theme_mode().unwrap(), ThemeMode::Dark);
    prefs.reset_theme_mode().unwrap();
    assert_eq!(prefs.theme_mode().unwrap(), ThemeMode::System);
}
