use chrono::{TimeZone, Utc};
use later_core::{
    ListItem, ListItemPatch, ListModel, ListModelPatch, ListStyle, Note, NotePatch, Space,
    SpacePatch, TodoItem, TodoItemPatch, TodoList, TodoListPatch, TodoPriority,
};
use serde_json::json;
use std::collections::HashSet;

#[test]
fn equality_and_hash_use_id_only() {
    let a = Space::with_id("s1", "Home", "u1");
    let b = Space::with_id("s1", "Renamed", "u2");
    let c = Space::with_id("s2", "Home", "u1");
    assert_eq!(a, b);
    assert_ne!(a, c);

    let set: HashSet<Space> = [a, b, c].into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn new_values_get_fresh_ids_and_defaults() {
    let first = Note::new("Title", "s1", "u1");
    let second = Note::new("Title", "s1", "u1");
    assert_ne!(first.id, second.id);
    assert!(first.tags.is_empty());
    assert_eq!(first.sort_order, 0);
    assert_eq!(first.content, None);
    assert_eq!(first.created_at, first.updated_at);
}

#[test]
fn json_round_trip_preserves_every_field() {
    let due = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
    let item = TodoItem::with_id("t1", "l1", "Ship", 3).copy_with(
        TodoItemPatch::default()
            .description("release notes")
            .due_date(due)
            .priority(TodoPriority::High)
            .tags(vec!["work".to_string(), "work".to_string()]),
    );

    let parsed = TodoItem::from_json(&item.to_json());
    assert_eq!(parsed.title, "Ship");
    assert_eq!(parsed.description.as_deref(), Some("release notes"));
    assert_eq!(parsed.due_date, Some(due));
    assert_eq!(parsed.priority, Some(TodoPriority::High));
    assert_eq!(parsed.tags, vec!["work", "work"]);
    assert_eq!(parsed.sort_order, 3);

    let note = Note::with_id("n1", "Title", "s1", "u1");
    let parsed = Note::from_json(&note.to_json());
    assert_eq!(parsed.created_at, note.created_at);
    assert_eq!(parsed.updated_at, note.updated_at);
}

fn stamp(minute: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 8, minute, 0).unwrap() + chrono::Duration::nanoseconds(250)
}

#[test]
fn space_round_trips_every_field() {
    let mut space = Space::with_id("s1", "Work", "u1")
        .copy_with(SpacePatch::default().icon("briefcase").color("#1A2B3C").archived(true));
    space.created_at = stamp(0);
    space.updated_at = stamp(5);

    let parsed = Space::from_json(&space.to_json());
    assert_eq!(parsed.id, "s1");
    assert_eq!(parsed.name, "Work");
    assert_eq!(parsed.icon.as_deref(), Some("briefcase"));
    assert_eq!(parsed.color.as_deref(), Some("#1A2B3C"));
    assert!(parsed.is_archived);
    assert_eq!(parsed.user_id, "u1");
    assert_eq!(parsed.created_at, stamp(0));
    assert_eq!(parsed.updated_at, stamp(5));
}

#[test]
fn note_round_trips_every_field() {
    let mut note = Note::with_id("n1", "Plan", "s1", "u1").copy_with(
        NotePatch::default()
            .content("line one\nline two")
            .tags(vec!["a".to_string(), "b".to_string()])
            .sort_order(4),
    );
    note.created_at = stamp(1);
    note.updated_at = stamp(2);

    let parsed = Note::from_json(&note.to_json());
    assert_eq!(parsed.id, "n1");
    assert_eq!(parsed.title, "Plan");
    assert_eq!(parsed.content.as_deref(), Some("line one\nline two"));
    assert_eq!(parsed.space_id, "s1");
    assert_eq!(parsed.user_id, "u1");
    assert_eq!(parsed.tags, vec!["a", "b"]);
    assert_eq!(parsed.created_at, stamp(1));
    assert_eq!(parsed.updated_at, stamp(2));
    assert_eq!(parsed.sort_order, 4);
}

#[test]
fn list_model_round_trips_every_field_including_counters() {
    let mut list = ListModel::with_id("l1", "Groceries", "s1", "u1").copy_with(
        ListModelPatch::default()
            .icon("cart")
            .style(ListStyle::Numbered)
            .counts(7, 3)
            .sort_order(2),
    );
    list.created_at = stamp(3);
    list.updated_at = stamp(4);

    let parsed = ListModel::from_json(&list.to_json());
    assert_eq!(parsed.id, "l1");
    assert_eq!(parsed.space_id, "s1");
    assert_eq!(parsed.user_id, "u1");
    assert_eq!(parsed.name, "Groceries");
    assert_eq!(parsed.icon.as_deref(), Some("cart"));
    assert_eq!(parsed.style, ListStyle::Numbered);
    assert_eq!(parsed.total_item_count, 7);
    assert_eq!(parsed.checked_item_count, 3);
    assert_eq!(parsed.created_at, stamp(3));
    assert_eq!(parsed.updated_at, stamp(4));
    assert_eq!(parsed.sort_order, 2);
}

#[test]
fn list_item_round_trips_every_field() {
    let item = ListItem::with_id("i1", "l1", "Eggs", 6)
        .copy_with(ListItemPatch::default().notes("a dozen").checked(true));

    let parsed = ListItem::from_json(&item.to_json());
    assert_eq!(parsed.id, "i1");
    assert_eq!(parsed.list_id, "l1");
    assert_eq!(parsed.title, "Eggs");
    assert_eq!(parsed.notes.as_deref(), Some("a dozen"));
    assert!(parsed.is_checked);
    assert_eq!(parsed.sort_order, 6);
}

#[test]
fn fresh_list_item_defaults_and_round_trips() {
    let item = ListItem::with_id("item-1", "list-1", "Buy milk", 0);
    assert!(!item.is_checked);
    assert_eq!(item.notes, None);

    let parsed = ListItem::from_json(&item.to_json());
    assert_eq!(parsed.id, "item-1");
    assert_eq!(parsed.list_id, "list-1");
    assert_eq!(parsed.title, "Buy milk");
    assert_eq!(parsed.sort_order, 0);
    assert!(!parsed.is_checked);
    assert_eq!(parsed.notes, None);
}

#[test]
fn todo_list_round_trips_every_field_including_counters() {
    let mut todo = TodoList::with_id("t1", "Chores", "s1", "u1").copy_with(
        TodoListPatch::default()
            .description("weekly")
            .counts(5, 2)
            .sort_order(1),
    );
    todo.created_at = stamp(6);
    todo.updated_at = stamp(7);

    let parsed = TodoList::from_json(&todo.to_json());
    assert_eq!(parsed.id, "t1");
    assert_eq!(parsed.space_id, "s1");
    assert_eq!(parsed.user_id, "u1");
    assert_eq!(parsed.name, "Chores");
    assert_eq!(parsed.description.as_deref(), Some("weekly"));
    assert_eq!(parsed.total_item_count, 5);
    assert_eq!(parsed.completed_item_count, 2);
    assert_eq!(parsed.created_at, stamp(6));
    assert_eq!(parsed.updated_at, stamp(7));
    assert_eq!(parsed.sort_order, 1);
}

#[test]
fn to_json_emits_explicit_nulls() {
    let value = Space::with_id("s1", "Home", "u1").to_json();
    assert!(value.get("icon").unwrap().is_null());
    assert!(value.get("color").unwrap().is_null());
    assert_eq!(value["is_archived"], json!(false));
}

#[test]
fn tolerant_parse_falls_back_to_defaults() {
    let note = Note::from_json(&json!({
        "id": 42,
        "title": null,
        "tags": "not-a-list",
        "sort_order": "7",
        "created_at": "garbage",
    }));
    assert_eq!(note.id, "42");
    assert_eq!(note.title, "");
    assert!(note.tags.is_empty());
    assert_eq!(note.sort_order, 7);

    let from_array = Space::from_json(&json!([1, 2, 3]));
    assert_eq!(from_array.id, "");
    assert!(!from_array.is_archived);
}

#[test]
fn unknown_enum_strings_fall_back() {
    let list = ListModel::from_json(&json!({ "id": "l1", "style": "zigzag" }));
    assert_eq!(list.style, ListStyle::Bullets);
    let list = ListModel::from_json(&json!({ "id": "l1", "style": "checkboxes" }));
    assert_eq!(list.style, ListStyle::Checkboxes);

    let unknown = TodoItem::from_json(&json!({ "id": "t1", "priority": "urgent" }));
    assert_eq!(unknown.priority, Some(TodoPriority::Medium));
    let missing = TodoItem::from_json(&json!({ "id": "t1", "priority": null }));
    assert_eq!(missing.priority, None);
}

#[test]
fn copy_with_without_overrides_is_field_identical() {
    let note = Note::with_id("n1", "Title", "s1", "u1");
    assert_eq!(note.copy_with(NotePatch::default()).to_json(), note.to_json());

    let space = Space::with_id("s1", "Work", "u1");
    assert_eq!(space.copy_with(SpacePatch::default()).to_json(), space.to_json());

    let list = ListModel::with_id("l1", "Groceries", "s1", "u1");
    assert_eq!(list.copy_with(ListModelPatch::default()).to_json(), list.to_json());

    let item = ListItem::with_id("i1", "l1", "Milk", 0);
    assert_eq!(item.copy_with(ListItemPatch::default()).to_json(), item.to_json());

    let todo = TodoList::with_id("t1", "Chores", "s1", "u1");
    assert_eq!(todo.copy_with(TodoListPatch::default()).to_json(), todo.to_json());

    let task = TodoItem::with_id("a", "t1", "Dishes", 0);
    assert_eq!(task.copy_with(TodoItemPatch::default()).to_json(), task.to_json());
}

#[test]
fn clear_beats_replacement_within_one_patch() {
    let item = ListItem::with_id("item-1", "l1", "Milk", 0)
        .copy_with(ListItemPatch::default().notes("2 liters"));
    assert_eq!(item.notes.as_deref(), Some("2 liters"));

    let patch = ListItemPatch::default().clear_notes().notes("ignored");
    let cleared = item.copy_with(patch);
    assert_eq!(cleared.notes, None);
    assert_eq!(cleared.id, "item-1");
}

#[test]
fn archiving_a_space_keeps_identity() {
    let space = Space::with_id("s1", "Home", "u1");
    let later = Utc::now();
    let archived = space.copy_with(SpacePatch::default().archived(true).updated_at(later));
    assert!(archived.is_archived);
    assert_eq!(archived, space);
    assert_eq!(archived.created_at, space.created_at);
    assert_eq!(archived.updated_at, later);
}

#[test]
fn progress_is_zero_for_empty_lists_and_a_ratio_otherwise() {
    let empty = ListModel::with_id("l1", "Groceries", "s1", "u1");
    assert_eq!(empty.progress(), 0.0);

    let mut half = TodoList::with_id("t1", "Chores", "s1", "u1");
    half.total_item_count = 4;
    half.completed_item_count = 2;
    assert_eq!(half.progress(), 0.5);
}

#[test]
fn insert_payload_omits_store_maintained_counters() {
    let mut list = ListModel::with_id("l1", "Groceries", "s1", "u1");
    list.total_item_count = 5;
    list.checked_item_count = 3;

    let payload = list.to_insert_json();
    assert!(payload.get("total_item_count").is_none());
    assert!(payload.get("checked_item_count").is_none());

    let parsed = ListModel::from_json(&payload);
    assert_eq!(parsed.total_item_count, 0);
    assert_eq!(parsed.checked_item_count, 0);
    assert_eq!(parsed.name, "Groceries");

    let mut todo = TodoList::with_id("t1", "Chores", "s1", "u1");
    todo.completed_item_count = 1;
    assert_eq!(TodoList::from_json(&todo.to_insert_json()).completed_item_count, 0);
}

#[test]
fn overdue_requires_open_item_with_past_due_date() {
    let now = Utc::now();
    let past = now - chrono::Duration::days(1);
    let item = TodoItem::with_id("t1", "l1", "Pay", 0)
        .copy_with(TodoItemPatch::default().due_date(past));
    assert!(item.is_overdue(now));
    assert!(!item
        .copy_with(TodoItemPatch::default().completed(true))
        .is_overdue(now));
    assert!(!item
        .copy_with(TodoItemPatch::default().clear_due_date())
        .is_overdue(now));
}
