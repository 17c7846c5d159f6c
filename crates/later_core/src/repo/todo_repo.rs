//! Todo list and todo item repositories.
//!
//! Mirrors `list_repo`: `total_item_count`/`completed_item_count` on the
//! parent row are recomputed inside every item write transaction.

use crate::error::DataError;
use crate::model::space::Space;
use crate::model::todo::{TodoItem, TodoList, TodoPriority};
use crate::model::Entity;
use crate::repo::space_repo::SPACE_OWNER_SQL;
use crate::repo::{
    bool_to_int, db_timestamp, ensure_owner, int_to_bool, merge_order, parse_db_opt_timestamp,
    parse_db_timestamp, tags_from_db, tags_to_db, RepoResult, Reorderable, Repository,
};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const TODO_LIST_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    space_id,
    name,
    description,
    total_item_count,
    completed_item_count,
    created_at,
    updated_at,
    sort_order
FROM todo_lists";

const TODO_ITEM_SELECT_SQL: &str = "SELECT
    id,
    todo_list_id,
    title,
    description,
    is_completed,
    due_date,
    priority,
    tags,
    sort_order
FROM todo_items";

const TODO_LIST_OWNER_SQL: &str = "SELECT user_id FROM todo_lists WHERE id = ?1;";
const TODO_ITEM_OWNER_SQL: &str = "SELECT l.user_id
FROM todo_items i
INNER JOIN todo_lists l ON l.id = i.todo_list_id
WHERE i.id = ?1;";

/// SQLite-backed todo list repository scoped to one user.
pub struct SqliteTodoListRepository<'conn> {
    conn: &'conn Connection,
    user_id: String,
}

impl<'conn> SqliteTodoListRepository<'conn> {
    pub fn new(conn: &'conn Connection, user_id: impl Into<String>) -> Self {
        Self {
            conn,
            user_id: user_id.into(),
        }
    }

    fn read_back(&self, id: &str) -> RepoResult<TodoList> {
        self.get(id)?.ok_or_else(|| {
            DataError::NotFound {
                entity: TodoList::KIND,
                id: id.to_string(),
            }
            .into()
        })
    }
}

impl Repository<TodoList> for SqliteTodoListRepository<'_> {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn create(&self, list: &TodoList) -> RepoResult<TodoList> {
        ensure_owner(
            self.conn,
            SPACE_OWNER_SQL,
            Space::KIND,
            &list.space_id,
            &self.user_id,
        )?;

        self.conn.execute(
            "INSERT INTO todo_lists (
                id,
                user_id,
                space_id,
                name,
                description,
                total_item_count,
                completed_item_count,
                created_at,
                updated_at,
                sort_order
            ) VALUES (?1, ?2, ?3, ?4, ?5, 0, 0, ?6, ?7, ?8);",
            params![
                list.id,
                self.user_id,
                list.space_id,
                list.name,
                list.description,
                db_timestamp(&list.created_at),
                db_timestamp(&list.updated_at),
                list.sort_order,
            ],
        )?;

        self.read_back(&list.id)
    }

    fn update(&self, list: &TodoList) -> RepoResult<TodoList> {
        ensure_owner(
            self.conn,
            TODO_LIST_OWNER_SQL,
            TodoList::KIND,
            &list.id,
            &self.user_id,
        )?;

        self.conn.execute(
            "UPDATE todo_lists
             SET
                name = ?3,
                description = ?4,
                updated_at = ?5,
                sort_order = ?6
             WHERE id = ?1
               AND user_id = ?2;",
            params![
                list.id,
                self.user_id,
                list.name,
                list.description,
                db_timestamp(&list.updated_at),
                list.sort_order,
            ],
        )?;

        self.read_back(&list.id)
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        ensure_owner(
            self.conn,
            TODO_LIST_OWNER_SQL,
            TodoList::KIND,
            id,
            &self.user_id,
        )?;
        self.conn.execute(
            "DELETE FROM todo_lists WHERE id = ?1 AND user_id = ?2;",
            params![id, self.user_id],
        )?;
        Ok(())
    }

    fn get(&self, id: &str) -> RepoResult<Option<TodoList>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_LIST_SELECT_SQL}
             WHERE id = ?1
               AND user_id = ?2;"
        ))?;
        let row = stmt
            .query_row(params![id, self.user_id], |row| Ok(parse_todo_list_row(row)))
            .optional()?;
        row.transpose()
    }

    fn list_for_parent(&self, space_id: &str) -> RepoResult<Vec<TodoList>> {
        ensure_owner(
            self.conn,
            SPACE_OWNER_SQL,
            Space::KIND,
            space_id,
            &self.user_id,
        )?;
        list_todo_lists(self.conn, space_id, &self.user_id)
    }
}

impl Reorderable<TodoList> for SqliteTodoListRepository<'_> {
    fn reorder(&self, space_id: &str, ordered_ids: &[String]) -> RepoResult<Vec<TodoList>> {
        ensure_owner(
            self.conn,
            SPACE_OWNER_SQL,
            Space::KIND,
            space_id,
            &self.user_id,
        )?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let current = list_todo_lists(&tx, space_id, &self.user_id)?
            .into_iter()
            .map(|list| list.id)
            .collect::<Vec<_>>();
        let ordered = merge_order(TodoList::KIND, &current, ordered_ids)?;
        for (index, id) in ordered.iter().enumerate() {
            tx.execute(
                "UPDATE todo_lists
                 SET sort_order = ?2
                 WHERE id = ?1
                   AND user_id = ?3;",
                params![id, index as i64, self.user_id],
            )?;
        }
        tx.commit()?;

        list_todo_lists(self.conn, space_id, &self.user_id)
    }
}

/// SQLite-backed todo item repository scoped to one user.
pub struct SqliteTodoItemRepository<'conn> {
    conn: &'conn Connection,
    user_id: String,
}

impl<'conn> SqliteTodoItemRepository<'conn> {
    pub fn new(conn: &'conn Connection, user_id: impl Into<String>) -> Self {
        Self {
            conn,
            user_id: user_id.into(),
        }
    }

    fn read_back(&self, id: &str) -> RepoResult<TodoItem> {
        self.get(id)?.ok_or_else(|| {
            DataError::NotFound {
                entity: TodoItem::KIND,
                id: id.to_string(),
            }
            .into()
        })
    }
}

impl Repository<TodoItem> for SqliteTodoItemRepository<'_> {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn create(&self, item: &TodoItem) -> RepoResult<TodoItem> {
        ensure_owner(
            self.conn,
            TODO_LIST_OWNER_SQL,
            TodoList::KIND,
            &item.todo_list_id,
            &self.user_id,
        )?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO todo_items (
                id,
                todo_list_id,
                title,
                description,
                is_completed,
                due_date,
                priority,
                tags,
                sort_order
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                item.id,
                item.todo_list_id,
                item.title,
                item.description,
                bool_to_int(item.is_completed),
                item.due_date.as_ref().map(db_timestamp),
                item.priority.map(TodoPriority::as_str),
                tags_to_db(&item.tags),
                item.sort_order,
            ],
        )?;
        refresh_todo_counters(&tx, &item.todo_list_id)?;
        tx.commit()?;

        self.read_back(&item.id)
    }

    fn update(&self, item: &TodoItem) -> RepoResult<TodoItem> {
        ensure_owner(
            self.conn,
            TODO_ITEM_OWNER_SQL,
            TodoItem::KIND,
            &item.id,
            &self.user_id,
        )?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let todo_list_id = item_todo_list_id(&tx, &item.id)?;
        tx.execute(
            "UPDATE todo_items
             SET
                title = ?2,
                description = ?3,
                is_completed = ?4,
                due_date = ?5,
                priority = ?6,
                tags = ?7,
                sort_order = ?8
             WHERE id = ?1;",
            params![
                item.id,
                item.title,
                item.description,
                bool_to_int(item.is_completed),
                item.due_date.as_ref().map(db_timestamp),
                item.priority.map(TodoPriority::as_str),
                tags_to_db(&item.tags),
                item.sort_order,
            ],
        )?;
        refresh_todo_counters(&tx, &todo_list_id)?;
        tx.commit()?;

        self.read_back(&item.id)
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        ensure_owner(
            self.conn,
            TODO_ITEM_OWNER_SQL,
            TodoItem::KIND,
            id,
            &self.user_id,
        )?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let todo_list_id = item_todo_list_id(&tx, id)?;
        tx.execute("DELETE FROM todo_items WHERE id = ?1;", [id])?;
        refresh_todo_counters(&tx, &todo_list_id)?;
        tx.commit()?;
        Ok(())
    }

    fn get(&self, id: &str) -> RepoResult<Option<TodoItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                i.id AS id,
                i.todo_list_id AS todo_list_id,
                i.title AS title,
                i.description AS description,
                i.is_completed AS is_completed,
                i.due_date AS due_date,
                i.priority AS priority,
                i.tags AS tags,
                i.sort_order AS sort_order
             FROM todo_items i
             INNER JOIN todo_lists l ON l.id = i.todo_list_id
             WHERE i.id = ?1
               AND l.user_id = ?2;",
        )?;
        let row = stmt
            .query_row(params![id, self.user_id], |row| Ok(parse_todo_item_row(row)))
            .optional()?;
        row.transpose()
    }

    fn list_for_parent(&self, todo_list_id: &str) -> RepoResult<Vec<TodoItem>> {
        ensure_owner(
            self.conn,
            TODO_LIST_OWNER_SQL,
            TodoList::KIND,
            todo_list_id,
            &self.user_id,
        )?;
        list_todo_items(self.conn, todo_list_id)
    }
}

impl Reorderable<TodoItem> for SqliteTodoItemRepository<'_> {
    fn reorder(&self, todo_list_id: &str, ordered_ids: &[String]) -> RepoResult<Vec<TodoItem>> {
        ensure_owner(
            self.conn,
            TODO_LIST_OWNER_SQL,
            TodoList::KIND,
            todo_list_id,
            &self.user_id,
        )?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let current = list_todo_items(&tx, todo_list_id)?
            .into_iter()
            .map(|item| item.id)
            .collect::<Vec<_>>();
        let ordered = merge_order(TodoItem::KIND, &current, ordered_ids)?;
        for (index, id) in ordered.iter().enumerate() {
            tx.execute(
                "UPDATE todo_items
                 SET sort_order = ?2
                 WHERE id = ?1
                   AND todo_list_id = ?3;",
                params![id, index as i64, todo_list_id],
            )?;
        }
        tx.commit()?;

        list_todo_items(self.conn, todo_list_id)
    }
}

fn refresh_todo_counters(conn: &Connection, todo_list_id: &str) -> RepoResult<()> {
    conn.execute(
        "UPDATE todo_lists
         SET
            total_item_count = (
                SELECT COUNT(*) FROM todo_items WHERE todo_list_id = ?1
            ),
            completed_item_count = (
                SELECT COUNT(*) FROM todo_items WHERE todo_list_id = ?1 AND is_completed = 1
            ),
            updated_at = ?2
         WHERE id = ?1;",
        params![todo_list_id, db_timestamp(&Utc::now())],
    )?;
    Ok(())
}

fn item_todo_list_id(conn: &Connection, item_id: &str) -> RepoResult<String> {
    let todo_list_id: Option<String> = conn
        .query_row(
            "SELECT todo_list_id FROM todo_items WHERE id = ?1;",
            [item_id],
            |row| row.get(0),
        )
        .optional()?;
    todo_list_id.ok_or_else(|| {
        DataError::NotFound {
            entity: TodoItem::KIND,
            id: item_id.to_string(),
        }
        .into()
    })
}

fn list_todo_lists(
    conn: &Connection,
    space_id: &str,
    user_id: &str,
) -> RepoResult<Vec<TodoList>> {
    let mut stmt = conn.prepare(&format!(
        "{TODO_LIST_SELECT_SQL}
         WHERE space_id = ?1
           AND user_id = ?2
         ORDER BY sort_order ASC, created_at ASC, id ASC;"
    ))?;
    let mut rows = stmt.query(params![space_id, user_id])?;
    let mut lists = Vec::new();
    while let Some(row) = rows.next()? {
        lists.push(parse_todo_list_row(row)?);
    }
    Ok(lists)
}

fn list_todo_items(conn: &Connection, todo_list_id: &str) -> RepoResult<Vec<TodoItem>> {
    let mut stmt = conn.prepare(&format!(
        "{TODO_ITEM_SELECT_SQL}
         WHERE todo_list_id = ?1
         ORDER BY sort_order ASC, rowid ASC;"
    ))?;
    let mut rows = stmt.query([todo_list_id])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse_todo_item_row(row)?);
    }
    Ok(items)
}

fn parse_todo_list_row(row: &Row<'_>) -> RepoResult<TodoList> {
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;
    Ok(TodoList {
        id: row.get("id")?,
        space_id: row.get("space_id")?,
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        total_item_count: row.get("total_item_count")?,
        completed_item_count: row.get("completed_item_count")?,
        created_at: parse_db_timestamp(&created_at, "todo_lists.created_at")?,
        updated_at: parse_db_timestamp(&updated_at, "todo_lists.updated_at")?,
        sort_order: row.get("sort_order")?,
    })
}

fn parse_todo_item_row(row: &Row<'_>) -> RepoResult<TodoItem> {
    let priority: Option<String> = row.get("priority")?;
    let tags: String = row.get("tags")?;
    Ok(TodoItem {
        id: row.get("id")?,
        todo_list_id: row.get("todo_list_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        is_completed: int_to_bool(row.get("is_completed")?, "todo_items.is_completed")?,
        due_date: parse_db_opt_timestamp(row.get("due_date")?, "todo_items.due_date")?,
        priority: priority.as_deref().map(TodoPriority::parse_or_default),
        tags: tags_from_db(&tags, "todo_items.tags")?,
        sort_order: row.get("sort_order")?,
    })
}
