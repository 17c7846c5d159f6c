//! Custom list and list item repositories.
//!
//! # Responsibility
//! - Persist `ListModel` rows and their `ListItem` children.
//! - Maintain the denormalized `total_item_count`/`checked_item_count`
//!   counters on every item write.
//!
//! # Invariants
//! - Counter refresh runs in the same transaction as the item write.
//! - Callers cannot write counters directly; list inserts start at zero
//!   and list updates leave counters untouched.
//! - Item ownership is resolved through the parent list's `user_id`.

use crate::error::DataError;
use crate::model::list::{ListItem, ListModel, ListStyle};
use crate::model::space::Space;
use crate::model::Entity;
use crate::repo::space_repo::SPACE_OWNER_SQL;
use crate::repo::{
    bool_to_int, db_timestamp, ensure_owner, int_to_bool, merge_order, parse_db_timestamp,
    RepoResult, Reorderable, Repository,
};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const LIST_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    space_id,
    name,
    icon,
    style,
    total_item_count,
    checked_item_count,
    created_at,
    updated_at,
    sort_order
FROM lists";

const LIST_ITEM_SELECT_SQL: &str = "SELECT
    id,
    list_id,
    title,
    notes,
    is_checked,
    sort_order
FROM list_items";

const LIST_OWNER_SQL: &str = "SELECT user_id FROM lists WHERE id = ?1;";
const LIST_ITEM_OWNER_SQL: &str = "SELECT l.user_id
FROM list_items i
INNER JOIN lists l ON l.id = i.list_id
WHERE i.id = ?1;";

/// SQLite-backed list repository scoped to one user.
pub struct SqliteListRepository<'conn> {
    conn: &'conn Connection,
    user_id: String,
}

impl<'conn> SqliteListRepository<'conn> {
    pub fn new(conn: &'conn Connection, user_id: impl Into<String>) -> Self {
        Self {
            conn,
            user_id: user_id.into(),
        }
    }

    fn read_back(&self, id: &str) -> RepoResult<ListModel> {
        self.get(id)?.ok_or_else(|| {
            DataError::NotFound {
                entity: ListModel::KIND,
                id: id.to_string(),
            }
            .into()
        })
    }
}

impl Repository<ListModel> for SqliteListRepository<'_> {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn create(&self, list: &ListModel) -> RepoResult<ListModel> {
        ensure_owner(
            self.conn,
            SPACE_OWNER_SQL,
            Space::KIND,
            &list.space_id,
            &self.user_id,
        )?;

        self.conn.execute(
            "INSERT INTO lists (
                id,
                user_id,
                space_id,
                name,
                icon,
                style,
                total_item_count,
                checked_item_count,
                created_at,
                updated_at,
                sort_order
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 0, ?7, ?8, ?9);",
            params![
                list.id,
                self.user_id,
                list.space_id,
                list.name,
                list.icon,
                list.style.as_str(),
                db_timestamp(&list.created_at),
                db_timestamp(&list.updated_at),
                list.sort_order,
            ],
        )?;

        self.read_back(&list.id)
    }

    fn update(&self, list: &ListModel) -> RepoResult<ListModel> {
        ensure_owner(
            self.conn,
            LIST_OWNER_SQL,
            ListModel::KIND,
            &list.id,
            &self.user_id,
        )?;

        self.conn.execute(
            "UPDATE lists
             SET
                name = ?3,
                icon = ?4,
                style = ?5,
                updated_at = ?6,
                sort_order = ?7
             WHERE id = ?1
               AND user_id = ?2;",
            params![
                list.id,
                self.user_id,
                list.name,
                list.icon,
                list.style.as_str(),
                db_timestamp(&list.updated_at),
                list.sort_order,
            ],
        )?;

        self.read_back(&list.id)
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        ensure_owner(self.conn, LIST_OWNER_SQL, ListModel::KIND, id, &self.user_id)?;
        self.conn.execute(
            "DELETE FROM lists WHERE id = ?1 AND user_id = ?2;",
            params![id, self.user_id],
        )?;
        Ok(())
    }

    fn get(&self, id: &str) -> RepoResult<Option<ListModel>> {
        let mut stmt = self.conn.prepare(&format!(
            "{LIST_SELECT_SQL}
             WHERE id = ?1
               AND user_id = ?2;"
        ))?;
        let row = stmt
            .query_row(params![id, self.user_id], |row| Ok(parse_list_row(row)))
            .optional()?;
        row.transpose()
    }

    fn list_for_parent(&self, space_id: &str) -> RepoResult<Vec<ListModel>> {
        ensure_owner(
            self.conn,
            SPACE_OWNER_SQL,
            Space::KIND,
            space_id,
            &self.user_id,
        )?;
        list_lists(self.conn, space_id, &self.user_id)
    }
}

impl Reorderable<ListModel> for SqliteListRepository<'_> {
    fn reorder(&self, space_id: &str, ordered_ids: &[String]) -> RepoResult<Vec<ListModel>> {
        ensure_owner(
            self.conn,
            SPACE_OWNER_SQL,
            Space::KIND,
            space_id,
            &self.user_id,
        )?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let current = list_lists(&tx, space_id, &self.user_id)?
            .into_iter()
            .map(|list| list.id)
            .collect::<Vec<_>>();
        let ordered = merge_order(ListModel::KIND, &current, ordered_ids)?;
        for (index, id) in ordered.iter().enumerate() {
            tx.execute(
                "UPDATE lists
                 SET sort_order = ?2
                 WHERE id = ?1
                   AND user_id = ?3;",
                params![id, index as i64, self.user_id],
            )?;
        }
        tx.commit()?;

        list_lists(self.conn, space_id, &self.user_id)
    }
}

/// SQLite-backed list item repository scoped to one user.
pub struct SqliteListItemRepository<'conn> {
    conn: &'conn Connection,
    user_id: String,
}

impl<'conn> SqliteListItemRepository<'conn> {
    pub fn new(conn: &'conn Connection, user_id: impl Into<String>) -> Self {
        Self {
            conn,
            user_id: user_id.into(),
        }
    }

    fn read_back(&self, id: &str) -> RepoResult<ListItem> {
        self.get(id)?.ok_or_else(|| {
            DataError::NotFound {
                entity: ListItem::KIND,
                id: id.to_string(),
            }
            .into()
        })
    }
}

impl Repository<ListItem> for SqliteListItemRepository<'_> {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn create(&self, item: &ListItem) -> RepoResult<ListItem> {
        ensure_owner(
            self.conn,
            LIST_OWNER_SQL,
            ListModel::KIND,
            &item.list_id,
            &self.user_id,
        )?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO list_items (
                id,
                list_id,
                title,
                notes,
                is_checked,
                sort_order
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                item.id,
                item.list_id,
                item.title,
                item.notes,
                bool_to_int(item.is_checked),
                item.sort_order,
            ],
        )?;
        refresh_list_counters(&tx, &item.list_id)?;
        tx.commit()?;

        self.read_back(&item.id)
    }

    fn update(&self, item: &ListItem) -> RepoResult<ListItem> {
        ensure_owner(
            self.conn,
            LIST_ITEM_OWNER_SQL,
            ListItem::KIND,
            &item.id,
            &self.user_id,
        )?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let list_id = item_list_id(&tx, &item.id)?;
        tx.execute(
            "UPDATE list_items
             SET
                title = ?2,
                notes = ?3,
                is_checked = ?4,
                sort_order = ?5
             WHERE id = ?1;",
            params![
                item.id,
                item.title,
                item.notes,
                bool_to_int(item.is_checked),
                item.sort_order,
            ],
        )?;
        refresh_list_counters(&tx, &list_id)?;
        tx.commit()?;

        self.read_back(&item.id)
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        ensure_owner(
            self.conn,
            LIST_ITEM_OWNER_SQL,
            ListItem::KIND,
            id,
            &self.user_id,
        )?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let list_id = item_list_id(&tx, id)?;
        tx.execute("DELETE FROM list_items WHERE id = ?1;", [id])?;
        refresh_list_counters(&tx, &list_id)?;
        tx.commit()?;
        Ok(())
    }

    fn get(&self, id: &str) -> RepoResult<Option<ListItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                i.id AS id,
                i.list_id AS list_id,
                i.title AS title,
                i.notes AS notes,
                i.is_checked AS is_checked,
                i.sort_order AS sort_order
             FROM list_items i
             INNER JOIN lists l ON l.id = i.list_id
             WHERE i.id = ?1
               AND l.user_id = ?2;",
        )?;
        let row = stmt
            .query_row(params![id, self.user_id], |row| Ok(parse_list_item_row(row)))
            .optional()?;
        row.transpose()
    }

    fn list_for_parent(&self, list_id: &str) -> RepoResult<Vec<ListItem>> {
        ensure_owner(
            self.conn,
            LIST_OWNER_SQL,
            ListModel::KIND,
            list_id,
            &self.user_id,
        )?;
        list_items(self.conn, list_id)
    }
}

impl Reorderable<ListItem> for SqliteListItemRepository<'_> {
    fn reorder(&self, list_id: &str, ordered_ids: &[String]) -> RepoResult<Vec<ListItem>> {
        ensure_owner(
            self.conn,
            LIST_OWNER_SQL,
            ListModel::KIND,
            list_id,
            &self.user_id,
        )?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let current = list_items(&tx, list_id)?
            .into_iter()
            .map(|item| item.id)
            .collect::<Vec<_>>();
        let ordered = merge_order(ListItem::KIND, &current, ordered_ids)?;
        for (index, id) in ordered.iter().enumerate() {
            tx.execute(
                "UPDATE list_items
                 SET sort_order = ?2
                 WHERE id = ?1
                   AND list_id = ?3;",
                params![id, index as i64, list_id],
            )?;
        }
        tx.commit()?;

        list_items(self.conn, list_id)
    }
}

fn refresh_list_counters(conn: &Connection, list_id: &str) -> RepoResult<()> {
    conn.execute(
        "UPDATE lists
         SET
            total_item_count = (
                SELECT COUNT(*) FROM list_items WHERE list_id = ?1
            ),
            checked_item_count = (
                SELECT COUNT(*) FROM list_items WHERE list_id = ?1 AND is_checked = 1
            ),
            updated_at = ?2
         WHERE id = ?1;",
        params![list_id, db_timestamp(&Utc::now())],
    )?;
    Ok(())
}

fn item_list_id(conn: &Connection, item_id: &str) -> RepoResult<String> {
    let list_id: Option<String> = conn
        .query_row(
            "SELECT list_id FROM list_items WHERE id = ?1;",
            [item_id],
            |row| row.get(0),
        )
        .optional()?;
    list_id.ok_or_else(|| {
        DataError::NotFound {
            entity: ListItem::KIND,
            id: item_id.to_string(),
        }
        .into()
    })
}

fn list_lists(conn: &Connection, space_id: &str, user_id: &str) -> RepoResult<Vec<ListModel>> {
    let mut stmt = conn.prepare(&format!(
        "{LIST_SELECT_SQL}
         WHERE space_id = ?1
           AND user_id = ?2
         ORDER BY sort_order ASC, created_at ASC, id ASC;"
    ))?;
    let mut rows = stmt.query(params![space_id, user_id])?;
    let mut lists = Vec::new();
    while let Some(row) = rows.next()? {
        lists.push(parse_list_row(row)?);
    }
    Ok(lists)
}

fn list_items(conn: &Connection, list_id: &str) -> RepoResult<Vec<ListItem>> {
    let mut stmt = conn.prepare(&format!(
        "{LIST_ITEM_SELECT_SQL}
         WHERE list_id = ?1
         ORDER BY sort_order ASC, rowid ASC;"
    ))?;
    let mut rows = stmt.query([list_id])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse_list_item_row(row)?);
    }
    Ok(items)
}

fn parse_list_row(row: &Row<'_>) -> RepoResult<ListModel> {
    let style: String = row.get("style")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;
    Ok(ListModel {
        id: row.get("id")?,
        space_id: row.get("space_id")?,
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        icon: row.get("icon")?,
        style: ListStyle::parse_or_default(&style),
        total_item_count: row.get("total_item_count")?,
        checked_item_count: row.get("checked_item_count")?,
        created_at: parse_db_timestamp(&created_at, "lists.created_at")?,
        updated_at: parse_db_timestamp(&updated_at, "lists.updated_at")?,
        sort_order: row.get("sort_order")?,
    })
}

fn parse_list_item_row(row: &Row<'_>) -> RepoResult<ListItem> {
    Ok(ListItem {
        id: row.get("id")?,
        list_id: row.get("list_id")?,
        title: row.get("title")?,
        notes: row.get("notes")?,
        is_checked: int_to_bool(row.get("is_checked")?, "list_items.is_checked")?,
        sort_order: row.get("sort_order")?,
    })
}
