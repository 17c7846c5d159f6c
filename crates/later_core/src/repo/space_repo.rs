//! Space repository contracts and SQLite implementation.
//!
//! # Invariants
//! - All queries are constrained to the repository's `user_id`.
//! - Deleting a space that still owns notes or lists fails with a
//!   foreign-key violation; callers archive such spaces instead.

use crate::error::DataError;
use crate::model::space::Space;
use crate::model::Entity;
use crate::repo::{
    bool_to_int, db_timestamp, ensure_owner, int_to_bool, parse_db_timestamp, RepoResult,
    Repository,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

const SPACE_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    name,
    icon,
    color,
    is_archived,
    created_at,
    updated_at
FROM spaces";

pub(crate) const SPACE_OWNER_SQL: &str = "SELECT user_id FROM spaces WHERE id = ?1;";

/// Space-specific queries on top of the shared CRUD contract.
pub trait SpaceRepository: Repository<Space> {
    /// Lists the user's spaces, optionally including archived ones.
    fn list_spaces(&self, include_archived: bool) -> RepoResult<Vec<Space>>;
    /// Flips the archive flag and stamps `updated_at` in one write.
    fn set_archived(&self, id: &str, archived: bool, at: DateTime<Utc>) -> RepoResult<Space>;
}

/// SQLite-backed space repository scoped to one user.
pub struct SqliteSpaceRepository<'conn> {
    conn: &'conn Connection,
    user_id: String,
}

impl<'conn> SqliteSpaceRepository<'conn> {
    pub fn new(conn: &'conn Connection, user_id: impl Into<String>) -> Self {
        Self {
            conn,
            user_id: user_id.into(),
        }
    }

    fn read_back(&self, id: &str) -> RepoResult<Space> {
        self.get(id)?.ok_or_else(|| {
            DataError::NotFound {
                entity: Space::KIND,
                id: id.to_string(),
            }
            .into()
        })
    }
}

impl Repository<Space> for SqliteSpaceRepository<'_> {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn create(&self, space: &Space) -> RepoResult<Space> {
        if space.user_id != self.user_id {
            return Err(DataError::PermissionDenied {
                entity: Space::KIND,
                id: space.id.clone(),
            }
            .into());
        }

        self.conn.execute(
            "INSERT INTO spaces (
                id,
                user_id,
                name,
                icon,
                color,
                is_archived,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                space.id,
                space.user_id,
                space.name,
                space.icon,
                space.color,
                bool_to_int(space.is_archived),
                db_timestamp(&space.created_at),
                db_timestamp(&space.updated_at),
            ],
        )?;

        self.read_back(&space.id)
    }

    fn update(&self, space: &Space) -> RepoResult<Space> {
        ensure_owner(
            self.conn,
            SPACE_OWNER_SQL,
            Space::KIND,
            &space.id,
            &self.user_id,
        )?;

        self.conn.execute(
            "UPDATE spaces
             SET
                name = ?3,
                icon = ?4,
                color = ?5,
                is_archived = ?6,
                updated_at = ?7
             WHERE id = ?1
               AND user_id = ?2;",
            params![
                space.id,
                self.user_id,
                space.name,
                space.icon,
                space.color,
                bool_to_int(space.is_archived),
                db_timestamp(&space.updated_at),
            ],
        )?;

        self.read_back(&space.id)
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        ensure_owner(self.conn, SPACE_OWNER_SQL, Space::KIND, id, &self.user_id)?;
        self.conn.execute(
            "DELETE FROM spaces WHERE id = ?1 AND user_id = ?2;",
            params![id, self.user_id],
        )?;
        Ok(())
    }

    fn get(&self, id: &str) -> RepoResult<Option<Space>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SPACE_SELECT_SQL}
             WHERE id = ?1
               AND user_id = ?2;"
        ))?;
        let row = stmt
            .query_row(params![id, self.user_id], |row| Ok(parse_space_row(row)))
            .optional()?;
        row.transpose()
    }

    fn list_for_parent(&self, parent_id: &str) -> RepoResult<Vec<Space>> {
        if parent_id != self.user_id {
            return Err(DataError::PermissionDenied {
                entity: Space::KIND,
                id: parent_id.to_string(),
            }
            .into());
        }
        self.list_spaces(false)
    }
}

impl SpaceRepository for SqliteSpaceRepository<'_> {
    fn list_spaces(&self, include_archived: bool) -> RepoResult<Vec<Space>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SPACE_SELECT_SQL}
             WHERE user_id = ?1
               AND (?2 = 1 OR is_archived = 0)
             ORDER BY created_at ASC, id ASC;"
        ))?;
        let mut rows = stmt.query(params![self.user_id, bool_to_int(include_archived)])?;
        let mut spaces = Vec::new();
        while let Some(row) = rows.next()? {
            spaces.push(parse_space_row(row)?);
        }
        Ok(spaces)
    }

    fn set_archived(&self, id: &str, archived: bool, at: DateTime<Utc>) -> RepoResult<Space> {
        ensure_owner(self.conn, SPACE_OWNER_SQL, Space::KIND, id, &self.user_id)?;
        self.conn.execute(
            "UPDATE spaces
             SET
                is_archived = ?3,
                updated_at = ?4
             WHERE id = ?1
               AND user_id = ?2;",
            params![id, self.user_id, bool_to_int(archived), db_timestamp(&at)],
        )?;
        self.read_back(id)
    }
}

fn parse_space_row(row: &Row<'_>) -> RepoResult<Space> {
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;
    Ok(Space {
        id: row.get("id")?,
        name: row.get("name")?,
        icon: row.get("icon")?,
        color: row.get("color")?,
        is_archived: int_to_bool(row.get("is_archived")?, "spaces.is_archived")?,
        user_id: row.get("user_id")?,
        created_at: parse_db_timestamp(&created_at, "spaces.created_at")?,
        updated_at: parse_db_timestamp(&updated_at, "spaces.updated_at")?,
    })
}
