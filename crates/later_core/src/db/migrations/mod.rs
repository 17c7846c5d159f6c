//! Ordered schema steps for the local store.
//!
//! Each step runs inside one transaction together with every other pending
//! step, and bumps `PRAGMA user_version` to its own number.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "content_tables",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "auth_tables",
        sql: include_str!("0002_auth.sql"),
    },
    Migration {
        version: 3,
        name: "preferences",
        sql: include_str!("0003_preferences.sql"),
    },
];

/// Outcome of [`apply_migrations`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub from_version: u32,
    pub to_version: u32,
    /// Names of the steps run by this call, oldest first.
    pub applied: Vec<&'static str>,
}

pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the store up to [`latest_version`].
pub fn apply_migrations(conn: &mut Connection) -> DbResult<MigrationReport> {
    let from_version = current_user_version(conn)?;
    let latest = latest_version();
    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > from_version)
        .collect();
    if pending.is_empty() {
        return Ok(MigrationReport {
            from_version,
            to_version: from_version,
            applied: Vec::new(),
        });
    }

    let tx = conn.transaction()?;
    for migration in &pending {
        tx.execute_batch(migration.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", migration.version))
            .map_err(|source| DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            })?;
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    Ok(MigrationReport {
        from_version,
        to_version: latest,
        applied: pending.iter().map(|migration| migration.name).collect(),
    })
}

pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, current_user_version, latest_version, MIGRATIONS};
    use rusqlite::Connection;

    #[test]
    fn versions_are_contiguous_from_one() {
        for (index, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(migration.version as usize, index + 1, "{}", migration.name);
        }
    }

    #[test]
    fn fresh_store_runs_every_step_once() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", "ON").unwrap();

        let report = apply_migrations(&mut conn).unwrap();
        assert_eq!(report.from_version, 0);
        assert_eq!(report.to_version, latest_version());
        assert_eq!(
            report.applied,
            vec!["content_tables", "auth_tables", "preferences"]
        );

        let again = apply_migrations(&mut conn).unwrap();
        assert!(again.applied.is_empty());
        assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    }

    #[test]
    fn partially_migrated_store_resumes() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(include_str!("0001_init.sql")).unwrap();
        conn.pragma_update(None, "user_version", 1).unwrap();

        let report = apply_migrations(&mut conn).unwrap();
        assert_eq!(report.applied, vec!["auth_tables", "preferences"]);
    }
}
