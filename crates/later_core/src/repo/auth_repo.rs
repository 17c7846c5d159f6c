//! Auth-side storage: users, sessions and sign-in attempts.
//!
//! # Responsibility
//! - Persist accounts with salted, stretched password hashes.
//! - Issue, resolve and revoke opaque session tokens.
//! - Record failed sign-ins so callers can rate limit.
//!
//! # Invariants
//! - Plain passwords never reach the database.
//! - Emails compare case-insensitively.
//! - Policy (rate limits, TTL, confirmation) lives in the auth service.

use crate::error::{AuthError, ConstraintKind, DataError};
use crate::model::session::Session;
use crate::repo::{db_timestamp, int_to_bool, parse_db_timestamp, RepoResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

/// Account row without its credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub email: Option<String>,
    pub is_anonymous: bool,
    pub email_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

pub trait AuthBackend {
    /// Creates an email/password account.
    fn create_user(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> RepoResult<UserRecord>;
    /// Creates an account with no credentials.
    fn create_anonymous_user(&self, now: DateTime<Utc>) -> RepoResult<UserRecord>;
    /// Returns the account when `password` matches, `None` otherwise.
    fn verify_credentials(&self, email: &str, password: &str) -> RepoResult<Option<UserRecord>>;
    /// Attaches credentials to an anonymous account, keeping its id.
    fn attach_credentials(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
    ) -> RepoResult<UserRecord>;
    fn confirm_email(&self, user_id: &str) -> RepoResult<()>;
    fn get_user(&self, user_id: &str) -> RepoResult<Option<UserRecord>>;

    fn create_session(&self, user: &UserRecord, expires_at: DateTime<Utc>)
        -> RepoResult<Session>;
    fn find_session(&self, token: &str) -> RepoResult<Option<Session>>;
    fn delete_session(&self, token: &str) -> RepoResult<()>;

    fn record_failed_attempt(&self, email: &str, at: DateTime<Utc>) -> RepoResult<()>;
    fn count_failed_attempts(&self, email: &str, since: DateTime<Utc>) -> RepoResult<u32>;
    fn clear_failed_attempts(&self, email: &str) -> RepoResult<()>;
}

pub struct SqliteAuthBackend<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthBackend<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn require_user(&self, user_id: &str) -> RepoResult<UserRecord> {
        self.get_user(user_id)?.ok_or_else(|| {
            DataError::NotFound {
                entity: "user",
                id: user_id.to_string(),
            }
            .into()
        })
    }
}

impl AuthBackend for SqliteAuthBackend<'_> {
    fn create_user(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> RepoResult<UserRecord> {
        let id = Uuid::new_v4().to_string();
        let salt = new_salt();
        let inserted = self.conn.execute(
            "INSERT INTO users (
                id,
                email,
                password_hash,
                password_salt,
                is_anonymous,
                email_confirmed,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, 0, 0, ?5);",
            params![
                id,
                email,
                hash_password(&salt, password),
                salt,
                db_timestamp(&now)
            ],
        );
        map_duplicate_email(inserted)?;
        self.require_user(&id)
    }

    fn create_anonymous_user(&self, now: DateTime<Utc>) -> RepoResult<UserRecord> {
        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO users (id, is_anonymous, email_confirmed, created_at)
             VALUES (?1, 1, 0, ?2);",
            params![id, db_timestamp(&now)],
        )?;
        self.require_user(&id)
    }

    fn verify_credentials(&self, email: &str, password: &str) -> RepoResult<Option<UserRecord>> {
        let stored: Option<(String, Option<String>, Option<String>)> = self
            .conn
            .query_row(
                "SELECT id, password_hash, password_salt
                 FROM users
                 WHERE email = ?1;",
                [email],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let Some((id, Some(hash), Some(salt))) = stored else {
            return Ok(None);
        };
        if !password_matches(&hash, &salt, password) {
            return Ok(None);
        }
        self.get_user(&id)
    }

    fn attach_credentials(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
    ) -> RepoResult<UserRecord> {
        let salt = new_salt();
        let updated = self.conn.execute(
            "UPDATE users
             SET
                email = ?2,
                password_hash = ?3,
                password_salt = ?4,
                is_anonymous = 0
             WHERE id = ?1
               AND is_anonymous = 1;",
            params![user_id, email, hash_password(&salt, password), salt],
        );
        if map_duplicate_email(updated)? == 0 {
            return Err(AuthError::UpgradeFailed.into());
        }
        self.require_user(user_id)
    }

    fn confirm_email(&self, user_id: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE users SET email_confirmed = 1 WHERE id = ?1;",
            [user_id],
        )?;
        if changed == 0 {
            return Err(DataError::NotFound {
                entity: "user",
                id: user_id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn get_user(&self, user_id: &str) -> RepoResult<Option<UserRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, email, is_anonymous, email_confirmed, created_at
             FROM users
             WHERE id = ?1;",
        )?;
        let row = stmt
            .query_row([user_id], |row| Ok(parse_user_row(row)))
            .optional()?;
        row.transpose()
    }

    fn create_session(
        &self,
        user: &UserRecord,
        expires_at: DateTime<Utc>,
    ) -> RepoResult<Session> {
        let token = Uuid::new_v4().simple().to_string();
        self.conn.execute(
            "INSERT INTO sessions (token, user_id, expires_at) VALUES (?1, ?2, ?3);",
            params![token, user.id, db_timestamp(&expires_at)],
        )?;
        Ok(Session {
            user_id: user.id.clone(),
            email: user.email.clone(),
            is_anonymous: user.is_anonymous,
            access_token: token,
            expires_at,
        })
    }

    fn find_session(&self, token: &str) -> RepoResult<Option<Session>> {
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT user_id, expires_at FROM sessions WHERE token = ?1;",
                [token],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let Some((user_id, expires_at)) = row else {
            return Ok(None);
        };

        let user = self.require_user(&user_id)?;
        Ok(Some(Session {
            user_id: user.id,
            email: user.email,
            is_anonymous: user.is_anonymous,
            access_token: token.to_string(),
            expires_at: parse_db_timestamp(&expires_at, "sessions.expires_at")?,
        }))
    }

    fn delete_session(&self, token: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM sessions WHERE token = ?1;", [token])?;
        Ok(())
    }

    fn record_failed_attempt(&self, email: &str, at: DateTime<Utc>) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO sign_in_attempts (email, attempted_at) VALUES (?1, ?2);",
            params![email, db_timestamp(&at)],
        )?;
        Ok(())
    }

    fn count_failed_attempts(&self, email: &str, since: DateTime<Utc>) -> RepoResult<u32> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*)
             FROM sign_in_attempts
             WHERE email = ?1
               AND attempted_at >= ?2;",
            params![email, db_timestamp(&since)],
            |row| row.get(0),
        )?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    fn clear_failed_attempts(&self, email: &str) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM sign_in_attempts WHERE email = ?1;", [email])?;
        tx.commit()?;
        Ok(())
    }
}

fn new_salt() -> String {
    Uuid::new_v4().simple().to_string()
}

const PASSWORD_KDF_CONTEXT: &str = "later local accounts 2026-01 password hash v1";
const PASSWORD_SCHEME: &str = "b3kdf";
const PASSWORD_ROUNDS: u32 = 10_000;
const MAX_PASSWORD_ROUNDS: u32 = 1_000_000;

/// Salted, key-derived and iterated blake3.
///
/// Local stand-in for the hosted provider's credential hashing. Each round
/// re-mixes the password under a salt-derived key, so the round count is
/// the offline work factor.
fn stretch(salt: &str, password: &str, rounds: u32) -> blake3::Hash {
    let key = blake3::derive_key(PASSWORD_KDF_CONTEXT, salt.as_bytes());
    let mut state = blake3::keyed_hash(&key, password.as_bytes());
    for _ in 1..rounds {
        let mut hasher = blake3::Hasher::new_keyed(&key);
        hasher.update(state.as_bytes());
        hasher.update(password.as_bytes());
        state = hasher.finalize();
    }
    state
}

/// Encodes as `b3kdf$<rounds>$<hex>` so the work factor travels with the row.
fn hash_password(salt: &str, password: &str) -> String {
    hash_with_rounds(salt, password, PASSWORD_ROUNDS)
}

fn hash_with_rounds(salt: &str, password: &str, rounds: u32) -> String {
    format!(
        "{PASSWORD_SCHEME}${rounds}${}",
        stretch(salt, password, rounds).to_hex()
    )
}

fn password_matches(stored_hash: &str, salt: &str, password: &str) -> bool {
    let mut parts = stored_hash.splitn(3, '$');
    let (Some(PASSWORD_SCHEME), Some(rounds), Some(hex)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let Some(rounds) = rounds
        .parse::<u32>()
        .ok()
        .filter(|rounds| (1..=MAX_PASSWORD_ROUNDS).contains(rounds))
    else {
        return false;
    };
    let Ok(stored) = blake3::Hash::from_hex(hex) else {
        return false;
    };
    // `Hash` equality is constant-time.
    stretch(salt, password, rounds) == stored
}

fn map_duplicate_email(result: rusqlite::Result<usize>) -> RepoResult<usize> {
    result.map_err(|err| match crate::error::classify_sqlite_error(err) {
        crate::error::AppError::Data(DataError::ConstraintViolation(ConstraintKind::Unique)) => {
            AuthError::UserAlreadyExists.into()
        }
        other => other,
    })
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<UserRecord> {
    let created_at: String = row.get("created_at")?;
    Ok(UserRecord {
        id: row.get("id")?,
        email: row.get("email")?,
        is_anonymous: int_to_bool(row.get("is_anonymous")?, "users.is_anonymous")?,
        email_confirmed: int_to_bool(row.get("email_confirmed")?, "users.email_confirmed")?,
        created_at: parse_db_timestamp(&created_at, "users.created_at")?,
    })
}
