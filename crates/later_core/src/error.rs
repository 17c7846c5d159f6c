//! Error taxonomy shared by the data, auth, network and validation layers.
//!
//! # Responsibility
//! - Give every failure a typed, closed category.
//! - Map each category 1:1 onto a localization key and its parameters.
//!
//! # Invariants
//! - Errors travel upward unchanged; no layer retries or rewrites them.
//! - Every variant has a catalog key present in both locales.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AppResult<T> = Result<T, AppError>;

/// Which database constraint rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    NotNull,
}

/// Data-layer failures raised by repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// Row does not exist.
    NotFound { entity: &'static str, id: String },
    /// Row exists but belongs to another user.
    PermissionDenied { entity: &'static str, id: String },
    ConstraintViolation(ConstraintKind),
    Timeout,
    Unknown(String),
}

impl Display for DataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::PermissionDenied { entity, id } => {
                write!(f, "permission denied for {entity}: {id}")
            }
            Self::ConstraintViolation(ConstraintKind::Unique) => {
                write!(f, "unique constraint violated")
            }
            Self::ConstraintViolation(ConstraintKind::ForeignKey) => {
                write!(f, "foreign key constraint violated")
            }
            Self::ConstraintViolation(ConstraintKind::NotNull) => {
                write!(f, "not-null constraint violated")
            }
            Self::Timeout => write!(f, "database operation timed out"),
            Self::Unknown(message) => write!(f, "database error: {message}"),
        }
    }
}

impl Error for DataError {}

/// Authentication failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    InvalidCredentials,
    UserAlreadyExists,
    WeakPassword,
    InvalidEmail,
    EmailNotConfirmed,
    SessionExpired,
    RateLimitExceeded,
    AnonymousSignInFailed,
    UpgradeFailed,
    AlreadyAuthenticated,
    Generic(String),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid email or password"),
            Self::UserAlreadyExists => write!(f, "user already exists"),
            Self::WeakPassword => write!(f, "password is too weak"),
            Self::InvalidEmail => write!(f, "email address is invalid"),
            Self::EmailNotConfirmed => write!(f, "email address is not confirmed"),
            Self::SessionExpired => write!(f, "session expired"),
            Self::RateLimitExceeded => write!(f, "too many attempts"),
            Self::AnonymousSignInFailed => write!(f, "anonymous sign-in failed"),
            Self::UpgradeFailed => write!(f, "anonymous account upgrade failed"),
            Self::AlreadyAuthenticated => write!(f, "a session is already active"),
            Self::Generic(message) => write!(f, "authentication error: {message}"),
        }
    }
}

impl Error for AuthError {}

/// Transport failures between the app and its backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    Timeout,
    NoConnection,
    ServerError,
    BadRequest,
    NotFound,
    Generic(String),
}

impl Display for NetworkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timed out"),
            Self::NoConnection => write!(f, "backend unreachable"),
            Self::ServerError => write!(f, "server error"),
            Self::BadRequest => write!(f, "bad request"),
            Self::NotFound => write!(f, "resource not found"),
            Self::Generic(message) => write!(f, "network error: {message}"),
        }
    }
}

impl Error for NetworkError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    Required,
    InvalidFormat,
    /// Length (in chars) outside `min..=max`.
    OutOfRange { min: usize, max: usize },
    Duplicate,
}

/// Field-level input validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub kind: FieldErrorKind,
}

impl ValidationError {
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            kind: FieldErrorKind::Required,
        }
    }

    pub fn invalid_format(field: &'static str) -> Self {
        Self {
            field,
            kind: FieldErrorKind::InvalidFormat,
        }
    }

    pub fn out_of_range(field: &'static str, min: usize, max: usize) -> Self {
        Self {
            field,
            kind: FieldErrorKind::OutOfRange { min, max },
        }
    }

    pub fn duplicate(field: &'static str) -> Self {
        Self {
            field,
            kind: FieldErrorKind::Duplicate,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            FieldErrorKind::Required => write!(f, "{} is required", self.field),
            FieldErrorKind::InvalidFormat => write!(f, "{} has an invalid format", self.field),
            FieldErrorKind::OutOfRange { min, max } => write!(
                f,
                "{} must be between {min} and {max} characters",
                self.field
            ),
            FieldErrorKind::Duplicate => write!(f, "{} contains duplicates", self.field),
        }
    }
}

impl Error for ValidationError {}

/// Umbrella error returned by services and controllers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    Data(DataError),
    Auth(AuthError),
    Network(NetworkError),
    Validation(ValidationError),
}

impl AppError {
    /// Catalog key used to render this error for the user.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::Data(err) => match err {
                DataError::NotFound { .. } => "errorDatabaseNotFound",
                DataError::PermissionDenied { .. } => "errorDatabasePermissionDenied",
                DataError::ConstraintViolation(ConstraintKind::Unique) => {
                    "errorDatabaseUniqueConstraint"
                }
                DataError::ConstraintViolation(ConstraintKind::ForeignKey) => {
                    "errorDatabaseForeignKeyConstraint"
                }
                DataError::ConstraintViolation(ConstraintKind::NotNull) => {
                    "errorDatabaseNotNullConstraint"
                }
                DataError::Timeout => "errorDatabaseTimeout",
                DataError::Unknown(_) => "errorDatabaseGeneric",
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "errorAuthInvalidCredentials",
                AuthError::UserAlreadyExists => "errorAuthUserAlreadyExists",
                AuthError::WeakPassword => "errorAuthWeakPassword",
                AuthError::InvalidEmail => "errorAuthInvalidEmail",
                AuthError::EmailNotConfirmed => "errorAuthEmailNotConfirmed",
                AuthError::SessionExpired => "errorAuthSessionExpired",
                AuthError::RateLimitExceeded => "errorAuthRateLimitExceeded",
                AuthError::AnonymousSignInFailed => "errorAuthAnonymousSignInFailed",
                AuthError::UpgradeFailed => "errorAuthUpgradeFailed",
                AuthError::AlreadyAuthenticated => "errorAuthAlreadyAuthenticated",
                AuthError::Generic(_) => "errorAuthGeneric",
            },
            Self::Network(err) => match err {
                NetworkError::Timeout => "errorNetworkTimeout",
                NetworkError::NoConnection => "errorNetworkNoConnection",
                NetworkError::ServerError => "errorNetworkServerError",
                NetworkError::BadRequest => "errorNetworkBadRequest",
                NetworkError::NotFound => "errorNetworkNotFound",
                NetworkError::Generic(_) => "errorNetworkGeneric",
            },
            Self::Validation(err) => match err.kind {
                FieldErrorKind::Required => "errorValidationRequired",
                FieldErrorKind::InvalidFormat => "errorValidationInvalidFormat",
                FieldErrorKind::OutOfRange { .. } => "errorValidationOutOfRange",
                FieldErrorKind::Duplicate => "errorValidationDuplicate",
            },
        }
    }

    /// Named template parameters for [`AppError::message_key`].
    pub fn message_args(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Validation(err) => {
                let mut args = vec![("fieldName", err.field.to_string())];
                if let FieldErrorKind::OutOfRange { min, max } = err.kind {
                    args.push(("min", min.to_string()));
                    args.push(("max", max.to_string()));
                }
                args
            }
            _ => Vec::new(),
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Data(err) => write!(f, "{err}"),
            Self::Auth(err) => write!(f, "{err}"),
            Self::Network(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Data(err) => Some(err),
            Self::Auth(err) => Some(err),
            Self::Network(err) => Some(err),
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<DataError> for AppError {
    fn from(value: DataError) -> Self {
        Self::Data(value)
    }
}

impl From<AuthError> for AppError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<NetworkError> for AppError {
    fn from(value: NetworkError) -> Self {
        Self::Network(value)
    }
}

impl From<ValidationError> for AppError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(value: rusqlite::Error) -> Self {
        classify_sqlite_error(value)
    }
}

/// Maps a store failure onto the shared taxonomy.
///
/// Unreachable storage is reported as a connectivity failure, matching how
/// the hosted backend surfaces an unreachable database.
pub fn classify_sqlite_error(err: rusqlite::Error) -> AppError {
    use rusqlite::ffi;
    use rusqlite::ErrorCode;

    if let rusqlite::Error::SqliteFailure(code, _) = &err {
        match code.code {
            ErrorCode::ConstraintViolation => {
                let kind = match code.extended_code {
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        Some(ConstraintKind::Unique)
                    }
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(ConstraintKind::ForeignKey),
                    ffi::SQLITE_CONSTRAINT_NOTNULL => Some(ConstraintKind::NotNull),
                    _ => None,
                };
                if let Some(kind) = kind {
                    return DataError::ConstraintViolation(kind).into();
                }
            }
            ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
                return DataError::Timeout.into();
            }
            ErrorCode::CannotOpen | ErrorCode::SystemIoFailure => {
                return NetworkError::NoConnection.into();
            }
            _ => {}
        }
    }

    DataError::Unknown(err.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::{AppError, ConstraintKind, DataError, ValidationError};
    use rusqlite::Connection;

    #[test]
    fn unique_violation_is_classified() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (name TEXT UNIQUE); INSERT INTO t VALUES ('a');")
            .unwrap();
        let err = conn.execute("INSERT INTO t VALUES ('a')", []).unwrap_err();
        assert_eq!(
            AppError::from(err),
            AppError::Data(DataError::ConstraintViolation(ConstraintKind::Unique))
        );
    }

    #[test]
    fn not_null_violation_is_classified() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (name TEXT NOT NULL);")
            .unwrap();
        let err = conn.execute("INSERT INTO t VALUES (NULL)", []).unwrap_err();
        assert_eq!(
            AppError::from(err),
            AppError::Data(DataError::ConstraintViolation(ConstraintKind::NotNull))
        );
    }

    #[test]
    fn out_of_range_exposes_bounds_as_message_args() {
        let err = AppError::from(ValidationError::out_of_range("name", 1, 100));
        assert_eq!(err.message_key(), "errorValidationOutOfRange");
        let args = err.message_args();
        assert!(args.contains(&("fieldName", "name".to_string())));
        assert!(args.contains(&("max", "100".to_string())));
    }
}
