//! Repository layer: per-entity handlers over the SQLite store.
//!
//! # Responsibility
//! - Define the search/create/load/save contracts for each entity family.
//! - Isolate SQL details and store error classification from the engine.
//!
//! # Invariants
//! - Write paths run the keyword gate before any store mutation.
//! - Store-level errors never leave this layer raw; every failure is one of
//!   the closed [`RepoError`] kinds with a user-presentable message.

use crate::db::DbError;
use crate::model::EntityKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod continent_repo;
pub mod country_repo;
pub mod region_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Closed failure taxonomy for all repository operations.
///
/// `Display` renders the reason the interface layer shows verbatim, so
/// callers can branch on the variant while the UI keeps its message.
#[derive(Debug)]
pub enum RepoError {
    /// The natural key already names a different row of the same table.
    DuplicateCode { entity: EntityKind, code: String },
    /// The keyword gate rejected a Country/Region write before the store.
    MissingKeyword { entity: EntityKind },
    /// A parent reference does not name an existing row.
    InvalidReference { entity: EntityKind, detail: String },
    /// No row carries the requested identifier.
    NotFound { entity: EntityKind, id: i64 },
    /// No store connection is currently open.
    StoreUnavailable,
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateCode { entity, .. } => write!(f, "{entity} Code already exists"),
            Self::MissingKeyword { .. } => write!(f, "Enter a keyword"),
            Self::InvalidReference { detail, .. } => write!(f, "{detail}"),
            Self::NotFound { entity, id } => write!(f, "{entity} with id {id} was not found"),
            Self::StoreUnavailable => write!(f, "No database is open"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted row: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Treats empty filter strings the same as absent ones.
pub(crate) fn provided_field(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(code, _)
            if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

pub(crate) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(code, _)
            if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}
