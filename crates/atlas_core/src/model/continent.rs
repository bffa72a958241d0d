//! Continent domain record.
//!
//! # Invariants
//! - `id` is assigned by the store on insert and never chosen by callers.
//! - `code` must be unique across the continent table at all times.

use serde::{Deserialize, Serialize};

/// Store-assigned row identifier for continents.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ContinentId = i64;

/// One continent row as a disconnected snapshot.
///
/// A record with `id == None` is a create candidate; the store assigns the
/// identifier on insert and the populated record is handed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continent {
    /// `None` until the store has assigned a row id.
    pub id: Option<ContinentId>,
    /// Unique natural key, e.g. `AF`.
    pub code: String,
    /// Display name, e.g. `Africa`.
    pub name: String,
}

impl Continent {
    /// Creates a create-candidate record with no id.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            code: code.into(),
            name: name.into(),
        }
    }

    /// Creates a record carrying an already-assigned id.
    ///
    /// Used by read paths hydrating rows back out of the store.
    pub fn with_id(id: ContinentId, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            code: code.into(),
            name: name.into(),
        }
    }
}
