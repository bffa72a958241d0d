//! Country domain record.

use crate::model::continent::ContinentId;
use serde::{Deserialize, Serialize};

/// Store-assigned row identifier for countries.
pub type CountryId = i64;

/// One country row as a disconnected snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// `None` until the store has assigned a row id.
    pub id: Option<CountryId>,
    /// Unique natural key, e.g. `KE`.
    pub code: String,
    pub name: String,
    /// Parent continent; must reference an existing continent row.
    pub continent_id: ContinentId,
    pub wikipedia_link: Option<String>,
    /// Required non-empty before the record may be persisted.
    pub keywords: Option<String>,
}

impl Country {
    /// Creates a create-candidate record with no id and empty optional fields.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        continent_id: ContinentId,
    ) -> Self {
        Self {
            id: None,
            code: code.into(),
            name: name.into(),
            continent_id,
            wikipedia_link: None,
            keywords: None,
        }
    }

    /// Whether the persistence keyword gate is satisfied.
    pub fn has_keywords(&self) -> bool {
        self.keywords.as_deref().is_some_and(|value| !value.is_empty())
    }
}
