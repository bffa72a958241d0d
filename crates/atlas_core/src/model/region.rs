//! Region domain record.

use crate::model::continent::ContinentId;
use crate::model::country::CountryId;
use serde::{Deserialize, Serialize};

/// Store-assigned row identifier for regions.
pub type RegionId = i64;

/// One region row as a disconnected snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// `None` until the store has assigned a row id.
    pub id: Option<RegionId>,
    /// Unique natural key, e.g. `KE-110`.
    pub code: String,
    /// Local administrative code; not unique on its own.
    pub local_code: String,
    pub name: String,
    /// Parent continent; must reference an existing continent row.
    pub continent_id: ContinentId,
    /// Parent country; must reference an existing country row.
    pub country_id: CountryId,
    pub wikipedia_link: Option<String>,
    /// Required non-empty before the record may be persisted.
    pub keywords: Option<String>,
}

impl Region {
    /// Creates a create-candidate record with no id and empty optional fields.
    pub fn new(
        code: impl Into<String>,
        local_code: impl Into<String>,
        name: impl Into<String>,
        continent_id: ContinentId,
        country_id: CountryId,
    ) -> Self {
        Self {
            id: None,
            code: code.into(),
            local_code: local_code.into(),
            name: name.into(),
            continent_id,
            country_id,
            wikipedia_link: None,
            keywords: None,
        }
    }

    /// Whether the persistence keyword gate is satisfied.
    pub fn has_keywords(&self) -> bool {
        self.keywords.as_deref().is_some_and(|value| !value.is_empty())
    }
}
