//! Region repository contract and SQLite implementation.
//!
//! # Invariants
//! - The keyword gate rejects writes before any store mutation is attempted.
//! - Searches conjoin whichever of code/local_code/name are provided.

use crate::model::region::{Region, RegionId};
use crate::model::EntityKind;
use crate::repo::{
    is_foreign_key_violation, is_unique_violation, provided_field, RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const REGION_SELECT_SQL: &str = "SELECT
    region_id,
    region_code,
    local_code,
    name,
    continent_id,
    country_id,
    wikipedia_link,
    keywords
FROM region";

const INVALID_PARENT_REFERENCE: &str = "Please enter valid continent id and country id";

/// Sparse filter for region searches.
///
/// Only non-empty fields participate in the query conjunction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionQuery {
    pub code: Option<String>,
    pub local_code: Option<String>,
    pub name: Option<String>,
}

/// Handler interface for region operations.
pub trait RegionRepository {
    /// Returns rows matching all provided filter fields by exact equality.
    fn search(&self, query: &RegionQuery) -> RepoResult<Vec<Region>>;
    /// Inserts a candidate row and returns it with the store-assigned id.
    fn create(&self, candidate: &Region) -> RepoResult<Region>;
    /// Fetches exactly one row by id.
    fn load(&self, id: RegionId) -> RepoResult<Region>;
    /// Overwrites the full row keyed by id and echoes the input back.
    fn save(&self, region: &Region) -> RepoResult<Region>;
}

/// SQLite-backed region repository.
pub struct SqliteRegionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRegionRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn code_exists(&self, code: &str) -> RepoResult<bool> {
        let mut stmt = self
            .conn
            .prepare("SELECT 1 FROM region WHERE region_code = ?1;")?;
        Ok(stmt.exists(params![code])?)
    }

    fn find_by_natural_key(&self, code: &str, name: &str) -> RepoResult<Region> {
        let mut stmt = self.conn.prepare(&format!(
            "{REGION_SELECT_SQL} WHERE region_code = ?1 AND name = ?2;"
        ))?;

        let mut rows = stmt.query(params![code, name])?;
        match rows.next()? {
            Some(row) => parse_region_row(row),
            None => Err(RepoError::InvalidData(format!(
                "inserted region `{code}` could not be read back"
            ))),
        }
    }
}

impl RegionRepository for SqliteRegionRepository<'_> {
    fn search(&self, query: &RegionQuery) -> RepoResult<Vec<Region>> {
        let mut conditions: Vec<&str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(code) = provided_field(&query.code) {
            conditions.push("region_code = ?");
            bind_values.push(Value::Text(code.to_string()));
        }
        if let Some(local_code) = provided_field(&query.local_code) {
            conditions.push("local_code = ?");
            bind_values.push(Value::Text(local_code.to_string()));
        }
        if let Some(name) = provided_field(&query.name) {
            conditions.push("name = ?");
            bind_values.push(Value::Text(name.to_string()));
        }

        if conditions.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("{REGION_SELECT_SQL} WHERE {};", conditions.join(" AND "));
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;

        let mut regions = Vec::new();
        while let Some(row) = rows.next()? {
            regions.push(parse_region_row(row)?);
        }

        Ok(regions)
    }

    fn create(&self, candidate: &Region) -> RepoResult<Region> {
        if !candidate.has_keywords() {
            return Err(RepoError::MissingKeyword {
                entity: EntityKind::Region,
            });
        }

        if self.code_exists(&candidate.code)? {
            return Err(RepoError::DuplicateCode {
                entity: EntityKind::Region,
                code: candidate.code.clone(),
            });
        }

        self.conn
            .execute(
                "INSERT INTO region
                    (region_code, local_code, name, continent_id, country_id, wikipedia_link, keywords)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                params![
                    candidate.code,
                    candidate.local_code,
                    candidate.name,
                    candidate.continent_id,
                    candidate.country_id,
                    candidate.wikipedia_link,
                    candidate.keywords,
                ],
            )
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    RepoError::InvalidReference {
                        entity: EntityKind::Region,
                        detail: INVALID_PARENT_REFERENCE.to_string(),
                    }
                } else {
                    RepoError::from(err)
                }
            })?;

        self.find_by_natural_key(&candidate.code, &candidate.name)
    }

    fn load(&self, id: RegionId) -> RepoResult<Region> {
        let mut stmt = self
            .conn
            .prepare(&format!("{REGION_SELECT_SQL} WHERE region_id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => parse_region_row(row),
            None => Err(RepoError::NotFound {
                entity: EntityKind::Region,
                id,
            }),
        }
    }

    fn save(&self, region: &Region) -> RepoResult<Region> {
        if !region.has_keywords() {
            return Err(RepoError::MissingKeyword {
                entity: EntityKind::Region,
            });
        }

        let id = region.id.ok_or_else(|| {
            RepoError::InvalidData("cannot save a region without an assigned id".to_string())
        })?;

        let changed = self
            .conn
            .execute(
                "UPDATE region
                 SET
                    region_code = ?1,
                    local_code = ?2,
                    name = ?3,
                    continent_id = ?4,
                    country_id = ?5,
                    wikipedia_link = ?6,
                    keywords = ?7
                 WHERE region_id = ?8;",
                params![
                    region.code,
                    region.local_code,
                    region.name,
                    region.continent_id,
                    region.country_id,
                    region.wikipedia_link,
                    region.keywords,
                    id,
                ],
            )
            .map_err(|err| classify_region_write_error(err, region))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Region,
                id,
            });
        }

        Ok(region.clone())
    }
}

fn classify_region_write_error(err: rusqlite::Error, region: &Region) -> RepoError {
    if is_unique_violation(&err) {
        RepoError::DuplicateCode {
            entity: EntityKind::Region,
            code: region.code.clone(),
        }
    } else if is_foreign_key_violation(&err) {
        RepoError::InvalidReference {
            entity: EntityKind::Region,
            detail: INVALID_PARENT_REFERENCE.to_string(),
        }
    } else {
        RepoError::from(err)
    }
}

fn parse_region_row(row: &Row<'_>) -> RepoResult<Region> {
    Ok(Region {
        id: Some(row.get("region_id")?),
        code: row.get("region_code")?,
        local_code: row.get("local_code")?,
        name: row.get("name")?,
        continent_id: row.get("continent_id")?,
        country_id: row.get("country_id")?,
        wikipedia_link: row.get("wikipedia_link")?,
        keywords: row.get("keywords")?,
    })
}
