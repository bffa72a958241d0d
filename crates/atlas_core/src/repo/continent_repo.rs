//! Continent repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the search/create/load/save handler for the `continent` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Create runs the code-uniqueness lookup before inserting.
//! - Created records are re-read by natural key to recover the assigned id.

use crate::model::continent::{Continent, ContinentId};
use crate::model::EntityKind;
use crate::repo::{is_unique_violation, provided_field, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const CONTINENT_SELECT_SQL: &str = "SELECT continent_id, continent_code, name FROM continent";

/// Sparse filter for continent searches.
///
/// Only non-empty fields participate in the query conjunction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContinentQuery {
    pub code: Option<String>,
    pub name: Option<String>,
}

/// Handler interface for continent operations.
pub trait ContinentRepository {
    /// Returns rows matching all provided filter fields by exact equality.
    ///
    /// Yields no rows when no filter field is provided.
    fn search(&self, query: &ContinentQuery) -> RepoResult<Vec<Continent>>;
    /// Inserts a candidate row and returns it with the store-assigned id.
    fn create(&self, candidate: &Continent) -> RepoResult<Continent>;
    /// Fetches exactly one row by id.
    fn load(&self, id: ContinentId) -> RepoResult<Continent>;
    /// Overwrites the full row keyed by id and echoes the input back.
    fn save(&self, continent: &Continent) -> RepoResult<Continent>;
}

/// SQLite-backed continent repository.
pub struct SqliteContinentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContinentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn code_exists(&self, code: &str) -> RepoResult<bool> {
        let mut stmt = self
            .conn
            .prepare("SELECT 1 FROM continent WHERE continent_code = ?1;")?;
        Ok(stmt.exists(params![code])?)
    }

    fn find_by_natural_key(&self, code: &str, name: &str) -> RepoResult<Continent> {
        let mut stmt = self.conn.prepare(&format!(
            "{CONTINENT_SELECT_SQL} WHERE continent_code = ?1 AND name = ?2;"
        ))?;

        let mut rows = stmt.query(params![code, name])?;
        match rows.next()? {
            Some(row) => parse_continent_row(row),
            None => Err(RepoError::InvalidData(format!(
                "inserted continent `{code}` could not be read back"
            ))),
        }
    }
}

impl ContinentRepository for SqliteContinentRepository<'_> {
    fn search(&self, query: &ContinentQuery) -> RepoResult<Vec<Continent>> {
        let mut conditions: Vec<&str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(code) = provided_field(&query.code) {
            conditions.push("continent_code = ?");
            bind_values.push(Value::Text(code.to_string()));
        }
        if let Some(name) = provided_field(&query.name) {
            conditions.push("name = ?");
            bind_values.push(Value::Text(name.to_string()));
        }

        if conditions.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("{CONTINENT_SELECT_SQL} WHERE {};", conditions.join(" AND "));
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;

        let mut continents = Vec::new();
        while let Some(row) = rows.next()? {
            continents.push(parse_continent_row(row)?);
        }

        Ok(continents)
    }

    fn create(&self, candidate: &Continent) -> RepoResult<Continent> {
        if self.code_exists(&candidate.code)? {
            return Err(RepoError::DuplicateCode {
                entity: EntityKind::Continent,
                code: candidate.code.clone(),
            });
        }

        self.conn.execute(
            "INSERT INTO continent (continent_code, name) VALUES (?1, ?2);",
            params![candidate.code, candidate.name],
        )?;

        self.find_by_natural_key(&candidate.code, &candidate.name)
    }

    fn load(&self, id: ContinentId) -> RepoResult<Continent> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTINENT_SELECT_SQL} WHERE continent_id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => parse_continent_row(row),
            None => Err(RepoError::NotFound {
                entity: EntityKind::Continent,
                id,
            }),
        }
    }

    fn save(&self, continent: &Continent) -> RepoResult<Continent> {
        let id = continent.id.ok_or_else(|| {
            RepoError::InvalidData("cannot save a continent without an assigned id".to_string())
        })?;

        let changed = self
            .conn
            .execute(
                "UPDATE continent SET continent_code = ?1, name = ?2 WHERE continent_id = ?3;",
                params![continent.code, continent.name, id],
            )
            .map_err(|err| {
                if is_unique_violation(&err) {
                    RepoError::DuplicateCode {
                        entity: EntityKind::Continent,
                        code: continent.code.clone(),
                    }
                } else {
                    RepoError::from(err)
                }
            })?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Continent,
                id,
            });
        }

        Ok(continent.clone())
    }
}

fn parse_continent_row(row: &Row<'_>) -> RepoResult<Continent> {
    Ok(Continent {
        id: Some(row.get("continent_id")?),
        code: row.get("continent_code")?,
        name: row.get("name")?,
    })
}
