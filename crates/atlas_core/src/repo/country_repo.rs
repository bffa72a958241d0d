//! Country repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the search/create/load/save handler for the `country` table.
//!
//! # Invariants
//! - The keyword gate rejects writes before any store mutation is attempted.
//! - A foreign-key rejection at insert time surfaces as an invalid parent
//!   reference, never as a raw store error.

use crate::model::country::{Country, CountryId};
use crate::model::EntityKind;
use crate::repo::{
    is_foreign_key_violation, is_unique_violation, provided_field, RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const COUNTRY_SELECT_SQL: &str = "SELECT
    country_id,
    country_code,
    name,
    continent_id,
    wikipedia_link,
    keywords
FROM country";

const INVALID_CONTINENT_REFERENCE: &str = "Please enter valid continent id";

/// Sparse filter for country searches.
///
/// Only non-empty fields participate in the query conjunction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryQuery {
    pub code: Option<String>,
    pub name: Option<String>,
}

/// Handler interface for country operations.
pub trait CountryRepository {
    /// Returns rows matching all provided filter fields by exact equality.
    fn search(&self, query: &CountryQuery) -> RepoResult<Vec<Country>>;
    /// Inserts a candidate row and returns it with the store-assigned id.
    fn create(&self, candidate: &Country) -> RepoResult<Country>;
    /// Fetches exactly one row by id.
    fn load(&self, id: CountryId) -> RepoResult<Country>;
    /// Overwrites the full row keyed by id and echoes the input back.
    fn save(&self, country: &Country) -> RepoResult<Country>;
}

/// SQLite-backed country repository.
pub struct SqliteCountryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCountryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn code_exists(&self, code: &str) -> RepoResult<bool> {
        let mut stmt = self
            .conn
            .prepare("SELECT 1 FROM country WHERE country_code = ?1;")?;
        Ok(stmt.exists(params![code])?)
    }

    fn find_by_natural_key(&self, code: &str, name: &str) -> RepoResult<Country> {
        let mut stmt = self.conn.prepare(&format!(
            "{COUNTRY_SELECT_SQL} WHERE country_code = ?1 AND name = ?2;"
        ))?;

        let mut rows = stmt.query(params![code, name])?;
        match rows.next()? {
            Some(row) => parse_country_row(row),
            None => Err(RepoError::InvalidData(format!(
                "inserted country `{code}` could not be read back"
            ))),
        }
    }
}

impl CountryRepository for SqliteCountryRepository<'_> {
    fn search(&self, query: &CountryQuery) -> RepoResult<Vec<Country>> {
        let mut conditions: Vec<&str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(code) = provided_field(&query.code) {
            conditions.push("country_code = ?");
            bind_values.push(Value::Text(code.to_string()));
        }
        if let Some(name) = provided_field(&query.name) {
            conditions.push("name = ?");
            bind_values.push(Value::Text(name.to_string()));
        }

        if conditions.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("{COUNTRY_SELECT_SQL} WHERE {};", conditions.join(" AND "));
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;

        let mut countries = Vec::new();
        while let Some(row) = rows.next()? {
            countries.push(parse_country_row(row)?);
        }

        Ok(countries)
    }

    fn create(&self, candidate: &Country) -> RepoResult<Country> {
        if !candidate.has_keywords() {
            return Err(RepoError::MissingKeyword {
                entity: EntityKind::Country,
            });
        }

        if self.code_exists(&candidate.code)? {
            return Err(RepoError::DuplicateCode {
                entity: EntityKind::Country,
                code: candidate.code.clone(),
            });
        }

        self.conn
            .execute(
                "INSERT INTO country (country_code, name, continent_id, wikipedia_link, keywords)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    candidate.code,
                    candidate.name,
                    candidate.continent_id,
                    candidate.wikipedia_link,
                    candidate.keywords,
                ],
            )
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    RepoError::InvalidReference {
                        entity: EntityKind::Country,
                        detail: INVALID_CONTINENT_REFERENCE.to_string(),
                    }
                } else {
                    RepoError::from(err)
                }
            })?;

        self.find_by_natural_key(&candidate.code, &candidate.name)
    }

    fn load(&self, id: CountryId) -> RepoResult<Country> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COUNTRY_SELECT_SQL} WHERE country_id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => parse_country_row(row),
            None => Err(RepoError::NotFound {
                entity: EntityKind::Country,
                id,
            }),
        }
    }

    fn save(&self, country: &Country) -> RepoResult<Country> {
        if !country.has_keywords() {
            return Err(RepoError::MissingKeyword {
                entity: EntityKind::Country,
            });
        }

        let id = country.id.ok_or_else(|| {
            RepoError::InvalidData("cannot save a country without an assigned id".to_string())
        })?;

        let changed = self
            .conn
            .execute(
                "UPDATE country
                 SET
                    country_code = ?1,
                    name = ?2,
                    continent_id = ?3,
                    wikipedia_link = ?4,
                    keywords = ?5
                 WHERE country_id = ?6;",
                params![
                    country.code,
                    country.name,
                    country.continent_id,
                    country.wikipedia_link,
                    country.keywords,
                    id,
                ],
            )
            .map_err(|err| classify_country_write_error(err, country))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Country,
                id,
            });
        }

        Ok(country.clone())
    }
}

fn classify_country_write_error(err: rusqlite::Error, country: &Country) -> RepoError {
    if is_unique_violation(&err) {
        RepoError::DuplicateCode {
            entity: EntityKind::Country,
            code: country.code.clone(),
        }
    } else if is_foreign_key_violation(&err) {
        RepoError::InvalidReference {
            entity: EntityKind::Country,
            detail: INVALID_CONTINENT_REFERENCE.to_string(),
        }
    } else {
        RepoError::from(err)
    }
}

fn parse_country_row(row: &Row<'_>) -> RepoResult<Country> {
    Ok(Country {
        id: Some(row.get("country_id")?),
        code: row.get("country_code")?,
        name: row.get("name")?,
        continent_id: row.get("continent_id")?,
        wikipedia_link: row.get("wikipedia_link")?,
        keywords: row.get("keywords")?,
    })
}
