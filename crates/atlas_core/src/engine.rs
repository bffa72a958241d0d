//! Event-processing engine bridging the interface layer and the store.
//!
//! # Responsibility
//! - Own the store connection lifecycle (open/close).
//! - Dispatch each inbound event to its handler and translate the outcome
//!   into the matching outbound events.
//!
//! # Invariants
//! - One inbound event is processed to completion, including all store
//!   round-trips, before the next one is accepted.
//! - A fresh repository borrows the connection per operation; no handle is
//!   reused across requests.
//! - Store-level failures surface as failure events, never as panics.

use crate::db;
use crate::events::{InboundEvent, OutboundEvent};
use crate::model::continent::{Continent, ContinentId};
use crate::model::country::{Country, CountryId};
use crate::model::region::{Region, RegionId};
use crate::repo::continent_repo::{ContinentQuery, ContinentRepository, SqliteContinentRepository};
use crate::repo::country_repo::{CountryQuery, CountryRepository, SqliteCountryRepository};
use crate::repo::region_repo::{RegionQuery, RegionRepository, SqliteRegionRepository};
use crate::repo::{RepoError, RepoResult};
use log::{error, info, warn};
use rusqlite::Connection;
use std::path::PathBuf;

/// Synchronous event processor over a single optional store connection.
///
/// The engine is *disconnected* until an open request succeeds and returns
/// to that state on close. Entity requests made while disconnected report
/// the store-unavailable reason through their failure events; searches,
/// which have no failure variant, yield no events.
#[derive(Default)]
pub struct Engine {
    conn: Option<Connection>,
}

impl Engine {
    /// Creates a disconnected engine.
    pub fn new() -> Self {
        Self { conn: None }
    }

    /// Whether a store connection is currently held.
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Processes one inbound event and returns the full ordered burst of
    /// outbound events it produced.
    pub fn process(&mut self, event: InboundEvent) -> Vec<OutboundEvent> {
        match event {
            InboundEvent::OpenDatabase(path) => self.open_database(path),
            InboundEvent::CloseDatabase => self.close_database(),
            InboundEvent::Quit => {
                info!("event=quit module=engine status=ok");
                vec![OutboundEvent::ApplicationEnded]
            }

            InboundEvent::SearchContinents(query) => self.search_continents(&query),
            InboundEvent::CreateContinent(candidate) => self.create_continent(&candidate),
            InboundEvent::LoadContinent(id) => self.load_continent(id),
            InboundEvent::SaveContinent(continent) => self.save_continent(&continent),

            InboundEvent::SearchCountries(query) => self.search_countries(&query),
            InboundEvent::CreateCountry(candidate) => self.create_country(&candidate),
            InboundEvent::LoadCountry(id) => self.load_country(id),
            InboundEvent::SaveCountry(country) => self.save_country(&country),

            InboundEvent::SearchRegions(query) => self.search_regions(&query),
            InboundEvent::CreateRegion(candidate) => self.create_region(&candidate),
            InboundEvent::LoadRegion(id) => self.load_region(id),
            InboundEvent::SaveRegion(region) => self.save_region(&region),
        }
    }

    fn open_database(&mut self, path: PathBuf) -> Vec<OutboundEvent> {
        match db::open_db(&path) {
            Ok(conn) => {
                self.conn = Some(conn);
                info!(
                    "event=engine_open module=engine status=ok path={}",
                    path.display()
                );
                vec![OutboundEvent::DatabaseOpened(path)]
            }
            Err(err) => {
                warn!(
                    "event=engine_open module=engine status=error path={} reason={err}",
                    path.display()
                );
                vec![OutboundEvent::DatabaseOpenFailed(err.to_string())]
            }
        }
    }

    fn close_database(&mut self) -> Vec<OutboundEvent> {
        self.conn = None;
        info!("event=engine_close module=engine status=ok");
        vec![OutboundEvent::DatabaseClosed]
    }

    fn connection(&self) -> RepoResult<&Connection> {
        self.conn.as_ref().ok_or(RepoError::StoreUnavailable)
    }

    fn search_continents(&self, query: &ContinentQuery) -> Vec<OutboundEvent> {
        let outcome = self
            .connection()
            .and_then(|conn| SqliteContinentRepository::new(conn).search(query));
        search_events(outcome, "continent", OutboundEvent::ContinentFound)
    }

    fn create_continent(&self, candidate: &Continent) -> Vec<OutboundEvent> {
        let outcome = self
            .connection()
            .and_then(|conn| SqliteContinentRepository::new(conn).create(candidate));
        outcome_events(
            outcome,
            "continent",
            "create",
            OutboundEvent::ContinentSaved,
            OutboundEvent::ContinentSaveFailed,
        )
    }

    fn load_continent(&self, id: ContinentId) -> Vec<OutboundEvent> {
        let outcome = self
            .connection()
            .and_then(|conn| SqliteContinentRepository::new(conn).load(id));
        outcome_events(
            outcome,
            "continent",
            "load",
            OutboundEvent::ContinentLoaded,
            OutboundEvent::ContinentLoadFailed,
        )
    }

    fn save_continent(&self, continent: &Continent) -> Vec<OutboundEvent> {
        let outcome = self
            .connection()
            .and_then(|conn| SqliteContinentRepository::new(conn).save(continent));
        outcome_events(
            outcome,
            "continent",
            "save",
            OutboundEvent::ContinentSaved,
            OutboundEvent::ContinentSaveFailed,
        )
    }

    fn search_countries(&self, query: &CountryQuery) -> Vec<OutboundEvent> {
        let outcome = self
            .connection()
            .and_then(|conn| SqliteCountryRepository::new(conn).search(query));
        search_events(outcome, "country", OutboundEvent::CountryFound)
    }

    fn create_country(&self, candidate: &Country) -> Vec<OutboundEvent> {
        let outcome = self
            .connection()
            .and_then(|conn| SqliteCountryRepository::new(conn).create(candidate));
        outcome_events(
            outcome,
            "country",
            "create",
            OutboundEvent::CountrySaved,
            OutboundEvent::CountrySaveFailed,
        )
    }

    fn load_country(&self, id: CountryId) -> Vec<OutboundEvent> {
        let outcome = self
            .connection()
            .and_then(|conn| SqliteCountryRepository::new(conn).load(id));
        outcome_events(
            outcome,
            "country",
            "load",
            OutboundEvent::CountryLoaded,
            OutboundEvent::CountryLoadFailed,
        )
    }

    fn save_country(&self, country: &Country) -> Vec<OutboundEvent> {
        let outcome = self
            .connection()
            .and_then(|conn| SqliteCountryRepository::new(conn).save(country));
        outcome_events(
            outcome,
            "country",
            "save",
            OutboundEvent::CountrySaved,
            OutboundEvent::CountrySaveFailed,
        )
    }

    fn search_regions(&self, query: &RegionQuery) -> Vec<OutboundEvent> {
        let outcome = self
            .connection()
            .and_then(|conn| SqliteRegionRepository::new(conn).search(query));
        search_events(outcome, "region", OutboundEvent::RegionFound)
    }

    fn create_region(&self, candidate: &Region) -> Vec<OutboundEvent> {
        let outcome = self
            .connection()
            .and_then(|conn| SqliteRegionRepository::new(conn).create(candidate));
        outcome_events(
            outcome,
            "region",
            "create",
            OutboundEvent::RegionSaved,
            OutboundEvent::RegionSaveFailed,
        )
    }

    fn load_region(&self, id: RegionId) -> Vec<OutboundEvent> {
        let outcome = self
            .connection()
            .and_then(|conn| SqliteRegionRepository::new(conn).load(id));
        outcome_events(
            outcome,
            "region",
            "load",
            OutboundEvent::RegionLoaded,
            OutboundEvent::RegionLoadFailed,
        )
    }

    fn save_region(&self, region: &Region) -> Vec<OutboundEvent> {
        let outcome = self
            .connection()
            .and_then(|conn| SqliteRegionRepository::new(conn).save(region));
        outcome_events(
            outcome,
            "region",
            "save",
            OutboundEvent::RegionSaved,
            OutboundEvent::RegionSaveFailed,
        )
    }
}

/// Maps a search outcome onto zero or more per-row events.
///
/// Search has no failure variant: a disconnected engine or a store error
/// yields no events, with the error kept in the log.
fn search_events<T>(
    outcome: RepoResult<Vec<T>>,
    entity: &str,
    found: impl Fn(T) -> OutboundEvent,
) -> Vec<OutboundEvent> {
    match outcome {
        Ok(matches) => matches.into_iter().map(found).collect(),
        Err(err) => {
            error!("event=entity_search module=engine entity={entity} status=error reason={err}");
            Vec::new()
        }
    }
}

/// Maps a create/load/save outcome onto exactly one outcome event.
fn outcome_events<T>(
    outcome: RepoResult<T>,
    entity: &str,
    op: &str,
    success: impl FnOnce(T) -> OutboundEvent,
    failure: impl FnOnce(String) -> OutboundEvent,
) -> Vec<OutboundEvent> {
    match outcome {
        Ok(record) => vec![success(record)],
        Err(err) => {
            warn!(
                "event=entity_{op} module=engine entity={entity} status=rejected reason={err}"
            );
            vec![failure(err.to_string())]
        }
    }
}
