use atlas_core::{
    Continent, ContinentQuery, Country, Engine, InboundEvent, OutboundEvent, Region, RegionQuery,
};
use std::path::PathBuf;
use tempfile::TempDir;

fn open_engine(dir: &TempDir, file_name: &str) -> (Engine, PathBuf) {
    let path = dir.path().join(file_name);
    let mut engine = Engine::new();
    let events = engine.process(InboundEvent::OpenDatabase(path.clone()));
    assert_eq!(events, vec![OutboundEvent::DatabaseOpened(path.clone())]);
    (engine, path)
}

fn saved_continent(events: Vec<OutboundEvent>) -> Continent {
    assert_eq!(events.len(), 1);
    match events.into_iter().next().unwrap() {
        OutboundEvent::ContinentSaved(continent) => continent,
        other => panic!("expected ContinentSaved, got {other:?}"),
    }
}

fn saved_country(events: Vec<OutboundEvent>) -> Country {
    assert_eq!(events.len(), 1);
    match events.into_iter().next().unwrap() {
        OutboundEvent::CountrySaved(country) => country,
        other => panic!("expected CountrySaved, got {other:?}"),
    }
}

fn saved_region(events: Vec<OutboundEvent>) -> Region {
    assert_eq!(events.len(), 1);
    match events.into_iter().next().unwrap() {
        OutboundEvent::RegionSaved(region) => region,
        other => panic!("expected RegionSaved, got {other:?}"),
    }
}

#[test]
fn open_rejects_paths_without_db_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("records.txt");

    let mut engine = Engine::new();
    let events = engine.process(InboundEvent::OpenDatabase(path.clone()));

    assert_eq!(events.len(), 1);
    match &events[0] {
        OutboundEvent::DatabaseOpenFailed(reason) => {
            assert!(reason.contains("not a database file"));
        }
        other => panic!("expected DatabaseOpenFailed, got {other:?}"),
    }
    assert!(!engine.is_connected());
    assert!(!path.exists(), "rejected open must not create the file");
}

#[test]
fn open_rejects_files_that_are_not_sqlite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fake.db");
    std::fs::write(&path, "plain text, not a database").unwrap();

    let mut engine = Engine::new();
    let events = engine.process(InboundEvent::OpenDatabase(path));

    assert!(matches!(
        events.as_slice(),
        [OutboundEvent::DatabaseOpenFailed(_)]
    ));
    assert!(!engine.is_connected());
}

#[test]
fn open_close_quit_lifecycle() {
    let dir = TempDir::new().unwrap();
    let (mut engine, _path) = open_engine(&dir, "atlas.db");
    assert!(engine.is_connected());

    assert_eq!(
        engine.process(InboundEvent::CloseDatabase),
        vec![OutboundEvent::DatabaseClosed]
    );
    assert!(!engine.is_connected());

    assert_eq!(
        engine.process(InboundEvent::Quit),
        vec![OutboundEvent::ApplicationEnded]
    );
}

#[test]
fn close_is_unconditional_even_when_disconnected() {
    let mut engine = Engine::new();
    assert_eq!(
        engine.process(InboundEvent::CloseDatabase),
        vec![OutboundEvent::DatabaseClosed]
    );
}

#[test]
fn disconnected_entity_requests_report_store_unavailable() {
    let mut engine = Engine::new();

    let events = engine.process(InboundEvent::CreateContinent(Continent::new("AF", "Africa")));
    assert_eq!(
        events,
        vec![OutboundEvent::ContinentSaveFailed(
            "No database is open".to_string()
        )]
    );

    let events = engine.process(InboundEvent::LoadContinent(1));
    assert_eq!(
        events,
        vec![OutboundEvent::ContinentLoadFailed(
            "No database is open".to_string()
        )]
    );

    // Search has no failure variant and yields nothing.
    let events = engine.process(InboundEvent::SearchContinents(ContinentQuery {
        code: Some("AF".to_string()),
        ..ContinentQuery::default()
    }));
    assert!(events.is_empty());
}

#[test]
fn continent_lifecycle_end_to_end() {
    let dir = TempDir::new().unwrap();
    let (mut engine, _path) = open_engine(&dir, "atlas.db");

    let created = saved_continent(engine.process(InboundEvent::CreateContinent(Continent::new(
        "AF", "Africa",
    ))));
    let id = created.id.expect("store should assign an id");

    let events = engine.process(InboundEvent::LoadContinent(id));
    assert_eq!(events, vec![OutboundEvent::ContinentLoaded(created)]);

    let events = engine.process(InboundEvent::CreateContinent(Continent::new(
        "AF",
        "Africa Again",
    )));
    assert_eq!(
        events,
        vec![OutboundEvent::ContinentSaveFailed(
            "Continent Code already exists".to_string()
        )]
    );
}

#[test]
fn search_emits_one_event_per_match_in_row_order() {
    let dir = TempDir::new().unwrap();
    let (mut engine, _path) = open_engine(&dir, "atlas.db");

    saved_continent(engine.process(InboundEvent::CreateContinent(Continent::new("AF", "Africa"))));
    saved_continent(engine.process(InboundEvent::CreateContinent(Continent::new("AF2", "Africa"))));

    let events = engine.process(InboundEvent::SearchContinents(ContinentQuery {
        name: Some("Africa".to_string()),
        ..ContinentQuery::default()
    }));

    let codes: Vec<_> = events
        .iter()
        .map(|event| match event {
            OutboundEvent::ContinentFound(continent) => continent.code.clone(),
            other => panic!("expected ContinentFound, got {other:?}"),
        })
        .collect();
    assert_eq!(codes, vec!["AF".to_string(), "AF2".to_string()]);
}

#[test]
fn search_with_no_filter_fields_yields_no_events() {
    let dir = TempDir::new().unwrap();
    let (mut engine, _path) = open_engine(&dir, "atlas.db");

    saved_continent(engine.process(InboundEvent::CreateContinent(Continent::new("AF", "Africa"))));

    let events = engine.process(InboundEvent::SearchContinents(ContinentQuery::default()));
    assert!(events.is_empty());
}

#[test]
fn load_of_missing_row_reports_not_found() {
    let dir = TempDir::new().unwrap();
    let (mut engine, _path) = open_engine(&dir, "atlas.db");

    let events = engine.process(InboundEvent::LoadContinent(404));
    assert_eq!(
        events,
        vec![OutboundEvent::ContinentLoadFailed(
            "Continent with id 404 was not found".to_string()
        )]
    );
}

#[test]
fn country_create_with_bad_parent_reports_invalid_reference() {
    let dir = TempDir::new().unwrap();
    let (mut engine, _path) = open_engine(&dir, "atlas.db");

    let mut candidate = Country::new("KE", "Kenya", 9999);
    candidate.keywords = Some("kenya".to_string());
    let events = engine.process(InboundEvent::CreateCountry(candidate));

    assert_eq!(
        events,
        vec![OutboundEvent::CountrySaveFailed(
            "Please enter valid continent id".to_string()
        )]
    );
}

#[test]
fn region_search_by_local_code_end_to_end() {
    let dir = TempDir::new().unwrap();
    let (mut engine, _path) = open_engine(&dir, "atlas.db");

    let continent = saved_continent(engine.process(InboundEvent::CreateContinent(
        Continent::new("AF", "Africa"),
    )));

    let mut country = Country::new("KE", "Kenya", continent.id.unwrap());
    country.keywords = Some("kenya".to_string());
    let country = saved_country(engine.process(InboundEvent::CreateCountry(country)));

    for (code, local_code, name) in [
        ("KE-110", "110", "Nairobi"),
        ("KE-200", "110", "Central"),
        ("KE-300", "300", "Coast"),
    ] {
        let mut region = Region::new(
            code,
            local_code,
            name,
            continent.id.unwrap(),
            country.id.unwrap(),
        );
        region.keywords = Some("county".to_string());
        saved_region(engine.process(InboundEvent::CreateRegion(region)));
    }

    let events = engine.process(InboundEvent::SearchRegions(RegionQuery {
        local_code: Some("110".to_string()),
        ..RegionQuery::default()
    }));

    assert_eq!(events.len(), 2);
    for event in &events {
        match event {
            OutboundEvent::RegionFound(region) => assert_eq!(region.local_code, "110"),
            other => panic!("expected RegionFound, got {other:?}"),
        }
    }
}

#[test]
fn requests_after_close_report_store_unavailable() {
    let dir = TempDir::new().unwrap();
    let (mut engine, _path) = open_engine(&dir, "atlas.db");

    engine.process(InboundEvent::CloseDatabase);

    let events = engine.process(InboundEvent::CreateContinent(Continent::new("AF", "Africa")));
    assert_eq!(
        events,
        vec![OutboundEvent::ContinentSaveFailed(
            "No database is open".to_string()
        )]
    );
}

#[test]
fn reopening_the_same_file_sees_prior_rows() {
    let dir = TempDir::new().unwrap();
    let (mut engine, path) = open_engine(&dir, "atlas.db");

    let created = saved_continent(engine.process(InboundEvent::CreateContinent(Continent::new(
        "AF", "Africa",
    ))));
    engine.process(InboundEvent::CloseDatabase);

    let events = engine.process(InboundEvent::OpenDatabase(path.clone()));
    assert_eq!(events, vec![OutboundEvent::DatabaseOpened(path)]);

    let events = engine.process(InboundEvent::LoadContinent(created.id.unwrap()));
    assert_eq!(events, vec![OutboundEvent::ContinentLoaded(created)]);
}
