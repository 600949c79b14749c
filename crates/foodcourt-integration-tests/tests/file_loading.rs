//! Loading solutions, levels and configuration from disk, then simulating
//! them exactly as if they had been built in memory.

mod common;

use common::*;
use foodcourt_core::engine::{SimConfig, Simulator};
use foodcourt_core::error::{SimError, TimeLimitCause};
use foodcourt_core::id::LevelId;
use foodcourt_data::catalog;
use foodcourt_data::loader::{self, DataLoadError};
use std::fs;
use std::path::{Path, PathBuf};

fn scratch_dir(suffix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "foodcourt_integration_{suffix}_{}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn cleanup(dir: &Path) {
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn solutions_directory_runs_against_the_catalog() {
    init_tracing();
    let dir = scratch_dir("solutions");
    fs::write(dir.join("a-cheesy.ron"), ron::to_string(&two_twelve(true)).unwrap()).unwrap();
    fs::write(dir.join("b-pocket.json"), serde_json::to_string(&hot_pocket(4)).unwrap()).unwrap();
    fs::write(dir.join("README.md"), "# solutions").unwrap();

    let config = loader::load_config_or_default(&dir).unwrap();
    let mut ticks = Vec::new();
    for (_, solution) in loader::load_solutions(&dir).unwrap() {
        let sim = Simulator::new(loader::level_for(&solution), config).unwrap();
        ticks.push((solution.level, sim.simulate_solution(&solution).unwrap().max_ticks));
    }
    assert_eq!(
        ticks,
        vec![(LevelId::TwoTwelve, TWO_TWELVE_TICKS), (LevelId::HotPocket, 12)]
    );

    cleanup(&dir);
}

#[test]
fn config_file_tightens_the_budget() {
    let dir = scratch_dir("config");
    fs::write(dir.join("config.toml"), "tick_limit = 5\n").unwrap();

    let config = loader::load_config_or_default(&dir).unwrap();
    assert_eq!(config.tick_limit, Some(5));

    let sim = Simulator::new(catalog::level(LevelId::TwoTwelve), config).unwrap();
    assert_eq!(
        sim.simulate_order(&two_twelve(true), 0),
        Err(SimError::TimeLimitExceeded {
            tick: 5,
            cause: TimeLimitCause::Budget { limit: 5 }
        })
    );

    cleanup(&dir);
}

#[test]
fn level_definitions_load_from_json() {
    let dir = scratch_dir("level");
    let path = dir.join("hot-pocket.json");
    let level = catalog::level(LevelId::HotPocket);
    fs::write(&path, serde_json::to_string_pretty(&level).unwrap()).unwrap();

    let loaded = loader::load_level(&path).unwrap();
    assert_eq!(loaded, level);
    let sim = Simulator::new(loaded, SimConfig::default()).unwrap();
    assert_eq!(sim.simulate_order(&hot_pocket(4), 0), Ok(12));

    cleanup(&dir);
}

#[test]
fn level_names_resolve_through_the_loader() {
    let level = loader::level_named("Original Hot Pocket Experience").unwrap();
    assert_eq!(level.id, LevelId::HotPocket);
    assert!(matches!(
        loader::level_named("Hot Dog Heaven"),
        Err(DataLoadError::UnknownLevel { .. })
    ));
}

#[test]
fn conflicting_config_files_are_an_error() {
    let dir = scratch_dir("conflict");
    fs::write(dir.join("config.toml"), "tick_limit = 5\n").unwrap();
    fs::write(dir.join("config.json"), r#"{"tick_limit": 5}"#).unwrap();

    assert!(matches!(
        loader::load_config_or_default(&dir),
        Err(DataLoadError::ConflictingFormats { .. })
    ));

    cleanup(&dir);
}
