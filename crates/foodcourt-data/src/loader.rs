//! File loading for solutions, puzzle definitions and engine configuration.
//!
//! Every loader detects the format (RON/JSON/TOML) from the file extension and
//! deserializes straight into the core model types.

use crate::catalog;
use foodcourt_core::engine::SimConfig;
use foodcourt_core::level::Level;
use foodcourt_core::solution::Solution;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found.
    #[error("required file '{}' not found", file.display())]
    MissingFile { file: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {}", file.display())]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {} and {}", a.display(), b.display())]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {}: {detail}", file.display())]
    Parse { file: PathBuf, detail: String },

    /// A level name that is not part of the catalog.
    #[error("unknown level '{name}'")]
    UnknownLevel { name: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

impl Format {
    pub const EXTENSIONS: [&'static str; 3] = ["ron", "toml", "json"];
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in Format::EXTENSIONS {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingFile {
        file: dir.join(base_name),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    if !path.exists() {
        return Err(DataLoadError::MissingFile {
            file: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    deserialize_str(format, &content).map_err(|detail| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    })
}

/// Deserialize in-memory text in the given format.
pub fn deserialize_str<T: DeserializeOwned>(format: Format, content: &str) -> Result<T, String> {
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| e.to_string()),
        Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
    }
}

// ===========================================================================
// Typed loaders
// ===========================================================================

pub fn load_solution(path: &Path) -> Result<Solution, DataLoadError> {
    let solution: Solution = deserialize_file(path)?;
    debug!(
        path = %path.display(),
        level = solution.level.name(),
        modules = solution.modules.len(),
        wires = solution.wires.len(),
        "loaded solution"
    );
    Ok(solution)
}

/// Load every solution file in a directory, sorted by path. Files with an
/// unsupported extension are skipped.
pub fn load_solutions(dir: &Path) -> Result<Vec<(PathBuf, Solution)>, DataLoadError> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && detect_format(&path).is_ok() {
            paths.push(path);
        }
    }
    paths.sort();

    paths
        .into_iter()
        .map(|path| load_solution(&path).map(|solution| (path, solution)))
        .collect()
}

/// Load a full puzzle definition.
pub fn load_level(path: &Path) -> Result<Level, DataLoadError> {
    let level: Level = deserialize_file(path)?;
    debug!(path = %path.display(), level = level.name(), orders = level.orders.len(), "loaded level");
    Ok(level)
}

pub fn load_config(path: &Path) -> Result<SimConfig, DataLoadError> {
    deserialize_file(path)
}

/// Load `config.{ron,toml,json}` from `dir`, falling back to the default
/// configuration when none exists.
pub fn load_config_or_default(dir: &Path) -> Result<SimConfig, DataLoadError> {
    match find_data_file(dir, "config")? {
        Some(path) => load_config(&path),
        None => Ok(SimConfig::default()),
    }
}

/// Resolve a catalog level by display name, slug or in-game number.
pub fn level_named(name: &str) -> Result<Level, DataLoadError> {
    let trimmed = name.trim();
    let by_number = trimmed.parse::<u32>().ok().and_then(catalog::by_number);
    by_number
        .or_else(|| catalog::by_name(trimmed))
        .ok_or_else(|| DataLoadError::UnknownLevel {
            name: trimmed.to_string(),
        })
}

/// The catalog level a solution was built for.
pub fn level_for(solution: &Solution) -> Level {
    catalog::level(solution.level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodcourt_core::id::LevelId;
    use foodcourt_core::test_utils::{two_twelve_level, two_twelve_solution};
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "foodcourt_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    // -----------------------------------------------------------------------
    // detect_format / discovery
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("cheesy.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("cheesy.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("cheesy.json")).unwrap(), Format::Json);
    }

    #[test]
    fn detect_format_unsupported() {
        for name in ["cheesy.solution", "cheesy"] {
            assert!(matches!(
                detect_format(Path::new(name)),
                Err(DataLoadError::UnsupportedFormat { .. })
            ));
        }
    }

    #[test]
    fn find_data_file_conflict() {
        let dir = make_test_dir("conflict");
        fs::write(dir.join("config.ron"), "()").unwrap();
        fs::write(dir.join("config.json"), "{}").unwrap();

        let result = find_data_file(&dir, "config");
        assert!(matches!(result, Err(DataLoadError::ConflictingFormats { .. })));

        cleanup(&dir);
    }

    #[test]
    fn require_data_file_missing() {
        let dir = make_test_dir("require_missing");
        let err = require_data_file(&dir, "solution").unwrap_err();
        match err {
            DataLoadError::MissingFile { file } => assert_eq!(file, dir.join("solution")),
            other => panic!("expected MissingFile, got {other:?}"),
        }
        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // Typed loaders
    // -----------------------------------------------------------------------

    #[test]
    fn load_config_from_each_format() {
        let dir = make_test_dir("config_formats");
        let ron_path = dir.join("a.ron");
        let json_path = dir.join("b.json");
        let toml_path = dir.join("c.toml");
        fs::write(&ron_path, "(tick_limit: Some(40), history_capacity: 10)").unwrap();
        fs::write(&json_path, r#"{"tick_limit": 40, "history_capacity": 10}"#).unwrap();
        fs::write(&toml_path, "tick_limit = 40\nhistory_capacity = 10\n").unwrap();

        for path in [ron_path, json_path, toml_path] {
            let config = load_config(&path).unwrap();
            assert_eq!(config.tick_limit, Some(40));
            assert_eq!(config.history_capacity, 10);
        }

        cleanup(&dir);
    }

    #[test]
    fn missing_config_fields_take_defaults() {
        let dir = make_test_dir("config_defaults");
        let path = dir.join("config.toml");
        fs::write(&path, "tick_limit = 12\n").unwrap();

        let config = load_config_or_default(&dir).unwrap();
        assert_eq!(config.tick_limit, Some(12));
        assert_eq!(config.history_capacity, SimConfig::default().history_capacity);

        cleanup(&dir);
    }

    #[test]
    fn absent_config_is_default() {
        let dir = make_test_dir("config_absent");
        assert_eq!(load_config_or_default(&dir).unwrap(), SimConfig::default());
        cleanup(&dir);
    }

    #[test]
    fn solution_survives_ron_and_json() {
        let dir = make_test_dir("solution_formats");
        let solution = two_twelve_solution(true);
        fs::write(dir.join("cheesy.ron"), ron::to_string(&solution).unwrap()).unwrap();
        fs::write(dir.join("cheesy.json"), serde_json::to_string(&solution).unwrap()).unwrap();

        assert_eq!(load_solution(&dir.join("cheesy.ron")).unwrap(), solution);
        assert_eq!(load_solution(&dir.join("cheesy.json")).unwrap(), solution);

        cleanup(&dir);
    }

    #[test]
    fn load_solutions_sorts_and_skips_foreign_files() {
        let dir = make_test_dir("solution_dir");
        let mut second = two_twelve_solution(false);
        second.name = "bare".to_string();
        fs::write(dir.join("b.json"), serde_json::to_string(&second).unwrap()).unwrap();
        fs::write(dir.join("a.json"), serde_json::to_string(&two_twelve_solution(true)).unwrap()).unwrap();
        fs::write(dir.join("notes.txt"), "not a solution").unwrap();

        let loaded = load_solutions(&dir).unwrap();
        let names: Vec<&str> = loaded.iter().map(|(_, s)| s.name.as_str()).collect();
        assert_eq!(names, ["cheesy", "bare"]);

        cleanup(&dir);
    }

    #[test]
    fn parse_error_names_the_file() {
        let dir = make_test_dir("parse_error");
        let path = dir.join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        match load_solution(&path).unwrap_err() {
            DataLoadError::Parse { file, .. } => assert_eq!(file, path),
            other => panic!("expected Parse, got {other:?}"),
        }

        cleanup(&dir);
    }

    #[test]
    fn missing_solution_file() {
        let dir = make_test_dir("missing_solution");
        assert!(matches!(
            load_solution(&dir.join("nope.ron")),
            Err(DataLoadError::MissingFile { .. })
        ));
        cleanup(&dir);
    }

    #[test]
    fn level_file_round_trips_through_json() {
        let dir = make_test_dir("level_json");
        let level = two_twelve_level();
        let path = dir.join("level.json");
        fs::write(&path, serde_json::to_string_pretty(&level).unwrap()).unwrap();

        assert_eq!(load_level(&path).unwrap(), level);

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // Catalog lookup
    // -----------------------------------------------------------------------

    #[test]
    fn level_named_accepts_names_slugs_and_numbers() {
        assert_eq!(level_named("Sweet Heat BBQ").unwrap().id, LevelId::SweetHeatBbq);
        assert_eq!(level_named("rosies-doughnuts").unwrap().id, LevelId::RosiesDoughnuts);
        assert_eq!(level_named("21").unwrap().id, LevelId::SushiYeah);
        assert!(matches!(
            level_named("Taco Tuesday"),
            Err(DataLoadError::UnknownLevel { .. })
        ));
    }

    #[test]
    fn level_for_uses_the_solution_level() {
        let solution = two_twelve_solution(true);
        assert_eq!(level_for(&solution).id, LevelId::TwoTwelve);
    }
}
