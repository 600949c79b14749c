//! Food Court Data -- the reference puzzle catalog and file loading.
//!
//! [`catalog`] builds the 21 reference levels the engine simulates against.
//! [`loader`] reads solutions, level definitions and engine configuration
//! from RON, JSON or TOML files, picking the format from the extension.

pub mod catalog;
pub mod loader;

pub use loader::{
    DataLoadError, Format, load_config, load_config_or_default, load_level, load_solution,
    load_solutions, level_named,
};
