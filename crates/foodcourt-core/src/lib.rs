//! Food Court Core -- the tick simulator for grid food-factory puzzles.
//!
//! A solution places machines on a floor grid and a rack grid and wires their
//! boolean jacks together. For each order of a level the engine runs the
//! factory tick by tick until the requested product leaves through the output,
//! a machine raises an emergency stop, or the state repeats.
//!
//! # Tick Pipeline
//!
//! Each call to [`engine::Simulation::step`] advances one tick:
//!
//! 1. **Act** -- Modules read latched inputs, act on the floor and propose moves.
//! 2. **Resolve** -- [`resolver::resolve`] commits all moves as one batch,
//!    ordering cells by strongly connected components so rings move atomically.
//! 3. **Sense** -- Modules write outputs from the settled floor.
//! 4. **Latch** -- [`signal::SignalNetwork::latch`] makes next signals current.
//! 5. **Bookkeeping** -- Completion check, loop detection and the tick budget.
//!
//! # Usage
//!
//! ```rust,ignore
//! let simulator = Simulator::new(level, SimConfig::default())?;
//! let report = simulator.simulate_solution(&solution)?;
//! println!("{} ticks, cost {}", report.max_ticks, report.cost);
//! ```
//!
//! # Key Types
//!
//! - [`engine::Simulator`] -- Validates solutions and runs orders.
//! - [`entity::Entity`] -- Owned product value trees with structural equality.
//! - [`machine::Machine`] -- Per-kind machine state and behavior.
//! - [`registry::ModuleRegistry`] -- Frozen table of every module kind.
//! - [`error::SimError`] -- Stop, time-limit and internal failures with ticks
//!   and positions.

pub mod engine;
pub mod entity;
pub mod error;
pub mod floor;
pub mod grid;
pub mod history;
pub mod id;
pub mod level;
pub mod machine;
pub mod module;
pub mod operation;
pub mod registry;
pub mod resolver;
pub mod signal;
pub mod solution;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use engine::{SimConfig, Simulation, Simulator, SolutionReport, Step};
pub use error::{SimError, StopReason, ValidationError};
