//! Error taxonomy.
//!
//! Module behaviors and the resolver produce a tick-less [`Fault`]; the engine
//! stamps it with the current tick and turns it into a [`SimError`]. Problems
//! found before the first tick are [`ValidationError`]s.

use crate::grid::Position;
use crate::id::{JackRef, LevelId, ModuleIndex, ModuleKind};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Emergency stops
// ---------------------------------------------------------------------------

/// Why a solution's own behavior halted the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum StopReason {
    #[error("These products have collided.")]
    Collision,
    #[error("Products cannot leave the factory.")]
    LeftFactory,
    #[error("This machine has too many active inputs.")]
    TooManyActiveInputs,
    #[error("This product cannot be sliced.")]
    CannotSlice,
    #[error("These products cannot be stacked.")]
    CannotStack,
    #[error("This product cannot be rolled.")]
    CannotRoll,
    #[error("This product cannot be rotated.")]
    CannotRotate,
    #[error("This product cannot be painted.")]
    CannotPaint,
    #[error("This is not the product the customer ordered.")]
    WrongProduct,
    #[error("This waste bin has already been used.")]
    WasteBinFull,
    #[error("This cup is already full.")]
    CupFull,
    #[error("This product already has that sauce.")]
    DuplicateSauce,
    #[error("There are no coffee grounds to extract.")]
    NoGrounds,
    #[error("There is no milk to steam.")]
    NoMilk,
    #[error("This machine needs a cup.")]
    NotACup,
}

/// An emergency stop with the offending cell(s).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stop {
    pub reason: StopReason,
    pub positions: Vec<Position>,
}

impl Stop {
    pub fn new(reason: StopReason, positions: impl IntoIterator<Item = Position>) -> Self {
        Self {
            reason,
            positions: positions.into_iter().collect(),
        }
    }

    pub fn at(reason: StopReason, position: Position) -> Self {
        Self::new(reason, [position])
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)?;
        if !self.positions.is_empty() {
            let cells: Vec<String> = self.positions.iter().map(|p| p.to_string()).collect();
            write!(f, " at {}", cells.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for Stop {}

// ---------------------------------------------------------------------------
// Faults (tick-less)
// ---------------------------------------------------------------------------

/// Failure raised inside a tick, before the engine attaches the tick number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Fault {
    #[error("emergency stop: {0}")]
    Stop(Stop),
    /// An engine invariant broke; never the solution's fault.
    #[error("internal error: {message}")]
    Internal {
        message: String,
        positions: Vec<Position>,
    },
}

impl Fault {
    pub fn stop(reason: StopReason, position: Position) -> Self {
        Fault::Stop(Stop::at(reason, position))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Fault::Internal {
            message: message.into(),
            positions: Vec::new(),
        }
    }

    pub fn internal_at(message: impl Into<String>, positions: impl IntoIterator<Item = Position>) -> Self {
        Fault::Internal {
            message: message.into(),
            positions: positions.into_iter().collect(),
        }
    }
}

impl From<Stop> for Fault {
    fn from(stop: Stop) -> Self {
        Fault::Stop(stop)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A solution that is structurally illegal for its level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("module {index} ({kind}) is out of bounds on the {surface} at {position}")]
    OutOfBounds {
        index: ModuleIndex,
        kind: ModuleKind,
        surface: Surface,
        position: Position,
    },
    #[error("modules overlap on the {surface} at {position}")]
    Overlap { surface: Surface, position: Position },
    #[error("dispenser {index} sits over a {below} at {position}")]
    DispenserOverMachine {
        index: ModuleIndex,
        below: ModuleKind,
        position: Position,
    },
    #[error("expected exactly one {kind}, found {count}")]
    WrongModuleCount { kind: &'static str, count: usize },
    #[error("module {index} ({kind}) belongs to level {other}, not {level}")]
    WrongLevel {
        index: ModuleIndex,
        kind: ModuleKind,
        level: LevelId,
        other: LevelId,
    },
    #[error("module {index} ({kind}) has invalid configuration: {reason}")]
    BadConfig {
        index: ModuleIndex,
        kind: ModuleKind,
        reason: String,
    },
    #[error("wire references missing jack {0:?}")]
    MissingJack(JackRef),
    #[error("wire {0:?} - {1:?} connects two jacks of the same direction")]
    SameDirection(JackRef, JackRef),
    #[error("jack {0:?} has more than one wire")]
    JackReused(JackRef),
    #[error("too many {kind} modules: {count} (limit {limit})")]
    ModuleLimit {
        kind: ModuleKind,
        count: usize,
        limit: usize,
    },
    #[error("level has no order {0}")]
    NoSuchOrder(usize),
}

/// Which grid a position refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Surface {
    Floor,
    Rack,
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::Floor => f.write_str("floor"),
            Surface::Rack => f.write_str("rack"),
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("module kind {0} registered twice")]
    Duplicate(ModuleKind),
    #[error("module kind {0} has no registration")]
    Missing(ModuleKind),
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Why the simulation ran out of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeLimitCause {
    /// The tick budget was exhausted.
    Budget { limit: u64 },
    /// The state after `tick` repeated immediately.
    Deadlock { tick: u64 },
    /// The state after `start` recurred after `end`.
    Loop { start: u64, end: u64 },
}

impl fmt::Display for TimeLimitCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeLimitCause::Budget { limit } => write!(f, "tick budget of {limit} exceeded"),
            TimeLimitCause::Deadlock { tick } => write!(f, "deadlock after tick {tick}"),
            TimeLimitCause::Loop { start, end } => write!(f, "loop from tick {start} to tick {end}"),
        }
    }
}

/// Outcome of a failed order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error("invalid solution: {0}")]
    Invalid(#[from] ValidationError),
    #[error("emergency stop on tick {tick}: {stop}")]
    EmergencyStop { tick: u64, stop: Stop },
    #[error("time limit exceeded on tick {tick}: {cause}")]
    TimeLimitExceeded { tick: u64, cause: TimeLimitCause },
    #[error("internal engine error on tick {tick}: {message}")]
    Internal {
        tick: u64,
        message: String,
        positions: Vec<Position>,
    },
}

impl SimError {
    /// Attach a tick to a fault.
    pub fn from_fault(tick: u64, fault: Fault) -> Self {
        match fault {
            Fault::Stop(stop) => SimError::EmergencyStop { tick, stop },
            Fault::Internal { message, positions } => SimError::Internal {
                tick,
                message,
                positions,
            },
        }
    }

    /// The stop, if this is an emergency stop.
    pub fn stop(&self) -> Option<&Stop> {
        match self {
            SimError::EmergencyStop { stop, .. } => Some(stop),
            _ => None,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, SimError::Internal { .. })
    }
}
