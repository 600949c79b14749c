//! Placed module instances and the contexts they run in.
//!
//! A [`Module`] is one machine from a solution, copied fresh for every order.
//! The engine calls [`Module::tick`] on every module with a [`TickContext`],
//! resolves the proposed moves, then calls [`Module::update_signals`] with a
//! read-only view of the settled floor through a [`SenseContext`].

use crate::error::{Fault, StopReason};
use crate::floor::Floor;
use crate::grid::{Direction, Position};
use crate::id::{ModuleIndex, ModuleKind};
use crate::level::{Level, Order};
use crate::machine::Machine;
use crate::resolver::{Move, Resolution};
use crate::signal::SignalNetwork;
use std::ops::Range;

// ---------------------------------------------------------------------------
// Contexts
// ---------------------------------------------------------------------------

/// Mutable state handed to modules while they act.
pub struct TickContext<'a> {
    /// The tick being simulated, starting from 1.
    pub tick: u64,
    pub level: &'a Level,
    pub order: &'a Order,
    /// Products may be mutated in place, removed, or replaced.
    pub floor: &'a mut Floor,
    pub signals: &'a mut SignalNetwork,
    /// Proposed moves, resolved after every module has acted.
    pub moves: &'a mut Vec<Move>,
}

/// State handed to modules while they sense the settled floor.
pub struct SenseContext<'a> {
    /// 0 for the priming pass before the first tick.
    pub tick: u64,
    pub order: &'a Order,
    pub floor: &'a Floor,
    pub signals: &'a mut SignalNetwork,
    pub resolution: &'a Resolution,
}

// ---------------------------------------------------------------------------
// Site
// ---------------------------------------------------------------------------

/// Where a module sits and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Site {
    pub index: ModuleIndex,
    pub floor: Position,
    pub direction: Direction,
}

impl Site {
    /// The floor cell this module faces.
    pub fn front(self) -> Position {
        self.floor.shifted(self.direction)
    }

    pub fn read(self, signals: &SignalNetwork, jack: usize) -> Result<bool, Fault> {
        signals.read(self.index, jack)
    }

    pub fn write(self, signals: &mut SignalNetwork, jack: usize, value: bool) -> Result<(), Fault> {
        signals.write(self.index, jack, value)
    }

    /// Offsets (from `jacks.start`) of every active input in `jacks`.
    pub fn active(self, signals: &SignalNetwork, jacks: Range<usize>) -> Result<Vec<usize>, Fault> {
        let start = jacks.start;
        let mut active = Vec::new();
        for jack in jacks {
            if signals.read(self.index, jack)? {
                active.push(jack - start);
            }
        }
        Ok(active)
    }

    /// The single active input in `jacks`, if any. More than one active is a
    /// stop at this module's floor cell.
    pub fn at_most_one(self, signals: &SignalNetwork, jacks: Range<usize>) -> Result<Option<usize>, Fault> {
        match self.active(signals, jacks)?.as_slice() {
            [] => Ok(None),
            [one] => Ok(Some(*one)),
            _ => Err(Fault::stop(StopReason::TooManyActiveInputs, self.floor)),
        }
    }

    pub fn move_forced(self, moves: &mut Vec<Move>) {
        moves.push(Move::forced(self.floor, self.direction));
    }
}

// ---------------------------------------------------------------------------
// Module
// ---------------------------------------------------------------------------

/// A placed module with its runtime state.
#[derive(Debug, Clone)]
pub struct Module {
    pub kind: ModuleKind,
    pub site: Site,
    pub machine: Machine,
}

impl Module {
    pub fn index(&self) -> ModuleIndex {
        self.site.index
    }

    pub fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<(), Fault> {
        self.machine.tick(self.kind, self.site, ctx)
    }

    pub fn update_signals(&mut self, ctx: &mut SenseContext<'_>) -> Result<(), Fault> {
        self.machine.update_signals(self.site, ctx)
    }
}
