//! Floor occupancy and the static role of each floor cell.

use crate::entity::Entity;
use crate::error::Fault;
use crate::grid::{Direction, GridBounds, Position};
use crate::id::{ModuleIndex, ModuleKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// How a floor module treats products moving onto its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloorRole {
    /// Accepts one soft move, preferring moves along its facing.
    Conveyor,
    /// Merges arrivals into its occupant.
    Stacker,
    /// Walkable machine; soft moves prefer down, right, left, up.
    Machine,
    /// Nothing may enter.
    Blocked,
}

/// A floor cell covered by a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub module: ModuleIndex,
    pub kind: ModuleKind,
    pub role: FloorRole,
    pub facing: Direction,
}

/// Which module covers which cell. Built once per order.
#[derive(Debug, Clone, Default)]
pub struct FloorLayout {
    bounds: GridBounds,
    cells: HashMap<Position, Cell>,
}

impl FloorLayout {
    pub fn new(bounds: GridBounds) -> Self {
        Self {
            bounds,
            cells: HashMap::new(),
        }
    }

    pub fn insert(&mut self, position: Position, cell: Cell) -> Result<(), Fault> {
        if self.cells.insert(position, cell).is_some() {
            return Err(Fault::internal_at("two modules share a floor cell", [position]));
        }
        Ok(())
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// `None` is plain floor.
    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.cells.get(&position)
    }
}

/// Top-level entities by cell. At most one per cell; anything else rides on
/// top of it through stacking.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Floor {
    entities: BTreeMap<Position, Entity>,
}

impl Floor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, position: Position) -> Option<&Entity> {
        self.entities.get(&position)
    }

    pub fn get_mut(&mut self, position: Position) -> Option<&mut Entity> {
        self.entities.get_mut(&position)
    }

    pub fn contains(&self, position: Position) -> bool {
        self.entities.contains_key(&position)
    }

    pub fn take(&mut self, position: Position) -> Option<Entity> {
        self.entities.remove(&position)
    }

    /// Put an entity on an empty cell.
    pub fn place(&mut self, position: Position, entity: Entity) -> Result<(), Fault> {
        if self.entities.contains_key(&position) {
            return Err(Fault::internal_at(
                "unresolved collision after movement",
                [position],
            ));
        }
        self.entities.insert(position, entity);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, &Entity)> {
        self.entities.iter().map(|(&p, e)| (p, e))
    }
}

impl fmt::Display for Floor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entities.is_empty() {
            return writeln!(f, "  (floor empty)");
        }
        for (position, entity) in &self.entities {
            writeln!(f, "  {position}: {entity}")?;
        }
        Ok(())
    }
}
