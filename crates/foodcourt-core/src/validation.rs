//! Structural checks on a solution before any order is simulated.
//!
//! Validation builds every module once, so configuration problems surface as
//! [`ValidationError::BadConfig`] instead of failing mid-run. The built
//! machines are handed back for the engine to clone per order.

use crate::error::{Surface, ValidationError};
use crate::grid::{Direction, Position};
use crate::id::{JackRef, ModuleIndex, ModuleKind};
use crate::level::Level;
use crate::machine::Built;
use crate::registry::{ModuleDef, ModuleRegistry};
use crate::signal::Jack;
use crate::solution::{ModuleSpec, Solution};
use std::collections::{BTreeMap, HashSet};

/// Floor cells covered by a module, anchor first.
pub fn floor_cells(def: &ModuleDef, spec: &ModuleSpec) -> Vec<Position> {
    (0..def.floor_cells)
        .scan(spec.floor, |cell, _| {
            let current = *cell;
            *cell = cell.shifted(Direction::Right);
            Some(current)
        })
        .collect()
}

/// Rack cells covered by a module, leftmost first.
pub fn rack_cells(def: &ModuleDef, spec: &ModuleSpec) -> Vec<Position> {
    (0..i32::from(def.rack_width))
        .map(|dx| Position::new(spec.rack.column + dx, spec.rack.row))
        .collect()
}

fn is_dispenser(kind: ModuleKind) -> bool {
    matches!(
        kind,
        ModuleKind::FluidDispenser1x
            | ModuleKind::FluidDispenser2x
            | ModuleKind::FluidDispenser3x
            | ModuleKind::ToppingDispenser
            | ModuleKind::HalfToppingDispenser
    )
}

/// Check `solution` against `level`, returning the freshly built machines in
/// module order.
pub fn validate(
    registry: &ModuleRegistry,
    level: &Level,
    solution: &Solution,
) -> Result<Vec<Built>, ValidationError> {
    let mut floor: BTreeMap<Position, ModuleKind> = BTreeMap::new();
    let mut rack: HashSet<Position> = HashSet::new();
    let mut built = Vec::with_capacity(solution.modules.len());
    let mut counts: BTreeMap<ModuleKind, usize> = BTreeMap::new();

    for (i, spec) in solution.modules.iter().enumerate() {
        let index = ModuleIndex(i);
        let def = registry.get(spec.kind).ok_or_else(|| ValidationError::BadConfig {
            index,
            kind: spec.kind,
            reason: "unregistered module kind".to_string(),
        })?;

        if let Some(other) = spec.kind.level()
            && other != level.id
        {
            return Err(ValidationError::WrongLevel {
                index,
                kind: spec.kind,
                level: level.id,
                other,
            });
        }

        for position in floor_cells(def, spec) {
            if !level.floor.contains(position) {
                return Err(ValidationError::OutOfBounds {
                    index,
                    kind: spec.kind,
                    surface: Surface::Floor,
                    position,
                });
            }
            if floor.insert(position, spec.kind).is_some() {
                return Err(ValidationError::Overlap {
                    surface: Surface::Floor,
                    position,
                });
            }
        }
        for position in rack_cells(def, spec) {
            if !level.rack.contains(position) {
                return Err(ValidationError::OutOfBounds {
                    index,
                    kind: spec.kind,
                    surface: Surface::Rack,
                    position,
                });
            }
            if !rack.insert(position) {
                return Err(ValidationError::Overlap {
                    surface: Surface::Rack,
                    position,
                });
            }
        }

        let machine = (def.build)(spec, level).map_err(|reason| ValidationError::BadConfig {
            index,
            kind: spec.kind,
            reason,
        })?;
        built.push(machine);
        *counts.entry(spec.kind).or_default() += 1;
    }

    check_spouts(solution, &floor)?;
    check_counts(level, solution, &counts)?;
    check_wires(solution, &built)?;
    Ok(built)
}

fn check_spouts(solution: &Solution, floor: &BTreeMap<Position, ModuleKind>) -> Result<(), ValidationError> {
    for (i, spec) in solution.modules.iter().enumerate() {
        if !is_dispenser(spec.kind) {
            continue;
        }
        let position = spec.floor.shifted(spec.direction);
        if let Some(&below) = floor.get(&position)
            && !matches!(below, ModuleKind::Conveyor | ModuleKind::Router | ModuleKind::Sorter)
        {
            return Err(ValidationError::DispenserOverMachine {
                index: ModuleIndex(i),
                below,
                position,
            });
        }
    }
    Ok(())
}

fn check_counts(
    level: &Level,
    solution: &Solution,
    counts: &BTreeMap<ModuleKind, usize>,
) -> Result<(), ValidationError> {
    let main_inputs = solution
        .modules
        .iter()
        .filter(|m| matches!(m.kind, ModuleKind::MainInput(_)))
        .count();
    if main_inputs != 1 {
        return Err(ValidationError::WrongModuleCount {
            kind: "main input",
            count: main_inputs,
        });
    }
    let outputs = counts.get(&ModuleKind::Output).copied().unwrap_or(0);
    if outputs != 1 {
        return Err(ValidationError::WrongModuleCount {
            kind: "output",
            count: outputs,
        });
    }
    for (&kind, &count) in counts {
        if let Some(limit) = level.module_limit(kind)
            && count > limit
        {
            return Err(ValidationError::ModuleLimit { kind, count, limit });
        }
    }
    Ok(())
}

fn jack<'a>(built: &'a [Built], end: JackRef) -> Result<&'a Jack, ValidationError> {
    built
        .get(end.module.0)
        .and_then(|b| b.jacks.get(end.jack))
        .ok_or(ValidationError::MissingJack(end))
}

fn check_wires(solution: &Solution, built: &[Built]) -> Result<(), ValidationError> {
    let mut used = HashSet::new();
    for wire in &solution.wires {
        let (a, b) = (wire.0, wire.1);
        if jack(built, a)?.direction == jack(built, b)?.direction {
            return Err(ValidationError::SameDirection(a, b));
        }
        for end in [a, b] {
            if !used.insert(end) {
                return Err(ValidationError::JackReused(end));
            }
        }
    }
    Ok(())
}
