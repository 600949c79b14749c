//! Per-kind machine state and behavior.
//!
//! [`Machine`] is a tagged union with one variant per behavior family; the
//! per-tick contract dispatches with a `match`, no trait objects. Builders in
//! this module turn a [`ModuleSpec`] into a machine plus its jack layout and
//! are what the registration table points at.

use crate::entity::Entity;
use crate::error::{Fault, StopReason};
use crate::grid::Direction;
use crate::id::{ModuleKind, MusicMode, PaintColor, PaintMask, Topping};
use crate::level::{Level, Order};
use crate::module::{SenseContext, Site, TickContext};
use crate::operation::Operation;
use crate::resolver::Move;
use crate::signal::{Jack, Logic, SignalNetwork};
use crate::solution::{ModuleConfig, ModuleSpec, SEQUENCER_ROWS};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Machine state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Machine {
    MainInput,
    Scanner,
    /// Inputs and freezers.
    EntityInput {
        input_id: usize,
    },
    FluidDispenser {
        input_id: usize,
    },
    ToppingDispenser {
        input_id: usize,
        half: bool,
    },
    FluidCoater {
        topping: Topping,
    },
    Conveyor,
    Router {
        heading: Direction,
    },
    Sorter,
    Sensor,
    Stacker,
    Cooker {
        operation: Operation,
    },
    WasteBin {
        used: bool,
    },
    /// Double, triple and horizontal slicers; the kind picks the rule set.
    Slicer,
    Rotator,
    Roller,
    Docker,
    Flattener,
    Painter {
        color: PaintColor,
        mask: PaintMask,
    },
    Espresso {
        grinds: u32,
    },
    Output,
    Multimixer,
    MultimixerEnable,
    SmallCounter {
        values: [i32; 2],
        count: i32,
    },
    BigCounter {
        values: [i32; 4],
        count: i32,
    },
    Sequencer {
        rows: Vec<[bool; 4]>,
        row: Option<usize>,
    },
    Animatronic {
        music_mode: MusicMode,
        /// Bit `i` set when cue jack `i` was active last tick.
        cues: u8,
    },
}

/// A freshly built machine with its jacks.
#[derive(Debug, Clone)]
pub struct Built {
    pub machine: Machine,
    pub jacks: Vec<Jack>,
    pub logic: Option<Logic>,
}

impl Built {
    fn new(machine: Machine, jacks: Vec<Jack>) -> Self {
        Self {
            machine,
            jacks,
            logic: None,
        }
    }
}

const SMALL_COUNTER_LIMIT: i32 = 9;
const BIG_COUNTER_LIMIT: i32 = 99;

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

fn inputs(names: &[&str]) -> Vec<Jack> {
    names.iter().map(|&n| Jack::input(n)).collect()
}

fn input_id(spec: &ModuleSpec) -> Result<usize, String> {
    match spec.config {
        ModuleConfig::Input { input_id } => Ok(input_id),
        _ => Err("missing input_id".to_string()),
    }
}

fn order_jacks(level: &Level) -> Vec<Jack> {
    let mut jacks = vec![Jack::output("START")];
    jacks.extend(level.order_signal_names.iter().map(Jack::output));
    jacks
}

fn topping_list(level: &Level, input_id: usize) -> Result<&[Topping], String> {
    level
        .topping_inputs
        .get(input_id)
        .map(Vec::as_slice)
        .ok_or_else(|| format!("input_id {input_id} out of range"))
}

pub fn build_main_input(_: &ModuleSpec, level: &Level) -> Result<Built, String> {
    Ok(Built::new(Machine::MainInput, order_jacks(level)))
}

pub fn build_scanner(_: &ModuleSpec, level: &Level) -> Result<Built, String> {
    Ok(Built::new(Machine::Scanner, order_jacks(level)))
}

pub fn build_entity_input(spec: &ModuleSpec, level: &Level) -> Result<Built, String> {
    let input_id = input_id(spec)?;
    let templates = level
        .entity_inputs
        .get(input_id)
        .ok_or_else(|| format!("input_id {input_id} out of range"))?;
    let jacks = templates.iter().map(|t| Jack::input(t.kind.name())).collect();
    Ok(Built::new(Machine::EntityInput { input_id }, jacks))
}

pub fn build_fluid_dispenser(spec: &ModuleSpec, level: &Level) -> Result<Built, String> {
    let input_id = input_id(spec)?;
    let jacks = topping_list(level, input_id)?
        .iter()
        .map(|t| Jack::input(t.name()))
        .collect();
    Ok(Built::new(Machine::FluidDispenser { input_id }, jacks))
}

pub fn build_topping_dispenser(spec: &ModuleSpec, level: &Level) -> Result<Built, String> {
    let input_id = input_id(spec)?;
    let jacks = topping_list(level, input_id)?
        .iter()
        .map(|t| Jack::input(t.name()))
        .collect();
    let half = spec.kind == ModuleKind::HalfToppingDispenser;
    Ok(Built::new(Machine::ToppingDispenser { input_id, half }, jacks))
}

pub fn build_fluid_coater(spec: &ModuleSpec, level: &Level) -> Result<Built, String> {
    let input_id = input_id(spec)?;
    match topping_list(level, input_id)? {
        [topping] => Ok(Built::new(Machine::FluidCoater { topping: *topping }, Vec::new())),
        other => Err(format!("coater input must name one topping, found {}", other.len())),
    }
}

pub fn build_conveyor(_: &ModuleSpec, _: &Level) -> Result<Built, String> {
    Ok(Built::new(Machine::Conveyor, Vec::new()))
}

pub fn build_router(spec: &ModuleSpec, _: &Level) -> Result<Built, String> {
    Ok(Built::new(
        Machine::Router {
            heading: spec.direction,
        },
        inputs(&["LEFT", "THRU", "RIGHT"]),
    ))
}

pub fn build_sorter(_: &ModuleSpec, _: &Level) -> Result<Built, String> {
    let mut jacks = vec![Jack::output("SENSE")];
    jacks.extend(inputs(&["LEFT", "THRU", "RIGHT"]));
    Ok(Built::new(Machine::Sorter, jacks))
}

pub fn build_sensor(_: &ModuleSpec, _: &Level) -> Result<Built, String> {
    Ok(Built::new(Machine::Sensor, vec![Jack::output("SENSE")]))
}

pub fn build_stacker(_: &ModuleSpec, _: &Level) -> Result<Built, String> {
    Ok(Built::new(
        Machine::Stacker,
        vec![Jack::output("STACK"), Jack::input("EJECT")],
    ))
}

pub fn build_cooker(spec: &ModuleSpec, _: &Level) -> Result<Built, String> {
    let operation = match spec.kind {
        ModuleKind::Grill => Operation::CookGrill,
        ModuleKind::Fryer => Operation::CookFryer,
        ModuleKind::Microwave => Operation::CookMicrowave,
        other => return Err(format!("{other} is not a cooker")),
    };
    Ok(Built::new(
        Machine::Cooker { operation },
        vec![Jack::output("SENSE"), Jack::input("EJECT")],
    ))
}

pub fn build_waste_bin(_: &ModuleSpec, _: &Level) -> Result<Built, String> {
    Ok(Built::new(Machine::WasteBin { used: false }, Vec::new()))
}

/// Jackless floor machines whose behavior follows from the kind alone.
pub fn build_floor_machine(spec: &ModuleSpec, _: &Level) -> Result<Built, String> {
    let machine = match spec.kind {
        ModuleKind::DoubleSlicer | ModuleKind::TripleSlicer | ModuleKind::HorizontalSlicer => {
            Machine::Slicer
        }
        ModuleKind::Rotator => Machine::Rotator,
        ModuleKind::Roller => Machine::Roller,
        ModuleKind::Docker => Machine::Docker,
        ModuleKind::Flattener => Machine::Flattener,
        ModuleKind::Output => Machine::Output,
        other => return Err(format!("{other} is not a plain floor machine")),
    };
    Ok(Built::new(machine, Vec::new()))
}

pub fn build_painter(spec: &ModuleSpec, _: &Level) -> Result<Built, String> {
    match spec.config {
        ModuleConfig::Painter { color, mask } => {
            Ok(Built::new(Machine::Painter { color, mask }, Vec::new()))
        }
        _ => Err("painter needs a color and mask".to_string()),
    }
}

pub fn build_espresso(_: &ModuleSpec, _: &Level) -> Result<Built, String> {
    Ok(Built::new(
        Machine::Espresso { grinds: 0 },
        inputs(&["GRIND", "XTRACT", "STEAM", "EJECT"]),
    ))
}

pub fn build_multimixer(spec: &ModuleSpec, _: &Level) -> Result<Built, String> {
    let (machine, mut jacks, logic, width) = match spec.kind {
        ModuleKind::Multimixer => (Machine::Multimixer, Vec::new(), Logic::Or, 4),
        ModuleKind::MultimixerEnable => (
            Machine::MultimixerEnable,
            vec![Jack::input("ENABLE")],
            Logic::GatedOr,
            3,
        ),
        other => return Err(format!("{other} is not a multimixer")),
    };
    jacks.extend((1..=width).map(|i| Jack::input(format!("IN_{i}"))));
    jacks.extend((1..=width).map(|i| Jack::output(format!("OUT_{i}"))));
    Ok(Built {
        machine,
        jacks,
        logic: Some(logic),
    })
}

fn check_values(values: &[i32], limit: i32) -> Result<(), String> {
    match values.iter().find(|v| v.abs() > limit) {
        Some(v) => Err(format!("counter value {v} outside ±{limit}")),
        None => Ok(()),
    }
}

pub fn build_small_counter(spec: &ModuleSpec, _: &Level) -> Result<Built, String> {
    let ModuleConfig::SmallCounter { values } = spec.config else {
        return Err("small counter needs two values".to_string());
    };
    check_values(&values, SMALL_COUNTER_LIMIT)?;
    Ok(Built::new(
        Machine::SmallCounter { values, count: 0 },
        vec![Jack::output("ZERO"), Jack::input("IN_1"), Jack::input("IN_2")],
    ))
}

pub fn build_big_counter(spec: &ModuleSpec, _: &Level) -> Result<Built, String> {
    let ModuleConfig::BigCounter { values } = spec.config else {
        return Err("big counter needs four values".to_string());
    };
    check_values(&values, BIG_COUNTER_LIMIT)?;
    let mut jacks = vec![Jack::output("ZERO"), Jack::output("POS")];
    jacks.extend(inputs(&["IN_1", "IN_2", "IN_3", "IN_4"]));
    Ok(Built::new(Machine::BigCounter { values, count: 0 }, jacks))
}

pub fn build_sequencer(spec: &ModuleSpec, _: &Level) -> Result<Built, String> {
    let ModuleConfig::Sequencer { rows } = &spec.config else {
        return Err("sequencer needs rows".to_string());
    };
    if rows.len() != SEQUENCER_ROWS {
        return Err(format!("sequencer has {} rows, expected {SEQUENCER_ROWS}", rows.len()));
    }
    let mut jacks = inputs(&["START", "STOP"]);
    jacks.extend(["A", "B", "C", "D"].into_iter().map(Jack::output));
    Ok(Built::new(
        Machine::Sequencer {
            rows: rows.clone(),
            row: None,
        },
        jacks,
    ))
}

pub fn build_animatronic(spec: &ModuleSpec, _: &Level) -> Result<Built, String> {
    let ModuleConfig::Animatronic { music_mode } = spec.config else {
        return Err("animatronic needs a music mode".to_string());
    };
    Ok(Built::new(
        Machine::Animatronic {
            music_mode,
            cues: 0,
        },
        inputs(&["DANCE", "SING", "GLASSES", "I", "IV", "V", "I'"]),
    ))
}

// ---------------------------------------------------------------------------
// Tick behavior
// ---------------------------------------------------------------------------

/// Direction for a LEFT/THRU/RIGHT selector offset.
fn steer(facing: Direction, selector: usize) -> Direction {
    match selector {
        0 => facing.left(),
        2 => facing.right(),
        _ => facing,
    }
}

impl Machine {
    /// Act on the floor and propose moves, from the signals latched last tick.
    pub fn tick(&mut self, kind: ModuleKind, site: Site, ctx: &mut TickContext<'_>) -> Result<(), Fault> {
        match self {
            Machine::MainInput => {
                if ctx.tick == 1 {
                    let tray = if ctx.level.multi {
                        Entity::multitray()
                    } else {
                        Entity::tray()
                    };
                    ctx.moves.push(Move::spawn(site.floor, site.direction, tray));
                }
            }
            Machine::EntityInput { input_id } => {
                let templates = ctx
                    .level
                    .entity_inputs
                    .get(*input_id)
                    .ok_or_else(|| Fault::internal(format!("no entity input {input_id}")))?;
                if let Some(i) = site.at_most_one(ctx.signals, 0..templates.len())? {
                    ctx.moves
                        .push(Move::spawn(site.floor, site.direction, templates[i].clone()));
                }
            }
            Machine::FluidDispenser { input_id } => dispense_fluid(site, ctx, *input_id)?,
            Machine::ToppingDispenser { input_id, half } => {
                dispense_topping(site, ctx, *input_id, *half)?
            }
            Machine::FluidCoater { topping } => {
                if let Some(occupant) = ctx.floor.get_mut(site.floor) {
                    occupant
                        .target_mut()
                        .operations
                        .push(Operation::CoatFluid(*topping));
                    site.move_forced(ctx.moves);
                }
            }
            Machine::Conveyor => {
                if ctx.floor.contains(site.floor) {
                    ctx.moves.push(Move::soft(site.floor, site.direction));
                }
            }
            Machine::Router { heading } => {
                if let Some(selector) = site.at_most_one(ctx.signals, 0..3)? {
                    *heading = steer(site.direction, selector);
                }
                if ctx.floor.contains(site.floor) {
                    ctx.moves.push(Move::soft(site.floor, *heading));
                }
            }
            Machine::Sorter => {
                let selector = site.at_most_one(ctx.signals, 1..4)?.unwrap_or(1);
                if ctx.floor.contains(site.floor) {
                    ctx.moves
                        .push(Move::soft(site.floor, steer(site.direction, selector)));
                }
            }
            Machine::Stacker => {
                if site.read(ctx.signals, 1)? && ctx.floor.contains(site.floor) {
                    site.move_forced(ctx.moves);
                }
            }
            Machine::Cooker { operation } => {
                let eject = site.read(ctx.signals, 1)?;
                if let Some(occupant) = ctx.floor.get_mut(site.floor) {
                    if eject {
                        site.move_forced(ctx.moves);
                    } else {
                        occupant.target_mut().operations.push(*operation);
                    }
                }
            }
            Machine::WasteBin { used } => {
                if ctx.floor.contains(site.floor) {
                    if *used {
                        return Err(Fault::stop(StopReason::WasteBinFull, site.floor));
                    }
                    *used = true;
                    ctx.floor.take(site.floor);
                }
            }
            Machine::Slicer => slice(kind, site, ctx)?,
            Machine::Rotator => {
                if let Some(occupant) = ctx.floor.get_mut(site.floor) {
                    if !occupant.target_mut().rotate_halves() {
                        return Err(Fault::stop(StopReason::CannotRotate, site.floor));
                    }
                    site.move_forced(ctx.moves);
                }
            }
            Machine::Roller => {
                // Rolls the whole occupant, like the slicers.
                if let Some(occupant) = ctx.floor.get_mut(site.floor) {
                    let rule = ctx
                        .level
                        .roll_rule(occupant)
                        .ok_or_else(|| Fault::stop(StopReason::CannotRoll, site.floor))?;
                    *occupant = rule.output.clone();
                    site.move_forced(ctx.moves);
                }
            }
            Machine::Docker => apply_and_eject(site, ctx, Operation::Dock),
            Machine::Flattener => apply_and_eject(site, ctx, Operation::Flatten),
            Machine::Painter { color, mask } => {
                if let Some(occupant) = ctx.floor.get_mut(site.floor) {
                    let painted = occupant
                        .target_mut()
                        .cup_body_mut()
                        .is_some_and(|cup| cup.apply_paint(*mask, *color));
                    if !painted {
                        return Err(Fault::stop(StopReason::CannotPaint, site.floor));
                    }
                    site.move_forced(ctx.moves);
                }
            }
            Machine::Espresso { grinds } => brew(site, ctx, grinds)?,
            Machine::Output => {
                for cell in [site.floor, site.floor.shifted(Direction::Right)] {
                    if let Some(occupant) = ctx.floor.get(cell) {
                        if *occupant != ctx.order.product {
                            return Err(Fault::stop(StopReason::WrongProduct, cell));
                        }
                        ctx.moves.push(Move::forced(cell, Direction::Down));
                    }
                }
            }
            Machine::SmallCounter { values, count } => {
                accumulate(site, ctx.signals, 1, values, SMALL_COUNTER_LIMIT, count)?
            }
            Machine::BigCounter { values, count } => {
                accumulate(site, ctx.signals, 2, values, BIG_COUNTER_LIMIT, count)?
            }
            Machine::Sequencer { rows, row } => {
                let start = site.read(ctx.signals, 0)?;
                let stop = site.read(ctx.signals, 1)?;
                *row = if stop {
                    None
                } else if start {
                    Some(0)
                } else {
                    row.and_then(|r| (r + 1 < rows.len()).then_some(r + 1))
                };
            }
            Machine::Animatronic { cues, .. } => {
                *cues = site
                    .active(ctx.signals, 0..7)?
                    .into_iter()
                    .fold(0, |mask, i| mask | (1 << i));
            }
            Machine::Scanner
            | Machine::Sensor
            | Machine::Multimixer
            | Machine::MultimixerEnable => {}
        }
        Ok(())
    }

    /// Write sensing outputs from the settled floor.
    pub fn update_signals(&mut self, site: Site, ctx: &mut SenseContext<'_>) -> Result<(), Fault> {
        match self {
            Machine::MainInput => announce(site, ctx.signals, ctx.order, ctx.tick == 0)?,
            Machine::Scanner => {
                let arrived = ctx.resolution.arrivals.contains(&site.front());
                announce(site, ctx.signals, ctx.order, arrived)?
            }
            Machine::Sorter | Machine::Cooker { .. } => {
                site.write(ctx.signals, 0, ctx.floor.contains(site.floor))?
            }
            Machine::Sensor => site.write(ctx.signals, 0, ctx.floor.contains(site.front()))?,
            Machine::Stacker => {
                let merged = ctx.resolution.merges.contains(&site.floor);
                site.write(ctx.signals, 0, merged)?
            }
            Machine::SmallCounter { count, .. } => site.write(ctx.signals, 0, *count == 0)?,
            Machine::BigCounter { count, .. } => {
                site.write(ctx.signals, 0, *count == 0)?;
                site.write(ctx.signals, 1, *count > 0)?;
            }
            Machine::Sequencer { rows, row } => {
                let current = row.and_then(|r| rows.get(r));
                for k in 0..4 {
                    let on = current.is_some_and(|bits| bits[k]);
                    site.write(ctx.signals, 2 + k, on)?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// START plus the active order's signals, all gated by `on`.
fn announce(site: Site, signals: &mut SignalNetwork, order: &Order, on: bool) -> Result<(), Fault> {
    site.write(signals, 0, on)?;
    for (i, &wanted) in order.signals.iter().enumerate() {
        site.write(signals, i + 1, on && wanted)?;
    }
    Ok(())
}

fn accumulate(
    site: Site,
    signals: &SignalNetwork,
    first_input: usize,
    values: &[i32],
    limit: i32,
    count: &mut i32,
) -> Result<(), Fault> {
    let active = site.active(signals, first_input..first_input + values.len())?;
    for i in active {
        *count = (*count + values[i]).clamp(-limit, limit);
    }
    Ok(())
}

fn apply_and_eject(site: Site, ctx: &mut TickContext<'_>, operation: Operation) {
    if let Some(occupant) = ctx.floor.get_mut(site.floor) {
        occupant.target_mut().operations.push(operation);
        site.move_forced(ctx.moves);
    }
}

fn active_toppings(site: Site, ctx: &TickContext<'_>, input_id: usize) -> Result<Vec<Topping>, Fault> {
    let toppings = topping_list(ctx.level, input_id).map_err(Fault::internal)?;
    Ok(site
        .active(ctx.signals, 0..toppings.len())?
        .into_iter()
        .map(|i| toppings[i])
        .collect())
}

fn dispense_fluid(site: Site, ctx: &mut TickContext<'_>, input_id: usize) -> Result<(), Fault> {
    let active = active_toppings(site, ctx, input_id)?;
    if active.len() > 2 {
        return Err(Fault::stop(StopReason::TooManyActiveInputs, site.floor));
    }
    if active.is_empty() {
        return Ok(());
    }
    let front = site.front();
    let Some(occupant) = ctx.floor.get_mut(front) else {
        return Ok(());
    };
    let target = occupant.target_mut();

    if let Some(cup) = target.cup_body_mut() {
        for &fluid in &active {
            if !cup.add_fluid(fluid) {
                return Err(Fault::stop(StopReason::CupFull, front));
            }
        }
    } else if target.is_pizza() {
        for &topping in &active {
            target.add_pizza_topping(topping, false);
        }
    } else if target.is_chaat() {
        for &sauce in &active {
            if target.add_sauce(sauce) == Some(false) {
                return Err(Fault::stop(StopReason::DuplicateSauce, front));
            }
        }
    } else {
        let operation = match active.as_slice() {
            [fluid] => Operation::DispenseFluid(*fluid),
            [a, b] => Operation::mixed(*a, *b)
                .ok_or_else(|| Fault::internal("dispenser offers the same fluid twice"))?,
            _ => return Ok(()),
        };
        target.operations.push(operation);
    }
    Ok(())
}

fn dispense_topping(site: Site, ctx: &mut TickContext<'_>, input_id: usize, half: bool) -> Result<(), Fault> {
    let active = active_toppings(site, ctx, input_id)?;
    let Some(occupant) = ctx.floor.get_mut(site.front()) else {
        return Ok(());
    };
    let target = occupant.target_mut();
    for topping in active {
        if !target.add_pizza_topping(topping, half) {
            target.operations.push(Operation::DispenseTopping(topping));
        }
    }
    Ok(())
}

/// Slicers cut the occupant itself, never the contents of a tray: a tray
/// holding a sliceable product is `CannotSlice`.
fn slice(kind: ModuleKind, site: Site, ctx: &mut TickContext<'_>) -> Result<(), Fault> {
    let Some(occupant) = ctx.floor.get(site.floor) else {
        return Ok(());
    };
    let rule = ctx
        .level
        .slice_rule(kind, occupant)
        .ok_or_else(|| Fault::stop(StopReason::CannotSlice, site.floor))?;
    let facing = site.direction;
    let directions = if kind == ModuleKind::TripleSlicer {
        vec![facing.left(), facing, facing.right()]
    } else {
        vec![facing.left(), facing.right()]
    };
    if rule.outputs.len() != directions.len() {
        return Err(Fault::internal_at(
            format!("{kind} rule yields {} pieces", rule.outputs.len()),
            [site.floor],
        ));
    }
    ctx.floor.take(site.floor);
    for (direction, piece) in directions.into_iter().zip(rule.outputs.iter().cloned()) {
        ctx.moves.push(Move::spawn(site.floor, direction, piece));
    }
    Ok(())
}

fn brew(site: Site, ctx: &mut TickContext<'_>, grinds: &mut u32) -> Result<(), Fault> {
    let Some(jack) = site.at_most_one(ctx.signals, 0..4)? else {
        return Ok(());
    };
    match jack {
        0 => *grinds += 1,
        3 => {
            if ctx.floor.contains(site.floor) {
                site.move_forced(ctx.moves);
            }
        }
        _ => {
            let cup = ctx
                .floor
                .get_mut(site.floor)
                .and_then(|occupant| occupant.target_mut().cup_body_mut())
                .ok_or_else(|| Fault::stop(StopReason::NotACup, site.floor))?;
            if jack == 1 {
                if *grinds == 0 {
                    return Err(Fault::stop(StopReason::NoGrounds, site.floor));
                }
                if !cup.add_fluid(Topping::Coffee) {
                    return Err(Fault::stop(StopReason::CupFull, site.floor));
                }
                *grinds -= 1;
            } else {
                if !cup.remove_fluid(Topping::Milk) {
                    return Err(Fault::stop(StopReason::NoMilk, site.floor));
                }
                cup.add_fluid(Topping::Foam);
            }
        }
    }
    Ok(())
}
