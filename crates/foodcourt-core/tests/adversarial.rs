//! Adversarial input tests for the Food Court engine.
//!
//! Tests edge cases that should surface as typed errors, never as panics or
//! silent misbehavior.

use foodcourt_core::engine::{SimConfig, Simulator};
use foodcourt_core::entity::Entity;
use foodcourt_core::error::{SimError, StopReason, TimeLimitCause, ValidationError};
use foodcourt_core::grid::Direction;
use foodcourt_core::id::{EntityKind, JackRef, LevelId, ModuleKind};
use foodcourt_core::solution::{ModuleConfig, ModuleSpec, Solution};
use foodcourt_core::test_utils::*;

fn simulator() -> Simulator {
    Simulator::new(two_twelve_level(), SimConfig::default()).unwrap()
}

fn base() -> Solution {
    let mut s = Solution::new(LevelId::TwoTwelve);
    s.add(ModuleSpec::new(ModuleKind::MainInput(LevelId::TwoTwelve), pos(1, 0), Direction::Down));
    s.add(ModuleSpec::new(ModuleKind::Output, pos(2, 3), Direction::Down));
    s
}

/// Main input NACHO -> multimixer IN_1; returns the mixer index. OUT_1 and
/// OUT_2 are jacks 4 and 5.
fn fan_out(s: &mut Solution) -> usize {
    let mixer = s.add(ModuleSpec::new(ModuleKind::Multimixer, pos(0, 0), Direction::Down).on_rack(pos(2, 0)));
    s.wire((0, 1), (mixer, 0));
    mixer
}

fn stop_of(err: &SimError) -> (u64, StopReason, Vec<foodcourt_core::grid::Position>) {
    match err {
        SimError::EmergencyStop { tick, stop } => (*tick, stop.reason, stop.positions.clone()),
        other => panic!("expected an emergency stop, got {other}"),
    }
}

/// Two forced spawns into the same empty cell collide.
#[test]
fn forced_spawns_collide() {
    let mut s = base();
    let mixer = fan_out(&mut s);
    let a = s.add(
        ModuleSpec::new(ModuleKind::Input1x, pos(0, 2), Direction::Right)
            .on_rack(pos(3, 0))
            .with_config(ModuleConfig::Input { input_id: 0 }),
    );
    let b = s.add(
        ModuleSpec::new(ModuleKind::Input1x, pos(2, 2), Direction::Left)
            .on_rack(pos(4, 0))
            .with_config(ModuleConfig::Input { input_id: 0 }),
    );
    s.wire((mixer, 4), (a, 0));
    s.wire((mixer, 5), (b, 0));

    let err = simulator().simulate_order(&s, 0).unwrap_err();
    assert_eq!(stop_of(&err), (1, StopReason::Collision, vec![pos(1, 2)]));
}

/// Products may only leave through the bottom of the output.
#[test]
fn spawning_off_the_floor_stops() {
    let mut s = base();
    s.modules[0].floor = pos(0, 0);
    s.modules[0].direction = Direction::Left;
    let err = simulator().simulate_order(&s, 0).unwrap_err();
    assert_eq!(stop_of(&err), (1, StopReason::LeftFactory, vec![pos(0, 0)]));
}

#[test]
fn two_active_inputs_on_one_spawner() {
    let mut level = two_twelve_level();
    level.entity_inputs = vec![vec![Entity::new(EntityKind::Nacho), Entity::new(EntityKind::Pretzel)]];
    let sim = Simulator::new(level, SimConfig::default()).unwrap();

    let mut s = base();
    let mixer = fan_out(&mut s);
    let input = s.add(
        ModuleSpec::new(ModuleKind::Input2x, pos(3, 1), Direction::Left)
            .on_rack(pos(3, 0))
            .with_config(ModuleConfig::Input { input_id: 0 }),
    );
    s.wire((mixer, 4), (input, 0));
    s.wire((mixer, 5), (input, 1));

    let err = sim.simulate_order(&s, 0).unwrap_err();
    assert_eq!(stop_of(&err), (1, StopReason::TooManyActiveInputs, vec![pos(3, 1)]));
}

/// A tray pushed at a blocked cell sits still; the repeat is a deadlock.
#[test]
fn blocked_conveyor_deadlocks() {
    let mut s = base();
    s.add(ModuleSpec::new(ModuleKind::Conveyor, pos(1, 1), Direction::Right));
    s.add(ModuleSpec::new(ModuleKind::Sensor, pos(2, 1), Direction::Down).on_rack(pos(3, 0)));
    let err = simulator().simulate_order(&s, 0).unwrap_err();
    assert_eq!(
        err,
        SimError::TimeLimitExceeded {
            tick: 2,
            cause: TimeLimitCause::Deadlock { tick: 1 }
        }
    );
}

/// A fryer ejecting a roast onto a parked tray: trays refuse roasts, so the
/// forced merge is a collision at the tray's cell.
#[test]
fn forced_merge_that_cannot_stack_collides() {
    let mut level = two_twelve_level();
    level.entity_inputs = vec![vec![Entity::new(EntityKind::Roast)]];
    let sim = Simulator::new(level, SimConfig::default()).unwrap();

    let mut s = base();
    s.modules[0].floor = pos(0, 0);
    s.add(ModuleSpec::new(ModuleKind::Conveyor, pos(0, 1), Direction::Up));
    let fryer = s.add(ModuleSpec::new(ModuleKind::Fryer, pos(0, 2), Direction::Up).on_rack(pos(2, 0)));
    let input = s.add(
        ModuleSpec::new(ModuleKind::Input1x, pos(0, 3), Direction::Up)
            .on_rack(pos(3, 0))
            .with_config(ModuleConfig::Input { input_id: 0 }),
    );
    s.wire((fryer, 0), (fryer, 1));
    s.wire((0, 1), (input, 0));

    let err = sim.simulate_order(&s, 0).unwrap_err();
    assert_eq!(stop_of(&err), (2, StopReason::Collision, vec![pos(0, 1)]));
}

// ===========================================================================
// Malformed solutions
// ===========================================================================

#[test]
fn empty_solution_is_invalid() {
    let s = Solution::new(LevelId::TwoTwelve);
    assert_eq!(
        simulator().simulate_order(&s, 0).unwrap_err(),
        SimError::Invalid(ValidationError::WrongModuleCount {
            kind: "main input",
            count: 0
        })
    );
}

#[test]
fn wire_to_missing_module_is_invalid() {
    let mut s = base();
    s.wire((0, 0), (9, 0));
    assert_eq!(
        simulator().validate(&s).unwrap_err(),
        ValidationError::MissingJack(JackRef::new(9, 0))
    );
}

#[test]
fn stacked_floor_modules_are_invalid() {
    let mut s = base();
    s.add(ModuleSpec::new(ModuleKind::Conveyor, pos(3, 3), Direction::Down));
    assert!(matches!(
        simulator().validate(&s),
        Err(ValidationError::Overlap { .. })
    ));
}

#[test]
fn invalid_solution_never_simulates_any_order() {
    let mut s = two_twelve_solution(true);
    s.modules.push(ModuleSpec::new(ModuleKind::Scanner(LevelId::Kazan), pos(0, 3), Direction::Up).on_rack(pos(7, 0)));
    assert!(matches!(
        simulator().simulate_solution(&s),
        Err(SimError::Invalid(ValidationError::WrongLevel { .. }))
    ));
}
