//! Shared solution builders for the catalog scenarios.

#![allow(dead_code)]

use foodcourt_core::grid::{Direction, Position};
use foodcourt_core::id::{LevelId, ModuleKind};
use foodcourt_core::solution::{ModuleConfig, ModuleSpec, SEQUENCER_ROWS, Solution};
use std::sync::Once;

/// Install a test-writer subscriber once; filter with `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn pos(column: i32, row: i32) -> Position {
    Position::new(column, row)
}

pub fn input(kind: ModuleKind, floor: Position, direction: Direction, rack: Position, input_id: usize) -> ModuleSpec {
    ModuleSpec::new(kind, floor, direction)
        .on_rack(rack)
        .with_config(ModuleConfig::Input { input_id })
}

/// Main input at the top of column 1 feeding a self-ejecting stacker, with a
/// conveyor line down to the output on the bottom row. Returns the solution
/// and the stacker index.
pub fn serving_line(level: LevelId) -> (Solution, usize) {
    let mut s = Solution::new(level);
    s.add(ModuleSpec::new(ModuleKind::MainInput(level), pos(1, 0), Direction::Down));
    let stacker = s.add(ModuleSpec::new(ModuleKind::Stacker, pos(1, 1), Direction::Down).on_rack(pos(2, 0)));
    for row in 2..6 {
        s.add(ModuleSpec::new(ModuleKind::Conveyor, pos(1, row), Direction::Down));
    }
    s.add(ModuleSpec::new(ModuleKind::Output, pos(1, 6), Direction::Down));
    s.wire((stacker, 0), (stacker, 1));
    (s, stacker)
}

/// Serves both 2Twelve orders: nachos pass a sensor-driven cheese dispenser,
/// pretzels come in from the left untouched.
pub fn two_twelve(with_dispenser: bool) -> Solution {
    let (mut s, _) = serving_line(LevelId::TwoTwelve);
    s.name = "both orders".to_string();

    let nachos = s.add(input(ModuleKind::Input1x, pos(3, 1), Direction::Left, pos(3, 0), 0));
    s.add(ModuleSpec::new(ModuleKind::Conveyor, pos(2, 1), Direction::Left));
    s.wire((0, 1), (nachos, 0));

    let pretzels = s.add(input(ModuleKind::Input1x, pos(0, 2), Direction::Up, pos(6, 0), 1));
    s.add(ModuleSpec::new(ModuleKind::Conveyor, pos(0, 1), Direction::Right));
    s.wire((0, 2), (pretzels, 0));

    if with_dispenser {
        let sensor = s.add(ModuleSpec::new(ModuleKind::Sensor, pos(2, 0), Direction::Down).on_rack(pos(4, 0)));
        let dispenser = s.add(input(ModuleKind::FluidDispenser1x, pos(2, 2), Direction::Up, pos(5, 0), 0));
        s.wire((sensor, 0), (dispenser, 0));
    }
    s
}

/// Serving ticks of [`two_twelve`] for either order.
pub const TWO_TWELVE_TICKS: u64 = 8;

/// A pocket microwaved in place until a sequencer fires EJECT on `eject_row`,
/// then pushed onto the waiting tray.
pub fn hot_pocket(eject_row: usize) -> Solution {
    let (mut s, _) = serving_line(LevelId::HotPocket);

    let pockets = s.add(input(ModuleKind::Input1x, pos(3, 1), Direction::Left, pos(3, 0), 0));
    let microwave = s.add(ModuleSpec::new(ModuleKind::Microwave, pos(2, 1), Direction::Left).on_rack(pos(4, 0)));
    let mut rows = vec![[false; 4]; SEQUENCER_ROWS];
    rows[eject_row][0] = true;
    let sequencer = s.add(
        ModuleSpec::new(ModuleKind::Sequencer, pos(0, 0), Direction::Down)
            .on_rack(pos(5, 0))
            .with_config(ModuleConfig::Sequencer { rows }),
    );

    s.wire((0, 1), (pockets, 0));
    s.wire((0, 0), (sequencer, 0));
    s.wire((sequencer, 2), (microwave, 1));
    s
}

/// Just a main input and an output: the tray parks under the main input.
pub fn bare(level: LevelId) -> Solution {
    let mut s = Solution::new(level);
    s.add(ModuleSpec::new(ModuleKind::MainInput(level), pos(1, 0), Direction::Down));
    s.add(ModuleSpec::new(ModuleKind::Output, pos(2, 6), Direction::Down));
    s
}
