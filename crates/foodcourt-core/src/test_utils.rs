//! Shared fixtures for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::entity::Entity;
use crate::grid::{Direction, GridBounds, Position};
use crate::id::{EntityKind, LevelId, ModuleKind, Topping};
use crate::level::{Level, Order};
use crate::operation::Operation;
use crate::solution::{ModuleConfig, ModuleSpec, Solution};

/// Ticks [`two_twelve_solution`] needs with the dispenser in place.
pub const TWO_TWELVE_TICKS: u64 = 5;

pub fn pos(column: i32, row: i32) -> Position {
    Position::new(column, row)
}

/// A tray holding a nacho with the given operations.
pub fn nacho_tray(operations: impl IntoIterator<Item = Operation>) -> Entity {
    Entity::tray().with_child(Entity::new(EntityKind::Nacho).with_operations(operations))
}

/// A cut-down 2Twelve: one order for cheesy nachos on a 4x4 floor, so the
/// output sits on the bottom row.
pub fn two_twelve_level() -> Level {
    let mut level = Level::new(LevelId::TwoTwelve, 1);
    level.floor = GridBounds { columns: 4, rows: 4 };
    level.order_signal_names = vec!["NACHO".to_string()];
    level.orders = vec![Order {
        signals: vec![true],
        product: nacho_tray([Operation::DispenseFluid(Topping::Cheese)]),
    }];
    level.entity_inputs = vec![vec![Entity::new(EntityKind::Nacho)]];
    level.topping_inputs = vec![vec![Topping::Cheese]];
    level
}

/// Main input drops a tray onto a self-ejecting stacker; the NACHO order
/// signal fires an input whose nacho rides a conveyor past a sensor-driven
/// cheese dispenser into the stacker. The tray then runs down to the output.
pub fn two_twelve_solution(with_dispenser: bool) -> Solution {
    let mut s = Solution::new(LevelId::TwoTwelve);
    s.name = "cheesy".to_string();
    let main = s.add(ModuleSpec::new(ModuleKind::MainInput(LevelId::TwoTwelve), pos(1, 0), Direction::Down));
    let stacker = s.add(ModuleSpec::new(ModuleKind::Stacker, pos(1, 1), Direction::Down).on_rack(pos(2, 0)));
    s.add(ModuleSpec::new(ModuleKind::Conveyor, pos(1, 2), Direction::Down));
    s.add(ModuleSpec::new(ModuleKind::Output, pos(1, 3), Direction::Down));
    let input = s.add(
        ModuleSpec::new(ModuleKind::Input1x, pos(3, 1), Direction::Left)
            .on_rack(pos(3, 0))
            .with_config(ModuleConfig::Input { input_id: 0 }),
    );
    s.add(ModuleSpec::new(ModuleKind::Conveyor, pos(2, 1), Direction::Left));
    s.wire((stacker, 0), (stacker, 1));
    s.wire((main, 1), (input, 0));

    if with_dispenser {
        let sensor = s.add(ModuleSpec::new(ModuleKind::Sensor, pos(2, 0), Direction::Down).on_rack(pos(4, 0)));
        let dispenser = s.add(
            ModuleSpec::new(ModuleKind::FluidDispenser1x, pos(2, 2), Direction::Up)
                .on_rack(pos(5, 0))
                .with_config(ModuleConfig::Input { input_id: 0 }),
        );
        s.wire((sensor, 0), (dispenser, 0));
    }
    s
}

/// Four conveyors in a closed loop fed once by the main input. Nothing ever
/// reaches the output.
pub fn ring_solution() -> Solution {
    let mut s = Solution::new(LevelId::TwoTwelve);
    s.add(ModuleSpec::new(ModuleKind::MainInput(LevelId::TwoTwelve), pos(2, 0), Direction::Left));
    s.add(ModuleSpec::new(ModuleKind::Conveyor, pos(0, 0), Direction::Right));
    s.add(ModuleSpec::new(ModuleKind::Conveyor, pos(1, 0), Direction::Down));
    s.add(ModuleSpec::new(ModuleKind::Conveyor, pos(1, 1), Direction::Left));
    s.add(ModuleSpec::new(ModuleKind::Conveyor, pos(0, 1), Direction::Up));
    s.add(ModuleSpec::new(ModuleKind::Output, pos(2, 3), Direction::Down));
    s
}
