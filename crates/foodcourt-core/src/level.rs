//! Puzzle definitions as the engine consumes them.
//!
//! A [`Level`] is plain data handed in by a catalog: order signals and target
//! products, input templates, and the rule tables slicers and rollers consult.

use crate::entity::Entity;
use crate::grid::GridBounds;
use crate::id::{LevelId, ModuleKind, Topping};
use serde::{Deserialize, Serialize};

/// One order: the signal vector that requests it and the product to deliver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub signals: Vec<bool>,
    pub product: Entity,
}

/// What a slicer turns a product into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceRule {
    /// `DoubleSlicer`, `TripleSlicer` or `HorizontalSlicer`.
    pub slicer: ModuleKind,
    pub input: Entity,
    /// Pieces in spawn order: left then right, or left, front, right.
    pub outputs: Vec<Entity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollRule {
    pub input: Entity,
    pub output: Entity,
}

/// Upper bound on how many modules of one kind a level allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleLimit {
    pub kind: ModuleKind,
    pub max: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: LevelId,
    /// In-game ordering, starting from 1.
    pub number: u32,
    #[serde(default = "default_floor")]
    pub floor: GridBounds,
    #[serde(default = "default_rack")]
    pub rack: GridBounds,
    /// Names of the order jacks on main inputs and scanners.
    pub order_signal_names: Vec<String>,
    pub orders: Vec<Order>,
    /// Entity templates per `input_id`, for inputs and freezers.
    pub entity_inputs: Vec<Vec<Entity>>,
    /// Toppings per `input_id`, for dispensers and coaters.
    pub topping_inputs: Vec<Vec<Topping>>,
    /// Main inputs hand out multitrays instead of trays.
    #[serde(default)]
    pub multi: bool,
    #[serde(default)]
    pub slice_rules: Vec<SliceRule>,
    #[serde(default)]
    pub roll_rules: Vec<RollRule>,
    #[serde(default)]
    pub module_limits: Vec<ModuleLimit>,
}

fn default_floor() -> GridBounds {
    GridBounds::FLOOR
}

fn default_rack() -> GridBounds {
    GridBounds::RACK
}

impl Level {
    /// An empty level on the reference grids.
    pub fn new(id: LevelId, number: u32) -> Self {
        Self {
            id,
            number,
            floor: GridBounds::FLOOR,
            rack: GridBounds::RACK,
            order_signal_names: Vec::new(),
            orders: Vec::new(),
            entity_inputs: Vec::new(),
            topping_inputs: Vec::new(),
            multi: false,
            slice_rules: Vec::new(),
            roll_rules: Vec::new(),
            module_limits: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    pub fn order(&self, index: usize) -> Option<&Order> {
        self.orders.get(index)
    }

    pub fn slice_rule(&self, slicer: ModuleKind, input: &Entity) -> Option<&SliceRule> {
        self.slice_rules
            .iter()
            .find(|rule| rule.slicer == slicer && *input == rule.input)
    }

    pub fn roll_rule(&self, input: &Entity) -> Option<&RollRule> {
        self.roll_rules.iter().find(|rule| *input == rule.input)
    }

    pub fn module_limit(&self, kind: ModuleKind) -> Option<usize> {
        self.module_limits
            .iter()
            .find(|limit| limit.kind == kind)
            .map(|limit| limit.max)
    }
}
