//! Parsed solution layouts: placed modules and the wires between them.

use crate::grid::{Direction, Position};
use crate::id::{JackRef, LevelId, ModuleKind, MusicMode, PaintColor, PaintMask};
use serde::{Deserialize, Serialize};

/// Number of rows a sequencer plays.
pub const SEQUENCER_ROWS: usize = 12;

/// Per-kind settings chosen by the player.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModuleConfig {
    #[default]
    None,
    /// Inputs, freezers, dispensers and coaters: which level input feeds them.
    Input { input_id: usize },
    Painter { color: PaintColor, mask: PaintMask },
    Animatronic { music_mode: MusicMode },
    SmallCounter { values: [i32; 2] },
    BigCounter { values: [i32; 4] },
    Sequencer { rows: Vec<[bool; 4]> },
}

/// One placed module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSpec {
    pub kind: ModuleKind,
    /// Ignored for rack-only modules.
    #[serde(default)]
    pub floor: Position,
    /// Ignored for floor-only modules.
    #[serde(default)]
    pub rack: Position,
    #[serde(default = "default_direction")]
    pub direction: Direction,
    #[serde(default)]
    pub config: ModuleConfig,
}

fn default_direction() -> Direction {
    Direction::Down
}

impl ModuleSpec {
    pub fn new(kind: ModuleKind, floor: Position, direction: Direction) -> Self {
        Self {
            kind,
            floor,
            rack: Position::default(),
            direction,
            config: ModuleConfig::None,
        }
    }

    pub fn on_rack(mut self, rack: Position) -> Self {
        self.rack = rack;
        self
    }

    pub fn with_config(mut self, config: ModuleConfig) -> Self {
        self.config = config;
        self
    }
}

/// An unordered pair of jack endpoints; validation checks that one end is an
/// output and the other an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wire(pub JackRef, pub JackRef);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    #[serde(default)]
    pub name: String,
    pub level: LevelId,
    /// Recorded solve time, used as the tick budget when present.
    #[serde(default)]
    pub time: Option<u64>,
    pub modules: Vec<ModuleSpec>,
    #[serde(default)]
    pub wires: Vec<Wire>,
}

impl Solution {
    pub fn new(level: LevelId) -> Self {
        Self {
            name: String::new(),
            level,
            time: None,
            modules: Vec::new(),
            wires: Vec::new(),
        }
    }

    /// Add a module and return its index for wiring.
    pub fn add(&mut self, spec: ModuleSpec) -> usize {
        self.modules.push(spec);
        self.modules.len() - 1
    }

    /// Wire `(from_module, from_jack)` to `(to_module, to_jack)`.
    pub fn wire(&mut self, from: (usize, usize), to: (usize, usize)) {
        self.wires
            .push(Wire(JackRef::new(from.0, from.1), JackRef::new(to.0, to.1)));
    }
}
