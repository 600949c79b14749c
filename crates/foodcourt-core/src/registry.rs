//! Static registration table for module kinds.
//!
//! Every [`ModuleKind`] is registered exactly once with its footprint, price,
//! floor role and a builder that produces the machine and its jacks. The
//! builder is checked for duplicates and gaps, then frozen into an immutable
//! [`ModuleRegistry`] that is safe to share across threads.

use crate::error::RegistryError;
use crate::floor::FloorRole;
use crate::id::{LevelId, ModuleKind};
use crate::level::Level;
use crate::machine::{self, Built};
use crate::solution::ModuleSpec;
use std::collections::HashMap;

/// Produces a fresh machine for one placed module, or a reason the
/// configuration is unusable on this level.
pub type BuildFn = fn(&ModuleSpec, &Level) -> Result<Built, String>;

/// One registered module kind.
#[derive(Debug, Clone, Copy)]
pub struct ModuleDef {
    pub kind: ModuleKind,
    /// 0, 1 or 2. Two-cell modules extend one cell to the right.
    pub floor_cells: u8,
    pub rack_width: u8,
    pub price: u32,
    /// `None` for rack-only modules.
    pub role: Option<FloorRole>,
    pub build: BuildFn,
}

impl ModuleDef {
    pub fn new(kind: ModuleKind, floor_cells: u8, rack_width: u8, price: u32, build: BuildFn) -> Self {
        Self {
            kind,
            floor_cells,
            rack_width,
            price,
            role: None,
            build,
        }
    }

    pub fn with_role(mut self, role: FloorRole) -> Self {
        self.role = Some(role);
        self
    }
}

/// Collects definitions, then freezes them.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    defs: Vec<ModuleDef>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, def: ModuleDef) -> &mut Self {
        self.defs.push(def);
        self
    }

    /// Freeze the table. Fails if a kind is registered twice or any kind is
    /// left out.
    pub fn build(self) -> Result<ModuleRegistry, RegistryError> {
        let mut defs = HashMap::with_capacity(self.defs.len());
        for def in self.defs {
            if defs.insert(def.kind, def).is_some() {
                return Err(RegistryError::Duplicate(def.kind));
            }
        }
        if let Some(kind) = ModuleKind::all().into_iter().find(|k| !defs.contains_key(k)) {
            return Err(RegistryError::Missing(kind));
        }
        Ok(ModuleRegistry { defs })
    }
}

/// Immutable module table. Frozen after [`RegistryBuilder::build`].
#[derive(Debug)]
pub struct ModuleRegistry {
    defs: HashMap<ModuleKind, ModuleDef>,
}

impl ModuleRegistry {
    /// The reference catalog.
    pub fn standard() -> Result<Self, RegistryError> {
        standard_builder().build()
    }

    pub fn get(&self, kind: ModuleKind) -> Option<&ModuleDef> {
        self.defs.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Builder pre-filled with every standard kind.
pub fn standard_builder() -> RegistryBuilder {
    use FloorRole::{Blocked, Conveyor, Machine, Stacker};
    use ModuleKind as K;

    let mut b = RegistryBuilder::new();

    for &level in LevelId::ALL {
        b.register(ModuleDef::new(K::MainInput(level), 1, 2, 0, machine::build_main_input).with_role(Blocked));
        b.register(ModuleDef::new(K::Scanner(level), 1, 2, 20, machine::build_scanner).with_role(Blocked));
    }

    // -- producers --
    for kind in [K::Input1x, K::Input2x, K::Input3x] {
        b.register(ModuleDef::new(kind, 1, 1, 20, machine::build_entity_input).with_role(Blocked));
    }
    for kind in [K::Freezer1x, K::Freezer3x, K::Freezer7x] {
        b.register(ModuleDef::new(kind, 1, 2, 20, machine::build_entity_input).with_role(Blocked));
    }
    for kind in [K::FluidDispenser1x, K::FluidDispenser2x, K::FluidDispenser3x] {
        b.register(ModuleDef::new(kind, 1, 1, 20, machine::build_fluid_dispenser).with_role(Blocked));
    }
    for kind in [K::ToppingDispenser, K::HalfToppingDispenser] {
        b.register(ModuleDef::new(kind, 1, 1, 20, machine::build_topping_dispenser).with_role(Blocked));
    }

    // -- transport --
    b.register(ModuleDef::new(K::Conveyor, 1, 0, 5, machine::build_conveyor).with_role(Conveyor))
        .register(ModuleDef::new(K::Router, 1, 1, 10, machine::build_router).with_role(Conveyor))
        .register(ModuleDef::new(K::Sorter, 1, 1, 10, machine::build_sorter).with_role(Conveyor))
        .register(ModuleDef::new(K::Sensor, 1, 1, 5, machine::build_sensor).with_role(Blocked))
        .register(ModuleDef::new(K::Stacker, 1, 1, 20, machine::build_stacker).with_role(Stacker))
        .register(ModuleDef::new(K::Output, 2, 0, 0, machine::build_floor_machine).with_role(Machine));

    // -- processing --
    for kind in [K::Grill, K::Fryer, K::Microwave] {
        b.register(ModuleDef::new(kind, 1, 1, 20, machine::build_cooker).with_role(Machine));
    }
    for kind in [
        K::DoubleSlicer,
        K::TripleSlicer,
        K::HorizontalSlicer,
        K::Rotator,
        K::Roller,
        K::Docker,
        K::Flattener,
    ] {
        b.register(ModuleDef::new(kind, 1, 0, 20, machine::build_floor_machine).with_role(Machine));
    }
    b.register(ModuleDef::new(K::FluidCoater, 1, 0, 20, machine::build_fluid_coater).with_role(Machine))
        .register(ModuleDef::new(K::WasteBin, 1, 0, 20, machine::build_waste_bin).with_role(Machine))
        .register(ModuleDef::new(K::Painter, 1, 1, 40, machine::build_painter).with_role(Machine))
        .register(ModuleDef::new(K::Espresso, 1, 1, 40, machine::build_espresso).with_role(Machine))
        .register(ModuleDef::new(K::Animatronic, 1, 2, 40, machine::build_animatronic).with_role(Blocked));

    // -- rack logic --
    b.register(ModuleDef::new(K::Multimixer, 0, 1, 1, machine::build_multimixer))
        .register(ModuleDef::new(K::MultimixerEnable, 0, 1, 1, machine::build_multimixer))
        .register(ModuleDef::new(K::SmallCounter, 0, 1, 3, machine::build_small_counter))
        .register(ModuleDef::new(K::BigCounter, 0, 1, 5, machine::build_big_counter))
        .register(ModuleDef::new(K::Sequencer, 0, 2, 5, machine::build_sequencer));

    b
}
