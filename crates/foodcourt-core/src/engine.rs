//! The simulation engine: builds per-order state from a solution and drives
//! the tick pipeline.
//!
//! # Tick pipeline
//!
//! Each [`Simulation::step`] runs:
//! 1. **Act** -- every module reads last tick's latched inputs, mutates the
//!    floor and proposes moves
//! 2. **Resolve** -- the proposed moves are resolved as one batch
//! 3. **Sense** -- every module writes its outputs from the settled floor
//! 4. **Latch** -- next signals become current
//! 5. **Bookkeeping** -- completion check, state fingerprint, tick budget
//!
//! Before tick 1 every module senses once with an empty resolution, so the
//! main input's start pulse is visible on the first tick.

use crate::error::{Fault, RegistryError, SimError, TimeLimitCause, ValidationError};
use crate::floor::{Cell, Floor, FloorLayout};
use crate::history::History;
use crate::id::ModuleIndex;
use crate::level::{Level, Order};
use crate::machine::{Built, Machine};
use crate::module::{Module, SenseContext, Site, TickContext};
use crate::registry::ModuleRegistry;
use crate::resolver::{self, Resolution};
use crate::signal::{PlaneSnapshot, SignalNetwork};
use crate::solution::Solution;
use crate::validation;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Overrides the solution's recorded time as the tick budget. An order
    /// may finish on the budget tick itself; one still running after it
    /// fails with `Budget` stamped with that same tick, not the tick after.
    pub tick_limit: Option<u64>,
    /// How many recent state fingerprints loop detection remembers.
    pub history_capacity: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_limit: None,
            history_capacity: 1000,
        }
    }
}

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

/// Aggregate result of simulating every order of a solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionReport {
    pub level: crate::id::LevelId,
    pub max_ticks: u64,
    pub total_ticks: u64,
    pub cost: u32,
    pub wire_count: usize,
    /// Ticks to complete each order, in order index.
    pub per_order: Vec<u64>,
}

/// Runs solutions against one level.
#[derive(Debug)]
pub struct Simulator {
    level: Level,
    registry: ModuleRegistry,
    config: SimConfig,
}

impl Simulator {
    pub fn new(level: Level, config: SimConfig) -> Result<Self, RegistryError> {
        Ok(Self {
            level,
            registry: ModuleRegistry::standard()?,
            config,
        })
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn config(&self) -> SimConfig {
        self.config
    }

    /// Structural checks only; nothing is simulated.
    pub fn validate(&self, solution: &Solution) -> Result<(), ValidationError> {
        validation::validate(&self.registry, &self.level, solution).map(|_| ())
    }

    /// Total price of every placed module.
    pub fn cost(&self, solution: &Solution) -> u32 {
        solution
            .modules
            .iter()
            .filter_map(|m| self.registry.get(m.kind))
            .map(|def| def.price)
            .sum()
    }

    fn budget(&self, solution: &Solution) -> Option<u64> {
        self.config.tick_limit.or(solution.time)
    }

    /// Validate and set up order `order` without running it.
    pub fn start(&self, solution: &Solution, order: usize) -> Result<Simulation<'_>, SimError> {
        let built = validation::validate(&self.registry, &self.level, solution)?;
        self.launch(solution, built, order)
    }

    /// Run one order to completion and return its tick count.
    pub fn simulate_order(&self, solution: &Solution, order: usize) -> Result<u64, SimError> {
        self.start(solution, order)?.run()
    }

    /// Validate once, then run every order. The first failure by order index
    /// is returned.
    pub fn simulate_solution(&self, solution: &Solution) -> Result<SolutionReport, SimError> {
        let built = validation::validate(&self.registry, &self.level, solution)?;
        let run = |order: usize| -> Result<u64, SimError> {
            self.launch(solution, built.clone(), order)?.run()
        };

        #[cfg(feature = "parallel")]
        let results: Vec<Result<u64, SimError>> = {
            use rayon::prelude::*;
            (0..self.level.orders.len()).into_par_iter().map(run).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let results: Vec<Result<u64, SimError>> = (0..self.level.orders.len()).map(run).collect();

        let per_order = results.into_iter().collect::<Result<Vec<u64>, SimError>>()?;
        Ok(SolutionReport {
            level: self.level.id,
            max_ticks: per_order.iter().copied().max().unwrap_or(0),
            total_ticks: per_order.iter().sum(),
            cost: self.cost(solution),
            wire_count: solution.wires.len(),
            per_order,
        })
    }

    fn launch(&self, solution: &Solution, built: Vec<Built>, order_index: usize) -> Result<Simulation<'_>, SimError> {
        let order = self
            .level
            .order(order_index)
            .ok_or(ValidationError::NoSuchOrder(order_index))?;

        let mut layout = FloorLayout::new(self.level.floor);
        let mut modules = Vec::with_capacity(built.len());
        let mut jacks = Vec::with_capacity(built.len());
        for (i, (spec, built)) in solution.modules.iter().zip(built).enumerate() {
            let index = ModuleIndex(i);
            let def = self
                .registry
                .get(spec.kind)
                .ok_or_else(|| SimError::from_fault(0, Fault::internal(format!("{} vanished from the registry", spec.kind))))?;
            if let Some(role) = def.role {
                for position in validation::floor_cells(def, spec) {
                    let cell = Cell {
                        module: index,
                        kind: spec.kind,
                        role,
                        facing: spec.direction,
                    };
                    layout.insert(position, cell).map_err(|f| SimError::from_fault(0, f))?;
                }
            }
            modules.push(Module {
                kind: spec.kind,
                site: Site {
                    index,
                    floor: spec.floor,
                    direction: spec.direction,
                },
                machine: built.machine,
            });
            jacks.push((built.jacks, built.logic));
        }

        let mut signals = SignalNetwork::new(jacks);
        for wire in &solution.wires {
            signals
                .connect(wire.0, wire.1)
                .map_err(|f| SimError::from_fault(0, f))?;
        }

        let mut simulation = Simulation {
            level: &self.level,
            order,
            order_index,
            modules,
            layout,
            floor: Floor::new(),
            signals,
            tick: 0,
            success: false,
            history: History::new(self.config.history_capacity),
            budget: self.budget(solution),
            outcome: None,
        };
        simulation.prime().map_err(|f| SimError::from_fault(0, f))?;
        debug!(
            level = self.level.name(),
            order = order_index,
            modules = simulation.modules.len(),
            budget = ?simulation.budget,
            "order started"
        );
        Ok(simulation)
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Result of one [`Simulation::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Running,
    /// The order completed on this tick.
    Finished(u64),
}

/// Borrowed view of everything that can change between ticks.
#[derive(Serialize)]
struct Fingerprint<'a> {
    machines: Vec<&'a Machine>,
    signals: PlaneSnapshot<'a>,
    floor: &'a Floor,
    success: bool,
}

/// Per-order simulation state. Owns a private copy of every module.
#[derive(Debug)]
pub struct Simulation<'a> {
    level: &'a Level,
    order: &'a Order,
    order_index: usize,
    modules: Vec<Module>,
    layout: FloorLayout,
    floor: Floor,
    signals: SignalNetwork,
    tick: u64,
    success: bool,
    history: History,
    budget: Option<u64>,
    outcome: Option<Result<u64, SimError>>,
}

impl<'a> Simulation<'a> {
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn floor(&self) -> &Floor {
        &self.floor
    }

    pub fn signals(&self) -> &SignalNetwork {
        &self.signals
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Whether a correct product has left through the output.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Run until the order finishes or fails.
    pub fn run(mut self) -> Result<u64, SimError> {
        loop {
            if let Step::Finished(tick) = self.step()? {
                return Ok(tick);
            }
        }
    }

    /// Advance one tick. Once finished or failed, repeats the outcome.
    pub fn step(&mut self) -> Result<Step, SimError> {
        if let Some(outcome) = &self.outcome {
            return outcome.clone().map(Step::Finished);
        }
        let result = self.advance();
        match &result {
            Ok(Step::Finished(tick)) => {
                debug!(order = self.order_index, tick, "order finished");
                self.outcome = Some(Ok(*tick));
            }
            Ok(Step::Running) => {}
            Err(err) => {
                debug!(order = self.order_index, tick = self.tick, error = %err, "order failed");
                self.outcome = Some(Err(err.clone()));
            }
        }
        result
    }

    fn advance(&mut self) -> Result<Step, SimError> {
        self.tick += 1;
        let tick = self.tick;
        self.run_tick().map_err(|f| SimError::from_fault(tick, f))?;
        trace!(tick, "\n{}", self);

        if self.success && self.floor.is_empty() {
            return Ok(Step::Finished(tick));
        }

        let fingerprint = self.fingerprint().map_err(|f| SimError::from_fault(tick, f))?;
        if let Err(cause) = self.history.record(tick, fingerprint) {
            return Err(SimError::TimeLimitExceeded { tick, cause });
        }
        if let Some(limit) = self.budget
            && tick >= limit
        {
            return Err(SimError::TimeLimitExceeded {
                tick,
                cause: TimeLimitCause::Budget { limit },
            });
        }
        Ok(Step::Running)
    }

    /// Initial sense pass and latch before tick 1.
    fn prime(&mut self) -> Result<(), Fault> {
        self.sense(&Resolution::default())
    }

    fn run_tick(&mut self) -> Result<(), Fault> {
        let mut moves = Vec::new();
        let mut ctx = TickContext {
            tick: self.tick,
            level: self.level,
            order: self.order,
            floor: &mut self.floor,
            signals: &mut self.signals,
            moves: &mut moves,
        };
        for module in &mut self.modules {
            module.tick(&mut ctx)?;
        }

        let resolution = resolver::resolve(&mut self.floor, &self.layout, moves)?;
        self.sense(&resolution)?;
        if !resolution.exits.is_empty() {
            self.success = true;
        }
        Ok(())
    }

    fn sense(&mut self, resolution: &Resolution) -> Result<(), Fault> {
        let mut ctx = SenseContext {
            tick: self.tick,
            order: self.order,
            floor: &self.floor,
            signals: &mut self.signals,
            resolution,
        };
        for module in &mut self.modules {
            module.update_signals(&mut ctx)?;
        }
        self.signals.latch();
        Ok(())
    }

    fn fingerprint(&self) -> Result<Vec<u8>, Fault> {
        let snapshot = Fingerprint {
            machines: self.modules.iter().map(|m| &m.machine).collect(),
            signals: self.signals.snapshot(),
            floor: &self.floor,
            success: self.success,
        };
        bitcode::serialize(&snapshot).map_err(|e| Fault::internal(format!("fingerprint: {e}")))
    }
}

impl fmt::Display for Simulation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "tick {} (order {})", self.tick, self.order_index)?;
        for module in &self.modules {
            let index = module.index();
            let jacks = self.signals.jacks(index);
            if jacks.is_empty() {
                continue;
            }
            write!(f, "  [{}] {}:", index.0, module.kind)?;
            for (jack, &on) in jacks.iter().zip(self.signals.current(index)) {
                write!(f, " {}={}", jack.name, u8::from(on))?;
            }
            writeln!(f)?;
        }
        write!(f, "{}", self.floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StopReason;
    use crate::grid::Position;
    use crate::test_utils;

    #[test]
    fn two_twelve_finishes() {
        let level = test_utils::two_twelve_level();
        let sim = Simulator::new(level, SimConfig::default()).unwrap();
        let solution = test_utils::two_twelve_solution(true);
        assert_eq!(sim.simulate_order(&solution, 0).unwrap(), test_utils::TWO_TWELVE_TICKS);
    }

    #[test]
    fn missing_dispenser_is_wrong_product() {
        let sim = Simulator::new(test_utils::two_twelve_level(), SimConfig::default()).unwrap();
        let err = sim
            .simulate_order(&test_utils::two_twelve_solution(false), 0)
            .unwrap_err();
        let stop = err.stop().unwrap();
        assert_eq!(stop.reason, StopReason::WrongProduct);
        assert_eq!(stop.positions, vec![Position::new(1, 3)]);
    }

    #[test]
    fn step_repeats_outcome_after_finishing() {
        let sim = Simulator::new(test_utils::two_twelve_level(), SimConfig::default()).unwrap();
        let solution = test_utils::two_twelve_solution(true);
        let mut run = sim.start(&solution, 0).unwrap();
        let mut last = Step::Running;
        while last == Step::Running {
            last = run.step().unwrap();
        }
        assert_eq!(last, Step::Finished(test_utils::TWO_TWELVE_TICKS));
        assert_eq!(run.step().unwrap(), last);
        assert!(run.success());
        assert!(run.floor().is_empty());
    }

    #[test]
    fn main_input_pulses_only_before_tick_one() {
        let sim = Simulator::new(test_utils::two_twelve_level(), SimConfig::default()).unwrap();
        let solution = test_utils::two_twelve_solution(true);
        let mut run = sim.start(&solution, 0).unwrap();
        assert_eq!(run.signals().current(ModuleIndex(0)), &[true, true]);
        run.step().unwrap();
        assert_eq!(run.signals().current(ModuleIndex(0)), &[false, false]);
        assert_eq!(run.floor().len(), 2);
    }

    #[test]
    fn ring_without_exit_is_a_loop() {
        let sim = Simulator::new(test_utils::two_twelve_level(), SimConfig::default()).unwrap();
        let err = sim.simulate_order(&test_utils::ring_solution(), 0).unwrap_err();
        assert_eq!(
            err,
            SimError::TimeLimitExceeded {
                tick: 5,
                cause: TimeLimitCause::Loop { start: 1, end: 5 }
            }
        );
    }

    #[test]
    fn budget_applies_when_history_is_disabled() {
        let config = SimConfig {
            tick_limit: Some(3),
            history_capacity: 0,
        };
        let sim = Simulator::new(test_utils::two_twelve_level(), config).unwrap();
        let err = sim.simulate_order(&test_utils::ring_solution(), 0).unwrap_err();
        assert_eq!(
            err,
            SimError::TimeLimitExceeded {
                tick: 3,
                cause: TimeLimitCause::Budget { limit: 3 }
            }
        );
    }

    #[test]
    fn order_may_finish_on_the_budget_tick() {
        let limited = |limit: u64| {
            let config = SimConfig {
                tick_limit: Some(limit),
                ..SimConfig::default()
            };
            Simulator::new(test_utils::two_twelve_level(), config).unwrap()
        };
        let solution = test_utils::two_twelve_solution(true);
        let ticks = test_utils::TWO_TWELVE_TICKS;

        assert_eq!(limited(ticks).simulate_order(&solution, 0), Ok(ticks));
        assert_eq!(
            limited(ticks - 1).simulate_order(&solution, 0),
            Err(SimError::TimeLimitExceeded {
                tick: ticks - 1,
                cause: TimeLimitCause::Budget { limit: ticks - 1 }
            })
        );
    }

    #[test]
    fn solution_report_aggregates_orders() {
        let sim = Simulator::new(test_utils::two_twelve_level(), SimConfig::default()).unwrap();
        let solution = test_utils::two_twelve_solution(true);
        let report = sim.simulate_solution(&solution).unwrap();
        assert_eq!(report.per_order, vec![test_utils::TWO_TWELVE_TICKS]);
        assert_eq!(report.max_ticks, test_utils::TWO_TWELVE_TICKS);
        assert_eq!(report.total_ticks, test_utils::TWO_TWELVE_TICKS);
        assert_eq!(report.wire_count, solution.wires.len());
        assert_eq!(report.cost, sim.cost(&solution));
    }

    #[test]
    fn unknown_order_is_invalid() {
        let sim = Simulator::new(test_utils::two_twelve_level(), SimConfig::default()).unwrap();
        let err = sim.start(&test_utils::two_twelve_solution(true), 3).unwrap_err();
        assert_eq!(err, SimError::Invalid(ValidationError::NoSuchOrder(3)));
    }

    #[test]
    fn display_dumps_signals_and_floor() {
        let sim = Simulator::new(test_utils::two_twelve_level(), SimConfig::default()).unwrap();
        let solution = test_utils::two_twelve_solution(true);
        let mut run = sim.start(&solution, 0).unwrap();
        run.step().unwrap();
        let dump = run.to_string();
        assert!(dump.starts_with("tick 1 (order 0)"));
        assert!(dump.contains("START=0"));
        assert!(dump.contains("TRAY"));
    }
}
