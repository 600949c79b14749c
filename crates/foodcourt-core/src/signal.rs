//! Jacks, wires and the two-plane signal registers.
//!
//! Every module owns a `current` and a `next` value per jack. Modules read the
//! `current` value of their IN jacks and write the `next` value of their OUT
//! jacks; a write is copied straight to the wired peer's `next` plane.
//! [`SignalNetwork::latch`] then makes `next` visible as `current` for
//! everyone at once.
//!
//! Combinational modules (the multimixers) have no register delay: when a
//! write lands on one of their inputs the network re-settles every
//! combinational output in the same call. Settling computes the least
//! fixpoint starting from all-off, so a mixer wired back into itself turns
//! off as soon as its other inputs do.

use crate::error::Fault;
use crate::id::{JackRef, ModuleIndex};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

// ---------------------------------------------------------------------------
// Jacks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JackDirection {
    In,
    Out,
}

/// A named boolean port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jack {
    pub name: String,
    pub direction: JackDirection,
}

impl Jack {
    pub fn input(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: JackDirection::In,
        }
    }

    pub fn output(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: JackDirection::Out,
        }
    }
}

/// Transfer function of a combinational module. Every output carries the
/// same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Logic {
    /// OR of every input.
    Or,
    /// First input AND the OR of the remaining inputs.
    GatedOr,
}

impl Logic {
    fn evaluate(self, jacks: &[Jack], values: &[bool]) -> bool {
        let mut inputs = jacks
            .iter()
            .zip(values)
            .filter(|(jack, _)| jack.direction == JackDirection::In)
            .map(|(_, &value)| value);
        match self {
            Logic::Or => inputs.any(|v| v),
            Logic::GatedOr => {
                let enable = inputs.next().unwrap_or(false);
                enable && inputs.any(|v| v)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SignalNetwork {
    jacks: Vec<Vec<Jack>>,
    logic: Vec<Option<Logic>>,
    current: Vec<Vec<bool>>,
    next: Vec<Vec<bool>>,
    peers: HashMap<JackRef, JackRef>,
}

impl SignalNetwork {
    /// One entry per module: its jacks, and its logic if combinational.
    pub fn new(modules: Vec<(Vec<Jack>, Option<Logic>)>) -> Self {
        let mut jacks = Vec::with_capacity(modules.len());
        let mut logic = Vec::with_capacity(modules.len());
        for (module_jacks, module_logic) in modules {
            jacks.push(module_jacks);
            logic.push(module_logic);
        }
        let planes: Vec<Vec<bool>> = jacks.iter().map(|j| vec![false; j.len()]).collect();
        Self {
            jacks,
            logic,
            current: planes.clone(),
            next: planes,
            peers: HashMap::new(),
        }
    }

    /// Wire two jacks together. Each jack carries at most one wire.
    pub fn connect(&mut self, a: JackRef, b: JackRef) -> Result<(), Fault> {
        let da = self.direction(a)?;
        let db = self.direction(b)?;
        if da == db {
            return Err(Fault::internal(format!(
                "wire {a:?} - {b:?} joins two {da:?} jacks"
            )));
        }
        if self.peers.contains_key(&a) || self.peers.contains_key(&b) {
            return Err(Fault::internal(format!("jack reused by wire {a:?} - {b:?}")));
        }
        self.peers.insert(a, b);
        self.peers.insert(b, a);
        Ok(())
    }

    pub fn module_count(&self) -> usize {
        self.jacks.len()
    }

    pub fn jacks(&self, module: ModuleIndex) -> &[Jack] {
        self.jacks.get(module.0).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn jack_index(&self, module: ModuleIndex, name: &str) -> Option<usize> {
        self.jacks(module).iter().position(|jack| jack.name == name)
    }

    pub fn peer(&self, jack: JackRef) -> Option<JackRef> {
        self.peers.get(&jack).copied()
    }

    fn direction(&self, at: JackRef) -> Result<JackDirection, Fault> {
        self.jacks
            .get(at.module.0)
            .and_then(|jacks| jacks.get(at.jack))
            .map(|jack| jack.direction)
            .ok_or_else(|| Fault::internal(format!("no such jack {at:?}")))
    }

    fn expect(&self, at: JackRef, direction: JackDirection) -> Result<(), Fault> {
        let actual = self.direction(at)?;
        if actual != direction {
            return Err(Fault::internal(format!(
                "jack {at:?} is {actual:?}, used as {direction:?}"
            )));
        }
        Ok(())
    }

    /// Current value of an IN jack.
    pub fn read(&self, module: ModuleIndex, jack: usize) -> Result<bool, Fault> {
        let at = JackRef { module, jack };
        self.expect(at, JackDirection::In)?;
        Ok(self.current[module.0][jack])
    }

    pub fn read_named(&self, module: ModuleIndex, name: &str) -> Result<bool, Fault> {
        let jack = self
            .jack_index(module, name)
            .ok_or_else(|| Fault::internal(format!("module {} has no jack {name}", module.0)))?;
        self.read(module, jack)
    }

    /// Set the next value of an OUT jack and forward it across its wire.
    pub fn write(&mut self, module: ModuleIndex, jack: usize, value: bool) -> Result<(), Fault> {
        let at = JackRef { module, jack };
        self.expect(at, JackDirection::Out)?;
        self.next[module.0][jack] = value;
        if let Some(peer) = self.peer(at) {
            let changed = self.next[peer.module.0][peer.jack] != value;
            self.next[peer.module.0][peer.jack] = value;
            if changed && self.logic[peer.module.0].is_some() {
                self.settle();
            }
        }
        Ok(())
    }

    pub fn write_named(&mut self, module: ModuleIndex, name: &str, value: bool) -> Result<(), Fault> {
        let jack = self
            .jack_index(module, name)
            .ok_or_else(|| Fault::internal(format!("module {} has no jack {name}", module.0)))?;
        self.write(module, jack, value)
    }

    /// Make every `next` value visible as `current`.
    pub fn latch(&mut self) {
        self.current.clone_from(&self.next);
    }

    pub fn current(&self, module: ModuleIndex) -> &[bool] {
        self.current.get(module.0).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn next(&self, module: ModuleIndex) -> &[bool] {
        self.next.get(module.0).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Recompute every combinational output from scratch in the `next` plane.
    fn settle(&mut self) {
        let combinational: Vec<usize> = (0..self.logic.len())
            .filter(|&m| self.logic[m].is_some())
            .collect();

        // Clear combinational outputs and everything they drive.
        for &m in &combinational {
            for j in 0..self.jacks[m].len() {
                if self.jacks[m][j].direction != JackDirection::Out {
                    continue;
                }
                self.next[m][j] = false;
                if let Some(peer) = self.peer(JackRef::new(m, j)) {
                    self.next[peer.module.0][peer.jack] = false;
                }
            }
        }

        // Raise outputs until nothing new turns on.
        let mut visited: HashSet<(JackRef, JackRef)> = HashSet::new();
        let mut pending: VecDeque<usize> = combinational.into_iter().collect();
        while let Some(m) = pending.pop_front() {
            let Some(logic) = self.logic[m] else {
                continue;
            };
            if !logic.evaluate(&self.jacks[m], &self.next[m]) {
                continue;
            }
            for j in 0..self.jacks[m].len() {
                if self.jacks[m][j].direction != JackDirection::Out {
                    continue;
                }
                self.next[m][j] = true;
                let from = JackRef::new(m, j);
                if let Some(to) = self.peer(from)
                    && visited.insert((from, to))
                {
                    self.next[to.module.0][to.jack] = true;
                    if self.logic[to.module.0].is_some() {
                        pending.push_back(to.module.0);
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Serialization of planes
// ---------------------------------------------------------------------------

/// Borrowed view of both planes, fed into state fingerprints.
#[derive(Serialize)]
pub struct PlaneSnapshot<'a> {
    pub current: &'a [Vec<bool>],
    pub next: &'a [Vec<bool>],
}

impl SignalNetwork {
    pub fn snapshot(&self) -> PlaneSnapshot<'_> {
        PlaneSnapshot {
            current: &self.current,
            next: &self.next,
        }
    }
}
