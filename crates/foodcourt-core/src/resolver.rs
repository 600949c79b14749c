//! Movement resolution.
//!
//! Modules propose [`Move`]s during a tick; [`resolve`] commits them in one
//! batch. A cell can only take a new product once it knows whether its own
//! occupant is leaving, so each cell depends on the cell its occupant moves
//! to. Cells are evaluated in reverse-topological order of that dependency
//! graph (see [`components`]); a strongly connected component larger than one
//! cell is a closed ring of moves and is committed all-or-nothing.
//!
//! Acceptance rules for a cell:
//!
//! - blocked cells (inputs, dispensers, sensors) refuse everything, and a
//!   forced move into one is a collision;
//! - two forced moves into the same cell always collide;
//! - a cell whose occupant stays merges a single forced arrival into the
//!   occupant; a stacker also merges its best soft arrival;
//! - an empty or vacated cell takes the forced arrival, else the best soft
//!   arrival by priority.

use crate::entity::Entity;
use crate::error::{Fault, Stop, StopReason};
use crate::floor::{Cell, Floor, FloorLayout, FloorRole};
use crate::grid::{Direction, Position, RelativeDirection};
use crate::id::ModuleKind;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

// ---------------------------------------------------------------------------
// Moves
// ---------------------------------------------------------------------------

/// A proposed one-cell move.
#[derive(Debug, Clone, PartialEq)]
pub struct Move {
    pub from: Position,
    pub direction: Direction,
    /// A forced move must happen; a soft move is dropped if blocked.
    pub forced: bool,
    /// A product created this tick at `from`. `None` moves the occupant.
    pub spawned: Option<Entity>,
}

impl Move {
    pub fn forced(from: Position, direction: Direction) -> Self {
        Self {
            from,
            direction,
            forced: true,
            spawned: None,
        }
    }

    pub fn soft(from: Position, direction: Direction) -> Self {
        Self {
            from,
            direction,
            forced: false,
            spawned: None,
        }
    }

    /// Spawned products always move forced.
    pub fn spawn(from: Position, direction: Direction, entity: Entity) -> Self {
        Self {
            from,
            direction,
            forced: true,
            spawned: Some(entity),
        }
    }

    pub fn target(&self) -> Position {
        self.from.shifted(self.direction)
    }
}

/// What happened to the floor this tick.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Products that left through the output, with the cell they left from.
    pub exits: Vec<(Position, Entity)>,
    /// Cells that received a product by a plain move.
    pub arrivals: BTreeSet<Position>,
    /// Cells where an arrival was merged into the occupant, in commit order.
    pub merges: Vec<Position>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Move,
    Merge,
}

// ---------------------------------------------------------------------------
// Component ordering
// ---------------------------------------------------------------------------

/// Strongly connected components of a directed graph, sinks first.
///
/// `successors` may mention nodes outside `nodes`; those edges are ignored.
/// Components come out in reverse-topological order: every edge leaving a
/// component points into a component emitted earlier.
pub fn components<N, F>(nodes: &[N], successors: F) -> Vec<Vec<N>>
where
    N: Copy + Eq + Hash,
    F: Fn(N) -> Vec<N>,
{
    let position: HashMap<N, usize> = nodes.iter().enumerate().map(|(i, &n)| (n, i)).collect();
    let edges: Vec<Vec<usize>> = nodes
        .iter()
        .map(|&n| {
            successors(n)
                .into_iter()
                .filter_map(|m| position.get(&m).copied())
                .collect()
        })
        .collect();

    let mut tarjan = Tarjan {
        edges: &edges,
        index: vec![None; nodes.len()],
        low: vec![0; nodes.len()],
        on_stack: vec![false; nodes.len()],
        stack: Vec::new(),
        counter: 0,
        out: Vec::new(),
    };
    for v in 0..nodes.len() {
        if tarjan.index[v].is_none() {
            tarjan.visit(v);
        }
    }
    tarjan
        .out
        .into_iter()
        .map(|component| component.into_iter().map(|i| nodes[i]).collect())
        .collect()
}

struct Tarjan<'a> {
    edges: &'a [Vec<usize>],
    index: Vec<Option<usize>>,
    low: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    counter: usize,
    out: Vec<Vec<usize>>,
}

impl Tarjan<'_> {
    fn visit(&mut self, v: usize) {
        self.index[v] = Some(self.counter);
        self.low[v] = self.counter;
        self.counter += 1;
        self.stack.push(v);
        self.on_stack[v] = true;

        for i in 0..self.edges[v].len() {
            let w = self.edges[v][i];
            match self.index[w] {
                None => {
                    self.visit(w);
                    self.low[v] = self.low[v].min(self.low[w]);
                }
                Some(iw) if self.on_stack[w] => {
                    self.low[v] = self.low[v].min(iw);
                }
                Some(_) => {}
            }
        }

        if Some(self.low[v]) == self.index[v] {
            let mut component = Vec::new();
            while let Some(w) = self.stack.pop() {
                self.on_stack[w] = false;
                component.push(w);
                if w == v {
                    break;
                }
            }
            self.out.push(component);
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Soft-move preference at a cell; lower wins.
fn priority(mv: &Move, cell: Option<&Cell>) -> u8 {
    match cell {
        Some(cell) if cell.role == FloorRole::Conveyor => {
            match mv.direction.relative_to(cell.facing) {
                RelativeDirection::Front => 0,
                RelativeDirection::Right => 1,
                RelativeDirection::Left => 2,
                RelativeDirection::Back => 3,
            }
        }
        _ => match mv.direction {
            Direction::Down => 0,
            Direction::Right => 1,
            Direction::Left => 2,
            Direction::Up => 3,
        },
    }
}

struct Resolver<'a> {
    layout: &'a FloorLayout,
    moves: &'a [Move],
    incoming: BTreeMap<Position, Vec<usize>>,
    outgoing: HashMap<Position, usize>,
    decided: HashMap<usize, Decision>,
    order: Vec<usize>,
}

impl Resolver<'_> {
    /// Pick the arrival a cell accepts, if any.
    fn choose(
        &self,
        cell: Position,
        occupant_stays: bool,
        candidates: &[usize],
    ) -> Result<Option<(usize, Decision)>, Fault> {
        if candidates.is_empty() {
            return Ok(None);
        }
        let info = self.layout.cell(cell);
        let role = info.map(|c| c.role);
        let forced: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|&i| self.moves[i].forced)
            .collect();

        if forced.len() > 1 || (role == Some(FloorRole::Blocked) && !forced.is_empty()) {
            return Err(Fault::stop(StopReason::Collision, cell));
        }
        if role == Some(FloorRole::Blocked) {
            return Ok(None);
        }

        let best_soft = || {
            candidates
                .iter()
                .copied()
                .min_by_key(|&i| priority(&self.moves[i], info))
        };

        if occupant_stays {
            if let Some(&i) = forced.first() {
                return Ok(Some((i, Decision::Merge)));
            }
            if role == Some(FloorRole::Stacker) {
                return Ok(best_soft().map(|i| (i, Decision::Merge)));
            }
            return Ok(None);
        }

        if let Some(&i) = forced.first() {
            return Ok(Some((i, Decision::Move)));
        }
        Ok(best_soft().map(|i| (i, Decision::Move)))
    }

    fn record(&mut self, choice: Option<(usize, Decision)>) {
        if let Some((i, decision)) = choice {
            self.decided.insert(i, decision);
            self.order.push(i);
        }
    }

    fn candidates(&self, cell: Position) -> Vec<usize> {
        self.incoming.get(&cell).cloned().unwrap_or_default()
    }

    fn occupant_stays(&self, floor: &Floor, cell: Position) -> bool {
        floor.contains(cell)
            && self
                .outgoing
                .get(&cell)
                .is_none_or(|i| !self.decided.contains_key(i))
    }

    fn single(&mut self, floor: &Floor, cell: Position) -> Result<(), Fault> {
        let stays = self.occupant_stays(floor, cell);
        let choice = self.choose(cell, stays, &self.candidates(cell))?;
        self.record(choice);
        Ok(())
    }

    /// A closed ring of moves: every member's occupant moves to the next
    /// member.
    fn ring(&mut self, members: &[Position]) -> Result<(), Fault> {
        let member_set: HashSet<Position> = members.iter().copied().collect();
        let mut ring_moves = Vec::with_capacity(members.len());
        for &cell in members {
            match self.outgoing.get(&cell) {
                Some(&i) if member_set.contains(&self.moves[i].target()) => ring_moves.push(i),
                _ => {
                    return Err(Fault::internal_at(
                        "move ring has a member without a ring move",
                        members.iter().copied(),
                    ));
                }
            }
        }

        // Dry run: every member treated as vacated must pick its ring arrival.
        let mut holds = true;
        for &cell in members {
            let choice = self.choose(cell, false, &self.candidates(cell))?;
            let fed_by_ring = matches!(
                choice,
                Some((i, Decision::Move)) if ring_moves.contains(&i)
            );
            if !fed_by_ring {
                holds = false;
            }
        }

        if holds {
            for i in ring_moves {
                self.record(Some((i, Decision::Move)));
            }
            return Ok(());
        }

        if ring_moves.iter().any(|&i| self.moves[i].forced) {
            let mut cells: Vec<Position> = members.to_vec();
            cells.sort();
            return Err(Fault::Stop(Stop::new(StopReason::Collision, cells)));
        }

        // The ring stands still; outside arrivals see occupied cells.
        for &cell in members {
            let outside: Vec<usize> = self
                .candidates(cell)
                .into_iter()
                .filter(|i| !ring_moves.contains(i))
                .collect();
            let choice = self.choose(cell, true, &outside)?;
            self.record(choice);
        }
        Ok(())
    }
}

/// Commit one tick's moves to the floor.
pub fn resolve(floor: &mut Floor, layout: &FloorLayout, moves: Vec<Move>) -> Result<Resolution, Fault> {
    let mut resolution = Resolution::default();

    let mut sources = HashSet::new();
    for mv in &moves {
        if mv.spawned.is_some() {
            continue;
        }
        if !floor.contains(mv.from) {
            return Err(Fault::internal_at("move from an empty cell", [mv.from]));
        }
        if !sources.insert(mv.from) {
            return Err(Fault::internal_at("two moves from one cell", [mv.from]));
        }
    }

    // Exits leave before anything else is decided; other off-grid moves stop
    // the factory.
    let mut moves: Vec<Move> = {
        let mut on_grid = Vec::with_capacity(moves.len());
        for mv in moves {
            if layout.bounds().contains(mv.target()) {
                on_grid.push(mv);
                continue;
            }
            let exit = mv.spawned.is_none()
                && mv.direction == Direction::Down
                && layout
                    .cell(mv.from)
                    .is_some_and(|cell| cell.kind == ModuleKind::Output);
            if !exit {
                return Err(Fault::stop(StopReason::LeftFactory, mv.from));
            }
            if let Some(entity) = floor.take(mv.from) {
                resolution.exits.push((mv.from, entity));
            }
        }
        on_grid
    };

    let mut incoming: BTreeMap<Position, Vec<usize>> = BTreeMap::new();
    let mut outgoing = HashMap::new();
    let mut nodes = BTreeSet::new();
    for (i, mv) in moves.iter().enumerate() {
        incoming.entry(mv.target()).or_default().push(i);
        nodes.insert(mv.target());
        if mv.spawned.is_none() {
            outgoing.insert(mv.from, i);
            nodes.insert(mv.from);
        }
    }
    let nodes: Vec<Position> = nodes.into_iter().collect();

    let mut resolver = Resolver {
        layout,
        moves: &moves,
        incoming,
        outgoing,
        decided: HashMap::new(),
        order: Vec::new(),
    };
    let order = components(&nodes, |cell| {
        resolver
            .outgoing
            .get(&cell)
            .map(|&i| vec![moves[i].target()])
            .unwrap_or_default()
    });
    for component in order {
        match component.as_slice() {
            [cell] => resolver.single(floor, *cell)?,
            members => resolver.ring(members)?,
        }
    }

    let Resolver { decided, order, .. } = resolver;

    // Lift every mover off the floor, then set them down.
    let mut carried = Vec::with_capacity(order.len());
    for i in order {
        let mv = &mut moves[i];
        let entity = match mv.spawned.take() {
            Some(entity) => entity,
            None => floor
                .take(mv.from)
                .ok_or_else(|| Fault::internal_at("mover vanished", [mv.from]))?,
        };
        carried.push((mv.target(), decided[&i], entity));
    }

    let mut merges = Vec::new();
    for (target, decision, entity) in carried {
        match decision {
            Decision::Move => {
                floor.place(target, entity)?;
                resolution.arrivals.insert(target);
            }
            Decision::Merge => merges.push((target, entity)),
        }
    }
    for (target, entity) in merges {
        let reason = match layout.cell(target).map(|c| c.role) {
            Some(FloorRole::Stacker) => StopReason::CannotStack,
            _ => StopReason::Collision,
        };
        let host = floor
            .get_mut(target)
            .ok_or_else(|| Fault::internal_at("merge into an empty cell", [target]))?;
        host.merge(entity, Fault::stop(reason, target))?;
        resolution.merges.push(target);
    }

    Ok(resolution)
}
