//! Products that ride on the floor.
//!
//! An [`Entity`] is an owned value tree: a kind tag, the operations applied so
//! far, an optional single child, and a subtype-specific [`Body`]. Equality is
//! purely structural, with the normalization each body defines:
//!
//! - plain and single-child stacks compare top to bottom;
//! - multitrays compare their items as a multiset, burgers in order;
//! - cups compare fluid counts, chaat dough compares its sauce set;
//! - pizza dough compares its halves up to a left/right swap;
//! - the wing placeholder equals a cutlet or leg with the same history.

use crate::id::{EntityKind, PaintColor, PaintMask, Topping};
use crate::operation::Operation;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Stacking whitelist
// ---------------------------------------------------------------------------

fn is_burger_part(kind: EntityKind) -> bool {
    matches!(
        kind,
        EntityKind::Bun
            | EntityKind::BunBottom
            | EntityKind::BunTop
            | EntityKind::Meat
            | EntityKind::Cheese
            | EntityKind::Pickle
            | EntityKind::Tomato
    )
}

fn tray_accepts(kind: EntityKind) -> bool {
    !matches!(
        kind,
        EntityKind::Tray
            | EntityKind::Multitray
            | EntityKind::Lid
            | EntityKind::Roast
            | EntityKind::Ribs
            | EntityKind::Ice
            | EntityKind::Paper
            | EntityKind::Cigarette4x
            | EntityKind::Cigarette2x
            | EntityKind::Potato
            | EntityKind::Onion
            | EntityKind::Nori
            | EntityKind::Rice
            | EntityKind::Tuna
            | EntityKind::Salmon
            | EntityKind::TunaMaki4x
            | EntityKind::TunaMaki2x
            | EntityKind::TunaMaki
            | EntityKind::SalmonMaki4x
            | EntityKind::SalmonMaki2x
            | EntityKind::SalmonMaki
    )
}

/// Whether an entity of kind `top` may be stacked directly onto `base`.
pub fn can_stack(base: EntityKind, top: EntityKind) -> bool {
    use EntityKind as E;
    match base {
        E::Tray | E::Multitray => tray_accepts(top),
        E::Cup => matches!(top, E::Lid | E::Ice | E::Potato | E::Onion),
        E::Nori => top == E::Rice,
        E::Rice => matches!(top, E::Tuna | E::Salmon),
        E::Bowl => top == E::Rice,
        E::Plate => matches!(top, E::TunaMaki | E::SalmonMaki | E::Rice),
        b if is_burger_part(b) => is_burger_part(top),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

/// How many children a multi-child stack holds before it starts stacking onto
/// its existing children instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capacity {
    Unbounded,
    Fixed(usize),
    /// Two when holding rice, otherwise four.
    SushiPlate,
}

/// A bounded multi-child stack (multitrays, burgers, nori, plates, bowls).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiStack {
    items: Vec<Entity>,
    capacity: Capacity,
    /// Burgers compare layer by layer; everything else as a multiset.
    ordered: bool,
}

impl MultiStack {
    pub fn items(&self) -> &[Entity] {
        &self.items
    }

    pub fn capacity(&self) -> Option<usize> {
        match self.capacity {
            Capacity::Unbounded => None,
            Capacity::Fixed(n) => Some(n),
            Capacity::SushiPlate => {
                if self.items.iter().any(|e| e.kind == EntityKind::Rice) {
                    Some(2)
                } else {
                    Some(4)
                }
            }
        }
    }

    fn stack(&mut self, owner: EntityKind, mut other: Entity) -> Result<(), Entity> {
        if let Some(cap) = self.capacity()
            && self.items.len() >= cap
        {
            for item in &mut self.items {
                match item.stack(other) {
                    Ok(()) => return Ok(()),
                    Err(rejected) => other = rejected,
                }
            }
            return Err(other);
        }
        if !can_stack(owner, other.kind) {
            return Err(other);
        }
        self.items.push(other);
        Ok(())
    }
}

impl PartialEq for MultiStack {
    fn eq(&self, other: &Self) -> bool {
        if self.items.len() != other.items.len() {
            return false;
        }
        if self.ordered || other.ordered {
            return self.items == other.items;
        }
        // Multiset match; greedy is exact because placeholders only appear on
        // one side of a comparison.
        let mut used = vec![false; other.items.len()];
        'outer: for item in &self.items {
            for (j, candidate) in other.items.iter().enumerate() {
                if !used[j] && item == candidate {
                    used[j] = true;
                    continue 'outer;
                }
            }
            return false;
        }
        true
    }
}

/// Fluid contents of a cup, plus its optional paint bands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CupBody {
    fluids: BTreeMap<Topping, u32>,
    capacity: u32,
    paint: Option<[PaintColor; 3]>,
}

impl CupBody {
    pub fn fluids(&self) -> &BTreeMap<Topping, u32> {
        &self.fluids
    }

    pub fn volume(&self) -> u32 {
        self.fluids.values().sum()
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn paint(&self) -> Option<&[PaintColor; 3]> {
        self.paint.as_ref()
    }

    /// Add one unit; `false` if the cup is already full.
    pub fn add_fluid(&mut self, fluid: Topping) -> bool {
        if self.volume() >= self.capacity {
            return false;
        }
        *self.fluids.entry(fluid).or_insert(0) += 1;
        true
    }

    /// Remove one unit; `false` if the cup holds none of `fluid`.
    pub fn remove_fluid(&mut self, fluid: Topping) -> bool {
        match self.fluids.get_mut(&fluid) {
            Some(count) => {
                *count -= 1;
                if *count == 0 {
                    self.fluids.remove(&fluid);
                }
                true
            }
            None => false,
        }
    }

    /// Paint the masked bands; `false` if this cup is not paintable.
    pub fn apply_paint(&mut self, mask: PaintMask, color: PaintColor) -> bool {
        let Some(bands) = self.paint.as_mut() else {
            return false;
        };
        for &band in mask.bands() {
            bands[band] = color;
        }
        true
    }
}

impl PartialEq for CupBody {
    fn eq(&self, other: &Self) -> bool {
        self.fluids == other.fluids && self.paint == other.paint
    }
}

/// Subtype-specific payload of an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Body {
    Plain,
    Multi(MultiStack),
    Cup(CupBody),
    Chaat {
        sauces: BTreeSet<Topping>,
    },
    Pizza {
        left: BTreeSet<Topping>,
        right: BTreeSet<Topping>,
    },
    /// Stand-in used only in order targets.
    Placeholder,
}

impl PartialEq for Body {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Body::Plain, Body::Plain) | (Body::Placeholder, Body::Placeholder) => true,
            (Body::Multi(a), Body::Multi(b)) => a == b,
            (Body::Cup(a), Body::Cup(b)) => a == b,
            (Body::Chaat { sauces: a }, Body::Chaat { sauces: b }) => a == b,
            (
                Body::Pizza {
                    left: l1,
                    right: r1,
                },
                Body::Pizza {
                    left: l2,
                    right: r2,
                },
            ) => (l1 == l2 && r1 == r2) || (l1 == r2 && r1 == l2),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A product node. Children are owned; stacking moves ownership into the
/// parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub operations: Vec<Operation>,
    pub child: Option<Box<Entity>>,
    pub body: Body,
}

impl Entity {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            operations: Vec::new(),
            child: None,
            body: Body::Plain,
        }
    }

    fn multi(kind: EntityKind, capacity: Capacity, ordered: bool) -> Self {
        Self {
            body: Body::Multi(MultiStack {
                items: Vec::new(),
                capacity,
                ordered,
            }),
            ..Self::new(kind)
        }
    }

    pub fn tray() -> Self {
        Self::new(EntityKind::Tray)
    }

    pub fn multitray() -> Self {
        Self::multi(EntityKind::Multitray, Capacity::Unbounded, false)
    }

    /// A burger, built on its bottom bun. Layer order matters.
    pub fn burger() -> Self {
        Self::multi(EntityKind::BunBottom, Capacity::Unbounded, true)
    }

    pub fn nori() -> Self {
        Self::multi(EntityKind::Nori, Capacity::Fixed(2), false)
    }

    pub fn sushi_plate() -> Self {
        Self::multi(EntityKind::Plate, Capacity::SushiPlate, false)
    }

    pub fn sushi_bowl() -> Self {
        Self::multi(EntityKind::Bowl, Capacity::Fixed(2), false)
    }

    pub fn cup(capacity: u32) -> Self {
        Self {
            body: Body::Cup(CupBody {
                fluids: BTreeMap::new(),
                capacity,
                paint: None,
            }),
            ..Self::new(EntityKind::Cup)
        }
    }

    /// A cup with three paint bands, initially white.
    pub fn paintable_cup(capacity: u32) -> Self {
        Self {
            body: Body::Cup(CupBody {
                fluids: BTreeMap::new(),
                capacity,
                paint: Some([PaintColor::White; 3]),
            }),
            ..Self::new(EntityKind::Cup)
        }
    }

    pub fn chaat_dough() -> Self {
        Self {
            body: Body::Chaat {
                sauces: BTreeSet::new(),
            },
            ..Self::new(EntityKind::Dough)
        }
    }

    pub fn pizza_dough() -> Self {
        Self {
            body: Body::Pizza {
                left: BTreeSet::new(),
                right: BTreeSet::new(),
            },
            ..Self::new(EntityKind::Dough)
        }
    }

    /// Order-target stand-in matching either a chicken cutlet or leg.
    pub fn wing_placeholder() -> Self {
        Self {
            body: Body::Placeholder,
            ..Self::new(EntityKind::WingPlaceholder)
        }
    }

    // -- builder-style helpers, mostly for order targets and tests --

    pub fn with_operations(mut self, operations: impl IntoIterator<Item = Operation>) -> Self {
        self.operations.extend(operations);
        self
    }

    pub fn with_child(mut self, child: Entity) -> Self {
        self.child = Some(Box::new(child));
        self
    }

    /// Append items to a multi-child stack without whitelist checks.
    pub fn with_items(mut self, items: impl IntoIterator<Item = Entity>) -> Self {
        if let Body::Multi(multi) = &mut self.body {
            multi.items.extend(items);
        }
        self
    }

    pub fn with_fluids(mut self, fluids: impl IntoIterator<Item = (Topping, u32)>) -> Self {
        if let Body::Cup(cup) = &mut self.body {
            for (fluid, count) in fluids {
                if count > 0 {
                    *cup.fluids.entry(fluid).or_insert(0) += count;
                }
            }
        }
        self
    }

    pub fn with_paint(mut self, bands: [PaintColor; 3]) -> Self {
        if let Body::Cup(cup) = &mut self.body {
            cup.paint = Some(bands);
        }
        self
    }

    pub fn with_sauces(mut self, toppings: impl IntoIterator<Item = Topping>) -> Self {
        if let Body::Chaat { sauces } = &mut self.body {
            sauces.extend(toppings);
        }
        self
    }

    pub fn with_halves(
        mut self,
        left_toppings: impl IntoIterator<Item = Topping>,
        right_toppings: impl IntoIterator<Item = Topping>,
    ) -> Self {
        if let Body::Pizza { left, right } = &mut self.body {
            left.extend(left_toppings);
            right.extend(right_toppings);
        }
        self
    }

    // -- stacking --

    /// Try to stack `other` onto this entity. On failure the rejected entity
    /// is handed back unchanged.
    pub fn stack(&mut self, other: Entity) -> Result<(), Entity> {
        let kind = self.kind;
        match &mut self.body {
            Body::Multi(multi) => multi.stack(kind, other),
            Body::Placeholder => Err(other),
            _ => match &mut self.child {
                Some(child) => child.stack(other),
                None if can_stack(kind, other.kind) => {
                    self.child = Some(Box::new(other));
                    Ok(())
                }
                None => Err(other),
            },
        }
    }

    /// Merge `other` into this entity, raising `error` if it cannot be stacked.
    pub fn merge<E>(&mut self, other: Entity, error: E) -> Result<(), E> {
        self.stack(other).map_err(|_| error)
    }

    // -- accessors --

    pub fn items(&self) -> &[Entity] {
        match &self.body {
            Body::Multi(multi) => multi.items(),
            _ => &[],
        }
    }

    pub fn cup_body(&self) -> Option<&CupBody> {
        match &self.body {
            Body::Cup(cup) => Some(cup),
            _ => None,
        }
    }

    pub fn cup_body_mut(&mut self) -> Option<&mut CupBody> {
        match &mut self.body {
            Body::Cup(cup) => Some(cup),
            _ => None,
        }
    }

    pub fn is_pizza(&self) -> bool {
        matches!(self.body, Body::Pizza { .. })
    }

    pub fn is_chaat(&self) -> bool {
        matches!(self.body, Body::Chaat { .. })
    }

    /// Add a sauce to chaat dough. `Some(false)` if it already has it,
    /// `None` if this is not chaat dough.
    pub fn add_sauce(&mut self, sauce: Topping) -> Option<bool> {
        match &mut self.body {
            Body::Chaat { sauces } => Some(sauces.insert(sauce)),
            _ => None,
        }
    }

    /// Put a topping on pizza dough, on the left half only or on both.
    /// `false` if this is not pizza dough.
    pub fn add_pizza_topping(&mut self, topping: Topping, left_only: bool) -> bool {
        match &mut self.body {
            Body::Pizza { left, right } => {
                left.insert(topping);
                if !left_only {
                    right.insert(topping);
                }
                true
            }
            _ => false,
        }
    }

    /// Swap pizza halves. `false` if this is not pizza dough.
    pub fn rotate_halves(&mut self) -> bool {
        match &mut self.body {
            Body::Pizza { left, right } => {
                std::mem::swap(left, right);
                true
            }
            _ => false,
        }
    }

    /// The entity a machine acts on: the contents of a plain tray, or the
    /// entity itself.
    pub fn target_mut(&mut self) -> &mut Entity {
        match self {
            Entity {
                kind: EntityKind::Tray,
                body: Body::Plain,
                child: Some(child),
                ..
            } => &mut **child,
            other => other,
        }
    }

    fn matches_placeholder(&self, placeholder: &Entity) -> bool {
        matches!(self.kind, EntityKind::ChickenCutlet | EntityKind::ChickenLeg)
            && matches!(self.body, Body::Plain)
            && self.child.is_none()
            && self.operations == placeholder.operations
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        match (&self.body, &other.body) {
            (Body::Placeholder, Body::Placeholder) => {
                self.kind == other.kind && self.operations == other.operations
            }
            (Body::Placeholder, _) => other.matches_placeholder(self),
            (_, Body::Placeholder) => self.matches_placeholder(other),
            _ => {
                self.kind == other.kind
                    && self.operations == other.operations
                    && self.child == other.child
                    && self.body == other.body
            }
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.operations.is_empty() {
            let ops: Vec<String> = self.operations.iter().map(|op| op.to_string()).collect();
            write!(f, "{{{}}}", ops.join(", "))?;
        }
        match &self.body {
            Body::Cup(cup) if !cup.fluids.is_empty() => {
                let fluids: Vec<String> =
                    cup.fluids.iter().map(|(t, n)| format!("{t}x{n}")).collect();
                write!(f, "<{}>", fluids.join(" "))?;
            }
            Body::Chaat { sauces } if !sauces.is_empty() => {
                let names: Vec<&str> = sauces.iter().map(|s| s.name()).collect();
                write!(f, "<{}>", names.join(" "))?;
            }
            Body::Pizza { left, right } => {
                let l: Vec<&str> = left.iter().map(|s| s.name()).collect();
                let r: Vec<&str> = right.iter().map(|s| s.name()).collect();
                write!(f, "<{} | {}>", l.join(" "), r.join(" "))?;
            }
            Body::Multi(multi) if !multi.items.is_empty() => {
                let items: Vec<String> = multi.items.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", items.join(", "))?;
            }
            _ => {}
        }
        if let Some(child) = &self.child {
            write!(f, " / {child}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Equality
    // -----------------------------------------------------------------------

    #[test]
    fn plain_equality_is_structural() {
        let a = Entity::tray().with_child(
            Entity::new(EntityKind::Nacho).with_operations([Operation::DispenseFluid(Topping::Cheese)]),
        );
        let b = a.clone();
        assert_eq!(a, b);

        let bare = Entity::tray().with_child(Entity::new(EntityKind::Nacho));
        assert_ne!(a, bare);
    }

    #[test]
    fn operation_order_matters() {
        let a = Entity::new(EntityKind::Dough).with_operations([Operation::Dock, Operation::CookFryer]);
        let b = Entity::new(EntityKind::Dough).with_operations([Operation::CookFryer, Operation::Dock]);
        assert_ne!(a, b);
    }

    #[test]
    fn pizza_halves_may_swap() {
        let a = Entity::pizza_dough().with_halves([Topping::Meat], [Topping::Veggie]);
        let b = Entity::pizza_dough().with_halves([Topping::Veggie], [Topping::Meat]);
        assert_eq!(a, b);
        assert_eq!(b, a);

        let c = Entity::pizza_dough().with_halves([Topping::Meat, Topping::Veggie], []);
        assert_ne!(a, c);
    }

    #[test]
    fn chaat_sauces_are_a_set() {
        let a = Entity::chaat_dough().with_sauces([Topping::Tomato, Topping::Mint, Topping::Yogurt]);
        let b = Entity::chaat_dough().with_sauces([Topping::Yogurt, Topping::Tomato, Topping::Mint]);
        assert_eq!(a, b);
    }

    #[test]
    fn burger_layers_are_ordered() {
        let a = Entity::burger().with_items([
            Entity::new(EntityKind::Meat),
            Entity::new(EntityKind::Cheese),
            Entity::new(EntityKind::Pickle),
            Entity::new(EntityKind::BunTop),
        ]);
        let b = Entity::burger().with_items([
            Entity::new(EntityKind::Meat),
            Entity::new(EntityKind::Pickle),
            Entity::new(EntityKind::Cheese),
            Entity::new(EntityKind::BunTop),
        ]);
        assert_ne!(a, b);
    }

    #[test]
    fn multitray_items_are_a_multiset() {
        let a = Entity::multitray().with_items([
            Entity::new(EntityKind::Tender),
            Entity::new(EntityKind::Choco),
            Entity::new(EntityKind::Tender),
        ]);
        let b = Entity::multitray().with_items([
            Entity::new(EntityKind::Choco),
            Entity::new(EntityKind::Tender),
            Entity::new(EntityKind::Tender),
        ]);
        let c = Entity::multitray().with_items([
            Entity::new(EntityKind::Choco),
            Entity::new(EntityKind::Choco),
            Entity::new(EntityKind::Tender),
        ]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn cup_compares_fluid_counts_not_capacity() {
        let a = Entity::cup(4).with_fluids([(Topping::Coffee, 1), (Topping::Water, 3)]);
        let b = Entity::cup(5).with_fluids([(Topping::Water, 3), (Topping::Coffee, 1)]);
        assert_eq!(a, b);

        let painted = Entity::paintable_cup(4).with_fluids([(Topping::Coffee, 1), (Topping::Water, 3)]);
        assert_ne!(a, painted);
    }

    #[test]
    fn placeholder_matches_cutlet_or_leg() {
        let ops = [Operation::CookFryer, Operation::CookFryer, Operation::CoatFluid(Topping::Sauce)];
        let target = Entity::wing_placeholder().with_operations(ops);
        let leg = Entity::new(EntityKind::ChickenLeg).with_operations(ops);
        let cutlet = Entity::new(EntityKind::ChickenCutlet).with_operations(ops);
        let half = Entity::new(EntityKind::ChickenHalf).with_operations(ops);
        assert_eq!(target, leg);
        assert_eq!(cutlet, target);
        assert_ne!(target, half);

        let raw_leg = Entity::new(EntityKind::ChickenLeg);
        assert_ne!(target, raw_leg);
    }

    #[test]
    fn placeholder_multitray_matches_mixed_wings() {
        let ops = [Operation::CookFryer, Operation::CookFryer, Operation::CoatFluid(Topping::Sauce)];
        let target = Entity::multitray()
            .with_items(std::iter::repeat_n(Entity::wing_placeholder().with_operations(ops), 3));
        let actual = Entity::multitray().with_items([
            Entity::new(EntityKind::ChickenLeg).with_operations(ops),
            Entity::new(EntityKind::ChickenCutlet).with_operations(ops),
            Entity::new(EntityKind::ChickenLeg).with_operations(ops),
        ]);
        assert_eq!(actual, target);
    }

    // -----------------------------------------------------------------------
    // Stacking
    // -----------------------------------------------------------------------

    #[test]
    fn tray_accepts_one_product_then_recurses() {
        let mut tray = Entity::tray();
        assert!(tray.stack(Entity::cup(2)).is_ok());
        // The second item goes onto the cup.
        assert!(tray.stack(Entity::new(EntityKind::Lid)).is_ok());
        let cup = tray.child.as_deref().unwrap();
        assert_eq!(cup.kind, EntityKind::Cup);
        assert_eq!(cup.child.as_deref().unwrap().kind, EntityKind::Lid);
    }

    #[test]
    fn whitelist_rejection_returns_entity() {
        let mut tray = Entity::tray();
        let rejected = tray.stack(Entity::new(EntityKind::Roast)).unwrap_err();
        assert_eq!(rejected.kind, EntityKind::Roast);
        assert!(tray.child.is_none());
    }

    #[test]
    fn trays_do_not_stack_on_trays() {
        let mut tray = Entity::tray();
        assert!(tray.stack(Entity::tray()).is_err());
        assert!(tray.stack(Entity::multitray()).is_err());
    }

    #[test]
    fn merge_maps_failure_to_error() {
        let mut nacho = Entity::new(EntityKind::Nacho);
        let result = nacho.merge(Entity::tray(), "collided");
        assert_eq!(result, Err("collided"));
    }

    #[test]
    fn nori_at_capacity_stacks_onto_children() {
        let mut nori = Entity::nori();
        nori.stack(Entity::new(EntityKind::Rice)).unwrap();
        nori.stack(Entity::new(EntityKind::Rice)).unwrap();
        assert_eq!(nori.items().len(), 2);

        // Full: fish goes onto the first rice, then the second.
        nori.stack(Entity::new(EntityKind::Tuna)).unwrap();
        nori.stack(Entity::new(EntityKind::Tuna)).unwrap();
        assert_eq!(nori.items().len(), 2);
        assert!(nori.items().iter().all(|rice| rice.child.is_some()));

        // Everything is full now.
        let rejected = nori.stack(Entity::new(EntityKind::Salmon));
        assert!(rejected.is_err());
        assert_eq!(nori.items().len(), 2);
    }

    #[test]
    fn sushi_plate_capacity_depends_on_rice() {
        let mut plate = Entity::sushi_plate();
        plate.stack(Entity::new(EntityKind::Rice)).unwrap();
        plate.stack(Entity::new(EntityKind::Rice)).unwrap();
        // Capacity two once rice is present; a third rice must recurse and fail.
        assert!(plate.stack(Entity::new(EntityKind::Rice)).is_err());
        assert_eq!(plate.items().len(), 2);

        let mut maki = Entity::sushi_plate();
        for _ in 0..4 {
            maki.stack(Entity::new(EntityKind::TunaMaki)).unwrap();
        }
        assert!(maki.stack(Entity::new(EntityKind::TunaMaki)).is_err());
    }

    #[test]
    fn burger_builds_in_order() {
        let mut burger = Entity::burger();
        burger.stack(Entity::new(EntityKind::Meat)).unwrap();
        burger.stack(Entity::new(EntityKind::Cheese)).unwrap();
        burger.stack(Entity::new(EntityKind::BunTop)).unwrap();
        let kinds: Vec<EntityKind> = burger.items().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EntityKind::Meat, EntityKind::Cheese, EntityKind::BunTop]);
        assert!(burger.stack(Entity::new(EntityKind::Nacho)).is_err());
    }

    // -----------------------------------------------------------------------
    // Mutation helpers
    // -----------------------------------------------------------------------

    #[test]
    fn cup_capacity_is_enforced() {
        let mut cup = Entity::cup(2);
        let body = cup.cup_body_mut().unwrap();
        assert!(body.add_fluid(Topping::Cola));
        assert!(body.add_fluid(Topping::Cola));
        assert!(!body.add_fluid(Topping::Cola));
        assert_eq!(body.volume(), 2);
        assert!(body.remove_fluid(Topping::Cola));
        assert!(!body.remove_fluid(Topping::Milk));
    }

    #[test]
    fn steaming_replaces_milk_with_foam() {
        let mut latte = Entity::cup(4).with_fluids([(Topping::Coffee, 1), (Topping::Milk, 3)]);
        let body = latte.cup_body_mut().unwrap();
        assert!(body.remove_fluid(Topping::Milk));
        assert!(body.add_fluid(Topping::Foam));
        let expected = Entity::cup(4).with_fluids([(Topping::Coffee, 1), (Topping::Milk, 2), (Topping::Foam, 1)]);
        assert_eq!(latte, expected);
    }

    #[test]
    fn target_of_tray_is_its_contents() {
        let mut tray = Entity::tray().with_child(Entity::new(EntityKind::Pocket));
        tray.target_mut().operations.push(Operation::CookMicrowave);
        assert_eq!(tray.child.as_deref().unwrap().operations, vec![Operation::CookMicrowave]);

        let mut empty = Entity::tray();
        assert_eq!(empty.target_mut().kind, EntityKind::Tray);

        let mut multi = Entity::multitray().with_items([Entity::new(EntityKind::Pelmeni)]);
        assert_eq!(multi.target_mut().kind, EntityKind::Multitray);
    }

    #[test]
    fn target_of_bare_product_is_itself() {
        let mut pocket = Entity::new(EntityKind::Pocket);
        pocket.target_mut().operations.push(Operation::CookMicrowave);
        assert_eq!(pocket.operations, vec![Operation::CookMicrowave]);

        // Only the outer tray is unwrapped.
        let mut nested = Entity::tray().with_child(Entity::tray().with_child(Entity::new(EntityKind::Nacho)));
        let target = nested.target_mut();
        assert_eq!(target.kind, EntityKind::Tray);
        assert_eq!(target.child.as_deref().map(|c| c.kind), Some(EntityKind::Nacho));
    }

    #[test]
    fn painting_and_rotation() {
        let mut cup = Entity::paintable_cup(2);
        assert!(cup.cup_body_mut().unwrap().apply_paint(PaintMask::Lower1, PaintColor::Blue));
        assert_eq!(
            cup.cup_body().unwrap().paint(),
            Some(&[PaintColor::White, PaintColor::White, PaintColor::Blue])
        );
        assert!(!Entity::cup(2).cup_body_mut().unwrap().apply_paint(PaintMask::Upper1, PaintColor::Red));

        let mut pizza = Entity::pizza_dough();
        assert!(pizza.add_pizza_topping(Topping::Meat, true));
        assert!(pizza.rotate_halves());
        assert_eq!(pizza, Entity::pizza_dough().with_halves([], [Topping::Meat]));
        assert!(!Entity::new(EntityKind::Nacho).rotate_halves());
    }

    #[test]
    fn chaat_rejects_duplicate_sauce() {
        let mut dough = Entity::chaat_dough();
        assert_eq!(dough.add_sauce(Topping::Mint), Some(true));
        assert_eq!(dough.add_sauce(Topping::Mint), Some(false));
        assert_eq!(Entity::new(EntityKind::Nacho).add_sauce(Topping::Mint), None);
    }

    #[test]
    fn display_is_readable() {
        let e = Entity::tray().with_child(
            Entity::new(EntityKind::Nacho).with_operations([Operation::DispenseFluid(Topping::Cheese)]),
        );
        assert_eq!(e.to_string(), "TRAY / NACHO{DispenseFluid(CHEESE)}");
    }
}
