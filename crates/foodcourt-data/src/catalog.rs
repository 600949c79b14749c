//! The reference puzzle set: all 21 levels with their order signals, input
//! templates, target products and the rule tables for slicers and rollers.
//!
//! Levels are built fresh on every call; callers own what they get back.

use foodcourt_core::entity::Entity;
use foodcourt_core::id::{EntityKind as E, LevelId, ModuleKind, PaintColor, Topping as T};
use foodcourt_core::level::{Level, ModuleLimit, Order, RollRule, SliceRule};
use foodcourt_core::operation::Operation;
use foodcourt_core::operation::Operation::{CookFryer, CookGrill, CookMicrowave, Dock, Flatten};

// ===========================================================================
// Lookup
// ===========================================================================

/// Every level, in in-game order.
pub fn levels() -> Vec<Level> {
    LevelId::ALL.iter().map(|&id| level(id)).collect()
}

/// In-game number, starting from 1.
pub fn number(id: LevelId) -> u32 {
    LevelId::ALL
        .iter()
        .position(|&other| other == id)
        .map_or(0, |index| index as u32 + 1)
}

pub fn by_number(number: u32) -> Option<Level> {
    let index = usize::try_from(number).ok()?.checked_sub(1)?;
    LevelId::ALL.get(index).map(|&id| level(id))
}

/// File-name prefix for a level: lower case, spaces to dashes, no apostrophes.
pub fn slug(id: LevelId) -> String {
    id.name().to_lowercase().replace(' ', "-").replace('\'', "")
}

/// Find a level by display name (case-insensitive) or slug.
pub fn by_name(name: &str) -> Option<Level> {
    LevelId::ALL
        .iter()
        .copied()
        .find(|&id| id.name().eq_ignore_ascii_case(name) || slug(id) == name)
        .map(level)
}

pub fn level(id: LevelId) -> Level {
    match id {
        LevelId::TwoTwelve => two_twelve(),
        LevelId::HotPocket => hot_pocket(),
        LevelId::WineOClock => wine_o_clock(),
        LevelId::MumbaiChaat => mumbai_chaat(),
        LevelId::MrChilly => mr_chilly(),
        LevelId::Kazan => kazan(),
        LevelId::SodaTrench => soda_trench(),
        LevelId::RosiesDoughnuts => rosies_doughnuts(),
        LevelId::OnTheFriedSide => on_the_fried_side(),
        LevelId::SweetHeatBbq => sweet_heat_bbq(),
        LevelId::TheWalrus => the_walrus(),
        LevelId::Meat3 => meat_3(),
        LevelId::CafeTriste => cafe_triste(),
        LevelId::TheCommissary => the_commissary(),
        LevelId::DaWings => da_wings(),
        LevelId::BreaksideGrill => breakside_grill(),
        LevelId::ChazCheddar => chaz_cheddar(),
        LevelId::HalfCaffCoffee => half_caff_coffee(),
        LevelId::MildredsNook => mildreds_nook(),
        LevelId::Bellys => bellys(),
        LevelId::SushiYeah => sushi_yeah(),
    }
}

// ===========================================================================
// Helpers
// ===========================================================================

fn base(
    id: LevelId,
    signals: &[&str],
    entity_inputs: Vec<Vec<Entity>>,
    topping_inputs: Vec<Vec<T>>,
    multi: bool,
) -> Level {
    let mut level = Level::new(id, number(id));
    level.order_signal_names = signals.iter().map(|s| s.to_string()).collect();
    level.entity_inputs = entity_inputs;
    level.topping_inputs = topping_inputs;
    level.multi = multi;
    level
}

fn plain(kinds: &[E]) -> Vec<Entity> {
    kinds.iter().map(|&kind| Entity::new(kind)).collect()
}

fn tray(product: Entity) -> Entity {
    Entity::tray().with_child(product)
}

fn multitray(items: impl IntoIterator<Item = Entity>) -> Entity {
    Entity::multitray().with_items(items)
}

fn cooked(kind: E, operation: Operation, times: usize) -> Entity {
    Entity::new(kind).with_operations(std::iter::repeat_n(operation, times))
}

fn copies(entity: Entity, count: usize) -> impl Iterator<Item = Entity> {
    std::iter::repeat_n(entity, count)
}

/// A signal vector of length `n` with only position `i` set.
fn ith_true(i: usize, n: usize) -> Vec<bool> {
    (0..n).map(|j| j == i).collect()
}

fn order(signals: Vec<bool>, product: Entity) -> Order {
    Order { signals, product }
}

fn slice(slicer: ModuleKind, input: Entity, outputs: impl IntoIterator<Item = Entity>) -> SliceRule {
    SliceRule {
        slicer,
        input,
        outputs: outputs.into_iter().collect(),
    }
}

/// Double slicer rules halving `4x -> 2x -> 1x`.
fn halving(four: E, two: E, one: E) -> [SliceRule; 2] {
    [
        slice(ModuleKind::DoubleSlicer, Entity::new(four), plain(&[two, two])),
        slice(ModuleKind::DoubleSlicer, Entity::new(two), plain(&[one, one])),
    ]
}

fn nigiri(fish: E) -> Entity {
    Entity::new(E::Rice).with_child(Entity::new(fish))
}

// ===========================================================================
// Levels
// ===========================================================================

fn two_twelve() -> Level {
    let mut level = base(
        LevelId::TwoTwelve,
        &["NACHO", "PRETZEL"],
        vec![plain(&[E::Nacho]), plain(&[E::Pretzel])],
        vec![vec![T::Cheese]],
        false,
    );
    level.orders = vec![
        order(
            vec![true, false],
            tray(Entity::new(E::Nacho).with_operations([Operation::DispenseFluid(T::Cheese)])),
        ),
        order(vec![false, true], tray(Entity::new(E::Pretzel))),
    ];
    level
}

fn hot_pocket() -> Level {
    let mut level = base(LevelId::HotPocket, &["POCKET"], vec![plain(&[E::Pocket])], vec![], false);
    level.orders = vec![order(vec![true], tray(cooked(E::Pocket, CookMicrowave, 4)))];
    level
}

fn wine_o_clock() -> Level {
    let mut level = base(
        LevelId::WineOClock,
        &["RED", "WHITE"],
        vec![plain(&[E::Glass])],
        vec![vec![T::Red, T::White]],
        false,
    );
    level.orders = [T::Red, T::White]
        .into_iter()
        .enumerate()
        .map(|(i, wine)| order(ith_true(i, 2), tray(cooked(E::Glass, Operation::DispenseFluid(wine), 2))))
        .collect();
    level
}

fn mumbai_chaat() -> Level {
    let mut level = base(
        LevelId::MumbaiChaat,
        &["POORI", "PAPDI"],
        vec![vec![Entity::chaat_dough()]],
        vec![vec![T::Tomato, T::Mint, T::Yogurt]],
        false,
    );
    level.orders = [false, true]
        .into_iter()
        .enumerate()
        .map(|(i, docked)| {
            let mut ops = Vec::new();
            if docked {
                ops.push(Dock);
            }
            ops.extend([CookFryer, CookFryer]);
            let chaat = Entity::chaat_dough()
                .with_operations(ops)
                .with_sauces([T::Tomato, T::Mint, T::Yogurt]);
            order(ith_true(i, 2), tray(chaat))
        })
        .collect();
    level
}

fn mr_chilly() -> Level {
    let mut level = base(
        LevelId::MrChilly,
        &["CHOCO", "VANILLA", "TWIST", "SMALL", "MEDIUM", "LARGE"],
        vec![plain(&[E::Cone])],
        vec![vec![T::Choco, T::Vanilla]],
        false,
    );
    let flavors = [
        Operation::DispenseFluid(T::Choco),
        Operation::DispenseFluid(T::Vanilla),
        Operation::DispenseFluidMixed(T::Choco, T::Vanilla),
    ];
    for (i, flavor) in flavors.into_iter().enumerate() {
        for (j, size) in [2, 3, 4].into_iter().enumerate() {
            let signals = [ith_true(i, 3), ith_true(j, 3)].concat();
            level.orders.push(order(signals, tray(cooked(E::Cone, flavor, size))));
        }
    }
    level
}

fn kazan() -> Level {
    let mut level = base(
        LevelId::Kazan,
        &["1 PC.", "3 PCS.", "6 PCS.", "10 PCS.", "15 PCS.", "21 PCS."],
        vec![plain(&[E::Pelmeni])],
        vec![],
        true,
    );
    level.orders = [1, 3, 6, 10, 15, 21]
        .into_iter()
        .enumerate()
        .map(|(i, count)| order(ith_true(i, 6), multitray(copies(Entity::new(E::Pelmeni), count))))
        .collect();
    level
}

fn soda_trench() -> Level {
    let mut level = base(
        LevelId::SodaTrench,
        &["COKE", "DIET C.", "PEPSI", "DIET P."],
        vec![vec![Entity::paintable_cup(2), Entity::new(E::Lid)]],
        vec![vec![T::Cola]],
        false,
    );
    let mut i = 0;
    for bottom in [PaintColor::Red, PaintColor::Blue] {
        for top in [PaintColor::Red, PaintColor::White] {
            let cup = Entity::paintable_cup(2)
                .with_child(Entity::new(E::Lid))
                .with_fluids([(T::Cola, 2)])
                .with_paint([top, PaintColor::White, bottom]);
            level.orders.push(order(ith_true(i, 4), tray(cup)));
            i += 1;
        }
    }
    level
}

fn rosies_doughnuts() -> Level {
    let mut level = base(
        LevelId::RosiesDoughnuts,
        &["ONE", "SIX", "DOZEN", "PLAIN", "CHOCO", "BERRY"],
        vec![plain(&[E::Dough])],
        vec![vec![T::Choco], vec![T::Berry], vec![T::Candy]],
        true,
    );
    let glazes: [&[Operation]; 3] = [
        &[],
        &[Operation::CoatFluid(T::Choco), Operation::DispenseTopping(T::Candy)],
        &[Operation::CoatFluid(T::Berry), Operation::DispenseTopping(T::Candy)],
    ];
    for (i, glaze) in glazes.into_iter().enumerate() {
        for (j, count) in [1, 6, 12].into_iter().enumerate() {
            let doughnut = cooked(E::Dough, CookFryer, 2).with_operations(glaze.iter().copied());
            let signals = [ith_true(i, 3), ith_true(j, 3)].concat();
            level.orders.push(order(signals, multitray(copies(doughnut, count))));
        }
    }
    level
}

/// Chickens split into a half between two legs; halves split into cutlets.
fn chicken_rules() -> Vec<SliceRule> {
    vec![
        slice(
            ModuleKind::TripleSlicer,
            Entity::new(E::Chicken),
            plain(&[E::ChickenLeg, E::ChickenHalf, E::ChickenLeg]),
        ),
        slice(
            ModuleKind::TripleSlicer,
            Entity::new(E::ChickenHalf),
            plain(&[E::ChickenCutlet, E::ChickenCutlet, E::ChickenCutlet]),
        ),
    ]
}

fn on_the_fried_side() -> Level {
    let mut level = base(
        LevelId::OnTheFriedSide,
        &["WHOLE", "HALF", "CUTLET", "LEG"],
        vec![plain(&[E::Chicken])],
        vec![vec![T::Breading]],
        false,
    );
    let pieces = [(E::Chicken, 8), (E::ChickenHalf, 8), (E::ChickenCutlet, 4), (E::ChickenLeg, 4)];
    level.orders = pieces
        .into_iter()
        .enumerate()
        .map(|(i, (kind, fry))| {
            let piece = Entity::new(kind)
                .with_operations([Operation::CoatFluid(T::Breading)])
                .with_operations(std::iter::repeat_n(CookFryer, fry));
            order(ith_true(i, 4), tray(piece))
        })
        .collect();
    level.slice_rules = chicken_rules();
    level
}

fn sweet_heat_bbq() -> Level {
    let mut level = base(
        LevelId::SweetHeatBbq,
        &["ROAST", "RIBS", "200G", "400G", "600G"],
        vec![plain(&[E::Roast, E::Ribs])],
        vec![],
        true,
    );
    for (i, cut) in [E::RoastSlice, E::RibsSlice].into_iter().enumerate() {
        for (j, weight) in (1..=3).enumerate() {
            let count = if cut == E::RibsSlice { weight } else { 2 * weight };
            let signals = [ith_true(i, 2), ith_true(j, 3)].concat();
            level.orders.push(order(signals, multitray(copies(Entity::new(cut), count))));
        }
    }
    level.slice_rules = vec![
        slice(ModuleKind::DoubleSlicer, Entity::new(E::Roast), plain(&[E::RoastSlice, E::RoastSlice])),
        slice(ModuleKind::DoubleSlicer, Entity::new(E::Ribs), plain(&[E::RibsSlice, E::RibsSlice])),
    ];
    level.module_limits = vec![ModuleLimit {
        kind: ModuleKind::WasteBin,
        max: 2,
    }];
    level
}

fn the_walrus() -> Level {
    let mut level = base(
        LevelId::TheWalrus,
        &["WHISKY", "W. SOUR", "HIGHBALL", "COLA"],
        vec![plain(&[E::Ice]), vec![Entity::cup(5)]],
        vec![vec![T::Vodka, T::Whisky], vec![T::Cola, T::Lemon]],
        false,
    );
    let on_ice = |fluids: &[(T, u32)]| {
        Entity::cup(5)
            .with_fluids(fluids.iter().copied())
            .with_child(Entity::new(E::Ice))
    };
    level.orders = vec![
        order(ith_true(0, 4), tray(Entity::cup(5).with_fluids([(T::Whisky, 1)]))),
        order(ith_true(1, 4), tray(on_ice(&[(T::Whisky, 2), (T::Lemon, 1)]))),
        order(ith_true(2, 4), tray(on_ice(&[(T::Whisky, 2), (T::Lemon, 1), (T::Cola, 2)]))),
        order(ith_true(3, 4), tray(on_ice(&[(T::Cola, 5)]))),
    ];
    level
}

fn meat_3() -> Level {
    let mut level = base(
        LevelId::Meat3,
        &["MAC", "SLAW", "GREENS", "BEANS"],
        vec![plain(&[E::Meat]), plain(&[E::Bowl])],
        vec![vec![T::Mac], vec![T::Slaw], vec![T::Greens], vec![T::Beans]],
        true,
    );
    let sides = [T::Mac, T::Slaw, T::Greens, T::Beans];
    // Every order leaves out exactly one side, last side first.
    for skipped in (0..4).rev() {
        let signals: Vec<bool> = (0..4).map(|j| j != skipped).collect();
        let mut dishes = vec![cooked(E::Meat, CookGrill, 4)];
        dishes.extend(
            sides
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != skipped)
                .map(|(_, &side)| Entity::new(E::Bowl).with_operations([Operation::DispenseFluid(side)])),
        );
        level.orders.push(order(signals, multitray(dishes)));
    }
    level
}

fn cafe_triste() -> Level {
    let mut level = base(
        LevelId::CafeTriste,
        &["DU JOUR"],
        vec![plain(&[E::Paper]), vec![Entity::cup(1)]],
        vec![vec![T::Leaves]],
        true,
    );
    let coffee = Entity::cup(1).with_fluids([(T::Coffee, 1)]);
    let items = std::iter::once(coffee).chain(copies(Entity::new(E::Cigarette), 8));
    level.orders = vec![order(vec![true], multitray(items))];
    level.slice_rules = halving(E::Cigarette4x, E::Cigarette2x, E::Cigarette).into();
    level.roll_rules = vec![RollRule {
        input: Entity::new(E::Paper).with_operations([Operation::DispenseTopping(T::Leaves)]),
        output: Entity::new(E::Cigarette4x),
    }];
    level
}

fn the_commissary() -> Level {
    let mut level = base(
        LevelId::TheCommissary,
        &["MON.", "TUES.", "WED.", "THUR.", "FRI."],
        vec![
            plain(&[E::Pizza, E::Burger, E::Tender, E::Corndog, E::Curly, E::Crinkle, E::Tot]),
            plain(&[E::Plain, E::Choco]),
        ],
        vec![],
        true,
    );
    let menus = [
        ((E::Tender, CookFryer), E::Crinkle, E::Choco),
        ((E::Burger, CookMicrowave), E::Tot, E::Plain),
        ((E::Corndog, CookFryer), E::Tot, E::Choco),
        ((E::Tender, CookFryer), E::Curly, E::Plain),
        ((E::Pizza, CookMicrowave), E::Crinkle, E::Choco),
    ];
    level.orders = menus
        .into_iter()
        .enumerate()
        .map(|(i, ((main, cook), fries, milk))| {
            let items = [cooked(main, cook, 4), cooked(fries, CookFryer, 4), Entity::new(milk)];
            order(ith_true(i, 5), multitray(items))
        })
        .collect();
    level
}

fn da_wings() -> Level {
    let mut level = base(
        LevelId::DaWings,
        &["3 PCS.", "6 PCS.", "9 PCS."],
        vec![plain(&[E::Chicken])],
        vec![vec![T::Sauce]],
        true,
    );
    let wing = Entity::wing_placeholder().with_operations([CookFryer, CookFryer, Operation::CoatFluid(T::Sauce)]);
    level.orders = [3, 6, 9]
        .into_iter()
        .enumerate()
        .map(|(i, count)| order(ith_true(i, 3), multitray(copies(wing.clone(), count))))
        .collect();
    level.slice_rules = chicken_rules();
    level.module_limits = vec![ModuleLimit {
        kind: ModuleKind::WasteBin,
        max: 3,
    }];
    level
}

/// Buns split into a burger base and its top.
fn bun_rule() -> SliceRule {
    slice(
        ModuleKind::HorizontalSlicer,
        Entity::new(E::Bun),
        [Entity::burger(), Entity::new(E::BunTop)],
    )
}

fn breakside_grill() -> Level {
    let mut level = base(
        LevelId::BreaksideGrill,
        &["SINGLE", "DOUBLE", "TRIPLE", "CHEESE", "PICKLE", "TOMATO"],
        vec![plain(&[E::Meat]), plain(&[E::Bun]), plain(&[E::Cheese, E::Pickle, E::Tomato])],
        vec![],
        false,
    );
    for patties in 1..=3 {
        for options in 0..8u8 {
            let cheese = options & 0b100 != 0;
            let pickle = options & 0b010 != 0;
            let tomato = options & 0b001 != 0;

            let mut layers = Vec::new();
            for _ in 0..patties {
                layers.push(cooked(E::Meat, CookGrill, 4));
                if cheese {
                    layers.push(Entity::new(E::Cheese));
                }
            }
            if pickle {
                layers.push(Entity::new(E::Pickle));
            }
            if tomato {
                layers.push(Entity::new(E::Tomato));
            }
            layers.push(Entity::new(E::BunTop));

            let signals = [ith_true(patties - 1, 3), vec![cheese, pickle, tomato]].concat();
            level.orders.push(order(signals, tray(Entity::burger().with_items(layers))));
        }
    }
    level.slice_rules = vec![bun_rule()];
    level
}

fn chaz_cheddar() -> Level {
    let mut level = base(
        LevelId::ChazCheddar,
        &["MEAT L.", "MEAT R.", "VEGGIE L.", "VEGGIE R."],
        vec![vec![Entity::pizza_dough()]],
        vec![vec![T::Sauce], vec![T::Cheese], vec![T::Meat], vec![T::Veggie]],
        false,
    );
    // Enumerated left-meat, left-veggie, right-meat, right-veggie.
    for bits in 0..16u8 {
        let meat_l = bits & 0b1000 != 0;
        let veggie_l = bits & 0b0100 != 0;
        let meat_r = bits & 0b0010 != 0;
        let veggie_r = bits & 0b0001 != 0;

        let half = |meat: bool, veggie: bool| {
            let mut toppings = vec![T::Sauce, T::Cheese];
            if meat {
                toppings.push(T::Meat);
            }
            if veggie {
                toppings.push(T::Veggie);
            }
            toppings
        };
        let pizza = Entity::pizza_dough()
            .with_operations([Flatten, Flatten])
            .with_halves(half(meat_l, veggie_l), half(meat_r, veggie_r));
        level
            .orders
            .push(order(vec![meat_l, meat_r, veggie_l, veggie_r], tray(pizza)));
    }
    level
}

fn half_caff_coffee() -> Level {
    let mut level = base(
        LevelId::HalfCaffCoffee,
        &["ESPRE.", "DOPPIO", "LATTE", "CAPP.", "AMER."],
        vec![vec![Entity::cup(4)]],
        vec![vec![T::Milk], vec![T::Water]],
        false,
    );
    let drinks: [&[(T, u32)]; 5] = [
        &[(T::Coffee, 1)],
        &[(T::Coffee, 2)],
        &[(T::Coffee, 1), (T::Milk, 2), (T::Foam, 1)],
        &[(T::Coffee, 1), (T::Milk, 1), (T::Foam, 2)],
        &[(T::Coffee, 1), (T::Water, 3)],
    ];
    level.orders = drinks
        .into_iter()
        .enumerate()
        .map(|(i, fluids)| order(ith_true(i, 5), tray(Entity::cup(4).with_fluids(fluids.iter().copied()))))
        .collect();
    level
}

fn mildreds_nook() -> Level {
    let mut level = base(
        LevelId::MildredsNook,
        &["SOFT", "HARD"],
        vec![
            plain(&[E::Egg]),
            plain(&[E::Bacon, E::Banger]),
            plain(&[E::Tomato, E::Fungus, E::Black]),
            plain(&[E::Bread]),
        ],
        vec![vec![T::Beans]],
        true,
    );
    level.orders = [2, 4]
        .into_iter()
        .enumerate()
        .map(|(i, egg)| {
            let grill_times = [
                (E::Egg, egg),
                (E::Bacon, 4),
                (E::Banger, 4),
                (E::Tomato, 2),
                (E::Fungus, 2),
                (E::Black, 2),
                (E::Bread, 1),
            ];
            let breakfast = multitray(grill_times.map(|(kind, times)| cooked(kind, CookGrill, times)))
                .with_operations([Operation::DispenseFluid(T::Beans)]);
            order(ith_true(i, 2), breakfast)
        })
        .collect();
    level
}

fn bellys() -> Level {
    let mut level = base(
        LevelId::Bellys,
        &["PLAIN", "CHEESE", "ORANGE", "PURPLE", "POTATO", "ONION"],
        vec![
            plain(&[E::Meat, E::Potato, E::Onion]),
            plain(&[E::Bun, E::Cheese]),
            vec![Entity::cup(2), Entity::new(E::Lid)],
        ],
        vec![vec![T::Orange, T::Purple]],
        true,
    );
    for (i, cheese) in [false, true].into_iter().enumerate() {
        for (j, side) in [E::Potato, E::Onion].into_iter().enumerate() {
            for (k, drink) in [T::Orange, T::Purple].into_iter().enumerate() {
                let mut layers = vec![cooked(E::Meat, CookFryer, 4)];
                if cheese {
                    layers.push(Entity::new(E::Cheese));
                }
                layers.push(Entity::new(E::BunTop));

                let burger = Entity::burger().with_items(layers);
                let soda = Entity::cup(2)
                    .with_child(Entity::new(E::Lid))
                    .with_fluids([(drink, 2)]);
                let fries = Entity::cup(2).with_child(cooked(side, CookFryer, 4));

                let signals = [ith_true(i, 2), ith_true(k, 2), ith_true(j, 2)].concat();
                level.orders.push(order(signals, multitray([burger, soda, fries])));
            }
        }
    }
    level.slice_rules = vec![bun_rule()];
    level
}

fn sushi_yeah() -> Level {
    let mut level = base(
        LevelId::SushiYeah,
        &["T. MAKI", "S. MAKI", "T. NIGIRI", "S. NIGIRI", "SASHIMI", "SOUP"],
        vec![
            vec![Entity::nori(), Entity::new(E::Rice)],
            plain(&[E::Tuna, E::Salmon]),
            vec![Entity::sushi_plate(), Entity::sushi_bowl()],
        ],
        vec![vec![T::Soup]],
        false,
    );
    level.orders = vec![
        order(ith_true(0, 6), tray(Entity::sushi_plate().with_items(plain(&[E::TunaMaki; 4])))),
        order(ith_true(1, 6), tray(Entity::sushi_plate().with_items(plain(&[E::SalmonMaki; 4])))),
        order(ith_true(2, 6), tray(Entity::sushi_plate().with_items([nigiri(E::Tuna), nigiri(E::Tuna)]))),
        order(ith_true(3, 6), tray(Entity::sushi_plate().with_items([nigiri(E::Salmon), nigiri(E::Salmon)]))),
        order(ith_true(4, 6), tray(Entity::sushi_bowl().with_items([nigiri(E::Tuna), nigiri(E::Salmon)]))),
        order(
            ith_true(5, 6),
            tray(Entity::sushi_bowl().with_operations([Operation::DispenseFluid(T::Soup)])),
        ),
    ];
    // A nori sheet holding two rice pieces, each topped with fish, rolls into
    // a four-piece maki.
    level.roll_rules = [(E::Tuna, E::TunaMaki4x), (E::Salmon, E::SalmonMaki4x)]
        .into_iter()
        .map(|(fish, maki)| RollRule {
            input: Entity::nori().with_items([nigiri(fish), nigiri(fish)]),
            output: Entity::new(maki),
        })
        .collect();
    level.slice_rules = [
        halving(E::TunaMaki4x, E::TunaMaki2x, E::TunaMaki),
        halving(E::SalmonMaki4x, E::SalmonMaki2x, E::SalmonMaki),
    ]
    .concat();
    level
}
