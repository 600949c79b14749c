use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares a closed vocabulary enum with `ALL` and a display `name()`.
macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// In-game label, also used as the jack name for inputs.
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

vocabulary! {
    /// What kind of product an entity is.
    pub enum EntityKind {
        Tray => "TRAY",
        Multitray => "MULTITRAY",
        Nacho => "NACHO",
        Pretzel => "PRETZEL",
        Pocket => "POCKET",
        Glass => "GLASS",
        Dough => "DOUGH",
        Cone => "CONE",
        Pelmeni => "PELMENI",
        Cup => "CUP",
        Lid => "LID",
        Chicken => "CHICKEN",
        ChickenHalf => "CHICKEN_HALF",
        ChickenCutlet => "CHICKEN_CUTLET",
        ChickenLeg => "CHICKEN_LEG",
        WingPlaceholder => "WING_PLACEHOLDER",
        Roast => "ROAST",
        RoastSlice => "ROAST_SLICE",
        Ribs => "RIBS",
        RibsSlice => "RIBS_SLICE",
        Ice => "ICE",
        Meat => "MEAT",
        Bowl => "BOWL",
        Paper => "PAPER",
        Cigarette4x => "CIGARETTE_4X",
        Cigarette2x => "CIGARETTE_2X",
        Cigarette => "CIGARETTE",
        Pizza => "PIZZA",
        Burger => "BURGER",
        Tender => "TENDER",
        Corndog => "CORNDOG",
        Curly => "CURLY",
        Crinkle => "CRINKLE",
        Tot => "TOT",
        Plain => "PLAIN",
        Choco => "CHOCO",
        Bun => "BUN",
        BunTop => "BUN_TOP",
        BunBottom => "BUN_BOTTOM",
        Cheese => "CHEESE",
        Pickle => "PICKLE",
        Tomato => "TOMATO",
        Egg => "EGG",
        Bacon => "BACON",
        Banger => "BANGER",
        Fungus => "FUNGUS",
        Black => "BLACK",
        Bread => "BREAD",
        Potato => "POTATO",
        Onion => "ONION",
        Nori => "NORI",
        Rice => "RICE",
        Tuna => "TUNA",
        Salmon => "SALMON",
        Plate => "PLATE",
        TunaMaki4x => "TUNA_MAKI_4X",
        TunaMaki2x => "TUNA_MAKI_2X",
        TunaMaki => "TUNA_MAKI",
        SalmonMaki4x => "SALMON_MAKI_4X",
        SalmonMaki2x => "SALMON_MAKI_2X",
        SalmonMaki => "SALMON_MAKI",
    }
}

vocabulary! {
    /// Fluids and toppings applied by dispensers and coaters.
    pub enum Topping {
        Cheese => "CHEESE",
        Red => "RED",
        White => "WHITE",
        Tomato => "TOMATO",
        Mint => "MINT",
        Yogurt => "YOGURT",
        Choco => "CHOCO",
        Vanilla => "VANILLA",
        Cola => "COLA",
        Berry => "BERRY",
        Candy => "CANDY",
        Breading => "BREADING",
        Vodka => "VODKA",
        Whisky => "WHISKY",
        Lemon => "LEMON",
        Mac => "MAC",
        Slaw => "SLAW",
        Greens => "GREENS",
        Beans => "BEANS",
        Leaves => "LEAVES",
        Coffee => "COFFEE",
        Sauce => "SAUCE",
        Meat => "MEAT",
        Veggie => "VEGGIE",
        Milk => "MILK",
        Water => "WATER",
        Foam => "FOAM",
        Orange => "ORANGE",
        Purple => "PURPLE",
        Soup => "SOUP",
    }
}

vocabulary! {
    /// Paint colour selected on a painter.
    pub enum PaintColor {
        Red => "RED",
        White => "WHITE",
        Blue => "BLUE",
    }
}

vocabulary! {
    /// Which bands of a paintable cup a painter covers (top to bottom).
    pub enum PaintMask {
        Upper2 => "UPPER_2",
        Upper1 => "UPPER_1",
        Lower1 => "LOWER_1",
        Lower2 => "LOWER_2",
    }
}

impl PaintMask {
    /// Band indices (0 = top) covered by this mask.
    pub fn bands(self) -> &'static [usize] {
        match self {
            PaintMask::Upper2 => &[0, 1],
            PaintMask::Upper1 => &[0],
            PaintMask::Lower1 => &[2],
            PaintMask::Lower2 => &[1, 2],
        }
    }
}

vocabulary! {
    /// Music mode of the animatronic.
    pub enum MusicMode {
        Lead => "LEAD",
        Bass => "BASS",
    }
}

vocabulary! {
    /// Puzzle identifiers of the reference set.
    pub enum LevelId {
        TwoTwelve => "2Twelve",
        HotPocket => "Original Hot Pocket Experience",
        WineOClock => "Wine O'Clock",
        MumbaiChaat => "Mumbai Chaat",
        MrChilly => "Mr. Chilly",
        Kazan => "KAZAN",
        SodaTrench => "Soda Trench",
        RosiesDoughnuts => "Rosie's Doughnuts",
        OnTheFriedSide => "On the Fried Side",
        SweetHeatBbq => "Sweet Heat BBQ",
        TheWalrus => "The Walrus",
        Meat3 => "Meat+3",
        CafeTriste => "Cafe Triste",
        TheCommissary => "The Commissary",
        DaWings => "Da Wings",
        BreaksideGrill => "Breakside Grill",
        ChazCheddar => "Chaz Cheddar",
        HalfCaffCoffee => "Half Caff Coffee",
        MildredsNook => "Mildred's Nook",
        Bellys => "Belly's",
        SushiYeah => "Sushi Yeah!",
    }
}

impl LevelId {
    /// Identifier stored in save files (not the in-game ordering).
    pub fn code(self) -> u16 {
        match self {
            LevelId::TwoTwelve => 1,
            LevelId::HotPocket => 2,
            LevelId::MrChilly => 3,
            LevelId::OnTheFriedSide => 4,
            LevelId::Kazan => 5,
            LevelId::MumbaiChaat => 6,
            LevelId::RosiesDoughnuts => 7,
            LevelId::WineOClock => 8,
            LevelId::SodaTrench => 9,
            LevelId::Meat3 => 10,
            LevelId::DaWings => 11,
            LevelId::Bellys => 12,
            LevelId::CafeTriste => 13,
            LevelId::SweetHeatBbq => 14,
            LevelId::TheCommissary => 15,
            LevelId::ChazCheddar => 16,
            LevelId::HalfCaffCoffee => 17,
            LevelId::BreaksideGrill => 18,
            LevelId::MildredsNook => 19,
            LevelId::TheWalrus => 20,
            LevelId::SushiYeah => 21,
        }
    }

    pub fn from_code(code: u16) -> Option<LevelId> {
        LevelId::ALL.iter().copied().find(|id| id.code() == code)
    }
}

// ---------------------------------------------------------------------------
// Module kinds
// ---------------------------------------------------------------------------

/// Every module type, one variant per machine kind. Main inputs and scanners
/// are specific to a puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModuleKind {
    MultimixerEnable,
    Sequencer,
    SmallCounter,
    BigCounter,
    Multimixer,
    Conveyor,
    Input1x,
    Input2x,
    Input3x,
    FluidDispenser1x,
    FluidDispenser2x,
    FluidDispenser3x,
    FluidCoater,
    Output,
    Sensor,
    Router,
    Sorter,
    Stacker,
    WasteBin,
    DoubleSlicer,
    TripleSlicer,
    Rotator,
    Espresso,
    Roller,
    Docker,
    Flattener,
    Painter,
    Microwave,
    Grill,
    Fryer,
    HalfToppingDispenser,
    Freezer1x,
    Freezer7x,
    Animatronic,
    ToppingDispenser,
    HorizontalSlicer,
    Freezer3x,
    MainInput(LevelId),
    Scanner(LevelId),
}

impl ModuleKind {
    const FIXED: [ModuleKind; 37] = [
        ModuleKind::MultimixerEnable,
        ModuleKind::Sequencer,
        ModuleKind::SmallCounter,
        ModuleKind::BigCounter,
        ModuleKind::Multimixer,
        ModuleKind::Conveyor,
        ModuleKind::Input1x,
        ModuleKind::Input2x,
        ModuleKind::Input3x,
        ModuleKind::FluidDispenser1x,
        ModuleKind::FluidDispenser2x,
        ModuleKind::FluidDispenser3x,
        ModuleKind::FluidCoater,
        ModuleKind::Output,
        ModuleKind::Sensor,
        ModuleKind::Router,
        ModuleKind::Sorter,
        ModuleKind::Stacker,
        ModuleKind::WasteBin,
        ModuleKind::DoubleSlicer,
        ModuleKind::TripleSlicer,
        ModuleKind::Rotator,
        ModuleKind::Espresso,
        ModuleKind::Roller,
        ModuleKind::Docker,
        ModuleKind::Flattener,
        ModuleKind::Painter,
        ModuleKind::Microwave,
        ModuleKind::Grill,
        ModuleKind::Fryer,
        ModuleKind::HalfToppingDispenser,
        ModuleKind::Freezer1x,
        ModuleKind::Freezer7x,
        ModuleKind::Animatronic,
        ModuleKind::ToppingDispenser,
        ModuleKind::HorizontalSlicer,
        ModuleKind::Freezer3x,
    ];

    /// Every declared module type, including one main input and one scanner
    /// per puzzle.
    pub fn all() -> Vec<ModuleKind> {
        let mut kinds = Self::FIXED.to_vec();
        kinds.extend(LevelId::ALL.iter().map(|&l| ModuleKind::MainInput(l)));
        kinds.extend(LevelId::ALL.iter().map(|&l| ModuleKind::Scanner(l)));
        kinds
    }

    /// Numeric type id as stored in save files.
    pub fn code(self) -> u16 {
        match self {
            ModuleKind::MultimixerEnable => 10,
            ModuleKind::Sequencer => 11,
            ModuleKind::SmallCounter => 12,
            ModuleKind::BigCounter => 13,
            ModuleKind::Multimixer => 14,
            ModuleKind::Conveyor => 20,
            ModuleKind::Input1x => 22,
            ModuleKind::Input2x => 23,
            ModuleKind::Input3x => 24,
            ModuleKind::FluidDispenser1x => 25,
            ModuleKind::FluidDispenser2x => 26,
            ModuleKind::FluidDispenser3x => 27,
            ModuleKind::FluidCoater => 28,
            ModuleKind::Output => 29,
            ModuleKind::Sensor => 30,
            ModuleKind::Router => 31,
            ModuleKind::Sorter => 32,
            ModuleKind::Stacker => 33,
            ModuleKind::WasteBin => 34,
            ModuleKind::DoubleSlicer => 35,
            ModuleKind::TripleSlicer => 36,
            ModuleKind::Rotator => 37,
            ModuleKind::Espresso => 38,
            ModuleKind::Roller => 40,
            ModuleKind::Docker => 41,
            ModuleKind::Flattener => 42,
            ModuleKind::Painter => 43,
            ModuleKind::Microwave => 45,
            ModuleKind::Grill => 46,
            ModuleKind::Fryer => 47,
            ModuleKind::HalfToppingDispenser => 48,
            ModuleKind::Freezer1x => 49,
            ModuleKind::Freezer7x => 51,
            ModuleKind::Animatronic => 52,
            ModuleKind::ToppingDispenser => 53,
            ModuleKind::HorizontalSlicer => 54,
            ModuleKind::Freezer3x => 55,
            ModuleKind::MainInput(level) => 199 + level.code(),
            ModuleKind::Scanner(level) => 149 + level.code(),
        }
    }

    pub fn from_code(code: u16) -> Option<ModuleKind> {
        Self::all().into_iter().find(|k| k.code() == code)
    }

    /// The puzzle a main input or scanner belongs to.
    pub fn level(self) -> Option<LevelId> {
        match self {
            ModuleKind::MainInput(level) | ModuleKind::Scanner(level) => Some(level),
            _ => None,
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleKind::MainInput(level) => write!(f, "MainInput({level})"),
            ModuleKind::Scanner(level) => write!(f, "Scanner({level})"),
            other => write!(f, "{other:?}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Index types
// ---------------------------------------------------------------------------

/// Index of a module within a solution's module list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleIndex(pub usize);

impl fmt::Display for ModuleIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One end of a wire: a module and one of its jacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JackRef {
    pub module: ModuleIndex,
    pub jack: usize,
}

impl JackRef {
    pub fn new(module: usize, jack: usize) -> Self {
        Self {
            module: ModuleIndex(module),
            jack,
        }
    }
}
