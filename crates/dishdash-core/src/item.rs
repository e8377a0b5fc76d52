//! The food catalog: every ingredient and dish state the kitchen knows about,
//! plus the order categories that group them for a level.

use crate::grid::TileKind;
use crate::tutorial::TutorialAction;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FoodItem
// ---------------------------------------------------------------------------

/// An immutable identifier for one ingredient or dish state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FoodItem {
    // -- Orderable dishes --
    SteakRare,
    SteakMedium,
    SteakBurnt,
    SlicedFish,
    Nigiri,

    // -- Cooking assets --
    SteakRaw,
    Pot,
    PotWater,
    PotRawRice,
    PotRawRiceWater,
    PotCookedRice,
    Rice,
    WholeFish,
    Riceball,

    // -- Misc --
    BurntBlock,
    Knife,
}

/// Coarse partition of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodClass {
    /// Finished dishes a customer may order.
    Orderable,
    /// Intermediate states on the way to a dish.
    CookingAsset,
    /// Terminal or utility items (burnt leftovers, tools).
    Misc,
}

impl FoodItem {
    /// Every item, in declaration order.
    pub const ALL: [FoodItem; 16] = [
        FoodItem::SteakRare,
        FoodItem::SteakMedium,
        FoodItem::SteakBurnt,
        FoodItem::SlicedFish,
        FoodItem::Nigiri,
        FoodItem::SteakRaw,
        FoodItem::Pot,
        FoodItem::PotWater,
        FoodItem::PotRawRice,
        FoodItem::PotRawRiceWater,
        FoodItem::PotCookedRice,
        FoodItem::Rice,
        FoodItem::WholeFish,
        FoodItem::Riceball,
        FoodItem::BurntBlock,
        FoodItem::Knife,
    ];

    pub fn class(self) -> FoodClass {
        match self {
            FoodItem::SteakRare
            | FoodItem::SteakMedium
            | FoodItem::SteakBurnt
            | FoodItem::SlicedFish
            | FoodItem::Nigiri => FoodClass::Orderable,
            FoodItem::SteakRaw
            | FoodItem::Pot
            | FoodItem::PotWater
            | FoodItem::PotRawRice
            | FoodItem::PotRawRiceWater
            | FoodItem::PotCookedRice
            | FoodItem::Rice
            | FoodItem::WholeFish
            | FoodItem::Riceball => FoodClass::CookingAsset,
            FoodItem::BurntBlock | FoodItem::Knife => FoodClass::Misc,
        }
    }

    /// Human-readable name shown on order bubbles and in the recipe book.
    pub fn display_name(self) -> &'static str {
        match self {
            FoodItem::SteakRaw => "Raw Steak",
            FoodItem::SteakRare => "Rare Steak",
            FoodItem::SteakMedium => "Medium Steak",
            FoodItem::SteakBurnt => "Well Done Steak",
            FoodItem::BurntBlock => "Burnt Block",
            FoodItem::Pot => "Pot",
            FoodItem::PotWater => "Pot of Water",
            FoodItem::PotRawRice => "Pot of Raw Rice",
            FoodItem::PotRawRiceWater => "Pot of Raw Rice and Water",
            FoodItem::PotCookedRice => "Pot of Cooked Rice",
            FoodItem::Rice => "Raw Rice",
            FoodItem::WholeFish => "Whole Fish",
            FoodItem::SlicedFish => "Sliced Fish",
            FoodItem::Nigiri => "Nigiri",
            FoodItem::Knife => "Knife",
            FoodItem::Riceball => "Riceball",
        }
    }

    /// Opaque key the presentation layer maps to a sprite.
    pub fn asset_key(self) -> &'static str {
        match self {
            FoodItem::SteakRaw => "Steak",
            FoodItem::SteakRare => "SteakRare",
            FoodItem::SteakMedium => "SteakMedium",
            FoodItem::SteakBurnt => "SteakBurnt",
            FoodItem::BurntBlock => "BurntBlock",
            FoodItem::Pot => "EmptyPot",
            FoodItem::PotWater => "PotWater",
            FoodItem::PotRawRice => "PotRawRice",
            FoodItem::PotRawRiceWater => "PotRawRiceWater",
            FoodItem::PotCookedRice => "PotCookedRice",
            FoodItem::Rice => "RawRice",
            FoodItem::WholeFish => "WholeFish",
            FoodItem::SlicedFish => "SlicedFish",
            FoodItem::Nigiri => "Nigiri",
            FoodItem::Knife => "Knife",
            FoodItem::Riceball => "Riceball",
        }
    }

    /// Stable numeric code, used for state hashing.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Recipe-book steps for producing this dish from raw sources. Empty for
    /// anything that is not orderable.
    pub fn tutorial_sequence(self) -> Vec<TutorialAction> {
        use FoodItem::*;
        use TutorialAction as A;
        match self {
            SteakRare => vec![
                A::GrabSourceToTile(SteakRaw, TileKind::Machine),
                A::Cook(SteakRaw),
                A::Serve(SteakRare),
            ],
            SteakMedium => vec![
                A::GrabSourceToTile(SteakRaw, TileKind::Machine),
                A::Cook(SteakRaw),
                A::Cook(SteakRare),
                A::Serve(SteakMedium),
            ],
            SteakBurnt => vec![
                A::GrabSourceToTile(SteakRaw, TileKind::Machine),
                A::Cook(SteakRaw),
                A::Cook(SteakRare),
                A::Cook(SteakMedium),
                A::Serve(SteakBurnt),
            ],
            SlicedFish => vec![
                A::GrabSourceToTile(WholeFish, TileKind::Counter),
                A::GrabSourceToFoodItem(Knife, WholeFish),
                A::Serve(SlicedFish),
            ],
            Nigiri => vec![
                A::GrabSourceToTile(WholeFish, TileKind::Counter),
                A::GrabSourceToFoodItem(Knife, WholeFish),
                A::GrabSourceToTile(Pot, TileKind::Sink),
                A::GrabSourceToFoodItem(Rice, PotWater),
                A::Action(PotRawRiceWater, TileKind::Machine),
                A::Cook(PotRawRiceWater),
                A::Combine(PotCookedRice, SlicedFish),
                A::Serve(Nigiri),
            ],
            _ => Vec::new(),
        }
    }
}

impl std::fmt::Display for FoodItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// FoodCategory
// ---------------------------------------------------------------------------

/// A themed set of sources and orders for one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FoodCategory {
    Steak,
    #[default]
    Sushi,
    /// Every concrete category combined.
    All,
}

impl FoodCategory {
    /// The concrete categories, in the order `All` concatenates them.
    pub const CONCRETE: [FoodCategory; 2] = [FoodCategory::Steak, FoodCategory::Sushi];

    /// Items the player can pull fresh from the source toolbar.
    pub fn food_sources(self) -> Vec<FoodItem> {
        match self {
            FoodCategory::Steak => vec![FoodItem::SteakRaw],
            FoodCategory::Sushi => vec![
                FoodItem::WholeFish,
                FoodItem::Rice,
                FoodItem::Pot,
                FoodItem::Knife,
            ],
            FoodCategory::All => Self::CONCRETE
                .iter()
                .flat_map(|c| c.food_sources())
                .collect(),
        }
    }

    /// Dishes customers of this category may order.
    pub fn orderable_items(self) -> Vec<FoodItem> {
        match self {
            FoodCategory::Steak => vec![
                FoodItem::SteakRare,
                FoodItem::SteakMedium,
                FoodItem::SteakBurnt,
            ],
            FoodCategory::Sushi => vec![FoodItem::SlicedFish, FoodItem::Nigiri],
            FoodCategory::All => Self::CONCRETE
                .iter()
                .flat_map(|c| c.orderable_items())
                .collect(),
        }
    }

    /// The guided tutorial for this category.
    pub fn tutorial_sequence(self) -> Vec<TutorialAction> {
        use FoodItem::*;
        use TutorialAction as A;
        match self {
            FoodCategory::Steak => vec![
                A::Action(SteakRaw, TileKind::Machine),
                A::Cook(SteakRaw),
                A::Serve(SteakRare),
                A::Action(SteakRaw, TileKind::Machine),
                A::Cook(SteakRaw),
                A::Cook(SteakRare),
                A::Serve(SteakMedium),
                A::Action(SteakRaw, TileKind::Machine),
                A::Cook(SteakRaw),
                A::Cook(SteakRare),
                A::Cook(SteakMedium),
                A::Serve(SteakBurnt),
            ],
            FoodCategory::Sushi => vec![
                A::GrabSourceToTile(WholeFish, TileKind::Counter),
                A::GrabSourceToFoodItem(Knife, WholeFish),
                A::Serve(SlicedFish),
                A::GrabSourceToTile(WholeFish, TileKind::Counter),
                A::GrabSourceToFoodItem(Knife, WholeFish),
                A::GrabSourceToTile(Pot, TileKind::Sink),
                A::GrabSourceToFoodItem(Rice, PotWater),
                A::Action(PotRawRiceWater, TileKind::Machine),
                A::Cook(PotRawRiceWater),
                A::Combine(PotCookedRice, SlicedFish),
                A::Serve(Nigiri),
            ],
            FoodCategory::All => Self::CONCRETE
                .iter()
                .flat_map(|c| c.tutorial_sequence())
                .collect(),
        }
    }

    pub fn is_source(self, item: FoodItem) -> bool {
        self.food_sources().contains(&item)
    }
}
