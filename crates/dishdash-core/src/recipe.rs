//! The recipe rule table: pure lookups from food items to the transforms
//! the kitchen may apply to them.
//!
//! Nothing here holds state. The kitchen decides *when* a rule fires; this
//! module only answers *what* it produces.

use crate::fixed::Ticks;
use crate::item::FoodItem;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Rule vocabulary
// ---------------------------------------------------------------------------

/// How long a stove operation takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CookTime {
    Short,
    Medium,
    Long,
    Slow,
}

impl CookTime {
    pub fn ticks(self) -> Ticks {
        match self {
            CookTime::Short => 3,
            CookTime::Medium => 5,
            CookTime::Long => 7,
            CookTime::Slow => 10,
        }
    }
}

/// A single-input preparation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Knead,
    Mix,
    Cut,
    Puree,
    Portion,
    /// Filling at the sink. Applied instantly by the sink tile.
    WaterFill,
}

impl ActionKind {
    /// Gestures are timed actions started by the player on a counter; water
    /// fill is triggered by the sink tile instead.
    pub fn is_gesture(self) -> bool {
        !matches!(self, ActionKind::WaterFill)
    }
}

/// Result of a cook lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookRule {
    pub time: CookTime,
    pub result: FoodItem,
}

impl CookRule {
    pub fn duration(&self) -> Ticks {
        self.time.ticks()
    }
}

/// Result of an action lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRule {
    pub kind: ActionKind,
    pub result: FoodItem,
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// What happens when `item` finishes a countdown on a machine tile.
pub fn cook_transform(item: FoodItem) -> Option<CookRule> {
    let (time, result) = match item {
        FoodItem::SteakRaw => (CookTime::Short, FoodItem::SteakRare),
        FoodItem::SteakRare => (CookTime::Short, FoodItem::SteakMedium),
        FoodItem::SteakMedium => (CookTime::Short, FoodItem::SteakBurnt),
        FoodItem::SteakBurnt => (CookTime::Medium, FoodItem::BurntBlock),
        FoodItem::PotRawRiceWater => (CookTime::Medium, FoodItem::PotCookedRice),
        _ => return None,
    };
    Some(CookRule { time, result })
}

/// The single-input action defined for `item`, if any.
pub fn action_transform(item: FoodItem) -> Option<ActionRule> {
    let (kind, result) = match item {
        FoodItem::Pot => (ActionKind::WaterFill, FoodItem::PotWater),
        FoodItem::PotRawRice => (ActionKind::WaterFill, FoodItem::PotRawRiceWater),
        FoodItem::WholeFish => (ActionKind::Cut, FoodItem::SlicedFish),
        _ => return None,
    };
    Some(ActionRule { kind, result })
}

/// Directed combine rules as `(first, second, result)`. Lookups go through
/// [`combine`], which tries both operand orders.
pub const COMBINE_RULES: &[(FoodItem, FoodItem, FoodItem)] = &[
    (FoodItem::PotWater, FoodItem::Rice, FoodItem::PotRawRiceWater),
    (FoodItem::Pot, FoodItem::Rice, FoodItem::PotRawRice),
    (FoodItem::SlicedFish, FoodItem::PotCookedRice, FoodItem::Nigiri),
    (FoodItem::Knife, FoodItem::WholeFish, FoodItem::SlicedFish),
];

fn combine_directed(a: FoodItem, b: FoodItem) -> Option<FoodItem> {
    COMBINE_RULES
        .iter()
        .find(|(first, second, _)| *first == a && *second == b)
        .map(|(_, _, result)| *result)
}

/// Combine two items in either order. At most one rule may match an
/// unordered pair; [`crate::validation::validate_rules`] checks that.
pub fn combine(a: FoodItem, b: FoodItem) -> Option<FoodItem> {
    combine_directed(a, b).or_else(|| combine_directed(b, a))
}

/// Number of portions an item is produced with, for bulk items only.
pub fn portion_count(item: FoodItem) -> Option<u32> {
    match item {
        FoodItem::PotCookedRice => Some(5),
        _ => None,
    }
}
