//! Drop resolution policy.
//!
//! The kitchen owns the instances and the tile occupancy; this module holds
//! the decisions that do not depend on that storage: what a drop produced,
//! and which operand of a combine gives up a portion.

use crate::id::{FoodId, TilePoint};
use crate::item::FoodItem;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What happened to the held instance when it was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropOutcome {
    /// Set down on an empty placeable tile.
    Placed { food: FoodId, tile: TilePoint },
    /// A combine rule fired against the tile's occupant.
    Combined { result: FoodItem, resolution: CombineResolution },
    /// Rejected and snapped back to the tile it was picked up from.
    Returned { food: FoodId, origin: TilePoint },
    /// Rejected with nowhere to go back to.
    Discarded { item: FoodItem },
}

impl DropOutcome {
    /// Whether the drop changed the kitchen beyond moving the instance home.
    pub fn accepted(&self) -> bool {
        matches!(self, DropOutcome::Placed { .. } | DropOutcome::Combined { .. })
    }
}

// ---------------------------------------------------------------------------
// Combine resolution
// ---------------------------------------------------------------------------

/// Which side of a combine kept portions after the decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombineResolution {
    /// The dropped instance still has portions. The occupant becomes the
    /// result; the dropped instance goes back to its origin.
    IncomingPortioned { remaining: u32 },
    /// The occupant still has portions. The dropped instance becomes the
    /// result and goes back to its origin; the occupant stays put.
    OccupantPortioned { remaining: u32 },
    /// Nothing left to portion. The occupant becomes the result and the
    /// dropped instance is consumed.
    Merge,
}

/// Take one portion from whichever operand is portionable and decide how the
/// combine resolves.
///
/// At most one operand may be portionable. Two portionable operands panic in
/// debug builds; release builds log and take the portion from the incoming
/// side only.
pub fn resolve_combine(
    incoming: &mut Option<u32>,
    occupant: &mut Option<u32>,
) -> CombineResolution {
    if incoming.is_some() && occupant.is_some() {
        debug_assert!(false, "both combine operands are portionable");
        log::warn!("both combine operands are portionable; taking from the dropped one");
        return take_from(incoming)
            .map(|remaining| CombineResolution::IncomingPortioned { remaining })
            .unwrap_or(CombineResolution::Merge);
    }

    if let Some(remaining) = take_from(incoming) {
        return CombineResolution::IncomingPortioned { remaining };
    }
    if let Some(remaining) = take_from(occupant) {
        return CombineResolution::OccupantPortioned { remaining };
    }
    CombineResolution::Merge
}

/// Decrement a portion count. Returns the remainder only when some is left.
fn take_from(portions: &mut Option<u32>) -> Option<u32> {
    let count = portions.as_mut()?;
    *count = count.saturating_sub(1);
    (*count > 0).then_some(*count)
}

/// Ids that need tile-event dispatch after a drop, in dispatch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispatch(pub Vec<FoodId>);

impl Dispatch {
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn one(food: FoodId) -> Self {
        Self(vec![food])
    }

    pub fn push(&mut self, food: FoodId) {
        if !self.0.contains(&food) {
            self.0.push(food);
        }
    }
}
