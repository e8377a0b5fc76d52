//! Read-only query API for inspecting kitchen state.
//!
//! Snapshot types are owned copies -- no references into kitchen storage --
//! so a presentation layer can hold them across steps.

use crate::engine::Kitchen;
use crate::fixed::{Fixed64, Ticks};
use crate::grid::TileKind;
use crate::id::{CustomerId, FoodId, TilePoint};
use crate::item::FoodItem;

// ---------------------------------------------------------------------------
// Food snapshot
// ---------------------------------------------------------------------------

/// A read-only view of one food instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodSnapshot {
    pub id: FoodId,
    pub item: FoodItem,
    /// `None` while held.
    pub tile: Option<TilePoint>,
    pub portions: Option<u32>,
    /// Countdown progress as a 0..1 fraction. 0 when idle.
    pub progress: Fixed64,
    /// A cook or gesture countdown is running.
    pub busy: bool,
    pub paused: bool,
}

// ---------------------------------------------------------------------------
// Customer snapshot
// ---------------------------------------------------------------------------

/// A read-only view of one seated customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSnapshot {
    pub id: CustomerId,
    pub order: FoodItem,
    pub table: TilePoint,
    /// `None` for customers who wait forever.
    pub patience_remaining: Option<Ticks>,
    /// Elapsed patience as a 0..1 fraction, for the wait gauge.
    pub patience_progress: Fixed64,
}

impl Kitchen {
    pub fn snapshot_food(&self, id: FoodId) -> Option<FoodSnapshot> {
        let food = self.foods.get(id)?;
        Some(FoodSnapshot {
            id,
            item: food.item,
            tile: food.tile,
            portions: food.portions,
            progress: food.countdown.progress(),
            busy: food.is_busy(),
            paused: food.countdown.is_paused(),
        })
    }

    /// Every instance, held one included.
    pub fn snapshot_all_food(&self) -> Vec<FoodSnapshot> {
        self.foods
            .keys()
            .filter_map(|id| self.snapshot_food(id))
            .collect()
    }

    pub fn snapshot_customers(&self) -> Vec<CustomerSnapshot> {
        self.customers
            .iter()
            .map(|(id, c)| CustomerSnapshot {
                id,
                order: c.order,
                table: c.table,
                patience_remaining: c.remaining_patience(),
                patience_progress: c
                    .patience
                    .as_ref()
                    .map_or(Fixed64::ZERO, |p| p.progress()),
            })
            .collect()
    }

    /// Grid positions of every tile of `kind`, column-major.
    pub fn tiles_of(&self, kind: TileKind) -> Vec<TilePoint> {
        self.grid.positions_of(kind)
    }
}
