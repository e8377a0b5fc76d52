//! Customers, their orders, and the difficulty curves that pace them.

use crate::countdown::Countdown;
use crate::fixed::Ticks;
use crate::id::TilePoint;
use crate::item::FoodItem;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Difficulty curves
// ---------------------------------------------------------------------------

/// A tick count that shrinks as more customers arrive, never below `floor`.
///
/// `value(n) = max(base - n / step_every - accel(n), floor)`, where
/// `accel(n) = (n - accelerate_after)^2 / acceleration_divisor` once `n`
/// passes `accelerate_after` and zero before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyCurve {
    pub base: Ticks,
    /// Customers per one-tick reduction. Zero disables the linear term.
    pub step_every: u64,
    pub floor: Ticks,
    /// Customer count past which the quadratic term kicks in.
    #[serde(default)]
    pub accelerate_after: Option<u64>,
    #[serde(default = "default_divisor")]
    pub acceleration_divisor: u64,
}

fn default_divisor() -> u64 {
    4
}

impl DifficultyCurve {
    /// Default pacing between customer arrivals.
    pub const fn spawn_interval() -> Self {
        Self {
            base: 10,
            step_every: 2,
            floor: 2,
            accelerate_after: Some(10),
            acceleration_divisor: 4,
        }
    }

    /// Default patience granted to each customer.
    pub const fn patience() -> Self {
        Self {
            base: 20,
            step_every: 2,
            floor: 7,
            accelerate_after: None,
            acceleration_divisor: 4,
        }
    }

    /// The curve evaluated after `customers` arrivals.
    pub fn value(&self, customers: u64) -> Ticks {
        let linear = customers.checked_div(self.step_every).unwrap_or(0);
        let accel = match self.accelerate_after {
            Some(after) if customers > after => {
                let over = customers - after;
                over.saturating_mul(over)
                    .checked_div(self.acceleration_divisor)
                    .unwrap_or(0)
            }
            _ => 0,
        };
        self.base
            .saturating_sub(linear)
            .saturating_sub(accel)
            .max(self.floor)
    }
}

// ---------------------------------------------------------------------------
// Customer
// ---------------------------------------------------------------------------

/// One seated patron.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub order: FoodItem,
    pub table: TilePoint,
    /// `None` for tutorial customers, who wait forever.
    pub patience: Option<Countdown>,
}

impl Customer {
    pub fn new(order: FoodItem, table: TilePoint, patience: Ticks) -> Self {
        Self {
            order,
            table,
            patience: Some(Countdown::started(patience)),
        }
    }

    /// A customer that never runs out of patience.
    pub fn patient(order: FoodItem, table: TilePoint) -> Self {
        Self {
            order,
            table,
            patience: None,
        }
    }

    /// Advance patience by one tick. Returns `true` on the tick it runs out.
    pub fn tick(&mut self) -> bool {
        self.patience.as_mut().is_some_and(Countdown::tick)
    }

    pub fn wants(&self, item: FoodItem, at: TilePoint) -> bool {
        self.table == at && self.order == item
    }

    pub fn remaining_patience(&self) -> Option<Ticks> {
        self.patience.as_ref().and_then(Countdown::remaining)
    }
}

/// First table in `tables` not listed in `occupied`.
pub fn reserve_table(tables: &[TilePoint], occupied: &[TilePoint]) -> Option<TilePoint> {
    tables.iter().copied().find(|table| !occupied.contains(table))
}
