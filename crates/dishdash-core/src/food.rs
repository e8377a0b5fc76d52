//! Runtime food instances.
//!
//! A [`FoodInstance`] keeps its identity across transforms: cooking, cutting
//! and combining rewrite its [`FoodItem`] in place.

use crate::countdown::Countdown;
use crate::fixed::Ticks;
use crate::id::TilePoint;
use crate::item::FoodItem;
use crate::recipe::{self, ActionKind};
use serde::{Deserialize, Serialize};

/// What an instance's countdown will do when it expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodTask {
    Cook { result: FoodItem },
    Gesture { kind: ActionKind, result: FoodItem },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodInstance {
    pub item: FoodItem,
    /// Remaining portions for bulk items. `None` when not portionable.
    pub portions: Option<u32>,
    pub countdown: Countdown,
    pub task: Option<FoodTask>,
    /// When the item that just finished cooking equals this, chained cooking
    /// does not restart.
    pub stop_after: Option<FoodItem>,
    /// Tile the instance rests on. `None` while held.
    pub tile: Option<TilePoint>,
}

impl FoodInstance {
    pub fn new(item: FoodItem) -> Self {
        Self {
            item,
            portions: recipe::portion_count(item),
            countdown: Countdown::new(),
            task: None,
            stop_after: None,
            tile: None,
        }
    }

    /// Replace the item. Portions reset to the new item's count and any
    /// running countdown stops.
    pub fn set_item(&mut self, item: FoodItem) {
        self.item = item;
        self.portions = recipe::portion_count(item);
        self.stop_timer();
    }

    /// Start the cook countdown for the current item. Returns the duration, or
    /// `None` (leaving the instance untouched) when no cook rule exists.
    pub fn start_cooking(&mut self) -> Option<Ticks> {
        let rule = recipe::cook_transform(self.item)?;
        self.countdown.start(rule.duration());
        self.task = Some(FoodTask::Cook {
            result: rule.result,
        });
        Some(rule.duration())
    }

    /// Start a timed gesture (cut, knead, ...) for the current item. Returns
    /// `None` when the item's action rule is not a gesture.
    pub fn start_gesture(&mut self, duration: Ticks) -> Option<ActionKind> {
        let rule = recipe::action_transform(self.item)?;
        if !rule.kind.is_gesture() {
            return None;
        }
        self.countdown.start(duration);
        self.task = Some(FoodTask::Gesture {
            kind: rule.kind,
            result: rule.result,
        });
        Some(rule.kind)
    }

    /// Cancel any running countdown. Returns whether one was running.
    pub fn stop_timer(&mut self) -> bool {
        let was_active = self.countdown.is_active();
        self.countdown.cancel();
        self.task = None;
        was_active
    }

    pub fn is_busy(&self) -> bool {
        self.countdown.is_active()
    }

    /// Apply the sink's water-fill action if the item has one. Returns the new
    /// item on success.
    pub fn fill_with_water(&mut self) -> Option<FoodItem> {
        let rule = recipe::action_transform(self.item)?;
        if rule.kind != ActionKind::WaterFill {
            return None;
        }
        self.set_item(rule.result);
        Some(rule.result)
    }
}
