//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::config::KitchenConfig;
use crate::engine::Kitchen;
use crate::grid::TileGrid;
use crate::id::{FoodId, TilePoint};
use crate::item::{FoodCategory, FoodItem};

// ===========================================================================
// Default kitchen tiles
// ===========================================================================

pub const COUNTER: TilePoint = TilePoint::new(5, 5);
pub const MACHINE: TilePoint = TilePoint::new(5, 6);
pub const SINK: TilePoint = TilePoint::new(5, 7);
pub const TRASH: TilePoint = TilePoint::new(4, 5);
pub const TABLE: TilePoint = TilePoint::new(7, 9);
pub const FLOOR: TilePoint = TilePoint::new(0, 0);

// ===========================================================================
// Kitchen builders
// ===========================================================================

/// A running kitchen on the default grid with no automatic customers.
pub fn quiet_kitchen(category: FoodCategory) -> Kitchen {
    let config = KitchenConfig {
        spawn_on_start: false,
        ..KitchenConfig::default().with_category(category)
    };
    let mut kitchen = Kitchen::new(TileGrid::default_kitchen(), config);
    kitchen.start().expect("fresh kitchen starts");
    kitchen
}

pub fn sushi_kitchen() -> Kitchen {
    quiet_kitchen(FoodCategory::Sushi)
}

pub fn steak_kitchen() -> Kitchen {
    quiet_kitchen(FoodCategory::Steak)
}

// ===========================================================================
// Food helpers
// ===========================================================================

/// Grab `item` from the toolbar and drop it on `tile`. Returns the id of the
/// grabbed instance (it may since have been consumed by a tile event).
pub fn place_from_source(kitchen: &mut Kitchen, item: FoodItem, tile: TilePoint) -> FoodId {
    let id = kitchen
        .grab_from_source(item)
        .unwrap_or_else(|e| panic!("grab {item:?}: {e}"));
    kitchen
        .drop_held(Some(tile))
        .unwrap_or_else(|e| panic!("drop {item:?} at {tile}: {e}"));
    id
}

/// Put an arbitrary item (not necessarily a source) straight onto an empty
/// tile, bypassing the toolbar and tile events.
pub fn spawn_at(kitchen: &mut Kitchen, item: FoodItem, tile: TilePoint) -> FoodId {
    assert!(
        kitchen.food_at(tile).is_none(),
        "spawn_at: {tile} is occupied"
    );
    let mut food = crate::food::FoodInstance::new(item);
    food.tile = Some(tile);
    let id = kitchen.foods.insert(food);
    kitchen.occupancy.insert(tile, id);
    id
}

/// Move whatever rests on `from` onto `to`.
pub fn drag(kitchen: &mut Kitchen, from: TilePoint, to: TilePoint) {
    kitchen
        .grab_from_tile(from)
        .unwrap_or_else(|e| panic!("grab at {from}: {e}"));
    kitchen
        .drop_held(Some(to))
        .unwrap_or_else(|e| panic!("drop at {to}: {e}"));
}

// ===========================================================================
// Assertions
// ===========================================================================

/// Every instance is either on exactly one tile or held, and the occupancy
/// map agrees with each instance's recorded tile.
pub fn assert_consistent(kitchen: &Kitchen) {
    let held = usize::from(kitchen.held().is_some());
    assert_eq!(
        kitchen.food_count(),
        kitchen.occupancy.len() + held,
        "instances neither on a tile nor held"
    );
    for (&tile, &id) in &kitchen.occupancy {
        let food = kitchen
            .foods
            .get(id)
            .unwrap_or_else(|| panic!("occupancy at {tile} points at a removed instance"));
        assert_eq!(food.tile, Some(tile), "instance at {tile} disagrees");
        assert!(kitchen.grid.is_placeable(tile), "{tile} is not placeable");
    }
    if let Some(id) = kitchen.held() {
        assert_eq!(kitchen.food(id).and_then(|f| f.tile), None, "held food on a tile");
    }
}
