//! Headless kitchen: a scripted player keeps a steak house running until the
//! customers outpace them.
//!
//! Each tick the player serves anything a customer is waiting for, pulls a
//! fresh steak onto an idle stove, and moves cooked steaks to the counter
//! before they burn. Logging goes through `env_logger`.
//!
//! Run with: `RUST_LOG=info cargo run -p dishdash-core --example headless_kitchen`

use dishdash_core::config::KitchenConfig;
use dishdash_core::engine::Kitchen;
use dishdash_core::grid::{TileGrid, TileKind};
use dishdash_core::id::TilePoint;
use dishdash_core::item::{FoodCategory, FoodItem};
use dishdash_core::sim::GameStatus;

const LAYOUT: [&str; 5] = [
    "..........",
    ".MM.CCCC..",
    ".MM.CCCC.X",
    "..........",
    ".T.T.T.T..",
];

fn main() {
    env_logger::init();

    let grid = TileGrid::from_rows(&LAYOUT).expect("layout parses");
    let config = KitchenConfig::default()
        .with_category(FoodCategory::Steak)
        .with_seed(2024);
    let mut kitchen = Kitchen::new(grid, config);
    kitchen.start().expect("kitchen opens");

    let stoves = kitchen.tiles_of(TileKind::Machine);
    let counters = kitchen.tiles_of(TileKind::Counter);
    let trash = kitchen.tiles_of(TileKind::Trashcan)[0];

    while kitchen.status() != GameStatus::Lost && kitchen.tick() < 600 {
        play_one_tick(&mut kitchen, &stoves, &counters, trash);
        kitchen.step();
    }

    println!(
        "closed after {} ticks: score {}, {} customers seated",
        kitchen.tick(),
        kitchen.score(),
        kitchen.sim_state.customers_since_start
    );
}

fn play_one_tick(
    kitchen: &mut Kitchen,
    stoves: &[TilePoint],
    counters: &[TilePoint],
    trash: TilePoint,
) {
    // Serve from anywhere.
    let waiting: Vec<_> = kitchen
        .snapshot_customers()
        .into_iter()
        .map(|c| (c.order, c.table))
        .collect();
    for (order, table) in waiting {
        let ready = kitchen
            .snapshot_all_food()
            .into_iter()
            .find(|f| f.item == order && f.tile.is_some());
        if let Some(tile) = ready.and_then(|f| f.tile) {
            if kitchen.food_at(table).is_none() {
                move_food(kitchen, tile, table);
            }
        }
    }

    // Pull steaks off before they go past well done; bin the ones that did.
    for &stove in stoves {
        match kitchen.item_at(stove) {
            Some(FoodItem::SteakBurnt) => {
                if let Some(&free) = counters.iter().find(|&&c| kitchen.food_at(c).is_none()) {
                    move_food(kitchen, stove, free);
                }
            }
            Some(FoodItem::BurntBlock) => move_food(kitchen, stove, trash),
            _ => {}
        }
    }

    // Keep every stove busy.
    for &stove in stoves {
        if kitchen.food_at(stove).is_none() && kitchen.grab_from_source(FoodItem::SteakRaw).is_ok() {
            let _ = kitchen.drop_held(Some(stove));
        }
    }
}

fn move_food(
    kitchen: &mut Kitchen,
    from: TilePoint,
    to: TilePoint,
) {
    if kitchen.grab_from_tile(from).is_ok() {
        let _ = kitchen.drop_held(Some(to));
    }
}
