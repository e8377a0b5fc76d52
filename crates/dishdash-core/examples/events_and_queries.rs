//! Events and queries example: passive event listeners and the query API.
//!
//! Cooks a steak on the stock kitchen, registers passive event listeners,
//! runs a few ticks, and prints food and customer snapshots.
//!
//! Run with: `cargo run -p dishdash-core --example events_and_queries`

use std::cell::RefCell;
use std::rc::Rc;

use dishdash_core::config::KitchenConfig;
use dishdash_core::engine::Kitchen;
use dishdash_core::event::{Event, EventKind, ListenerPriority};
use dishdash_core::fixed::fixed64_to_f64;
use dishdash_core::grid::{TileGrid, TileKind};
use dishdash_core::item::{FoodCategory, FoodItem};

fn main() {
    let config = KitchenConfig {
        spawn_on_start: false,
        ..KitchenConfig::default().with_category(FoodCategory::Steak)
    };
    let mut kitchen = Kitchen::new(TileGrid::default_kitchen(), config);
    kitchen.start().unwrap();

    // --- Register passive event listeners ---

    // Count transforms via a shared counter.
    let transforms = Rc::new(RefCell::new(0u32));
    let counter = Rc::clone(&transforms);
    kitchen.on_event(
        EventKind::FoodTransformed,
        Box::new(move |event| {
            if let Event::FoodTransformed { from, to, tick, .. } = event {
                println!("  [tick {tick}] {from} -> {to}");
                *counter.borrow_mut() += 1;
            }
        }),
    );

    // Only hear about countdowns longer than three ticks, after everyone else.
    kitchen.event_bus.on_filtered(
        EventKind::CountdownStarted,
        ListenerPriority::Post,
        Some(Box::new(|e: &Event| matches!(e, Event::CountdownStarted { duration, .. } if *duration > 3))),
        Box::new(|e: &Event| println!("  long countdown: {e:?}")),
    );

    // Nobody needs placement events here.
    kitchen.suppress_event(EventKind::FoodPlaced);

    // --- Cook ---

    let stove = kitchen.tiles_of(TileKind::Machine)[0];
    let table = kitchen.tiles_of(TileKind::Table)[0];
    kitchen.grab_from_source(FoodItem::SteakRaw).unwrap();
    kitchen.drop_held(Some(stove)).unwrap();
    kitchen.seat_customer(FoodItem::SteakMedium, Some(30)).unwrap();

    println!("cooking:");
    for _ in 0..7 {
        kitchen.step();
        let id = kitchen.food_at(stove).unwrap();
        let snap = kitchen.snapshot_food(id).unwrap();
        println!(
            "  {:<14} progress {:.2} busy {}",
            snap.item.display_name(),
            fixed64_to_f64(snap.progress),
            snap.busy
        );
    }

    // --- Query customers ---

    for customer in kitchen.snapshot_customers() {
        println!(
            "customer at {} wants {} ({:?} ticks left, {:.0}% waited)",
            customer.table,
            customer.order,
            customer.patience_remaining,
            fixed64_to_f64(customer.patience_progress) * 100.0
        );
    }

    kitchen.grab_from_tile(stove).unwrap();
    kitchen.drop_held(Some(table)).unwrap();
    kitchen.step();

    println!(
        "transforms seen: {}, score: {}, state hash {:#018x}",
        transforms.borrow(),
        kitchen.score(),
        kitchen.state_hash()
    );
}
