//! End-to-end kitchen scenarios.
//!
//! These tests drive the kitchen through its public input and step API the
//! way a front end would: grab, drop, gesture, advance time, and watch
//! events.

use std::cell::RefCell;
use std::rc::Rc;

use dishdash_core::config::KitchenConfig;
use dishdash_core::customer::DifficultyCurve;
use dishdash_core::engine::{Kitchen, PointerAction, PointerResult};
use dishdash_core::event::{Event, EventKind};
use dishdash_core::grid::{TileGrid, TileKind};
use dishdash_core::id::TilePoint;
use dishdash_core::item::{FoodCategory, FoodItem};
use dishdash_core::placement::{CombineResolution, DropOutcome};
use dishdash_core::recipe::ActionKind;
use dishdash_core::sim::{GameStatus, LossReason};
use dishdash_core::test_utils::*;
use dishdash_core::tutorial::{Highlighter, TutorialAction};

// ===========================================================================
// Layout
// ===========================================================================
//
//   C C . T
//   M S X T

const A: TilePoint = TilePoint::new(0, 0);
const B: TilePoint = TilePoint::new(1, 0);
const STOVE: TilePoint = TilePoint::new(0, 1);
const TAP: TilePoint = TilePoint::new(1, 1);
const BIN: TilePoint = TilePoint::new(2, 1);
const AISLE: TilePoint = TilePoint::new(2, 0);
const TABLE_1: TilePoint = TilePoint::new(3, 0);
const TABLE_2: TilePoint = TilePoint::new(3, 1);

fn two_table_grid() -> TileGrid {
    TileGrid::from_rows(&["CC.T", "MSXT"]).unwrap()
}

fn quiet(category: FoodCategory) -> Kitchen {
    let config = KitchenConfig {
        spawn_on_start: false,
        ..KitchenConfig::default().with_category(category)
    };
    let mut kitchen = Kitchen::new(two_table_grid(), config);
    kitchen.start().unwrap();
    kitchen
}

fn record(kitchen: &mut Kitchen, kind: EventKind) -> Rc<RefCell<Vec<Event>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    kitchen.on_event(kind, Box::new(move |e| sink.borrow_mut().push(e.clone())));
    seen
}

// ===========================================================================
// Portions
// ===========================================================================
//
// A pot of cooked rice (5 portions) on a counter; sliced fish dropped onto it
// five times. The first four drops each send a nigiri back to the fish's
// counter; the fifth turns the pot itself into nigiri.

#[test]
fn five_fish_drops_exhaust_the_rice_pot() {
    let mut k = quiet(FoodCategory::Sushi);
    let pot = spawn_at(&mut k, FoodItem::PotCookedRice, A);

    for drop in 0..4u32 {
        let fish = spawn_at(&mut k, FoodItem::SlicedFish, B);
        k.grab_from_tile(B).unwrap();
        let outcome = k.drop_held(Some(A)).unwrap();
        assert_eq!(
            outcome,
            DropOutcome::Combined {
                result: FoodItem::Nigiri,
                resolution: CombineResolution::OccupantPortioned {
                    remaining: 4 - drop
                },
            }
        );
        assert_eq!(k.item_at(A), Some(FoodItem::PotCookedRice));
        assert_eq!(k.food(pot).unwrap().portions, Some(4 - drop));
        assert_eq!(k.food_at(B), Some(fish));
        assert_eq!(k.item_at(B), Some(FoodItem::Nigiri));
        assert_consistent(&k);

        drag(&mut k, B, BIN);
        assert_eq!(k.food_at(B), None);
    }

    spawn_at(&mut k, FoodItem::SlicedFish, B);
    k.grab_from_tile(B).unwrap();
    let outcome = k.drop_held(Some(A)).unwrap();
    assert_eq!(
        outcome,
        DropOutcome::Combined {
            result: FoodItem::Nigiri,
            resolution: CombineResolution::Merge,
        }
    );
    assert_eq!(k.food_at(A), Some(pot));
    assert_eq!(k.item_at(A), Some(FoodItem::Nigiri));
    assert_eq!(k.food(pot).unwrap().portions, None);
    assert_eq!(k.food_at(B), None);
    assert_eq!(k.food_count(), 1);
    assert_consistent(&k);
}

// ===========================================================================
// Full dish
// ===========================================================================

#[test]
fn nigiri_from_raw_sources_to_a_served_customer() {
    let mut k = quiet(FoodCategory::Sushi);
    let served = record(&mut k, EventKind::CustomerServed);

    // Pot of water, then rice into it.
    place_from_source(&mut k, FoodItem::Pot, TAP);
    assert_eq!(k.item_at(TAP), Some(FoodItem::PotWater));
    place_from_source(&mut k, FoodItem::Rice, TAP);
    assert_eq!(k.item_at(TAP), Some(FoodItem::PotRawRiceWater));

    // Onto the stove.
    drag(&mut k, TAP, STOVE);
    k.advance(5);
    assert_eq!(k.item_at(STOVE), Some(FoodItem::PotCookedRice));

    // Cut a fish on the counter.
    place_from_source(&mut k, FoodItem::WholeFish, A);
    assert_eq!(k.start_gesture(A), Ok(ActionKind::Cut));
    k.advance(k.config.gesture_ticks);
    assert_eq!(k.item_at(A), Some(FoodItem::SlicedFish));

    let customer = k.seat_customer(FoodItem::Nigiri, Some(100)).unwrap();
    assert_eq!(k.customer(customer).unwrap().table, TABLE_1);

    // Rice onto the fish: the pot keeps 4 portions and goes back to the stove.
    drag(&mut k, STOVE, A);
    assert_eq!(k.item_at(A), Some(FoodItem::Nigiri));
    assert_eq!(k.item_at(STOVE), Some(FoodItem::PotCookedRice));
    let pot = k.food_at(STOVE).unwrap();
    assert_eq!(k.food(pot).unwrap().portions, Some(4));

    drag(&mut k, A, TABLE_1);
    assert_eq!(k.score(), 1);
    assert_eq!(k.customer_count(), 0);
    assert_eq!(k.food_at(TABLE_1), None);

    k.step();
    assert_eq!(served.borrow().len(), 1);
    assert!(matches!(
        served.borrow()[0],
        Event::CustomerServed {
            order: FoodItem::Nigiri,
            table: TABLE_1,
            ..
        }
    ));
    assert_consistent(&k);
}

#[test]
fn serving_the_wrong_table_does_nothing() {
    let mut k = quiet(FoodCategory::Steak);
    k.seat_customer(FoodItem::SteakRare, Some(100)).unwrap();
    spawn_at(&mut k, FoodItem::SteakRare, A);
    drag(&mut k, A, TABLE_2);
    assert_eq!(k.score(), 0);
    assert_eq!(k.item_at(TABLE_2), Some(FoodItem::SteakRare));

    drag(&mut k, TABLE_2, TABLE_1);
    assert_eq!(k.score(), 1);
    assert_eq!(k.food_count(), 0);
}

// ===========================================================================
// Cooking chain
// ===========================================================================

#[test]
fn steak_chain_terminates_at_burnt_block() {
    let mut k = quiet(FoodCategory::Steak);
    let transforms = record(&mut k, EventKind::FoodTransformed);
    place_from_source(&mut k, FoodItem::SteakRaw, STOVE);

    k.advance(100);
    assert_eq!(k.item_at(STOVE), Some(FoodItem::BurntBlock));

    let seen: Vec<(FoodItem, FoodItem)> = transforms
        .borrow()
        .iter()
        .filter_map(|e| match e {
            Event::FoodTransformed { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        seen,
        vec![
            (FoodItem::SteakRaw, FoodItem::SteakRare),
            (FoodItem::SteakRare, FoodItem::SteakMedium),
            (FoodItem::SteakMedium, FoodItem::SteakBurnt),
            (FoodItem::SteakBurnt, FoodItem::BurntBlock),
        ]
    );
}

#[test]
fn picking_up_mid_cook_discards_progress() {
    let mut k = quiet(FoodCategory::Steak);
    place_from_source(&mut k, FoodItem::SteakRaw, STOVE);
    k.advance(2);
    drag(&mut k, STOVE, A);
    k.advance(10);
    assert_eq!(k.item_at(A), Some(FoodItem::SteakRaw));

    // Back on the stove the full duration applies again.
    drag(&mut k, A, STOVE);
    k.advance(2);
    assert_eq!(k.item_at(STOVE), Some(FoodItem::SteakRaw));
    k.step();
    assert_eq!(k.item_at(STOVE), Some(FoodItem::SteakRare));
}

// ===========================================================================
// Rejected drops
// ===========================================================================

#[test]
fn off_grid_and_floor_drops_return_home() {
    let mut k = quiet(FoodCategory::Sushi);
    let fish = place_from_source(&mut k, FoodItem::WholeFish, A);

    for target in [Some(AISLE), None, Some(TilePoint::new(-1, 40))] {
        let grabbed = k.handle_pointer(PointerAction::PressTile(A)).unwrap();
        assert_eq!(grabbed, PointerResult::Grabbed(fish));
        let dropped = k.handle_pointer(PointerAction::Release(target)).unwrap();
        assert_eq!(
            dropped,
            PointerResult::Dropped(DropOutcome::Returned {
                food: fish,
                origin: A
            })
        );
        assert_eq!(k.item_at(A), Some(FoodItem::WholeFish));
    }
    assert_eq!(k.food_count(), 1);
}

#[test]
fn returned_food_does_not_resume_cooking() {
    let mut k = quiet(FoodCategory::Steak);
    place_from_source(&mut k, FoodItem::SteakRaw, STOVE);
    k.grab_from_tile(STOVE).unwrap();
    k.drop_held(Some(AISLE)).unwrap();
    let steak = k.food_at(STOVE).unwrap();
    // No tile event runs for an instance snapped back home.
    assert!(!k.food(steak).unwrap().is_busy());
}

// ===========================================================================
// Customers and loss
// ===========================================================================

#[test]
fn impatient_customer_ends_the_game() {
    let mut k = quiet(FoodCategory::Sushi);
    let lost = record(&mut k, EventKind::GameLost);
    spawn_at(&mut k, FoodItem::SlicedFish, A);
    k.seat_customer(FoodItem::Nigiri, Some(1)).unwrap();

    k.step();
    assert_eq!(k.status(), GameStatus::Lost);
    assert_eq!(k.food_count(), 0);
    assert_eq!(k.customer_count(), 0);
    assert_eq!(
        lost.borrow().as_slice(),
        &[Event::GameLost {
            reason: LossReason::PatienceExpired,
            tick: 0
        }]
    );

    k.restart();
    assert_eq!(k.status(), GameStatus::Running);
    assert_eq!(k.tick(), 0);
}

#[test]
fn full_tables_end_the_game() {
    let config = KitchenConfig {
        spawn_curve: DifficultyCurve {
            base: 2,
            step_every: 0,
            floor: 2,
            accelerate_after: None,
            acceleration_divisor: 4,
        },
        patience_curve: DifficultyCurve {
            base: 100,
            step_every: 0,
            floor: 100,
            accelerate_after: None,
            acceleration_divisor: 4,
        },
        ..KitchenConfig::default()
    };
    let mut k = Kitchen::new(two_table_grid(), config);
    let lost = record(&mut k, EventKind::GameLost);
    k.start().unwrap();

    k.advance(2);
    k.advance(2);
    let mut tables: Vec<TilePoint> = k.customers().map(|(_, c)| c.table).collect();
    tables.sort();
    assert_eq!(tables, vec![TABLE_1, TABLE_2]);
    assert_eq!(k.status(), GameStatus::Running);

    k.advance(2);
    assert_eq!(k.status(), GameStatus::Lost);
    assert!(matches!(
        lost.borrow()[0],
        Event::GameLost {
            reason: LossReason::NoFreeTable,
            ..
        }
    ));
}

#[test]
fn pause_holds_patience_and_arrivals() {
    let mut k = Kitchen::new(two_table_grid(), KitchenConfig::default());
    k.start().unwrap();
    k.advance(4);
    k.pause();
    k.advance(100);
    assert_eq!(k.next_customer_in(), Some(6));
    assert_eq!(k.customer_count(), 0);

    // Input still works while paused; cooking waits.
    let mut k2 = quiet(FoodCategory::Steak);
    k2.pause();
    let steak = place_from_source(&mut k2, FoodItem::SteakRaw, STOVE);
    k2.advance(10);
    assert_eq!(k2.item_at(STOVE), Some(FoodItem::SteakRaw));
    assert!(k2.snapshot_food(steak).unwrap().paused);
    k2.resume();
    k2.advance(3);
    assert_eq!(k2.item_at(STOVE), Some(FoodItem::SteakRare));
}

#[test]
fn input_while_paused_reaches_listeners() {
    let mut k = quiet(FoodCategory::Steak);
    let placed = record(&mut k, EventKind::FoodPlaced);
    k.pause();
    place_from_source(&mut k, FoodItem::SteakRaw, A);
    for i in 0..300 {
        let (from, to) = if i % 2 == 0 { (A, B) } else { (B, A) };
        drag(&mut k, from, to);
    }
    // More than the ring buffer holds, and nothing has stepped.
    assert_eq!(placed.borrow().len(), 301);

    k.resume();
    k.step();
    assert_eq!(placed.borrow().len(), 301);
}

// ===========================================================================
// Tutorial
// ===========================================================================

#[derive(Default)]
struct Log {
    calls: Vec<String>,
}

#[derive(Clone, Default)]
struct SharedLog(Rc<RefCell<Log>>);

impl Highlighter for SharedLog {
    fn highlight_tile(&mut self, kind: TileKind) {
        self.0.borrow_mut().calls.push(format!("tile {kind:?}"));
    }
    fn highlight_customer(&mut self, order: FoodItem) {
        self.0.borrow_mut().calls.push(format!("customer {order:?}"));
    }
    fn tutorial_ended(&mut self) {
        self.0.borrow_mut().calls.push("ended".into());
    }
}

#[test]
fn sushi_tutorial_runs_to_completion() {
    let mut k = quiet(FoodCategory::Sushi);
    let log = SharedLog::default();
    k.set_highlighter(Box::new(log.clone()));
    k.start_tutorial().unwrap();
    assert_eq!(k.status(), GameStatus::Tutorial);

    // Sliced fish.
    place_from_source(&mut k, FoodItem::WholeFish, A);
    place_from_source(&mut k, FoodItem::Knife, A);
    assert_eq!(k.item_at(A), Some(FoodItem::SlicedFish));
    assert_eq!(k.customer_count(), 1);
    drag(&mut k, A, TABLE_1);
    assert_eq!(k.score(), 1);

    // Nigiri.
    place_from_source(&mut k, FoodItem::WholeFish, A);
    place_from_source(&mut k, FoodItem::Knife, A);
    place_from_source(&mut k, FoodItem::Pot, TAP);
    place_from_source(&mut k, FoodItem::Rice, TAP);
    drag(&mut k, TAP, STOVE);
    assert_eq!(
        k.tutorial_step(),
        Some(TutorialAction::Cook(FoodItem::PotRawRiceWater))
    );
    k.advance(5);
    assert_eq!(k.item_at(STOVE), Some(FoodItem::PotCookedRice));
    drag(&mut k, STOVE, A);
    assert_eq!(k.item_at(A), Some(FoodItem::Nigiri));
    drag(&mut k, A, TABLE_1);

    assert_eq!(k.score(), 2);
    assert_eq!(k.status(), GameStatus::Running);
    assert_eq!(k.tutorial_step(), None);
    assert_eq!(k.food_count(), 0);
    assert_eq!(k.next_customer_in(), Some(10));
    assert_eq!(k.event_bus.buffered_count(EventKind::TutorialEnded), 1);

    let calls = &log.0.borrow().calls;
    assert_eq!(calls.first().map(String::as_str), Some("tile Counter"));
    assert!(calls.iter().any(|c| c == "customer Nigiri"));
    assert_eq!(calls.last().map(String::as_str), Some("ended"));
}

#[test]
fn tutorial_ignores_out_of_order_actions() {
    let mut k = quiet(FoodCategory::Sushi);
    k.start_tutorial().unwrap();
    let first = k.tutorial_step();

    place_from_source(&mut k, FoodItem::Pot, TAP);
    place_from_source(&mut k, FoodItem::Knife, A);
    assert_eq!(k.tutorial_step(), first);
}

#[test]
fn opening_mid_tutorial_clears_tutorial_state() {
    let mut k = Kitchen::new(TileGrid::default_kitchen(), KitchenConfig::default());
    k.start_tutorial().unwrap();
    place_from_source(&mut k, FoodItem::WholeFish, COUNTER);
    place_from_source(&mut k, FoodItem::Knife, COUNTER);
    assert_eq!(k.tutorial_step(), Some(TutorialAction::Serve(FoodItem::SlicedFish)));
    assert_eq!(k.customer_count(), 1);
    assert_eq!(k.food_count(), 1);

    k.start().unwrap();
    assert_eq!(k.status(), GameStatus::Running);
    assert_eq!(k.tutorial_step(), None);
    assert_eq!(k.customer_count(), 0);
    assert_eq!(k.food_count(), 0);

    // The only table is free for the first real arrival.
    k.advance(10);
    assert_eq!(k.customer_count(), 1);
    assert_eq!(k.status(), GameStatus::Running);
}
