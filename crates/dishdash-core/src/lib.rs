//! DishDash Core -- the kitchen engine for a drag-and-drop cooking game.
//!
//! This crate provides the food catalog, the recipe rule table, the tile
//! grid, food instances with their countdowns, customers and their pacing,
//! the guided tutorial, events, queries, and deterministic fixed-point
//! gauges that every DishDash front end depends on.
//!
//! # Step Pipeline
//!
//! Each call to [`engine::Kitchen::step`] advances the kitchen by one tick
//! (one logical game second) through the following phases:
//!
//! 1. **Food timers** -- Cook and gesture countdowns; expiry transforms food.
//! 2. **Patience** -- Customer countdowns; expiry loses the game.
//! 3. **Spawner** -- Seat the next customer at a free table.
//! 4. **Post-tick** -- Deliver buffered events to listeners.
//! 5. **Bookkeeping** -- Increment tick counter and compute the state hash.
//!
//! # Input
//!
//! Pointer input is applied immediately, not queued:
//!
//! ```rust,ignore
//! kitchen.grab_from_source(FoodItem::WholeFish)?;
//! let outcome = kitchen.drop_held(Some(TilePoint::new(5, 5)))?;
//! ```
//!
//! A drop always resolves to a [`placement::DropOutcome`]; invalid placements
//! snap back to their origin instead of failing.
//!
//! # Key Types
//!
//! - [`engine::Kitchen`] -- Owns every instance, customer and timer.
//! - [`recipe`] -- Pure cook, action, combine and portion lookups.
//! - [`grid::TileGrid`] -- Immutable tile kinds of a kitchen layout.
//! - [`food::FoodInstance`] -- A piece of food whose item changes in place.
//! - [`tutorial::TutorialSequencer`] -- Ordered steps advanced on exact match.
//! - [`event::EventBus`] -- Subscription-based event bus with buffered delivery.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for gauge fractions.

pub mod config;
pub mod countdown;
pub mod customer;
pub mod engine;
pub mod event;
pub mod fixed;
pub mod food;
pub mod grid;
pub mod id;
pub mod item;
pub mod placement;
pub mod query;
pub mod recipe;
pub mod rng;
pub mod sim;
pub mod tutorial;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
