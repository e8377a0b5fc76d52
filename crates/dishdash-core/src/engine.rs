//! The kitchen: owns every food instance, customer and timer, and turns
//! pointer input and elapsed ticks into state changes.
//!
//! # Architecture
//!
//! The [`Kitchen`] owns:
//! - An immutable [`TileGrid`] and a tile occupancy map (one instance per tile)
//! - Food instances in a [`SlotMap`] keyed by [`FoodId`]
//! - Seated customers in a [`SlotMap`] keyed by [`CustomerId`]
//! - The customer spawner countdown and a seeded [`SimRng`] for orders
//! - A [`TutorialSequencer`] and the presentation-side [`Highlighter`]
//! - An [`EventBus`] for typed kitchen events
//!
//! Pointer input ([`Kitchen::handle_pointer`]) is applied immediately and
//! atomically: a drop resolves its placement and every follow-up tile event
//! before returning.
//!
//! # Step phases
//!
//! Each [`Kitchen::step`] advances one tick:
//! 1. **Food timers** -- cook and gesture countdowns; expiry transforms food
//! 2. **Patience** -- customer countdowns; expiry loses the game
//! 3. **Spawner** -- seat the next customer when its countdown expires
//! 4. **Post-tick** -- deliver buffered events to listeners
//! 5. **Bookkeeping** -- tick counter and state hash

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::config::KitchenConfig;
use crate::countdown::Countdown;
use crate::customer::{Customer, reserve_table};
use crate::event::{Event, EventBus, EventKind, Listener};
use crate::fixed::Ticks;
use crate::food::{FoodInstance, FoodTask};
use crate::grid::{TileGrid, TileKind};
use crate::id::{CustomerId, FoodId, TilePoint};
use crate::item::{FoodCategory, FoodItem};
use crate::placement::{CombineResolution, Dispatch, DropOutcome, resolve_combine};
use crate::recipe::{self, ActionKind};
use crate::rng::SimRng;
use crate::sim::{GameStatus, LossReason, SimState, StateHash};
use crate::tutorial::{Highlighter, NoHighlights, TutorialAction, TutorialProgress, TutorialSequencer};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Pointer or lifecycle requests the kitchen refuses. Invalid *placements*
/// are not errors; they resolve to a [`DropOutcome`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KitchenError {
    #[error("already holding {0}")]
    AlreadyHolding(FoodItem),
    #[error("nothing is held")]
    NothingHeld,
    #[error("no food at {0}")]
    EmptyTile(TilePoint),
    #[error("{item} is not a source for {category:?}")]
    NotASource {
        item: FoodItem,
        category: FoodCategory,
    },
    #[error("the game is lost; restart to continue")]
    GameLost,
    #[error("food at {0} already has a countdown running")]
    Busy(TilePoint),
    #[error("gestures are performed on counters, not {0:?}")]
    NotACounter(TileKind),
    #[error("no gesture applies to {item} at {tile}")]
    NoGesture { item: FoodItem, tile: TilePoint },
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Pointer input, already translated from screen space by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    /// Pointer down on a source toolbar entry.
    PressSource(FoodItem),
    /// Pointer down on a grid tile.
    PressTile(TilePoint),
    /// Pointer up over a tile, or off the grid.
    Release(Option<TilePoint>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerResult {
    Grabbed(FoodId),
    Dropped(DropOutcome),
}

/// The instance currently being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Held {
    food: FoodId,
    /// Tile it was picked up from. `None` for fresh source items.
    origin: Option<TilePoint>,
}

impl Held {
    fn from_source(&self) -> bool {
        self.origin.is_none()
    }
}

// ---------------------------------------------------------------------------
// Kitchen
// ---------------------------------------------------------------------------

pub struct Kitchen {
    pub grid: TileGrid,
    pub config: KitchenConfig,
    pub sim_state: SimState,
    pub event_bus: EventBus,

    pub(crate) foods: SlotMap<FoodId, FoodInstance>,
    pub(crate) occupancy: HashMap<TilePoint, FoodId>,
    held: Option<Held>,

    pub(crate) customers: SlotMap<CustomerId, Customer>,
    /// Counts down to the next arrival. Idle outside normal play.
    pub(crate) spawner: Countdown,
    rng: SimRng,

    tutorial: TutorialSequencer,
    /// Set when the last step completes; the tutorial is torn down once the
    /// current operation finishes.
    tutorial_done: bool,
    highlighter: Box<dyn Highlighter>,

    last_state_hash: u64,
}

impl std::fmt::Debug for Kitchen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kitchen")
            .field("sim_state", &self.sim_state)
            .field("foods", &self.foods.len())
            .field("customers", &self.customers.len())
            .field("held", &self.held)
            .field("tutorial", &self.tutorial)
            .finish_non_exhaustive()
    }
}

impl Kitchen {
    pub fn new(grid: TileGrid, config: KitchenConfig) -> Self {
        Self {
            grid,
            event_bus: EventBus::new(config.event_capacity),
            rng: SimRng::new(config.seed),
            config,
            sim_state: SimState::new(),
            foods: SlotMap::with_key(),
            occupancy: HashMap::new(),
            held: None,
            customers: SlotMap::with_key(),
            spawner: Countdown::new(),
            tutorial: TutorialSequencer::new(),
            tutorial_done: false,
            highlighter: Box::new(NoHighlights),
            last_state_hash: 0,
        }
    }

    /// Route tutorial highlight requests to the presentation layer.
    pub fn set_highlighter(&mut self, highlighter: Box<dyn Highlighter>) {
        self.highlighter = highlighter;
    }

    // -----------------------------------------------------------------------
    // Event system
    // -----------------------------------------------------------------------

    pub fn suppress_event(&mut self, kind: EventKind) {
        self.event_bus.suppress(kind);
    }

    pub fn on_event(&mut self, kind: EventKind, listener: Listener) {
        self.event_bus.on(kind, listener);
    }

    /// Buffer an event. While paused nothing steps, so listeners hear it
    /// right away instead of the ring buffer wrapping.
    fn emit(&mut self, event: Event) {
        self.event_bus.emit(event);
        if self.sim_state.paused {
            self.event_bus.deliver();
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Open the kitchen for normal play. No-op if already running.
    pub fn start(&mut self) -> Result<(), KitchenError> {
        match self.sim_state.status {
            GameStatus::Lost => return Err(KitchenError::GameLost),
            GameStatus::Running => return Ok(()),
            GameStatus::Ready | GameStatus::Tutorial => {}
        }
        if self.sim_state.status == GameStatus::Tutorial {
            self.highlighter.clear_highlights();
            self.leave_tutorial();
        }
        self.sim_state.status = GameStatus::Running;
        if self.config.spawn_on_start {
            self.schedule_next_customer();
        }
        log::info!("kitchen open ({:?})", self.config.category);
        Ok(())
    }

    /// Clear the kitchen and walk the player through the category's
    /// tutorial. Customers only appear when a step asks for one.
    pub fn start_tutorial(&mut self) -> Result<(), KitchenError> {
        if self.sim_state.status == GameStatus::Lost {
            return Err(KitchenError::GameLost);
        }
        self.spawner.cancel();
        self.customers.clear();
        self.clear_food();
        self.sim_state.status = GameStatus::Tutorial;
        self.tutorial_done = false;

        let steps = self.config.category.tutorial_sequence();
        if self.tutorial.initiate(steps, self.highlighter.as_mut()) {
            self.sync_tutorial_state();
        } else {
            self.end_tutorial();
        }
        Ok(())
    }

    /// Freeze every countdown. Input is still accepted, and its events go
    /// to listeners as they happen.
    pub fn pause(&mut self) {
        if self.sim_state.paused {
            return;
        }
        self.sim_state.paused = true;
        self.spawner.pause();
        self.foods.values_mut().for_each(|f| f.countdown.pause());
        self.customers
            .values_mut()
            .filter_map(|c| c.patience.as_mut())
            .for_each(Countdown::pause);
        log::debug!("paused at tick {}", self.sim_state.tick);
    }

    /// Unfreeze. The spawner stays off during the tutorial.
    pub fn resume(&mut self) {
        if !self.sim_state.paused {
            return;
        }
        self.sim_state.paused = false;
        if self.sim_state.status != GameStatus::Tutorial {
            self.spawner.resume();
        }
        self.foods.values_mut().for_each(|f| f.countdown.resume());
        self.customers
            .values_mut()
            .filter_map(|c| c.patience.as_mut())
            .for_each(Countdown::resume);
        log::debug!("resumed at tick {}", self.sim_state.tick);
    }

    /// Reset score, customers, food, timers and the RNG, then start again.
    pub fn restart(&mut self) {
        self.spawner.cancel();
        self.customers.clear();
        self.clear_food();
        self.tutorial.cancel();
        self.tutorial_done = false;
        self.highlighter.clear_highlights();
        self.event_bus.clear_all();
        self.rng = SimRng::new(self.config.seed);
        self.sim_state = SimState::new();
        self.last_state_hash = 0;
        log::info!("kitchen restarted");
        // Status is Ready here, so start cannot fail.
        let _ = self.start();
    }

    fn lose(&mut self, reason: LossReason) {
        if self.sim_state.status == GameStatus::Lost {
            return;
        }
        self.sim_state.status = GameStatus::Lost;
        self.spawner.cancel();
        self.customers.clear();
        self.clear_food();
        self.tutorial.cancel();
        self.highlighter.clear_highlights();
        let tick = self.sim_state.tick;
        self.emit(Event::GameLost { reason, tick });
        log::info!(
            "game lost at tick {tick} ({reason:?}), score {}",
            self.sim_state.score
        );
    }

    fn ensure_playing(&self) -> Result<(), KitchenError> {
        if self.sim_state.status.accepts_input() {
            Ok(())
        } else {
            Err(KitchenError::GameLost)
        }
    }

    // -----------------------------------------------------------------------
    // Pointer input
    // -----------------------------------------------------------------------

    pub fn handle_pointer(&mut self, action: PointerAction) -> Result<PointerResult, KitchenError> {
        match action {
            PointerAction::PressSource(item) => self.grab_from_source(item).map(PointerResult::Grabbed),
            PointerAction::PressTile(tile) => self.grab_from_tile(tile).map(PointerResult::Grabbed),
            PointerAction::Release(target) => self.drop_held(target).map(PointerResult::Dropped),
        }
    }

    /// Pull a fresh instance from the source toolbar. It has no origin, so a
    /// rejected drop discards it.
    pub fn grab_from_source(&mut self, item: FoodItem) -> Result<FoodId, KitchenError> {
        self.ensure_playing()?;
        self.ensure_empty_hand()?;
        if !self.config.category.is_source(item) {
            return Err(KitchenError::NotASource {
                item,
                category: self.config.category,
            });
        }
        let mut food = FoodInstance::new(item);
        if let Some(TutorialAction::Cook(target)) = self.tutorial.current() {
            food.stop_after = Some(target);
        }
        let id = self.foods.insert(food);
        self.held = Some(Held {
            food: id,
            origin: None,
        });
        let tick = self.sim_state.tick;
        self.emit(Event::FoodSpawned {
            food: id,
            item,
            tick,
        });
        log::debug!("grabbed {item} from source");
        Ok(id)
    }

    /// Pick up the instance on `tile`. Any running countdown is cancelled.
    pub fn grab_from_tile(&mut self, tile: TilePoint) -> Result<FoodId, KitchenError> {
        self.ensure_playing()?;
        self.ensure_empty_hand()?;
        let id = self
            .occupancy
            .remove(&tile)
            .ok_or(KitchenError::EmptyTile(tile))?;
        if let Some(food) = self.foods.get_mut(id) {
            food.tile = None;
            let cancelled = food.stop_timer();
            log::debug!("picked up {} from {tile}", food.item);
            if cancelled {
                let tick = self.sim_state.tick;
                self.emit(Event::CountdownCancelled { food: id, tick });
            }
        }
        self.held = Some(Held {
            food: id,
            origin: Some(tile),
        });
        Ok(id)
    }

    fn ensure_empty_hand(&self) -> Result<(), KitchenError> {
        match self.held.and_then(|h| self.foods.get(h.food)) {
            Some(food) => Err(KitchenError::AlreadyHolding(food.item)),
            None => Ok(()),
        }
    }

    /// Release the held instance over `target` (`None` for off-grid). The
    /// placement and every resulting tile event complete before returning.
    pub fn drop_held(&mut self, target: Option<TilePoint>) -> Result<DropOutcome, KitchenError> {
        self.ensure_playing()?;
        let held = self.held.take().ok_or(KitchenError::NothingHeld)?;
        if !self.foods.contains_key(held.food) {
            return Err(KitchenError::NothingHeld);
        }

        let (outcome, dispatch) = self.place(held, target);
        for id in dispatch.0 {
            self.fire_tile_event(id);
        }
        self.settle_tutorial();
        Ok(outcome)
    }

    /// Start a timed gesture (cutting, ...) on the instance resting on a
    /// counter.
    pub fn start_gesture(&mut self, tile: TilePoint) -> Result<ActionKind, KitchenError> {
        self.ensure_playing()?;
        let kind = self.grid.kind_at(tile);
        if kind != TileKind::Counter {
            return Err(KitchenError::NotACounter(kind));
        }
        let id = *self
            .occupancy
            .get(&tile)
            .ok_or(KitchenError::EmptyTile(tile))?;
        let duration = self.config.gesture_ticks;
        let food = self
            .foods
            .get_mut(id)
            .ok_or(KitchenError::EmptyTile(tile))?;
        if food.is_busy() {
            return Err(KitchenError::Busy(tile));
        }
        let item = food.item;
        let action = food
            .start_gesture(duration)
            .ok_or(KitchenError::NoGesture { item, tile })?;
        if self.sim_state.paused {
            food.countdown.pause();
        }
        let tick = self.sim_state.tick;
        self.emit(Event::CountdownStarted {
            food: id,
            duration,
            tick,
        });
        log::debug!("{action:?} started on {item} at {tile}");
        Ok(action)
    }

    // -----------------------------------------------------------------------
    // Placement
    // -----------------------------------------------------------------------

    fn place(&mut self, held: Held, target: Option<TilePoint>) -> (DropOutcome, Dispatch) {
        let tile = match target {
            Some(tile) if self.grid.is_placeable(tile) => tile,
            _ => return (self.reject(held), Dispatch::none()),
        };
        match self.occupancy.get(&tile).copied() {
            Some(occupant) => self.combine_onto(held, occupant, tile),
            None => {
                let Some(item) = self.put_on_tile(held.food, tile) else {
                    return (self.reject(held), Dispatch::none());
                };
                let tick = self.sim_state.tick;
                self.emit(Event::FoodPlaced {
                    food: held.food,
                    item,
                    tile,
                    tick,
                });
                log::debug!("placed {item} at {tile}");

                let kind = self.grid.kind_at(tile);
                self.observe(TutorialAction::Action(item, kind));
                if held.from_source() {
                    self.observe(TutorialAction::GrabSourceToTile(item, kind));
                }
                (
                    DropOutcome::Placed {
                        food: held.food,
                        tile,
                    },
                    Dispatch::one(held.food),
                )
            }
        }
    }

    /// Seat an instance on an empty tile, stopping any countdown. Returns
    /// its item.
    fn put_on_tile(&mut self, id: FoodId, tile: TilePoint) -> Option<FoodItem> {
        let food = self.foods.get_mut(id)?;
        food.tile = Some(tile);
        food.stop_timer();
        self.occupancy.insert(tile, id);
        Some(food.item)
    }

    fn combine_onto(
        &mut self,
        held: Held,
        occupant: FoodId,
        tile: TilePoint,
    ) -> (DropOutcome, Dispatch) {
        let (Some(incoming_item), Some(occupant_item)) = (
            self.foods.get(held.food).map(|f| f.item),
            self.foods.get(occupant).map(|f| f.item),
        ) else {
            return (self.reject(held), Dispatch::none());
        };
        let Some(result) = recipe::combine(occupant_item, incoming_item) else {
            log::debug!("{incoming_item} does not combine with {occupant_item}");
            return (self.reject(held), Dispatch::none());
        };

        for id in [held.food, occupant] {
            self.cancel_timer(id);
        }

        let mut incoming_portions = self.foods[held.food].portions;
        let mut occupant_portions = self.foods[occupant].portions;
        let resolution = resolve_combine(&mut incoming_portions, &mut occupant_portions);
        self.set_portions(held.food, incoming_portions);
        self.set_portions(occupant, occupant_portions);

        self.observe(TutorialAction::Combine(incoming_item, occupant_item));
        if held.from_source() {
            self.observe(TutorialAction::GrabSourceToFoodItem(incoming_item, occupant_item));
        }
        log::debug!("combined {incoming_item} with {occupant_item} at {tile}: {resolution:?}");

        let mut dispatch = Dispatch::none();
        match resolution {
            CombineResolution::IncomingPortioned { .. } => {
                self.transform(occupant, result);
                self.return_to_origin(held);
                dispatch.push(held.food);
                dispatch.push(occupant);
            }
            CombineResolution::OccupantPortioned { .. } => {
                self.transform(held.food, result);
                self.return_to_origin(held);
                dispatch.push(held.food);
                dispatch.push(occupant);
            }
            CombineResolution::Merge => {
                self.transform(occupant, result);
                self.remove_food(held.food);
                dispatch.push(occupant);
            }
        }
        (DropOutcome::Combined { result, resolution }, dispatch)
    }

    fn set_portions(&mut self, id: FoodId, portions: Option<u32>) {
        let Some(food) = self.foods.get_mut(id) else {
            return;
        };
        if food.portions == portions {
            return;
        }
        food.portions = portions;
        if let Some(remaining) = portions {
            let tick = self.sim_state.tick;
            self.emit(Event::PortionTaken {
                food: id,
                remaining,
                tick,
            });
        }
    }

    /// Snap a rejected instance back to its origin, or discard it.
    fn reject(&mut self, held: Held) -> DropOutcome {
        let item = self
            .foods
            .get(held.food)
            .map_or(FoodItem::BurntBlock, |f| f.item);
        match self.return_to_origin(held) {
            Some(origin) => DropOutcome::Returned {
                food: held.food,
                origin,
            },
            None => DropOutcome::Discarded { item },
        }
    }

    /// Put `held` back where it was picked up. Without an origin, or when the
    /// origin has been taken since, the instance is discarded.
    fn return_to_origin(&mut self, held: Held) -> Option<TilePoint> {
        let origin = match held.origin {
            Some(origin) if !self.occupancy.contains_key(&origin) => origin,
            Some(origin) => {
                log::warn!("origin {origin} is occupied; discarding returned food");
                self.remove_food(held.food);
                return None;
            }
            None => {
                self.remove_food(held.food);
                return None;
            }
        };
        let item = self.put_on_tile(held.food, origin)?;
        let tick = self.sim_state.tick;
        self.emit(Event::FoodReturned {
            food: held.food,
            item,
            tile: origin,
            tick,
        });
        Some(origin)
    }

    fn remove_food(&mut self, id: FoodId) {
        let Some(food) = self.foods.remove(id) else {
            return;
        };
        if let Some(tile) = food.tile
            && self.occupancy.get(&tile) == Some(&id)
        {
            self.occupancy.remove(&tile);
        }
        if self.held.is_some_and(|h| h.food == id) {
            self.held = None;
        }
        let tick = self.sim_state.tick;
        self.emit(Event::FoodDiscarded {
            food: id,
            item: food.item,
            tick,
        });
        log::debug!("removed {}", food.item);
    }

    fn clear_food(&mut self) {
        self.held = None;
        self.foods.clear();
        self.occupancy.clear();
    }

    // -----------------------------------------------------------------------
    // Tile events
    // -----------------------------------------------------------------------

    /// React to an instance that now rests on a tile, by tile kind.
    fn fire_tile_event(&mut self, id: FoodId) {
        let Some(tile) = self.foods.get(id).and_then(|f| f.tile) else {
            return;
        };
        match self.grid.kind_at(tile) {
            TileKind::Machine => self.start_cooking(id),
            TileKind::Sink => self.fill_at_sink(id),
            TileKind::Table => self.try_serve(id, tile),
            TileKind::Trashcan => self.remove_food(id),
            TileKind::Counter => {}
            // Placement never leaves food on these.
            TileKind::Floor | TileKind::Unknown => {}
        }
    }

    fn start_cooking(&mut self, id: FoodId) {
        let paused = self.sim_state.paused;
        let Some(food) = self.foods.get_mut(id) else {
            return;
        };
        let Some(duration) = food.start_cooking() else {
            return;
        };
        if paused {
            food.countdown.pause();
        }
        let tick = self.sim_state.tick;
        self.emit(Event::CountdownStarted {
            food: id,
            duration,
            tick,
        });
    }

    fn fill_at_sink(&mut self, id: FoodId) {
        let Some(food) = self.foods.get_mut(id) else {
            return;
        };
        let from = food.item;
        if let Some(to) = food.fill_with_water() {
            self.after_transform(id, from, to);
        }
    }

    fn try_serve(&mut self, id: FoodId, tile: TilePoint) {
        let Some(item) = self.foods.get(id).map(|f| f.item) else {
            return;
        };
        let Some(customer) = self
            .customers
            .iter()
            .find(|(_, c)| c.wants(item, tile))
            .map(|(cid, _)| cid)
        else {
            return;
        };
        self.customers.remove(customer);
        if let Some(food) = self.foods.remove(id) {
            if let Some(at) = food.tile {
                self.occupancy.remove(&at);
            }
        }

        let points = self.config.points_per_serve;
        self.sim_state.score = self.sim_state.score.saturating_add(points);
        let tick = self.sim_state.tick;
        self.emit(Event::CustomerServed {
            customer,
            order: item,
            table: tile,
            tick,
        });
        self.emit(Event::ScoreIncremented {
            points,
            total: self.sim_state.score,
            tick,
        });
        log::info!("served {item} at {tile}; score {}", self.sim_state.score);
        self.observe(TutorialAction::Serve(item));
    }

    // -----------------------------------------------------------------------
    // Transforms
    // -----------------------------------------------------------------------

    /// Replace an instance's item, resetting portions and stopping timers.
    fn transform(&mut self, id: FoodId, to: FoodItem) {
        let Some(food) = self.foods.get_mut(id) else {
            return;
        };
        let from = food.item;
        food.set_item(to);
        self.after_transform(id, from, to);
    }

    fn after_transform(&mut self, id: FoodId, from: FoodItem, to: FoodItem) {
        let tick = self.sim_state.tick;
        self.emit(Event::FoodTransformed {
            food: id,
            from,
            to,
            tick,
        });
        log::debug!("{from} -> {to}");
        if self.sim_state.status == GameStatus::Tutorial
            && let Some(current) = self.tutorial.current()
        {
            current.highlight(self.highlighter.as_mut());
            self.sync_tutorial_state();
        }
    }

    fn cancel_timer(&mut self, id: FoodId) {
        if self.foods.get_mut(id).is_some_and(FoodInstance::stop_timer) {
            let tick = self.sim_state.tick;
            self.emit(Event::CountdownCancelled { food: id, tick });
        }
    }

    /// A food countdown reached zero.
    fn finish_task(&mut self, id: FoodId) {
        let Some(task) = self.foods.get(id).and_then(|f| f.task) else {
            return;
        };
        match task {
            FoodTask::Cook { result } => {
                let Some(cooked) = self.foods.get(id).map(|f| f.item) else {
                    return;
                };
                self.observe(TutorialAction::Cook(cooked));
                // Observing can tear down the tutorial's food.
                let Some(food) = self.foods.get(id) else {
                    return;
                };
                let keep_cooking = food.stop_after != Some(cooked);
                self.transform(id, result);
                if keep_cooking {
                    self.start_cooking(id);
                }
            }
            FoodTask::Gesture { kind, result } => {
                log::debug!("{kind:?} finished");
                self.transform(id, result);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Customers
    // -----------------------------------------------------------------------

    fn schedule_next_customer(&mut self) {
        let interval = self
            .config
            .spawn_curve
            .value(self.sim_state.customers_since_start);
        self.spawner.start(interval);
        if self.sim_state.paused {
            self.spawner.pause();
        }
    }

    fn free_table(&self) -> Option<TilePoint> {
        let tables = self.grid.positions_of(TileKind::Table);
        let occupied: Vec<TilePoint> = self.customers.values().map(|c| c.table).collect();
        reserve_table(&tables, &occupied)
    }

    /// Spawner expiry: seat a random order at the first free table, or lose.
    fn spawn_customer(&mut self) {
        let orders = self.config.category.orderable_items();
        let Some(order) = self.rng.pick(&orders) else {
            log::warn!("{:?} has no orderable items", self.config.category);
            return;
        };
        let Some(table) = self.free_table() else {
            self.lose(LossReason::NoFreeTable);
            return;
        };
        let patience = self
            .config
            .patience_curve
            .value(self.sim_state.customers_since_start);
        self.seat(Customer::new(order, table, patience));
        self.sim_state.customers_since_start += 1;
        self.schedule_next_customer();
    }

    /// Seat a customer at the first free table outside the spawner. `None`
    /// patience waits forever. Returns `None` when every table is taken or
    /// the game is lost.
    pub fn seat_customer(&mut self, order: FoodItem, patience: Option<Ticks>) -> Option<CustomerId> {
        if self.sim_state.status == GameStatus::Lost {
            return None;
        }
        let table = self.free_table()?;
        let customer = match patience {
            Some(ticks) => Customer::new(order, table, ticks),
            None => Customer::patient(order, table),
        };
        Some(self.seat(customer))
    }

    fn seat(&mut self, mut customer: Customer) -> CustomerId {
        if self.sim_state.paused
            && let Some(patience) = customer.patience.as_mut()
        {
            patience.pause();
        }
        let (order, table) = (customer.order, customer.table);
        let id = self.customers.insert(customer);
        let tick = self.sim_state.tick;
        self.emit(Event::CustomerSeated {
            customer: id,
            order,
            table,
            tick,
        });
        log::info!("customer at {table} orders {order}");
        id
    }

    // -----------------------------------------------------------------------
    // Tutorial
    // -----------------------------------------------------------------------

    /// Report a performed action to the tutorial, if one is running.
    fn observe(&mut self, action: TutorialAction) {
        if self.sim_state.status != GameStatus::Tutorial || self.tutorial_done {
            return;
        }
        let tick = self.sim_state.tick;
        match self.tutorial.on_action(action, self.highlighter.as_mut()) {
            TutorialProgress::Ignored => {}
            TutorialProgress::Advanced { step } => {
                self.emit(Event::TutorialAdvanced { step, tick });
                self.sync_tutorial_state();
            }
            TutorialProgress::Finished => {
                self.emit(Event::TutorialAdvanced {
                    step: self.tutorial.len(),
                    tick,
                });
                self.tutorial_done = true;
            }
        }
    }

    /// Apply the side effects of the current step: cook steps hold food at
    /// their target, serve steps need someone to serve.
    fn sync_tutorial_state(&mut self) {
        match self.tutorial.current() {
            Some(TutorialAction::Cook(target)) => {
                self.foods
                    .values_mut()
                    .for_each(|f| f.stop_after = Some(target));
            }
            Some(TutorialAction::Serve(order)) => {
                if !self.customers.values().any(|c| c.order == order)
                    && self.seat_customer(order, None).is_none()
                {
                    log::warn!("no free table for the tutorial's {order} customer");
                }
            }
            _ => {}
        }
    }

    fn settle_tutorial(&mut self) {
        if self.tutorial_done {
            self.tutorial_done = false;
            self.end_tutorial();
        }
    }

    /// Remove what the tutorial left behind: its food and the customers
    /// who never leave.
    fn leave_tutorial(&mut self) {
        self.tutorial.cancel();
        self.tutorial_done = false;
        self.clear_food();
        self.customers.retain(|_, c| c.patience.is_some());
    }

    fn end_tutorial(&mut self) {
        self.leave_tutorial();
        self.sim_state.status = GameStatus::Running;
        let tick = self.sim_state.tick;
        self.emit(Event::TutorialEnded { tick });
        log::info!("tutorial complete");
        self.schedule_next_customer();
    }

    // -----------------------------------------------------------------------
    // Step
    // -----------------------------------------------------------------------

    /// Advance one tick. No-op while paused.
    pub fn step(&mut self) {
        if self.sim_state.paused {
            return;
        }
        self.phase_food_timers();
        self.phase_patience();
        self.phase_spawner();
        self.phase_post_tick();
        self.phase_bookkeeping();
    }

    /// Run `ticks` steps.
    pub fn advance(&mut self, ticks: Ticks) {
        for _ in 0..ticks {
            self.step();
        }
    }

    fn phase_food_timers(&mut self) {
        let expired: Vec<FoodId> = self
            .foods
            .iter_mut()
            .filter_map(|(id, food)| food.countdown.tick().then_some(id))
            .collect();
        for id in expired {
            self.finish_task(id);
        }
        self.settle_tutorial();
    }

    fn phase_patience(&mut self) {
        let expired: Vec<CustomerId> = self
            .customers
            .iter_mut()
            .filter_map(|(id, customer)| customer.tick().then_some(id))
            .collect();
        for id in expired {
            let Some(customer) = self.customers.remove(id) else {
                continue;
            };
            let tick = self.sim_state.tick;
            self.emit(Event::CustomerLeft {
                customer: id,
                order: customer.order,
                table: customer.table,
                tick,
            });
            log::info!("customer at {} left without {}", customer.table, customer.order);
            self.lose(LossReason::PatienceExpired);
        }
    }

    fn phase_spawner(&mut self) {
        if self.spawner.tick() {
            self.spawn_customer();
        }
    }

    fn phase_post_tick(&mut self) {
        self.event_bus.deliver();
    }

    fn phase_bookkeeping(&mut self) {
        self.sim_state.tick += 1;
        self.last_state_hash = self.compute_state_hash();
    }

    fn compute_state_hash(&self) -> u64 {
        let mut hasher = StateHash::new();
        hasher.write_u64(self.sim_state.tick);
        hasher.write_u32(self.sim_state.score);
        hasher.write_u32(self.sim_state.status as u32);
        hasher.write_u64(self.sim_state.customers_since_start);
        hasher.write_u64(self.spawner.remaining().unwrap_or(0));
        hasher.write_u64(self.rng.state());

        // SlotMap iteration order is deterministic for a given history.
        for (_, food) in &self.foods {
            hasher.write_u32(food.item.code());
            match food.tile {
                Some(tile) => {
                    hasher.write_i32(tile.column);
                    hasher.write_i32(tile.row);
                }
                None => hasher.write_u32(u32::MAX),
            }
            hasher.write_u32(food.portions.unwrap_or(u32::MAX));
            hasher.write_u64(food.countdown.remaining().unwrap_or(0));
        }
        for (_, customer) in &self.customers {
            hasher.write_u32(customer.order.code());
            hasher.write_i32(customer.table.column);
            hasher.write_i32(customer.table.row);
            hasher.write_u64(customer.remaining_patience().unwrap_or(u64::MAX));
        }
        hasher.finish()
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn state_hash(&self) -> u64 {
        self.last_state_hash
    }

    pub fn status(&self) -> GameStatus {
        self.sim_state.status
    }

    pub fn is_paused(&self) -> bool {
        self.sim_state.paused
    }

    pub fn score(&self) -> u32 {
        self.sim_state.score
    }

    pub fn tick(&self) -> Ticks {
        self.sim_state.tick
    }

    pub fn food(&self, id: FoodId) -> Option<&FoodInstance> {
        self.foods.get(id)
    }

    pub fn food_at(&self, tile: TilePoint) -> Option<FoodId> {
        self.occupancy.get(&tile).copied()
    }

    pub fn item_at(&self, tile: TilePoint) -> Option<FoodItem> {
        self.food_at(tile)
            .and_then(|id| self.foods.get(id))
            .map(|f| f.item)
    }

    pub fn held(&self) -> Option<FoodId> {
        self.held.map(|h| h.food)
    }

    pub fn food_count(&self) -> usize {
        self.foods.len()
    }

    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.get(id)
    }

    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    pub fn customers(&self) -> impl Iterator<Item = (CustomerId, &Customer)> {
        self.customers.iter()
    }

    /// Ticks until the next arrival, when the spawner is running.
    pub fn next_customer_in(&self) -> Option<Ticks> {
        self.spawner.remaining()
    }

    /// The step the tutorial is waiting for.
    pub fn tutorial_step(&self) -> Option<TutorialAction> {
        self.tutorial.current()
    }

    /// Source toolbar contents for the configured category.
    pub fn sources(&self) -> Vec<FoodItem> {
        self.config.category.food_sources()
    }
}
