//! Typed kitchen events with per-kind ring buffers.
//!
//! Events are emitted as the kitchen mutates (pointer handling between steps,
//! timer expiry during steps) and delivered in batch by
//! [`crate::engine::Kitchen::step`]. Each event kind has its own
//! [`EventBuffer`] with a fixed capacity.
//!
//! Listeners are passive: they observe, and any reaction they want goes back
//! through the kitchen's public API on a later call.
//!
//! # Suppression
//!
//! [`EventBus::suppress`] drops a kind entirely. Suppressed events are never
//! buffered.

use crate::fixed::Ticks;
use crate::id::{CustomerId, FoodId, TilePoint};
use crate::item::FoodItem;
use crate::sim::LossReason;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// A kitchen event. All events carry the tick at which they occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // -- Food --
    FoodSpawned {
        food: FoodId,
        item: FoodItem,
        tick: Ticks,
    },
    FoodPlaced {
        food: FoodId,
        item: FoodItem,
        tile: TilePoint,
        tick: Ticks,
    },
    FoodReturned {
        food: FoodId,
        item: FoodItem,
        tile: TilePoint,
        tick: Ticks,
    },
    FoodDiscarded {
        food: FoodId,
        item: FoodItem,
        tick: Ticks,
    },
    FoodTransformed {
        food: FoodId,
        from: FoodItem,
        to: FoodItem,
        tick: Ticks,
    },
    PortionTaken {
        food: FoodId,
        remaining: u32,
        tick: Ticks,
    },

    // -- Timers --
    CountdownStarted {
        food: FoodId,
        duration: Ticks,
        tick: Ticks,
    },
    CountdownCancelled {
        food: FoodId,
        tick: Ticks,
    },

    // -- Customers --
    CustomerSeated {
        customer: CustomerId,
        order: FoodItem,
        table: TilePoint,
        tick: Ticks,
    },
    CustomerServed {
        customer: CustomerId,
        order: FoodItem,
        table: TilePoint,
        tick: Ticks,
    },
    CustomerLeft {
        customer: CustomerId,
        order: FoodItem,
        table: TilePoint,
        tick: Ticks,
    },

    // -- Game --
    ScoreIncremented {
        points: u32,
        total: u32,
        tick: Ticks,
    },
    GameLost {
        reason: LossReason,
        tick: Ticks,
    },
    TutorialAdvanced {
        step: usize,
        tick: Ticks,
    },
    TutorialEnded {
        tick: Ticks,
    },
}

/// Discriminant tag for event types, used for suppression and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    FoodSpawned,
    FoodPlaced,
    FoodReturned,
    FoodDiscarded,
    FoodTransformed,
    PortionTaken,
    CountdownStarted,
    CountdownCancelled,
    CustomerSeated,
    CustomerServed,
    CustomerLeft,
    ScoreIncremented,
    GameLost,
    TutorialAdvanced,
    TutorialEnded,
}

const EVENT_KIND_COUNT: usize = 15;

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::FoodSpawned { .. } => EventKind::FoodSpawned,
            Event::FoodPlaced { .. } => EventKind::FoodPlaced,
            Event::FoodReturned { .. } => EventKind::FoodReturned,
            Event::FoodDiscarded { .. } => EventKind::FoodDiscarded,
            Event::FoodTransformed { .. } => EventKind::FoodTransformed,
            Event::PortionTaken { .. } => EventKind::PortionTaken,
            Event::CountdownStarted { .. } => EventKind::CountdownStarted,
            Event::CountdownCancelled { .. } => EventKind::CountdownCancelled,
            Event::CustomerSeated { .. } => EventKind::CustomerSeated,
            Event::CustomerServed { .. } => EventKind::CustomerServed,
            Event::CustomerLeft { .. } => EventKind::CustomerLeft,
            Event::ScoreIncremented { .. } => EventKind::ScoreIncremented,
            Event::GameLost { .. } => EventKind::GameLost,
            Event::TutorialAdvanced { .. } => EventKind::TutorialAdvanced,
            Event::TutorialEnded { .. } => EventKind::TutorialEnded,
        }
    }

    /// The tick the event was emitted on.
    pub fn tick(&self) -> Ticks {
        match *self {
            Event::FoodSpawned { tick, .. }
            | Event::FoodPlaced { tick, .. }
            | Event::FoodReturned { tick, .. }
            | Event::FoodDiscarded { tick, .. }
            | Event::FoodTransformed { tick, .. }
            | Event::PortionTaken { tick, .. }
            | Event::CountdownStarted { tick, .. }
            | Event::CountdownCancelled { tick, .. }
            | Event::CustomerSeated { tick, .. }
            | Event::CustomerServed { tick, .. }
            | Event::CustomerLeft { tick, .. }
            | Event::ScoreIncremented { tick, .. }
            | Event::GameLost { tick, .. }
            | Event::TutorialAdvanced { tick, .. }
            | Event::TutorialEnded { tick } => tick,
        }
    }
}

impl EventKind {
    fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// EventBuffer
// ---------------------------------------------------------------------------

/// A fixed-capacity ring buffer. When full, the oldest event is dropped.
#[derive(Debug)]
pub struct EventBuffer {
    events: Vec<Option<Event>>,
    /// Next write position.
    head: usize,
    len: usize,
    /// Lifetime count, including dropped events.
    total_written: u64,
}

impl EventBuffer {
    /// A capacity of 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
            total_written: 0,
        }
    }

    pub fn push(&mut self, event: Event) {
        self.events[self.head] = Some(event);
        self.head = (self.head + 1) % self.capacity();
        self.len = (self.len + 1).min(self.capacity());
        self.total_written += 1;
    }

    pub fn capacity(&self) -> usize {
        self.events.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    /// Events lost to wrap-around since creation.
    pub fn dropped_count(&self) -> u64 {
        self.total_written.saturating_sub(self.capacity() as u64)
    }

    /// Oldest to newest.
    pub fn iter(&self) -> EventBufferIter<'_> {
        // Once full, the next write position holds the oldest entry.
        let start = if self.len < self.capacity() { 0 } else { self.head };
        EventBufferIter {
            buffer: self,
            index: start,
            remaining: self.len,
        }
    }

    pub fn clear(&mut self) {
        self.events.iter_mut().for_each(|slot| *slot = None);
        self.head = 0;
        self.len = 0;
    }
}

pub struct EventBufferIter<'a> {
    buffer: &'a EventBuffer,
    index: usize,
    remaining: usize,
}

impl<'a> Iterator for EventBufferIter<'a> {
    type Item = &'a Event;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let event = self.buffer.events[self.index].as_ref();
        self.index = (self.index + 1) % self.buffer.capacity();
        self.remaining -= 1;
        event
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for EventBufferIter<'_> {}

// ---------------------------------------------------------------------------
// Listeners
// ---------------------------------------------------------------------------

/// A passive listener receives events read-only.
pub type Listener = Box<dyn FnMut(&Event)>;

/// Optional predicate that filters events for a listener.
pub type EventFilter = Box<dyn Fn(&Event) -> bool>;

/// Lower priorities run first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListenerPriority {
    Pre = 0,
    Normal = 1,
    Post = 2,
}

struct ListenerEntry {
    listener: Listener,
    priority: ListenerPriority,
    filter: Option<EventFilter>,
    insertion_order: u64,
}

impl std::fmt::Debug for ListenerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("priority", &self.priority)
            .field("filtered", &self.filter.is_some())
            .field("insertion_order", &self.insertion_order)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// One ring buffer per event kind, listener lists, and suppression flags.
pub struct EventBus {
    buffers: [Option<EventBuffer>; EVENT_KIND_COUNT],
    suppressed: [bool; EVENT_KIND_COUNT],
    listeners: [Vec<ListenerEntry>; EVENT_KIND_COUNT],
    default_capacity: usize,
    next_insertion_order: u64,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("buffers", &self.buffers)
            .field("suppressed", &self.suppressed)
            .field("default_capacity", &self.default_capacity)
            .finish_non_exhaustive()
    }
}

impl EventBus {
    pub fn new(default_capacity: usize) -> Self {
        Self {
            buffers: Default::default(),
            suppressed: [false; EVENT_KIND_COUNT],
            listeners: std::array::from_fn(|_| Vec::new()),
            default_capacity,
            next_insertion_order: 0,
        }
    }

    /// Stop recording a kind. Any buffered events of that kind are dropped.
    pub fn suppress(&mut self, kind: EventKind) {
        self.suppressed[kind.index()] = true;
        self.buffers[kind.index()] = None;
    }

    pub fn is_suppressed(&self, kind: EventKind) -> bool {
        self.suppressed[kind.index()]
    }

    /// Buffer an event for the next delivery. No-op for suppressed kinds.
    pub fn emit(&mut self, event: Event) {
        let idx = event.kind().index();
        if self.suppressed[idx] {
            return;
        }
        let capacity = self.default_capacity;
        self.buffers[idx]
            .get_or_insert_with(|| EventBuffer::new(capacity))
            .push(event);
    }

    /// Register a listener with Normal priority and no filter.
    pub fn on(&mut self, kind: EventKind, listener: Listener) {
        self.on_filtered(kind, ListenerPriority::Normal, None, listener);
    }

    pub fn on_filtered(
        &mut self,
        kind: EventKind,
        priority: ListenerPriority,
        filter: Option<EventFilter>,
        listener: Listener,
    ) {
        let insertion_order = self.next_insertion_order;
        self.next_insertion_order += 1;
        let entries = &mut self.listeners[kind.index()];
        entries.push(ListenerEntry {
            listener,
            priority,
            filter,
            insertion_order,
        });
        entries.sort_by_key(|e| (e.priority, e.insertion_order));
    }

    /// Hand every buffered event to its listeners, oldest first, then clear
    /// the buffers. Listeners run in `(priority, registration)` order.
    pub fn deliver(&mut self) {
        for idx in 0..EVENT_KIND_COUNT {
            let Some(buffer) = self.buffers[idx].as_mut() else {
                continue;
            };
            if buffer.is_empty() {
                continue;
            }
            let events: Vec<Event> = buffer.iter().cloned().collect();
            buffer.clear();

            for entry in &mut self.listeners[idx] {
                for event in &events {
                    if entry.filter.as_ref().is_some_and(|keep| !keep(event)) {
                        continue;
                    }
                    (entry.listener)(event);
                }
            }
        }
    }

    pub fn buffer(&self, kind: EventKind) -> Option<&EventBuffer> {
        self.buffers[kind.index()].as_ref()
    }

    pub fn buffered_count(&self, kind: EventKind) -> usize {
        self.buffer(kind).map_or(0, EventBuffer::len)
    }

    /// Lifetime count for a kind, including dropped events.
    pub fn total_emitted(&self, kind: EventKind) -> u64 {
        self.buffer(kind).map_or(0, EventBuffer::total_written)
    }

    /// Clear all buffers. Listeners and suppression are kept.
    pub fn clear_all(&mut self) {
        self.buffers
            .iter_mut()
            .flatten()
            .for_each(EventBuffer::clear);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
