//! Guided tutorial: a cursor over a fixed list of expected player actions.
//!
//! The kitchen reports every action it performs to the sequencer. A report
//! that matches the action under the cursor advances it; anything else is
//! ignored so the player can explore freely. Visual cues are requested
//! through the [`Highlighter`] boundary and never drawn here.

use crate::grid::TileKind;
use crate::item::FoodItem;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TutorialAction
// ---------------------------------------------------------------------------

/// One observable player action.
///
/// Equality on the two-item variants ignores operand order.
#[derive(Debug, Clone, Copy, Eq, Serialize, Deserialize)]
pub enum TutorialAction {
    /// Two items combined on a tile.
    Combine(FoodItem, FoodItem),
    /// A fresh source item dropped on an empty tile of this kind.
    GrabSourceToTile(FoodItem, TileKind),
    /// A fresh source item dropped onto another item.
    GrabSourceToFoodItem(FoodItem, FoodItem),
    /// Any item dropped on an empty tile of this kind.
    Action(FoodItem, TileKind),
    /// A cook countdown finished on this item.
    Cook(FoodItem),
    /// This item was served to a customer.
    Serve(FoodItem),
}

impl PartialEq for TutorialAction {
    fn eq(&self, other: &Self) -> bool {
        use TutorialAction::*;
        match (*self, *other) {
            (Combine(a, b), Combine(c, d))
            | (GrabSourceToFoodItem(a, b), GrabSourceToFoodItem(c, d)) => {
                (a == c && b == d) || (a == d && b == c)
            }
            (GrabSourceToTile(a, t), GrabSourceToTile(b, u)) | (Action(a, t), Action(b, u)) => {
                a == b && t == u
            }
            (Cook(a), Cook(b)) | (Serve(a), Serve(b)) => a == b,
            _ => false,
        }
    }
}

impl TutorialAction {
    /// Ask the highlighter to point at everything this step involves.
    pub fn highlight(self, highlighter: &mut dyn Highlighter) {
        highlighter.clear_highlights();
        match self {
            TutorialAction::Combine(a, b) | TutorialAction::GrabSourceToFoodItem(a, b) => {
                highlighter.highlight_food(a);
                highlighter.highlight_food(b);
            }
            TutorialAction::GrabSourceToTile(item, kind) | TutorialAction::Action(item, kind) => {
                highlighter.highlight_food(item);
                highlighter.highlight_tile(kind);
            }
            TutorialAction::Cook(item) => highlighter.highlight_food(item),
            TutorialAction::Serve(item) => {
                highlighter.highlight_food(item);
                highlighter.highlight_customer(item);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Highlighter boundary
// ---------------------------------------------------------------------------

/// Presentation hooks driven by the tutorial. Every method defaults to a
/// no-op.
pub trait Highlighter {
    fn highlight_food(&mut self, _item: FoodItem) {}
    fn highlight_tile(&mut self, _kind: TileKind) {}
    fn highlight_customer(&mut self, _order: FoodItem) {}
    fn clear_highlights(&mut self) {}
    /// The last step was completed.
    fn tutorial_ended(&mut self) {}
}

/// A highlighter that ignores every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHighlights;

impl Highlighter for NoHighlights {}

// ---------------------------------------------------------------------------
// Sequencer
// ---------------------------------------------------------------------------

/// Result of reporting an action to the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorialProgress {
    /// Not the expected action, or no tutorial running.
    Ignored,
    /// The cursor moved to step `step`.
    Advanced { step: usize },
    /// The final step was completed.
    Finished,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorialSequencer {
    steps: Vec<TutorialAction>,
    /// Index of the expected action. Equal to `steps.len()` when idle.
    cursor: usize,
}

impl TutorialSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `steps` and point at the first one. Returns `false` (leaving the
    /// sequencer idle) when `steps` is empty.
    pub fn initiate(
        &mut self,
        steps: Vec<TutorialAction>,
        highlighter: &mut dyn Highlighter,
    ) -> bool {
        self.steps = steps;
        self.cursor = 0;
        match self.current() {
            Some(action) => {
                log::info!("tutorial started with {} steps", self.steps.len());
                action.highlight(highlighter);
                true
            }
            None => false,
        }
    }

    /// The action the player is expected to perform next.
    pub fn current(&self) -> Option<TutorialAction> {
        self.steps.get(self.cursor).copied()
    }

    pub fn is_active(&self) -> bool {
        self.cursor < self.steps.len()
    }

    /// Index of the expected action.
    pub fn step(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Report an action the player performed.
    pub fn on_action(
        &mut self,
        real: TutorialAction,
        highlighter: &mut dyn Highlighter,
    ) -> TutorialProgress {
        if self.current() != Some(real) {
            return TutorialProgress::Ignored;
        }
        self.cursor += 1;
        match self.current() {
            Some(next) => {
                log::debug!("tutorial step {} -> {next:?}", self.cursor);
                next.highlight(highlighter);
                TutorialProgress::Advanced { step: self.cursor }
            }
            None => {
                log::info!("tutorial finished");
                highlighter.clear_highlights();
                highlighter.tutorial_ended();
                TutorialProgress::Finished
            }
        }
    }

    /// Abandon the tutorial without finishing it.
    pub fn cancel(&mut self) {
        self.steps.clear();
        self.cursor = 0;
    }
}
