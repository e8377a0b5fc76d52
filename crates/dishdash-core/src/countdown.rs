//! A pausable, cancelable logical countdown.
//!
//! Food instances and customers both embed a [`Countdown`]; the kitchen ticks
//! them once per step and reacts to expiry. Cancel discards the remaining
//! time, pause keeps it.

use crate::fixed::{Fixed64, Ticks, fraction};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CountdownState {
    #[default]
    Idle,
    Counting { remaining: Ticks, total: Ticks },
    Expired,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Countdown {
    state: CountdownState,
    paused: bool,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// A countdown already running for `total` ticks.
    pub fn started(total: Ticks) -> Self {
        let mut countdown = Self::new();
        countdown.start(total);
        countdown
    }

    /// Begin counting down from `total`, replacing any previous state. A zero
    /// duration still takes one tick to expire. Clears the pause flag.
    pub fn start(&mut self, total: Ticks) {
        let total = total.max(1);
        self.state = CountdownState::Counting {
            remaining: total,
            total,
        };
        self.paused = false;
    }

    /// Advance by one tick. Returns `true` exactly once, on the tick the
    /// countdown reaches zero.
    pub fn tick(&mut self) -> bool {
        if self.paused {
            return false;
        }
        match &mut self.state {
            CountdownState::Counting { remaining, .. } => {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    self.state = CountdownState::Expired;
                    return true;
                }
                false
            }
            CountdownState::Idle | CountdownState::Expired => false,
        }
    }

    /// Discard any remaining time.
    pub fn cancel(&mut self) {
        self.state = CountdownState::Idle;
        self.paused = false;
    }

    /// Freeze the remaining time until [`Countdown::resume`].
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Counting, whether or not paused.
    pub fn is_active(&self) -> bool {
        matches!(self.state, CountdownState::Counting { .. })
    }

    pub fn remaining(&self) -> Option<Ticks> {
        match self.state {
            CountdownState::Counting { remaining, .. } => Some(remaining),
            _ => None,
        }
    }

    /// Elapsed fraction in `[0, 1]`, for drawing timer gauges.
    pub fn progress(&self) -> Fixed64 {
        match self.state {
            CountdownState::Idle => Fixed64::ZERO,
            CountdownState::Counting { remaining, total } => fraction(total - remaining, total),
            CountdownState::Expired => Fixed64::from_num(1),
        }
    }
}
