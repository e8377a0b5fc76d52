//! Game status and per-step bookkeeping types.

use crate::fixed::{Fixed64, Ticks};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Game status
// ---------------------------------------------------------------------------

/// Where the kitchen is in its lifecycle. Pausing is tracked separately and
/// may apply to any status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Built but not started. No customers arrive.
    #[default]
    Ready,
    /// Customers arrive and wait.
    Running,
    /// The guided tutorial is in progress. The spawner is off.
    Tutorial,
    /// A customer was lost. Only `restart` leaves this state.
    Lost,
}

impl GameStatus {
    /// Statuses in which the player may handle food.
    pub fn accepts_input(self) -> bool {
        !matches!(self, GameStatus::Lost)
    }
}

/// Why the game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LossReason {
    /// A seated customer ran out of patience.
    PatienceExpired,
    /// A customer arrived and every table was taken.
    NoFreeTable,
}

// ---------------------------------------------------------------------------
// Simulation state
// ---------------------------------------------------------------------------

/// Mutable counters tracked by the kitchen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimState {
    /// Incremented once per step.
    pub tick: Ticks,
    pub status: GameStatus,
    pub paused: bool,
    pub score: u32,
    /// Customers seated since the last start. Drives the difficulty curves.
    pub customers_since_start: u64,
}

impl SimState {
    pub fn new() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// State hash
// ---------------------------------------------------------------------------

/// Deterministic FNV-1a (64-bit) hash of kitchen state, for replay checks.
/// Not cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(pub u64);

impl StateHash {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self(Self::FNV_OFFSET)
    }

    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(Self::FNV_PRIME);
        }
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_fixed64(&mut self, v: Fixed64) {
        self.write(&v.to_bits().to_le_bytes());
    }

    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}
