//! Serde data file structs for kitchen definitions.
//!
//! These structs define the on-disk format for kitchen layouts and tuning.
//! They are deserialized from RON, JSON, or TOML data files and then
//! resolved into core types by the loader.

use dishdash_core::config::KitchenConfig;
use dishdash_core::customer::DifficultyCurve;
use dishdash_core::fixed::Ticks;
use dishdash_core::grid::{GridError, TileGrid};
use dishdash_core::item::FoodCategory;
use serde::Deserialize;

// ===========================================================================
// Layout
// ===========================================================================

/// A kitchen layout: one ASCII string per grid row, top row first.
///
/// Glyphs: `C` counter, `M` machine, `S` sink, `T` table, `X` trashcan,
/// `.` floor, `?` unknown.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutData {
    pub rows: Vec<String>,
}

impl LayoutData {
    pub fn to_grid(&self) -> Result<TileGrid, GridError> {
        TileGrid::from_rows(&self.rows)
    }
}

// ===========================================================================
// Tuning
// ===========================================================================

/// Overrides for [`KitchenConfig`]. Every field is optional; absent fields
/// keep the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuningData {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub category: Option<FoodCategory>,
    #[serde(default)]
    pub points_per_serve: Option<u32>,
    #[serde(default)]
    pub spawn_curve: Option<DifficultyCurve>,
    #[serde(default)]
    pub patience_curve: Option<DifficultyCurve>,
    #[serde(default)]
    pub gesture_ticks: Option<Ticks>,
    #[serde(default)]
    pub event_capacity: Option<usize>,
    #[serde(default)]
    pub spawn_on_start: Option<bool>,
}

impl TuningData {
    /// Apply the overrides on top of `base`.
    pub fn apply(self, base: KitchenConfig) -> KitchenConfig {
        KitchenConfig {
            seed: self.seed.unwrap_or(base.seed),
            category: self.category.unwrap_or(base.category),
            points_per_serve: self.points_per_serve.unwrap_or(base.points_per_serve),
            spawn_curve: self.spawn_curve.unwrap_or(base.spawn_curve),
            patience_curve: self.patience_curve.unwrap_or(base.patience_curve),
            gesture_ticks: self.gesture_ticks.unwrap_or(base.gesture_ticks),
            event_capacity: self.event_capacity.unwrap_or(base.event_capacity),
            spawn_on_start: self.spawn_on_start.unwrap_or(base.spawn_on_start),
        }
    }
}
