//! Tunable kitchen parameters.
//!
//! Every field has a default, so a tuning file only lists what it changes.

use crate::customer::DifficultyCurve;
use crate::fixed::Ticks;
use crate::item::FoodCategory;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitchenConfig {
    /// Seed for order selection.
    pub seed: u64,
    pub category: FoodCategory,
    /// Score awarded per served dish.
    pub points_per_serve: u32,
    /// Ticks between customer arrivals.
    pub spawn_curve: DifficultyCurve,
    /// Ticks a customer waits before leaving.
    pub patience_curve: DifficultyCurve,
    /// Duration of timed gestures such as cutting.
    pub gesture_ticks: Ticks,
    /// Ring buffer capacity per event kind.
    pub event_capacity: usize,
    /// Schedule the first customer as soon as the kitchen starts.
    pub spawn_on_start: bool,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            category: FoodCategory::default(),
            points_per_serve: 1,
            spawn_curve: DifficultyCurve::spawn_interval(),
            patience_curve: DifficultyCurve::patience(),
            gesture_ticks: 3,
            event_capacity: 256,
            spawn_on_start: true,
        }
    }
}

impl KitchenConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_category(mut self, category: FoodCategory) -> Self {
        self.category = category;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = KitchenConfig::default();
        assert_eq!(config.points_per_serve, 1);
        assert_eq!(config.category, FoodCategory::Sushi);
        assert_eq!(config.spawn_curve.value(0), 10);
        assert_eq!(config.patience_curve.value(0), 20);
        assert!(config.spawn_on_start);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: KitchenConfig =
            serde_json::from_str(r#"{ "seed": 9, "category": "Steak" }"#).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.category, FoodCategory::Steak);
        assert_eq!(config.gesture_ticks, 3);
        assert_eq!(config.spawn_curve, DifficultyCurve::spawn_interval());
    }

    #[test]
    fn curve_divisor_defaults_when_omitted() {
        let config: KitchenConfig = serde_json::from_str(
            r#"{ "patience_curve": { "base": 5, "step_every": 1, "floor": 3 } }"#,
        )
        .unwrap();
        assert_eq!(config.patience_curve.accelerate_after, None);
        assert_eq!(config.patience_curve.acceleration_divisor, 4);
        assert_eq!(config.patience_curve.value(1), 4);
    }

    #[test]
    fn builders() {
        let config = KitchenConfig::default()
            .with_seed(3)
            .with_category(FoodCategory::All);
        assert_eq!(config.seed, 3);
        assert_eq!(config.category, FoodCategory::All);
    }
}
