//! Consistency checks for the recipe table and for replayable kitchens.
//!
//! The kitchen trusts the rule table: it assumes combine lookups are
//! unambiguous, that no combine has two portionable operands, and that cook
//! chains end. [`validate_rules`] verifies those assumptions;
//! [`validate_determinism`] checks that two kitchens fed the same input stay
//! in lock-step.

use std::collections::BTreeSet;

use crate::config::KitchenConfig;
use crate::engine::{Kitchen, KitchenError, PointerAction};
use crate::grid::TileGrid;
use crate::item::{FoodCategory, FoodItem};
use crate::recipe::{self, ActionRule, CookRule};

// ---------------------------------------------------------------------------
// Rule violations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleViolation {
    #[error("{a} + {b} combines into both {first} and {second}")]
    AmbiguousCombine {
        a: FoodItem,
        b: FoodItem,
        first: FoodItem,
        second: FoodItem,
    },
    #[error("{a} + {b}: both operands are portionable")]
    PortionableOperands { a: FoodItem, b: FoodItem },
    #[error("cooking {start} never terminates")]
    CookCycle { start: FoodItem },
    #[error("{item} cannot be made from the {category:?} sources")]
    Unreachable {
        item: FoodItem,
        category: FoodCategory,
    },
}

/// The lookups validation runs against.
#[derive(Clone, Copy)]
pub struct RuleTable<'a> {
    pub combines: &'a [(FoodItem, FoodItem, FoodItem)],
    pub cook: fn(FoodItem) -> Option<CookRule>,
    pub action: fn(FoodItem) -> Option<ActionRule>,
    pub portions: fn(FoodItem) -> Option<u32>,
}

impl RuleTable<'static> {
    /// The table the kitchen uses.
    pub fn builtin() -> Self {
        Self {
            combines: recipe::COMBINE_RULES,
            cook: recipe::cook_transform,
            action: recipe::action_transform,
            portions: recipe::portion_count,
        }
    }
}

/// Check the built-in rule table. Returns every violation found.
pub fn validate_rules() -> Result<(), Vec<RuleViolation>> {
    validate_table(&RuleTable::builtin())
}

pub fn validate_table(table: &RuleTable<'_>) -> Result<(), Vec<RuleViolation>> {
    let mut violations = Vec::new();
    check_combines(table, &mut violations);
    check_cook_chains(table, &mut violations);
    for category in FoodCategory::CONCRETE {
        check_reachability(table, category, &mut violations);
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn check_combines(table: &RuleTable<'_>, out: &mut Vec<RuleViolation>) {
    for (i, &(a, b, first)) in table.combines.iter().enumerate() {
        for &(c, d, second) in &table.combines[i + 1..] {
            let same_pair = (a, b) == (c, d) || (a, b) == (d, c);
            if same_pair && first != second {
                out.push(RuleViolation::AmbiguousCombine {
                    a,
                    b,
                    first,
                    second,
                });
            }
        }
        if (table.portions)(a).is_some() && (table.portions)(b).is_some() {
            out.push(RuleViolation::PortionableOperands { a, b });
        }
    }
}

fn check_cook_chains(table: &RuleTable<'_>, out: &mut Vec<RuleViolation>) {
    for start in FoodItem::ALL {
        let mut current = start;
        let mut steps = 0;
        while let Some(rule) = (table.cook)(current) {
            current = rule.result;
            steps += 1;
            // A chain longer than the catalog must revisit an item.
            if steps > FoodItem::ALL.len() {
                out.push(RuleViolation::CookCycle { start });
                break;
            }
        }
    }
}

fn check_reachability(
    table: &RuleTable<'_>,
    category: FoodCategory,
    out: &mut Vec<RuleViolation>,
) {
    let mut reached: BTreeSet<FoodItem> = category.food_sources().into_iter().collect();
    loop {
        let mut next = reached.clone();
        for &item in &reached {
            next.extend((table.cook)(item).map(|r| r.result));
            next.extend((table.action)(item).map(|r| r.result));
        }
        for &(a, b, result) in table.combines {
            if reached.contains(&a) && reached.contains(&b) {
                next.insert(result);
            }
        }
        if next.len() == reached.len() {
            break;
        }
        reached = next;
    }
    for item in category.orderable_items() {
        if !reached.contains(&item) {
            out.push(RuleViolation::Unreachable { item, category });
        }
    }
}

// ---------------------------------------------------------------------------
// Determinism validation
// ---------------------------------------------------------------------------

/// Result of a determinism validation run.
#[derive(Debug)]
pub struct DeterminismResult {
    /// Whether the two runs produced identical results.
    pub is_deterministic: bool,
    /// Tick at which divergence was first detected (if any).
    pub divergence_tick: Option<u64>,
    /// Hash log: (tick, hash_run1, hash_run2) for each tick.
    pub hash_log: Vec<(u64, u64, u64)>,
}

/// Run two kitchens built from the same grid and config through the same
/// scripted input, one tick per script entry, and compare state hashes.
/// Each entry is the pointer input applied before that tick's step.
pub fn validate_determinism(
    grid: &TileGrid,
    config: &KitchenConfig,
    script: &[Vec<PointerAction>],
) -> Result<DeterminismResult, KitchenError> {
    let mut kitchen_a = Kitchen::new(grid.clone(), config.clone());
    let mut kitchen_b = Kitchen::new(grid.clone(), config.clone());
    kitchen_a.start()?;
    kitchen_b.start()?;

    let mut hash_log = Vec::new();
    let mut divergence_tick = None;

    for inputs in script {
        for &action in inputs {
            // Refused input is part of the script; both kitchens see it.
            let _ = kitchen_a.handle_pointer(action);
            let _ = kitchen_b.handle_pointer(action);
        }
        kitchen_a.step();
        kitchen_b.step();

        let hash_a = kitchen_a.state_hash();
        let hash_b = kitchen_b.state_hash();
        let tick = kitchen_a.tick();

        hash_log.push((tick, hash_a, hash_b));

        if hash_a != hash_b && divergence_tick.is_none() {
            divergence_tick = Some(tick);
        }
    }

    Ok(DeterminismResult {
        is_deterministic: divergence_tick.is_none(),
        divergence_tick,
        hash_log,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::TilePoint;
    use crate::recipe::CookTime;

    #[test]
    fn builtin_rules_are_valid() {
        assert_eq!(validate_rules(), Ok(()));
    }

    #[test]
    fn ambiguous_pair_detected_in_either_order() {
        let combines = [
            (FoodItem::Knife, FoodItem::WholeFish, FoodItem::SlicedFish),
            (FoodItem::WholeFish, FoodItem::Knife, FoodItem::Riceball),
        ];
        let table = RuleTable {
            combines: &combines,
            ..RuleTable::builtin()
        };
        let err = validate_table(&table).unwrap_err();
        assert!(err.contains(&RuleViolation::AmbiguousCombine {
            a: FoodItem::Knife,
            b: FoodItem::WholeFish,
            first: FoodItem::SlicedFish,
            second: FoodItem::Riceball,
        }));
    }

    #[test]
    fn duplicate_rule_with_same_result_is_fine() {
        let mut combines = recipe::COMBINE_RULES.to_vec();
        combines.push((FoodItem::WholeFish, FoodItem::Knife, FoodItem::SlicedFish));
        let table = RuleTable {
            combines: &combines,
            ..RuleTable::builtin()
        };
        assert_eq!(validate_table(&table), Ok(()));
    }

    #[test]
    fn two_portionable_operands_rejected() {
        let mut combines = recipe::COMBINE_RULES.to_vec();
        combines.push((FoodItem::PotCookedRice, FoodItem::PotCookedRice, FoodItem::Riceball));
        let table = RuleTable {
            combines: &combines,
            ..RuleTable::builtin()
        };
        let err = validate_table(&table).unwrap_err();
        assert_eq!(
            err,
            vec![RuleViolation::PortionableOperands {
                a: FoodItem::PotCookedRice,
                b: FoodItem::PotCookedRice
            }]
        );
    }

    #[test]
    fn cook_cycle_detected() {
        fn looping(item: FoodItem) -> Option<CookRule> {
            match item {
                FoodItem::SteakRare => Some(CookRule {
                    time: CookTime::Short,
                    result: FoodItem::SteakMedium,
                }),
                FoodItem::SteakMedium => Some(CookRule {
                    time: CookTime::Short,
                    result: FoodItem::SteakRare,
                }),
                other => recipe::cook_transform(other),
            }
        }
        let table = RuleTable {
            cook: looping,
            ..RuleTable::builtin()
        };
        let err = validate_table(&table).unwrap_err();
        assert!(err.contains(&RuleViolation::CookCycle {
            start: FoodItem::SteakRare
        }));
        assert!(err.contains(&RuleViolation::CookCycle {
            start: FoodItem::SteakRaw
        }));
    }

    #[test]
    fn unreachable_order_detected() {
        let table = RuleTable {
            combines: &[],
            ..RuleTable::builtin()
        };
        let err = validate_table(&table).unwrap_err();
        assert_eq!(
            err,
            vec![RuleViolation::Unreachable {
                item: FoodItem::Nigiri,
                category: FoodCategory::Sushi
            }]
        );
    }

    #[test]
    fn violation_messages_name_items() {
        let v = RuleViolation::Unreachable {
            item: FoodItem::Nigiri,
            category: FoodCategory::Sushi,
        };
        assert_eq!(v.to_string(), "Nigiri cannot be made from the Sushi sources");
    }

    #[test]
    fn determinism_holds_for_scripted_input() {
        let counter = TilePoint::new(5, 5);
        let script = vec![
            vec![
                PointerAction::PressSource(FoodItem::WholeFish),
                PointerAction::Release(Some(counter)),
            ],
            vec![
                PointerAction::PressSource(FoodItem::Knife),
                PointerAction::Release(Some(counter)),
            ],
            vec![],
            vec![],
        ];
        let result = validate_determinism(
            &TileGrid::default_kitchen(),
            &KitchenConfig::default().with_seed(11),
            &script,
        )
        .unwrap();
        assert!(result.is_deterministic);
        assert_eq!(result.divergence_tick, None);
        assert_eq!(result.hash_log.len(), 4);
        assert_eq!(result.hash_log[3].0, 4);
    }
}
