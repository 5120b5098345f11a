//! Opportunity ranking.
//!
//! Ordering is margin descending, then capital ascending, then the canonical
//! leg key so equal opportunities always come out in the same order. An
//! opportunity is dropped if any of its `(condition, outcome)` pairs is
//! already claimed by a better one.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Deserialize;

use crate::domain::id::{ConditionId, OutcomeId};
use crate::domain::opportunity::Opportunity;

/// `[ranking]` settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RankingConfig {
    /// Maximum number of opportunities reported per scan.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    20
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

fn compare(a: &Opportunity, b: &Opportunity) -> Ordering {
    b.margin()
        .cmp(&a.margin())
        .then_with(|| a.capital().cmp(&b.capital()))
        .then_with(|| a.leg_key().cmp(&b.leg_key()))
        .then_with(|| a.kind().cmp(&b.kind()))
        .then_with(|| b.volume().cmp(&a.volume()))
}

/// Sort, deduplicate and truncate `items` to at most `limit`.
#[must_use]
pub fn rank<T: AsRef<Opportunity>>(mut items: Vec<T>, limit: usize) -> Vec<T> {
    items.sort_by(|a, b| compare(a.as_ref(), b.as_ref()));

    let mut claimed: HashSet<(ConditionId, OutcomeId)> = HashSet::new();
    let mut ranked = Vec::with_capacity(limit.min(items.len()));
    for item in items {
        if ranked.len() == limit {
            break;
        }
        let pairs: Vec<(ConditionId, OutcomeId)> = item
            .as_ref()
            .legs()
            .iter()
            .map(|l| (l.condition().clone(), l.outcome().clone()))
            .collect();
        if pairs.iter().any(|p| claimed.contains(p)) {
            continue;
        }
        claimed.extend(pairs);
        ranked.push(item);
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::Side;
    use crate::domain::opportunity::{Direction, OpportunityKind, TradeLeg};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn opp(outcomes: &[(&str, &str)], cost: Decimal, volume: Decimal) -> Opportunity {
        let price = cost / Decimal::from(outcomes.len());
        let legs = outcomes
            .iter()
            .map(|&(c, o)| TradeLeg::new(c.into(), o.into(), Side::Buy, price, volume))
            .collect();
        Opportunity::try_new(
            OpportunityKind::SingleCondition,
            Direction::BuyAll,
            legs,
            Decimal::ONE,
            cost,
            volume,
            1,
            outcomes.iter().map(|&(c, _)| c.into()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn orders_by_margin_then_capital() {
        let ranked = rank(
            vec![
                opp(&[("a", "a1"), ("a", "a2")], dec!(0.95), dec!(10)),
                opp(&[("b", "b1"), ("b", "b2")], dec!(0.90), dec!(10)),
                opp(&[("c", "c1"), ("c", "c2")], dec!(0.90), dec!(5)),
            ],
            10,
        );

        let firsts: Vec<&str> = ranked.iter().map(|o| o.conditions()[0].as_str()).collect();
        assert_eq!(firsts, vec!["c", "b", "a"]);
    }

    #[test]
    fn overlapping_legs_keep_the_better_opportunity() {
        let ranked = rank(
            vec![
                opp(&[("a", "a1"), ("a", "a2")], dec!(0.97), dec!(10)),
                opp(&[("a", "a1"), ("b", "b1")], dec!(0.90), dec!(10)),
            ],
            10,
        );

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].margin(), dec!(0.10));
    }

    #[test]
    fn truncates_to_limit() {
        let items = (0..5)
            .map(|i| {
                let c = format!("c{i}");
                opp(&[(&c, &format!("{c}-y")), (&c, &format!("{c}-n"))], dec!(0.9), dec!(1))
            })
            .collect();
        assert_eq!(rank(items, 3).len(), 3);
    }

    #[test]
    fn ties_are_broken_deterministically() {
        let x = opp(&[("x", "x1"), ("x", "x2")], dec!(0.9), dec!(1));
        let y = opp(&[("y", "y1"), ("y", "y2")], dec!(0.9), dec!(1));

        let forward = rank(vec![x.clone(), y.clone()], 10);
        let backward = rank(vec![y, x], 10);

        assert_eq!(forward, backward);
    }
}
