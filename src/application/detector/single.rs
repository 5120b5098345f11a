//! Single-condition arbitrage (Layer 1).
//!
//! A binary condition pays exactly 1 across its YES and NO tokens, so:
//!
//! - asks summing below `1 - min_profit` mean buying both locks in a profit
//! - bids summing above `1 + min_profit` mean selling both does
//!
//! Only the best level of each side is considered; Layer 3 does the sizing.

use rust_decimal::Decimal;
use tracing::{debug, trace};

use super::{Detection, DetectionConfig, Detector, WorkUnit};
use crate::domain::book::{PriceLevel, Side};
use crate::domain::id::ConditionKey;
use crate::domain::opportunity::{Direction, Opportunity, OpportunityKind, TradeLeg};
use crate::domain::snapshot::Snapshot;

/// Layer 1 detector over partitions of the binary conditions.
#[derive(Debug, Clone)]
pub struct SingleConditionDetector {
    config: DetectionConfig,
}

impl SingleConditionDetector {
    #[must_use]
    pub const fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &DetectionConfig {
        &self.config
    }

    fn partition_count(&self) -> usize {
        self.config.partitions.unwrap_or_else(num_cpus::get).max(1)
    }
}

impl Detector for SingleConditionDetector {
    fn name(&self) -> &'static str {
        "single_condition"
    }

    fn partition(&self, snapshot: &Snapshot) -> Vec<WorkUnit> {
        let binary: Vec<ConditionKey> = snapshot
            .condition_keys()
            .filter(|&k| snapshot.condition(k).is_binary())
            .collect();
        if binary.is_empty() {
            return Vec::new();
        }

        let chunk = binary.len().div_ceil(self.partition_count());
        binary
            .chunks(chunk)
            .enumerate()
            .map(|(i, keys)| WorkUnit {
                label: format!("single_condition[{i}]"),
                conditions: keys.to_vec(),
            })
            .collect()
    }

    fn detect(&self, snapshot: &Snapshot, unit: &WorkUnit) -> Detection {
        let opportunities: Vec<Opportunity> = unit
            .conditions
            .iter()
            .filter_map(|&key| detect_single_condition(snapshot, key, &self.config))
            .collect();
        trace!(
            unit = %unit.label,
            conditions = unit.conditions.len(),
            found = opportunities.len(),
            "single-condition pass"
        );
        Detection {
            opportunities,
            diagnostics: Vec::new(),
        }
    }
}

/// Check one condition for a buy-both or sell-both mispricing.
///
/// Returns `None` for non-binary conditions, when a required side has no
/// liquidity, or when neither threshold is crossed.
#[must_use]
pub fn detect_single_condition(
    snapshot: &Snapshot,
    key: ConditionKey,
    config: &DetectionConfig,
) -> Option<Opportunity> {
    let condition = snapshot.condition(key);
    let [yes, no] = condition.outcomes() else {
        return None;
    };
    let yes = snapshot.outcome(*yes);
    let no = snapshot.outcome(*no);

    let build = |direction: Direction, side: Side, y: &PriceLevel, n: &PriceLevel| {
        let size = y.size().min(n.size());
        let legs = vec![
            TradeLeg::new(condition.id().clone(), yes.id().clone(), side, y.price(), size),
            TradeLeg::new(condition.id().clone(), no.id().clone(), side, n.price(), size),
        ];
        let sum = y.price() + n.price();
        let (payoff, cost) = match direction {
            Direction::BuyAll => (Decimal::ONE, sum),
            Direction::SellAll => (sum, Decimal::ONE),
        };
        Opportunity::try_new(
            OpportunityKind::SingleCondition,
            direction,
            legs,
            payoff,
            cost,
            size,
            snapshot.version(),
            vec![condition.id().clone()],
        )
        .map_err(|err| debug!(condition = %condition.id(), error = %err, "discarded opportunity"))
        .ok()
    };

    if let (Some(y), Some(n)) = (yes.book().best_ask(), no.book().best_ask()) {
        let cost = y.price() + n.price();
        if cost < config.buy_threshold() {
            debug!(condition = %condition.id(), %cost, "buy-both mispricing");
            return build(Direction::BuyAll, Side::Buy, y, n);
        }
    }

    if let (Some(y), Some(n)) = (yes.book().best_bid(), no.book().best_bid()) {
        let proceeds = y.price() + n.price();
        if proceeds > config.sell_threshold() {
            debug!(condition = %condition.id(), %proceeds, "sell-both mispricing");
            return build(Direction::SellAll, Side::Sell, y, n);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::{ConditionDraft, MarketDraft, OutcomeDraft, SnapshotBuilder};
    use rust_decimal_macros::dec;

    fn config(min_profit: Decimal) -> DetectionConfig {
        DetectionConfig {
            min_profit,
            ..DetectionConfig::default()
        }
    }

    fn snapshot_of(yes: OutcomeDraft, no: OutcomeDraft) -> Snapshot {
        SnapshotBuilder::new(1)
            .market(MarketDraft::new("m").condition(ConditionDraft::new("c").outcome(yes).outcome(no)))
            .build()
    }

    fn first(snapshot: &Snapshot) -> ConditionKey {
        snapshot.condition_keys().next().unwrap()
    }

    #[test]
    fn detects_buy_both() {
        let snapshot = snapshot_of(
            OutcomeDraft::new("yes").ask(dec!(0.40), dec!(100)),
            OutcomeDraft::new("no").ask(dec!(0.50), dec!(60)),
        );

        let opp = detect_single_condition(&snapshot, first(&snapshot), &config(dec!(0.05))).unwrap();

        assert_eq!(opp.direction(), Direction::BuyAll);
        assert_eq!(opp.cost(), dec!(0.90));
        assert_eq!(opp.margin(), dec!(0.10));
        assert_eq!(opp.volume(), dec!(60));
        assert!(opp.legs().iter().all(|l| l.size() == dec!(60) && l.side() == Side::Buy));
    }

    #[test]
    fn detects_sell_both_with_collateral() {
        let snapshot = snapshot_of(
            OutcomeDraft::new("yes").bid(dec!(0.60), dec!(10)).ask(dec!(0.65), dec!(10)),
            OutcomeDraft::new("no").bid(dec!(0.48), dec!(20)).ask(dec!(0.52), dec!(10)),
        );

        let opp = detect_single_condition(&snapshot, first(&snapshot), &config(dec!(0.05))).unwrap();

        assert_eq!(opp.direction(), Direction::SellAll);
        assert_eq!(opp.payoff(), dec!(1.08));
        assert_eq!(opp.cost(), Decimal::ONE);
        assert_eq!(opp.margin(), dec!(0.08));
        assert_eq!(opp.volume(), dec!(10));
        // (1 - 0.60) * 10 + (1 - 0.48) * 10
        assert_eq!(opp.capital(), dec!(9.2));
    }

    #[test]
    fn fair_prices_yield_nothing() {
        let snapshot = snapshot_of(
            OutcomeDraft::new("yes").bid(dec!(0.49), dec!(10)).ask(dec!(0.50), dec!(10)),
            OutcomeDraft::new("no").bid(dec!(0.49), dec!(10)).ask(dec!(0.50), dec!(10)),
        );
        assert!(detect_single_condition(&snapshot, first(&snapshot), &config(dec!(0.01))).is_none());
    }

    #[test]
    fn threshold_is_strict() {
        // 0.48 + 0.50 = 0.98 is not below 1 - 0.02 - epsilon
        let snapshot = snapshot_of(
            OutcomeDraft::new("yes").ask(dec!(0.48), dec!(10)),
            OutcomeDraft::new("no").ask(dec!(0.50), dec!(10)),
        );
        assert!(detect_single_condition(&snapshot, first(&snapshot), &config(dec!(0.02))).is_none());
    }

    #[test]
    fn missing_side_is_skipped() {
        let snapshot = snapshot_of(
            OutcomeDraft::new("yes").ask(dec!(0.10), dec!(10)),
            OutcomeDraft::new("no"),
        );
        assert!(detect_single_condition(&snapshot, first(&snapshot), &config(dec!(0.01))).is_none());
    }

    #[test]
    fn partitions_cover_every_binary_condition() {
        let mut market = MarketDraft::new("m");
        for i in 0..5 {
            market = market.condition(
                ConditionDraft::new(format!("c{i}"))
                    .outcome(OutcomeDraft::new(format!("c{i}-y")))
                    .outcome(OutcomeDraft::new(format!("c{i}-n"))),
            );
        }
        market = market.condition(
            ConditionDraft::new("multi")
                .outcome(OutcomeDraft::new("a"))
                .outcome(OutcomeDraft::new("b"))
                .outcome(OutcomeDraft::new("c")),
        );
        let snapshot = SnapshotBuilder::new(1).market(market).build();

        let detector = SingleConditionDetector::new(DetectionConfig {
            partitions: Some(2),
            ..DetectionConfig::default()
        });
        let units = detector.partition(&snapshot);

        assert_eq!(units.len(), 2);
        let total: usize = units.iter().map(|u| u.conditions.len()).sum();
        assert_eq!(total, 5);
    }
}
