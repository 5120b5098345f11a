//! Layer 1 and Layer 2 detection against the HiGHS backend.

use std::collections::BTreeSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use arbscan::adapter::outbound::solver::HighsSolver;
use arbscan::application::detector::{
    detect_single_condition, group_conditions, CombinatorialDetector, DetectionConfig, Detection,
};
use arbscan::domain::book::Side;
use arbscan::domain::opportunity::{Direction, OpportunityKind};
use arbscan::domain::relation::RelationSpec;
use arbscan::domain::snapshot::{ConditionDraft, MarketDraft, OutcomeDraft, Snapshot, SnapshotBuilder};
use arbscan::testkit::domain::{binary_with_asks, multi_outcome, partitioned_binaries, snapshot_of};

fn config(min_profit: Decimal) -> DetectionConfig {
    DetectionConfig {
        min_profit,
        ..DetectionConfig::default()
    }
}

fn combinatorial(min_profit: Decimal) -> CombinatorialDetector {
    CombinatorialDetector::new(Arc::new(HighsSolver::new()), config(min_profit))
}

/// Run Layer 2 over every combinatorial group of `snapshot`.
fn detect_all(detector: &CombinatorialDetector, snapshot: &Snapshot) -> Detection {
    let mut detection = Detection::none();
    for group in group_conditions(snapshot).iter().filter(|g| g.is_combinatorial()) {
        detection.merge(detector.detect_group(snapshot, group));
    }
    detection
}

fn close(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() <= dec!(0.000001)
}

fn outcome_ids(legs: &[arbscan::domain::opportunity::TradeLeg]) -> BTreeSet<String> {
    legs.iter().map(|l| l.outcome().as_str().to_string()).collect()
}

#[test]
fn buy_both_binary_mispricing() {
    let snapshot = snapshot_of(
        1,
        vec![binary_with_asks("c", (dec!(0.40), dec!(100)), (dec!(0.55), dec!(100)))],
    );
    let key = snapshot.condition_keys().next().unwrap();

    let opp = detect_single_condition(&snapshot, key, &config(dec!(0.02))).unwrap();

    assert_eq!(opp.kind(), OpportunityKind::SingleCondition);
    assert_eq!(opp.direction(), Direction::BuyAll);
    assert_eq!(opp.cost(), dec!(0.95));
    assert_eq!(opp.margin(), dec!(0.05));
    let legs: Vec<_> = opp
        .legs()
        .iter()
        .map(|l| (l.outcome().as_str(), l.side(), l.price()))
        .collect();
    assert_eq!(
        legs,
        vec![("c-yes", Side::Buy, dec!(0.40)), ("c-no", Side::Buy, dec!(0.55))]
    );
}

#[test]
fn single_condition_profit_is_exact_whenever_threshold_is_crossed() {
    let min_profit = dec!(0.02);
    let cfg = config(min_profit);
    let mut crossed = 0;

    for yes_cents in (5..=95).step_by(5) {
        for no_cents in (5..=95).step_by(5) {
            let yes = Decimal::new(yes_cents, 2);
            let no = Decimal::new(no_cents, 2);
            let snapshot = snapshot_of(
                1,
                vec![binary_with_asks("c", (yes, dec!(10)), (no, dec!(10)))],
            );
            let key = snapshot.condition_keys().next().unwrap();
            let found = detect_single_condition(&snapshot, key, &cfg);

            if yes + no < Decimal::ONE - min_profit {
                crossed += 1;
                let opp = found.unwrap_or_else(|| panic!("missed {yes} + {no}"));
                assert_eq!(opp.margin(), Decimal::ONE - (yes + no));
                assert_eq!(opp.expected_profit(), opp.margin() * dec!(10));
            } else {
                assert!(found.is_none(), "spurious {yes} + {no}");
            }
        }
    }
    assert!(crossed > 0);
}

#[test]
fn zero_liquidity_yields_nothing_and_no_diagnostic() {
    let snapshot = snapshot_of(
        1,
        vec![ConditionDraft::new("thin")
            .outcome(OutcomeDraft::new("thin-yes").ask(dec!(0.10), dec!(10)))
            .outcome(OutcomeDraft::new("thin-no"))],
    );
    let key = snapshot.condition_keys().next().unwrap();

    assert!(detect_single_condition(&snapshot, key, &config(dec!(0.01))).is_none());
    assert!(snapshot.diagnostics().is_empty());

    let detection = detect_all(&combinatorial(dec!(0.01)), &snapshot);
    assert!(detection.opportunities.is_empty());
    assert!(detection.diagnostics.is_empty());
}

#[test]
fn three_outcome_condition_is_bought_whole() {
    let snapshot = snapshot_of(
        1,
        vec![multi_outcome(
            "w",
            &[(dec!(0.30), dec!(50)), (dec!(0.30), dec!(50)), (dec!(0.35), dec!(50))],
        )],
    );

    let detection = detect_all(&combinatorial(dec!(0.02)), &snapshot);

    assert!(detection.diagnostics.is_empty(), "{:?}", detection.diagnostics);
    let [opp] = detection.opportunities.as_slice() else {
        panic!("expected one opportunity, got {:?}", detection.opportunities);
    };
    assert_eq!(opp.kind(), OpportunityKind::Combinatorial);
    assert!(close(opp.cost(), dec!(0.95)));
    assert_eq!(opp.payoff(), Decimal::ONE);
    assert!(close(opp.margin(), dec!(0.05)));
    assert_eq!(
        outcome_ids(opp.legs()),
        ["w-0", "w-1", "w-2"].map(String::from).into_iter().collect::<BTreeSet<_>>()
    );
}

#[test]
fn partitioned_binaries_are_bought_across_conditions() {
    let snapshot = partitioned_binaries(1, &[dec!(0.30), dec!(0.30), dec!(0.35)], dec!(20));

    let detection = detect_all(&combinatorial(dec!(0.02)), &snapshot);

    let [opp] = detection.opportunities.as_slice() else {
        panic!("expected one opportunity, got {:?}", detection.opportunities);
    };
    assert!(close(opp.cost(), dec!(0.95)));
    assert!(close(opp.margin(), dec!(0.05)));
    assert_eq!(opp.conditions().len(), 3);
    assert!(opp.legs().iter().all(|l| l.side() == Side::Buy));
}

#[test]
fn containment_exposes_a_cross_condition_basket() {
    // a-yes implies b-yes, so {a-no, b-yes} pays at least 1 in every
    // scenario. Neither condition is mispriced on its own.
    let snapshot = SnapshotBuilder::new(1)
        .market(
            MarketDraft::new("m")
                .condition(binary_with_asks("a", (dec!(0.55), dec!(10)), (dec!(0.50), dec!(10))))
                .condition(binary_with_asks("b", (dec!(0.40), dec!(10)), (dec!(0.65), dec!(10)))),
        )
        .relation(RelationSpec::Containment {
            subset: "a-yes".into(),
            superset: "b-yes".into(),
        })
        .build();
    let cfg = config(dec!(0.02));
    for key in snapshot.condition_keys() {
        assert!(detect_single_condition(&snapshot, key, &cfg).is_none());
    }

    let detection = detect_all(&combinatorial(dec!(0.02)), &snapshot);

    let [opp] = detection.opportunities.as_slice() else {
        panic!("expected one opportunity, got {:?}", detection.opportunities);
    };
    assert!(close(opp.cost(), dec!(0.90)));
    assert_eq!(
        outcome_ids(opp.legs()),
        ["a-no", "b-yes"].map(String::from).into_iter().collect::<BTreeSet<_>>()
    );
}

#[test]
fn basket_never_costs_more_than_the_naive_sum() {
    let cases: &[&[Decimal]] = &[
        &[dec!(0.10), dec!(0.20), dec!(0.30)],
        &[dec!(0.25), dec!(0.25), dec!(0.25), dec!(0.20)],
        &[dec!(0.45), dec!(0.45)],
        &[dec!(0.05), dec!(0.05), dec!(0.05), dec!(0.05), dec!(0.05)],
    ];
    let detector = combinatorial(dec!(0.01));

    for asks in cases {
        let naive: Decimal = asks.iter().sum();
        let snapshot = partitioned_binaries(1, asks, dec!(10));

        let detection = detect_all(&detector, &snapshot);

        let [opp] = detection.opportunities.as_slice() else {
            panic!("expected one opportunity for {asks:?}");
        };
        assert!(opp.cost() <= naive + dec!(0.000001), "{} > {naive}", opp.cost());
    }
}

#[test]
fn fairly_priced_group_yields_nothing() {
    let snapshot = partitioned_binaries(1, &[dec!(0.30), dec!(0.30), dec!(0.40)], dec!(10));

    let detection = detect_all(&combinatorial(dec!(0.01)), &snapshot);

    assert!(detection.opportunities.is_empty());
    assert!(detection.diagnostics.is_empty());
}

#[test]
fn equal_cost_baskets_prefer_fewer_legs() {
    // Exactly one of w-0 and p-yes resolves true. Both {w-0, w-1, w-2} and
    // {w-0, p-yes} cover every scenario for 0.90.
    let snapshot = SnapshotBuilder::new(1)
        .market(
            MarketDraft::new("m")
                .condition(multi_outcome(
                    "w",
                    &[(dec!(0.30), dec!(10)), (dec!(0.30), dec!(10)), (dec!(0.30), dec!(10))],
                ))
                .condition(binary_with_asks("p", (dec!(0.60), dec!(10)), (dec!(0.70), dec!(10)))),
        )
        .relation(RelationSpec::ExhaustivePartition {
            outcomes: vec!["w-0".into(), "p-yes".into()],
        })
        .build();

    let detection = detect_all(&combinatorial(dec!(0.02)), &snapshot);

    assert!(detection.diagnostics.is_empty(), "{:?}", detection.diagnostics);
    let [opp] = detection.opportunities.as_slice() else {
        panic!("expected one opportunity, got {:?}", detection.opportunities);
    };
    assert!(close(opp.cost(), dec!(0.90)));
    assert_eq!(
        outcome_ids(opp.legs()),
        ["p-yes", "w-0"].map(String::from).into_iter().collect::<BTreeSet<_>>()
    );
}

#[test]
fn expected_profit_counts_only_the_best_level() {
    // The second level is profitable too but is not part of the figure.
    let snapshot = snapshot_of(
        1,
        vec![ConditionDraft::new("c")
            .outcome(OutcomeDraft::new("c-yes").ask(dec!(0.40), dec!(10)).ask(dec!(0.42), dec!(100)))
            .outcome(OutcomeDraft::new("c-no").ask(dec!(0.55), dec!(20)).ask(dec!(0.56), dec!(100)))],
    );
    let key = snapshot.condition_keys().next().unwrap();

    let opp = detect_single_condition(&snapshot, key, &config(dec!(0.02))).unwrap();

    assert_eq!(opp.volume(), dec!(10));
    assert_eq!(opp.expected_profit(), dec!(0.50));
}
