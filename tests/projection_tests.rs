//! Layer 3 trade sizing with the HiGHS oracle.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use arbscan::adapter::outbound::solver::HighsSolver;
use arbscan::application::detector::{detect_single_condition, DetectionConfig};
use arbscan::application::projection::{ProjectionConfig, ProjectionRequest, TradeProjector};
use arbscan::application::solver::{ConvergenceStatus, Divergence};
use arbscan::domain::opportunity::Opportunity;
use arbscan::domain::snapshot::Snapshot;
use arbscan::testkit::domain::{binary_with_asks, snapshot_of};

fn fixture() -> (Snapshot, Opportunity) {
    let snapshot = snapshot_of(
        1,
        vec![binary_with_asks("c", (dec!(0.40), dec!(5)), (dec!(0.55), dec!(5)))],
    );
    let key = snapshot.condition_keys().next().unwrap();
    let config = DetectionConfig {
        min_profit: dec!(0.02),
        ..DetectionConfig::default()
    };
    let opportunity = detect_single_condition(&snapshot, key, &config).unwrap();
    (snapshot, opportunity)
}

fn projector(divergence: Divergence) -> TradeProjector {
    TradeProjector::new(
        Arc::new(HighsSolver::new()),
        ProjectionConfig {
            divergence,
            ..ProjectionConfig::default()
        },
    )
}

fn request(reference: [Decimal; 2], divergence: Divergence) -> ProjectionRequest {
    ProjectionRequest {
        upper_bounds: vec![dec!(5), dec!(5)],
        reference: reference.to_vec(),
        target_payoff: dec!(2.5),
        divergence,
        max_iterations: 150,
        tolerance: 1e-6,
    }
}

#[test]
fn feasible_reference_is_returned_unchanged() {
    let (snapshot, opportunity) = fixture();
    let projector = projector(Divergence::Kl);

    let result = projector
        .project(&snapshot, &opportunity, &request([dec!(2.5), dec!(2.5)], Divergence::Kl))
        .unwrap()
        .unwrap();

    assert_eq!(result.status, ConvergenceStatus::Converged);
    assert_eq!(result.iterations, 0);
    assert_eq!(result.target_profit, dec!(0.1125));
    let sizes: Vec<_> = result.legs.iter().map(|l| l.size()).collect();
    assert_eq!(sizes, vec![dec!(2.5), dec!(2.5)]);
    assert!(result.realized_profit >= result.target_profit);
    assert!(result.divergence.abs() < 1e-9);
}

#[test]
fn infeasible_reference_is_projected_onto_the_profit_floor() {
    let (snapshot, opportunity) = fixture();

    for divergence in [Divergence::Kl, Divergence::SquaredEuclidean] {
        let result = projector(divergence)
            .project(&snapshot, &opportunity, &request([dec!(4), dec!(1)], divergence))
            .unwrap()
            .unwrap_or_else(|| panic!("{divergence}: no allocation"));

        assert!(
            result.realized_profit >= result.target_profit - dec!(0.0001),
            "{divergence}: {} < {}",
            result.realized_profit,
            result.target_profit
        );
        assert!(result.legs.iter().all(|l| l.size() <= dec!(5)));
        assert!(result.legs.iter().all(|l| l.size() >= Decimal::ZERO));
        // the thin NO leg has to grow to cover its scenario
        assert!(result.legs[1].size() > dec!(1));
        for pair in result.trace.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-12, "{divergence}: trace rose {pair:?}");
        }
    }
}

#[test]
fn refine_sizes_a_detected_opportunity() {
    let (snapshot, opportunity) = fixture();

    let result = projector(Divergence::Kl)
        .refine(&snapshot, &opportunity)
        .unwrap()
        .unwrap();

    assert_eq!(result.legs.len(), opportunity.legs().len());
    assert!(result.realized_profit > Decimal::ZERO);
    assert!(result.capital > Decimal::ZERO);
}
