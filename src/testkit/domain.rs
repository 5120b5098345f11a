//! Snapshot fixtures.
//!
//! Outcome ids follow a fixed scheme so tests can name them without looking
//! anything up: binary conditions get `{id}-yes` / `{id}-no`, multi-outcome
//! conditions get `{id}-0`, `{id}-1`, ...

use rust_decimal::Decimal;

use crate::domain::relation::RelationSpec;
use crate::domain::snapshot::{ConditionDraft, MarketDraft, OutcomeDraft, Snapshot, SnapshotBuilder};

/// A binary condition with empty books.
pub fn binary(id: &str) -> ConditionDraft {
    ConditionDraft::new(id)
        .outcome(OutcomeDraft::new(format!("{id}-yes")))
        .outcome(OutcomeDraft::new(format!("{id}-no")))
}

/// A binary condition with one ask level per side.
pub fn binary_with_asks(id: &str, yes: (Decimal, Decimal), no: (Decimal, Decimal)) -> ConditionDraft {
    ConditionDraft::new(id)
        .outcome(OutcomeDraft::new(format!("{id}-yes")).ask(yes.0, yes.1))
        .outcome(OutcomeDraft::new(format!("{id}-no")).ask(no.0, no.1))
}

/// A binary condition with one bid and one ask level per side.
pub fn binary_with_book(
    id: &str,
    yes: (Decimal, Decimal),
    no: (Decimal, Decimal),
    size: Decimal,
) -> ConditionDraft {
    ConditionDraft::new(id)
        .outcome(OutcomeDraft::new(format!("{id}-yes")).bid(yes.0, size).ask(yes.1, size))
        .outcome(OutcomeDraft::new(format!("{id}-no")).bid(no.0, size).ask(no.1, size))
}

/// A condition with one outcome per `(ask, size)` pair.
pub fn multi_outcome(id: &str, asks: &[(Decimal, Decimal)]) -> ConditionDraft {
    asks.iter()
        .enumerate()
        .fold(ConditionDraft::new(id), |cond, (i, &(price, size))| {
            cond.outcome(OutcomeDraft::new(format!("{id}-{i}")).ask(price, size))
        })
}

/// Every condition in a single market `m`.
pub fn snapshot_of(version: u64, conditions: Vec<ConditionDraft>) -> Snapshot {
    let market = conditions
        .into_iter()
        .fold(MarketDraft::new("m"), MarketDraft::condition);
    SnapshotBuilder::new(version).market(market).build()
}

/// Binary conditions `c0`, `c1`, ... whose YES outcomes form an exhaustive
/// partition, each YES ask resting at `asks[i]` with `size`. NO sides are
/// left without asks.
pub fn partitioned_binaries(version: u64, asks: &[Decimal], size: Decimal) -> Snapshot {
    let mut market = MarketDraft::new("m");
    for (i, &price) in asks.iter().enumerate() {
        market = market.condition(
            ConditionDraft::new(format!("c{i}"))
                .outcome(OutcomeDraft::new(format!("c{i}-yes")).ask(price, size))
                .outcome(OutcomeDraft::new(format!("c{i}-no"))),
        );
    }
    SnapshotBuilder::new(version)
        .market(market)
        .relation(RelationSpec::ExhaustivePartition {
            outcomes: (0..asks.len()).map(|i| format!("c{i}-yes").into()).collect(),
        })
        .build()
}
