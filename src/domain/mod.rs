//! Snapshot records, relations and opportunities.
//!
//! Pure data and invariants. Nothing here touches a solver, a channel or the
//! filesystem.

pub mod book;
pub mod constraint;
pub mod diagnostic;
pub mod error;
pub mod id;
pub mod market;
pub mod money;
pub mod opportunity;
pub mod relation;
pub mod scenario;
pub mod snapshot;

pub use book::{OrderBook, PriceLevel, Side};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::DomainError;
pub use id::{ConditionId, ConditionKey, MarketId, OutcomeId, OutcomeKey};
pub use market::{Condition, Market, Outcome};
pub use money::{Price, Volume};
pub use opportunity::{Direction, Opportunity, OpportunityKind, TradeLeg};
pub use relation::{ConstraintRelation, RelationSpec};
pub use scenario::{ScenarioSet, SCENARIO_CAP};
pub use snapshot::{ConditionDraft, MarketDraft, OutcomeDraft, Snapshot, SnapshotBuilder};
