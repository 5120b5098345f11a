//! Domain validation errors.
//!
//! Raised while a snapshot is assembled or while resolution scenarios are
//! enumerated. Detection never propagates them: each one becomes a
//! [`Diagnostic`](super::diagnostic::Diagnostic) and the affected record is
//! skipped.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A level price outside the open interval `(0, 1)`.
    #[error("price {price} for outcome {outcome} is outside (0, 1)")]
    PriceOutOfRange {
        /// Outcome whose book carried the level.
        outcome: String,
        /// The rejected price.
        price: Decimal,
    },

    /// A level with zero or negative size.
    #[error("size {size} for outcome {outcome} must be positive")]
    NonPositiveSize {
        /// Outcome whose book carried the level.
        outcome: String,
        /// The rejected size.
        size: Decimal,
    },

    /// Best bid at or above best ask.
    #[error("book for outcome {outcome} is crossed")]
    CrossedBook {
        /// Outcome with the crossed book.
        outcome: String,
    },

    /// A condition needs at least two outcomes to be resolvable.
    #[error("condition {condition} has {count} outcome(s), need at least 2")]
    TooFewOutcomes {
        /// The offending condition.
        condition: String,
        /// Number of outcomes supplied.
        count: usize,
    },

    /// An identifier was supplied twice.
    #[error("duplicate {kind} id {id}")]
    DuplicateId {
        /// Record kind (`condition` or `outcome`).
        kind: &'static str,
        /// The repeated identifier.
        id: String,
    },

    /// A level that is not a `[price, size]` pair of decimals.
    #[error("malformed level for outcome {outcome}: {reason}")]
    MalformedLevel { outcome: String, reason: String },

    /// A relation names an outcome the snapshot does not contain.
    #[error("relation references unknown outcome {id}")]
    UnknownOutcome {
        /// The unresolved identifier.
        id: String,
    },

    /// An opportunity refers to a record missing from the snapshot.
    #[error("snapshot has no {kind} {id}")]
    MissingRecord { kind: &'static str, id: String },

    #[error("malformed relation: {reason}")]
    MalformedRelation { reason: String },

    /// No joint resolution satisfies every relation in the group.
    #[error("relations admit no resolution scenario")]
    ContradictoryRelations,

    /// Enumeration stopped after exceeding the scenario cap.
    #[error("more than {cap} resolution scenarios")]
    TooManyScenarios {
        /// The cap that was exceeded.
        cap: usize,
    },

    /// An opportunity must trade a positive number of baskets.
    #[error("volume must be positive, got {volume}")]
    NonPositiveVolume {
        /// The rejected volume.
        volume: Decimal,
    },
}

impl DomainError {
    /// `true` for violations of numeric ranges rather than data shape.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::PriceOutOfRange { .. } | Self::NonPositiveSize { .. } | Self::NonPositiveVolume { .. }
        )
    }
}
