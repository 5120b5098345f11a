//! Market, condition and outcome records.
//!
//! These are arena records owned by a [`Snapshot`](super::snapshot::Snapshot).
//! Cross references use [`ConditionKey`] and [`OutcomeKey`], so a record is
//! only meaningful together with the snapshot that produced it.

use super::book::OrderBook;
use super::id::{ConditionId, ConditionKey, MarketId, OutcomeId, OutcomeKey};

/// A real-world event owning one or more conditions.
#[derive(Debug, Clone)]
pub struct Market {
    id: MarketId,
    title: Option<String>,
    conditions: Vec<ConditionKey>,
}

impl Market {
    pub(crate) fn new(id: MarketId, title: Option<String>, conditions: Vec<ConditionKey>) -> Self {
        Self {
            id,
            title,
            conditions,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &MarketId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn conditions(&self) -> &[ConditionKey] {
        &self.conditions
    }
}

/// A resolvable question whose outcomes are mutually exclusive and exhaustive.
#[derive(Debug, Clone)]
pub struct Condition {
    id: ConditionId,
    market: MarketId,
    question: Option<String>,
    outcomes: Vec<OutcomeKey>,
}

impl Condition {
    pub(crate) fn new(
        id: ConditionId,
        market: MarketId,
        question: Option<String>,
        outcomes: Vec<OutcomeKey>,
    ) -> Self {
        Self {
            id,
            market,
            question,
            outcomes,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &ConditionId {
        &self.id
    }

    /// Market this condition belongs to.
    #[must_use]
    pub const fn market(&self) -> &MarketId {
        &self.market
    }

    #[must_use]
    pub fn question(&self) -> Option<&str> {
        self.question.as_deref()
    }

    /// Outcomes in their declared order.
    #[must_use]
    pub fn outcomes(&self) -> &[OutcomeKey] {
        &self.outcomes
    }

    /// Returns `true` for two-outcome (YES/NO) conditions.
    #[must_use]
    pub fn is_binary(&self) -> bool {
        self.outcomes.len() == 2
    }
}

/// A tradable outcome token and its order book.
#[derive(Debug, Clone)]
pub struct Outcome {
    id: OutcomeId,
    name: Option<String>,
    condition: ConditionKey,
    book: OrderBook,
}

impl Outcome {
    pub(crate) fn new(
        id: OutcomeId,
        name: Option<String>,
        condition: ConditionKey,
        book: OrderBook,
    ) -> Self {
        Self {
            id,
            name,
            condition,
            book,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &OutcomeId {
        &self.id
    }

    /// Display name, falling back to the id.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }

    /// Condition that owns this outcome.
    #[must_use]
    pub const fn condition(&self) -> ConditionKey {
        self.condition
    }

    #[must_use]
    pub const fn book(&self) -> &OrderBook {
        &self.book
    }
}
