//! Arbitrage opportunities and their trade legs.
//!
//! An [`Opportunity`] is quoted per unit basket: `payoff` is what the basket
//! is guaranteed to return, `cost` what it takes to put on. Derived values
//! are computed once at construction:
//!
//! - `margin`: payoff - cost
//! - `capital`: sum of buy notionals plus sell collateral `(1 - price) * size`
//! - `expected_profit`: margin * volume, the profit available at the best
//!   level of every leg. Deeper book levels are not counted.

use rust_decimal::Decimal;
use serde::Serialize;

use super::book::Side;
use super::error::DomainError;
use super::id::{ConditionId, OutcomeId};
use super::money::{Price, Volume};

/// Which detector produced an opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityKind {
    SingleCondition,
    Combinatorial,
}

/// Whether the basket is bought or sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    BuyAll,
    SellAll,
}

/// One order against one outcome's best level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeLeg {
    condition: ConditionId,
    outcome: OutcomeId,
    side: Side,
    price: Price,
    size: Volume,
}

impl TradeLeg {
    #[must_use]
    pub const fn new(
        condition: ConditionId,
        outcome: OutcomeId,
        side: Side,
        price: Price,
        size: Volume,
    ) -> Self {
        Self {
            condition,
            outcome,
            side,
            price,
            size,
        }
    }

    #[must_use]
    pub const fn condition(&self) -> &ConditionId {
        &self.condition
    }

    #[must_use]
    pub const fn outcome(&self) -> &OutcomeId {
        &self.outcome
    }

    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    #[must_use]
    pub const fn size(&self) -> Volume {
        self.size
    }

    /// Capital tied up by this leg: notional for buys, collateral for sells.
    #[must_use]
    pub fn capital(&self) -> Decimal {
        match self.side {
            Side::Buy => self.price * self.size,
            Side::Sell => (Decimal::ONE - self.price) * self.size,
        }
    }
}

/// A detected risk-free pricing inconsistency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Opportunity {
    kind: OpportunityKind,
    direction: Direction,
    legs: Vec<TradeLeg>,
    payoff: Decimal,
    cost: Decimal,
    margin: Decimal,
    volume: Volume,
    capital: Decimal,
    expected_profit: Decimal,
    snapshot_version: u64,
    conditions: Vec<ConditionId>,
}

impl Opportunity {
    /// Assemble an opportunity and derive margin, capital and expected profit.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonPositiveVolume`] when `volume` is not positive.
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        kind: OpportunityKind,
        direction: Direction,
        legs: Vec<TradeLeg>,
        payoff: Decimal,
        cost: Decimal,
        volume: Volume,
        snapshot_version: u64,
        conditions: Vec<ConditionId>,
    ) -> Result<Self, DomainError> {
        if volume <= Decimal::ZERO {
            return Err(DomainError::NonPositiveVolume { volume });
        }
        let margin = payoff - cost;
        let capital = legs.iter().map(TradeLeg::capital).sum();
        Ok(Self {
            kind,
            direction,
            legs,
            payoff,
            cost,
            margin,
            volume,
            capital,
            expected_profit: margin * volume,
            snapshot_version,
            conditions,
        })
    }

    #[must_use]
    pub const fn kind(&self) -> OpportunityKind {
        self.kind
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn legs(&self) -> &[TradeLeg] {
        &self.legs
    }

    /// Guaranteed payoff per unit basket.
    #[must_use]
    pub const fn payoff(&self) -> Decimal {
        self.payoff
    }

    /// Cost per unit basket.
    #[must_use]
    pub const fn cost(&self) -> Decimal {
        self.cost
    }

    #[must_use]
    pub const fn margin(&self) -> Decimal {
        self.margin
    }

    /// Number of unit baskets the best levels support.
    #[must_use]
    pub const fn volume(&self) -> Volume {
        self.volume
    }

    #[must_use]
    pub const fn capital(&self) -> Decimal {
        self.capital
    }

    /// Profit from trading `volume` baskets at the quoted leg prices.
    ///
    /// Legs are priced at their best level, so this is a floor on what the
    /// book offers, not the most that can be extracted from it.
    #[must_use]
    pub const fn expected_profit(&self) -> Decimal {
        self.expected_profit
    }

    #[must_use]
    pub const fn snapshot_version(&self) -> u64 {
        self.snapshot_version
    }

    /// Conditions whose resolution determines the payoff.
    #[must_use]
    pub fn conditions(&self) -> &[ConditionId] {
        &self.conditions
    }

    /// Sorted `(condition, outcome, side)` triples; a stable identity for ordering.
    #[must_use]
    pub fn leg_key(&self) -> Vec<(&ConditionId, &OutcomeId, Side)> {
        let mut key: Vec<_> = self
            .legs
            .iter()
            .map(|l| (&l.condition, &l.outcome, l.side))
            .collect();
        key.sort();
        key
    }
}

impl AsRef<Opportunity> for Opportunity {
    fn as_ref(&self) -> &Opportunity {
        self
    }
}
