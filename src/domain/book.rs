//! Order book types for outcome depth.
//!
//! - [`PriceLevel`] - a single price with the size resting there
//! - [`OrderBook`] - both sides of the book for one outcome
//!
//! Bids are kept sorted by price descending and asks ascending, so the best
//! level of each side is always the first one. [`OrderBook::new`] sorts its
//! input, so callers may pass levels in any order.
//!
//! # Examples
//!
//! ```
//! use arbscan::domain::book::{OrderBook, PriceLevel};
//! use rust_decimal_macros::dec;
//!
//! let book = OrderBook::new(
//!     vec![PriceLevel::new(dec!(0.44), dec!(200)), PriceLevel::new(dec!(0.45), dec!(100))],
//!     vec![PriceLevel::new(dec!(0.47), dec!(300)), PriceLevel::new(dec!(0.46), dec!(150))],
//! );
//!
//! assert_eq!(book.best_bid().unwrap().price(), dec!(0.45));
//! assert_eq!(book.best_ask().unwrap().price(), dec!(0.46));
//! assert!(!book.is_crossed());
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::{Price, Volume};

/// A single price level in an order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceLevel {
    price: Price,
    size: Volume,
}

impl PriceLevel {
    /// Creates a new price level.
    #[must_use]
    pub const fn new(price: Price, size: Volume) -> Self {
        Self { price, size }
    }

    /// Returns the price at this level.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    /// Returns the size resting at this level.
    #[must_use]
    pub const fn size(&self) -> Volume {
        self.size
    }
}

/// Side of a trade against an order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Lift the ask.
    Buy,
    /// Hit the bid.
    Sell,
}

impl Side {
    /// `+1` for buys and `-1` for sells.
    #[must_use]
    pub const fn sign(self) -> Decimal {
        match self {
            Self::Buy => Decimal::ONE,
            Self::Sell => Decimal::NEGATIVE_ONE,
        }
    }
}

/// Bid and ask depth for a single outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBook {
    bids: Vec<PriceLevel>,
    asks: Vec<PriceLevel>,
}

impl OrderBook {
    /// Creates a book, sorting bids descending and asks ascending.
    #[must_use]
    pub fn new(mut bids: Vec<PriceLevel>, mut asks: Vec<PriceLevel>) -> Self {
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by(|a, b| a.price.cmp(&b.price));
        Self { bids, asks }
    }

    /// Creates a book with no liquidity on either side.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            bids: Vec::new(),
            asks: Vec::new(),
        }
    }

    /// Returns all bid levels, best first.
    #[must_use]
    pub fn bids(&self) -> &[PriceLevel] {
        &self.bids
    }

    /// Returns all ask levels, best first.
    #[must_use]
    pub fn asks(&self) -> &[PriceLevel] {
        &self.asks
    }

    /// Returns the best bid (highest buy price).
    #[must_use]
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    /// Returns the best ask (lowest sell price).
    #[must_use]
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    /// Best level a trade on `side` would execute against.
    #[must_use]
    pub fn best_for(&self, side: Side) -> Option<&PriceLevel> {
        match side {
            Side::Buy => self.best_ask(),
            Side::Sell => self.best_bid(),
        }
    }

    /// Size resting at exactly `price` on the side a `side` trade consumes.
    #[must_use]
    pub fn depth_at(&self, side: Side, price: Price) -> Option<Volume> {
        let levels = match side {
            Side::Buy => &self.asks,
            Side::Sell => &self.bids,
        };
        levels.iter().find(|l| l.price == price).map(|l| l.size)
    }

    /// `true` when both sides are quoted and the best bid is not below the best ask.
    #[must_use]
    pub fn is_crossed(&self) -> bool {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => bid.price >= ask.price,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_book_has_no_best_levels() {
        let book = OrderBook::empty();
        assert!(book.best_bid().is_none());
        assert!(book.best_ask().is_none());
        assert!(!book.is_crossed());
    }

    #[test]
    fn new_sorts_each_side() {
        let book = OrderBook::new(
            vec![
                PriceLevel::new(dec!(0.30), dec!(1)),
                PriceLevel::new(dec!(0.35), dec!(2)),
            ],
            vec![
                PriceLevel::new(dec!(0.50), dec!(3)),
                PriceLevel::new(dec!(0.40), dec!(4)),
            ],
        );

        assert_eq!(book.bids()[0].price(), dec!(0.35));
        assert_eq!(book.asks()[0].price(), dec!(0.40));
        assert_eq!(book.best_for(Side::Buy).unwrap().size(), dec!(4));
        assert_eq!(book.best_for(Side::Sell).unwrap().size(), dec!(2));
    }

    #[test]
    fn crossed_when_bid_meets_ask() {
        let book = OrderBook::new(
            vec![PriceLevel::new(dec!(0.50), dec!(1))],
            vec![PriceLevel::new(dec!(0.50), dec!(1))],
        );
        assert!(book.is_crossed());
    }

    #[test]
    fn depth_at_reads_the_consumed_side() {
        let book = OrderBook::new(
            vec![PriceLevel::new(dec!(0.45), dec!(10))],
            vec![PriceLevel::new(dec!(0.55), dec!(20))],
        );
        assert_eq!(book.depth_at(Side::Buy, dec!(0.55)), Some(dec!(20)));
        assert_eq!(book.depth_at(Side::Sell, dec!(0.45)), Some(dec!(10)));
        assert_eq!(book.depth_at(Side::Buy, dec!(0.45)), None);
    }
}
