//! Linear constraints and variable bounds for the solver port.

use rust_decimal::Decimal;

/// `sum(coefficients[i] * x[i]) {>=, <=, =} rhs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub coefficients: Vec<Decimal>,
    pub sense: ConstraintSense,
    pub rhs: Decimal,
}

impl Constraint {
    #[must_use]
    pub const fn geq(coefficients: Vec<Decimal>, rhs: Decimal) -> Self {
        Self {
            coefficients,
            sense: ConstraintSense::GreaterEqual,
            rhs,
        }
    }

    #[must_use]
    pub const fn leq(coefficients: Vec<Decimal>, rhs: Decimal) -> Self {
        Self {
            coefficients,
            sense: ConstraintSense::LessEqual,
            rhs,
        }
    }

    #[must_use]
    pub const fn eq(coefficients: Vec<Decimal>, rhs: Decimal) -> Self {
        Self {
            coefficients,
            sense: ConstraintSense::Equal,
            rhs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSense {
    GreaterEqual,
    LessEqual,
    Equal,
}

/// Bounds on one variable. `None` means unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableBounds {
    pub lower: Option<Decimal>,
    pub upper: Option<Decimal>,
}

impl Default for VariableBounds {
    fn default() -> Self {
        Self::non_negative()
    }
}

impl VariableBounds {
    /// `[0, 1]`; combine with an integer marker for a binary variable.
    #[must_use]
    pub const fn unit() -> Self {
        Self::bounded(Decimal::ZERO, Decimal::ONE)
    }

    #[must_use]
    pub const fn non_negative() -> Self {
        Self {
            lower: Some(Decimal::ZERO),
            upper: None,
        }
    }

    #[must_use]
    pub const fn bounded(lower: Decimal, upper: Decimal) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// Pin the variable to a single value.
    #[must_use]
    pub const fn fixed(value: Decimal) -> Self {
        Self::bounded(value, value)
    }
}
