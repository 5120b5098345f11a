//! Bregman divergences used as projection objectives.
//!
//! - Generalized relative entropy (KL): `D(x || r) = sum(x ln(x/r) - x + r)`
//! - Squared Euclidean: `D(x || r) = 1/2 * sum((x - r)^2)`
//!
//! Both are convex in `x` and vanish exactly at `x = r`. KL is only
//! differentiable in the interior of the positive orthant, so Frank-Wolfe
//! keeps its iterates away from the boundary when [`Divergence::needs_interior`]
//! is set.

use serde::{Deserialize, Serialize};

/// Floor applied inside logarithms.
const LOG_FLOOR: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Divergence {
    #[default]
    Kl,
    SquaredEuclidean,
}

impl Divergence {
    /// `D(x || r)`. Mismatched lengths compare the common prefix.
    #[must_use]
    pub fn value(self, x: &[f64], r: &[f64]) -> f64 {
        match self {
            Self::Kl => x
                .iter()
                .zip(r)
                .map(|(&xi, &ri)| {
                    let ri = ri.max(LOG_FLOOR);
                    if xi <= 0.0 {
                        // lim x->0 of x ln(x/r) is 0
                        ri
                    } else {
                        xi * (xi / ri).ln() - xi + ri
                    }
                })
                .sum(),
            Self::SquaredEuclidean => {
                0.5 * x
                    .iter()
                    .zip(r)
                    .map(|(&xi, &ri)| (xi - ri).powi(2))
                    .sum::<f64>()
            }
        }
    }

    /// Gradient of `D(x || r)` with respect to `x`.
    #[must_use]
    pub fn gradient(self, x: &[f64], r: &[f64]) -> Vec<f64> {
        match self {
            Self::Kl => x
                .iter()
                .zip(r)
                .map(|(&xi, &ri)| (xi.max(LOG_FLOOR) / ri.max(LOG_FLOOR)).ln())
                .collect(),
            Self::SquaredEuclidean => x.iter().zip(r).map(|(&xi, &ri)| xi - ri).collect(),
        }
    }

    /// Whether the gradient is undefined on the boundary of the orthant.
    #[must_use]
    pub const fn needs_interior(self) -> bool {
        matches!(self, Self::Kl)
    }
}

impl std::fmt::Display for Divergence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Kl => "kl",
            Self::SquaredEuclidean => "squared_euclidean",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divergence_vanishes_at_the_reference() {
        let r = [0.2, 0.3, 0.5];
        for d in [Divergence::Kl, Divergence::SquaredEuclidean] {
            assert!(d.value(&r, &r).abs() < 1e-12, "{d}");
            assert!(d.gradient(&r, &r).iter().all(|g| g.abs() < 1e-12), "{d}");
        }
    }

    #[test]
    fn kl_is_positive_away_from_the_reference() {
        let d = Divergence::Kl.value(&[0.7, 0.3], &[0.5, 0.5]);
        assert!(d > 0.0);
    }

    #[test]
    fn kl_handles_zero_coordinates() {
        // 0 * ln(0 / r) - 0 + r = r
        let d = Divergence::Kl.value(&[0.0, 1.0], &[0.25, 1.0]);
        assert!((d - 0.25).abs() < 1e-12);
        assert!(Divergence::Kl.gradient(&[0.0], &[1.0])[0].is_finite());
    }

    #[test]
    fn squared_euclidean_matches_closed_form() {
        let d = Divergence::SquaredEuclidean.value(&[0.5, 0.3, 0.2], &[0.6, 0.4, 0.3]);
        assert!((d - 0.015).abs() < 1e-12);
        assert_eq!(
            Divergence::SquaredEuclidean.gradient(&[1.0, 2.0], &[0.5, 2.5]),
            vec![0.5, -0.5]
        );
    }

    #[test]
    fn parses_snake_case_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            divergence: Divergence,
        }
        let w: Wrapper = toml::from_str("divergence = \"squared_euclidean\"").unwrap();
        assert_eq!(w.divergence, Divergence::SquaredEuclidean);
        assert!(toml::from_str::<Wrapper>("divergence = \"hellinger\"").is_err());
    }
}
