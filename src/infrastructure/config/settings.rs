//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates every section. Each
//! section and every field within it is optional; omitted values take their
//! documented defaults.
//!
//! # Example
//!
//! ```no_run
//! use arbscan::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("arbscan.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::logging::LoggingConfig;
use super::solver::SolverConfig;
use crate::application::detector::DetectionConfig;
use crate::application::projection::ProjectionConfig;
use crate::application::ranker::RankingConfig;
use crate::error::{ConfigError, Result};

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`]. Both validate before returning.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Layer 1 and Layer 2 thresholds.
    #[serde(default)]
    pub detection: DetectionConfig,

    #[serde(default)]
    pub solver: SolverConfig,

    /// Layer 3 sizing.
    #[serde(default)]
    pub projection: ProjectionConfig,

    #[serde(default)]
    pub ranking: RankingConfig,
}

impl Config {
    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed (including an unknown
    /// divergence name) or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Check every value is within its accepted range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::invalid("logging.format", "must be \"pretty\" or \"json\"").into());
        }

        let detection = &self.detection;
        if detection.min_profit < Decimal::ZERO || detection.min_profit >= Decimal::ONE {
            return Err(ConfigError::invalid("detection.min_profit", "must be in [0, 1)").into());
        }
        if detection.epsilon <= Decimal::ZERO {
            return Err(ConfigError::invalid("detection.epsilon", "must be greater than 0").into());
        }
        if detection.max_set_size == 0 {
            return Err(ConfigError::invalid("detection.max_set_size", "must be greater than 0").into());
        }
        if detection.lot_size <= Decimal::ZERO {
            return Err(ConfigError::invalid("detection.lot_size", "must be greater than 0").into());
        }
        if detection.partitions == Some(0) {
            return Err(ConfigError::invalid("detection.partitions", "must be greater than 0").into());
        }

        if self.solver.time_limit_ms == 0 {
            return Err(ConfigError::invalid("solver.time_limit_ms", "must be greater than 0").into());
        }

        let projection = &self.projection;
        if projection.max_iterations == 0 {
            return Err(
                ConfigError::invalid("projection.max_iterations", "must be greater than 0").into(),
            );
        }
        if !(projection.tolerance.is_finite() && projection.tolerance > 0.0) {
            return Err(ConfigError::invalid("projection.tolerance", "must be a positive number").into());
        }
        if projection.time_limit_ms == 0 {
            return Err(
                ConfigError::invalid("projection.time_limit_ms", "must be greater than 0").into(),
            );
        }
        if projection.min_profit_fraction <= Decimal::ZERO || projection.min_profit_fraction > Decimal::ONE {
            return Err(
                ConfigError::invalid("projection.min_profit_fraction", "must be in (0, 1]").into(),
            );
        }
        if !(0.0..1.0).contains(&projection.contraction) {
            return Err(ConfigError::invalid("projection.contraction", "must be in [0, 1)").into());
        }
        if projection.liquidity_cap <= Decimal::ZERO || projection.liquidity_cap > Decimal::ONE {
            return Err(ConfigError::invalid("projection.liquidity_cap", "must be in (0, 1]").into());
        }

        if self.ranking.limit == 0 {
            return Err(ConfigError::invalid("ranking.limit", "must be greater than 0").into());
        }

        Ok(())
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::solver::Divergence;
    use crate::error::Error;
    use rust_decimal_macros::dec;

    fn invalid_field(toml: &str) -> &'static str {
        match Config::parse_toml(toml) {
            Err(Error::Config(ConfigError::InvalidValue { field, .. })) => field,
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config.detection.min_profit, dec!(0.01));
        assert_eq!(config.solver.time_limit_ms, 500);
        assert_eq!(config.projection.divergence, Divergence::Kl);
        assert_eq!(config.projection.time_limit_ms, 250);
        assert_eq!(config.ranking.limit, 20);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn parses_every_section() {
        let config = Config::parse_toml(
            r#"
            [logging]
            level = "debug"
            format = "json"

            [detection]
            min_profit = "0.02"
            epsilon = 0.0001
            max_set_size = 12
            integer_lots = true
            lot_size = 10
            partitions = 4

            [solver]
            time_limit_ms = 1000

            [projection]
            enabled = false
            divergence = "squared_euclidean"
            max_iterations = 50
            tolerance = 1e-4
            time_limit_ms = 100
            min_profit_fraction = 0.8
            contraction = 0.05
            liquidity_cap = 1

            [ranking]
            limit = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.detection.min_profit, dec!(0.02));
        assert_eq!(config.detection.epsilon, dec!(0.0001));
        assert!(config.detection.integer_lots);
        assert_eq!(config.detection.partitions, Some(4));
        assert!(!config.projection.enabled);
        assert_eq!(config.projection.divergence, Divergence::SquaredEuclidean);
        assert_eq!(config.projection.min_profit_fraction, dec!(0.8));
        assert_eq!(config.ranking.limit, 5);
    }

    #[test]
    fn rejects_each_invalid_field() {
        let cases = [
            ("[logging]\nformat = \"xml\"", "logging.format"),
            ("[detection]\nmin_profit = 1", "detection.min_profit"),
            ("[detection]\nmin_profit = -0.1", "detection.min_profit"),
            ("[detection]\nepsilon = 0", "detection.epsilon"),
            ("[detection]\nmax_set_size = 0", "detection.max_set_size"),
            ("[detection]\nlot_size = 0", "detection.lot_size"),
            ("[detection]\npartitions = 0", "detection.partitions"),
            ("[solver]\ntime_limit_ms = 0", "solver.time_limit_ms"),
            ("[projection]\nmax_iterations = 0", "projection.max_iterations"),
            ("[projection]\ntolerance = 0.0", "projection.tolerance"),
            ("[projection]\ntime_limit_ms = 0", "projection.time_limit_ms"),
            ("[projection]\nmin_profit_fraction = 1.5", "projection.min_profit_fraction"),
            ("[projection]\ncontraction = 1.0", "projection.contraction"),
            ("[projection]\nliquidity_cap = 0", "projection.liquidity_cap"),
            ("[ranking]\nlimit = 0", "ranking.limit"),
        ];
        for (toml, field) in cases {
            assert_eq!(invalid_field(toml), field, "{toml}");
        }
    }

    #[test]
    fn unknown_divergence_is_a_parse_error() {
        let err = Config::parse_toml("[projection]\ndivergence = \"hellinger\"").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Config::load("/nonexistent/arbscan.toml").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
    }
}
