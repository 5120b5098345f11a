//! Loading configuration files from disk.

mod support;

use rust_decimal_macros::dec;

use arbscan::application::solver::Divergence;
use arbscan::error::{ConfigError, Error};
use arbscan::infrastructure::Config;

use support::files::temp_file;

#[test]
fn full_file_overrides_defaults() {
    let file = temp_file(
        r#"
[logging]
level = "debug"
format = "json"

[detection]
min_profit = 0.02
max_set_size = 12
integer_lots = true

[solver]
time_limit_ms = 1000

[projection]
divergence = "squared_euclidean"
max_iterations = 50
liquidity_cap = 0.25

[ranking]
limit = 5
"#,
        ".toml",
    );

    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.logging.format, "json");
    assert_eq!(config.detection.min_profit, dec!(0.02));
    assert_eq!(config.detection.max_set_size, 12);
    assert!(config.detection.integer_lots);
    assert_eq!(config.solver.time_limit_ms, 1000);
    assert_eq!(config.projection.divergence, Divergence::SquaredEuclidean);
    assert_eq!(config.projection.max_iterations, 50);
    assert_eq!(config.projection.liquidity_cap, dec!(0.25));
    assert!(config.projection.enabled);
    assert_eq!(config.ranking.limit, 5);
}

#[test]
fn empty_file_is_all_defaults() {
    let file = temp_file("", ".toml");

    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.detection.min_profit, dec!(0.01));
    assert_eq!(config.projection.divergence, Divergence::Kl);
    assert_eq!(config.ranking.limit, 20);
}

#[test]
fn out_of_range_value_names_the_field() {
    let file = temp_file("[detection]\nmin_profit = 1.5\n", ".toml");

    let err = Config::load(file.path()).unwrap_err();

    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue {
            field: "detection.min_profit",
            ..
        })
    ));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let file = temp_file("[detection\nmin_profit = ", ".toml");

    let err = Config::load(file.path()).unwrap_err();

    assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
}
