//! `arbscan check`: validate a configuration file.

use std::path::Path;

use serde_json::json;

use super::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Load and validate `config_path`, then print the effective settings.
///
/// # Errors
///
/// Returns the read, parse or validation error.
pub fn execute(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;

    if output::is_json() {
        return output::json_document(&json!({
            "valid": true,
            "config": config_path.display().to_string(),
            "min_profit": config.detection.min_profit,
            "divergence": config.projection.divergence,
            "refine": config.projection.enabled,
            "limit": config.ranking.limit,
        }));
    }

    output::section("Configuration Check");
    output::field("Config", config_path.display());
    output::success("Configuration file is valid");

    output::section("Summary");
    output::field("Min profit", config.detection.min_profit);
    output::field("Epsilon", config.detection.epsilon);
    output::field("Max set size", config.detection.max_set_size);
    output::field("Solver limit", format!("{} ms", config.solver.time_limit_ms));
    if config.projection.enabled {
        output::field("Divergence", config.projection.divergence);
        output::field("Iterations", config.projection.max_iterations);
    } else {
        output::warning("Trade sizing disabled");
    }
    output::field("Limit", config.ranking.limit);

    Ok(())
}
