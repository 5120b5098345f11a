//! Solver backend settings (`[solver]`).

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SolverConfig {
    /// Wall-clock limit for each Layer 2 MILP solve.
    #[serde(default = "default_time_limit_ms")]
    pub time_limit_ms: u64,
}

fn default_time_limit_ms() -> u64 {
    500
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: default_time_limit_ms(),
        }
    }
}

impl SolverConfig {
    #[must_use]
    pub const fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }
}
