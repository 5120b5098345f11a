//! Arbscan - arbitrage detection and trade sizing for prediction markets.
//!
//! A scan takes one immutable market snapshot through three layers:
//!
//! - **Layer 1** - binary conditions whose YES + NO asks sum below 1 (or bids
//!   above 1)
//! - **Layer 2** - the cheapest unit basket over conditions linked by
//!   relations, found with a mixed-integer program on HiGHS
//! - **Layer 3** - Frank-Wolfe Bregman projection sizing each opportunity
//!   within liquidity bounds while keeping most of its margin
//!
//! and ranks what it finds.
//!
//! # Modules
//!
//! - [`domain`] - Snapshot arena, relations, scenarios, opportunities
//! - [`port`] - `MarketDataSource` and `Solver` traits
//! - [`application`] - Detectors, projection, ranking and the scan pipeline
//! - [`adapter`] - Snapshot sources, the HiGHS solver and the CLI
//! - [`infrastructure`] - Configuration, logging and wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use arbscan::adapter::outbound::snapshot::FileSnapshotSource;
//! use arbscan::infrastructure::{build_pipeline, build_solver, Config};
//!
//! # async fn run() -> arbscan::error::Result<()> {
//! let config = Config::default();
//! let pipeline = build_pipeline(&config, build_solver(&config));
//! let report = pipeline.scan_source(&FileSnapshotSource::new("snapshot.json")).await?;
//! println!("{} opportunities", report.opportunities.len());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
