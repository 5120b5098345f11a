//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Snapshot fixtures: binary conditions, multi-outcome
//!   conditions, related groups.
//! - [`solver`] - A [`Solver`](crate::port::outbound::solver::Solver) that
//!   replays scripted results and counts calls.

pub mod domain;
pub mod solver;
