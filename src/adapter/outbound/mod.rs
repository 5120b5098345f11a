//! Outbound adapters: solver backends and snapshot sources.

pub mod snapshot;
pub mod solver;
