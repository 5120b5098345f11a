//! Configuration, logging and wiring.

pub mod config;
pub mod factory;

pub use config::settings::Config;
pub use factory::{build_pipeline, build_solver};
