//! Outbound ports (driven side): interfaces implemented by outbound adapters.

pub mod market_data;
pub mod solver;
