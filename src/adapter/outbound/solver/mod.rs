//! Solver backends implementing [`Solver`](crate::port::outbound::solver::Solver).

mod highs;

pub use highs::HighsSolver;
