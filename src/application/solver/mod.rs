//! Projection solver components for Layer 3.

pub mod bregman;
pub mod frank_wolfe;
pub mod oracle;

pub use bregman::Divergence;
pub use frank_wolfe::{ConvergenceStatus, FrankWolfe, FrankWolfeConfig, FrankWolfeResult};
pub use oracle::{LinearOracle, LpOracle, OracleReply, Polytope, VertexOracle};
