//! Adapters: concrete implementations of ports and the CLI driving side.

pub mod inbound;
pub mod outbound;
