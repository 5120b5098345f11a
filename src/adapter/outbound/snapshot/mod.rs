//! Snapshot sources implementing
//! [`MarketDataSource`](crate::port::outbound::market_data::MarketDataSource).

pub mod dto;
mod file;
mod store;

pub use dto::SnapshotDocument;
pub use file::FileSnapshotSource;
pub use store::SnapshotStore;
