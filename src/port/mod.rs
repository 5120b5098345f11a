//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!   MarketDataSource ──► Scan pipeline ──► Solver
//!   (file, store)        (Layers 1-3)      (HiGHS)
//! ```
//!
//! The scan pipeline only ever sees these traits, so a live feed or another
//! LP backend can be dropped in without touching detection code.

pub mod outbound;
