//! Domain types and determinism layer for the migration planner.
//!
//! This module provides:
//! - Lossless numeric handling via the Decimal wrapper
//! - Domain primitives: Address, InterestRateMode
//! - Reserve/position snapshot types with the rebasing-balance invariant
//! - Selection and exception inputs with canonical JSON serialization

pub mod decimal;
pub mod primitives;
pub mod reserve;
pub mod selection;
pub mod summary;

pub use decimal::Decimal;
pub use primitives::{Address, InterestRateMode};
pub use reserve::{
    BaseCurrencyData, IncentiveData, MarketSnapshot, ReserveConfig, UserReservePosition,
};
pub use selection::{
    MigrationException, MigrationExceptions, MigrationSelection, SelectedBorrowAsset,
    SelectedSupplyAsset,
};
pub use summary::UserSummary;
