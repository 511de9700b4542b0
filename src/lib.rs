pub mod config;
pub mod domain;
pub mod engine;
pub mod error;

pub use config::{ConfigError, PlannerConfig};
pub use domain::{
    Address, BaseCurrencyData, Decimal, IncentiveData, InterestRateMode, MarketSnapshot,
    MigrationException, MigrationExceptions, MigrationSelection, ReserveConfig,
    SelectedBorrowAsset, SelectedSupplyAsset, UserReservePosition, UserSummary,
};
pub use engine::{
    BorrowMigrationAsset, IsolatedReserve, MigrationDisabledReason, MigrationEligibility,
    MigrationPlan, MigrationPlanner, PermitPayload, PermitType, RatesSnapshot, RepayAction,
    SupplyMigrationAsset,
};
pub use error::PlanError;
