//! Aggregated account health view for one market.

use crate::domain::Decimal;
use serde::{Deserialize, Serialize};

/// Account-level aggregates in the market reference currency.
///
/// `health_factor` is `None` when the account carries no debt; the ratio is
/// undefined there, not infinite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub total_collateral_base: Decimal,
    pub total_borrows_base: Decimal,
    pub available_borrows_base: Decimal,
    pub total_collateral_usd: Decimal,
    /// Collateral-weighted average LTV.
    pub current_ltv: Decimal,
    /// Collateral-weighted average liquidation threshold.
    pub current_liquidation_threshold: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_factor: Option<Decimal>,
}

impl UserSummary {
    /// Summary of an account with no positions at all.
    pub fn empty() -> Self {
        Self {
            total_collateral_base: Decimal::zero(),
            total_borrows_base: Decimal::zero(),
            available_borrows_base: Decimal::zero(),
            total_collateral_usd: Decimal::zero(),
            current_ltv: Decimal::zero(),
            current_liquidation_threshold: Decimal::zero(),
            health_factor: None,
        }
    }
}
