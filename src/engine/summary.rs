//! Account summary aggregation.
//!
//! The same aggregation runs for a live account and for projected
//! before/after states, so both sides of the plan stay comparable.

use crate::domain::{
    BaseCurrencyData, Decimal, MarketSnapshot, ReserveConfig, UserReservePosition, UserSummary,
};
use crate::error::PlanError;

/// True when the user's nonzero e-mode category differs from the reserve's.
pub(crate) fn emode_mismatch(reserve: &ReserveConfig, user_emode_category_id: u8) -> bool {
    user_emode_category_id != 0 && user_emode_category_id != reserve.emode_category_id
}

/// LTV under the e-mode selection rule.
pub(crate) fn effective_ltv(reserve: &ReserveConfig, user_emode_category_id: u8) -> Decimal {
    if emode_mismatch(reserve, user_emode_category_id) {
        reserve.emode_ltv
    } else {
        reserve.base_ltv
    }
}

/// Liquidation threshold under the e-mode selection rule.
pub(crate) fn effective_liquidation_threshold(
    reserve: &ReserveConfig,
    user_emode_category_id: u8,
) -> Decimal {
    if emode_mismatch(reserve, user_emode_category_id) {
        reserve.emode_liquidation_threshold
    } else {
        reserve.base_liquidation_threshold
    }
}

/// Aggregate a snapshot's own positions.
pub fn summarize(snapshot: &MarketSnapshot) -> Result<UserSummary, PlanError> {
    summarize_positions(
        &snapshot.reserves,
        &snapshot.user_reserves,
        &snapshot.base_currency,
        snapshot.user_emode_category_id,
    )
}

/// Aggregate an arbitrary position list against a reserve set.
///
/// # Errors
/// `PlanError::MissingReserve` when a position references an asset absent
/// from the reserve set.
pub fn summarize_positions(
    reserves: &[ReserveConfig],
    positions: &[UserReservePosition],
    base_currency: &BaseCurrencyData,
    user_emode_category_id: u8,
) -> Result<UserSummary, PlanError> {
    let mut total_collateral = Decimal::zero();
    let mut total_borrows = Decimal::zero();
    let mut weighted_ltv = Decimal::zero();
    let mut weighted_threshold = Decimal::zero();

    for position in positions {
        let reserve = reserves
            .iter()
            .find(|r| r.underlying_asset == position.underlying_asset)
            .ok_or_else(|| PlanError::MissingReserve {
                asset: position.underlying_asset.clone(),
            })?;

        let threshold = effective_liquidation_threshold(reserve, user_emode_category_id);
        let balance_base =
            position.underlying_balance(reserve) * reserve.price_in_base_currency;

        // A zero-threshold reserve carries no liquidation backing and is not
        // counted as collateral even when the usage flag is set.
        if position.usage_as_collateral_enabled
            && balance_base.is_positive()
            && threshold.is_positive()
        {
            total_collateral = total_collateral + balance_base;
            weighted_ltv =
                weighted_ltv + balance_base * effective_ltv(reserve, user_emode_category_id);
            weighted_threshold = weighted_threshold + balance_base * threshold;
        }

        total_borrows =
            total_borrows + position.total_debt(reserve) * reserve.price_in_base_currency;
    }

    let current_ltv = weighted_ltv
        .checked_div(total_collateral)
        .unwrap_or_else(Decimal::zero);
    let current_liquidation_threshold = weighted_threshold
        .checked_div(total_collateral)
        .unwrap_or_else(Decimal::zero);
    // No debt: the ratio is undefined rather than infinite.
    let health_factor = if total_borrows.is_positive() {
        Some(weighted_threshold / total_borrows)
    } else {
        None
    };

    Ok(UserSummary {
        total_collateral_base: total_collateral,
        total_borrows_base: total_borrows,
        available_borrows_base: (total_collateral * current_ltv - total_borrows).floor_zero(),
        total_collateral_usd: total_collateral * base_currency.reference_price_usd,
        current_ltv,
        current_liquidation_threshold,
        health_factor,
    })
}
