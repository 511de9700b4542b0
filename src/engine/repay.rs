//! Repay planning for closing out migrating V2 borrow positions.

use crate::domain::{InterestRateMode, MarketSnapshot};
use crate::engine::{BorrowMigrationAsset, RepayAction};
use crate::error::PlanError;

/// One repay action per selected borrow entry with a nonzero migrating
/// amount. Disabled entries are excluded regardless of selection.
///
/// # Errors
/// `PlanError::MissingReserve` when a migrating entry's asset is absent from
/// the V2 snapshot it came from.
pub fn plan_repayments(
    v2: &MarketSnapshot,
    selected_borrows: &[&BorrowMigrationAsset],
) -> Result<Vec<RepayAction>, PlanError> {
    let mut actions = Vec::new();
    for borrow in selected_borrows
        .iter()
        .filter(|b| b.eligibility.is_eligible() && b.amount.is_positive())
    {
        let reserve = v2.reserve(&borrow.underlying_asset).ok_or_else(|| {
            PlanError::MissingReserve {
                asset: borrow.underlying_asset.clone(),
            }
        })?;
        let debt_token_address = match borrow.interest_rate_mode {
            InterestRateMode::Stable => reserve.stable_debt_token_address.clone(),
            InterestRateMode::Variable => reserve.variable_debt_token_address.clone(),
        };

        actions.push(RepayAction {
            underlying_asset: borrow.underlying_asset.clone(),
            interest_rate_mode: borrow.interest_rate_mode,
            amount: borrow.amount,
            debt_token_address,
        });
    }
    Ok(actions)
}
