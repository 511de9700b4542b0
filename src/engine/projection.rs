//! Scaled-balance projection: the numeric core.
//!
//! Interest-bearing balances are stored as scaled x index, and the index only
//! increases. Merging a migrated amount therefore means dividing by the
//! destination market's current index at the token's smallest-unit precision
//! and re-running the ordinary account aggregation over the merged set.

use crate::domain::{
    Address, Decimal, InterestRateMode, MarketSnapshot, UserReservePosition, UserSummary,
};
use crate::engine::summary::{summarize, summarize_positions};
use crate::engine::{BorrowMigrationAsset, SupplyMigrationAsset};
use crate::error::PlanError;

/// Before/after account summaries for both markets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedSummaries {
    pub v2_before: UserSummary,
    pub v2_after: UserSummary,
    pub v3_before: UserSummary,
    pub v3_after: UserSummary,
}

/// Convert an underlying amount into a scaled delta under `index`.
///
/// The amount is quantized to the token's smallest unit first; the division
/// rounds half away from zero, so converting back (scaled x index) recovers
/// the amount within one smallest unit.
///
/// # Errors
/// `PlanError::ZeroIndex` when `index` is zero.
pub fn underlying_to_scaled(
    amount: Decimal,
    decimals: u32,
    index: Decimal,
    asset: &Address,
) -> Result<Decimal, PlanError> {
    let base_units = amount.to_base_units(decimals);
    let scaled_base = base_units
        .checked_div(index)
        .ok_or_else(|| PlanError::ZeroIndex {
            asset: asset.clone(),
        })?
        .round_to_unit();
    Ok(scaled_base.from_base_units(decimals))
}

/// Projects migrating positions onto both markets' account states.
pub struct BalanceProjector<'a> {
    v2: &'a MarketSnapshot,
    v3: &'a MarketSnapshot,
}

impl<'a> BalanceProjector<'a> {
    pub fn new(v2: &'a MarketSnapshot, v3: &'a MarketSnapshot) -> Self {
        Self { v2, v3 }
    }

    /// Produce before/after summaries for the given migrating subset.
    ///
    /// Callers pass only selected, eligible entries; an entry whose V3
    /// reserve cannot be dereferenced here violates that contract.
    pub fn project(
        &self,
        supplies: &[&SupplyMigrationAsset],
        borrows: &[&BorrowMigrationAsset],
    ) -> Result<ProjectedSummaries, PlanError> {
        Ok(ProjectedSummaries {
            v2_before: summarize(self.v2)?,
            v2_after: self.project_v2_after(supplies, borrows)?,
            v3_before: summarize(self.v3)?,
            v3_after: self.project_v3_after(supplies, borrows)?,
        })
    }

    /// Merge migrating amounts into the V3 account and re-aggregate.
    fn project_v3_after(
        &self,
        supplies: &[&SupplyMigrationAsset],
        borrows: &[&BorrowMigrationAsset],
    ) -> Result<UserSummary, PlanError> {
        let mut positions = self.v3.user_reserves.clone();

        for supply in supplies {
            let reserve = self.v3.reserve(&supply.v3_underlying_asset).ok_or_else(|| {
                PlanError::MissingReserve {
                    asset: supply.v3_underlying_asset.clone(),
                }
            })?;
            let delta = underlying_to_scaled(
                supply.amount,
                reserve.decimals,
                reserve.liquidity_index,
                &reserve.underlying_asset,
            )?;

            let entry = find_or_insert(&mut positions, &supply.v3_underlying_asset);
            entry.scaled_supply_token_balance = entry.scaled_supply_token_balance + delta;
            entry.usage_as_collateral_enabled = supply.usage_as_collateral_enabled_on_user_v3;
        }

        for borrow in borrows {
            let reserve = self.v3.reserve(&borrow.v3_underlying_asset).ok_or_else(|| {
                PlanError::MissingReserve {
                    asset: borrow.v3_underlying_asset.clone(),
                }
            })?;
            // All migrated debt lands as variable debt on the new market.
            let delta = underlying_to_scaled(
                borrow.amount,
                reserve.decimals,
                reserve.variable_borrow_index,
                &reserve.underlying_asset,
            )?;

            let entry = find_or_insert(&mut positions, &borrow.v3_underlying_asset);
            entry.scaled_variable_debt = entry.scaled_variable_debt + delta;
        }

        summarize_positions(
            &self.v3.reserves,
            &positions,
            &self.v3.base_currency,
            self.v3.user_emode_category_id,
        )
    }

    /// Remove migrating amounts from the V2 account and re-aggregate,
    /// showing what remains un-migrated.
    fn project_v2_after(
        &self,
        supplies: &[&SupplyMigrationAsset],
        borrows: &[&BorrowMigrationAsset],
    ) -> Result<UserSummary, PlanError> {
        let mut positions = self.v2.user_reserves.clone();

        for supply in supplies {
            if let Some(entry) = find_mut(&mut positions, &supply.underlying_asset) {
                entry.scaled_supply_token_balance = Decimal::zero();
            }
        }

        for borrow in borrows {
            let reserve = self.v2.reserve(&borrow.underlying_asset).ok_or_else(|| {
                PlanError::MissingReserve {
                    asset: borrow.underlying_asset.clone(),
                }
            })?;
            let Some(entry) = find_mut(&mut positions, &borrow.underlying_asset) else {
                continue;
            };

            // Only the migrating mode is touched; the other stays intact.
            match borrow.interest_rate_mode {
                InterestRateMode::Stable => {
                    entry.principal_stable_debt =
                        (entry.principal_stable_debt - borrow.amount).floor_zero();
                }
                InterestRateMode::Variable => {
                    let delta = underlying_to_scaled(
                        borrow.amount,
                        reserve.decimals,
                        reserve.variable_borrow_index,
                        &reserve.underlying_asset,
                    )?;
                    entry.scaled_variable_debt =
                        (entry.scaled_variable_debt - delta).floor_zero();
                }
            }
        }

        summarize_positions(
            &self.v2.reserves,
            &positions,
            &self.v2.base_currency,
            self.v2.user_emode_category_id,
        )
    }
}

fn find_or_insert<'p>(
    positions: &'p mut Vec<UserReservePosition>,
    asset: &Address,
) -> &'p mut UserReservePosition {
    if let Some(index) = positions
        .iter()
        .position(|p| &p.underlying_asset == asset)
    {
        &mut positions[index]
    } else {
        positions.push(UserReservePosition::empty(asset.clone()));
        positions.last_mut().expect("just pushed")
    }
}

fn find_mut<'p>(
    positions: &'p mut [UserReservePosition],
    asset: &Address,
) -> Option<&'p mut UserReservePosition> {
    positions.iter_mut().find(|p| &p.underlying_asset == asset)
}
