//! Gasless-approval payload construction.
//!
//! Only allowance *increases* are emitted; assets whose existing allowance
//! already covers the migrating amount produce no payload at all, and
//! disabled assets are excluded regardless of selection.

use crate::config::PlannerConfig;
use crate::domain::{Address, Decimal, MarketSnapshot};
use crate::engine::{
    BorrowMigrationAsset, PermitPayload, PermitType, SupplyMigrationAsset,
};
use crate::error::PlanError;

pub struct PermitPayloadBuilder<'a> {
    v3: &'a MarketSnapshot,
    config: &'a PlannerConfig,
}

impl<'a> PermitPayloadBuilder<'a> {
    pub fn new(v3: &'a MarketSnapshot, config: &'a PlannerConfig) -> Self {
        Self { v3, config }
    }

    /// Supply-token permits for the selected supply assets.
    pub fn supply_permits(
        &self,
        selected_supplies: &[&SupplyMigrationAsset],
    ) -> Result<Vec<PermitPayload>, PlanError> {
        let mut payloads = Vec::new();
        for supply in selected_supplies
            .iter()
            .filter(|s| s.eligibility.is_eligible())
        {
            let reserve = self.v3.reserve(&supply.v3_underlying_asset).ok_or_else(|| {
                PlanError::MissingReserve {
                    asset: supply.v3_underlying_asset.clone(),
                }
            })?;
            let allowance = self
                .v3
                .user_reserve(&supply.v3_underlying_asset)
                .map(|p| p.supply_token_allowance)
                .unwrap_or_else(Decimal::zero);

            let increase = supply.amount - allowance;
            if increase.is_positive() {
                payloads.push(PermitPayload {
                    underlying_asset: reserve.supply_token_address.clone(),
                    amount: increase,
                    permit_type: PermitType::Supply,
                    deadline_secs: self.config.permit_deadline_secs,
                });
            }
        }
        Ok(payloads)
    }

    /// Debt-token credit delegations for the selected borrow assets, one per
    /// asset over the combined migrating amount.
    pub fn credit_delegations(
        &self,
        selected_borrows: &[&BorrowMigrationAsset],
    ) -> Result<Vec<PermitPayload>, PlanError> {
        let mut totals: Vec<(Address, Decimal)> = Vec::new();
        for borrow in selected_borrows
            .iter()
            .filter(|b| b.eligibility.is_eligible())
        {
            match totals
                .iter_mut()
                .find(|(asset, _)| asset == &borrow.v3_underlying_asset)
            {
                Some((_, total)) => *total = *total + borrow.amount,
                None => totals.push((borrow.v3_underlying_asset.clone(), borrow.amount)),
            }
        }

        let mut payloads = Vec::new();
        for (asset, total) in totals {
            let reserve = self
                .v3
                .reserve(&asset)
                .ok_or_else(|| PlanError::MissingReserve {
                    asset: asset.clone(),
                })?;
            let allowance = self
                .v3
                .user_reserve(&asset)
                .map(|p| p.credit_delegation_allowance)
                .unwrap_or_else(Decimal::zero);

            let increase = total - allowance;
            if increase.is_positive() {
                payloads.push(PermitPayload {
                    underlying_asset: reserve.variable_debt_token_address.clone(),
                    amount: increase,
                    permit_type: PermitType::BorrowDelegation,
                    deadline_secs: self.config.permit_deadline_secs,
                });
            }
        }
        Ok(payloads)
    }
}
