//! Orchestrates the planning stages into a full `MigrationPlan`.
//!
//! The planner is referentially transparent: same snapshots, selection and
//! exceptions always yield the same plan. It holds no state of its own, so
//! callers are free to memoize on a content-derived key, but correctness
//! never depends on that.

use crate::config::PlannerConfig;
use crate::domain::{MarketSnapshot, MigrationExceptions, MigrationSelection};
use crate::engine::summary::summarize;
use crate::engine::{
    plan_repayments, resolve_isolated_reserve, BalanceProjector, BorrowClassifier,
    BorrowMigrationAsset, MigrationPlan, PermitPayloadBuilder, SupplyClassifier,
    SupplyMigrationAsset,
};
use crate::error::PlanError;

pub struct MigrationPlanner<'a> {
    v2: &'a MarketSnapshot,
    v3: &'a MarketSnapshot,
    config: PlannerConfig,
}

impl<'a> MigrationPlanner<'a> {
    pub fn new(v2: &'a MarketSnapshot, v3: &'a MarketSnapshot) -> Self {
        Self::with_config(v2, v3, PlannerConfig::default())
    }

    pub fn with_config(
        v2: &'a MarketSnapshot,
        v3: &'a MarketSnapshot,
        config: PlannerConfig,
    ) -> Self {
        Self { v2, v3, config }
    }

    /// Compute the full migration plan for one selection.
    ///
    /// # Errors
    /// Propagates `PlanError` from any stage; a failed stage aborts the whole
    /// computation and no partial plan is returned.
    pub fn plan(
        &self,
        selection: &MigrationSelection,
        exceptions: &MigrationExceptions,
    ) -> Result<MigrationPlan, PlanError> {
        let v3_summary_before = summarize(self.v3)?;

        // Isolation state gates both classifiers, so it resolves first.
        let isolated_reserve = resolve_isolated_reserve(
            self.v2,
            self.v3,
            &v3_summary_before,
            &selection.supply_assets,
            exceptions,
        );

        let supply_reserves =
            SupplyClassifier::new(self.v2, self.v3, exceptions, isolated_reserve.as_ref())
                .classify_all()?;
        let borrow_reserves = BorrowClassifier::new(
            self.v2,
            self.v3,
            exceptions,
            selection,
            isolated_reserve.as_ref(),
        )
        .classify_all()?;

        tracing::debug!(
            supplies = supply_reserves.len(),
            borrows = borrow_reserves.len(),
            isolated = isolated_reserve.is_some(),
            "classified migration candidates"
        );

        let selected_supplies: Vec<&SupplyMigrationAsset> = supply_reserves
            .iter()
            .filter(|s| selection.supply_selected(&s.underlying_asset))
            .collect();
        let selected_borrows: Vec<&BorrowMigrationAsset> = borrow_reserves
            .iter()
            .filter(|b| {
                selection
                    .borrow_selected(&b.underlying_asset, b.interest_rate_mode)
                    .is_some()
            })
            .collect();

        // Only eligible entries move balances; disabled ones stay visible in
        // the classification lists but produce no artifacts.
        let migrating_supplies: Vec<&SupplyMigrationAsset> = selected_supplies
            .iter()
            .copied()
            .filter(|s| s.eligibility.is_eligible())
            .collect();
        let migrating_borrows: Vec<&BorrowMigrationAsset> = selected_borrows
            .iter()
            .copied()
            .filter(|b| b.eligibility.is_eligible())
            .collect();

        let summaries = BalanceProjector::new(self.v2, self.v3)
            .project(&migrating_supplies, &migrating_borrows)?;

        let permit_builder = PermitPayloadBuilder::new(self.v3, &self.config);
        let supply_permit_payloads = permit_builder.supply_permits(&selected_supplies)?;
        let credit_delegation_payloads = permit_builder.credit_delegations(&selected_borrows)?;
        let repay_assets = plan_repayments(self.v2, &selected_borrows)?;

        tracing::debug!(
            permits = supply_permit_payloads.len(),
            delegations = credit_delegation_payloads.len(),
            repays = repay_assets.len(),
            "assembled migration artifacts"
        );

        Ok(MigrationPlan {
            supply_reserves,
            borrow_reserves,
            isolated_reserve_v3: isolated_reserve,
            v2_summary_before_migration: summaries.v2_before,
            v2_summary_after_migration: summaries.v2_after,
            v3_summary_before_migration: summaries.v3_before,
            v3_summary_after_migration: summaries.v3_after,
            supply_permit_payloads,
            credit_delegation_payloads,
            repay_assets,
        })
    }
}
