//! Borrow-side eligibility classification.
//!
//! Positions arrive split by interest-rate mode; each mode of each asset is
//! classified on its own, but the liquidity check always considers the
//! asset's combined migrating amount.

use crate::domain::{
    Decimal, InterestRateMode, MarketSnapshot, MigrationExceptions, MigrationSelection,
    ReserveConfig, UserReservePosition,
};
use crate::engine::{
    last_matching, summary, BorrowMigrationAsset, ExceptionResolver, IsolatedReserve,
    MigrationDisabledReason, MigrationEligibility, RatesSnapshot,
};
use crate::error::PlanError;

/// Ordered precedence for borrow-side disable reasons; the last matching
/// entry wins. Liquidity, flash-loan and frozen are hard protocol blockers
/// and must surface over the softer isolation/e-mode notes. `V3AssetMissing`
/// is terminal and short-circuits before these checks run.
pub const BORROW_DISABLE_PRECEDENCE: [MigrationDisabledReason; 5] = [
    MigrationDisabledReason::IsolationModeBorrowDisabled,
    MigrationDisabledReason::EModeBorrowDisabled,
    MigrationDisabledReason::ReserveFrozen,
    MigrationDisabledReason::AssetNotFlashloanable,
    MigrationDisabledReason::InsufficientLiquidity,
];

/// Classifies every V2 borrow position, one entry per interest-rate mode.
pub struct BorrowClassifier<'a> {
    v2: &'a MarketSnapshot,
    v3: &'a MarketSnapshot,
    resolver: ExceptionResolver<'a>,
    selection: &'a MigrationSelection,
    isolated_reserve: Option<&'a IsolatedReserve>,
}

impl<'a> BorrowClassifier<'a> {
    pub fn new(
        v2: &'a MarketSnapshot,
        v3: &'a MarketSnapshot,
        exceptions: &'a MigrationExceptions,
        selection: &'a MigrationSelection,
        isolated_reserve: Option<&'a IsolatedReserve>,
    ) -> Self {
        Self {
            v2,
            v3,
            resolver: ExceptionResolver::new(exceptions),
            selection,
            isolated_reserve,
        }
    }

    /// Classify all borrow positions in snapshot order, stable before
    /// variable for the same asset.
    ///
    /// # Errors
    /// `PlanError::MissingReserve` when a V2 position references an asset the
    /// V2 snapshot itself does not configure.
    pub fn classify_all(&self) -> Result<Vec<BorrowMigrationAsset>, PlanError> {
        let mut classified = Vec::new();
        for position in self.v2.user_reserves.iter().filter(|p| p.has_debt()) {
            let v2_reserve = self.v2.reserve(&position.underlying_asset).ok_or_else(|| {
                PlanError::MissingReserve {
                    asset: position.underlying_asset.clone(),
                }
            })?;

            if position.principal_stable_debt.is_positive() {
                classified.push(self.classify(position, v2_reserve, InterestRateMode::Stable));
            }
            if position.scaled_variable_debt.is_positive() {
                classified.push(self.classify(position, v2_reserve, InterestRateMode::Variable));
            }
        }
        Ok(classified)
    }

    fn classify(
        &self,
        position: &UserReservePosition,
        v2_reserve: &ReserveConfig,
        mode: InterestRateMode,
    ) -> BorrowMigrationAsset {
        let resolved = self.resolver.resolve(&position.underlying_asset);
        let amount = self.effective_amount(position, v2_reserve, mode);
        let combined = self.effective_amount(position, v2_reserve, InterestRateMode::Stable)
            + self.effective_amount(position, v2_reserve, InterestRateMode::Variable);

        let v3_reserve = self.v3.reserve(&resolved.v3_underlying_asset);
        let eligibility = match v3_reserve {
            None => MigrationEligibility::Disabled(MigrationDisabledReason::V3AssetMissing),
            Some(reserve) => MigrationEligibility::from_reason(last_matching(
                BORROW_DISABLE_PRECEDENCE
                    .iter()
                    .map(|&reason| (self.borrow_check(reason, reserve, combined), reason)),
            )),
        };

        BorrowMigrationAsset {
            underlying_asset: resolved.v2_underlying_asset,
            v3_underlying_asset: resolved.v3_underlying_asset,
            interest_rate_mode: mode,
            amount,
            eligibility,
            v3_rates: v3_reserve
                .map(|r| RatesSnapshot::from_reserve(r, self.v3.user_emode_category_id)),
        }
    }

    /// Migrating amount for one mode: exception override, else the selection
    /// snapshot captured when the user picked the position, else live debt.
    fn effective_amount(
        &self,
        position: &UserReservePosition,
        v2_reserve: &ReserveConfig,
        mode: InterestRateMode,
    ) -> Decimal {
        let live = match mode {
            InterestRateMode::Stable => position.principal_stable_debt,
            InterestRateMode::Variable => position.variable_debt(v2_reserve),
        };
        if live.is_zero() {
            return Decimal::zero();
        }
        if let Some(override_amount) = self
            .resolver
            .resolve(&position.underlying_asset)
            .override_amount
        {
            return override_amount;
        }
        self.selection
            .borrow_selected(&position.underlying_asset, mode)
            .map(|selected| selected.amount_for_mode())
            .unwrap_or(live)
    }

    fn borrow_check(
        &self,
        reason: MigrationDisabledReason,
        reserve: &ReserveConfig,
        combined: Decimal,
    ) -> bool {
        match reason {
            MigrationDisabledReason::IsolationModeBorrowDisabled => {
                self.isolated_reserve.is_some() && !reserve.borrowable_in_isolation
            }
            MigrationDisabledReason::EModeBorrowDisabled => {
                summary::emode_mismatch(reserve, self.v3.user_emode_category_id)
            }
            MigrationDisabledReason::ReserveFrozen => reserve.frozen,
            MigrationDisabledReason::AssetNotFlashloanable => !reserve.flash_loan_enabled,
            MigrationDisabledReason::InsufficientLiquidity => {
                combined.to_base_units(reserve.decimals)
                    > reserve.available_liquidity.to_base_units(reserve.decimals)
            }
            _ => false,
        }
    }
}
