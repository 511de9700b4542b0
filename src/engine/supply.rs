//! Supply-side eligibility classification.

use crate::domain::{MarketSnapshot, MigrationExceptions, ReserveConfig, UserReservePosition};
use crate::engine::{
    last_matching, ExceptionResolver, IsolatedReserve, MigrationDisabledReason,
    MigrationEligibility, RatesSnapshot, SupplyMigrationAsset,
};
use crate::error::PlanError;

/// Ordered precedence for supply-side disable reasons; the last matching
/// entry wins. `V3AssetMissing` is terminal and short-circuits before these
/// checks run.
pub const SUPPLY_DISABLE_PRECEDENCE: [MigrationDisabledReason; 2] = [
    MigrationDisabledReason::NotEnoughSupplies,
    MigrationDisabledReason::ReserveFrozen,
];

/// Classifies every nonzero V2 supply position for V3 eligibility.
pub struct SupplyClassifier<'a> {
    v2: &'a MarketSnapshot,
    v3: &'a MarketSnapshot,
    resolver: ExceptionResolver<'a>,
    isolated_reserve: Option<&'a IsolatedReserve>,
}

impl<'a> SupplyClassifier<'a> {
    pub fn new(
        v2: &'a MarketSnapshot,
        v3: &'a MarketSnapshot,
        exceptions: &'a MigrationExceptions,
        isolated_reserve: Option<&'a IsolatedReserve>,
    ) -> Self {
        Self {
            v2,
            v3,
            resolver: ExceptionResolver::new(exceptions),
            isolated_reserve,
        }
    }

    /// Classify all nonzero supply positions in snapshot order.
    ///
    /// # Errors
    /// `PlanError::MissingReserve` when a V2 position references an asset the
    /// V2 snapshot itself does not configure.
    pub fn classify_all(&self) -> Result<Vec<SupplyMigrationAsset>, PlanError> {
        self.v2
            .user_reserves
            .iter()
            .filter(|position| position.has_supply())
            .map(|position| self.classify(position))
            .collect()
    }

    fn classify(&self, position: &UserReservePosition) -> Result<SupplyMigrationAsset, PlanError> {
        let v2_reserve =
            self.v2
                .reserve(&position.underlying_asset)
                .ok_or_else(|| PlanError::MissingReserve {
                    asset: position.underlying_asset.clone(),
                })?;

        let resolved = self.resolver.resolve(&position.underlying_asset);
        let amount = resolved
            .override_amount
            .unwrap_or_else(|| position.underlying_balance(v2_reserve));

        let v3_reserve = self.v3.reserve(&resolved.v3_underlying_asset);
        let v3_position = self.v3.user_reserve(&resolved.v3_underlying_asset);
        let v3_balance_is_zero = v3_position.map(|p| !p.has_supply()).unwrap_or(true);
        let isolated_on_v3 = v3_reserve.map(|r| r.isolated).unwrap_or(false);

        let eligibility = match v3_reserve {
            None => MigrationEligibility::Disabled(MigrationDisabledReason::V3AssetMissing),
            Some(reserve) => MigrationEligibility::from_reason(last_matching(
                SUPPLY_DISABLE_PRECEDENCE
                    .iter()
                    .map(|&reason| (supply_check(reason, reserve, amount), reason)),
            )),
        };

        // Isolation mode permits exactly one collateral asset. Outside it, an
        // existing V3 position keeps its flag; freshly-arriving collateral is
        // enabled unless the reserve itself is isolation-only.
        let usage_as_collateral_enabled_on_user_v3 = match self.isolated_reserve {
            Some(isolated) => isolated.underlying_asset == resolved.v3_underlying_asset,
            None => match v3_position {
                Some(existing) if !v3_balance_is_zero => existing.usage_as_collateral_enabled,
                _ => !isolated_on_v3,
            },
        };

        Ok(SupplyMigrationAsset {
            underlying_asset: resolved.v2_underlying_asset,
            v3_underlying_asset: resolved.v3_underlying_asset,
            amount,
            eligibility,
            can_be_enforced: v3_balance_is_zero,
            isolated_on_v3,
            usage_as_collateral_enabled_on_user_v3,
            v3_rates: v3_reserve
                .map(|r| RatesSnapshot::from_reserve(r, self.v3.user_emode_category_id)),
        })
    }
}

fn supply_check(
    reason: MigrationDisabledReason,
    reserve: &ReserveConfig,
    amount: crate::domain::Decimal,
) -> bool {
    match reason {
        MigrationDisabledReason::NotEnoughSupplies => {
            // A zero cap means uncapped.
            !reserve.supply_cap.is_zero()
                && reserve.supply_cap - reserve.total_liquidity <= amount
        }
        MigrationDisabledReason::ReserveFrozen => reserve.frozen,
        _ => false,
    }
}
