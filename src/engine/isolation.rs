//! Isolation-mode detection for the post-migration V3 account.
//!
//! Runs before classification: isolation state gates both borrow eligibility
//! and supply collateral-enablement.

use crate::domain::{
    Address, MarketSnapshot, MigrationExceptions, SelectedSupplyAsset, UserSummary,
};
use crate::engine::{ExceptionResolver, IsolatedReserve};

/// Determine the isolation collateral of the V3 account after migration.
///
/// Two cases, evaluated in order:
/// 1. The V3 account already holds collateral: migration does not change the
///    account mode, so whatever the live account reports stands.
/// 2. Fresh V3 account: the first selected supply asset that actually has a
///    migratable balance decides. If it resolves to an isolated V3 reserve
///    with a nonzero liquidation threshold, the account enters isolation
///    mode with that asset.
pub fn resolve_isolated_reserve(
    v2: &MarketSnapshot,
    v3: &MarketSnapshot,
    v3_summary: &UserSummary,
    selected_supplies: &[SelectedSupplyAsset],
    exceptions: &MigrationExceptions,
) -> Option<IsolatedReserve> {
    if v3_summary.total_collateral_base.is_positive() {
        return existing_isolated_reserve(v3);
    }

    let resolver = ExceptionResolver::new(exceptions);
    let definitive = selected_supplies.iter().find_map(|selected| {
        let amount = migratable_amount(v2, &resolver, &selected.underlying_asset)?;
        if amount.is_positive() {
            Some(resolver.resolve(&selected.underlying_asset))
        } else {
            None
        }
    })?;

    let reserve = v3.reserve(&definitive.v3_underlying_asset)?;
    if reserve.isolated && reserve.base_liquidation_threshold.is_positive() {
        tracing::debug!(asset = %reserve.underlying_asset, "account will enter isolation mode");
        Some(IsolatedReserve {
            underlying_asset: reserve.underlying_asset.clone(),
            symbol: reserve.symbol.clone(),
            debt_ceiling: reserve.debt_ceiling,
            entering_isolation_mode: true,
        })
    } else {
        None
    }
}

/// The live V3 account's isolation collateral, if the account is in
/// isolation mode: exactly one collateral-enabled position, backed by an
/// isolated reserve.
fn existing_isolated_reserve(v3: &MarketSnapshot) -> Option<IsolatedReserve> {
    let mut collateral_assets = v3.user_reserves.iter().filter(|u| {
        u.usage_as_collateral_enabled
            && v3
                .reserve(&u.underlying_asset)
                .map(|r| u.underlying_balance(r).is_positive())
                .unwrap_or(false)
    });

    let single = collateral_assets.next()?;
    if collateral_assets.next().is_some() {
        // More than one collateral asset: not an isolated account.
        return None;
    }

    let reserve = v3.reserve(&single.underlying_asset)?;
    if reserve.isolated {
        Some(IsolatedReserve {
            underlying_asset: reserve.underlying_asset.clone(),
            symbol: reserve.symbol.clone(),
            debt_ceiling: reserve.debt_ceiling,
            entering_isolation_mode: false,
        })
    } else {
        None
    }
}

/// Exception-aware migratable supply amount for one selected V2 asset.
/// `None` when the user has no such position.
fn migratable_amount(
    v2: &MarketSnapshot,
    resolver: &ExceptionResolver,
    asset: &Address,
) -> Option<crate::domain::Decimal> {
    let position = v2.user_reserve(asset)?;
    let reserve = v2.reserve(asset)?;
    Some(resolver.effective_amount(asset, position.underlying_balance(reserve)))
}
