//! Pure planning stages for cross-version position migration.
//!
//! This module provides:
//! - Exception resolution for V2 -> V3 asset correspondence
//! - Isolation-mode detection for the post-migration account
//! - Supply/borrow eligibility classification with fixed reason precedence
//! - Scaled-balance projection and before/after account summaries
//! - Permit and repay artifact builders

use crate::domain::{
    Address, Decimal, IncentiveData, InterestRateMode, ReserveConfig, UserSummary,
};
use serde::{Deserialize, Serialize};

pub mod borrow;
pub mod exceptions;
pub mod isolation;
pub mod permits;
pub mod planner;
pub mod projection;
pub mod repay;
pub mod summary;
pub mod supply;

pub use borrow::{BorrowClassifier, BORROW_DISABLE_PRECEDENCE};
pub use exceptions::{ExceptionResolver, ResolvedAsset};
pub use isolation::resolve_isolated_reserve;
pub use permits::PermitPayloadBuilder;
pub use planner::MigrationPlanner;
pub use projection::BalanceProjector;
pub use repay::plan_repayments;
pub use summary::summarize;
pub use supply::{SupplyClassifier, SUPPLY_DISABLE_PRECEDENCE};

/// Why an asset cannot migrate. At most one reason is attached per asset per
/// side; the classifiers fix the precedence when several conditions hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MigrationDisabledReason {
    V3AssetMissing,
    ReserveFrozen,
    NotEnoughSupplies,
    IsolationModeBorrowDisabled,
    EModeBorrowDisabled,
    InsufficientLiquidity,
    AssetNotFlashloanable,
}

/// Migration eligibility of a single classified asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "camelCase")]
pub enum MigrationEligibility {
    Eligible,
    Disabled(MigrationDisabledReason),
}

impl MigrationEligibility {
    pub fn from_reason(reason: Option<MigrationDisabledReason>) -> Self {
        match reason {
            Some(reason) => MigrationEligibility::Disabled(reason),
            None => MigrationEligibility::Eligible,
        }
    }

    pub fn is_eligible(&self) -> bool {
        matches!(self, MigrationEligibility::Eligible)
    }

    pub fn disabled_reason(&self) -> Option<MigrationDisabledReason> {
        match self {
            MigrationEligibility::Eligible => None,
            MigrationEligibility::Disabled(reason) => Some(*reason),
        }
    }
}

/// Reduce an ordered check list to its final disable reason.
///
/// Checks are listed lowest-precedence first; the last matching entry wins.
pub(crate) fn last_matching<I>(checks: I) -> Option<MigrationDisabledReason>
where
    I: IntoIterator<Item = (bool, MigrationDisabledReason)>,
{
    checks
        .into_iter()
        .filter(|(hit, _)| *hit)
        .map(|(_, reason)| reason)
        .last()
}

/// The single asset constituting the account's isolation-mode collateral
/// after migration, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IsolatedReserve {
    pub underlying_asset: Address,
    pub symbol: String,
    pub debt_ceiling: Decimal,
    /// True when the migration itself puts the account into isolation mode,
    /// false when the live V3 account was already isolated.
    pub entering_isolation_mode: bool,
}

/// V3 rate/risk snapshot attached to classified assets for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesSnapshot {
    pub supply_apy: Decimal,
    pub variable_borrow_apy: Decimal,
    /// Effective LTV: the e-mode value when the user's nonzero e-mode
    /// category differs from the reserve's, the base value otherwise.
    pub ltv: Decimal,
    pub liquidation_threshold: Decimal,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub incentives: Vec<IncentiveData>,
}

impl RatesSnapshot {
    pub(crate) fn from_reserve(reserve: &ReserveConfig, user_emode_category_id: u8) -> Self {
        Self {
            supply_apy: reserve.supply_apy,
            variable_borrow_apy: reserve.variable_borrow_apy,
            ltv: summary::effective_ltv(reserve, user_emode_category_id),
            liquidation_threshold: summary::effective_liquidation_threshold(
                reserve,
                user_emode_category_id,
            ),
            incentives: reserve.incentives.clone(),
        }
    }
}

/// A classified V2 supply position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyMigrationAsset {
    /// V2 lookup key.
    pub underlying_asset: Address,
    /// Exception-resolved V3 counterpart key.
    pub v3_underlying_asset: Address,
    /// Effective underlying amount that would migrate.
    pub amount: Decimal,
    pub eligibility: MigrationEligibility,
    /// True when the user holds no existing V3 balance of this asset.
    pub can_be_enforced: bool,
    /// The V3 reserve's isolation flag, independent of account mode.
    pub isolated_on_v3: bool,
    pub usage_as_collateral_enabled_on_user_v3: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v3_rates: Option<RatesSnapshot>,
}

/// A classified V2 borrow position for one interest-rate mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowMigrationAsset {
    pub underlying_asset: Address,
    pub v3_underlying_asset: Address,
    pub interest_rate_mode: InterestRateMode,
    /// Effective migrating amount for this mode.
    pub amount: Decimal,
    pub eligibility: MigrationEligibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v3_rates: Option<RatesSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermitType {
    Supply,
    BorrowDelegation,
}

/// Gasless-approval descriptor for the signing layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitPayload {
    /// Token being permitted: the V3 supply token for supplies, the V3
    /// variable debt token for delegation.
    pub underlying_asset: Address,
    /// Allowance increase to authorize, not the absolute target.
    pub amount: Decimal,
    pub permit_type: PermitType,
    pub deadline_secs: u64,
}

/// One V2 repay needed to close out a migrating borrow position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepayAction {
    pub underlying_asset: Address,
    pub interest_rate_mode: InterestRateMode,
    pub amount: Decimal,
    /// V2 debt token for this mode, so the execution layer needs no reverse
    /// lookup.
    pub debt_token_address: Address,
}

/// The engine's full output: classifications, isolation state, before/after
/// summaries for both markets, and the execution artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationPlan {
    pub supply_reserves: Vec<SupplyMigrationAsset>,
    pub borrow_reserves: Vec<BorrowMigrationAsset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isolated_reserve_v3: Option<IsolatedReserve>,
    pub v2_summary_before_migration: UserSummary,
    pub v2_summary_after_migration: UserSummary,
    pub v3_summary_before_migration: UserSummary,
    pub v3_summary_after_migration: UserSummary,
    pub supply_permit_payloads: Vec<PermitPayload>,
    pub credit_delegation_payloads: Vec<PermitPayload>,
    pub repay_assets: Vec<RepayAction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eligibility_from_reason() {
        assert_eq!(
            MigrationEligibility::from_reason(None),
            MigrationEligibility::Eligible
        );
        assert_eq!(
            MigrationEligibility::from_reason(Some(MigrationDisabledReason::ReserveFrozen)),
            MigrationEligibility::Disabled(MigrationDisabledReason::ReserveFrozen)
        );
        assert!(MigrationEligibility::Eligible.is_eligible());
        assert_eq!(
            MigrationEligibility::Disabled(MigrationDisabledReason::V3AssetMissing)
                .disabled_reason(),
            Some(MigrationDisabledReason::V3AssetMissing)
        );
    }

    #[test]
    fn test_last_matching_picks_highest_precedence() {
        let reason = last_matching([
            (true, MigrationDisabledReason::IsolationModeBorrowDisabled),
            (false, MigrationDisabledReason::EModeBorrowDisabled),
            (true, MigrationDisabledReason::ReserveFrozen),
        ]);
        assert_eq!(reason, Some(MigrationDisabledReason::ReserveFrozen));

        assert_eq!(
            last_matching([(false, MigrationDisabledReason::ReserveFrozen)]),
            None
        );
    }

    #[test]
    fn test_eligibility_serialization_is_tagged() {
        let json =
            serde_json::to_value(MigrationEligibility::Disabled(
                MigrationDisabledReason::EModeBorrowDisabled,
            ))
            .unwrap();
        assert_eq!(json["status"], "disabled");
        assert_eq!(json["reason"], "eModeBorrowDisabled");

        let json = serde_json::to_value(MigrationEligibility::Eligible).unwrap();
        assert_eq!(json["status"], "eligible");
        assert!(json.get("reason").is_none());
    }
}
