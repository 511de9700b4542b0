//! User selection and operator-supplied migration exceptions.

use crate::domain::{Address, Decimal, InterestRateMode, ReserveConfig, UserReservePosition};
use rust_decimal::Decimal as RustDecimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Redirects a V2 asset to a different V3 underlying and/or overrides its
/// migratable amount.
///
/// Exceptions exist because a V2 asset may have no 1:1 V3 counterpart, or
/// because an externally-reconciled balance must replace the live snapshot
/// (e.g. concurrent in-flight conversions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationException {
    pub target_underlying_asset: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_amount: Option<Decimal>,
}

/// Exception table keyed by V2 underlying asset.
pub type MigrationExceptions = HashMap<Address, MigrationException>;

/// A supply position the user chose to migrate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedSupplyAsset {
    pub underlying_asset: Address,
}

/// A borrow position the user chose to migrate, identified by asset and
/// interest-rate mode.
///
/// Carries a per-mode amount snapshot captured at selection time. Debt keeps
/// accruing between selection and execution, so the snapshot is taken with a
/// growth margin on top of the live balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedBorrowAsset {
    pub underlying_asset: Address,
    pub interest_rate_mode: InterestRateMode,
    pub increased_stable_borrows: Decimal,
    pub increased_variable_borrows: Decimal,
}

impl SelectedBorrowAsset {
    /// Snapshot a live borrow position for selection, inflating both mode
    /// amounts by `margin_bps` to absorb accrual until execution.
    pub fn snapshot(
        position: &UserReservePosition,
        reserve: &ReserveConfig,
        interest_rate_mode: InterestRateMode,
        margin_bps: u32,
    ) -> Self {
        let margin = Decimal::new(
            RustDecimal::ONE + RustDecimal::from(margin_bps) / RustDecimal::from(10_000u32),
        );
        Self {
            underlying_asset: position.underlying_asset.clone(),
            interest_rate_mode,
            increased_stable_borrows: position.principal_stable_debt * margin,
            increased_variable_borrows: position.variable_debt(reserve) * margin,
        }
    }

    /// The snapshot amount for this entry's own interest-rate mode.
    pub fn amount_for_mode(&self) -> Decimal {
        match self.interest_rate_mode {
            InterestRateMode::Stable => self.increased_stable_borrows,
            InterestRateMode::Variable => self.increased_variable_borrows,
        }
    }
}

/// The user's chosen subset of positions to migrate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationSelection {
    pub supply_assets: Vec<SelectedSupplyAsset>,
    pub borrow_assets: Vec<SelectedBorrowAsset>,
}

impl MigrationSelection {
    pub fn supply_selected(&self, asset: &Address) -> bool {
        self.supply_assets
            .iter()
            .any(|s| &s.underlying_asset == asset)
    }

    pub fn borrow_selected(
        &self,
        asset: &Address,
        mode: InterestRateMode,
    ) -> Option<&SelectedBorrowAsset> {
        self.borrow_assets
            .iter()
            .find(|b| &b.underlying_asset == asset && b.interest_rate_mode == mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn reserve() -> ReserveConfig {
        ReserveConfig {
            underlying_asset: Address::from("0x1"),
            symbol: "TST".to_string(),
            decimals: 18,
            supply_token_address: Address::from("0xa1"),
            stable_debt_token_address: Address::from("0xs1"),
            variable_debt_token_address: Address::from("0xv1"),
            supply_cap: Decimal::zero(),
            debt_ceiling: Decimal::zero(),
            frozen: false,
            isolated: false,
            borrowable_in_isolation: true,
            flash_loan_enabled: true,
            emode_category_id: 0,
            liquidity_index: Decimal::one(),
            variable_borrow_index: Decimal::new(dec!(1.5)),
            total_liquidity: Decimal::zero(),
            available_liquidity: Decimal::zero(),
            base_ltv: Decimal::zero(),
            base_liquidation_threshold: Decimal::zero(),
            emode_ltv: Decimal::zero(),
            emode_liquidation_threshold: Decimal::zero(),
            price_in_base_currency: Decimal::one(),
            supply_apy: Decimal::zero(),
            variable_borrow_apy: Decimal::zero(),
            stable_borrow_apy: Decimal::zero(),
            incentives: vec![],
        }
    }

    #[test]
    fn test_borrow_snapshot_applies_margin() {
        let mut position = UserReservePosition::empty(Address::from("0x1"));
        position.principal_stable_debt = Decimal::new(dec!(100));
        position.scaled_variable_debt = Decimal::new(dec!(200));

        let selected = SelectedBorrowAsset::snapshot(
            &position,
            &reserve(),
            InterestRateMode::Variable,
            1,
        );

        assert_eq!(selected.increased_stable_borrows, Decimal::new(dec!(100.01)));
        // 200 * 1.5 index * 1.0001 margin
        assert_eq!(
            selected.increased_variable_borrows,
            Decimal::new(dec!(300.03))
        );
        assert_eq!(selected.amount_for_mode(), Decimal::new(dec!(300.03)));
    }

    #[test]
    fn test_selection_lookup_by_asset_and_mode() {
        let selection = MigrationSelection {
            supply_assets: vec![SelectedSupplyAsset {
                underlying_asset: Address::from("0x1"),
            }],
            borrow_assets: vec![SelectedBorrowAsset {
                underlying_asset: Address::from("0x2"),
                interest_rate_mode: InterestRateMode::Stable,
                increased_stable_borrows: Decimal::new(dec!(10)),
                increased_variable_borrows: Decimal::zero(),
            }],
        };

        assert!(selection.supply_selected(&Address::from("0x1")));
        assert!(!selection.supply_selected(&Address::from("0x2")));
        assert!(selection
            .borrow_selected(&Address::from("0x2"), InterestRateMode::Stable)
            .is_some());
        assert!(selection
            .borrow_selected(&Address::from("0x2"), InterestRateMode::Variable)
            .is_none());
    }
}
