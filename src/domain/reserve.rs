//! Reserve configuration and per-user position snapshots.
//!
//! Everything here is an already-decoded, already-humanized view of on-chain
//! state, handed to the planner by the data layer. Scaled balances follow the
//! rebasing invariant: underlying amount = scaled balance x index, where the
//! index only ever increases.

use crate::domain::{Address, Decimal};
use serde::{Deserialize, Serialize};

/// Per-asset reserve configuration on one market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveConfig {
    pub underlying_asset: Address,
    pub symbol: String,
    pub decimals: u32,
    /// Interest-bearing supply token for this reserve.
    pub supply_token_address: Address,
    pub stable_debt_token_address: Address,
    pub variable_debt_token_address: Address,
    /// Maximum suppliable amount in human units. Zero means uncapped.
    pub supply_cap: Decimal,
    /// Protocol debt ceiling for isolation-mode borrowing. Zero means none.
    pub debt_ceiling: Decimal,
    pub frozen: bool,
    /// Reserve can only serve as collateral in isolation mode.
    pub isolated: bool,
    pub borrowable_in_isolation: bool,
    pub flash_loan_enabled: bool,
    pub emode_category_id: u8,
    /// Rebasing index for supply-token balances (humanized ray).
    pub liquidity_index: Decimal,
    /// Rebasing index for variable-debt balances (humanized ray).
    pub variable_borrow_index: Decimal,
    pub total_liquidity: Decimal,
    pub available_liquidity: Decimal,
    pub base_ltv: Decimal,
    pub base_liquidation_threshold: Decimal,
    pub emode_ltv: Decimal,
    pub emode_liquidation_threshold: Decimal,
    /// Price of one whole token in the market reference currency.
    pub price_in_base_currency: Decimal,
    pub supply_apy: Decimal,
    pub variable_borrow_apy: Decimal,
    pub stable_borrow_apy: Decimal,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub incentives: Vec<IncentiveData>,
}

/// Reward incentive attached to a reserve, carried opaquely for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncentiveData {
    pub reward_token_symbol: String,
    pub incentive_apr: Decimal,
}

/// Per-asset user position on one market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReservePosition {
    pub underlying_asset: Address,
    /// Scaled supply-token balance; multiply by the liquidity index for the
    /// current underlying amount.
    pub scaled_supply_token_balance: Decimal,
    pub principal_stable_debt: Decimal,
    /// Scaled variable debt; multiply by the variable borrow index.
    pub scaled_variable_debt: Decimal,
    pub usage_as_collateral_enabled: bool,
    /// Allowance on the supply token already granted to the migration
    /// executor.
    pub supply_token_allowance: Decimal,
    /// Credit-delegation allowance on the debt token already granted to the
    /// migration executor.
    pub credit_delegation_allowance: Decimal,
}

impl UserReservePosition {
    /// Empty position for an asset the user does not yet hold.
    pub fn empty(underlying_asset: Address) -> Self {
        Self {
            underlying_asset,
            scaled_supply_token_balance: Decimal::zero(),
            principal_stable_debt: Decimal::zero(),
            scaled_variable_debt: Decimal::zero(),
            usage_as_collateral_enabled: false,
            supply_token_allowance: Decimal::zero(),
            credit_delegation_allowance: Decimal::zero(),
        }
    }

    /// Current underlying supply balance under the reserve's liquidity index.
    pub fn underlying_balance(&self, reserve: &ReserveConfig) -> Decimal {
        self.scaled_supply_token_balance * reserve.liquidity_index
    }

    /// Current variable debt under the reserve's variable borrow index.
    pub fn variable_debt(&self, reserve: &ReserveConfig) -> Decimal {
        self.scaled_variable_debt * reserve.variable_borrow_index
    }

    /// Stable plus variable debt in underlying units.
    pub fn total_debt(&self, reserve: &ReserveConfig) -> Decimal {
        self.principal_stable_debt + self.variable_debt(reserve)
    }

    pub fn has_supply(&self) -> bool {
        self.scaled_supply_token_balance.is_positive()
    }

    pub fn has_debt(&self) -> bool {
        self.principal_stable_debt.is_positive() || self.scaled_variable_debt.is_positive()
    }
}

/// Reference-currency metadata for a market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseCurrencyData {
    pub decimals: u32,
    /// USD price of one unit of the reference currency.
    pub reference_price_usd: Decimal,
}

/// Full decoded view of one market: reserve configs, the user's positions,
/// base-currency metadata and the user's e-mode category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub reserves: Vec<ReserveConfig>,
    pub user_reserves: Vec<UserReservePosition>,
    pub base_currency: BaseCurrencyData,
    pub user_emode_category_id: u8,
}

impl MarketSnapshot {
    /// Look up a reserve config by underlying asset.
    pub fn reserve(&self, asset: &Address) -> Option<&ReserveConfig> {
        self.reserves.iter().find(|r| &r.underlying_asset == asset)
    }

    /// Look up the user's position by underlying asset.
    pub fn user_reserve(&self, asset: &Address) -> Option<&UserReservePosition> {
        self.user_reserves
            .iter()
            .find(|u| &u.underlying_asset == asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn reserve(asset: &str) -> ReserveConfig {
        ReserveConfig {
            underlying_asset: Address::from(asset),
            symbol: "TST".to_string(),
            decimals: 6,
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
            liquidity_index: Decimal::new(dec!(1.1)),
            variable_borrow_index: Decimal::new(dec!(1.2)),
            total_liquidity: Decimal::new(dec!(1000)),
            available_liquidity: Decimal::new(dec!(500)),
            base_ltv: Decimal::new(dec!(0.8)),
            base_liquidation_threshold: Decimal::new(dec!(0.85)),
            emode_ltv: Decimal::new(dec!(0.9)),
            emode_liquidation_threshold: Decimal::new(dec!(0.95)),
            price_in_base_currency: Decimal::one(),
            supply_apy: Decimal::new(dec!(0.02)),
            variable_borrow_apy: Decimal::new(dec!(0.04)),
            stable_borrow_apy: Decimal::new(dec!(0.05)),
            incentives: vec![],
        }
    }

    #[test]
    fn test_underlying_balance_follows_index() {
        let r = reserve("0x1");
        let mut position = UserReservePosition::empty(Address::from("0x1"));
        position.scaled_supply_token_balance = Decimal::new(dec!(100));

        assert_eq!(position.underlying_balance(&r), Decimal::new(dec!(110)));
    }

    #[test]
    fn test_total_debt_combines_modes() {
        let r = reserve("0x1");
        let mut position = UserReservePosition::empty(Address::from("0x1"));
        position.principal_stable_debt = Decimal::new(dec!(50));
        position.scaled_variable_debt = Decimal::new(dec!(100));

        // 50 stable + 100 * 1.2 variable
        assert_eq!(position.total_debt(&r), Decimal::new(dec!(170)));
        assert!(position.has_debt());
        assert!(!position.has_supply());
    }

    #[test]
    fn test_snapshot_lookups() {
        let snapshot = MarketSnapshot {
            reserves: vec![reserve("0x1"), reserve("0x2")],
            user_reserves: vec![UserReservePosition::empty(Address::from("0x2"))],
            base_currency: BaseCurrencyData {
                decimals: 8,
                reference_price_usd: Decimal::one(),
            },
            user_emode_category_id: 0,
        };

        assert!(snapshot.reserve(&Address::from("0x2")).is_some());
        assert!(snapshot.reserve(&Address::from("0x3")).is_none());
        assert!(snapshot.user_reserve(&Address::from("0x2")).is_some());
        assert!(snapshot.user_reserve(&Address::from("0x1")).is_none());
    }
}
