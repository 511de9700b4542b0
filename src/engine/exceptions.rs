//! Exception resolution for V2 -> V3 asset correspondence.
//!
//! Every place a V2 asset is mapped onto the V3 reserve map goes through this
//! resolver. Deriving the correspondence ad hoc per stage is how plans end up
//! classifying one asset and projecting another.

use crate::domain::{Address, Decimal, MigrationExceptions};

/// Effective V2 -> V3 correspondence for one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub v2_underlying_asset: Address,
    /// Lookup key to use against the V3 reserve map.
    pub v3_underlying_asset: Address,
    /// Replaces the live on-chain balance for all projection purposes.
    pub override_amount: Option<Decimal>,
}

/// Applies user- or operator-supplied migration exceptions.
pub struct ExceptionResolver<'a> {
    exceptions: &'a MigrationExceptions,
}

impl<'a> ExceptionResolver<'a> {
    pub fn new(exceptions: &'a MigrationExceptions) -> Self {
        Self { exceptions }
    }

    /// Resolve one V2 asset. No exception entry means identity mapping.
    pub fn resolve(&self, asset: &Address) -> ResolvedAsset {
        match self.exceptions.get(asset) {
            Some(exception) => ResolvedAsset {
                v2_underlying_asset: asset.clone(),
                v3_underlying_asset: exception.target_underlying_asset.clone(),
                override_amount: exception.override_amount,
            },
            None => ResolvedAsset {
                v2_underlying_asset: asset.clone(),
                v3_underlying_asset: asset.clone(),
                override_amount: None,
            },
        }
    }

    /// The amount to plan with: the exception override if present, the live
    /// amount otherwise.
    pub fn effective_amount(&self, asset: &Address, live_amount: Decimal) -> Decimal {
        self.resolve(asset).override_amount.unwrap_or(live_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MigrationException;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    #[test]
    fn test_identity_mapping_without_exception() {
        let exceptions = HashMap::new();
        let resolver = ExceptionResolver::new(&exceptions);

        let resolved = resolver.resolve(&Address::from("0x1"));
        assert_eq!(resolved.v2_underlying_asset, Address::from("0x1"));
        assert_eq!(resolved.v3_underlying_asset, Address::from("0x1"));
        assert!(resolved.override_amount.is_none());
        assert_eq!(
            resolver.effective_amount(&Address::from("0x1"), Decimal::new(dec!(42))),
            Decimal::new(dec!(42))
        );
    }

    #[test]
    fn test_redirect_replaces_lookup_key() {
        let mut exceptions = HashMap::new();
        exceptions.insert(
            Address::from("0xsteth"),
            MigrationException {
                target_underlying_asset: Address::from("0xwsteth"),
                override_amount: None,
            },
        );
        let resolver = ExceptionResolver::new(&exceptions);

        let resolved = resolver.resolve(&Address::from("0xsteth"));
        assert_eq!(resolved.v3_underlying_asset, Address::from("0xwsteth"));
        // No amount override: live balance still applies.
        assert_eq!(
            resolver.effective_amount(&Address::from("0xsteth"), Decimal::new(dec!(10))),
            Decimal::new(dec!(10))
        );
    }

    #[test]
    fn test_override_amount_replaces_live_balance() {
        let mut exceptions = HashMap::new();
        exceptions.insert(
            Address::from("0x1"),
            MigrationException {
                target_underlying_asset: Address::from("0x2"),
                override_amount: Some(Decimal::new(dec!(7.5))),
            },
        );
        let resolver = ExceptionResolver::new(&exceptions);

        assert_eq!(
            resolver.effective_amount(&Address::from("0x1"), Decimal::new(dec!(1000))),
            Decimal::new(dec!(7.5))
        );
    }
}
