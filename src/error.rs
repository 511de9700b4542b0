use crate::domain::Address;
use thiserror::Error;

/// Fatal input-contract violations that abort plan computation.
///
/// Per-asset eligibility outcomes are never errors; they travel as
/// `MigrationEligibility` data on the classified asset entries. A `PlanError`
/// means the snapshots themselves are unusable and no partial plan is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// A rebasing index required for a scaled-balance conversion is zero.
    /// Dividing by it would silently fabricate balances, so we refuse.
    #[error("rebasing index for {asset} is zero or undefined")]
    ZeroIndex { asset: Address },

    /// An asset admitted by an earlier stage (or named by an exception) could
    /// not be dereferenced against the reserve map. Distinct from the
    /// gracefully classified `V3AssetMissing` case.
    #[error("reserve {asset} is missing from the market snapshot")]
    MissingReserve { asset: Address },
}
