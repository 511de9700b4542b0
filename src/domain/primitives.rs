//! Domain primitives: Address, InterestRateMode.

use serde::{Deserialize, Serialize};

/// Token or contract address (hex string).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    /// Create an Address from a string.
    pub fn new(addr: String) -> Self {
        Address(addr)
    }

    /// Get the address as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(addr: &str) -> Self {
        Address(addr.to_string())
    }
}

/// Interest-rate mode of a borrow position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestRateMode {
    /// Fixed-rate debt tracked as a principal amount.
    Stable,
    /// Rebasing debt tracked as a scaled balance against the borrow index.
    Variable,
}

impl std::fmt::Display for InterestRateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterestRateMode::Stable => write!(f, "stable"),
            InterestRateMode::Variable => write!(f, "variable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_display() {
        let addr = Address::new("0x123abc".to_string());
        assert_eq!(addr.to_string(), "0x123abc");
    }

    #[test]
    fn test_rate_mode_serialization() {
        let stable = InterestRateMode::Stable;
        assert_eq!(serde_json::to_string(&stable).unwrap(), "\"stable\"");

        let variable = InterestRateMode::Variable;
        assert_eq!(serde_json::to_string(&variable).unwrap(), "\"variable\"");
    }

    #[test]
    fn test_rate_mode_display() {
        assert_eq!(InterestRateMode::Stable.to_string(), "stable");
        assert_eq!(InterestRateMode::Variable.to_string(), "variable");
    }
}
