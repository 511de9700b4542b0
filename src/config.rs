use std::collections::HashMap;
use thiserror::Error;

/// Tuning knobs for the migration planner.
///
/// The engine itself is a pure function; these values only shape the
/// artifacts it emits (permit deadlines) and document the margin callers are
/// expected to apply when snapshotting borrow amounts at selection time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Buffer in basis points applied on top of live debt when a borrow
    /// position is snapshotted for selection. Debt keeps accruing between
    /// selection and execution; the margin keeps the repay amount sufficient.
    pub debt_growth_margin_bps: u32,
    /// Validity window stamped on emitted permit payloads, in seconds.
    pub permit_deadline_secs: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            debt_growth_margin_bps: 1,
            permit_deadline_secs: 3600,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let debt_growth_margin_bps = env_map
            .get("MIGRATION_DEBT_MARGIN_BPS")
            .map(|s| s.as_str())
            .unwrap_or("1")
            .parse::<u32>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "MIGRATION_DEBT_MARGIN_BPS".to_string(),
                    "must be a valid u32".to_string(),
                )
            })?;

        let permit_deadline_secs = env_map
            .get("MIGRATION_PERMIT_DEADLINE_SECS")
            .map(|s| s.as_str())
            .unwrap_or("3600")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "MIGRATION_PERMIT_DEADLINE_SECS".to_string(),
                    "must be a valid u64".to_string(),
                )
            })?;

        if debt_growth_margin_bps >= 10_000 {
            return Err(ConfigError::InvalidValue(
                "MIGRATION_DEBT_MARGIN_BPS".to_string(),
                "must be below 10000".to_string(),
            ));
        }

        Ok(PlannerConfig {
            debt_growth_margin_bps,
            permit_deadline_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_empty_env() {
        let config = PlannerConfig::from_env_map(HashMap::new()).unwrap();
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn test_margin_override() {
        let mut env_map = HashMap::new();
        env_map.insert("MIGRATION_DEBT_MARGIN_BPS".to_string(), "25".to_string());
        let config = PlannerConfig::from_env_map(env_map).unwrap();
        assert_eq!(config.debt_growth_margin_bps, 25);
        assert_eq!(config.permit_deadline_secs, 3600);
    }

    #[test]
    fn test_invalid_margin() {
        let mut env_map = HashMap::new();
        env_map.insert(
            "MIGRATION_DEBT_MARGIN_BPS".to_string(),
            "not_a_number".to_string(),
        );
        let result = PlannerConfig::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "MIGRATION_DEBT_MARGIN_BPS"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_margin_out_of_range() {
        let mut env_map = HashMap::new();
        env_map.insert("MIGRATION_DEBT_MARGIN_BPS".to_string(), "10000".to_string());
        let result = PlannerConfig::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "MIGRATION_DEBT_MARGIN_BPS"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_deadline() {
        let mut env_map = HashMap::new();
        env_map.insert(
            "MIGRATION_PERMIT_DEADLINE_SECS".to_string(),
            "-5".to_string(),
        );
        let result = PlannerConfig::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => {
                assert_eq!(k, "MIGRATION_PERMIT_DEADLINE_SECS")
            }
            _ => panic!("Expected InvalidValue error"),
        }
    }
}
