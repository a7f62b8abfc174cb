use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{EngineError, Result};
use crate::types::EntryKind;

/// default cap on forward-stepping iterations, roughly 270 years of daily steps
pub const DEFAULT_MAX_ITERATIONS: u32 = 100_000;

/// how occurrences are counted inside a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CountingMode {
    /// day/week/month-bucket arithmetic on the clipped window; a monthly item
    /// counts once for every calendar month the clipped window touches
    #[default]
    CalendarBucket,
    /// only anchored occurrence dates that fall inside the clipped window
    AnchorExact,
}

/// engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub max_iterations: u32,
    pub counting_mode: CountingMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            counting_mode: CountingMode::CalendarBucket,
        }
    }
}

impl EngineConfig {
    /// occurrence-exact counting with the default search cap
    pub fn exact() -> Self {
        Self {
            counting_mode: CountingMode::AnchorExact,
            ..Self::default()
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(EngineError::InvalidConfiguration {
                message: "max_iterations must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// parse and validate a json configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| EngineError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| EngineError::InvalidConfiguration {
            message: e.to_string(),
        })
    }
}

/// sign applied when magnitudes are folded into a directional total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SignConvention {
    /// income adds, expenses subtract
    #[default]
    IncomePositive,
    /// expenses add, income subtracts
    ExpensePositive,
}

impl SignConvention {
    /// signed value of a magnitude of the given kind
    pub fn apply(&self, kind: EntryKind, amount: Money) -> Money {
        match (self, kind) {
            (SignConvention::IncomePositive, EntryKind::Income)
            | (SignConvention::ExpensePositive, EntryKind::Expense) => amount,
            _ => -amount,
        }
    }
}

/// what a report does when a single item cannot be evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ItemErrorPolicy {
    /// log, record the item as skipped and continue
    #[default]
    Skip,
    /// stop and return the first error
    Halt,
}

/// report configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub engine: EngineConfig,
    pub sign_convention: SignConvention,
    pub error_policy: ItemErrorPolicy,
}

impl Default for ReportConfig {
    /// reports list dated entries, so they count anchored occurrences
    fn default() -> Self {
        Self {
            engine: EngineConfig::exact(),
            sign_convention: SignConvention::default(),
            error_policy: ItemErrorPolicy::default(),
        }
    }
}

impl ReportConfig {
    /// halt on the first bad item
    pub fn strict() -> Self {
        Self {
            error_policy: ItemErrorPolicy::Halt,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.engine.validate()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: ReportConfig =
            serde_json::from_str(json).map_err(|e| EngineError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert_eq!(config.counting_mode, CountingMode::CalendarBucket);
        assert!(config.validate().is_ok());

        let report = ReportConfig::default();
        assert_eq!(report.engine, EngineConfig::exact());
        assert_eq!(report.sign_convention, SignConvention::IncomePositive);
        assert_eq!(report.error_policy, ItemErrorPolicy::Skip);
    }

    #[test]
    fn test_sign_convention() {
        let ten = Money::from_major(10);
        assert_eq!(SignConvention::IncomePositive.apply(EntryKind::Income, ten), ten);
        assert_eq!(SignConvention::IncomePositive.apply(EntryKind::Expense, ten), -ten);
        assert_eq!(SignConvention::ExpensePositive.apply(EntryKind::Expense, ten), ten);
        assert_eq!(SignConvention::ExpensePositive.apply(EntryKind::Income, ten), -ten);
    }

    #[test]
    fn test_json_round_trip() {
        let config = EngineConfig::exact().with_max_iterations(500);
        let parsed = EngineConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_json_rejects_zero_iterations() {
        let err = EngineConfig::from_json(
            r#"{"max_iterations": 0, "counting_mode": "CalendarBucket"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_json_rejects_unknown_mode() {
        let err = EngineConfig::from_json(
            r#"{"max_iterations": 10, "counting_mode": "Fuzzy"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_report_config_from_json() {
        let json = r#"{
            "engine": {"max_iterations": 1000, "counting_mode": "AnchorExact"},
            "sign_convention": "ExpensePositive",
            "error_policy": "Halt"
        }"#;
        let config = ReportConfig::from_json(json).unwrap();
        assert_eq!(config.engine.counting_mode, CountingMode::AnchorExact);
        assert_eq!(config.sign_convention, SignConvention::ExpensePositive);
        assert_eq!(config, ReportConfig {
            engine: EngineConfig::exact().with_max_iterations(1000),
            sign_convention: SignConvention::ExpensePositive,
            ..ReportConfig::strict()
        });
    }
}
