pub mod activity;
pub mod counting;
pub mod occurrence;

use chrono::{Duration, NaiveDate};

use crate::calendar;
use crate::config::EngineConfig;
use crate::errors::Result;
use crate::item::RecurringItem;
use crate::types::Frequency;

/// pure calculation engine for recurring items
///
/// Holds configuration only. Every method is a function of its arguments,
/// so one engine can be shared freely across threads and reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecurrenceEngine {
    pub config: EngineConfig,
}

impl RecurrenceEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// the n-th occurrence counted from the start date (n = 0 is the start
    /// date itself); always derived from the anchor so month-end clamping
    /// never drifts
    pub fn nth_occurrence(item: &RecurringItem, n: u32) -> Option<NaiveDate> {
        let start = item.start_date;
        match item.frequency {
            Frequency::Daily => start.checked_add_signed(Duration::days(n as i64)),
            Frequency::Weekly => start.checked_add_signed(Duration::weeks(n as i64)),
            Frequency::Monthly => calendar::add_months(start, n as i64),
            Frequency::Yearly => calendar::add_years(start, n as i64),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{d, item};
    use super::*;

    #[test]
    fn test_nth_occurrence_per_frequency() {
        let start = d(2024, 1, 31);
        assert_eq!(RecurrenceEngine::nth_occurrence(&item(Frequency::Daily, start, None), 1), Some(d(2024, 2, 1)));
        assert_eq!(RecurrenceEngine::nth_occurrence(&item(Frequency::Weekly, start, None), 2), Some(d(2024, 2, 14)));
        assert_eq!(RecurrenceEngine::nth_occurrence(&item(Frequency::Monthly, start, None), 1), Some(d(2024, 2, 29)));
        assert_eq!(RecurrenceEngine::nth_occurrence(&item(Frequency::Yearly, start, None), 3), Some(d(2027, 1, 31)));
    }

    #[test]
    fn test_monthly_anchor_does_not_drift() {
        let rent = item(Frequency::Monthly, d(2023, 1, 31), None);
        // february clamps, march goes back to the 31st
        assert_eq!(RecurrenceEngine::nth_occurrence(&rent, 1), Some(d(2023, 2, 28)));
        assert_eq!(RecurrenceEngine::nth_occurrence(&rent, 2), Some(d(2023, 3, 31)));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = EngineConfig::default().with_max_iterations(0);
        assert!(RecurrenceEngine::new(config).is_err());
        assert!(RecurrenceEngine::new(EngineConfig::default()).is_ok());
    }
}
