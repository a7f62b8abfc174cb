use chrono::NaiveDate;
use tracing::{trace, warn};

use crate::engine::RecurrenceEngine;
use crate::errors::{EngineError, Result};
use crate::item::RecurringItem;
use crate::period::PeriodWindow;

impl RecurrenceEngine {
    /// earliest occurrence on or after `from`, None when the item cannot
    /// occur again (disabled, or ended before the next step)
    pub fn next_occurrence_on_or_after(
        &self,
        item: &RecurringItem,
        from: NaiveDate,
    ) -> Result<Option<NaiveDate>> {
        Ok(self
            .first_occurrence_index(item, from)?
            .map(|(_, date)| date))
    }

    /// concrete occurrence dates inside `window`, in order
    pub fn occurrences_between(
        &self,
        item: &RecurringItem,
        window: &PeriodWindow,
    ) -> Result<Vec<NaiveDate>> {
        let lifetime_end = item.end_date.unwrap_or(window.end).min(window.end);

        let (mut index, first) = match self.first_occurrence_index(item, window.start)? {
            Some(found) => found,
            None => return Ok(Vec::new()),
        };

        let mut dates = Vec::new();
        let mut current = first;
        let mut steps = 0u32;
        while current <= lifetime_end {
            dates.push(current);
            steps += 1;
            if steps > self.config.max_iterations {
                warn!(item_id = %item.id, steps, "occurrence enumeration exceeded cap");
                return Err(EngineError::OccurrenceSearchExhausted {
                    id: item.id,
                    iterations: self.config.max_iterations,
                });
            }
            index += 1;
            current = match Self::nth_occurrence(item, index) {
                Some(next) => next,
                None => break,
            };
        }

        trace!(item_id = %item.id, count = dates.len(), "enumerated occurrences");
        Ok(dates)
    }

    /// step forward from the start date to the first occurrence >= `from`,
    /// returning its index and date
    fn first_occurrence_index(
        &self,
        item: &RecurringItem,
        from: NaiveDate,
    ) -> Result<Option<(u32, NaiveDate)>> {
        item.validate()?;

        if !item.is_active || item.has_ended_before(from) {
            return Ok(None);
        }

        if item.start_date >= from {
            return Ok(Some((0, item.start_date)));
        }

        for index in 1..=self.config.max_iterations {
            let candidate = match Self::nth_occurrence(item, index) {
                Some(date) => date,
                // ran off the end of the calendar
                None => return Ok(None),
            };

            if candidate >= from {
                if item.end_date.is_some_and(|end| candidate > end) {
                    return Ok(None);
                }
                return Ok(Some((index, candidate)));
            }
        }

        warn!(
            item_id = %item.id,
            frequency = %item.frequency,
            %from,
            iterations = self.config.max_iterations,
            "next occurrence search exhausted"
        );
        Err(EngineError::OccurrenceSearchExhausted {
            id: item.id,
            iterations: self.config.max_iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;
    use crate::engine::test_support::{d, item};
    use crate::engine::RecurrenceEngine;
    use crate::errors::EngineError;
    use crate::period::PeriodWindow;
    use crate::types::Frequency;

    #[test]
    fn test_future_start_is_first_occurrence() {
        let engine = RecurrenceEngine::default();
        let sub = item(Frequency::Monthly, d(2024, 5, 20), None);
        assert_eq!(
            engine.next_occurrence_on_or_after(&sub, d(2024, 1, 1)).unwrap(),
            Some(d(2024, 5, 20))
        );
        assert_eq!(
            engine.next_occurrence_on_or_after(&sub, d(2024, 5, 20)).unwrap(),
            Some(d(2024, 5, 20))
        );
    }

    #[test]
    fn test_month_end_clamp_non_leap() {
        let engine = RecurrenceEngine::default();
        let rent = item(Frequency::Monthly, d(2023, 1, 31), None);
        assert_eq!(
            engine.next_occurrence_on_or_after(&rent, d(2023, 2, 1)).unwrap(),
            Some(d(2023, 2, 28))
        );
        assert_eq!(
            engine.next_occurrence_on_or_after(&rent, d(2023, 3, 1)).unwrap(),
            Some(d(2023, 3, 31))
        );
    }

    #[test]
    fn test_month_end_clamp_leap() {
        let engine = RecurrenceEngine::default();
        let rent = item(Frequency::Monthly, d(2024, 1, 31), None);
        assert_eq!(
            engine.next_occurrence_on_or_after(&rent, d(2024, 2, 1)).unwrap(),
            Some(d(2024, 2, 29))
        );
    }

    #[test]
    fn test_weekly_and_daily_stepping() {
        let engine = RecurrenceEngine::default();
        let weekly = item(Frequency::Weekly, d(2024, 1, 1), None);
        assert_eq!(
            engine.next_occurrence_on_or_after(&weekly, d(2024, 1, 9)).unwrap(),
            Some(d(2024, 1, 15))
        );

        let daily = item(Frequency::Daily, d(2024, 1, 1), None);
        assert_eq!(
            engine.next_occurrence_on_or_after(&daily, d(2024, 3, 1)).unwrap(),
            Some(d(2024, 3, 1))
        );
    }

    #[test]
    fn test_yearly_leap_day_anchor() {
        let engine = RecurrenceEngine::default();
        let renewal = item(Frequency::Yearly, d(2024, 2, 29), None);
        assert_eq!(
            engine.next_occurrence_on_or_after(&renewal, d(2024, 3, 1)).unwrap(),
            Some(d(2025, 2, 28))
        );
        assert_eq!(
            engine.next_occurrence_on_or_after(&renewal, d(2027, 3, 1)).unwrap(),
            Some(d(2028, 2, 29))
        );
    }

    #[test]
    fn test_none_after_end_date() {
        let engine = RecurrenceEngine::default();
        let loan = item(Frequency::Monthly, d(2024, 1, 15), Some(d(2024, 6, 20)));

        // ended before the query
        assert_eq!(engine.next_occurrence_on_or_after(&loan, d(2024, 7, 1)).unwrap(), None);
        // next step would land after the end date
        assert_eq!(engine.next_occurrence_on_or_after(&loan, d(2024, 6, 16)).unwrap(), None);
        assert_eq!(
            engine.next_occurrence_on_or_after(&loan, d(2024, 6, 15)).unwrap(),
            Some(d(2024, 6, 15))
        );
    }

    #[test]
    fn test_disabled_item_has_no_next_occurrence() {
        let engine = RecurrenceEngine::default();
        let mut sub = item(Frequency::Monthly, d(2024, 1, 1), None);
        sub.is_active = false;
        assert_eq!(engine.next_occurrence_on_or_after(&sub, d(2024, 1, 1)).unwrap(), None);
    }

    #[test]
    fn test_search_exhausted() {
        let engine = RecurrenceEngine::new(EngineConfig::default().with_max_iterations(10)).unwrap();
        let daily = item(Frequency::Daily, d(2024, 1, 1), None);

        let err = engine
            .next_occurrence_on_or_after(&daily, d(2024, 3, 1))
            .unwrap_err();
        assert_eq!(err, EngineError::OccurrenceSearchExhausted { id: daily.id, iterations: 10 });

        // within the cap still resolves
        assert_eq!(
            engine.next_occurrence_on_or_after(&daily, d(2024, 1, 5)).unwrap(),
            Some(d(2024, 1, 5))
        );
    }

    #[test]
    fn test_invalid_item_rejected() {
        let engine = RecurrenceEngine::default();
        let broken = item(Frequency::Monthly, d(2024, 5, 1), Some(d(2024, 4, 1)));
        let err = engine
            .next_occurrence_on_or_after(&broken, d(2024, 1, 1))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRecurringItem { .. }));
    }

    #[test]
    fn test_occurrences_between_clamped_month_ends() {
        let engine = RecurrenceEngine::default();
        let rent = item(Frequency::Monthly, d(2024, 1, 31), None);
        let window = PeriodWindow::custom(d(2024, 1, 1), d(2024, 4, 30)).unwrap();

        let dates = engine.occurrences_between(&rent, &window).unwrap();
        assert_eq!(dates, vec![d(2024, 1, 31), d(2024, 2, 29), d(2024, 3, 31), d(2024, 4, 30)]);
    }

    #[test]
    fn test_occurrences_between_respects_end_date() {
        let engine = RecurrenceEngine::default();
        let trial = item(Frequency::Weekly, d(2024, 1, 1), Some(d(2024, 1, 20)));
        let window = PeriodWindow::custom(d(2024, 1, 1), d(2024, 12, 31)).unwrap();

        let dates = engine.occurrences_between(&trial, &window).unwrap();
        assert_eq!(dates, vec![d(2024, 1, 1), d(2024, 1, 8), d(2024, 1, 15)]);
    }

    #[test]
    fn test_occurrences_between_outside_lifetime() {
        let engine = RecurrenceEngine::default();
        let sub = item(Frequency::Daily, d(2024, 6, 1), None);
        let window = PeriodWindow::custom(d(2024, 1, 1), d(2024, 5, 31)).unwrap();
        assert!(engine.occurrences_between(&sub, &window).unwrap().is_empty());
    }
}
