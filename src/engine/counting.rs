use chrono::{Datelike, NaiveDate};
use tracing::trace;

use crate::calendar;
use crate::config::CountingMode;
use crate::decimal::Money;
use crate::engine::RecurrenceEngine;
use crate::errors::{EngineError, Result};
use crate::item::RecurringItem;
use crate::period::PeriodWindow;
use crate::types::Frequency;

impl RecurrenceEngine {
    /// number of occurrences of `item` inside `window`
    ///
    /// The window is first clipped to the item's lifetime. Disabled items
    /// and items that do not overlap the window count zero.
    pub fn occurrences_in_window(&self, item: &RecurringItem, window: &PeriodWindow) -> Result<u32> {
        item.validate()?;

        if !item.is_active {
            return Ok(0);
        }

        let effective_start = item.start_date.max(window.start);
        let effective_end = item.end_date.unwrap_or(window.end).min(window.end);
        if effective_start > effective_end {
            return Ok(0);
        }

        let count = match self.config.counting_mode {
            CountingMode::CalendarBucket => bucket_count(item, effective_start, effective_end),
            CountingMode::AnchorExact => {
                let through_end = occurrences_through(item, effective_end);
                let before_start = effective_start
                    .pred_opt()
                    .map_or(0, |day_before| occurrences_through(item, day_before));
                through_end - before_start
            }
        };

        trace!(
            item_id = %item.id,
            start = %effective_start,
            end = %effective_end,
            count,
            "counted occurrences"
        );
        Ok(saturate(count))
    }

    /// unsigned monetary contribution of `item` inside `window`
    pub fn amount_in_window(&self, item: &RecurringItem, window: &PeriodWindow) -> Result<Money> {
        let count = self.occurrences_in_window(item, window)?;
        item.amount
            .checked_times(count)
            .ok_or(EngineError::AmountOverflow { id: item.id })
    }
}

/// calendar-bucket count over an already clipped, non-empty range
fn bucket_count(item: &RecurringItem, start: NaiveDate, end: NaiveDate) -> i64 {
    let days = (end - start).num_days();
    match item.frequency {
        Frequency::Daily => days + 1,
        Frequency::Weekly => days / 7 + 1,
        Frequency::Monthly => calendar::month_index(end) - calendar::month_index(start) + 1,
        Frequency::Yearly => {
            let years = (end.year() - start.year()) as i64;
            years + i64::from(anchor_reached(item.start_date, end))
        }
    }
}

/// whether the anchor's month/day, clamped into `date`'s year, is on or
/// before `date`
fn anchor_reached(anchor: NaiveDate, date: NaiveDate) -> bool {
    calendar::clamped_date(date.year(), anchor.month(), anchor.day())
        .map_or(false, |this_year| this_year <= date)
}

/// number of anchored occurrences on or before `date`
fn occurrences_through(item: &RecurringItem, date: NaiveDate) -> i64 {
    let start = item.start_date;
    if date < start {
        return 0;
    }

    match item.frequency {
        Frequency::Daily => (date - start).num_days() + 1,
        Frequency::Weekly => (date - start).num_days() / 7 + 1,
        Frequency::Monthly => {
            // occurrences 0..k all fall in months before `date`'s month
            let k = calendar::month_index(date) - calendar::month_index(start);
            k + i64::from(calendar::add_months(start, k).is_some_and(|occ| occ <= date))
        }
        Frequency::Yearly => {
            let k = (date.year() - start.year()) as i64;
            k + i64::from(calendar::add_years(start, k).is_some_and(|occ| occ <= date))
        }
    }
}

fn saturate(count: i64) -> u32 {
    u32::try_from(count.max(0)).unwrap_or(u32::MAX)
}
