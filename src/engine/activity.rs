use chrono::NaiveDate;

use crate::engine::RecurrenceEngine;
use crate::item::RecurringItem;

impl RecurrenceEngine {
    /// whether the item is in effect on `date`: enabled, started, not ended
    pub fn is_active_on(&self, item: &RecurringItem, date: NaiveDate) -> bool {
        debug_assert!(item.is_valid(), "recurring item {} failed validation", item.id);

        item.is_active
            && item.start_date <= date
            && item.end_date.map_or(true, |end| end >= date)
    }
}
