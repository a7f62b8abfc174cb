use chrono::{Duration, NaiveDate};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::errors::{EngineError, Result};
use crate::types::PeriodToken;

/// inclusive calendar-date range occurrences are counted against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WindowBounds")]
pub struct PeriodWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// unchecked wire form, validated through `PeriodWindow::custom`
#[derive(Deserialize)]
struct WindowBounds {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<WindowBounds> for PeriodWindow {
    type Error = EngineError;

    fn try_from(bounds: WindowBounds) -> Result<Self> {
        PeriodWindow::custom(bounds.start, bounds.end)
    }
}

impl PeriodWindow {
    /// explicit window, rejects start after end
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(EngineError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// window covering the calendar month of `date`
    pub fn month_of(date: NaiveDate) -> Self {
        Self {
            start: calendar::first_of_month(date),
            end: calendar::last_of_month(date),
        }
    }

    /// whether this window has no lower clamp
    pub fn is_unbounded_below(&self) -> bool {
        self.start == NaiveDate::MIN
    }

    /// replace an unbounded lower end with a concrete floor, no-op otherwise
    pub fn with_floor(self, floor: NaiveDate) -> Self {
        if self.is_unbounded_below() {
            Self {
                start: floor.min(self.end),
                end: self.end,
            }
        } else {
            self
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// month windows overlapping this window, clipped to it; empty for an
    /// unbounded window, which has to be floored first
    pub fn months(&self) -> Vec<PeriodWindow> {
        let mut months = Vec::new();
        if self.is_unbounded_below() {
            return months;
        }
        let mut cursor = self.start;
        while cursor <= self.end {
            let month = PeriodWindow::month_of(cursor);
            let end = month.end.min(self.end);
            months.push(PeriodWindow { start: cursor, end });
            match end.checked_add_signed(Duration::days(1)) {
                Some(next) => cursor = next,
                None => break,
            }
        }
        months
    }
}

/// resolve a period token around a reference date
pub fn resolve_window(token: PeriodToken, reference: NaiveDate) -> PeriodWindow {
    match token {
        PeriodToken::Month => PeriodWindow::month_of(reference),
        PeriodToken::Quarter => PeriodWindow {
            start: calendar::first_of_quarter(reference),
            end: calendar::last_of_quarter(reference),
        },
        PeriodToken::Year => PeriodWindow {
            start: calendar::first_of_year(reference),
            end: calendar::last_of_year(reference),
        },
        PeriodToken::All => PeriodWindow {
            start: NaiveDate::MIN,
            end: reference,
        },
    }
}

/// resolve a period token around today's date from the time provider
pub fn resolve_window_now(token: PeriodToken, time_provider: &SafeTimeProvider) -> PeriodWindow {
    resolve_window(token, time_provider.now().date_naive())
}
