pub mod budget;
pub mod comparison;
pub mod timeline;
pub mod totals;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::{CountingMode, ItemErrorPolicy, ReportConfig};
use crate::engine::RecurrenceEngine;
use crate::decimal::Money;
use crate::errors::{EngineError, Result};
use crate::item::RecurringItem;
use crate::period::PeriodWindow;
use crate::source::LedgerSource;
use crate::types::Transaction;

pub use budget::{Budget, BudgetUsage};
pub use comparison::{MonthRow, MonthlyComparison};
pub use timeline::{CashFlowEntry, CashFlowTimeline, EntrySource};
pub use totals::{NetWorth, WindowTotals};

/// record or row left out of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedItem {
    pub id: Uuid,
    pub reason: String,
}

/// validated ledger contents ready for reporting
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    pub items: Vec<RecurringItem>,
    pub transactions: Vec<Transaction>,
    pub skipped: Vec<SkippedItem>,
}

impl Ledger {
    /// read and validate every row from `source`
    pub fn load(source: &dyn LedgerSource, policy: ItemErrorPolicy) -> Result<Self> {
        let mut ledger = Ledger::default();

        for row in source.recurring_rows()? {
            let id = row.id;
            match RecurringItem::try_from(row) {
                Ok(item) => ledger.items.push(item),
                Err(err) => skip_or_halt(policy, id, err, &mut ledger.skipped)?,
            }
        }

        for row in source.transaction_rows()? {
            let id = row.id;
            match Transaction::try_from(row) {
                Ok(txn) => ledger.transactions.push(txn),
                Err(err) => skip_or_halt(policy, id, err, &mut ledger.skipped)?,
            }
        }

        debug!(
            items = ledger.items.len(),
            transactions = ledger.transactions.len(),
            skipped = ledger.skipped.len(),
            "ledger loaded"
        );
        Ok(ledger)
    }

    /// earliest date anything in the ledger happens on
    pub fn earliest_date(&self) -> Option<NaiveDate> {
        earliest_date(&self.items, &self.transactions)
    }
}

/// builds reports from recurring items and one-time transactions
#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder {
    pub engine: RecurrenceEngine,
    pub config: ReportConfig,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        let config = ReportConfig::default();
        Self {
            engine: RecurrenceEngine { config: config.engine },
            config,
        }
    }
}

impl ReportBuilder {
    pub fn new(config: ReportConfig) -> Result<Self> {
        Ok(Self {
            engine: RecurrenceEngine::new(config.engine)?,
            config,
        })
    }

    /// same report settings with a different counting mode
    pub fn with_counting_mode(mut self, counting_mode: CountingMode) -> Self {
        self.config.engine.counting_mode = counting_mode;
        self.engine.config.counting_mode = counting_mode;
        self
    }

    /// apply the error policy to one record's result
    fn guard<T>(&self, id: Uuid, result: Result<T>, skipped: &mut Vec<SkippedItem>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                skip_or_halt(self.config.error_policy, id, err, skipped)?;
                Ok(None)
            }
        }
    }
}

fn skip_or_halt(
    policy: ItemErrorPolicy,
    id: Uuid,
    err: EngineError,
    skipped: &mut Vec<SkippedItem>,
) -> Result<()> {
    match policy {
        ItemErrorPolicy::Halt => Err(err),
        ItemErrorPolicy::Skip => {
            warn!(%id, error = %err, "skipping entry");
            if !skipped.iter().any(|s| s.id == id) {
                skipped.push(SkippedItem {
                    id,
                    reason: err.to_string(),
                });
            }
            Ok(())
        }
    }
}

/// `total + amount`, attributing an overflow to record `id`
fn accumulate(total: Money, amount: Money, id: Uuid) -> Result<Money> {
    total
        .checked_add(amount)
        .ok_or(EngineError::AmountOverflow { id })
}

fn earliest_date(items: &[RecurringItem], transactions: &[Transaction]) -> Option<NaiveDate> {
    items
        .iter()
        .map(|item| item.start_date)
        .chain(transactions.iter().map(|txn| txn.date))
        .min()
}

/// substitute a concrete lower bound for an `All` window
fn floor_window(window: PeriodWindow, items: &[RecurringItem], transactions: &[Transaction]) -> PeriodWindow {
    match earliest_date(items, transactions) {
        Some(floor) => window.with_floor(floor),
        None => window.with_floor(window.end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::RawRecurringRow;
    use crate::source::InMemoryLedger;
    use crate::types::{EntryKind, Frequency};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn ledger_with_bad_row() -> (InMemoryLedger, Uuid) {
        let mut ledger = InMemoryLedger::new();
        let rent = RecurringItem::builder()
            .name("Rent")
            .amount(Money::from_major(1200))
            .expense()
            .frequency(Frequency::Monthly)
            .start_date(d(2024, 1, 1))
            .build()
            .unwrap();
        ledger.push_item(&rent);

        let bad_id = Uuid::new_v4();
        ledger.push_recurring(RawRecurringRow {
            id: bad_id,
            name: "Broken".to_string(),
            category: None,
            amount: "10".to_string(),
            kind: "expense".to_string(),
            frequency: "hourly".to_string(),
            start_date: "2024-01-01".to_string(),
            end_date: None,
            is_active: true,
        });
        ledger.push_ledger_entry(&Transaction::new(d(2023, 12, 24), Money::from_major(50), EntryKind::Expense));
        (ledger, bad_id)
    }

    #[test]
    fn test_load_skips_bad_rows() {
        let (source, bad_id) = ledger_with_bad_row();
        let ledger = Ledger::load(&source, ItemErrorPolicy::Skip).unwrap();

        assert_eq!(ledger.items.len(), 1);
        assert_eq!(ledger.transactions.len(), 1);
        assert_eq!(ledger.skipped.len(), 1);
        assert_eq!(ledger.skipped[0].id, bad_id);
        assert!(ledger.skipped[0].reason.contains("hourly"));
        assert_eq!(ledger.earliest_date(), Some(d(2023, 12, 24)));
    }

    #[test]
    fn test_load_halts_on_bad_rows() {
        let (source, bad_id) = ledger_with_bad_row();
        let err = Ledger::load(&source, ItemErrorPolicy::Halt).unwrap_err();
        assert_eq!(err.item_id(), Some(bad_id));
    }

    #[test]
    fn test_floor_window_without_data_collapses_to_end() {
        let all = crate::period::resolve_window(crate::types::PeriodToken::All, d(2024, 5, 1));
        let floored = floor_window(all, &[], &[]);
        assert_eq!(floored, PeriodWindow { start: d(2024, 5, 1), end: d(2024, 5, 1) });
    }

    #[test]
    fn test_default_builder_engine_matches_config() {
        let builder = ReportBuilder::default();
        assert_eq!(builder.engine.config, builder.config.engine);
        assert_eq!(builder.engine.config.counting_mode, CountingMode::AnchorExact);

        let bucket = builder.with_counting_mode(CountingMode::CalendarBucket);
        assert_eq!(bucket.engine.config.counting_mode, CountingMode::CalendarBucket);
        assert_eq!(bucket.config.engine.counting_mode, CountingMode::CalendarBucket);
    }
}
