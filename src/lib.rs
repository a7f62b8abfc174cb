pub mod calendar;
pub mod config;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod ingest;
pub mod item;
pub mod period;
pub mod reports;
pub mod source;
pub mod types;

// re-export key types
pub use config::{CountingMode, EngineConfig, ItemErrorPolicy, ReportConfig, SignConvention};
pub use decimal::{Money, Rate};
pub use engine::RecurrenceEngine;
pub use errors::{EngineError, Result};
pub use ingest::{RawRecurringRow, RawTransactionRow};
pub use item::{RecurringItem, RecurringItemBuilder};
pub use period::{resolve_window, resolve_window_now, PeriodWindow};
pub use reports::{
    Budget, BudgetUsage, CashFlowTimeline, Ledger, MonthlyComparison, NetWorth, ReportBuilder,
    SkippedItem, WindowTotals,
};
pub use source::{InMemoryLedger, LedgerSource};
pub use types::{EntryKind, Frequency, ItemId, PeriodToken, Transaction, TransactionId};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
