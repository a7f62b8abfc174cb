use crate::errors::Result;
use crate::ingest::{RawRecurringRow, RawTransactionRow};
use crate::item::RecurringItem;
use crate::types::Transaction;

/// data-access seam to whatever persistence holds the ledger
pub trait LedgerSource {
    fn recurring_rows(&self) -> Result<Vec<RawRecurringRow>>;

    fn transaction_rows(&self) -> Result<Vec<RawTransactionRow>>;
}

/// ledger held in memory, mostly for tests and demos
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    recurring: Vec<RawRecurringRow>,
    transactions: Vec<RawTransactionRow>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_recurring(&mut self, row: RawRecurringRow) {
        self.recurring.push(row);
    }

    pub fn push_item(&mut self, item: &RecurringItem) {
        self.recurring.push(RawRecurringRow::from(item));
    }

    pub fn push_transaction(&mut self, row: RawTransactionRow) {
        self.transactions.push(row);
    }

    pub fn push_ledger_entry(&mut self, txn: &Transaction) {
        self.transactions.push(RawTransactionRow {
            id: txn.id,
            date: txn.date.format("%Y-%m-%d").to_string(),
            amount: txn.amount.to_string(),
            kind: txn.kind.as_str().to_string(),
            category: txn.category.clone(),
        });
    }
}

impl LedgerSource for InMemoryLedger {
    fn recurring_rows(&self) -> Result<Vec<RawRecurringRow>> {
        Ok(self.recurring.clone())
    }

    fn transaction_rows(&self) -> Result<Vec<RawTransactionRow>> {
        Ok(self.transactions.clone())
    }
}
