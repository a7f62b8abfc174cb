use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{EngineError, Result};
use crate::item::RecurringItem;
use crate::period::PeriodWindow;
use crate::reports::{floor_window, ReportBuilder, SkippedItem};
use crate::types::{EntryKind, ItemId, Transaction, TransactionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntrySource {
    Recurring(ItemId),
    /// occurrences the calendar-bucket count credits beyond the anchored
    /// dates inside the window, booked on the last day the item is in effect
    BucketRemainder {
        item: ItemId,
        occurrences: u32,
    },
    OneTime(TransactionId),
}

/// single dated movement with the balance after it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowEntry {
    pub date: NaiveDate,
    pub source: EntrySource,
    pub label: String,
    pub kind: EntryKind,
    /// income positive, expense negative
    pub amount: Money,
    pub balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowTimeline {
    pub window: PeriodWindow,
    pub opening_balance: Money,
    pub entries: Vec<CashFlowEntry>,
    pub closing_balance: Money,
    pub skipped: Vec<SkippedItem>,
}

impl CashFlowTimeline {
    /// lowest balance reached, opening balance included
    pub fn low_point(&self) -> Money {
        self.entries
            .iter()
            .map(|entry| entry.balance)
            .fold(self.opening_balance, Money::min)
    }

    /// first date the balance drops below zero
    pub fn first_overdraft(&self) -> Option<NaiveDate> {
        self.entries
            .iter()
            .find(|entry| entry.balance.is_negative())
            .map(|entry| entry.date)
    }
}

impl ReportBuilder {
    /// every recurring occurrence and one-time entry inside `window`, in
    /// date order, with a running balance starting from `opening_balance`
    ///
    /// The closing balance always equals the opening balance plus the
    /// window totals' balance change under the same counting mode.
    pub fn cash_flow_timeline(
        &self,
        opening_balance: Money,
        items: &[RecurringItem],
        transactions: &[Transaction],
        window: &PeriodWindow,
    ) -> Result<CashFlowTimeline> {
        let window = floor_window(*window, items, transactions);
        let mut skipped = Vec::new();
        let mut entries = Vec::new();

        for item in items {
            let scheduled = self.recurring_entries(item, &window);
            if let Some(mut scheduled) = self.guard(item.id, scheduled, &mut skipped)? {
                entries.append(&mut scheduled);
            }
        }

        for txn in transactions.iter().filter(|txn| window.contains(txn.date)) {
            entries.push(CashFlowEntry {
                date: txn.date,
                source: EntrySource::OneTime(txn.id),
                label: txn.category.clone().unwrap_or_default(),
                kind: txn.kind,
                amount: signed(txn.kind, txn.amount),
                balance: Money::ZERO,
            });
        }

        // stable: same-day entries keep item order, recurring before one-time
        entries.sort_by_key(|entry| entry.date);

        let mut balance = opening_balance;
        for entry in entries.iter_mut() {
            balance = balance
                .checked_add(entry.amount)
                .ok_or(EngineError::BalanceOverflow { date: entry.date })?;
            entry.balance = balance;
        }

        Ok(CashFlowTimeline {
            window,
            opening_balance,
            entries,
            closing_balance: balance,
            skipped,
        })
    }

    /// dated entries for one item, padded with a bucket remainder when the
    /// configured count exceeds the anchored dates
    fn recurring_entries(&self, item: &RecurringItem, window: &PeriodWindow) -> Result<Vec<CashFlowEntry>> {
        let dates = self.engine.occurrences_between(item, window)?;
        let counted = self.engine.occurrences_in_window(item, window)?;
        let amount = signed(item.kind, item.amount);

        let mut entries: Vec<CashFlowEntry> = dates
            .iter()
            .map(|&date| CashFlowEntry {
                date,
                source: EntrySource::Recurring(item.id),
                label: item.name.clone(),
                kind: item.kind,
                amount,
                balance: Money::ZERO,
            })
            .collect();

        let dated = u32::try_from(dates.len()).unwrap_or(u32::MAX);
        let remainder = counted.saturating_sub(dated);
        if remainder > 0 {
            let last_day = item.end_date.map_or(window.end, |end| end.min(window.end));
            entries.push(CashFlowEntry {
                date: last_day,
                source: EntrySource::BucketRemainder {
                    item: item.id,
                    occurrences: remainder,
                },
                label: item.name.clone(),
                kind: item.kind,
                amount: signed(
                    item.kind,
                    item.amount
                        .checked_times(remainder)
                        .ok_or(EngineError::AmountOverflow { id: item.id })?,
                ),
                balance: Money::ZERO,
            });
        }
        Ok(entries)
    }
}

fn signed(kind: EntryKind, amount: Money) -> Money {
    match kind {
        EntryKind::Income => amount,
        EntryKind::Expense => -amount,
    }
}
