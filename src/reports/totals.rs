use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::CountingMode;
use crate::decimal::Money;
use crate::errors::{EngineError, Result};
use crate::item::RecurringItem;
use crate::period::{resolve_window, PeriodWindow};
use crate::reports::{accumulate, floor_window, ReportBuilder, SkippedItem};
use crate::types::{EntryKind, PeriodToken, Transaction};

/// recurring and one-time magnitudes inside one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowTotals {
    pub window: PeriodWindow,
    pub recurring_income: Money,
    pub recurring_expense: Money,
    pub one_time_income: Money,
    pub one_time_expense: Money,
    pub total_income: Money,
    pub total_expense: Money,
    /// recurring occurrences counted
    pub occurrences: u32,
    /// signed by the report's sign convention
    pub net: Money,
    pub skipped: Vec<SkippedItem>,
}

impl WindowTotals {
    fn empty(window: PeriodWindow) -> Self {
        Self {
            window,
            recurring_income: Money::ZERO,
            recurring_expense: Money::ZERO,
            one_time_income: Money::ZERO,
            one_time_expense: Money::ZERO,
            total_income: Money::ZERO,
            total_expense: Money::ZERO,
            occurrences: 0,
            net: Money::ZERO,
            skipped: Vec::new(),
        }
    }

    /// income minus expense, independent of the sign convention
    pub fn balance_change(&self) -> Money {
        self.total_income - self.total_expense
    }

    /// add one record's magnitude; nothing changes when a sum overflows
    fn credit(&mut self, kind: EntryKind, amount: Money, recurring: bool, id: Uuid) -> Result<()> {
        let (bucket, total) = match (kind, recurring) {
            (EntryKind::Income, true) => (&mut self.recurring_income, &mut self.total_income),
            (EntryKind::Income, false) => (&mut self.one_time_income, &mut self.total_income),
            (EntryKind::Expense, true) => (&mut self.recurring_expense, &mut self.total_expense),
            (EntryKind::Expense, false) => (&mut self.one_time_expense, &mut self.total_expense),
        };
        let new_bucket = accumulate(*bucket, amount, id)?;
        let new_total = accumulate(*total, amount, id)?;
        *bucket = new_bucket;
        *total = new_total;
        Ok(())
    }
}

/// balance as of a date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetWorth {
    pub as_of: NaiveDate,
    pub opening_balance: Money,
    pub totals: WindowTotals,
    pub balance: Money,
}

impl ReportBuilder {
    /// recurring contributions plus one-time entries inside `window`
    pub fn window_totals(
        &self,
        items: &[RecurringItem],
        transactions: &[Transaction],
        window: &PeriodWindow,
    ) -> Result<WindowTotals> {
        let mut totals = WindowTotals::empty(*window);

        for item in items {
            let counted = self.engine.occurrences_in_window(item, window).and_then(|count| {
                let amount = item
                    .amount
                    .checked_times(count)
                    .ok_or(EngineError::AmountOverflow { id: item.id })?;
                Ok((count, amount))
            });
            let Some((count, amount)) = self.guard(item.id, counted, &mut totals.skipped)? else {
                continue;
            };

            let credited = totals.credit(item.kind, amount, true, item.id);
            if self.guard(item.id, credited, &mut totals.skipped)?.is_some() {
                totals.occurrences = totals.occurrences.saturating_add(count);
            }
        }

        for txn in transactions.iter().filter(|txn| window.contains(txn.date)) {
            let credited = totals.credit(txn.kind, txn.amount, false, txn.id);
            self.guard(txn.id, credited, &mut totals.skipped)?;
        }

        totals.net = self
            .config
            .sign_convention
            .apply(EntryKind::Income, totals.balance_change());
        Ok(totals)
    }

    /// totals for a period token around `reference`; `All` is floored at
    /// the earliest date in the inputs
    pub fn period_totals(
        &self,
        token: PeriodToken,
        items: &[RecurringItem],
        transactions: &[Transaction],
        reference: NaiveDate,
    ) -> Result<WindowTotals> {
        let window = floor_window(resolve_window(token, reference), items, transactions);
        self.window_totals(items, transactions, &window)
    }

    /// opening balance plus everything dated on or before `as_of`
    ///
    /// Always counts anchored occurrences: a payment due after `as_of` has
    /// not happened yet, whatever the configured counting mode.
    pub fn net_worth_as_of(
        &self,
        opening_balance: Money,
        items: &[RecurringItem],
        transactions: &[Transaction],
        as_of: NaiveDate,
    ) -> Result<NetWorth> {
        let totals = self
            .with_counting_mode(CountingMode::AnchorExact)
            .period_totals(PeriodToken::All, items, transactions, as_of)?;
        let balance = opening_balance
            .checked_add(totals.balance_change())
            .ok_or(EngineError::BalanceOverflow { date: as_of })?;

        Ok(NetWorth {
            as_of,
            opening_balance,
            totals,
            balance,
        })
    }
}
