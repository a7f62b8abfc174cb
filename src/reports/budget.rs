use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{EngineError, Result};
use crate::item::RecurringItem;
use crate::period::{resolve_window, PeriodWindow};
use crate::reports::{accumulate, floor_window, ReportBuilder, SkippedItem};
use crate::types::{EntryKind, PeriodToken, Transaction};

/// spending limit for one category over a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub category: String,
    pub limit: Money,
    pub period: PeriodToken,
}

impl Budget {
    pub fn new(category: impl Into<String>, limit: Money, period: PeriodToken) -> Result<Self> {
        if limit.is_negative() {
            return Err(EngineError::InvalidConfiguration {
                message: format!("budget limit {} is negative", limit),
            });
        }
        Ok(Self {
            category: category.into(),
            limit,
            period,
        })
    }

    fn matches(&self, category: Option<&str>) -> bool {
        category.is_some_and(|c| c.eq_ignore_ascii_case(&self.category))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetUsage {
    pub budget: Budget,
    pub window: PeriodWindow,
    /// recurring expenses of the category due in the window
    pub planned_recurring: Money,
    /// one-time expenses of the category booked in the window
    pub actual_spent: Money,
    pub total: Money,
    /// negative when over budget
    pub remaining: Money,
    /// total / limit, None for a zero limit
    pub utilization: Option<Rate>,
    pub over_budget: bool,
    pub skipped: Vec<SkippedItem>,
}

impl ReportBuilder {
    /// budget-vs-actual for the budget's period around `reference`
    pub fn budget_usage(
        &self,
        budget: &Budget,
        items: &[RecurringItem],
        transactions: &[Transaction],
        reference: NaiveDate,
    ) -> Result<BudgetUsage> {
        let window = floor_window(resolve_window(budget.period, reference), items, transactions);
        let mut skipped = Vec::new();

        let mut planned_recurring = Money::ZERO;
        for item in items
            .iter()
            .filter(|item| item.kind == EntryKind::Expense && budget.matches(item.category.as_deref()))
        {
            let planned = self
                .engine
                .amount_in_window(item, &window)
                .and_then(|amount| accumulate(planned_recurring, amount, item.id));
            if let Some(planned) = self.guard(item.id, planned, &mut skipped)? {
                planned_recurring = planned;
            }
        }

        let mut actual_spent = Money::ZERO;
        for txn in transactions
            .iter()
            .filter(|txn| txn.kind == EntryKind::Expense)
            .filter(|txn| budget.matches(txn.category.as_deref()))
            .filter(|txn| window.contains(txn.date))
        {
            let spent = accumulate(actual_spent, txn.amount, txn.id);
            if let Some(spent) = self.guard(txn.id, spent, &mut skipped)? {
                actual_spent = spent;
            }
        }

        let total = planned_recurring
            .checked_add(actual_spent)
            .ok_or(EngineError::BalanceOverflow { date: window.end })?;
        Ok(BudgetUsage {
            budget: budget.clone(),
            window,
            planned_recurring,
            actual_spent,
            total,
            remaining: budget.limit - total,
            utilization: Rate::ratio(total, budget.limit),
            over_budget: total > budget.limit,
            skipped,
        })
    }
}
