use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::decimal::Money;
use crate::errors::{EngineError, Result};
use crate::item::RecurringItem;
use crate::period::PeriodWindow;
use crate::reports::{ReportBuilder, SkippedItem};
use crate::types::Transaction;

/// one calendar month in a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthRow {
    pub month: PeriodWindow,
    pub income: Money,
    pub expense: Money,
    pub net: Money,
    /// net minus the previous row's net
    pub change: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyComparison {
    /// oldest month first
    pub rows: Vec<MonthRow>,
    pub skipped: Vec<SkippedItem>,
}

impl MonthlyComparison {
    pub fn latest(&self) -> Option<&MonthRow> {
        self.rows.last()
    }

    /// mean net across all rows
    pub fn average_net(&self) -> Money {
        if self.rows.is_empty() {
            return Money::ZERO;
        }
        // divide first so the running sum stays within a single net's range
        let count = Decimal::from(self.rows.len() as u64);
        let mean = self
            .rows
            .iter()
            .fold(Decimal::ZERO, |acc, row| acc + row.net.as_decimal() / count);
        Money::from_decimal(mean)
    }
}

impl ReportBuilder {
    /// `months` calendar months ending with the month of `reference`
    pub fn monthly_comparison(
        &self,
        items: &[RecurringItem],
        transactions: &[Transaction],
        months: u32,
        reference: NaiveDate,
    ) -> Result<MonthlyComparison> {
        if months == 0 {
            return Err(EngineError::InvalidConfiguration {
                message: "monthly comparison needs at least one month".to_string(),
            });
        }

        let first = calendar::add_months(calendar::first_of_month(reference), 1 - i64::from(months))
            .ok_or_else(|| EngineError::InvalidConfiguration {
                message: format!("{} months before {} is out of range", months - 1, reference),
            })?;
        let span = PeriodWindow::custom(first, calendar::last_of_month(reference))?;

        let mut rows: Vec<MonthRow> = Vec::with_capacity(months as usize);
        let mut skipped: Vec<SkippedItem> = Vec::new();

        for month in span.months() {
            let totals = self.window_totals(items, transactions, &month)?;

            for skip in totals.skipped.iter() {
                if !skipped.iter().any(|s| s.id == skip.id) {
                    skipped.push(skip.clone());
                }
            }

            let change = match rows.last() {
                Some(previous) => Some(
                    totals
                        .net
                        .checked_sub(previous.net)
                        .ok_or(EngineError::BalanceOverflow { date: month.start })?,
                ),
                None => None,
            };
            rows.push(MonthRow {
                month,
                income: totals.total_income,
                expense: totals.total_expense,
                net: totals.net,
                change,
            });
        }

        Ok(MonthlyComparison { rows, skipped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntryKind, Frequency};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_three_month_comparison() {
        let builder = ReportBuilder::default();
        let items = vec![
            RecurringItem::builder()
                .name("Salary")
                .amount(Money::from_major(2000))
                .income()
                .frequency(Frequency::Monthly)
                .start_date(d(2024, 2, 28))
                .build()
                .unwrap(),
            RecurringItem::builder()
                .name("Gym")
                .amount(Money::from_major(50))
                .expense()
                .frequency(Frequency::Monthly)
                .start_date(d(2023, 6, 1))
                .build()
                .unwrap(),
        ];
        let transactions = vec![Transaction::new(d(2024, 3, 9), Money::from_major(300), EntryKind::Expense)];

        let comparison = builder
            .monthly_comparison(&items, &transactions, 3, d(2024, 3, 15))
            .unwrap();

        assert_eq!(comparison.rows.len(), 3);
        let jan = &comparison.rows[0];
        let feb = &comparison.rows[1];
        let mar = &comparison.rows[2];

        assert_eq!(jan.month.start, d(2024, 1, 1));
        assert_eq!(jan.net, Money::from_major(-50));
        assert_eq!(jan.change, None);

        assert_eq!(feb.income, Money::from_major(2000));
        assert_eq!(feb.net, Money::from_major(1950));
        assert_eq!(feb.change, Some(Money::from_major(2000)));

        assert_eq!(mar.expense, Money::from_major(350));
        assert_eq!(mar.net, Money::from_major(1650));
        assert_eq!(mar.change, Some(Money::from_major(-300)));

        assert_eq!(comparison.latest().map(|r| r.month.end), Some(d(2024, 3, 31)));
        assert_eq!(comparison.average_net(), Money::from_major(1183) + Money::from_minor(33333333, 8));
    }

    #[test]
    fn test_zero_months_rejected() {
        let builder = ReportBuilder::default();
        assert!(builder.monthly_comparison(&[], &[], 0, d(2024, 1, 1)).is_err());
    }

    #[test]
    fn test_comparison_crosses_year_boundary() {
        let builder = ReportBuilder::default();
        let comparison = builder.monthly_comparison(&[], &[], 4, d(2024, 2, 10)).unwrap();
        let starts: Vec<_> = comparison.rows.iter().map(|r| r.month.start).collect();
        assert_eq!(starts, vec![d(2023, 11, 1), d(2023, 12, 1), d(2024, 1, 1), d(2024, 2, 1)]);
    }

    #[test]
    fn test_swing_between_extreme_months_is_an_error() {
        let builder = ReportBuilder::default();
        let huge = Money::from_decimal(Decimal::MAX);
        let transactions = vec![
            Transaction::new(d(2024, 1, 5), huge, EntryKind::Expense),
            Transaction::new(d(2024, 2, 5), huge, EntryKind::Income),
        ];

        let err = builder
            .monthly_comparison(&[], &transactions, 2, d(2024, 2, 10))
            .unwrap_err();
        assert_eq!(err, EngineError::BalanceOverflow { date: d(2024, 2, 1) });
    }
}
