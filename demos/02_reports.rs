/// reports - totals, net worth, budgets and a cash-flow timeline
use recurrence_engine::chrono::NaiveDate;
use recurrence_engine::{
    resolve_window, Budget, EntryKind, Frequency, InMemoryLedger, ItemErrorPolicy, Ledger, Money, PeriodToken,
    RecurringItem, ReportBuilder, Transaction,
};

fn date(y: i32, m: u32, d: u32) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| "bad date".into())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut source = InMemoryLedger::new();
    source.push_item(
        &RecurringItem::builder()
            .name("Salary")
            .amount(Money::from_major(3200))
            .income()
            .frequency(Frequency::Monthly)
            .start_date(date(2024, 1, 25)?)
            .build()?,
    );
    source.push_item(
        &RecurringItem::builder()
            .name("Rent")
            .category("Housing")
            .amount(Money::from_major(1400))
            .expense()
            .frequency(Frequency::Monthly)
            .start_date(date(2024, 1, 1)?)
            .build()?,
    );
    source.push_item(
        &RecurringItem::builder()
            .name("Music")
            .category("Fun")
            .amount(Money::from_minor(1099, 2))
            .expense()
            .frequency(Frequency::Monthly)
            .start_date(date(2024, 2, 14)?)
            .build()?,
    );
    source.push_ledger_entry(
        &Transaction::new(date(2024, 3, 8)?, Money::from_major(60), EntryKind::Expense).with_category("Fun"),
    );

    let ledger = Ledger::load(&source, ItemErrorPolicy::Skip)?;
    let reports = ReportBuilder::default();
    let today = date(2024, 3, 20)?;

    let month = reports.period_totals(PeriodToken::Month, &ledger.items, &ledger.transactions, today)?;
    println!("march net: {}", month.net);

    let worth = reports.net_worth_as_of(Money::from_major(1000), &ledger.items, &ledger.transactions, today)?;
    println!("net worth on {}: {}", today, worth.balance);

    let comparison = reports.monthly_comparison(&ledger.items, &ledger.transactions, 3, today)?;
    for row in &comparison.rows {
        println!("{}: net {} change {:?}", row.month.start.format("%Y-%m"), row.net, row.change);
    }

    let fun = Budget::new("Fun", Money::from_major(50), PeriodToken::Month)?;
    let usage = reports.budget_usage(&fun, &ledger.items, &ledger.transactions, today)?;
    println!("fun budget: {} of {} (over: {})", usage.total, fun.limit, usage.over_budget);

    let quarter = resolve_window(PeriodToken::Quarter, today);
    let timeline = reports.cash_flow_timeline(Money::from_major(1000), &ledger.items, &ledger.transactions, &quarter)?;
    for entry in &timeline.entries {
        println!("{} {:>10} {:>10}  {}", entry.date, entry.amount, entry.balance, entry.label);
    }
    println!("low point: {}", timeline.low_point());

    Ok(())
}
