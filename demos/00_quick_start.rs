/// quick start - count a monthly bill inside a reporting period
use recurrence_engine::chrono::NaiveDate;
use recurrence_engine::{resolve_window, Frequency, Money, PeriodToken, RecurrenceEngine, RecurringItem};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 31).ok_or("bad date")?;

    // rent due on the last day of every month
    let rent = RecurringItem::builder()
        .name("Rent")
        .amount(Money::from_major(1200))
        .expense()
        .frequency(Frequency::Monthly)
        .start_date(start)
        .build()?;

    let engine = RecurrenceEngine::default();
    let reference = NaiveDate::from_ymd_opt(2024, 2, 10).ok_or("bad date")?;

    let next = engine.next_occurrence_on_or_after(&rent, reference)?;
    println!("next rent due: {:?}", next);

    let quarter = resolve_window(PeriodToken::Quarter, reference);
    println!(
        "rent in {} .. {}: {} payments, {} total",
        quarter.start,
        quarter.end,
        engine.occurrences_in_window(&rent, &quarter)?,
        engine.amount_in_window(&rent, &quarter)?,
    );

    Ok(())
}
