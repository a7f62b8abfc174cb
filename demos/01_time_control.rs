/// time control - resolve "this month" from a controllable clock
use recurrence_engine::chrono::{Duration, TimeZone, Utc};
use recurrence_engine::{
    resolve_window_now, Frequency, Money, PeriodToken, RecurrenceEngine, RecurringItem, SafeTimeProvider,
    TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== time control example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    // weekly paycheck starting today
    let paycheck = RecurringItem::builder()
        .name("Paycheck")
        .amount(Money::from_major(900))
        .income()
        .frequency(Frequency::Weekly)
        .build_with_time(&time)?;

    let engine = RecurrenceEngine::default();

    for _ in 0..4 {
        let today = time.now().date_naive();
        let month = resolve_window_now(PeriodToken::Month, &time);
        println!(
            "{}: active={} next={:?} paid this month={}",
            today,
            engine.is_active_on(&paycheck, today),
            engine.next_occurrence_on_or_after(&paycheck, today)?,
            engine.amount_in_window(&paycheck, &month)?,
        );
        controller.advance(Duration::days(45));
    }

    Ok(())
}
