use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{EngineError, Result};
use crate::types::{EntryKind, Frequency, ItemId};

/// recurring income or expense template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringItem {
    pub id: ItemId,
    pub name: String,
    pub category: Option<String>,
    /// magnitude of a single occurrence
    pub amount: Money,
    pub kind: EntryKind,
    pub frequency: Frequency,
    /// first occurrence
    pub start_date: NaiveDate,
    /// last day the item may occur on, inclusive
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
}

impl RecurringItem {
    /// builder for creating recurring items
    pub fn builder() -> RecurringItemBuilder {
        RecurringItemBuilder::new()
    }

    /// check the shape invariants the engine relies on
    pub fn validate(&self) -> Result<()> {
        if self.amount.is_negative() {
            return Err(self.invalid(format!("amount {} is negative", self.amount)));
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(self.invalid(format!(
                    "end date {} is before start date {}",
                    end, self.start_date
                )));
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// whether the item's lifetime has finished before `date`
    pub fn has_ended_before(&self, date: NaiveDate) -> bool {
        matches!(self.end_date, Some(end) if end < date)
    }

    pub(crate) fn invalid(&self, reason: impl Into<String>) -> EngineError {
        EngineError::InvalidRecurringItem {
            id: self.id,
            reason: reason.into(),
        }
    }
}

/// builder for recurring items
pub struct RecurringItemBuilder {
    id: Option<ItemId>,
    name: Option<String>,
    category: Option<String>,
    amount: Option<Money>,
    kind: Option<EntryKind>,
    frequency: Option<Frequency>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    is_active: bool,
}

impl Default for RecurringItemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecurringItemBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            name: None,
            category: None,
            amount: None,
            kind: None,
            frequency: None,
            start_date: None,
            end_date: None,
            is_active: true,
        }
    }

    pub fn id(mut self, id: ItemId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn income(self) -> Self {
        self.kind(EntryKind::Income)
    }

    pub fn expense(self) -> Self {
        self.kind(EntryKind::Expense)
    }

    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Build with system time as the default start date
    pub fn build(self) -> Result<RecurringItem> {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.build_with_time(&time)
    }

    /// Build with explicit time provider, used when no start date was set
    pub fn build_with_time(self, time_provider: &SafeTimeProvider) -> Result<RecurringItem> {
        let id = self.id.unwrap_or_else(Uuid::new_v4);

        let amount = self.amount.ok_or_else(|| EngineError::InvalidRecurringItem {
            id,
            reason: "amount is required".to_string(),
        })?;

        let item = RecurringItem {
            id,
            name: self.name.unwrap_or_default(),
            category: self.category,
            amount,
            kind: self.kind.unwrap_or(EntryKind::Expense),
            frequency: self.frequency.unwrap_or(Frequency::Monthly),
            start_date: self
                .start_date
                .unwrap_or_else(|| time_provider.now().date_naive()),
            end_date: self.end_date,
            is_active: self.is_active,
        };

        item.validate()?;
        Ok(item)
    }
}
