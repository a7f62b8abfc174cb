//! conversion of loosely typed storage rows into validated engine inputs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{EngineError, Result};
use crate::item::RecurringItem;
use crate::types::{EntryKind, Frequency, ItemId, Transaction, TransactionId};

/// recurring row as handed over by storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecurringRow {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub amount: String,
    pub kind: String,
    pub frequency: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// one-time ledger row as handed over by storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransactionRow {
    pub id: TransactionId,
    pub date: String,
    pub amount: String,
    pub kind: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// parse a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp;
/// timestamps are converted to UTC before the date is taken
pub fn parse_calendar_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc).date_naive())
        .map_err(|_| format!("malformed date '{}'", raw))
}

fn parse_magnitude(raw: &str) -> std::result::Result<Money, String> {
    let amount = Money::from_str_exact(raw).map_err(|_| format!("malformed amount '{}'", raw))?;
    if amount.is_negative() {
        return Err(format!("amount {} is negative", amount));
    }
    Ok(amount)
}

impl TryFrom<RawRecurringRow> for RecurringItem {
    type Error = EngineError;

    fn try_from(row: RawRecurringRow) -> Result<Self> {
        let id = row.id;
        let invalid = |reason: String| EngineError::InvalidRecurringItem { id, reason };

        let item = RecurringItem {
            id,
            name: row.name,
            category: row.category.filter(|c| !c.trim().is_empty()),
            amount: parse_magnitude(&row.amount).map_err(invalid)?,
            kind: row.kind.parse::<EntryKind>().map_err(invalid)?,
            frequency: row.frequency.parse::<Frequency>().map_err(invalid)?,
            start_date: parse_calendar_date(&row.start_date).map_err(invalid)?,
            end_date: match row.end_date.as_deref().map(str::trim) {
                None | Some("") => None,
                Some(raw) => Some(parse_calendar_date(raw).map_err(invalid)?),
            },
            is_active: row.is_active,
        };

        item.validate()?;
        Ok(item)
    }
}

impl TryFrom<RawTransactionRow> for Transaction {
    type Error = EngineError;

    fn try_from(row: RawTransactionRow) -> Result<Self> {
        let id = row.id;
        let invalid = |reason: String| EngineError::InvalidTransaction { id, reason };

        Ok(Transaction {
            id,
            date: parse_calendar_date(&row.date).map_err(invalid)?,
            amount: parse_magnitude(&row.amount).map_err(invalid)?,
            kind: row.kind.parse::<EntryKind>().map_err(invalid)?,
            category: row.category.filter(|c| !c.trim().is_empty()),
        })
    }
}

impl From<&RecurringItem> for RawRecurringRow {
    fn from(item: &RecurringItem) -> Self {
        RawRecurringRow {
            id: item.id,
            name: item.name.clone(),
            category: item.category.clone(),
            amount: item.amount.to_string(),
            kind: item.kind.as_str().to_string(),
            frequency: item.frequency.as_str().to_string(),
            start_date: item.start_date.format("%Y-%m-%d").to_string(),
            end_date: item.end_date.map(|d| d.format("%Y-%m-%d").to_string()),
            is_active: item.is_active,
        }
    }
}
