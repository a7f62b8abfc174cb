use chrono::NaiveDate;
use thiserror::Error;

use uuid::Uuid;

use crate::types::{ItemId, TransactionId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid recurring item {id}: {reason}")]
    InvalidRecurringItem {
        id: ItemId,
        reason: String,
    },

    #[error("occurrence search exhausted for item {id} after {iterations} iterations")]
    OccurrenceSearchExhausted {
        id: ItemId,
        iterations: u32,
    },

    #[error("invalid transaction {id}: {reason}")]
    InvalidTransaction {
        id: TransactionId,
        reason: String,
    },

    #[error("invalid window: start {start} is after end {end}")]
    InvalidWindow {
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("amount overflow while totalling record {id}")]
    AmountOverflow {
        id: Uuid,
    },

    #[error("running balance overflowed on {date}")]
    BalanceOverflow {
        date: NaiveDate,
    },

    #[error("ledger source error: {message}")]
    Source {
        message: String,
    },
}

impl EngineError {
    /// id of the record the error refers to, if any
    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            EngineError::InvalidRecurringItem { id, .. }
            | EngineError::OccurrenceSearchExhausted { id, .. }
            | EngineError::AmountOverflow { id } => Some(*id),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
