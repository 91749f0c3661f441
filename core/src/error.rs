use crate::types::{ProducerKind, UpgradeKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an action was turned down.
///
/// Every variant is an expected, recoverable condition. A rejected
/// action leaves the economy state exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    #[error("Insufficient funds: need {needed:.2}, have {available:.2}")]
    InsufficientFunds { needed: f64, available: f64 },

    #[error("Producer '{kind}' is not part of this economy")]
    UnknownProducer { kind: ProducerKind },

    #[error("Upgrade '{kind}' is not part of this economy")]
    UnknownUpgrade { kind: UpgradeKind },

    #[error("Upgrade '{kind}' already purchased")]
    AlreadyPurchased { kind: UpgradeKind },

    #[error("Upgrade '{kind}' is locked: {hint}")]
    Locked { kind: UpgradeKind, hint: String },

    #[error("Invalid idle duration: {seconds}s")]
    InvalidDuration { seconds: f64 },
}

#[derive(Error, Debug)]
pub enum EconError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("Corrupt save record: {reason}")]
    CorruptRecord { reason: String },

    #[error("Invalid economy config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Save slot {id} not found")]
    SlotNotFound { id: i64 },

    #[error("Command queue closed")]
    QueueClosed,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EconError {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        Self::CorruptRecord { reason: reason.into() }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig { reason: reason.into() }
    }
}

pub type EconResult<T> = Result<T, EconError>;
