//! Events the engine emits for presentation layers.
//!
//! RULE: The engine never renders anything. It reports what happened
//! and the caller decides how to show it.

use crate::{
    error::Rejection,
    state::UpgradeEffect,
    types::{AchievementId, ProducerKind, UpgradeKind},
};
use serde::{Deserialize, Serialize};

/// Variants are added at the end — never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EconomyEvent {
    /// A manual brew credited `amount` cups.
    Gain {
        amount: f64,
    },
    IdleAccrued {
        seconds: f64,
        amount: f64,
    },
    ProducerPurchased {
        kind: ProducerKind,
        cost: f64,
        owned: u64,
    },
    UpgradePurchased {
        kind: UpgradeKind,
        cost: f64,
        effect: UpgradeEffect,
    },
    /// A purchase or idle advance was turned down; nothing changed.
    Rejected {
        reason: Rejection,
    },
    AchievementUnlocked {
        id: AchievementId,
    },
}

impl EconomyEvent {
    /// Stable name of the variant, for logs and tooling.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gain { .. }                => "gain",
            Self::IdleAccrued { .. }         => "idle_accrued",
            Self::ProducerPurchased { .. }   => "producer_purchased",
            Self::UpgradePurchased { .. }    => "upgrade_purchased",
            Self::Rejected { .. }            => "rejected",
            Self::AchievementUnlocked { .. } => "achievement_unlocked",
        }
    }
}
