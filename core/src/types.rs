//! Shared primitive types used across the entire economy.
//!
//! RULE: Producer and upgrade kinds form a closed set.
//! Anything that names a kind goes through these enums,
//! never through a free-form string lookup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An achievement identifier, e.g. "First Brew".
pub type AchievementId = String;

/// Every producer kind the engine knows about.
/// Variants are added at the end — never removed or reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProducerKind {
    Barista,
    Machine,
    Shop,
    Farmer,
    Factory,
    Franchise,
}

impl ProducerKind {
    pub const ALL: [ProducerKind; 6] = [
        Self::Barista,
        Self::Machine,
        Self::Shop,
        Self::Farmer,
        Self::Factory,
        Self::Franchise,
    ];

    /// Stable key used in persisted records and config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Barista   => "barista",
            Self::Machine   => "machine",
            Self::Shop      => "shop",
            Self::Farmer    => "farmer",
            Self::Factory   => "factory",
            Self::Franchise => "franchise",
        }
    }
}

impl fmt::Display for ProducerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProducerKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Every upgrade kind the engine knows about.
/// Variants are added at the end — never removed or reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKind {
    StrongerHands,
    TurboBrewing,
    BetterBeans,
    ColdBrew,
    Espresso,
    Branding,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 6] = [
        Self::StrongerHands,
        Self::TurboBrewing,
        Self::BetterBeans,
        Self::ColdBrew,
        Self::Espresso,
        Self::Branding,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrongerHands => "stronger_hands",
            Self::TurboBrewing  => "turbo_brewing",
            Self::BetterBeans   => "better_beans",
            Self::ColdBrew      => "cold_brew",
            Self::Espresso      => "espresso",
            Self::Branding      => "branding",
        }
    }
}

impl fmt::Display for UpgradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpgradeKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// A key that matched no known kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown kind '{0}'")]
pub struct UnknownKind(pub String);
