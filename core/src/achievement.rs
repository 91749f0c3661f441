//! Achievement evaluator.
//!
//! RULE: Achievements are checked top-to-bottom after every action.
//! An id is appended at most once and never removed.

use crate::{condition::UnlockCondition, state::EconomyState, types::AchievementId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementDef {
    pub id: AchievementId,
    #[serde(default)]
    pub description: String,
    pub when: UnlockCondition,
}

impl AchievementDef {
    pub fn new(id: &str, description: &str, when: UnlockCondition) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            when,
        }
    }
}

/// Append every newly satisfied achievement to `state`, in list order.
/// Returns only the ids unlocked by this call.
pub fn evaluate(defs: &[AchievementDef], state: &mut EconomyState) -> Vec<AchievementId> {
    let mut unlocked = Vec::new();
    for def in defs {
        if state.has_achievement(&def.id) || !def.when.holds(state) {
            continue;
        }
        log::info!("achievement: unlocked '{}'", def.id);
        state.achievements.push(def.id.clone());
        unlocked.push(def.id.clone());
    }
    unlocked
}
