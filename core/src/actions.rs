//! The four mutating operations on an economy.
//!
//! RULE: Each operation validates everything first, then commits.
//! A rejection returns before the first write, so state is either
//! fully updated or untouched.

use crate::{
    condition::is_unlocked,
    error::Rejection,
    formula::{purchase_cost, total_production_rate},
    state::{EconomyState, UpgradeEffect},
    types::{ProducerKind, UpgradeKind},
};

/// Manual brew. Returns the gain, which is the current click power.
pub(crate) fn brew(state: &mut EconomyState) -> f64 {
    let gain = state.click_power;
    state.credit(gain);
    state.total_clicks += 1;
    log::debug!("brew: gain={gain:.2} clicks={}", state.total_clicks);
    gain
}

/// Buy one unit of a producer. Returns the price paid.
pub(crate) fn buy_producer(state: &mut EconomyState, kind: ProducerKind) -> Result<f64, Rejection> {
    let available = state.spendable_balance;
    let producer = state
        .producers
        .get_mut(&kind)
        .ok_or(Rejection::UnknownProducer { kind })?;

    // Priced once, at the pre-purchase quantity.
    let cost = purchase_cost(producer);
    if available < cost {
        return Err(Rejection::InsufficientFunds { needed: cost, available });
    }

    producer.owned += 1;
    let owned = producer.owned;
    state.debit(cost);
    log::debug!("buy_producer: {kind} cost={cost:.2} owned={owned}");
    Ok(cost)
}

/// Buy a one-shot upgrade and apply its multiplier. Returns the price paid.
///
/// Checks run in a fixed order: unknown, already purchased, locked,
/// then affordability.
pub(crate) fn buy_upgrade(state: &mut EconomyState, kind: UpgradeKind) -> Result<(f64, UpgradeEffect), Rejection> {
    let upgrade = state
        .upgrades
        .get(&kind)
        .ok_or(Rejection::UnknownUpgrade { kind })?;

    if upgrade.purchased {
        return Err(Rejection::AlreadyPurchased { kind });
    }
    if !is_unlocked(state, upgrade) {
        let hint = upgrade.unlock.hint(state).unwrap_or_default();
        return Err(Rejection::Locked { kind, hint });
    }
    let cost = upgrade.cost;
    if state.spendable_balance < cost {
        return Err(Rejection::InsufficientFunds {
            needed: cost,
            available: state.spendable_balance,
        });
    }

    let effect = upgrade.effect;
    let multiplier = upgrade.multiplier;
    if let UpgradeEffect::Producer { target } = effect {
        // Validated at config load; a missing target is still a rejection, not a panic.
        if !state.producers.contains_key(&target) {
            return Err(Rejection::UnknownProducer { kind: target });
        }
    }

    state.debit(cost);
    match effect {
        UpgradeEffect::Click => state.click_power *= multiplier,
        UpgradeEffect::Producer { target } => {
            if let Some(p) = state.producers.get_mut(&target) {
                p.multiplier *= multiplier;
            }
        }
    }
    if let Some(u) = state.upgrades.get_mut(&kind) {
        u.purchased = true;
    }
    state.total_upgrades_purchased += 1;
    log::debug!("buy_upgrade: {kind} cost={cost:.2} effect={effect:?} x{multiplier}");
    Ok((cost, effect))
}

/// Accrue passive production for `elapsed_seconds` of measured time.
/// Returns the cups gained.
pub(crate) fn idle_advance(state: &mut EconomyState, elapsed_seconds: f64) -> Result<f64, Rejection> {
    if !elapsed_seconds.is_finite() || elapsed_seconds < 0.0 {
        return Err(Rejection::InvalidDuration { seconds: elapsed_seconds });
    }
    if elapsed_seconds == 0.0 {
        return Ok(0.0);
    }

    let rate = total_production_rate(state.producers.values());
    let gained = rate * elapsed_seconds;
    // A gain that overflows either total would leave a state no save can hold.
    let overflows = !gained.is_finite()
        || !(state.lifetime_produced + gained).is_finite()
        || !(state.spendable_balance + gained).is_finite();
    if overflows {
        return Err(Rejection::InvalidDuration { seconds: elapsed_seconds });
    }
    state.credit(gained);
    log::trace!("idle_advance: dt={elapsed_seconds:.3}s rate={rate:.2} gained={gained:.3}");
    Ok(gained)
}
