//! Safe-send solver: how much offense can leave home
//!
//! The 5-over-4 rule: after allocation, dispatched offense may not exceed
//! 1.25x the defense still guaranteed at home. Home defense is seeded from
//! the units that never deploy (pure-defense stacks and draftees); each
//! hybrid stack committed to the send debits its defense from that pool.

use serde::{Deserialize, Serialize};

use crate::core::constants::{COARSE_SCAN_STRIDE, DRAFTEE_DEFENSE, SAFE_SEND_RATIO};
use crate::core::error::Result;
use crate::core::estimate::Estimate;
use crate::core::types::UnitSlot;
use crate::intel::power::{summed_power, PowerEstimator};

/// Outcome of the 5-over-4 solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendAssessment {
    /// Total offense that can be dispatched, truncated.
    pub sendable_op: Estimate<i64>,
    /// Home defense remaining after the send, truncated.
    pub remaining_dp: Estimate<i64>,
    /// Hybrid counts committed to the send, in processing order.
    pub committed: Vec<(UnitSlot, i64)>,
}

impl SendAssessment {
    fn unknown() -> Self {
        Self {
            sendable_op: Estimate::Unknown,
            remaining_dp: Estimate::Unknown,
            committed: Vec::new(),
        }
    }
}

/// Maximum offense dispatchable under the 5-over-4 rule.
///
/// Hybrids are processed most-defensive-first; once a stack must be split
/// the boundary count is located by a coarse forward scan then a fine
/// linear scan, and no further hybrid type contributes.
pub fn five_over_four(estimator: &PowerEstimator) -> Result<SendAssessment> {
    let race = estimator.race();

    let pure_offense = summed_power(race.pure_offense_units(), |u| {
        estimator.offense_power(u.slot, true, None)
    })?;
    let Some(mut sendable) = pure_offense.known() else {
        return Ok(SendAssessment::unknown());
    };

    let Some(mut remaining) = home_baseline(estimator)?.known() else {
        return Ok(SendAssessment::unknown());
    };

    let mut committed = Vec::new();
    for unit in race.hybrids_by_defense() {
        let slot = unit.slot;
        let amount = estimator.amount(slot, true);
        let full_op = estimator.offense_power(slot, true, None)?;
        let full_dp = estimator.defense_power(slot, true, None)?;
        let (Estimate::Known(amount), Estimate::Known(full_op), Estimate::Known(full_dp)) =
            (amount, full_op, full_dp)
        else {
            return Ok(SendAssessment::unknown());
        };

        let candidate_op = sendable + full_op;
        let candidate_dp = remaining - full_dp;
        if candidate_op <= SAFE_SEND_RATIO * candidate_dp {
            if amount > 0 {
                tracing::debug!(slot = %slot, amount, "full hybrid stack sendable");
                committed.push((slot, amount));
            }
            sendable = candidate_op;
            remaining = candidate_dp;
            continue;
        }

        // Only part of this stack can go; later (less defensive) hybrid
        // types no longer contribute.
        let Some(k) = boundary_count(estimator, slot, amount, sendable, remaining)? else {
            return Ok(SendAssessment::unknown());
        };
        tracing::debug!(slot = %slot, boundary = k, "hybrid stack split");
        if k > 0 {
            let op = estimator.offense_power(slot, true, Some(k))?;
            let dp = estimator.defense_power(slot, true, Some(k))?;
            let (Estimate::Known(op), Estimate::Known(dp)) = (op, dp) else {
                return Ok(SendAssessment::unknown());
            };
            sendable += op;
            remaining -= dp;
            committed.push((slot, k));
        }
        break;
    }

    Ok(SendAssessment {
        sendable_op: Estimate::Known(sendable.trunc() as i64),
        remaining_dp: Estimate::Known(remaining.trunc() as i64),
        committed,
    })
}

/// Largest k in [0, amount] such that sending k of the stack keeps the
/// send within the safety ratio. Coarse scan brackets the crossover,
/// a linear scan pins it down.
fn boundary_count(
    estimator: &PowerEstimator,
    slot: UnitSlot,
    amount: i64,
    sendable: f64,
    remaining: f64,
) -> Result<Option<i64>> {
    let mut low = 0;
    let mut probe = 1;
    while probe <= amount {
        match crosses(estimator, slot, probe, sendable, remaining)? {
            None => return Ok(None),
            Some(true) => break,
            Some(false) => low = probe,
        }
        probe += COARSE_SCAN_STRIDE;
    }

    let mut boundary = low;
    for k in (low + 1)..=amount {
        match crosses(estimator, slot, k, sendable, remaining)? {
            None => return Ok(None),
            Some(true) => break,
            Some(false) => boundary = k,
        }
    }
    Ok(Some(boundary))
}

fn crosses(
    estimator: &PowerEstimator,
    slot: UnitSlot,
    k: i64,
    sendable: f64,
    remaining: f64,
) -> Result<Option<bool>> {
    let op = estimator.offense_power(slot, true, Some(k))?;
    let dp = estimator.defense_power(slot, true, Some(k))?;
    Ok(op
        .zip_with(dp, |o, d| sendable + o > SAFE_SEND_RATIO * (remaining - d))
        .known())
}

/// Home defense that can never be dispatched: pure-defense stacks plus
/// draftees, with the defense bonus applied.
pub(crate) fn home_baseline(estimator: &PowerEstimator) -> Result<Estimate<f64>> {
    let pure = summed_power(estimator.race().pure_defense_units(), |u| {
        estimator.defense_power(u.slot, true, None)
    })?;
    let draftees = estimator
        .draftees()
        .map(|d| d as f64 * DRAFTEE_DEFENSE * (1.0 + estimator.bonus().defense));
    Ok(pure + draftees)
}

/// Conservative sendable OP counting only the units that clearly lean
/// offense (pure-offense stacks and offense-leaning hybrids). Races with
/// no valid offense/defense split fall through to the 5/4 result.
pub fn safe_op(estimator: &PowerEstimator) -> Result<Estimate<i64>> {
    if !has_valid_split(estimator) {
        return Ok(five_over_four(estimator)?.sendable_op);
    }
    let race = estimator.race();
    let offensive = race
        .pure_offense_units()
        .chain(race.hybrids_by_defense().filter(|u| u.offense > u.defense));
    let total = summed_power(offensive, |u| estimator.offense_power(u.slot, true, None))?;
    Ok(total.map(|op| op.round() as i64))
}

/// Defensive counterpart of [`safe_op`]: DP of the units that stay home
/// under the conservative split.
pub fn safe_dp(estimator: &PowerEstimator) -> Result<Estimate<i64>> {
    if !has_valid_split(estimator) {
        return Ok(five_over_four(estimator)?.remaining_dp);
    }
    let race = estimator.race();
    let defensive = race
        .pure_defense_units()
        .chain(race.hybrids_by_defense().filter(|u| u.defense > u.offense));
    let total = summed_power(defensive, |u| estimator.defense_power(u.slot, true, None))?;
    Ok(total.map(|dp| dp.round() as i64))
}

/// The dispatch ceiling actually quoted to callers: the stricter of the
/// conservative split and the 5/4 solve.
pub fn max_sendable_op(estimator: &PowerEstimator) -> Result<Estimate<i64>> {
    let conservative = safe_op(estimator)?;
    let solved = five_over_four(estimator)?.sendable_op;
    Ok(conservative.zip_with(solved, i64::min))
}

/// A race splits cleanly when every hybrid leans one way. Evenly-statted
/// hybrids (the Troll pattern) make the positional split meaningless.
fn has_valid_split(estimator: &PowerEstimator) -> bool {
    estimator
        .race()
        .hybrids_by_defense()
        .all(|u| u.offense != u.defense)
}
