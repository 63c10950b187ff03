//! Defense allocation against a known incoming attack
//!
//! Given the attacker's offense, determine how many hybrids must stay home
//! to survive and how much offense is still free to counter-attack. Greedy
//! shortfall reduction over hybrids, most defensive first; this is a
//! separately specified algorithm from the 5/4 send solver and no
//! equivalence between their boundaries is assumed.

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::estimate::Estimate;
use crate::core::types::UnitSlot;
use crate::intel::power::{summed_power, PowerEstimator};
use crate::intel::send::home_baseline;

/// Outcome of the defense-requirement solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefensePlan {
    /// Offense still safely dispatchable, truncated.
    pub sendable_op: Estimate<i64>,
    /// Home defense after allocation, rounded.
    pub home_dp: Estimate<i64>,
    /// Hybrid counts held back for defense, in processing order.
    pub held: Vec<(UnitSlot, i64)>,
}

impl DefensePlan {
    fn unknown() -> Self {
        Self {
            sendable_op: Estimate::Unknown,
            home_dp: Estimate::Unknown,
            held: Vec::new(),
        }
    }
}

/// How much offense can be sent while surviving `enemy_op` at home.
pub fn safe_op_versus(estimator: &PowerEstimator, enemy_op: f64) -> Result<DefensePlan> {
    let race = estimator.race();

    let Some(baseline) = home_baseline(estimator)?.known() else {
        return Ok(DefensePlan::unknown());
    };
    let mut op_to_defend = enemy_op - baseline;
    let mut dp_at_home = baseline;

    // Pure offense never defends; it is always free to send.
    let pure_offense = summed_power(race.pure_offense_units(), |u| {
        estimator.offense_power(u.slot, true, None)
    })?;
    let Some(mut sendable) = pure_offense.known() else {
        return Ok(DefensePlan::unknown());
    };

    let mut held = Vec::new();
    for unit in race.hybrids_by_defense() {
        let slot = unit.slot;
        let Estimate::Known(amount) = estimator.amount(slot, true) else {
            return Ok(DefensePlan::unknown());
        };

        let (held_count, dp_held, op_free) = if op_to_defend <= 0.0 {
            // Shortfall already covered; the whole stack may attack.
            let Estimate::Known(op) = estimator.offense_power(slot, true, None)? else {
                return Ok(DefensePlan::unknown());
            };
            (0, 0.0, op)
        } else {
            let dp_per_unit = unit.defense * (1.0 + estimator.bonus().defense);
            let needed = (op_to_defend / dp_per_unit).ceil() as i64;
            if needed < amount {
                let dp = estimator.defense_power(slot, true, Some(needed))?;
                let op = estimator.offense_power(slot, true, Some(amount - needed))?;
                let (Estimate::Known(dp), Estimate::Known(op)) = (dp, op) else {
                    return Ok(DefensePlan::unknown());
                };
                (needed, dp, op)
            } else {
                // The entire stack must stay; carry the residual shortfall.
                let Estimate::Known(dp) = estimator.defense_power(slot, true, None)? else {
                    return Ok(DefensePlan::unknown());
                };
                (amount, dp, 0.0)
            }
        };

        if held_count > 0 {
            tracing::debug!(slot = %slot, held = held_count, "hybrids held for defense");
            held.push((slot, held_count));
        }
        op_to_defend -= dp_held;
        dp_at_home += dp_held;
        sendable += op_free;
    }

    Ok(DefensePlan {
        sendable_op: Estimate::Known(sendable.trunc() as i64),
        home_dp: Estimate::Known(dp_at_home.round() as i64),
        held,
    })
}
