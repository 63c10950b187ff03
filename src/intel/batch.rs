//! Realm-wide batch assessment
//!
//! One report per dominion, computed independently; a bad record aborts
//! only its own report, never the batch. Large realms are assessed in
//! parallel since every estimator is pure and shares nothing mutable.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::race::RaceDefinition;
use crate::core::constants::PARALLEL_THRESHOLD;
use crate::core::error::{IntelError, Result};
use crate::core::estimate::Estimate;
use crate::core::types::DominionCode;
use crate::intel::defend::{safe_op_versus, DefensePlan};
use crate::intel::power::{PowerEstimator, TransportSummary};
use crate::intel::send::{five_over_four, max_sendable_op, SendAssessment};
use crate::intel::snapshot::DominionIntel;
use crate::intel::spywiz::{self, SpyWizEstimate};

/// What a batch run should evaluate beyond the always-on estimates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RealmQuery {
    /// Attacker offense to defend against; None skips the defense solve.
    pub enemy_op: Option<f64>,
    /// In-game day, for dock protection of boats.
    pub current_day: u32,
}

/// Everything the estimators can say about one dominion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominionReport {
    pub code: DominionCode,
    pub race: String,
    pub total_offense: Estimate<i64>,
    pub total_defense: Estimate<i64>,
    pub send: SendAssessment,
    pub max_sendable_op: Estimate<i64>,
    /// Present only when the query named an enemy offense.
    pub defense: Option<DefensePlan>,
    pub spywiz: SpyWizEstimate,
    pub reconstructed_networth: Estimate<f64>,
    pub transport: TransportSummary,
}

/// Assess a single dominion against the race catalog.
pub fn assess_dominion(
    races: &HashMap<String, RaceDefinition>,
    intel: &DominionIntel,
    query: &RealmQuery,
) -> Result<DominionReport> {
    intel.validate()?;
    let race = races.get(&intel.race).ok_or_else(|| IntelError::UnknownRace {
        code: intel.code,
        race: intel.race.clone(),
    })?;
    let estimator = PowerEstimator::new(race, intel);

    let defense = match query.enemy_op {
        Some(op) => Some(safe_op_versus(&estimator, op)?),
        None => None,
    };

    Ok(DominionReport {
        code: intel.code,
        race: intel.race.clone(),
        total_offense: estimator.total_offense()?,
        total_defense: estimator.total_defense()?,
        send: five_over_four(&estimator)?,
        max_sendable_op: max_sendable_op(&estimator)?,
        defense,
        spywiz: spywiz::estimate(&estimator)?,
        reconstructed_networth: spywiz::reconstructed_networth(&estimator)?,
        transport: estimator.transport_summary(query.current_day),
    })
}

/// Assess every dominion in a realm, in input order. Failures are reported
/// in place so one malformed record cannot hide the rest of the realm.
pub fn assess_realm(
    races: &HashMap<String, RaceDefinition>,
    dominions: &[DominionIntel],
    query: &RealmQuery,
) -> Vec<Result<DominionReport>> {
    let assess = |intel: &DominionIntel| {
        let report = assess_dominion(races, intel, query);
        if let Err(err) = &report {
            tracing::warn!(code = %intel.code, %err, "dominion assessment failed");
        }
        report
    };

    if dominions.len() >= PARALLEL_THRESHOLD {
        tracing::debug!(count = dominions.len(), "assessing realm in parallel");
        dominions.par_iter().map(assess).collect()
    } else {
        dominions.iter().map(assess).collect()
    }
}
