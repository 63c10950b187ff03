//! Combat bonus aggregation
//!
//! Every contribution is an additive fraction above baseline 1.0; the
//! combined fraction is applied once, multiplicatively, by the power
//! estimator. Sub-bonuses are never multiplied with each other.

use serde::{Deserialize, Serialize};

use crate::catalog::race::RaceDefinition;
use crate::core::constants::{
    ARES_DEFENSE_BONUS, GRYPHON_NEST_OFFENSE_FACTOR, GUARD_TOWER_DEFENSE_FACTOR,
    PRESTIGE_OFFENSE_DIVISOR,
};
use crate::intel::snapshot::BonusInputs;

/// Aggregated offense/defense multiplier fractions for one dominion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BonusProfile {
    pub offense: f64,
    pub defense: f64,
}

impl BonusProfile {
    pub fn compute(race: &RaceDefinition, inputs: &BonusInputs) -> Self {
        let offense = race.offense_pct() / 100.0
            + inputs.spell_offense_pct / 100.0
            + inputs.tech_offense_pct / 100.0
            + inputs.forges
            + inputs.gryphon_nest_ratio * GRYPHON_NEST_OFFENSE_FACTOR
            + inputs.prestige / PRESTIGE_OFFENSE_DIVISOR;

        // Assume the protective spell is always up.
        let defense = race.defense_pct() / 100.0
            + inputs.spell_defense_pct / 100.0
            + inputs.tech_defense_pct / 100.0
            + inputs.walls
            + inputs.guard_tower_ratio * GUARD_TOWER_DEFENSE_FACTOR
            + ARES_DEFENSE_BONUS;

        Self { offense, defense }
    }

    /// A profile with no bonuses at all, for tests and baseline comparisons.
    pub fn none() -> Self {
        Self {
            offense: 0.0,
            defense: 0.0,
        }
    }
}
