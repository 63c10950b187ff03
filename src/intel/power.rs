//! Unit counting under uncertainty and offense/defense power estimation
//!
//! `offense_power` / `defense_power` are the sole primitives the solvers
//! build on; every higher-level algorithm is expressed as repeated,
//! possibly-partial calls to them.

use serde::{Deserialize, Serialize};

use crate::catalog::race::RaceDefinition;
use crate::catalog::unit::UnitDefinition;
use crate::core::constants::{
    BARRACKS_UNCERTAINTY, DOCKS_PROTECTION_BASE, DOCKS_PROTECTION_PER_DAY, DRAFTEE_DEFENSE,
    UNITS_PER_BOAT,
};
use crate::core::error::{IntelError, Result};
use crate::core::estimate::Estimate;
use crate::core::types::UnitSlot;
use crate::intel::bonus::BonusProfile;
use crate::intel::snapshot::{DominionIntel, HomeCount, MilitarySnapshot};

/// Boat transport picture for units that cannot march themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransportSummary {
    pub boats: Estimate<f64>,
    pub protected_boats: f64,
    pub sendable_units: Estimate<i64>,
    pub capacity: Estimate<i64>,
}

/// Computes unit counts and power values for one dominion against one
/// immutable snapshot. Construction is cheap; all methods are pure.
pub struct PowerEstimator<'a> {
    race: &'a RaceDefinition,
    intel: &'a DominionIntel,
    bonus: BonusProfile,
}

impl<'a> PowerEstimator<'a> {
    pub fn new(race: &'a RaceDefinition, intel: &'a DominionIntel) -> Self {
        let bonus = BonusProfile::compute(race, &intel.bonuses);
        Self { race, intel, bonus }
    }

    /// Override the computed bonus profile, for callers that already
    /// resolved it (and for baseline comparisons).
    pub fn with_bonus(race: &'a RaceDefinition, intel: &'a DominionIntel, bonus: BonusProfile) -> Self {
        Self { race, intel, bonus }
    }

    pub fn race(&self) -> &RaceDefinition {
        self.race
    }

    pub fn bonus(&self) -> BonusProfile {
        self.bonus
    }

    pub fn intel(&self) -> &DominionIntel {
        self.intel
    }

    pub fn draftees(&self) -> Estimate<i64> {
        match self.military() {
            Some(snapshot) => snapshot.draftees,
            None => Estimate::Unknown,
        }
    }

    fn military(&self) -> Option<&MilitarySnapshot> {
        self.intel.military.as_ref()
    }

    /// Estimated count of a unit at home (plus pipelines).
    ///
    /// Exact intelligence is taken as-is; scouted counts are discounted by
    /// the uncertainty factor exactly once, truncated, and extended with
    /// units returning from deployment. Training units are added only when
    /// `include_pending` is set.
    pub fn amount(&self, slot: UnitSlot, include_pending: bool) -> Estimate<i64> {
        let Some(snapshot) = self.military() else {
            return Estimate::Unknown;
        };
        let Some(intel) = snapshot.slot(slot) else {
            return Estimate::Unknown;
        };

        let mut total = match intel.home {
            HomeCount::Exact(n) => n,
            HomeCount::Estimated(n) => {
                (n as f64 * BARRACKS_UNCERTAINTY).trunc() as i64 + intel.returning_total()
            }
        };
        if include_pending {
            total += intel.training_total();
        }
        Estimate::Known(total)
    }

    /// Offense contributed by one slot, optionally for a partial stack.
    ///
    /// `partial` must satisfy `0 <= partial <= amount(slot)`; anything else
    /// is rejected at this boundary.
    pub fn offense_power(
        &self,
        slot: UnitSlot,
        with_bonus: bool,
        partial: Option<i64>,
    ) -> Result<Estimate<f64>> {
        let unit = self.race.unit(slot)?;
        let base = self.base_amount(slot, partial)?;

        let mut power = base.map(|a| a as f64 * unit.offense);
        if let Some((paired_slot, bonus, per)) = unit.offense_pairing() {
            power = power + self.pairing_contribution(base, paired_slot, bonus, per);
        }
        if with_bonus {
            power = power.map(|p| p * (1.0 + self.bonus.offense));
        }
        Ok(power)
    }

    /// Defense counterpart of [`offense_power`](Self::offense_power).
    pub fn defense_power(
        &self,
        slot: UnitSlot,
        with_bonus: bool,
        partial: Option<i64>,
    ) -> Result<Estimate<f64>> {
        let unit = self.race.unit(slot)?;
        let base = self.base_amount(slot, partial)?;

        let mut power = base.map(|a| a as f64 * unit.defense);
        if let Some((paired_slot, bonus, per)) = unit.defense_pairing() {
            power = power + self.pairing_contribution(base, paired_slot, bonus, per);
        }
        if with_bonus {
            power = power.map(|p| p * (1.0 + self.bonus.defense));
        }
        Ok(power)
    }

    /// Aggregate OP over all slots, bonus applied once, rounded.
    pub fn total_offense(&self) -> Result<Estimate<i64>> {
        let mut total = Estimate::Known(0.0);
        for unit in self.race.units() {
            total = total + self.offense_power(unit.slot, false, None)?;
        }
        Ok(total.map(|op| (op * (1.0 + self.bonus.offense)).round() as i64))
    }

    /// Aggregate DP over all slots plus draftees, bonus applied once, rounded.
    pub fn total_defense(&self) -> Result<Estimate<i64>> {
        let mut total = Estimate::Known(0.0);
        for unit in self.race.units() {
            total = total + self.defense_power(unit.slot, false, None)?;
        }
        total = total + self.draftees().map(|d| d as f64 * DRAFTEE_DEFENSE);
        Ok(total.map(|dp| (dp * (1.0 + self.bonus.defense)).round() as i64))
    }

    /// Boats, dock-protected boats, boat-bound unit count, and total boat
    /// capacity for the given in-game day.
    pub fn transport_summary(&self, current_day: u32) -> TransportSummary {
        let protected_boats = self.intel.docks
            * (DOCKS_PROTECTION_BASE + current_day as f64 * DOCKS_PROTECTION_PER_DAY);
        let units_per_boat = UNITS_PER_BOAT + self.race.boat_capacity_bonus();

        let sendable_units: Estimate<i64> = self
            .race
            .sendable_units()
            .map(|u| self.amount(u.slot, true))
            .sum();

        TransportSummary {
            boats: self.intel.boats,
            protected_boats,
            sendable_units,
            capacity: self.intel.boats.map(|b| (b * units_per_boat).trunc() as i64),
        }
    }

    fn base_amount(&self, slot: UnitSlot, partial: Option<i64>) -> Result<Estimate<i64>> {
        let amount = self.amount(slot, true);
        match partial {
            None => Ok(amount),
            Some(p) => {
                if p < 0 {
                    return Err(IntelError::NegativeCount { slot, count: p });
                }
                match amount {
                    Estimate::Known(a) if p > a => {
                        Err(IntelError::PartialOutOfRange {
                            slot,
                            partial: p,
                            amount: a,
                        })
                    }
                    Estimate::Known(_) => Ok(Estimate::Known(p)),
                    Estimate::Unknown => Ok(Estimate::Unknown),
                }
            }
        }
    }

    fn pairing_contribution(
        &self,
        base: Estimate<i64>,
        paired_slot: UnitSlot,
        bonus: f64,
        per: i64,
    ) -> Estimate<f64> {
        let paired = self.amount(paired_slot, true);
        paired.zip_with(base, |pa, a| ((pa / per).min(a)) as f64 * bonus)
    }
}

/// Sum one power primitive over a unit view, stopping Unknown-propagation
/// bookkeeping in one place for the solvers.
pub(crate) fn summed_power<'a, I, F>(units: I, mut per_unit: F) -> Result<Estimate<f64>>
where
    I: Iterator<Item = &'a UnitDefinition>,
    F: FnMut(&UnitDefinition) -> Result<Estimate<f64>>,
{
    let mut total = Estimate::Known(0.0);
    for unit in units {
        total = total + per_unit(unit)?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::race::{RaceDefinition, RacePerk};
    use crate::catalog::unit::{SpyWizRatios, UnitPerk, UnitRole};
    use crate::core::estimate::Estimate;
    use crate::core::types::DominionCode;
    use crate::intel::snapshot::{BonusInputs, SlotIntel};

    fn unit(slot: u8, offense: f64, defense: f64, role: UnitRole) -> UnitDefinition {
        UnitDefinition {
            slot: UnitSlot(slot),
            name: format!("Unit {}", slot),
            offense,
            defense,
            networth: 5.0,
            perks: vec![],
            need_boat: true,
            role,
            ratios: SpyWizRatios::default(),
        }
    }

    fn intel_with_slots(slots: Vec<(u8, SlotIntel)>) -> DominionIntel {
        let mut snapshot = MilitarySnapshot::new(0);
        for (slot, si) in slots {
            snapshot.slots.insert(UnitSlot(slot), si);
        }
        snapshot.draftees = Estimate::Known(0);
        DominionIntel {
            code: DominionCode(1),
            race: "Test".to_string(),
            land: 1000,
            networth: Estimate::Known(100_000.0),
            buildings_total: 900,
            boats: Estimate::Known(50.0),
            docks: 20.0,
            military: Some(snapshot),
            bonuses: BonusInputs::default(),
        }
    }

    #[test]
    fn test_two_pure_offense_stacks_sum_to_900() {
        // 100 x 5 + 50 x 8 = 900, zero offense bonus
        let race = RaceDefinition::new(
            "Test".to_string(),
            vec![
                unit(1, 5.0, 0.0, UnitRole::Offense),
                unit(2, 8.0, 0.0, UnitRole::Offense),
            ],
            vec![],
        )
        .unwrap();
        let intel = intel_with_slots(vec![(1, SlotIntel::exact(100)), (2, SlotIntel::exact(50))]);
        let estimator = PowerEstimator::new(&race, &intel);

        assert_eq!(estimator.total_offense().unwrap(), Estimate::Known(900));
    }

    #[test]
    fn test_estimated_count_is_discounted_once_and_truncated() {
        let race = RaceDefinition::new(
            "Test".to_string(),
            vec![unit(1, 5.0, 0.0, UnitRole::Offense)],
            vec![],
        )
        .unwrap();
        let mut si = SlotIntel::estimated(101);
        si.returning.insert(4, 10);
        si.training.insert(8, 7);
        let intel = intel_with_slots(vec![(1, si)]);
        let estimator = PowerEstimator::new(&race, &intel);

        // trunc(101 * 0.85) = 85, + 10 returning
        assert_eq!(estimator.amount(UnitSlot(1), false), Estimate::Known(95));
        // + 7 in training
        assert_eq!(estimator.amount(UnitSlot(1), true), Estimate::Known(102));
    }

    #[test]
    fn test_exact_count_ignores_uncertainty() {
        let race = RaceDefinition::new(
            "Test".to_string(),
            vec![unit(1, 5.0, 0.0, UnitRole::Offense)],
            vec![],
        )
        .unwrap();
        let mut si = SlotIntel::exact(200);
        si.training.insert(2, 25);
        let intel = intel_with_slots(vec![(1, si)]);
        let estimator = PowerEstimator::new(&race, &intel);

        assert_eq!(estimator.amount(UnitSlot(1), false), Estimate::Known(200));
        assert_eq!(estimator.amount(UnitSlot(1), true), Estimate::Known(225));
    }

    #[test]
    fn test_pairing_perk_caps_at_own_amount() {
        let handler = unit(4, 5.0, 3.0, UnitRole::Hybrid);
        let mut underling = unit(3, 2.0, 2.0, UnitRole::Hybrid);
        underling.perks.push(UnitPerk::OffenseFromPairing {
            slot: UnitSlot(4),
            bonus: 2.0,
            per: 2,
        });
        let race = RaceDefinition::new(
            "Kobold".to_string(),
            vec![underling, handler],
            vec![],
        )
        .unwrap();
        let intel = intel_with_slots(vec![
            (3, SlotIntel::exact(100)),
            (4, SlotIntel::exact(500)),
        ]);
        let estimator = PowerEstimator::with_bonus(&race, &intel, BonusProfile::none());

        // floor(500/2) = 250 pairable, capped at 100 underlings:
        // 100*2 base + 100*2 pairing = 400
        assert_eq!(
            estimator
                .offense_power(UnitSlot(3), false, None)
                .unwrap(),
            Estimate::Known(400.0)
        );

        // Partial stack of 40: 40*2 + min(250, 40)*2 = 160
        assert_eq!(
            estimator
                .offense_power(UnitSlot(3), false, Some(40))
                .unwrap(),
            Estimate::Known(160.0)
        );
    }

    #[test]
    fn test_partial_out_of_range_rejected() {
        let race = RaceDefinition::new(
            "Test".to_string(),
            vec![unit(1, 5.0, 0.0, UnitRole::Offense)],
            vec![],
        )
        .unwrap();
        let intel = intel_with_slots(vec![(1, SlotIntel::exact(10))]);
        let estimator = PowerEstimator::new(&race, &intel);

        assert!(matches!(
            estimator.offense_power(UnitSlot(1), false, Some(11)),
            Err(IntelError::PartialOutOfRange { .. })
        ));
        assert!(matches!(
            estimator.offense_power(UnitSlot(1), false, Some(-1)),
            Err(IntelError::NegativeCount { .. })
        ));
    }

    #[test]
    fn test_unscouted_dominion_is_unknown_everywhere() {
        let race = RaceDefinition::new(
            "Test".to_string(),
            vec![
                unit(1, 5.0, 0.0, UnitRole::Offense),
                unit(2, 0.0, 6.0, UnitRole::Defense),
            ],
            vec![],
        )
        .unwrap();
        let mut intel = intel_with_slots(vec![]);
        intel.military = None;
        let estimator = PowerEstimator::new(&race, &intel);

        assert_eq!(estimator.amount(UnitSlot(1), true), Estimate::Unknown);
        assert_eq!(estimator.total_offense().unwrap(), Estimate::Unknown);
        assert_eq!(estimator.total_defense().unwrap(), Estimate::Unknown);
    }

    #[test]
    fn test_total_defense_includes_draftees_and_bonus() {
        let race = RaceDefinition::new(
            "Test".to_string(),
            vec![unit(2, 0.0, 6.0, UnitRole::Defense)],
            vec![],
        )
        .unwrap();
        let mut intel = intel_with_slots(vec![(2, SlotIntel::exact(100))]);
        if let Some(m) = intel.military.as_mut() {
            m.draftees = Estimate::Known(50);
        }
        let estimator =
            PowerEstimator::with_bonus(&race, &intel, BonusProfile { offense: 0.0, defense: 0.1 });

        // (600 + 50) * 1.1 = 715
        assert_eq!(estimator.total_defense().unwrap(), Estimate::Known(715));
    }

    #[test]
    fn test_transport_summary() {
        let race = RaceDefinition::new(
            "Test".to_string(),
            vec![unit(1, 5.0, 0.0, UnitRole::Offense)],
            vec![RacePerk::BoatCapacity(5.0)],
        )
        .unwrap();
        let intel = intel_with_slots(vec![(1, SlotIntel::exact(600))]);
        let estimator = PowerEstimator::new(&race, &intel);

        let summary = estimator.transport_summary(10);
        // 20 docks * (2.25 + 10*0.05) = 55
        assert!((summary.protected_boats - 55.0).abs() < 1e-9);
        assert_eq!(summary.sendable_units, Estimate::Known(600));
        // 50 boats * (30 + 5) = 1750
        assert_eq!(summary.capacity, Estimate::Known(1750));
    }
}
