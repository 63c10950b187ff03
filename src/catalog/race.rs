//! Race definitions with eagerly computed unit views
//!
//! The derived views (pure offense, pure defense, hybrids by defense) are
//! computed once at construction. The hybrid ordering is descending by
//! defense value: both solvers rely on processing the most defensive
//! hybrids first.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::unit::{UnitDefinition, UnitRole};
use crate::core::error::{IntelError, Result};
use crate::core::types::UnitSlot;

/// Race-level flat bonus, one variant per known perk kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RacePerk {
    /// Flat offense bonus, in percent.
    Offense(f64),
    /// Flat defense bonus, in percent.
    Defense(f64),
    /// Extra units carried per boat.
    BoatCapacity(f64),
}

/// Immutable per-race catalog entry: ordered units plus race perks.
#[derive(Debug, Clone)]
pub struct RaceDefinition {
    name: String,
    units: Vec<UnitDefinition>,
    perks: Vec<RacePerk>,
    pure_offense: Vec<UnitSlot>,
    pure_defense: Vec<UnitSlot>,
    hybrids_by_defense: Vec<UnitSlot>,
    sendable: Vec<UnitSlot>,
}

impl RaceDefinition {
    /// Build and validate a race definition. All catalog inconsistencies
    /// are rejected here, never during computation.
    pub fn new(name: String, mut units: Vec<UnitDefinition>, perks: Vec<RacePerk>) -> Result<Self> {
        units.sort_by_key(|u| u.slot);

        let mut seen = HashSet::new();
        for unit in &units {
            if !seen.insert(unit.slot) {
                return Err(IntelError::DuplicateSlot {
                    race: name,
                    slot: unit.slot,
                });
            }
        }

        for unit in &units {
            for (target, _, per) in unit
                .offense_pairing()
                .into_iter()
                .chain(unit.defense_pairing())
            {
                if !seen.contains(&target) {
                    return Err(IntelError::DanglingPairingSlot {
                        race: name,
                        slot: unit.slot,
                        target,
                    });
                }
                if per <= 0 {
                    return Err(IntelError::InvalidPairingRatio {
                        race: name,
                        slot: unit.slot,
                        per,
                    });
                }
            }
            check_role(&name, unit)?;
        }

        let pure_offense = slots_with_role(&units, UnitRole::Offense);
        let pure_defense = slots_with_role(&units, UnitRole::Defense);

        let mut hybrids: Vec<&UnitDefinition> = units
            .iter()
            .filter(|u| u.role == UnitRole::Hybrid)
            .collect();
        hybrids.sort_by(|a, b| {
            b.defense
                .partial_cmp(&a.defense)
                .unwrap_or(Ordering::Equal)
                .then(a.slot.cmp(&b.slot))
        });
        let hybrids_by_defense = hybrids.iter().map(|u| u.slot).collect();

        let sendable = units
            .iter()
            .filter(|u| u.need_boat)
            .map(|u| u.slot)
            .collect();

        Ok(Self {
            name,
            units,
            perks,
            pure_offense,
            pure_defense,
            hybrids_by_defense,
            sendable,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units(&self) -> &[UnitDefinition] {
        &self.units
    }

    pub fn unit(&self, slot: UnitSlot) -> Result<&UnitDefinition> {
        self.units
            .iter()
            .find(|u| u.slot == slot)
            .ok_or_else(|| IntelError::UnknownSlot {
                race: self.name.clone(),
                slot,
            })
    }

    pub fn pure_offense_units(&self) -> impl Iterator<Item = &UnitDefinition> {
        self.pure_offense.iter().map(|s| &self.units[self.index(*s)])
    }

    pub fn pure_defense_units(&self) -> impl Iterator<Item = &UnitDefinition> {
        self.pure_defense.iter().map(|s| &self.units[self.index(*s)])
    }

    /// Hybrid units, most defensive first.
    pub fn hybrids_by_defense(&self) -> impl Iterator<Item = &UnitDefinition> {
        self.hybrids_by_defense
            .iter()
            .map(|s| &self.units[self.index(*s)])
    }

    /// Units that require boat transport to be dispatched.
    pub fn sendable_units(&self) -> impl Iterator<Item = &UnitDefinition> {
        self.sendable.iter().map(|s| &self.units[self.index(*s)])
    }

    /// A race without both pure-offense and pure-defense units has no
    /// valid pure split; its safe OP/DP must come from the 5/4 solver.
    pub fn has_pure_split(&self) -> bool {
        !self.pure_offense.is_empty() && !self.pure_defense.is_empty()
    }

    pub fn offense_pct(&self) -> f64 {
        self.perks
            .iter()
            .find_map(|p| match p {
                RacePerk::Offense(pct) => Some(*pct),
                _ => None,
            })
            .unwrap_or(0.0)
    }

    pub fn defense_pct(&self) -> f64 {
        self.perks
            .iter()
            .find_map(|p| match p {
                RacePerk::Defense(pct) => Some(*pct),
                _ => None,
            })
            .unwrap_or(0.0)
    }

    pub fn boat_capacity_bonus(&self) -> f64 {
        self.perks
            .iter()
            .find_map(|p| match p {
                RacePerk::BoatCapacity(n) => Some(*n),
                _ => None,
            })
            .unwrap_or(0.0)
    }

    fn index(&self, slot: UnitSlot) -> usize {
        // Slots are validated unique and the view vectors are built from
        // the same unit list, so this lookup cannot fail.
        self.units
            .iter()
            .position(|u| u.slot == slot)
            .unwrap_or(0)
    }
}

fn slots_with_role(units: &[UnitDefinition], role: UnitRole) -> Vec<UnitSlot> {
    units
        .iter()
        .filter(|u| u.role == role)
        .map(|u| u.slot)
        .collect()
}

fn check_role(race: &str, unit: &UnitDefinition) -> Result<()> {
    let mismatch = |reason: &str| IntelError::RoleMismatch {
        race: race.to_string(),
        slot: unit.slot,
        reason: reason.to_string(),
    };
    match unit.role {
        UnitRole::Offense => {
            if unit.defense != 0.0 {
                return Err(mismatch("pure-offense unit has nonzero defense"));
            }
            if unit.offense <= 0.0 && unit.offense_pairing().is_none() {
                return Err(mismatch("pure-offense unit has no offense"));
            }
        }
        UnitRole::Defense => {
            if unit.offense != 0.0 {
                return Err(mismatch("pure-defense unit has nonzero offense"));
            }
            if unit.defense <= 0.0 && unit.defense_pairing().is_none() {
                return Err(mismatch("pure-defense unit has no defense"));
            }
        }
        UnitRole::Hybrid => {
            if unit.offense <= 0.0 || unit.defense <= 0.0 {
                return Err(mismatch("hybrid unit must have both offense and defense"));
            }
        }
        UnitRole::Support => {
            if unit.offense != 0.0 || unit.defense != 0.0 {
                return Err(mismatch("support unit must have no combat values"));
            }
        }
    }
    Ok(())
}
