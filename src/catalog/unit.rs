//! Unit definitions: combat stats, perks, role classification

use serde::{Deserialize, Serialize};

use crate::core::types::UnitSlot;

/// How a unit can be deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitRole {
    /// Contributes offense only; always free to send.
    Offense,
    /// Contributes defense only; never leaves home.
    Defense,
    /// Contributes either way depending on deployment.
    Hybrid,
    /// No combat contribution of its own.
    Support,
}

/// A special ability carried by a unit definition.
///
/// One variant per known perk kind; parameters are strongly typed so a
/// malformed catalog fails at load, not mid-computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UnitPerk {
    /// Extra offense for each `per` units of the paired slot, capped at
    /// this unit's own count.
    OffenseFromPairing { slot: UnitSlot, bonus: f64, per: i64 },
    /// Defensive counterpart of the pairing bonus.
    DefenseFromPairing { slot: UnitSlot, bonus: f64, per: i64 },
}

/// Spy/wizard strength contributed per unit, used for indirect
/// espionage-capacity estimation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpyWizRatios {
    pub spy_offense: f64,
    pub spy_defense: f64,
    pub wiz_offense: f64,
    pub wiz_defense: f64,
}

impl SpyWizRatios {
    pub fn spy_per_unit(&self) -> f64 {
        self.spy_offense.max(self.spy_defense)
    }

    pub fn wiz_per_unit(&self) -> f64 {
        self.wiz_offense.max(self.wiz_defense)
    }
}

/// Immutable definition of one unit type, shared read-only across all
/// computations for a race.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitDefinition {
    pub slot: UnitSlot,
    pub name: String,
    pub offense: f64,
    pub defense: f64,
    pub networth: f64,
    pub perks: Vec<UnitPerk>,
    pub need_boat: bool,
    pub role: UnitRole,
    pub ratios: SpyWizRatios,
}

impl UnitDefinition {
    pub fn offense_pairing(&self) -> Option<(UnitSlot, f64, i64)> {
        self.perks.iter().find_map(|p| match *p {
            UnitPerk::OffenseFromPairing { slot, bonus, per } => Some((slot, bonus, per)),
            _ => None,
        })
    }

    pub fn defense_pairing(&self) -> Option<(UnitSlot, f64, i64)> {
        self.perks.iter().find_map(|p| match *p {
            UnitPerk::DefenseFromPairing { slot, bonus, per } => Some((slot, bonus, per)),
            _ => None,
        })
    }
}
