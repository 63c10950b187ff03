//! Point-in-time intelligence snapshots
//!
//! A snapshot is constructed once per query from a single intelligence
//! record and never mutated; every derived value is a pure function of the
//! snapshot plus the race catalog, so results may be cached keyed by
//! snapshot identity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::error::{IntelError, Result};
use crate::core::estimate::Estimate;
use crate::core::types::{DominionCode, Tick, UnitSlot};

/// Home unit count for one slot: exact when clairvoyance-grade intelligence
/// exists, otherwise a raw scouted figure that still needs the uncertainty
/// discount (applied exactly once, at estimation time).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HomeCount {
    Exact(i64),
    Estimated(i64),
}

impl HomeCount {
    pub fn raw(&self) -> i64 {
        match *self {
            HomeCount::Exact(n) | HomeCount::Estimated(n) => n,
        }
    }
}

/// Everything known about one unit slot at capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotIntel {
    pub home: HomeCount,
    /// future tick -> units finishing training at that tick
    #[serde(default)]
    pub training: BTreeMap<Tick, i64>,
    /// future tick -> units returning from a prior deployment
    #[serde(default)]
    pub returning: BTreeMap<Tick, i64>,
}

impl SlotIntel {
    pub fn exact(home: i64) -> Self {
        Self {
            home: HomeCount::Exact(home),
            training: BTreeMap::new(),
            returning: BTreeMap::new(),
        }
    }

    pub fn estimated(home: i64) -> Self {
        Self {
            home: HomeCount::Estimated(home),
            training: BTreeMap::new(),
            returning: BTreeMap::new(),
        }
    }

    pub fn training_total(&self) -> i64 {
        self.training.values().sum()
    }

    pub fn returning_total(&self) -> i64 {
        self.returning.values().sum()
    }
}

/// Spy/wizard counts as directly observed; only clairvoyance-grade
/// intelligence carries these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpyWizCounts {
    pub spies: i64,
    pub assassins: i64,
    pub wizards: i64,
    pub archmages: i64,
}

impl SpyWizCounts {
    pub fn total(&self) -> i64 {
        self.spies + self.assassins + self.wizards + self.archmages
    }
}

/// Military intelligence for one dominion at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilitarySnapshot {
    pub captured_at: Tick,
    /// Slots never observed are simply absent and estimate as Unknown.
    pub slots: BTreeMap<UnitSlot, SlotIntel>,
    pub draftees: Estimate<i64>,
    #[serde(default = "unknown_spywiz")]
    pub spywiz: Estimate<SpyWizCounts>,
}

fn unknown_spywiz() -> Estimate<SpyWizCounts> {
    Estimate::Unknown
}

impl MilitarySnapshot {
    pub fn new(captured_at: Tick) -> Self {
        Self {
            captured_at,
            slots: BTreeMap::new(),
            draftees: Estimate::Unknown,
            spywiz: Estimate::Unknown,
        }
    }

    pub fn slot(&self, slot: UnitSlot) -> Option<&SlotIntel> {
        self.slots.get(&slot)
    }

    /// Last future tick at which any training completes, relative to the
    /// given current tick. Zero when nothing is in the pipeline.
    pub fn paid_until(&self, now: Tick) -> Tick {
        self.slots
            .values()
            .flat_map(|s| s.training.keys().copied())
            .max()
            .map(|t| t.saturating_sub(now.saturating_sub(self.captured_at)))
            .unwrap_or(0)
    }

    /// Reject negative counts; valid snapshots from the retrieval layer
    /// can never contain them, but externally supplied payloads can.
    pub fn validate(&self) -> Result<()> {
        for (slot, intel) in &self.slots {
            if intel.home.raw() < 0 {
                return Err(IntelError::NegativeCount {
                    slot: *slot,
                    count: intel.home.raw(),
                });
            }
            for count in intel.training.values().chain(intel.returning.values()) {
                if *count < 0 {
                    return Err(IntelError::NegativeCount {
                        slot: *slot,
                        count: *count,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Ancillary modifiers consumed by the bonus calculator, supplied as plain
/// read-only data by the retrieval layer. Spell and tech contributions
/// arrive already resolved to percentages for the dominion's race.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BonusInputs {
    pub spell_offense_pct: f64,
    pub spell_defense_pct: f64,
    pub tech_offense_pct: f64,
    pub tech_defense_pct: f64,
    /// Castle forges investment, as a fraction.
    pub forges: f64,
    /// Castle walls investment, as a fraction.
    pub walls: f64,
    /// Gryphon nests as a fraction of total buildings.
    pub gryphon_nest_ratio: f64,
    /// Guard towers as a fraction of total buildings.
    pub guard_tower_ratio: f64,
    pub prestige: f64,
}

/// Full intelligence picture for one dominion: the military snapshot plus
/// the non-military observables the estimators need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominionIntel {
    pub code: DominionCode,
    pub race: String,
    pub land: i64,
    pub networth: Estimate<f64>,
    pub buildings_total: i64,
    #[serde(default = "unknown_boats")]
    pub boats: Estimate<f64>,
    #[serde(default)]
    pub docks: f64,
    /// None when the dominion has never been scouted.
    pub military: Option<MilitarySnapshot>,
    #[serde(default)]
    pub bonuses: BonusInputs,
}

fn unknown_boats() -> Estimate<f64> {
    Estimate::Unknown
}

impl DominionIntel {
    pub fn validate(&self) -> Result<()> {
        if let Some(military) = &self.military {
            military.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_intel_pipeline_totals() {
        let mut intel = SlotIntel::estimated(500);
        intel.training.insert(3, 40);
        intel.training.insert(6, 60);
        intel.returning.insert(2, 25);
        assert_eq!(intel.training_total(), 100);
        assert_eq!(intel.returning_total(), 25);
    }

    #[test]
    fn test_paid_until_tracks_latest_training_tick() {
        let mut snapshot = MilitarySnapshot::new(100);
        let mut intel = SlotIntel::exact(10);
        intel.training.insert(9, 5);
        intel.training.insert(12, 5);
        snapshot.slots.insert(UnitSlot(1), intel);

        // Captured at tick 100, queried at tick 104: 12 - 4 = 8 left.
        assert_eq!(snapshot.paid_until(104), 8);
        assert_eq!(MilitarySnapshot::new(0).paid_until(5), 0);
    }

    #[test]
    fn test_validate_rejects_negative_home_count() {
        let mut snapshot = MilitarySnapshot::new(0);
        snapshot.slots.insert(UnitSlot(2), SlotIntel::exact(-3));
        assert!(matches!(
            snapshot.validate(),
            Err(IntelError::NegativeCount { .. })
        ));
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let mut snapshot = MilitarySnapshot::new(42);
        snapshot.slots.insert(UnitSlot(1), SlotIntel::estimated(120));
        snapshot.draftees = Estimate::Known(300);

        let intel = DominionIntel {
            code: DominionCode(11793),
            race: "Kobold".to_string(),
            land: 2000,
            networth: Estimate::Known(450_000.0),
            buildings_total: 1800,
            boats: Estimate::Unknown,
            docks: 0.0,
            military: Some(snapshot),
            bonuses: BonusInputs::default(),
        };

        let json = serde_json::to_string(&intel).unwrap();
        let back: DominionIntel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, intel);
    }
}
