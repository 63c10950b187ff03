//! Integration tests for the estimation pipeline
//!
//! These tests exercise the complete path the CLI takes:
//! - Race catalog loading from the shipped races/ directory
//! - Snapshot construction and validation
//! - Power totals, the 5/4 send solve, defense allocation, and the
//!   residual spy/wizard estimate, all through `assess_dominion`

use std::collections::HashMap;
use std::path::Path;

use dominion_intel::catalog::{load_races, parse_race_toml, RaceDefinition};
use dominion_intel::core::types::{DominionCode, UnitSlot};
use dominion_intel::core::Estimate;
use dominion_intel::intel::{
    assess_dominion, BonusInputs, DominionIntel, MilitarySnapshot, RealmQuery, SlotIntel,
};

const SCENARIO_RACE: &str = r#"
name = "Scenario"

[[units]]
slot = 1
name = "Spec Off"
offense = 5
defense = 0
networth = 5
role = "offense"
need_boat = true

[[units]]
slot = 2
name = "Spec Def"
offense = 0
defense = 4
networth = 5
role = "defense"

[[units]]
slot = 3
name = "Elite"
offense = 3
defense = 4
networth = 7.5
role = "hybrid"
need_boat = true
"#;

fn scenario_races() -> HashMap<String, RaceDefinition> {
    let race = parse_race_toml(SCENARIO_RACE, "scenario.toml").unwrap();
    HashMap::from([(race.name().to_string(), race)])
}

fn dominion(slots: Vec<(u8, i64)>) -> DominionIntel {
    let mut snapshot = MilitarySnapshot::new(0);
    for (slot, count) in slots {
        snapshot.slots.insert(UnitSlot(slot), SlotIntel::exact(count));
    }
    snapshot.draftees = Estimate::Known(0);
    DominionIntel {
        code: DominionCode(11793),
        race: "Scenario".to_string(),
        land: 1000,
        networth: Estimate::Known(100_000.0),
        buildings_total: 2000,
        boats: Estimate::Unknown,
        docks: 0.0,
        military: Some(snapshot),
        bonuses: BonusInputs::default(),
    }
}

// ============================================================================
// Shipped Race Catalog
// ============================================================================

#[test]
fn test_shipped_races_load_and_validate() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("races");
    let races = load_races(&dir).unwrap();

    assert!(races.contains_key("Human"));
    assert!(races.contains_key("Kobold"));
    assert!(races.contains_key("Troll"));

    // Kobold underlings gain offense from beast handler pairing.
    let kobold = &races["Kobold"];
    let underling = kobold.unit(UnitSlot(3)).unwrap();
    assert_eq!(underling.offense_pairing(), Some((UnitSlot(4), 2.0, 1)));

    // Troll fields only evenly-statted hybrids: no pure split exists.
    assert!(!races["Troll"].has_pure_split());
    assert!(races["Human"].has_pure_split());
}

// ============================================================================
// Full Assessment Pipeline
// ============================================================================

/// The 5/4 solve end to end: 1000 pure defense (4 dp each) plus 1000
/// hybrids (3 op / 4 dp). The largest committable hybrid count k satisfies
/// 3k <= 1.25 * (4000 - 4k), so k = 625.
#[test]
fn test_send_solve_boundary_through_report() {
    let races = scenario_races();
    let intel = dominion(vec![(1, 0), (2, 1000), (3, 1000)]);

    let report = assess_dominion(&races, &intel, &RealmQuery::default()).unwrap();
    assert_eq!(report.send.committed, vec![(UnitSlot(3), 625)]);
    assert_eq!(report.send.sendable_op, Estimate::Known(1875));
    assert_eq!(report.send.remaining_dp, Estimate::Known(1500));
}

/// Defense allocation end to end against a named attacker offense.
#[test]
fn test_defense_allocation_through_report() {
    let races = scenario_races();
    let intel = dominion(vec![(1, 0), (2, 1500), (3, 2000)]);
    let query = RealmQuery {
        enemy_op: Some(9000.0),
        current_day: 0,
    };

    let report = assess_dominion(&races, &intel, &query).unwrap();
    let plan = report.defense.unwrap();
    // Baseline 6000, shortfall 3000, ceil(3000 / 4) = 750 hybrids held.
    assert_eq!(plan.held, vec![(UnitSlot(3), 750)]);
    assert_eq!(plan.sendable_op, Estimate::Known(3750));
    assert_eq!(plan.home_dp, Estimate::Known(9000));
}

/// Residual networth spy/wizard inference: 100000 observed, 20000 land,
/// 10000 buildings, 20000 military leaves 50000 -> 100 hidden units.
#[test]
fn test_spywiz_residual_through_report() {
    let races = scenario_races();
    let intel = dominion(vec![(1, 4000), (2, 0), (3, 0)]);

    let report = assess_dominion(&races, &intel, &RealmQuery::default()).unwrap();
    assert_eq!(report.spywiz.residual_networth, Estimate::Known(50_000.0));
    assert_eq!(report.spywiz.spywiz_units, Estimate::Known(100));
}

/// A dominion that was never scouted produces a report, not an error, and
/// every military-derived figure in it is Unknown.
#[test]
fn test_unscouted_dominion_reports_unknown() {
    let races = scenario_races();
    let mut intel = dominion(vec![]);
    intel.military = None;

    let report = assess_dominion(&races, &intel, &RealmQuery::default()).unwrap();
    assert_eq!(report.total_offense, Estimate::Unknown);
    assert_eq!(report.total_defense, Estimate::Unknown);
    assert_eq!(report.send.sendable_op, Estimate::Unknown);
    assert_eq!(report.spywiz.spywiz_units, Estimate::Unknown);
}

/// Assessment is a pure function of the snapshot: repeated calls over the
/// same intelligence produce identical reports.
#[test]
fn test_assessment_is_idempotent() {
    let races = scenario_races();
    let intel = dominion(vec![(1, 100), (2, 1000), (3, 1000)]);
    let query = RealmQuery {
        enemy_op: Some(7500.0),
        current_day: 3,
    };

    let first = assess_dominion(&races, &intel, &query).unwrap();
    let second = assess_dominion(&races, &intel, &query).unwrap();
    assert_eq!(first, second);
}

/// Reports round-trip through JSON the way the CLI emits them.
#[test]
fn test_report_json_round_trip() {
    let races = scenario_races();
    let intel = dominion(vec![(1, 100), (2, 1000), (3, 1000)]);

    let report = assess_dominion(&races, &intel, &RealmQuery::default()).unwrap();
    let json = serde_json::to_string(&report).unwrap();
    let back: dominion_intel::intel::DominionReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}
