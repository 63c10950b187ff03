//! Load race definitions from TOML files

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::catalog::race::{RaceDefinition, RacePerk};
use crate::catalog::unit::{SpyWizRatios, UnitDefinition, UnitPerk, UnitRole};
use crate::core::error::{IntelError, Result};
use crate::core::types::UnitSlot;

/// Load every race file (`*.toml`) from the races/ directory, keyed by
/// race name.
pub fn load_races(races_dir: &Path) -> Result<HashMap<String, RaceDefinition>> {
    let mut races = HashMap::new();

    for entry in fs::read_dir(races_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("toml") {
            continue;
        }
        let file = path.display().to_string();
        let content = fs::read_to_string(&path)?;
        let race = parse_race_toml(&content, &file)?;
        races.insert(race.name().to_string(), race);
    }

    Ok(races)
}

/// Parse and validate a single race definition.
pub fn parse_race_toml(content: &str, file: &str) -> Result<RaceDefinition> {
    let toml: toml::Value = content.parse().map_err(|e| IntelError::InvalidRaceFile {
        file: file.to_string(),
        message: format!("invalid TOML: {}", e),
    })?;

    let name = toml
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| invalid(file, "missing race name"))?
        .to_string();

    let mut perks = Vec::new();
    if let Some(perk_table) = toml.get("perks").and_then(|v| v.as_table()) {
        for (key, value) in perk_table {
            let amount = as_f64(value).ok_or_else(|| {
                invalid(file, &format!("race perk '{}' must be numeric", key))
            })?;
            let perk = match key.as_str() {
                "offense" => RacePerk::Offense(amount),
                "defense" => RacePerk::Defense(amount),
                "boat_capacity" => RacePerk::BoatCapacity(amount),
                other => {
                    return Err(invalid(file, &format!("unknown race perk '{}'", other)));
                }
            };
            perks.push(perk);
        }
    }

    let unit_values = toml
        .get("units")
        .and_then(|v| v.as_array())
        .ok_or_else(|| invalid(file, "missing [[units]] tables"))?;

    let mut units = Vec::new();
    for value in unit_values {
        units.push(parse_unit(value, file)?);
    }

    RaceDefinition::new(name, units, perks)
}

fn parse_unit(value: &toml::Value, file: &str) -> Result<UnitDefinition> {
    let slot = value
        .get("slot")
        .and_then(|v| v.as_integer())
        .ok_or_else(|| invalid(file, "unit missing slot"))?;
    let slot = UnitSlot(u8::try_from(slot).map_err(|_| {
        invalid(file, &format!("unit slot {} out of range", slot))
    })?);

    let name = value
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| invalid(file, &format!("unit {} missing name", slot)))?
        .to_string();

    let offense = value
        .get("offense")
        .and_then(as_f64)
        .ok_or_else(|| invalid(file, &format!("unit {} missing offense", slot)))?;
    let defense = value
        .get("defense")
        .and_then(as_f64)
        .ok_or_else(|| invalid(file, &format!("unit {} missing defense", slot)))?;
    let networth = value
        .get("networth")
        .and_then(as_f64)
        .ok_or_else(|| invalid(file, &format!("unit {} missing networth", slot)))?;

    let role_str = value
        .get("role")
        .and_then(|v| v.as_str())
        .ok_or_else(|| invalid(file, &format!("unit {} missing role", slot)))?;
    let role = parse_role(role_str)
        .ok_or_else(|| invalid(file, &format!("unit {}: unknown role '{}'", slot, role_str)))?;

    let need_boat = value
        .get("need_boat")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    let mut perks = Vec::new();
    if let Some(perk_table) = value.get("perks").and_then(|v| v.as_table()) {
        for (key, params) in perk_table {
            perks.push(parse_unit_perk(key, params, slot, file)?);
        }
    }

    let ratios = SpyWizRatios {
        spy_offense: value.get("spy_offense").and_then(as_f64).unwrap_or(0.0),
        spy_defense: value.get("spy_defense").and_then(as_f64).unwrap_or(0.0),
        wiz_offense: value.get("wiz_offense").and_then(as_f64).unwrap_or(0.0),
        wiz_defense: value.get("wiz_defense").and_then(as_f64).unwrap_or(0.0),
    };

    Ok(UnitDefinition {
        slot,
        name,
        offense,
        defense,
        networth,
        perks,
        need_boat,
        role,
        ratios,
    })
}

fn parse_unit_perk(
    key: &str,
    params: &toml::Value,
    slot: UnitSlot,
    file: &str,
) -> Result<UnitPerk> {
    let pairing = |params: &toml::Value| -> Result<(UnitSlot, f64, i64)> {
        let target = params
            .get("slot")
            .and_then(|v| v.as_integer())
            .ok_or_else(|| invalid(file, &format!("unit {}: pairing perk missing slot", slot)))?;
        let target = UnitSlot(u8::try_from(target).map_err(|_| {
            invalid(file, &format!("unit {}: pairing slot {} out of range", slot, target))
        })?);
        let bonus = params
            .get("bonus")
            .and_then(as_f64)
            .ok_or_else(|| invalid(file, &format!("unit {}: pairing perk missing bonus", slot)))?;
        let per = params.get("per").and_then(|v| v.as_integer()).unwrap_or(1);
        if per <= 0 {
            return Err(invalid(
                file,
                &format!("unit {}: pairing ratio must be positive", slot),
            ));
        }
        Ok((target, bonus, per))
    };

    match key {
        "offense_from_pairing" => {
            let (slot, bonus, per) = pairing(params)?;
            Ok(UnitPerk::OffenseFromPairing { slot, bonus, per })
        }
        "defense_from_pairing" => {
            let (slot, bonus, per) = pairing(params)?;
            Ok(UnitPerk::DefenseFromPairing { slot, bonus, per })
        }
        other => Err(invalid(
            file,
            &format!("unit {}: unknown perk '{}'", slot, other),
        )),
    }
}

fn parse_role(s: &str) -> Option<UnitRole> {
    match s {
        "offense" => Some(UnitRole::Offense),
        "defense" => Some(UnitRole::Defense),
        "hybrid" => Some(UnitRole::Hybrid),
        "support" => Some(UnitRole::Support),
        _ => None,
    }
}

fn as_f64(value: &toml::Value) -> Option<f64> {
    value
        .as_float()
        .or_else(|| value.as_integer().map(|i| i as f64))
}

fn invalid(file: &str, message: &str) -> IntelError {
    IntelError::InvalidRaceFile {
        file: file.to_string(),
        message: message.to_string(),
    }
}
