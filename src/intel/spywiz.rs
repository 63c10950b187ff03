//! Hidden spy/wizard strength inferred from residual networth
//!
//! Espionage and magic units are rarely observed directly. Whatever part
//! of a dominion's networth is not explained by land, structures, and the
//! known military must be carried by them; dividing by the per-unit
//! networth constant gives a comparable spy+wizard equivalent.

use serde::{Deserialize, Serialize};

use crate::core::constants::{NETWORTH_PER_BUILDING, NETWORTH_PER_LAND, NETWORTH_PER_SPYWIZ};
use crate::core::error::Result;
use crate::core::estimate::Estimate;
use crate::intel::power::PowerEstimator;

/// Indirect espionage/magic capacity estimate for one dominion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpyWizEstimate {
    /// Networth not attributable to land, structures, or known military.
    pub residual_networth: Estimate<f64>,
    /// Spy+wizard equivalent unit count hidden in the residual.
    pub spywiz_units: Estimate<i64>,
    /// Conservative per-land ratio, assuming an even spy/wizard split.
    pub ratio: Estimate<f64>,
    /// Upper-bound per-land ratio, attributing the whole residual one way.
    pub max_ratio: Estimate<f64>,
    pub spy_ratio: Estimate<f64>,
    pub max_spy_ratio: Estimate<f64>,
    pub wiz_ratio: Estimate<f64>,
    pub max_wiz_ratio: Estimate<f64>,
    /// Spy strength carried by regular military units.
    pub spy_units_equiv: Estimate<i64>,
    /// Wizard strength carried by regular military units.
    pub wiz_units_equiv: Estimate<i64>,
}

/// Derive the spy/wizard picture from the residual networth. Military
/// networth excludes units still in training; they are not paid for in
/// the observed networth figure yet.
pub fn estimate(estimator: &PowerEstimator) -> Result<SpyWizEstimate> {
    let intel = estimator.intel();
    let land = intel.land as f64;

    let mut military_networth = Estimate::Known(0.0);
    for unit in estimator.race().units() {
        let amount = estimator.amount(unit.slot, false);
        military_networth = military_networth + amount.map(|a| a as f64 * unit.networth);
    }

    let residual = intel
        .networth
        .zip_with(military_networth, |nw, mil| {
            let explained =
                land * NETWORTH_PER_LAND + intel.buildings_total as f64 * NETWORTH_PER_BUILDING;
            round1(nw - explained - mil)
        });

    let spywiz_units = residual.map(|r| (r / NETWORTH_PER_SPYWIZ).round() as i64);

    let ratio = spywiz_units.map(|u| round3(u as f64 / (2.0 * land)));
    let max_ratio = spywiz_units.map(|u| round3(u as f64 / land));

    let spy_equiv = unit_equiv(estimator, |u| u.ratios.spy_per_unit());
    let wiz_equiv = unit_equiv(estimator, |u| u.ratios.wiz_per_unit());

    let per_land = |equiv: Estimate<i64>| equiv.map(|e| e as f64 / land);
    let spy_ratio = ratio.zip_with(per_land(spy_equiv), |r, e| round3(r + e));
    let max_spy_ratio = max_ratio.zip_with(per_land(spy_equiv), |r, e| round3(r + e));
    let wiz_ratio = ratio.zip_with(per_land(wiz_equiv), |r, e| round3(r + e));
    let max_wiz_ratio = max_ratio.zip_with(per_land(wiz_equiv), |r, e| round3(r + e));

    Ok(SpyWizEstimate {
        residual_networth: residual,
        spywiz_units,
        ratio,
        max_ratio,
        spy_ratio,
        max_spy_ratio,
        wiz_ratio,
        max_wiz_ratio,
        spy_units_equiv: spy_equiv,
        wiz_units_equiv: wiz_equiv,
    })
}

/// Forward networth reconstruction from the known composition, for
/// cross-checking stale or implausible observed figures.
pub fn reconstructed_networth(estimator: &PowerEstimator) -> Result<Estimate<f64>> {
    let intel = estimator.intel();

    let mut networth = Estimate::Known(
        intel.land as f64 * NETWORTH_PER_LAND
            + intel.buildings_total as f64 * NETWORTH_PER_BUILDING,
    );
    for unit in estimator.race().units() {
        let amount = estimator.amount(unit.slot, true);
        networth = networth + amount.map(|a| a as f64 * unit.networth);
    }
    let spywiz = match &intel.military {
        Some(snapshot) => snapshot.spywiz,
        None => Estimate::Unknown,
    };
    networth = networth + spywiz.map(|c| c.total() as f64 * NETWORTH_PER_SPYWIZ);

    Ok(networth.map(|nw| nw.round()))
}

fn unit_equiv<F: Fn(&crate::catalog::unit::UnitDefinition) -> f64>(
    estimator: &PowerEstimator,
    per_unit: F,
) -> Estimate<i64> {
    let mut total = Estimate::Known(0i64);
    for unit in estimator.race().units() {
        let amount = estimator.amount(unit.slot, false);
        total = total + amount.map(|a| (a as f64 * per_unit(unit)).trunc() as i64);
    }
    total
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
