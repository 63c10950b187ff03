//! Estimation constants - all tunable values in one place
//!
//! Bonus fractions are ADDITIVE with each other and applied once,
//! multiplicatively, to aggregated base power.

/// Discount applied once to a scouted (non-exact) home unit count.
/// Barracks spy reports systematically overstate what is actually home.
pub const BARRACKS_UNCERTAINTY: f64 = 0.85;

/// Defense fraction from the protective spell assumed to always be active.
pub const ARES_DEFENSE_BONUS: f64 = 0.10;

/// Defense fraction per 1.0 guard-tower building ratio.
pub const GUARD_TOWER_DEFENSE_FACTOR: f64 = 1.75;

/// Offense fraction per 1.0 gryphon-nest building ratio.
pub const GRYPHON_NEST_OFFENSE_FACTOR: f64 = 1.75;

/// Prestige points per 1.0 of offense bonus fraction.
pub const PRESTIGE_OFFENSE_DIVISOR: f64 = 10_000.0;

/// Sent offense may not exceed this multiple of remaining home defense.
pub const SAFE_SEND_RATIO: f64 = 1.25;

/// Stride of the coarse forward scan bracketing the 5/4 boundary count.
pub const COARSE_SCAN_STRIDE: i64 = 10_000;

/// Defense contributed per draftee held at home.
pub const DRAFTEE_DEFENSE: f64 = 1.0;

// Networth weights for residual spy/wizard inference
pub const NETWORTH_PER_LAND: f64 = 20.0;
pub const NETWORTH_PER_BUILDING: f64 = 5.0;
pub const NETWORTH_PER_SPYWIZ: f64 = 500.0;

// Transport constants
pub const UNITS_PER_BOAT: f64 = 30.0;
pub const DOCKS_PROTECTION_BASE: f64 = 2.25;
pub const DOCKS_PROTECTION_PER_DAY: f64 = 0.05;

/// Minimum dominion count before batch assessment goes parallel.
/// Below this, thread overhead exceeds the benefit.
pub const PARALLEL_THRESHOLD: usize = 32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uncertainty_is_a_discount() {
        assert!(BARRACKS_UNCERTAINTY > 0.0 && BARRACKS_UNCERTAINTY < 1.0);
    }

    #[test]
    fn test_safe_send_ratio_is_five_over_four() {
        assert!((SAFE_SEND_RATIO - 5.0 / 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_networth_weights_positive() {
        assert!(NETWORTH_PER_LAND > 0.0);
        assert!(NETWORTH_PER_BUILDING > 0.0);
        assert!(NETWORTH_PER_SPYWIZ > 0.0);
    }

    #[test]
    fn test_scan_stride_positive() {
        assert!(COARSE_SCAN_STRIDE > 0);
    }
}
