use crate::types::G0;

// ---------------------------------------------------------------------------
// ISA troposphere (sea level to 11 km)
// ---------------------------------------------------------------------------

const R_AIR: f64 = 287.05;      // specific gas constant for dry air, J/(kg·K)
const LAPSE: f64 = 0.0065;      // troposphere lapse rate, K/m

const T0: f64 = 288.15;         // sea-level temperature, K
const P0: f64 = 101_325.0;      // sea-level pressure, Pa

const TROPOPAUSE_M: f64 = 11_000.0;
const TROPOPAUSE_T: f64 = 216.65;   // K
const STRATO_RATIO: f64 = 0.223_361;

/// Ambient static pressure (Pa) at a geometric altitude (m).
///
/// Barometric formula up to 11 km. Above the tropopause a single constant
/// value is returned: the stratosphere branch does not depend on altitude,
/// so sweeps past 11 km see a flat back-pressure.
pub fn ambient_pressure(altitude_m: f64) -> f64 {
    let exponent = G0 / (R_AIR * LAPSE);
    if altitude_m <= TROPOPAUSE_M {
        P0 * (1.0 - LAPSE * altitude_m / T0).powf(exponent)
    } else {
        P0 * STRATO_RATIO * (TROPOPAUSE_T / T0).powf(exponent)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sea_level_standard_pressure() {
        assert!((ambient_pressure(0.0) - 101_325.0).abs() < 1e-6);
    }

    #[test]
    fn troposphere_reference_points() {
        // ISA tables: 5 km ≈ 54.0 kPa, 11 km ≈ 22.6 kPa
        assert!((ambient_pressure(5_000.0) - 54_020.0).abs() < 100.0);
        assert!((ambient_pressure(11_000.0) - 22_632.0).abs() < 100.0);
    }

    #[test]
    fn pressure_non_increasing_over_sweep() {
        let mut prev = f64::INFINITY;
        for i in 0..=100 {
            let p = ambient_pressure(i as f64 * 200.0);
            assert!(p <= prev);
            prev = p;
        }
    }

    #[test]
    fn stratosphere_branch_is_constant() {
        let a = ambient_pressure(12_000.0);
        let b = ambient_pressure(30_000.0);
        assert_eq!(a, b);
        assert!(a > 0.0 && a < ambient_pressure(11_000.0));
    }
}
