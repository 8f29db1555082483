//! Helpers for concentration balances.
//!
//! Models update concentrations by explicit (forward) Euler on charge and
//! flux balances. Membrane currents are converted to concentration rates
//! through the Faraday constant and the compartment volume:
//!
//! dC/dt = -I · Cm / (z · F · V)
//!
//! with I in pA/pF, Cm in μF and V in μL, giving mM/ms.

use crate::config::PhysicalConstants;

/// Concentration rate (mM/ms) produced by a net inward-positive current
#[inline]
pub fn current_to_concentration_rate(
    current_pA_per_pF: f64,
    valence: f64,
    volume_uL: f64,
    constants: &PhysicalConstants,
) -> f64 {
    -current_pA_per_pF * constants.membrane_capacitance_uF / (valence * constants.faraday * volume_uL)
}

/// Explicit Euler update
#[inline]
pub fn forward_euler(y: f64, dydt: f64, dt: f64) -> f64 {
    y + dt * dydt
}

/// New free concentration after a change `delta_total` of total (free + bound)
/// concentration, with a rapid buffer of capacity `buffer_total` and
/// dissociation constant `k_d`.
///
/// Solves the buffer equilibrium quadratic for the positive root.
pub fn rapid_buffer(free: f64, delta_total: f64, buffer_total: f64, k_d: f64) -> f64 {
    let bound = buffer_total * free / (free + k_d);
    let b = buffer_total - bound - delta_total - free + k_d;
    let c = k_d * (bound + delta_total + free);
    ((b * b + 4.0 * c).sqrt() - b) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inward_current_raises_concentration() {
        let constants = PhysicalConstants::default();
        // Negative (inward) sodium current loads the cell with sodium
        let rate = current_to_concentration_rate(-10.0, 1.0, constants.volume_cytosol_uL, &constants);
        assert!(rate > 0.0);
    }

    #[test]
    fn test_charge_conversion_scales_with_valence_and_volume() {
        let constants = PhysicalConstants::default();
        let mono = current_to_concentration_rate(-1.0, 1.0, 1.0, &constants);
        let di = current_to_concentration_rate(-1.0, 2.0, 1.0, &constants);
        let big = current_to_concentration_rate(-1.0, 1.0, 2.0, &constants);
        assert!((di - mono / 2.0).abs() < 1e-18);
        assert!((big - mono / 2.0).abs() < 1e-18);
        assert!((mono - 0.185 / 96485.3415).abs() < 1e-15);
    }

    #[test]
    fn test_rapid_buffer_no_change_is_fixed_point() {
        let free = 0.0002;
        let updated = rapid_buffer(free, 0.0, 0.15, 0.001);
        assert!((updated - free).abs() < 1e-12);
    }

    #[test]
    fn test_rapid_buffer_conserves_total() {
        let (buffer, k_d) = (0.15, 0.001);
        let free = 0.0002;
        let delta = 0.01;
        let updated = rapid_buffer(free, delta, buffer, k_d);

        let total_before = free + buffer * free / (free + k_d);
        let total_after = updated + buffer * updated / (updated + k_d);
        assert!((total_after - total_before - delta).abs() < 1e-12);
        // Most of the added calcium is buffered
        assert!(updated - free < delta);
    }
}
