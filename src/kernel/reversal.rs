//! Reversal potentials from the Nernst equation.
//!
//! E = (RT / zF) ln(C_out / C_in)
//!
//! Evaluated once per step, before any rate or current that depends on
//! `V - E`. Concentrations must stay strictly positive; a non-positive value
//! yields NaN or infinity and is not trapped here.

use crate::config::Parameters;
use crate::state::{ReversalPotentials, StateVector};

/// Nernst potential (mV) for an ion of valence `z`
#[inline]
pub fn nernst(rt_over_f: f64, z: f64, c_out: f64, c_in: f64) -> f64 {
    rt_over_f / z * (c_out / c_in).ln()
}

/// Reversal potential of a mixed K/Na conductance with permeability ratio `p_kna`
#[inline]
pub fn mixed_k_na(rt_over_f: f64, p_kna: f64, k_out: f64, k_in: f64, na_out: f64, na_in: f64) -> f64 {
    rt_over_f * ((k_out + p_kna * na_out) / (k_in + p_kna * na_in)).ln()
}

/// All reversal potentials for the current state
pub fn compute_reversal_potentials(params: &Parameters, state: &StateVector) -> ReversalPotentials {
    let c = &params.constants;
    let rtf = c.rt_over_f();

    ReversalPotentials {
        e_na: nernst(rtf, 1.0, c.na_out_mM, state.na_i_mM),
        e_k: nernst(rtf, 1.0, c.k_out_mM, state.k_i_mM),
        e_ks: mixed_k_na(rtf, c.p_kna, c.k_out_mM, state.k_i_mM, c.na_out_mM, state.na_i_mM),
        e_ca: nernst(rtf, 2.0, c.ca_out_mM, state.ca_i_mM),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_potassium_reversal() {
        let params = Parameters::default();
        let state = StateVector {
            k_i_mM: 138.3,
            ..Default::default()
        };
        let rev = compute_reversal_potentials(&params, &state);
        // Ko = 5.4, Ki = 138.3 at 310 K: about -86.7 mV
        assert!((rev.e_k - (-86.7)).abs() < 0.2, "E_K = {}", rev.e_k);
    }

    #[test]
    fn test_calcium_uses_half_factor() {
        let rtf = 26.7;
        let monovalent = nernst(rtf, 1.0, 2.0, 0.0002);
        let divalent = nernst(rtf, 2.0, 2.0, 0.0002);
        assert!((divalent - 0.5 * monovalent).abs() < 1e-12);
    }

    #[test]
    fn test_equal_concentrations_give_zero() {
        assert_eq!(nernst(26.7, 1.0, 140.0, 140.0), 0.0);
    }

    #[test]
    fn test_mixed_reversal_lies_between_k_and_na() {
        let params = Parameters::default();
        let state = StateVector::default();
        let rev = compute_reversal_potentials(&params, &state);
        assert!(rev.e_ks > rev.e_k);
        assert!(rev.e_ks < rev.e_na);
    }
}
