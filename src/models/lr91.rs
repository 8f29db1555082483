//! Luo-Rudy phase I guinea-pig ventricular myocyte.
//!
//! Six currents: INa, Isi (slow inward, carried in the `CaL` slot), the
//! time-dependent delayed rectifier IK (carried in the `Ks` slot), IK1, IKp
//! and a background current. Intracellular Na and K are fixed; only Cai is
//! integrated. Units are μA/cm² and μF/cm² (Cm = 1).
//!
//! Reference: Luo CH, Rudy Y. Circ Res. 1991;68:1501-1526

use crate::config::{Conductance, Conductances, Parameters, PhysicalConstants, StimulusParameters};
use crate::kernel::{advance, forward_euler};
use crate::state::{GateRate, StateVector, StepScratch};

use super::{IonicModel, ModelFamily, ModelId};

const NA_I_MM: f64 = 18.0;
const K_I_MM: f64 = 145.0;
/// Reversal potential of the background current (mV)
const E_B_MV: f64 = -59.87;

/// Luo-Rudy 1991
#[derive(Debug, Clone, Copy, Default)]
pub struct Lr91;

impl Lr91 {
    fn sodium_rates(v: f64, activation_shift: f64, inactivation_shift: f64, tau_scale: f64) -> (GateRate, GateRate, GateRate) {
        let vm = v - activation_shift;
        let alpha_m = if (vm + 47.13).abs() < 1e-6 {
            3.2
        } else {
            0.32 * (vm + 47.13) / (1.0 - (-0.1 * (vm + 47.13)).exp())
        };
        let beta_m = 0.08 * (-vm / 11.0).exp();

        let vh = v - inactivation_shift;
        let (alpha_h, beta_h, alpha_j, beta_j) = if vh >= -40.0 {
            (
                0.0,
                1.0 / (0.13 * (1.0 + ((vh + 10.66) / -11.1).exp())),
                0.0,
                0.3 * (-2.535e-7 * vh).exp() / (1.0 + (-0.1 * (vh + 32.0)).exp()),
            )
        } else {
            (
                0.135 * ((80.0 + vh) / -6.8).exp(),
                3.56 * (0.079 * vh).exp() + 3.1e5 * (0.35 * vh).exp(),
                (-1.2714e5 * (0.2444 * vh).exp() - 3.474e-5 * (-0.04391 * vh).exp()) * (vh + 37.78)
                    / (1.0 + (0.311 * (vh + 79.23)).exp()),
                0.1212 * (-0.01052 * vh).exp() / (1.0 + (-0.1378 * (vh + 40.14)).exp()),
            )
        };

        let mut h = GateRate::from_alpha_beta(alpha_h, beta_h);
        let mut j = GateRate::from_alpha_beta(alpha_j, beta_j);
        h.tau *= tau_scale;
        j.tau *= tau_scale;
        (GateRate::from_alpha_beta(alpha_m, beta_m), h, j)
    }

    /// Inactivation factor of IK; removable singularity at -77 mV
    fn ik_rectification(v: f64) -> f64 {
        if v <= -100.0 {
            1.0
        } else if (v + 77.0).abs() < 1e-6 {
            2.837 * 0.04 / (0.04 * (v + 35.0)).exp()
        } else {
            2.837 * ((0.04 * (v + 77.0)).exp() - 1.0) / ((v + 77.0) * (0.04 * (v + 35.0)).exp())
        }
    }

    fn k1_steady_state(v: f64, e_k1: f64) -> f64 {
        let alpha = 1.02 / (1.0 + (0.2385 * (v - e_k1 - 59.215)).exp());
        let beta = (0.49124 * (0.08032 * (v - e_k1 + 5.476)).exp() + (0.06175 * (v - e_k1 - 594.31)).exp())
            / (1.0 + (-0.5143 * (v - e_k1 + 4.753)).exp());
        alpha / (alpha + beta)
    }
}

impl IonicModel for Lr91 {
    fn id(&self) -> ModelId {
        ModelId::Lr91
    }

    fn family(&self) -> ModelFamily {
        ModelFamily::GuineaPigVentricular
    }

    fn baseline_parameters(&self) -> Parameters {
        let mut params = Parameters::default();
        params.selectors.model = ModelId::Lr91.as_str().to_string();
        params.constants = PhysicalConstants {
            membrane_capacitance_uF: 1.0,
            k_out_mM: 5.4,
            na_out_mM: 140.0,
            ca_out_mM: 1.8,
            p_kna: 0.01833,
            ..PhysicalConstants::default()
        };
        params.conductances = Conductances {
            na: Conductance::new(23.0),
            ca_l: Conductance::new(0.09),
            ks: Conductance::new(0.282),
            k1: Conductance::new(0.6047),
            kp: Conductance::new(0.0183),
            b: Conductance::new(0.03921),
            ..Conductances::default()
        };
        params.stimulus = StimulusParameters {
            amplitude: -80.0,
            duration_ms: 1.0,
        };
        params
    }

    fn initial_state(&self) -> StateVector {
        StateVector {
            v_mV: -84.5286,
            m: 0.0017,
            h: 0.9832,
            j: 0.995484,
            d: 3e-6,
            f: 1.0,
            x: 0.0057,
            ca_i_mM: 2e-4,
            na_i_mM: NA_I_MM,
            k_i_mM: K_I_MM,
            ..StateVector::default()
        }
    }

    fn rates(&self, params: &Parameters, _state: &StateVector, vm: f64, scratch: &mut StepScratch) {
        let k = &params.kinetics;
        let rates = &mut scratch.rates;

        let (m, h, j) = Self::sodium_rates(
            vm,
            k.na_activation_shift_mV,
            k.na_inactivation_shift_mV,
            k.na_inactivation_tau_scale,
        );
        rates.m = m;
        rates.h = h;
        rates.j = j;

        let vd = vm - k.cal_activation_shift_mV;
        let alpha_d = 0.095 * (-0.01 * (vd - 5.0)).exp() / (1.0 + (-0.072 * (vd - 5.0)).exp());
        let beta_d = 0.07 * (-0.017 * (vd + 44.0)).exp() / (1.0 + (0.05 * (vd + 44.0)).exp());
        rates.d = GateRate::from_alpha_beta(alpha_d, beta_d);

        let vf = vm - k.cal_inactivation_shift_mV;
        let alpha_f = 0.012 * (-0.008 * (vf + 28.0)).exp() / (1.0 + (0.15 * (vf + 28.0)).exp());
        let beta_f = 0.0065 * (-0.02 * (vf + 30.0)).exp() / (1.0 + (-0.2 * (vf + 30.0)).exp());
        rates.f = GateRate::from_alpha_beta(alpha_f, beta_f);
        rates.f.tau *= k.cal_inactivation_tau_scale;

        let vx = vm - k.ks_activation_shift_mV;
        let alpha_x = 0.0005 * (0.083 * (vx + 50.0)).exp() / (1.0 + (0.057 * (vx + 50.0)).exp());
        let beta_x = 0.0013 * (-0.06 * (vx + 20.0)).exp() / (1.0 + (-0.04 * (vx + 20.0)).exp());
        rates.x = GateRate::from_alpha_beta(alpha_x, beta_x);
        rates.x.tau *= k.ks_tau_scale;
    }

    fn update(&self, state: &mut StateVector, scratch: &StepScratch, _vm: f64, dt: f64) {
        let rates = &scratch.rates;
        state.m = advance(state.m, rates.m, dt);
        state.h = advance(state.h, rates.h, dt);
        state.j = advance(state.j, rates.j, dt);
        state.d = advance(state.d, rates.d, dt);
        state.f = advance(state.f, rates.f, dt);
        state.x = advance(state.x, rates.x, dt);
    }

    fn compute(&self, params: &Parameters, state: &StateVector, vm: f64, scratch: &mut StepScratch) -> f64 {
        let g = &params.conductances;
        let ko_factor = (params.constants.k_out_mM / 5.4).sqrt();
        let rev = scratch.reversal;
        let currents = &mut scratch.currents;

        currents.na = g.na.effective() * state.m.powi(3) * state.h * state.j * (vm - rev.e_na);

        let e_si = 7.7 - 13.0287 * state.ca_i_mM.ln();
        currents.ca_l = g.ca_l.effective() * state.d * state.f * (vm - e_si);

        // IK uses the mixed K/Na reversal, IK1 and IKp the pure K reversal
        currents.ks = g.ks.effective() * ko_factor * state.x * Self::ik_rectification(vm) * (vm - rev.e_ks);
        currents.k1 = g.k1.effective() * ko_factor * Self::k1_steady_state(vm, rev.e_k) * (vm - rev.e_k);

        let kp = 1.0 / (1.0 + ((7.488 - vm) / 5.98).exp());
        currents.kp = g.kp.effective() * kp * (vm - rev.e_k);

        currents.b = g.b.effective() * (vm - E_B_MV);

        scratch.fluxes = Default::default();

        currents.na + currents.ca_l + currents.ks + currents.k1 + currents.kp + currents.b
    }

    fn homeostasis(&self, _params: &Parameters, state: &mut StateVector, scratch: &StepScratch, dt: f64) {
        let dcai = -1e-4 * scratch.currents.ca_l + 0.07 * (1e-4 - state.ca_i_mM);
        state.ca_i_mM = forward_euler(state.ca_i_mM, dcai, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::compute_step;

    #[test]
    fn test_resting_state_is_quiescent() {
        let model = Lr91;
        let params = model.baseline_parameters();
        let mut state = model.initial_state();
        let mut scratch = StepScratch::default();

        let v = state.v_mV;
        let total = compute_step(&params, &model, &mut state, &mut scratch, v, 0.01);
        // Near rest the net current is small
        assert!(total.abs() < 1.0, "total = {}", total);
    }

    #[test]
    fn test_reversal_potentials_at_rest() {
        let model = Lr91;
        let params = model.baseline_parameters();
        let state = model.initial_state();
        let rev = crate::kernel::compute_reversal_potentials(&params, &state);
        assert!((rev.e_k - (-87.9)).abs() < 0.5, "EK1 = {}", rev.e_k);
        assert!((rev.e_ks - (-77.6)).abs() < 0.5, "EK = {}", rev.e_ks);
        assert!((rev.e_na - 54.8).abs() < 0.5, "ENa = {}", rev.e_na);
    }

    #[test]
    fn test_singularities_are_finite() {
        let params = Lr91.baseline_parameters();
        let state = Lr91.initial_state();
        let mut scratch = StepScratch::default();
        for v in [-47.13, -77.0, -40.0, -100.0] {
            Lr91.rates(&params, &state, v, &mut scratch);
            assert!(scratch.rates.m.tau.is_finite() && scratch.rates.m.inf.is_finite());
            assert!(Lr91::ik_rectification(v).is_finite());
        }
        let limit = Lr91::ik_rectification(-77.0);
        let near = Lr91::ik_rectification(-77.0 + 1e-4);
        assert!((limit - near).abs() < 1e-4);
    }

    #[test]
    fn test_scale_applies_through_effective() {
        let model = Lr91;
        let mut params = model.baseline_parameters();
        let state = StateVector {
            x: 0.5,
            ..model.initial_state()
        };
        let mut scratch = StepScratch::default();
        scratch.reversal = crate::kernel::compute_reversal_potentials(&params, &state);
        model.compute(&params, &state, 0.0, &mut scratch);
        let full = scratch.currents.ks;

        params.conductances.ks.G = 0.5;
        model.compute(&params, &state, 0.0, &mut scratch);
        assert!((scratch.currents.ks - 0.5 * full).abs() < 1e-12);
    }
}
