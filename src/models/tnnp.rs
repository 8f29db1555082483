//! ten Tusscher-Noble-Noble-Panfilov human ventricular myocyte.
//!
//! Twelve sarcolemmal currents, an SR compartment with release, uptake and
//! leak, and rapid buffering of cytosolic and SR calcium. Baseline values are
//! the epicardial set; ENDO and M cells are produced by the celltype
//! modifiers. An optional acetylcholine-activated K+ current has zero
//! baseline conductance.
//!
//! Units: pA/pF, mV, ms, mM.
//!
//! Reference: ten Tusscher KHWJ, Noble D, Noble PJ, Panfilov AV.
//! Am J Physiol Heart Circ Physiol. 2004;286:H1573-H1589

use crate::config::{Conductance, Conductances, Parameters, PhysicalConstants};
use crate::kernel::{advance, current_to_concentration_rate, rapid_buffer, sigmoid};
use crate::measurement::ExcitationThresholds;
use crate::state::{GateRate, StateVector, StepScratch};

use super::{IonicModel, ModelFamily, ModelId};

// Na/Ca exchanger
const NACA_GAMMA: f64 = 0.35;
const NACA_KM_NAI: f64 = 87.5;
const NACA_KM_CA: f64 = 1.38;
const NACA_K_SAT: f64 = 0.1;
const NACA_ALPHA: f64 = 2.5;

// Na/K pump
const NAK_KM_K: f64 = 1.0;
const NAK_KM_NA: f64 = 40.0;

const PCA_KM: f64 = 0.0005;

// SR
const REL_KM: f64 = 0.25;
const REL_BASE_FRACTION: f64 = 0.5;
const UP_KM: f64 = 0.00025;

// Buffers
const BUF_C_TOTAL: f64 = 0.15;
const BUF_C_KD: f64 = 0.001;
const BUF_SR_TOTAL: f64 = 10.0;
const BUF_SR_KD: f64 = 0.3;

/// Ca-dependent gates may not reopen above this voltage (mV)
const CA_GATE_LOCK_MV: f64 = -60.0;

/// ten Tusscher 2004
#[derive(Debug, Clone, Copy, Default)]
pub struct Tnnp;

impl Tnnp {
    fn sodium_rates(v: f64, activation_shift: f64, inactivation_shift: f64, tau_scale: f64) -> (GateRate, GateRate, GateRate) {
        let vm = v - activation_shift;
        let alpha_m = 1.0 / (1.0 + ((-60.0 - vm) / 5.0).exp());
        let beta_m = 0.1 / (1.0 + ((vm + 35.0) / 5.0).exp()) + 0.1 / (1.0 + ((vm - 50.0) / 200.0).exp());
        let m = GateRate {
            inf: sigmoid(vm, -56.86, -9.03).powi(2),
            tau: alpha_m * beta_m,
        };

        let vh = v - inactivation_shift;
        let hj_inf = sigmoid(vh, -71.55, 7.43).powi(2);
        let (alpha_h, beta_h, alpha_j, beta_j) = if vh >= -40.0 {
            (
                0.0,
                0.77 / (0.13 * (1.0 + (-(vh + 10.66) / 11.1).exp())),
                0.0,
                0.6 * (0.057 * vh).exp() / (1.0 + (-0.1 * (vh + 32.0)).exp()),
            )
        } else {
            (
                0.057 * (-(vh + 80.0) / 6.8).exp(),
                2.7 * (0.079 * vh).exp() + 3.1e5 * (0.3485 * vh).exp(),
                (-25428.0 * (0.2444 * vh).exp() - 6.948e-6 * (-0.04391 * vh).exp()) * (vh + 37.78)
                    / (1.0 + (0.311 * (vh + 79.23)).exp()),
                0.02424 * (-0.01052 * vh).exp() / (1.0 + (-0.1378 * (vh + 40.14)).exp()),
            )
        };
        let h = GateRate {
            inf: hj_inf,
            tau: tau_scale / (alpha_h + beta_h),
        };
        let j = GateRate {
            inf: hj_inf,
            tau: tau_scale / (alpha_j + beta_j),
        };
        (m, h, j)
    }

    /// ICaL driving term with the GHK removable singularity at 0 mV
    fn ghk_calcium(v: f64, ca_i: f64, ca_o: f64, c: &PhysicalConstants) -> f64 {
        let rtf = c.rt_over_f();
        let z = 2.0 * v / rtf;
        if z.abs() < 1e-6 {
            2.0 * c.faraday * (ca_i - 0.341 * ca_o)
        } else {
            4.0 * v * c.faraday / rtf * (ca_i * z.exp() - 0.341 * ca_o) / (z.exp() - 1.0)
        }
    }

    fn k1_steady_state(v: f64, e_k: f64) -> f64 {
        let alpha = 0.1 / (1.0 + (0.06 * (v - e_k - 200.0)).exp());
        let beta = (3.0 * (0.0002 * (v - e_k + 100.0)).exp() + (0.1 * (v - e_k - 10.0)).exp())
            / (1.0 + (-0.5 * (v - e_k)).exp());
        alpha / (alpha + beta)
    }

    fn sodium_calcium_exchange(v: f64, state: &StateVector, c: &PhysicalConstants) -> f64 {
        let vfrt = v / c.rt_over_f();
        let (nai, nao) = (state.na_i_mM, c.na_out_mM);
        let forward = (NACA_GAMMA * vfrt).exp() * nai.powi(3) * c.ca_out_mM;
        let reverse = ((NACA_GAMMA - 1.0) * vfrt).exp() * nao.powi(3) * state.ca_i_mM * NACA_ALPHA;
        (forward - reverse)
            / ((NACA_KM_NAI.powi(3) + nao.powi(3))
                * (NACA_KM_CA + c.ca_out_mM)
                * (1.0 + NACA_K_SAT * ((NACA_GAMMA - 1.0) * vfrt).exp()))
    }

    fn sodium_potassium_pump(v: f64, na_i: f64, c: &PhysicalConstants) -> f64 {
        let vfrt = v / c.rt_over_f();
        c.k_out_mM * na_i
            / ((c.k_out_mM + NAK_KM_K) * (na_i + NAK_KM_NA) * (1.0 + 0.1245 * (-0.1 * vfrt).exp() + 0.0353 * (-vfrt).exp()))
    }

    fn f_ca_steady_state(ca_i: f64) -> f64 {
        let a = 1.0 / (1.0 + (ca_i / 0.000325).powi(8));
        let b = 0.1 / (1.0 + ((ca_i - 0.0005) / 0.0001).exp());
        let c = 0.2 / (1.0 + ((ca_i - 0.00075) / 0.0008).exp());
        (a + b + c + 0.23) / 1.46
    }

    fn g_steady_state(ca_i: f64) -> f64 {
        if ca_i <= 0.00035 {
            1.0 / (1.0 + (ca_i / 0.00035).powi(6))
        } else {
            1.0 / (1.0 + (ca_i / 0.00035).powi(16))
        }
    }

    /// Rush-Larsen step that may not increase the gate while depolarized
    fn advance_ca_gate(y: f64, rate: GateRate, vm: f64, dt: f64) -> f64 {
        let next = advance(y, rate, dt);
        if next > y && vm > CA_GATE_LOCK_MV {
            y
        } else {
            next
        }
    }
}

impl IonicModel for Tnnp {
    fn id(&self) -> ModelId {
        ModelId::Tnnp
    }

    fn family(&self) -> ModelFamily {
        ModelFamily::HumanVentricular
    }

    fn baseline_parameters(&self) -> Parameters {
        let mut params = Parameters::default();
        params.selectors.model = ModelId::Tnnp.as_str().to_string();
        params.constants = PhysicalConstants::default();
        params.conductances = Conductances {
            na: Conductance::new(14.838),
            ca_l: Conductance::new(1.75e-4),
            to: Conductance::new(0.294),
            kr: Conductance::new(0.096),
            ks: Conductance::new(0.245),
            k1: Conductance::new(5.405),
            kp: Conductance::new(0.0146),
            nak: Conductance::new(1.362),
            naca: Conductance::new(1000.0),
            pca: Conductance::new(0.825),
            b_na: Conductance::new(2.9e-4),
            b_ca: Conductance::new(5.92e-4),
            b: Conductance::new(0.0),
            k_ach: Conductance::new(0.0),
            rel: Conductance::new(0.016464),
            up: Conductance::new(4.25e-4),
            leak: Conductance::new(8e-5),
        };
        params
    }

    fn initial_state(&self) -> StateVector {
        StateVector::default()
    }

    fn excitation_thresholds(&self) -> ExcitationThresholds {
        ExcitationThresholds::slow_repolarization()
    }

    fn rates(&self, params: &Parameters, state: &StateVector, vm: f64, scratch: &mut StepScratch) {
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
        let alpha_d = 1.4 / (1.0 + ((-35.0 - vd) / 13.0).exp()) + 0.25;
        let beta_d = 1.4 / (1.0 + ((vd + 5.0) / 5.0).exp());
        let gamma_d = 1.0 / (1.0 + ((50.0 - vd) / 20.0).exp());
        rates.d = GateRate {
            inf: sigmoid(vd, -5.0, -7.5),
            tau: alpha_d * beta_d + gamma_d,
        };

        let vf = vm - k.cal_inactivation_shift_mV;
        rates.f = GateRate {
            inf: sigmoid(vf, -20.0, 7.0),
            tau: k.cal_inactivation_tau_scale
                * (1125.0 * (-(vf + 27.0).powi(2) / 240.0).exp() + 80.0 + 165.0 / (1.0 + ((25.0 - vf) / 10.0).exp())),
        };

        rates.f_ca = GateRate {
            inf: Self::f_ca_steady_state(state.ca_i_mM),
            tau: 2.0,
        };
        rates.g = GateRate {
            inf: Self::g_steady_state(state.ca_i_mM),
            tau: 2.0,
        };

        let vr1 = vm - k.kr_activation_shift_mV;
        let alpha_xr1 = 450.0 / (1.0 + ((-45.0 - vr1) / 10.0).exp());
        let beta_xr1 = 6.0 / (1.0 + ((vr1 + 30.0) / 11.5).exp());
        rates.xr1 = GateRate {
            inf: sigmoid(vr1, -26.0, -7.0),
            tau: k.kr_tau_scale * alpha_xr1 * beta_xr1,
        };
        let alpha_xr2 = 3.0 / (1.0 + ((-60.0 - vm) / 20.0).exp());
        let beta_xr2 = 1.12 / (1.0 + ((vm - 60.0) / 20.0).exp());
        rates.xr2 = GateRate {
            inf: sigmoid(vm, -88.0, 24.0),
            tau: k.kr_tau_scale * alpha_xr2 * beta_xr2,
        };

        let vs = vm - k.ks_activation_shift_mV;
        let alpha_xs = 1100.0 / (1.0 + ((-10.0 - vs) / 6.0).exp()).sqrt();
        let beta_xs = 1.0 / (1.0 + ((vs - 60.0) / 20.0).exp());
        rates.xs = GateRate {
            inf: sigmoid(vs, -5.0, -14.0),
            tau: k.ks_tau_scale * alpha_xs * beta_xs,
        };

        rates.r = GateRate {
            inf: sigmoid(vm, 20.0, -6.0),
            tau: 9.5 * (-(vm + 40.0).powi(2) / 1800.0).exp() + 0.8,
        };

        // Fast (epicardial) and slow (endocardial) recovery time courses
        let tau_s_fast = 85.0 * (-(vm + 45.0).powi(2) / 320.0).exp() + 5.0 / (1.0 + ((vm - 20.0) / 5.0).exp()) + 3.0;
        let tau_s_slow = 1000.0 * (-(vm + 67.0).powi(2) / 1000.0).exp() + 8.0;
        let w = k.to_slow_recovery_weight;
        rates.s = GateRate {
            inf: sigmoid(vm, -20.0 + k.to_inactivation_shift_mV, 5.0),
            tau: (1.0 - w) * tau_s_fast + w * tau_s_slow,
        };
    }

    fn update(&self, state: &mut StateVector, scratch: &StepScratch, vm: f64, dt: f64) {
        let rates = &scratch.rates;
        state.m = advance(state.m, rates.m, dt);
        state.h = advance(state.h, rates.h, dt);
        state.j = advance(state.j, rates.j, dt);
        state.d = advance(state.d, rates.d, dt);
        state.f = advance(state.f, rates.f, dt);
        state.f_ca = Self::advance_ca_gate(state.f_ca, rates.f_ca, vm, dt);
        state.g = Self::advance_ca_gate(state.g, rates.g, vm, dt);
        state.xr1 = advance(state.xr1, rates.xr1, dt);
        state.xr2 = advance(state.xr2, rates.xr2, dt);
        state.xs = advance(state.xs, rates.xs, dt);
        state.r = advance(state.r, rates.r, dt);
        state.s = advance(state.s, rates.s, dt);
    }

    fn compute(&self, params: &Parameters, state: &StateVector, vm: f64, scratch: &mut StepScratch) -> f64 {
        let g = &params.conductances;
        let c = &params.constants;
        let rev = scratch.reversal;
        let ko_factor = (c.k_out_mM / 5.4).sqrt();
        let i = &mut scratch.currents;

        i.na = g.na.effective() * state.m.powi(3) * state.h * state.j * (vm - rev.e_na);
        i.ca_l = g.ca_l.effective() * state.d * state.f * state.f_ca * Self::ghk_calcium(vm, state.ca_i_mM, c.ca_out_mM, c);
        i.to = g.to.effective() * state.r * state.s * (vm - rev.e_k);
        i.kr = g.kr.effective() * ko_factor * state.xr1 * state.xr2 * (vm - rev.e_k);
        i.ks = g.ks.effective() * state.xs.powi(2) * (vm - rev.e_ks);
        i.k1 = g.k1.effective() * ko_factor * Self::k1_steady_state(vm, rev.e_k) * (vm - rev.e_k);
        i.kp = g.kp.effective() * (vm - rev.e_k) / (1.0 + ((25.0 - vm) / 5.98).exp());
        i.nak = g.nak.effective() * Self::sodium_potassium_pump(vm, state.na_i_mM, c);
        i.naca = g.naca.effective() * Self::sodium_calcium_exchange(vm, state, c);
        i.pca = g.pca.effective() * state.ca_i_mM / (PCA_KM + state.ca_i_mM);
        i.b_na = g.b_na.effective() * (vm - rev.e_na);
        i.b_ca = g.b_ca.effective() * (vm - rev.e_ca);
        i.b = g.b.effective() * vm;
        i.k_ach = g.k_ach.effective() * (vm - rev.e_k) * (0.055 + 0.4 / (1.0 + ((vm + 9.53) / 17.18).exp()));

        let total = i.na
            + i.ca_l
            + i.to
            + i.kr
            + i.ks
            + i.k1
            + i.kp
            + i.nak
            + i.naca
            + i.pca
            + i.b_na
            + i.b_ca
            + i.b
            + i.k_ach;

        let ca_sr2 = state.ca_sr_mM.powi(2);
        scratch.fluxes.rel = g.rel.effective()
            * (ca_sr2 / (REL_KM * REL_KM + ca_sr2) + REL_BASE_FRACTION)
            * state.d
            * state.g;
        scratch.fluxes.up = g.up.effective() / (1.0 + (UP_KM / state.ca_i_mM).powi(2));
        scratch.fluxes.leak = g.leak.effective() * (state.ca_sr_mM - state.ca_i_mM);

        total
    }

    fn homeostasis(&self, params: &Parameters, state: &mut StateVector, scratch: &StepScratch, dt: f64) {
        let c = &params.constants;
        let i = &scratch.currents;
        let flux = &scratch.fluxes;

        let sr_total_delta = dt * (c.volume_cytosol_uL / c.volume_sr_uL) * (flux.up - flux.rel - flux.leak);
        state.ca_sr_mM = rapid_buffer(state.ca_sr_mM, sr_total_delta, BUF_SR_TOTAL, BUF_SR_KD);

        let ca_current = i.ca_l + i.b_ca + i.pca - 2.0 * i.naca;
        let cyto_total_delta = dt
            * (flux.leak - flux.up + flux.rel
                + current_to_concentration_rate(ca_current, 2.0, c.volume_cytosol_uL, c));
        state.ca_i_mM = rapid_buffer(state.ca_i_mM, cyto_total_delta, BUF_C_TOTAL, BUF_C_KD);

        let na_current = i.na + i.b_na + 3.0 * i.nak + 3.0 * i.naca;
        state.na_i_mM += dt * current_to_concentration_rate(na_current, 1.0, c.volume_cytosol_uL, c);

        // The stimulus is carried by K+
        let k_current = i.k1 + i.to + i.kr + i.ks - 2.0 * i.nak + i.kp + i.k_ach + scratch.stimulus;
        state.k_i_mM += dt * current_to_concentration_rate(k_current, 1.0, c.volume_cytosol_uL, c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{compute_reversal_potentials, compute_step};

    #[test]
    fn test_resting_state_is_near_equilibrium() {
        let model = Tnnp;
        let params = model.baseline_parameters();
        let mut state = model.initial_state();
        let mut scratch = StepScratch::default();

        let v = state.v_mV;
        let total = compute_step(&params, &model, &mut state, &mut scratch, v, 0.02);
        assert!(total.abs() < 2.0, "total = {}", total);
    }

    #[test]
    fn test_ghk_limit_is_continuous() {
        let c = PhysicalConstants::default();
        let at_zero = Tnnp::ghk_calcium(0.0, 0.0002, 2.0, &c);
        let near = Tnnp::ghk_calcium(1e-4, 0.0002, 2.0, &c);
        assert!(at_zero.is_finite());
        assert!((at_zero - near).abs() / at_zero.abs() < 1e-3);
    }

    #[test]
    fn test_ca_gates_locked_when_depolarized() {
        let rate = GateRate { inf: 1.0, tau: 2.0 };
        // Would increase, but V is above the lock voltage
        assert_eq!(Tnnp::advance_ca_gate(0.5, rate, 0.0, 0.02), 0.5);
        // Below the lock voltage it relaxes normally
        assert!(Tnnp::advance_ca_gate(0.5, rate, -80.0, 0.02) > 0.5);
        // Decreasing is always allowed
        let closing = GateRate { inf: 0.0, tau: 2.0 };
        assert!(Tnnp::advance_ca_gate(0.5, closing, 0.0, 0.02) < 0.5);
    }

    #[test]
    fn test_slow_recovery_weight_blends_time_constant() {
        let model = Tnnp;
        let mut params = model.baseline_parameters();
        let state = model.initial_state();
        let mut scratch = StepScratch::default();

        model.rates(&params, &state, -60.0, &mut scratch);
        let fast = scratch.rates.s.tau;
        params.kinetics.to_slow_recovery_weight = 1.0;
        model.rates(&params, &state, -60.0, &mut scratch);
        let slow = scratch.rates.s.tau;
        assert!(slow > 10.0 * fast, "fast {} slow {}", fast, slow);
    }

    #[test]
    fn test_inactivation_shift_moves_half_point() {
        let model = Tnnp;
        let mut params = model.baseline_parameters();
        let state = model.initial_state();
        let mut scratch = StepScratch::default();

        params.kinetics.to_inactivation_shift_mV = -8.0;
        model.rates(&params, &state, -28.0, &mut scratch);
        assert!((scratch.rates.s.inf - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_acetylcholine_current_off_at_baseline() {
        let model = Tnnp;
        let mut params = model.baseline_parameters();
        let state = model.initial_state();
        let mut scratch = StepScratch::default();
        scratch.reversal = compute_reversal_potentials(&params, &state);

        model.compute(&params, &state, -20.0, &mut scratch);
        assert_eq!(scratch.currents.k_ach, 0.0);

        params.conductances.k_ach.g = 0.05;
        model.compute(&params, &state, -20.0, &mut scratch);
        // Outward at -20 mV
        assert!(scratch.currents.k_ach > 0.0);
    }

    #[test]
    fn test_homeostasis_conserves_resting_concentrations() {
        let model = Tnnp;
        let params = model.baseline_parameters();
        let mut state = model.initial_state();
        let mut scratch = StepScratch::default();

        for _ in 0..100 {
            let v = state.v_mV;
            let total = compute_step(&params, &model, &mut state, &mut scratch, v, 0.02);
            model.homeostasis(&params, &mut state, &scratch, 0.02);
            state.v_mV -= 0.02 * total;
        }
        assert!((state.na_i_mM - 11.6).abs() < 0.01);
        assert!((state.k_i_mM - 138.3).abs() < 0.01);
        assert!(state.ca_i_mM > 0.0 && state.ca_i_mM < 0.001);
        assert!(state.ca_sr_mM > 0.1 && state.ca_sr_mM < 0.5);
    }
}
