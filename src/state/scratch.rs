//! Per-step derived quantities.
//!
//! Everything here is rebuilt from the state vector and the parameter record
//! on every step. Per-beat statistics live in
//! [`crate::measurement::BeatMeasurement`], never here.

use serde::Serialize;

/// Nernst potentials for the current step (mV)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ReversalPotentials {
    pub e_na: f64,
    pub e_k: f64,
    /// Combined K/Na reversal of the slow delayed rectifier
    pub e_ks: f64,
    pub e_ca: f64,
}

/// Steady state and time constant (ms) of one gate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GateRate {
    pub inf: f64,
    pub tau: f64,
}

impl Default for GateRate {
    fn default() -> Self {
        Self { inf: 0.0, tau: 1.0 }
    }
}

impl GateRate {
    /// From Hodgkin-Huxley opening/closing rates (1/ms)
    #[inline]
    pub fn from_alpha_beta(alpha: f64, beta: f64) -> Self {
        let sum = alpha + beta;
        Self {
            inf: alpha / sum,
            tau: 1.0 / sum,
        }
    }
}

/// Rates populated by a model's `rates` function
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GateRates {
    pub m: GateRate,
    pub h: GateRate,
    pub j: GateRate,
    pub d: GateRate,
    pub f: GateRate,
    pub f_ca: GateRate,
    pub g: GateRate,
    pub x: GateRate,
    pub xr1: GateRate,
    pub xr2: GateRate,
    pub xs: GateRate,
    pub r: GateRate,
    pub s: GateRate,
}

/// Individual currents (pA/pF or μA/cm², per model)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Currents {
    pub na: f64,
    pub ca_l: f64,
    pub to: f64,
    pub kr: f64,
    pub ks: f64,
    pub k1: f64,
    pub kp: f64,
    pub nak: f64,
    pub naca: f64,
    pub pca: f64,
    pub b_na: f64,
    pub b_ca: f64,
    pub b: f64,
    pub k_ach: f64,
    /// Sum of every ionic current
    pub total: f64,
}

/// Intracellular Ca fluxes (mM/ms)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Fluxes {
    pub rel: f64,
    pub up: f64,
    pub leak: f64,
}

/// Everything one step derives
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StepScratch {
    pub reversal: ReversalPotentials,
    pub rates: GateRates,
    pub currents: Currents,
    pub fluxes: Fluxes,
    /// Injected stimulus for this step, seen by homeostasis
    pub stimulus: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_rate_from_alpha_beta() {
        let rate = GateRate::from_alpha_beta(3.0, 1.0);
        assert!((rate.inf - 0.75).abs() < 1e-12);
        assert!((rate.tau - 0.25).abs() < 1e-12);
    }
}
