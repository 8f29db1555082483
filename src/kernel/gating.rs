//! Gating-variable integration.
//!
//! Implements the Rush-Larsen exponential update for first-order relaxation
//! variables `dy/dt = (y_ss - y) / tau`. With `y_ss` and `tau` held constant
//! over the step the update is the exact solution, so it stays stable no
//! matter how small `tau` is relative to `dt`.
//!
//! Reference: Rush S, Larsen H. IEEE Trans Biomed Eng. 1978;25:389-392

use crate::state::GateRate;

/// Advance `y` by `dt` towards `y_ss` with time constant `tau`.
///
/// `tau` must be positive and finite; rate functions guarantee this.
#[inline]
pub fn rush_larsen(y: f64, y_ss: f64, tau: f64, dt: f64) -> f64 {
    y_ss - (y_ss - y) * (-dt / tau).exp()
}

/// [`rush_larsen`] with a steady state and time constant bundled together
#[inline]
pub fn advance(y: f64, rate: GateRate, dt: f64) -> f64 {
    rush_larsen(y, rate.inf, rate.tau, dt)
}

/// Boltzmann steady-state curve `1 / (1 + exp((V - V_half) / k))`.
///
/// Positive `k` decreases with voltage (inactivation), negative `k` increases
/// with voltage (activation).
#[inline]
pub fn sigmoid(v: f64, v_half: f64, k: f64) -> f64 {
    1.0 / (1.0 + ((v - v_half) / k).exp())
}
