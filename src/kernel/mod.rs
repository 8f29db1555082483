//! Numerical kernel shared by every cell model.
//!
//! - Gating-variable integration (Rush-Larsen) and the Boltzmann curve
//! - Reversal potentials (Nernst)
//! - Concentration-balance helpers used by model homeostasis
//! - [`compute_step`], the fixed per-step call sequence

pub mod gating;
pub mod homeostasis;
pub mod reversal;

pub use gating::{advance, rush_larsen, sigmoid};
pub use homeostasis::{current_to_concentration_rate, forward_euler, rapid_buffer};
pub use reversal::{compute_reversal_potentials, mixed_k_na, nernst};

use crate::config::Parameters;
use crate::models::IonicModel;
use crate::state::{StateVector, StepScratch};

/// Advance gates and evaluate currents for one step.
///
/// Order: reversal potentials, model rates, gate integration, model currents.
/// The scratch record is overwritten. Returns the total ionic current.
pub fn compute_step(
    params: &Parameters,
    model: &dyn IonicModel,
    state: &mut StateVector,
    scratch: &mut StepScratch,
    vm: f64,
    dt: f64,
) -> f64 {
    scratch.reversal = compute_reversal_potentials(params, state);
    model.rates(params, state, vm, scratch);
    model.update(state, scratch, vm, dt);
    let total = model.compute(params, state, vm, scratch);
    scratch.currents.total = total;
    total
}
