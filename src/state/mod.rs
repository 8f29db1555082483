//! State of a simulated cell.
//!
//! Contains the persistent state vector (voltage, gates, concentrations) and
//! the per-step scratch record derived from it.

mod cell;
mod scratch;

pub use cell::StateVector;
pub use scratch::{Currents, Fluxes, GateRate, GateRates, ReversalPotentials, StepScratch};
