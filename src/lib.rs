//! Cardiac Cell Kernel - single-cell ionic model execution engine
//!
//! Shared machinery for ODE models of cardiac myocytes: Rush-Larsen gate
//! integration, reversal potentials, layered parameter modulation, S1/S2
//! pacing, and beat-by-beat action potential and Ca transient measurement.
//! Individual models plug in through [`models::IonicModel`].

// Allow non-snake-case for unit suffixes in field names (mV, mM, uF, etc.)
// This follows the project convention of including units in names.
#![allow(non_snake_case)]

pub mod config;
pub mod error;
pub mod kernel;
pub mod logging;
pub mod measurement;
pub mod models;
pub mod modulation;
pub mod pacing;
pub mod simulation;
pub mod state;

pub use config::{Parameters, SimulationConfig};
pub use error::{ConfigError, Error, Result};
pub use kernel::compute_step;
pub use measurement::{BeatMeasurement, BeatSummary, ExcitationState};
pub use models::{IonicModel, ModelFamily, ModelId, ModelRegistry};
pub use modulation::{compose, ComposedParameters};
pub use pacing::StimulusProtocol;
pub use simulation::{CellPopulation, CellSimulation};
pub use state::{StateVector, StepScratch};
