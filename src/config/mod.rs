//! Configuration: the parameter record and the run settings that feed it.

mod parameters;
mod simulation;

pub use parameters::{
    Conductance, Conductances, ConstantParam, Current, KineticModifiers, KineticParam,
    Parameters, PhysicalConstants, Proportions, Selectors, StimulusParameters,
};
pub use simulation::{GradientConfig, SimulationConfig};
