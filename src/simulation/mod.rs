//! Driving cells through a pacing protocol.

mod cell;
mod population;

pub use cell::{prepare, CellSimulation, ProtocolTiming};
pub use population::CellPopulation;
