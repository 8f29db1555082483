//! Pacing protocol.

mod stimulus;

pub use stimulus::{StimulusOutput, StimulusProtocol};
