//! Beat detection and action-potential / Ca-transient measurement.

mod excitation;

pub use excitation::{
    BeatMeasurement, BeatSummary, ExcitationState, ExcitationThresholds, Sample, APD_PERCENTAGES,
};
