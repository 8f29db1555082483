//! One paced cell: model, frozen parameters, state, stimulus and measurement.
//!
//! Per step:
//! 1. `compute_step`: reversal potentials, rates, gates, currents
//! 2. stimulus for this step; an onset re-arms beat detection
//! 3. model homeostasis (concentrations)
//! 4. V -= dt · (I_ion + I_stim)
//! 5. measurement observes the new V, Ca and fluxes

use std::sync::Arc;

use crate::config::{Parameters, SimulationConfig};
use crate::error::Result;
use crate::kernel::compute_step;
use crate::measurement::{BeatMeasurement, BeatSummary, Sample};
use crate::models::{IonicModel, ModelRegistry};
use crate::modulation::{compose, compose_gradient, ComposedParameters};
use crate::pacing::StimulusProtocol;
use crate::state::{StateVector, StepScratch};

/// Timing settings resolved from the run configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProtocolTiming {
    pub dt_ms: f64,
    pub paced_duration_ms: f64,
    pub s2_duration_ms: f64,
    pub total_time_ms: f64,
}

impl ProtocolTiming {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            dt_ms: config.dt_ms,
            paced_duration_ms: config.paced_duration_ms(),
            s2_duration_ms: config.s2_duration_ms(),
            total_time_ms: config.total_time_ms(),
        }
    }
}

/// A single simulated myocyte
#[derive(Clone)]
pub struct CellSimulation {
    model: Arc<dyn IonicModel>,
    params: Arc<ComposedParameters>,
    state: StateVector,
    scratch: StepScratch,
    stimulus: StimulusProtocol,
    measurement: BeatMeasurement,
    timing: ProtocolTiming,
    step: u64,
}

/// Look up the model and compose its parameters for a configuration.
///
/// Every configuration error surfaces here, before any stepping.
pub fn prepare(config: &SimulationConfig, registry: &ModelRegistry) -> Result<(Arc<dyn IonicModel>, ComposedParameters)> {
    config.validate()?;
    let model = registry.get(&config.model)?;

    let mut base = model.baseline_parameters();
    config.apply_to(&mut base);

    let composed = match &config.gradient {
        Some(gradient) => compose_gradient(&base, model.as_ref(), gradient)?,
        None => compose(&base, model.as_ref())?,
    };
    Ok((model, composed))
}

impl CellSimulation {
    /// Build a cell from already-composed parameters, starting from the
    /// model's initial state.
    pub fn new(model: Arc<dyn IonicModel>, params: Arc<ComposedParameters>, config: &SimulationConfig) -> Self {
        let timing = ProtocolTiming::from_config(config);
        let state = model.initial_state();
        let stimulus = StimulusProtocol::setup(
            params.parameters(),
            timing.dt_ms,
            config.bcl_ms,
            config.s2_interval_ms,
            timing.paced_duration_ms,
        );
        let measurement = BeatMeasurement::new(model.excitation_thresholds(), config.apd_threshold_mV, state.v_mV);

        Self {
            model,
            params,
            state,
            scratch: StepScratch::default(),
            stimulus,
            measurement,
            timing,
            step: 0,
        }
    }

    /// Validate, compose and build in one go
    pub fn from_config(config: &SimulationConfig, registry: &ModelRegistry) -> Result<Self> {
        let (model, composed) = prepare(config, registry)?;
        Ok(Self::new(model, composed.into_shared(), config))
    }

    /// Replace the state vector, e.g. with one restored from disk
    pub fn with_state(mut self, state: StateVector) -> Self {
        self.measurement = BeatMeasurement::new(
            *self.measurement.thresholds(),
            self.measurement.apd_threshold_mV(),
            state.v_mV,
        );
        self.state = state;
        self
    }

    /// Advance one time step
    pub fn step(&mut self) {
        let params: &Parameters = self.params.parameters();
        let dt = self.timing.dt_ms;
        let vm = self.state.v_mV;
        let elapsed = self.time_ms();

        let i_ion = compute_step(params, self.model.as_ref(), &mut self.state, &mut self.scratch, vm, dt);

        let stim = self.stimulus.compute(
            params,
            self.timing.paced_duration_ms,
            self.timing.s2_duration_ms,
            elapsed,
            self.step,
        );
        if stim.onset {
            self.measurement.arm();
        }
        self.scratch.stimulus = stim.total();

        self.model.homeostasis(params, &mut self.state, &self.scratch, dt);
        self.state.v_mV = vm - dt * (i_ion + stim.total());

        self.step += 1;
        let sample = Sample {
            v_mV: self.state.v_mV,
            ca_i_mM: self.state.ca_i_mM,
            ca_sr_mM: self.state.ca_sr_mM,
            j_up: self.scratch.fluxes.up,
            j_rel: self.scratch.fluxes.rel,
        };
        let now = self.time_ms();
        if self.measurement.observe(now, dt, sample) {
            log::trace!("Excitation at {:.2} ms", now);
        }
    }

    /// Advance by `duration_ms`
    pub fn run_for(&mut self, duration_ms: f64) {
        let steps = (duration_ms / self.timing.dt_ms).round() as u64;
        for _ in 0..steps {
            self.step();
        }
    }

    /// Run the whole configured protocol
    pub fn run(&mut self) {
        let remaining = self.timing.total_time_ms - self.time_ms();
        if remaining > 0.0 {
            self.run_for(remaining);
        }
    }

    /// Elapsed time (ms)
    pub fn time_ms(&self) -> f64 {
        self.step as f64 * self.timing.dt_ms
    }

    pub fn steps_taken(&self) -> u64 {
        self.step
    }

    pub fn state(&self) -> &StateVector {
        &self.state
    }

    pub fn scratch(&self) -> &StepScratch {
        &self.scratch
    }

    pub fn parameters(&self) -> &ComposedParameters {
        &self.params
    }

    pub fn model(&self) -> &dyn IonicModel {
        self.model.as_ref()
    }

    pub fn measurement(&self) -> &BeatMeasurement {
        &self.measurement
    }

    /// Completed beats plus the one in progress
    pub fn beats(&self) -> impl DoubleEndedIterator<Item = &BeatSummary> + '_ {
        self.measurement.beats()
    }

    pub fn timing(&self) -> &ProtocolTiming {
        &self.timing
    }
}
