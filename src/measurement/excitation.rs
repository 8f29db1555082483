//! Excitation detection and per-beat measurement.
//!
//! Two states: repolarized (initial) and excited. Crossing above the upstroke
//! threshold starts a new beat: the finished beat is snapshotted as
//! "previous", every extremum is reset to a sentinel that the first real
//! sample overwrites, and all APD latches are cleared. Falling below the reset
//! threshold returns to repolarized.
//!
//! Every step also tracks dV/dt, voltage and Ca extrema, latches APD at a fixed
//! threshold and at 10 %..90 % repolarization of `Vmax - Vmin_prev`, and
//! integrates the SR uptake/release fluxes.

use serde::{Deserialize, Serialize};

/// Repolarization percentages measured every beat
pub const APD_PERCENTAGES: [u32; 9] = [10, 20, 30, 40, 50, 60, 70, 80, 90];

const V_MAX_SENTINEL: f64 = -1.0e9;
const V_MIN_SENTINEL: f64 = 1.0e9;
const DVDT_SENTINEL: f64 = -1.0e9;
const CA_MAX_SENTINEL: f64 = 0.0;
const CA_MIN_SENTINEL: f64 = 1.0;
const CA_SR_MAX_SENTINEL: f64 = 0.0;
const CA_SR_MIN_SENTINEL: f64 = 1.0e9;

/// Excitation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ExcitationState {
    #[default]
    Repolarized,
    Excited,
}

/// Voltage thresholds of the excitation state machine (mV)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExcitationThresholds {
    /// Crossing above this starts a beat
    pub upstroke_mV: f64,
    /// Falling below this re-arms detection
    pub reset_mV: f64,
}

impl Default for ExcitationThresholds {
    fn default() -> Self {
        Self {
            upstroke_mV: -30.0,
            reset_mV: -45.0,
        }
    }
}

impl ExcitationThresholds {
    /// Lower reset threshold for models whose final repolarization is slow
    pub fn slow_repolarization() -> Self {
        Self {
            upstroke_mV: -30.0,
            reset_mV: -65.0,
        }
    }
}

/// One observation fed to the measurement machine
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sample {
    pub v_mV: f64,
    pub ca_i_mM: f64,
    pub ca_sr_mM: f64,
    /// SERCA uptake flux (mM/ms)
    pub j_up: f64,
    /// SR release flux (mM/ms)
    pub j_rel: f64,
}

/// Statistics of one beat
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BeatSummary {
    /// Time of the upstroke crossing (ms)
    pub excitation_time_ms: f64,
    pub v_max_mV: f64,
    pub v_min_mV: f64,
    pub dvdt_max: f64,
    pub ca_max_mM: f64,
    pub ca_min_mM: f64,
    pub ca_sr_max_mM: f64,
    pub ca_sr_min_mM: f64,
    /// APD at the fixed threshold (ms)
    pub apd_ms: Option<f64>,
    /// APD10..APD90 (ms)
    pub apd_percent_ms: [Option<f64>; 9],
    /// ∫ Jup dt over the beat (mM)
    pub serca_integral: f64,
    /// ∫ Jrel dt over the beat (mM)
    pub release_integral: f64,
}

impl BeatSummary {
    fn sentinel(excitation_time_ms: f64) -> Self {
        Self {
            excitation_time_ms,
            v_max_mV: V_MAX_SENTINEL,
            v_min_mV: V_MIN_SENTINEL,
            dvdt_max: DVDT_SENTINEL,
            ca_max_mM: CA_MAX_SENTINEL,
            ca_min_mM: CA_MIN_SENTINEL,
            ca_sr_max_mM: CA_SR_MAX_SENTINEL,
            ca_sr_min_mM: CA_SR_MIN_SENTINEL,
            apd_ms: None,
            apd_percent_ms: [None; 9],
            serca_integral: 0.0,
            release_integral: 0.0,
        }
    }

    /// APD at `percent` repolarization, if latched
    pub fn apd_percent(&self, percent: u32) -> Option<f64> {
        APD_PERCENTAGES
            .iter()
            .position(|&p| p == percent)
            .and_then(|i| self.apd_percent_ms[i])
    }

    /// Amplitude of the Ca transient (mM)
    pub fn ca_amplitude_mM(&self) -> f64 {
        self.ca_max_mM - self.ca_min_mM
    }
}

/// Excitation state machine with its per-beat measurement memory
#[derive(Debug, Clone)]
pub struct BeatMeasurement {
    thresholds: ExcitationThresholds,
    apd_threshold_mV: f64,
    state: ExcitationState,
    /// True once the current beat has excited
    beat_started: bool,
    current: BeatSummary,
    previous: BeatSummary,
    history: Vec<BeatSummary>,
    v_prev_mV: f64,
    dvdt: f64,
}

impl BeatMeasurement {
    /// Start in the repolarized state at resting voltage `v_rest_mV`
    pub fn new(thresholds: ExcitationThresholds, apd_threshold_mV: f64, v_rest_mV: f64) -> Self {
        let mut current = BeatSummary::sentinel(0.0);
        // Pre-first-beat diastole provides the first Vmin_prev
        current.v_min_mV = v_rest_mV;
        Self {
            thresholds,
            apd_threshold_mV,
            state: ExcitationState::Repolarized,
            beat_started: false,
            current,
            previous: current,
            history: Vec::new(),
            v_prev_mV: v_rest_mV,
            dvdt: 0.0,
        }
    }

    /// Return to the repolarized state so the next upstroke starts a new beat,
    /// even if voltage never fell below the reset threshold.
    pub fn arm(&mut self) {
        self.state = ExcitationState::Repolarized;
    }

    /// Feed one step. Returns true when this sample started a new beat.
    pub fn observe(&mut self, time_ms: f64, dt: f64, sample: Sample) -> bool {
        let v = sample.v_mV;
        self.dvdt = (v - self.v_prev_mV) / dt;
        self.v_prev_mV = v;

        let mut excited_now = false;
        match self.state {
            ExcitationState::Repolarized if v > self.thresholds.upstroke_mV => {
                self.excite(time_ms);
                excited_now = true;
            }
            ExcitationState::Excited if v < self.thresholds.reset_mV => {
                self.state = ExcitationState::Repolarized;
            }
            _ => {}
        }

        let beat = &mut self.current;
        beat.dvdt_max = beat.dvdt_max.max(self.dvdt);
        beat.v_max_mV = beat.v_max_mV.max(v);
        if self.dvdt <= 0.0 {
            beat.v_min_mV = beat.v_min_mV.min(v);
        }
        beat.ca_max_mM = beat.ca_max_mM.max(sample.ca_i_mM);
        beat.ca_min_mM = beat.ca_min_mM.min(sample.ca_i_mM);
        beat.ca_sr_max_mM = beat.ca_sr_max_mM.max(sample.ca_sr_mM);
        beat.ca_sr_min_mM = beat.ca_sr_min_mM.min(sample.ca_sr_mM);

        beat.serca_integral += dt * sample.j_up;
        beat.release_integral += dt * sample.j_rel;

        if self.beat_started {
            self.latch_apds(time_ms, v);
        }

        excited_now
    }

    fn excite(&mut self, time_ms: f64) {
        if self.beat_started {
            self.history.push(self.current);
        }
        self.previous = self.current;
        self.current = BeatSummary::sentinel(time_ms);
        self.state = ExcitationState::Excited;
        self.beat_started = true;
    }

    fn latch_apds(&mut self, time_ms: f64, v: f64) {
        let beat = &mut self.current;
        let elapsed = time_ms - beat.excitation_time_ms;

        if beat.apd_ms.is_none() && v < self.apd_threshold_mV {
            beat.apd_ms = Some(elapsed);
        }

        let amplitude = beat.v_max_mV - self.previous.v_min_mV;
        if amplitude <= 0.0 {
            return;
        }
        for (slot, percent) in beat.apd_percent_ms.iter_mut().zip(APD_PERCENTAGES) {
            if slot.is_none() && v < beat.v_max_mV - amplitude * percent as f64 / 100.0 {
                *slot = Some(elapsed);
            }
        }
    }

    pub fn state(&self) -> ExcitationState {
        self.state
    }

    pub fn thresholds(&self) -> &ExcitationThresholds {
        &self.thresholds
    }

    /// Fixed APD threshold (mV)
    pub fn apd_threshold_mV(&self) -> f64 {
        self.apd_threshold_mV
    }

    /// Statistics of the beat in progress
    pub fn current(&self) -> &BeatSummary {
        &self.current
    }

    /// Statistics of the last completed beat
    pub fn previous(&self) -> &BeatSummary {
        &self.previous
    }

    /// Every completed beat, oldest first
    pub fn history(&self) -> &[BeatSummary] {
        &self.history
    }

    /// Completed beats plus the one in progress, if any
    pub fn beats(&self) -> impl DoubleEndedIterator<Item = &BeatSummary> + '_ {
        self.history
            .iter()
            .chain(self.beat_started.then_some(&self.current))
    }

    /// The beat in progress, once any beat has started
    pub fn latest(&self) -> Option<&BeatSummary> {
        self.beat_started.then_some(&self.current)
    }

    /// Latest dV/dt (mV/ms)
    pub fn dvdt(&self) -> f64 {
        self.dvdt
    }
}
