//! S1/S2 stimulus protocol.
//!
//! All timing is done on integer step counts computed once at setup, so a
//! cycle length that is an exact multiple of `dt` fires on exactly the same
//! step of every cycle. Each train (S1, S2) is a small state machine: idle
//! until its firing condition holds, then active for `duration / dt` steps
//! with a countdown.

use serde::Serialize;

use crate::config::Parameters;

/// S2 trigger offset (steps) before the end of the S1 train
const S2_ALIGNMENT_STEPS: u64 = 5;

/// Stimulus delivered in one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StimulusOutput {
    /// S1 current (pA/pF)
    pub s1: f64,
    /// S2 current (pA/pF)
    pub s2: f64,
    /// A stimulus began on this step
    pub onset: bool,
}

impl StimulusOutput {
    #[inline]
    pub fn total(&self) -> f64 {
        self.s1 + self.s2
    }
}

/// Step counts and countdowns of the S1/S2 trains
#[derive(Debug, Clone, PartialEq)]
pub struct StimulusProtocol {
    bcl_steps: u64,
    s2_steps: Option<u64>,
    s1_end_step: u64,
    duration_steps: u64,
    s1_remaining: u64,
    s2_remaining: u64,
}

fn to_steps(duration_ms: f64, dt: f64) -> u64 {
    (duration_ms / dt).round().max(0.0) as u64
}

impl StimulusProtocol {
    /// Convert the protocol timings to step counts.
    ///
    /// `s2_interval_ms == 0` disables S2.
    pub fn setup(params: &Parameters, dt: f64, bcl_ms: f64, s2_interval_ms: f64, paced_duration_ms: f64) -> Self {
        let s2_steps = (s2_interval_ms > 0.0).then(|| to_steps(s2_interval_ms, dt).max(1));
        let protocol = Self {
            bcl_steps: to_steps(bcl_ms, dt).max(1),
            s2_steps,
            s1_end_step: to_steps(paced_duration_ms, dt),
            duration_steps: to_steps(params.stimulus.duration_ms, dt),
            s1_remaining: 0,
            s2_remaining: 0,
        };
        log::debug!(
            "Stimulus protocol: bcl {} steps, S2 {:?} steps, duration {} steps",
            protocol.bcl_steps,
            protocol.s2_steps,
            protocol.duration_steps
        );
        protocol
    }

    /// Stimulus for step `step` at time `elapsed_ms`.
    ///
    /// S1 fires every `bcl` while `elapsed < paced_duration`. S2 fires after
    /// the S1 train, every `s2_interval` counted from a fixed offset before the
    /// train's end, until `s2_duration`.
    pub fn compute(
        &mut self,
        params: &Parameters,
        paced_duration_ms: f64,
        s2_duration_ms: f64,
        elapsed_ms: f64,
        step: u64,
    ) -> StimulusOutput {
        let amplitude = params.stimulus.amplitude;
        let mut out = StimulusOutput::default();

        if step % self.bcl_steps == 0 && elapsed_ms < paced_duration_ms {
            self.s1_remaining = self.duration_steps;
            out.onset = true;
        }
        if self.s1_remaining > 0 {
            out.s1 = amplitude;
            self.s1_remaining -= 1;
        }

        if let Some(s2_steps) = self.s2_steps {
            let origin = self.s1_end_step.saturating_sub(S2_ALIGNMENT_STEPS);
            if elapsed_ms > paced_duration_ms
                && elapsed_ms < s2_duration_ms
                && step >= origin
                && (step - origin) % s2_steps == 0
            {
                self.s2_remaining = self.duration_steps;
                out.onset = true;
            }
        }
        if self.s2_remaining > 0 {
            out.s2 = amplitude;
            self.s2_remaining -= 1;
        }

        out
    }

    pub fn bcl_steps(&self) -> u64 {
        self.bcl_steps
    }

    pub fn duration_steps(&self) -> u64 {
        self.duration_steps
    }

    /// True while either train is delivering current
    pub fn is_active(&self) -> bool {
        self.s1_remaining > 0 || self.s2_remaining > 0
    }
}
