//! Run configuration: which model, which modifiers, and the pacing protocol.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::parameters::Parameters;
use crate::error::{ConfigError, Result};

/// Continuous blend between two celltype endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientConfig {
    /// Celltype at position 0
    pub from_celltype: String,
    /// Celltype at position 1
    pub to_celltype: String,
    /// Position-derived proportion in [0, 1]
    pub position: f64,
}

/// Settings for one simulated cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub model: String,
    pub celltype: Option<String>,
    pub agent: Option<String>,
    pub drug_proportion: f64,
    pub remodelling: Option<String>,
    pub remodelling_proportion: f64,
    pub mutation: Option<String>,
    pub iso: f64,
    pub iso_model: String,
    pub ach: f64,
    pub ach_model: String,
    pub gradient: Option<GradientConfig>,

    /// Integration step (ms)
    pub dt_ms: f64,
    /// S1 basic cycle length (ms)
    pub bcl_ms: f64,
    /// Number of S1 beats; the paced duration is `beats * bcl_ms`
    pub beats: u32,
    /// S2 coupling interval (ms); 0 disables S2
    pub s2_interval_ms: f64,
    /// Absolute time after which no S2 is delivered (ms)
    pub s2_cutoff_ms: Option<f64>,
    /// Overrides the model's stimulus amplitude (pA/pF)
    pub stim_amplitude: Option<f64>,
    /// Overrides the model's stimulus duration (ms)
    pub stim_duration_ms: Option<f64>,
    /// Fixed APD threshold (mV)
    pub apd_threshold_mV: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            model: "TNNP".to_string(),
            celltype: None,
            agent: None,
            drug_proportion: 0.0,
            remodelling: None,
            remodelling_proportion: 1.0,
            mutation: None,
            iso: 0.0,
            iso_model: "ISO".to_string(),
            ach: 0.0,
            ach_model: "ACh".to_string(),
            gradient: None,
            dt_ms: 0.02,
            bcl_ms: 1000.0,
            beats: 5,
            s2_interval_ms: 0.0,
            s2_cutoff_ms: None,
            stim_amplitude: None,
            stim_duration_ms: None,
            apd_threshold_mV: -70.0,
        }
    }
}

impl SimulationConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&contents)?;
        log::info!("Loaded simulation config from {:?}", path.as_ref());
        Ok(config)
    }

    /// Load from JSON file or return defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load simulation config: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Reject settings that would make the run meaningless
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        for (what, value) in [("dt_ms", self.dt_ms), ("bcl_ms", self.bcl_ms)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidTiming {
                    what: what.to_string(),
                    value,
                });
            }
        }
        if !(self.s2_interval_ms.is_finite() && self.s2_interval_ms >= 0.0) {
            return Err(ConfigError::InvalidTiming {
                what: "s2_interval_ms".to_string(),
                value: self.s2_interval_ms,
            });
        }

        let mut proportions = vec![
            ("drug", self.drug_proportion),
            ("remodelling", self.remodelling_proportion),
            ("iso", self.iso),
            ("ach", self.ach),
        ];
        if let Some(gradient) = &self.gradient {
            proportions.push(("gradient", gradient.position));
        }
        for (what, value) in proportions {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProportion {
                    what: what.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// Duration of the S1 train (ms)
    pub fn paced_duration_ms(&self) -> f64 {
        self.beats as f64 * self.bcl_ms
    }

    /// S2 cutoff, defaulting to one cycle length past the S1 train
    pub fn s2_duration_ms(&self) -> f64 {
        self.s2_cutoff_ms
            .unwrap_or_else(|| self.paced_duration_ms() + self.bcl_ms)
    }

    /// Total simulated time (ms)
    pub fn total_time_ms(&self) -> f64 {
        if self.s2_interval_ms > 0.0 {
            self.s2_duration_ms().max(self.paced_duration_ms())
        } else {
            self.paced_duration_ms()
        }
    }

    /// Copy selectors, proportions and stimulus overrides into a parameter record
    pub fn apply_to(&self, params: &mut Parameters) {
        params.selectors.model = self.model.clone();
        params.selectors.celltype = self.celltype.clone();
        params.selectors.agent = self.agent.clone();
        params.selectors.remodelling = self.remodelling.clone();
        params.selectors.mutation = self.mutation.clone();
        params.selectors.iso_model = self.iso_model.clone();
        params.selectors.ach_model = self.ach_model.clone();

        params.proportions.drug = self.drug_proportion;
        params.proportions.remodelling = self.remodelling_proportion;
        params.proportions.iso = self.iso;
        params.proportions.ach = self.ach;

        if let Some(amplitude) = self.stim_amplitude {
            params.stimulus.amplitude = amplitude;
        }
        if let Some(duration) = self.stim_duration_ms {
            params.stimulus.duration_ms = duration;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{ "model": "LR91", "bcl_ms": 500.0 }"#).unwrap();
        assert_eq!(config.model, "LR91");
        assert_eq!(config.bcl_ms, 500.0);
        assert_eq!(config.dt_ms, 0.02);
        assert!(config.celltype.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_timing() {
        let config = SimulationConfig {
            dt_ms: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTiming { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range_proportion() {
        let config = SimulationConfig {
            drug_proportion: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProportion { .. })
        ));
    }

    #[test]
    fn test_durations() {
        let config = SimulationConfig {
            bcl_ms: 800.0,
            beats: 10,
            s2_interval_ms: 300.0,
            ..Default::default()
        };
        assert_eq!(config.paced_duration_ms(), 8000.0);
        assert_eq!(config.s2_duration_ms(), 8800.0);
        assert_eq!(config.total_time_ms(), 8800.0);
    }

    #[test]
    fn test_apply_to_parameters() {
        let config = SimulationConfig {
            agent: Some("DOFETILIDE".to_string()),
            drug_proportion: 0.5,
            stim_amplitude: Some(-13.5),
            ..Default::default()
        };
        let mut params = Parameters::default();
        config.apply_to(&mut params);
        assert_eq!(params.selectors.agent.as_deref(), Some("DOFETILIDE"));
        assert_eq!(params.proportions.drug, 0.5);
        assert_eq!(params.stimulus.amplitude, -13.5);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = SimulationConfig::load_or_default("does/not/exist.json");
        assert_eq!(config, SimulationConfig::default());
    }
}
