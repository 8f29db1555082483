//! Persistent state vector of one cell.
//!
//! The state vector is the only quantity advanced through time and the only
//! one written to or restored from saved-state files. Fields are the union of
//! what the registered models use; a model leaves foreign fields untouched.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Membrane voltage, gates, and concentrations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateVector {
    /// Membrane voltage (mV)
    pub v_mV: f64,

    // Sodium channel gates
    pub m: f64,
    pub h: f64,
    pub j: f64,

    // L-type calcium channel gates
    pub d: f64,
    pub f: f64,
    pub f_ca: f64,

    /// SR release gate
    pub g: f64,

    /// Combined delayed rectifier activation
    pub x: f64,
    /// Rapid delayed rectifier activation / inactivation
    pub xr1: f64,
    pub xr2: f64,
    /// Slow delayed rectifier activation
    pub xs: f64,

    // Transient outward gates
    pub r: f64,
    pub s: f64,

    /// Cytosolic free Ca2+ (mM)
    pub ca_i_mM: f64,
    /// SR free Ca2+ (mM)
    pub ca_sr_mM: f64,
    /// Cytosolic Na+ (mM)
    pub na_i_mM: f64,
    /// Cytosolic K+ (mM)
    pub k_i_mM: f64,
}

impl Default for StateVector {
    fn default() -> Self {
        Self {
            v_mV: -86.2,
            m: 0.0,
            h: 0.75,
            j: 0.75,
            d: 0.0,
            f: 1.0,
            f_ca: 1.0,
            g: 1.0,
            x: 0.0,
            xr1: 0.0,
            xr2: 1.0,
            xs: 0.0,
            r: 0.0,
            s: 1.0,
            ca_i_mM: 0.0002,
            ca_sr_mM: 0.2,
            na_i_mM: 11.6,
            k_i_mM: 138.3,
        }
    }
}

impl StateVector {
    /// Write every field as JSON
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("State saved: {}", path.as_ref().display());
        Ok(())
    }

    /// Restore a state written by [`StateVector::save_json`]
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let state = serde_json::from_str(&contents)?;
        log::info!("State restored: {}", path.as_ref().display());
        Ok(state)
    }
}
