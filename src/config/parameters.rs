//! Parameter record shared by every component.
//!
//! Holds physical constants, per-current magnitudes (`g` baseline and `G`
//! cumulative scale), kinetic modifiers, categorical selectors and dose-like
//! proportions. A record is built from a model's baseline, altered once by
//! the modulation engine and then frozen for the whole run.

use serde::{Deserialize, Serialize};

/// Physical constants and compartment geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalConstants {
    /// Gas constant (mJ/(K·mol))
    pub gas_constant: f64,
    /// Temperature (K)
    pub temperature_K: f64,
    /// Faraday constant (C/mol)
    pub faraday: f64,
    /// Membrane capacitance (μF)
    pub membrane_capacitance_uF: f64,
    /// Cytosolic volume (μL)
    pub volume_cytosol_uL: f64,
    /// Sarcoplasmic reticulum volume (μL)
    pub volume_sr_uL: f64,
    /// Extracellular K+ (mM)
    pub k_out_mM: f64,
    /// Extracellular Na+ (mM)
    pub na_out_mM: f64,
    /// Extracellular Ca2+ (mM)
    pub ca_out_mM: f64,
    /// Na/K permeability ratio of the slow delayed rectifier
    pub p_kna: f64,
}

impl PhysicalConstants {
    /// RT/F in mV
    #[inline]
    pub fn rt_over_f(&self) -> f64 {
        self.gas_constant * self.temperature_K / self.faraday
    }
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            gas_constant: 8314.472,
            temperature_K: 310.0,
            faraday: 96485.3415,
            membrane_capacitance_uF: 0.185,
            volume_cytosol_uL: 0.016404,
            volume_sr_uL: 0.001094,
            k_out_mM: 5.4,
            na_out_mM: 140.0,
            ca_out_mM: 2.0,
            p_kna: 0.03,
        }
    }
}

/// Magnitude of one current or flux: baseline `g` and cumulative scale `G`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conductance {
    /// Baseline magnitude (model units)
    pub g: f64,
    /// Cumulative scale factor applied by modifiers
    pub G: f64,
}

impl Conductance {
    pub const fn new(g: f64) -> Self {
        Self { g, G: 1.0 }
    }

    /// Effective magnitude `g * G`
    #[inline]
    pub fn effective(&self) -> f64 {
        self.g * self.G
    }
}

impl Default for Conductance {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Identifies a current or flux carried in [`Conductances`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Current {
    /// Fast sodium current
    Na,
    /// L-type calcium current (slow inward current in older models)
    CaL,
    /// Transient outward K+ current
    To,
    /// Rapid delayed rectifier
    Kr,
    /// Slow delayed rectifier (or the combined delayed rectifier)
    Ks,
    /// Inward rectifier
    K1,
    /// Plateau K+ current
    Kp,
    /// Na+/K+ pump
    NaK,
    /// Na+/Ca2+ exchanger
    NaCa,
    /// Sarcolemmal Ca2+ pump
    PCa,
    /// Background Na+
    BNa,
    /// Background Ca2+
    BCa,
    /// Non-specific background current
    B,
    /// Acetylcholine-activated K+ current
    KACh,
    /// SR release flux
    Rel,
    /// SERCA uptake flux
    Up,
    /// SR leak flux
    Leak,
}

impl Current {
    pub const ALL: [Current; 17] = [
        Current::Na,
        Current::CaL,
        Current::To,
        Current::Kr,
        Current::Ks,
        Current::K1,
        Current::Kp,
        Current::NaK,
        Current::NaCa,
        Current::PCa,
        Current::BNa,
        Current::BCa,
        Current::B,
        Current::KACh,
        Current::Rel,
        Current::Up,
        Current::Leak,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Current::Na => "INa",
            Current::CaL => "ICaL",
            Current::To => "Ito",
            Current::Kr => "IKr",
            Current::Ks => "IKs",
            Current::K1 => "IK1",
            Current::Kp => "IKp",
            Current::NaK => "INaK",
            Current::NaCa => "INaCa",
            Current::PCa => "IpCa",
            Current::BNa => "IbNa",
            Current::BCa => "IbCa",
            Current::B => "Ib",
            Current::KACh => "IKACh",
            Current::Rel => "Jrel",
            Current::Up => "Jup",
            Current::Leak => "Jleak",
        }
    }
}

/// Per-current magnitudes. Models only read the currents they implement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Conductances {
    pub na: Conductance,
    pub ca_l: Conductance,
    pub to: Conductance,
    pub kr: Conductance,
    pub ks: Conductance,
    pub k1: Conductance,
    pub kp: Conductance,
    pub nak: Conductance,
    pub naca: Conductance,
    pub pca: Conductance,
    pub b_na: Conductance,
    pub b_ca: Conductance,
    pub b: Conductance,
    pub k_ach: Conductance,
    pub rel: Conductance,
    pub up: Conductance,
    pub leak: Conductance,
}

impl Conductances {
    pub fn get(&self, current: Current) -> &Conductance {
        match current {
            Current::Na => &self.na,
            Current::CaL => &self.ca_l,
            Current::To => &self.to,
            Current::Kr => &self.kr,
            Current::Ks => &self.ks,
            Current::K1 => &self.k1,
            Current::Kp => &self.kp,
            Current::NaK => &self.nak,
            Current::NaCa => &self.naca,
            Current::PCa => &self.pca,
            Current::BNa => &self.b_na,
            Current::BCa => &self.b_ca,
            Current::B => &self.b,
            Current::KACh => &self.k_ach,
            Current::Rel => &self.rel,
            Current::Up => &self.up,
            Current::Leak => &self.leak,
        }
    }

    pub fn get_mut(&mut self, current: Current) -> &mut Conductance {
        match current {
            Current::Na => &mut self.na,
            Current::CaL => &mut self.ca_l,
            Current::To => &mut self.to,
            Current::Kr => &mut self.kr,
            Current::Ks => &mut self.ks,
            Current::K1 => &mut self.k1,
            Current::Kp => &mut self.kp,
            Current::NaK => &mut self.nak,
            Current::NaCa => &mut self.naca,
            Current::PCa => &mut self.pca,
            Current::BNa => &mut self.b_na,
            Current::BCa => &mut self.b_ca,
            Current::B => &mut self.b,
            Current::KACh => &mut self.k_ach,
            Current::Rel => &mut self.rel,
            Current::Up => &mut self.up,
            Current::Leak => &mut self.leak,
        }
    }
}

/// Identifies a kinetic modifier in [`KineticModifiers`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KineticParam {
    NaActivationShift,
    NaInactivationShift,
    CaLActivationShift,
    CaLInactivationShift,
    KrActivationShift,
    KsActivationShift,
    ToInactivationShift,
    NaInactivationTauScale,
    CaLInactivationTauScale,
    KrTauScale,
    KsTauScale,
    ToSlowRecoveryWeight,
}

/// Voltage shifts (mV, default 0) and time-constant scales (default 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KineticModifiers {
    pub na_activation_shift_mV: f64,
    pub na_inactivation_shift_mV: f64,
    pub cal_activation_shift_mV: f64,
    pub cal_inactivation_shift_mV: f64,
    pub kr_activation_shift_mV: f64,
    pub ks_activation_shift_mV: f64,
    pub to_inactivation_shift_mV: f64,
    pub na_inactivation_tau_scale: f64,
    pub cal_inactivation_tau_scale: f64,
    pub kr_tau_scale: f64,
    pub ks_tau_scale: f64,
    /// Weight of the slow (endocardial-like) Ito recovery time course, 0..1
    pub to_slow_recovery_weight: f64,
}

impl Default for KineticModifiers {
    fn default() -> Self {
        Self {
            na_activation_shift_mV: 0.0,
            na_inactivation_shift_mV: 0.0,
            cal_activation_shift_mV: 0.0,
            cal_inactivation_shift_mV: 0.0,
            kr_activation_shift_mV: 0.0,
            ks_activation_shift_mV: 0.0,
            to_inactivation_shift_mV: 0.0,
            na_inactivation_tau_scale: 1.0,
            cal_inactivation_tau_scale: 1.0,
            kr_tau_scale: 1.0,
            ks_tau_scale: 1.0,
            to_slow_recovery_weight: 0.0,
        }
    }
}

impl KineticModifiers {
    pub fn get_mut(&mut self, param: KineticParam) -> &mut f64 {
        match param {
            KineticParam::NaActivationShift => &mut self.na_activation_shift_mV,
            KineticParam::NaInactivationShift => &mut self.na_inactivation_shift_mV,
            KineticParam::CaLActivationShift => &mut self.cal_activation_shift_mV,
            KineticParam::CaLInactivationShift => &mut self.cal_inactivation_shift_mV,
            KineticParam::KrActivationShift => &mut self.kr_activation_shift_mV,
            KineticParam::KsActivationShift => &mut self.ks_activation_shift_mV,
            KineticParam::ToInactivationShift => &mut self.to_inactivation_shift_mV,
            KineticParam::NaInactivationTauScale => &mut self.na_inactivation_tau_scale,
            KineticParam::CaLInactivationTauScale => &mut self.cal_inactivation_tau_scale,
            KineticParam::KrTauScale => &mut self.kr_tau_scale,
            KineticParam::KsTauScale => &mut self.ks_tau_scale,
            KineticParam::ToSlowRecoveryWeight => &mut self.to_slow_recovery_weight,
        }
    }
}

/// Identifies an environmental constant that modifiers may alter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstantParam {
    KOut,
    NaOut,
    CaOut,
}

/// Categorical selectors. `None` means the category was not requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selectors {
    /// Model identifier (exact match against the registry)
    pub model: String,
    pub celltype: Option<String>,
    pub agent: Option<String>,
    pub remodelling: Option<String>,
    pub mutation: Option<String>,
    /// Beta-adrenergic implementation name, used when `iso > 0`
    pub iso_model: String,
    /// Cholinergic implementation name, used when `ach > 0`
    pub ach_model: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            model: "TNNP".to_string(),
            celltype: None,
            agent: None,
            remodelling: None,
            mutation: None,
            iso_model: "ISO".to_string(),
            ach_model: "ACh".to_string(),
        }
    }
}

/// Dose-like proportions in [0, 1]; 0 = no effect, 1 = full published effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proportions {
    pub iso: f64,
    pub ach: f64,
    pub drug: f64,
    pub remodelling: f64,
}

impl Default for Proportions {
    fn default() -> Self {
        Self {
            iso: 0.0,
            ach: 0.0,
            drug: 0.0,
            remodelling: 1.0,
        }
    }
}

/// Injected stimulus settings (pA/pF, ms)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StimulusParameters {
    pub amplitude: f64,
    pub duration_ms: f64,
}

impl Default for StimulusParameters {
    fn default() -> Self {
        Self {
            amplitude: -52.0,
            duration_ms: 1.0,
        }
    }
}

/// Top-level parameter record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Parameters {
    pub constants: PhysicalConstants,
    pub conductances: Conductances,
    pub kinetics: KineticModifiers,
    pub selectors: Selectors,
    pub proportions: Proportions,
    pub stimulus: StimulusParameters,
}

impl Parameters {
    /// Mutable slot of an environmental constant
    pub fn constant_mut(&mut self, param: ConstantParam) -> &mut f64 {
        match param {
            ConstantParam::KOut => &mut self.constants.k_out_mM,
            ConstantParam::NaOut => &mut self.constants.na_out_mM,
            ConstantParam::CaOut => &mut self.constants.ca_out_mM,
        }
    }

    /// Linear blend of every numeric field: `(1 - p) * self + p * other`.
    ///
    /// Selectors and proportions are kept from `self`.
    pub fn blend(&self, other: &Parameters, p: f64) -> Parameters {
        let lerp = |a: f64, b: f64| a + p * (b - a);
        let mut out = self.clone();

        for current in Current::ALL {
            let a = self.conductances.get(current);
            let b = other.conductances.get(current);
            let slot = out.conductances.get_mut(current);
            slot.g = lerp(a.g, b.g);
            slot.G = lerp(a.G, b.G);
        }

        let (a, b) = (&self.kinetics, &other.kinetics);
        out.kinetics = KineticModifiers {
            na_activation_shift_mV: lerp(a.na_activation_shift_mV, b.na_activation_shift_mV),
            na_inactivation_shift_mV: lerp(a.na_inactivation_shift_mV, b.na_inactivation_shift_mV),
            cal_activation_shift_mV: lerp(a.cal_activation_shift_mV, b.cal_activation_shift_mV),
            cal_inactivation_shift_mV: lerp(a.cal_inactivation_shift_mV, b.cal_inactivation_shift_mV),
            kr_activation_shift_mV: lerp(a.kr_activation_shift_mV, b.kr_activation_shift_mV),
            ks_activation_shift_mV: lerp(a.ks_activation_shift_mV, b.ks_activation_shift_mV),
            to_inactivation_shift_mV: lerp(a.to_inactivation_shift_mV, b.to_inactivation_shift_mV),
            na_inactivation_tau_scale: lerp(a.na_inactivation_tau_scale, b.na_inactivation_tau_scale),
            cal_inactivation_tau_scale: lerp(a.cal_inactivation_tau_scale, b.cal_inactivation_tau_scale),
            kr_tau_scale: lerp(a.kr_tau_scale, b.kr_tau_scale),
            ks_tau_scale: lerp(a.ks_tau_scale, b.ks_tau_scale),
            to_slow_recovery_weight: lerp(a.to_slow_recovery_weight, b.to_slow_recovery_weight),
        };

        let (a, b) = (&self.constants, &other.constants);
        out.constants.k_out_mM = lerp(a.k_out_mM, b.k_out_mM);
        out.constants.na_out_mM = lerp(a.na_out_mM, b.na_out_mM);
        out.constants.ca_out_mM = lerp(a.ca_out_mM, b.ca_out_mM);

        out
    }
}
