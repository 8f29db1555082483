//! Cell-model contract and the registry used for dispatch.
//!
//! A model supplies numerical data (rates, currents, concentration balances)
//! through [`IonicModel`]. The kernel calls it in a fixed order every step:
//! `rates` → `update` → `compute`, then `homeostasis` once the stimulus is
//! known. Models are stateless; everything that evolves lives in
//! [`StateVector`].

mod lr91;
mod tnnp;

pub use lr91::Lr91;
pub use tnnp::Tnnp;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::Parameters;
use crate::error::ConfigError;
use crate::measurement::ExcitationThresholds;
use crate::state::{StateVector, StepScratch};

/// Registered model identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelId {
    /// Luo-Rudy 1991 guinea-pig ventricular myocyte
    Lr91,
    /// ten Tusscher-Noble-Noble-Panfilov 2004 human ventricular myocyte
    Tnnp,
}

impl ModelId {
    pub const ALL: [ModelId; 2] = [ModelId::Lr91, ModelId::Tnnp];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::Lr91 => "LR91",
            ModelId::Tnnp => "TNNP",
        }
    }

    /// Exact, case-sensitive match
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == name)
            .ok_or_else(|| ConfigError::UnknownModel(name.to_string()))
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Groups of models that share modifier implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFamily {
    GuineaPigVentricular,
    HumanVentricular,
}

/// Contract every cell model implements
pub trait IonicModel: Send + Sync {
    fn id(&self) -> ModelId;

    fn family(&self) -> ModelFamily;

    /// Published baseline: constants, conductance baselines `g` (scales at 1)
    fn baseline_parameters(&self) -> Parameters;

    fn initial_state(&self) -> StateVector;

    fn excitation_thresholds(&self) -> ExcitationThresholds {
        ExcitationThresholds::default()
    }

    /// Fill steady states and time constants of every gate at voltage `vm`
    fn rates(&self, params: &Parameters, state: &StateVector, vm: f64, scratch: &mut StepScratch);

    /// Advance every gate by `dt` using the rates in `scratch`
    fn update(&self, state: &mut StateVector, scratch: &StepScratch, vm: f64, dt: f64);

    /// Evaluate currents and fluxes into `scratch`; returns the total ionic
    /// current. Magnitudes must be taken from [`crate::config::Conductance::effective`].
    fn compute(&self, params: &Parameters, state: &StateVector, vm: f64, scratch: &mut StepScratch) -> f64;

    /// Forward-Euler update of concentrations from the currents and fluxes of
    /// this step. `scratch.stimulus` holds the injected current.
    fn homeostasis(&self, params: &Parameters, state: &mut StateVector, scratch: &StepScratch, dt: f64);
}

/// Maps identifiers to model implementations. Built once at startup.
#[derive(Clone)]
pub struct ModelRegistry {
    models: HashMap<ModelId, Arc<dyn IonicModel>>,
}

impl ModelRegistry {
    pub fn empty() -> Self {
        Self {
            models: HashMap::new(),
        }
    }

    /// Registry holding every built-in model
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(Lr91));
        registry.register(Arc::new(Tnnp));
        registry
    }

    pub fn register(&mut self, model: Arc<dyn IonicModel>) {
        self.models.insert(model.id(), model);
    }

    /// Look up a model by its identifier string
    pub fn get(&self, name: &str) -> Result<Arc<dyn IonicModel>, ConfigError> {
        let id = ModelId::parse(name)?;
        self.models
            .get(&id)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownModel(name.to_string()))
    }

    /// Registered identifiers, sorted
    pub fn list_models(&self) -> Vec<&'static str> {
        let mut ids: Vec<ModelId> = self.models.keys().copied().collect();
        ids.sort();
        ids.into_iter().map(|id| id.as_str()).collect()
    }

    /// Help text for a model identifier
    pub fn help(name: &str) -> Option<&'static str> {
        match ModelId::parse(name).ok()? {
            ModelId::Lr91 => Some(
                "Luo-Rudy 1991 guinea-pig ventricular myocyte\n\
                 Celltypes: ENDO, EPI\n\
                 Fixed Na/K, dynamic intracellular Ca\n\
                 Reference: Luo CH, Rudy Y. Circ Res. 1991",
            ),
            ModelId::Tnnp => Some(
                "ten Tusscher 2004 human ventricular myocyte\n\
                 Celltypes: ENDO, EPI, M\n\
                 SR Ca release/uptake, dynamic Na/K/Ca, optional IKACh\n\
                 Reference: ten Tusscher KHWJ et al. Am J Physiol. 2004",
            ),
        }
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.list_models())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(ModelId::parse("TNNP").unwrap(), ModelId::Tnnp);
        assert_eq!(ModelId::parse("LR91").unwrap(), ModelId::Lr91);
        assert!(matches!(
            ModelId::parse("tnnp"),
            Err(ConfigError::UnknownModel(name)) if name == "tnnp"
        ));
        assert!(ModelId::parse("TNNP ").is_err());
    }

    #[test]
    fn test_registry_dispatch() {
        let registry = ModelRegistry::with_defaults();
        assert_eq!(registry.list_models(), vec!["LR91", "TNNP"]);

        let model = registry.get("TNNP").unwrap();
        assert_eq!(model.id(), ModelId::Tnnp);
        assert_eq!(model.family(), ModelFamily::HumanVentricular);

        let model = registry.get("LR91").unwrap();
        assert_eq!(model.family(), ModelFamily::GuineaPigVentricular);
    }

    #[test]
    fn test_unknown_model() {
        let registry = ModelRegistry::with_defaults();
        let err = registry.get("HRd").err().unwrap();
        assert_eq!(err.to_string(), "unknown model identifier 'HRd'");
    }

    #[test]
    fn test_empty_registry_rejects_known_id() {
        let registry = ModelRegistry::empty();
        assert!(registry.get("LR91").is_err());
    }

    #[test]
    fn test_help_text() {
        assert!(ModelRegistry::help("LR91").unwrap().contains("Luo-Rudy"));
        assert!(ModelRegistry::help("unknown").is_none());
    }
}
