//! Continuous spatial heterogeneity between two celltypes.
//!
//! Both endpoints are composed in full, then every numeric parameter is
//! blended linearly by the position-derived proportion. This runs after all
//! other categories. The endpoints replace the celltype, so a base that
//! already names one is rejected.

use super::{compose, AppliedEffect, Category, ComposedParameters, Tier};
use crate::config::{GradientConfig, Parameters};
use crate::error::ConfigError;
use crate::models::IonicModel;

/// Compose both gradient endpoints from `base` and blend them
pub fn compose_gradient(
    base: &Parameters,
    model: &dyn IonicModel,
    gradient: &GradientConfig,
) -> Result<ComposedParameters, ConfigError> {
    if !(0.0..=1.0).contains(&gradient.position) {
        return Err(ConfigError::InvalidProportion {
            what: "gradient".to_string(),
            value: gradient.position,
        });
    }

    if let Some(celltype) = &base.selectors.celltype {
        return Err(ConfigError::Conflict {
            first: format!("celltype '{}'", celltype),
            second: format!("gradient {}->{}", gradient.from_celltype, gradient.to_celltype),
        });
    }

    let endpoint = |celltype: &str| {
        let mut params = base.clone();
        params.selectors.celltype = Some(celltype.to_string());
        compose(&params, model)
    };
    let from = endpoint(&gradient.from_celltype)?;
    let to = endpoint(&gradient.to_celltype)?;

    let params = from.parameters().blend(to.parameters(), gradient.position);

    let mut applied = from.applied().to_vec();
    applied.extend(to.applied().iter().filter(|e| e.category == Category::Celltype).cloned());
    applied.push(AppliedEffect {
        category: Category::Gradient,
        tier: Tier::Global,
        name: format!("{}->{}", gradient.from_celltype, gradient.to_celltype),
        proportion: gradient.position,
        edits: Vec::new(),
    });

    log::info!(
        "Blended {} -> {} at position {}",
        gradient.from_celltype,
        gradient.to_celltype,
        gradient.position
    );
    Ok(ComposedParameters::from_parts(params, applied))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tnnp;

    fn gradient(position: f64) -> GradientConfig {
        GradientConfig {
            from_celltype: "ENDO".to_string(),
            to_celltype: "EPI".to_string(),
            position,
        }
    }

    #[test]
    fn test_endpoints_match_plain_composition() {
        let base = Tnnp.baseline_parameters();

        let mut endo = base.clone();
        endo.selectors.celltype = Some("ENDO".to_string());
        let endo = compose(&endo, &Tnnp).unwrap();

        let at_zero = compose_gradient(&base, &Tnnp, &gradient(0.0)).unwrap();
        assert_eq!(at_zero.conductances, endo.conductances);
        assert_eq!(at_zero.kinetics, endo.kinetics);
    }

    #[test]
    fn test_midpoint_blends_ito() {
        let base = Tnnp.baseline_parameters();
        let mid = compose_gradient(&base, &Tnnp, &gradient(0.5)).unwrap();
        let expected = 0.5 * (0.073 / 0.294 + 1.0);
        assert!((mid.conductances.to.G - expected).abs() < 1e-12);
        assert!((mid.kinetics.to_inactivation_shift_mV + 4.0).abs() < 1e-12);
        assert!(mid.was_applied(Category::Gradient));
    }

    #[test]
    fn test_fixed_celltype_conflicts_with_gradient() {
        let mut base = Tnnp.baseline_parameters();
        base.selectors.celltype = Some("M".to_string());
        let err = compose_gradient(&base, &Tnnp, &gradient(1.0)).unwrap_err();
        assert_eq!(err.to_string(), "celltype 'M' conflicts with gradient ENDO->EPI");
    }

    #[test]
    fn test_unknown_endpoint_fails() {
        let base = Tnnp.baseline_parameters();
        let bad = GradientConfig {
            from_celltype: "ENDO".to_string(),
            to_celltype: "ATRIAL".to_string(),
            position: 0.5,
        };
        assert!(matches!(
            compose_gradient(&base, &Tnnp, &bad),
            Err(ConfigError::UnrecognizedModifier { name, .. }) if name == "ATRIAL"
        ));
    }
}
