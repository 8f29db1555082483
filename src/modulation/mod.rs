//! Modulation composition engine.
//!
//! Turns a model's baseline parameters plus the requested modifiers
//! (celltype, beta-adrenergic, drug, remodelling, mutation, cholinergic, and
//! an optional spatial gradient) into one frozen parameter record.
//!
//! Handlers are organised in three tiers:
//! - global: apply to every model ([`global`])
//! - family: shared by models of one [`ModelFamily`] ([`family`])
//! - model: specific to one [`ModelId`] ([`specific`])
//!
//! Every handler is a pure function returning `Some(effect)` if it recognises
//! the requested name. Tiers are consulted in a fixed order and the first
//! `Some` for a category wins. A requested category nobody handles is a
//! configuration error, raised before any stepping.
//!
//! Adjustments are applied linearly in the category's proportion `p`:
//!
//! | Adjustment       | Current target          | Kinetic / constant target |
//! |------------------|-------------------------|---------------------------|
//! | `ScaleBy(f)`     | `G *= 1 + p (f - 1)`    | `x *= 1 + p (f - 1)`      |
//! | `SetBaseline(v)` | `g += p (v - g)`        | `x += p (v - x)`          |
//! | `Shift(d)`       | `g += p d`              | `x += p d`                |
//!
//! `ScaleBy` edits commute; `SetBaseline` discards whatever baseline was
//! there before, so its result depends on the order of application.

pub mod family;
pub mod global;
mod gradient;
pub mod specific;

pub use gradient::compose_gradient;

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::Serialize;

use crate::config::{ConstantParam, Current, KineticParam, Parameters};
use crate::error::ConfigError;
use crate::models::{IonicModel, ModelFamily, ModelId};

/// How a parameter is changed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Adjustment {
    /// Multiply the cumulative scale (or the value, for non-current targets)
    ScaleBy(f64),
    /// Overwrite the baseline
    SetBaseline(f64),
    /// Add to the baseline
    Shift(f64),
}

/// What a parameter edit touches
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ParamTarget {
    Current(Current),
    Kinetic(KineticParam),
    Constant(ConstantParam),
}

/// One adjustment of one parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterEdit {
    pub target: ParamTarget,
    pub adjustment: Adjustment,
}

impl ParameterEdit {
    pub fn scale(current: Current, factor: f64) -> Self {
        Self {
            target: ParamTarget::Current(current),
            adjustment: Adjustment::ScaleBy(factor),
        }
    }

    pub fn set_baseline(current: Current, value: f64) -> Self {
        Self {
            target: ParamTarget::Current(current),
            adjustment: Adjustment::SetBaseline(value),
        }
    }

    pub fn kinetic(param: KineticParam, adjustment: Adjustment) -> Self {
        Self {
            target: ParamTarget::Kinetic(param),
            adjustment,
        }
    }

    pub fn constant(param: ConstantParam, adjustment: Adjustment) -> Self {
        Self {
            target: ParamTarget::Constant(param),
            adjustment,
        }
    }

    /// Apply with proportion `p`
    pub fn apply(&self, params: &mut Parameters, p: f64) {
        match self.target {
            ParamTarget::Current(current) => {
                let slot = params.conductances.get_mut(current);
                match self.adjustment {
                    Adjustment::ScaleBy(f) => slot.G *= 1.0 + p * (f - 1.0),
                    Adjustment::SetBaseline(v) => slot.g += p * (v - slot.g),
                    Adjustment::Shift(d) => slot.g += p * d,
                }
            }
            ParamTarget::Kinetic(param) => adjust_value(params.kinetics.get_mut(param), self.adjustment, p),
            ParamTarget::Constant(param) => adjust_value(params.constant_mut(param), self.adjustment, p),
        }
    }
}

fn adjust_value(x: &mut f64, adjustment: Adjustment, p: f64) {
    match adjustment {
        Adjustment::ScaleBy(f) => *x *= 1.0 + p * (f - 1.0),
        Adjustment::SetBaseline(v) => *x += p * (v - *x),
        Adjustment::Shift(d) => *x += p * d,
    }
}

/// Modifier categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Celltype,
    /// Beta-adrenergic stimulation (ISO)
    Autonomic,
    Drug,
    Remodelling,
    Mutation,
    /// Acetylcholine
    Cholinergic,
    Gradient,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Celltype => "celltype",
            Category::Autonomic => "ISO model",
            Category::Drug => "agent",
            Category::Remodelling => "remodelling",
            Category::Mutation => "mutation",
            Category::Cholinergic => "ACh model",
            Category::Gradient => "gradient",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a handler lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tier {
    Global,
    Family,
    Model,
}

/// Record of one applied modifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedEffect {
    pub category: Category,
    pub tier: Tier,
    pub name: String,
    pub proportion: f64,
    pub edits: Vec<ParameterEdit>,
}

impl AppliedEffect {
    pub fn apply(&self, params: &mut Parameters) {
        for edit in &self.edits {
            edit.apply(params, self.proportion);
        }
    }
}

/// Input to a handler
#[derive(Debug, Clone, Copy)]
pub struct HandlerContext<'a> {
    pub model: ModelId,
    pub family: ModelFamily,
    pub category: Category,
    pub tier: Tier,
    /// Requested modifier name
    pub name: &'a str,
    pub proportion: f64,
}

impl HandlerContext<'_> {
    /// Wrap edits into an effect for this request
    pub fn effect(&self, edits: Vec<ParameterEdit>) -> AppliedEffect {
        AppliedEffect {
            category: self.category,
            tier: self.tier,
            name: self.name.to_string(),
            proportion: self.proportion,
            edits,
        }
    }
}

/// A modifier handler: `Some` if it recognises `ctx.name`
pub type Handler = fn(&HandlerContext) -> Option<AppliedEffect>;

/// Orchestration order, applied exactly once per configured cell
pub const COMPOSITION_ORDER: [(Tier, Category); 13] = [
    (Tier::Global, Category::Drug),
    (Tier::Global, Category::Remodelling),
    (Tier::Global, Category::Autonomic),
    (Tier::Family, Category::Celltype),
    (Tier::Family, Category::Autonomic),
    (Tier::Family, Category::Remodelling),
    (Tier::Family, Category::Mutation),
    (Tier::Model, Category::Celltype),
    (Tier::Model, Category::Autonomic),
    (Tier::Model, Category::Drug),
    (Tier::Model, Category::Remodelling),
    (Tier::Model, Category::Mutation),
    (Tier::Model, Category::Cholinergic),
];

/// A requested modifier
#[derive(Debug, Clone, PartialEq)]
struct Request {
    category: Category,
    name: String,
    proportion: f64,
}

/// Categories requested by the selectors. Zero proportions and missing names
/// are inactive.
fn active_requests(params: &Parameters) -> Vec<Request> {
    let s = &params.selectors;
    let p = &params.proportions;
    let named = |category, name: &Option<String>, proportion: f64| {
        name.as_ref()
            .filter(|_| proportion > 0.0)
            .map(|name| Request {
                category,
                name: name.clone(),
                proportion,
            })
    };

    [
        named(Category::Celltype, &s.celltype, 1.0),
        named(Category::Autonomic, &Some(s.iso_model.clone()), p.iso),
        named(Category::Drug, &s.agent, p.drug),
        named(Category::Remodelling, &s.remodelling, p.remodelling),
        named(Category::Mutation, &s.mutation, 1.0),
        named(Category::Cholinergic, &Some(s.ach_model.clone()), p.ach),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn lookup(tier: Tier, model: ModelId, family: ModelFamily, category: Category) -> Option<Handler> {
    match tier {
        Tier::Global => global::handler(category),
        Tier::Family => family::handler(family, category),
        Tier::Model => specific::handler(model, category),
    }
}

fn check_proportions(params: &Parameters) -> Result<(), ConfigError> {
    let p = &params.proportions;
    for (what, value) in [
        ("iso", p.iso),
        ("ach", p.ach),
        ("drug", p.drug),
        ("remodelling", p.remodelling),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::InvalidProportion {
                what: what.to_string(),
                value,
            });
        }
    }
    Ok(())
}

/// Parameters after composition. Read-only from here on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedParameters {
    params: Parameters,
    applied: Vec<AppliedEffect>,
}

impl ComposedParameters {
    pub(crate) fn from_parts(params: Parameters, applied: Vec<AppliedEffect>) -> Self {
        Self { params, applied }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Every applied effect, in application order
    pub fn applied(&self) -> &[AppliedEffect] {
        &self.applied
    }

    /// Whether a modifier of this category was applied
    pub fn was_applied(&self, category: Category) -> bool {
        self.applied.iter().any(|e| e.category == category)
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Deref for ComposedParameters {
    type Target = Parameters;

    fn deref(&self) -> &Parameters {
        &self.params
    }
}

/// Apply every requested modifier to `base` for `model`.
///
/// `base` is normally the model's baseline with selectors and proportions
/// filled in. Fails on the first requested category no tier recognises.
pub fn compose(base: &Parameters, model: &dyn IonicModel) -> Result<ComposedParameters, ConfigError> {
    check_proportions(base)?;

    let (model_id, family) = (model.id(), model.family());
    let requests = active_requests(base);
    let mut handled = vec![false; requests.len()];
    let mut params = base.clone();
    let mut applied = Vec::new();

    for (tier, category) in COMPOSITION_ORDER {
        let Some(index) = requests.iter().position(|r| r.category == category) else {
            continue;
        };
        if handled[index] {
            continue;
        }
        let Some(handler) = lookup(tier, model_id, family, category) else {
            continue;
        };

        let request = &requests[index];
        let ctx = HandlerContext {
            model: model_id,
            family,
            category,
            tier,
            name: &request.name,
            proportion: request.proportion,
        };
        if let Some(effect) = handler(&ctx) {
            log::debug!(
                "Applied {} '{}' ({:?} tier, p = {}): {} edits",
                category,
                effect.name,
                tier,
                effect.proportion,
                effect.edits.len()
            );
            effect.apply(&mut params);
            applied.push(effect);
            handled[index] = true;
        }
    }

    if let Some(request) = requests.iter().zip(&handled).find(|(_, done)| !**done).map(|(r, _)| r) {
        return Err(ConfigError::UnrecognizedModifier {
            category: request.category.label().to_string(),
            name: request.name.clone(),
            model: model_id.to_string(),
        });
    }

    log::info!("Composed parameters for {}: {} modifiers applied", model_id, applied.len());
    Ok(ComposedParameters::from_parts(params, applied))
}
