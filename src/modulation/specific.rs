//! Modifiers defined for a single model.

use super::{Adjustment, AppliedEffect, Category, Handler, HandlerContext, ParameterEdit};
use crate::config::{Current, KineticParam};
use crate::models::ModelId;

pub(super) fn handler(model: ModelId, category: Category) -> Option<Handler> {
    match (model, category) {
        (ModelId::Lr91, Category::Celltype) => Some(lr91_celltype),
        (ModelId::Lr91, Category::Drug) => Some(lr91_drug),
        (ModelId::Tnnp, Category::Drug) => Some(tnnp_drug),
        (ModelId::Tnnp, Category::Remodelling) => Some(tnnp_remodelling),
        (ModelId::Tnnp, Category::Mutation) => Some(tnnp_mutation),
        (ModelId::Tnnp, Category::Cholinergic) => Some(tnnp_cholinergic),
        _ => None,
    }
}

/// Transmural gradient of the delayed rectifier in guinea pig
fn lr91_celltype(ctx: &HandlerContext) -> Option<AppliedEffect> {
    let edits = match ctx.name {
        "ENDO" => vec![ParameterEdit::scale(Current::Ks, 0.8)],
        "EPI" => vec![ParameterEdit::scale(Current::Ks, 1.2)],
        _ => return None,
    };
    Some(ctx.effect(edits))
}

fn lr91_drug(ctx: &HandlerContext) -> Option<AppliedEffect> {
    let edits = match ctx.name {
        "VERAPAMIL" => vec![ParameterEdit::scale(Current::CaL, 0.5)],
        _ => return None,
    };
    Some(ctx.effect(edits))
}

fn tnnp_drug(ctx: &HandlerContext) -> Option<AppliedEffect> {
    let edits = match ctx.name {
        "E4031" => vec![ParameterEdit::scale(Current::Kr, 0.05)],
        _ => return None,
    };
    Some(ctx.effect(edits))
}

fn tnnp_remodelling(ctx: &HandlerContext) -> Option<AppliedEffect> {
    let edits = match ctx.name {
        "HYPERTROPHY" => vec![
            ParameterEdit::scale(Current::To, 0.5),
            ParameterEdit::scale(Current::Ks, 0.7),
            ParameterEdit::scale(Current::CaL, 1.2),
        ],
        _ => return None,
    };
    Some(ctx.effect(edits))
}

fn tnnp_mutation(ctx: &HandlerContext) -> Option<AppliedEffect> {
    let edits = match ctx.name {
        // KCNQ1 loss of function
        "LQT1" => vec![ParameterEdit::scale(Current::Ks, 0.5)],
        // hERG loss of function
        "LQT2" => vec![ParameterEdit::scale(Current::Kr, 0.5)],
        // Slowed Na inactivation
        "LQT3" => vec![
            ParameterEdit::kinetic(KineticParam::NaInactivationTauScale, Adjustment::ScaleBy(1.5)),
            ParameterEdit::kinetic(KineticParam::NaInactivationShift, Adjustment::Shift(5.0)),
        ],
        _ => return None,
    };
    Some(ctx.effect(edits))
}

fn tnnp_cholinergic(ctx: &HandlerContext) -> Option<AppliedEffect> {
    let edits = match ctx.name {
        "ACh" => vec![
            ParameterEdit::set_baseline(Current::KACh, 0.05),
            ParameterEdit::scale(Current::CaL, 0.9),
        ],
        _ => return None,
    };
    Some(ctx.effect(edits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_is_per_model() {
        assert!(handler(ModelId::Lr91, Category::Celltype).is_some());
        assert!(handler(ModelId::Tnnp, Category::Celltype).is_none());
        assert!(handler(ModelId::Lr91, Category::Cholinergic).is_none());
        assert!(handler(ModelId::Tnnp, Category::Cholinergic).is_some());
    }
}
