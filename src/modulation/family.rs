//! Modifiers shared by every model of a family.
//!
//! Human ventricular celltypes are derived from the epicardial baseline:
//! ENDO has a small, slowly recovering Ito; M has a small IKs.

use super::{Adjustment, AppliedEffect, Category, Handler, HandlerContext, ParameterEdit};
use crate::config::{Current, KineticParam};
use crate::models::ModelFamily;

pub(super) fn handler(family: ModelFamily, category: Category) -> Option<Handler> {
    match (family, category) {
        (ModelFamily::HumanVentricular, Category::Celltype) => Some(human_celltype),
        (ModelFamily::HumanVentricular, Category::Autonomic) => Some(human_autonomic),
        (ModelFamily::HumanVentricular, Category::Remodelling) => Some(human_remodelling),
        (ModelFamily::HumanVentricular, Category::Mutation) => Some(human_mutation),
        (ModelFamily::GuineaPigVentricular, Category::Autonomic) => Some(guinea_pig_autonomic),
        _ => None,
    }
}

/// Epicardial and endocardial Ito conductance (nS/pF)
const GTO_EPI: f64 = 0.294;
const GTO_ENDO: f64 = 0.073;
/// Epicardial and midmyocardial IKs conductance (nS/pF)
const GKS_EPI: f64 = 0.245;
const GKS_M: f64 = 0.062;

fn human_celltype(ctx: &HandlerContext) -> Option<AppliedEffect> {
    let edits = match ctx.name {
        "EPI" => Vec::new(),
        "ENDO" => vec![
            ParameterEdit::scale(Current::To, GTO_ENDO / GTO_EPI),
            ParameterEdit::kinetic(KineticParam::ToInactivationShift, Adjustment::Shift(-8.0)),
            ParameterEdit::kinetic(KineticParam::ToSlowRecoveryWeight, Adjustment::Shift(1.0)),
        ],
        "M" => vec![ParameterEdit::scale(Current::Ks, GKS_M / GKS_EPI)],
        _ => return None,
    };
    Some(ctx.effect(edits))
}

fn human_autonomic(ctx: &HandlerContext) -> Option<AppliedEffect> {
    let edits = match ctx.name {
        "ISO" => vec![
            ParameterEdit::scale(Current::CaL, 2.0),
            ParameterEdit::kinetic(KineticParam::CaLActivationShift, Adjustment::Shift(-5.0)),
            ParameterEdit::scale(Current::Ks, 2.0),
            ParameterEdit::scale(Current::Up, 1.5),
            ParameterEdit::scale(Current::NaK, 1.2),
        ],
        _ => return None,
    };
    Some(ctx.effect(edits))
}

fn human_remodelling(ctx: &HandlerContext) -> Option<AppliedEffect> {
    let edits = match ctx.name {
        // Heart failure
        "HF" => vec![
            ParameterEdit::scale(Current::To, 0.6),
            ParameterEdit::scale(Current::K1, 0.75),
            ParameterEdit::scale(Current::NaCa, 1.6),
            ParameterEdit::scale(Current::Up, 0.6),
            ParameterEdit::scale(Current::NaK, 0.9),
        ],
        _ => return None,
    };
    Some(ctx.effect(edits))
}

fn human_mutation(ctx: &HandlerContext) -> Option<AppliedEffect> {
    let edits = match ctx.name {
        // hERG gain of function (short QT 1)
        "SQT1" => vec![
            ParameterEdit::scale(Current::Kr, 2.0),
            ParameterEdit::kinetic(KineticParam::KrActivationShift, Adjustment::Shift(-10.0)),
        ],
        _ => return None,
    };
    Some(ctx.effect(edits))
}

fn guinea_pig_autonomic(ctx: &HandlerContext) -> Option<AppliedEffect> {
    let edits = match ctx.name {
        "ISO" => vec![
            ParameterEdit::scale(Current::CaL, 2.0),
            ParameterEdit::scale(Current::Ks, 2.0),
        ],
        _ => return None,
    };
    Some(ctx.effect(edits))
}
