//! Modifiers that apply to every model.
//!
//! Drug block is expressed as the fraction of each current that remains
//! (`ScaleBy`). Models ignore currents they do not implement.

use super::{Adjustment, AppliedEffect, Category, Handler, HandlerContext, ParameterEdit};
use crate::config::{ConstantParam, Current};

pub(super) fn handler(category: Category) -> Option<Handler> {
    match category {
        Category::Drug => Some(drug),
        Category::Remodelling => Some(remodelling),
        Category::Autonomic => Some(autonomic),
        _ => None,
    }
}

/// Names of the drugs defined for every model
pub const DRUGS: [&str; 7] = [
    "DOFETILIDE",
    "QUINIDINE",
    "NIFEDIPINE",
    "LIDOCAINE",
    "RANOLAZINE",
    "CHROMANOL",
    "4AP",
];

fn drug(ctx: &HandlerContext) -> Option<AppliedEffect> {
    use Current::*;
    let edits = match ctx.name {
        "DOFETILIDE" => vec![ParameterEdit::scale(Kr, 0.3)],
        "QUINIDINE" => vec![
            ParameterEdit::scale(Na, 0.6),
            ParameterEdit::scale(Kr, 0.3),
            ParameterEdit::scale(To, 0.7),
        ],
        "NIFEDIPINE" => vec![ParameterEdit::scale(CaL, 0.5)],
        "LIDOCAINE" => vec![ParameterEdit::scale(Na, 0.7)],
        "RANOLAZINE" => vec![ParameterEdit::scale(Na, 0.9), ParameterEdit::scale(Kr, 0.6)],
        "CHROMANOL" => vec![ParameterEdit::scale(Ks, 0.3)],
        "4AP" => vec![ParameterEdit::scale(To, 0.3)],
        _ => return None,
    };
    Some(ctx.effect(edits))
}

fn remodelling(ctx: &HandlerContext) -> Option<AppliedEffect> {
    let edits = match ctx.name {
        // Acute ischaemia: Na and Ca channel depression, extracellular K+ accumulation
        "ISCHAEMIA" => vec![
            ParameterEdit::scale(Current::Na, 0.75),
            ParameterEdit::scale(Current::CaL, 0.75),
            ParameterEdit::constant(ConstantParam::KOut, Adjustment::Shift(4.0)),
        ],
        _ => return None,
    };
    Some(ctx.effect(edits))
}

fn autonomic(ctx: &HandlerContext) -> Option<AppliedEffect> {
    let edits = match ctx.name {
        "ISO_GENERIC" => vec![
            ParameterEdit::scale(Current::CaL, 1.5),
            ParameterEdit::scale(Current::Ks, 1.5),
        ],
        _ => return None,
    };
    Some(ctx.effect(edits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ModelFamily, ModelId};
    use crate::modulation::Tier;

    fn ctx(category: Category, name: &str) -> HandlerContext<'_> {
        HandlerContext {
            model: ModelId::Tnnp,
            family: ModelFamily::HumanVentricular,
            category,
            tier: Tier::Global,
            name,
            proportion: 1.0,
        }
    }

    #[test]
    fn test_every_listed_drug_is_handled() {
        for name in DRUGS {
            assert!(drug(&ctx(Category::Drug, name)).is_some(), "{}", name);
        }
        assert!(drug(&ctx(Category::Drug, "ASPIRIN")).is_none());
    }

    #[test]
    fn test_no_global_celltype_handler() {
        assert!(handler(Category::Celltype).is_none());
        assert!(handler(Category::Cholinergic).is_none());
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert!(drug(&ctx(Category::Drug, "dofetilide")).is_none());
    }
}
