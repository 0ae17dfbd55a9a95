//! Roster-size rows: exactly `captain_slots` captains and `flex_slots` flex players.
use super::model_context::ModelBuilderContext;
use crate::solver::LinearExpr;

pub fn add_roster_constraints(ctx: &mut ModelBuilderContext<'_>) {
    let captains: LinearExpr = ctx.vars.captains.iter().map(|v| (1, *v)).collect();
    let flex: LinearExpr = ctx.vars.flex.iter().map(|v| (1, *v)).collect();
    ctx.model.add_eq(captains, ctx.contest.captain_slots as i64);
    ctx.model.add_eq(flex, ctx.contest.flex_slots as i64);
}
