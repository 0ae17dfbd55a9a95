//! Forbids reproducing any previously accepted lineup.
use super::model_context::ModelBuilderContext;
use crate::solver::LinearExpr;

/// Each accepted lineup `L` adds `sum(var[k] for k in L) <= roster_size - 1`: the next lineup
/// must change at least one slot. Overlap of all but one player is still allowed.
pub fn add_distinct_constraints(ctx: &mut ModelBuilderContext<'_>) {
    let limit = ctx.contest.roster_size() as i64 - 1;
    for lineup in ctx.accepted {
        let row: LinearExpr = lineup
            .positions()
            .map(|position| (1, ctx.vars.position(position)))
            .collect();
        ctx.model.add_le(row, limit);
    }
}
