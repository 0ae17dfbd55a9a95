//! Salary ceiling and floor, both inclusive.
use super::model_context::ModelBuilderContext;

/// A floor above the cap is left as is; the round just comes back infeasible.
pub fn add_salary_constraints(ctx: &mut ModelBuilderContext<'_>) {
    let salary = ctx.salary_expr();
    ctx.model.add_le(salary.clone(), ctx.contest.salary_cap as i64);
    ctx.model.add_ge(salary, ctx.contest.salary_min as i64);
}
