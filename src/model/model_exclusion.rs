//! A player picked as captain may not also fill a flex slot.
use super::model_context::ModelBuilderContext;
use crate::solver::LinearExpr;

/// For every captain candidate `c`:
/// `flex_slots * cpt[c] + sum(flex[f] for f linked to c) <= flex_slots`.
/// At most `flex_slots` flex players are ever picked, so the row only binds when `c` captains.
pub fn add_exclusion_constraints(ctx: &mut ModelBuilderContext<'_>) {
    let flex_slots = ctx.contest.flex_slots as i64;
    for (c, captain) in ctx.vars.captains.iter().enumerate() {
        let linked = ctx
            .pool
            .linked_flex(c)
            .iter()
            .map(|&f| (1, ctx.vars.flex[f]));
        let row: LinearExpr = std::iter::once((flex_slots, *captain)).chain(linked).collect();
        ctx.model.add_le(row, flex_slots);
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ContestConfig;
    use crate::model::build_program;
    use crate::players::{CandidatePool, PlayerRecord, Role};
    use crate::solver::Sense;

    #[test]
    fn links_captain_to_its_flex_row() {
        let players = vec![
            PlayerRecord::new("A", "A", Role::Captain, 9000, Some(20.0)),
            PlayerRecord::new("B", "B", Role::Flex, 8000, Some(18.0)),
            PlayerRecord::new("A", "A flex", Role::Flex, 6000, Some(20.0)),
        ];
        let contest = ContestConfig {
            flex_slots: 1,
            ..ContestConfig::default()
        };
        let pool = CandidatePool::build(&players, &contest).unwrap();
        let program = build_program(&pool, &contest, &[]);

        let row = &program.constraints()[4];
        assert_eq!(row.sense, Sense::Le);
        assert_eq!(row.rhs, 1);
        // cpt_0 weighted by flex_slots, then flex_1 (A's flex row, variable 2).
        assert_eq!(row.expr.terms(), &[(0, 1), (2, 1)]);
        assert!(!row.is_satisfied(&[true, false, true]));
        assert!(row.is_satisfied(&[true, true, false]));
        assert!(row.is_satisfied(&[false, false, true]));
    }
}
