//! Shared state for one round of model building.
use crate::config::ContestConfig;
use crate::players::CandidatePool;
use crate::selection::Selection;
use crate::solver::{BinaryProgram, BoolVar, LinearExpr};

use super::{
    add_distinct_constraints, add_exclusion_constraints, add_roster_constraints,
    add_salary_constraints,
};

/// Decision variables, laid out like a [`Selection`]: captains, then flex.
#[derive(Debug, Clone)]
pub struct LineupVars {
    pub captains: Vec<BoolVar>,
    pub flex: Vec<BoolVar>,
}

impl LineupVars {
    pub fn position(&self, position: usize) -> BoolVar {
        if position < self.captains.len() {
            self.captains[position]
        } else {
            self.flex[position - self.captains.len()]
        }
    }
}

pub struct ModelBuilderContext<'a> {
    pub model: BinaryProgram,
    pub vars: LineupVars,
    pub pool: &'a CandidatePool,
    pub contest: &'a ContestConfig,
    /// Lineups found in earlier rounds.
    pub accepted: &'a [Selection],
}

impl<'a> ModelBuilderContext<'a> {
    pub fn new(
        pool: &'a CandidatePool,
        contest: &'a ContestConfig,
        accepted: &'a [Selection],
    ) -> Self {
        let mut model = BinaryProgram::new();
        let captains = (0..pool.captains().len())
            .map(|i| model.new_bool_var_with_name(format!("cpt_{i}")))
            .collect();
        let flex = (0..pool.flex().len())
            .map(|i| model.new_bool_var_with_name(format!("flex_{i}")))
            .collect();
        Self {
            model,
            vars: LineupVars { captains, flex },
            pool,
            contest,
            accepted,
        }
    }

    /// Total salary of the selected candidates.
    pub fn salary_expr(&self) -> LinearExpr {
        let captains = self
            .pool
            .captains()
            .iter()
            .zip(&self.vars.captains)
            .map(|(c, var)| (c.salary as i64, *var));
        let flex = self
            .pool
            .flex()
            .iter()
            .zip(&self.vars.flex)
            .map(|(c, var)| (c.salary as i64, *var));
        captains.chain(flex).collect()
    }

    fn set_objective(&mut self) {
        let captains = self
            .pool
            .captains()
            .iter()
            .zip(&self.vars.captains)
            .map(|(c, var)| (c.effective_score, *var));
        let flex = self
            .pool
            .flex()
            .iter()
            .zip(&self.vars.flex)
            .map(|(c, var)| (c.effective_score, *var));
        let terms: Vec<(f64, BoolVar)> = captains.chain(flex).collect();
        self.model.maximize(terms);
    }
}

/// Runs every constraint family over the context and sets the objective.
pub fn build_model_pipeline(mut ctx: ModelBuilderContext<'_>) -> BinaryProgram {
    add_roster_constraints(&mut ctx);
    add_salary_constraints(&mut ctx);
    add_exclusion_constraints(&mut ctx);
    add_distinct_constraints(&mut ctx);
    ctx.set_objective();
    ctx.model
}

/// The program whose feasible region is every valid lineup not yet in `accepted`.
pub fn build_program(
    pool: &CandidatePool,
    contest: &ContestConfig,
    accepted: &[Selection],
) -> BinaryProgram {
    build_model_pipeline(ModelBuilderContext::new(pool, contest, accepted))
}
