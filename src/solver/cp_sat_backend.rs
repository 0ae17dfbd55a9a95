//! OR-Tools CP-SAT backend. Needs the `cp-sat` feature and a local OR-Tools install.

use cp_sat::builder::{BoolVar, CpModelBuilder, LinearExpr};
use cp_sat::proto::{CpSolverStatus, SatParameters};

use super::{BinaryProgram, ProgramSolver, Sense, Solution, SolveStatus};
use crate::config::SolverConfig;
use crate::error::SolverError;

/// CP-SAT only takes integer objectives.
const OBJECTIVE_SCALE: f64 = 10_000.0;

/// A feasible but unproven answer counts as a time-out: only proven optima become lineups.
fn map_status(status: CpSolverStatus, info: &str) -> Result<SolveStatus, SolverError> {
    match status {
        CpSolverStatus::Optimal => Ok(SolveStatus::Optimal),
        CpSolverStatus::Infeasible => Ok(SolveStatus::Infeasible),
        CpSolverStatus::Feasible | CpSolverStatus::Unknown => Ok(SolveStatus::TimedOut),
        CpSolverStatus::ModelInvalid => Err(SolverError::Backend(format!(
            "CP-SAT rejected the model: {info}"
        ))),
    }
}

#[derive(Debug, Clone)]
pub struct CpSatSolver {
    time_limit_secs: Option<f64>,
    num_workers: i32,
    random_seed: i32,
}

impl CpSatSolver {
    pub fn from_config(config: &SolverConfig) -> Self {
        Self {
            time_limit_secs: config.time_limit_secs,
            num_workers: config.num_workers,
            random_seed: config.random_seed,
        }
    }

    fn parameters(&self) -> SatParameters {
        let mut params = SatParameters::default();
        params.max_time_in_seconds = self.time_limit_secs;
        params.num_search_workers = Some(self.num_workers);
        params.random_seed = Some(self.random_seed);
        params.log_search_progress = Some(false);
        params
    }
}

impl ProgramSolver for CpSatSolver {
    fn solve(&self, program: &BinaryProgram) -> Result<Solution, SolverError> {
        program.validate()?;

        let mut model = CpModelBuilder::default();
        let vars: Vec<BoolVar> = (0..program.num_vars())
            .map(|var| model.new_bool_var_with_name(program.var_name(var)))
            .collect();

        let expr = |terms: &[(usize, i64)]| -> LinearExpr {
            terms
                .iter()
                .map(|&(var, coef)| (coef, vars[var].clone()))
                .collect()
        };

        for constraint in program.constraints() {
            let lhs = expr(constraint.expr.terms());
            let rhs = LinearExpr::from(constraint.rhs);
            match constraint.sense {
                Sense::Eq => model.add_eq(lhs, rhs),
                Sense::Le => model.add_le(lhs, rhs),
                Sense::Ge => model.add_ge(lhs, rhs),
            };
        }

        let objective: LinearExpr = program
            .objective()
            .iter()
            .enumerate()
            .map(|(var, score)| ((score * OBJECTIVE_SCALE).round() as i64, vars[var].clone()))
            .collect();
        model.maximize(objective);

        let response = model.solve_with_parameters(&self.parameters());
        let status = map_status(response.status(), &response.solution_info)?;

        let values: Vec<bool> = match status {
            SolveStatus::Optimal => vars.iter().map(|v| v.solution_value(&response)).collect(),
            _ => Vec::new(),
        };
        let objective = if values.is_empty() {
            0.0
        } else {
            program.objective_value(&values)
        };

        Ok(Solution {
            status,
            values,
            objective,
            nodes: response.num_branches.max(0) as u64,
        })
    }
}
