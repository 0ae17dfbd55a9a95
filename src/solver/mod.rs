//! Binary integer programs and the backends that solve them.

mod branch_bound;
#[cfg(feature = "cp-sat")]
mod cp_sat_backend;

use std::ops::Add;

pub use branch_bound::BranchAndBound;
#[cfg(feature = "cp-sat")]
pub use cp_sat_backend::CpSatSolver;

use crate::config::{SolverBackend, SolverConfig};
use crate::error::SolverError;

/// Handle to a 0/1 variable of a [`BinaryProgram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoolVar(usize);

impl BoolVar {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Integer-weighted sum of variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(usize, i64)>,
}

impl LinearExpr {
    pub fn terms(&self) -> &[(usize, i64)] {
        &self.terms
    }
}

impl From<BoolVar> for LinearExpr {
    fn from(var: BoolVar) -> Self {
        Self {
            terms: vec![(var.0, 1)],
        }
    }
}

impl FromIterator<(i64, BoolVar)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (i64, BoolVar)>>(iter: I) -> Self {
        Self {
            terms: iter
                .into_iter()
                .filter(|(coef, _)| *coef != 0)
                .map(|(coef, var)| (var.0, coef))
                .collect(),
        }
    }
}

impl Add for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: LinearExpr) -> LinearExpr {
        self.terms.extend(rhs.terms);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Eq,
    Le,
    Ge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub expr: LinearExpr,
    pub sense: Sense,
    pub rhs: i64,
}

impl LinearConstraint {
    pub fn is_satisfied(&self, values: &[bool]) -> bool {
        let activity: i64 = self
            .expr
            .terms
            .iter()
            .filter(|(var, _)| values[*var])
            .map(|(_, coef)| coef)
            .sum();
        match self.sense {
            Sense::Eq => activity == self.rhs,
            Sense::Le => activity <= self.rhs,
            Sense::Ge => activity >= self.rhs,
        }
    }
}

/// Maximization program over binary variables with integer constraint rows.
#[derive(Debug, Clone, Default)]
pub struct BinaryProgram {
    names: Vec<String>,
    objective: Vec<f64>,
    constraints: Vec<LinearConstraint>,
}

impl BinaryProgram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_bool_var_with_name(&mut self, name: impl Into<String>) -> BoolVar {
        self.names.push(name.into());
        self.objective.push(0.0);
        BoolVar(self.names.len() - 1)
    }

    pub fn add_eq(&mut self, expr: impl Into<LinearExpr>, rhs: i64) {
        self.add_constraint(expr.into(), Sense::Eq, rhs);
    }

    pub fn add_le(&mut self, expr: impl Into<LinearExpr>, rhs: i64) {
        self.add_constraint(expr.into(), Sense::Le, rhs);
    }

    pub fn add_ge(&mut self, expr: impl Into<LinearExpr>, rhs: i64) {
        self.add_constraint(expr.into(), Sense::Ge, rhs);
    }

    fn add_constraint(&mut self, expr: LinearExpr, sense: Sense, rhs: i64) {
        self.constraints.push(LinearConstraint { expr, sense, rhs });
    }

    /// Replaces the objective; variables not named get coefficient zero.
    pub fn maximize(&mut self, terms: impl IntoIterator<Item = (f64, BoolVar)>) {
        self.objective.iter_mut().for_each(|c| *c = 0.0);
        for (coef, var) in terms {
            if let Some(slot) = self.objective.get_mut(var.0) {
                *slot += coef;
            }
        }
    }

    pub fn num_vars(&self) -> usize {
        self.names.len()
    }

    pub fn var_name(&self, var: usize) -> &str {
        &self.names[var]
    }

    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn objective_value(&self, values: &[bool]) -> f64 {
        self.objective
            .iter()
            .zip(values)
            .filter(|(_, on)| **on)
            .map(|(coef, _)| coef)
            .sum()
    }

    /// Structural checks every backend runs before searching.
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.names.is_empty() {
            return Err(SolverError::InvalidModel("program has no variables".to_string()));
        }
        if let Some(var) = self.objective.iter().position(|c| !c.is_finite()) {
            return Err(SolverError::InvalidModel(format!(
                "objective coefficient of `{}` is not finite",
                self.names[var]
            )));
        }
        for (row, constraint) in self.constraints.iter().enumerate() {
            if let Some((var, _)) = constraint
                .expr
                .terms
                .iter()
                .find(|(var, _)| *var >= self.names.len())
            {
                return Err(SolverError::InvalidModel(format!(
                    "constraint {row} references unknown variable {var}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    /// The time limit expired before optimality was proven.
    TimedOut,
}

#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolveStatus,
    /// Variable values; only meaningful when `status` is `Optimal`.
    pub values: Vec<bool>,
    pub objective: f64,
    /// Search nodes (branch and bound) or branches (CP-SAT) explored.
    pub nodes: u64,
}

pub trait ProgramSolver {
    fn solve(&self, program: &BinaryProgram) -> Result<Solution, SolverError>;
}

impl<S: ProgramSolver + ?Sized> ProgramSolver for Box<S> {
    fn solve(&self, program: &BinaryProgram) -> Result<Solution, SolverError> {
        (**self).solve(program)
    }
}

impl<S: ProgramSolver + ?Sized> ProgramSolver for &S {
    fn solve(&self, program: &BinaryProgram) -> Result<Solution, SolverError> {
        (**self).solve(program)
    }
}

pub fn build_solver(config: &SolverConfig) -> Result<Box<dyn ProgramSolver>, SolverError> {
    match config.backend {
        SolverBackend::BranchAndBound => Ok(Box::new(BranchAndBound::from_config(config))),
        #[cfg(feature = "cp-sat")]
        SolverBackend::CpSat => Ok(Box::new(CpSatSolver::from_config(config))),
        #[cfg(not(feature = "cp-sat"))]
        SolverBackend::CpSat => Err(SolverError::BackendUnavailable("cp_sat")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expressions_drop_zero_coefficients() {
        let mut program = BinaryProgram::new();
        let a = program.new_bool_var_with_name("a");
        let b = program.new_bool_var_with_name("b");
        let expr: LinearExpr = [(0, a), (3, b)].into_iter().collect();

        assert_eq!(expr.terms(), &[(1, 3)]);
    }

    #[test]
    fn constraint_satisfaction_checks_each_sense() {
        let mut program = BinaryProgram::new();
        let a = program.new_bool_var_with_name("a");
        let b = program.new_bool_var_with_name("b");
        program.add_eq(LinearExpr::from(a) + LinearExpr::from(b), 1);
        program.add_le([(5, a), (7, b)].into_iter().collect::<LinearExpr>(), 6);
        program.add_ge(LinearExpr::from(b), 1);

        let rows = program.constraints();
        assert!(rows[0].is_satisfied(&[true, false]));
        assert!(!rows[0].is_satisfied(&[true, true]));
        assert!(rows[1].is_satisfied(&[true, false]));
        assert!(!rows[1].is_satisfied(&[false, true]));
        assert!(rows[2].is_satisfied(&[false, true]));
    }

    #[test]
    fn validate_rejects_broken_programs() {
        assert!(matches!(
            BinaryProgram::new().validate(),
            Err(SolverError::InvalidModel(_))
        ));

        let mut program = BinaryProgram::new();
        let a = program.new_bool_var_with_name("a");
        program.maximize([(f64::INFINITY, a)]);
        assert!(program.validate().is_err());

        let mut program = BinaryProgram::new();
        program.new_bool_var_with_name("a");
        program.add_le(LinearExpr::from(BoolVar(4)), 1);
        assert!(program.validate().is_err());
    }

    #[test]
    fn any_valid_time_limit_builds_a_solver() {
        let mut config = crate::config::OptimizerConfig::default();
        config.solver.time_limit_secs = Some(1e20);
        assert!(config.validate().is_ok());

        let solver = build_solver(&config.solver).unwrap();
        let mut program = BinaryProgram::new();
        let a = program.new_bool_var_with_name("a");
        program.add_le(LinearExpr::from(a), 1);
        program.maximize([(3.0, a)]);
        let solution = solver.solve(&program).unwrap();
        assert_eq!(solution.status, SolveStatus::Optimal);
        assert_eq!(solution.values, vec![true]);
    }

    #[cfg(not(feature = "cp-sat"))]
    #[test]
    fn cp_sat_backend_requires_feature() {
        let config = SolverConfig {
            backend: SolverBackend::CpSat,
            ..SolverConfig::default()
        };
        assert!(matches!(
            build_solver(&config),
            Err(SolverError::BackendUnavailable("cp_sat"))
        ));
    }
}
