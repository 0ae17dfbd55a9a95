//! Exact depth-first branch and bound for binary programs.
//!
//! Variables are fixed in descending objective order, 1 before 0. Unit-coefficient `==`/`<=`
//! rows are treated as cardinality groups: they bound the objective (best free scores up to the
//! remaining capacity) and tighten the activity range of every other non-negative row, which is
//! what cuts the salary rows down to size.

use std::time::{Duration, Instant};

use tracing::trace;

use super::{BinaryProgram, ProgramSolver, Sense, Solution, SolveStatus};
use crate::config::SolverConfig;
use crate::error::SolverError;

const OBJECTIVE_EPSILON: f64 = 1e-9;
const CLOCK_CHECK_INTERVAL: u64 = 1024;

#[derive(Debug, Clone, Default)]
pub struct BranchAndBound {
    time_limit: Option<Duration>,
}

impl BranchAndBound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// A limit too large for a `Duration` means no limit.
    pub fn from_config(config: &SolverConfig) -> Self {
        Self {
            time_limit: config
                .time_limit_secs
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok()),
        }
    }
}

impl ProgramSolver for BranchAndBound {
    fn solve(&self, program: &BinaryProgram) -> Result<Solution, SolverError> {
        program.validate()?;
        let deadline = self.time_limit.and_then(|t| Instant::now().checked_add(t));
        let mut search = Search::new(program, deadline);

        if !(0..search.rows.len()).all(|r| search.row_feasible(r)) {
            return Ok(Solution {
                status: SolveStatus::Infeasible,
                values: Vec::new(),
                objective: 0.0,
                nodes: 0,
            });
        }

        search.descend(0);
        trace!(nodes = search.nodes, "branch and bound finished");

        let nodes = search.nodes;
        let status = match (&search.best, search.timed_out) {
            (_, true) => SolveStatus::TimedOut,
            (Some(_), false) => SolveStatus::Optimal,
            (None, false) => SolveStatus::Infeasible,
        };
        let (objective, values) = search.best.unwrap_or((0.0, Vec::new()));
        Ok(Solution {
            status,
            values,
            objective,
            nodes,
        })
    }
}

struct Row {
    sense: Sense,
    rhs: i64,
    /// Activity of variables fixed to 1.
    fixed: i64,
    /// Sum of negative coefficients over free variables.
    free_min: i64,
    /// Sum of positive coefficients over free variables.
    free_max: i64,
    tighten: bool,
    /// Members per cardinality group, coefficients ascending.
    by_group: Vec<(usize, Vec<(i64, usize)>)>,
    ungrouped: Vec<(i64, usize)>,
}

struct Group {
    row: usize,
    /// Owned variables, objective descending.
    vars: Vec<usize>,
    /// The group owns every variable of its row.
    exact: bool,
}

struct Search<'a> {
    objective: &'a [f64],
    order: Vec<usize>,
    occurrences: Vec<Vec<(usize, i64)>>,
    rows: Vec<Row>,
    groups: Vec<Group>,
    var_group: Vec<Option<usize>>,
    group_free: Vec<usize>,
    free: Vec<bool>,
    values: Vec<bool>,
    current: f64,
    best: Option<(f64, Vec<bool>)>,
    nodes: u64,
    deadline: Option<Instant>,
    timed_out: bool,
}

impl<'a> Search<'a> {
    fn new(program: &'a BinaryProgram, deadline: Option<Instant>) -> Self {
        let n = program.num_vars();
        let objective = program.objective();

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| objective[b].total_cmp(&objective[a]).then(a.cmp(&b)));

        let mut occurrences = vec![Vec::new(); n];
        let mut rows = Vec::with_capacity(program.constraints().len());
        for (r, constraint) in program.constraints().iter().enumerate() {
            let (mut free_min, mut free_max) = (0, 0);
            for &(var, coef) in constraint.expr.terms() {
                occurrences[var].push((r, coef));
                if coef > 0 {
                    free_max += coef;
                } else {
                    free_min += coef;
                }
            }
            rows.push(Row {
                sense: constraint.sense,
                rhs: constraint.rhs,
                fixed: 0,
                free_min,
                free_max,
                tighten: false,
                by_group: Vec::new(),
                ungrouped: Vec::new(),
            });
        }

        // Cardinality groups: each variable belongs to the first unit row that mentions it.
        let mut var_group: Vec<Option<usize>> = vec![None; n];
        let mut groups: Vec<Group> = Vec::new();
        for (r, constraint) in program.constraints().iter().enumerate() {
            let terms = constraint.expr.terms();
            let unit = matches!(constraint.sense, Sense::Eq | Sense::Le)
                && terms.iter().all(|&(_, coef)| coef == 1)
                && !has_duplicates(terms);
            if !unit {
                continue;
            }
            let mut owned = Vec::new();
            for &(var, _) in terms {
                if var_group[var].is_none() {
                    var_group[var] = Some(groups.len());
                    owned.push(var);
                }
            }
            if owned.is_empty() {
                continue;
            }
            let exact = owned.len() == terms.len();
            owned.sort_by(|&a, &b| objective[b].total_cmp(&objective[a]).then(a.cmp(&b)));
            groups.push(Group {
                row: r,
                vars: owned,
                exact,
            });
        }
        let group_rows: Vec<usize> = groups.iter().map(|g| g.row).collect();

        for (r, constraint) in program.constraints().iter().enumerate() {
            let terms = constraint.expr.terms();
            let row = &mut rows[r];
            row.tighten = !group_rows.contains(&r)
                && !terms.is_empty()
                && terms.iter().all(|&(_, coef)| coef >= 0);
            if !row.tighten {
                continue;
            }
            for &(var, coef) in terms {
                match var_group[var] {
                    Some(g) => match row.by_group.iter_mut().find(|(id, _)| *id == g) {
                        Some((_, members)) => members.push((coef, var)),
                        None => row.by_group.push((g, vec![(coef, var)])),
                    },
                    None => row.ungrouped.push((coef, var)),
                }
            }
            for (_, members) in &mut row.by_group {
                members.sort();
            }
        }

        let group_free = groups.iter().map(|g| g.vars.len()).collect();

        Self {
            objective,
            order,
            occurrences,
            rows,
            groups,
            var_group,
            group_free,
            free: vec![true; n],
            values: vec![false; n],
            current: 0.0,
            best: None,
            nodes: 0,
            deadline,
            timed_out: false,
        }
    }

    fn descend(&mut self, depth: usize) {
        self.nodes += 1;
        if self.nodes % CLOCK_CHECK_INTERVAL == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    self.timed_out = true;
                }
            }
        }
        if self.timed_out {
            return;
        }

        if depth == self.order.len() {
            let improves = match &self.best {
                Some((best, _)) => self.current > best + OBJECTIVE_EPSILON,
                None => true,
            };
            if improves {
                self.best = Some((self.current, self.values.clone()));
            }
            return;
        }

        if let Some((best, _)) = &self.best {
            if self.objective_bound() <= best + OBJECTIVE_EPSILON {
                return;
            }
        }

        let var = self.order[depth];
        for value in [true, false] {
            if self.assign(var, value) {
                self.descend(depth + 1);
            }
            self.unassign(var, value);
            if self.timed_out {
                return;
            }
        }
    }

    /// Fixes `var` and reports whether every row it appears in can still be satisfied.
    fn assign(&mut self, var: usize, value: bool) -> bool {
        self.free[var] = false;
        self.values[var] = value;
        if let Some(g) = self.var_group[var] {
            self.group_free[g] -= 1;
        }
        if value {
            self.current += self.objective[var];
        }
        for &(r, coef) in &self.occurrences[var] {
            let row = &mut self.rows[r];
            if coef > 0 {
                row.free_max -= coef;
            } else {
                row.free_min -= coef;
            }
            if value {
                row.fixed += coef;
            }
        }
        self.occurrences[var]
            .iter()
            .all(|&(r, _)| self.row_feasible(r))
    }

    fn unassign(&mut self, var: usize, value: bool) {
        for &(r, coef) in &self.occurrences[var] {
            let row = &mut self.rows[r];
            if coef > 0 {
                row.free_max += coef;
            } else {
                row.free_min += coef;
            }
            if value {
                row.fixed -= coef;
            }
        }
        if value {
            self.current -= self.objective[var];
        }
        if let Some(g) = self.var_group[var] {
            self.group_free[g] += 1;
        }
        self.values[var] = false;
        self.free[var] = true;
    }

    fn row_feasible(&self, r: usize) -> bool {
        let row = &self.rows[r];
        let mut lo = row.fixed + row.free_min;
        let mut hi = row.fixed + row.free_max;
        if row.tighten {
            let (tight_lo, tight_hi) = self.tight_activity(row);
            lo = lo.max(tight_lo);
            hi = hi.min(tight_hi);
        }
        match row.sense {
            Sense::Eq => lo <= row.rhs && row.rhs <= hi,
            Sense::Le => lo <= row.rhs,
            Sense::Ge => hi >= row.rhs,
        }
    }

    /// Activity range of a non-negative row once group capacities are respected.
    fn tight_activity(&self, row: &Row) -> (i64, i64) {
        let free = &self.free;
        let mut lo = row.fixed;
        let mut hi = row.fixed;
        for (g, members) in &row.by_group {
            let group = &self.groups[*g];
            let capacity = self.capacity(group);
            let free_members = move || members.iter().filter(move |(_, var)| free[*var]);

            hi += free_members()
                .rev()
                .take(capacity)
                .map(|(coef, _)| coef)
                .sum::<i64>();

            if group.exact && self.rows[group.row].sense == Sense::Eq {
                let inside = free_members().count();
                let outside = self.group_free[*g].saturating_sub(inside);
                let forced = capacity.saturating_sub(outside);
                lo += free_members()
                    .take(forced)
                    .map(|(coef, _)| coef)
                    .sum::<i64>();
            }
        }
        hi += row
            .ungrouped
            .iter()
            .filter(|(_, var)| free[*var])
            .map(|(coef, _)| coef)
            .sum::<i64>();
        (lo, hi)
    }

    fn capacity(&self, group: &Group) -> usize {
        let row = &self.rows[group.row];
        (row.rhs - row.fixed).max(0) as usize
    }

    fn objective_bound(&self) -> f64 {
        let mut bound = self.current;
        for group in &self.groups {
            bound += group
                .vars
                .iter()
                .filter(|var| self.free[**var])
                .map(|var| self.objective[*var])
                .take_while(|score| *score > 0.0)
                .take(self.capacity(group))
                .sum::<f64>();
        }
        bound += (0..self.objective.len())
            .filter(|var| self.free[*var] && self.var_group[*var].is_none())
            .map(|var| self.objective[var])
            .filter(|score| *score > 0.0)
            .sum::<f64>();
        bound
    }
}

fn has_duplicates(terms: &[(usize, i64)]) -> bool {
    let mut vars: Vec<usize> = terms.iter().map(|(var, _)| *var).collect();
    vars.sort_unstable();
    vars.windows(2).any(|pair| pair[0] == pair[1])
}
