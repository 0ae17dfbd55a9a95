//! The round loop: build, solve, accept, forbid, repeat.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::build_program;
use crate::config::ContestConfig;
use crate::error::LineupError;
use crate::players::CandidatePool;
use crate::selection::Selection;
use crate::solver::{ProgramSolver, SolveStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Accepted,
    /// No unseen lineup satisfies the contest rules.
    Infeasible,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    /// Zero-based round index.
    pub round: usize,
    pub outcome: RoundOutcome,
    /// Objective of the accepted lineup.
    pub objective: Option<f64>,
    pub nodes: u64,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    Infeasible,
    TimedOut,
}

#[derive(Debug, Clone)]
pub struct Generation {
    /// Accepted lineups in discovery order.
    pub selections: Vec<Selection>,
    pub stop: StopReason,
    pub rounds: usize,
}

/// Re-solves the lineup program, forbidding every lineup found so far, until `max_lineups`
/// lineups exist or a round comes back without one.
pub struct LineupGenerator<'a, S> {
    pool: &'a CandidatePool,
    contest: &'a ContestConfig,
    solver: S,
}

impl<'a, S: ProgramSolver> LineupGenerator<'a, S> {
    pub fn new(pool: &'a CandidatePool, contest: &'a ContestConfig, solver: S) -> Self {
        Self {
            pool,
            contest,
            solver,
        }
    }

    pub fn generate(&self) -> Result<Generation, LineupError> {
        self.generate_with_progress(|_| {})
    }

    /// Solver failures and malformed solutions propagate; infeasible and timed-out rounds
    /// end the run with whatever was accepted.
    pub fn generate_with_progress(
        &self,
        mut on_round: impl FnMut(&RoundReport),
    ) -> Result<Generation, LineupError> {
        info!(
            captains = self.pool.captains().len(),
            flex = self.pool.flex().len(),
            max_lineups = self.contest.max_lineups,
            "generating lineups"
        );

        let mut accepted: Vec<Selection> = Vec::new();
        let mut stop = StopReason::TargetReached;
        let mut rounds = 0;

        for round in 0..self.contest.max_lineups {
            let started = Instant::now();
            let program = build_program(self.pool, self.contest, &accepted);
            let solution = self.solver.solve(&program)?;
            rounds += 1;

            let outcome = match solution.status {
                SolveStatus::Optimal => {
                    let selection = Selection::decode(&solution.values, self.pool, self.contest)?;
                    accepted.push(selection);
                    RoundOutcome::Accepted
                }
                SolveStatus::Infeasible => RoundOutcome::Infeasible,
                SolveStatus::TimedOut => RoundOutcome::TimedOut,
            };

            let report = RoundReport {
                round,
                outcome,
                objective: (outcome == RoundOutcome::Accepted).then_some(solution.objective),
                nodes: solution.nodes,
                elapsed: started.elapsed(),
            };
            debug!(
                round,
                outcome = ?report.outcome,
                objective = ?report.objective,
                nodes = report.nodes,
                elapsed_ms = report.elapsed.as_millis() as u64,
                "round finished"
            );
            on_round(&report);

            match outcome {
                RoundOutcome::Accepted => continue,
                RoundOutcome::Infeasible => {
                    info!(round, "no further feasible lineups");
                    stop = StopReason::Infeasible;
                }
                RoundOutcome::TimedOut => {
                    warn!(round, "solver hit its time limit, stopping generation");
                    stop = StopReason::TimedOut;
                }
            }
            break;
        }

        info!(lineups = accepted.len(), rounds, stop = ?stop, "generation finished");
        Ok(Generation {
            selections: accepted,
            stop,
            rounds,
        })
    }
}
