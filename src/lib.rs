//! Captain-mode lineup optimizer.
//!
//! Builds a binary program over a captain pool and a flex pool, solves it, forbids the answer and
//! solves again until enough distinct lineups exist or none are left.

pub mod config;
pub mod error;
pub mod io;
pub mod lineup;
pub mod model;
pub mod ownership;
pub mod players;
pub mod selection;
pub mod solver;

use crate::config::OptimizerConfig;
use crate::error::LineupError;
use crate::lineup::{FinalizedLineup, finalize_lineups};
use crate::model::{Generation, LineupGenerator, RoundReport};
use crate::players::{CandidatePool, PlayerRecord};
use crate::solver::build_solver;

pub struct OptimizerRun {
    pub pool: CandidatePool,
    pub generation: Generation,
    /// Sorted by total salary, highest first.
    pub lineups: Vec<FinalizedLineup>,
}

/// Pool construction, generation and formatting with the configured backend.
pub fn optimize_lineups(
    players: &[PlayerRecord],
    config: &OptimizerConfig,
    on_round: impl FnMut(&RoundReport),
) -> Result<OptimizerRun, LineupError> {
    config.validate()?;
    let pool = CandidatePool::build(players, &config.contest)?;
    let solver = build_solver(&config.solver)?;
    let generation =
        LineupGenerator::new(&pool, &config.contest, solver).generate_with_progress(on_round)?;
    let lineups = finalize_lineups(&generation.selections, &pool);
    Ok(OptimizerRun {
        pool,
        generation,
        lineups,
    })
}
