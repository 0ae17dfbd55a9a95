//! Error types for pool construction, solving and file I/O.

use std::fmt;

use thiserror::Error;

/// Which candidate pool a pool-level error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolKind {
    Captain,
    Flex,
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolKind::Captain => write!(f, "captain"),
            PoolKind::Flex => write!(f, "flex"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error(
        "solver reported an optimal solution selecting {captains} captain(s) and {flex} flex player(s)"
    )]
    InconsistentSolution { captains: usize, flex: usize },

    #[error("solver backend failed: {0}")]
    Backend(String),

    #[error("solver backend `{0}` is not compiled into this build")]
    BackendUnavailable(&'static str),
}

#[derive(Debug, Error)]
pub enum LineupError {
    #[error("malformed candidate pool: {available} {pool} candidate(s), {required} required")]
    MalformedCandidatePool {
        pool: PoolKind,
        available: usize,
        required: usize,
    },

    #[error("solver failure: {0}")]
    Solver(#[from] SolverError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("missing column `{0}`")]
    MissingColumn(String),

    #[error("row {row}: invalid salary `{value}`")]
    InvalidSalary { row: usize, value: String },

    #[error("row {row}: invalid projection `{value}`")]
    InvalidProjection { row: usize, value: String },
}
