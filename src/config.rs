//! Contest rules, solver options and input column names.
//!
//! Every section deserializes with defaults, so a YAML file only has to name what it changes:
//!
//! ```yaml
//! contest:
//!   salary_min: 48000
//!   max_lineups: 150
//! solver:
//!   time_limit_secs: 10
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{InputError, LineupError};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub contest: ContestConfig,
    pub solver: SolverConfig,
    pub columns: ColumnConfig,
}

/// Roster shape and salary rules of a single-game captain contest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContestConfig {
    pub captain_slots: usize,
    pub flex_slots: usize,
    /// Inclusive upper bound on total salary.
    pub salary_cap: u32,
    /// Inclusive lower bound on total salary.
    pub salary_min: u32,
    pub max_lineups: usize,
    /// Applied once to captain projections when the pool is built.
    pub captain_multiplier: f64,
}

impl ContestConfig {
    pub fn roster_size(&self) -> usize {
        self.captain_slots + self.flex_slots
    }
}

impl Default for ContestConfig {
    fn default() -> Self {
        Self {
            captain_slots: 1,
            flex_slots: 5,
            salary_cap: 50_000,
            salary_min: 0,
            max_lineups: 20,
            captain_multiplier: 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    #[default]
    BranchAndBound,
    CpSat,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Per-round limit. A round that hits it ends generation like an infeasible one.
    pub time_limit_secs: Option<f64>,
    /// CP-SAT only.
    pub num_workers: i32,
    /// CP-SAT only.
    pub random_seed: i32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::BranchAndBound,
            time_limit_secs: None,
            num_workers: 1,
            random_seed: 42,
        }
    }
}

/// Header names of the salary export and the projection sheet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub name: String,
    pub role: String,
    pub salary: String,
    pub label: String,
    pub projection: String,
    pub captain_tag: String,
    pub flex_tag: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            name: "Name".to_string(),
            role: "Roster Position".to_string(),
            salary: "Salary".to_string(),
            label: "Name + ID".to_string(),
            projection: "DK OF".to_string(),
            captain_tag: "CPT".to_string(),
            flex_tag: "FLEX".to_string(),
        }
    }
}

impl OptimizerConfig {
    pub fn from_yaml_str(raw: &str) -> Result<Self, InputError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    /// `salary_min > salary_cap` is accepted: such a contest simply has no lineups.
    pub fn validate(&self) -> Result<(), LineupError> {
        let contest = &self.contest;
        if contest.roster_size() == 0 {
            return Err(LineupError::InvalidConfig(
                "captain_slots + flex_slots must be at least 1".to_string(),
            ));
        }
        if !contest.captain_multiplier.is_finite() || contest.captain_multiplier < 0.0 {
            return Err(LineupError::InvalidConfig(format!(
                "captain_multiplier must be a non-negative number, got {}",
                contest.captain_multiplier
            )));
        }
        if let Some(limit) = self.solver.time_limit_secs {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(LineupError::InvalidConfig(format!(
                    "time_limit_secs must be positive, got {limit}"
                )));
            }
        }
        if self.columns.captain_tag == self.columns.flex_tag {
            return Err(LineupError::InvalidConfig(format!(
                "captain and flex role tags are both `{}`",
                self.columns.captain_tag
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = OptimizerConfig::from_yaml_str(
            "contest:\n  salary_min: 48000\n  max_lineups: 150\nsolver:\n  backend: cp_sat\n",
        )
        .unwrap();

        assert_eq!(config.contest.salary_min, 48_000);
        assert_eq!(config.contest.max_lineups, 150);
        assert_eq!(config.contest.flex_slots, 5);
        assert_eq!(config.contest.salary_cap, 50_000);
        assert_eq!(config.solver.backend, SolverBackend::CpSat);
        assert_eq!(config.columns, ColumnConfig::default());
    }

    #[test]
    fn floor_above_cap_is_not_a_config_error() {
        let mut config = OptimizerConfig::default();
        config.contest.salary_min = 60_000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_empty_roster_and_bad_multiplier() {
        let mut config = OptimizerConfig::default();
        config.contest.captain_slots = 0;
        config.contest.flex_slots = 0;
        assert!(matches!(config.validate(), Err(LineupError::InvalidConfig(_))));

        let mut config = OptimizerConfig::default();
        config.contest.captain_multiplier = f64::NAN;
        assert!(matches!(config.validate(), Err(LineupError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_non_positive_time_limit() {
        let mut config = OptimizerConfig::default();
        config.solver.time_limit_secs = Some(0.0);
        assert!(config.validate().is_err());
    }
}
