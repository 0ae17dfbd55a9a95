//! Model building and constraint logic for the captain-mode lineup solver.

mod generate;
mod model_context;
mod model_distinct;
mod model_exclusion;
mod model_roster;
mod model_salary;

pub use generate::*;
pub use model_context::{LineupVars, ModelBuilderContext, build_model_pipeline, build_program};
use model_distinct::*;
use model_exclusion::*;
use model_roster::*;
use model_salary::*;
