//! File boundaries of the optimizer: the merged player table in, lineup files out.

mod export;
mod input;

pub use export::*;
pub use input::*;
