//! CLI layer: argument parsing and command dispatch

pub mod args;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

pub use args::{CrossSectionalArgs, LongitudinalArgs, PipelineArgs};
pub use commands::{run_cross_sectional, run_longitudinal};
pub use error::{CliError, CliResult};
