//! Command implementations

pub mod find;
pub mod run;

use anyhow::Result;

use crate::cli::Cli;
use cmake_executor::Environment;

/// Build the environment from the machine files given on the command line.
pub fn load_environment(cli: &Cli) -> Result<Environment> {
    Environment::load(cli.native_file.as_deref(), cli.cross_file.as_deref())
}
