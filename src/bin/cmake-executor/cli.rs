//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use cmake_executor::MachineChoice;

/// Minimum CMake version accepted when none is given.
pub const DEFAULT_MIN_VERSION: &str = "3.4";

/// cmake-executor - find and run CMake for native and cross builds
#[derive(Parser)]
#[command(name = "cmake-executor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Machine file describing the build machine
    #[arg(long, global = true, value_name = "FILE")]
    pub native_file: Option<PathBuf>,

    /// Machine file describing the host machine of a cross build
    #[arg(long, global = true, value_name = "FILE")]
    pub cross_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report which CMake would be used
    Find(FindArgs),

    /// Run CMake with the given arguments
    Run(RunArgs),
}

#[derive(Args)]
pub struct FindArgs {
    /// Machine to find CMake for (build or host)
    #[arg(long, default_value = "build")]
    pub machine: MachineChoice,

    /// Minimum acceptable CMake version
    #[arg(long, default_value = DEFAULT_MIN_VERSION)]
    pub min_version: String,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct RunArgs {
    /// Machine to run CMake for (build or host)
    #[arg(long, default_value = "build")]
    pub machine: MachineChoice,

    /// Minimum acceptable CMake version
    #[arg(long, default_value = DEFAULT_MIN_VERSION)]
    pub min_version: String,

    /// Directory to run CMake in (created if missing)
    #[arg(long, default_value = ".")]
    pub build_dir: PathBuf,

    /// Pre-seed the build directory so CMake skips compiler detection
    #[arg(long)]
    pub fake_build: bool,

    /// Always run CMake, bypassing the result cache
    #[arg(long)]
    pub no_cache: bool,

    /// Arguments passed to CMake
    #[arg(last = true)]
    pub args: Vec<String>,
}
