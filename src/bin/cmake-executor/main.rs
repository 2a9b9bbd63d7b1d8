//! cmake-executor CLI - find and run CMake for native and cross builds

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("cmake_executor=debug")
    } else {
        EnvFilter::new("cmake_executor=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let env = commands::load_environment(&cli)?;

    // Execute command
    match cli.command {
        Commands::Find(args) => commands::find::execute(args, &env),
        Commands::Run(args) => commands::run::execute(args, &env),
    }
}
