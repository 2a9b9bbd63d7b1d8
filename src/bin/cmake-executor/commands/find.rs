//! `cmake-executor find` command

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::cli::FindArgs;
use cmake_executor::{CMakeExecutor, CMakeRegistry, Environment, MachineChoice};

#[derive(Serialize)]
struct FindReport {
    machine: MachineChoice,
    found: bool,
    path: Option<PathBuf>,
    version: Option<String>,
    command: Option<Vec<String>>,
    min_version: String,
}

pub fn execute(args: FindArgs, env: &Environment) -> Result<i32> {
    let registry = CMakeRegistry::new();
    let cmake = CMakeExecutor::new(env, &registry, &args.min_version, args.machine, args.json);

    let report = FindReport {
        machine: cmake.machine_choice(),
        found: cmake.found(),
        path: cmake.executable_path(),
        version: cmake.version().map(str::to_string),
        command: cmake.get_command(),
        min_version: cmake.min_version().to_string(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.found {
        let path = report
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        println!(
            "CMake for {}: {} ({})",
            report.machine,
            path,
            report.version.as_deref().unwrap_or("unknown")
        );
    } else {
        println!("CMake for {}: not found", report.machine);
    }

    Ok(if report.found { 0 } else { 1 })
}
