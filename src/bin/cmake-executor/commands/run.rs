//! `cmake-executor run` command

use std::io::Write;

use anyhow::{bail, Result};

use crate::cli::RunArgs;
use cmake_executor::{CMakeExecutor, CMakeRegistry, Environment};

pub fn execute(args: RunArgs, env: &Environment) -> Result<i32> {
    let registry = CMakeRegistry::new();
    let cmake = CMakeExecutor::new(env, &registry, &args.min_version, args.machine, true);

    if !cmake.found() {
        bail!(
            "CMake >= {} not found for the {}\n\
             \n\
             Install CMake, or point `[binaries] cmake` in a machine file at it.",
            args.min_version,
            args.machine
        );
    }

    let output = if args.fake_build {
        cmake.call_with_fake_build(args.args.as_slice(), &args.build_dir, None)?
    } else {
        cmake.call(args.args.as_slice(), &args.build_dir, None, args.no_cache)?
    };

    std::io::stdout().write_all(output.stdout.as_bytes())?;
    std::io::stderr().write_all(output.stderr.as_bytes())?;

    Ok(output.code)
}
