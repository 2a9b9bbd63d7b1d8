//! Running CMake.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::cmake::fake_build::{stage_fake_build, stub_compiler_path};
use crate::cmake::registry::{CMakeRegistry, DiscoveryRecord, InvocationKey};
use crate::core::environment::MachineEnvironment;
use crate::core::machine::MachineChoice;
use crate::core::program::ExternalProgram;
use crate::core::version::version_compare;
use crate::util::fs::ensure_dir;
use crate::util::process::{CallOutput, ProcessBuilder};

/// Misuse of an executor.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("CMake is not available for the {0}; check `found()` before calling it")]
    NotFound(MachineChoice),

    #[error("no existing executable to name as the fake compiler")]
    NoStubCompiler,
}

/// Environment part of an invocation key: `env` if given, otherwise a
/// byte-exact snapshot of the current process environment.
fn env_key(env: Option<&BTreeMap<String, String>>) -> BTreeMap<OsString, OsString> {
    match env {
        Some(env) => env
            .iter()
            .map(|(k, v)| (OsString::from(k), OsString::from(v)))
            .collect(),
        None => std::env::vars_os().collect(),
    }
}

/// CMake for one machine role, at a caller-chosen minimum version.
pub struct CMakeExecutor<'a> {
    registry: &'a CMakeRegistry,
    for_machine: MachineChoice,
    min_version: String,
    /// `None` if CMake is missing or too old for this caller.
    program: Option<Arc<dyn ExternalProgram>>,
    version: Option<String>,
}

impl<'a> CMakeExecutor<'a> {
    /// Find CMake for `for_machine`, reusing an earlier search if there was one.
    ///
    /// If the stored CMake is older than `min_version`, this executor reports
    /// it as not found; the stored result itself is not changed.
    pub fn new(
        env: &dyn MachineEnvironment,
        registry: &'a CMakeRegistry,
        min_version: impl Into<String>,
        for_machine: MachineChoice,
        silent: bool,
    ) -> Self {
        let min_version = min_version.into();
        let mut executor = CMakeExecutor {
            registry,
            for_machine,
            min_version,
            program: None,
            version: None,
        };

        let DiscoveryRecord::Resolved { program, version } =
            registry.discover(env, for_machine, &executor.min_version, silent)
        else {
            return executor;
        };

        if !version_compare(&version, &executor.min_version) {
            tracing::warn!(
                "The version of CMake {} is {} but version {} is required",
                program.get_command().join(" "),
                version,
                executor.min_version
            );
        } else {
            executor.program = Some(program);
        }
        executor.version = Some(version);

        executor
    }

    /// Whether a usable CMake was found.
    pub fn found(&self) -> bool {
        self.program.is_some()
    }

    /// Version reported by the discovered CMake, even if too old for this caller.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Minimum version this executor was created with.
    pub fn min_version(&self) -> &str {
        &self.min_version
    }

    /// Path to the CMake binary.
    pub fn executable_path(&self) -> Option<PathBuf> {
        self.program.as_ref().and_then(|p| p.get_path())
    }

    /// Command used to run CMake, including any wrapper prefix.
    pub fn get_command(&self) -> Option<Vec<String>> {
        self.program.as_ref().map(|p| p.get_command())
    }

    pub fn machine_choice(&self) -> MachineChoice {
        self.for_machine
    }

    fn program(&self) -> Result<&Arc<dyn ExternalProgram>, ExecutorError> {
        self.program
            .as_ref()
            .ok_or(ExecutorError::NotFound(self.for_machine))
    }

    fn cache_key<S: AsRef<str>>(
        &self,
        program: &dyn ExternalProgram,
        args: &[S],
        build_dir: &Path,
        env: Option<&BTreeMap<String, String>>,
    ) -> InvocationKey {
        InvocationKey {
            command: program.get_command(),
            args: args.iter().map(|a| a.as_ref().to_string()).collect(),
            build_dir: build_dir.to_path_buf(),
            env: env_key(env),
        }
    }

    fn call_real<S: AsRef<str>>(
        &self,
        program: &dyn ExternalProgram,
        args: &[S],
        build_dir: &Path,
        env: Option<&BTreeMap<String, String>>,
    ) -> Result<CallOutput> {
        ensure_dir(build_dir)?;

        let command = program.get_command();
        let mut process = ProcessBuilder::from_command(&command)
            .ok_or(ExecutorError::NotFound(self.for_machine))?
            .args(args.iter().map(|a| a.as_ref()))
            .cwd(build_dir);
        if let Some(env) = env {
            process = process.env_exact(env.clone());
        }

        let output = self
            .registry
            .launcher()
            .launch(&process)
            .with_context(|| format!("failed to execute `{}`", process.display_command()))?;

        tracing::debug!(
            "Called `{}` in {} -> {}",
            process.display_command(),
            build_dir.display(),
            output.code
        );

        Ok(output)
    }

    /// Run CMake with `args` in `build_dir`.
    ///
    /// Identical calls (same binary, arguments, directory and environment)
    /// run CMake once and replay the captured result afterwards, failures
    /// included. `env` of `None` inherits the current environment.
    pub fn call<S: AsRef<str>>(
        &self,
        args: &[S],
        build_dir: &Path,
        env: Option<&BTreeMap<String, String>>,
        disable_cache: bool,
    ) -> Result<CallOutput> {
        let program = self.program()?.clone();

        if disable_cache {
            return self.call_real(program.as_ref(), args, build_dir, env);
        }

        let key = self.cache_key(program.as_ref(), args, build_dir, env);
        if let Some(output) = self.registry.cached(&key) {
            tracing::debug!("Using cached CMake result in {}", build_dir.display());
            return Ok(output);
        }

        let output = self.call_real(program.as_ref(), args, build_dir, env)?;
        Ok(self.registry.store(key, output))
    }

    /// Like [`call`](Self::call), but first stage files that let CMake skip
    /// compiler detection in a fresh `build_dir`.
    pub fn call_with_fake_build<S: AsRef<str>>(
        &self,
        args: &[S],
        build_dir: &Path,
        env: Option<&BTreeMap<String, String>>,
    ) -> Result<CallOutput> {
        let program = self.program()?.clone();

        let key = self.cache_key(program.as_ref(), args, build_dir, env);
        if let Some(output) = self.registry.cached(&key) {
            return Ok(output);
        }

        let version = self
            .version
            .as_deref()
            .ok_or(ExecutorError::NotFound(self.for_machine))?;
        let compiler = stub_compiler_path(program.get_path().as_deref())
            .ok_or(ExecutorError::NoStubCompiler)?;
        stage_fake_build(build_dir, version, &compiler)?;

        self.call(args, build_dir, env, false)
    }
}

impl std::fmt::Debug for CMakeExecutor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CMakeExecutor")
            .field("for_machine", &self.for_machine)
            .field("min_version", &self.min_version)
            .field("program", &self.program)
            .field("version", &self.version)
            .finish()
    }
}
