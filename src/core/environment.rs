//! The build environment as seen by tool discovery.
//!
//! Discovery only needs three questions answered: is there a configured
//! binary for this tool and machine, what are the fallback locations, and
//! does a machine role refer to the machine running the build.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;

use crate::core::machine::{MachineChoice, PerMachine};
use crate::util::config::{global_native_file_path, load_native_file, BinaryEntry, MachineFile};

/// Queries tool discovery makes against the host build system.
pub trait MachineEnvironment {
    /// Configured binary for `tool` on `machine`, if any.
    fn lookup_entry(&self, tool: &str, machine: MachineChoice) -> Option<BinaryEntry>;

    /// Fallback CMake locations, in preference order.
    fn default_cmake(&self) -> &[String];

    /// Whether `machine` is the machine actually running the build.
    fn matches_build_machine(&self, machine: MachineChoice) -> bool;
}

/// Default CMake fallback locations for the current platform.
pub fn default_cmake_paths() -> Vec<String> {
    let mut paths = vec!["cmake".to_string()];

    if cfg!(target_os = "windows") {
        paths.push(r"C:\Program Files\CMake\bin\cmake.exe".to_string());
    } else if cfg!(target_os = "macos") {
        paths.push("/Applications/CMake.app/Contents/bin/cmake".to_string());
    }

    paths
}

/// Environment assembled from machine files and environment variables.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Per-machine binary tables; `None` for host means "same as build".
    files: PerMachine<Option<MachineFile>>,
    /// Snapshot of relevant environment variables.
    vars: HashMap<String, String>,
    default_cmake: Vec<String>,
}

impl Environment {
    /// A native build environment with the given build machine file.
    pub fn native(native: MachineFile) -> Self {
        Environment {
            files: PerMachine::new(Some(native), None),
            vars: HashMap::new(),
            default_cmake: default_cmake_paths(),
        }
    }

    /// A cross build environment.
    pub fn cross(native: MachineFile, cross: MachineFile) -> Self {
        Environment {
            files: PerMachine::new(Some(native), Some(cross)),
            vars: HashMap::new(),
            default_cmake: default_cmake_paths(),
        }
    }

    /// Load from optional native and cross file paths, reading tool
    /// variables from the process environment.
    pub fn load(native_file: Option<&Path>, cross_file: Option<&Path>) -> Result<Self> {
        let global = global_native_file_path();
        let native = load_native_file(global.as_deref(), native_file)?;

        let env = match cross_file {
            Some(path) => Environment::cross(native, MachineFile::load(path)?),
            None => Environment::native(native),
        };

        Ok(env.with_vars(std::env::vars_os().map(|(k, v)| {
            (
                k.to_string_lossy().into_owned(),
                v.to_string_lossy().into_owned(),
            )
        })))
    }

    /// Replace the environment variable snapshot.
    pub fn with_vars(mut self, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        self.vars = vars.into_iter().collect();
        self
    }

    /// Replace the fallback CMake locations.
    pub fn with_default_cmake(mut self, paths: Vec<String>) -> Self {
        self.default_cmake = paths;
        self
    }

    /// Whether the host machine differs from the build machine.
    pub fn is_cross_build(&self) -> bool {
        self.files.get(MachineChoice::Host).is_some()
    }

    fn machine_file(&self, machine: MachineChoice) -> Option<&MachineFile> {
        match machine {
            MachineChoice::Build => self.files.get(MachineChoice::Build).as_ref(),
            MachineChoice::Host => self
                .files
                .get(MachineChoice::Host)
                .as_ref()
                .or_else(|| self.files.get(MachineChoice::Build).as_ref()),
        }
    }

    /// Name of the environment variable overriding `tool` on `machine`.
    fn env_var_name(&self, tool: &str, machine: MachineChoice) -> String {
        let base = tool.to_ascii_uppercase().replace('-', "_");
        if machine == MachineChoice::Build && self.is_cross_build() {
            format!("{}_FOR_BUILD", base)
        } else {
            base
        }
    }
}

impl MachineEnvironment for Environment {
    fn lookup_entry(&self, tool: &str, machine: MachineChoice) -> Option<BinaryEntry> {
        if let Some(entry) = self.machine_file(machine).and_then(|f| f.binary(tool)) {
            return Some(entry.clone());
        }

        let var = self.env_var_name(tool, machine);
        self.vars
            .get(&var)
            .map(|v| BinaryEntry::Path(v.clone()))
            .filter(|e| !e.is_blank())
    }

    fn default_cmake(&self) -> &[String] {
        &self.default_cmake
    }

    fn matches_build_machine(&self, machine: MachineChoice) -> bool {
        machine == MachineChoice::Build || !self.is_cross_build()
    }
}
