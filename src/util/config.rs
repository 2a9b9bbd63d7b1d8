//! Machine file support.
//!
//! A machine file describes the tools available for one machine role:
//! - Native file: the build machine (also the host machine for native builds)
//! - Cross file: the host machine of a cross build
//!
//! ```toml
//! [binaries]
//! cmake = "/opt/cmake/bin/cmake"
//! # or a program plus required prefix arguments
//! # cmake = ["python3", "/opt/wrappers/cmake.py"]
//! ```
//!
//! A global native file at `~/.cmake-executor/native.toml` is merged under
//! the one given on the command line.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A configured binary: either a single path or a command with prefix args.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BinaryEntry {
    /// A single path or program name.
    Path(String),
    /// A program followed by arguments it always needs.
    Command(Vec<String>),
}

impl BinaryEntry {
    /// The entry as an ordered argument list.
    pub fn to_command(&self) -> Vec<String> {
        match self {
            BinaryEntry::Path(p) => vec![p.clone()],
            BinaryEntry::Command(c) => c.clone(),
        }
    }

    /// Blank entries are treated as absent.
    pub fn is_blank(&self) -> bool {
        match self {
            BinaryEntry::Path(p) => p.trim().is_empty(),
            BinaryEntry::Command(c) => c.first().map_or(true, |p| p.trim().is_empty()),
        }
    }
}

impl std::fmt::Display for BinaryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_command().join(" "))
    }
}

/// Contents of one machine file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineFile {
    /// Tool name to configured binary.
    pub binaries: BTreeMap<String, BinaryEntry>,
}

impl MachineFile {
    /// Load a machine file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read machine file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse machine file: {}", path.display()))
    }

    /// Load a machine file, falling back to an empty one if it is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load machine file from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another machine file into this one (other takes precedence).
    pub fn merge(&mut self, other: MachineFile) {
        self.binaries.extend(other.binaries);
    }

    /// Look up a binary, skipping blank entries.
    pub fn binary(&self, name: &str) -> Option<&BinaryEntry> {
        self.binaries.get(name).filter(|e| !e.is_blank())
    }
}

/// Get the global config directory (~/.cmake-executor).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".cmake-executor"))
}

/// Get the global native file path (~/.cmake-executor/native.toml).
pub fn global_native_file_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("native.toml"))
}

/// Load the native machine file: global first, then the explicit one on top.
pub fn load_native_file(global_path: Option<&Path>, explicit: Option<&Path>) -> Result<MachineFile> {
    let mut file = MachineFile::default();

    if let Some(global) = global_path {
        file.merge(MachineFile::load_or_default(global));
    }

    // An explicitly requested file must load
    if let Some(path) = explicit {
        file.merge(MachineFile::load(path)?);
    }

    Ok(file)
}
