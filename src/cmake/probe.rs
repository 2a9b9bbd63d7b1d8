//! CMake version probing.

use std::io;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::core::program::ExternalProgram;
use crate::util::process::{Launcher, ProcessBuilder};

static VERSION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*cmake\d? version\s*").expect("valid regex"));

/// Why a CMake candidate was rejected.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("did not find CMake `{name}`")]
    NotFound { name: String },

    #[error("found CMake `{command}` but couldn't run it (exit code {code})")]
    Failed { command: String, code: i32 },

    #[error("we thought we found CMake `{command}` but now it's not there")]
    Vanished { command: String },

    #[error("found CMake `{command}` but didn't have permissions to run it")]
    PermissionDenied { command: String },

    #[error("failed to launch CMake `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },
}

impl ProbeError {
    /// Whether the rejection deserves a warning rather than a plain log line.
    pub fn is_warning(&self) -> bool {
        !matches!(self, ProbeError::NotFound { .. })
    }

    /// Platform hint to show alongside the warning.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ProbeError::PermissionDenied { .. } if !cfg!(windows) => Some(
                "On Unix-like systems this is often caused by scripts that are not executable.",
            ),
            _ => None,
        }
    }
}

/// Extract the version from `cmake --version` output.
pub fn parse_version_banner(output: &str) -> String {
    let first = output.lines().next().unwrap_or("");
    VERSION_LABEL.replace_all(first, "").trim().to_string()
}

/// Run `--version` on a candidate and return the reported version.
pub fn check_cmake(
    launcher: &dyn Launcher,
    program: &dyn ExternalProgram,
) -> Result<String, ProbeError> {
    if !program.found() {
        return Err(ProbeError::NotFound {
            name: program.name().to_string(),
        });
    }

    let command = program.get_command();
    let Some(process) = ProcessBuilder::from_command(&command) else {
        return Err(ProbeError::NotFound {
            name: program.name().to_string(),
        });
    };
    let process = process.arg("--version");
    let display = command.join(" ");

    let output = launcher.launch(&process).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ProbeError::Vanished {
            command: display.clone(),
        },
        io::ErrorKind::PermissionDenied => ProbeError::PermissionDenied {
            command: display.clone(),
        },
        _ => ProbeError::Launch {
            command: display.clone(),
            source: e,
        },
    })?;

    if !output.success() {
        return Err(ProbeError::Failed {
            command: display,
            code: output.code,
        });
    }

    Ok(parse_version_banner(&output.stdout))
}
