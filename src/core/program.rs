//! External program handles.
//!
//! A handle knows how to invoke a program (its command, including any
//! prefix arguments) and whether the program was actually found.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::util::config::BinaryEntry;
use crate::util::process::find_executable;

/// A reference to an external program.
pub trait ExternalProgram: fmt::Debug + Send + Sync {
    /// Display name.
    fn name(&self) -> &str;

    /// Whether the program exists.
    fn found(&self) -> bool;

    /// Full command: the program followed by any required prefix arguments.
    fn get_command(&self) -> Vec<String>;

    /// Path to the program itself.
    fn get_path(&self) -> Option<PathBuf>;
}

/// Resolve a program string to an existing file.
///
/// Strings with a directory component are checked as paths; bare names are
/// searched for on `PATH`.
fn resolve_program(program: &str) -> Option<PathBuf> {
    let path = Path::new(program);
    if path.components().count() > 1 || path.is_absolute() {
        if path.is_file() {
            Some(path.to_path_buf())
        } else {
            None
        }
    } else {
        find_executable(program)
    }
}

/// A program given by a literal path or bare name.
#[derive(Debug, Clone)]
pub struct PathProgram {
    name: String,
    requested: String,
    resolved: Option<PathBuf>,
}

impl PathProgram {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        let requested = path.into();
        let resolved = resolve_program(&requested);
        PathProgram {
            name: name.into(),
            requested,
            resolved,
        }
    }
}

impl ExternalProgram for PathProgram {
    fn name(&self) -> &str {
        &self.name
    }

    fn found(&self) -> bool {
        self.resolved.is_some()
    }

    fn get_command(&self) -> Vec<String> {
        match &self.resolved {
            Some(p) => vec![p.to_string_lossy().into_owned()],
            None => vec![self.requested.clone()],
        }
    }

    fn get_path(&self) -> Option<PathBuf> {
        self.resolved.clone()
    }
}

/// A program given by a machine-file entry.
#[derive(Debug, Clone)]
pub struct EntryProgram {
    name: String,
    command: Vec<String>,
    resolved: Option<PathBuf>,
}

impl EntryProgram {
    pub fn from_entry(name: impl Into<String>, entry: &BinaryEntry) -> Self {
        let mut command = entry.to_command();
        let resolved = command.first().and_then(|p| resolve_program(p));

        if let (Some(first), Some(path)) = (command.first_mut(), resolved.as_ref()) {
            *first = path.to_string_lossy().into_owned();
        }

        EntryProgram {
            name: name.into(),
            command,
            resolved,
        }
    }
}

impl ExternalProgram for EntryProgram {
    fn name(&self) -> &str {
        &self.name
    }

    fn found(&self) -> bool {
        self.resolved.is_some()
    }

    fn get_command(&self) -> Vec<String> {
        self.command.clone()
    }

    fn get_path(&self) -> Option<PathBuf> {
        self.resolved.clone()
    }
}
